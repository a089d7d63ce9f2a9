use anyhow::{Error, Result};
use pursuit_core::control::ControlStack;
use pursuit_core::motion::MotionStack;
use pursuit_core::scheduler::Scheduler;
use pursuit_core::PursuitCore;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Model update cadence in milliseconds
const STEP_PERIOD_MS: u64 = 10;
/// Pose reporting cadence in milliseconds, independent of the update cadence
const STATUS_PERIOD_MS: u64 = 50;

fn parse_target(line: &str) -> Option<(i32, i32)> {
    let mut parts = line.split_whitespace();
    let x = parts.next()?.parse().ok()?;
    let y = parts.next()?.parse().ok()?;
    Some((x, y))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    println!("Initializing Pursuit Node...");

    // Default parameters
    let max_linear_velocity = 0.1;
    let max_angular_velocity = 0.001;

    println!(
        "Using parameters: max_linear_velocity={}, max_angular_velocity={}",
        max_linear_velocity, max_angular_velocity
    );

    let mut params = HashMap::new();
    params.insert("max_linear_velocity".to_string(), max_linear_velocity);
    params.insert("max_angular_velocity".to_string(), max_angular_velocity);

    let mut motion_stack = MotionStack::new();
    motion_stack
        .configure_controller(&params)
        .map_err(Error::msg)?;
    let engine = motion_stack.engine();

    let mut control_stack = ControlStack::new();
    control_stack
        .configure_controller(&params)
        .map_err(Error::msg)?;

    let mut core = PursuitCore::new();
    core.register(motion_stack);
    core.register(control_stack);

    if let Err(e) = core.init() {
        eprintln!("Failed to initialize core: {}", e);
        return Ok(());
    }
    println!("Core initialized successfully!");

    // The two periodic activities: the model update tick and the slower
    // status report. They share nothing but the engine handle.
    let mut scheduler = Scheduler::new();

    let step_engine = Arc::clone(&engine);
    scheduler.spawn_periodic(Duration::from_millis(STEP_PERIOD_MS), move || {
        step_engine.step(STEP_PERIOD_MS as f64);
    });

    let status_engine = Arc::clone(&engine);
    scheduler.spawn_periodic(Duration::from_millis(STATUS_PERIOD_MS), move || {
        let pose = status_engine.pose();
        let target = status_engine.target();
        println!(
            "pose: x={:.2}, y={:.2}, heading={:.3} | target: ({}, {})",
            pose.x, pose.y, pose.heading, target.x, target.y
        );
    });

    println!("Enter target coordinates as 'x y'; ctrl-d or ctrl-c to quit.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line? {
                    Some(line) => match parse_target(&line) {
                        Some((x, y)) => {
                            engine.set_target(x, y);
                            println!("New target: ({}, {})", x, y);
                        }
                        None => eprintln!("Could not parse target from '{}'", line.trim()),
                    },
                    None => break,
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    // Tear down the periodic activities before the components.
    scheduler.shutdown();

    match core.shutdown() {
        Ok(_) => println!("Core shutdown successfully!"),
        Err(e) => eprintln!("Failed to shutdown core: {}", e),
    }

    Ok(())
}
