use pursuit_core::control::ControlStack;
use pursuit_core::motion::MotionStack;
use pursuit_core::PursuitCore;
use std::collections::HashMap;

fn main() {
    println!("Initializing Pursuit Core...");

    let mut core = PursuitCore::new();

    // Explicit bounds for both stacks
    let mut params = HashMap::new();
    params.insert("max_linear_velocity".to_string(), 0.1);
    params.insert("max_angular_velocity".to_string(), 0.001);

    let mut motion_stack = MotionStack::new();
    if let Err(e) = motion_stack.configure_controller(&params) {
        println!("Failed to configure motion stack: {}", e);
    }
    let engine = motion_stack.engine();

    let mut control_stack = ControlStack::new();
    if let Err(e) = control_stack.configure_controller(&params) {
        println!("Failed to configure control stack: {}", e);
    }

    // Register components
    core.register(motion_stack);
    core.register(control_stack);

    // Initialize the core
    match core.init() {
        Ok(_) => println!("Core initialized successfully!"),
        Err(e) => {
            println!("Failed to initialize core: {}", e);
            return;
        }
    }

    // Chase the default target for a while
    println!("Chasing target {:?}", engine.target());
    for tick in 0..200 {
        engine.step(10.0);
        if tick % 50 == 0 {
            let pose = engine.pose();
            println!(
                "tick {}: x={:.2}, y={:.2}, heading={:.3}",
                tick, pose.x, pose.y, pose.heading
            );
        }
    }

    // Retarget and keep chasing
    engine.set_target(300, 250);
    println!("Chasing target {:?}", engine.target());
    for tick in 0..200 {
        engine.step(10.0);
        if tick % 50 == 0 {
            let pose = engine.pose();
            println!(
                "tick {}: x={:.2}, y={:.2}, heading={:.3}",
                tick, pose.x, pose.y, pose.heading
            );
        }
    }

    // Shutdown the core
    match core.shutdown() {
        Ok(_) => println!("Core shutdown successfully!"),
        Err(e) => println!("Failed to shutdown core: {}", e),
    }
}
