//! Motion engine: the kinematic model that chases the current target

use crate::common::{self, Pose, Target};
use crate::control::PursuitController;
use crate::lifecycle::{LifecycleNode, LifecycleNodeBase, State};
use std::any::Any;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::Arc;

/// Kinematic motion engine.
///
/// Owns the robot pose and the chase target and advances the pose one control
/// tick at a time with a bounded unicycle model. Pose fields are written only
/// by [`step`](MotionEngine::step); target fields only by
/// [`set_target`](MotionEngine::set_target). Every field is an individual
/// atomic cell, so the drawing side can read while a tick is in flight
/// without ever seeing a partially-written value. No cross-field transaction
/// is needed: a target that changes mid-step is simply corrected for on the
/// next tick.
pub struct MotionEngine {
    position_x: AtomicU64,
    position_y: AtomicU64,
    heading: AtomicU64,
    target_x: AtomicI64,
    target_y: AtomicI64,
    controller: PursuitController,
}

impl MotionEngine {
    /// Create an engine with the default controller bounds
    pub fn new() -> Self {
        Self::with_controller(PursuitController::new())
    }

    /// Create an engine driven by the given controller
    pub fn with_controller(controller: PursuitController) -> Self {
        MotionEngine {
            position_x: AtomicU64::new(100.0f64.to_bits()),
            position_y: AtomicU64::new(100.0f64.to_bits()),
            heading: AtomicU64::new(0.0f64.to_bits()),
            target_x: AtomicI64::new(150),
            target_y: AtomicI64::new(100),
            controller,
        }
    }

    /// Overwrite the chase target.
    ///
    /// Any pixel coordinate is accepted, including the robot's current
    /// position; nothing is recomputed until the next tick.
    pub fn set_target(&self, x: i32, y: i32) {
        self.target_x.store(x as i64, Ordering::Release);
        self.target_y.store(y as i64, Ordering::Release);
    }

    /// Current pose snapshot.
    ///
    /// Each field is read atomically; the snapshot as a whole may straddle a
    /// tick, which readers tolerate by contract. Heading is in radians for
    /// the caller's rotation transform.
    pub fn pose(&self) -> Pose {
        Pose {
            x: f64::from_bits(self.position_x.load(Ordering::Acquire)),
            y: f64::from_bits(self.position_y.load(Ordering::Acquire)),
            heading: f64::from_bits(self.heading.load(Ordering::Acquire)),
        }
    }

    /// Current chase target
    pub fn target(&self) -> Target {
        Target {
            x: self.target_x.load(Ordering::Acquire) as i32,
            y: self.target_y.load(Ordering::Acquire) as i32,
        }
    }

    /// Advance the pose by one control interval of `dt` milliseconds.
    ///
    /// `dt` must be positive and match the scheduler's real cadence; this is
    /// a documented precondition, not a checked one. Within the arrival
    /// distance of the target the pose is left untouched, heading included,
    /// until a target update moves the target away again.
    pub fn step(&self, dt: f64) {
        let pose = self.pose();
        let target = self.target();

        if let Some(cmd) = self.controller.compute_velocity(&pose, target) {
            self.move_robot(&pose, cmd.linear, cmd.angular, dt);
        }
    }

    /// Integrate one tick of motion and commit the resulting pose.
    fn move_robot(&self, pose: &Pose, velocity: f64, angular_velocity: f64, duration: f64) {
        let velocity =
            common::apply_limits(velocity, 0.0, self.controller.max_linear_velocity());
        let angular_velocity = common::apply_limits(
            angular_velocity,
            -self.controller.max_angular_velocity(),
            self.controller.max_angular_velocity(),
        );

        // Closed-form position on a constant-curvature arc. A zero angular
        // velocity makes the division non-finite; each axis independently
        // falls back to straight-line integration when that happens, so a
        // non-finite position is never committed.
        let mut new_x = pose.x
            + velocity / angular_velocity
                * ((pose.heading + angular_velocity * duration).sin() - pose.heading.sin());
        if !new_x.is_finite() {
            new_x = pose.x + velocity * duration * pose.heading.cos();
        }

        let mut new_y = pose.y
            - velocity / angular_velocity
                * ((pose.heading + angular_velocity * duration).cos() - pose.heading.cos());
        if !new_y.is_finite() {
            new_y = pose.y + velocity * duration * pose.heading.sin();
        }

        let new_heading =
            common::normalized_radians(pose.heading + angular_velocity * duration);

        self.position_x.store(new_x.to_bits(), Ordering::Release);
        self.position_y.store(new_y.to_bits(), Ordering::Release);
        self.heading.store(new_heading.to_bits(), Ordering::Release);
    }
}

impl Default for MotionEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Lifecycle component that owns the shared motion engine
pub struct MotionStack {
    base: LifecycleNodeBase,
    engine: Arc<MotionEngine>,
}

impl MotionStack {
    /// Create a motion stack around a fresh engine
    pub fn new() -> Self {
        Self::with_engine(Arc::new(MotionEngine::new()))
    }

    /// Create a motion stack around an existing shared engine
    pub fn with_engine(engine: Arc<MotionEngine>) -> Self {
        MotionStack {
            base: LifecycleNodeBase::new("motion_stack"),
            engine,
        }
    }

    /// Get a shared handle to the engine
    pub fn engine(&self) -> Arc<MotionEngine> {
        Arc::clone(&self.engine)
    }

    /// Configure the engine's controller with parameters.
    ///
    /// Only possible while the stack holds the sole handle to the engine;
    /// once [`engine`](MotionStack::engine) has handed out a clone the
    /// bounds are frozen, which keeps `step` free of parameter races.
    pub fn configure_controller(&mut self, params: &HashMap<String, f64>) -> Result<(), String> {
        match Arc::get_mut(&mut self.engine) {
            Some(engine) => engine.controller.configure(params).map_err(|e| e.to_string()),
            None => Err("engine is already shared; bounds are frozen".to_string()),
        }
    }
}

impl Default for MotionStack {
    fn default() -> Self {
        Self::new()
    }
}

impl LifecycleNode for MotionStack {
    fn on_configure(&mut self) -> Result<(), String> {
        println!("Configuring motion stack");
        self.base.set_state(State::Inactive);
        Ok(())
    }

    fn on_activate(&mut self) -> Result<(), String> {
        println!("Activating motion stack");
        self.base.set_state(State::Active);
        Ok(())
    }

    fn on_deactivate(&mut self) -> Result<(), String> {
        println!("Deactivating motion stack");
        self.base.set_state(State::Inactive);
        Ok(())
    }

    fn on_cleanup(&mut self) -> Result<(), String> {
        println!("Cleaning up motion stack");
        self.base.set_state(State::Unconfigured);
        Ok(())
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
