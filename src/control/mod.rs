//! Control module for the pursuit robot
pub mod controllers;

pub use controllers::{ParamError, PursuitController};

use crate::common::{Pose, Target};
use crate::lifecycle::{LifecycleNode, LifecycleNodeBase, State};
use std::any::Any;
use std::collections::HashMap;

/// Velocity command for the robot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VelocityCommand {
    pub linear: f64,
    pub angular: f64,
}

/// Control stack for the robot
pub struct ControlStack {
    base: LifecycleNodeBase,
    controller: PursuitController,
}

impl ControlStack {
    /// Create a new control stack
    pub fn new() -> Self {
        ControlStack {
            base: LifecycleNodeBase::new("control_stack"),
            controller: PursuitController::new(),
        }
    }

    /// Compute a velocity command for the given pose and target
    pub fn compute_velocity(&self, pose: &Pose, target: Target) -> Option<VelocityCommand> {
        self.controller.compute_velocity(pose, target)
    }

    /// Configure the controller
    pub fn configure_controller(&mut self, params: &HashMap<String, f64>) -> Result<(), String> {
        self.controller.configure(params).map_err(|e| e.to_string())
    }

    /// The configured controller, for building an engine around it
    pub fn controller(&self) -> &PursuitController {
        &self.controller
    }
}

impl Default for ControlStack {
    fn default() -> Self {
        Self::new()
    }
}

impl LifecycleNode for ControlStack {
    fn on_configure(&mut self) -> Result<(), String> {
        println!("Configuring control stack");
        self.base.set_state(State::Inactive);
        Ok(())
    }

    fn on_activate(&mut self) -> Result<(), String> {
        println!("Activating control stack");
        self.base.set_state(State::Active);
        Ok(())
    }

    fn on_deactivate(&mut self) -> Result<(), String> {
        println!("Deactivating control stack");
        self.base.set_state(State::Inactive);
        Ok(())
    }

    fn on_cleanup(&mut self) -> Result<(), String> {
        println!("Cleaning up control stack");
        self.base.set_state(State::Unconfigured);
        Ok(())
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
