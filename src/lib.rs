pub mod common;
pub mod control;
pub mod lifecycle;
pub mod motion;
pub mod scheduler;

use crate::lifecycle::LifecycleNode;
use crate::motion::MotionStack;

/// Core functionality for the pursuit robot
pub struct PursuitCore {
    components: Vec<Box<dyn LifecycleNode>>,
}

impl PursuitCore {
    /// Create a new instance of PursuitCore
    pub fn new() -> Self {
        PursuitCore {
            components: Vec::new(),
        }
    }

    /// Register a component with the core
    pub fn register<T: LifecycleNode + 'static>(&mut self, component: T) {
        self.components.push(Box::new(component));
    }

    /// Initialize all registered components
    pub fn init(&mut self) -> Result<(), String> {
        for component in &mut self.components {
            component.on_configure()?;
            component.on_activate()?;
        }
        Ok(())
    }

    /// Shutdown all registered components
    pub fn shutdown(&mut self) -> Result<(), String> {
        for component in &mut self.components {
            component.on_deactivate()?;
            component.on_cleanup()?;
        }
        Ok(())
    }

    /// Get a reference to the motion stack
    pub fn motion_stack_mut(&mut self) -> Option<&mut MotionStack> {
        self.components
            .iter_mut()
            .find_map(|component| component.as_any_mut().downcast_mut::<MotionStack>())
    }
}

impl Default for PursuitCore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registered_motion_stack_is_retrievable() {
        let mut core = PursuitCore::new();
        core.register(MotionStack::new());
        core.register(crate::control::ControlStack::new());
        core.init().unwrap();

        let stack = core.motion_stack_mut().expect("motion stack registered");
        stack.engine().set_target(20, 30);
        assert_eq!(stack.engine().target(), crate::common::Target::new(20, 30));

        core.shutdown().unwrap();
    }

    #[test]
    fn empty_core_initializes_and_shuts_down() {
        let mut core = PursuitCore::new();
        assert!(core.init().is_ok());
        assert!(core.shutdown().is_ok());
        assert!(core.motion_stack_mut().is_none());
    }
}
