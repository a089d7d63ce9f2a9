//! Controllers for the robot

use crate::common::{self, Pose, Target};
use crate::control::VelocityCommand;
use nalgebra::distance;
use std::collections::HashMap;
use thiserror::Error;

/// Error raised when a controller parameter map fails validation.
#[derive(Debug, Error)]
pub enum ParamError {
    #[error("{0} must be positive")]
    NonPositive(&'static str),
}

/// Bang-bang pursuit controller.
///
/// Commands full linear velocity whenever the robot has not arrived, and full
/// positive or negative angular velocity depending on whether the bearing to
/// the target is numerically above or below the current heading. Both angles
/// are normalized to `[0, 2π)` and compared directly, with no wrap-around
/// handling: a target bearing that is angularly closer across the 0/2π seam
/// still produces a turn in the numerically-increasing direction rather than
/// along the shortest arc.
#[derive(Debug, Clone)]
pub struct PursuitController {
    // Velocity bounds, in distance and radians per millisecond
    max_linear_velocity: f64,
    max_angular_velocity: f64,
    // Distance below which the robot counts as arrived
    arrival_distance: f64,
}

impl PursuitController {
    /// Create a new controller with the default bounds
    pub fn new() -> Self {
        PursuitController {
            max_linear_velocity: 0.1,
            max_angular_velocity: 0.001,
            arrival_distance: 0.5,
        }
    }

    /// Compute a velocity command for the current pose and target.
    ///
    /// Returns `None` once the robot is within the arrival distance of the
    /// target; the caller must leave the pose untouched in that case. This is
    /// not a terminal state: a later target update reactivates the controller
    /// on the next tick.
    pub fn compute_velocity(&self, pose: &Pose, target: Target) -> Option<VelocityCommand> {
        if distance(&pose.point(), &target.point()) < self.arrival_distance {
            return None;
        }

        let angle_to_target = common::normalized_radians(
            (target.y as f64 - pose.y).atan2(target.x as f64 - pose.x),
        );

        let mut angular_velocity = 0.0;
        if angle_to_target > pose.heading {
            angular_velocity = self.max_angular_velocity;
        }
        if angle_to_target < pose.heading {
            angular_velocity = -self.max_angular_velocity;
        }

        Some(VelocityCommand {
            linear: self.max_linear_velocity,
            angular: angular_velocity,
        })
    }

    /// Upper bound on commanded linear velocity
    pub fn max_linear_velocity(&self) -> f64 {
        self.max_linear_velocity
    }

    /// Bound on commanded angular velocity magnitude
    pub fn max_angular_velocity(&self) -> f64 {
        self.max_angular_velocity
    }

    /// Configure the controller with parameters
    pub fn configure(&mut self, params: &HashMap<String, f64>) -> Result<(), ParamError> {
        if let Some(&max_linear) = params.get("max_linear_velocity") {
            if max_linear <= 0.0 {
                return Err(ParamError::NonPositive("max_linear_velocity"));
            }
            self.max_linear_velocity = max_linear;
        }

        if let Some(&max_angular) = params.get("max_angular_velocity") {
            if max_angular <= 0.0 {
                return Err(ParamError::NonPositive("max_angular_velocity"));
            }
            self.max_angular_velocity = max_angular;
        }

        if let Some(&arrival) = params.get("arrival_distance") {
            if arrival <= 0.0 {
                return Err(ParamError::NonPositive("arrival_distance"));
            }
            self.arrival_distance = arrival;
        }

        Ok(())
    }
}

impl Default for PursuitController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn no_command_within_arrival_distance() {
        let controller = PursuitController::new();
        let pose = Pose::new(150.0, 100.0, 1.0);
        assert!(controller.compute_velocity(&pose, Target::new(150, 100)).is_none());

        // Just under the threshold still counts as arrived
        let pose = Pose::new(150.3, 100.0, 1.0);
        assert!(controller.compute_velocity(&pose, Target::new(150, 100)).is_none());
    }

    #[test]
    fn facing_target_commands_zero_turn() {
        let controller = PursuitController::new();
        let pose = Pose::new(100.0, 100.0, 0.0);
        let cmd = controller
            .compute_velocity(&pose, Target::new(150, 100))
            .unwrap();
        assert_eq!(cmd.linear, 0.1);
        assert_eq!(cmd.angular, 0.0);
    }

    #[test]
    fn target_behind_turns_in_increasing_direction() {
        // Bearing is π and heading is 0; π > 0 selects the positive extreme
        // even though both arcs are the same length.
        let controller = PursuitController::new();
        let pose = Pose::new(100.0, 100.0, 0.0);
        let cmd = controller
            .compute_velocity(&pose, Target::new(50, 100))
            .unwrap();
        assert_eq!(cmd.angular, 0.001);
    }

    #[test]
    fn wraparound_target_turns_the_long_way() {
        // Heading 0.1, bearing just under 2π: the short arc crosses the seam,
        // but the numeric comparison still commands a positive turn.
        let controller = PursuitController::new();
        let pose = Pose::new(0.0, 0.0, 0.1);
        let cmd = controller
            .compute_velocity(&pose, Target::new(1000, -50))
            .unwrap();
        let bearing = common::normalized_radians((-50.0f64).atan2(1000.0));
        assert!(bearing > 2.0 * PI - 0.1);
        assert_eq!(cmd.angular, 0.001);
    }

    #[test]
    fn commands_stay_within_configured_bounds() {
        let mut controller = PursuitController::new();
        let mut params = HashMap::new();
        params.insert("max_linear_velocity".to_string(), 0.25);
        params.insert("max_angular_velocity".to_string(), 0.004);
        controller.configure(&params).unwrap();

        let pose = Pose::new(0.0, 0.0, 3.0);
        for (tx, ty) in [(10, 0), (-10, 10), (0, -10), (7, 7)] {
            let cmd = controller
                .compute_velocity(&pose, Target::new(tx, ty))
                .unwrap();
            assert!(cmd.linear >= 0.0 && cmd.linear <= 0.25);
            assert!(cmd.angular.abs() <= 0.004);
        }
    }

    #[test]
    fn configure_rejects_non_positive_parameters() {
        let mut controller = PursuitController::new();
        let mut params = HashMap::new();
        params.insert("max_linear_velocity".to_string(), 0.0);
        let err = controller.configure(&params).unwrap_err();
        assert_eq!(err.to_string(), "max_linear_velocity must be positive");

        let mut params = HashMap::new();
        params.insert("arrival_distance".to_string(), -1.0);
        assert!(controller.configure(&params).is_err());
    }
}
