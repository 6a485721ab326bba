//! Proportional goal-seeking controller for a voltage-driven differential drive.
//!
//! The controller is a pure function of the pose and the goal. Its output is a
//! raw voltage pair which is *not* limited here: the limit is applied by
//! [`DifferentialDriveState::set_voltages`], and [`seek_goal`] is the only
//! place the two stages are joined.

use diffbot_kinematics::{DifferentialDriveState, Point, Pose, VoltageCommand, normalize_angle};
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::NavigationError;

/// Gains and limits of the goal-seeking law.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoalSeekConfig {
    /// Gain on the distance to the goal (V per m).
    pub kp_distance: f64,
    /// Gain on the heading error (V per rad).
    pub kp_angle: f64,
    /// Limit on the distance term.
    pub max_speed: f64,
    /// Distance (m) under which the goal counts as reached.
    pub stop_threshold: f64,
}

impl Default for GoalSeekConfig {
    fn default() -> Self {
        GoalSeekConfig {
            kp_distance: 4.0,
            kp_angle: 6.0,
            max_speed: 3.0,
            stop_threshold: 0.05,
        }
    }
}

/// Where the controller is in its two-state life cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekStatus {
    /// Still driving toward the goal.
    Seeking,
    /// Within the stop threshold. Terminal until a new goal is set.
    Reached,
}

/// Result of one controller evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeekOutput {
    /// Raw (unclamped) voltages.
    pub command: VoltageCommand,
    /// State after this evaluation.
    pub status: SeekStatus,
    /// Distance to the goal (m).
    pub distance: f64,
    /// Wrapped heading error (rad), zero once reached.
    pub heading_error: f64,
}

/// Proportional controller on distance and heading error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoalSeekController {
    config: GoalSeekConfig,
}

impl GoalSeekController {
    /// Build a controller.
    ///
    /// # Errors
    ///
    /// Returns [`NavigationError`] when the stop threshold is not positive, the
    /// speed limit is negative, or a gain is not finite.
    pub fn new(config: GoalSeekConfig) -> Result<Self, NavigationError> {
        if !(config.stop_threshold > 0.0) || !config.stop_threshold.is_finite() {
            return Err(NavigationError::InvalidStopThreshold("must be positive and finite"));
        }
        if !(config.max_speed >= 0.0) {
            return Err(NavigationError::InvalidSpeedLimit("must be non-negative"));
        }
        if !config.kp_distance.is_finite() || !config.kp_angle.is_finite() {
            return Err(NavigationError::InvalidGain("must be finite"));
        }
        Ok(GoalSeekController { config })
    }

    /// The active configuration.
    pub fn config(&self) -> &GoalSeekConfig {
        &self.config
    }

    /// Compute raw voltages driving `pose` toward `goal`, both in meters.
    ///
    /// Emits zero voltages and [`SeekStatus::Reached`] once the goal is closer
    /// than the stop threshold. Positive heading error turns the robot by
    /// speeding up the right wheel.
    pub fn compute(&self, pose: &Pose, goal: &Point) -> SeekOutput {
        let dx = goal.x - pose.x;
        let dy = goal.y - pose.y;
        let distance = dx.hypot(dy);

        if distance < self.config.stop_threshold {
            return SeekOutput {
                command: VoltageCommand::zero(),
                status: SeekStatus::Reached,
                distance,
                heading_error: 0.0,
            };
        }

        let desired_heading = dy.atan2(dx);
        let heading_error = heading_error(pose.theta, desired_heading);

        let base_speed = (self.config.kp_distance * distance)
            .clamp(-self.config.max_speed, self.config.max_speed);
        let angular_correction = self.config.kp_angle * heading_error;

        SeekOutput {
            command: VoltageCommand::new(
                base_speed - angular_correction,
                base_speed + angular_correction,
            ),
            status: SeekStatus::Seeking,
            distance,
            heading_error,
        }
    }
}

/// Shortest signed rotation (rad) from `heading` to `desired`, in `[-PI, PI)`.
///
/// `heading` may be any accumulated angle.
pub fn heading_error(heading: f64, desired: f64) -> f64 {
    normalize_angle(desired - heading)
}

/// Run one controller tick against `state`.
///
/// Converts the pose and goal to meters, computes the raw command, hands it to
/// the state's clamping setter, and flags the goal as reached on the terminal
/// transition. Returns `None` when there is no goal or it was already reached.
pub fn seek_goal(
    state: &mut DifferentialDriveState,
    controller: &GoalSeekController,
) -> Option<SeekOutput> {
    if state.goal_reached() {
        return None;
    }
    let goal = state.goal_in_meters()?;
    let pose = state.pose_in_meters();

    let output = controller.compute(&pose, &goal);
    state.set_voltages(output.command.left, output.command.right);
    if output.status == SeekStatus::Reached {
        state.mark_goal_reached();
    }

    debug!(
        distance = output.distance,
        heading_error = output.heading_error,
        raw = %output.command,
        applied = %state.voltages(),
        status = ?output.status,
        "Goal seek tick"
    );
    Some(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use diffbot_kinematics::{Boundary, RobotConfig};
    use rand::{Rng, SeedableRng, rngs::StdRng};
    use std::f64::consts::{FRAC_PI_2, PI};

    const EPSILON: f64 = 1e-9;

    fn controller() -> GoalSeekController {
        GoalSeekController::new(GoalSeekConfig::default()).unwrap()
    }

    #[test]
    fn stops_inside_threshold_on_first_call() {
        let out = controller().compute(&Pose::new(0.0, 0.0, 0.0), &Point::new(0.04, 0.0));
        assert_eq!(out.status, SeekStatus::Reached);
        assert_eq!(out.command, VoltageCommand::zero());
    }

    #[test]
    fn straight_ahead_gives_equal_forward_commands() {
        let out = controller().compute(&Pose::new(0.0, 0.0, 0.0), &Point::new(1.0, 0.0));
        assert_eq!(out.status, SeekStatus::Seeking);
        assert!(out.heading_error.abs() < EPSILON);
        assert!((out.command.left - out.command.right).abs() < EPSILON);
        assert!(out.command.left > 0.0);
        // kp_distance * 1 m = 4, limited to 3.
        assert!((out.command.left - 3.0).abs() < EPSILON);
    }

    #[test]
    fn slow_down_near_goal() {
        let out = controller().compute(&Pose::new(0.0, 0.0, 0.0), &Point::new(0.5, 0.0));
        assert!((out.command.left - 2.0).abs() < EPSILON);
        assert!((out.command.right - 2.0).abs() < EPSILON);
    }

    #[test]
    fn goal_to_the_side_turns_in_place() {
        let out = controller().compute(&Pose::new(0.0, 0.0, 0.0), &Point::new(0.0, 1.0));
        assert!((out.heading_error - FRAC_PI_2).abs() < EPSILON);
        let correction = 6.0 * FRAC_PI_2;
        assert!(3.0 < correction);
        assert!(out.command.left < 0.0);
        assert!(out.command.right > 0.0);
        assert!((out.command.right - (3.0 + correction)).abs() < EPSILON);
        assert!((out.command.left - (3.0 - correction)).abs() < EPSILON);
    }

    #[test]
    fn heading_error_takes_the_short_way_across_pi() {
        let heading = 179.0f64.to_radians();
        let desired = (-179.0f64).to_radians();
        let goal = Point::new(desired.cos(), desired.sin());

        let out = controller().compute(&Pose::new(0.0, 0.0, heading), &goal);
        assert!((out.heading_error - 2.0f64.to_radians()).abs() < 1e-6);
        assert!(out.command.right > out.command.left);
    }

    #[test]
    fn heading_error_ignores_accumulated_turns() {
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..1000 {
            let heading = rng.random_range(-50.0..50.0);
            let desired = rng.random_range(-PI..PI);
            let err = heading_error(heading, desired);
            assert!((-PI..PI).contains(&err));
            let turns = (desired - heading - err) / (2.0 * PI);
            assert!((turns - turns.round()).abs() < 1e-6);
        }
    }

    #[test]
    fn output_is_not_pre_clamped() {
        let out = controller().compute(&Pose::new(0.0, 0.0, 0.0), &Point::new(-1.0, 0.01));
        assert!(out.command.right > 12.0);
    }

    #[test]
    fn rejects_bad_parameters() {
        let config = GoalSeekConfig {
            stop_threshold: 0.0,
            ..GoalSeekConfig::default()
        };
        assert!(matches!(
            GoalSeekController::new(config),
            Err(NavigationError::InvalidStopThreshold(_))
        ));
        let config = GoalSeekConfig {
            max_speed: -1.0,
            ..GoalSeekConfig::default()
        };
        assert!(matches!(
            GoalSeekController::new(config),
            Err(NavigationError::InvalidSpeedLimit(_))
        ));
        let config = GoalSeekConfig {
            kp_angle: f64::NAN,
            ..GoalSeekConfig::default()
        };
        assert!(matches!(
            GoalSeekController::new(config),
            Err(NavigationError::InvalidGain(_))
        ));
    }

    #[test]
    fn seek_goal_applies_clamped_command() {
        let mut state = DifferentialDriveState::new(
            &RobotConfig::default(),
            Boundary::default(),
            Pose::new(300.0, 300.0, 0.0),
        )
        .unwrap();
        assert!(seek_goal(&mut state, &controller()).is_none());

        state.set_goal(Point::new(100.0, 301.0));
        let out = seek_goal(&mut state, &controller()).unwrap();
        assert_eq!(out.status, SeekStatus::Seeking);
        assert!(out.command.right > 12.0);
        assert_eq!(state.voltages().right, 12.0);
        assert_eq!(state.voltages().left, -12.0);
    }

    #[test]
    fn seek_goal_marks_reached_and_then_idles() {
        let mut state = DifferentialDriveState::new(
            &RobotConfig::default(),
            Boundary::default(),
            Pose::new(300.0, 300.0, 0.0),
        )
        .unwrap();
        state.set_voltages(5.0, 5.0);
        state.set_goal(Point::new(303.0, 300.0));

        let out = seek_goal(&mut state, &controller()).unwrap();
        assert_eq!(out.status, SeekStatus::Reached);
        assert!(state.goal_reached());
        assert_eq!(state.voltages(), VoltageCommand::zero());
        assert!(seek_goal(&mut state, &controller()).is_none());
    }

    #[test]
    fn closed_loop_reaches_goal() {
        let mut state = DifferentialDriveState::new(
            &RobotConfig::default(),
            Boundary::default(),
            Pose::new(350.0, 300.0, 0.0),
        )
        .unwrap();
        state.set_goal(Point::new(200.0, 450.0));
        let controller = controller();

        let dt = 1.0 / 60.0;
        let mut reached = false;
        for _ in 0..60 * 30 {
            if let Some(out) = seek_goal(&mut state, &controller) {
                if out.status == SeekStatus::Reached {
                    reached = true;
                    break;
                }
            }
            state.step(dt).unwrap();
        }
        assert!(reached);
        let pose = state.pose_in_meters();
        assert!((pose.x - 2.0).hypot(pose.y - 4.5) < 0.05);
    }
}
