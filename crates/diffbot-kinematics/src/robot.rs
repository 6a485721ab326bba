//! The simulated robot: pose, voltage commands, goal bookkeeping and history.

use alloc::vec::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::boundary::Boundary;
use crate::error::KinematicsError;
use crate::history::{DEFAULT_HISTORY_LEN, HistorySample, MotionHistory};
use crate::motor::{MotorModel, VoltageCommand};
use crate::{ChassisSpeeds, DifferentialDrive, Point, Pose, WheelSpeeds};

/// Physical parameters of the robot.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RobotConfig {
    /// Wheel radius (m).
    pub wheel_radius: f64,
    /// Distance between the two drive wheels (m).
    pub axle_length: f64,
    /// Motor speed constant (RPM per volt).
    pub motor_kv: f64,
    /// Largest voltage magnitude a motor accepts (V).
    pub max_voltage: f64,
    /// World units per meter.
    pub units_per_meter: f64,
    /// Samples kept per history series.
    pub history_len: usize,
}

impl Default for RobotConfig {
    fn default() -> Self {
        RobotConfig {
            wheel_radius: 0.1,
            axle_length: 0.5,
            motor_kv: 150.0,
            max_voltage: 12.0,
            units_per_meter: 100.0,
            history_len: DEFAULT_HISTORY_LEN,
        }
    }
}

/// State of a voltage-driven differential-drive robot.
///
/// Positions are in world units, everything physical is metric. The state is
/// advanced with [`DifferentialDriveState::step`]; voltages and goals are
/// clamped when they are set, so no out-of-range value is ever stored.
#[derive(Debug, Clone)]
pub struct DifferentialDriveState {
    drive: DifferentialDrive,
    motor: MotorModel,
    max_voltage: f64,
    units_per_meter: f64,
    boundary: Boundary,

    pose: Pose,
    voltages: VoltageCommand,
    speeds: ChassisSpeeds,

    goal: Option<Point>,
    goal_reached: bool,
    trajectory: Vec<Point>,
    history: MotionHistory,
}

impl DifferentialDriveState {
    /// Build a robot at `pose` operating inside `boundary`.
    ///
    /// # Errors
    ///
    /// Returns a [`KinematicsError`] if a physical parameter in `config` is
    /// not usable (non-positive radius, axle length, voltage limit or scale).
    pub fn new(config: &RobotConfig, boundary: Boundary, pose: Pose) -> Result<Self, KinematicsError> {
        let drive = DifferentialDrive::new(config.wheel_radius, config.axle_length)?;
        let motor = MotorModel::new(config.motor_kv)?;
        if !(config.max_voltage > 0.0) {
            return Err(KinematicsError::InvalidVoltageLimit("must be positive"));
        }
        if !(config.units_per_meter > 0.0) || !config.units_per_meter.is_finite() {
            return Err(KinematicsError::InvalidScale("must be positive and finite"));
        }

        Ok(DifferentialDriveState {
            drive,
            motor,
            max_voltage: config.max_voltage,
            units_per_meter: config.units_per_meter,
            boundary,
            pose,
            voltages: VoltageCommand::zero(),
            speeds: ChassisSpeeds::default(),
            goal: None,
            goal_reached: false,
            trajectory: Vec::new(),
            history: MotionHistory::new(config.history_len),
        })
    }

    /// Advance the robot by `dt` seconds using the current voltages.
    ///
    /// Returns the chassis speeds used for the step.
    ///
    /// # Errors
    ///
    /// A negative or non-finite `dt` is rejected and the state is left untouched.
    pub fn step(&mut self, dt: f64) -> Result<ChassisSpeeds, KinematicsError> {
        let wheel_speeds = WheelSpeeds::new(
            self.motor.voltage_to_angular_velocity(self.voltages.left),
            self.motor.voltage_to_angular_velocity(self.voltages.right),
        );
        let speeds = self.drive.forward_kinematics(wheel_speeds);
        self.pose = self
            .drive
            .update_pose(self.pose, speeds, dt, self.units_per_meter)?;
        self.speeds = speeds;

        if !self.goal_reached {
            self.trajectory.push(self.pose.position());
        }

        self.history.record(HistorySample {
            linear_velocity: speeds.v,
            angular_velocity: speeds.omega,
            heading: self.pose.theta,
            left_voltage: self.voltages.left,
            right_voltage: self.voltages.right,
        });

        Ok(speeds)
    }

    /// Set both motor voltages, clamped to `[-max_voltage, max_voltage]`.
    ///
    /// Takes effect on the next [`step`](Self::step).
    pub fn set_voltages(&mut self, left: f64, right: f64) {
        self.voltages = VoltageCommand::clamped(left, right, self.max_voltage);
    }

    /// Make `point` (clamped into the boundary) the active goal.
    ///
    /// Clears the trajectory and the reached flag.
    pub fn set_goal(&mut self, point: Point) {
        self.trajectory.clear();
        self.goal_reached = false;
        self.goal = Some(self.boundary.clamp(point));
    }

    /// Drop the active goal. The reached flag and the trajectory are kept.
    pub fn clear_goal(&mut self) {
        self.goal = None;
    }

    /// Flag the active goal as reached. The trajectory stops growing.
    pub fn mark_goal_reached(&mut self) {
        self.goal_reached = true;
    }

    /// Overwrite the heading (rad).
    pub fn set_heading(&mut self, theta: f64) {
        self.pose.theta = theta;
    }

    /// Current pose in world units.
    pub fn pose(&self) -> Pose {
        self.pose
    }

    /// Mutable access to the pose, used to apply an external position clamp.
    pub fn pose_mut(&mut self) -> &mut Pose {
        &mut self.pose
    }

    /// Current pose with the position converted to meters.
    pub fn pose_in_meters(&self) -> Pose {
        Pose::new(
            self.pose.x / self.units_per_meter,
            self.pose.y / self.units_per_meter,
            self.pose.theta,
        )
    }

    /// Active goal converted to meters.
    pub fn goal_in_meters(&self) -> Option<Point> {
        self.goal
            .map(|g| Point::new(g.x / self.units_per_meter, g.y / self.units_per_meter))
    }

    /// The stored (clamped) voltage command.
    pub fn voltages(&self) -> VoltageCommand {
        self.voltages
    }

    /// Linear velocity (m/s) of the last step.
    pub fn linear_velocity(&self) -> f64 {
        self.speeds.v
    }

    /// Angular velocity (rad/s) of the last step.
    pub fn angular_velocity(&self) -> f64 {
        self.speeds.omega
    }

    /// Active goal in world units.
    pub fn goal(&self) -> Option<Point> {
        self.goal
    }

    /// Whether the active goal has been reached.
    pub fn goal_reached(&self) -> bool {
        self.goal_reached
    }

    /// Positions visited since the last goal was set.
    pub fn trajectory(&self) -> &[Point] {
        &self.trajectory
    }

    /// Rolling history of the motion variables.
    pub fn history(&self) -> &MotionHistory {
        &self.history
    }

    /// World units per meter.
    pub fn units_per_meter(&self) -> f64 {
        self.units_per_meter
    }

    /// Voltage limit (V).
    pub fn max_voltage(&self) -> f64 {
        self.max_voltage
    }

    /// Operating area.
    pub fn boundary(&self) -> Boundary {
        self.boundary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::Signal;
    use core::f64::consts::PI;
    use rand::{Rng, SeedableRng, rngs::StdRng};

    const EPSILON: f64 = 1e-9;

    fn robot_at(pose: Pose) -> DifferentialDriveState {
        DifferentialDriveState::new(&RobotConfig::default(), Boundary::default(), pose).unwrap()
    }

    #[test]
    fn zero_voltage_leaves_pose_unchanged() {
        let start = Pose::new(120.0, 340.0, 1.3);
        let mut robot = robot_at(start);
        for dt in [0.0, 0.016, 1.0, 250.0] {
            robot.step(dt).unwrap();
            assert_eq!(robot.pose(), start);
        }
        assert_eq!(robot.linear_velocity(), 0.0);
    }

    #[test]
    fn equal_voltages_drive_straight() {
        let mut robot = robot_at(Pose::new(100.0, 100.0, 0.0));
        robot.set_voltages(1.0, 1.0);
        let speeds = robot.step(0.1).unwrap();

        // 150 RPM = 5π rad/s, times 0.1 m is π/2 m/s.
        let v = PI / 2.0;
        assert!((speeds.v - v).abs() < EPSILON);
        assert!(speeds.omega.abs() < EPSILON);
        assert!((robot.pose().x - (100.0 + v * 0.1 * 100.0)).abs() < EPSILON);
        assert!((robot.pose().y - 100.0).abs() < EPSILON);
        assert!((robot.linear_velocity() - v).abs() < EPSILON);
    }

    #[test]
    fn opposite_voltages_turn_in_place() {
        let mut robot = robot_at(Pose::new(300.0, 300.0, 0.0));
        robot.set_voltages(-1.0, 1.0);
        let speeds = robot.step(0.1).unwrap();

        // v_r - v_l = π m/s over a 0.5 m axle.
        assert!(speeds.v.abs() < EPSILON);
        assert!((speeds.omega - 2.0 * PI).abs() < EPSILON);
        assert!((robot.pose().x - 300.0).abs() < EPSILON);
        assert!((robot.pose().theta - 0.2 * PI).abs() < EPSILON);
    }

    #[test]
    fn set_voltages_always_clamps() {
        let mut robot = robot_at(Pose::default());
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..500 {
            robot.set_voltages(rng.random_range(-100.0..100.0), rng.random_range(-100.0..100.0));
            let cmd = robot.voltages();
            assert!((-12.0..=12.0).contains(&cmd.left));
            assert!((-12.0..=12.0).contains(&cmd.right));
        }
        robot.set_voltages(30.0, -30.0);
        assert_eq!(robot.voltages(), VoltageCommand::new(12.0, -12.0));
    }

    #[test]
    fn set_voltages_has_no_motion_side_effect() {
        let mut robot = robot_at(Pose::new(200.0, 200.0, 0.0));
        robot.set_voltages(12.0, 12.0);
        assert_eq!(robot.pose(), Pose::new(200.0, 200.0, 0.0));
        assert!(robot.history().is_empty());
    }

    #[test]
    fn set_goal_clamps_and_resets_trajectory() {
        let mut robot = robot_at(Pose::new(200.0, 200.0, 0.0));
        robot.set_voltages(2.0, 2.0);
        robot.step(0.1).unwrap();
        robot.mark_goal_reached();
        assert_eq!(robot.trajectory().len(), 1);

        robot.set_goal(Point::new(900.0, -20.0));
        assert_eq!(robot.goal(), Some(Point::new(650.0, 50.0)));
        assert!(!robot.goal_reached());
        assert!(robot.trajectory().is_empty());
    }

    #[test]
    fn trajectory_only_grows_until_reached() {
        let mut robot = robot_at(Pose::new(200.0, 200.0, 0.0));
        robot.set_goal(Point::new(400.0, 200.0));
        robot.set_voltages(2.0, 2.0);
        robot.step(0.01).unwrap();
        robot.step(0.01).unwrap();
        assert_eq!(robot.trajectory().len(), 2);
        assert_eq!(robot.trajectory()[1], robot.pose().position());

        robot.mark_goal_reached();
        robot.step(0.01).unwrap();
        assert_eq!(robot.trajectory().len(), 2);
        assert_eq!(robot.history().len(), 3);
    }

    #[test]
    fn history_is_bounded_to_the_most_recent_samples() {
        let mut robot = robot_at(Pose::default());
        for i in 0..1000 {
            // Voltage encodes the step index so ordering can be checked.
            robot.set_voltages(i as f64 * 0.01, 0.0);
            robot.step(0.001).unwrap();
        }
        for signal in Signal::ALL {
            assert_eq!(robot.history().series(signal).len(), 200);
        }
        let left: Vec<f64> = robot.history().series(Signal::LeftVoltage).iter().collect();
        let expected: Vec<f64> = (800..1000).map(|i| (i as f64 * 0.01).min(12.0)).collect();
        assert_eq!(left, expected);
    }

    #[test]
    fn negative_dt_is_rejected_without_side_effects() {
        let mut robot = robot_at(Pose::new(200.0, 200.0, 0.0));
        robot.set_voltages(5.0, 5.0);
        let result = robot.step(-0.1);
        assert!(matches!(result, Err(KinematicsError::NegativeTimeDelta(_))));
        assert_eq!(robot.pose(), Pose::new(200.0, 200.0, 0.0));
        assert!(robot.history().is_empty());
        assert!(robot.trajectory().is_empty());
    }

    #[test]
    fn unit_conversion_helpers() {
        let mut robot = robot_at(Pose::new(250.0, 150.0, 0.5));
        robot.set_goal(Point::new(350.0, 450.0));
        assert_eq!(robot.pose_in_meters(), Pose::new(2.5, 1.5, 0.5));
        assert_eq!(robot.goal_in_meters(), Some(Point::new(3.5, 4.5)));
    }

    #[test]
    fn rejects_unusable_configuration() {
        let config = RobotConfig {
            max_voltage: 0.0,
            ..RobotConfig::default()
        };
        assert!(matches!(
            DifferentialDriveState::new(&config, Boundary::default(), Pose::default()),
            Err(KinematicsError::InvalidVoltageLimit(_))
        ));

        let config = RobotConfig {
            axle_length: -1.0,
            ..RobotConfig::default()
        };
        assert!(matches!(
            DifferentialDriveState::new(&config, Boundary::default(), Pose::default()),
            Err(KinematicsError::InvalidAxleLength(_))
        ));
    }
}
