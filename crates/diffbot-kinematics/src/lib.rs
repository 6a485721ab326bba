#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![doc = "A `no_std` library for simulating a voltage-driven differential-drive robot."]
#![doc = ""]
#![doc = "This crate provides the motor model, forward kinematics, forward-Euler pose"]
#![doc = "integration and the simulated robot state with its bounded motion history."]

extern crate alloc;

use core::f64::consts::PI;
use core::fmt;
use libm::{cos, fmod, sin};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub mod boundary;
pub mod error;
pub mod history;
pub mod motor;
pub mod robot;

pub use boundary::Boundary;
pub use error::KinematicsError;
pub use history::{HistorySample, MotionHistory, RollingSeries, Signal};
pub use motor::{MotorModel, VoltageCommand};
pub use robot::{DifferentialDriveState, RobotConfig};

/// A 2‑D pose `(x, y, θ)` in world units and radians.
///
/// The heading is never wrapped when stored; it accumulates freely and is only
/// normalized where an angular error is computed (see [`normalize_angle`]).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pose {
    /// World‑frame x position.
    pub x: f64,
    /// World‑frame y position.
    pub y: f64,
    /// Heading (rad), unbounded.
    pub theta: f64,
}

impl Pose {
    /// Construct a new pose.
    ///
    /// # Arguments
    ///
    /// * `x`: World-frame x position.
    /// * `y`: World-frame y position.
    /// * `theta`: Heading in radians.
    pub const fn new(x: f64, y: f64, theta: f64) -> Self {
        Pose { x, y, theta }
    }

    /// The position part of the pose.
    pub const fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

impl fmt::Display for Pose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(x: {:.2}, y: {:.2}, θ: {:.2} rad)", self.x, self.y, self.theta)
    }
}

/// Normalize an angle to be within `[-PI, PI)`.
///
/// Computed as `(angle + PI) mod 2PI - PI` with a floored modulo, so the result
/// is continuous across the `±PI` line and `PI` itself maps to `-PI`.
///
/// # Arguments
///
/// * `angle`: The angle in radians to normalize.
///
/// # Returns
///
/// The normalized angle in radians.
pub fn normalize_angle(angle: f64) -> f64 {
    let shifted = fmod(angle + PI, 2.0 * PI);
    if shifted < 0.0 {
        shifted + PI
    } else {
        shifted - PI
    }
}

/// A point in world units. Used for goals and trajectory samples.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// World‑frame x coordinate.
    pub x: f64,
    /// World‑frame y coordinate.
    pub y: f64,
}

impl Point {
    /// Construct a new point.
    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    /// Returns this point with both coordinates multiplied by `factor`.
    pub fn scaled(self, factor: f64) -> Self {
        Point::new(self.x * factor, self.y * factor)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

/// Left and right wheel angular velocities.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WheelSpeeds {
    /// Left wheel angular velocity (rad/s).
    pub omega_l: f64,
    /// Right wheel angular velocity (rad/s).
    pub omega_r: f64,
}

impl WheelSpeeds {
    /// Construct wheel speeds.
    ///
    /// # Arguments
    ///
    /// * `omega_l`: Left wheel angular velocity (rad/s).
    /// * `omega_r`: Right wheel angular velocity (rad/s).
    pub const fn new(omega_l: f64, omega_r: f64) -> Self {
        WheelSpeeds { omega_l, omega_r }
    }
}

impl fmt::Display for WheelSpeeds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(ωL: {:.2} rad/s, ωR: {:.2} rad/s)", self.omega_l, self.omega_r)
    }
}

/// Linear and angular chassis velocities.
/// These represent the overall motion of the robot's chassis.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ChassisSpeeds {
    /// Linear speed of the chassis center (m/s).
    pub v: f64,
    /// Angular speed of the chassis (rad/s).
    pub omega: f64,
}

impl ChassisSpeeds {
    /// Construct chassis speeds.
    ///
    /// # Arguments
    ///
    /// * `v`: Linear speed of the chassis center (m/s).
    /// * `omega`: Angular speed of the chassis (rad/s).
    pub const fn new(v: f64, omega: f64) -> Self {
        ChassisSpeeds { v, omega }
    }
}

impl fmt::Display for ChassisSpeeds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(v: {:.2} m/s, ω: {:.2} rad/s)", self.v, self.omega)
    }
}

/// Differential‑drive kinematics helper.
///
/// This struct encapsulates the physical parameters of a differential-drive robot
/// (wheel radius and axle length) and provides methods for kinematic calculations.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifferentialDrive {
    /// Wheel radius (m).
    wheel_radius: f64,
    /// Axle length (m).
    axle_length: f64,
}

impl DifferentialDrive {
    /// Construct a new differential‑drive kinematics helper.
    ///
    /// # Arguments
    ///
    /// * `wheel_radius`: The radius of the robot's wheels in meters.
    /// * `axle_length`: The distance between the centers of the two drive wheels in meters.
    ///
    /// # Errors
    ///
    /// Returns `Err(KinematicsError::InvalidWheelRadius)` if `wheel_radius` is not positive.
    /// Returns `Err(KinematicsError::InvalidAxleLength)` if `axle_length` is not positive.
    pub const fn new(wheel_radius: f64, axle_length: f64) -> Result<Self, KinematicsError> {
        // `!(x > 0.0)` also catches NaN.
        if !(wheel_radius > 0.0) {
            return Err(KinematicsError::InvalidWheelRadius("must be positive"));
        }
        if !(axle_length > 0.0) {
            return Err(KinematicsError::InvalidAxleLength("must be positive"));
        }
        Ok(DifferentialDrive {
            wheel_radius,
            axle_length,
        })
    }

    /// Returns the wheel radius.
    pub fn wheel_radius(&self) -> f64 {
        self.wheel_radius
    }

    /// Returns the axle length.
    pub fn axle_length(&self) -> f64 {
        self.axle_length
    }

    /// Calculates the robot's chassis speeds (linear and angular velocity)
    /// from the wheel speeds. This is the forward kinematics problem.
    ///
    /// # Arguments
    ///
    /// * `wheel_speeds`: The commanded angular velocities of the left and right wheels.
    ///
    /// # Returns
    ///
    /// The resulting linear and angular velocities of the robot chassis.
    pub fn forward_kinematics(&self, wheel_speeds: WheelSpeeds) -> ChassisSpeeds {
        let v_l = wheel_speeds.omega_l * self.wheel_radius;
        let v_r = wheel_speeds.omega_r * self.wheel_radius;

        let v = (v_r + v_l) / 2.0;
        let omega = (v_r - v_l) / self.axle_length;

        ChassisSpeeds::new(v, omega)
    }

    /// Integrates chassis speeds over `dt` with a single explicit Euler step.
    ///
    /// The translation is computed in meters and multiplied by
    /// `units_per_meter` so the returned pose stays in world units. The heading
    /// is accumulated without normalization.
    ///
    /// # Errors
    ///
    /// Returns `Err(KinematicsError::NonFiniteTimeDelta)` if `dt` is NaN or infinite.
    /// Returns `Err(KinematicsError::NegativeTimeDelta)` if `dt` is negative.
    pub fn update_pose(
        &self,
        current_pose: Pose,
        chassis_speeds: ChassisSpeeds,
        dt: f64,
        units_per_meter: f64,
    ) -> Result<Pose, KinematicsError> {
        if !dt.is_finite() {
            return Err(KinematicsError::NonFiniteTimeDelta("must be finite"));
        }
        if dt < 0.0 {
            return Err(KinematicsError::NegativeTimeDelta("must be non-negative"));
        }

        let delta_x = chassis_speeds.v * cos(current_pose.theta) * dt;
        let delta_y = chassis_speeds.v * sin(current_pose.theta) * dt;
        let delta_theta = chassis_speeds.omega * dt;

        Ok(Pose {
            x: current_pose.x + delta_x * units_per_meter,
            y: current_pose.y + delta_y * units_per_meter,
            theta: current_pose.theta + delta_theta,
        })
    }
}

impl fmt::Display for DifferentialDrive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DifferentialDrive (r: {:.2} m, L: {:.2} m)", self.wheel_radius, self.axle_length)
    }
}
