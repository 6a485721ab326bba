//! Linear DC motor model and the clamped voltage command fed to it.

use core::f64::consts::PI;
use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::KinematicsError;

/// Converts revolutions per minute to radians per second.
pub const RPM_TO_RAD_PER_SEC: f64 = 2.0 * PI / 60.0;

/// Ideal motor with a linear voltage to speed law.
///
/// Speed is proportional to the applied voltage and the motor speed constant
/// `kv` (RPM per volt). There is no saturation here: limits are applied to the
/// voltage before it reaches the motor, never to the resulting speed.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotorModel {
    kv: f64,
}

impl MotorModel {
    /// Construct a motor model from its speed constant in RPM per volt.
    ///
    /// # Errors
    ///
    /// Returns `Err(KinematicsError::InvalidMotorConstant)` if `kv` is not finite.
    pub fn new(kv: f64) -> Result<Self, KinematicsError> {
        if !kv.is_finite() {
            return Err(KinematicsError::InvalidMotorConstant("must be finite"));
        }
        Ok(MotorModel { kv })
    }

    /// Returns the speed constant (RPM per volt).
    pub fn kv(&self) -> f64 {
        self.kv
    }

    /// Wheel angular velocity (rad/s) produced by `voltage` volts.
    ///
    /// Negative voltages spin the wheel backwards.
    pub fn voltage_to_angular_velocity(&self, voltage: f64) -> f64 {
        let rpm = self.kv * voltage;
        rpm * RPM_TO_RAD_PER_SEC
    }
}

/// A left/right voltage pair.
///
/// Values built through [`VoltageCommand::clamped`] are always within
/// `[-max_voltage, max_voltage]`. A raw command produced by a controller may
/// be outside that range until it goes through the clamp.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VoltageCommand {
    /// Left motor voltage (V).
    pub left: f64,
    /// Right motor voltage (V).
    pub right: f64,
}

impl VoltageCommand {
    /// Construct an unclamped command.
    pub const fn new(left: f64, right: f64) -> Self {
        VoltageCommand { left, right }
    }

    /// Both motors off.
    pub const fn zero() -> Self {
        VoltageCommand::new(0.0, 0.0)
    }

    /// Construct a command with both sides clamped to `[-max_voltage, max_voltage]`.
    ///
    /// NaN inputs become `0.0`.
    pub fn clamped(left: f64, right: f64, max_voltage: f64) -> Self {
        VoltageCommand {
            left: clamp_voltage(left, max_voltage),
            right: clamp_voltage(right, max_voltage),
        }
    }
}

impl fmt::Display for VoltageCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(L: {:.2} V, R: {:.2} V)", self.left, self.right)
    }
}

fn clamp_voltage(voltage: f64, max_voltage: f64) -> f64 {
    if voltage.is_nan() {
        return 0.0;
    }
    voltage.clamp(-max_voltage, max_voltage)
}
