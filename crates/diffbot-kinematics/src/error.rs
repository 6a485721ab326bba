#![warn(missing_docs)]

//! Error types for the kinematics library.
//!
//! Inputs such as voltages and goal points are clamped rather than rejected, so
//! the only failures are invalid physical parameters at construction time and
//! time deltas that cannot be integrated.

use core::fmt;

/// Errors that can occur when building or advancing a drive model.
#[derive(Debug, Clone, PartialEq)]
pub enum KinematicsError {
    /// Error for invalid wheel radius.
    /// This variant is returned when a wheel radius is provided that is not positive.
    InvalidWheelRadius(&'static str),
    /// Error for invalid axle length.
    /// This variant is returned when an axle length is provided that is not positive.
    InvalidAxleLength(&'static str),
    /// Error for an invalid motor speed constant (RPM per volt).
    InvalidMotorConstant(&'static str),
    /// Error for an invalid voltage limit.
    InvalidVoltageLimit(&'static str),
    /// Error for an invalid world scale (units per meter).
    InvalidScale(&'static str),
    /// Error for negative time delta.
    /// This variant is returned when a negative time delta is used for pose updates.
    NegativeTimeDelta(&'static str),
    /// Error for a time delta that is NaN or infinite.
    NonFiniteTimeDelta(&'static str),
}

impl core::fmt::Display for KinematicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KinematicsError::InvalidWheelRadius(msg) => write!(f, "Invalid wheel radius: {}", msg),
            KinematicsError::InvalidAxleLength(msg) => write!(f, "Invalid axle length: {}", msg),
            KinematicsError::InvalidMotorConstant(msg) => {
                write!(f, "Invalid motor constant: {}", msg)
            }
            KinematicsError::InvalidVoltageLimit(msg) => {
                write!(f, "Invalid voltage limit: {}", msg)
            }
            KinematicsError::InvalidScale(msg) => write!(f, "Invalid world scale: {}", msg),
            KinematicsError::NegativeTimeDelta(msg) => write!(f, "Negative time delta: {}", msg),
            KinematicsError::NonFiniteTimeDelta(msg) => {
                write!(f, "Non-finite time delta: {}", msg)
            }
        }
    }
}

impl core::error::Error for KinematicsError {}
