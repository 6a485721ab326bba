//! This module defines the error types used by the `diffbot-navigation` crate.

#![warn(missing_docs)]

/// Error type for navigation operations.
///
/// Controllers are total over their inputs; errors only come from parameters
/// that would make the control law meaningless.
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationError {
    /// Error for an invalid stop threshold.
    /// This variant is returned when the stopping distance is not positive.
    InvalidStopThreshold(&'static str),
    /// Error for an invalid speed limit.
    /// This variant is returned when the base speed limit is negative or NaN.
    InvalidSpeedLimit(&'static str),
    /// Error for an invalid gain.
    /// This variant is returned when a proportional gain is not finite.
    InvalidGain(&'static str),
}

impl core::fmt::Display for NavigationError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            NavigationError::InvalidStopThreshold(msg) => {
                write!(f, "Invalid stop threshold: {}", msg)
            }
            NavigationError::InvalidSpeedLimit(msg) => write!(f, "Invalid speed limit: {}", msg),
            NavigationError::InvalidGain(msg) => write!(f, "Invalid controller gain: {}", msg),
        }
    }
}

impl core::error::Error for NavigationError {}
