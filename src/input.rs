//! Translation of raw user input into simulation commands.

use thiserror::Error;

use diffbot_kinematics::Point;

use crate::bus::Command;
use crate::config::ManualConfig;

#[derive(Debug, Error, PartialEq)]
pub enum InputError {
    #[error("{field}: '{value}' is not a number")]
    InvalidNumber { field: &'static str, value: String },
    #[error("{field}: value must be finite")]
    NotFinite { field: &'static str },
}

/// Arrow keys held during a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DriveKeys {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl DriveKeys {
    /// Left/right voltages for the held keys.
    ///
    /// Up/down set both sides; left/right then add a turning differential.
    pub fn voltages(self, manual: &ManualConfig) -> (f64, f64) {
        let (mut left, mut right) = (0.0, 0.0);
        if self.up {
            (left, right) = (manual.drive_voltage, manual.drive_voltage);
        }
        if self.down {
            (left, right) = (-manual.drive_voltage, -manual.drive_voltage);
        }
        if self.left {
            left -= manual.turn_voltage;
            right += manual.turn_voltage;
        }
        if self.right {
            left += manual.turn_voltage;
            right -= manual.turn_voltage;
        }
        (left, right)
    }
}

/// Text fields of the "drive to" form: position in meters, heading in degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct GoalForm {
    pub x: String,
    pub y: String,
    pub theta: String,
}

impl Default for GoalForm {
    fn default() -> Self {
        GoalForm {
            x: "0".to_string(),
            y: "0".to_string(),
            theta: "0".to_string(),
        }
    }
}

impl GoalForm {
    /// Parse the form into a [`Command::DriveTo`] in world units and radians.
    pub fn to_command(&self, units_per_meter: f64) -> Result<Command, InputError> {
        let x = parse_field("x", &self.x)?;
        let y = parse_field("y", &self.y)?;
        let theta = parse_field("theta", &self.theta)?;
        Ok(Command::DriveTo {
            goal: Point::new(x, y).scaled(units_per_meter),
            heading: theta.to_radians(),
        })
    }
}

fn parse_field(field: &'static str, raw: &str) -> Result<f64, InputError> {
    let value: f64 = raw.trim().parse().map_err(|_| InputError::InvalidNumber {
        field,
        value: raw.to_string(),
    })?;
    if !value.is_finite() {
        return Err(InputError::NotFinite { field });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrow_keys_map_to_voltages() {
        let manual = ManualConfig::default();
        let keys = |up, down, left, right| DriveKeys { up, down, left, right };

        assert_eq!(keys(false, false, false, false).voltages(&manual), (0.0, 0.0));
        assert_eq!(keys(true, false, false, false).voltages(&manual), (6.0, 6.0));
        assert_eq!(keys(false, true, false, false).voltages(&manual), (-6.0, -6.0));
        assert_eq!(keys(false, false, true, false).voltages(&manual), (-4.0, 4.0));
        assert_eq!(keys(true, false, false, true).voltages(&manual), (10.0, 2.0));
        // Down wins over up, both turns cancel.
        assert_eq!(keys(true, true, true, true).voltages(&manual), (-6.0, -6.0));
    }

    #[test]
    fn form_converts_to_world_units() {
        let form = GoalForm {
            x: " 2.5".to_string(),
            y: "4".to_string(),
            theta: "90".to_string(),
        };
        let Command::DriveTo { goal, heading } = form.to_command(100.0).unwrap() else {
            panic!("expected DriveTo");
        };
        assert_eq!(goal, Point::new(250.0, 400.0));
        assert!((heading - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn malformed_fields_are_reported() {
        let form = GoalForm {
            y: "abc".to_string(),
            ..GoalForm::default()
        };
        assert_eq!(
            form.to_command(100.0),
            Err(InputError::InvalidNumber {
                field: "y",
                value: "abc".to_string()
            })
        );

        let form = GoalForm {
            theta: "inf".to_string(),
            ..GoalForm::default()
        };
        assert_eq!(form.to_command(100.0), Err(InputError::NotFinite { field: "theta" }));
    }
}
