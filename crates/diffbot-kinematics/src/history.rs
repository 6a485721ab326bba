//! Fixed-capacity time series of motion variables, kept for display.

use alloc::collections::VecDeque;

/// Default number of samples kept per series.
pub const DEFAULT_HISTORY_LEN: usize = 200;

/// The signals recorded on every integration step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    /// Linear velocity of the chassis (m/s).
    LinearVelocity,
    /// Angular velocity of the chassis (rad/s).
    AngularVelocity,
    /// Heading (rad), unbounded.
    Heading,
    /// Left motor voltage (V).
    LeftVoltage,
    /// Right motor voltage (V).
    RightVoltage,
}

impl Signal {
    /// Every signal, in display order.
    pub const ALL: [Signal; 5] = [
        Signal::LinearVelocity,
        Signal::AngularVelocity,
        Signal::Heading,
        Signal::LeftVoltage,
        Signal::RightVoltage,
    ];

    /// Human readable label with unit.
    pub const fn label(self) -> &'static str {
        match self {
            Signal::LinearVelocity => "Velocity (m/s)",
            Signal::AngularVelocity => "Angular vel. (rad/s)",
            Signal::Heading => "Heading (rad)",
            Signal::LeftVoltage => "Left voltage (V)",
            Signal::RightVoltage => "Right voltage (V)",
        }
    }
}

/// One row of the history, appended once per step.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HistorySample {
    /// Linear velocity (m/s).
    pub linear_velocity: f64,
    /// Angular velocity (rad/s).
    pub angular_velocity: f64,
    /// Heading (rad).
    pub heading: f64,
    /// Left motor voltage (V).
    pub left_voltage: f64,
    /// Right motor voltage (V).
    pub right_voltage: f64,
}

/// A rolling window over the most recent values of one signal.
#[derive(Debug, Clone, PartialEq)]
pub struct RollingSeries {
    values: VecDeque<f64>,
    capacity: usize,
}

impl RollingSeries {
    /// Create an empty series keeping at most `capacity` values.
    pub fn new(capacity: usize) -> Self {
        RollingSeries {
            values: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a value, dropping the oldest one when full.
    pub fn push(&mut self, value: f64) {
        if self.capacity == 0 {
            return;
        }
        if self.values.len() == self.capacity {
            self.values.pop_front();
        }
        self.values.push_back(value);
    }

    /// Number of stored values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Maximum number of stored values.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Values from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().copied()
    }

    /// The most recent value.
    pub fn latest(&self) -> Option<f64> {
        self.values.back().copied()
    }

    /// Largest absolute value in the window, or `0.0` when empty.
    pub fn max_abs(&self) -> f64 {
        self.values
            .iter()
            .map(|v| if *v < 0.0 { -*v } else { *v })
            .fold(0.0, f64::max)
    }
}

/// The five rolling series recorded by the drive state.
#[derive(Debug, Clone, PartialEq)]
pub struct MotionHistory {
    linear_velocity: RollingSeries,
    angular_velocity: RollingSeries,
    heading: RollingSeries,
    left_voltage: RollingSeries,
    right_voltage: RollingSeries,
}

impl MotionHistory {
    /// Create an empty history keeping `capacity` samples per series.
    pub fn new(capacity: usize) -> Self {
        MotionHistory {
            linear_velocity: RollingSeries::new(capacity),
            angular_velocity: RollingSeries::new(capacity),
            heading: RollingSeries::new(capacity),
            left_voltage: RollingSeries::new(capacity),
            right_voltage: RollingSeries::new(capacity),
        }
    }

    /// Append one sample to every series.
    pub fn record(&mut self, sample: HistorySample) {
        self.linear_velocity.push(sample.linear_velocity);
        self.angular_velocity.push(sample.angular_velocity);
        self.heading.push(sample.heading);
        self.left_voltage.push(sample.left_voltage);
        self.right_voltage.push(sample.right_voltage);
    }

    /// The series recording `signal`.
    pub fn series(&self, signal: Signal) -> &RollingSeries {
        match signal {
            Signal::LinearVelocity => &self.linear_velocity,
            Signal::AngularVelocity => &self.angular_velocity,
            Signal::Heading => &self.heading,
            Signal::LeftVoltage => &self.left_voltage,
            Signal::RightVoltage => &self.right_voltage,
        }
    }

    /// Number of samples currently held (identical for every series).
    pub fn len(&self) -> usize {
        self.linear_velocity.len()
    }

    /// Whether nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.linear_velocity.is_empty()
    }
}

impl Default for MotionHistory {
    fn default() -> Self {
        MotionHistory::new(DEFAULT_HISTORY_LEN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn series_keeps_most_recent_values_in_order() {
        let mut series = RollingSeries::new(3);
        for v in 1..=5 {
            series.push(v as f64);
        }
        assert_eq!(series.len(), 3);
        assert_eq!(series.iter().collect::<Vec<_>>(), vec![3.0, 4.0, 5.0]);
        assert_eq!(series.latest(), Some(5.0));
    }

    #[test]
    fn zero_capacity_series_stays_empty() {
        let mut series = RollingSeries::new(0);
        series.push(1.0);
        assert!(series.is_empty());
    }

    #[test]
    fn max_abs_looks_at_negative_values() {
        let mut series = RollingSeries::new(4);
        assert_eq!(series.max_abs(), 0.0);
        series.push(1.5);
        series.push(-4.0);
        series.push(2.0);
        assert_eq!(series.max_abs(), 4.0);
    }

    #[test]
    fn history_routes_each_field_to_its_series() {
        let mut history = MotionHistory::new(10);
        history.record(HistorySample {
            linear_velocity: 1.0,
            angular_velocity: 2.0,
            heading: 3.0,
            left_voltage: 4.0,
            right_voltage: 5.0,
        });
        let latest: Vec<_> = Signal::ALL
            .iter()
            .map(|s| history.series(*s).latest().unwrap())
            .collect();
        assert_eq!(latest, vec![1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(history.len(), 1);
    }
}
