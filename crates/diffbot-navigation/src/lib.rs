//! Goal seeking for the simulated differential-drive robot.
//!
//! [`GoalSeekController`] turns a pose and a goal into raw motor voltages,
//! [`seek_goal`] feeds them through the drive state's clamp, and [`GoalRoute`]
//! sequences several goals.

pub mod controller;
pub mod error;
pub mod route;

pub use controller::{
    GoalSeekConfig, GoalSeekController, SeekOutput, SeekStatus, heading_error, seek_goal,
};
pub use error::NavigationError;
pub use route::GoalRoute;
