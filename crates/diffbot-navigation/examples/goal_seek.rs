//! Drives the robot through a square of goals without a window.
//!
//! Run with `RUST_LOG=debug` to see every controller tick.

use diffbot_kinematics::{Boundary, DifferentialDriveState, Point, Pose, RobotConfig};
use diffbot_navigation::{GoalRoute, GoalSeekConfig, GoalSeekController, SeekStatus, seek_goal};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let boundary = Boundary::default();
    let start = boundary.center();
    let mut robot =
        match DifferentialDriveState::new(&RobotConfig::default(), boundary, Pose::new(start.x, start.y, 0.0)) {
            Ok(robot) => robot,
            Err(e) => {
                error!("Failed to build robot: {}", e);
                return;
            }
        };
    let controller = match GoalSeekController::new(GoalSeekConfig::default()) {
        Ok(controller) => controller,
        Err(e) => {
            error!("Failed to build controller: {}", e);
            return;
        }
    };

    let mut route = GoalRoute::new();
    for goal in [
        Point::new(500.0, 300.0),
        Point::new(500.0, 150.0),
        Point::new(200.0, 150.0),
        Point::new(200.0, 450.0),
    ] {
        if let Some(first) = route.push(goal) {
            robot.set_goal(first);
        }
    }

    let dt = 1.0 / 60.0;
    let mut ticks = 0u32;
    while route.is_active() && ticks < 60 * 60 {
        if let Some(out) = seek_goal(&mut robot, &controller) {
            if out.status == SeekStatus::Reached {
                info!(index = ?route.active_index(), pose = %robot.pose(), t = ticks as f64 * dt, "Goal reached");
                match route.advance() {
                    Some(next) => robot.set_goal(next),
                    None => robot.clear_goal(),
                }
            }
        }
        if let Err(e) = robot.step(dt) {
            error!("Step failed: {}", e);
            return;
        }
        let pose = robot.pose();
        let clamped = boundary.clamp(pose.position());
        *robot.pose_mut() = Pose::new(clamped.x, clamped.y, pose.theta);
        ticks += 1;
    }

    info!(ticks, final_pose = %robot.pose(), "Done");
}
