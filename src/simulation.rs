//! The simulation context: robot state, controller, route and drive mode.

use std::time::Instant;

use anyhow::Context;
use tracing::{debug, info};

use diffbot_kinematics::{DifferentialDriveState, Pose};
use diffbot_navigation::{GoalRoute, GoalSeekController, SeekStatus, seek_goal};

use crate::blackboard::Snapshot;
use crate::bus::{Command, SimEvent};
use crate::config::{ManualConfig, SimConfig};
use crate::input::DriveKeys;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveMode {
    /// Voltages come from the arrow keys.
    Manual,
    /// The controller follows the goal route.
    Route,
}

pub struct Simulation {
    robot: DifferentialDriveState,
    controller: GoalSeekController,
    route: GoalRoute,
    mode: DriveMode,
    keys: DriveKeys,
    manual: ManualConfig,
}

impl Simulation {
    /// Build the simulation with the robot in the middle of the area.
    pub fn new(config: &SimConfig) -> anyhow::Result<Self> {
        let center = config.boundary.center();
        let start = Pose::new(center.x, center.y, config.sim.start_heading);
        let robot = DifferentialDriveState::new(&config.robot, config.boundary, start)
            .context("invalid robot configuration")?;
        let controller = GoalSeekController::new(config.controller)
            .context("invalid controller configuration")?;

        Ok(Simulation {
            robot,
            controller,
            route: GoalRoute::new(),
            mode: DriveMode::Manual,
            keys: DriveKeys::default(),
            manual: config.manual,
        })
    }

    pub fn apply(&mut self, command: &Command) {
        match command {
            Command::AddGoal(goal) => {
                if let Some(first) = self.route.push(*goal) {
                    info!(goal = %first, "Starting route");
                    self.robot.set_goal(first);
                    self.mode = DriveMode::Route;
                }
            }
            Command::DriveTo { goal, heading } => {
                let goal = self.route.replace(*goal);
                info!(%goal, heading, "Driving to goal");
                self.robot.set_heading(*heading);
                self.robot.set_goal(goal);
                self.mode = DriveMode::Route;
            }
            Command::Manual(keys) => self.keys = *keys,
        }
    }

    /// Advance by one tick of `dt` seconds.
    ///
    /// Runs the controller (route mode) or the key mapping (manual mode),
    /// integrates, then keeps the robot inside the boundary.
    pub fn tick(&mut self, dt: f64) -> anyhow::Result<Vec<SimEvent>> {
        let mut events = Vec::new();

        if self.mode == DriveMode::Route {
            self.follow_route(&mut events);
        }
        if self.mode == DriveMode::Manual {
            let (left, right) = self.keys.voltages(&self.manual);
            self.robot.set_voltages(left, right);
        }

        self.robot
            .step(dt)
            .with_context(|| format!("integration step failed (dt = {dt})"))?;

        let boundary = self.robot.boundary();
        let pose = self.robot.pose_mut();
        let clamped = boundary.clamp(pose.position());
        pose.x = clamped.x;
        pose.y = clamped.y;

        Ok(events)
    }

    fn follow_route(&mut self, events: &mut Vec<SimEvent>) {
        let Some(output) = seek_goal(&mut self.robot, &self.controller) else {
            return;
        };
        if output.status != SeekStatus::Reached {
            return;
        }

        let index = self.route.active_index().unwrap_or_default();
        let goal = self.robot.goal().unwrap_or_default();
        let visited = self.route.goals().len();
        debug!(index, %goal, "Goal reached");
        events.push(SimEvent::GoalReached { index, goal });

        match self.route.advance() {
            Some(next) => self.robot.set_goal(next),
            None => {
                self.robot.clear_goal();
                self.mode = DriveMode::Manual;
                events.push(SimEvent::RouteFinished { visited });
            }
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        let robot = self.robot();
        Snapshot {
            pose: robot.pose(),
            linear_velocity: robot.linear_velocity(),
            voltages: robot.voltages(),
            mode: self.mode(),
            goal: robot.goal(),
            goal_reached: robot.goal_reached(),
            route: self.route().goals().to_vec(),
            trajectory: robot.trajectory().to_vec(),
            history: robot.history().clone(),
            boundary: robot.boundary(),
            units_per_meter: robot.units_per_meter(),
            updated_at: Instant::now(),
            faults: Vec::new(),
        }
    }

    pub fn mode(&self) -> DriveMode {
        self.mode
    }

    pub fn robot(&self) -> &DifferentialDriveState {
        &self.robot
    }

    pub fn route(&self) -> &GoalRoute {
        &self.route
    }
}
