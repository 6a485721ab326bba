use parking_lot::RwLock;
use std::{sync::Arc, time::Instant};

use diffbot_kinematics::{Boundary, MotionHistory, Point, Pose, VoltageCommand};

use crate::simulation::DriveMode;

/// Everything the window needs to draw one frame.
#[derive(Clone, Debug)]
pub struct Snapshot {
    pub pose: Pose,
    pub linear_velocity: f64,
    pub voltages: VoltageCommand,
    pub mode: DriveMode,
    pub goal: Option<Point>,
    pub goal_reached: bool,
    pub route: Vec<Point>,
    pub trajectory: Vec<Point>,
    pub history: MotionHistory,
    pub boundary: Boundary,
    pub units_per_meter: f64,
    pub updated_at: Instant,
    pub faults: Vec<String>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Snapshot {
            pose: Pose::default(),
            linear_velocity: 0.0,
            voltages: VoltageCommand::zero(),
            mode: DriveMode::Manual,
            goal: None,
            goal_reached: false,
            route: Vec::new(),
            trajectory: Vec::new(),
            history: MotionHistory::default(),
            boundary: Boundary::default(),
            units_per_meter: 1.0,
            updated_at: Instant::now(),
            faults: Vec::new(),
        }
    }
}

pub type Blackboard = Arc<RwLock<Snapshot>>;

pub fn snapshot(bb: &Blackboard) -> Snapshot {
    (*bb.read()).clone()
}

/// Replace the published state, keeping faults raised so far.
pub fn publish(bb: &Blackboard, mut next: Snapshot) {
    let mut g = bb.write();
    next.faults = std::mem::take(&mut g.faults);
    *g = next;
}

pub fn raise_fault(bb: &Blackboard, msg: &str) {
    let mut g = bb.write();
    if !g.faults.iter().any(|s| s == msg) {
        g.faults.push(msg.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn faults_survive_publish_and_are_deduplicated() {
        let bb: Blackboard = Arc::default();
        raise_fault(&bb, "sim stopped");
        raise_fault(&bb, "sim stopped");
        publish(
            &bb,
            Snapshot {
                linear_velocity: 1.5,
                ..Snapshot::default()
            },
        );
        let snap = snapshot(&bb);
        assert_eq!(snap.linear_velocity, 1.5);
        assert_eq!(snap.faults, vec!["sim stopped".to_string()]);
    }
}
