use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::warn;

use diffbot_kinematics::Point;

use crate::input::DriveKeys;

/// Requests sent from the window to the simulation loop.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Append a goal (world units) to the route, starting it if idle.
    AddGoal(Point),
    /// Replace the route with a single goal and force the heading (rad).
    DriveTo { goal: Point, heading: f64 },
    /// Arrow keys currently held, used in manual mode.
    Manual(DriveKeys),
}

/// Notifications published by the simulation loop.
#[derive(Debug, Clone, PartialEq)]
pub enum SimEvent {
    /// The goal at `index` in the route was reached.
    GoalReached { index: usize, goal: Point },
    /// The last goal was reached and manual mode is back.
    RouteFinished { visited: usize },
}

/// Broadcast topic with bounded capacity.
/// `T` must be `Send + Sync` because we hop across threads.
#[derive(Debug, Clone)]
pub struct Topic<T> {
    tx: broadcast::Sender<Arc<T>>,
}

impl<T: Send + Sync + 'static> Topic<T> {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Publish to every current subscriber. Messages sent with no subscriber are dropped.
    pub fn publish(&self, msg: T) {
        let _ = self.tx.send(Arc::new(msg));
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Arc<T>> {
        self.tx.subscribe()
    }
}

/// Drain everything currently queued on `rx` without blocking.
///
/// Lagged receivers skip the lost messages with a warning. Returns `false`
/// once the channel is closed.
pub fn drain<T>(rx: &mut broadcast::Receiver<Arc<T>>, mut handle: impl FnMut(&T)) -> bool {
    loop {
        match rx.try_recv() {
            Ok(msg) => handle(&msg),
            Err(broadcast::error::TryRecvError::Empty) => return true,
            Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                warn!(skipped, "Receiver lagged, dropping old messages");
            }
            Err(broadcast::error::TryRecvError::Closed) => return false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_delivers_in_order_and_survives_lag() {
        let topic: Topic<u32> = Topic::new(2);
        let mut rx = topic.subscribe();
        for i in 0..5 {
            topic.publish(i);
        }
        let mut seen = Vec::new();
        assert!(drain(&mut rx, |v| seen.push(*v)));
        assert_eq!(seen, vec![3, 4]);
    }

    #[test]
    fn drain_reports_closed_channel() {
        let topic: Topic<u32> = Topic::new(4);
        let mut rx = topic.subscribe();
        topic.publish(7);
        drop(topic);
        let mut seen = Vec::new();
        assert!(!drain(&mut rx, |v| seen.push(*v)));
        assert_eq!(seen, vec![7]);
    }
}
