//! Ordered list of goals visited one after another.

use diffbot_kinematics::Point;
use tracing::{debug, info};

/// A sequence of goals with a cursor on the active one.
///
/// The route only does bookkeeping; the caller decides when a goal has been
/// reached and hands the returned points to the drive state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GoalRoute {
    goals: Vec<Point>,
    active: Option<usize>,
}

impl GoalRoute {
    /// An idle, empty route.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a goal.
    ///
    /// Returns the goal to activate when the route was idle, `None` when the
    /// goal was only queued behind the active one.
    pub fn push(&mut self, goal: Point) -> Option<Point> {
        self.goals.push(goal);
        if self.active.is_some() {
            debug!(%goal, queued = self.goals.len(), "Goal queued");
            return None;
        }
        self.active = Some(0);
        self.goals.first().copied()
    }

    /// Discard the route and start a new one made of `goal` alone.
    pub fn replace(&mut self, goal: Point) -> Point {
        self.goals.clear();
        self.goals.push(goal);
        self.active = Some(0);
        goal
    }

    /// Move past the active goal.
    ///
    /// Returns the next goal, or `None` once the route is exhausted, in which
    /// case the route is cleared and becomes idle.
    pub fn advance(&mut self) -> Option<Point> {
        let next = self.active? + 1;
        match self.goals.get(next).copied() {
            Some(goal) => {
                self.active = Some(next);
                Some(goal)
            }
            None => {
                info!(visited = self.goals.len(), "Route finished");
                self.clear();
                None
            }
        }
    }

    /// Drop every goal.
    pub fn clear(&mut self) {
        self.goals.clear();
        self.active = None;
    }

    /// The active goal.
    pub fn current(&self) -> Option<Point> {
        self.active.and_then(|i| self.goals.get(i).copied())
    }

    /// Index of the active goal.
    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    /// All goals of the route, visited or not.
    pub fn goals(&self) -> &[Point] {
        &self.goals
    }

    /// Whether a goal is being pursued.
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_goal_activates_route() {
        let mut route = GoalRoute::new();
        assert!(!route.is_active());
        assert_eq!(route.push(Point::new(1.0, 1.0)), Some(Point::new(1.0, 1.0)));
        assert_eq!(route.push(Point::new(2.0, 2.0)), None);
        assert_eq!(route.current(), Some(Point::new(1.0, 1.0)));
        assert_eq!(route.active_index(), Some(0));
        assert_eq!(route.goals().len(), 2);
    }

    #[test]
    fn advance_walks_goals_in_order_then_clears() {
        let mut route = GoalRoute::new();
        route.push(Point::new(1.0, 0.0));
        route.push(Point::new(2.0, 0.0));
        route.push(Point::new(3.0, 0.0));

        assert_eq!(route.advance(), Some(Point::new(2.0, 0.0)));
        assert_eq!(route.advance(), Some(Point::new(3.0, 0.0)));
        assert_eq!(route.active_index(), Some(2));
        assert_eq!(route.advance(), None);
        assert!(!route.is_active());
        assert!(route.goals().is_empty());
        assert_eq!(route.advance(), None);
    }

    #[test]
    fn replace_discards_queued_goals() {
        let mut route = GoalRoute::new();
        route.push(Point::new(1.0, 0.0));
        route.push(Point::new(2.0, 0.0));
        assert_eq!(route.replace(Point::new(5.0, 5.0)), Point::new(5.0, 5.0));
        assert_eq!(route.goals(), &[Point::new(5.0, 5.0)]);
        assert_eq!(route.advance(), None);
    }
}
