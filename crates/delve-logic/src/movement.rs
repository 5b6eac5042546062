//! Walking a planned path one waypoint at a time.
//!
//! A [`PathFollower`] holds the waypoints still ahead of an agent. Each
//! tick the agent drops every waypoint it is already within
//! `stop_distance` of, then moves toward the next one at `speed` without
//! overshooting it. An empty follower means the agent is idle.

use crate::geometry::Vec2;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathFollower {
    /// Remaining waypoints, next one last.
    stack: Vec<Vec2>,
}

impl PathFollower {
    /// Follow `waypoints`, given nearest first.
    pub fn new(waypoints: Vec<Vec2>) -> Self {
        let mut stack = waypoints;
        stack.reverse();
        Self { stack }
    }

    /// Replace the current path.
    pub fn replace(&mut self, waypoints: Vec<Vec2>) {
        *self = Self::new(waypoints);
    }

    pub fn clear(&mut self) {
        self.stack.clear();
    }

    pub fn is_idle(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn next_waypoint(&self) -> Option<Vec2> {
        self.stack.last().copied()
    }

    pub fn remaining(&self) -> usize {
        self.stack.len()
    }

    /// New position after moving for `dt` seconds from `position`.
    pub fn advance(&mut self, position: Vec2, speed: f32, dt: f32, stop_distance: f32) -> Vec2 {
        while let Some(&next) = self.stack.last() {
            if position.distance(&next) > stop_distance {
                break;
            }
            self.stack.pop();
        }
        let Some(next) = self.next_waypoint() else {
            return position;
        };
        let to_next = next - position;
        let step = (speed * dt).max(0.0);
        let dist = to_next.length();
        if step >= dist {
            next
        } else {
            position + to_next.normalize() * step
        }
    }
}
