//! Roaming agent components.

use delve_logic::grid::GridCell;
use delve_logic::movement::PathFollower;
use delve_logic::scheduler::AgentPlanner;
use serde::{Deserialize, Serialize};

/// Movement tuning for one kind of agent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentProfile {
    /// World units per second.
    pub speed: f32,
    /// Target distance that starts the chase.
    pub chase_distance: f32,
}

impl Default for AgentProfile {
    fn default() -> Self {
        Self {
            speed: 3.0,
            chase_distance: 8.0,
        }
    }
}

/// A roaming agent.
#[derive(Debug, Clone, PartialEq)]
pub struct Agent {
    pub profile: AgentProfile,
    /// Grid cell the agent spawned on, in its room's grid.
    pub spawn_cell: GridCell,
}

/// Re-plan state and the path currently being walked.
#[derive(Debug, Clone, PartialEq)]
pub struct Pathing {
    pub planner: AgentPlanner,
    pub follower: PathFollower,
}

impl Pathing {
    pub fn new(planner: AgentPlanner) -> Self {
        Self {
            planner,
            follower: PathFollower::default(),
        }
    }
}

/// Marks an agent spawned by a room's enemy spawner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomEnemy;
