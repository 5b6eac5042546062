//! Tuning constants shared by layout synthesis and pathing.
//!
//! These are the defaults that [`crate::config::DungeonConfig`] starts from.
//! Code that needs a tunable value should read it from the config; the
//! step costs are fixed because the A* heuristic depends on them.

/// Layout synthesis budgets.
pub mod layout {
    /// Graph selections tried before generation gives up.
    pub const MAX_BUILD_ATTEMPTS: u32 = 10;
    /// Full traversals of one graph before a new graph is selected.
    pub const MAX_REBUILD_ATTEMPTS_PER_GRAPH: u32 = 1000;
    /// Corridor children allowed under a single room node.
    pub const MAX_CHILD_CORRIDORS: usize = 3;
}

/// Grid cost values.
pub mod penalty {
    /// Cell cannot be entered.
    pub const IMPASSABLE: u32 = 0;
    /// Cost of an ordinary floor cell.
    pub const DEFAULT: u32 = 40;
    /// Cost of a cell on a preferred route.
    pub const PREFERRED: u32 = 1;
}

/// Octile step costs (fixed-point, x10).
pub mod step {
    pub const ORTHOGONAL: u32 = 10;
    pub const DIAGONAL: u32 = 14;
}

/// Agent re-plan scheduling.
pub mod scheduling {
    /// Number of tick slots path searches are spread across.
    pub const SLOT_COUNT: u32 = 60;
    /// Seconds between re-plans when the target is stationary.
    pub const REPLAN_COOLDOWN: f32 = 2.0;
    /// Target displacement (world units) that forces a re-plan.
    pub const REPLAN_DISTANCE: f32 = 3.0;
    /// Distance at which a waypoint counts as reached.
    pub const STOP_DISTANCE: f32 = 0.2;
}

/// Collision-layer tile symbols used by the bundled level data.
pub mod tiles {
    pub const WALL: char = '#';
    pub const TABLE: char = 'T';
    pub const WATER: char = 'W';
    pub const FLOOR: char = '.';
    pub const PREFERRED_PATH: char = '=';
    /// No tile on the collision layer.
    pub const EMPTY: char = ' ';
}
