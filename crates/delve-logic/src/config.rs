//! Tunable settings for layout synthesis, cost maps and agent scheduling.
//!
//! Every field defaults to the matching value in [`crate::constants`], so
//! `DungeonConfig::default()` reproduces the stock behaviour. The config is
//! plain serde data and can be embedded in level files.

use serde::{Deserialize, Serialize};

use crate::constants::{layout, penalty, scheduling, tiles};

/// All tunables, grouped by the component that reads them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DungeonConfig {
    pub layout: LayoutConfig,
    pub grid: GridConfig,
    pub scheduler: SchedulerConfig,
}

/// Retry budgets for the layout synthesizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Graph selections before generation fails.
    pub max_build_attempts: u32,
    /// Full traversals of one graph before another graph is selected.
    pub max_rebuild_attempts_per_graph: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            max_build_attempts: layout::MAX_BUILD_ATTEMPTS,
            max_rebuild_attempts_per_graph: layout::MAX_REBUILD_ATTEMPTS_PER_GRAPH,
        }
    }
}

/// How collision tiles turn into cell penalties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub default_penalty: u32,
    pub preferred_penalty: u32,
    /// World units per tile.
    pub tile_size: f32,
    /// Tiles that make a cell impassable.
    pub unwalkable_tiles: Vec<char>,
    /// Tile that marks a preferred route, if any.
    pub preferred_tile: Option<char>,
    /// Radius searched for a walkable cell when a goal is blocked.
    pub goal_search_radius: i32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            default_penalty: penalty::DEFAULT,
            preferred_penalty: penalty::PREFERRED,
            tile_size: 1.0,
            unwalkable_tiles: vec![tiles::WALL, tiles::TABLE, tiles::WATER],
            preferred_tile: Some(tiles::PREFERRED_PATH),
            goal_search_radius: 1,
        }
    }
}

impl GridConfig {
    /// Penalty for a cell holding `tile` (`None` = no collision tile).
    pub fn penalty_for(&self, tile: Option<char>) -> u32 {
        match tile {
            Some(t) if self.unwalkable_tiles.contains(&t) => penalty::IMPASSABLE,
            Some(t) if self.preferred_tile == Some(t) => self.preferred_penalty,
            _ => self.default_penalty,
        }
    }
}

/// Re-plan gating for roaming agents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Number of tick slots searches are spread over.
    pub slot_count: u32,
    /// Seconds before an agent may re-plan for a stationary target.
    pub replan_cooldown: f32,
    /// Target displacement that forces a re-plan.
    pub replan_distance: f32,
    /// Distance at which a waypoint counts as reached.
    pub stop_distance: f32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            slot_count: scheduling::SLOT_COUNT,
            replan_cooldown: scheduling::REPLAN_COOLDOWN,
            replan_distance: scheduling::REPLAN_DISTANCE,
            stop_distance: scheduling::STOP_DISTANCE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_constants() {
        let c = DungeonConfig::default();
        assert_eq!(c.layout.max_build_attempts, 10);
        assert_eq!(c.layout.max_rebuild_attempts_per_graph, 1000);
        assert_eq!(c.grid.default_penalty, 40);
        assert_eq!(c.grid.preferred_penalty, 1);
        assert_eq!(c.scheduler.slot_count, 60);
    }

    #[test]
    fn tile_penalties() {
        let g = GridConfig::default();
        assert_eq!(g.penalty_for(Some('#')), 0);
        assert_eq!(g.penalty_for(Some('W')), 0);
        assert_eq!(g.penalty_for(Some('=')), 1);
        assert_eq!(g.penalty_for(Some('.')), 40);
        assert_eq!(g.penalty_for(None), 40);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let c: DungeonConfig =
            serde_json::from_str(r#"{"scheduler":{"slot_count":8}}"#).unwrap();
        assert_eq!(c.scheduler.slot_count, 8);
        assert_eq!(c.scheduler.replan_cooldown, 2.0);
        assert_eq!(c.grid, GridConfig::default());
    }
}
