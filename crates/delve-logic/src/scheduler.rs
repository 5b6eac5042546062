//! Spreads path searches across ticks.
//!
//! Every agent gets a fixed slot in `[0, slot_count)` when it spawns and
//! may only search on ticks where `tick % slot_count == slot`. On its tick
//! it searches again only if its cooldown has run out or the target has
//! moved at least `replan_distance` since the last search. Agents do
//! nothing until the target first comes within their chase distance.
//!
//! ```
//! use delve_logic::config::SchedulerConfig;
//! use delve_logic::geometry::Vec2;
//! use delve_logic::scheduler::PathScheduler;
//!
//! let mut scheduler = PathScheduler::new(SchedulerConfig::default());
//! let mut planner = scheduler.spawn_planner(10.0);
//! assert_eq!(planner.slot(), 0);
//! let (agent, target) = (Vec2::new(0.0, 0.0), Vec2::new(3.0, 0.0));
//! assert!(scheduler.poll(&mut planner, 0, 0.016, agent, target));
//! // Same tick slot next cycle, target unmoved, cooldown not yet over.
//! assert!(!scheduler.poll(&mut planner, 60, 0.016, agent, target));
//! ```

use crate::config::SchedulerConfig;
use crate::geometry::Vec2;

/// Per-agent re-plan state.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentPlanner {
    slot: u32,
    chase_distance: f32,
    chasing: bool,
    cooldown: f32,
    /// Target position at the last search.
    reference: Option<Vec2>,
}

impl AgentPlanner {
    pub fn new(slot: u32, chase_distance: f32) -> Self {
        Self {
            slot,
            chase_distance,
            chasing: false,
            cooldown: 0.0,
            reference: None,
        }
    }

    pub fn slot(&self) -> u32 {
        self.slot
    }

    pub fn is_chasing(&self) -> bool {
        self.chasing
    }

    /// Forget the last plan so the next due tick searches again.
    pub fn invalidate(&mut self) {
        self.cooldown = 0.0;
        self.reference = None;
    }
}

/// Slot assignment and re-plan gating for every agent of a simulation.
#[derive(Debug, Clone)]
pub struct PathScheduler {
    config: SchedulerConfig,
    spawned: u64,
}

impl PathScheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        Self { config, spawned: 0 }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    fn slot_count(&self) -> u32 {
        self.config.slot_count.max(1)
    }

    /// Slot of the `index`-th spawned agent.
    pub fn slot_for(&self, index: u64) -> u32 {
        (index % self.slot_count() as u64) as u32
    }

    /// Next slot in spawn order.
    pub fn assign_slot(&mut self) -> u32 {
        let slot = self.slot_for(self.spawned);
        self.spawned += 1;
        slot
    }

    pub fn spawn_planner(&mut self, chase_distance: f32) -> AgentPlanner {
        AgentPlanner::new(self.assign_slot(), chase_distance)
    }

    /// Whether agents in `slot` may search on `tick`.
    pub fn is_due(&self, slot: u32, tick: u64) -> bool {
        tick % self.slot_count() as u64 == slot as u64
    }

    /// Advance `planner` by `dt` and decide whether it searches this tick.
    /// A `true` result starts a new cooldown.
    pub fn poll(
        &self,
        planner: &mut AgentPlanner,
        tick: u64,
        dt: f32,
        agent: Vec2,
        target: Vec2,
    ) -> bool {
        if !planner.chasing {
            if agent.distance(&target) >= planner.chase_distance {
                return false;
            }
            planner.chasing = true;
        }
        planner.cooldown -= dt;
        if !self.is_due(planner.slot, tick) {
            return false;
        }
        let target_moved = planner
            .reference
            .map_or(true, |r| r.distance(&target) >= self.config.replan_distance);
        if planner.cooldown > 0.0 && !target_moved {
            return false;
        }
        planner.cooldown = self.config.replan_cooldown;
        planner.reference = Some(target);
        true
    }
}
