//! Pathing system - slot-scheduled A* re-plans for chasing agents
//!
//! Agents only chase a target that is in their own room. When the target's
//! cell is blocked the goal moves to the nearest walkable cell, then to one
//! of the room's spawn cells, then to the agent's own spawn cell.

use delve_logic::geometry::Vec2;
use delve_logic::grid::{CostMap, GridCell};
use delve_logic::layout::Dungeon;
use delve_logic::level::TemplatePool;
use delve_logic::pathfinding::build_path;
use delve_logic::room::RoomHandle;
use delve_logic::scheduler::PathScheduler;
use hecs::World;

use crate::components::{Agent, Pathing, Position};
use crate::grids::CostMapRegistry;

/// Read-only state a pathing pass needs.
pub struct PathingContext<'a> {
    pub dungeon: &'a Dungeon,
    pub pool: &'a TemplatePool,
    pub grids: &'a CostMapRegistry,
    pub scheduler: &'a PathScheduler,
    pub target: Vec2,
    pub target_room: Option<RoomHandle>,
    pub tick: u64,
    pub delta_seconds: f32,
    pub goal_search_radius: i32,
}

/// Run the scheduler for every agent and search for those that are due.
/// Returns the number of searches performed.
pub fn pathing_system(world: &mut World, ctx: &PathingContext) -> usize {
    let mut searches = 0;
    for (_, (pos, agent, pathing)) in world.query_mut::<(&Position, &Agent, &mut Pathing)>() {
        if ctx.target_room != Some(pos.room) {
            pathing.follower.clear();
            continue;
        }
        if !ctx.scheduler.poll(
            &mut pathing.planner,
            ctx.tick,
            ctx.delta_seconds,
            pos.world,
            ctx.target,
        ) {
            continue;
        }
        searches += 1;
        match plan_path(ctx, pos, agent) {
            Some(waypoints) => pathing.follower.replace(waypoints),
            None => pathing.follower.clear(),
        }
    }
    searches
}

fn plan_path(ctx: &PathingContext, pos: &Position, agent: &Agent) -> Option<Vec<Vec2>> {
    let map = ctx.grids.get(pos.room)?;
    let start = map.world_to_cell(pos.world)?;
    let goal = goal_cell(ctx, map, pos.room, agent)?;
    match build_path(map, start, goal) {
        Some(path) => Some(path.waypoints(map)),
        None => {
            log::debug!("agent in room {:?} has no path to {goal:?}", pos.room);
            None
        }
    }
}

fn goal_cell(
    ctx: &PathingContext,
    map: &CostMap,
    room: RoomHandle,
    agent: &Agent,
) -> Option<GridCell> {
    map.world_to_cell(ctx.target)
        .and_then(|goal| map.nearest_walkable(goal, ctx.goal_search_radius))
        .or_else(|| room_spawn_cell(ctx, map, room))
        .or_else(|| map.is_walkable(agent.spawn_cell).then_some(agent.spawn_cell))
}

fn room_spawn_cell(ctx: &PathingContext, map: &CostMap, room: RoomHandle) -> Option<GridCell> {
    let instance = ctx.dungeon.room(room)?;
    let template = ctx.pool.get(&instance.template_id)?;
    template
        .spawn_positions
        .iter()
        .filter_map(|&tile| map.tile_to_cell(instance.template_to_world(tile)))
        .find(|&cell| map.is_walkable(cell))
}
