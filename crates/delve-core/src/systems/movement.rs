//! Movement system - walks agents along their current paths

use hecs::World;

use crate::components::{Agent, Pathing, Position};

/// Advance every agent with a path by `delta_seconds`.
/// Returns the number of agents that moved.
pub fn movement_system(world: &mut World, delta_seconds: f32, stop_distance: f32) -> usize {
    let mut moving = 0;
    for (_, (pos, agent, pathing)) in world.query_mut::<(&mut Position, &Agent, &mut Pathing)>() {
        if pathing.follower.is_idle() {
            continue;
        }
        pos.world = pathing
            .follower
            .advance(pos.world, agent.profile.speed, delta_seconds, stop_distance);
        moving += 1;
    }
    moving
}
