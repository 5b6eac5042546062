//! Obstacle system - rebuilds dynamic cost layers for rooms whose props moved

use delve_logic::geometry::Bounds;
use hecs::World;

use crate::components::MovableProp;
use crate::grids::CostMapRegistry;

/// Rebuild the dynamic layer of every dirty room from its props.
/// Returns the number of rooms rebuilt.
pub fn obstacle_system(world: &World, grids: &mut CostMapRegistry) -> usize {
    let dirty = grids.take_dirty();
    for &room in &dirty {
        let props: Vec<Bounds> = world
            .query::<&MovableProp>()
            .iter()
            .filter(|(_, prop)| prop.room == room)
            .map(|(_, prop)| prop.bounds)
            .collect();
        if let Some(map) = grids.get_mut(room) {
            map.rebuild_dynamic(&props);
        }
    }
    dirty.len()
}
