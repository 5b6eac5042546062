//! One cost map per placed room, plus dirty tracking for the dynamic layer.

use std::collections::BTreeSet;

use delve_logic::config::GridConfig;
use delve_logic::grid::CostMap;
use delve_logic::layout::Dungeon;
use delve_logic::level::TemplatePool;
use delve_logic::room::RoomHandle;

#[derive(Debug, Clone, Default)]
pub struct CostMapRegistry {
    maps: Vec<CostMap>,
    dirty: BTreeSet<RoomHandle>,
}

impl CostMapRegistry {
    /// Build every room's static map from its sealed collision layer.
    /// Rooms whose template is missing from `pool` get an open grid.
    pub fn build(dungeon: &Dungeon, pool: &TemplatePool, config: &GridConfig) -> Self {
        let maps = dungeon
            .rooms()
            .iter()
            .map(|(_, room)| match pool.get(&room.template_id) {
                Some(template) => {
                    CostMap::build(room.bounds, &room.sealed_collision(template), config)
                }
                None => {
                    log::warn!("room {} has unknown template {}", room.id, room.template_id);
                    CostMap::open(room.bounds, config)
                }
            })
            .collect();
        Self {
            maps,
            dirty: BTreeSet::new(),
        }
    }

    pub fn get(&self, room: RoomHandle) -> Option<&CostMap> {
        self.maps.get(room.index())
    }

    pub fn get_mut(&mut self, room: RoomHandle) -> Option<&mut CostMap> {
        self.maps.get_mut(room.index())
    }

    pub fn len(&self) -> usize {
        self.maps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }

    /// Schedule a dynamic-layer rebuild for `room` before the next search.
    pub fn mark_dirty(&mut self, room: RoomHandle) {
        self.dirty.insert(room);
    }

    pub fn is_dirty(&self, room: RoomHandle) -> bool {
        self.dirty.contains(&room)
    }

    /// Dirty rooms in handle order; clears the set.
    pub fn take_dirty(&mut self) -> Vec<RoomHandle> {
        std::mem::take(&mut self.dirty).into_iter().collect()
    }
}
