//! Placed rooms and the arena that owns them.
//!
//! Rooms are stored in a `Vec` and addressed by [`RoomHandle`]; a side map
//! resolves designer [`NodeId`]s to handles.

use std::collections::HashMap;

use rand::Rng;

use crate::geometry::{Bounds, IVec2};
use crate::graph::{NodeId, RoomNode};
use crate::room_type::RoomType;
use crate::template::{Doorway, DoorwayState, RoomTemplate, TemplateId, TileLayer};

/// Index of a room inside a [`RoomArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomHandle(pub u32);

impl RoomHandle {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Runtime state of one room in a generated dungeon.
#[derive(Debug, Clone)]
pub struct RoomInstance {
    pub id: NodeId,
    pub template_id: TemplateId,
    /// Template type, so corridors are `CorridorNS` or `CorridorEW` here.
    pub room_type: RoomType,
    /// Template-space bounds the doorway positions are relative to.
    pub template_bounds: Bounds,
    /// World tile bounds, fixed once the room is positioned.
    pub bounds: Bounds,
    /// Per-instance copy of the template doorways.
    pub doorways: Vec<Doorway>,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub is_positioned: bool,
    pub is_cleared_of_enemies: bool,
    pub is_previously_visited: bool,
    pub enemies_to_spawn: u32,
}

impl RoomInstance {
    /// Unpositioned instance of `template` for graph node `node`. Bounds start
    /// at the template's own coordinates.
    pub fn new(node: &RoomNode, template: &RoomTemplate, parent: Option<NodeId>) -> Self {
        Self {
            id: node.id.clone(),
            template_id: template.id.clone(),
            room_type: template.room_type,
            template_bounds: template.bounds,
            bounds: template.bounds,
            doorways: template.doorways.clone(),
            parent,
            children: node.children.clone(),
            is_positioned: false,
            is_cleared_of_enemies: false,
            is_previously_visited: false,
            enemies_to_spawn: 0,
        }
    }

    /// Roll this room's enemy count for `level`. Rooms that end up with no
    /// enemies are cleared from the start.
    pub fn assign_enemies(&mut self, template: &RoomTemplate, level: &str, rng: &mut impl Rng) {
        self.enemies_to_spawn = if self.room_type.hosts_enemies() {
            template
                .spawn_parameters_for(level)
                .map(|p| p.roll_total(rng))
                .unwrap_or(0)
        } else {
            0
        };
        self.is_cleared_of_enemies = self.enemies_to_spawn == 0;
    }

    /// World tile of a template-space tile.
    pub fn template_to_world(&self, tile: IVec2) -> IVec2 {
        tile - self.template_bounds.lower + self.bounds.lower
    }

    /// World tile of one of this room's doorways.
    pub fn doorway_world(&self, doorway: &Doorway) -> IVec2 {
        self.template_to_world(doorway.position)
    }

    pub fn open_doorways(&self) -> impl Iterator<Item = usize> + '_ {
        self.doorways
            .iter()
            .enumerate()
            .filter(|(_, d)| d.is_available())
            .map(|(i, _)| i)
    }

    pub fn connected_doorways(&self) -> impl Iterator<Item = &Doorway> {
        self.doorways
            .iter()
            .filter(|d| d.state == DoorwayState::Connected)
    }

    /// The template's collision layer with every unconnected doorway walled
    /// off.
    pub fn sealed_collision(&self, template: &RoomTemplate) -> TileLayer {
        let mut layer = template.collision.clone();
        for doorway in self.doorways.iter().filter(|d| !d.is_connected()) {
            layer.seal_doorway(doorway, self.template_bounds.lower);
        }
        layer
    }
}

/// Owner of every room instance of one dungeon.
#[derive(Debug, Clone, Default)]
pub struct RoomArena {
    rooms: Vec<RoomInstance>,
    index: HashMap<NodeId, RoomHandle>,
}

impl RoomArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a room. A room with an id already present replaces it in place.
    pub fn insert(&mut self, room: RoomInstance) -> RoomHandle {
        if let Some(&handle) = self.index.get(&room.id) {
            self.rooms[handle.index()] = room;
            return handle;
        }
        let handle = RoomHandle(self.rooms.len() as u32);
        self.index.insert(room.id.clone(), handle);
        self.rooms.push(room);
        handle
    }

    pub fn get(&self, handle: RoomHandle) -> Option<&RoomInstance> {
        self.rooms.get(handle.index())
    }

    pub fn get_mut(&mut self, handle: RoomHandle) -> Option<&mut RoomInstance> {
        self.rooms.get_mut(handle.index())
    }

    pub fn handle(&self, id: &NodeId) -> Option<RoomHandle> {
        self.index.get(id).copied()
    }

    pub fn by_id(&self, id: &NodeId) -> Option<&RoomInstance> {
        self.handle(id).and_then(|h| self.get(h))
    }

    pub fn iter(&self) -> impl Iterator<Item = (RoomHandle, &RoomInstance)> {
        self.rooms
            .iter()
            .enumerate()
            .map(|(i, r)| (RoomHandle(i as u32), r))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut RoomInstance> {
        self.rooms.iter_mut()
    }

    pub fn positioned(&self) -> impl Iterator<Item = &RoomInstance> {
        self.rooms.iter().filter(|r| r.is_positioned)
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    pub fn clear(&mut self) {
        self.rooms.clear();
        self.index.clear();
    }
}
