//! Components shared by every entity that lives in a room.

use delve_logic::geometry::Vec2;
use delve_logic::room::RoomHandle;

/// Where an entity is: world position plus the room it belongs to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub world: Vec2,
    pub room: RoomHandle,
}

impl Position {
    pub fn new(world: Vec2, room: RoomHandle) -> Self {
        Self { world, room }
    }
}

/// Display name / kind tag, as used by the spawn tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Name(pub String);
