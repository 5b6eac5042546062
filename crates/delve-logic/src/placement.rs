//! Doorway matching: positions a child room against an open doorway of its
//! parent and tests the result against every room already placed.

use crate::geometry::Bounds;
use crate::room::{RoomArena, RoomHandle, RoomInstance};
use crate::template::DoorwayStateError;

/// Outcome of one placement attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Child positioned and both doorways connected.
    Placed,
    /// Child would overlap an already positioned room.
    Overlaps,
    /// Child has no doorway facing back at the parent's.
    NoMatchingDoorway,
}

/// Try to attach `child` to doorway `doorway` of `parent`.
///
/// On [`Placement::Placed`] the child's bounds are committed and both
/// doorways are connected; the caller still has to insert the child into
/// the arena. On any other outcome nothing is changed and the caller
/// decides what to do with the parent doorway.
pub fn place_room(
    arena: &mut RoomArena,
    parent: RoomHandle,
    doorway: usize,
    child: &mut RoomInstance,
) -> Result<Placement, DoorwayStateError> {
    let Some(parent_room) = arena.get(parent) else {
        return Ok(Placement::NoMatchingDoorway);
    };
    let Some(parent_door) = parent_room.doorways.get(doorway) else {
        return Ok(Placement::NoMatchingDoorway);
    };

    let wanted = parent_door.orientation.opposite();
    let Some(child_door_idx) = child
        .doorways
        .iter()
        .position(|d| d.orientation == wanted)
    else {
        return Ok(Placement::NoMatchingDoorway);
    };
    let child_door = &child.doorways[child_door_idx];

    let parent_world = parent_room.doorway_world(parent_door);
    let lower = parent_world + child_door.orientation.placement_offset()
        - (child_door.position - child.template_bounds.lower);
    let candidate = child.template_bounds.moved_to(lower);

    if overlaps_any(arena, &candidate, child) {
        return Ok(Placement::Overlaps);
    }

    child.bounds = candidate;
    child.doorways[child_door_idx].connect()?;
    if let Some(parent_room) = arena.get_mut(parent) {
        parent_room.doorways[doorway].connect()?;
    }
    Ok(Placement::Placed)
}

/// Whether `bounds` overlaps any positioned room other than `except`.
pub fn overlaps_any(arena: &RoomArena, bounds: &Bounds, except: &RoomInstance) -> bool {
    arena
        .positioned()
        .filter(|r| r.id != except.id)
        .any(|r| r.bounds.overlaps(bounds))
}
