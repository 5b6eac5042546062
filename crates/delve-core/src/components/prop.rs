//! Movable props that block pathing while they sit on a cell.

use delve_logic::geometry::{Bounds, IVec2};
use delve_logic::room::RoomHandle;

/// A movable obstacle covering `bounds` (inclusive world tiles).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MovableProp {
    pub room: RoomHandle,
    pub bounds: Bounds,
}

impl MovableProp {
    pub fn new(room: RoomHandle, lower: IVec2, upper: IVec2) -> Self {
        Self {
            room,
            bounds: Bounds::new(lower, upper),
        }
    }

    /// Shift by `delta` tiles.
    pub fn translate(&mut self, delta: IVec2) {
        self.bounds = self.bounds.moved_to(self.bounds.lower + delta);
    }
}
