//! Systems - logic that operates on components

mod movement;
mod obstacles;
mod pathing;

pub use movement::*;
pub use obstacles::*;
pub use pathing::*;
