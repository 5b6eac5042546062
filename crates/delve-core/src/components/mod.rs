//! Component definitions for the ECS simulation.
//!
//! Components are pure data structs attached to entities.
//! They have no behavior - that lives in systems.

mod agent;
mod common;
mod prop;

pub use agent::*;
pub use common::*;
pub use prop::*;
