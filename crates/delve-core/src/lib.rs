//! Delve Core - dungeon simulation engine
//!
//! An ECS-based simulation of roaming agents inside a procedurally
//! generated dungeon. The dungeon itself comes from `delve-logic`; this
//! crate owns it at runtime together with one cost map per room.
//!
//! # Architecture
//!
//! The simulation uses an Entity Component System (ECS) architecture via `hecs`:
//! - **Entities**: Agents (enemies) and movable props
//! - **Components**: Pure data attached to entities (Position, Agent, Pathing, MovableProp)
//! - **Systems**: Logic that queries and updates components
//!
//! Every tick runs, in order: obstacle rebuild for rooms whose props
//! moved, slot-scheduled path re-plans, then movement along the paths.
//!
//! # Example
//!
//! ```rust,no_run
//! use delve_core::prelude::*;
//! use rand::SeedableRng;
//!
//! let json = std::fs::read_to_string("data/levels.json").unwrap();
//! let file = LevelFile::from_json(&json).unwrap();
//! let mut engine = DungeonEngine::new(file.config.clone());
//! let mut rng = rand::rngs::StdRng::seed_from_u64(7);
//! engine.load_level(&file.levels[0], &mut rng).unwrap();
//!
//! loop {
//!     engine.update(1.0 / 60.0); // 60 FPS
//! }
//! ```

pub mod components;
pub mod data;
pub mod engine;
pub mod grids;
pub mod systems;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::components::*;
    pub use crate::data::{ConfigError, LevelFile};
    pub use crate::engine::{DungeonEngine, EngineError, TickStats};
}
