//! Pure dungeon logic for Delve.
//!
//! This crate contains everything about building and navigating a dungeon
//! that is independent of any engine or runtime. Functions take plain data
//! and return results; all randomness comes from a caller-supplied `Rng`,
//! so a seed reproduces a dungeon exactly.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | Retry budgets, tile penalties, re-plan gating (serde) |
//! | [`constants`] | Default budgets, penalties, step costs, tile symbols |
//! | [`geometry`] | Tile cells, inclusive bounds, orientations, world vectors |
//! | [`graph`] | Designer room graph and its structural validation |
//! | [`grid`] | Per-room static/dynamic cost maps and cell conversions |
//! | [`layout`] | Layout synthesizer with nested retry budgets |
//! | [`level`] | Level data and the template pool |
//! | [`movement`] | Following a path one waypoint at a time |
//! | [`pathfinding`] | 8-connected A* with octile costs |
//! | [`placement`] | Doorway matching and overlap testing |
//! | [`room`] | Room instances and the handle-indexed arena |
//! | [`room_type`] | Room type tags and corridor resolution |
//! | [`scheduler`] | Tick-slot scheduling and re-plan cooldowns |
//! | [`spawn`] | Weighted enemy tables and spawn parameters |
//! | [`template`] | Room templates, doorways, collision layers |
//! | [`validation`] | Level-data and generated-layout checks |

pub mod config;
pub mod constants;
pub mod geometry;
pub mod graph;
pub mod grid;
pub mod layout;
pub mod level;
pub mod movement;
pub mod pathfinding;
pub mod placement;
pub mod room;
pub mod room_type;
pub mod scheduler;
pub mod spawn;
pub mod template;
pub mod validation;
