//! Layout synthesis: turns a room graph into non-overlapping placed rooms.
//!
//! # Algorithm
//!
//! 1. Pick a graph from the level at random.
//! 2. Traverse it breadth-first from the entrance. Each non-entrance node
//!    picks a random open doorway on its parent, a random template of its
//!    type (corridors by the doorway's axis), and tries to place it there.
//!    An overlap marks that parent doorway unavailable and the node tries
//!    again; a parent with no open doorways fails the whole traversal.
//! 3. A failed traversal is discarded and repeated, up to
//!    `max_rebuild_attempts_per_graph` times, before a new graph is picked.
//!    Generation gives up after `max_build_attempts` graph picks.
//!
//! Only a fully placed dungeon is ever returned.

use std::collections::VecDeque;

use rand::Rng;
use thiserror::Error;

use crate::config::LayoutConfig;
use crate::geometry::IVec2;
use crate::graph::{NodeId, RoomGraph, RoomNode};
use crate::level::{DungeonLevel, TemplatePool};
use crate::placement::{place_room, Placement};
use crate::room::{RoomArena, RoomHandle, RoomInstance};
use crate::room_type::RoomType;
use crate::template::DoorwayStateError;

/// Generation failed for good.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("level offers no room graphs")]
    NoGraphs,
    #[error("room graph {graph} has no entrance node")]
    NoEntrance { graph: String },
    #[error("no layout found after {attempts} traversals")]
    BudgetExhausted { attempts: u32 },
}

/// Why one traversal failed. Resolved by retrying.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttemptError {
    #[error("parent of {0} has not been placed")]
    MissingParent(NodeId),
    #[error("parent of {0} has no open doorways left")]
    DoorwaysExhausted(NodeId),
    #[error("no template for room type {room_type}")]
    NoTemplate { room_type: RoomType },
    #[error(transparent)]
    Doorway(#[from] DoorwayStateError),
}

/// A successfully generated dungeon.
#[derive(Debug, Clone)]
pub struct Dungeon {
    pub level_name: String,
    pub graph_name: String,
    rooms: RoomArena,
    entrance: RoomHandle,
    /// Traversals used, counting the successful one.
    pub attempts: u32,
}

impl Dungeon {
    pub fn rooms(&self) -> &RoomArena {
        &self.rooms
    }

    pub fn entrance(&self) -> RoomHandle {
        self.entrance
    }

    pub fn room(&self, handle: RoomHandle) -> Option<&RoomInstance> {
        self.rooms.get(handle)
    }

    pub fn room_mut(&mut self, handle: RoomHandle) -> Option<&mut RoomInstance> {
        self.rooms.get_mut(handle)
    }

    pub fn handle(&self, id: &NodeId) -> Option<RoomHandle> {
        self.rooms.handle(id)
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Room whose world bounds contain `tile`.
    pub fn room_at(&self, tile: IVec2) -> Option<RoomHandle> {
        self.rooms
            .iter()
            .find(|(_, r)| r.bounds.contains(tile))
            .map(|(h, _)| h)
    }
}

/// Builds dungeons within fixed retry budgets.
#[derive(Debug, Clone, Default)]
pub struct LayoutSynthesizer {
    config: LayoutConfig,
}

impl LayoutSynthesizer {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Generate a dungeon for `level`.
    pub fn generate_level(
        &self,
        level: &DungeonLevel,
        rng: &mut impl Rng,
    ) -> Result<Dungeon, LayoutError> {
        let pool = TemplatePool::new(&level.templates);
        self.generate(&level.name, &level.graphs, &pool, rng)
    }

    /// Generate a dungeon from one of `graphs` using templates from `pool`.
    /// `level_name` selects per-level spawn data.
    pub fn generate(
        &self,
        level_name: &str,
        graphs: &[RoomGraph],
        pool: &TemplatePool,
        rng: &mut impl Rng,
    ) -> Result<Dungeon, LayoutError> {
        if graphs.is_empty() {
            return Err(LayoutError::NoGraphs);
        }
        let mut attempts = 0u32;
        for _ in 0..self.config.max_build_attempts {
            let graph = &graphs[rng.gen_range(0..graphs.len())];
            log::debug!("building dungeon from graph {}", graph.name);
            let Some(entrance) = graph.entrance() else {
                log::warn!("room graph {} has no entrance node", graph.name);
                return Err(LayoutError::NoEntrance {
                    graph: graph.name.clone(),
                });
            };

            for _ in 0..self.config.max_rebuild_attempts_per_graph {
                attempts += 1;
                match self.traverse(graph, entrance, pool, rng) {
                    Ok((mut rooms, entrance)) => {
                        assign_spawns(&mut rooms, pool, level_name, rng);
                        log::info!(
                            "dungeon built from graph {}: {} rooms in {} attempts",
                            graph.name,
                            rooms.len(),
                            attempts
                        );
                        return Ok(Dungeon {
                            level_name: level_name.to_string(),
                            graph_name: graph.name.clone(),
                            rooms,
                            entrance,
                            attempts,
                        });
                    }
                    Err(err @ AttemptError::NoTemplate { .. }) => log::warn!("{err}"),
                    Err(err) => log::trace!("layout attempt {attempts} failed: {err}"),
                }
            }
            log::warn!(
                "graph {} exhausted {} rebuild attempts",
                graph.name,
                self.config.max_rebuild_attempts_per_graph
            );
        }
        Err(LayoutError::BudgetExhausted { attempts })
    }

    /// One breadth-first placement pass. The arena is local, so a failed
    /// pass leaves nothing behind.
    fn traverse(
        &self,
        graph: &RoomGraph,
        entrance: &RoomNode,
        pool: &TemplatePool,
        rng: &mut impl Rng,
    ) -> Result<(RoomArena, RoomHandle), AttemptError> {
        let mut rooms = RoomArena::new();
        let template = pool
            .random_of_type(RoomType::Entrance, rng)
            .ok_or(AttemptError::NoTemplate {
                room_type: RoomType::Entrance,
            })?;
        let mut room = RoomInstance::new(entrance, template, None);
        room.is_positioned = true;
        room.is_previously_visited = true;
        let entrance_handle = rooms.insert(room);

        let mut queue: VecDeque<&RoomNode> = graph.children(entrance).collect();
        while let Some(node) = queue.pop_front() {
            place_node(&mut rooms, node, pool, rng)?;
            queue.extend(graph.children(node));
        }
        Ok((rooms, entrance_handle))
    }
}

/// Place one non-entrance node against its already placed parent.
fn place_node(
    rooms: &mut RoomArena,
    node: &RoomNode,
    pool: &TemplatePool,
    rng: &mut impl Rng,
) -> Result<(), AttemptError> {
    let parent_id = node
        .parents
        .first()
        .ok_or_else(|| AttemptError::MissingParent(node.id.clone()))?;
    let parent = rooms
        .handle(parent_id)
        .ok_or_else(|| AttemptError::MissingParent(node.id.clone()))?;

    loop {
        let parent_room = rooms
            .get(parent)
            .ok_or_else(|| AttemptError::MissingParent(node.id.clone()))?;
        let open: Vec<usize> = parent_room.open_doorways().collect();
        if open.is_empty() {
            return Err(AttemptError::DoorwaysExhausted(node.id.clone()));
        }
        let doorway = open[rng.gen_range(0..open.len())];
        let orientation = parent_room.doorways[doorway].orientation;

        let room_type = node.room_type.template_type_for(orientation);
        let template = pool
            .random_of_type(room_type, rng)
            .ok_or(AttemptError::NoTemplate { room_type })?;

        let mut child = RoomInstance::new(node, template, Some(parent_id.clone()));
        match place_room(rooms, parent, doorway, &mut child)? {
            Placement::Placed => {
                child.is_positioned = true;
                rooms.insert(child);
                return Ok(());
            }
            Placement::Overlaps => {
                if let Some(parent_room) = rooms.get_mut(parent) {
                    parent_room.doorways[doorway].mark_unavailable()?;
                }
            }
            Placement::NoMatchingDoorway => {
                log::warn!(
                    "template {} has no {:?} doorway to meet room {}",
                    template.id,
                    orientation.opposite(),
                    parent_id
                );
                if let Some(parent_room) = rooms.get_mut(parent) {
                    parent_room.doorways[doorway].mark_unavailable()?;
                }
            }
        }
    }
}

fn assign_spawns(rooms: &mut RoomArena, pool: &TemplatePool, level: &str, rng: &mut impl Rng) {
    for room in rooms.iter_mut() {
        if let Some(template) = pool.get(&room.template_id) {
            room.assign_enemies(template, level, rng);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Orientation;
    use crate::template::RoomTemplate;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn four_way(id: &str, room_type: RoomType) -> RoomTemplate {
        RoomTemplate::new(id, room_type, IVec2::ZERO, IVec2::new(8, 8))
            .with_doorway(Orientation::North, IVec2::new(4, 8))
            .with_doorway(Orientation::East, IVec2::new(8, 4))
            .with_doorway(Orientation::South, IVec2::new(4, 0))
            .with_doorway(Orientation::West, IVec2::new(0, 4))
    }

    fn pool() -> TemplatePool {
        TemplatePool::new(&[
            four_way("entrance", RoomType::Entrance),
            four_way("room", RoomType::Normal),
            four_way("boss", RoomType::Boss),
            RoomTemplate::new("ns", RoomType::CorridorNS, IVec2::ZERO, IVec2::new(4, 6))
                .with_doorway(Orientation::North, IVec2::new(2, 6))
                .with_doorway(Orientation::South, IVec2::new(2, 0)),
            RoomTemplate::new("ew", RoomType::CorridorEW, IVec2::ZERO, IVec2::new(6, 4))
                .with_doorway(Orientation::East, IVec2::new(6, 2))
                .with_doorway(Orientation::West, IVec2::new(0, 2)),
        ])
    }

    fn star() -> RoomGraph {
        RoomGraph::new("star")
            .with_node("e", RoomType::Entrance)
            .with_node("c1", RoomType::Corridor)
            .with_node("c2", RoomType::Corridor)
            .with_node("c3", RoomType::Corridor)
            .with_node("r1", RoomType::Normal)
            .with_node("r2", RoomType::Normal)
            .with_node("b", RoomType::Boss)
            .with_edge("e", "c1")
            .with_edge("e", "c2")
            .with_edge("e", "c3")
            .with_edge("c1", "r1")
            .with_edge("c2", "r2")
            .with_edge("c3", "b")
    }

    #[test]
    fn star_graph_builds() {
        let synth = LayoutSynthesizer::default();
        let mut rng = StdRng::seed_from_u64(11);
        let dungeon = synth.generate("l1", &[star()], &pool(), &mut rng).unwrap();
        assert_eq!(dungeon.len(), 7);
        assert_eq!(dungeon.graph_name, "star");
        let entrance = dungeon.room(dungeon.entrance()).unwrap();
        assert_eq!(entrance.id, NodeId::new("e"));
        assert!(entrance.is_previously_visited);
        for (_, room) in dungeon.rooms().iter() {
            assert!(room.is_positioned);
        }
    }

    #[test]
    fn corridors_follow_doorway_axis() {
        let synth = LayoutSynthesizer::default();
        let mut rng = StdRng::seed_from_u64(5);
        let dungeon = synth.generate("l1", &[star()], &pool(), &mut rng).unwrap();
        for (_, room) in dungeon.rooms().iter() {
            let Some(parent) = room.parent.as_ref().and_then(|p| dungeon.rooms().by_id(p)) else {
                continue;
            };
            if room.room_type.is_corridor() {
                let vertical = room.room_type == RoomType::CorridorNS;
                let door = room.connected_doorways().next().unwrap();
                assert_eq!(door.orientation.is_vertical(), vertical);
                assert!(parent.room_type.is_room());
            }
        }
    }

    #[test]
    fn same_seed_same_dungeon() {
        let synth = LayoutSynthesizer::default();
        let a = synth
            .generate("l1", &[star()], &pool(), &mut StdRng::seed_from_u64(99))
            .unwrap();
        let b = synth
            .generate("l1", &[star()], &pool(), &mut StdRng::seed_from_u64(99))
            .unwrap();
        let bounds = |d: &Dungeon| d.rooms().iter().map(|(_, r)| r.bounds).collect::<Vec<_>>();
        assert_eq!(bounds(&a), bounds(&b));
    }

    #[test]
    fn no_graphs() {
        let mut rng = StdRng::seed_from_u64(0);
        let err = LayoutSynthesizer::default()
            .generate("l1", &[], &pool(), &mut rng)
            .unwrap_err();
        assert_eq!(err, LayoutError::NoGraphs);
    }

    #[test]
    fn missing_entrance_fails_immediately() {
        let graph = RoomGraph::new("headless").with_node("r", RoomType::Normal);
        let mut rng = StdRng::seed_from_u64(0);
        let err = LayoutSynthesizer::default()
            .generate("l1", &[graph], &pool(), &mut rng)
            .unwrap_err();
        assert_eq!(
            err,
            LayoutError::NoEntrance {
                graph: "headless".into()
            }
        );
    }

    #[test]
    fn unmatched_doorway_is_logged() {
        use std::sync::Mutex;

        static WARNINGS: Mutex<Vec<String>> = Mutex::new(Vec::new());
        struct Warnings;
        impl log::Log for Warnings {
            fn enabled(&self, metadata: &log::Metadata) -> bool {
                metadata.level() <= log::Level::Warn
            }
            fn log(&self, record: &log::Record) {
                if self.enabled(record.metadata()) {
                    if let Ok(mut warnings) = WARNINGS.lock() {
                        warnings.push(record.args().to_string());
                    }
                }
            }
            fn flush(&self) {}
        }
        static LOGGER: Warnings = Warnings;
        let _ = log::set_logger(&LOGGER);
        log::set_max_level(log::LevelFilter::Warn);

        // The only normal room has no doorways at all.
        let graph = RoomGraph::new("g")
            .with_node("e", RoomType::Entrance)
            .with_node("c", RoomType::Corridor)
            .with_node("r", RoomType::Normal)
            .with_edge("e", "c")
            .with_edge("c", "r");
        let pool = TemplatePool::new(&[
            four_way("entrance", RoomType::Entrance),
            RoomTemplate::new("dead_end", RoomType::Normal, IVec2::ZERO, IVec2::new(4, 4)),
            RoomTemplate::new("ns", RoomType::CorridorNS, IVec2::ZERO, IVec2::new(4, 6))
                .with_doorway(Orientation::North, IVec2::new(2, 6))
                .with_doorway(Orientation::South, IVec2::new(2, 0)),
            RoomTemplate::new("ew", RoomType::CorridorEW, IVec2::ZERO, IVec2::new(6, 4))
                .with_doorway(Orientation::East, IVec2::new(6, 2))
                .with_doorway(Orientation::West, IVec2::new(0, 2)),
        ]);
        let synth = LayoutSynthesizer::new(LayoutConfig {
            max_build_attempts: 1,
            max_rebuild_attempts_per_graph: 4,
        });
        let mut rng = StdRng::seed_from_u64(0);
        let err = synth.generate("l1", &[graph], &pool, &mut rng).unwrap_err();
        assert_eq!(err, LayoutError::BudgetExhausted { attempts: 4 });

        let warnings = WARNINGS.lock().unwrap();
        assert!(
            warnings
                .iter()
                .any(|w| w.starts_with("template dead_end has no") && w.ends_with("to meet room c")),
            "{warnings:?}"
        );
    }

    #[test]
    fn missing_template_exhausts_budget() {
        let graph = RoomGraph::new("g")
            .with_node("e", RoomType::Entrance)
            .with_node("c", RoomType::Corridor)
            .with_node("b", RoomType::Boss)
            .with_edge("e", "c")
            .with_edge("c", "b");
        let pool = TemplatePool::new(&[
            four_way("entrance", RoomType::Entrance),
            RoomTemplate::new("ns", RoomType::CorridorNS, IVec2::ZERO, IVec2::new(4, 6))
                .with_doorway(Orientation::North, IVec2::new(2, 6))
                .with_doorway(Orientation::South, IVec2::new(2, 0)),
            RoomTemplate::new("ew", RoomType::CorridorEW, IVec2::ZERO, IVec2::new(6, 4))
                .with_doorway(Orientation::East, IVec2::new(6, 2))
                .with_doorway(Orientation::West, IVec2::new(0, 2)),
        ]);
        let synth = LayoutSynthesizer::new(LayoutConfig {
            max_build_attempts: 2,
            max_rebuild_attempts_per_graph: 3,
        });
        let mut rng = StdRng::seed_from_u64(0);
        let err = synth.generate("l1", &[graph], &pool, &mut rng).unwrap_err();
        assert_eq!(err, LayoutError::BudgetExhausted { attempts: 6 });
    }

    #[test]
    fn crowded_parent_runs_out_of_doorways() {
        // Four corridors off an entrance with only two doorways.
        let entrance = RoomTemplate::new("e", RoomType::Entrance, IVec2::ZERO, IVec2::new(8, 8))
            .with_doorway(Orientation::North, IVec2::new(4, 8))
            .with_doorway(Orientation::South, IVec2::new(4, 0));
        let mut pool_templates = vec![entrance];
        pool_templates.extend(pool().of_type(RoomType::CorridorNS).cloned());
        let pool = TemplatePool::new(&pool_templates);
        let mut graph = RoomGraph::new("g").with_node("e", RoomType::Entrance);
        for c in ["c1", "c2", "c3"] {
            graph = graph.with_node(c, RoomType::Corridor).with_edge("e", c);
        }
        let synth = LayoutSynthesizer::new(LayoutConfig {
            max_build_attempts: 1,
            max_rebuild_attempts_per_graph: 5,
        });
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(
            synth.generate("l1", &[graph], &pool, &mut rng).unwrap_err(),
            LayoutError::BudgetExhausted { attempts: 5 }
        );
    }
}
