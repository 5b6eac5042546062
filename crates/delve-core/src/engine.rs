//! Dungeon engine - owns a generated dungeon and runs its agents

use std::collections::{HashMap, VecDeque};

use delve_logic::config::DungeonConfig;
use delve_logic::geometry::{IVec2, Vec2};
use delve_logic::grid::{CostMap, GridCell};
use delve_logic::layout::{Dungeon, LayoutError, LayoutSynthesizer};
use delve_logic::level::{DungeonLevel, TemplatePool};
use delve_logic::room::RoomHandle;
use delve_logic::room_type::RoomType;
use delve_logic::scheduler::PathScheduler;
use hecs::{Entity, World};
use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

use crate::components::*;
use crate::grids::CostMapRegistry;
use crate::systems::*;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error("no dungeon is loaded")]
    NoDungeon,
    #[error("room {0:?} does not exist")]
    UnknownRoom(RoomHandle),
    #[error("cell {cell:?} is outside room {room:?}")]
    CellOutsideRoom { room: RoomHandle, cell: GridCell },
    #[error(transparent)]
    NoSuchEntity(#[from] hecs::NoSuchEntity),
    #[error(transparent)]
    Component(#[from] hecs::ComponentError),
}

/// What one call to [`DungeonEngine::update`] did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickStats {
    pub tick: u64,
    pub enemy_spawns: usize,
    pub searches: usize,
    pub moving_agents: usize,
    pub obstacle_rebuilds: usize,
}

/// An enemy waiting to enter its room.
#[derive(Debug, Clone)]
struct PendingSpawn {
    cell: GridCell,
    kind: String,
    /// Seconds before the next enemy may follow.
    interval: f32,
}

/// Enemy bookkeeping for one room. Queued enemies leave one at a time,
/// `timer` seconds apart, while fewer than `max_concurrent` are alive.
#[derive(Debug, Clone, Default)]
struct RoomSpawns {
    started: bool,
    queue: VecDeque<PendingSpawn>,
    max_concurrent: u32,
    timer: f32,
    alive: u32,
}

impl RoomSpawns {
    fn next_due(&mut self) -> Option<PendingSpawn> {
        if self.timer > 0.0 || self.alive >= self.max_concurrent {
            return None;
        }
        let next = self.queue.pop_front()?;
        self.alive += 1;
        self.timer = next.interval;
        Some(next)
    }

    fn is_done(&self) -> bool {
        self.alive == 0 && self.queue.is_empty()
    }
}

/// A generated dungeon with its templates and cost maps.
struct LoadedDungeon {
    dungeon: Dungeon,
    pool: TemplatePool,
    grids: CostMapRegistry,
    spawns: Vec<RoomSpawns>,
}

/// Main simulation engine
pub struct DungeonEngine {
    /// ECS world containing agents and props
    pub world: World,
    config: DungeonConfig,
    synthesizer: LayoutSynthesizer,
    scheduler: PathScheduler,
    profiles: HashMap<String, AgentProfile>,
    loaded: Option<LoadedDungeon>,
    target: Vec2,
    target_room: Option<RoomHandle>,
    tick: u64,
    last_stats: TickStats,
}

impl DungeonEngine {
    pub fn new(config: DungeonConfig) -> Self {
        Self {
            world: World::new(),
            synthesizer: LayoutSynthesizer::new(config.layout.clone()),
            scheduler: PathScheduler::new(config.scheduler.clone()),
            config,
            profiles: HashMap::new(),
            loaded: None,
            target: Vec2::ZERO,
            target_room: None,
            tick: 0,
            last_stats: TickStats::default(),
        }
    }

    /// Movement profile used for agents of `kind`.
    pub fn with_profile(mut self, kind: &str, profile: AgentProfile) -> Self {
        self.profiles.insert(kind.to_string(), profile);
        self
    }

    pub fn with_profiles(mut self, profiles: HashMap<String, AgentProfile>) -> Self {
        self.profiles.extend(profiles);
        self
    }

    /// Generate a dungeon for `level` and build its cost maps. Replaces any
    /// previous dungeon together with every agent and prop.
    pub fn load_level(&mut self, level: &DungeonLevel, rng: &mut impl Rng) -> Result<(), EngineError> {
        let pool = TemplatePool::new(&level.templates);
        let dungeon = self
            .synthesizer
            .generate(&level.name, &level.graphs, &pool, rng)?;
        let grids = CostMapRegistry::build(&dungeon, &pool, &self.config.grid);
        log::info!(
            "level {} loaded: {} rooms from graph {}",
            level.name,
            dungeon.len(),
            dungeon.graph_name
        );

        self.world.clear();
        self.scheduler = PathScheduler::new(self.config.scheduler.clone());
        self.tick = 0;
        self.last_stats = TickStats::default();
        self.target_room = None;
        self.loaded = Some(LoadedDungeon {
            spawns: vec![RoomSpawns::default(); dungeon.len()],
            dungeon,
            pool,
            grids,
        });
        Ok(())
    }

    fn loaded(&self) -> Result<&LoadedDungeon, EngineError> {
        self.loaded.as_ref().ok_or(EngineError::NoDungeon)
    }

    fn loaded_mut(&mut self) -> Result<&mut LoadedDungeon, EngineError> {
        self.loaded.as_mut().ok_or(EngineError::NoDungeon)
    }

    // ── Target ──────────────────────────────────────────────────────────

    /// Move the tracked target. Its room is the room whose bounds contain
    /// the target's tile.
    pub fn set_target(&mut self, position: Vec2) {
        self.target = position;
        let size = self.config.grid.tile_size;
        let tile = IVec2::new(
            (position.x / size).floor() as i32,
            (position.y / size).floor() as i32,
        );
        self.target_room = self
            .loaded
            .as_ref()
            .and_then(|l| l.dungeon.room_at(tile));
    }

    pub fn target(&self) -> Vec2 {
        self.target
    }

    pub fn target_room(&self) -> Option<RoomHandle> {
        self.target_room
    }

    // ── Agents ──────────────────────────────────────────────────────────

    /// Spawn an agent of `kind` at the centre of `cell` in `room`'s grid.
    pub fn spawn_agent(
        &mut self,
        room: RoomHandle,
        cell: GridCell,
        kind: &str,
    ) -> Result<Entity, EngineError> {
        let map = self
            .loaded()?
            .grids
            .get(room)
            .ok_or(EngineError::UnknownRoom(room))?;
        if !map.in_bounds(cell) {
            return Err(EngineError::CellOutsideRoom { room, cell });
        }
        let world_pos = map.cell_center(cell);
        let profile = self.profiles.get(kind).copied().unwrap_or_default();
        let planner = self.scheduler.spawn_planner(profile.chase_distance);
        log::debug!("spawned {kind} in room {room:?} at {cell:?}, slot {}", planner.slot());
        Ok(self.world.spawn((
            Position::new(world_pos, room),
            Agent {
                profile,
                spawn_cell: cell,
            },
            Pathing::new(planner),
            Name(kind.to_string()),
        )))
    }

    /// Mark `room` visited and queue its enemies, once. Returns the enemies
    /// spawned straight away; the rest follow from [`update`](Self::update).
    /// Corridors, the entrance and cleared rooms never spawn anything.
    pub fn enter_room(
        &mut self,
        room: RoomHandle,
        rng: &mut impl Rng,
    ) -> Result<Vec<Entity>, EngineError> {
        let loaded = self.loaded_mut()?;
        let level = loaded.dungeon.level_name.clone();
        let instance = loaded
            .dungeon
            .room_mut(room)
            .ok_or(EngineError::UnknownRoom(room))?;
        instance.is_previously_visited = true;
        if instance.room_type.is_corridor()
            || instance.room_type == RoomType::Entrance
            || instance.is_cleared_of_enemies
            || loaded.spawns[room.index()].started
        {
            return Ok(Vec::new());
        }

        let count = instance.enemies_to_spawn;
        let instance = &*instance;
        let (queue, max_concurrent) = match (
            loaded.pool.get(&instance.template_id),
            loaded.grids.get(room),
        ) {
            (Some(template), Some(map)) => {
                let cells: Vec<GridCell> = template
                    .spawn_positions
                    .iter()
                    .filter_map(|&tile| map.tile_to_cell(instance.template_to_world(tile)))
                    .collect();
                let table = template.enemies_for(&level).map(|e| e.table());
                let params = template.spawn_parameters_for(&level);
                let queue: VecDeque<PendingSpawn> = (0..count)
                    .filter_map(|_| {
                        let cell = *cells.choose(rng)?;
                        let kind = table.as_ref()?.pick(rng)?.to_string();
                        let interval = params.map_or(0.0, |p| p.roll_interval(rng));
                        Some(PendingSpawn { cell, kind, interval })
                    })
                    .collect();
                let cap = params.map_or(count, |p| p.roll_concurrent(rng));
                (queue, cap.max(1))
            }
            _ => (VecDeque::new(), 0),
        };
        if queue.is_empty() {
            log::warn!("room {} has {count} enemies but nothing to spawn", instance.id);
            instance_cleared(loaded, room);
            return Ok(Vec::new());
        }
        log::info!(
            "room {room:?} spawning {} enemies, at most {max_concurrent} at once",
            queue.len()
        );
        loaded.spawns[room.index()] = RoomSpawns {
            started: true,
            queue,
            max_concurrent,
            timer: 0.0,
            alive: 0,
        };
        self.release_spawns(room)
    }

    /// Spawn every queued enemy of `room` that is due now.
    fn release_spawns(&mut self, room: RoomHandle) -> Result<Vec<Entity>, EngineError> {
        let mut spawned = Vec::new();
        loop {
            let next = self
                .loaded_mut()?
                .spawns
                .get_mut(room.index())
                .and_then(RoomSpawns::next_due);
            let Some(next) = next else {
                break;
            };
            let entity = self.spawn_agent(room, next.cell, &next.kind)?;
            self.world.insert_one(entity, RoomEnemy)?;
            spawned.push(entity);
        }
        Ok(spawned)
    }

    /// Count down spawn timers and release due enemies in every room.
    fn spawn_system(&mut self, delta_seconds: f32) -> usize {
        let Some(loaded) = self.loaded.as_mut() else {
            return 0;
        };
        let mut waiting = Vec::new();
        for (index, spawns) in loaded.spawns.iter_mut().enumerate() {
            if !spawns.queue.is_empty() {
                spawns.timer = (spawns.timer - delta_seconds).max(0.0);
                waiting.push(RoomHandle(index as u32));
            }
        }
        let mut count = 0;
        for room in waiting {
            match self.release_spawns(room) {
                Ok(spawned) => count += spawned.len(),
                Err(e) => log::warn!("room {room:?} failed to spawn an enemy: {e}"),
            }
        }
        count
    }

    /// Remove an agent. A room is cleared once its queue is empty and its
    /// last spawned enemy goes.
    pub fn defeat_agent(&mut self, entity: Entity) -> Result<(), EngineError> {
        let room = self.world.get::<&Position>(entity)?.room;
        let was_enemy = self.world.get::<&RoomEnemy>(entity).is_ok();
        self.world.despawn(entity)?;
        if !was_enemy {
            return Ok(());
        }
        let loaded = self.loaded_mut()?;
        let Some(spawns) = loaded.spawns.get_mut(room.index()) else {
            return Err(EngineError::UnknownRoom(room));
        };
        spawns.alive = spawns.alive.saturating_sub(1);
        if spawns.is_done() {
            instance_cleared(loaded, room);
            log::info!("room {room:?} cleared");
        }
        Ok(())
    }

    // ── Props ───────────────────────────────────────────────────────────

    /// Place a movable prop covering world tiles `lower..=upper`.
    pub fn spawn_prop(
        &mut self,
        room: RoomHandle,
        lower: IVec2,
        upper: IVec2,
    ) -> Result<Entity, EngineError> {
        let loaded = self.loaded_mut()?;
        if loaded.grids.get(room).is_none() {
            return Err(EngineError::UnknownRoom(room));
        }
        loaded.grids.mark_dirty(room);
        Ok(self.world.spawn((MovableProp::new(room, lower, upper),)))
    }

    /// Shift a prop by `delta` tiles. Its room's overlay is rebuilt on the
    /// next update.
    pub fn move_prop(&mut self, entity: Entity, delta: IVec2) -> Result<(), EngineError> {
        let room = {
            let mut prop = self.world.get::<&mut MovableProp>(entity)?;
            prop.translate(delta);
            prop.room
        };
        self.loaded_mut()?.grids.mark_dirty(room);
        Ok(())
    }

    pub fn remove_prop(&mut self, entity: Entity) -> Result<(), EngineError> {
        let room = self.world.get::<&MovableProp>(entity)?.room;
        self.world.despawn(entity)?;
        self.loaded_mut()?.grids.mark_dirty(room);
        Ok(())
    }

    // ── Tick ────────────────────────────────────────────────────────────

    /// Advance the simulation by one tick of `delta_seconds`.
    pub fn update(&mut self, delta_seconds: f32) -> TickStats {
        let mut stats = TickStats {
            tick: self.tick,
            ..TickStats::default()
        };
        stats.enemy_spawns = self.spawn_system(delta_seconds);
        if let Some(loaded) = self.loaded.as_mut() {
            stats.obstacle_rebuilds = obstacle_system(&self.world, &mut loaded.grids);
            let ctx = PathingContext {
                dungeon: &loaded.dungeon,
                pool: &loaded.pool,
                grids: &loaded.grids,
                scheduler: &self.scheduler,
                target: self.target,
                target_room: self.target_room,
                tick: self.tick,
                delta_seconds,
                goal_search_radius: self.config.grid.goal_search_radius,
            };
            stats.searches = pathing_system(&mut self.world, &ctx);
            stats.moving_agents = movement_system(
                &mut self.world,
                delta_seconds,
                self.config.scheduler.stop_distance,
            );
        }
        self.tick += 1;
        self.last_stats = stats;
        stats
    }

    // ── Queries ─────────────────────────────────────────────────────────

    pub fn config(&self) -> &DungeonConfig {
        &self.config
    }

    pub fn dungeon(&self) -> Option<&Dungeon> {
        self.loaded.as_ref().map(|l| &l.dungeon)
    }

    pub fn templates(&self) -> Option<&TemplatePool> {
        self.loaded.as_ref().map(|l| &l.pool)
    }

    pub fn cost_map(&self, room: RoomHandle) -> Option<&CostMap> {
        self.loaded.as_ref()?.grids.get(room)
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn last_stats(&self) -> TickStats {
        self.last_stats
    }

    pub fn agent_count(&self) -> usize {
        self.world.query::<&Agent>().iter().count()
    }

    /// Live spawned enemies in `room`.
    pub fn enemies_in(&self, room: RoomHandle) -> Vec<Entity> {
        self.world
            .query::<(&Position, &RoomEnemy)>()
            .iter()
            .filter(|(_, (pos, _))| pos.room == room)
            .map(|(entity, _)| entity)
            .collect()
    }

    /// Enemies still queued for `room`.
    pub fn pending_spawns(&self, room: RoomHandle) -> usize {
        self.loaded
            .as_ref()
            .and_then(|l| l.spawns.get(room.index()))
            .map_or(0, |s| s.queue.len())
    }

    pub fn agent_position(&self, entity: Entity) -> Option<Position> {
        self.world.get::<&Position>(entity).ok().map(|p| *p)
    }
}

impl Default for DungeonEngine {
    fn default() -> Self {
        Self::new(DungeonConfig::default())
    }
}

fn instance_cleared(loaded: &mut LoadedDungeon, room: RoomHandle) {
    if let Some(instance) = loaded.dungeon.room_mut(room) {
        instance.is_cleared_of_enemies = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use delve_logic::geometry::Orientation;
    use delve_logic::graph::{NodeId, RoomGraph};
    use delve_logic::spawn::{EnemiesByLevel, SpawnParameters};
    use delve_logic::template::RoomTemplate;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn level() -> DungeonLevel {
        level_with(SpawnParameters::new("test", (3, 3)))
    }

    /// entrance (0,0)-(10,8) → corridor (3,9)-(7,15) → hall (0,16)-(10,24),
    /// every room open inside.
    fn level_with(spawning: SpawnParameters) -> DungeonLevel {
        let hall = RoomTemplate::new("hall", RoomType::Normal, IVec2::ZERO, IVec2::new(10, 8))
            .with_doorway(Orientation::South, IVec2::new(5, 0))
            .with_spawn_positions(vec![IVec2::new(2, 2), IVec2::new(8, 2), IVec2::new(5, 6)])
            .with_enemies(
                EnemiesByLevel::new("test", &[("rat", 3), ("bat", 1)]),
                spawning,
            );
        DungeonLevel::new("test")
            .with_template(
                RoomTemplate::new("entrance", RoomType::Entrance, IVec2::ZERO, IVec2::new(10, 8))
                    .with_doorway(Orientation::North, IVec2::new(5, 8)),
            )
            .with_template(
                RoomTemplate::new("ns", RoomType::CorridorNS, IVec2::ZERO, IVec2::new(4, 6))
                    .with_doorway(Orientation::North, IVec2::new(2, 6))
                    .with_doorway(Orientation::South, IVec2::new(2, 0)),
            )
            .with_template(
                RoomTemplate::new("ew", RoomType::CorridorEW, IVec2::ZERO, IVec2::new(6, 4))
                    .with_doorway(Orientation::East, IVec2::new(6, 2))
                    .with_doorway(Orientation::West, IVec2::new(0, 2)),
            )
            .with_template(hall)
            .with_graph(
                RoomGraph::new("line")
                    .with_node("entrance", RoomType::Entrance)
                    .with_node("c", RoomType::Corridor)
                    .with_node("hall", RoomType::Normal)
                    .with_edge("entrance", "c")
                    .with_edge("c", "hall"),
            )
    }

    fn engine(slot_count: u32) -> (DungeonEngine, RoomHandle) {
        engine_for(&level(), slot_count)
    }

    fn engine_for(level: &DungeonLevel, slot_count: u32) -> (DungeonEngine, RoomHandle) {
        let mut config = DungeonConfig::default();
        config.scheduler.slot_count = slot_count;
        let mut engine = DungeonEngine::new(config);
        engine
            .load_level(level, &mut StdRng::seed_from_u64(3))
            .unwrap();
        let hall = engine.dungeon().unwrap().handle(&NodeId::new("hall")).unwrap();
        (engine, hall)
    }

    #[test]
    fn test_engine_creation() {
        let mut engine = DungeonEngine::default();
        assert!(engine.dungeon().is_none());
        assert_eq!(engine.agent_count(), 0);
        let stats = engine.update(0.1);
        assert_eq!(stats.searches, 0);
        assert_eq!(engine.tick(), 1);
        assert!(matches!(
            engine.spawn_agent(RoomHandle(0), IVec2::ZERO, "rat"),
            Err(EngineError::NoDungeon)
        ));
    }

    #[test]
    fn test_load_level() {
        let (engine, hall) = engine(60);
        let dungeon = engine.dungeon().unwrap();
        assert_eq!(dungeon.len(), 3);
        let room = dungeon.room(hall).unwrap();
        assert_eq!(room.bounds.lower, IVec2::new(0, 16));
        assert_eq!(room.enemies_to_spawn, 3);
        let map = engine.cost_map(hall).unwrap();
        assert_eq!((map.cols(), map.rows()), (11, 9));
    }

    #[test]
    fn test_set_target_tracks_room() {
        let (mut engine, hall) = engine(60);
        engine.set_target(Vec2::new(5.5, 20.5));
        assert_eq!(engine.target_room(), Some(hall));
        engine.set_target(Vec2::new(50.0, 50.0));
        assert_eq!(engine.target_room(), None);
    }

    #[test]
    fn test_spawn_agent_outside_room() {
        let (mut engine, hall) = engine(60);
        assert!(matches!(
            engine.spawn_agent(hall, IVec2::new(11, 0), "rat"),
            Err(EngineError::CellOutsideRoom { .. })
        ));
        assert!(matches!(
            engine.spawn_agent(RoomHandle(9), IVec2::ZERO, "rat"),
            Err(EngineError::UnknownRoom(_))
        ));
    }

    #[test]
    fn test_enemies_spawn_once_and_clear() {
        let (mut engine, hall) = engine(60);
        let mut rng = StdRng::seed_from_u64(8);

        let entrance = engine.dungeon().unwrap().entrance();
        assert!(engine.enter_room(entrance, &mut rng).unwrap().is_empty());

        let enemies = engine.enter_room(hall, &mut rng).unwrap();
        assert_eq!(enemies.len(), 3);
        assert_eq!(engine.enemies_in(hall).len(), 3);
        assert!(engine.dungeon().unwrap().room(hall).unwrap().is_previously_visited);
        assert!(engine.enter_room(hall, &mut rng).unwrap().is_empty());

        for enemy in enemies {
            assert!(!engine.dungeon().unwrap().room(hall).unwrap().is_cleared_of_enemies);
            engine.defeat_agent(enemy).unwrap();
        }
        assert!(engine.dungeon().unwrap().room(hall).unwrap().is_cleared_of_enemies);
        assert_eq!(engine.agent_count(), 0);
    }

    #[test]
    fn test_enemies_spawn_one_at_a_time() {
        let spawning = SpawnParameters::new("test", (3, 3))
            .with_concurrency(1, 1)
            .with_interval(5.0, 5.0);
        let (mut engine, hall) = engine_for(&level_with(spawning), 60);
        let mut rng = StdRng::seed_from_u64(8);
        let cleared = |engine: &DungeonEngine| {
            engine.dungeon().unwrap().room(hall).unwrap().is_cleared_of_enemies
        };

        let first = engine.enter_room(hall, &mut rng).unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(engine.pending_spawns(hall), 2);

        // The interval runs out but the cap holds the next enemy back.
        for _ in 0..10 {
            assert_eq!(engine.update(1.0).enemy_spawns, 0);
        }
        engine.defeat_agent(first[0]).unwrap();
        assert!(!cleared(&engine));
        assert_eq!(engine.update(1.0).enemy_spawns, 1);

        // Room under the cap again, so only the interval holds it back.
        let second = engine.enemies_in(hall);
        assert_eq!(second.len(), 1);
        engine.defeat_agent(second[0]).unwrap();
        for _ in 0..4 {
            assert_eq!(engine.update(1.0).enemy_spawns, 0);
        }
        assert_eq!(engine.update(1.0).enemy_spawns, 1);
        assert_eq!(engine.pending_spawns(hall), 0);

        let third = engine.enemies_in(hall);
        engine.defeat_agent(third[0]).unwrap();
        assert!(cleared(&engine));
        assert_eq!(engine.update(10.0).enemy_spawns, 0);
    }

    #[test]
    fn test_searches_bounded_by_slot() {
        let (mut engine, hall) = engine(2);
        for x in 1..=4 {
            engine.spawn_agent(hall, IVec2::new(x, 1), "rat").unwrap();
        }
        engine.set_target(Vec2::new(5.5, 22.5));

        assert_eq!(engine.update(0.1).searches, 2);
        assert_eq!(engine.update(0.1).searches, 2);
        // Cooldown running, target still.
        assert_eq!(engine.update(0.1).searches, 0);
        assert_eq!(engine.update(0.1).searches, 0);
        assert_eq!(engine.last_stats().moving_agents, 4);
    }

    #[test]
    fn test_target_elsewhere_idles_agents() {
        let (mut engine, hall) = engine(1);
        let rat = engine.spawn_agent(hall, IVec2::new(1, 1), "rat").unwrap();
        engine.set_target(Vec2::new(5.5, 3.5));
        let stats = engine.update(0.1);
        assert_eq!(stats.searches, 0);
        assert_eq!(stats.moving_agents, 0);
        assert_eq!(engine.agent_position(rat).unwrap().world, Vec2::new(1.5, 17.5));
    }

    #[test]
    fn test_agent_walks_toward_target() {
        let (mut engine, hall) = engine(1);
        let rat = engine.spawn_agent(hall, IVec2::new(1, 1), "rat").unwrap();
        let target = Vec2::new(6.5, 19.5);
        engine.set_target(target);
        let before = engine.agent_position(rat).unwrap().world.distance(&target);
        for _ in 0..10 {
            engine.update(0.1);
        }
        let after = engine.agent_position(rat).unwrap().world.distance(&target);
        assert!(after < before - 1.0, "{before} -> {after}");
    }

    #[test]
    fn test_prop_moves_rebuild_overlay() {
        let (mut engine, hall) = engine(60);
        let prop = engine
            .spawn_prop(hall, IVec2::new(4, 20), IVec2::new(5, 20))
            .unwrap();
        assert_eq!(engine.update(0.1).obstacle_rebuilds, 1);
        assert!(!engine.cost_map(hall).unwrap().is_walkable(IVec2::new(4, 4)));
        assert_eq!(engine.update(0.1).obstacle_rebuilds, 0);

        engine.move_prop(prop, IVec2::new(0, 1)).unwrap();
        assert_eq!(engine.update(0.1).obstacle_rebuilds, 1);
        let map = engine.cost_map(hall).unwrap();
        assert!(map.is_walkable(IVec2::new(4, 4)));
        assert!(!map.is_walkable(IVec2::new(5, 5)));

        engine.remove_prop(prop).unwrap();
        engine.update(0.1);
        assert!(engine.cost_map(hall).unwrap().is_walkable(IVec2::new(5, 5)));
    }
}
