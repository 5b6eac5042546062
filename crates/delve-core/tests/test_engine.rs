//! Integration tests for the engine over the bundled level data.
//!
//! Exercises: LevelFile → DungeonEngine::load_level → enter_room →
//! update (obstacles → pathing → movement) → defeat_agent

use delve_core::prelude::*;
use delve_logic::geometry::{IVec2, Vec2};
use delve_logic::room::RoomHandle;
use delve_logic::room_type::RoomType;
use delve_logic::validation::check_layout;
use rand::rngs::StdRng;
use rand::SeedableRng;

const LEVELS: &str = include_str!("../../../data/levels.json");

fn level_file() -> LevelFile {
    let file = LevelFile::from_json(LEVELS).unwrap();
    file.validate().unwrap();
    file
}

fn loaded_engine(level: &str, seed: u64) -> DungeonEngine {
    let file = level_file();
    let mut engine = DungeonEngine::new(file.config.clone()).with_profiles(file.profiles.clone());
    engine
        .load_level(file.level(level).unwrap(), &mut StdRng::seed_from_u64(seed))
        .unwrap();
    engine
}

/// First room of `room_type` in handle order.
fn first_room(engine: &DungeonEngine, room_type: RoomType) -> RoomHandle {
    engine
        .dungeon()
        .unwrap()
        .rooms()
        .iter()
        .find(|(_, r)| r.room_type == room_type)
        .map(|(h, _)| h)
        .unwrap()
}

/// World centre of the room's middle tile.
fn room_centre(engine: &DungeonEngine, room: RoomHandle) -> Vec2 {
    let bounds = engine.dungeon().unwrap().room(room).unwrap().bounds;
    Vec2::new(
        (bounds.lower.x + bounds.upper.x) as f32 / 2.0 + 0.5,
        (bounds.lower.y + bounds.upper.y) as f32 / 2.0 + 0.5,
    )
}

#[test]
fn bundled_levels_load_and_validate() {
    let file = level_file();
    assert_eq!(file.levels.len(), 2);
    for seed in 0..10 {
        for level in &file.levels {
            let engine = loaded_engine(&level.name, seed);
            let dungeon = engine.dungeon().unwrap();
            let issues = check_layout(dungeon);
            assert!(issues.is_empty(), "{} seed {seed}: {issues:?}", level.name);
            for (handle, _) in dungeon.rooms().iter() {
                assert!(engine.cost_map(handle).is_some());
            }
        }
    }
}

#[test]
fn profiles_apply_by_kind() {
    let mut engine = loaded_engine("crypt", 1);
    let room = first_room(&engine, RoomType::Normal);
    let bat = engine.spawn_agent(room, IVec2::new(2, 2), "bat").unwrap();
    let ghost = engine.spawn_agent(room, IVec2::new(2, 2), "ghost").unwrap();
    let speed = |e| engine.world.get::<&Agent>(e).unwrap().profile.speed;
    assert_eq!(speed(bat), 5.0);
    assert_eq!(speed(ghost), AgentProfile::default().speed);
}

#[test]
fn searches_per_tick_are_bounded_by_slots() {
    let mut engine = loaded_engine("crypt", 2);
    let room = first_room(&engine, RoomType::Boss);
    // Spread 120 agents over the 60 slots, all well within chase range.
    for i in 0..120 {
        let cell = IVec2::new(1 + i % 3, 1 + (i / 3) % 3);
        engine.spawn_agent(room, cell, "lich").unwrap();
    }
    engine.set_target(room_centre(&engine, room));
    assert_eq!(engine.target_room(), Some(room));

    let mut total = 0;
    for _ in 0..60 {
        let stats = engine.update(1.0 / 60.0);
        assert!(stats.searches <= 2, "tick {}: {}", stats.tick, stats.searches);
        total += stats.searches;
    }
    assert_eq!(total, 120);
}

#[test]
fn agents_close_in_on_a_still_target() {
    let mut engine = loaded_engine("crypt", 3);
    let room = first_room(&engine, RoomType::Boss);
    let target = room_centre(&engine, room);
    let lich = engine.spawn_agent(room, IVec2::new(2, 10), "lich").unwrap();
    engine.set_target(target);

    let start = engine.agent_position(lich).unwrap().world.distance(&target);
    for _ in 0..240 {
        engine.update(1.0 / 30.0);
    }
    let end = engine.agent_position(lich).unwrap().world.distance(&target);
    assert!(end < 1.0, "lich stopped {end} away (started {start})");
    assert_eq!(engine.agent_position(lich).unwrap().room, room);
}

#[test]
fn moved_prop_is_rebuilt_before_the_next_search() {
    let mut engine = loaded_engine("crypt", 4);
    let room = first_room(&engine, RoomType::Boss);
    let lower = engine.dungeon().unwrap().room(room).unwrap().bounds.lower;
    let prop = engine
        .spawn_prop(room, lower + IVec2::new(6, 4), lower + IVec2::new(6, 4))
        .unwrap();

    let stats = engine.update(0.1);
    assert_eq!(stats.obstacle_rebuilds, 1);
    assert!(!engine.cost_map(room).unwrap().is_walkable(IVec2::new(6, 4)));

    engine.move_prop(prop, IVec2::new(1, 0)).unwrap();
    engine.move_prop(prop, IVec2::new(1, 0)).unwrap();
    let stats = engine.update(0.1);
    assert_eq!(stats.obstacle_rebuilds, 1);
    let map = engine.cost_map(room).unwrap();
    assert!(map.is_walkable(IVec2::new(6, 4)));
    assert!(!map.is_walkable(IVec2::new(8, 4)));
}

#[test]
fn rooms_spawn_and_clear() {
    let mut engine = loaded_engine("catacombs", 5);
    let mut rng = StdRng::seed_from_u64(5);
    let boss = first_room(&engine, RoomType::Boss);
    assert_eq!(engine.dungeon().unwrap().room(boss).unwrap().enemies_to_spawn, 1);

    let corridor = engine
        .dungeon()
        .unwrap()
        .rooms()
        .iter()
        .find(|(_, r)| r.room_type.is_corridor())
        .map(|(h, _)| h)
        .unwrap();
    assert!(engine.enter_room(corridor, &mut rng).unwrap().is_empty());

    let spawned = engine.enter_room(boss, &mut rng).unwrap();
    assert_eq!(spawned.len(), 1);
    let name = engine.world.get::<&Name>(spawned[0]).unwrap().0.clone();
    assert_eq!(name, "lich");

    engine.defeat_agent(spawned[0]).unwrap();
    let room = engine.dungeon().unwrap().room(boss).unwrap();
    assert!(room.is_cleared_of_enemies);
    assert!(room.is_previously_visited);
    assert!(engine.enter_room(boss, &mut rng).unwrap().is_empty());
}

#[test]
fn queued_enemies_arrive_until_the_room_clears() {
    let mut engine = loaded_engine("crypt", 6);
    let mut rng = StdRng::seed_from_u64(6);
    let room = first_room(&engine, RoomType::Normal);
    let expected = engine.dungeon().unwrap().room(room).unwrap().enemies_to_spawn as usize;
    assert!(expected >= 2);

    let mut defeated = engine.enter_room(room, &mut rng).unwrap().len();
    assert!(defeated >= 1);
    for enemy in engine.enemies_in(room) {
        engine.defeat_agent(enemy).unwrap();
    }
    for _ in 0..100 {
        let stats = engine.update(0.5);
        assert!(stats.enemy_spawns <= 3, "cap exceeded: {}", stats.enemy_spawns);
        let live = engine.enemies_in(room);
        defeated += stats.enemy_spawns;
        for enemy in live {
            engine.defeat_agent(enemy).unwrap();
        }
    }
    assert_eq!(defeated, expected);
    assert_eq!(engine.pending_spawns(room), 0);
    assert!(engine.dungeon().unwrap().room(room).unwrap().is_cleared_of_enemies);
}
