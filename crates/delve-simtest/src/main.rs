//! Delve Headless Simulation Harness
//!
//! Generates dungeons from the bundled level data across many seeds and
//! checks layout, cost-map and pathing properties. Runs entirely
//! in-process with no rendering.
//!
//! Usage:
//!   cargo run -p delve-simtest
//!   cargo run -p delve-simtest -- --verbose
//!   cargo run -p delve-simtest -- --seeds 200
//!
//! `RUST_LOG` overrides the log filter (`warn`, or `debug` with --verbose).

use std::collections::BTreeSet;

use delve_core::prelude::*;
use delve_logic::config::GridConfig;
use delve_logic::geometry::{Bounds, IVec2, Vec2};
use delve_logic::grid::CostMap;
use delve_logic::layout::{Dungeon, LayoutSynthesizer};
use delve_logic::level::TemplatePool;
use delve_logic::pathfinding::{build_path, octile_distance};
use delve_logic::room::RoomHandle;
use delve_logic::room_type::RoomType;
use delve_logic::template::CollisionTiles;
use delve_logic::validation::{
    check_connectivity, check_doorway_reciprocity, check_room_overlaps, validate_level, Severity,
    ValidationIssue,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing_subscriber::EnvFilter;

// ── Level data (same JSON the engine tests use) ─────────────────────────
const LEVELS_JSON: &str = include_str!("../../../data/levels.json");

const DEFAULT_SEEDS: u64 = 50;

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

/// Pass when `problems` is empty, otherwise report the first few.
fn problems_result(name: String, problems: &[String], ok_detail: String) -> TestResult {
    TestResult {
        name,
        passed: problems.is_empty(),
        detail: if problems.is_empty() {
            ok_detail
        } else {
            let shown: Vec<&str> = problems.iter().take(3).map(String::as_str).collect();
            format!("{} problems, e.g. {}", problems.len(), shown.join("; "))
        },
    }
}

fn main() {
    let verbose = std::env::args().any(|a| a == "--verbose");
    let seeds = parse_seeds().unwrap_or(DEFAULT_SEEDS);
    init_logging(verbose);
    println!("=== Delve Simulation Harness ({seeds} seeds) ===\n");

    let file = match LevelFile::from_json(LEVELS_JSON) {
        Ok(file) => file,
        Err(e) => {
            println!("  ✗ level_file_parse: {e}");
            std::process::exit(1);
        }
    };

    let mut results = Vec::new();

    // 1. Level data validation
    results.extend(validate_level_data(&file, verbose));

    // 2. Layout synthesis invariants across seeds
    results.extend(validate_synthesis(&file, seeds, verbose));

    // 3. Corridor chain scenario
    results.extend(validate_corridor_chain(&file, seeds));

    // 4. Cost map construction and doorway sealing
    results.extend(validate_cost_maps(&file, seeds));

    // 5. A* on synthetic grids
    results.extend(validate_pathfinding(seeds));

    // 6. Every placed room is navigable
    results.extend(validate_room_navigation(&file, seeds));

    // 7. Engine run with scheduled agents
    results.extend(validate_agent_simulation(&file, verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

fn parse_seeds() -> Option<u64> {
    let args: Vec<String> = std::env::args().collect();
    let i = args.iter().position(|a| a == "--seeds")?;
    args.get(i + 1)?.parse().ok()
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn generate(file: &LevelFile, level: usize, seed: u64) -> Option<(Dungeon, TemplatePool)> {
    let level = &file.levels[level];
    let pool = TemplatePool::new(&level.templates);
    let dungeon = LayoutSynthesizer::new(file.config.layout.clone())
        .generate(&level.name, &level.graphs, &pool, &mut StdRng::seed_from_u64(seed))
        .ok()?;
    Some((dungeon, pool))
}

/// Static cost map of every room, sealed doorways included.
fn room_maps(dungeon: &Dungeon, pool: &TemplatePool, grid: &GridConfig) -> Vec<(RoomHandle, CostMap)> {
    dungeon
        .rooms()
        .iter()
        .filter_map(|(handle, room)| {
            let template = pool.get(&room.template_id)?;
            Some((
                handle,
                CostMap::build(room.bounds, &room.sealed_collision(template), grid),
            ))
        })
        .collect()
}

// ── 1. Level Data ───────────────────────────────────────────────────────

fn validate_level_data(file: &LevelFile, verbose: bool) -> Vec<TestResult> {
    println!("--- Level Data ---");
    let mut results = Vec::new();

    results.push(TestResult {
        name: "levels_not_empty".into(),
        passed: !file.levels.is_empty(),
        detail: format!("{} levels loaded", file.levels.len()),
    });

    for level in &file.levels {
        let issues = validate_level(level);
        if verbose {
            for issue in &issues {
                println!("    {} [{}] {}", level.name, issue.category, issue.message);
            }
        }
        let errors: Vec<String> = issues
            .into_iter()
            .filter(|i| i.severity == Severity::Error)
            .map(|i| i.message)
            .collect();
        results.push(problems_result(
            format!("level_{}_valid", level.name),
            &errors,
            format!(
                "{} templates, {} graphs",
                level.templates.len(),
                level.graphs.len()
            ),
        ));
    }

    // Every enemy kind has a movement profile
    let missing: BTreeSet<&str> = file
        .levels
        .iter()
        .flat_map(|l| &l.templates)
        .flat_map(|t| &t.enemies_by_level)
        .flat_map(|e| &e.enemies)
        .map(|r| r.kind.as_str())
        .filter(|kind| !file.profiles.contains_key(*kind))
        .collect();
    results.push(TestResult {
        name: "profiles_cover_enemy_kinds".into(),
        passed: missing.is_empty(),
        detail: if missing.is_empty() {
            format!("{} profiles", file.profiles.len())
        } else {
            format!("no profile for {:?}", missing)
        },
    });

    // Spawn positions sit on walkable tiles
    let grid = &file.config.grid;
    let mut bad_spawns = Vec::new();
    for level in &file.levels {
        for template in &level.templates {
            for &pos in &template.spawn_positions {
                let tile = template.collision.tile_at(pos - template.bounds.lower);
                if grid.penalty_for(tile) == 0 || !template.bounds.contains(pos) {
                    bad_spawns.push(format!("{} {:?}", template.id, pos));
                }
            }
        }
    }
    results.push(problems_result(
        "spawn_positions_walkable".into(),
        &bad_spawns,
        "all spawn positions on open floor".into(),
    ));

    results
}

// ── 2. Layout Synthesis ─────────────────────────────────────────────────

fn validate_synthesis(file: &LevelFile, seeds: u64, verbose: bool) -> Vec<TestResult> {
    println!("--- Layout Synthesis ---");
    let mut results = Vec::new();

    for (index, level) in file.levels.iter().enumerate() {
        let mut failures = Vec::new();
        let mut overlaps = Vec::new();
        let mut reciprocity = Vec::new();
        let mut connectivity = Vec::new();
        let mut attempts = Vec::new();
        let mut graphs = BTreeSet::new();

        for seed in 0..seeds {
            let Some((dungeon, _)) = generate(file, index, seed) else {
                failures.push(format!("seed {seed} exhausted its budget"));
                continue;
            };
            let tag = |i: ValidationIssue| format!("seed {seed}: {}", i.message);
            overlaps.extend(check_room_overlaps(&dungeon).into_iter().map(tag));
            reciprocity.extend(check_doorway_reciprocity(&dungeon).into_iter().map(tag));
            connectivity.extend(check_connectivity(&dungeon).into_iter().map(tag));
            attempts.push(dungeon.attempts);
            graphs.insert(dungeon.graph_name.clone());
        }

        let max_attempts = attempts.iter().copied().max().unwrap_or(0);
        let mean_attempts = if attempts.is_empty() {
            0.0
        } else {
            attempts.iter().map(|&a| a as f64).sum::<f64>() / attempts.len() as f64
        };
        if verbose {
            println!(
                "    {}: graphs {:?}, attempts mean {:.1} max {}",
                level.name, graphs, mean_attempts, max_attempts
            );
        }

        results.push(problems_result(
            format!("synthesis_{}_succeeds", level.name),
            &failures,
            format!(
                "{} dungeons, mean {:.1} attempts, max {}",
                attempts.len(),
                mean_attempts,
                max_attempts
            ),
        ));
        results.push(problems_result(
            format!("synthesis_{}_no_overlap", level.name),
            &overlaps,
            "no two rooms share a tile".into(),
        ));
        results.push(problems_result(
            format!("synthesis_{}_doorway_reciprocity", level.name),
            &reciprocity,
            "every connected doorway faces exactly one partner".into(),
        ));
        results.push(problems_result(
            format!("synthesis_{}_connected", level.name),
            &connectivity,
            "rooms form a tree rooted at the entrance".into(),
        ));
    }

    // Same seed, same dungeon
    if !file.levels.is_empty() {
        let a = generate(file, 0, 7).map(|(d, _)| bounds_of(&d));
        let b = generate(file, 0, 7).map(|(d, _)| bounds_of(&d));
        results.push(TestResult {
            name: "synthesis_deterministic".into(),
            passed: a.is_some() && a == b,
            detail: "seed 7 reproduces the same layout".into(),
        });
    }

    results
}

fn bounds_of(dungeon: &Dungeon) -> Vec<Bounds> {
    dungeon.rooms().iter().map(|(_, r)| r.bounds).collect()
}

// ── 3. Corridor Chain ───────────────────────────────────────────────────

fn validate_corridor_chain(file: &LevelFile, seeds: u64) -> Vec<TestResult> {
    println!("--- Corridor Chain Scenario ---");
    let mut results = Vec::new();
    let synth = LayoutSynthesizer::new(file.config.layout.clone());

    for level in &file.levels {
        let Some(chain) = level.graphs.iter().find(|g| g.name == "corridor_chain") else {
            continue;
        };
        let pool = TemplatePool::new(&level.templates);
        let mut problems = Vec::new();

        for seed in 0..seeds {
            let mut rng = StdRng::seed_from_u64(seed);
            let dungeon = match synth.generate(&level.name, std::slice::from_ref(chain), &pool, &mut rng) {
                Ok(d) => d,
                Err(e) => {
                    problems.push(format!("seed {seed}: {e}"));
                    continue;
                }
            };
            if dungeon.len() != 5 {
                problems.push(format!("seed {seed}: {} rooms", dungeon.len()));
            }
            let corridors = dungeon
                .rooms()
                .iter()
                .filter(|(_, r)| matches!(r.room_type, RoomType::CorridorNS | RoomType::CorridorEW))
                .count();
            if corridors != 2 {
                problems.push(format!("seed {seed}: {corridors} corridors"));
            }

            // Boss back to entrance along parent links
            let Some((_, mut room)) = dungeon
                .rooms()
                .iter()
                .find(|(_, r)| r.room_type == RoomType::Boss)
            else {
                problems.push(format!("seed {seed}: no boss room"));
                continue;
            };
            let mut hops = 0;
            while let Some(parent) = &room.parent {
                match dungeon.rooms().by_id(parent) {
                    Some(p) if hops < dungeon.len() => {
                        room = p;
                        hops += 1;
                    }
                    _ => break,
                }
            }
            if room.room_type != RoomType::Entrance || hops != 4 {
                problems.push(format!(
                    "seed {seed}: boss reaches {} after {hops} hops",
                    room.id
                ));
            }
        }

        results.push(problems_result(
            format!("chain_{}_five_rooms", level.name),
            &problems,
            format!("{seeds} seeds, entrance to boss in 4 hops"),
        ));
    }

    results
}

// ── 4. Cost Maps ────────────────────────────────────────────────────────

fn validate_cost_maps(file: &LevelFile, seeds: u64) -> Vec<TestResult> {
    println!("--- Grid Cost Maps ---");
    let grid = &file.config.grid;
    let mut not_idempotent = Vec::new();
    let mut unsealed = Vec::new();
    let mut blocked_doors = Vec::new();
    let mut rooms_checked = 0;

    for index in 0..file.levels.len() {
        for seed in 0..seeds.min(20) {
            let Some((dungeon, pool)) = generate(file, index, seed) else {
                continue;
            };
            let first = room_maps(&dungeon, &pool, grid);
            let second = room_maps(&dungeon, &pool, grid);
            if first != second {
                not_idempotent.push(format!("{} seed {seed}", file.levels[index].name));
            }
            for (handle, map) in &first {
                let Some(room) = dungeon.room(*handle) else {
                    continue;
                };
                rooms_checked += 1;
                for door in &room.doorways {
                    let Some(cell) = map.tile_to_cell(room.doorway_world(door)) else {
                        unsealed.push(format!("room {} doorway off its grid", room.id));
                        continue;
                    };
                    if door.is_connected() {
                        if !map.is_walkable(cell) {
                            blocked_doors.push(format!("room {} {:?}", room.id, door.orientation));
                        }
                    } else if door.seal.is_some() && map.is_walkable(cell) {
                        unsealed.push(format!("room {} {:?}", room.id, door.orientation));
                    }
                }
            }
        }
    }

    vec![
        problems_result(
            "grid_build_idempotent".into(),
            &not_idempotent,
            format!("{rooms_checked} rooms rebuilt identically"),
        ),
        problems_result(
            "grid_unused_doorways_sealed".into(),
            &unsealed,
            "every unconnected doorway is walled off".into(),
        ),
        problems_result(
            "grid_connected_doorways_open".into(),
            &blocked_doors,
            "every connected doorway is walkable".into(),
        ),
    ]
}

// ── 5. Pathfinding ──────────────────────────────────────────────────────

fn validate_pathfinding(seeds: u64) -> Vec<TestResult> {
    println!("--- Pathfinding ---");
    let mut results = Vec::new();
    let grid = GridConfig::default();
    let open = CostMap::open(Bounds::new(IVec2::ZERO, IVec2::new(9, 9)), &grid);

    let straight = build_path(&open, IVec2::new(0, 0), IVec2::new(3, 0));
    results.push(TestResult {
        name: "astar_orthogonal_optimal".into(),
        passed: straight
            .as_ref()
            .is_some_and(|p| p.steps() == 3 && p.distance == 30),
        detail: format!("{:?}", straight.map(|p| (p.steps(), p.distance))),
    });

    let diagonal = build_path(&open, IVec2::new(0, 0), IVec2::new(3, 3));
    results.push(TestResult {
        name: "astar_diagonal_optimal".into(),
        passed: diagonal
            .as_ref()
            .is_some_and(|p| p.steps() == 3 && p.distance == 42),
        detail: format!("{:?}", diagonal.map(|p| (p.steps(), p.distance))),
    });

    // Goal ringed by impassable cells
    let mut walled = open.clone();
    for dx in -1..=1 {
        for dy in -1..=1 {
            if dx != 0 || dy != 0 {
                walled.set_static(IVec2::new(5 + dx, 5 + dy), 0);
            }
        }
    }
    results.push(TestResult {
        name: "astar_enclosed_goal".into(),
        passed: build_path(&walled, IVec2::new(0, 0), IVec2::new(5, 5)).is_none(),
        detail: "enclosed goal yields no path".into(),
    });

    // Random clutter: paths avoid impassable cells and are never shorter
    // than the octile bound
    let mut problems = Vec::new();
    let (mut found, mut none) = (0, 0);
    for seed in 0..seeds {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut map = CostMap::open(Bounds::new(IVec2::ZERO, IVec2::new(15, 15)), &grid);
        for y in 0..16 {
            for x in 0..16 {
                if rng.gen_bool(0.25) {
                    map.set_static(IVec2::new(x, y), 0);
                }
            }
        }
        let start = IVec2::new(0, 0);
        let goal = IVec2::new(15, 15);
        map.set_static(start, grid.default_penalty);
        map.set_static(goal, grid.default_penalty);
        match build_path(&map, start, goal) {
            Some(path) => {
                found += 1;
                if path.cells.first() != Some(&start) || path.cells.last() != Some(&goal) {
                    problems.push(format!("seed {seed}: path does not span start to goal"));
                }
                if path.cells.iter().skip(1).any(|&c| !map.is_walkable(c)) {
                    problems.push(format!("seed {seed}: path crosses an impassable cell"));
                }
                let adjacent = path.cells.windows(2).all(|w| {
                    let d = w[1] - w[0];
                    d.x.abs() <= 1 && d.y.abs() <= 1 && d != IVec2::ZERO
                });
                if !adjacent {
                    problems.push(format!("seed {seed}: path skips a cell"));
                }
                if path.distance < octile_distance(start, goal) {
                    problems.push(format!("seed {seed}: path beats the octile bound"));
                }
            }
            None => none += 1,
        }
    }
    results.push(problems_result(
        "astar_cluttered_grids".into(),
        &problems,
        format!("{found} paths found, {none} unreachable"),
    ));

    results
}

// ── 6. Room Navigation ──────────────────────────────────────────────────

fn validate_room_navigation(file: &LevelFile, seeds: u64) -> Vec<TestResult> {
    println!("--- Room Navigation ---");
    let grid = &file.config.grid;
    let mut problems = Vec::new();
    let mut searches = 0;

    for index in 0..file.levels.len() {
        for seed in 0..seeds.min(20) {
            let Some((dungeon, pool)) = generate(file, index, seed) else {
                continue;
            };
            for (handle, map) in room_maps(&dungeon, &pool, grid) {
                let (Some(room), Some(template)) = (
                    dungeon.room(handle),
                    dungeon.room(handle).and_then(|r| pool.get(&r.template_id)),
                ) else {
                    continue;
                };
                let doors: Vec<IVec2> = room
                    .connected_doorways()
                    .filter_map(|d| map.tile_to_cell(room.doorway_world(d)))
                    .collect();
                let spawns: Vec<IVec2> = template
                    .spawn_positions
                    .iter()
                    .filter_map(|&t| map.tile_to_cell(room.template_to_world(t)))
                    .collect();
                for &door in &doors {
                    for &spawn in &spawns {
                        searches += 1;
                        if build_path(&map, door, spawn).is_none() {
                            problems.push(format!(
                                "{} seed {seed}: room {} doorway {:?} cannot reach {:?}",
                                file.levels[index].name, room.id, door, spawn
                            ));
                        }
                    }
                }
            }
        }
    }

    vec![problems_result(
        "rooms_navigable".into(),
        &problems,
        format!("{searches} doorway-to-spawn searches succeeded"),
    )]
}

// ── 7. Agent Simulation ─────────────────────────────────────────────────

fn validate_agent_simulation(file: &LevelFile, verbose: bool) -> Vec<TestResult> {
    println!("--- Agent Simulation ---");
    let mut results = Vec::new();
    let Some(level) = file.levels.first() else {
        return results;
    };

    let mut engine = DungeonEngine::new(file.config.clone()).with_profiles(file.profiles.clone());
    let mut rng = StdRng::seed_from_u64(42);
    if let Err(e) = engine.load_level(level, &mut rng) {
        results.push(TestResult {
            name: "sim_load_level".into(),
            passed: false,
            detail: e.to_string(),
        });
        return results;
    }

    // Enter every room; the busiest one hosts the chase
    let handles: Vec<RoomHandle> = engine
        .dungeon()
        .map(|d| d.rooms().iter().map(|(h, _)| h).collect())
        .unwrap_or_default();
    let mut spawned = 0;
    let mut busiest: Option<(RoomHandle, usize)> = None;
    for handle in handles {
        match engine.enter_room(handle, &mut rng) {
            Ok(enemies) => {
                spawned += enemies.len();
                if busiest.map_or(true, |(_, n)| enemies.len() > n) && !enemies.is_empty() {
                    busiest = Some((handle, enemies.len()));
                }
            }
            Err(e) => results.push(TestResult {
                name: "sim_enter_room".into(),
                passed: false,
                detail: e.to_string(),
            }),
        }
    }
    results.push(TestResult {
        name: "sim_enemies_spawned".into(),
        passed: spawned > 0,
        detail: format!("{spawned} enemies across the dungeon"),
    });
    let Some((room, _)) = busiest else {
        return results;
    };

    // Pad the room with extra agents on open cells
    let open_cells: Vec<IVec2> = engine
        .cost_map(room)
        .map(|map| {
            (0..map.rows())
                .flat_map(|y| (0..map.cols()).map(move |x| IVec2::new(x, y)))
                .filter(|&c| map.is_walkable(c))
                .collect()
        })
        .unwrap_or_default();
    for &cell in open_cells.iter().cycle().take(90) {
        if let Err(e) = engine.spawn_agent(room, cell, "rat") {
            results.push(TestResult {
                name: "sim_spawn_agent".into(),
                passed: false,
                detail: e.to_string(),
            });
            return results;
        }
    }

    let Some(bounds) = engine.dungeon().and_then(|d| d.room(room)).map(|r| r.bounds) else {
        return results;
    };
    let target = Vec2::new(
        (bounds.lower.x + bounds.upper.x) as f32 / 2.0 + 0.5,
        (bounds.lower.y + bounds.upper.y) as f32 / 2.0 + 0.5,
    );
    engine.set_target(target);

    let slots = engine.config().scheduler.slot_count.max(1) as usize;
    let mean_distance = |engine: &DungeonEngine| {
        let positions: Vec<Position> = engine
            .world
            .query::<&Position>()
            .iter()
            .filter(|(_, p)| p.room == room)
            .map(|(_, p)| *p)
            .collect();
        positions.iter().map(|p| p.world.distance(&target)).sum::<f32>() / positions.len().max(1) as f32
    };

    let start_distance = mean_distance(&engine);
    let mut max_searches = 0;
    let mut total_searches = 0;
    let mut rebuilds = 0;
    let prop = engine
        .spawn_prop(room, bounds.lower + IVec2::new(2, 2), bounds.lower + IVec2::new(2, 2))
        .ok();
    for tick in 0..600 {
        if let (300, Some(prop)) = (tick, prop) {
            let _ = engine.move_prop(prop, IVec2::new(1, 0));
        }
        let stats = engine.update(1.0 / 60.0);
        max_searches = max_searches.max(stats.searches);
        total_searches += stats.searches;
        rebuilds += stats.obstacle_rebuilds;
    }
    let end_distance = mean_distance(&engine);
    // Queued enemies may join during the run
    let agents = engine.agent_count();
    let bound = agents.div_ceil(slots);

    if verbose {
        println!(
            "    {agents} agents, {slots} slots: {total_searches} searches, peak {max_searches}/tick"
        );
    }

    results.push(TestResult {
        name: "sim_searches_bounded".into(),
        passed: max_searches <= bound && total_searches > 0,
        detail: format!("peak {max_searches} per tick, bound {bound}"),
    });
    results.push(TestResult {
        name: "sim_agents_close_in".into(),
        passed: end_distance < start_distance,
        detail: format!("mean distance {start_distance:.2} -> {end_distance:.2}"),
    });
    results.push(TestResult {
        name: "sim_overlay_rebuilt".into(),
        passed: rebuilds == 2,
        detail: format!("{rebuilds} dynamic overlay rebuilds"),
    });

    let inside = engine
        .world
        .query::<&Position>()
        .iter()
        .all(|(_, p)| {
            let tile = IVec2::new(p.world.x.floor() as i32, p.world.y.floor() as i32);
            engine
                .dungeon()
                .and_then(|d| d.room(p.room))
                .is_some_and(|r| r.bounds.contains(tile))
        });
    results.push(TestResult {
        name: "sim_agents_stay_in_room".into(),
        passed: inside,
        detail: "no agent left its room".into(),
    });

    // Defeat the room's enemies as they arrive
    let is_cleared = |engine: &DungeonEngine| {
        engine
            .dungeon()
            .and_then(|d| d.room(room))
            .is_some_and(|r| r.is_cleared_of_enemies)
    };
    let mut rounds = 0;
    while !is_cleared(&engine) && rounds < 100 {
        for enemy in engine.enemies_in(room) {
            let _ = engine.defeat_agent(enemy);
        }
        engine.update(0.5);
        rounds += 1;
    }
    results.push(TestResult {
        name: "sim_room_cleared".into(),
        passed: is_cleared(&engine) && engine.pending_spawns(room) == 0,
        detail: format!("room cleared after {rounds} waves"),
    });

    results
}
