//! Per-level enemy spawn data carried by room templates.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// One entry of a weighted spawn table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnRatio {
    pub kind: String,
    pub ratio: u32,
}

/// Enemy kinds a room can spawn on one dungeon level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemiesByLevel {
    pub level: String,
    pub enemies: Vec<SpawnRatio>,
}

impl EnemiesByLevel {
    pub fn new(level: &str, enemies: &[(&str, u32)]) -> Self {
        Self {
            level: level.to_string(),
            enemies: enemies
                .iter()
                .map(|&(kind, ratio)| SpawnRatio {
                    kind: kind.to_string(),
                    ratio,
                })
                .collect(),
        }
    }

    pub fn table(&self) -> SpawnTable<'_> {
        SpawnTable::new(&self.enemies)
    }
}

/// How many enemies a room spawns on one level, and how fast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnParameters {
    pub level: String,
    pub min_total_enemies: u32,
    pub max_total_enemies: u32,
    pub min_concurrent: u32,
    pub max_concurrent: u32,
    pub min_spawn_interval: f32,
    pub max_spawn_interval: f32,
}

impl SpawnParameters {
    /// `total` enemies, all allowed at once with no interval between them.
    pub fn new(level: &str, total: (u32, u32)) -> Self {
        Self {
            level: level.to_string(),
            min_total_enemies: total.0,
            max_total_enemies: total.1,
            min_concurrent: total.1.max(1),
            max_concurrent: total.1.max(1),
            min_spawn_interval: 0.0,
            max_spawn_interval: 0.0,
        }
    }

    pub fn with_concurrency(mut self, min: u32, max: u32) -> Self {
        self.min_concurrent = min;
        self.max_concurrent = max;
        self
    }

    /// Seconds waited after each spawn, drawn from `[min, max]`.
    pub fn with_interval(mut self, min: f32, max: f32) -> Self {
        self.min_spawn_interval = min;
        self.max_spawn_interval = max;
        self
    }

    /// Total enemies for one room, drawn from `[min, max]`.
    pub fn roll_total(&self, rng: &mut impl Rng) -> u32 {
        roll(rng, self.min_total_enemies, self.max_total_enemies)
    }

    /// Cap on live enemies while the room spawns.
    pub fn roll_concurrent(&self, rng: &mut impl Rng) -> u32 {
        roll(rng, self.min_concurrent, self.max_concurrent)
    }

    pub fn roll_interval(&self, rng: &mut impl Rng) -> f32 {
        let (lo, hi) = (self.min_spawn_interval, self.max_spawn_interval);
        if hi > lo {
            rng.gen_range(lo..=hi)
        } else {
            lo
        }
    }
}

fn roll(rng: &mut impl Rng, min: u32, max: u32) -> u32 {
    if max > min {
        rng.gen_range(min..=max)
    } else {
        min
    }
}

/// Weighted random choice over [`SpawnRatio`] entries.
#[derive(Debug, Clone, Copy)]
pub struct SpawnTable<'a> {
    entries: &'a [SpawnRatio],
    total: u32,
}

impl<'a> SpawnTable<'a> {
    pub fn new(entries: &'a [SpawnRatio]) -> Self {
        let total = entries.iter().map(|e| e.ratio).sum();
        Self { entries, total }
    }

    /// Pick one kind with probability `ratio / total`. `None` when every
    /// ratio is zero.
    pub fn pick(&self, rng: &mut impl Rng) -> Option<&'a str> {
        if self.total == 0 {
            return None;
        }
        let mut roll = rng.gen_range(0..self.total);
        for entry in self.entries {
            if roll < entry.ratio {
                return Some(&entry.kind);
            }
            roll -= entry.ratio;
        }
        None
    }
}
