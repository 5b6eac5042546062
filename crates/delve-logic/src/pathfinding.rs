//! A* search over a room's [`CostMap`].
//!
//! Moves are 8-connected. Entering a cell costs the octile step (10
//! orthogonal, 14 diagonal) plus the cell's effective penalty; the
//! heuristic is the plain octile distance to the goal. The open list is
//! ordered by F then H, and equal keys keep insertion order, so a search
//! is fully deterministic.
//!
//! ```
//! use delve_logic::config::GridConfig;
//! use delve_logic::geometry::{Bounds, IVec2};
//! use delve_logic::grid::CostMap;
//! use delve_logic::pathfinding::build_path;
//!
//! let map = CostMap::open(Bounds::new(IVec2::ZERO, IVec2::new(4, 4)), &GridConfig::default());
//! let path = build_path(&map, IVec2::new(0, 0), IVec2::new(3, 3)).unwrap();
//! assert_eq!(path.steps(), 3);
//! assert_eq!(path.distance, 42);
//! ```

use std::collections::{HashMap, HashSet};

use crate::constants::step;
use crate::geometry::{IVec2, Vec2};
use crate::grid::{CostMap, GridCell};

/// Octile distance between two cells, in the fixed-point step units.
pub fn octile_distance(a: GridCell, b: GridCell) -> u32 {
    let dx = (a.x - b.x).unsigned_abs();
    let dy = (a.y - b.y).unsigned_abs();
    let (short, long) = if dx < dy { (dx, dy) } else { (dy, dx) };
    step::DIAGONAL * short + step::ORTHOGONAL * (long - short)
}

/// A found route, start cell first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridPath {
    /// Cells from start to goal, both included.
    pub cells: Vec<GridCell>,
    /// Sum of step distances, ignoring penalties.
    pub distance: u32,
    /// Total search cost: step distances plus entered-cell penalties.
    pub cost: u32,
}

impl GridPath {
    /// Moves taken, i.e. cells after the start.
    pub fn steps(&self) -> usize {
        self.cells.len().saturating_sub(1)
    }

    /// World waypoints for every cell after the start, nearest first.
    pub fn waypoints(&self, map: &CostMap) -> Vec<Vec2> {
        self.cells
            .iter()
            .skip(1)
            .map(|&c| map.cell_center(c))
            .collect()
    }
}

#[derive(Debug, Clone, Copy)]
struct PathNode {
    cell: GridCell,
    g: u32,
    h: u32,
    parent: Option<usize>,
}

impl PathNode {
    fn f(&self) -> u32 {
        self.g + self.h
    }
}

const NEIGHBOURS: [IVec2; 8] = [
    IVec2::new(-1, -1),
    IVec2::new(-1, 0),
    IVec2::new(-1, 1),
    IVec2::new(0, -1),
    IVec2::new(0, 1),
    IVec2::new(1, -1),
    IVec2::new(1, 0),
    IVec2::new(1, 1),
];

/// Cheapest path from `start` to `goal`, or `None` if the goal cannot be
/// reached. The start cell's own penalty is never checked; a blocked or
/// out-of-grid goal always yields `None`.
pub fn build_path(map: &CostMap, start: GridCell, goal: GridCell) -> Option<GridPath> {
    if !map.in_bounds(start) || !map.is_walkable(goal) {
        return None;
    }

    let mut nodes = vec![PathNode {
        cell: start,
        g: 0,
        h: octile_distance(start, goal),
        parent: None,
    }];
    let mut lookup: HashMap<GridCell, usize> = HashMap::from([(start, 0)]);
    let mut open: Vec<usize> = vec![0];
    let mut closed: HashSet<GridCell> = HashSet::new();

    while !open.is_empty() {
        // First minimum by (F, H): the same pick as a stable sort.
        let mut best = 0;
        for (pos, &idx) in open.iter().enumerate().skip(1) {
            let (n, b) = (&nodes[idx], &nodes[open[best]]);
            if (n.f(), n.h) < (b.f(), b.h) {
                best = pos;
            }
        }
        let current = open.remove(best);
        let node = nodes[current];
        if node.cell == goal {
            return Some(reconstruct(&nodes, current));
        }
        closed.insert(node.cell);

        for offset in NEIGHBOURS {
            let cell = node.cell + offset;
            if closed.contains(&cell) {
                continue;
            }
            let penalty = map.effective_penalty(cell);
            if penalty == 0 {
                continue;
            }
            let g = node.g + octile_distance(node.cell, cell) + penalty;
            match lookup.get(&cell) {
                Some(&idx) => {
                    if g < nodes[idx].g {
                        nodes[idx].g = g;
                        nodes[idx].parent = Some(current);
                    }
                }
                None => {
                    let idx = nodes.len();
                    nodes.push(PathNode {
                        cell,
                        g,
                        h: octile_distance(cell, goal),
                        parent: Some(current),
                    });
                    lookup.insert(cell, idx);
                    open.push(idx);
                }
            }
        }
    }

    log::debug!("no path from {start:?} to {goal:?}");
    None
}

fn reconstruct(nodes: &[PathNode], goal: usize) -> GridPath {
    let mut cells = Vec::new();
    let mut distance = 0;
    let mut at = Some(goal);
    while let Some(idx) = at {
        let node = &nodes[idx];
        if let Some(parent) = node.parent {
            distance += octile_distance(nodes[parent].cell, node.cell);
        }
        cells.push(node.cell);
        at = node.parent;
    }
    cells.reverse();
    GridPath {
        cells,
        distance,
        cost: nodes[goal].g,
    }
}
