//! Per-room movement cost grids.
//!
//! Each placed room gets a `(width+1) × (height+1)` grid whose cell `(0,0)`
//! is the room's lower-left world tile. Two layers are kept:
//!
//! | Layer | Source | Rebuilt |
//! |-------|--------|---------|
//! | static | collision tiles (walls, water, preferred path) | once, at load |
//! | dynamic | movable props | wholesale, whenever a prop moves |
//!
//! The penalty the search sees is `min(static, dynamic)`; `0` means
//! impassable. Cells outside the grid read as impassable.

use crate::config::GridConfig;
use crate::constants::penalty;
use crate::geometry::{Bounds, IVec2, Vec2};
use crate::template::CollisionTiles;

/// Cell coordinate local to one room grid.
pub type GridCell = IVec2;

#[derive(Debug, Clone, PartialEq)]
pub struct CostMap {
    /// World tile of cell `(0,0)`.
    origin: IVec2,
    cols: i32,
    rows: i32,
    static_penalty: Vec<u32>,
    dynamic_penalty: Vec<u32>,
    default_penalty: u32,
    tile_size: f32,
}

impl CostMap {
    /// Grid over `bounds` with every cell at the default penalty.
    pub fn open(bounds: Bounds, config: &GridConfig) -> Self {
        let cols = (bounds.width() + 1).max(0);
        let rows = (bounds.height() + 1).max(0);
        let len = (cols * rows) as usize;
        Self {
            origin: bounds.lower,
            cols,
            rows,
            static_penalty: vec![config.default_penalty; len],
            dynamic_penalty: vec![config.default_penalty; len],
            default_penalty: config.default_penalty,
            tile_size: config.tile_size,
        }
    }

    /// Grid over `bounds` with static penalties read from `tiles`
    /// (grid-local cells).
    pub fn build(bounds: Bounds, tiles: &impl CollisionTiles, config: &GridConfig) -> Self {
        let mut map = Self::open(bounds, config);
        for y in 0..map.rows {
            for x in 0..map.cols {
                let cell = IVec2::new(x, y);
                let i = map.index_unchecked(cell);
                map.static_penalty[i] = config.penalty_for(tiles.tile_at(cell));
            }
        }
        map
    }

    pub fn cols(&self) -> i32 {
        self.cols
    }

    pub fn rows(&self) -> i32 {
        self.rows
    }

    pub fn origin(&self) -> IVec2 {
        self.origin
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    pub fn in_bounds(&self, cell: GridCell) -> bool {
        cell.x >= 0 && cell.y >= 0 && cell.x < self.cols && cell.y < self.rows
    }

    fn index(&self, cell: GridCell) -> Option<usize> {
        self.in_bounds(cell).then(|| self.index_unchecked(cell))
    }

    fn index_unchecked(&self, cell: GridCell) -> usize {
        (cell.y * self.cols + cell.x) as usize
    }

    pub fn static_penalty(&self, cell: GridCell) -> u32 {
        self.index(cell)
            .map_or(penalty::IMPASSABLE, |i| self.static_penalty[i])
    }

    pub fn dynamic_penalty(&self, cell: GridCell) -> u32 {
        self.index(cell)
            .map_or(penalty::IMPASSABLE, |i| self.dynamic_penalty[i])
    }

    /// Penalty the search pays to enter `cell`.
    pub fn effective_penalty(&self, cell: GridCell) -> u32 {
        match self.index(cell) {
            Some(i) => self.static_penalty[i].min(self.dynamic_penalty[i]),
            None => penalty::IMPASSABLE,
        }
    }

    pub fn is_walkable(&self, cell: GridCell) -> bool {
        self.effective_penalty(cell) != penalty::IMPASSABLE
    }

    /// Overwrite one static cell. Returns false when out of bounds.
    pub fn set_static(&mut self, cell: GridCell, value: u32) -> bool {
        match self.index(cell) {
            Some(i) => {
                self.static_penalty[i] = value;
                true
            }
            None => false,
        }
    }

    /// Reset the dynamic layer and block every cell covered by one of
    /// `obstacles` (world tile rectangles).
    pub fn rebuild_dynamic<'a>(&mut self, obstacles: impl IntoIterator<Item = &'a Bounds>) {
        self.dynamic_penalty.fill(self.default_penalty);
        let mut blocked = 0usize;
        for obstacle in obstacles {
            for y in obstacle.lower.y..=obstacle.upper.y {
                for x in obstacle.lower.x..=obstacle.upper.x {
                    if let Some(i) = self.index(IVec2::new(x, y) - self.origin) {
                        self.dynamic_penalty[i] = penalty::IMPASSABLE;
                        blocked += 1;
                    }
                }
            }
        }
        log::trace!("dynamic overlay rebuilt, {blocked} cells blocked");
    }

    /// World tile containing `pos`.
    pub fn world_to_tile(&self, pos: Vec2) -> IVec2 {
        IVec2::new(
            (pos.x / self.tile_size).floor() as i32,
            (pos.y / self.tile_size).floor() as i32,
        )
    }

    /// Grid cell containing world position `pos`, if it lies on this grid.
    pub fn world_to_cell(&self, pos: Vec2) -> Option<GridCell> {
        self.tile_to_cell(self.world_to_tile(pos))
    }

    pub fn tile_to_cell(&self, tile: IVec2) -> Option<GridCell> {
        let cell = tile - self.origin;
        self.in_bounds(cell).then_some(cell)
    }

    /// World-space centre of `cell`.
    pub fn cell_center(&self, cell: GridCell) -> Vec2 {
        let tile = self.origin + cell;
        let half = self.tile_size / 2.0;
        Vec2::new(
            tile.x as f32 * self.tile_size + half,
            tile.y as f32 * self.tile_size + half,
        )
    }

    /// `goal` if it is walkable, otherwise the first walkable cell within
    /// `radius`, scanning columns left to right and each column bottom to
    /// top.
    pub fn nearest_walkable(&self, goal: GridCell, radius: i32) -> Option<GridCell> {
        if self.is_walkable(goal) {
            return Some(goal);
        }
        for dx in -radius..=radius {
            for dy in -radius..=radius {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let cell = goal + IVec2::new(dx, dy);
                if self.is_walkable(cell) {
                    return Some(cell);
                }
            }
        }
        None
    }
}
