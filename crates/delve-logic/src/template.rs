//! Room templates: immutable designer assets the synthesizer instantiates.
//!
//! A template is described in its own tilemap coordinates. `bounds` is the
//! rectangle that just encloses the room's tiles, and doorway positions
//! are the middle tile of each opening, on the matching edge of `bounds`.
//! The collision layer covers exactly `bounds`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::tiles;
use crate::geometry::{Bounds, IVec2, Orientation};
use crate::room_type::RoomType;
use crate::spawn::{EnemiesByLevel, SpawnParameters};

/// Stable template identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateId(pub String);

impl TemplateId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for TemplateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ── Doorways ────────────────────────────────────────────────────────────

/// Connection state of one doorway during and after synthesis.
///
/// Only `Unconnected → Connected` and `Unconnected → Unavailable` are legal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DoorwayState {
    #[default]
    Unconnected,
    Connected,
    Unavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("doorway cannot move from {from:?} to {to:?}")]
pub struct DoorwayStateError {
    pub from: DoorwayState,
    pub to: DoorwayState,
}

impl DoorwayState {
    /// Apply a transition, rejecting anything but a move out of `Unconnected`.
    pub fn transition(self, to: DoorwayState) -> Result<DoorwayState, DoorwayStateError> {
        match (self, to) {
            (DoorwayState::Unconnected, DoorwayState::Connected)
            | (DoorwayState::Unconnected, DoorwayState::Unavailable) => Ok(to),
            (from, to) => Err(DoorwayStateError { from, to }),
        }
    }
}

/// Tiles copied across an unused opening to wall it off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoorwaySeal {
    /// Top-left tile of the block copied across the opening.
    pub copy_start: IVec2,
    pub copy_width: i32,
    pub copy_height: i32,
}

/// An opening on one edge of a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Doorway {
    pub orientation: Orientation,
    /// Middle tile of the opening, in template coordinates.
    pub position: IVec2,
    #[serde(default)]
    pub state: DoorwayState,
    #[serde(default)]
    pub seal: Option<DoorwaySeal>,
}

impl Doorway {
    pub fn new(orientation: Orientation, position: IVec2) -> Self {
        Self {
            orientation,
            position,
            state: DoorwayState::Unconnected,
            seal: None,
        }
    }

    pub fn is_available(&self) -> bool {
        self.state == DoorwayState::Unconnected
    }

    pub fn is_connected(&self) -> bool {
        self.state == DoorwayState::Connected
    }

    pub fn connect(&mut self) -> Result<(), DoorwayStateError> {
        self.state = self.state.transition(DoorwayState::Connected)?;
        Ok(())
    }

    pub fn mark_unavailable(&mut self) -> Result<(), DoorwayStateError> {
        self.state = self.state.transition(DoorwayState::Unavailable)?;
        Ok(())
    }
}

// ── Collision tiles ─────────────────────────────────────────────────────

/// Read access to a room's collision layer, in grid-local cells
/// (`(0,0)` is the room's lower-left tile).
pub trait CollisionTiles {
    /// Tile symbol at `cell`, or `None` when the cell has no tile or lies
    /// outside the layer.
    fn tile_at(&self, cell: IVec2) -> Option<char>;
}

/// Serialized form: one string per row, top (highest y) row first.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
struct TileRows(Vec<String>);

/// Dense collision layer. `tiles[y * cols + x]`, row 0 at the bottom.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "TileRows", into = "TileRows")]
pub struct TileLayer {
    cols: i32,
    rows: i32,
    tiles: Vec<char>,
}

impl From<TileRows> for TileLayer {
    fn from(rows: TileRows) -> Self {
        let lines: Vec<&str> = rows.0.iter().map(String::as_str).collect();
        TileLayer::from_rows(&lines)
    }
}

impl From<TileLayer> for TileRows {
    fn from(layer: TileLayer) -> Self {
        let rows = (0..layer.rows)
            .rev()
            .map(|y| {
                (0..layer.cols)
                    .map(|x| layer.tiles[(y * layer.cols + x) as usize])
                    .collect()
            })
            .collect();
        TileRows(rows)
    }
}

impl TileLayer {
    /// Layer with no tiles at all.
    pub fn open(cols: i32, rows: i32) -> Self {
        let (cols, rows) = (cols.max(0), rows.max(0));
        Self {
            cols,
            rows,
            tiles: vec![tiles::EMPTY; (cols * rows) as usize],
        }
    }

    /// Build from text rows, top row first. Short rows are padded with
    /// empty tiles to the widest row.
    pub fn from_rows(lines: &[&str]) -> Self {
        let rows = lines.len() as i32;
        let cols = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) as i32;
        let mut layer = Self::open(cols, rows);
        for (i, line) in lines.iter().enumerate() {
            let y = rows - 1 - i as i32;
            for (x, ch) in line.chars().enumerate() {
                layer.tiles[(y * cols + x as i32) as usize] = ch;
            }
        }
        layer
    }

    pub fn cols(&self) -> i32 {
        self.cols
    }

    pub fn rows(&self) -> i32 {
        self.rows
    }

    fn index(&self, cell: IVec2) -> Option<usize> {
        if cell.x < 0 || cell.y < 0 || cell.x >= self.cols || cell.y >= self.rows {
            return None;
        }
        Some((cell.y * self.cols + cell.x) as usize)
    }

    /// Raw symbol at `cell`, including [`tiles::EMPTY`].
    pub fn get(&self, cell: IVec2) -> Option<char> {
        self.index(cell).map(|i| self.tiles[i])
    }

    /// Returns false if `cell` is outside the layer.
    pub fn set(&mut self, cell: IVec2, tile: char) -> bool {
        match self.index(cell) {
            Some(i) => {
                self.tiles[i] = tile;
                true
            }
            None => false,
        }
    }

    /// Wall off an unused doorway by smearing the tiles beside the opening
    /// across it. `origin` is the template coordinate of layer cell `(0,0)`.
    ///
    /// North/south openings copy each tile one column east; east/west
    /// openings copy each tile one row south.
    pub fn seal_doorway(&mut self, doorway: &Doorway, origin: IVec2) {
        let Some(seal) = doorway.seal else {
            return;
        };
        let start = seal.copy_start - origin;
        if doorway.orientation.is_vertical() {
            for dx in 0..seal.copy_width {
                for dy in 0..seal.copy_height {
                    let from = IVec2::new(start.x + dx, start.y - dy);
                    if let Some(tile) = self.get(from) {
                        self.set(IVec2::new(from.x + 1, from.y), tile);
                    }
                }
            }
        } else {
            for dy in 0..seal.copy_height {
                for dx in 0..seal.copy_width {
                    let from = IVec2::new(start.x + dx, start.y - dy);
                    if let Some(tile) = self.get(from) {
                        self.set(IVec2::new(from.x, from.y - 1), tile);
                    }
                }
            }
        }
    }
}

impl CollisionTiles for TileLayer {
    fn tile_at(&self, cell: IVec2) -> Option<char> {
        self.get(cell).filter(|&t| t != tiles::EMPTY)
    }
}

// ── Templates ───────────────────────────────────────────────────────────

/// Malformed template data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("template {template}: more than one {orientation:?} doorway")]
    DuplicateDoorway {
        template: TemplateId,
        orientation: Orientation,
    },
    #[error("template {template}: {orientation:?} doorway at {position:?} is not on that edge")]
    DoorwayOffEdge {
        template: TemplateId,
        orientation: Orientation,
        position: IVec2,
    },
    #[error("template {template}: doorways must start unconnected")]
    DoorwayPreconnected { template: TemplateId },
    #[error("template {template}: collision layer is {cols}x{rows}, bounds need {want_cols}x{want_rows}")]
    LayerSize {
        template: TemplateId,
        cols: i32,
        rows: i32,
        want_cols: i32,
        want_rows: i32,
    },
    #[error("template {template}: bounds are inverted")]
    InvertedBounds { template: TemplateId },
    #[error("template {template}: graph-only type {room_type} cannot be a template")]
    GraphOnlyType {
        template: TemplateId,
        room_type: RoomType,
    },
}

/// A reusable room layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomTemplate {
    pub id: TemplateId,
    pub room_type: RoomType,
    /// Lower-left and upper-right tiles, in template coordinates.
    pub bounds: Bounds,
    pub doorways: Vec<Doorway>,
    /// Collision tiles covering `bounds`.
    pub collision: TileLayer,
    /// Candidate enemy spawn tiles, in template coordinates.
    #[serde(default)]
    pub spawn_positions: Vec<IVec2>,
    #[serde(default)]
    pub enemies_by_level: Vec<EnemiesByLevel>,
    #[serde(default)]
    pub spawn_parameters: Vec<SpawnParameters>,
}

impl RoomTemplate {
    /// Template with no doorways and an empty collision layer sized to
    /// the bounds.
    pub fn new(id: &str, room_type: RoomType, lower: IVec2, upper: IVec2) -> Self {
        let bounds = Bounds::new(lower, upper);
        Self {
            id: TemplateId::new(id),
            room_type,
            bounds,
            doorways: Vec::new(),
            collision: TileLayer::open(bounds.width() + 1, bounds.height() + 1),
            spawn_positions: Vec::new(),
            enemies_by_level: Vec::new(),
            spawn_parameters: Vec::new(),
        }
    }

    pub fn with_doorway(mut self, orientation: Orientation, position: IVec2) -> Self {
        self.doorways.push(Doorway::new(orientation, position));
        self
    }

    pub fn with_sealed_doorway(
        mut self,
        orientation: Orientation,
        position: IVec2,
        seal: DoorwaySeal,
    ) -> Self {
        let mut doorway = Doorway::new(orientation, position);
        doorway.seal = Some(seal);
        self.doorways.push(doorway);
        self
    }

    pub fn with_collision(mut self, collision: TileLayer) -> Self {
        self.collision = collision;
        self
    }

    pub fn with_spawn_positions(mut self, positions: Vec<IVec2>) -> Self {
        self.spawn_positions = positions;
        self
    }

    pub fn with_enemies(mut self, enemies: EnemiesByLevel, parameters: SpawnParameters) -> Self {
        self.enemies_by_level.push(enemies);
        self.spawn_parameters.push(parameters);
        self
    }

    pub fn doorway(&self, orientation: Orientation) -> Option<&Doorway> {
        self.doorways.iter().find(|d| d.orientation == orientation)
    }

    /// Spawn parameters for a dungeon level, if the template has any.
    pub fn spawn_parameters_for(&self, level: &str) -> Option<&SpawnParameters> {
        self.spawn_parameters.iter().find(|p| p.level == level)
    }

    pub fn enemies_for(&self, level: &str) -> Option<&EnemiesByLevel> {
        self.enemies_by_level.iter().find(|e| e.level == level)
    }

    pub fn validate(&self) -> Result<(), TemplateError> {
        let template = self.id.clone();
        if matches!(self.room_type, RoomType::Corridor | RoomType::None) {
            return Err(TemplateError::GraphOnlyType {
                template,
                room_type: self.room_type,
            });
        }
        if self.bounds.width() < 0 || self.bounds.height() < 0 {
            return Err(TemplateError::InvertedBounds { template });
        }
        let (want_cols, want_rows) = (self.bounds.width() + 1, self.bounds.height() + 1);
        if self.collision.cols() != want_cols || self.collision.rows() != want_rows {
            return Err(TemplateError::LayerSize {
                template,
                cols: self.collision.cols(),
                rows: self.collision.rows(),
                want_cols,
                want_rows,
            });
        }
        for (i, doorway) in self.doorways.iter().enumerate() {
            if self.doorways[..i]
                .iter()
                .any(|d| d.orientation == doorway.orientation)
            {
                return Err(TemplateError::DuplicateDoorway {
                    template,
                    orientation: doorway.orientation,
                });
            }
            if doorway.state != DoorwayState::Unconnected {
                return Err(TemplateError::DoorwayPreconnected { template });
            }
            let p = doorway.position;
            let b = &self.bounds;
            let on_edge = match doorway.orientation {
                Orientation::North => p.y == b.upper.y,
                Orientation::South => p.y == b.lower.y,
                Orientation::East => p.x == b.upper.x,
                Orientation::West => p.x == b.lower.x,
            };
            if !on_edge || !b.contains(p) {
                return Err(TemplateError::DoorwayOffEdge {
                    template,
                    orientation: doorway.orientation,
                    position: p,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> RoomTemplate {
        RoomTemplate::new("sq", RoomType::Normal, IVec2::ZERO, IVec2::new(4, 4))
            .with_doorway(Orientation::North, IVec2::new(2, 4))
            .with_doorway(Orientation::West, IVec2::new(0, 2))
    }

    #[test]
    fn doorway_transitions_are_one_way() {
        let mut d = Doorway::new(Orientation::North, IVec2::ZERO);
        assert!(d.is_available());
        d.connect().unwrap();
        assert!(d.is_connected());
        assert!(d.mark_unavailable().is_err());
        assert!(d.connect().is_err());

        let mut d = Doorway::new(Orientation::South, IVec2::ZERO);
        d.mark_unavailable().unwrap();
        assert_eq!(
            d.connect(),
            Err(DoorwayStateError {
                from: DoorwayState::Unavailable,
                to: DoorwayState::Connected
            })
        );
    }

    #[test]
    fn valid_template_passes() {
        assert_eq!(square().validate(), Ok(()));
    }

    #[test]
    fn duplicate_orientation_rejected() {
        let t = square().with_doorway(Orientation::North, IVec2::new(3, 4));
        assert!(matches!(
            t.validate(),
            Err(TemplateError::DuplicateDoorway { .. })
        ));
    }

    #[test]
    fn doorway_must_sit_on_its_edge() {
        let t = RoomTemplate::new("t", RoomType::Normal, IVec2::ZERO, IVec2::new(4, 4))
            .with_doorway(Orientation::East, IVec2::new(2, 2));
        assert!(matches!(
            t.validate(),
            Err(TemplateError::DoorwayOffEdge { .. })
        ));
    }

    #[test]
    fn layer_must_cover_bounds() {
        let t = square().with_collision(TileLayer::open(3, 3));
        assert!(matches!(t.validate(), Err(TemplateError::LayerSize { .. })));
    }

    #[test]
    fn rows_are_read_top_first() {
        let layer = TileLayer::from_rows(&["#..", "..="]);
        assert_eq!(layer.cols(), 3);
        assert_eq!(layer.rows(), 2);
        // Bottom row is the last string.
        assert_eq!(layer.get(IVec2::new(2, 0)), Some('='));
        assert_eq!(layer.get(IVec2::new(0, 1)), Some('#'));
        assert_eq!(layer.get(IVec2::new(3, 0)), None);
    }

    #[test]
    fn empty_tiles_are_not_collision_tiles() {
        let layer = TileLayer::from_rows(&["# "]);
        assert_eq!(layer.tile_at(IVec2::new(0, 0)), Some('#'));
        assert_eq!(layer.tile_at(IVec2::new(1, 0)), None);
    }

    #[test]
    fn sealing_north_doorway_closes_gap() {
        // Top wall with a 3-tile gap at x = 1..=3.
        let mut layer = TileLayer::from_rows(&["#...#", "#...#", "#####"]);
        let mut doorway = Doorway::new(Orientation::North, IVec2::new(2, 2));
        doorway.seal = Some(DoorwaySeal {
            copy_start: IVec2::new(0, 2),
            copy_width: 3,
            copy_height: 1,
        });
        layer.seal_doorway(&doorway, IVec2::ZERO);
        assert_eq!(layer.get(IVec2::new(1, 2)), Some('#'));
        assert_eq!(layer.get(IVec2::new(2, 2)), Some('#'));
        assert_eq!(layer.get(IVec2::new(3, 2)), Some('#'));
        // Row below untouched.
        assert_eq!(layer.get(IVec2::new(2, 1)), Some('.'));
    }

    #[test]
    fn sealing_east_doorway_copies_downward() {
        let mut layer = TileLayer::from_rows(&["###", "#..", "#..", "#..", "###"]);
        let mut doorway = Doorway::new(Orientation::East, IVec2::new(2, 2));
        doorway.seal = Some(DoorwaySeal {
            copy_start: IVec2::new(2, 4),
            copy_width: 1,
            copy_height: 3,
        });
        layer.seal_doorway(&doorway, IVec2::ZERO);
        for y in 1..=3 {
            assert_eq!(layer.get(IVec2::new(2, y)), Some('#'), "y={y}");
        }
    }

    #[test]
    fn doorway_without_seal_is_left_alone() {
        let mut layer = TileLayer::from_rows(&["#.#"]);
        let before = layer.clone();
        layer.seal_doorway(&Doorway::new(Orientation::North, IVec2::new(1, 0)), IVec2::ZERO);
        assert_eq!(layer, before);
    }
}
