//! Tile and world geometry: integer cells, inclusive rectangles, doorway
//! orientations, and the float vector agents move with.
//!
//! Tile coordinates grow east (+x) and north (+y). Room bounds are
//! inclusive on both corners, so a room spanning `(0,0)..=(10,8)` covers
//! 11×9 tiles.

use serde::{Deserialize, Serialize};

/// Integer tile coordinate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IVec2 {
    pub x: i32,
    pub y: i32,
}

impl IVec2 {
    pub const ZERO: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl std::ops::Add for IVec2 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

impl std::ops::Sub for IVec2 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }
}

/// Inclusive axis-aligned tile rectangle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bounds {
    pub lower: IVec2,
    pub upper: IVec2,
}

impl Bounds {
    pub const fn new(lower: IVec2, upper: IVec2) -> Self {
        Self { lower, upper }
    }

    /// Span in tiles minus one (`upper.x - lower.x`).
    pub fn width(&self) -> i32 {
        self.upper.x - self.lower.x
    }

    /// Span in tiles minus one (`upper.y - lower.y`).
    pub fn height(&self) -> i32 {
        self.upper.y - self.lower.y
    }

    /// Same extent, moved so its lower corner sits at `lower`.
    pub fn moved_to(&self, lower: IVec2) -> Self {
        Self {
            lower,
            upper: lower + (self.upper - self.lower),
        }
    }

    pub fn contains(&self, cell: IVec2) -> bool {
        cell.x >= self.lower.x
            && cell.x <= self.upper.x
            && cell.y >= self.lower.y
            && cell.y <= self.upper.y
    }

    /// Two rectangles overlap only if their projections overlap on both axes.
    pub fn overlaps(&self, other: &Bounds) -> bool {
        intervals_overlap(self.lower.x, self.upper.x, other.lower.x, other.upper.x)
            && intervals_overlap(self.lower.y, self.upper.y, other.lower.y, other.upper.y)
    }
}

fn intervals_overlap(min_a: i32, max_a: i32, min_b: i32, max_b: i32) -> bool {
    min_a.max(min_b) <= max_a.min(max_b)
}

/// Compass side of a room a doorway opens on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    North,
    East,
    South,
    West,
}

impl Orientation {
    pub const ALL: [Orientation; 4] = [
        Orientation::North,
        Orientation::East,
        Orientation::South,
        Orientation::West,
    ];

    /// The side a connecting doorway must face.
    pub fn opposite(self) -> Self {
        match self {
            Orientation::North => Orientation::South,
            Orientation::South => Orientation::North,
            Orientation::East => Orientation::West,
            Orientation::West => Orientation::East,
        }
    }

    /// Offset applied to a child room whose matching doorway faces `self`,
    /// so its opening sits one tile beyond the parent's.
    pub fn placement_offset(self) -> IVec2 {
        match self {
            Orientation::North => IVec2::new(0, -1),
            Orientation::South => IVec2::new(0, 1),
            Orientation::East => IVec2::new(-1, 0),
            Orientation::West => IVec2::new(1, 0),
        }
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, Orientation::North | Orientation::South)
    }
}

/// World-space position, one tile per `tile_size` units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance_squared(&self, other: &Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    pub fn distance(&self, other: &Self) -> f32 {
        self.distance_squared(other).sqrt()
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len > 0.0 {
            Self {
                x: self.x / len,
                y: self.y / len,
            }
        } else {
            Self::ZERO
        }
    }
}

impl std::ops::Add for Vec2 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }
}

impl std::ops::Mul<f32> for Vec2 {
    type Output = Self;
    fn mul(self, scalar: f32) -> Self {
        Self::new(self.x * scalar, self.y * scalar)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x0: i32, y0: i32, x1: i32, y1: i32) -> Bounds {
        Bounds::new(IVec2::new(x0, y0), IVec2::new(x1, y1))
    }

    #[test]
    fn touching_edges_overlap() {
        // Inclusive bounds: sharing a tile column is an overlap.
        assert!(rect(0, 0, 4, 4).overlaps(&rect(4, 0, 8, 4)));
    }

    #[test]
    fn adjacent_rooms_do_not_overlap() {
        assert!(!rect(0, 0, 4, 4).overlaps(&rect(5, 0, 9, 4)));
        assert!(!rect(0, 0, 4, 4).overlaps(&rect(0, 5, 4, 9)));
    }

    #[test]
    fn overlap_needs_both_axes() {
        // Overlap on x only.
        assert!(!rect(0, 0, 4, 4).overlaps(&rect(2, 10, 6, 14)));
        // Overlap on y only.
        assert!(!rect(0, 0, 4, 4).overlaps(&rect(10, 2, 14, 6)));
    }

    #[test]
    fn moved_to_keeps_extent() {
        let b = rect(-3, 2, 5, 9).moved_to(IVec2::new(10, 10));
        assert_eq!(b, rect(10, 10, 18, 17));
        assert_eq!(b.width(), 8);
        assert_eq!(b.height(), 7);
    }

    #[test]
    fn opposite_is_involution() {
        for o in Orientation::ALL {
            assert_ne!(o, o.opposite());
            assert_eq!(o, o.opposite().opposite());
        }
    }

    #[test]
    fn placement_offsets_point_away_from_parent() {
        // A child's south doorway connects to a parent's north doorway, so
        // the child sits one tile further north.
        assert_eq!(Orientation::South.placement_offset(), IVec2::new(0, 1));
        assert_eq!(Orientation::West.placement_offset(), IVec2::new(1, 0));
    }

    #[test]
    fn vec2_normalize_zero() {
        assert_eq!(Vec2::ZERO.normalize(), Vec2::ZERO);
        let n = Vec2::new(3.0, 4.0).normalize();
        assert!((n.length() - 1.0).abs() < 1e-6);
    }
}
