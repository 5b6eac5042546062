//! Room type tags shared by graph nodes and templates.

use serde::{Deserialize, Serialize};

use crate::geometry::Orientation;

/// What kind of room a graph node or template stands for.
///
/// Graph nodes use [`RoomType::Corridor`]; templates never do. A corridor
/// node is resolved to a [`RoomType::CorridorNS`] or [`RoomType::CorridorEW`]
/// template depending on which parent doorway it hangs off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomType {
    Entrance,
    Corridor,
    #[serde(rename = "corridor_ns")]
    CorridorNS,
    #[serde(rename = "corridor_ew")]
    CorridorEW,
    Normal,
    Boss,
    None,
}

impl RoomType {
    pub fn is_corridor(self) -> bool {
        matches!(
            self,
            RoomType::Corridor | RoomType::CorridorNS | RoomType::CorridorEW
        )
    }

    /// Rooms that a corridor may join: everything that is not a corridor
    /// or the `None` placeholder.
    pub fn is_room(self) -> bool {
        match self {
            RoomType::Entrance | RoomType::Normal | RoomType::Boss => true,
            RoomType::Corridor | RoomType::CorridorNS | RoomType::CorridorEW | RoomType::None => {
                false
            }
        }
    }

    /// Template type to look up for a node of this type entered through a
    /// parent doorway facing `parent_doorway`.
    pub fn template_type_for(self, parent_doorway: Orientation) -> RoomType {
        match self {
            RoomType::Corridor => {
                if parent_doorway.is_vertical() {
                    RoomType::CorridorNS
                } else {
                    RoomType::CorridorEW
                }
            }
            other => other,
        }
    }

    /// Whether enemy spawning ever applies to rooms of this type.
    pub fn hosts_enemies(self) -> bool {
        match self {
            RoomType::Normal | RoomType::Boss => true,
            RoomType::Entrance
            | RoomType::Corridor
            | RoomType::CorridorNS
            | RoomType::CorridorEW
            | RoomType::None => false,
        }
    }
}

impl std::fmt::Display for RoomType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RoomType::Entrance => "entrance",
            RoomType::Corridor => "corridor",
            RoomType::CorridorNS => "corridor_ns",
            RoomType::CorridorEW => "corridor_ew",
            RoomType::Normal => "normal",
            RoomType::Boss => "boss",
            RoomType::None => "none",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corridor_resolves_by_doorway_axis() {
        assert_eq!(
            RoomType::Corridor.template_type_for(Orientation::North),
            RoomType::CorridorNS
        );
        assert_eq!(
            RoomType::Corridor.template_type_for(Orientation::South),
            RoomType::CorridorNS
        );
        assert_eq!(
            RoomType::Corridor.template_type_for(Orientation::East),
            RoomType::CorridorEW
        );
        assert_eq!(
            RoomType::Corridor.template_type_for(Orientation::West),
            RoomType::CorridorEW
        );
    }

    #[test]
    fn rooms_keep_their_type() {
        for t in [RoomType::Entrance, RoomType::Normal, RoomType::Boss] {
            assert_eq!(t.template_type_for(Orientation::East), t);
        }
    }

    #[test]
    fn corridors_are_not_rooms() {
        assert!(!RoomType::CorridorNS.is_room());
        assert!(RoomType::CorridorEW.is_corridor());
        assert!(RoomType::Entrance.is_room());
        assert!(!RoomType::None.is_room());
        assert!(!RoomType::None.is_corridor());
    }

    #[test]
    fn display_matches_data_names() {
        assert_eq!(RoomType::CorridorNS.to_string(), "corridor_ns");
        assert_eq!(RoomType::Boss.to_string(), "boss");
    }
}
