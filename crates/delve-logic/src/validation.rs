//! Validation for level data and generated layouts.
//!
//! Pure functions returning lists of issues rather than failing fast, so a
//! harness can report everything wrong with a level or dungeon at once.

use std::collections::{HashSet, VecDeque};

use crate::geometry::IVec2;
use crate::graph::NodeId;
use crate::layout::Dungeon;
use crate::level::DungeonLevel;
use crate::room::RoomInstance;
use crate::room_type::RoomType;

/// A single validation finding.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationIssue {
    pub category: &'static str,
    pub severity: Severity,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl ValidationIssue {
    fn error(category: &'static str, message: String) -> Self {
        Self {
            category,
            severity: Severity::Error,
            message,
        }
    }

    fn warning(category: &'static str, message: String) -> Self {
        Self {
            category,
            severity: Severity::Warning,
            message,
        }
    }
}

/// True if none of `issues` is an error.
pub fn is_clean(issues: &[ValidationIssue]) -> bool {
    issues.iter().all(|i| i.severity != Severity::Error)
}

// ── A. Level data ───────────────────────────────────────────────────────

/// Templates the synthesizer cannot do without.
pub fn check_required_templates(level: &DungeonLevel) -> Vec<ValidationIssue> {
    [RoomType::Entrance, RoomType::CorridorNS, RoomType::CorridorEW]
        .into_iter()
        .filter(|t| !level.templates.iter().any(|tpl| tpl.room_type == *t))
        .map(|t| {
            ValidationIssue::error(
                "templates",
                format!("level {} has no {t} template", level.name),
            )
        })
        .collect()
}

pub fn check_templates(level: &DungeonLevel) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let mut seen = HashSet::new();
    for template in &level.templates {
        if !seen.insert(&template.id) {
            issues.push(ValidationIssue::warning(
                "templates",
                format!("duplicate template id {}, first definition wins", template.id),
            ));
        }
        if let Err(err) = template.validate() {
            issues.push(ValidationIssue::error("templates", err.to_string()));
        }
    }
    issues
}

pub fn check_graphs(level: &DungeonLevel) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    if level.graphs.is_empty() {
        issues.push(ValidationIssue::error(
            "room_graph",
            format!("level {} has no room graphs", level.name),
        ));
    }
    for graph in &level.graphs {
        if let Err(err) = graph.validate() {
            issues.push(ValidationIssue::error(
                "room_graph",
                format!("graph {}: {err}", graph.name),
            ));
        }
    }
    issues
}

/// Every node type used by a graph needs at least one template.
pub fn check_node_types_have_templates(level: &DungeonLevel) -> Vec<ValidationIssue> {
    let available: HashSet<RoomType> = level.templates.iter().map(|t| t.room_type).collect();
    let mut issues = Vec::new();
    let mut reported = HashSet::new();
    for graph in &level.graphs {
        for node in graph.nodes() {
            let needed: &[RoomType] = match node.room_type {
                RoomType::Corridor => &[RoomType::CorridorNS, RoomType::CorridorEW],
                RoomType::None => &[],
                ref other => std::slice::from_ref(other),
            };
            for t in needed {
                if !available.contains(t) && reported.insert(*t) {
                    issues.push(ValidationIssue::error(
                        "templates",
                        format!(
                            "graph {} uses {} but level {} has no {t} template",
                            graph.name, node.room_type, level.name
                        ),
                    ));
                }
            }
        }
    }
    issues
}

/// Spawn ranges must be ordered, and a room that spawns enemies needs room
/// for at least one at a time.
pub fn check_spawn_parameters(level: &DungeonLevel) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    for template in &level.templates {
        for params in &template.spawn_parameters {
            let mut report = |what: &str| {
                issues.push(ValidationIssue::error(
                    "spawning",
                    format!("template {} level {}: {what}", template.id, params.level),
                ));
            };
            if params.min_total_enemies > params.max_total_enemies {
                report("min_total_enemies exceeds max_total_enemies");
            }
            if params.min_concurrent > params.max_concurrent {
                report("min_concurrent exceeds max_concurrent");
            }
            if params.min_spawn_interval > params.max_spawn_interval {
                report("min_spawn_interval exceeds max_spawn_interval");
            }
            if params.min_spawn_interval < 0.0 {
                report("min_spawn_interval is negative");
            }
            if params.max_total_enemies > 0 && params.max_concurrent == 0 {
                report("enemies to spawn but max_concurrent is 0");
            }
        }
    }
    issues
}

/// Run every level-data check.
pub fn validate_level(level: &DungeonLevel) -> Vec<ValidationIssue> {
    let mut all = Vec::new();
    all.extend(check_required_templates(level));
    all.extend(check_templates(level));
    all.extend(check_spawn_parameters(level));
    all.extend(check_graphs(level));
    all.extend(check_node_types_have_templates(level));
    all
}

// ── B. Generated layouts ────────────────────────────────────────────────

pub fn check_room_overlaps(dungeon: &Dungeon) -> Vec<ValidationIssue> {
    let rooms: Vec<&RoomInstance> = dungeon.rooms().iter().map(|(_, r)| r).collect();
    let mut issues = Vec::new();
    for (i, a) in rooms.iter().enumerate() {
        if !a.is_positioned {
            issues.push(ValidationIssue::error(
                "room_overlap",
                format!("room {} was never positioned", a.id),
            ));
        }
        for b in &rooms[i + 1..] {
            if a.bounds.overlaps(&b.bounds) {
                issues.push(ValidationIssue::error(
                    "room_overlap",
                    format!("rooms {} and {} overlap", a.id, b.id),
                ));
            }
        }
    }
    issues
}

/// Each connected doorway must face exactly one connected doorway of the
/// opposite orientation, one tile away, on its parent or a child.
pub fn check_doorway_reciprocity(dungeon: &Dungeon) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    for (_, room) in dungeon.rooms().iter() {
        for door in room.connected_doorways() {
            let partner_at: IVec2 =
                room.doorway_world(door) + door.orientation.opposite().placement_offset();
            let partners: Vec<&NodeId> = dungeon
                .rooms()
                .iter()
                .filter(|(_, other)| other.id != room.id)
                .filter(|(_, other)| {
                    other.connected_doorways().any(|d| {
                        d.orientation == door.orientation.opposite()
                            && other.doorway_world(d) == partner_at
                    })
                })
                .map(|(_, other)| &other.id)
                .collect();
            match partners.as_slice() {
                [one] => {
                    let linked = room.parent.as_ref() == Some(*one) || room.children.contains(*one);
                    if !linked {
                        issues.push(ValidationIssue::error(
                            "doorway",
                            format!("room {} is joined to unrelated room {one}", room.id),
                        ));
                    }
                }
                other => issues.push(ValidationIssue::error(
                    "doorway",
                    format!(
                        "room {} {:?} doorway has {} partners",
                        room.id,
                        door.orientation,
                        other.len()
                    ),
                )),
            }
        }
    }
    issues
}

/// Placed rooms form a tree rooted at the entrance.
pub fn check_connectivity(dungeon: &Dungeon) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let rooms = dungeon.rooms();
    let Some(entrance) = dungeon.room(dungeon.entrance()) else {
        issues.push(ValidationIssue::error(
            "connectivity",
            "dungeon has no entrance room".to_string(),
        ));
        return issues;
    };
    if entrance.parent.is_some() {
        issues.push(ValidationIssue::error(
            "connectivity",
            format!("entrance {} has a parent", entrance.id),
        ));
    }

    let mut visited: HashSet<&NodeId> = HashSet::new();
    let mut queue = VecDeque::from([entrance]);
    visited.insert(&entrance.id);
    while let Some(room) = queue.pop_front() {
        for child_id in &room.children {
            let Some(child) = rooms.by_id(child_id) else {
                issues.push(ValidationIssue::error(
                    "connectivity",
                    format!("room {} lists missing child {child_id}", room.id),
                ));
                continue;
            };
            if child.parent.as_ref() != Some(&room.id) {
                issues.push(ValidationIssue::error(
                    "connectivity",
                    format!("room {child_id} does not name {} as parent", room.id),
                ));
            }
            if !visited.insert(&child.id) {
                issues.push(ValidationIssue::error(
                    "connectivity",
                    format!("room {child_id} reached twice"),
                ));
                continue;
            }
            queue.push_back(child);
        }
    }
    for (_, room) in rooms.iter() {
        if !visited.contains(&room.id) {
            issues.push(ValidationIssue::error(
                "connectivity",
                format!("room {} is not reachable from the entrance", room.id),
            ));
        }
    }
    issues
}

/// Run every layout check.
pub fn check_layout(dungeon: &Dungeon) -> Vec<ValidationIssue> {
    let mut all = Vec::new();
    all.extend(check_room_overlaps(dungeon));
    all.extend(check_doorway_reciprocity(dungeon));
    all.extend(check_connectivity(dungeon));
    all
}
