//! The designer-authored room graph: which room types connect to which,
//! independent of any geometry.

use std::collections::{HashMap, HashSet, VecDeque};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::layout::MAX_CHILD_CORRIDORS;
use crate::room_type::RoomType;

/// Stable designer id of a graph node. Placed rooms reuse it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One node of the room graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomNode {
    pub id: NodeId,
    pub room_type: RoomType,
    #[serde(default)]
    pub parents: Vec<NodeId>,
    #[serde(default)]
    pub children: Vec<NodeId>,
}

/// Structural problems in a room graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("graph has no entrance node")]
    NoEntrance,
    #[error("graph has {count} entrance nodes, expected one")]
    MultipleEntrances { count: usize },
    #[error("duplicate node id {0}")]
    DuplicateId(NodeId),
    #[error("node {from} references unknown node {to}")]
    UnknownNode { from: NodeId, to: NodeId },
    #[error("link {parent} -> {child} is not recorded on both ends")]
    InconsistentLink { parent: NodeId, child: NodeId },
    #[error("entrance {0} must not have a parent")]
    EntranceHasParent(NodeId),
    #[error("node {node} has {count} parents, expected exactly one")]
    ParentCount { node: NodeId, count: usize },
    #[error("{parent} -> {child} joins two corridors or two rooms")]
    CorridorAdjacency { parent: NodeId, child: NodeId },
    #[error("node {node} has {count} corridor children")]
    TooManyCorridors { node: NodeId, count: usize },
    #[error("node {0} has no room type")]
    UntypedNode(NodeId),
    #[error("node {0} is not reachable from the entrance")]
    Disconnected(NodeId),
}

/// Raw serialized form; [`RoomGraph`] adds an id index on load.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawRoomGraph {
    name: String,
    nodes: Vec<RoomNode>,
}

/// A directed room graph rooted at a single entrance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "RawRoomGraph", into = "RawRoomGraph")]
pub struct RoomGraph {
    pub name: String,
    nodes: Vec<RoomNode>,
    index: HashMap<NodeId, usize>,
}

impl From<RawRoomGraph> for RoomGraph {
    fn from(raw: RawRoomGraph) -> Self {
        let mut graph = RoomGraph::new(raw.name);
        for node in raw.nodes {
            graph.push(node);
        }
        graph
    }
}

impl From<RoomGraph> for RawRoomGraph {
    fn from(graph: RoomGraph) -> Self {
        RawRoomGraph {
            name: graph.name,
            nodes: graph.nodes,
        }
    }
}

impl RoomGraph {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nodes: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Add a node with no links.
    pub fn with_node(mut self, id: &str, room_type: RoomType) -> Self {
        self.push(RoomNode {
            id: NodeId::new(id),
            room_type,
            parents: Vec::new(),
            children: Vec::new(),
        });
        self
    }

    /// Link `parent -> child`, recording the edge on both nodes.
    /// Unknown ids are ignored.
    pub fn with_edge(mut self, parent: &str, child: &str) -> Self {
        let (parent, child) = (NodeId::new(parent), NodeId::new(child));
        if let (Some(&p), Some(&c)) = (self.index.get(&parent), self.index.get(&child)) {
            self.nodes[p].children.push(child);
            self.nodes[c].parents.push(parent);
        }
        self
    }

    fn push(&mut self, node: RoomNode) {
        // Duplicates stay in `nodes` so validate() can report them.
        self.index
            .entry(node.id.clone())
            .or_insert(self.nodes.len());
        self.nodes.push(node);
    }

    pub fn nodes(&self) -> &[RoomNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: &NodeId) -> Option<&RoomNode> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    /// First node tagged as the entrance.
    pub fn entrance(&self) -> Option<&RoomNode> {
        self.nodes.iter().find(|n| n.room_type == RoomType::Entrance)
    }

    /// Children of `node` in authored order. Unknown ids are skipped.
    pub fn children<'a>(&'a self, node: &'a RoomNode) -> impl Iterator<Item = &'a RoomNode> + 'a {
        node.children.iter().filter_map(move |id| self.node(id))
    }

    /// Check the structural rules the layout synthesizer relies on.
    pub fn validate(&self) -> Result<(), GraphError> {
        let mut seen = HashSet::new();
        for node in &self.nodes {
            if !seen.insert(&node.id) {
                return Err(GraphError::DuplicateId(node.id.clone()));
            }
            if node.room_type == RoomType::None {
                return Err(GraphError::UntypedNode(node.id.clone()));
            }
        }

        let entrances: Vec<&RoomNode> = self
            .nodes
            .iter()
            .filter(|n| n.room_type == RoomType::Entrance)
            .collect();
        let entrance = match entrances.as_slice() {
            [] => return Err(GraphError::NoEntrance),
            [one] => *one,
            many => return Err(GraphError::MultipleEntrances { count: many.len() }),
        };
        if !entrance.parents.is_empty() {
            return Err(GraphError::EntranceHasParent(entrance.id.clone()));
        }

        for node in &self.nodes {
            for child_id in &node.children {
                let child = self.node(child_id).ok_or_else(|| GraphError::UnknownNode {
                    from: node.id.clone(),
                    to: child_id.clone(),
                })?;
                if !child.parents.contains(&node.id) {
                    return Err(GraphError::InconsistentLink {
                        parent: node.id.clone(),
                        child: child_id.clone(),
                    });
                }
                // Corridors alternate with rooms.
                if node.room_type.is_corridor() == child.room_type.is_corridor() {
                    return Err(GraphError::CorridorAdjacency {
                        parent: node.id.clone(),
                        child: child_id.clone(),
                    });
                }
            }
            for parent_id in &node.parents {
                let parent = self.node(parent_id).ok_or_else(|| GraphError::UnknownNode {
                    from: node.id.clone(),
                    to: parent_id.clone(),
                })?;
                if !parent.children.contains(&node.id) {
                    return Err(GraphError::InconsistentLink {
                        parent: parent_id.clone(),
                        child: node.id.clone(),
                    });
                }
            }
            if node.id != entrance.id && node.parents.len() != 1 {
                return Err(GraphError::ParentCount {
                    node: node.id.clone(),
                    count: node.parents.len(),
                });
            }
            let corridors = self
                .children(node)
                .filter(|c| c.room_type.is_corridor())
                .count();
            if corridors > MAX_CHILD_CORRIDORS {
                return Err(GraphError::TooManyCorridors {
                    node: node.id.clone(),
                    count: corridors,
                });
            }
        }

        // With one parent per node, reaching every node from the entrance
        // also rules out cycles.
        let mut reached: HashSet<&NodeId> = HashSet::new();
        let mut queue = VecDeque::from([entrance]);
        reached.insert(&entrance.id);
        while let Some(node) = queue.pop_front() {
            for child in self.children(node) {
                if reached.insert(&child.id) {
                    queue.push_back(child);
                }
            }
        }
        if let Some(lost) = self.nodes.iter().find(|n| !reached.contains(&n.id)) {
            return Err(GraphError::Disconnected(lost.id.clone()));
        }

        Ok(())
    }
}
