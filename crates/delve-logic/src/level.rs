//! Level data: the templates and candidate room graphs of one dungeon
//! level, plus the pool the synthesizer draws templates from.

use std::collections::HashMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::graph::RoomGraph;
use crate::room_type::RoomType;
use crate::template::{RoomTemplate, TemplateId};

/// Everything the synthesizer needs to build one dungeon level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DungeonLevel {
    pub name: String,
    pub templates: Vec<RoomTemplate>,
    /// Candidate graphs; one is chosen at random per build attempt.
    pub graphs: Vec<RoomGraph>,
}

impl DungeonLevel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            templates: Vec::new(),
            graphs: Vec::new(),
        }
    }

    pub fn with_template(mut self, template: RoomTemplate) -> Self {
        self.templates.push(template);
        self
    }

    pub fn with_graph(mut self, graph: RoomGraph) -> Self {
        self.graphs.push(graph);
        self
    }
}

/// Templates indexed by id and by room type.
#[derive(Debug, Clone, Default)]
pub struct TemplatePool {
    templates: Vec<RoomTemplate>,
    by_id: HashMap<TemplateId, usize>,
    by_type: HashMap<RoomType, Vec<usize>>,
}

impl TemplatePool {
    /// Index `templates`. When two share an id the first one wins.
    pub fn new(templates: &[RoomTemplate]) -> Self {
        let mut pool = Self::default();
        for template in templates {
            if pool.by_id.contains_key(&template.id) {
                log::warn!("duplicate room template id {}, keeping the first", template.id);
                continue;
            }
            let idx = pool.templates.len();
            pool.by_id.insert(template.id.clone(), idx);
            pool.by_type.entry(template.room_type).or_default().push(idx);
            pool.templates.push(template.clone());
        }
        pool
    }

    pub fn get(&self, id: &TemplateId) -> Option<&RoomTemplate> {
        self.by_id.get(id).map(|&i| &self.templates[i])
    }

    pub fn of_type(&self, room_type: RoomType) -> impl Iterator<Item = &RoomTemplate> {
        self.by_type
            .get(&room_type)
            .into_iter()
            .flatten()
            .map(|&i| &self.templates[i])
    }

    pub fn has_type(&self, room_type: RoomType) -> bool {
        self.by_type.get(&room_type).is_some_and(|v| !v.is_empty())
    }

    /// Uniform random template of `room_type`.
    pub fn random_of_type(&self, room_type: RoomType, rng: &mut impl Rng) -> Option<&RoomTemplate> {
        let candidates = self.by_type.get(&room_type)?;
        if candidates.is_empty() {
            return None;
        }
        let idx = candidates[rng.gen_range(0..candidates.len())];
        Some(&self.templates[idx])
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::IVec2;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn t(id: &str, room_type: RoomType) -> RoomTemplate {
        RoomTemplate::new(id, room_type, IVec2::ZERO, IVec2::new(3, 3))
    }

    #[test]
    fn first_duplicate_wins() {
        let pool = TemplatePool::new(&[t("a", RoomType::Normal), t("a", RoomType::Boss)]);
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.get(&TemplateId::new("a")).map(|t| t.room_type), Some(RoomType::Normal));
        assert!(!pool.has_type(RoomType::Boss));
    }

    #[test]
    fn random_pick_stays_within_type() {
        let pool = TemplatePool::new(&[
            t("n1", RoomType::Normal),
            t("n2", RoomType::Normal),
            t("b", RoomType::Boss),
        ]);
        let mut rng = StdRng::seed_from_u64(9);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..50 {
            let pick = pool.random_of_type(RoomType::Normal, &mut rng).unwrap();
            assert_eq!(pick.room_type, RoomType::Normal);
            seen.insert(pick.id.clone());
        }
        assert_eq!(seen.len(), 2);
        assert!(pool.random_of_type(RoomType::CorridorEW, &mut rng).is_none());
        assert_eq!(pool.of_type(RoomType::Boss).count(), 1);
    }
}
