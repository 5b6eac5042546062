//! Level files: engine configuration, agent profiles and level data in one
//! JSON document.

use std::collections::HashMap;

use delve_logic::config::DungeonConfig;
use delve_logic::level::DungeonLevel;
use delve_logic::validation::{is_clean, validate_level, Severity};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::components::AgentProfile;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("level file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("level {level} is invalid: {}", messages.join("; "))]
    Invalid { level: String, messages: Vec<String> },
}

/// Contents of a level file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelFile {
    #[serde(default)]
    pub config: DungeonConfig,
    /// Movement profile per enemy kind. Kinds without an entry use
    /// [`AgentProfile::default`].
    #[serde(default)]
    pub profiles: HashMap<String, AgentProfile>,
    pub levels: Vec<DungeonLevel>,
}

impl LevelFile {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn level(&self, name: &str) -> Option<&DungeonLevel> {
        self.levels.iter().find(|l| l.name == name)
    }

    /// Reject the first level with error-severity issues. Warnings are
    /// logged and ignored.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for level in &self.levels {
            let issues = validate_level(level);
            for issue in issues.iter().filter(|i| i.severity == Severity::Warning) {
                log::warn!("level {}: {}", level.name, issue.message);
            }
            if !is_clean(&issues) {
                return Err(ConfigError::Invalid {
                    level: level.name.clone(),
                    messages: issues
                        .into_iter()
                        .filter(|i| i.severity == Severity::Error)
                        .map(|i| i.message)
                        .collect(),
                });
            }
        }
        Ok(())
    }
}
