use serde::{Deserialize, Serialize};

use crate::error::SpyLogError;

/// Switches read by the parsers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Attribute reactions to `Actor@id` when the reaction observes exactly
    /// one property. Off: reactions are always attributed to `Reaction`.
    #[serde(default)]
    pub reaction_actor_from_observed: bool,
}

/// Which event categories get logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpyConfig {
    pub spy_actions: bool,
    pub spy_updates: bool,
    pub spy_computed: bool,
    pub parser: ParserConfig,
}

impl Default for SpyConfig {
    fn default() -> Self {
        Self {
            spy_actions: true,
            spy_updates: true,
            spy_computed: true,
            parser: ParserConfig::default(),
        }
    }
}

impl SpyConfig {
    /// Missing keys fall back to their defaults.
    pub fn from_json(content: &str) -> Result<Self, SpyLogError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn actions(mut self, enabled: bool) -> Self {
        self.spy_actions = enabled;
        self
    }

    pub fn updates(mut self, enabled: bool) -> Self {
        self.spy_updates = enabled;
        self
    }

    pub fn computed(mut self, enabled: bool) -> Self {
        self.spy_computed = enabled;
        self
    }

    pub fn with_parser(mut self, parser: ParserConfig) -> Self {
        self.parser = parser;
        self
    }
}
