//! Configuration for header auto-mapping

use super::definitions::AutoMapperDefinitions;
use super::error::AutoMapperError;
use serde::{Deserialize, Serialize};

/// Default number of relationship hops searched from the base table
pub const DEFAULT_DEPTH: usize = 2;

/// Configuration for [`super::AutoMapper`]
///
/// Loadable from TOML:
///
/// ```toml
/// depth = 3
/// match_labels = true
///
/// [definitions.Locality.latitude1]
/// contains = ["latitude", "lat."]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoMapperConfig {
    /// Maximum relationship hops from the base table
    #[serde(default = "default_depth")]
    pub depth: usize,
    /// Compare headers against field names and labels when no definition matches
    #[serde(default = "default_match_labels")]
    pub match_labels: bool,
    /// Curated matching rules; the built-in set when omitted
    #[serde(default = "AutoMapperDefinitions::builtin")]
    pub definitions: AutoMapperDefinitions,
}

fn default_depth() -> usize {
    DEFAULT_DEPTH
}

fn default_match_labels() -> bool {
    true
}

impl Default for AutoMapperConfig {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
            match_labels: true,
            definitions: AutoMapperDefinitions::builtin(),
        }
    }
}

impl AutoMapperConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_toml_str(content: &str) -> Result<Self, AutoMapperError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml_string(&self) -> Result<String, AutoMapperError> {
        Ok(toml::to_string(self)?)
    }

    /// Set the maximum number of relationship hops
    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    /// Enable/disable name and label comparison
    pub fn with_match_labels(mut self, enabled: bool) -> Self {
        self.match_labels = enabled;
        self
    }

    /// Replace the matching rules
    pub fn with_definitions(mut self, definitions: AutoMapperDefinitions) -> Self {
        self.definitions = definitions;
        self
    }

    /// Add rules on top of the current ones
    pub fn with_extra_definitions(mut self, definitions: AutoMapperDefinitions) -> Self {
        self.definitions.merge(definitions);
        self
    }
}
