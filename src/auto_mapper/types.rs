//! Types for auto-mapper results

use crate::mapping_path::MappingPath;
use serde::{Deserialize, Serialize};

/// How a header was matched to its field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMethod {
    /// Curated definition (regex, exact string or substring)
    Definition,
    /// Schema field name
    FieldName,
    /// Friendly field label
    Label,
    /// Rank name of a tree table
    RankName,
}

/// A header and the mapping path it was assigned
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderMapping {
    pub header: String,
    pub mapping_path: MappingPath,
    pub match_method: MatchMethod,
}

/// Result of auto-mapping a list of headers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoMapperResult {
    /// Mapped headers, in input order
    pub mappings: Vec<HeaderMapping>,
    /// Headers no field was found for, in input order
    pub unmapped: Vec<String>,
}

impl AutoMapperResult {
    pub fn path_for(&self, header: &str) -> Option<&MappingPath> {
        self.mappings
            .iter()
            .find(|mapping| mapping.header == header)
            .map(|mapping| &mapping.mapping_path)
    }

    pub fn get(&self, header: &str) -> Option<&HeaderMapping> {
        self.mappings.iter().find(|mapping| mapping.header == header)
    }

    /// Every header got a path
    pub fn is_complete(&self) -> bool {
        self.unmapped.is_empty()
    }

    pub fn mapped_paths(&self) -> Vec<MappingPath> {
        self.mappings
            .iter()
            .map(|mapping| mapping.mapping_path.clone())
            .collect()
    }
}
