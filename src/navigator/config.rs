//! Options for mapping path navigation

use crate::mapping_path::MappingPath;
use serde::{Deserialize, Serialize};

/// Default recursion bound, one level per path segment
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Caller of the shared traversal; each mode is an option preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathBuildMode {
    /// Mapping editor: one descriptor per position, stops at the first
    /// unresolved segment
    InteractiveEditor,
    /// Query field encoding: no descriptors, only the canonical path
    StringIdEncode,
    /// Auto-mapper: only the descriptor for the position past the path,
    /// hidden fields excluded
    AutoMapperProbe,
}

/// Configuration for a single navigation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigatorOptions {
    /// Emit a descriptor for every position, not only the terminal one
    pub iterate: bool,
    /// Emit a descriptor for the position past the last segment
    pub generate_last_relationship_data: bool,
    /// Stop at the first segment that does not resolve in its context
    pub stop_early: bool,
    /// Offer hidden fields (a hidden field that is the path's value is always offered)
    pub show_hidden_fields: bool,
    /// Offer `$-any` before the ranks of a tree table
    pub include_any_rank: bool,
    /// Position whose select box is open
    pub open_position: Option<usize>,
    /// Paths already mapped; used to disable taken fields and number to-many slots
    #[serde(default)]
    pub mapped_paths: Vec<MappingPath>,
    /// Maximum number of path positions
    pub max_depth: usize,
}

impl Default for NavigatorOptions {
    fn default() -> Self {
        Self {
            iterate: true,
            generate_last_relationship_data: true,
            stop_early: false,
            show_hidden_fields: true,
            include_any_rank: false,
            open_position: None,
            mapped_paths: Vec::new(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl NavigatorOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_mode(mode: PathBuildMode) -> Self {
        match mode {
            PathBuildMode::InteractiveEditor => Self {
                stop_early: true,
                ..Self::default()
            },
            PathBuildMode::StringIdEncode => Self {
                iterate: false,
                generate_last_relationship_data: false,
                include_any_rank: true,
                ..Self::default()
            },
            PathBuildMode::AutoMapperProbe => Self {
                iterate: false,
                stop_early: true,
                show_hidden_fields: false,
                ..Self::default()
            },
        }
    }

    pub fn with_iterate(mut self, iterate: bool) -> Self {
        self.iterate = iterate;
        self
    }

    pub fn with_last_relationship_data(mut self, enabled: bool) -> Self {
        self.generate_last_relationship_data = enabled;
        self
    }

    pub fn with_stop_early(mut self, enabled: bool) -> Self {
        self.stop_early = enabled;
        self
    }

    pub fn with_hidden_fields(mut self, enabled: bool) -> Self {
        self.show_hidden_fields = enabled;
        self
    }

    pub fn with_any_rank(mut self, enabled: bool) -> Self {
        self.include_any_rank = enabled;
        self
    }

    pub fn with_open_position(mut self, position: usize) -> Self {
        self.open_position = Some(position);
        self
    }

    pub fn with_mapped_paths(mut self, mapped_paths: Vec<MappingPath>) -> Self {
        self.mapped_paths = mapped_paths;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
