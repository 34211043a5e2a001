//! Error types for mapping path navigation

use thiserror::Error;

/// Errors that can occur while navigating a mapping path
///
/// Unknown segments in the middle of a path are not errors: the navigator
/// truncates there so a partially edited path stays usable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavigatorError {
    /// Base table not present in the schema
    #[error("Unknown base table: {0}")]
    UnknownTable(String),

    /// Path longer than the configured recursion bound
    #[error("Mapping path is too deep: {depth} segments exceed the limit of {max_depth}")]
    PathTooDeep { depth: usize, max_depth: usize },
}

/// Result type for navigator operations
pub type NavigatorResult<T> = Result<T, NavigatorError>;
