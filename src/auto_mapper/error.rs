//! Error types for the auto-mapper

use crate::navigator::NavigatorError;
use thiserror::Error;

/// Errors raised while configuring or running the auto-mapper
///
/// Headers that cannot be matched are not errors; they are reported as
/// unmapped in the result.
#[derive(Error, Debug)]
pub enum AutoMapperError {
    /// Definitions document is not valid JSON
    #[error("Failed to parse auto-mapper definitions: {0}")]
    DefinitionsParseError(#[from] serde_json::Error),

    /// A definition regex does not compile
    #[error("Invalid regex for {table}.{field}: {source}")]
    InvalidRegex {
        table: String,
        field: String,
        #[source]
        source: regex::Error,
    },

    /// Configuration is not valid TOML
    #[error("Failed to parse auto-mapper config: {0}")]
    ConfigParseError(#[from] toml::de::Error),

    /// Configuration cannot be written as TOML
    #[error("Failed to serialize auto-mapper config: {0}")]
    ConfigSerializeError(#[from] toml::ser::Error),

    /// Base table not present in the schema
    #[error("Unknown base table: {0}")]
    UnknownTable(String),

    #[error(transparent)]
    Navigator(#[from] NavigatorError),
}
