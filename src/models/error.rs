//! Error types for schema graph construction and loading

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while building or loading a schema graph
#[derive(Error, Debug)]
pub enum SchemaError {
    /// Table name not present in the schema
    #[error("Unknown table: {0}")]
    UnknownTable(String),

    /// Table id not present in the schema
    #[error("Unknown table id: {0}")]
    UnknownTableId(u32),

    /// Field or relationship not present on a table
    #[error("Unknown field '{field}' on table {table}")]
    UnknownField { table: String, field: String },

    /// Two tables share a name (case-insensitive) or an id
    #[error("Duplicate table {0}")]
    DuplicateTable(String),

    /// Relationship points to a table that does not exist
    #[error("Relationship {table}.{relationship} points to unknown table {target}")]
    DanglingRelationship {
        table: String,
        relationship: String,
        target: String,
    },

    /// Failed to read schema file
    #[error("Failed to read schema file: {path}")]
    SchemaReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Unsupported schema document format
    #[error("Unsupported schema format: {0}")]
    UnsupportedFormat(String),

    /// JSON error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;
