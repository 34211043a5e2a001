//! Schema loading functionality
//!
//! Loads a schema document (`{ "tables": [...] }`, camelCase keys) from JSON
//! or YAML and builds the read-only [`SchemaGraph`].
//!
//! Strict loading fails on relationships that point to unknown tables.
//! Lenient loading drops them and reports them as orphaned.

use crate::models::{Relationship, SchemaError, SchemaGraph, SchemaResult, Table};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::{info, warn};

/// Serialized form of a schema
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaDocument {
    #[serde(default)]
    pub tables: Vec<Table>,
}

/// Result of a lenient schema load
#[derive(Debug)]
pub struct SchemaLoadResult {
    pub schema: SchemaGraph,
    /// Relationships removed because their target table does not exist,
    /// as `(table name, relationship)`
    pub orphaned_relationships: Vec<(String, Relationship)>,
}

/// Loads schema documents from strings or files
pub struct SchemaLoader;

impl SchemaLoader {
    pub fn from_json_str(content: &str) -> SchemaResult<SchemaGraph> {
        let document: SchemaDocument = serde_json::from_str(content)?;
        Self::build(document)
    }

    pub fn from_yaml_str(content: &str) -> SchemaResult<SchemaGraph> {
        let document: SchemaDocument = serde_yaml::from_str(content)?;
        Self::build(document)
    }

    /// Load a schema file; `.json` is parsed as JSON, `.yaml`/`.yml` as YAML
    pub fn from_path(path: impl AsRef<Path>) -> SchemaResult<SchemaGraph> {
        let document = Self::read_document(path.as_ref())?;
        Self::build(document)
    }

    /// Load a schema file, dropping relationships whose target is missing
    pub fn from_path_lenient(path: impl AsRef<Path>) -> SchemaResult<SchemaLoadResult> {
        let document = Self::read_document(path.as_ref())?;
        Self::build_lenient(document)
    }

    pub fn build(document: SchemaDocument) -> SchemaResult<SchemaGraph> {
        let schema = SchemaGraph::new(document.tables)?;
        info!("Loaded schema with {} tables", schema.len());
        Ok(schema)
    }

    pub fn build_lenient(mut document: SchemaDocument) -> SchemaResult<SchemaLoadResult> {
        let table_names: HashSet<String> = document
            .tables
            .iter()
            .map(|table| table.name.to_lowercase())
            .collect();

        let mut orphaned_relationships = Vec::new();
        for table in &mut document.tables {
            let (kept, orphaned): (Vec<_>, Vec<_>) = std::mem::take(&mut table.relationships)
                .into_iter()
                .partition(|rel| table_names.contains(&rel.related_table.to_lowercase()));
            for rel in orphaned {
                warn!(
                    "Orphaned relationship {}.{}: target {} does not exist",
                    table.name, rel.name, rel.related_table
                );
                orphaned_relationships.push((table.name.clone(), rel));
            }
            table.relationships = kept;
        }

        let schema = SchemaGraph::new(document.tables)?;
        info!(
            "Loaded schema with {} tables ({} orphaned relationships)",
            schema.len(),
            orphaned_relationships.len()
        );
        Ok(SchemaLoadResult {
            schema,
            orphaned_relationships,
        })
    }

    fn read_document(path: &Path) -> SchemaResult<SchemaDocument> {
        let content =
            std::fs::read_to_string(path).map_err(|source| SchemaError::SchemaReadError {
                path: path.to_path_buf(),
                source,
            })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(serde_json::from_str(&content)?),
            Some("yaml") | Some("yml") => Ok(serde_yaml::from_str(&content)?),
            other => Err(SchemaError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}

impl SchemaGraph {
    /// Shorthand for [`SchemaLoader::from_json_str`]
    pub fn from_json_str(content: &str) -> SchemaResult<Self> {
        SchemaLoader::from_json_str(content)
    }

    /// Shorthand for [`SchemaLoader::from_yaml_str`]
    pub fn from_yaml_str(content: &str) -> SchemaResult<Self> {
        SchemaLoader::from_yaml_str(content)
    }

    /// Shorthand for [`SchemaLoader::from_path`]
    pub fn from_path(path: impl AsRef<Path>) -> SchemaResult<Self> {
        SchemaLoader::from_path(path)
    }
}
