//! Header auto-mapper
//!
//! Suggests a mapping path for each spreadsheet header by searching the
//! schema breadth-first from the base table:
//! - curated definitions (regex, exact string, substring) per table field
//! - schema field names and friendly labels
//! - rank names of tree tables
//!
//! Each header gets at most one path and each path at most one header. When a
//! path is already taken its to-many indices are bumped (`#1` -> `#2`) until it
//! is free; a path without to-many references is left to the first header.
//!
//! # Example
//!
//! ```rust,ignore
//! use mapping_navigator::auto_mapper::{AutoMapper, AutoMapperConfig};
//!
//! let mapper = AutoMapper::new(&schema, AutoMapperConfig::new().with_depth(3))?;
//! let result = mapper.map(&["Cat #", "Latitude", "Collector Last Name"], "CollectionObject")?;
//! for mapping in &result.mappings {
//!     println!("{} -> {:?}", mapping.header, mapping.mapping_path);
//! }
//! ```

mod config;
mod definitions;
mod error;
mod matcher;
mod types;

pub use config::{AutoMapperConfig, DEFAULT_DEPTH};
pub use definitions::{AutoMapperDefinitions, FieldDefinition};
pub use error::AutoMapperError;
pub use matcher::{AutoMapper, NormalizedHeader};
pub use types::{AutoMapperResult, HeaderMapping, MatchMethod};

use crate::models::SchemaGraph;

/// Map headers with the default configuration
pub fn auto_map<S: AsRef<str>>(
    schema: &SchemaGraph,
    headers: &[S],
    base_table: &str,
) -> Result<AutoMapperResult, AutoMapperError> {
    AutoMapper::with_defaults(schema)?.map(headers, base_table)
}
