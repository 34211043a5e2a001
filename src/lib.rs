//! Mapping Navigator - schema-graph navigation for data mapping tools
//!
//! Provides unified interfaces for:
//! - Schema loading and validation
//! - Mapping path navigation (select box descriptors for a path editor)
//! - Query field spec encoding and decoding (`1,9-determinations,4.taxon.Phylum`)
//! - Header auto-mapping

pub mod auto_mapper;
pub mod field_spec;
pub mod mapping_path;
pub mod model;
pub mod models;
pub mod navigator;
pub mod validation;

// Re-export commonly used types
pub use auto_mapper::{AutoMapper, AutoMapperConfig, AutoMapperError, AutoMapperResult, auto_map};
pub use field_spec::{EncodedFieldSpec, FieldSpec, FieldSpecError, FieldSpecResult, decode, encode};
pub use mapping_path::{DatePart, MappingPath};
pub use model::{SchemaLoader, SchemaLoadResult};
pub use navigator::{
    ChildDescriptor, ChildrenKind, NavigationResult, NavigatorError, NavigatorOptions,
    NavigatorResult, PathBuildMode, StepDescriptor, navigate,
};
pub use validation::{SchemaValidationResult, SchemaValidator};

// Re-export models
pub use models::{
    Cardinality, Field, Relationship, SchemaError, SchemaGraph, SchemaResult, Table, TreeRank,
};
