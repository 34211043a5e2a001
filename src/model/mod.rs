//! Model loading module
//!
//! Provides functionality for loading schema documents into a [`crate::models::SchemaGraph`].

pub mod loader;

pub use loader::{SchemaDocument, SchemaLoadResult, SchemaLoader};
