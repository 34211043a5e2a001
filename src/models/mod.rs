//! Models module
//!
//! Defines the schema graph the navigator, codec and auto-mapper walk:
//! tables, scalar fields, relationships and tree ranks.

pub mod error;
pub mod field;
pub mod relationship;
pub mod schema;
pub mod table;

pub use error::{SchemaError, SchemaResult};
pub use field::Field;
pub use relationship::{Cardinality, Relationship};
pub use schema::SchemaGraph;
pub use table::{Table, TableMember, TreeRank};
