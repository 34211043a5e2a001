//! Query field spec codec
//!
//! Converts between mapping paths and the compact string ids stored with
//! query fields:
//!
//! ```text
//! 1,9-determinations,4.taxon.Phylum Author
//! ^ join chain        ^ table ^ field part
//! ```
//!
//! Each hop of the join chain is the target table id, followed by `-name`
//! when the relationship is not named after its target table. To-many
//! indices are not stored, so paths that differ only in `#N` share a string id.

mod decode;
mod encode;
mod error;
mod types;

pub use error::{FieldSpecError, FieldSpecResult};
pub use types::{EncodedFieldSpec, FieldSelection, FieldSpec, JoinStep, TableRef};

use crate::mapping_path::MappingPath;
use crate::models::SchemaGraph;

/// Encode a mapping path rooted at `base_table`
pub fn encode(
    schema: &SchemaGraph,
    base_table: &str,
    mapping_path: &[String],
) -> FieldSpecResult<EncodedFieldSpec> {
    FieldSpec::from_mapping_path(schema, base_table, mapping_path).map(|spec| spec.encode())
}

/// Decode a stored string id
pub fn decode(
    schema: &SchemaGraph,
    string_id: &str,
    is_relationship: bool,
) -> FieldSpecResult<FieldSpec> {
    FieldSpec::from_string_id(schema, string_id, is_relationship)
}

/// Bring a mapping path to the form its string id decodes to
pub fn canonical_mapping_path(
    schema: &SchemaGraph,
    base_table: &str,
    mapping_path: &[String],
) -> FieldSpecResult<MappingPath> {
    FieldSpec::from_mapping_path(schema, base_table, mapping_path)
        .map(|spec| spec.to_mapping_path())
}
