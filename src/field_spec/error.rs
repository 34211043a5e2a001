//! Error types for query field encoding and decoding

use crate::navigator::NavigatorError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldSpecError {
    #[error("Unknown table: {0}")]
    UnknownTable(String),

    #[error("Unknown field {field} on table {table}")]
    UnknownField { table: String, field: String },

    #[error("Invalid mapping path segment '{segment}': {reason}")]
    InvalidSegment { segment: String, reason: String },

    #[error("Cannot decode '{string_id}': {reason}")]
    Decode { string_id: String, reason: String },

    #[error("Mapping path is empty")]
    EmptyPath,

    #[error(transparent)]
    Navigator(#[from] NavigatorError),
}

impl FieldSpecError {
    pub(crate) fn decode(string_id: &str, reason: impl Into<String>) -> Self {
        FieldSpecError::Decode {
            string_id: string_id.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_segment(segment: &str, reason: impl Into<String>) -> Self {
        FieldSpecError::InvalidSegment {
            segment: segment.to_string(),
            reason: reason.into(),
        }
    }
}

pub type FieldSpecResult<T> = Result<T, FieldSpecError>;
