//! Validation functionality
//!
//! Provides advisory checks for a loaded schema:
//! - Table validation (member names, ranks)
//! - Relationship validation (other sides, isolated tables)
//!
//! Loading never depends on these checks; [`SchemaValidator::validate_strict`]
//! turns findings into an error for callers that want to refuse such schemas.

pub mod relationships;
pub mod tables;

pub use relationships::{AsymmetricOtherSide, RelationshipValidationResult, RelationshipValidator};
pub use tables::{TableIssue, TableIssueKind, TableValidationResult, TableValidator};

use crate::models::SchemaGraph;
use anyhow::{Result, bail};
use tracing::warn;

/// Combined result of table and relationship validation
#[derive(Debug, Default)]
pub struct SchemaValidationResult {
    pub tables: TableValidationResult,
    pub relationships: RelationshipValidationResult,
}

impl SchemaValidationResult {
    pub fn is_valid(&self) -> bool {
        self.tables.is_empty() && self.relationships.is_empty()
    }

    /// One line per finding
    pub fn messages(&self) -> Vec<String> {
        let mut messages: Vec<String> = self
            .tables
            .issues
            .iter()
            .map(|issue| format!("{}.{}: {:?}", issue.table, issue.name, issue.kind))
            .collect();
        messages.extend(self.relationships.asymmetric_other_sides.iter().map(|issue| {
            format!(
                "{}.{}: other side {} not found on {}",
                issue.table, issue.relationship, issue.other_side, issue.target
            )
        }));
        messages.extend(
            self.relationships
                .isolated_tables
                .iter()
                .map(|table| format!("{}: no relationships", table)),
        );
        messages
    }
}

/// Runs all schema checks
#[derive(Debug, Default)]
pub struct SchemaValidator {
    tables: TableValidator,
    relationships: RelationshipValidator,
}

impl SchemaValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn validate(&self, schema: &SchemaGraph) -> SchemaValidationResult {
        let result = SchemaValidationResult {
            tables: self.tables.validate(schema),
            relationships: self.relationships.validate(schema),
        };
        for message in result.messages() {
            warn!("Schema validation: {}", message);
        }
        result
    }

    /// Fail when any check reports a finding
    pub fn validate_strict(&self, schema: &SchemaGraph) -> Result<()> {
        let result = self.validate(schema);
        if !result.is_valid() {
            bail!(
                "Schema validation failed with {} findings:\n{}",
                result.messages().len(),
                result.messages().join("\n")
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Cardinality, Field, Relationship, Table};

    #[test]
    fn test_validate_strict() {
        let valid = SchemaGraph::new(vec![
            Table::new("CollectionObject", 1).with_relationship(
                Relationship::new("accession", "Accession", Cardinality::ManyToOne)
                    .with_other_side("collectionObjects"),
            ),
            Table::new("Accession", 7).with_relationship(
                Relationship::new("collectionObjects", "CollectionObject", Cardinality::OneToMany)
                    .with_other_side("accession"),
            ),
        ])
        .unwrap();
        assert!(SchemaValidator::new().validate_strict(&valid).is_ok());

        let invalid = SchemaGraph::new(vec![
            Table::new("Agent", 5).with_field(Field::new("last name", "java.lang.String")),
        ])
        .unwrap();
        let err = SchemaValidator::new().validate_strict(&invalid).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("2 findings"));
        assert!(message.contains("Agent.last name: ReservedCharacter"));
        assert!(message.contains("Agent: no relationships"));
    }
}
