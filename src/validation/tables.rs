//! Table validation functionality
//!
//! Checks names that would break mapping paths or query field ids.

use crate::models::SchemaGraph;
use std::collections::HashSet;

/// Characters with a meaning in mapping paths and string ids
const RESERVED_MEMBER_CHARS: [char; 6] = ['.', ',', '-', '#', '$', ' '];
const RESERVED_RANK_CHARS: [char; 2] = ['.', ','];

/// Result of table validation
#[derive(Debug, Default)]
pub struct TableValidationResult {
    pub issues: Vec<TableIssue>,
}

impl TableValidationResult {
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableIssueKind {
    /// A field and a relationship, or two members, share a name
    DuplicateMember,
    /// Field, relationship or rank name contains a path or id delimiter
    ReservedCharacter,
    DuplicateRank,
    /// Tree table without the `fullName` field rank columns resolve to
    MissingFullName,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableIssue {
    pub table: String,
    pub name: String,
    pub kind: TableIssueKind,
}

/// Table validator
#[derive(Debug, Default)]
pub struct TableValidator;

impl TableValidator {
    /// Create a new table validator
    pub fn new() -> Self {
        Self
    }

    pub fn validate(&self, schema: &SchemaGraph) -> TableValidationResult {
        let mut issues = Vec::new();
        for table in schema.tables() {
            let issue = |name: &str, kind| TableIssue {
                table: table.name.clone(),
                name: name.to_string(),
                kind,
            };

            let mut members = HashSet::new();
            for member in table.members() {
                if !members.insert(member.name().to_lowercase()) {
                    issues.push(issue(member.name(), TableIssueKind::DuplicateMember));
                }
                if member.name().contains(RESERVED_MEMBER_CHARS) {
                    issues.push(issue(member.name(), TableIssueKind::ReservedCharacter));
                }
            }

            let mut ranks = HashSet::new();
            for rank in &table.tree_ranks {
                if !ranks.insert(rank.name.as_str()) {
                    issues.push(issue(&rank.name, TableIssueKind::DuplicateRank));
                }
                if rank.name.contains(RESERVED_RANK_CHARS) {
                    issues.push(issue(&rank.name, TableIssueKind::ReservedCharacter));
                }
            }

            if table.is_tree() && table.get_field("fullName").is_none() {
                issues.push(issue("fullName", TableIssueKind::MissingFullName));
            }
        }
        TableValidationResult { issues }
    }
}
