//! Query field specification types

use crate::mapping_path::{
    ANY_RANK, DatePart, FORMATTED_ENTRY, MappingPath, format_to_many, format_tree_rank,
    with_date_part,
};
use crate::models::Table;
use serde::{Deserialize, Serialize};

/// Snapshot of the table facts the codec needs after leaving the schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRef {
    pub name: String,
    pub table_id: u32,
    pub is_tree: bool,
    pub id_field_name: String,
}

impl From<&Table> for TableRef {
    fn from(table: &Table) -> Self {
        Self {
            name: table.name.clone(),
            table_id: table.table_id,
            is_tree: table.is_tree(),
            id_field_name: table.id_field_name(),
        }
    }
}

/// One hop of the join chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum JoinStep {
    /// Follow a relationship to `table`
    Relationship {
        name: String,
        table: TableRef,
        is_to_many: bool,
    },
    /// Restrict the current tree table to a rank before following further hops
    TreeRank { rank: String },
}

/// Terminal selection of a field spec
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FieldSelection {
    /// The record's formatted display string
    Formatted,
    Field {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        date_part: Option<DatePart>,
    },
}

/// Structured form of a query field: base table, join chain, optional tree
/// rank and terminal field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSpec {
    pub base_table: TableRef,
    pub join_path: Vec<JoinStep>,
    /// Rank selected directly before the terminal field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tree_rank: Option<String>,
    pub field: FieldSelection,
}

/// Attributes persisted for a query field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodedFieldSpec {
    pub string_id: String,
    pub is_relationship: bool,
    /// Join chain part of the string id (`1,9-determinations,4`)
    pub table_list: String,
    /// Name of the table the field lives on
    pub table_name: String,
    /// Field part of the string id
    pub field_name: String,
}

impl FieldSpec {
    /// Table the terminal field lives on
    pub fn table(&self) -> &TableRef {
        self.join_path
            .iter()
            .rev()
            .find_map(|step| match step {
                JoinStep::Relationship { table, .. } => Some(table),
                JoinStep::TreeRank { .. } => None,
            })
            .unwrap_or(&self.base_table)
    }

    /// Whether the spec selects a related record rather than a scalar field
    pub fn is_relationship(&self) -> bool {
        self.tree_rank.is_none()
            && self.field == FieldSelection::Formatted
            && matches!(self.join_path.last(), Some(JoinStep::Relationship { .. }))
    }

    /// Mapping path with `#1` after to-many hops and `$-any` before
    /// non-rank segments on tree tables
    pub fn to_mapping_path(&self) -> MappingPath {
        let mut path = PathWriter::new(&self.base_table);

        for step in &self.join_path {
            match step {
                JoinStep::Relationship {
                    name,
                    table,
                    is_to_many,
                } => {
                    path.push(name.clone());
                    if *is_to_many {
                        path.segments.push(format_to_many(1));
                    }
                    path.enter(table);
                }
                JoinStep::TreeRank { rank } => path.push_rank(rank),
            }
        }

        if let Some(rank) = &self.tree_rank {
            path.push_rank(rank);
        }
        match &self.field {
            FieldSelection::Formatted => path.push(FORMATTED_ENTRY.to_string()),
            FieldSelection::Field { name, date_part } => {
                path.push(with_date_part(name, *date_part))
            }
        }

        path.segments
    }

    pub fn to_string_id(&self) -> String {
        self.encode().string_id
    }

    pub fn encode(&self) -> EncodedFieldSpec {
        let mut chain = vec![self.base_table.table_id.to_string()];
        let mut current = &self.base_table;
        for step in &self.join_path {
            match step {
                JoinStep::Relationship { name, table, .. } => {
                    if name.eq_ignore_ascii_case(&table.name) {
                        chain.push(table.table_id.to_string());
                    } else {
                        chain.push(format!("{}-{}", table.table_id, name));
                    }
                    current = table;
                }
                JoinStep::TreeRank { rank } => {
                    chain.push(format!("{}-{}", current.table_id, rank));
                }
            }
        }

        let table_list = chain.join(",");
        let table_name = current.name.to_lowercase();
        let field_name = self.field_part(current);
        EncodedFieldSpec {
            string_id: format!("{}.{}.{}", table_list, table_name, field_name),
            is_relationship: self.is_relationship(),
            table_list,
            table_name,
            field_name,
        }
    }

    fn field_part(&self, table: &TableRef) -> String {
        match (&self.tree_rank, &self.field) {
            (Some(rank), FieldSelection::Formatted) => rank.clone(),
            (Some(rank), FieldSelection::Field { name, date_part }) => {
                if name == FULL_NAME_FIELD {
                    rank.clone()
                } else if *name == table.id_field_name {
                    format!("{} ID", rank)
                } else {
                    format!(
                        "{} {}{}",
                        rank,
                        capitalize(name),
                        date_part.map_or("", |part| part.string_id_suffix())
                    )
                }
            }
            (None, FieldSelection::Formatted) => match self.join_path.last() {
                Some(JoinStep::Relationship { name, .. }) => name.clone(),
                _ => String::new(),
            },
            (None, FieldSelection::Field { name, date_part }) => format!(
                "{}{}",
                name,
                date_part.map_or("", |part| part.string_id_suffix())
            ),
        }
    }
}

/// Field that a bare rank in a field part stands for
pub(crate) const FULL_NAME_FIELD: &str = "fullName";

pub(crate) fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub(crate) fn uncapitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Accumulates path segments, adding `$-any` where a tree table is left
/// without an explicit rank
struct PathWriter<'a> {
    segments: MappingPath,
    current: &'a TableRef,
    after_rank: bool,
}

impl<'a> PathWriter<'a> {
    fn new(base_table: &'a TableRef) -> Self {
        Self {
            segments: Vec::new(),
            current: base_table,
            after_rank: false,
        }
    }

    fn push(&mut self, segment: String) {
        if self.current.is_tree && !self.after_rank {
            self.segments.push(ANY_RANK.to_string());
        }
        self.segments.push(segment);
        self.after_rank = false;
    }

    fn push_rank(&mut self, rank: &str) {
        self.segments.push(format_tree_rank(rank));
        self.after_rank = true;
    }

    fn enter(&mut self, table: &'a TableRef) {
        self.current = table;
        self.after_rank = false;
    }
}
