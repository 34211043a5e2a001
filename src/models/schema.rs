//! Read-only schema graph shared by the navigator, codec and auto-mapper

use super::error::{SchemaError, SchemaResult};
use super::relationship::Relationship;
use super::table::Table;
use std::collections::HashMap;

/// Fully resolved set of tables
///
/// Built once, then only read. Every relationship target is guaranteed to
/// resolve, table names are unique ignoring case and table ids are unique.
#[derive(Debug, Clone)]
pub struct SchemaGraph {
    tables: Vec<Table>,
    by_name: HashMap<String, usize>,
    by_id: HashMap<u32, usize>,
}

impl SchemaGraph {
    /// Index the tables and check that every relationship target exists
    pub fn new(tables: Vec<Table>) -> SchemaResult<Self> {
        let mut by_name = HashMap::new();
        let mut by_id = HashMap::new();

        for (index, table) in tables.iter().enumerate() {
            if by_name.insert(table.name.to_lowercase(), index).is_some() {
                return Err(SchemaError::DuplicateTable(table.name.clone()));
            }
            if by_id.insert(table.table_id, index).is_some() {
                return Err(SchemaError::DuplicateTable(format!(
                    "{} (id {})",
                    table.name, table.table_id
                )));
            }
        }

        for table in &tables {
            for rel in &table.relationships {
                if !by_name.contains_key(&rel.related_table.to_lowercase()) {
                    return Err(SchemaError::DanglingRelationship {
                        table: table.name.clone(),
                        relationship: rel.name.clone(),
                        target: rel.related_table.clone(),
                    });
                }
            }
        }

        Ok(Self {
            tables,
            by_name,
            by_id,
        })
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Case-insensitive table lookup
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.by_name
            .get(&name.to_lowercase())
            .map(|&index| &self.tables[index])
    }

    pub fn require_table(&self, name: &str) -> SchemaResult<&Table> {
        self.table(name)
            .ok_or_else(|| SchemaError::UnknownTable(name.to_string()))
    }

    pub fn table_by_id(&self, table_id: u32) -> Option<&Table> {
        self.by_id.get(&table_id).map(|&index| &self.tables[index])
    }

    /// Target table of a relationship
    pub fn related_table(&self, relationship: &Relationship) -> Option<&Table> {
        self.table(&relationship.related_table)
    }

    /// Whether `relationship` points at `table` (compared by name, ignoring case)
    pub fn points_to(&self, relationship: &Relationship, table: &Table) -> bool {
        relationship.related_table.eq_ignore_ascii_case(&table.name)
    }
}
