//! Table model for the schema graph

use super::field::Field;
use super::relationship::Relationship;
use serde::{Deserialize, Serialize};

/// A named level of a tree table (e.g. Kingdom, Phylum for Taxon)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TreeRank {
    pub name: String,
    /// Enforced ranks are required levels in the hierarchy
    #[serde(default)]
    pub is_enforced: bool,
}

impl TreeRank {
    pub fn new(name: impl Into<String>, is_enforced: bool) -> Self {
        Self {
            name: name.into(),
            is_enforced,
        }
    }
}

/// Borrowed view of a table member, either scalar or relationship
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TableMember<'a> {
    Field(&'a Field),
    Relationship(&'a Relationship),
}

impl<'a> TableMember<'a> {
    pub fn name(&self) -> &'a str {
        match self {
            TableMember::Field(field) => &field.name,
            TableMember::Relationship(rel) => &rel.name,
        }
    }

    pub fn label(&self) -> &'a str {
        match self {
            TableMember::Field(field) => field.display_label(),
            TableMember::Relationship(rel) => rel.display_label(),
        }
    }

    pub fn is_relationship(&self) -> bool {
        matches!(self, TableMember::Relationship(_))
    }

    pub fn is_hidden(&self) -> bool {
        match self {
            TableMember::Field(field) => field.is_hidden,
            TableMember::Relationship(rel) => rel.is_hidden,
        }
    }

    pub fn is_required(&self) -> bool {
        match self {
            TableMember::Field(field) => field.is_required,
            TableMember::Relationship(rel) => rel.is_required,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub name: String,
    #[serde(default)]
    pub label: String,
    /// Stable numeric id, written into encoded query field ids
    pub table_id: u32,
    #[serde(default)]
    pub fields: Vec<Field>,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
    /// Ordered ranks; a non-empty list makes this a tree table
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tree_ranks: Vec<TreeRank>,
    /// Primary key field name, defaults to `<lowerCamelName>Id`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_field_name: Option<String>,
}

impl Table {
    pub fn new(name: impl Into<String>, table_id: u32) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            name,
            table_id,
            fields: Vec::new(),
            relationships: Vec::new(),
            tree_ranks: Vec::new(),
            id_field_name: None,
        }
    }

    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_relationship(mut self, relationship: Relationship) -> Self {
        self.relationships.push(relationship);
        self
    }

    pub fn with_rank(mut self, rank: TreeRank) -> Self {
        self.tree_ranks.push(rank);
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn is_tree(&self) -> bool {
        !self.tree_ranks.is_empty()
    }

    pub fn display_label(&self) -> &str {
        if self.label.is_empty() {
            &self.name
        } else {
            &self.label
        }
    }

    pub fn get_field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn get_relationship(&self, name: &str) -> Option<&Relationship> {
        self.relationships.iter().find(|rel| rel.name == name)
    }

    /// Relationship lookup that tolerates differences in letter case
    pub fn get_relationship_ignore_case(&self, name: &str) -> Option<&Relationship> {
        self.get_relationship(name).or_else(|| {
            self.relationships
                .iter()
                .find(|rel| rel.name.eq_ignore_ascii_case(name))
        })
    }

    pub fn get_rank(&self, name: &str) -> Option<&TreeRank> {
        self.tree_ranks.iter().find(|rank| rank.name == name)
    }

    /// Look up a scalar field or relationship by name
    pub fn get_member(&self, name: &str) -> Option<TableMember<'_>> {
        self.get_field(name)
            .map(TableMember::Field)
            .or_else(|| self.get_relationship(name).map(TableMember::Relationship))
    }

    /// Scalar fields first, then relationships, each in declaration order
    pub fn members(&self) -> impl Iterator<Item = TableMember<'_>> {
        self.fields
            .iter()
            .map(TableMember::Field)
            .chain(self.relationships.iter().map(TableMember::Relationship))
    }

    pub fn id_field_name(&self) -> String {
        match &self.id_field_name {
            Some(name) => name.clone(),
            None => {
                let mut chars = self.name.chars();
                match chars.next() {
                    Some(first) => format!("{}{}Id", first.to_lowercase(), chars.as_str()),
                    None => "id".to_string(),
                }
            }
        }
    }
}
