//! Relationship model for the schema graph

use serde::{Deserialize, Serialize};
use std::fmt;

/// Cardinality of a relationship, seen from the table that declares it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cardinality {
    #[serde(rename = "one-to-one")]
    OneToOne,
    #[serde(rename = "many-to-one")]
    ManyToOne,
    #[serde(rename = "one-to-many")]
    OneToMany,
    #[serde(rename = "many-to-many")]
    ManyToMany,
}

impl Cardinality {
    /// One-to-many and many-to-many relationships fan out into `#N` references
    pub fn is_to_many(self) -> bool {
        matches!(self, Cardinality::OneToMany | Cardinality::ManyToMany)
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cardinality::OneToOne => write!(f, "one-to-one"),
            Cardinality::ManyToOne => write!(f, "many-to-one"),
            Cardinality::OneToMany => write!(f, "one-to-many"),
            Cardinality::ManyToMany => write!(f, "many-to-many"),
        }
    }
}

impl std::str::FromStr for Cardinality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "one-to-one" => Ok(Cardinality::OneToOne),
            "many-to-one" => Ok(Cardinality::ManyToOne),
            "one-to-many" => Ok(Cardinality::OneToMany),
            "many-to-many" => Ok(Cardinality::ManyToMany),
            _ => Err(format!("Unknown relationship type: {}", s)),
        }
    }
}

/// Relationship from one table to another
///
/// The target is referenced by table name; [`crate::models::SchemaGraph`]
/// checks at construction that every target exists.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    pub name: String,
    #[serde(default)]
    pub label: String,
    /// Name of the table this relationship points to
    pub related_table: String,
    #[serde(rename = "type")]
    pub cardinality: Cardinality,
    /// Name of the inverse relationship on the related table, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other_side_name: Option<String>,
    #[serde(default)]
    pub is_dependent: bool,
    #[serde(default)]
    pub is_hidden: bool,
    #[serde(default)]
    pub is_required: bool,
}

impl Relationship {
    pub fn new(
        name: impl Into<String>,
        related_table: impl Into<String>,
        cardinality: Cardinality,
    ) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            name,
            related_table: related_table.into(),
            cardinality,
            other_side_name: None,
            is_dependent: false,
            is_hidden: false,
            is_required: false,
        }
    }

    pub fn with_other_side(mut self, other_side_name: impl Into<String>) -> Self {
        self.other_side_name = Some(other_side_name.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn dependent(mut self) -> Self {
        self.is_dependent = true;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.is_hidden = true;
        self
    }

    pub fn is_to_many(&self) -> bool {
        self.cardinality.is_to_many()
    }

    pub fn display_label(&self) -> &str {
        if self.label.is_empty() {
            &self.name
        } else {
            &self.label
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cardinality_parse() {
        assert_eq!(
            "one-to-many".parse::<Cardinality>().unwrap(),
            Cardinality::OneToMany
        );
        assert_eq!(
            "Many-To-One".parse::<Cardinality>().unwrap(),
            Cardinality::ManyToOne
        );
        assert!("sideways".parse::<Cardinality>().is_err());
    }

    #[test]
    fn test_to_many() {
        assert!(Cardinality::OneToMany.is_to_many());
        assert!(Cardinality::ManyToMany.is_to_many());
        assert!(!Cardinality::ManyToOne.is_to_many());
        assert!(!Cardinality::OneToOne.is_to_many());
    }

    #[test]
    fn test_deserialize_relationship() {
        let rel: Relationship = serde_json::from_str(
            r#"{"name": "determinations", "relatedTable": "Determination",
                "type": "one-to-many", "otherSideName": "collectionObject", "isDependent": true}"#,
        )
        .unwrap();
        assert_eq!(rel.cardinality, Cardinality::OneToMany);
        assert_eq!(rel.other_side_name.as_deref(), Some("collectionObject"));
        assert!(rel.is_dependent);
        assert_eq!(rel.display_label(), "determinations");
    }
}
