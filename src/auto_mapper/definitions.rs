//! Curated header matching rules
//!
//! Definitions are keyed by table and field name (case-insensitive) and hold
//! three kinds of comparisons against the lowercased raw header:
//! - `regex`: the header matches the pattern
//! - `string`: the header equals the value
//! - `contains`: the header contains the value
//!
//! ```json
//! { "Locality": { "latitude1": { "contains": ["latitude"] } } }
//! ```

use super::error::AutoMapperError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::warn;

const BUILTIN_JSON: &str = include_str!("definitions.json");

static BUILTIN_DEFINITIONS: Lazy<AutoMapperDefinitions> = Lazy::new(|| {
    AutoMapperDefinitions::from_json_str(BUILTIN_JSON).unwrap_or_else(|err| {
        warn!("Built-in auto-mapper definitions are invalid: {}", err);
        AutoMapperDefinitions::default()
    })
});

/// Comparisons for one field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub regex: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub string: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contains: Vec<String>,
}

/// Table name -> field name -> comparisons
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AutoMapperDefinitions {
    tables: BTreeMap<String, BTreeMap<String, FieldDefinition>>,
}

impl AutoMapperDefinitions {
    /// Definitions shipped with the crate
    pub fn builtin() -> Self {
        BUILTIN_DEFINITIONS.clone()
    }

    pub fn from_json_str(content: &str) -> Result<Self, AutoMapperError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn with_field(
        mut self,
        table: impl Into<String>,
        field: impl Into<String>,
        definition: FieldDefinition,
    ) -> Self {
        self.tables
            .entry(table.into())
            .or_default()
            .insert(field.into(), definition);
        self
    }

    /// Add `other`'s definitions, replacing fields defined in both
    pub fn merge(&mut self, other: AutoMapperDefinitions) {
        for (table, fields) in other.tables {
            self.tables.entry(table).or_default().extend(fields);
        }
    }

    pub fn get(&self, table: &str, field: &str) -> Option<&FieldDefinition> {
        self.tables
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(table))
            .and_then(|(_, fields)| {
                fields
                    .iter()
                    .find(|(name, _)| name.eq_ignore_ascii_case(field))
                    .map(|(_, definition)| definition)
            })
    }

    pub fn is_empty(&self) -> bool {
        self.tables.values().all(BTreeMap::is_empty)
    }

    /// Compile every regex, failing on the first invalid pattern
    pub(crate) fn compile(&self) -> Result<CompiledDefinitions, AutoMapperError> {
        let mut fields = HashMap::new();
        for (table, table_fields) in &self.tables {
            for (field, definition) in table_fields {
                let regex = definition
                    .regex
                    .iter()
                    .map(|pattern| {
                        Regex::new(pattern).map_err(|source| AutoMapperError::InvalidRegex {
                            table: table.clone(),
                            field: field.clone(),
                            source,
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                fields.insert(
                    (table.to_lowercase(), field.to_lowercase()),
                    CompiledField {
                        regex,
                        string: lowercase_all(&definition.string),
                        contains: lowercase_all(&definition.contains),
                    },
                );
            }
        }
        Ok(CompiledDefinitions { fields })
    }
}

fn lowercase_all(values: &[String]) -> Vec<String> {
    values.iter().map(|value| value.to_lowercase()).collect()
}

#[derive(Debug)]
pub(crate) struct CompiledDefinitions {
    fields: HashMap<(String, String), CompiledField>,
}

impl CompiledDefinitions {
    /// Whether the definition of `table.field` accepts the lowercased header
    pub(crate) fn matches(&self, table: &str, field: &str, lowercase_header: &str) -> bool {
        self.fields
            .get(&(table.to_lowercase(), field.to_lowercase()))
            .is_some_and(|definition| definition.matches(lowercase_header))
    }
}

#[derive(Debug)]
struct CompiledField {
    regex: Vec<Regex>,
    string: Vec<String>,
    contains: Vec<String>,
}

impl CompiledField {
    fn matches(&self, header: &str) -> bool {
        self.regex.iter().any(|regex| regex.is_match(header))
            || self.string.iter().any(|value| value == header)
            || self.contains.iter().any(|value| header.contains(value.as_str()))
    }
}
