//! Scalar field model for the schema graph

use serde::{Deserialize, Serialize};

/// Java type tags that expose the virtual date-part sub-fields
const DATE_TYPES: [&str; 3] = ["java.util.Date", "java.util.Calendar", "java.sql.Timestamp"];

/// Scalar (non-relationship) field of a table
///
/// # Example
///
/// ```rust
/// use mapping_navigator::models::Field;
///
/// let field = Field::new("catalogNumber", "java.lang.String").with_label("Cat #");
/// assert!(!field.is_date());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    /// Field name, unique within its table
    pub name: String,
    /// Friendly label shown in the mapping editor
    #[serde(default)]
    pub label: String,
    /// Java-style type tag (e.g. "java.lang.String", "java.util.Calendar")
    #[serde(rename = "type", default)]
    pub field_type: String,
    #[serde(default)]
    pub is_hidden: bool,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default)]
    pub is_read_only: bool,
}

impl Field {
    /// Create a new visible, optional field. The label defaults to the name.
    pub fn new(name: impl Into<String>, field_type: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            name,
            field_type: field_type.into(),
            is_hidden: false,
            is_required: false,
            is_read_only: false,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn hidden(mut self) -> Self {
        self.is_hidden = true;
        self
    }

    pub fn required(mut self) -> Self {
        self.is_required = true;
        self
    }

    pub fn read_only(mut self) -> Self {
        self.is_read_only = true;
        self
    }

    /// Whether the field exposes `-day`, `-month`, `-year` and `-fullDate` sub-fields
    pub fn is_date(&self) -> bool {
        DATE_TYPES.contains(&self.field_type.as_str())
    }

    /// Label to display, falling back to the field name
    pub fn display_label(&self) -> &str {
        if self.label.is_empty() {
            &self.name
        } else {
            &self.label
        }
    }
}
