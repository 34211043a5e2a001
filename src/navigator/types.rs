//! Types produced by the navigator

use crate::mapping_path::MappingPath;
use serde::{Deserialize, Serialize};

/// What a select box at a given position offers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChildrenKind {
    /// `#1..#N` references plus the `add` slot
    ToMany,
    /// Ranks of a tree table
    TreeRanks,
    /// Scalar fields and relationships
    SimpleFields,
}

/// One option in a select box
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildDescriptor {
    /// Path segment this option writes (`catalogNumber`, `#2`, `$Phylum`, `add`)
    pub name: String,
    pub label: String,
    pub enabled: bool,
    pub required: bool,
    pub hidden: bool,
    pub is_default: bool,
    pub is_relationship: bool,
    /// Table the option leads to (the current table for scalars and markers)
    pub table_name: String,
}

/// Select box for one path position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepDescriptor {
    /// Index of the path segment this select box edits
    pub position: usize,
    pub table_name: String,
    pub select_label: String,
    pub kind: ChildrenKind,
    pub children: Vec<ChildDescriptor>,
    /// Selected value: the path segment at `position`, or the `add`/`0` sentinel
    pub default_value: String,
    pub is_open: bool,
}

impl StepDescriptor {
    pub fn child(&self, name: &str) -> Option<&ChildDescriptor> {
        self.children.iter().find(|child| child.name == name)
    }

    pub fn child_names(&self) -> Vec<&str> {
        self.children.iter().map(|child| child.name.as_str()).collect()
    }

    pub fn default_child(&self) -> Option<&ChildDescriptor> {
        self.children.iter().find(|child| child.is_default)
    }
}

/// Output of [`crate::navigator::navigate`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationResult {
    pub steps: Vec<StepDescriptor>,
    /// The input path with bare rank names rewritten to `$Rank`
    pub mapping_path: MappingPath,
}

impl NavigationResult {
    pub fn last_step(&self) -> Option<&StepDescriptor> {
        self.steps.last()
    }

    pub fn step_at(&self, position: usize) -> Option<&StepDescriptor> {
        self.steps.iter().find(|step| step.position == position)
    }

    /// The select box currently open, if any
    pub fn open_step(&self) -> Option<&StepDescriptor> {
        self.steps.iter().find(|step| step.is_open)
    }
}
