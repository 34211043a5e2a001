//! Mapping path navigator
//!
//! Walks the schema graph along a mapping path, one recursion level per
//! path position, and describes at each position which segments may come
//! next:
//! - after a to-many relationship: `#1..#N` references and an `add` slot
//! - on a tree table: its ranks
//! - otherwise: the `-formatted` entry, then scalar fields and relationships
//!   of the current table, without circular back-references and without
//!   to-many relationships nested inside a to-many relationship (an excluded
//!   relationship the path already follows stays listed)
//!
//! # Example
//!
//! ```rust,ignore
//! use mapping_navigator::navigator::{navigate, NavigatorOptions};
//!
//! let path = vec!["determinations".to_string(), "#1".to_string()];
//! let result = navigate(&schema, "CollectionObject", &path, &NavigatorOptions::default())?;
//! for step in &result.steps {
//!     println!("{}: {:?}", step.table_name, step.child_names());
//! }
//! ```

mod config;
mod error;
mod types;

pub use config::{DEFAULT_MAX_DEPTH, NavigatorOptions, PathBuildMode};
pub use error::{NavigatorError, NavigatorResult};
pub use types::{ChildDescriptor, ChildrenKind, NavigationResult, StepDescriptor};

use crate::mapping_path::{
    ADD_SLOT, ANY_RANK, EMPTY_SELECTION, FORMATTED_ENTRY, MappingPath, RankSelector, Segment, format_to_many,
    format_tree_rank, mapped_fields_at, max_to_many_index, rank_name, split_date_part,
};
use crate::models::{Relationship, SchemaGraph, Table, TableMember};
use tracing::debug;

/// Walk `mapping_path` from `base_table` and describe every position
///
/// The supplied path is not modified; the canonical copy (bare rank names
/// rewritten to `$Rank`) is returned in [`NavigationResult::mapping_path`].
pub fn navigate(
    schema: &SchemaGraph,
    base_table: &str,
    mapping_path: &[String],
    options: &NavigatorOptions,
) -> NavigatorResult<NavigationResult> {
    let table = schema
        .table(base_table)
        .ok_or_else(|| NavigatorError::UnknownTable(base_table.to_string()))?;

    if mapping_path.len() > options.max_depth {
        return Err(NavigatorError::PathTooDeep {
            depth: mapping_path.len(),
            max_depth: options.max_depth,
        });
    }

    let mut walker = Walker {
        schema,
        options,
        path: mapping_path.to_vec(),
        steps: Vec::new(),
    };
    walker.visit(
        Frame {
            table,
            parent_table: None,
            parent_relationship: None,
            via: Via::Base,
        },
        0,
    )?;

    Ok(NavigationResult {
        steps: walker.steps,
        mapping_path: walker.path,
    })
}

/// Navigate with the option preset of a [`PathBuildMode`]
pub fn navigate_with_mode(
    schema: &SchemaGraph,
    base_table: &str,
    mapping_path: &[String],
    mode: PathBuildMode,
) -> NavigatorResult<NavigationResult> {
    navigate(
        schema,
        base_table,
        mapping_path,
        &NavigatorOptions::for_mode(mode),
    )
}

/// Rewrite bare rank names (`Kingdom` -> `$Kingdom`) without building descriptors
pub fn canonicalize(
    schema: &SchemaGraph,
    base_table: &str,
    mapping_path: &[String],
) -> NavigatorResult<MappingPath> {
    navigate_with_mode(
        schema,
        base_table,
        mapping_path,
        PathBuildMode::StringIdEncode,
    )
    .map(|result| result.mapping_path)
}

/// Whether `candidate`, declared on the current table, leads straight back
/// to the table the path came from
pub fn is_circular_relationship(
    schema: &SchemaGraph,
    candidate: &Relationship,
    parent_table: Option<&Table>,
    parent_relationship: Option<&Relationship>,
) -> bool {
    let Some(parent_table) = parent_table else {
        return false;
    };
    if !schema.points_to(candidate, parent_table) {
        return false;
    }

    let inverse_points_back = candidate
        .other_side_name
        .as_deref()
        .and_then(|other_side| parent_table.get_relationship(other_side))
        .and_then(|inverse| inverse.other_side_name.as_deref())
        == Some(candidate.name.as_str());

    let reached_through_inverse = match (parent_relationship, &candidate.other_side_name) {
        (Some(parent_relationship), Some(other_side)) => *other_side == parent_relationship.name,
        _ => false,
    };

    inverse_points_back || reached_through_inverse
}

/// Relationships fanning out to many records cannot nest inside each other
pub fn is_to_many_inside_to_many(
    candidate: &Relationship,
    parent_relationship: Option<&Relationship>,
) -> bool {
    candidate.is_to_many() && parent_relationship.is_some_and(|parent| parent.is_to_many())
}

/// Kind of segment that led to a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Via {
    Base,
    Relationship,
    ToManyMarker,
    RankMarker,
}

#[derive(Clone, Copy)]
struct Frame<'s> {
    table: &'s Table,
    parent_table: Option<&'s Table>,
    parent_relationship: Option<&'s Relationship>,
    via: Via,
}

struct Walker<'s, 'o> {
    schema: &'s SchemaGraph,
    options: &'o NavigatorOptions,
    path: MappingPath,
    steps: Vec<StepDescriptor>,
}

impl<'s> Walker<'s, '_> {
    fn visit(&mut self, frame: Frame<'s>, depth: usize) -> NavigatorResult<()> {
        if depth > self.options.max_depth {
            return Err(NavigatorError::PathTooDeep {
                depth,
                max_depth: self.options.max_depth,
            });
        }

        let kind = self.children_kind(&frame);
        if kind == ChildrenKind::TreeRanks {
            self.canonicalize_rank(frame.table, depth);
        }

        let at_end = depth == self.path.len();
        if (self.options.iterate || at_end)
            && (self.options.generate_last_relationship_data || !at_end)
        {
            let step = self.describe(&frame, kind, depth);
            self.steps.push(step);
        }

        let next = match self.path.get(depth) {
            Some(segment) => self.next_frame(&frame, kind, segment),
            None => return Ok(()),
        };

        match next {
            Some(next) => self.visit(next, depth + 1),
            None => {
                debug!(
                    "Mapping path stops at position {} ('{}') on table {}",
                    depth, self.path[depth], frame.table.name
                );
                Ok(())
            }
        }
    }

    fn children_kind(&self, frame: &Frame<'s>) -> ChildrenKind {
        if frame
            .parent_relationship
            .is_some_and(|rel| rel.is_to_many())
            && frame.via != Via::ToManyMarker
        {
            ChildrenKind::ToMany
        } else if frame.table.is_tree() && frame.via != Via::RankMarker {
            ChildrenKind::TreeRanks
        } else {
            ChildrenKind::SimpleFields
        }
    }

    fn canonicalize_rank(&mut self, table: &Table, depth: usize) {
        if let Some(segment) = self.path.get_mut(depth) {
            let formatted = format_tree_rank(segment);
            if formatted != *segment && table.get_rank(rank_name(&formatted)).is_some() {
                *segment = formatted;
            }
        }
    }

    /// Frame reached by following `segment`, `None` when the path ends here
    fn next_frame(
        &self,
        frame: &Frame<'s>,
        kind: ChildrenKind,
        segment: &str,
    ) -> Option<Frame<'s>> {
        let strict = self.options.stop_early;
        let marker_frame = |via: Via| Frame { via, ..*frame };

        match Segment::parse(segment) {
            Segment::ToMany(_) => {
                if strict && kind != ChildrenKind::ToMany {
                    return None;
                }
                Some(marker_frame(Via::ToManyMarker))
            }
            Segment::TreeRank(selector) => {
                let valid = kind == ChildrenKind::TreeRanks
                    && match selector {
                        RankSelector::Any => true,
                        RankSelector::Named(rank) => frame.table.get_rank(rank).is_some(),
                    };
                if strict && !valid {
                    return None;
                }
                Some(marker_frame(Via::RankMarker))
            }
            Segment::Formatted => None,
            Segment::Name { .. } => {
                if strict && kind != ChildrenKind::SimpleFields {
                    return None;
                }
                let relationship = frame.table.get_relationship(segment)?;
                let target = self.schema.related_table(relationship)?;
                Some(Frame {
                    table: target,
                    parent_table: Some(frame.table),
                    parent_relationship: Some(relationship),
                    via: Via::Relationship,
                })
            }
        }
    }

    fn describe(&self, frame: &Frame<'s>, kind: ChildrenKind, depth: usize) -> StepDescriptor {
        let next_segment = self.path.get(depth);
        let default_value = match (next_segment, kind) {
            (Some(segment), _) => segment.clone(),
            (None, ChildrenKind::ToMany) => ADD_SLOT.to_string(),
            (None, _) => EMPTY_SELECTION.to_string(),
        };
        let mapped_fields = mapped_fields_at(&self.options.mapped_paths, &self.path[..depth]);

        let children = match kind {
            ChildrenKind::ToMany => {
                self.to_many_children(frame.table, &mapped_fields, next_segment, &default_value)
            }
            ChildrenKind::TreeRanks => self.rank_children(frame.table, &default_value),
            ChildrenKind::SimpleFields => {
                self.simple_children(frame, &mapped_fields, &default_value)
            }
        };

        StepDescriptor {
            position: depth,
            table_name: frame.table.name.clone(),
            select_label: frame.table.display_label().to_string(),
            kind,
            children,
            default_value,
            is_open: self.options.open_position == Some(depth),
        }
    }

    fn to_many_children(
        &self,
        table: &Table,
        mapped_fields: &[String],
        next_segment: Option<&String>,
        default_value: &str,
    ) -> Vec<ChildDescriptor> {
        let max_index = max_to_many_index(
            mapped_fields
                .iter()
                .chain(next_segment)
                .map(String::as_str),
        );

        let reference = |name: String, label: String| ChildDescriptor {
            is_default: name == default_value,
            name,
            label,
            enabled: true,
            required: false,
            hidden: false,
            is_relationship: true,
            table_name: table.name.clone(),
        };

        let mut children: Vec<ChildDescriptor> = (1..=max_index)
            .map(|index| {
                let name = format_to_many(index);
                reference(name.clone(), name)
            })
            .collect();
        children.push(reference(ADD_SLOT.to_string(), "Add".to_string()));
        children
    }

    fn rank_children(&self, table: &Table, default_value: &str) -> Vec<ChildDescriptor> {
        let rank = |name: String, label: &str, required: bool| ChildDescriptor {
            is_default: name == default_value,
            name,
            label: label.to_string(),
            enabled: true,
            required,
            hidden: false,
            is_relationship: true,
            table_name: table.name.clone(),
        };

        let mut children = Vec::with_capacity(table.tree_ranks.len() + 1);
        if self.options.include_any_rank || default_value == ANY_RANK {
            children.push(rank(ANY_RANK.to_string(), "Any rank", false));
        }
        children.extend(
            table
                .tree_ranks
                .iter()
                .map(|tree_rank| {
                    rank(
                        format_tree_rank(&tree_rank.name),
                        &tree_rank.name,
                        tree_rank.is_enforced,
                    )
                }),
        );
        children
    }

    fn simple_children(
        &self,
        frame: &Frame<'s>,
        mapped_fields: &[String],
        default_value: &str,
    ) -> Vec<ChildDescriptor> {
        let (default_name, _) = split_date_part(default_value);

        let formatted = ChildDescriptor {
            name: FORMATTED_ENTRY.to_string(),
            label: "(formatted)".to_string(),
            enabled: true,
            required: false,
            hidden: false,
            is_default: default_value == FORMATTED_ENTRY,
            is_relationship: false,
            table_name: frame.table.name.clone(),
        };

        let members = frame
            .table
            .members()
            .filter(|member| match member {
                TableMember::Relationship(rel) if rel.name == default_value => true,
                TableMember::Relationship(rel) => {
                    !is_circular_relationship(
                        self.schema,
                        rel,
                        frame.parent_table,
                        frame.parent_relationship,
                    ) && !is_to_many_inside_to_many(rel, frame.parent_relationship)
                }
                TableMember::Field(_) => true,
            })
            .filter(|member| {
                self.options.show_hidden_fields
                    || !member.is_hidden()
                    || member.name() == default_name
                    || member.name() == default_value
            })
            .map(|member| {
                let name = member.name();
                let table_name = match member {
                    TableMember::Relationship(rel) => self
                        .schema
                        .related_table(rel)
                        .map_or_else(|| rel.related_table.clone(), |table| table.name.clone()),
                    TableMember::Field(_) => frame.table.name.clone(),
                };
                ChildDescriptor {
                    name: name.to_string(),
                    label: member.label().to_string(),
                    enabled: member.is_relationship()
                        || !mapped_fields.iter().any(|mapped| mapped == name),
                    required: member.is_required(),
                    hidden: member.is_hidden(),
                    is_default: name == default_value
                        || (!member.is_relationship() && name == default_name),
                    is_relationship: member.is_relationship(),
                    table_name,
                }
            });
        std::iter::once(formatted).chain(members).collect()
    }
}
