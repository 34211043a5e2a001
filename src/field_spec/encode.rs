//! Mapping path to field spec

use super::error::{FieldSpecError, FieldSpecResult};
use super::types::{FieldSelection, FieldSpec, JoinStep, TableRef};
use crate::mapping_path::{RankSelector, Segment};
use crate::models::{SchemaGraph, Table};
use crate::navigator;

impl FieldSpec {
    /// Build a field spec from a mapping path rooted at `base_table`
    ///
    /// Bare rank names are canonicalized first. To-many indices are dropped,
    /// `$-any` markers carry no information and a path that stops at a
    /// relationship, to-many marker or rank selects the formatted record.
    pub fn from_mapping_path(
        schema: &SchemaGraph,
        base_table: &str,
        mapping_path: &[String],
    ) -> FieldSpecResult<Self> {
        let base = schema
            .table(base_table)
            .ok_or_else(|| FieldSpecError::UnknownTable(base_table.to_string()))?;
        if mapping_path.is_empty() {
            return Err(FieldSpecError::EmptyPath);
        }

        let canonical = navigator::canonicalize(schema, &base.name, mapping_path)?;
        let mut builder = SpecBuilder::new(base);

        for (index, segment) in canonical.iter().enumerate() {
            let is_last = index + 1 == canonical.len();
            match Segment::parse(segment) {
                Segment::ToMany(_) => {
                    if !builder.after_to_many {
                        return Err(FieldSpecError::invalid_segment(
                            segment,
                            "to-many reference must follow a to-many relationship",
                        ));
                    }
                    builder.after_to_many = false;
                }
                Segment::TreeRank(selector) => builder.select_rank(segment, selector)?,
                Segment::Formatted => {
                    builder.require_last(segment, is_last)?;
                    return Ok(builder.finish(FieldSelection::Formatted));
                }
                Segment::Name { name, date_part } => {
                    let current = builder.current;
                    if date_part.is_none() {
                        if let Some(relationship) = current.get_relationship(name) {
                            let target = schema.related_table(relationship).ok_or_else(|| {
                                FieldSpecError::UnknownTable(relationship.related_table.clone())
                            })?;
                            builder.follow(&relationship.name, target, relationship.is_to_many());
                            continue;
                        }
                    }

                    let field = current.get_field(name).ok_or_else(|| {
                        FieldSpecError::UnknownField {
                            table: current.name.clone(),
                            field: segment.clone(),
                        }
                    })?;
                    if date_part.is_some() && !field.is_date() {
                        return Err(FieldSpecError::invalid_segment(
                            segment,
                            "date part on a field that is not a date",
                        ));
                    }
                    builder.require_last(segment, is_last)?;
                    return Ok(builder.finish(FieldSelection::Field {
                        name: field.name.clone(),
                        date_part,
                    }));
                }
            }
        }

        Ok(builder.finish(FieldSelection::Formatted))
    }
}

struct SpecBuilder<'s> {
    base: TableRef,
    current: &'s Table,
    join_path: Vec<JoinStep>,
    pending_rank: Option<String>,
    /// Previous segment was a rank marker, `$-any` included
    after_rank: bool,
    after_to_many: bool,
}

impl<'s> SpecBuilder<'s> {
    fn new(base: &'s Table) -> Self {
        Self {
            base: TableRef::from(base),
            current: base,
            join_path: Vec::new(),
            pending_rank: None,
            after_rank: false,
            after_to_many: false,
        }
    }

    fn select_rank(&mut self, segment: &str, selector: RankSelector<'_>) -> FieldSpecResult<()> {
        if !self.current.is_tree() {
            return Err(FieldSpecError::invalid_segment(
                segment,
                format!("{} is not a tree table", self.current.name),
            ));
        }
        if self.after_rank {
            return Err(FieldSpecError::invalid_segment(
                segment,
                "tree rank cannot follow another tree rank",
            ));
        }
        if let RankSelector::Named(rank) = selector {
            if self.current.get_rank(rank).is_none() {
                return Err(FieldSpecError::UnknownField {
                    table: self.current.name.clone(),
                    field: segment.to_string(),
                });
            }
            self.pending_rank = Some(rank.to_string());
        }
        self.after_rank = true;
        self.after_to_many = false;
        Ok(())
    }

    fn follow(&mut self, name: &str, target: &'s Table, is_to_many: bool) {
        if let Some(rank) = self.pending_rank.take() {
            self.join_path.push(JoinStep::TreeRank { rank });
        }
        self.join_path.push(JoinStep::Relationship {
            name: name.to_string(),
            table: TableRef::from(target),
            is_to_many,
        });
        self.current = target;
        self.after_rank = false;
        self.after_to_many = is_to_many;
    }

    fn require_last(&self, segment: &str, is_last: bool) -> FieldSpecResult<()> {
        if is_last {
            Ok(())
        } else {
            Err(FieldSpecError::invalid_segment(
                segment,
                "terminal segment is followed by further segments",
            ))
        }
    }

    fn finish(self, field: FieldSelection) -> FieldSpec {
        FieldSpec {
            base_table: self.base,
            join_path: self.join_path,
            tree_rank: self.pending_rank,
            field,
        }
    }
}
