//! String id to field spec

use super::error::{FieldSpecError, FieldSpecResult};
use super::types::{FULL_NAME_FIELD, FieldSelection, FieldSpec, JoinStep, TableRef, uncapitalize};
use crate::mapping_path::DatePart;
use crate::models::{Relationship, SchemaGraph, Table};

const NUMERIC_DATE_PARTS: [DatePart; 3] = [DatePart::Day, DatePart::Month, DatePart::Year];

impl FieldSpec {
    /// Parse a stored `tableIdChain.tableName.fieldPart` string id
    pub fn from_string_id(
        schema: &SchemaGraph,
        string_id: &str,
        is_relationship: bool,
    ) -> FieldSpecResult<Self> {
        let parts: Vec<&str> = string_id.split('.').collect();
        let [table_list, table_name, field_part] = parts[..] else {
            return Err(FieldSpecError::decode(
                string_id,
                format!("expected 3 parts, found {}", parts.len()),
            ));
        };

        let mut tokens = table_list.split(',');
        let base_token = tokens.next().unwrap_or_default();
        let base = lookup_table(schema, string_id, base_token)?;
        let mut current = base;
        let mut join_path = Vec::new();

        for token in tokens {
            let (id, label) = match token.split_once('-') {
                Some((id, label)) => (id, Some(label)),
                None => (token, None),
            };
            let target = lookup_table(schema, string_id, id)?;

            match label {
                Some(label) => {
                    if let Some(relationship) = current
                        .get_relationship_ignore_case(label)
                        .filter(|rel| schema.points_to(rel, target))
                    {
                        join_path.push(relationship_step(relationship, target));
                        current = target;
                    } else if target.table_id == current.table_id
                        && current.get_rank(label).is_some()
                    {
                        if matches!(join_path.last(), Some(JoinStep::TreeRank { .. })) {
                            return Err(FieldSpecError::decode(
                                string_id,
                                "tree rank cannot follow another tree rank",
                            ));
                        }
                        join_path.push(JoinStep::TreeRank {
                            rank: label.to_string(),
                        });
                    } else {
                        return Err(FieldSpecError::decode(
                            string_id,
                            format!("{} has no relationship or rank '{}'", current.name, label),
                        ));
                    }
                }
                None => {
                    let relationship = implicit_relationship(schema, current, target)
                        .ok_or_else(|| {
                            FieldSpecError::decode(
                                string_id,
                                format!(
                                    "no unambiguous relationship from {} to {}",
                                    current.name, target.name
                                ),
                            )
                        })?;
                    join_path.push(relationship_step(relationship, target));
                    current = target;
                }
            }
        }

        if !current.name.eq_ignore_ascii_case(table_name) {
            return Err(FieldSpecError::decode(
                string_id,
                format!("join chain ends at {}, not {}", current.name, table_name),
            ));
        }
        if matches!(join_path.last(), Some(JoinStep::TreeRank { .. })) {
            return Err(FieldSpecError::decode(
                string_id,
                "join chain cannot end with a tree rank",
            ));
        }

        let (tree_rank, field) =
            decode_field_part(string_id, current, &join_path, field_part, is_relationship)?;

        Ok(FieldSpec {
            base_table: TableRef::from(base),
            join_path,
            tree_rank,
            field,
        })
    }
}

fn lookup_table<'s>(
    schema: &'s SchemaGraph,
    string_id: &str,
    token: &str,
) -> FieldSpecResult<&'s Table> {
    let table_id: u32 = token
        .parse()
        .map_err(|_| FieldSpecError::decode(string_id, format!("invalid table id '{}'", token)))?;
    schema
        .table_by_id(table_id)
        .ok_or_else(|| FieldSpecError::decode(string_id, format!("unknown table id {}", table_id)))
}

fn relationship_step(relationship: &Relationship, target: &Table) -> JoinStep {
    JoinStep::Relationship {
        name: relationship.name.clone(),
        table: TableRef::from(target),
        is_to_many: relationship.is_to_many(),
    }
}

/// Relationship an unlabeled chain token stands for: the one named after the
/// target table, otherwise the only one pointing at it
fn implicit_relationship<'s>(
    schema: &SchemaGraph,
    current: &'s Table,
    target: &Table,
) -> Option<&'s Relationship> {
    current
        .get_relationship_ignore_case(&target.name)
        .filter(|rel| schema.points_to(rel, target))
        .or_else(|| {
            let mut candidates = current
                .relationships
                .iter()
                .filter(|rel| schema.points_to(rel, target));
            match (candidates.next(), candidates.next()) {
                (Some(only), None) => Some(only),
                _ => None,
            }
        })
}

fn decode_field_part(
    string_id: &str,
    table: &Table,
    join_path: &[JoinStep],
    field_part: &str,
    is_relationship: bool,
) -> FieldSpecResult<(Option<String>, FieldSelection)> {
    let last_relationship = match join_path.last() {
        Some(JoinStep::Relationship { name, .. }) => Some(name.as_str()),
        _ => None,
    };

    if field_part.is_empty() {
        return Ok((None, FieldSelection::Formatted));
    }
    if is_relationship {
        return match last_relationship {
            Some(name) if name.eq_ignore_ascii_case(field_part) => {
                Ok((None, FieldSelection::Formatted))
            }
            _ => Err(FieldSpecError::decode(
                string_id,
                format!("'{}' does not name the last relationship", field_part),
            )),
        };
    }

    if table.is_tree() {
        if let Some(decoded) = decode_rank_field(string_id, table, field_part)? {
            return Ok(decoded);
        }
    }

    match decode_plain_field(table, field_part) {
        Some(field) => Ok((None, field)),
        None if last_relationship.is_some_and(|name| name == field_part) => {
            Ok((None, FieldSelection::Formatted))
        }
        None => Err(FieldSpecError::UnknownField {
            table: table.name.clone(),
            field: field_part.to_string(),
        }),
    }
}

/// `Phylum`, `Phylum ID` or `Phylum Author`; `None` when no rank prefixes the part
fn decode_rank_field(
    string_id: &str,
    table: &Table,
    field_part: &str,
) -> FieldSpecResult<Option<(Option<String>, FieldSelection)>> {
    if let Some(rank) = table.get_rank(field_part) {
        let field = if table.get_field(FULL_NAME_FIELD).is_some() {
            FieldSelection::Field {
                name: FULL_NAME_FIELD.to_string(),
                date_part: None,
            }
        } else {
            FieldSelection::Formatted
        };
        return Ok(Some((Some(rank.name.clone()), field)));
    }

    let rank_and_rest = table
        .tree_ranks
        .iter()
        .filter_map(|rank| {
            field_part
                .strip_prefix(rank.name.as_str())
                .and_then(|rest| rest.strip_prefix(' '))
                .map(|rest| (rank, rest))
        })
        .max_by_key(|(rank, _)| rank.name.len());
    let Some((rank, rest)) = rank_and_rest else {
        return Ok(None);
    };

    let field = if rest == "ID" {
        FieldSelection::Field {
            name: table.id_field_name(),
            date_part: None,
        }
    } else {
        decode_plain_field(table, &uncapitalize(rest)).ok_or_else(|| {
            FieldSpecError::decode(
                string_id,
                format!("{} has no field matching '{}'", table.name, rest),
            )
        })?
    };
    Ok(Some((Some(rank.name.clone()), field)))
}

/// Field name with an optional `NumericDay`/`NumericMonth`/`NumericYear`
/// suffix; date fields without a suffix select the full date
fn decode_plain_field(table: &Table, field_part: &str) -> Option<FieldSelection> {
    for part in NUMERIC_DATE_PARTS {
        if let Some(name) = field_part.strip_suffix(part.string_id_suffix()) {
            if let Some(field) = table.get_field(name).filter(|field| field.is_date()) {
                return Some(FieldSelection::Field {
                    name: field.name.clone(),
                    date_part: Some(part),
                });
            }
        }
    }

    table.get_field(field_part).map(|field| FieldSelection::Field {
        name: field.name.clone(),
        date_part: field.is_date().then_some(DatePart::FullDate),
    })
}
