//! Mapping path segments
//!
//! A mapping path is an ordered list of string segments describing how to
//! reach a field from a base table. Besides field and relationship names a
//! segment can be:
//! - a to-many reference `#N` (the Nth member of a to-many collection)
//! - a tree-rank marker `$RankName`, or `$-any` for whichever rank is present
//! - the terminal `-formatted` entry (the record's display string)
//!
//! Scalar date fields may carry a date-part suffix: `startDate-day`,
//! `startDate-month`, `startDate-year` or `startDate-fullDate`.

use serde::{Deserialize, Serialize};

pub const TO_MANY_PREFIX: &str = "#";
pub const TREE_RANK_PREFIX: &str = "$";
pub const ANY_RANK: &str = "$-any";
pub const FORMATTED_ENTRY: &str = "-formatted";
/// Synthetic child that creates a new to-many instance
pub const ADD_SLOT: &str = "add";
/// Default value of a select box whose path has no next segment
pub const EMPTY_SELECTION: &str = "0";

/// Ordered sequence of path segments
pub type MappingPath = Vec<String>;

/// Virtual sub-field of a date field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DatePart {
    Day,
    Month,
    Year,
    FullDate,
}

impl DatePart {
    pub const ALL: [DatePart; 4] = [
        DatePart::Day,
        DatePart::Month,
        DatePart::Year,
        DatePart::FullDate,
    ];

    /// Suffix used in mapping paths, without the dash
    pub fn path_suffix(self) -> &'static str {
        match self {
            DatePart::Day => "day",
            DatePart::Month => "month",
            DatePart::Year => "year",
            DatePart::FullDate => "fullDate",
        }
    }

    /// Suffix appended to the field name in an encoded string id
    pub fn string_id_suffix(self) -> &'static str {
        match self {
            DatePart::Day => "NumericDay",
            DatePart::Month => "NumericMonth",
            DatePart::Year => "NumericYear",
            DatePart::FullDate => "",
        }
    }

    fn from_path_suffix(suffix: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|part| part.path_suffix() == suffix)
    }
}

/// Tree rank selected by a `$` segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankSelector<'a> {
    Any,
    Named(&'a str),
}

/// Classified view of a single path segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    ToMany(usize),
    TreeRank(RankSelector<'a>),
    Formatted,
    /// Field or relationship name, with the date part split off
    Name {
        name: &'a str,
        date_part: Option<DatePart>,
    },
}

impl<'a> Segment<'a> {
    pub fn parse(segment: &'a str) -> Self {
        if segment == FORMATTED_ENTRY {
            return Segment::Formatted;
        }
        if let Some(index) = to_many_index(segment) {
            return Segment::ToMany(index);
        }
        if segment == ANY_RANK {
            return Segment::TreeRank(RankSelector::Any);
        }
        if let Some(rank) = segment.strip_prefix(TREE_RANK_PREFIX) {
            return Segment::TreeRank(RankSelector::Named(rank));
        }
        let (name, date_part) = split_date_part(segment);
        Segment::Name { name, date_part }
    }
}

/// Index of a `#N` segment; `#0` and non-numeric suffixes are not references
pub fn to_many_index(segment: &str) -> Option<usize> {
    segment
        .strip_prefix(TO_MANY_PREFIX)
        .and_then(|index| index.parse::<usize>().ok())
        .filter(|&index| index > 0)
}

pub fn is_to_many_marker(segment: &str) -> bool {
    to_many_index(segment).is_some()
}

pub fn format_to_many(index: usize) -> String {
    format!("{}{}", TO_MANY_PREFIX, index)
}

pub fn is_tree_rank_marker(segment: &str) -> bool {
    segment.starts_with(TREE_RANK_PREFIX)
}

/// `Kingdom` -> `$Kingdom`; already formatted names are returned as is
pub fn format_tree_rank(rank_name: &str) -> String {
    if is_tree_rank_marker(rank_name) {
        rank_name.to_string()
    } else {
        format!("{}{}", TREE_RANK_PREFIX, rank_name)
    }
}

/// `$Kingdom` -> `Kingdom`
pub fn rank_name(segment: &str) -> &str {
    segment.strip_prefix(TREE_RANK_PREFIX).unwrap_or(segment)
}

/// Split `startDate-day` into `("startDate", Some(DatePart::Day))`
pub fn split_date_part(segment: &str) -> (&str, Option<DatePart>) {
    match segment.rsplit_once('-') {
        Some((name, suffix)) if !name.is_empty() => match DatePart::from_path_suffix(suffix) {
            Some(part) => (name, Some(part)),
            None => (segment, None),
        },
        _ => (segment, None),
    }
}

pub fn with_date_part(name: &str, date_part: Option<DatePart>) -> String {
    match date_part {
        Some(part) => format!("{}-{}", name, part.path_suffix()),
        None => name.to_string(),
    }
}

/// Highest `#N` index among the segments, 0 if there is none
pub fn max_to_many_index<'a>(segments: impl IntoIterator<Item = &'a str>) -> usize {
    segments
        .into_iter()
        .filter_map(to_many_index)
        .max()
        .unwrap_or(0)
}

/// Distinct segments that directly follow `prefix` in any of the mapped paths,
/// in first-seen order
pub fn mapped_fields_at(mapped_paths: &[MappingPath], prefix: &[String]) -> Vec<String> {
    let mut fields: Vec<String> = Vec::new();
    for path in mapped_paths {
        if path.len() > prefix.len() && path.starts_with(prefix) {
            let next = &path[prefix.len()];
            if !fields.contains(next) {
                fields.push(next.clone());
            }
        }
    }
    fields
}

/// Replace every `#N` index with `#1`
pub fn normalize_to_many(path: &[String]) -> MappingPath {
    path.iter()
        .map(|segment| {
            if is_to_many_marker(segment) {
                format_to_many(1)
            } else {
                segment.clone()
            }
        })
        .collect()
}

/// Build an owned mapping path from string slices
pub fn mapping_path<S: AsRef<str>>(segments: &[S]) -> MappingPath {
    segments.iter().map(|s| s.as_ref().to_string()).collect()
}
