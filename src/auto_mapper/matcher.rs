//! Breadth-first header matching over the schema graph

use super::config::AutoMapperConfig;
use super::definitions::CompiledDefinitions;
use super::error::AutoMapperError;
use super::types::{AutoMapperResult, HeaderMapping, MatchMethod};
use crate::mapping_path::{
    ANY_RANK, FORMATTED_ENTRY, MappingPath, format_to_many, is_to_many_marker, rank_name,
    to_many_index,
};
use crate::models::{SchemaGraph, Table};
use crate::navigator::{
    ChildDescriptor, ChildrenKind, NavigatorOptions, PathBuildMode, StepDescriptor, navigate,
};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashSet, VecDeque};
use tracing::debug;

static NON_LETTERS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z\s]+").unwrap());
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Header text in the forms the comparisons use
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedHeader {
    pub raw: String,
    /// Lowercased raw header, used by definitions
    pub lowercase: String,
    /// Letters and single spaces only
    pub stripped: String,
    /// `stripped` without spaces
    pub compact: String,
}

impl NormalizedHeader {
    pub fn new(raw: &str) -> Self {
        let lowercase = raw.to_lowercase();
        let letters = NON_LETTERS.replace_all(&lowercase, "");
        let stripped = WHITESPACE.replace_all(&letters, " ").trim().to_string();
        let compact = stripped.replace(' ', "");
        Self {
            raw: raw.to_string(),
            lowercase,
            stripped,
            compact,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.stripped.is_empty()
    }
}

/// Maps spreadsheet headers to mapping paths
///
/// Tables are searched breadth-first from the base table, closest first, so
/// a header lands on the nearest field that accepts it.
pub struct AutoMapper<'s> {
    schema: &'s SchemaGraph,
    config: AutoMapperConfig,
    definitions: CompiledDefinitions,
}

impl<'s> AutoMapper<'s> {
    pub fn new(
        schema: &'s SchemaGraph,
        config: AutoMapperConfig,
    ) -> Result<Self, AutoMapperError> {
        let definitions = config.definitions.compile()?;
        Ok(Self {
            schema,
            config,
            definitions,
        })
    }

    /// Create an auto-mapper with the built-in definitions
    pub fn with_defaults(schema: &'s SchemaGraph) -> Result<Self, AutoMapperError> {
        Self::new(schema, AutoMapperConfig::default())
    }

    pub fn config(&self) -> &AutoMapperConfig {
        &self.config
    }

    /// Find a mapping path for each header, starting at `base_table`
    pub fn map<S: AsRef<str>>(
        &self,
        headers: &[S],
        base_table: &str,
    ) -> Result<AutoMapperResult, AutoMapperError> {
        let base = self
            .schema
            .table(base_table)
            .ok_or_else(|| AutoMapperError::UnknownTable(base_table.to_string()))?;

        let mut run = MappingRun::new(headers);
        let mut queue = VecDeque::from([Pending {
            table_name: base.name.clone(),
            path: Vec::new(),
            hops: 0,
        }]);

        while let Some(pending) = queue.pop_front() {
            if run.is_exhausted() {
                break;
            }
            if !run.visited.insert(pending.table_name.to_lowercase()) {
                continue;
            }
            let Some(table) = self.schema.table(&pending.table_name) else {
                continue;
            };
            self.search_table(&base.name, table, &pending, &mut run, &mut queue)?;
        }

        let result = run.finish();
        debug!(
            "Auto-mapped {} headers from {} ({} unmapped)",
            result.mappings.len(),
            base.name,
            result.unmapped.len()
        );
        Ok(result)
    }

    fn search_table(
        &self,
        base_table: &str,
        table: &Table,
        pending: &Pending,
        run: &mut MappingRun,
        queue: &mut VecDeque<Pending>,
    ) -> Result<(), AutoMapperError> {
        let Some(mut step) = self.probe(base_table, &pending.path)? else {
            debug!(
                "Skipping {}: path {:?} does not resolve",
                table.name, pending.path
            );
            return Ok(());
        };

        let mut fields_path = pending.path.clone();
        if step.kind == ChildrenKind::TreeRanks {
            self.match_ranks(table, &step, &pending.path, run);
            fields_path.push(ANY_RANK.to_string());
            match self.probe(base_table, &fields_path)? {
                Some(fields_step) => step = fields_step,
                None => return Ok(()),
            }
        }

        for child in step
            .children
            .iter()
            .filter(|child| !child.is_relationship && child.name != FORMATTED_ENTRY)
        {
            self.match_field(table, child, &fields_path, run);
            if run.is_exhausted() {
                return Ok(());
            }
        }

        if pending.hops >= self.config.depth {
            return Ok(());
        }
        for child in step.children.iter().filter(|child| child.is_relationship) {
            let Some(relationship) = table.get_relationship(&child.name) else {
                continue;
            };
            let mut path = fields_path.clone();
            path.push(relationship.name.clone());
            if relationship.is_to_many() {
                path.push(format_to_many(1));
            }
            queue.push_back(Pending {
                table_name: child.table_name.clone(),
                path,
                hops: pending.hops + 1,
            });
        }
        Ok(())
    }

    /// Descriptor for the position right after `path`, `None` when the path
    /// does not resolve
    fn probe(
        &self,
        base_table: &str,
        path: &[String],
    ) -> Result<Option<StepDescriptor>, AutoMapperError> {
        let options = NavigatorOptions::for_mode(PathBuildMode::AutoMapperProbe);
        let result = navigate(self.schema, base_table, path, &options)?;
        Ok(result
            .steps
            .into_iter()
            .find(|step| step.position == path.len()))
    }

    /// Headers naming a rank map to that rank's name field
    fn match_ranks(
        &self,
        table: &Table,
        step: &StepDescriptor,
        path: &[String],
        run: &mut MappingRun,
    ) {
        let name_field = ["name", "fullName"]
            .into_iter()
            .find(|field| table.get_field(field).is_some())
            .unwrap_or(FORMATTED_ENTRY);

        for rank in step.children.iter().filter(|child| child.name != ANY_RANK) {
            let rank_label = rank_name(&rank.name).to_lowercase();
            for index in run.unmapped_indices() {
                let header = &run.headers[index];
                if header.stripped == rank_label || header.compact == rank_label.replace(' ', "") {
                    let mut candidate = path.to_vec();
                    candidate.push(rank.name.clone());
                    candidate.push(name_field.to_string());
                    run.claim(index, candidate, MatchMethod::RankName);
                }
            }
        }
    }

    fn match_field(
        &self,
        table: &Table,
        field: &ChildDescriptor,
        path: &[String],
        run: &mut MappingRun,
    ) {
        let field_name = field.name.to_lowercase();
        let label = NormalizedHeader::new(&field.label);

        for index in run.unmapped_indices() {
            let header = &run.headers[index];
            let method = if self
                .definitions
                .matches(&table.name, &field.name, &header.lowercase)
            {
                Some(MatchMethod::Definition)
            } else if !self.config.match_labels {
                None
            } else if field_name == header.stripped || field_name == header.compact {
                Some(MatchMethod::FieldName)
            } else if !label.is_empty() && label.compact == header.compact {
                Some(MatchMethod::Label)
            } else {
                None
            };

            if let Some(method) = method {
                let mut candidate = path.to_vec();
                candidate.push(field.name.clone());
                run.claim(index, candidate, method);
            }
        }
    }
}

/// Table waiting to be searched
struct Pending {
    table_name: String,
    /// Path from the base table to this table
    path: MappingPath,
    hops: usize,
}

/// State of a single `map` call
struct MappingRun {
    headers: Vec<NormalizedHeader>,
    claimed: Vec<Option<(MappingPath, MatchMethod)>>,
    visited: HashSet<String>,
}

impl MappingRun {
    fn new<S: AsRef<str>>(raw_headers: &[S]) -> Self {
        let mut seen = HashSet::new();
        let headers: Vec<NormalizedHeader> = raw_headers
            .iter()
            .map(|header| header.as_ref())
            .filter(|header| seen.insert(header.to_string()))
            .map(NormalizedHeader::new)
            .collect();
        Self {
            claimed: vec![None; headers.len()],
            headers,
            visited: HashSet::new(),
        }
    }

    fn unmapped_indices(&self) -> Vec<usize> {
        (0..self.headers.len())
            .filter(|&index| self.claimed[index].is_none() && !self.headers[index].is_empty())
            .collect()
    }

    fn is_exhausted(&self) -> bool {
        self.unmapped_indices().is_empty()
    }

    fn is_taken(&self, path: &MappingPath) -> bool {
        self.claimed
            .iter()
            .flatten()
            .any(|(claimed, _)| claimed == path)
    }

    /// Assign `path` to a header, bumping every to-many index while the path
    /// is taken. Returns false when the path has no to-many index to bump.
    fn claim(&mut self, index: usize, mut path: MappingPath, method: MatchMethod) -> bool {
        while self.is_taken(&path) {
            if !path.iter().any(|segment| is_to_many_marker(segment)) {
                debug!(
                    "Header '{}' matches {:?}, which is already mapped",
                    self.headers[index].raw, path
                );
                return false;
            }
            for segment in path.iter_mut() {
                if let Some(to_many) = to_many_index(segment) {
                    *segment = format_to_many(to_many + 1);
                }
            }
        }
        self.claimed[index] = Some((path, method));
        true
    }

    fn finish(self) -> AutoMapperResult {
        let mut result = AutoMapperResult::default();
        for (header, claimed) in self.headers.into_iter().zip(self.claimed) {
            match claimed {
                Some((mapping_path, match_method)) => result.mappings.push(HeaderMapping {
                    header: header.raw,
                    mapping_path,
                    match_method,
                }),
                None => result.unmapped.push(header.raw),
            }
        }
        result
    }
}
