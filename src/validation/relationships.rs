//! Relationship validation functionality
//!
//! Builds a directed graph of tables (nodes) and relationships (edges) and
//! checks:
//! - other sides: `A.r` naming `otherSideName = s` needs a relationship `s`
//!   on the target that points back to `A`
//! - isolated tables that no relationship touches
//! - tables unreachable from a base table

use crate::models::SchemaGraph;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Dfs;
use std::collections::HashMap;

/// Result of relationship validation
#[derive(Debug, Default)]
pub struct RelationshipValidationResult {
    pub asymmetric_other_sides: Vec<AsymmetricOtherSide>,
    /// Tables without incoming or outgoing relationships
    pub isolated_tables: Vec<String>,
}

impl RelationshipValidationResult {
    pub fn is_empty(&self) -> bool {
        self.asymmetric_other_sides.is_empty() && self.isolated_tables.is_empty()
    }
}

/// Relationship whose declared other side does not lead back
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsymmetricOtherSide {
    pub table: String,
    pub relationship: String,
    pub target: String,
    pub other_side: String,
}

/// Relationship validator
#[derive(Debug, Default)]
pub struct RelationshipValidator;

impl RelationshipValidator {
    /// Create a new relationship validator
    pub fn new() -> Self {
        Self
    }

    pub fn validate(&self, schema: &SchemaGraph) -> RelationshipValidationResult {
        let (graph, _) = build_graph(schema);
        let isolated_tables = graph
            .node_indices()
            .filter(|&node| graph.neighbors_undirected(node).next().is_none())
            .map(|node| graph[node].to_string())
            .collect();

        RelationshipValidationResult {
            asymmetric_other_sides: self.check_other_sides(schema),
            isolated_tables,
        }
    }

    pub fn check_other_sides(&self, schema: &SchemaGraph) -> Vec<AsymmetricOtherSide> {
        let mut issues = Vec::new();
        for table in schema.tables() {
            for rel in &table.relationships {
                let Some(other_side) = &rel.other_side_name else {
                    continue;
                };
                let points_back = schema
                    .related_table(rel)
                    .and_then(|target| target.get_relationship(other_side))
                    .is_some_and(|inverse| schema.points_to(inverse, table));
                if !points_back {
                    issues.push(AsymmetricOtherSide {
                        table: table.name.clone(),
                        relationship: rel.name.clone(),
                        target: rel.related_table.clone(),
                        other_side: other_side.clone(),
                    });
                }
            }
        }
        issues
    }

    /// Tables no chain of relationships from `base_table` reaches, in schema order
    pub fn unreachable_tables(&self, schema: &SchemaGraph, base_table: &str) -> Vec<String> {
        let (graph, nodes) = build_graph(schema);
        let Some(&start) = nodes.get(&base_table.to_lowercase()) else {
            return schema.tables().iter().map(|table| table.name.clone()).collect();
        };

        let mut reached = vec![false; graph.node_count()];
        let mut dfs = Dfs::new(&graph, start);
        while let Some(node) = dfs.next(&graph) {
            reached[node.index()] = true;
        }

        graph
            .node_indices()
            .filter(|node| !reached[node.index()])
            .map(|node| graph[node].to_string())
            .collect()
    }
}

/// Node per table, edge per relationship (weighted with its name)
fn build_graph(schema: &SchemaGraph) -> (DiGraph<&str, &str>, HashMap<String, NodeIndex>) {
    let mut graph = DiGraph::new();
    let mut nodes = HashMap::new();
    for table in schema.tables() {
        nodes.insert(table.name.to_lowercase(), graph.add_node(table.name.as_str()));
    }
    for table in schema.tables() {
        for rel in &table.relationships {
            if let (Some(&source), Some(&target)) = (
                nodes.get(&table.name.to_lowercase()),
                nodes.get(&rel.related_table.to_lowercase()),
            ) {
                graph.add_edge(source, target, rel.name.as_str());
            }
        }
    }
    (graph, nodes)
}
