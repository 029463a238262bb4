//! JSON output formatting

use ripple_core::parser::EntityKind;
use ripple_core::{AnalysisRun, EntityImpact, ImpactReport, ParseFailure};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Serialize, Deserialize)]
pub struct JsonImpactOutput {
    pub impacts: Vec<EntityImpact>,
    pub parse_errors: Vec<ParseFailure>,
    pub summary: JsonImpactSummary,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonImpactSummary {
    pub files_scanned: usize,
    pub max_depth: usize,
    pub changed: usize,
    /// Distinct callers across every impact
    pub affected_callers: usize,
    /// Distinct files across every impact
    pub affected_files: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JsonGraphOutput {
    pub nodes: Vec<JsonNode>,
    pub edges: Vec<JsonEdge>,
    pub parse_errors: Vec<ParseFailure>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JsonNode {
    pub key: String,
    pub file: PathBuf,
    pub name: String,
    pub kind: EntityKind,
    pub line: usize,
    pub end_line: usize,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonEdge {
    pub caller: String,
    pub callee: String,
    pub line: usize,
}

pub fn build_impact_output(report: &ImpactReport) -> JsonImpactOutput {
    let mut callers = std::collections::HashSet::new();
    let mut files = std::collections::HashSet::new();
    for impact in &report.impacts {
        for caller in &impact.all_callers {
            callers.insert((caller.file.clone(), caller.name.clone()));
        }
        files.extend(impact.affected_files.iter().cloned());
    }

    JsonImpactOutput {
        impacts: report.impacts.clone(),
        parse_errors: report.parse_errors.clone(),
        summary: JsonImpactSummary {
            files_scanned: report.file_count,
            max_depth: report.max_depth,
            changed: report.impacts.len(),
            affected_callers: callers.len(),
            affected_files: files.len(),
        },
    }
}

pub fn build_graph_output(run: &AnalysisRun) -> JsonGraphOutput {
    let nodes = run
        .graph
        .nodes()
        .map(|node| JsonNode {
            key: node.key().to_string(),
            file: node.file().to_path_buf(),
            name: node.name().to_string(),
            kind: node.kind(),
            line: node.line(),
            end_line: node.end_line(),
        })
        .collect();

    let edges = run
        .graph
        .edges()
        .map(|(caller, callee, edge)| JsonEdge {
            caller: caller.to_string(),
            callee: callee.to_string(),
            line: edge.line,
        })
        .collect();

    JsonGraphOutput {
        nodes,
        edges,
        parse_errors: run.parse_errors.clone(),
    }
}
