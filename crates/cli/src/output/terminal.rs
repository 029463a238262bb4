//! Terminal output formatting

use colored::Colorize;
use ripple_core::{group_by_file, AnalysisRun, CallerInfo, EntityImpact, ImpactReport, ParseFailure};
use std::path::Path;

pub fn format_caller(caller: &CallerInfo, direct: bool) -> String {
    let label = if direct {
        "direct  ".yellow()
    } else {
        "indirect".dimmed()
    };
    format!(
        "      {} {}  {}:{}",
        label,
        caller.name.bold(),
        caller.file.display(),
        caller.line
    )
}

/// Lines describing one impact, callers in discovery order
pub fn format_impact(impact: &EntityImpact) -> Vec<String> {
    let mut lines = vec![format!("    {}", impact.entity_name.bold())];

    if impact.is_empty() {
        lines.push(format!("      {}", "no callers".dimmed()));
        return lines;
    }

    lines.push(format!(
        "      {} caller(s) in {} file(s), {} direct",
        impact.all_callers.len(),
        impact.affected_files.len(),
        impact.direct_callers.len()
    ));

    for caller in &impact.all_callers {
        let direct = impact.direct_callers.contains(caller);
        lines.push(format_caller(caller, direct));
    }

    lines
}

pub fn format_parse_failure(failure: &ParseFailure) -> String {
    format!("  {} {}", "⚠️  skipped".yellow(), failure)
}

/// Full impact report grouped by the file of each changed function
pub fn format_impact_report(report: &ImpactReport) -> Vec<String> {
    let mut lines = Vec::new();

    for (file, impacts) in group_by_file(report.impacts.clone()) {
        lines.push(format!("  {}", file.display().to_string().cyan()));
        for impact in &impacts {
            lines.extend(format_impact(impact));
        }
        lines.push(String::new());
    }

    lines.extend(report.parse_errors.iter().map(format_parse_failure));

    let affected: usize = report.impacts.iter().map(|i| i.all_callers.len()).sum();
    lines.push(format!(
        "  {} changed function(s), {} affected caller(s), {} file(s) scanned, depth {}",
        report.impacts.len(),
        affected,
        report.file_count,
        report.max_depth
    ));

    lines
}

/// Node listing grouped by file, with caller/callee counts per node
pub fn format_graph(run: &AnalysisRun) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current: Option<&Path> = None;

    for node in run.graph.nodes() {
        if current != Some(node.file()) {
            if current.is_some() {
                lines.push(String::new());
            }
            lines.push(format!("  {}", node.file().display().to_string().cyan()));
            current = Some(node.file());
        }
        lines.push(format!(
            "    {}  {}-{}  {} caller(s), {} callee(s)",
            node.name().bold(),
            node.line(),
            node.end_line(),
            run.graph.callers(node.key()).len(),
            run.graph.callees(node.key()).len()
        ));
    }

    if current.is_some() {
        lines.push(String::new());
    }
    lines.extend(run.parse_errors.iter().map(format_parse_failure));
    lines.push(format!(
        "  {} file(s), {} function(s), {} call edge(s)",
        run.files.len(),
        run.graph.len(),
        run.graph.edge_count()
    ));

    lines
}
