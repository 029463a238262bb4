//! Impact command: which callers a change to the given functions can reach

use anyhow::{bail, Context, Result};
use colored::Colorize;
use ripple_core::{ChangedEntity, ImpactService, RippleConfig};
use serde::Deserialize;
use std::path::Path;

use crate::output;
use crate::progress::Step;
use crate::OutputFormat;

/// One entry of a `--changes` file: either `{"file": ..., "name": ...}` or
/// a `"file:name"` string
#[derive(Deserialize)]
#[serde(untagged)]
enum ChangeEntry {
    Entity(ChangedEntity),
    Key(String),
}

/// Read changed functions from a JSON array
pub fn load_changes_file(path: &Path) -> Result<Vec<ChangedEntity>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read changes file {}", path.display()))?;
    let entries: Vec<ChangeEntry> = serde_json::from_str(&contents)
        .with_context(|| format!("invalid changes file {}", path.display()))?;

    entries
        .into_iter()
        .map(|entry| match entry {
            ChangeEntry::Entity(entity) => Ok(ChangedEntity::new(entity.file, entity.name)),
            ChangeEntry::Key(key) => key.parse::<ChangedEntity>().map_err(anyhow::Error::msg),
        })
        .collect()
}

/// Combine positional `file:name` targets with the entries of a changes file.
///
/// Positional targets come first; order is otherwise preserved.
pub fn collect_changes(targets: &[String], changes_file: Option<&Path>) -> Result<Vec<ChangedEntity>> {
    let mut changes = targets
        .iter()
        .map(|target| target.parse::<ChangedEntity>().map_err(anyhow::Error::msg))
        .collect::<Result<Vec<_>>>()?;

    if let Some(path) = changes_file {
        changes.extend(load_changes_file(path)?);
    }

    if changes.is_empty() {
        bail!("no changed functions given; pass <file>:<function> or --changes <json>");
    }

    Ok(changes)
}

pub fn run(
    targets: &[String],
    changes_file: Option<&Path>,
    max_depth: Option<usize>,
    path: Option<&Path>,
    format: OutputFormat,
) -> Result<()> {
    let root = path.unwrap_or_else(|| Path::new("."));
    let changes = collect_changes(targets, changes_file)?;

    let mut config = RippleConfig::find_and_load(root)?;
    if let Some(depth) = max_depth {
        config.impact.max_depth = depth;
    }
    let service = ImpactService::new(root, config)?;

    let terminal = format == OutputFormat::Terminal;
    if terminal {
        println!(
            "{}",
            format!("  ripple v{} — impact analysis", ripple_core::VERSION).bold()
        );
        println!();
    }

    let step = Step::maybe("Building call graph", terminal);
    let run = service.build_graph()?;
    for failure in &run.parse_errors {
        step.warn(failure);
    }
    step.finish(&format!(
        "{} files, {} functions, {} calls",
        run.files.len(),
        run.graph.len(),
        run.graph.edge_count()
    ));

    let step = Step::maybe("Tracing callers", terminal);
    let report = service.report(run, &changes);
    step.finish(&format!("{} changed function(s)", report.impacts.len()));

    match format {
        OutputFormat::Terminal => {
            println!();
            for line in output::terminal::format_impact_report(&report) {
                println!("{}", line);
            }
        }
        OutputFormat::Json => {
            let out = output::json::build_impact_output(&report);
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }

    Ok(())
}
