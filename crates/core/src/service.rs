//! One analysis run: enumerate, extract, build, then answer impact queries

use crate::config::{ConfigError, RippleConfig};
use crate::discovery::discover_files;
use crate::graph::{CallGraph, CallGraphBuilder};
use crate::impact::{ChangedEntity, EntityImpact, ImpactAnalyzer};
use crate::parser::{FileExtraction, ImportResolver, ParseFailure, ParserDispatcher};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

/// A finished build: the graph plus what went into it
#[derive(Debug)]
pub struct AnalysisRun {
    pub graph: CallGraph,
    /// Enumerated files, sorted
    pub files: Vec<PathBuf>,
    /// Extraction records with import bindings resolved
    pub extractions: Vec<FileExtraction>,
    pub parse_errors: Vec<ParseFailure>,
}

/// Impact results for a batch of changed entities
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImpactReport {
    pub impacts: Vec<EntityImpact>,
    pub parse_errors: Vec<ParseFailure>,
    pub file_count: usize,
    pub max_depth: usize,
}

/// Facade that wires the enumerator, extractor, builder and analyzer together
pub struct ImpactService {
    root: PathBuf,
    config: RippleConfig,
}

impl ImpactService {
    /// Validate the project root and configuration before any analysis runs
    pub fn new(root: &Path, config: RippleConfig) -> Result<Self, ConfigError> {
        if !root.is_dir() {
            return Err(ConfigError::ProjectRoot(root.to_path_buf()));
        }
        config.validate()?;
        Ok(Self {
            root: root.to_path_buf(),
            config,
        })
    }

    /// Load `.ripple.toml` from `root` (or its ancestors) and build a service
    pub fn from_root(root: &Path) -> Result<Self, ConfigError> {
        let config = RippleConfig::find_and_load(root)?;
        Self::new(root, config)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &RippleConfig {
        &self.config
    }

    /// Enumerate, extract in parallel, then merge into one graph
    pub fn build_graph(&self) -> Result<AnalysisRun> {
        let start = Instant::now();

        let extensions: Vec<&str> = self.config.scan.extensions.iter().map(String::as_str).collect();
        let files = discover_files(&self.root, &extensions, &self.config.scan.ignore)?;
        info!(count = files.len(), "scanned files");

        let dispatcher = ParserDispatcher::with_aliases(self.config.resolve.path_aliases.clone());
        let (mut extractions, parse_errors) = dispatcher.parse_files_parallel(&self.root, &files);
        info!(
            parsed = extractions.len(),
            failed = parse_errors.len(),
            "extracted entities"
        );

        let resolver = ImportResolver::from_config(files.iter().cloned(), &self.config.resolve);
        let graph = CallGraphBuilder::new(&resolver).build(&mut extractions);

        info!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            "analysis graph ready"
        );

        Ok(AnalysisRun {
            graph,
            files,
            extractions,
            parse_errors,
        })
    }

    /// Build the graph and compute the impact of every changed entity
    pub fn analyze(&self, changes: &[ChangedEntity]) -> Result<ImpactReport> {
        let run = self.build_graph()?;
        Ok(self.report(run, changes))
    }

    /// Answer impact queries against an already built graph
    pub fn report(&self, run: AnalysisRun, changes: &[ChangedEntity]) -> ImpactReport {
        let max_depth = self.config.impact.max_depth;
        let impacts = ImpactAnalyzer::with_max_depth(&run.graph, max_depth).analyze_changes(changes);

        for impact in &impacts {
            info!(
                entity = %impact.entity_name,
                file = %impact.file.display(),
                direct = impact.direct_callers.len(),
                total = impact.all_callers.len(),
                "impact"
            );
        }

        ImpactReport {
            impacts,
            parse_errors: run.parse_errors,
            file_count: run.files.len(),
            max_depth,
        }
    }
}
