//! Merges per-file extraction records into one [`CallGraph`].
//!
//! The build runs in three sequential passes over the files, sorted by path:
//!
//! 1. Every entity becomes a node keyed `file:name`. A second definition of
//!    the same name in the same file replaces the first (logged as a
//!    collision; overloads and redefinitions share one node, and only the
//!    last definition's calls are linked).
//! 2. Every import binding is resolved to a project file, or left unresolved.
//! 3. Every call reference is linked: a function defined in the same file
//!    wins, then an import binding of that local name, otherwise the
//!    reference is dropped.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::{CallGraph, CallGraphNode};
use crate::parser::{entity_key, Callee, FileExtraction, ImportKind, ImportResolver, Imported};

/// Builds the call graph for one analysis run.
pub struct CallGraphBuilder<'r> {
    resolver: &'r ImportResolver,
}

/// Counters reported after a build
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
    pub nodes: usize,
    pub edges: usize,
    pub collisions: usize,
    pub resolved_imports: usize,
    pub unresolved_imports: usize,
    pub dropped_calls: usize,
}

impl<'r> CallGraphBuilder<'r> {
    pub fn new(resolver: &'r ImportResolver) -> Self {
        Self { resolver }
    }

    /// Build the graph and stamp `resolved_file` on every import binding.
    pub fn build(&self, extractions: &mut [FileExtraction]) -> CallGraph {
        self.build_with_stats(extractions).0
    }

    /// Same as [`Self::build`], also returning the build counters.
    pub fn build_with_stats(&self, extractions: &mut [FileExtraction]) -> (CallGraph, BuildStats) {
        extractions.sort_by(|a, b| a.file.cmp(&b.file));

        let mut graph = CallGraph::new();
        let mut stats = BuildStats::default();

        // ── Pass 1: nodes ────────────────────────────────────────────────────
        let mut default_exports: HashMap<PathBuf, String> = HashMap::new();
        for extraction in extractions.iter() {
            for entity in &extraction.entities {
                let (_, replaced) = graph.insert_node(CallGraphNode::from(entity));
                if let Some(previous) = replaced {
                    stats.collisions += 1;
                    warn!(
                        key = %previous.key(),
                        first_line = previous.line(),
                        second_line = entity.line,
                        "duplicate definition, the later one replaces the earlier node"
                    );
                }
            }
            if let Some(name) = &extraction.default_export {
                default_exports.insert(extraction.file.clone(), name.clone());
            }
        }

        // ── Pass 2: import bindings ──────────────────────────────────────────
        for extraction in extractions.iter_mut() {
            let file = extraction.file.clone();
            for binding in &mut extraction.imports {
                binding.resolved_file = match binding.kind {
                    ImportKind::External => None,
                    ImportKind::Relative | ImportKind::Aliased => {
                        self.resolver.resolve(&binding.specifier, &file)
                    }
                };
                match (&binding.resolved_file, binding.kind) {
                    (Some(_), _) => stats.resolved_imports += 1,
                    (None, ImportKind::External) => {}
                    (None, _) => {
                        stats.unresolved_imports += 1;
                        debug!(file = %file.display(), specifier = %binding.specifier, "unresolved import");
                    }
                }
            }
        }

        // ── Pass 3: call edges ───────────────────────────────────────────────
        for extraction in extractions.iter() {
            for entity in &extraction.entities {
                // A replaced definition contributes no edges
                let is_last = extraction
                    .entity(&entity.name)
                    .is_some_and(|last| std::ptr::eq(last, entity));
                if !is_last {
                    continue;
                }
                let Some(caller) = graph.index_of(&entity.key()) else {
                    continue;
                };
                for call in &entity.calls {
                    let target = resolve_call(&graph, extraction, &default_exports, &call.callee)
                        .and_then(|key| graph.index_of(&key));
                    match target {
                        Some(callee) => {
                            graph.link(caller, callee, call.line);
                        }
                        None => stats.dropped_calls += 1,
                    }
                }
            }
        }

        stats.nodes = graph.len();
        stats.edges = graph.edge_count();
        info!(
            files = extractions.len(),
            nodes = stats.nodes,
            edges = stats.edges,
            collisions = stats.collisions,
            resolved_imports = stats.resolved_imports,
            unresolved_imports = stats.unresolved_imports,
            dropped_calls = stats.dropped_calls,
            "built call graph"
        );

        (graph, stats)
    }
}

/// Map a callee reference to the key of the node it names, if any.
fn resolve_call(
    graph: &CallGraph,
    extraction: &FileExtraction,
    default_exports: &HashMap<PathBuf, String>,
    callee: &Callee,
) -> Option<String> {
    let file = extraction.file.as_path();

    match callee {
        Callee::Name(name) => {
            let local = entity_key(file, name);
            if graph.contains(&local) {
                return Some(local);
            }

            let binding = extraction.binding(name)?;
            let target = binding.resolved_file.as_deref()?;
            let exported = match &binding.imported {
                Imported::Named(exported) => exported.as_str(),
                Imported::Default => default_exports
                    .get(target)
                    .map(String::as_str)
                    .unwrap_or(name.as_str()),
                Imported::Namespace => return None,
            };
            existing(graph, target, exported)
        }
        Callee::Member { object, property } if object == "this" => {
            existing(graph, file, property)
        }
        Callee::Member { object, property } => {
            let binding = extraction.binding(object)?;
            if binding.imported != Imported::Namespace {
                return None;
            }
            let target = binding.resolved_file.as_deref()?;
            existing(graph, target, property)
        }
    }
}

fn existing(graph: &CallGraph, file: &Path, name: &str) -> Option<String> {
    let key = entity_key(file, name);
    graph.contains(&key).then_some(key)
}
