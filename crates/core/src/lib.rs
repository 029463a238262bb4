//! Ripple Core - Call Graph and Change Impact Engine
//!
//! This crate answers "what breaks if this function changes" for
//! TypeScript/JavaScript projects:
//! - Source enumeration honoring ignore files
//! - Entity extraction via Tree-sitter
//! - Import resolution with path aliases and extension candidates
//! - Whole-project call graph construction
//! - Depth-bounded caller closure queries

pub mod config;
pub mod discovery;
pub mod graph;
pub mod impact;
pub mod parser;
pub mod service;

pub use config::{ConfigError, PathAliases, RippleConfig};
pub use discovery::discover_files;
pub use graph::{CallEdge, CallGraph, CallGraphBuilder, CallGraphNode, NodeId};
pub use impact::{
    group_by_file, CallerInfo, ChangedEntity, EntityImpact, ImpactAnalyzer, DEFAULT_MAX_DEPTH,
};
pub use parser::{
    FileExtraction, FunctionEntity, ImportBinding, ImportResolver, LanguageParser, ParseError,
    ParseFailure, ParserDispatcher,
};
pub use service::{AnalysisRun, ImpactReport, ImpactService};

/// Ripple version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
