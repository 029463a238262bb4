//! Language parsers that turn source files into per-file extraction records

pub mod entity;
pub mod resolver;
pub mod typescript;

pub use entity::{
    entity_key, CallRef, Callee, EntityKind, FileExtraction, FunctionEntity, ImportBinding,
    ImportKind, Imported, MODULE_SCOPE,
};
pub use resolver::ImportResolver;

use crate::config::PathAliases;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Error types for parsing operations
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Failed to read file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse file: {0}")]
    ParseFailed(String),

    #[error("Syntax error at line {line}")]
    Syntax { line: usize },

    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("Tree-sitter error: {0}")]
    TreeSitter(String),
}

/// A file that was skipped because it could not be read or parsed
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParseFailure {
    pub file: PathBuf,
    pub message: String,
}

impl std::fmt::Display for ParseFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.file.display(), self.message)
    }
}

/// Trait for language-specific parsers
///
/// Each language parser implements this trait to convert one source file
/// into a [`FileExtraction`]: its function entities, their raw callee
/// references and the file's import bindings.
pub trait LanguageParser: Send + Sync {
    /// Get file extensions this parser handles (e.g., [".ts", ".tsx"])
    fn file_extensions(&self) -> &[&str];

    /// Read `root/file_path` and extract it; `file_path` stays project-relative
    fn parse_file(
        &self,
        root: &Path,
        file_path: &Path,
        aliases: &PathAliases,
    ) -> Result<FileExtraction, ParseError> {
        let source = std::fs::read_to_string(root.join(file_path))?;
        self.parse_source(&source, file_path, aliases)
    }

    /// Extract entities from source text
    ///
    /// This is useful for testing or analyzing code snippets
    fn parse_source(
        &self,
        source: &str,
        file_path: &Path,
        aliases: &PathAliases,
    ) -> Result<FileExtraction, ParseError>;
}

/// Dispatcher that routes files to the appropriate language parser
pub struct ParserDispatcher {
    parsers: Vec<Box<dyn LanguageParser>>,
    aliases: PathAliases,
}

impl ParserDispatcher {
    /// Create a new parser dispatcher with default parsers
    pub fn new() -> Self {
        Self::with_aliases(PathAliases::new())
    }

    /// Create a dispatcher whose import classification knows `aliases`
    pub fn with_aliases(aliases: PathAliases) -> Self {
        Self {
            parsers: vec![Box::new(typescript::TypeScriptParser::new())],
            aliases,
        }
    }

    /// Find a parser for the given file path based on extension
    pub fn find_parser(&self, file_path: &Path) -> Option<&dyn LanguageParser> {
        let extension = file_path.extension()?.to_str()?;
        let extension_with_dot = format!(".{}", extension);

        self.parsers
            .iter()
            .find(|parser| {
                parser
                    .file_extensions()
                    .contains(&extension_with_dot.as_str())
            })
            .map(|boxed| &**boxed)
    }

    /// Parse a project-relative file under `root` using the appropriate parser
    pub fn parse_file(&self, root: &Path, file_path: &Path) -> Result<FileExtraction, ParseError> {
        self.parser_for(file_path)?
            .parse_file(root, file_path, &self.aliases)
    }

    /// Parse source text as if it lived at `file_path`
    pub fn parse_source(
        &self,
        source: &str,
        file_path: &Path,
    ) -> Result<FileExtraction, ParseError> {
        self.parser_for(file_path)?
            .parse_source(source, file_path, &self.aliases)
    }

    fn parser_for(&self, file_path: &Path) -> Result<&dyn LanguageParser, ParseError> {
        self.find_parser(file_path).ok_or_else(|| {
            ParseError::UnsupportedLanguage(
                file_path
                    .extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or("unknown")
                    .to_string(),
            )
        })
    }

    /// Parse multiple files in parallel, keeping the input order.
    ///
    /// Each file is extracted independently (no shared state); failures are
    /// collected and logged, and the failing file is left out. Returns
    /// `(extractions, failures)`.
    pub fn parse_files_parallel(
        &self,
        root: &Path,
        files: &[PathBuf],
    ) -> (Vec<FileExtraction>, Vec<ParseFailure>) {
        let per_file: Vec<Result<FileExtraction, ParseFailure>> = files
            .par_iter()
            .map(|file| {
                self.parse_file(root, file).map_err(|e| ParseFailure {
                    file: file.clone(),
                    message: e.to_string(),
                })
            })
            .collect();

        let mut extractions = Vec::with_capacity(per_file.len());
        let mut failures = Vec::new();

        for result in per_file {
            match result {
                Ok(extraction) => {
                    debug!(
                        file = %extraction.file.display(),
                        entities = extraction.entities.len(),
                        imports = extraction.imports.len(),
                        "extracted file"
                    );
                    extractions.push(extraction);
                }
                Err(failure) => {
                    warn!(file = %failure.file.display(), error = %failure.message, "skipping file");
                    failures.push(failure);
                }
            }
        }

        (extractions, failures)
    }

    /// Get all supported file extensions
    pub fn supported_extensions(&self) -> Vec<&str> {
        self.parsers
            .iter()
            .flat_map(|parser| parser.file_extensions().iter().copied())
            .collect()
    }
}

impl Default for ParserDispatcher {
    fn default() -> Self {
        Self::new()
    }
}
