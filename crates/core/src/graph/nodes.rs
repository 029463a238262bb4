//! Node and edge weights for the call graph

use crate::parser::{EntityKind, FunctionEntity};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A function-level node, keyed by `file:name`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CallGraphNode {
    key: String,
    file: PathBuf,
    name: String,
    kind: EntityKind,
    line: usize,
    end_line: usize,
    code: String,
}

impl CallGraphNode {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn end_line(&self) -> usize {
        self.end_line
    }

    pub fn code(&self) -> &str {
        &self.code
    }
}

impl From<&FunctionEntity> for CallGraphNode {
    fn from(entity: &FunctionEntity) -> Self {
        Self {
            key: entity.key(),
            file: entity.file.clone(),
            name: entity.name.clone(),
            kind: entity.kind,
            line: entity.line,
            end_line: entity.end_line,
            code: entity.code.clone(),
        }
    }
}

/// A "caller invokes callee" edge
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CallEdge {
    /// Line of the first call site that produced this edge
    pub line: usize,
}
