//! Per-file extraction records produced by language parsers
//!
//! Everything here is created once per file and never mutated afterwards,
//! except [`ImportBinding::resolved_file`], which the graph builder stamps
//! while merging.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the synthetic entity that owns calls made outside any named function
pub const MODULE_SCOPE: &str = "<module>";

/// A named function-like unit of code, identified by `(file, name)`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FunctionEntity {
    pub file: PathBuf,
    pub name: String,
    pub kind: EntityKind,
    /// 1-based first line
    pub line: usize,
    /// 1-based last line (inclusive)
    pub end_line: usize,
    pub code: String,
    /// Callee references in source order, unresolved
    pub calls: Vec<CallRef>,
}

impl FunctionEntity {
    /// Graph key `file:name`
    pub fn key(&self) -> String {
        entity_key(&self.file, &self.name)
    }
}

/// Build the graph key for an entity
pub fn entity_key(file: &Path, name: &str) -> String {
    format!("{}:{}", file.display(), name)
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// `function foo() {}`
    Function,
    /// `const foo = () => {}` / `const foo = function () {}`
    BoundFunction,
    /// Class method or class property holding a function
    Method,
    /// Class declaration (component classes are reachable through JSX)
    Class,
    /// Calls made at the top level of a module
    ModuleScope,
}

/// A callee as written at the call site
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Callee {
    /// `foo()` or `<Foo />`
    Name(String),
    /// `ns.foo()`, `this.foo()` or `<ns.Foo />`
    Member { object: String, property: String },
}

/// A call reference with the line it occurs on
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CallRef {
    pub callee: Callee,
    pub line: usize,
}

/// What an import binds locally
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Imported {
    /// `import { foo } from` / `import { foo as bar } from`; holds the exported name
    Named(String),
    /// `import Foo from`
    Default,
    /// `import * as ns from` / `const ns = require(...)`
    Namespace,
}

/// How an import specifier is resolved
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ImportKind {
    /// Starts with `./` or `../`
    Relative,
    /// Matches a configured path alias prefix
    Aliased,
    /// Anything else; never resolved
    External,
}

/// One locally bound name introduced by an import
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImportBinding {
    pub local_name: String,
    pub imported: Imported,
    /// Module specifier as written
    pub specifier: String,
    pub kind: ImportKind,
    /// Project file the specifier resolves to; `None` for external or unresolved
    pub resolved_file: Option<PathBuf>,
    pub line: usize,
}

/// Everything extracted from one source file
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FileExtraction {
    pub file: PathBuf,
    /// Entities in declaration order (pre-order over the syntax tree)
    pub entities: Vec<FunctionEntity>,
    /// Import bindings visible to every entity of the file, in source order
    pub imports: Vec<ImportBinding>,
    /// Name of the entity exported as `default`, when statically known
    pub default_export: Option<String>,
}

impl FileExtraction {
    pub fn new(file: PathBuf) -> Self {
        Self {
            file,
            ..Self::default()
        }
    }

    /// Find the import binding for a local name
    pub fn binding(&self, local_name: &str) -> Option<&ImportBinding> {
        self.imports.iter().find(|b| b.local_name == local_name)
    }

    /// Find an entity by name; the last definition wins on collisions
    pub fn entity(&self, name: &str) -> Option<&FunctionEntity> {
        self.entities.iter().rev().find(|e| e.name == name)
    }
}
