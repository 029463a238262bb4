//! TypeScript/JavaScript entity extraction using Tree-sitter

use super::entity::{
    CallRef, Callee, EntityKind, FileExtraction, FunctionEntity, ImportBinding, Imported,
    MODULE_SCOPE,
};
use super::resolver::classify_specifier;
use super::{LanguageParser, ParseError};
use crate::config::PathAliases;
use std::path::Path;
use tree_sitter::{Language, Node, Parser, Tree};

// Tests live in crates/core/tests/test_typescript_parser.rs

/// The closed set of syntax shapes the extractor reacts to.
///
/// Tree-sitter hands out node kinds as strings; [`SyntaxCategory::of`] maps
/// them onto this enum once, and the walker dispatches on it exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SyntaxCategory {
    /// `function foo() {}`
    FunctionDeclaration,
    /// `const foo = () => {}` / `const foo = function () {}`
    BoundFunction,
    /// `const x = require('./x')` / `const { a } = require('./x')`
    RequireBinding,
    /// Method in a class body or object literal
    Method,
    /// `handle = () => {}` inside a class body
    ClassPropertyFunction,
    /// `class Foo {}`
    Class,
    /// `foo()`, `ns.foo()`, `this.foo()`
    CallExpression,
    /// `<Foo />` / `<Foo>`
    JsxElement,
    /// `import ... from '...'`
    ImportStatement,
    /// `export ...`
    ExportStatement,
    Other,
}

impl SyntaxCategory {
    fn of(node: &Node, source: &str) -> Self {
        match node.kind() {
            "function_declaration" | "generator_function_declaration" => Self::FunctionDeclaration,
            "variable_declarator" => match node.child_by_field_name("value") {
                Some(value) if is_function_value(&value) => Self::BoundFunction,
                Some(value) if require_specifier(&value, source).is_some() => Self::RequireBinding,
                _ => Self::Other,
            },
            "method_definition" => Self::Method,
            "public_field_definition" | "field_definition" => {
                match node.child_by_field_name("value") {
                    Some(value) if is_function_value(&value) => Self::ClassPropertyFunction,
                    _ => Self::Other,
                }
            }
            "class_declaration" | "abstract_class_declaration" => Self::Class,
            "call_expression" => Self::CallExpression,
            "jsx_self_closing_element" | "jsx_opening_element" => Self::JsxElement,
            "import_statement" => Self::ImportStatement,
            "export_statement" => Self::ExportStatement,
            _ => Self::Other,
        }
    }
}

fn is_function_value(node: &Node) -> bool {
    matches!(
        node.kind(),
        "arrow_function" | "function_expression" | "function" | "generator_function"
    )
}

/// `require('<specifier>')` with a string literal argument
fn require_specifier(node: &Node, source: &str) -> Option<String> {
    if node.kind() != "call_expression" {
        return None;
    }
    let function = node.child_by_field_name("function")?;
    if function.kind() != "identifier" || text(&function, source)? != "require" {
        return None;
    }
    let arguments = node.child_by_field_name("arguments")?;
    let first = arguments.named_child(0)?;
    if first.kind() != "string" {
        return None;
    }
    text(&first, source).map(unquote)
}

fn text<'s>(node: &Node, source: &'s str) -> Option<&'s str> {
    node.utf8_text(source.as_bytes()).ok()
}

fn unquote(s: &str) -> String {
    s.trim_matches(|c| c == '\'' || c == '"' || c == '`')
        .to_string()
}

/// TypeScript language parser (also handles JavaScript and JSX)
pub struct TypeScriptParser {
    typescript: Language,
    tsx: Language,
    javascript: Language,
}

impl Default for TypeScriptParser {
    fn default() -> Self {
        Self {
            typescript: tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            tsx: tree_sitter_typescript::LANGUAGE_TSX.into(),
            javascript: tree_sitter_javascript::LANGUAGE.into(),
        }
    }
}

impl TypeScriptParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pick the grammar for a file: `.tsx` needs the TSX dialect, plain
    /// JavaScript (with or without JSX) uses the JavaScript grammar.
    fn language_for(&self, file_path: &Path) -> &Language {
        match file_path.extension().and_then(|e| e.to_str()) {
            Some("tsx") => &self.tsx,
            Some("js") | Some("jsx") | Some("mjs") | Some("cjs") => &self.javascript,
            _ => &self.typescript,
        }
    }

    fn parse_tree(&self, source: &str, file_path: &Path) -> Result<Tree, ParseError> {
        let mut parser = Parser::new();
        parser
            .set_language(self.language_for(file_path))
            .map_err(|e| ParseError::TreeSitter(e.to_string()))?;
        let tree = parser
            .parse(source, None)
            .ok_or_else(|| ParseError::ParseFailed("Failed to parse TypeScript source".to_string()))?;

        let root = tree.root_node();
        if root.has_error() {
            let line = first_error_line(&root).unwrap_or(1);
            return Err(ParseError::Syntax { line });
        }

        Ok(tree)
    }
}

/// Line (1-based) of the first ERROR or MISSING node in document order
fn first_error_line(root: &Node) -> Option<usize> {
    let mut stack = vec![*root];
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            return Some(node.start_position().row + 1);
        }
        let mut cursor = node.walk();
        let children: Vec<Node> = node
            .children(&mut cursor)
            .filter(|child| child.has_error() || child.is_missing())
            .collect();
        stack.extend(children.into_iter().rev());
    }
    None
}

/// Whether the walker looks inside a node, and under which scope
enum Descend {
    Into(Option<usize>),
    Skip,
}

/// Single-file walk state
struct Extractor<'a> {
    source: &'a str,
    aliases: &'a PathAliases,
    out: FileExtraction,
    module_calls: Vec<CallRef>,
}

impl<'a> Extractor<'a> {
    fn new(source: &'a str, file_path: &Path, aliases: &'a PathAliases) -> Self {
        Self {
            source,
            aliases,
            out: FileExtraction::new(file_path.to_path_buf()),
            module_calls: Vec::new(),
        }
    }

    fn finish(mut self, root: &Node) -> FileExtraction {
        if !self.module_calls.is_empty() {
            let file = self.out.file.clone();
            self.out.entities.push(FunctionEntity {
                file,
                name: MODULE_SCOPE.to_string(),
                kind: EntityKind::ModuleScope,
                line: 1,
                end_line: root.end_position().row + 1,
                code: String::new(),
                calls: std::mem::take(&mut self.module_calls),
            });
        }
        self.out
    }

    /// Pre-order walk over an explicit work stack; deep nesting never recurses
    fn walk<'t>(&mut self, root: Node<'t>) {
        let mut stack: Vec<(Node<'t>, Option<usize>)> = vec![(root, None)];

        while let Some((node, scope)) = stack.pop() {
            let Descend::Into(scope) = self.visit(&node, scope) else {
                continue;
            };
            let mut cursor = node.walk();
            let children: Vec<Node<'t>> = node.named_children(&mut cursor).collect();
            stack.extend(children.into_iter().rev().map(|child| (child, scope)));
        }
    }

    /// Handle one node; `scope` is the index of the nearest enclosing entity
    fn visit(&mut self, node: &Node, scope: Option<usize>) -> Descend {
        let mut scope = scope;

        match SyntaxCategory::of(node, self.source) {
            SyntaxCategory::FunctionDeclaration => {
                if let Some(name) = self.field_text(node, "name") {
                    scope = Some(self.push_entity(name, EntityKind::Function, node));
                }
            }
            SyntaxCategory::BoundFunction => {
                let name = node
                    .child_by_field_name("name")
                    .filter(|n| n.kind() == "identifier")
                    .and_then(|n| text(&n, self.source));
                if let Some(name) = name {
                    let span = declaration_span(*node);
                    scope = Some(self.push_entity(name.to_string(), EntityKind::BoundFunction, &span));
                }
            }
            SyntaxCategory::Method => {
                let name = node
                    .child_by_field_name("name")
                    .filter(|n| n.kind() != "computed_property_name")
                    .and_then(|n| text(&n, self.source));
                if let Some(name) = name {
                    scope = Some(self.push_entity(name.to_string(), EntityKind::Method, node));
                }
            }
            SyntaxCategory::ClassPropertyFunction => {
                let name = node
                    .child_by_field_name("name")
                    .or_else(|| node.child_by_field_name("property"))
                    .filter(|n| n.kind() != "computed_property_name")
                    .and_then(|n| text(&n, self.source));
                if let Some(name) = name {
                    scope = Some(self.push_entity(name.to_string(), EntityKind::Method, node));
                }
            }
            SyntaxCategory::Class => {
                if let Some(name) = self.field_text(node, "name") {
                    scope = Some(self.push_entity(name, EntityKind::Class, node));
                }
            }
            SyntaxCategory::CallExpression => {
                if let Some(callee) = self.call_target(node) {
                    self.record_call(scope, callee, node);
                }
            }
            SyntaxCategory::JsxElement => {
                if let Some(callee) = self.jsx_target(node) {
                    self.record_call(scope, callee, node);
                }
            }
            SyntaxCategory::ImportStatement => {
                self.extract_import(node);
                return Descend::Skip;
            }
            SyntaxCategory::RequireBinding => {
                self.extract_require(node);
                return Descend::Skip;
            }
            SyntaxCategory::ExportStatement => {
                self.extract_default_export(node);
            }
            SyntaxCategory::Other => {}
        }

        Descend::Into(scope)
    }

    fn field_text(&self, node: &Node, field: &str) -> Option<String> {
        node.child_by_field_name(field)
            .and_then(|n| text(&n, self.source))
            .map(str::to_string)
    }

    fn push_entity(&mut self, name: String, kind: EntityKind, span: &Node) -> usize {
        self.out.entities.push(FunctionEntity {
            file: self.out.file.clone(),
            name,
            kind,
            line: span.start_position().row + 1,
            end_line: span.end_position().row + 1,
            code: text(span, self.source).unwrap_or_default().to_string(),
            calls: Vec::new(),
        });
        self.out.entities.len() - 1
    }

    fn record_call(&mut self, scope: Option<usize>, callee: Callee, node: &Node) {
        let call = CallRef {
            callee,
            line: node.start_position().row + 1,
        };
        match scope {
            Some(index) => self.out.entities[index].calls.push(call),
            None => self.module_calls.push(call),
        }
    }

    /// Callee of a call_expression: plain identifiers and single-level
    /// member calls on an identifier or `this`. Everything else is dynamic.
    fn call_target(&self, node: &Node) -> Option<Callee> {
        let function = node.child_by_field_name("function")?;

        match function.kind() {
            "identifier" => Some(Callee::Name(text(&function, self.source)?.to_string())),
            "member_expression" => {
                let object = function.child_by_field_name("object")?;
                let property = function.child_by_field_name("property")?;
                if !matches!(object.kind(), "identifier" | "this") {
                    return None;
                }
                Some(Callee::Member {
                    object: text(&object, self.source)?.to_string(),
                    property: text(&property, self.source)?.to_string(),
                })
            }
            _ => None,
        }
    }

    /// Component referenced by a JSX element. Lowercase tags are intrinsic
    /// HTML elements and never name a component.
    fn jsx_target(&self, node: &Node) -> Option<Callee> {
        let name = node.child_by_field_name("name")?;

        match name.kind() {
            "identifier" => {
                let tag = text(&name, self.source)?;
                tag.starts_with(|c: char| c.is_ascii_uppercase())
                    .then(|| Callee::Name(tag.to_string()))
            }
            "member_expression" | "nested_identifier" => {
                let full = text(&name, self.source)?;
                let (object, property) = full.split_once('.')?;
                if property.contains('.') {
                    return None;
                }
                Some(Callee::Member {
                    object: object.to_string(),
                    property: property.to_string(),
                })
            }
            _ => None,
        }
    }

    fn extract_import(&mut self, node: &Node) {
        let Some(specifier) = node
            .child_by_field_name("source")
            .and_then(|s| text(&s, self.source))
            .map(unquote)
        else {
            return;
        };
        let line = node.start_position().row + 1;

        let mut cursor = node.walk();
        let clauses: Vec<Node> = node
            .children(&mut cursor)
            .filter(|c| c.kind() == "import_clause")
            .collect();

        for clause in clauses {
            let mut clause_cursor = clause.walk();
            for child in clause.named_children(&mut clause_cursor) {
                match child.kind() {
                    // import Foo from 'mod'
                    "identifier" => {
                        if let Some(local) = text(&child, self.source) {
                            self.push_binding(local, Imported::Default, &specifier, line);
                        }
                    }
                    // import { a, b as c } from 'mod'
                    "named_imports" => {
                        let mut inner = child.walk();
                        for spec in child.named_children(&mut inner) {
                            if spec.kind() != "import_specifier" {
                                continue;
                            }
                            let Some(exported) = spec
                                .child_by_field_name("name")
                                .and_then(|n| text(&n, self.source))
                            else {
                                continue;
                            };
                            let local = spec
                                .child_by_field_name("alias")
                                .and_then(|n| text(&n, self.source))
                                .unwrap_or(exported);
                            let imported = if exported == "default" {
                                Imported::Default
                            } else {
                                Imported::Named(exported.to_string())
                            };
                            self.push_binding(local, imported, &specifier, line);
                        }
                    }
                    // import * as ns from 'mod'
                    "namespace_import" => {
                        let mut inner = child.walk();
                        let local = child
                            .named_children(&mut inner)
                            .find(|n| n.kind() == "identifier")
                            .and_then(|n| text(&n, self.source));
                        if let Some(local) = local {
                            self.push_binding(local, Imported::Namespace, &specifier, line);
                        }
                    }
                    _ => {}
                }
            }
        }
    }

    fn extract_require(&mut self, declarator: &Node) {
        let Some(specifier) = declarator
            .child_by_field_name("value")
            .and_then(|v| require_specifier(&v, self.source))
        else {
            return;
        };
        let Some(pattern) = declarator.child_by_field_name("name") else {
            return;
        };
        let line = declarator.start_position().row + 1;

        match pattern.kind() {
            "identifier" => {
                if let Some(local) = text(&pattern, self.source) {
                    self.push_binding(local, Imported::Namespace, &specifier, line);
                }
            }
            "object_pattern" => {
                let mut cursor = pattern.walk();
                let props: Vec<Node> = pattern.named_children(&mut cursor).collect();
                for prop in props {
                    match prop.kind() {
                        // const { a } = require(...)
                        "shorthand_property_identifier_pattern" => {
                            if let Some(name) = text(&prop, self.source) {
                                self.push_binding(
                                    name,
                                    Imported::Named(name.to_string()),
                                    &specifier,
                                    line,
                                );
                            }
                        }
                        // const { a: b } = require(...)
                        "pair_pattern" => {
                            let key = prop
                                .child_by_field_name("key")
                                .and_then(|k| text(&k, self.source));
                            let value = prop
                                .child_by_field_name("value")
                                .filter(|v| v.kind() == "identifier")
                                .and_then(|v| text(&v, self.source));
                            if let (Some(key), Some(local)) = (key, value) {
                                self.push_binding(
                                    local,
                                    Imported::Named(key.to_string()),
                                    &specifier,
                                    line,
                                );
                            }
                        }
                        _ => {}
                    }
                }
            }
            _ => {}
        }
    }

    fn push_binding(&mut self, local: &str, imported: Imported, specifier: &str, line: usize) {
        self.out.imports.push(ImportBinding {
            local_name: local.to_string(),
            imported,
            specifier: specifier.to_string(),
            kind: classify_specifier(specifier, self.aliases),
            resolved_file: None,
            line,
        });
    }

    /// Record the default-exported name for `export default function Foo`,
    /// `export default class Foo` and `export default Foo;`
    fn extract_default_export(&mut self, node: &Node) {
        let mut cursor = node.walk();
        let is_default = node.children(&mut cursor).any(|c| c.kind() == "default");
        if !is_default {
            return;
        }

        let name = if let Some(decl) = node.child_by_field_name("declaration") {
            self.field_text(&decl, "name")
        } else {
            node.child_by_field_name("value").and_then(|value| match value.kind() {
                "identifier" => text(&value, self.source).map(str::to_string),
                // export default function Foo() {} parsed as an expression
                _ => self.field_text(&value, "name"),
            })
        };

        if name.is_some() {
            self.out.default_export = name;
        }
    }
}

/// Span used for a bound function: the whole `const x = ...` statement when
/// it declares a single name, otherwise the declarator alone.
fn declaration_span(declarator: Node) -> Node {
    match declarator.parent() {
        Some(parent)
            if matches!(parent.kind(), "lexical_declaration" | "variable_declaration")
                && parent.named_child_count() == 1 =>
        {
            parent
        }
        _ => declarator,
    }
}

impl LanguageParser for TypeScriptParser {
    fn file_extensions(&self) -> &[&str] {
        &[".ts", ".tsx", ".js", ".jsx", ".mjs", ".cjs"]
    }

    fn parse_source(
        &self,
        source: &str,
        file_path: &Path,
        aliases: &PathAliases,
    ) -> Result<FileExtraction, ParseError> {
        let tree = self.parse_tree(source, file_path)?;
        let root = tree.root_node();

        let mut extractor = Extractor::new(source, file_path, aliases);
        extractor.walk(root);
        Ok(extractor.finish(&root))
    }
}
