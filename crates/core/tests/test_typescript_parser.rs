//! Integration tests for TypeScript/JavaScript entity extraction
//!
//! These tests verify that the extractor finds every function-like entity,
//! attributes each call site to its enclosing entity and records the file's
//! import bindings as written.

use ripple_core::parser::{Callee, EntityKind, ImportKind, Imported, MODULE_SCOPE};
use ripple_core::{FileExtraction, ParseError, ParserDispatcher, PathAliases};
use std::path::Path;

fn parse(file: &str, source: &str) -> FileExtraction {
    ParserDispatcher::new()
        .parse_source(source, Path::new(file))
        .unwrap()
}

fn names(extraction: &FileExtraction) -> Vec<&str> {
    extraction.entities.iter().map(|e| e.name.as_str()).collect()
}

fn name(s: &str) -> Callee {
    Callee::Name(s.to_string())
}

fn member(object: &str, property: &str) -> Callee {
    Callee::Member {
        object: object.to_string(),
        property: property.to_string(),
    }
}

fn callees(extraction: &FileExtraction, entity: &str) -> Vec<Callee> {
    extraction
        .entity(entity)
        .unwrap_or_else(|| panic!("{} not found", entity))
        .calls
        .iter()
        .map(|c| c.callee.clone())
        .collect()
}

#[test]
fn test_function_declarations_and_calls() {
    let source = "function greet(name: string) {\n    return format(name);\n}\n\nfunction format(s: string) {\n    return s.trim();\n}\n";
    let ex = parse("src/greet.ts", source);

    assert_eq!(names(&ex), vec!["greet", "format"]);

    let greet = ex.entity("greet").unwrap();
    assert_eq!(greet.kind, EntityKind::Function);
    assert_eq!(greet.line, 1);
    assert_eq!(greet.end_line, 3);
    assert!(greet.code.starts_with("function greet"));
    assert_eq!(greet.calls.len(), 1);
    assert_eq!(greet.calls[0].callee, name("format"));
    assert_eq!(greet.calls[0].line, 2);

    // `s.trim()` is a member call on a local, recorded as written
    assert_eq!(callees(&ex, "format"), vec![member("s", "trim")]);
}

#[test]
fn test_bound_functions_use_declaration_span() {
    let source = "const load = async (id: string) => {\n    return fetchOne(id);\n};\n\nconst save = function (x) {\n    persist(x);\n};\n";
    let ex = parse("store.ts", source);

    assert_eq!(names(&ex), vec!["load", "save"]);

    let load = ex.entity("load").unwrap();
    assert_eq!(load.kind, EntityKind::BoundFunction);
    assert_eq!(load.line, 1);
    assert_eq!(load.end_line, 3);
    assert!(load.code.starts_with("const load"));
    assert_eq!(callees(&ex, "load"), vec![name("fetchOne")]);

    assert_eq!(ex.entity("save").unwrap().kind, EntityKind::BoundFunction);
    assert_eq!(callees(&ex, "save"), vec![name("persist")]);
}

#[test]
fn test_non_function_bindings_are_not_entities() {
    let source = "const limit = 10;\nconst cfg = { retries: 3 };\n";
    let ex = parse("consts.ts", source);
    assert!(ex.entities.is_empty());
}

#[test]
fn test_class_methods_and_properties() {
    let source = r#"class Service {
    run() {
        this.helper();
    }

    helper() {
        return 1;
    }

    handle = () => {
        notify();
    };
}
"#;
    let ex = parse("service.ts", source);

    assert_eq!(names(&ex), vec!["Service", "run", "helper", "handle"]);
    assert_eq!(ex.entity("Service").unwrap().kind, EntityKind::Class);
    assert_eq!(ex.entity("run").unwrap().kind, EntityKind::Method);
    assert_eq!(ex.entity("handle").unwrap().kind, EntityKind::Method);

    assert_eq!(callees(&ex, "run"), vec![member("this", "helper")]);
    assert_eq!(callees(&ex, "handle"), vec![name("notify")]);
    assert!(callees(&ex, "Service").is_empty());
}

#[test]
fn test_javascript_class_property_function() {
    let source = "class Widget {\n  onClick = () => {\n    track();\n  };\n}\n";
    let ex = parse("widget.js", source);

    assert_eq!(names(&ex), vec!["Widget", "onClick"]);
    assert_eq!(callees(&ex, "onClick"), vec![name("track")]);
}

#[test]
fn test_nested_functions_own_their_calls() {
    let source = "function outer() {\n  function inner() {\n    leaf();\n  }\n  inner();\n}\n";
    let ex = parse("nested.js", source);

    assert_eq!(names(&ex), vec!["outer", "inner"]);
    assert_eq!(callees(&ex, "outer"), vec![name("inner")]);
    assert_eq!(callees(&ex, "inner"), vec![name("leaf")]);
}

#[test]
fn test_dynamic_callees_are_ignored() {
    let source = "function run(obj, k) {\n  a.b.c();\n  obj[k]();\n  getHandler()();\n}\n";
    let ex = parse("dyn.js", source);

    // Only the inner `getHandler()` has a static callee
    assert_eq!(callees(&ex, "run"), vec![name("getHandler")]);
}

#[test]
fn test_jsx_components_are_calls() {
    let source = r#"export function App() {
    return (
        <div className="app">
            <Header title="x" />
            <Layout>
                <span>text</span>
            </Layout>
        </div>
    );
}
"#;
    let ex = parse("src/App.tsx", source);

    assert_eq!(names(&ex), vec!["App"]);
    // Lowercase intrinsic elements never name a component
    assert_eq!(callees(&ex, "App"), vec![name("Header"), name("Layout")]);
}

#[test]
fn test_jsx_member_component() {
    let source = "function Page() {\n  return <UI.Button label=\"ok\" />;\n}\n";
    let ex = parse("page.jsx", source);

    assert_eq!(callees(&ex, "Page"), vec![member("UI", "Button")]);
}

#[test]
fn test_import_bindings() {
    let source = r#"import Button from './Button';
import { fetchApi, format as fmt } from '../lib/api';
import * as utils from 'app/utils';
import React from 'react';

export function view() {
    return fmt(fetchApi());
}
"#;
    let mut aliases = PathAliases::new();
    aliases.insert("app/".to_string(), "src/".to_string());
    let ex = ParserDispatcher::with_aliases(aliases)
        .parse_source(source, Path::new("src/ui/view.ts"))
        .unwrap();

    assert_eq!(ex.imports.len(), 5);

    let button = ex.binding("Button").unwrap();
    assert_eq!(button.imported, Imported::Default);
    assert_eq!(button.specifier, "./Button");
    assert_eq!(button.kind, ImportKind::Relative);
    assert_eq!(button.line, 1);
    assert!(button.resolved_file.is_none());

    let fetch = ex.binding("fetchApi").unwrap();
    assert_eq!(fetch.imported, Imported::Named("fetchApi".to_string()));
    assert_eq!(fetch.specifier, "../lib/api");

    let fmt = ex.binding("fmt").unwrap();
    assert_eq!(fmt.imported, Imported::Named("format".to_string()));
    assert!(ex.binding("format").is_none());

    let utils = ex.binding("utils").unwrap();
    assert_eq!(utils.imported, Imported::Namespace);
    assert_eq!(utils.kind, ImportKind::Aliased);

    let react = ex.binding("React").unwrap();
    assert_eq!(react.kind, ImportKind::External);

    // Imports are file-level bindings, never calls
    assert_eq!(callees(&ex, "view"), vec![name("fmt"), name("fetchApi")]);
}

#[test]
fn test_require_bindings() {
    let source = "const util = require('./util');\nconst { load, save: persist } = require('../store');\n\nfunction main() {\n  util.run();\n  persist(load());\n}\n";
    let ex = parse("src/main.js", source);

    let util = ex.binding("util").unwrap();
    assert_eq!(util.imported, Imported::Namespace);
    assert_eq!(util.specifier, "./util");

    let load = ex.binding("load").unwrap();
    assert_eq!(load.imported, Imported::Named("load".to_string()));
    assert_eq!(load.line, 2);

    let persist = ex.binding("persist").unwrap();
    assert_eq!(persist.imported, Imported::Named("save".to_string()));
    assert_eq!(persist.specifier, "../store");

    // `require` itself is not a module-level call
    assert_eq!(names(&ex), vec!["main"]);
    assert_eq!(
        callees(&ex, "main"),
        vec![member("util", "run"), name("persist"), name("load")]
    );
}

#[test]
fn test_default_export_declaration() {
    let source = "export default function Dashboard() {\n  return null;\n}\n";
    let ex = parse("Dashboard.ts", source);

    assert_eq!(ex.default_export.as_deref(), Some("Dashboard"));
    assert_eq!(names(&ex), vec!["Dashboard"]);
}

#[test]
fn test_default_export_identifier() {
    let source = "function helper() {}\n\nexport default helper;\n";
    let ex = parse("helper.js", source);

    assert_eq!(ex.default_export.as_deref(), Some("helper"));
}

#[test]
fn test_named_export_is_not_default() {
    let source = "export function a() {}\nexport const b = () => a();\n";
    let ex = parse("mod.ts", source);

    assert!(ex.default_export.is_none());
    assert_eq!(names(&ex), vec!["a", "b"]);
    assert_eq!(callees(&ex, "b"), vec![name("a")]);
}

#[test]
fn test_module_scope_collects_top_level_calls() {
    let source = "function init() {}\n\ninit();\nsetup();\n";
    let ex = parse("boot.ts", source);

    assert_eq!(names(&ex), vec!["init", MODULE_SCOPE]);

    let module = ex.entity(MODULE_SCOPE).unwrap();
    assert_eq!(module.kind, EntityKind::ModuleScope);
    assert_eq!(module.line, 1);
    assert!(module.code.is_empty());
    assert_eq!(module.calls.len(), 2);
    assert_eq!(module.calls[0].callee, name("init"));
    assert_eq!(module.calls[0].line, 3);
    assert_eq!(module.calls[1].line, 4);
}

#[test]
fn test_no_module_scope_without_top_level_calls() {
    let ex = parse("quiet.ts", "function a() { b(); }\nfunction b() {}\n");
    assert!(ex.entity(MODULE_SCOPE).is_none());
}

#[test]
fn test_redefinition_keeps_both_records_last_wins_lookup() {
    let source = "function dup() { first(); }\nfunction dup() { second(); }\n";
    let ex = parse("dup.js", source);

    assert_eq!(names(&ex), vec!["dup", "dup"]);
    assert_eq!(callees(&ex, "dup"), vec![name("second")]);
}

#[test]
fn test_syntax_error_is_reported() {
    let source = "function ok() {}\n\nfunction broken( {\n";
    let result = ParserDispatcher::new().parse_source(source, Path::new("broken.ts"));

    assert!(matches!(result, Err(ParseError::Syntax { .. })));
}

#[test]
fn test_deeply_nested_source_is_walked() {
    let depth = 8_000;
    let source = format!(
        "export const data = {}() => helper(){};\n",
        "[".repeat(depth),
        "]".repeat(depth)
    );
    let ex = parse("data.ts", &source);

    // The innermost arrow is anonymous, so its call lands in module scope
    assert_eq!(names(&ex), vec![MODULE_SCOPE]);
    assert_eq!(callees(&ex, MODULE_SCOPE), vec![name("helper")]);
}

#[test]
fn test_deeply_nested_syntax_error_is_reported() {
    let depth = 3_000;
    let source = format!(
        "export const data = {}\n  );\n{};\n",
        "[".repeat(depth),
        "]".repeat(depth)
    );
    let result = ParserDispatcher::new().parse_source(&source, Path::new("data.ts"));

    assert!(matches!(result, Err(ParseError::Syntax { .. })));
}

#[test]
fn test_unsupported_extension() {
    let result = ParserDispatcher::new().parse_source("def f(): pass", Path::new("tool.py"));
    assert!(matches!(result, Err(ParseError::UnsupportedLanguage(_))));
}

#[test]
fn test_supported_extensions() {
    let dispatcher = ParserDispatcher::new();
    let exts = dispatcher.supported_extensions();
    for ext in [".ts", ".tsx", ".js", ".jsx"] {
        assert!(exts.contains(&ext), "missing {}", ext);
    }
    assert!(dispatcher.find_parser(Path::new("a/b.tsx")).is_some());
    assert!(dispatcher.find_parser(Path::new("Makefile")).is_none());
}
