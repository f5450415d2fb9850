//! Dependency extraction over parsed snippets.

use esforge_module::{extract_dependencies, Dependency, DependencyKind};
use esforge_options::ParseOptions;
use esforge_parser::parse_program;

fn deps(source: &str, file_name: &str) -> Vec<Dependency> {
    let parsed = parse_program(source, &ParseOptions::for_file(file_name));
    assert!(!parsed.has_errors(), "{:?}", parsed.diagnostics);
    extract_dependencies(&parsed.program)
}

fn summary(source: &str) -> Vec<(String, DependencyKind)> {
    deps(source, "input.js").into_iter().map(|d| (d.text, d.kind)).collect()
}

// === Static forms ===

#[test]
fn test_single_static_import() {
    let source = r#"import {a} from "./x"; const b = 1;"#;
    let found = deps(source, "input.js");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].text, "./x");
    assert_eq!(found[0].kind, DependencyKind::StaticImport);
    // The span covers the literal including its quotes.
    let start = source.find("\"./x\"").unwrap() as u32;
    assert_eq!(found[0].span.start, start);
    assert_eq!(found[0].span.length, 5);
}

#[test]
fn test_source_order_and_kinds() {
    let found = summary(
        r#"
        import "./side-effect";
        import def, * as ns from "./a";
        export { x } from "./b";
        export * from "./c";
        const lazy = () => import("./d");
        const fs = require("fs");
        "#,
    );
    assert_eq!(
        found,
        vec![
            ("./side-effect".to_string(), DependencyKind::StaticImport),
            ("./a".to_string(), DependencyKind::StaticImport),
            ("./b".to_string(), DependencyKind::ReExport),
            ("./c".to_string(), DependencyKind::ReExport),
            ("./d".to_string(), DependencyKind::DynamicImport),
            ("fs".to_string(), DependencyKind::BareReference),
        ]
    );
}

#[test]
fn test_local_exports_are_not_dependencies() {
    assert!(summary("const x = 1; export { x }; export default x;").is_empty());
}

// === Dynamic imports ===

#[test]
fn test_duplicate_literal_dynamic_imports_reported_once() {
    let found = summary(r#"import("./a"); if (c) { import("./a"); } import(`./b`);"#);
    assert_eq!(
        found,
        vec![
            ("./a".to_string(), DependencyKind::DynamicImport),
            ("./b".to_string(), DependencyKind::DynamicImport),
        ]
    );
}

#[test]
fn test_non_literal_dynamic_import_is_unresolved() {
    let found = deps("import('./pages/' + name); import(`./x/${y}`);", "input.js");
    assert_eq!(found.len(), 2);
    assert!(found.iter().all(|d| d.kind == DependencyKind::DynamicUnresolved && d.text.is_empty()));
}

#[test]
fn test_dynamic_import_inside_computed_specifier() {
    let found = summary("import(await import('./names'));");
    assert_eq!(
        found,
        vec![
            (String::new(), DependencyKind::DynamicUnresolved),
            ("./names".to_string(), DependencyKind::DynamicImport),
        ]
    );
}

#[test]
fn test_n_static_plus_m_distinct_dynamic() {
    let source = "import a from './a'; import b from './b'; import('./c'); import('./d'); import('./c');";
    let found = deps(source, "input.js");
    assert_eq!(found.len(), 2 + 2);
    assert_eq!(found.iter().filter(|d| d.kind == DependencyKind::StaticImport).count(), 2);
    assert_eq!(found.iter().filter(|d| d.kind == DependencyKind::DynamicImport).count(), 2);
}

// === TypeScript details ===

#[test]
fn test_type_only_flags() {
    let found = deps(
        "import type { T } from './t'; import { type U } from './u'; import { type V, w } from './v'; export type { X } from './x';",
        "input.ts",
    );
    let flags: Vec<(&str, bool)> = found.iter().map(|d| (d.text.as_str(), d.is_type_only)).collect();
    assert_eq!(flags, vec![("./t", true), ("./u", true), ("./v", false), ("./x", true)]);
}

#[test]
fn test_import_equals_require_is_bare_reference() {
    let found = deps("import fs = require('fs');", "input.ts");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].kind, DependencyKind::BareReference);
    assert_eq!(found[0].text, "fs");
}

#[test]
fn test_import_attributes() {
    let found = deps(r#"import data from "./data.json" with { type: "json" };"#, "input.js");
    assert_eq!(found[0].attributes.get("type").map(String::as_str), Some("json"));
}

#[test]
fn test_serialized_shape() {
    let found = deps("import('./a');", "input.js");
    let json = serde_json::to_value(&found[0]).unwrap();
    assert_eq!(json["kind"], "dynamic-import");
    assert_eq!(json["isTypeOnly"], false);
    assert!(json.get("attributes").is_none());
}
