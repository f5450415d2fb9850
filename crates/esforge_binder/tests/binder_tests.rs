//! Binder integration tests.
//!
//! Covers hoisting, block scoping, declaration merging, type-position
//! references and the module record.

use esforge_binder::{bind_program, BindOptions, BindResult, BindingKind, ExportTarget, ImportName, ScopeKind};
use esforge_options::ParseOptions;
use esforge_parser::parse_program;

fn bind_with(source: &str, file_name: &str, options: BindOptions) -> BindResult {
    let parsed = parse_program(source, &ParseOptions::for_file(file_name));
    assert!(!parsed.has_errors(), "unexpected parse errors: {:?}", parsed.diagnostics);
    bind_program(&parsed.program, &options)
}

fn bind_js(source: &str) -> BindResult {
    bind_with(source, "input.js", BindOptions::default())
}

fn bind_ts(source: &str) -> BindResult {
    bind_with(source, "input.ts", BindOptions::default())
}

fn codes(result: &BindResult) -> Vec<u32> {
    result.diagnostics.iter().map(|d| d.code).collect()
}

// === Hoisting ===

#[test]
fn test_var_hoists_out_of_blocks() {
    let result = bind_js("{ if (x) { var a = 1; } } a;");
    let root = result.scopes.root();
    let binding = result
        .scopes
        .top_level_bindings()
        .find(|b| b.name == "a")
        .expect("a is declared at the top level");
    assert_eq!(binding.kind, BindingKind::Var);
    assert_eq!(binding.value_references, 1);
    assert_eq!(root.kind, ScopeKind::Module);
}

#[test]
fn test_var_does_not_leave_function() {
    let result = bind_js("function f() { var inner = 1; } inner;");
    assert!(result.scopes.top_level_bindings().all(|b| b.name != "inner"));
    let unresolved: Vec<_> = result.scopes.unresolved_references().map(|r| r.name.as_str()).collect();
    assert_eq!(unresolved, vec!["inner"]);
}

#[test]
fn test_reference_before_declaration_resolves() {
    let result = bind_js("use(); function use() {}");
    assert_eq!(result.scopes.unresolved_references().count(), 0);
}

// === Block scoping ===

#[test]
fn test_let_is_block_scoped() {
    let result = bind_js("{ let a = 1; } a;");
    assert!(result.scopes.top_level_bindings().all(|b| b.name != "a"));
    assert_eq!(result.scopes.unresolved_references().count(), 1);
}

#[test]
fn test_shadowing_resolves_to_innermost() {
    let result = bind_js("let x = 1; { let x = 2; x; } x;");
    let resolved: Vec<_> = result
        .scopes
        .references()
        .iter()
        .filter_map(|r| r.resolution.binding())
        .map(|b| result.scopes.binding(b).scope)
        .collect();
    assert_eq!(resolved.len(), 2);
    assert_ne!(resolved[0], resolved[1]);
}

#[test]
fn test_for_let_gets_own_scope() {
    let result = bind_js("for (let i = 0; i < 3; i++) {}");
    assert!(result.scopes.scopes().iter().any(|s| s.kind == ScopeKind::For));
    assert_eq!(result.scopes.unresolved_references().count(), 0);
}

#[test]
fn test_catch_parameter() {
    let result = bind_js("try {} catch (e) { e; }");
    let e = result.scopes.bindings().iter().find(|b| b.name == "e").expect("catch binding");
    assert_eq!(e.kind, BindingKind::CatchParameter);
    assert_eq!(result.scopes.scope(e.scope).kind, ScopeKind::Catch);
}

#[test]
fn test_named_function_expression_binds_inside() {
    let result = bind_js("const g = function f() { return f; }; f;");
    let unresolved: Vec<_> = result.scopes.unresolved_references().map(|r| r.name.as_str()).collect();
    assert_eq!(unresolved, vec!["f"]);
}

#[test]
fn test_parameters_and_defaults() {
    let result = bind_js("function f(a, { b, c = a } = {}) { return a + b + c; }");
    assert_eq!(result.scopes.unresolved_references().count(), 0);
    let params = result
        .scopes
        .bindings()
        .iter()
        .filter(|b| b.kind == BindingKind::Parameter)
        .count();
    assert_eq!(params, 3);
}

// === Redeclaration ===

#[test]
fn test_var_redeclaration_is_allowed() {
    let result = bind_js("var a; var a;");
    assert!(result.diagnostics.is_empty());
    assert_eq!(result.scopes.top_level_bindings().count(), 1);
}

#[test]
fn test_let_redeclaration_is_an_error() {
    let result = bind_js("let a; var a;");
    assert_eq!(codes(&result), vec![2451]);
}

#[test]
fn test_import_conflict() {
    let result = bind_js("import a from 'a'; function a() {}");
    assert_eq!(codes(&result), vec![2440]);
}

#[test]
fn test_duplicate_parameter() {
    let result = bind_js("function f(a, a) {}");
    assert_eq!(codes(&result), vec![2300]);
}

#[test]
fn test_function_and_namespace_merge() {
    let result = bind_ts("function f() {} namespace f { export const x = 1; }");
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
}

#[test]
fn test_interface_merges_with_class() {
    let result = bind_ts("interface A { x: number } class A {}");
    assert!(result.diagnostics.is_empty());
    let a = result.scopes.top_level_bindings().find(|b| b.name == "A").expect("A");
    assert_eq!(a.kind, BindingKind::Class);
    assert!(a.has_type_meaning);
}

// === Type positions ===

#[test]
fn test_type_references_do_not_count_as_values() {
    let result = bind_ts("import { T, v } from 'm'; let x: T = v;");
    let t = result.scopes.top_level_bindings().find(|b| b.name == "T").expect("T");
    let v = result.scopes.top_level_bindings().find(|b| b.name == "v").expect("v");
    assert_eq!(t.value_references, 0);
    assert_eq!(t.type_references, 1);
    assert!(v.is_referenced_as_value());
}

#[test]
fn test_value_lookup_skips_types() {
    let result = bind_ts("type a = number; a;");
    let unresolved: Vec<_> = result.scopes.unresolved_references().map(|r| r.name.as_str()).collect();
    assert_eq!(unresolved, vec!["a"]);
}

#[test]
fn test_implements_is_type_position() {
    let result = bind_ts("import { I } from 'i'; class C implements I {}");
    let i = result.scopes.top_level_bindings().find(|b| b.name == "I").expect("I");
    assert_eq!(i.value_references, 0);
    assert_eq!(i.type_references, 1);
}

#[test]
fn test_generic_parameters_resolve() {
    let result = bind_ts("function id<T>(x: T): T { return x; }");
    assert!(result.scopes.unresolved_references().next().is_none());
}

// === Module record ===

#[test]
fn test_module_record_imports() {
    let result = bind_js("import d, { a as b, default as c } from './m'; import * as ns from 'ns';");
    let record = result.scopes.module_record();
    assert_eq!(record.imports.len(), 4);
    assert_eq!(record.import("d").map(|i| &i.imported), Some(&ImportName::Default));
    assert_eq!(
        record.import("b").map(|i| &i.imported),
        Some(&ImportName::Named("a".to_string()))
    );
    assert_eq!(record.import("c").map(|i| &i.imported), Some(&ImportName::Default));
    assert_eq!(record.import("ns").map(|i| &i.imported), Some(&ImportName::Namespace));
    assert!(record.import("d").and_then(|i| i.binding).is_some());
}

#[test]
fn test_module_record_exports() {
    let result = bind_js(
        "export const a = 1; export function f() {} export default class {} \
         const b = 2; export { b as c }; export { x } from './x'; export * from './y'; \
         export * as z from './z';",
    );
    let record = result.scopes.module_record();
    let names: Vec<_> = record.exports.iter().map(|e| e.exported.as_str()).collect();
    assert_eq!(names, vec!["a", "f", "default", "c", "x", "z"]);
    assert_eq!(record.export("default").map(|e| &e.target), Some(&ExportTarget::Expression));
    assert_eq!(
        record.export("c").map(|e| &e.target),
        Some(&ExportTarget::Local { name: "b".to_string() })
    );
    assert_eq!(record.star_exports, vec!["./y".to_string()]);
    let b = result.scopes.top_level_bindings().find(|b| b.name == "b").expect("b");
    assert!(b.is_exported);
}

#[test]
fn test_type_exports_are_type_only() {
    let result = bind_ts("export interface I {} export type T = I; export const v = 1;");
    let values: Vec<_> = result
        .scopes
        .module_record()
        .value_exports()
        .map(|e| e.exported.as_str())
        .collect();
    assert_eq!(values, vec!["v"]);
}

#[test]
fn test_duplicate_export() {
    let result = bind_js("const a = 1; export { a }; export { a };");
    assert_eq!(codes(&result), vec![2308]);
}

#[test]
fn test_export_equals() {
    let result = bind_ts("const a = 1; export = a;");
    assert!(result.scopes.module_record().has_export_equals);
}

// === Unresolved names ===

#[test]
fn test_unresolved_warnings_are_opt_in() {
    let source = "console.log(missing);";
    assert!(bind_js(source).diagnostics.is_empty());

    let result = bind_with(source, "input.js", BindOptions { report_unresolved: true });
    assert_eq!(codes(&result), vec![2304]);
    assert!(!result.diagnostics[0].is_error());
}
