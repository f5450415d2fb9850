//! End-to-end bundling over in-memory module graphs.

use std::sync::Arc;
use std::time::Duration;

use esforge_bundler::{bundle, BundleError, BundleOutput};
use esforge_diagnostics::Diagnostic;
use esforge_module::MemoryResolver;
use esforge_options::{BundleConfig, ParseOptions, PipelineConfig};
use esforge_parser::parse_program;
use tokio_util::sync::CancellationToken;

/// Bundle config with an empty pipeline so the output is easy to predict.
fn config(entry: &str) -> BundleConfig {
    BundleConfig {
        entry: entry.to_string(),
        pipeline: PipelineConfig {
            passes: Some(Vec::new()),
            ..Default::default()
        },
        ..Default::default()
    }
}

async fn run_with(config: &BundleConfig, resolver: &MemoryResolver) -> Result<BundleOutput, BundleError> {
    bundle(config, Arc::new(resolver.clone()), CancellationToken::new()).await
}

async fn run(entry: &str, resolver: &MemoryResolver) -> BundleOutput {
    match run_with(&config(entry), resolver).await {
        Ok(output) => output,
        Err(err) => panic!("bundle failed: {:?}", err),
    }
}

async fn failure(entry: &str, resolver: &MemoryResolver) -> (Vec<Diagnostic>, Vec<String>) {
    failure_with(&config(entry), resolver).await
}

async fn failure_with(config: &BundleConfig, resolver: &MemoryResolver) -> (Vec<Diagnostic>, Vec<String>) {
    match run_with(config, resolver).await {
        Err(BundleError::Failed {
            diagnostics,
            module_order,
        }) => (diagnostics, module_order),
        other => panic!("expected a failed bundle, got {:?}", other),
    }
}

fn codes(diagnostics: &[Diagnostic]) -> Vec<u32> {
    diagnostics.iter().map(|d| d.code).collect()
}

fn order(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|s| s.to_string()).collect()
}

fn assert_reparses(code: &str) {
    let parsed = parse_program(code, &ParseOptions::for_file("bundle.js"));
    assert!(!parsed.has_errors(), "bundle does not reparse: {:?}\n{}", parsed.diagnostics, code);
}

// === Graph order ===

#[tokio::test]
async fn test_dependency_is_emitted_before_importer() {
    let resolver = MemoryResolver::new()
        .with_file("src/main.js", "import { add } from './math.js';\nconsole.log(add(1, 2));")
        .with_file("src/math.js", "export function add(a, b) { return a + b; }");
    let output = run("src/main.js", &resolver).await;
    assert_eq!(output.module_order, order(&["src/math.js", "src/main.js"]));
    let add = output.code.find("function add(a, b)").unwrap();
    let call = output.code.find("console.log(add(1, 2));").unwrap();
    assert!(add < call, "{}", output.code);
    assert!(!output.code.contains("import"), "{}", output.code);
    assert_reparses(&output.code);
}

#[tokio::test]
async fn test_diamond_loads_shared_module_once() {
    let resolver = MemoryResolver::new()
        .with_file("src/main.js", "import './left.js';\nimport './right.js';")
        .with_file("src/left.js", "import { shared } from './shared.js';\nexport const left = shared + 1;")
        .with_file("src/right.js", "import { shared } from './shared.js';\nexport const right = shared + 2;")
        .with_file("src/shared.js", "export const shared = 0;");
    let output = run("src/main.js", &resolver).await;
    assert_eq!(
        output.module_order,
        order(&["src/shared.js", "src/left.js", "src/right.js", "src/main.js"])
    );
    let loads = resolver.loads();
    assert_eq!(loads.iter().filter(|id| *id == "src/shared.js").count(), 1);
    assert_eq!(loads.len(), 4);
}

#[tokio::test]
async fn test_cycle_terminates_with_message() {
    let resolver = MemoryResolver::new()
        .with_file(
            "src/a.js",
            "import { b } from './b.js';\nexport const a = 1;\nexport function useB() { return b; }",
        )
        .with_file(
            "src/b.js",
            "import { a } from './a.js';\nexport const b = 2;\nexport function useA() { return a; }",
        );
    let output = run("src/a.js", &resolver).await;
    assert_eq!(output.module_order, order(&["src/b.js", "src/a.js"]));
    assert!(codes(&output.diagnostics).contains(&5004), "{:?}", output.diagnostics);
    assert!(output.diagnostics.iter().all(|d| !d.is_error()));
    assert_reparses(&output.code);
}

#[tokio::test]
async fn test_output_does_not_depend_on_load_latency() {
    let files = |resolver: MemoryResolver| {
        resolver
            .with_file("src/main.js", "import { a } from './a.js';\nimport { b } from './b.js';\nconsole.log(a, b);")
            .with_file("src/a.js", "import { c } from './c.js';\nexport const a = c;")
            .with_file("src/b.js", "import { c } from './c.js';\nexport const b = c;")
            .with_file("src/c.js", "export const c = 3;")
    };
    let slow_a = files(MemoryResolver::new()).with_latency("src/a.js", Duration::from_millis(30));
    let slow_b = files(MemoryResolver::new())
        .with_latency("src/b.js", Duration::from_millis(30))
        .with_latency("src/c.js", Duration::from_millis(10));
    let first = run("src/main.js", &slow_a).await;
    let second = run("src/main.js", &slow_b).await;
    assert_eq!(first.code, second.code);
    assert_eq!(first.module_order, second.module_order);
}

// === Failures ===

#[tokio::test]
async fn test_failures_across_the_graph_are_all_reported() {
    let resolver = MemoryResolver::new()
        .with_file(
            "src/main.js",
            "import './missing.js';\nimport './broken.js';\nimport './offline.js';",
        )
        .with_file("src/broken.js", "import './deep.js';\nconst = ;")
        .with_file("src/deep.js", "export const deep = 1;")
        .with_file("src/offline.js", "export {};")
        .with_failure("src/offline.js", "connection reset");
    let (diagnostics, _) = failure("src/main.js", &resolver).await;
    let codes = codes(&diagnostics);
    assert!(codes.contains(&2307), "{:?}", diagnostics);
    assert!(codes.contains(&5003), "{:?}", diagnostics);
    assert!(codes.contains(&5001), "{:?}", diagnostics);
    let missing = diagnostics.iter().find(|d| d.code == 2307).unwrap();
    assert_eq!(missing.file.as_deref(), Some("src/main.js"));
    assert!(missing.span.is_some());
    // A module with syntax errors still has its imports followed.
    assert!(resolver.loads().contains(&"src/deep.js".to_string()));
}

#[tokio::test]
async fn test_missing_export_fails_link() {
    let resolver = MemoryResolver::new()
        .with_file("src/main.js", "import { nope } from './a.js';\nnope();")
        .with_file("src/a.js", "export const yes = 1;");
    let (diagnostics, module_order) = failure("src/main.js", &resolver).await;
    assert_eq!(codes(&diagnostics), vec![2305]);
    assert_eq!(module_order, order(&["src/a.js", "src/main.js"]));
}

#[tokio::test]
async fn test_unknown_entry() {
    let resolver = MemoryResolver::new().with_file("src/main.js", "");
    let (diagnostics, module_order) = failure("./nowhere.js", &resolver).await;
    assert_eq!(codes(&diagnostics), vec![5001]);
    assert!(module_order.is_empty());
}

#[tokio::test]
async fn test_module_limit() {
    let resolver = MemoryResolver::new()
        .with_file("src/main.js", "import './a.js';")
        .with_file("src/a.js", "import './b.js';")
        .with_file("src/b.js", "");
    let mut limited = config("src/main.js");
    limited.max_modules = 2;
    let (diagnostics, _) = failure_with(&limited, &resolver).await;
    assert_eq!(codes(&diagnostics), vec![5002]);
    assert!(!resolver.loads().contains(&"src/b.js".to_string()));
}

#[tokio::test]
async fn test_unknown_pass_is_a_pipeline_error() {
    let resolver = MemoryResolver::new().with_file("src/main.js", "");
    let mut bad = config("src/main.js");
    bad.pipeline.passes = Some(vec![esforge_options::PassConfig::new("nope")]);
    assert!(matches!(run_with(&bad, &resolver).await, Err(BundleError::Pipeline(_))));
}

// === Cancellation ===

#[tokio::test]
async fn test_cancelled_before_start() {
    let resolver = MemoryResolver::new().with_file("src/main.js", "");
    let token = CancellationToken::new();
    token.cancel();
    let result = bundle(&config("src/main.js"), Arc::new(resolver), token).await;
    assert_eq!(result, Err(BundleError::Cancelled));
}

#[tokio::test]
async fn test_cancel_drops_slow_fetches() {
    let resolver = MemoryResolver::new()
        .with_file("src/main.js", "import './slow.js';")
        .with_file("src/slow.js", "")
        .with_latency("src/slow.js", Duration::from_secs(30));
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        trigger.cancel();
    });
    let started = std::time::Instant::now();
    let result = bundle(&config("src/main.js"), Arc::new(resolver), token).await;
    assert_eq!(result, Err(BundleError::Cancelled));
    assert!(started.elapsed() < Duration::from_secs(10));
}

// === Linking ===

#[tokio::test]
async fn test_externals_are_hoisted_once() {
    let resolver = MemoryResolver::new()
        .with_file(
            "src/main.js",
            "import React, { useState } from 'react';\nimport './b.js';\nconsole.log(React, useState);",
        )
        .with_file(
            "src/b.js",
            "import { useState } from 'react';\nimport * as path from 'node:path';\nuseState(path.sep);",
        );
    let output = run("src/main.js", &resolver).await;
    let code = &output.code;
    assert_eq!(code.matches("\"react\"").count(), 1, "{}", code);
    assert_eq!(code.matches("useState").count(), 3, "{}", code);
    assert!(code.contains("* as path from \"node:path\""), "{}", code);
    assert!(code.starts_with("import"), "{}", code);
    assert_reparses(code);
}

#[tokio::test]
async fn test_namespace_import_becomes_frozen_object() {
    let resolver = MemoryResolver::new()
        .with_file("src/main.js", "import * as utils from './utils.js';\nconsole.log(utils.a);")
        .with_file("src/utils.js", "export const a = 1;\nexport function b() {}");
    let output = run("src/main.js", &resolver).await;
    let code = &output.code;
    assert!(code.contains("var utils_exports = Object.freeze("), "{}", code);
    assert!(code.contains("__proto__: null"), "{}", code);
    assert!(code.contains("get a()"), "{}", code);
    assert!(code.contains("get b()"), "{}", code);
    assert!(code.contains("console.log(utils_exports.a);"), "{}", code);
    assert_reparses(code);
}

#[tokio::test]
async fn test_default_expression_gets_a_name() {
    let resolver = MemoryResolver::new()
        .with_file("src/main.js", "import answer from './answer.js';\nconsole.log(answer);")
        .with_file("src/answer.js", "export default 40 + 2;");
    let output = run("src/main.js", &resolver).await;
    assert!(output.code.contains("const answer_default = 40 + 2;"), "{}", output.code);
    assert!(output.code.contains("console.log(answer_default);"), "{}", output.code);
}

#[tokio::test]
async fn test_entry_exports_are_reexported() {
    let resolver = MemoryResolver::new()
        .with_file(
            "src/main.js",
            "export { helper as run } from './lib.js';\nexport const version = 1;\nexport default function () { return 2; }\nexport * from 'polyfill';",
        )
        .with_file("src/lib.js", "export function helper() {}");
    let output = run("src/main.js", &resolver).await;
    let code = &output.code;
    assert!(code.contains("function main_default()"), "{}", code);
    assert!(code.contains("helper as run"), "{}", code);
    assert!(code.contains("main_default as default"), "{}", code);
    assert!(code.contains("export * from \"polyfill\""), "{}", code);
    assert!(!code.contains("export const"), "{}", code);
    assert_reparses(code);
}

#[tokio::test]
async fn test_colliding_top_level_names_are_renamed() {
    let resolver = MemoryResolver::new()
        .with_file("src/main.js", "import { getA } from './a.js';\nimport { getB, obj } from './b.js';\ngetA(getB(), obj);")
        .with_file("src/a.js", "const count = 1;\nexport function getA() { return count; }")
        .with_file(
            "src/b.js",
            "const count = 2;\nexport const obj = { count };\nexport function getB() { return count; }",
        );
    let output = run("src/main.js", &resolver).await;
    let code = &output.code;
    assert!(code.contains("const count = 1;"), "{}", code);
    assert!(code.contains("const count$b = 2;"), "{}", code);
    assert!(code.contains("return count$b;"), "{}", code);
    assert!(code.contains("count: count$b"), "{}", code);
    assert_reparses(code);
}

#[tokio::test]
async fn test_nested_binding_shadowing_an_import_is_renamed() {
    let resolver = MemoryResolver::new()
        .with_file(
            "src/main.js",
            "import { count as total } from './a.js';\nexport function f(count) { return count + total; }",
        )
        .with_file("src/a.js", "export const count = 1;");
    let output = run("src/main.js", &resolver).await;
    let code = &output.code;
    assert!(code.contains("function f(count$main)"), "{}", code);
    assert!(code.contains("return count$main + count;"), "{}", code);
}

#[tokio::test]
async fn test_literal_dynamic_import_resolves_to_namespace() {
    let resolver = MemoryResolver::new()
        .with_file("src/main.js", "export const load = () => import('./lazy.js');\nexport const other = (n) => import(n);")
        .with_file("src/lazy.js", "export const x = 1;");
    let output = run("src/main.js", &resolver).await;
    let code = &output.code;
    assert_eq!(output.module_order, order(&["src/lazy.js", "src/main.js"]));
    assert!(code.contains("Promise.resolve().then(function"), "{}", code);
    assert!(code.contains("return lazy_exports;"), "{}", code);
    assert!(code.contains("import(n)"), "{}", code);
    assert_reparses(code);
}

#[tokio::test]
async fn test_typescript_modules_use_the_default_pipeline() {
    let resolver = MemoryResolver::new()
        .with_file(
            "src/main.ts",
            "import type { T } from './types.ts';\nimport { f } from './f.ts';\nconst x: T = f();\nconsole.log(x);",
        )
        .with_file("src/types.ts", "export type T = number;")
        .with_file("src/f.ts", "export function f(): number { return 1; }");
    let mut ts = config("src/main.ts");
    ts.pipeline.passes = None;
    let output = run_with(&ts, &resolver).await.unwrap();
    assert_eq!(output.module_order, order(&["src/f.ts", "src/main.ts"]));
    assert!(!output.code.contains(": number"), "{}", output.code);
    assert!(!resolver.loads().contains(&"src/types.ts".to_string()));
}

#[tokio::test]
async fn test_output_serializes_camel_case() {
    let resolver = MemoryResolver::new().with_file("src/main.js", "export const a = 1;");
    let output = run("src/main.js", &resolver).await;
    let json = serde_json::to_value(&output).unwrap();
    assert_eq!(json["moduleOrder"][0], "src/main.js");
    assert!(json["code"].as_str().unwrap().contains("export"));
}
