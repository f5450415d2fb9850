//! Operation-level tests: request in, response or fatal error out.

use std::sync::Arc;

use esforge_compiler::*;
use esforge_options::{BundleConfig, EsTarget, ParseOptions, PassConfig, PipelineConfig, PrintOptions, TransformOptions};
use tokio_util::sync::CancellationToken;

fn minified() -> PrintOptions {
    PrintOptions {
        minify: true,
        trailing_newline: false,
        ..Default::default()
    }
}

/// Transform with an explicit pass list and minified output.
fn transform_with(source: &str, file_name: &str, passes: &[&str]) -> TransformResponse {
    let options = TransformOptions {
        parse: ParseOptions::for_file(file_name),
        pipeline: PipelineConfig {
            target: EsTarget::EsNext,
            passes: Some(passes.iter().map(|name| PassConfig::new(name)).collect()),
        },
        print: minified(),
    };
    transform(&TransformRequest::new(source, options)).unwrap()
}

fn codes(diagnostics: &[esforge_diagnostics::Diagnostic]) -> Vec<u32> {
    diagnostics.iter().map(|d| d.code).collect()
}

// ============================================================================
// Parse
// ============================================================================

#[test]
fn test_parse_returns_program_and_diagnostics() {
    let response = parse(&ParseRequest::new("let a = 'unterminated;\nlet b = 2;", ParseOptions::default())).unwrap();
    assert!(!response.diagnostics.is_empty());
    assert!(!response.program.statements.is_empty());
}

#[test]
fn test_parse_response_serializes_camel_case() {
    let response = parse(&ParseRequest::new("x;", ParseOptions::default())).unwrap();
    let json = serde_json::to_value(&response).unwrap();
    assert!(json["program"]["sourceType"].is_string());
    assert!(json["diagnostics"].as_array().unwrap().is_empty());
}

#[test]
fn test_parse_request_from_partial_json() {
    let request: ParseRequest = serde_json::from_str(r#"{"source":"let x: number = 1;","options":{"syntax":"typescript"}}"#).unwrap();
    let response = parse(&request).unwrap();
    assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
}

// ============================================================================
// Print
// ============================================================================

#[test]
fn test_print_parsed_tree() {
    let parsed = parse(&ParseRequest::new("let  x =  1 ;", ParseOptions::default())).unwrap();
    let response = print(&PrintRequest {
        program: parsed.program,
        options: minified(),
        source: None,
    })
    .unwrap();
    assert_eq!(response.code, "let x=1;");
    assert!(response.source_map.is_none());
}

#[test]
fn test_print_source_map_needs_source() {
    let source = "let x = 1;";
    let parsed = parse(&ParseRequest::new(source, ParseOptions::default())).unwrap();
    let options = PrintOptions {
        source_map: true,
        ..Default::default()
    };
    let err = print(&PrintRequest {
        program: parsed.program.clone(),
        options: options.clone(),
        source: None,
    })
    .unwrap_err();
    assert!(matches!(err, EngineError::InvalidRequest(_)));

    let response = print(&PrintRequest {
        program: parsed.program,
        options,
        source: Some(source.to_string()),
    })
    .unwrap();
    let map = response.source_map.unwrap();
    assert!(map.contains("\"version\":3"), "{}", map);
    assert!(map.contains("input.js"), "{}", map);
}

#[test]
fn test_print_rejects_tree_longer_than_source() {
    let parsed = parse(&ParseRequest::new("let longer = 1;", ParseOptions::default())).unwrap();
    let err = print(&PrintRequest {
        program: parsed.program,
        options: PrintOptions::default(),
        source: Some("x".to_string()),
    })
    .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAst(_)));
}

#[test]
fn test_program_from_json() {
    let parsed = parse(&ParseRequest::new("f(1);", ParseOptions::default())).unwrap();
    let json = serde_json::to_string(&parsed.program).unwrap();
    assert_eq!(program_from_json(&json).unwrap(), parsed.program);
    assert!(matches!(program_from_json("{\"data\":1}"), Err(EngineError::InvalidAst(_))));
}

// ============================================================================
// Transform
// ============================================================================

#[test]
fn test_transform_explicit_passes() {
    let response = transform_with("x = a ?? b;", "input.js", &["es2020"]);
    assert_eq!(response.code, "x=a===null||a===void 0?b:a;");
    assert!(response.diagnostics.is_empty());
}

#[test]
fn test_transform_default_pipeline_strips_types() {
    let options = TransformOptions {
        parse: ParseOptions::for_file("a.ts"),
        print: minified(),
        ..Default::default()
    };
    let response = transform(&TransformRequest::new("let x: number = 1;", options)).unwrap();
    assert_eq!(response.code, "let x=1;");
}

#[test]
fn test_transform_unknown_pass_is_fatal() {
    let options = TransformOptions {
        pipeline: PipelineConfig {
            target: EsTarget::EsNext,
            passes: Some(vec![PassConfig::new("minify-everything")]),
        },
        ..Default::default()
    };
    let err = transform(&TransformRequest::new("x;", options)).unwrap_err();
    assert!(matches!(err, EngineError::Pipeline(PipelineError::UnknownPass(ref name)) if name == "minify-everything"));
}

#[test]
fn test_transform_keeps_syntax_diagnostics() {
    let response = transform_with("x = ;\ny = 1 + 2;", "input.js", &["simplify"]);
    assert!(response.diagnostics.iter().any(|d| d.is_error()));
    assert!(response.code.contains("y=3;"), "{}", response.code);
}

#[test]
fn test_transform_with_source_map() {
    let options = TransformOptions {
        print: PrintOptions {
            source_map: true,
            source_file_name: Some("src/app.js".to_string()),
            ..Default::default()
        },
        ..Default::default()
    };
    let response = transform(&TransformRequest::new("let a = 1;\nlet b = a;", options)).unwrap();
    assert!(response.source_map.unwrap().contains("src/app.js"));
}

#[test]
fn test_transform_to_ast_then_print() {
    let request = TransformRequest::new(
        "x = 2 ** 3;",
        TransformOptions {
            pipeline: PipelineConfig {
                target: EsTarget::EsNext,
                passes: Some(vec![PassConfig::new("es2016")]),
            },
            ..Default::default()
        },
    );
    let transformed = transform_to_ast(&request).unwrap();
    let printed = print(&PrintRequest {
        program: transformed.program,
        options: minified(),
        source: None,
    })
    .unwrap();
    assert_eq!(printed.code, "x=Math.pow(2,3);");
}

// ============================================================================
// Batch transform
// ============================================================================

#[test]
fn test_transform_many_keeps_request_order() {
    let mut requests: Vec<TransformRequest> = (0..32)
        .map(|i| {
            TransformRequest::new(
                format!("value{i} = {i} + 1;"),
                TransformOptions {
                    print: minified(),
                    ..Default::default()
                },
            )
        })
        .collect();
    requests.push(TransformRequest::new(
        "x;",
        TransformOptions {
            pipeline: PipelineConfig {
                target: EsTarget::EsNext,
                passes: Some(vec![PassConfig::new("nope")]),
            },
            ..Default::default()
        },
    ));

    let results = transform_many(&requests);
    assert_eq!(results.len(), 33);
    for (i, result) in results.iter().take(32).enumerate() {
        let code = &result.as_ref().unwrap().code;
        assert!(code.starts_with(&format!("value{i}=")), "{}", code);
    }
    assert!(matches!(results[32], Err(EngineError::Pipeline(_))));
}

// ============================================================================
// Dependencies
// ============================================================================

#[test]
fn test_extract_dependencies() {
    let request = DependenciesRequest {
        source: "import {a} from \"./x\"; const b = 1; export * from './y'; import(name);".to_string(),
        options: ParseOptions::default(),
    };
    let response = extract_dependencies(&request).unwrap();
    let kinds: Vec<(&str, DependencyKind)> = response
        .specifiers
        .iter()
        .map(|d| (d.text.as_str(), d.kind))
        .collect();
    assert_eq!(
        kinds,
        vec![
            ("./x", DependencyKind::StaticImport),
            ("./y", DependencyKind::ReExport),
            ("", DependencyKind::DynamicUnresolved),
        ]
    );
    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["specifiers"][0]["kind"], "static-import");
}

// ============================================================================
// Fatal input
// ============================================================================

#[test]
fn test_invalid_encoding() {
    assert!(matches!(source_from_bytes(b"let a = \"\xc3\x28\";"), Err(EngineError::InvalidEncoding)));
}

#[test]
fn test_read_source_missing_file_is_io() {
    let dir = tempfile::tempdir().unwrap();
    let err = read_source(&dir.path().join("missing.js")).unwrap_err();
    assert!(matches!(err, EngineError::Io(_)));
    assert_eq!(err.kind(), "io");
}

// ============================================================================
// Bundle
// ============================================================================

#[tokio::test]
async fn test_bundle_through_compiler() {
    let resolver = MemoryResolver::new()
        .with_file("src/main.js", "import { b } from './b.js'; console.log(b);")
        .with_file("src/b.js", "export const b = 1;");
    let config = BundleConfig {
        entry: "src/main.js".to_string(),
        ..Default::default()
    };
    let output = bundle(&config, Arc::new(resolver), CancellationToken::new()).await.unwrap();
    assert_eq!(output.module_order, vec!["src/b.js".to_string(), "src/main.js".to_string()]);
    assert!(output.code.contains("console.log(b)"), "{}", output.code);
}

#[tokio::test]
async fn test_bundle_rejects_empty_entry() {
    let err = bundle(&BundleConfig::default(), Arc::new(MemoryResolver::new()), CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidRequest(_)));
}

#[tokio::test]
async fn test_bundle_failure_carries_diagnostics() {
    let resolver = MemoryResolver::new().with_file("src/main.js", "import './missing.js';");
    let config = BundleConfig {
        entry: "src/main.js".to_string(),
        ..Default::default()
    };
    let err = bundle(&config, Arc::new(resolver), CancellationToken::new()).await.unwrap_err();
    match err {
        EngineError::Bundle(BundleError::Failed { diagnostics, .. }) => {
            assert_eq!(codes(&diagnostics), vec![2307]);
        }
        other => panic!("expected a failed bundle, got {other:?}"),
    }
}
