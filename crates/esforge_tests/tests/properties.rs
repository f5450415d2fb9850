//! Engine-wide properties over the shared corpus.

use std::sync::Arc;

use esforge_compiler::{
    extract_dependencies, transform, transform_many, BundleError, DependenciesRequest, DependencyKind, EngineError,
    MemoryResolver, TransformRequest,
};
use esforge_options::{BundleConfig, EsTarget, ParseOptions, PipelineConfig, PrintOptions, TransformOptions};
use esforge_parser::parse_program;
use esforge_tests::*;
use serde_json::{Map, Value};
use tokio_util::sync::CancellationToken;

// === Round trip ===

#[test]
fn test_parse_print_parse_keeps_the_tree() {
    for case in corpus() {
        let program = parse_case(case);
        for printed in [expanded(&program), minified(&program)] {
            let reparsed = parse_clean(&printed, case.file_name);
            assert_eq!(shape(&program), shape(&reparsed), "{}: tree changed, printed as {:?}", case.name, printed);
        }
    }
}

// === Idempotence ===

#[test]
fn test_printing_is_deterministic() {
    for case in corpus() {
        let program = parse_case(case);
        assert_eq!(expanded(&program), expanded(&program), "{}", case.name);
        assert_eq!(minified(&program), minified(&program), "{}", case.name);
        let copy = program.clone();
        assert_eq!(expanded(&program), expanded(&copy), "{}", case.name);
    }
}

// === Fixed point ===

#[test]
fn test_printed_code_is_a_fixed_point() {
    for case in corpus() {
        let once = expanded(&parse_case(case));
        let twice = expanded(&parse_clean(&once, case.file_name));
        assert_eq!(once, twice, "{}", case.name);

        let once = minified(&parse_case(case));
        let twice = minified(&parse_clean(&once, case.file_name));
        assert_eq!(once, twice, "{}", case.name);
    }
}

#[test]
fn test_transformed_output_reparses() {
    for case in JAVASCRIPT {
        let options = TransformOptions {
            parse: ParseOptions::for_file(case.file_name),
            pipeline: PipelineConfig {
                target: EsTarget::Es2020,
                passes: None,
            },
            print: PrintOptions::default(),
        };
        let response = transform(&TransformRequest::new(case.source, options)).unwrap();
        let reparsed = parse_program(&response.code, &ParseOptions::for_file(case.file_name));
        assert!(!reparsed.has_errors(), "{}: {:?}\n{}", case.name, reparsed.diagnostics, response.code);
    }
}

#[test]
fn test_typescript_erasure_leaves_javascript() {
    for case in TYPESCRIPT {
        let options = TransformOptions {
            parse: ParseOptions::for_file(case.file_name),
            ..Default::default()
        };
        let response = transform(&TransformRequest::new(case.source, options)).unwrap();
        // The output must parse as plain JavaScript.
        let reparsed = parse_program(&response.code, &ParseOptions::for_file("output.js"));
        assert!(!reparsed.has_errors(), "{}: {:?}\n{}", case.name, reparsed.diagnostics, response.code);
    }
}

// === Span nesting ===

type Range = (u64, u64);

/// The range of a serialized node: either `{ data: { kind, range }, .. }`
/// or bare node data `{ kind, range }`.
fn node_range(map: &Map<String, Value>) -> Option<Range> {
    let data = match map.get("data") {
        Some(Value::Object(data)) => data,
        _ => map,
    };
    data.get("kind")?;
    let range = data.get("range")?;
    Some((range.get("pos")?.as_u64()?, range.get("end")?.as_u64()?))
}

/// Push the outermost nodes below `value`, checking each one's subtree.
fn collect_nodes(value: &Value, found: &mut Vec<Range>, case: &str) {
    match value {
        Value::Object(map) => match node_range(map) {
            Some(range) => {
                check_children(map, range, case);
                found.push(range);
            }
            None => map.values().for_each(|v| collect_nodes(v, found, case)),
        },
        Value::Array(items) => items.iter().for_each(|v| collect_nodes(v, found, case)),
        _ => {}
    }
}

fn check_children(map: &Map<String, Value>, (pos, end): Range, case: &str) {
    assert!(pos <= end, "{}: inverted range {}..{}", case, pos, end);
    let mut children = Vec::new();
    for (key, value) in map {
        // Comments are trivia and may sit inside any node.
        if key == "data" || key == "range" || key == "comments" {
            continue;
        }
        collect_nodes(value, &mut children, case);
    }
    children.sort_unstable();
    for &(child_pos, child_end) in &children {
        assert!(
            pos <= child_pos && child_end <= end,
            "{}: child {}..{} escapes parent {}..{}",
            case,
            child_pos,
            child_end,
            pos,
            end
        );
    }
    for pair in children.windows(2) {
        assert!(
            pair[0].1 <= pair[1].0,
            "{}: siblings {:?} and {:?} overlap",
            case,
            pair[0],
            pair[1]
        );
    }
}

#[test]
fn test_child_ranges_nest_inside_parents() {
    for case in corpus() {
        let program = parse_case(case);
        let value = match serde_json::to_value(&program) {
            Ok(value) => value,
            Err(err) => panic!("{}: tree does not serialize: {err}", case.name),
        };
        let mut top = Vec::new();
        collect_nodes(&value, &mut top, case.name);
        assert_eq!(top.len(), 1, "{}: expected the program as the only root", case.name);
        assert!(top[0].1 as usize <= case.source.len(), "{}: program ends past the source", case.name);
    }
}

// === Batch ===

#[test]
fn test_batch_matches_sequential() {
    let requests: Vec<TransformRequest> = corpus()
        .map(|case| {
            TransformRequest::new(
                case.source,
                TransformOptions {
                    parse: ParseOptions::for_file(case.file_name),
                    ..Default::default()
                },
            )
        })
        .collect();
    let batch = transform_many(&requests);
    for (request, result) in requests.iter().zip(batch) {
        let sequential = transform(request).unwrap();
        assert_eq!(result.unwrap(), sequential);
    }
}

// === Error isolation ===

const STATEMENTS: &[&str] = &[
    "const first = 1;",
    "function second() { return first; }",
    "class Third {}",
    "let fourth = second();",
    "export const fifth = [first, fourth];",
];

#[test]
fn test_one_broken_statement_keeps_the_rest() {
    for broken in 0..STATEMENTS.len() {
        let mut lines: Vec<&str> = STATEMENTS.to_vec();
        lines[broken] = "const broken = ;";
        let source = lines.join("\n");
        let parsed = parse_program(&source, &ParseOptions::default());

        let errs = errors(&parsed.diagnostics);
        assert!(!errs.is_empty(), "no error reported with statement {} broken", broken);
        let start: usize = lines[..broken].iter().map(|l| l.len() + 1).sum();
        let end = start + lines[broken].len();
        for err in &errs {
            let at = err.span.map(|s| s.start as usize).unwrap_or(usize::MAX);
            assert!(at >= start && at <= end, "error outside statement {}: {:?}", broken, err);
        }

        let printed = expanded(&parsed.program);
        for (index, statement) in STATEMENTS.iter().enumerate() {
            if index == broken {
                continue;
            }
            let head: String = statement.chars().take_while(|c| *c != '=' && *c != '(' && *c != '{').collect();
            assert!(printed.contains(head.trim()), "statement {} lost with {} broken:\n{}", index, broken, printed);
        }
    }
}

// === Dependency completeness ===

#[test]
fn test_dependency_counts() {
    for (statics, dynamics) in [(0, 0), (1, 0), (0, 3), (4, 2), (7, 5)] {
        let mut source = String::new();
        for i in 0..statics {
            source.push_str(&format!("import {{ s{i} }} from './static{i}';\n"));
        }
        for i in 0..dynamics {
            source.push_str(&format!("const d{i} = import('./dynamic{i}');\n"));
            // A second literal import of the same module is not a new entry.
            source.push_str(&format!("if (again) import('./dynamic{i}');\n"));
        }
        source.push_str("load(import(computed + '.js'));\n");

        let response = extract_dependencies(&DependenciesRequest {
            source,
            options: ParseOptions::default(),
        })
        .unwrap();
        let count = |kind: DependencyKind| response.specifiers.iter().filter(|d| d.kind == kind).count();
        assert_eq!(count(DependencyKind::StaticImport), statics);
        assert_eq!(count(DependencyKind::DynamicImport), dynamics);
        assert_eq!(count(DependencyKind::DynamicUnresolved), 1);
        assert_eq!(response.specifiers.len(), statics + dynamics + 1);
    }
}

// === Cycle safety ===

async fn bundle_cycle(length: usize) -> esforge_compiler::BundleOutput {
    let mut resolver = MemoryResolver::new();
    for i in 0..length {
        let next = (i + 1) % length;
        let source = format!("import {{ v{next} }} from './m{next}.js';\nexport const v{i} = () => v{next};\n");
        resolver = resolver.with_file(&format!("src/m{i}.js"), &source);
    }
    let config = BundleConfig {
        entry: "src/m0.js".to_string(),
        ..Default::default()
    };
    match esforge_compiler::bundle(&config, Arc::new(resolver), CancellationToken::new()).await {
        Ok(output) => output,
        Err(EngineError::Bundle(BundleError::Failed { diagnostics, .. })) => panic!("cycle failed: {:?}", diagnostics),
        Err(err) => panic!("cycle failed: {err}"),
    }
}

#[tokio::test]
async fn test_cycles_terminate_with_each_module_once() {
    for length in [2, 3, 6] {
        let output = bundle_cycle(length).await;
        assert_eq!(output.module_order.len(), length);
        for i in 0..length {
            let id = format!("src/m{i}.js");
            assert_eq!(output.module_order.iter().filter(|m| **m == id).count(), 1);
            let declaration = format!("const v{i} = ");
            assert_eq!(output.code.matches(&declaration).count(), 1, "{}", output.code);
        }
        assert!(output.diagnostics.iter().any(|d| d.code == 5004));
    }
}

#[tokio::test]
async fn test_cycle_bundles_are_deterministic() {
    let first = bundle_cycle(4).await;
    let second = bundle_cycle(4).await;
    assert_eq!(first, second);
}
