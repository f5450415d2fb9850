//! End-to-end scenarios through the public operations.

use std::sync::Arc;

use esforge_compiler::{
    bundle, extract_dependencies, parse, transform, DependenciesRequest, DependencyKind, MemoryResolver, ParseRequest,
    TransformRequest,
};
use esforge_options::{BundleConfig, EsTarget, ParseOptions, PipelineConfig, PrintOptions, TransformOptions};
use esforge_tests::parse_clean;
use tokio_util::sync::CancellationToken;

// === Dependencies ===

#[test]
fn test_single_static_import() {
    let source = "import {a} from \"./x\"; const b = 1;";
    let response = extract_dependencies(&DependenciesRequest {
        source: source.to_string(),
        options: ParseOptions::default(),
    })
    .unwrap();
    assert_eq!(response.specifiers.len(), 1);
    let dependency = &response.specifiers[0];
    assert_eq!(dependency.text, "./x");
    assert_eq!(dependency.kind, DependencyKind::StaticImport);
    let span = dependency.span;
    assert_eq!(&source[span.start as usize..(span.start + span.length) as usize], "\"./x\"");
}

// === Recovery ===

#[test]
fn test_unterminated_string_still_yields_a_program() {
    let response = parse(&ParseRequest::new("const s = \"never closed;\nconst t = 2;", ParseOptions::default())).unwrap();
    assert!(!response.diagnostics.is_empty());
    assert!(!response.program.statements.is_empty());
}

// === Bundling ===

#[tokio::test]
async fn test_two_module_cycle_bundles() {
    let resolver = MemoryResolver::new()
        .with_file("app/a.js", "import { b } from './b.js';\nexport function a() { return b() + 1; }\n")
        .with_file("app/b.js", "import { a } from './a.js';\nexport function b() { return typeof a; }\n");
    let config = BundleConfig {
        entry: "app/a.js".to_string(),
        ..Default::default()
    };
    let output = bundle(&config, Arc::new(resolver), CancellationToken::new()).await.unwrap();
    assert_eq!(output.module_order, vec!["app/b.js".to_string(), "app/a.js".to_string()]);
    assert_eq!(output.code.matches("function a()").count(), 1);
    assert_eq!(output.code.matches("function b()").count(), 1);
    parse_clean(&output.code, "bundle.js");
}

// === Transform ===

#[test]
fn test_tsx_component_to_es5() {
    let source = r#"
interface Props { name: string; count?: number }
export const Greeting = (props: Props) => <p className="greeting">Hello {props.name} x{props.count ** 2}</p>;
"#;
    let options = TransformOptions {
        parse: ParseOptions::for_file("greeting.tsx"),
        pipeline: PipelineConfig {
            target: EsTarget::Es5,
            passes: None,
        },
        print: PrintOptions::default(),
    };
    let response = transform(&TransformRequest::new(source, options)).unwrap();
    let code = &response.code;
    assert!(!code.contains("interface"), "{}", code);
    assert!(!code.contains("=>"), "{}", code);
    assert!(code.contains("React.createElement(\"p\""), "{}", code);
    assert!(code.contains("Math.pow(props.count, 2)"), "{}", code);
}

#[test]
fn test_transform_is_stable_across_runs() {
    let request = TransformRequest::new(
        "const { a = 1 } = o ?? {}; x ||= a;",
        TransformOptions {
            pipeline: PipelineConfig {
                target: EsTarget::Es2019,
                passes: None,
            },
            ..Default::default()
        },
    );
    let first = transform(&request).unwrap();
    let second = transform(&request).unwrap();
    assert_eq!(first, second);
}
