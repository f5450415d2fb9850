//! Transformer integration tests.
//!
//! Each test parses a snippet, runs a pipeline over it and compares the
//! minified output, which has no layout choices to get in the way.

use esforge_ast::Program;
use esforge_diagnostics::Diagnostic;
use esforge_options::{EsTarget, ParseOptions, PassConfig, PipelineConfig, PrintOptions};
use esforge_parser::parse_program;
use esforge_printer::print_program;
use esforge_transformers::Pipeline;
use serde_json::json;

fn minify(program: &Program) -> String {
    let options = PrintOptions {
        minify: true,
        trailing_newline: false,
        ..Default::default()
    };
    print_program(program, &options).code
}

fn run_with(source: &str, file_name: &str, passes: Vec<PassConfig>) -> (String, Vec<Diagnostic>) {
    let mut parse_options = ParseOptions::for_file(file_name);
    parse_options.decorators = true;
    let parsed = parse_program(source, &parse_options);
    assert!(!parsed.has_errors(), "unexpected parse errors in {:?}: {:?}", source, parsed.diagnostics);
    let mut program = parsed.program;
    let config = PipelineConfig {
        target: EsTarget::Es5,
        passes: Some(passes),
    };
    let pipeline = Pipeline::from_config(&config, &parse_options).expect("valid pipeline");
    let diagnostics = pipeline.run(&mut program);
    (minify(&program), diagnostics)
}

fn run(source: &str, file_name: &str, passes: &[&str]) -> (String, Vec<Diagnostic>) {
    run_with(source, file_name, passes.iter().map(|name| PassConfig::new(name)).collect())
}

fn output(source: &str, file_name: &str, passes: &[&str]) -> String {
    let (code, diagnostics) = run(source, file_name, passes);
    assert!(diagnostics.is_empty(), "unexpected diagnostics for {:?}: {:?}", source, diagnostics);
    code
}

fn codes(diagnostics: &[Diagnostic]) -> Vec<u32> {
    diagnostics.iter().map(|d| d.code).collect()
}

// === Type erasure ===

#[test]
fn test_strip_annotations_and_declarations() {
    let code = output(
        "let x: number = 1; interface I { a: string } type T = string | number; declare const y: T; function f<T>(a: T): T { return a as T; }",
        "input.ts",
        &["strip_types"],
    );
    assert_eq!(code, "let x=1;function f(a){return a;}");
}

#[test]
fn test_strip_elides_type_only_imports() {
    let code = output(
        "import { T, value } from './m'; import type { U } from './u'; let x: T = value;",
        "input.ts",
        &["strip_types"],
    );
    assert!(code.contains("'./m'") && code.contains("value"), "{}", code);
    assert!(!code.contains("./u") && !code.contains('T'), "{}", code);
}

#[test]
fn test_strip_enum_becomes_object() {
    let code = output("enum E { A, B = 5, C }", "input.ts", &["strip_types"]);
    assert!(code.contains(r#"E[E["A"]=0]="A""#), "{}", code);
    assert!(code.contains(r#"E[E["C"]=6]="C""#), "{}", code);
}

#[test]
fn test_strip_parameter_properties() {
    let code = output("class P { constructor(public x: number) {} }", "input.ts", &["strip_types"]);
    assert!(code.contains("this.x=x"), "{}", code);
}

// === Decorators ===

#[test]
fn test_class_decorator_uses_decorate_helper() {
    let code = output("@sealed class A { @log m() {} }", "input.ts", &["strip_types", "decorators"]);
    assert!(code.contains("__decorate"), "{}", code);
    assert!(code.contains("A=__decorate([sealed],A)"), "{}", code);
}

// === JSX ===

#[test]
fn test_jsx_element_to_factory_call() {
    let code = output("x = <div id=\"a\">{y}</div>;", "input.jsx", &["jsx"]);
    assert_eq!(code, "x=React.createElement(\"div\",{id:\"a\"},y);");
}

#[test]
fn test_jsx_fragment_and_custom_pragma() {
    let passes = vec![PassConfig::with_options("jsx", json!({ "pragma": "h", "pragmaFrag": "Fragment" }))];
    let (code, diagnostics) = run_with("x = <><Foo /></>;", "input.jsx", passes);
    assert!(diagnostics.is_empty());
    assert_eq!(code, "x=h(Fragment,null,h(Foo,null));");
}

#[test]
fn test_jsx_text_whitespace() {
    let code = output("x = <p>\n  Hello\n  world\n</p>;", "input.jsx", &["jsx"]);
    assert_eq!(code, "x=React.createElement(\"p\",null,\"Hello world\");");
}

#[test]
fn test_jsx_single_space_between_children() {
    let code = output("x = <a>{n} {m}</a>;", "input.jsx", &["jsx"]);
    assert_eq!(code, "x=React.createElement(\"a\",null,n,\" \",m);");
    let code = output("x = <a> {n} </a>;", "input.jsx", &["jsx"]);
    assert_eq!(code, "x=React.createElement(\"a\",null,\" \",n,\" \");");
    let code = output("x = <a>{n} <b /></a>;", "input.jsx", &["jsx"]);
    assert_eq!(code, "x=React.createElement(\"a\",null,n,\" \",React.createElement(\"b\",null));");
}

// === Downleveling ===

#[test]
fn test_es2021_logical_assignment() {
    assert_eq!(output("a ||= b;", "input.js", &["es2021"]), "a||(a=b);");
}

#[test]
fn test_es2020_nullish_coalescing() {
    assert_eq!(output("x = a ?? b;", "input.js", &["es2020"]), "x=a===null||a===void 0?b:a;");
}

#[test]
fn test_es2020_loose_nullish_coalescing() {
    let passes = vec![PassConfig::with_options("es2020", json!({ "loose": true }))];
    let (code, _) = run_with("x = a ?? b;", "input.js", passes);
    assert_eq!(code, "x=a==null?b:a;");
}

#[test]
fn test_es2020_optional_chain() {
    assert_eq!(output("x = a?.b;", "input.js", &["es2020"]), "x=a===null||a===void 0?void 0:a.b;");
}

#[test]
fn test_es2020_optional_chain_saves_non_trivial_base() {
    assert_eq!(
        output("x = f()?.b;", "input.js", &["es2020"]),
        "var _a;x=(_a=f())===null||_a===void 0?void 0:_a.b;"
    );
}

#[test]
fn test_es2019_optional_catch_binding() {
    let code = output("try { a(); } catch { b(); }", "input.js", &["es2019"]);
    assert!(code.contains("catch(_unused)"), "{}", code);
}

#[test]
fn test_es2018_object_spread() {
    assert_eq!(output("x = { a, ...b };", "input.js", &["es2018"]), "x=Object.assign({a},b);");
}

#[test]
fn test_es2016_exponent() {
    assert_eq!(output("x = a ** b;", "input.js", &["es2016"]), "x=Math.pow(a,b);");
}

#[test]
fn test_es2015_arrow_captures_this() {
    let code = output("function f() { return () => this.x; }", "input.js", &["es2015"]);
    assert!(code.contains("var _this=this;"), "{}", code);
    assert!(code.contains("return _this.x;"), "{}", code);
    assert!(!code.contains("=>"), "{}", code);
}

#[test]
fn test_es2015_template_literal() {
    assert_eq!(output("x = `a${b}c`;", "input.js", &["es2015"]), "x=\"a\"+b+\"c\";");
}

#[test]
fn test_es2015_block_binding_renamed_when_hoisted() {
    let code = output("let x = 1; { let x = 2; f(x); } f(x);", "input.js", &["es2015"]);
    assert!(code.starts_with("var x=1;"), "{}", code);
    assert!(code.contains("var x_1=2;f(x_1);"), "{}", code);
    assert!(code.ends_with("f(x);"), "{}", code);
}

#[test]
fn test_es2015_default_and_rest_parameters() {
    assert_eq!(
        output("function f(a = 1, ...r) { return a; }", "input.js", &["es2015"]),
        "function f(a){if(a===void 0){a=1;}var r=Array.prototype.slice.call(arguments,1);return a;}"
    );
}

#[test]
fn test_es2015_spread_arguments() {
    assert_eq!(output("f(...a);", "input.js", &["es2015"]), "f.apply(void 0,a);");
    assert_eq!(output("o.m(1, ...a);", "input.js", &["es2015"]), "o.m.apply(o,[1].concat(a));");
}

#[test]
fn test_es2015_object_literal_sugar() {
    assert_eq!(output("x = { a, m() { return 1; } };", "input.js", &["es2015"]), "x={a:a,m:function(){return 1;}};");
    assert_eq!(output("x = { a: 1, [k]: 2 };", "input.js", &["es2015"]), "var _a;x=(_a={a:1},_a[k]=2,_a);");
}

#[test]
fn test_es2015_reports_classes() {
    let (code, diagnostics) = run("class A {}", "input.js", &["es2015"]);
    assert!(code.starts_with("class A"), "{}", code);
    assert_eq!(codes(&diagnostics), vec![9002]);
}

#[test]
fn test_chained_levels_lower_twice() {
    // `??=` becomes `??`, which es2020 then lowers.
    assert_eq!(output("a ??= b;", "input.js", &["es2021", "es2020"]), "a===null||a===void 0?(a=b):a;");
}

// === Simplify ===

#[test]
fn test_simplify_folds_constants() {
    assert_eq!(output("x = 1 + 2 * 3; y = 'a' + 1;", "input.js", &["simplify"]), "x=7;y=\"a1\";");
}

#[test]
fn test_simplify_removes_dead_branches() {
    assert_eq!(output("if (false) { var y = 1; } else { z(); }", "input.js", &["simplify"]), "var y;{z();}");
    assert_eq!(output("x = true ? a : b;", "input.js", &["simplify"]), "x=a;");
}

#[test]
fn test_simplify_respects_options() {
    let passes = vec![PassConfig::with_options("simplify", json!({ "foldConstants": false }))];
    let (code, _) = run_with("x = 1 + 2;", "input.js", passes);
    assert_eq!(code, "x=1+2;");
}

// === Pipeline ===

#[test]
fn test_default_pipeline_lowers_typescript_to_es5() {
    let parse_options = ParseOptions::for_file("input.ts");
    let mut program = parse_program("const f = (a: number = 1) => a ** 2;", &parse_options).program;
    let config = PipelineConfig {
        target: EsTarget::Es5,
        passes: None,
    };
    let pipeline = Pipeline::from_config(&config, &parse_options).expect("valid pipeline");
    let diagnostics = pipeline.run(&mut program);
    assert!(diagnostics.is_empty(), "{:?}", diagnostics);
    let code = minify(&program);
    assert!(!code.contains("=>") && !code.contains("**") && !code.contains("const"), "{}", code);
    assert!(code.contains("Math.pow(a,2)"), "{}", code);
}

#[test]
fn test_passes_never_drop_unknown_code() {
    let (code, diagnostics) = run("function* g() { yield 1; }", "input.js", &["es2015"]);
    assert!(code.contains("yield 1"), "{}", code);
    assert_eq!(codes(&diagnostics), vec![9002]);
}
