//! Printer integration tests.
//!
//! Round trips go through the parser: printing a parsed program and parsing
//! the output again must give the same tree (ignoring positions), and
//! printing that tree must give the same text.

use esforge_ast::{factory, spanless, ArrowBody, Program, Statement, SyntaxKind, VariableKind};
use esforge_options::{ParseOptions, PrintOptions};
use esforge_parser::parse_program;
use esforge_printer::print_program;

fn parse(source: &str, file_name: &str) -> Program {
    let parsed = parse_program(source, &ParseOptions::for_file(file_name));
    assert!(!parsed.has_errors(), "unexpected parse errors in {:?}: {:?}", source, parsed.diagnostics);
    parsed.program
}

fn print(program: &Program) -> String {
    print_program(program, &PrintOptions::default()).code
}

fn minify(program: &Program) -> String {
    let options = PrintOptions {
        minify: true,
        trailing_newline: false,
        ..Default::default()
    };
    print_program(program, &options).code
}

fn assert_round_trip(source: &str, file_name: &str) {
    let program = parse(source, file_name);
    for printed in [print(&program), minify(&program)] {
        let reparsed = parse(&printed, file_name);
        assert_eq!(
            spanless(&program).expect("serializable"),
            spanless(&reparsed).expect("serializable"),
            "tree changed after printing {:?} as {:?}",
            source,
            printed
        );
        let reprinted = if printed.ends_with('\n') { print(&reparsed) } else { minify(&reparsed) };
        assert_eq!(printed, reprinted, "printing is not a fixed point for {:?}", source);
    }
}

fn print_statements(statements: Vec<Statement>) -> String {
    let mut program = parse("", "input.js");
    program.statements = statements;
    print(&program)
}

// === Layout ===

#[test]
fn test_expanded_layout() {
    let program = parse("function f(a,b){if(a){return b}const o={x:1,y:[1,2]};return o}", "input.js");
    assert_eq!(
        print(&program),
        "function f(a, b) {\n  if (a) {\n    return b;\n  }\n  const o = {\n    x: 1,\n    y: [1, 2]\n  };\n  return o;\n}\n"
    );
}

#[test]
fn test_minified_layout() {
    let program = parse("const a = { x: 1, y: [1, 2] };\nfunction f(a, b) { return a + b; }", "input.js");
    assert_eq!(minify(&program), "const a={x:1,y:[1,2]};function f(a,b){return a+b;}");
}

#[test]
fn test_minify_keeps_required_spaces() {
    let program = parse("let x = a - -b; typeof y; return_(x in z);", "input.js");
    assert_eq!(minify(&program), "let x=a- -b;typeof y;return_(x in z);");
}

#[test]
fn test_crlf_and_indent() {
    let program = parse("if (a) { b(); }", "input.js");
    let options = PrintOptions {
        indent: 4,
        new_line: esforge_options::NewLine::Crlf,
        ..Default::default()
    };
    assert_eq!(print_program(&program, &options).code, "if (a) {\r\n    b();\r\n}\r\n");
}

#[test]
fn test_shebang_is_kept() {
    let program = parse("#!/usr/bin/env node\nrun();", "input.js");
    assert_eq!(print(&program), "#!/usr/bin/env node\nrun();\n");
}

#[test]
fn test_empty_program() {
    let program = parse("", "input.js");
    assert_eq!(print(&program), "");
}

// === Comments ===

#[test]
fn test_comments_are_preserved_on_request() {
    let options = ParseOptions {
        preserve_comments: true,
        ..ParseOptions::for_file("input.js")
    };
    let program = parse_program("// lead\nlet a = 1;\n/* tail */", &options).program;
    let print_options = PrintOptions {
        preserve_comments: true,
        ..Default::default()
    };
    assert_eq!(print_program(&program, &print_options).code, "// lead\nlet a = 1;\n/* tail */\n");
    assert_eq!(print(&program), "let a = 1;\n");
}

// === Parentheses ===

#[test]
fn test_parens_follow_precedence() {
    let sum = factory::binary(factory::ident("a"), SyntaxKind::PlusToken, factory::ident("b"));
    let product = factory::binary(sum, SyntaxKind::AsteriskToken, factory::ident("c"));
    assert_eq!(print_statements(vec![factory::expression_statement(product)]), "(a + b) * c;\n");
}

#[test]
fn test_statement_cannot_start_with_object() {
    let callee = factory::member(factory::object(Vec::new()), "x");
    let statement = factory::expression_statement(factory::call(callee, Vec::new()));
    assert_eq!(print_statements(vec![statement]), "({}.x());\n");
}

#[test]
fn test_arrow_returning_object() {
    let arrow = factory::arrow(Vec::new(), ArrowBody::Expression(Box::new(factory::object(Vec::new()))));
    let statement = factory::declare(VariableKind::Const, "f", Some(arrow));
    assert_eq!(print_statements(vec![statement]), "const f = () => ({});\n");
}

#[test]
fn test_negative_number_member() {
    let call = factory::call(factory::member(factory::number(-1.0), "toFixed"), Vec::new());
    assert_eq!(print_statements(vec![factory::expression_statement(call)]), "(-1).toFixed();\n");
}

#[test]
fn test_nested_negation_is_spaced() {
    let inner = factory::prefix(SyntaxKind::MinusToken, factory::ident("a"));
    let outer = factory::prefix(SyntaxKind::MinusToken, inner);
    assert_eq!(print_statements(vec![factory::expression_statement(outer)]), "- -a;\n");
}

#[test]
fn test_dangling_else_gets_braces() {
    let inner = factory::if_statement(
        factory::ident("b"),
        factory::expression_statement(factory::ident("c")),
        None,
    );
    let outer = factory::if_statement(
        factory::ident("a"),
        inner,
        Some(factory::expression_statement(factory::ident("d"))),
    );
    assert_eq!(print_statements(vec![outer]), "if (a) {\n  if (b)\n    c;\n} else\n  d;\n");
}

// === Round trips ===

#[test]
fn test_round_trip_javascript() {
    let sources = [
        "const { a, b: [c, , d] = [], ...rest } = obj;",
        "label: for (const k in o) { if (k) continue label; else break; }",
        "async function* g() { yield* other(); await x; }",
        "class A extends B { static #x = 1; get y() { return this.#x; } constructor() { super(); } }",
        "a = b ? c : d, e;",
        "new Foo(1).bar?.[0]?.(2);",
        "x = `a${b}c${`d${e}`}`;",
        "const ok = /ab+c/gi.test(s);",
        "switch (x) { case 1: f(); break; default: g(); }",
        "try { a(); } catch { b(); } finally { c(); }",
        "do x++; while (x < 10);",
        "if (a) b(); else if (c) d(); else { e(); }",
        "export default function () {}",
        "export { a as b, c }; export * as ns from './m';",
        "import def, * as ns from 'm'; import { x as y } from 'n' with { type: 'json' };",
        "const f = async (x) => x ** 2, h = y => ({ y });",
        "for (let i = 0, n = a.length; i < n; i++) {}",
        "async function r() { for await (const chunk of stream) process(chunk); }",
        "a ?? (b || c);",
        "(function () {})();",
        "new (foo())();",
        "x = { get a() { return 1; }, set a(v) {}, async *m() {}, [k]: 1, 'q': 2, ...rest };",
        "void 0, typeof x === 'undefined', delete o[k];",
        "if (!(a instanceof B)) throw new Error('x');",
        "import.meta.url; function F() { return new.target; }",
    ];
    for source in sources {
        assert_round_trip(source, "input.js");
    }
}

#[test]
fn test_round_trip_typescript() {
    let sources = [
        "interface I<T extends object = {}> { readonly a?: T; m(x: number): void; [k: string]: any; new (): I<T>; }",
        "type U = keyof T | T[] | [a: string, b?: number] | (() => void);",
        "enum E { A = 1, B }",
        "const enum F { X }",
        "namespace N.M { export const x = 1; }",
        "declare module 'm' { export function f(): void; }",
        "declare global { interface Window { x: number; } }",
        "abstract class C<T> implements I { private readonly x: number = 1; protected abstract m(): void; constructor(public y: string) {} }",
        "let v = (x as unknown) satisfies T; let w = <T>y; f<string>(a!);",
        "type M = { readonly [K in keyof T]?: T[K] };",
        "type C<T> = T extends (infer U)[] ? U : never;",
        "function assert(x: unknown): asserts x is string {}",
        "type Tpl = `prefix-${string}`;",
        "let i: typeof import('m').X;",
        "import type { A } from './a'; export type { B } from './b';",
        "import fs = require('fs'); export import Q = N.M;",
        "export = value;",
        "export as namespace Lib;",
        "function over(a: string): void; function over(a: any) {}",
        "let fn: new (...args: any[]) => object;",
        "class P { declare x: number; y!: string; readonly [k: string]: unknown; }",
    ];
    for source in sources {
        assert_round_trip(source, "input.ts");
    }
}

#[test]
fn test_round_trip_jsx() {
    assert_round_trip(
        "const el = <div className=\"a\" {...props}>Hello {name}<br /></div>;",
        "input.jsx",
    );
    assert_round_trip("const f = <><Foo.Bar x={1} /></>;", "input.jsx");
}

#[test]
fn test_jsx_text_is_verbatim() {
    let program = parse("const el = <p a=\"1\">Hello {name}!</p>;", "input.jsx");
    assert_eq!(print(&program), "const el = <p a=\"1\">Hello {name}!</p>;\n");
}

// === Mappings ===

#[test]
fn test_mappings_point_at_source() {
    let program = parse("let a = b;", "input.js");
    let result = print_program(&program, &PrintOptions::default());
    let a = result
        .mappings
        .iter()
        .find(|m| m.name.as_deref() == Some("a"))
        .expect("mapping for a");
    assert_eq!((a.generated_line, a.generated_column, a.original), (0, 4, 4));
    let b = result
        .mappings
        .iter()
        .find(|m| m.name.as_deref() == Some("b"))
        .expect("mapping for b");
    assert_eq!((b.generated_column, b.original), (8, 8));
}

#[test]
fn test_synthesized_nodes_have_no_mappings() {
    let result = print_program(
        &{
            let mut program = parse("", "input.js");
            program.statements = vec![factory::expression_statement(factory::ident("x"))];
            program
        },
        &PrintOptions::default(),
    );
    assert!(result.mappings.is_empty());
}
