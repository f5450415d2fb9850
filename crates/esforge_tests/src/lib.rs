//! Shared corpus and helpers for the cross-crate property tests.
//!
//! Each case is a named snippet with the file name that selects its
//! dialect. Every snippet parses without errors.

use esforge_ast::{spanless, Program};
use esforge_diagnostics::Diagnostic;
use esforge_options::{ParseOptions, PrintOptions};
use esforge_parser::parse_program;
use esforge_printer::print_program;

/// One corpus entry.
#[derive(Debug, Clone, Copy)]
pub struct Case {
    pub name: &'static str,
    pub file_name: &'static str,
    pub source: &'static str,
}

const fn case(name: &'static str, file_name: &'static str, source: &'static str) -> Case {
    Case {
        name,
        file_name,
        source,
    }
}

/// Plain JavaScript modules.
pub const JAVASCRIPT: &[Case] = &[
    case("destructuring", "input.js", "const { a, b: [c, , d] = [], ...rest } = obj;"),
    case("labels", "input.js", "label: for (const k in o) { if (k) continue label; else break; }"),
    case("async-generator", "input.js", "async function* g() { yield* other(); await x; }"),
    case(
        "class",
        "input.js",
        "class A extends B { static #x = 1; get y() { return this.#x; } constructor() { super(); } }",
    ),
    case("sequence", "input.js", "a = b ? c : d, e;"),
    case("optional-chain", "input.js", "new Foo(1).bar?.[0]?.(2);"),
    case("template", "input.js", "x = `a${b}c${`d${e}`}`;"),
    case("regex", "input.js", "const ok = /ab+c/gi.test(s);"),
    case("switch", "input.js", "switch (x) { case 1: f(); break; default: g(); }"),
    case("try", "input.js", "try { a(); } catch { b(); } finally { c(); }"),
    case("if-else", "input.js", "if (a) b(); else if (c) d(); else { e(); }"),
    case("modules", "input.js", "import def, * as ns from 'm'; export { a as b, c }; export * as n2 from './m';"),
    case("arrows", "input.js", "const f = async (x) => x ** 2, h = y => ({ y });"),
    case("for", "input.js", "for (let i = 0, n = a.length; i < n; i++) {}"),
    case("nullish", "input.js", "a ?? (b || c);"),
    case("iife", "input.js", "(function () {})();"),
    case(
        "object",
        "input.js",
        "x = { get a() { return 1; }, set a(v) {}, async *m() {}, [k]: 1, 'q': 2, ...rest };",
    ),
    case("unary", "input.js", "void 0, typeof x === 'undefined', delete o[k];"),
    case("meta", "input.js", "import.meta.url; function F() { return new.target; }"),
];

/// TypeScript modules.
pub const TYPESCRIPT: &[Case] = &[
    case(
        "interface",
        "input.ts",
        "interface I<T extends object = {}> { readonly a?: T; m(x: number): void; [k: string]: any; }",
    ),
    case("union", "input.ts", "type U = keyof T | T[] | [a: string, b?: number] | (() => void);"),
    case("enum", "input.ts", "enum E { A = 1, B }"),
    case("namespace", "input.ts", "namespace N.M { export const x = 1; }"),
    case(
        "abstract-class",
        "input.ts",
        "abstract class C<T> implements I { private readonly x: number = 1; protected abstract m(): void; constructor(public y: string) {} }",
    ),
    case("assertions", "input.ts", "let v = (x as unknown) satisfies T; let w = <T>y; f<string>(a!);"),
    case("mapped", "input.ts", "type M = { readonly [K in keyof T]?: T[K] };"),
    case("conditional", "input.ts", "type C<T> = T extends (infer U)[] ? U : never;"),
    case("type-imports", "input.ts", "import type { A } from './a'; export type { B } from './b';"),
    case("overloads", "input.ts", "function over(a: string): void; function over(a: any) {}"),
];

/// JSX modules.
pub const JSX: &[Case] = &[
    case("element", "input.jsx", "const el = <div className=\"a\" {...props}>Hello {name}<br /></div>;"),
    case("fragment", "input.jsx", "const f = <><Foo.Bar x={1} /></>;"),
];

/// Every corpus entry.
pub fn corpus() -> impl Iterator<Item = &'static Case> {
    JAVASCRIPT.iter().chain(TYPESCRIPT).chain(JSX)
}

/// Parse a case, failing the test on any error.
pub fn parse_case(case: &Case) -> Program {
    parse_clean(case.source, case.file_name)
}

pub fn parse_clean(source: &str, file_name: &str) -> Program {
    let parsed = parse_program(source, &ParseOptions::for_file(file_name));
    assert!(
        !parsed.has_errors(),
        "unexpected parse errors in {:?}: {:?}",
        source,
        parsed.diagnostics
    );
    parsed.program
}

pub fn expanded(program: &Program) -> String {
    print_program(program, &PrintOptions::default()).code
}

pub fn minified(program: &Program) -> String {
    let options = PrintOptions {
        minify: true,
        trailing_newline: false,
        ..Default::default()
    };
    print_program(program, &options).code
}

/// The tree with positions and ids erased.
pub fn shape(program: &Program) -> serde_json::Value {
    match spanless(program) {
        Ok(value) => value,
        Err(err) => panic!("tree does not serialize: {err}"),
    }
}

pub fn errors(diagnostics: &[Diagnostic]) -> Vec<&Diagnostic> {
    diagnostics.iter().filter(|d| d.is_error()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corpus_names_are_unique() {
        let mut names: Vec<&str> = corpus().map(|c| c.name).collect();
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total);
    }

    #[test]
    fn test_corpus_parses_cleanly() {
        for case in corpus() {
            parse_case(case);
        }
    }
}
