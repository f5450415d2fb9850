//! Source maps generated from printed programs.

use esforge_options::{ParseOptions, PrintOptions};
use esforge_parser::parse_program;
use esforge_printer::print_program;
use sourcemap::SourceMap;

fn map_for(source: &str, options: &PrintOptions) -> (String, SourceMap) {
    let parsed = parse_program(source, &ParseOptions::for_file("input.js"));
    let printed = print_program(&parsed.program, options);
    let json = esforge_sourcemap::generate(&printed.mappings, source, "input.js", Some("output.js"))
        .expect("source map encodes");
    let map = SourceMap::from_slice(json.as_bytes()).expect("source map decodes");
    (printed.code, map)
}

// === Lookup ===

#[test]
fn test_identifier_maps_back_to_source_line() {
    let source = "\n\nfunction  add(a, b) {\n    return a + b;\n}\n";
    let (code, map) = map_for(source, &PrintOptions::default());
    assert!(code.starts_with("function add(a, b) {\n  return a + b;"));

    // `return` on generated line 1, column 2 came from line 3, column 4.
    let token = map.lookup_token(1, 2).expect("token for return");
    assert_eq!((token.get_src_line(), token.get_src_col()), (3, 4));

    // `add` keeps its name.
    let token = map.lookup_token(0, 9).expect("token for add");
    assert_eq!(token.get_name(), Some("add"));
    assert_eq!((token.get_src_line(), token.get_src_col()), (2, 10));
}

#[test]
fn test_minified_output_maps_every_statement() {
    let source = "let a = 1;\nlet b = 2;\nlet c = 3;\n";
    let options = PrintOptions {
        minify: true,
        ..Default::default()
    };
    let (code, map) = map_for(source, &options);
    assert!(code.starts_with("let a=1;let b=2;let c=3;"));
    let lines: Vec<u32> = (0..3)
        .map(|i| map.lookup_token(0, i * 8).expect("statement token").get_src_line())
        .collect();
    assert_eq!(lines, vec![0, 1, 2]);
}

#[test]
fn test_source_content_is_embedded() {
    let source = "x;";
    let (_, map) = map_for(source, &PrintOptions::default());
    assert_eq!(map.get_source(0), Some("input.js"));
    assert_eq!(map.get_source_contents(0), Some(source));
    assert_eq!(map.get_file(), Some("output.js"));
}
