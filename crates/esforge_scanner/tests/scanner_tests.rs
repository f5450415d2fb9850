//! Scanner integration tests.
//!
//! Covers tokenization of JavaScript, TypeScript and JSX constructs and the
//! lexer-mode stack.

use esforge_ast::syntax_kind::SyntaxKind;
use esforge_ast::types::TokenFlags;
use esforge_scanner::{tokenize, LexerMode, Scanner};

/// Helper: scan all tokens from source and return as (kind, value) pairs.
fn scan_all(source: &str) -> Vec<(SyntaxKind, String)> {
    let mut scanner = Scanner::new(source);
    let mut tokens = Vec::new();
    loop {
        let kind = scanner.scan();
        if kind == SyntaxKind::EndOfFileToken {
            break;
        }
        tokens.push((kind, scanner.token_value().to_string()));
    }
    tokens
}

/// Helper: scan all token kinds.
fn scan_kinds(source: &str) -> Vec<SyntaxKind> {
    scan_all(source).into_iter().map(|(k, _)| k).collect()
}

// === Trivia ===

#[test]
fn test_empty_source() {
    assert!(scan_all("").is_empty());
}

#[test]
fn test_whitespace_and_comments_only() {
    assert!(scan_all("   \n\t  // line\n/* block */ \u{FEFF}").is_empty());
}

#[test]
fn test_line_break_inside_block_comment_counts() {
    let mut scanner = Scanner::new("a /*\n*/ b");
    scanner.scan();
    scanner.scan();
    assert!(scanner.has_preceding_line_break());
}

#[test]
fn test_unicode_line_separator_is_a_line_break() {
    let mut scanner = Scanner::new("a\u{2028}b");
    scanner.scan();
    assert_eq!(scanner.scan(), SyntaxKind::Identifier);
    assert!(scanner.has_preceding_line_break());
}

// === Literals ===

#[test]
fn test_numeric_literals() {
    let tokens = scan_all("42 3.14 0xFF 1e-7 0.5");
    let values: Vec<_> = tokens.iter().map(|(_, v)| v.as_str()).collect();
    assert_eq!(values, vec!["42", "3.14", "0xFF", "1e-7", "0.5"]);
    assert!(tokens.iter().all(|(k, _)| *k == SyntaxKind::NumericLiteral));
}

#[test]
fn test_bigint_literal() {
    assert_eq!(scan_all("123n"), vec![(SyntaxKind::BigIntLiteral, "123n".to_string())]);
}

#[test]
fn test_legacy_octal_is_flagged() {
    let mut scanner = Scanner::new("0777");
    scanner.scan();
    assert!(scanner.token_flags().contains(TokenFlags::OCTAL));
}

#[test]
fn test_string_literals() {
    assert_eq!(scan_all(r#""hello""#), vec![(SyntaxKind::StringLiteral, "hello".to_string())]);
    assert_eq!(scan_all("'world'"), vec![(SyntaxKind::StringLiteral, "world".to_string())]);
}

#[test]
fn test_surrogate_pair_escape() {
    let tokens = scan_all(r#""\uD83D\uDE00""#);
    assert_eq!(tokens[0].1, "\u{1F600}");
}

#[test]
fn test_string_raw_text_is_preserved() {
    let mut scanner = Scanner::new(r#"'a\tb'"#);
    scanner.scan();
    assert_eq!(scanner.token_text(), r#"'a\tb'"#);
    assert_eq!(scanner.token_value(), "a\tb");
    assert!(scanner.token_flags().contains(TokenFlags::SINGLE_QUOTE));
}

#[test]
fn test_template_with_crlf_is_normalized() {
    let mut scanner = Scanner::new("`a\r\nb`");
    assert_eq!(scanner.scan(), SyntaxKind::NoSubstitutionTemplateLiteral);
    assert_eq!(scanner.token_value(), "a\nb");
    assert_eq!(scanner.template_raw(), "a\nb");
}

#[test]
fn test_nested_templates() {
    assert_eq!(
        scan_kinds("`a${`b${c}`}d`"),
        vec![
            SyntaxKind::TemplateHead,
            SyntaxKind::TemplateHead,
            SyntaxKind::Identifier,
            SyntaxKind::TemplateTail,
            SyntaxKind::TemplateTail,
        ]
    );
}

#[test]
fn test_unterminated_template() {
    let mut scanner = Scanner::new("`abc");
    scanner.scan();
    assert!(scanner.is_unterminated());
    assert_eq!(scanner.diagnostics().diagnostics()[0].code, 1160);
}

// === Identifiers and keywords ===

#[test]
fn test_keywords() {
    assert_eq!(
        scan_kinds("const let var function class async await"),
        vec![
            SyntaxKind::ConstKeyword,
            SyntaxKind::LetKeyword,
            SyntaxKind::VarKeyword,
            SyntaxKind::FunctionKeyword,
            SyntaxKind::ClassKeyword,
            SyntaxKind::AsyncKeyword,
            SyntaxKind::AwaitKeyword,
        ]
    );
}

#[test]
fn test_unicode_identifiers() {
    let tokens = scan_all("café $x _y ñ");
    assert_eq!(tokens.len(), 4);
    assert_eq!(tokens[0], (SyntaxKind::Identifier, "café".to_string()));
}

// === Punctuation ===

#[test]
fn test_operators() {
    assert_eq!(
        scan_kinds("=== !== ?? ?. ... => **= &&= ||= ??="),
        vec![
            SyntaxKind::EqualsEqualsEqualsToken,
            SyntaxKind::ExclamationEqualsEqualsToken,
            SyntaxKind::QuestionQuestionToken,
            SyntaxKind::QuestionDotToken,
            SyntaxKind::DotDotDotToken,
            SyntaxKind::EqualsGreaterThanToken,
            SyntaxKind::AsteriskAsteriskEqualsToken,
            SyntaxKind::AmpersandAmpersandEqualsToken,
            SyntaxKind::BarBarEqualsToken,
            SyntaxKind::QuestionQuestionEqualsToken,
        ]
    );
}

#[test]
fn test_conditional_followed_by_decimal_is_not_optional_chain() {
    assert_eq!(
        scan_kinds("a?.5:b"),
        vec![
            SyntaxKind::Identifier,
            SyntaxKind::QuestionToken,
            SyntaxKind::NumericLiteral,
            SyntaxKind::ColonToken,
            SyntaxKind::Identifier,
        ]
    );
}

#[test]
fn test_greater_than_is_never_merged_without_rescan() {
    assert_eq!(
        scan_kinds("a>>b"),
        vec![
            SyntaxKind::Identifier,
            SyntaxKind::GreaterThanToken,
            SyntaxKind::GreaterThanToken,
            SyntaxKind::Identifier,
        ]
    );
}

// === Modes and state ===

#[test]
fn test_look_ahead_restores_position() {
    let mut scanner = Scanner::new("a b");
    scanner.scan();
    let next = scanner.look_ahead(|s| s.scan());
    assert_eq!(next, SyntaxKind::Identifier);
    assert_eq!(scanner.token_value(), "a");
}

#[test]
fn test_try_scan_keeps_successful_result() {
    let mut scanner = Scanner::new("a b c");
    scanner.scan();
    let kept = scanner.try_scan(|s| {
        s.scan();
        Some(s.token_value().to_string())
    });
    assert_eq!(kept.as_deref(), Some("b"));
    assert_eq!(scanner.scan(), SyntaxKind::Identifier);
    assert_eq!(scanner.token_value(), "c");
}

#[test]
fn test_bottom_mode_is_never_popped() {
    let mut scanner = Scanner::new("");
    assert_eq!(scanner.pop_mode(), LexerMode::Normal);
    assert_eq!(scanner.mode_depth(), 1);
}

#[test]
fn test_jsx_text_whitespace_only() {
    let mut scanner = Scanner::new("\n  <b/>");
    scanner.push_mode(LexerMode::JsxChildren);
    assert_eq!(scanner.scan(), SyntaxKind::JsxTextAllWhiteSpaces);
    assert_eq!(scanner.scan(), SyntaxKind::LessThanToken);
}

// === Tokenize ===

#[test]
fn test_tokenize_regex_after_keyword() {
    let kinds: Vec<_> = tokenize("return /x/.test(s)", 0).map(|t| t.kind).collect();
    assert_eq!(kinds[1], SyntaxKind::RegularExpressionLiteral);
}

#[test]
fn test_tokenize_reports_lexical_errors() {
    let mut tokens = tokenize("'open", 0);
    let all: Vec<_> = tokens.by_ref().collect();
    assert_eq!(all.len(), 2);
    assert!(tokens.diagnostics().has_errors());
}
