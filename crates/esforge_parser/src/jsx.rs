//! JSX elements and fragments.
//!
//! The scanner's mode stack drives tokenization: `JsxTag` between `<` and
//! `>`, `JsxChildren` between tags, and `Normal` inside `{ }`. Every mode
//! pushed here is popped before the token that follows it is scanned.

use esforge_ast::node::*;
use esforge_ast::syntax_kind::SyntaxKind;
use esforge_diagnostics::messages;
use esforge_scanner::LexerMode;

use crate::parser::Parser;

/// What a `<` opened: an element with a tag, or a fragment.
enum JsxOpening {
    Element(JsxOpeningElement),
    Fragment,
}

impl Parser {
    /// Entry from expression position; the current token is `<`.
    pub(crate) fn parse_jsx_element_or_fragment(&mut self) -> Expression {
        if !self.jsx {
            self.error_at_current_token(&messages::JSX_IS_NOT_ENABLED, &[]);
        }
        let start = self.token_start();
        let mut expression = self.parse_jsx_element(start);

        // `<a/><b/>` at the top level: report once and keep both.
        while self.token() == SyntaxKind::LessThanToken {
            let sibling_start = self.token_start();
            let Some(sibling) = self.try_parse(|p| {
                let next_is_tag = p.look_ahead(|p| {
                    p.scanner.push_mode(LexerMode::JsxTag);
                    let next = p.next_token();
                    next.is_identifier_or_keyword() || next == SyntaxKind::GreaterThanToken
                });
                next_is_tag.then(|| p.parse_jsx_element(sibling_start))
            }) else {
                break;
            };
            self.error_at(
                sibling_start,
                self.prev_token_end(),
                &messages::JSX_EXPRESSIONS_MUST_HAVE_ONE_PARENT_ELEMENT,
                &[],
            );
            expression = Expression::Binary(BinaryExpression {
                data: self.finish(SyntaxKind::BinaryExpression, start),
                left: Box::new(expression),
                operator: SyntaxKind::CommaToken,
                right: Box::new(sibling),
            });
        }
        expression
    }

    /// An element or fragment whose `<` is the current token, scanned in the
    /// enclosing mode.
    fn parse_jsx_element(&mut self, start: u32) -> Expression {
        match self.parse_jsx_opening(start) {
            JsxOpening::Fragment => {
                let children = self.parse_jsx_children("");
                self.parse_jsx_closing(None);
                Expression::JsxFragment(Box::new(JsxFragment {
                    data: self.finish(SyntaxKind::JsxFragment, start),
                    children,
                }))
            }
            JsxOpening::Element(opening) if opening.self_closing => Expression::JsxElement(Box::new(JsxElement {
                data: self.finish(SyntaxKind::JsxElement, start),
                opening,
                children: Vec::new(),
                closing: None,
            })),
            JsxOpening::Element(opening) => {
                let tag = opening.tag_name.text();
                let children = self.parse_jsx_children(&tag);
                let closing = self.parse_jsx_closing(Some(&tag));
                Expression::JsxElement(Box::new(JsxElement {
                    data: self.finish(SyntaxKind::JsxElement, start),
                    opening,
                    children,
                    closing,
                }))
            }
        }
    }

    // ========================================================================
    // Tags
    // ========================================================================

    fn parse_jsx_opening(&mut self, start: u32) -> JsxOpening {
        self.scanner.push_mode(LexerMode::JsxTag);
        self.next_token();
        if self.token() == SyntaxKind::GreaterThanToken {
            self.scanner.pop_mode();
            self.scanner.push_mode(LexerMode::JsxChildren);
            self.next_token();
            return JsxOpening::Fragment;
        }

        let tag_name = self.parse_jsx_tag_name();
        let type_arguments = if self.typescript && self.token() == SyntaxKind::LessThanToken {
            self.scanner.push_mode(LexerMode::Normal);
            let arguments = self.parse_type_arguments();
            self.scanner.pop_mode();
            self.scanner.rescan_current_token();
            arguments
        } else {
            None
        };
        let attributes = self.parse_jsx_attributes();

        let self_closing = self.parse_optional(SyntaxKind::SlashToken);
        self.expect_jsx_tag_end();
        if !self_closing {
            self.scanner.push_mode(LexerMode::JsxChildren);
        }
        self.rescan_after_tag_end();
        let kind = if self_closing {
            SyntaxKind::JsxSelfClosingElement
        } else {
            SyntaxKind::JsxOpeningElement
        };
        JsxOpening::Element(JsxOpeningElement {
            data: self.finish(kind, start),
            tag_name,
            type_arguments,
            attributes,
            self_closing,
        })
    }

    /// The current token is `</` (scanned among children), or anything else
    /// when the children ended early.
    fn parse_jsx_closing(&mut self, tag: Option<&str>) -> Option<JsxClosingElement> {
        if self.token() != SyntaxKind::LessThanSlashToken {
            return None;
        }
        let start = self.token_start();
        self.scanner.push_mode(LexerMode::JsxTag);
        self.next_token();

        let Some(tag) = tag else {
            self.expect_jsx_tag_end();
            self.rescan_after_tag_end();
            return None;
        };
        let tag_name = self.parse_jsx_tag_name();
        let closing_text = tag_name.text();
        if closing_text != tag {
            self.error_at(
                tag_name_start(&tag_name),
                self.prev_token_end(),
                &messages::EXPECTED_CORRESPONDING_JSX_CLOSING_TAG_FOR_0,
                &[tag],
            );
        }
        self.expect_jsx_tag_end();
        self.rescan_after_tag_end();
        Some(JsxClosingElement {
            data: self.finish(SyntaxKind::JsxClosingElement, start),
            tag_name,
        })
    }

    /// Consume the closing `>` of a tag and leave `JsxTag` mode. The token
    /// after it is scanned by `rescan_after_tag_end`.
    fn expect_jsx_tag_end(&mut self) {
        if self.token() != SyntaxKind::GreaterThanToken {
            self.error_at_current_token(&messages::_0_EXPECTED, &[">"]);
        }
        self.scanner.pop_mode();
    }

    fn rescan_after_tag_end(&mut self) {
        if self.token() == SyntaxKind::GreaterThanToken {
            self.next_token();
        } else {
            self.scanner.rescan_current_token();
        }
    }

    fn parse_jsx_tag_name(&mut self) -> JsxTagName {
        let start = self.token_start();
        let first = self.parse_jsx_identifier();
        if self.parse_optional(SyntaxKind::ColonToken) {
            let name = self.parse_jsx_identifier();
            return JsxTagName::Namespaced(JsxNamespacedName {
                data: self.finish(SyntaxKind::JsxNamespacedName, start),
                namespace: first,
                name,
            });
        }
        let mut tag_name = JsxTagName::Identifier(first);
        while self.parse_optional(SyntaxKind::DotToken) {
            let property = self.parse_identifier_name();
            tag_name = JsxTagName::Member(JsxMemberExpression {
                data: self.finish(SyntaxKind::JsxMemberExpression, start),
                object: Box::new(tag_name),
                property,
            });
        }
        tag_name
    }

    /// Names in tags may be keywords and may contain `-`.
    fn parse_jsx_identifier(&mut self) -> Identifier {
        if self.token().is_identifier_or_keyword() {
            return self.identifier_from_token();
        }
        self.missing_identifier(&messages::IDENTIFIER_EXPECTED)
    }

    // ========================================================================
    // Attributes
    // ========================================================================

    fn parse_jsx_attributes(&mut self) -> Vec<JsxAttributeLike> {
        let mut attributes = Vec::new();
        loop {
            match self.token() {
                SyntaxKind::OpenBraceToken => attributes.push(self.parse_jsx_spread_attribute()),
                kind if kind.is_identifier_or_keyword() => {
                    attributes.push(JsxAttributeLike::Attribute(self.parse_jsx_attribute()))
                }
                _ => break,
            }
        }
        attributes
    }

    fn parse_jsx_spread_attribute(&mut self) -> JsxAttributeLike {
        let start = self.token_start();
        self.scanner.push_mode(LexerMode::Normal);
        self.next_token();
        self.parse_expected(SyntaxKind::DotDotDotToken);
        let expression = self.parse_assignment_expression();
        self.parse_jsx_closing_brace();
        JsxAttributeLike::Spread(JsxSpreadAttribute {
            data: self.finish(SyntaxKind::JsxSpreadAttribute, start),
            expression,
        })
    }

    fn parse_jsx_attribute(&mut self) -> JsxAttribute {
        let start = self.token_start();
        let first = self.parse_jsx_identifier();
        let name = if self.parse_optional(SyntaxKind::ColonToken) {
            let local = self.parse_jsx_identifier();
            JsxAttributeName::Namespaced(JsxNamespacedName {
                data: self.finish(SyntaxKind::JsxNamespacedName, start),
                namespace: first,
                name: local,
            })
        } else {
            JsxAttributeName::Identifier(first)
        };

        let value = if self.parse_optional(SyntaxKind::EqualsToken) {
            match self.token() {
                SyntaxKind::StringLiteral => Some(JsxAttributeValue::StringLiteral(self.parse_string_literal())),
                SyntaxKind::OpenBraceToken => {
                    Some(JsxAttributeValue::Expression(self.parse_jsx_expression_container(false)))
                }
                SyntaxKind::LessThanToken => {
                    let element_start = self.token_start();
                    match self.parse_jsx_element(element_start) {
                        Expression::JsxFragment(fragment) => Some(JsxAttributeValue::Fragment(fragment)),
                        Expression::JsxElement(element) => Some(JsxAttributeValue::Element(element)),
                        _ => None,
                    }
                }
                _ => {
                    self.error_at_current_token(&messages::_0_EXPECTED, &["{"]);
                    None
                }
            }
        } else {
            None
        };

        JsxAttribute {
            data: self.finish(SyntaxKind::JsxAttribute, start),
            name,
            value,
        }
    }

    /// `{expr}`; among children also `{...expr}` and the empty `{}`.
    fn parse_jsx_expression_container(&mut self, in_children: bool) -> JsxExpressionContainer {
        let start = self.token_start();
        self.scanner.push_mode(LexerMode::Normal);
        self.next_token();

        let mut dot_dot_dot = false;
        let expression = if in_children && self.token() == SyntaxKind::CloseBraceToken {
            None
        } else {
            dot_dot_dot = in_children && self.parse_optional(SyntaxKind::DotDotDotToken);
            Some(Box::new(self.parse_expression()))
        };
        self.parse_jsx_closing_brace();
        JsxExpressionContainer {
            data: self.finish(SyntaxKind::JsxExpression, start),
            dot_dot_dot,
            expression,
        }
    }

    /// Leave the `Normal` mode pushed at `{` and scan what follows `}` in
    /// the enclosing JSX mode.
    fn parse_jsx_closing_brace(&mut self) {
        if self.token() == SyntaxKind::CloseBraceToken {
            self.scanner.pop_mode();
            self.next_token();
        } else {
            self.error_at_current_token(&messages::_0_EXPECTED, &["}"]);
            self.scanner.pop_mode();
            self.scanner.rescan_current_token();
        }
    }

    // ========================================================================
    // Children
    // ========================================================================

    /// Children up to `</`. Leaves `JsxChildren` mode before returning.
    fn parse_jsx_children(&mut self, tag: &str) -> Vec<JsxChild> {
        let mut children = Vec::new();
        loop {
            let start = self.token_start();
            match self.token() {
                kind @ (SyntaxKind::JsxText | SyntaxKind::JsxTextAllWhiteSpaces) => {
                    let value = self.token_value().to_string();
                    self.next_token();
                    children.push(JsxChild::Text(JsxText {
                        data: self.finish(kind, start),
                        value,
                    }));
                }
                SyntaxKind::OpenBraceToken => {
                    children.push(JsxChild::Expression(self.parse_jsx_expression_container(true)));
                }
                SyntaxKind::LessThanToken => match self.parse_jsx_element(start) {
                    Expression::JsxFragment(fragment) => children.push(JsxChild::Fragment(fragment)),
                    Expression::JsxElement(element) => children.push(JsxChild::Element(element)),
                    _ => {}
                },
                SyntaxKind::LessThanSlashToken => break,
                _ => {
                    let name = if tag.is_empty() { "<>" } else { tag };
                    self.error_at_current_token(&messages::JSX_ELEMENT_0_HAS_NO_CORRESPONDING_CLOSING_TAG, &[name]);
                    break;
                }
            }
        }
        self.scanner.pop_mode();
        children
    }
}

fn tag_name_start(tag_name: &JsxTagName) -> u32 {
    match tag_name {
        JsxTagName::Identifier(id) => id.data.range.pos,
        JsxTagName::Namespaced(name) => name.data.range.pos,
        JsxTagName::Member(member) => member.data.range.pos,
    }
}

#[cfg(test)]
mod tests {
    use crate::parse_program;
    use esforge_ast::*;
    use esforge_options::{ParseOptions, Syntax};

    fn parse_jsx(source: &str, syntax: Syntax) -> (Vec<u32>, Vec<Statement>) {
        let options = ParseOptions {
            syntax,
            jsx: true,
            file_name: "input.jsx".to_string(),
            ..Default::default()
        };
        let result = parse_program(source, &options);
        let codes = result.diagnostics.iter().map(|d| d.code).collect();
        (codes, result.program.statements)
    }

    fn expression_of(statement: &Statement) -> &Expression {
        match statement {
            Statement::Expression(statement) => &statement.expression,
            other => panic!("expected expression statement, got {:?}", other.kind()),
        }
    }

    #[test]
    fn test_element_with_attributes_and_children() {
        let (codes, statements) = parse_jsx(
            "<div id=\"main\" data-x='1' {...rest} on={handler}>hi {name}<br/></div>;",
            Syntax::Ecmascript,
        );
        assert!(codes.is_empty(), "{:?}", codes);
        match expression_of(&statements[0]) {
            Expression::JsxElement(element) => {
                assert_eq!(element.opening.tag_name.text(), "div");
                assert_eq!(element.opening.attributes.len(), 4);
                match &element.opening.attributes[1] {
                    JsxAttributeLike::Attribute(attribute) => assert_eq!(attribute.name.text(), "data-x"),
                    other => panic!("expected attribute, got {:?}", other),
                }
                assert_eq!(element.children.len(), 3);
                assert!(matches!(element.children[2], JsxChild::Element(ref br) if br.opening.self_closing));
                assert!(element.closing.is_some());
            }
            other => panic!("expected element, got {:?}", other.kind()),
        }
    }

    #[test]
    fn test_fragment_and_member_tags() {
        let (codes, statements) = parse_jsx("x = <><Foo.Bar /> {/* empty */}</>;", Syntax::Ecmascript);
        assert!(codes.is_empty(), "{:?}", codes);
        match expression_of(&statements[0]) {
            Expression::Binary(assignment) => match assignment.right.as_ref() {
                Expression::JsxFragment(fragment) => {
                    assert!(matches!(fragment.children[0], JsxChild::Element(ref e) if e.opening.tag_name.text() == "Foo.Bar"));
                    assert!(matches!(fragment.children[2], JsxChild::Expression(ref c) if c.expression.is_none()));
                }
                other => panic!("expected fragment, got {:?}", other.kind()),
            },
            other => panic!("expected assignment, got {:?}", other.kind()),
        }
    }

    #[test]
    fn test_statement_after_element_is_scanned_normally() {
        let (codes, statements) = parse_jsx("let a = <b>{c}</b>\nlet d = 1 / 2;", Syntax::Ecmascript);
        assert!(codes.is_empty(), "{:?}", codes);
        assert_eq!(statements.len(), 2);
    }

    #[test]
    fn test_mismatched_closing_tag() {
        let (codes, _) = parse_jsx("<a></b>;", Syntax::Ecmascript);
        assert_eq!(codes, vec![17002]);
    }

    #[test]
    fn test_unclosed_element() {
        let (codes, _) = parse_jsx("<a>text", Syntax::Ecmascript);
        assert!(codes.contains(&17008), "{:?}", codes);
    }

    #[test]
    fn test_adjacent_top_level_elements() {
        let (codes, _) = parse_jsx("x = <a/><b/>;", Syntax::Ecmascript);
        assert_eq!(codes, vec![2657]);
    }

    #[test]
    fn test_type_arguments_on_tag() {
        let (codes, statements) = parse_jsx("<List<string> items={xs} />;", Syntax::Typescript);
        assert!(codes.is_empty(), "{:?}", codes);
        match expression_of(&statements[0]) {
            Expression::JsxElement(element) => {
                assert_eq!(element.opening.type_arguments.as_ref().map(Vec::len), Some(1));
                assert_eq!(element.opening.attributes.len(), 1);
            }
            other => panic!("expected element, got {:?}", other.kind()),
        }
    }

    #[test]
    fn test_jsx_requires_option() {
        let options = ParseOptions::default();
        let result = parse_program("<a/>;", &options);
        assert!(result.diagnostics.iter().any(|d| d.code == 17004));
    }
}
