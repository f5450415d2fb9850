//! Expressions: assignment and arrow functions, the binary operator loop,
//! unary operators, member/call chains and primary expressions.

use esforge_ast::node::*;
use esforge_ast::syntax_kind::SyntaxKind;
use esforge_ast::types::*;
use esforge_diagnostics::messages;
use esforge_scanner::LexerMode;

use crate::parser::{Parser, ParserContext, ParsingContext};
use crate::precedence::{get_binary_operator_precedence, OperatorPrecedence};
use crate::utilities::is_start_of_expression;

/// Everything of a parenthesized arrow function up to and including `=>`.
struct ArrowHead {
    is_async: bool,
    type_parameters: Option<Vec<TypeParameter>>,
    parameters: Vec<Parameter>,
    return_type: Option<TypeNode>,
    line_break_before_arrow: Option<(u32, u32)>,
}

impl Parser {
    // ========================================================================
    // Comma, assignment and conditional
    // ========================================================================

    pub(crate) fn parse_expression(&mut self) -> Expression {
        self.with_context(ParserContext::empty(), ParserContext::DECORATOR, |p| {
            let start = p.token_start();
            let mut expression = p.parse_assignment_expression();
            while p.token() == SyntaxKind::CommaToken {
                p.next_token();
                let right = p.parse_assignment_expression();
                expression = Expression::Binary(BinaryExpression {
                    data: p.finish(SyntaxKind::BinaryExpression, start),
                    left: Box::new(expression),
                    operator: SyntaxKind::CommaToken,
                    right: Box::new(right),
                });
            }
            expression
        })
    }

    pub(crate) fn parse_assignment_expression(&mut self) -> Expression {
        if !self.enter_recursion() {
            return Expression::Missing(self.skip_to_end_of_file());
        }
        let expression = self.parse_assignment_expression_worker();
        self.exit_recursion();
        expression
    }

    fn parse_assignment_expression_worker(&mut self) -> Expression {
        if self.token() == SyntaxKind::YieldKeyword && self.in_context(ParserContext::YIELD) {
            return self.parse_yield_expression();
        }
        if let Some(arrow) = self.parse_arrow_function_if_present() {
            return arrow;
        }

        let start = self.token_start();
        let expression = self.parse_binary_expression_or_higher(OperatorPrecedence::Conditional);
        let operator = self.token();
        if operator.is_assignment_operator() {
            self.check_assignment_target(&expression, operator);
            self.next_token();
            let right = self.parse_assignment_expression();
            return Expression::Binary(BinaryExpression {
                data: self.finish(SyntaxKind::BinaryExpression, start),
                left: Box::new(expression),
                operator,
                right: Box::new(right),
            });
        }
        self.parse_conditional_expression_rest(start, expression)
    }

    /// Object and array literals are destructuring targets for plain `=`
    /// only; everything else must be a reference.
    fn check_assignment_target(&mut self, target: &Expression, operator: SyntaxKind) {
        let valid = match target {
            Expression::ObjectLiteral(_) | Expression::ArrayLiteral(_) => operator == SyntaxKind::EqualsToken,
            _ => target.is_simple_assignment_target(),
        };
        if !valid {
            let range = target.range();
            self.error_at(range.pos, range.end, &messages::INVALID_LEFT_HAND_SIDE_OF_ASSIGNMENT, &[]);
        }
    }

    fn parse_conditional_expression_rest(&mut self, start: u32, condition: Expression) -> Expression {
        if self.token() != SyntaxKind::QuestionToken {
            return condition;
        }
        self.next_token();
        let when_true = self.with_context(
            ParserContext::IN_CONDITIONAL_WHEN_TRUE,
            ParserContext::DISALLOW_IN,
            Parser::parse_assignment_expression,
        );
        self.parse_expected(SyntaxKind::ColonToken);
        let when_false = self.with_context(
            ParserContext::empty(),
            ParserContext::IN_CONDITIONAL_WHEN_TRUE,
            Parser::parse_assignment_expression,
        );
        Expression::Conditional(ConditionalExpression {
            data: self.finish(SyntaxKind::ConditionalExpression, start),
            condition: Box::new(condition),
            when_true: Box::new(when_true),
            when_false: Box::new(when_false),
        })
    }

    fn parse_yield_expression(&mut self) -> Expression {
        let start = self.token_start();
        self.next_token();
        let mut delegate = false;
        let mut expression = None;
        if !self.has_preceding_line_break() {
            delegate = self.parse_optional(SyntaxKind::AsteriskToken);
            if delegate || is_start_of_expression(self.token()) {
                expression = Some(Box::new(self.parse_assignment_expression()));
            }
        }
        Expression::Yield(YieldExpression {
            data: self.finish(SyntaxKind::YieldExpression, start),
            delegate,
            expression,
        })
    }

    // ========================================================================
    // Arrow functions
    // ========================================================================

    fn parse_arrow_function_if_present(&mut self) -> Option<Expression> {
        let start = self.token_start();
        if self.is_identifier() && self.next_token_is(SyntaxKind::EqualsGreaterThanToken) {
            let parameter = self.identifier_from_token();
            return Some(self.parse_simple_arrow_function(start, false, parameter));
        }
        if self.token() == SyntaxKind::AsyncKeyword && self.is_async_simple_arrow() {
            self.next_token();
            let parameter = self.parse_identifier();
            return Some(self.parse_simple_arrow_function(start, true, parameter));
        }
        if !self.could_be_parenthesized_arrow() {
            return None;
        }

        let checkpoint = self.checkpoint();
        let head = self.try_parse(Parser::parse_parenthesized_arrow_head)?;
        if let Some((pos, end)) = head.line_break_before_arrow {
            self.error_at(pos, end, &messages::LINE_TERMINATOR_NOT_PERMITTED_BEFORE_ARROW, &[]);
        }
        let has_return_type = head.return_type.is_some();
        let arrow = self.parse_arrow_function_rest(start, head);
        // `c ? (x): y => z` without a following `:` means the colon belonged
        // to the conditional.
        if has_return_type
            && self.in_context(ParserContext::IN_CONDITIONAL_WHEN_TRUE)
            && self.token() != SyntaxKind::ColonToken
        {
            self.rewind(checkpoint);
            return None;
        }
        Some(arrow)
    }

    fn is_async_simple_arrow(&mut self) -> bool {
        self.look_ahead(|p| {
            p.next_token();
            if p.has_preceding_line_break() || !p.is_identifier() {
                return false;
            }
            p.next_token();
            p.token() == SyntaxKind::EqualsGreaterThanToken && !p.has_preceding_line_break()
        })
    }

    /// Cheap filter before speculatively parsing an arrow head.
    fn could_be_parenthesized_arrow(&mut self) -> bool {
        self.look_ahead(|p| {
            if p.token() == SyntaxKind::AsyncKeyword {
                p.next_token();
                if p.has_preceding_line_break() {
                    return false;
                }
            }
            match p.token() {
                SyntaxKind::LessThanToken => {
                    if !p.typescript {
                        return false;
                    }
                    if !p.jsx {
                        return true;
                    }
                    // In JSX files only `<T,>` and `<T extends U>` start a generic arrow.
                    p.next_token();
                    if !p.is_identifier() {
                        return false;
                    }
                    p.next_token();
                    matches!(p.token(), SyntaxKind::CommaToken | SyntaxKind::ExtendsKeyword)
                }
                SyntaxKind::OpenParenToken => match p.next_token() {
                    SyntaxKind::CloseParenToken => matches!(
                        p.next_token(),
                        SyntaxKind::EqualsGreaterThanToken | SyntaxKind::ColonToken | SyntaxKind::OpenBraceToken
                    ),
                    SyntaxKind::DotDotDotToken
                    | SyntaxKind::OpenBracketToken
                    | SyntaxKind::OpenBraceToken
                    | SyntaxKind::AtToken => true,
                    _ => {
                        if !p.is_identifier() && p.token() != SyntaxKind::ThisKeyword {
                            return false;
                        }
                        p.next_token();
                        matches!(
                            p.token(),
                            SyntaxKind::ColonToken
                                | SyntaxKind::CommaToken
                                | SyntaxKind::EqualsToken
                                | SyntaxKind::QuestionToken
                                | SyntaxKind::CloseParenToken
                        ) || p.is_identifier()
                    }
                },
                _ => false,
            }
        })
    }

    fn parse_parenthesized_arrow_head(&mut self) -> Option<ArrowHead> {
        let is_async = self.parse_optional(SyntaxKind::AsyncKeyword);
        let (set, clear) = Self::function_context(is_async, false);
        let (type_parameters, parameters) = self.with_context(set, clear, |p| {
            let type_parameters = p.parse_type_parameters();
            let parameters = p.parse_parameters();
            (type_parameters, parameters)
        });
        let return_type = self.parse_return_type();
        if self.token() != SyntaxKind::EqualsGreaterThanToken {
            return None;
        }
        let line_break_before_arrow = self
            .has_preceding_line_break()
            .then(|| (self.token_start(), self.token_end()));
        self.next_token();
        Some(ArrowHead {
            is_async,
            type_parameters,
            parameters,
            return_type,
            line_break_before_arrow,
        })
    }

    fn parse_arrow_function_rest(&mut self, start: u32, head: ArrowHead) -> Expression {
        let body = self.parse_arrow_body(head.is_async);
        Expression::Arrow(Box::new(ArrowFunction {
            data: self.finish(SyntaxKind::ArrowFunction, start),
            is_async: head.is_async,
            type_parameters: head.type_parameters,
            parameters: head.parameters,
            return_type: head.return_type,
            body,
        }))
    }

    /// `x => body` with a single unparenthesized parameter.
    fn parse_simple_arrow_function(&mut self, start: u32, is_async: bool, parameter: Identifier) -> Expression {
        let range = parameter.data.range;
        let parameter = Parameter {
            data: NodeData::new(SyntaxKind::Parameter, range.pos, range.end),
            decorators: Vec::new(),
            dot_dot_dot: false,
            name: BindingName::Identifier(parameter),
            question: false,
            type_annotation: None,
            initializer: None,
        };
        if self.token() == SyntaxKind::EqualsGreaterThanToken && self.has_preceding_line_break() {
            self.error_at_current_token(&messages::LINE_TERMINATOR_NOT_PERMITTED_BEFORE_ARROW, &[]);
        }
        self.parse_expected(SyntaxKind::EqualsGreaterThanToken);
        let body = self.parse_arrow_body(is_async);
        Expression::Arrow(Box::new(ArrowFunction {
            data: self
                .finish(SyntaxKind::ArrowFunction, start)
                .with_flags(NodeFlags::BARE_ARROW_PARAMETER),
            is_async,
            type_parameters: None,
            parameters: vec![parameter],
            return_type: None,
            body,
        }))
    }

    fn parse_arrow_body(&mut self, is_async: bool) -> ArrowBody {
        let (set, clear) = Self::function_context(is_async, false);
        if self.token() == SyntaxKind::OpenBraceToken {
            return ArrowBody::Block(self.parse_function_block(set, clear));
        }
        let expression = self.with_context(set, clear | ParserContext::DECORATOR, Parser::parse_assignment_expression);
        ArrowBody::Expression(Box::new(expression))
    }

    // ========================================================================
    // Binary operators
    // ========================================================================

    fn parse_binary_expression_or_higher(&mut self, precedence: OperatorPrecedence) -> Expression {
        let start = self.token_start();
        let left = self.parse_unary_expression_or_higher();
        self.parse_binary_expression_rest(start, precedence, left)
    }

    /// Precedence climbing. `**` is right-associative; every other operator
    /// binds only when strictly tighter than `precedence`.
    fn parse_binary_expression_rest(
        &mut self,
        start: u32,
        precedence: OperatorPrecedence,
        mut left: Expression,
    ) -> Expression {
        loop {
            self.rescan_greater_than();
            let operator = self.token();
            let new_precedence = get_binary_operator_precedence(operator);
            if new_precedence == OperatorPrecedence::Invalid {
                break;
            }
            let binds = if operator == SyntaxKind::AsteriskAsteriskToken {
                new_precedence >= precedence
            } else {
                new_precedence > precedence
            };
            if !binds {
                break;
            }
            if operator == SyntaxKind::InKeyword && self.in_context(ParserContext::DISALLOW_IN) {
                break;
            }
            if matches!(operator, SyntaxKind::AsKeyword | SyntaxKind::SatisfiesKeyword) {
                // `x\nas` starts a new statement under ASI.
                if self.has_preceding_line_break() {
                    break;
                }
                left = self.parse_as_or_satisfies(start, left, operator);
                continue;
            }
            self.next_token();
            let right = self.parse_binary_expression_or_higher(new_precedence);
            left = Expression::Binary(BinaryExpression {
                data: self.finish(SyntaxKind::BinaryExpression, start),
                left: Box::new(left),
                operator,
                right: Box::new(right),
            });
        }
        left
    }

    fn parse_as_or_satisfies(&mut self, start: u32, expression: Expression, operator: SyntaxKind) -> Expression {
        let keyword_start = self.token_start();
        self.next_token();
        let message = if operator == SyntaxKind::AsKeyword {
            &messages::TYPE_ASSERTION_EXPRESSIONS_CAN_ONLY_BE_USED_IN_TYPESCRIPT_FILES
        } else {
            &messages::TYPE_SATISFACTION_EXPRESSIONS_CAN_ONLY_BE_USED_IN_TYPESCRIPT_FILES
        };
        let type_node = if self.token() == SyntaxKind::ConstKeyword {
            // `as const` is a reference to the pseudo-type `const`.
            let name = self.identifier_from_token();
            TypeNode::Reference(TypeReference {
                data: NodeData::new(SyntaxKind::TypeReference, name.data.range.pos, name.data.range.end),
                type_name: EntityName::Identifier(name),
                type_arguments: None,
            })
        } else {
            self.parse_type()
        };
        self.check_typescript_syntax(keyword_start, message, &[]);
        let expression = Box::new(expression);
        let type_node = Box::new(type_node);
        if operator == SyntaxKind::AsKeyword {
            Expression::As(AsExpression {
                data: self.finish(SyntaxKind::AsExpression, start),
                expression,
                type_node,
            })
        } else {
            Expression::Satisfies(SatisfiesExpression {
                data: self.finish(SyntaxKind::SatisfiesExpression, start),
                expression,
                type_node,
            })
        }
    }

    // ========================================================================
    // Unary operators
    // ========================================================================

    fn parse_unary_expression_or_higher(&mut self) -> Expression {
        if !self.enter_recursion() {
            return Expression::Missing(self.skip_to_end_of_file());
        }
        let expression = self.parse_unary_expression_worker();
        self.exit_recursion();
        expression
    }

    fn parse_unary_expression_worker(&mut self) -> Expression {
        let start = self.token_start();
        match self.token() {
            SyntaxKind::PlusToken
            | SyntaxKind::MinusToken
            | SyntaxKind::TildeToken
            | SyntaxKind::ExclamationToken
            | SyntaxKind::TypeOfKeyword
            | SyntaxKind::VoidKeyword
            | SyntaxKind::DeleteKeyword
            | SyntaxKind::PlusPlusToken
            | SyntaxKind::MinusMinusToken => {
                let operator = self.token();
                self.next_token();
                let operand = self.parse_unary_expression_or_higher();
                Expression::PrefixUnary(PrefixUnaryExpression {
                    data: self.finish(SyntaxKind::PrefixUnaryExpression, start),
                    operator,
                    operand: Box::new(operand),
                })
            }
            SyntaxKind::AwaitKeyword if self.in_context(ParserContext::AWAIT) => {
                self.next_token();
                let expression = self.parse_unary_expression_or_higher();
                Expression::Await(AwaitExpression {
                    data: self.finish(SyntaxKind::AwaitExpression, start),
                    expression: Box::new(expression),
                })
            }
            SyntaxKind::LessThanToken if self.typescript && !self.jsx => self.parse_type_assertion(),
            SyntaxKind::LessThanToken => self.parse_jsx_element_or_fragment(),
            _ => self.parse_update_expression(),
        }
    }

    fn parse_update_expression(&mut self) -> Expression {
        let start = self.token_start();
        let expression = self.parse_left_hand_side_expression_or_higher();
        if matches!(self.token(), SyntaxKind::PlusPlusToken | SyntaxKind::MinusMinusToken)
            && !self.has_preceding_line_break()
        {
            let operator = self.token();
            self.next_token();
            return Expression::PostfixUnary(PostfixUnaryExpression {
                data: self.finish(SyntaxKind::PostfixUnaryExpression, start),
                operand: Box::new(expression),
                operator,
            });
        }
        expression
    }

    /// `<T>expr`, only in TypeScript files without JSX.
    fn parse_type_assertion(&mut self) -> Expression {
        let start = self.token_start();
        self.parse_expected(SyntaxKind::LessThanToken);
        let type_node = self.parse_type();
        self.parse_expected(SyntaxKind::GreaterThanToken);
        let expression = self.parse_unary_expression_or_higher();
        Expression::TypeAssertion(TypeAssertion {
            data: self.finish(SyntaxKind::TypeAssertionExpression, start),
            type_node: Box::new(type_node),
            expression: Box::new(expression),
        })
    }

    // ========================================================================
    // Member and call chains
    // ========================================================================

    pub(crate) fn parse_left_hand_side_expression_or_higher(&mut self) -> Expression {
        let start = self.token_start();
        let expression = self.parse_primary_expression();
        self.parse_member_or_call_rest(start, expression, true)
    }

    /// Property access, element access, non-null assertions, tagged
    /// templates and, when `allow_calls`, call arguments. Every link after
    /// the first `?.` carries `OPTIONAL_CHAIN`.
    fn parse_member_or_call_rest(&mut self, start: u32, mut expression: Expression, allow_calls: bool) -> Expression {
        let mut in_optional_chain = false;
        loop {
            let question_dot = self.parse_optional(SyntaxKind::QuestionDotToken);
            in_optional_chain |= question_dot;
            let chain_flags = if in_optional_chain {
                NodeFlags::OPTIONAL_CHAIN
            } else {
                NodeFlags::NONE
            };

            match self.token() {
                SyntaxKind::DotToken if !question_dot => {
                    self.next_token();
                    let name = self.parse_member_name();
                    expression = Expression::PropertyAccess(PropertyAccessExpression {
                        data: self.finish(SyntaxKind::PropertyAccessExpression, start).with_flags(chain_flags),
                        expression: Box::new(expression),
                        question_dot,
                        name,
                    });
                }
                kind if question_dot && (kind.is_identifier_or_keyword() || kind == SyntaxKind::PrivateIdentifier) => {
                    let name = self.parse_member_name();
                    expression = Expression::PropertyAccess(PropertyAccessExpression {
                        data: self.finish(SyntaxKind::PropertyAccessExpression, start).with_flags(chain_flags),
                        expression: Box::new(expression),
                        question_dot,
                        name,
                    });
                }
                SyntaxKind::OpenBracketToken if question_dot || !self.in_context(ParserContext::DECORATOR) => {
                    self.next_token();
                    let argument =
                        self.with_context(ParserContext::empty(), ParserContext::DISALLOW_IN, Parser::parse_expression);
                    self.parse_expected(SyntaxKind::CloseBracketToken);
                    expression = Expression::ElementAccess(ElementAccessExpression {
                        data: self.finish(SyntaxKind::ElementAccessExpression, start).with_flags(chain_flags),
                        expression: Box::new(expression),
                        question_dot,
                        argument: Box::new(argument),
                    });
                }
                SyntaxKind::ExclamationToken if !question_dot && !self.has_preceding_line_break() => {
                    let bang = self.token_start();
                    self.next_token();
                    self.check_typescript_syntax(
                        bang,
                        &messages::NON_NULL_ASSERTIONS_CAN_ONLY_BE_USED_IN_TYPESCRIPT_FILES,
                        &[],
                    );
                    expression = Expression::NonNull(NonNullExpression {
                        data: self.finish(SyntaxKind::NonNullExpression, start).with_flags(chain_flags),
                        expression: Box::new(expression),
                    });
                }
                SyntaxKind::NoSubstitutionTemplateLiteral | SyntaxKind::TemplateHead if !question_dot => {
                    expression = self.parse_tagged_template_rest(start, expression, None);
                }
                SyntaxKind::OpenParenToken if allow_calls => {
                    let arguments = self.parse_arguments();
                    expression = Expression::Call(CallExpression {
                        data: self.finish(SyntaxKind::CallExpression, start).with_flags(chain_flags),
                        expression: Box::new(expression),
                        question_dot,
                        type_arguments: None,
                        arguments,
                    });
                }
                SyntaxKind::LessThanToken if allow_calls && self.typescript => {
                    let Some(type_arguments) = self.try_parse(|p| {
                        let arguments = p.parse_type_arguments_in_expression()?;
                        matches!(
                            p.token(),
                            SyntaxKind::OpenParenToken
                                | SyntaxKind::NoSubstitutionTemplateLiteral
                                | SyntaxKind::TemplateHead
                        )
                        .then_some(arguments)
                    }) else {
                        if question_dot {
                            self.error_at_current_token(&messages::IDENTIFIER_EXPECTED, &[]);
                        }
                        break;
                    };
                    if self.token() == SyntaxKind::OpenParenToken {
                        let arguments = self.parse_arguments();
                        expression = Expression::Call(CallExpression {
                            data: self.finish(SyntaxKind::CallExpression, start).with_flags(chain_flags),
                            expression: Box::new(expression),
                            question_dot,
                            type_arguments: Some(type_arguments),
                            arguments,
                        });
                    } else {
                        expression = self.parse_tagged_template_rest(start, expression, Some(type_arguments));
                    }
                }
                _ if question_dot => {
                    let name = self.missing_identifier(&messages::IDENTIFIER_EXPECTED);
                    expression = Expression::PropertyAccess(PropertyAccessExpression {
                        data: self.finish(SyntaxKind::PropertyAccessExpression, start).with_flags(chain_flags),
                        expression: Box::new(expression),
                        question_dot,
                        name,
                    });
                }
                _ => break,
            }
        }
        expression
    }

    fn parse_member_name(&mut self) -> Identifier {
        if self.token() == SyntaxKind::PrivateIdentifier {
            return self.parse_private_identifier();
        }
        self.parse_identifier_name()
    }

    fn parse_tagged_template_rest(
        &mut self,
        start: u32,
        tag: Expression,
        type_arguments: Option<Vec<TypeNode>>,
    ) -> Expression {
        let template = self.parse_template_literal(true);
        Expression::TaggedTemplate(TaggedTemplateExpression {
            data: self.finish(SyntaxKind::TaggedTemplateExpression, start),
            tag: Box::new(tag),
            type_arguments,
            template,
        })
    }

    fn parse_arguments(&mut self) -> Vec<Expression> {
        self.with_context(ParserContext::empty(), ParserContext::DISALLOW_IN, |p| {
            p.parse_bracketed_list(
                ParsingContext::ArgumentExpressions,
                Parser::parse_argument_or_array_element,
                SyntaxKind::OpenParenToken,
                SyntaxKind::CloseParenToken,
            )
        })
    }

    fn parse_argument_or_array_element(&mut self) -> Expression {
        if self.token() != SyntaxKind::DotDotDotToken {
            return self.parse_assignment_expression();
        }
        let start = self.token_start();
        self.next_token();
        let expression = self.parse_assignment_expression();
        Expression::Spread(SpreadElement {
            data: self.finish(SyntaxKind::SpreadElement, start),
            expression: Box::new(expression),
        })
    }

    // ========================================================================
    // Primary expressions
    // ========================================================================

    fn parse_primary_expression(&mut self) -> Expression {
        let start = self.token_start();
        match self.token() {
            SyntaxKind::NumericLiteral => Expression::NumericLiteral(self.parse_numeric_literal()),
            SyntaxKind::BigIntLiteral => Expression::BigIntLiteral(self.parse_bigint_literal()),
            SyntaxKind::StringLiteral => Expression::StringLiteral(self.parse_string_literal()),
            SyntaxKind::NoSubstitutionTemplateLiteral | SyntaxKind::TemplateHead => {
                Expression::Template(self.parse_template_literal(false))
            }
            SyntaxKind::ThisKeyword => {
                self.next_token();
                Expression::This(self.finish(SyntaxKind::ThisKeyword, start))
            }
            SyntaxKind::SuperKeyword => {
                self.next_token();
                Expression::Super(self.finish(SyntaxKind::SuperKeyword, start))
            }
            SyntaxKind::NullKeyword => {
                self.next_token();
                Expression::Null(self.finish(SyntaxKind::NullKeyword, start))
            }
            SyntaxKind::TrueKeyword | SyntaxKind::FalseKeyword => {
                let kind = self.token();
                self.next_token();
                Expression::Boolean(BooleanLiteral {
                    data: self.finish(kind, start),
                    value: kind == SyntaxKind::TrueKeyword,
                })
            }
            SyntaxKind::ImportKeyword => self.parse_import_call_or_meta(start),
            SyntaxKind::OpenParenToken => self.parse_parenthesized_expression(start),
            SyntaxKind::OpenBracketToken => self.parse_array_literal(start),
            SyntaxKind::OpenBraceToken => self.parse_object_literal(start),
            SyntaxKind::AsyncKeyword if self.next_token_is_function_on_same_line() => {
                self.next_token();
                self.parse_function_expression(start, true)
            }
            SyntaxKind::FunctionKeyword => self.parse_function_expression(start, false),
            SyntaxKind::ClassKeyword => Expression::Class(Box::new(self.parse_class_like(
                start,
                ModifierFlags::NONE,
                Vec::new(),
                SyntaxKind::ClassExpression,
            ))),
            SyntaxKind::AtToken => {
                let decorators = self.parse_decorators();
                if self.token() == SyntaxKind::ClassKeyword {
                    return Expression::Class(Box::new(self.parse_class_like(
                        start,
                        ModifierFlags::NONE,
                        decorators,
                        SyntaxKind::ClassExpression,
                    )));
                }
                let end = self.prev_token_end();
                self.error_at(start, end, &messages::DECORATORS_ARE_NOT_VALID_HERE, &[]);
                self.parse_primary_expression()
            }
            SyntaxKind::NewKeyword => self.parse_new_expression(start),
            SyntaxKind::SlashToken | SyntaxKind::SlashEqualsToken => self.parse_regular_expression_literal(start),
            SyntaxKind::PrivateIdentifier => Expression::PrivateIdentifier(self.parse_private_identifier()),
            _ if self.is_identifier() => Expression::Identifier(self.identifier_from_token()),
            _ => self.missing_expression(&messages::EXPRESSION_EXPECTED),
        }
    }

    /// `import(...)` leaves the callee for the call chain; `import.meta` is
    /// a meta property.
    fn parse_import_call_or_meta(&mut self, start: u32) -> Expression {
        self.next_token();
        if self.parse_optional(SyntaxKind::DotToken) {
            let name = self.parse_identifier_name();
            return Expression::MetaProperty(MetaProperty {
                data: self.finish(SyntaxKind::MetaProperty, start),
                keyword: SyntaxKind::ImportKeyword,
                name,
            });
        }
        if self.token() != SyntaxKind::OpenParenToken {
            self.error_at_current_token(&messages::_0_EXPECTED, &["("]);
        }
        Expression::Import(self.finish(SyntaxKind::ImportKeyword, start))
    }

    fn parse_parenthesized_expression(&mut self, start: u32) -> Expression {
        self.next_token();
        let expression = self.with_context(ParserContext::empty(), ParserContext::DISALLOW_IN, Parser::parse_expression);
        self.parse_expected(SyntaxKind::CloseParenToken);
        Expression::Parenthesized(ParenthesizedExpression {
            data: self.finish(SyntaxKind::ParenthesizedExpression, start),
            expression: Box::new(expression),
        })
    }

    fn parse_function_expression(&mut self, start: u32, is_async: bool) -> Expression {
        self.parse_expected(SyntaxKind::FunctionKeyword);
        let is_generator = self.parse_optional(SyntaxKind::AsteriskToken);
        let (set, clear) = Self::function_context(is_async, is_generator);
        let name = self.with_context(set, clear, |p| p.is_identifier().then(|| p.identifier_from_token()));
        let function = self.parse_function_rest(
            start,
            SyntaxKind::FunctionExpression,
            name,
            is_async,
            is_generator,
            ModifierFlags::NONE,
        );
        Expression::Function(Box::new(function))
    }

    fn parse_new_expression(&mut self, start: u32) -> Expression {
        self.next_token();
        if self.parse_optional(SyntaxKind::DotToken) {
            let name = self.parse_identifier_name();
            return Expression::MetaProperty(MetaProperty {
                data: self.finish(SyntaxKind::MetaProperty, start),
                keyword: SyntaxKind::NewKeyword,
                name,
            });
        }
        let callee_start = self.token_start();
        let callee = self.parse_primary_expression();
        let callee = self.parse_member_or_call_rest(callee_start, callee, false);
        let type_arguments = if self.typescript && self.token() == SyntaxKind::LessThanToken {
            self.try_parse(|p| {
                let arguments = p.parse_type_arguments_in_expression()?;
                (p.token() == SyntaxKind::OpenParenToken).then_some(arguments)
            })
        } else {
            None
        };
        let arguments = (self.token() == SyntaxKind::OpenParenToken).then(|| self.parse_arguments());
        Expression::New(NewExpression {
            data: self.finish(SyntaxKind::NewExpression, start),
            expression: Box::new(callee),
            type_arguments,
            arguments,
        })
    }

    fn parse_regular_expression_literal(&mut self, start: u32) -> Expression {
        self.scanner.rescan_slash_token();
        let text = self.token_value().to_string();
        let body = text.strip_prefix('/').unwrap_or(&text);
        let (pattern, flags) = match body.rfind('/') {
            Some(index) => (&body[..index], &body[index + 1..]),
            None => (body, ""),
        };
        let (pattern, flags) = (pattern.to_string(), flags.to_string());
        self.next_token();
        Expression::RegularExpressionLiteral(RegularExpressionLiteral {
            data: self.finish(SyntaxKind::RegularExpressionLiteral, start),
            pattern,
            flags,
        })
    }

    // ========================================================================
    // Templates
    // ========================================================================

    /// Untagged templates must cook every escape; tagged templates keep the
    /// raw text and a `None` cooked value instead.
    pub(crate) fn parse_template_literal(&mut self, tagged: bool) -> TemplateLiteral {
        let start = self.token_start();
        if self.token() == SyntaxKind::NoSubstitutionTemplateLiteral {
            let quasi = self.parse_template_element(tagged);
            return TemplateLiteral {
                data: self.finish(SyntaxKind::NoSubstitutionTemplateLiteral, start),
                quasis: vec![quasi],
                expressions: Vec::new(),
            };
        }

        let mut quasis = vec![self.parse_template_element(tagged)];
        let mut expressions = Vec::new();
        loop {
            expressions.push(self.with_context(
                ParserContext::empty(),
                ParserContext::DISALLOW_IN,
                Parser::parse_expression,
            ));
            match self.token() {
                SyntaxKind::TemplateMiddle => quasis.push(self.parse_template_element(tagged)),
                SyntaxKind::TemplateTail => {
                    quasis.push(self.parse_template_element(tagged));
                    break;
                }
                _ => {
                    quasis.push(self.missing_template_tail());
                    break;
                }
            }
        }
        TemplateLiteral {
            data: self.finish(SyntaxKind::TemplateExpression, start),
            quasis,
            expressions,
        }
    }

    /// A substitution not followed by `}`: report it and leave the template.
    pub(crate) fn missing_template_tail(&mut self) -> TemplateElement {
        self.error_at_current_token(&messages::_0_EXPECTED, &["}"]);
        if matches!(self.scanner.mode(), LexerMode::TemplateHole { .. }) {
            self.scanner.pop_mode();
        }
        let pos = self.token_start();
        TemplateElement {
            data: NodeData::new(SyntaxKind::TemplateTail, pos, pos).with_flags(NodeFlags::THIS_NODE_HAS_ERROR),
            raw: String::new(),
            cooked: Some(String::new()),
        }
    }

    pub(crate) fn parse_template_element(&mut self, tagged: bool) -> TemplateElement {
        let start = self.token_start();
        let kind = self.token();
        let raw = self.scanner.template_raw().to_string();
        let cooked = if self.scanner.token_flags().contains(TokenFlags::CONTAINS_INVALID_ESCAPE) {
            if !tagged {
                self.error_at_current_token(&messages::INVALID_ESCAPE_SEQUENCE_IN_TEMPLATE, &[]);
            }
            None
        } else {
            Some(self.token_value().to_string())
        };
        self.next_token();
        TemplateElement {
            data: self.finish(kind, start),
            raw,
            cooked,
        }
    }

    // ========================================================================
    // Array and object literals
    // ========================================================================

    fn parse_array_literal(&mut self, start: u32) -> Expression {
        self.next_token();
        let mut elements = Vec::new();
        self.with_context(ParserContext::empty(), ParserContext::DISALLOW_IN, |p| loop {
            match p.token() {
                SyntaxKind::CloseBracketToken | SyntaxKind::EndOfFileToken => break,
                SyntaxKind::CommaToken => {
                    let pos = p.token_start();
                    elements.push(Expression::Omitted(NodeData::new(SyntaxKind::OmittedExpression, pos, pos)));
                    p.next_token();
                }
                _ if p.is_list_element_start(ParsingContext::ArrayLiteralMembers) => {
                    elements.push(p.parse_argument_or_array_element());
                    if p.token() != SyntaxKind::CloseBracketToken && !p.parse_expected(SyntaxKind::CommaToken) {
                        break;
                    }
                }
                _ => {
                    p.error_at_current_token(&messages::EXPRESSION_EXPECTED, &[]);
                    break;
                }
            }
        });
        self.parse_expected(SyntaxKind::CloseBracketToken);
        Expression::ArrayLiteral(ArrayLiteralExpression {
            data: self.finish(SyntaxKind::ArrayLiteralExpression, start),
            elements,
        })
    }

    fn parse_object_literal(&mut self, start: u32) -> Expression {
        let properties = self.with_context(ParserContext::empty(), ParserContext::DISALLOW_IN, |p| {
            p.parse_bracketed_list(
                ParsingContext::ObjectLiteralMembers,
                Parser::parse_object_literal_element,
                SyntaxKind::OpenBraceToken,
                SyntaxKind::CloseBraceToken,
            )
        });
        Expression::ObjectLiteral(ObjectLiteralExpression {
            data: self.finish(SyntaxKind::ObjectLiteralExpression, start),
            properties,
        })
    }

    fn parse_object_literal_element(&mut self) -> ObjectLiteralElement {
        let start = self.token_start();
        if self.parse_optional(SyntaxKind::DotDotDotToken) {
            let expression = self.parse_assignment_expression();
            return ObjectLiteralElement::Spread(SpreadAssignment {
                data: self.finish(SyntaxKind::SpreadAssignment, start),
                expression,
            });
        }

        let is_async = self.token() == SyntaxKind::AsyncKeyword
            && self.look_ahead(|p| {
                p.next_token();
                !p.has_preceding_line_break()
                    && (p.token() == SyntaxKind::AsteriskToken || Parser::is_property_name_start(p.token()))
            });
        if is_async {
            self.next_token();
        }
        let is_generator = self.parse_optional(SyntaxKind::AsteriskToken);
        let method_kind = if is_async || is_generator {
            MethodKind::Method
        } else {
            self.parse_accessor_kind()
        };

        let name_is_identifier = self.is_identifier();
        let name = self.parse_property_name();
        let question = self.parse_optional_question_token();

        if is_async
            || is_generator
            || method_kind != MethodKind::Method
            || matches!(self.token(), SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken)
        {
            let kind = match method_kind {
                MethodKind::Method => SyntaxKind::MethodDeclaration,
                MethodKind::Get => SyntaxKind::GetAccessor,
                MethodKind::Set => SyntaxKind::SetAccessor,
            };
            let function = self.parse_function_rest(start, kind, None, is_async, is_generator, ModifierFlags::NONE);
            return ObjectLiteralElement::Method(MethodDeclaration {
                data: self.finish(kind, start),
                decorators: Vec::new(),
                kind: method_kind,
                name,
                question,
                function,
            });
        }

        let name = match name {
            PropertyName::Identifier(name) if name_is_identifier && self.token() != SyntaxKind::ColonToken => name,
            name => {
                self.parse_expected(SyntaxKind::ColonToken);
                let initializer = self.parse_assignment_expression();
                return ObjectLiteralElement::Property(PropertyAssignment {
                    data: self.finish(SyntaxKind::PropertyAssignment, start),
                    name,
                    initializer,
                });
            }
        };
        let object_assignment_initializer = if self.parse_optional(SyntaxKind::EqualsToken) {
            Some(Box::new(self.parse_assignment_expression()))
        } else {
            None
        };
        ObjectLiteralElement::Shorthand(ShorthandPropertyAssignment {
            data: self
                .finish(SyntaxKind::ShorthandPropertyAssignment, start)
                .with_flags(NodeFlags::SHORTHAND),
            name,
            object_assignment_initializer,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::parse_program;
    use esforge_ast::*;
    use esforge_options::{ParseOptions, Syntax};

    fn parse_with(source: &str, syntax: Syntax) -> (Vec<u32>, Expression) {
        let options = ParseOptions {
            syntax,
            file_name: "input.ts".to_string(),
            ..Default::default()
        };
        let mut result = parse_program(source, &options);
        let codes = result.diagnostics.iter().map(|d| d.code).collect();
        match result.program.statements.remove(0) {
            Statement::Expression(statement) => (codes, statement.expression),
            other => panic!("expected expression statement, got {:?}", other.kind()),
        }
    }

    fn parse_expr(source: &str) -> Expression {
        let (codes, expression) = parse_with(source, Syntax::Typescript);
        assert!(codes.is_empty(), "unexpected diagnostics {:?} for {}", codes, source);
        expression
    }

    fn binary(expression: &Expression) -> &BinaryExpression {
        match expression {
            Expression::Binary(binary) => binary,
            other => panic!("expected binary expression, got {:?}", other.kind()),
        }
    }

    // === Precedence ===

    #[test]
    fn test_multiplication_binds_tighter_than_addition() {
        let expression = parse_expr("1 + 2 * 3;");
        let sum = binary(&expression);
        assert_eq!(sum.operator, SyntaxKind::PlusToken);
        assert_eq!(binary(&sum.right).operator, SyntaxKind::AsteriskToken);
    }

    #[test]
    fn test_exponent_is_right_associative() {
        let expression = parse_expr("a ** b ** c;");
        let outer = binary(&expression);
        assert!(matches!(*outer.left, Expression::Identifier(_)));
        assert_eq!(binary(&outer.right).operator, SyntaxKind::AsteriskAsteriskToken);
    }

    #[test]
    fn test_shift_is_rescanned_from_greater_than() {
        let expression = parse_expr("a >>> b;");
        assert_eq!(binary(&expression).operator, SyntaxKind::GreaterThanGreaterThanGreaterThanToken);
    }

    #[test]
    fn test_assignment_is_right_associative() {
        let expression = parse_expr("a = b = c;");
        let outer = binary(&expression);
        assert_eq!(outer.operator, SyntaxKind::EqualsToken);
        assert_eq!(binary(&outer.right).operator, SyntaxKind::EqualsToken);
    }

    // === Arrow functions ===

    #[test]
    fn test_arrow_forms() {
        assert!(matches!(parse_expr("x => x;"), Expression::Arrow(_)));
        assert!(matches!(parse_expr("async (a, b) => a;"), Expression::Arrow(ref f) if f.is_async));
        assert!(matches!(parse_expr("<T,>(a: T): T => a;"), Expression::Arrow(_)));
        assert!(matches!(parse_expr("(a);"), Expression::Parenthesized(_)));
        assert!(matches!(parse_expr("async(a);"), Expression::Call(_)));
    }

    #[test]
    fn test_arrow_return_type_inside_conditional() {
        let expression = parse_expr("c ? (x) : y;");
        assert!(matches!(expression, Expression::Conditional(_)));
    }

    #[test]
    fn test_line_break_before_arrow_is_reported() {
        let (codes, _) = parse_with("(a)\n=> a;", Syntax::Typescript);
        assert!(codes.contains(&1200));
    }

    // === Member chains ===

    #[test]
    fn test_optional_chain_flags() {
        let expression = parse_expr("a?.b.c();");
        match &expression {
            Expression::Call(call) => {
                assert!(call.data.flags.contains(NodeFlags::OPTIONAL_CHAIN));
                assert!(!call.question_dot);
            }
            other => panic!("expected call, got {:?}", other.kind()),
        }
    }

    #[test]
    fn test_generic_call_versus_comparison() {
        assert!(matches!(parse_expr("f<T>(x);"), Expression::Call(ref c) if c.type_arguments.is_some()));
        assert!(matches!(parse_expr("a < b;"), Expression::Binary(_)));
    }

    #[test]
    fn test_new_without_arguments() {
        match parse_expr("new Foo.Bar;") {
            Expression::New(new) => {
                assert!(new.arguments.is_none());
                assert!(matches!(*new.expression, Expression::PropertyAccess(_)));
            }
            other => panic!("expected new, got {:?}", other.kind()),
        }
    }

    #[test]
    fn test_tagged_template_keeps_invalid_escape_raw() {
        match parse_expr(r"tag`\unicode`;") {
            Expression::TaggedTemplate(tagged) => {
                assert_eq!(tagged.template.quasis[0].raw, r"\unicode");
                assert!(tagged.template.quasis[0].cooked.is_none());
            }
            other => panic!("expected tagged template, got {:?}", other.kind()),
        }
    }

    // === Literals ===

    #[test]
    fn test_regular_expression_pattern_and_flags() {
        match parse_expr("/a[/]b/gi;") {
            Expression::RegularExpressionLiteral(regex) => {
                assert_eq!(regex.pattern, "a[/]b");
                assert_eq!(regex.flags, "gi");
            }
            other => panic!("expected regex, got {:?}", other.kind()),
        }
    }

    #[test]
    fn test_array_holes() {
        match parse_expr("[, a, , ...b,];") {
            Expression::ArrayLiteral(array) => {
                let kinds: Vec<SyntaxKind> = array.elements.iter().map(|e| e.kind()).collect();
                assert_eq!(
                    kinds,
                    vec![
                        SyntaxKind::OmittedExpression,
                        SyntaxKind::Identifier,
                        SyntaxKind::OmittedExpression,
                        SyntaxKind::SpreadElement,
                    ]
                );
            }
            other => panic!("expected array, got {:?}", other.kind()),
        }
    }

    #[test]
    fn test_object_literal_members() {
        match parse_expr("({ a, b: 1, [c]: 2, ...d, get e() { return 1 }, async *f() {}, g = 1 } = x);") {
            Expression::Parenthesized(paren) => {
                let object = match &*paren.expression {
                    Expression::Binary(assign) => match &*assign.left {
                        Expression::ObjectLiteral(object) => object,
                        other => panic!("expected object, got {:?}", other.kind()),
                    },
                    other => panic!("expected assignment, got {:?}", other.kind()),
                };
                assert_eq!(object.properties.len(), 7);
                assert!(matches!(object.properties[4], ObjectLiteralElement::Method(ref m) if m.kind == MethodKind::Get));
                assert!(matches!(
                    object.properties[6],
                    ObjectLiteralElement::Shorthand(ref s) if s.object_assignment_initializer.is_some()
                ));
            }
            other => panic!("expected parenthesized, got {:?}", other.kind()),
        }
    }

    // === Errors ===

    #[test]
    fn test_invalid_assignment_target() {
        let (codes, _) = parse_with("a + b = c;", Syntax::Typescript);
        assert_eq!(codes, vec![2364]);
    }

    #[test]
    fn test_type_only_syntax_reported_in_javascript() {
        let (codes, _) = parse_with("x as any;", Syntax::Ecmascript);
        assert_eq!(codes, vec![8016]);
        let (codes, _) = parse_with("x!;", Syntax::Ecmascript);
        assert_eq!(codes, vec![8013]);
    }
}
