//! TypeScript type syntax. Types are parsed in full so they can be stripped
//! or printed; nothing here checks them.

use esforge_ast::node::*;
use esforge_ast::syntax_kind::SyntaxKind;
use esforge_ast::types::*;
use esforge_diagnostics::messages;

use crate::parser::{Parser, ParserContext, ParsingContext};

impl Parser {
    // ========================================================================
    // Annotations, parameters and arguments
    // ========================================================================

    pub(crate) fn parse_type_annotation(&mut self) -> Option<TypeNode> {
        if self.token() != SyntaxKind::ColonToken {
            return None;
        }
        let start = self.token_start();
        self.next_token();
        let type_node = self.parse_type();
        self.check_typescript_syntax(start, &messages::TYPE_ANNOTATIONS_CAN_ONLY_BE_USED_IN_TYPESCRIPT_FILES, &[]);
        Some(type_node)
    }

    pub(crate) fn parse_return_type(&mut self) -> Option<TypeNode> {
        if self.token() != SyntaxKind::ColonToken {
            return None;
        }
        let start = self.token_start();
        self.next_token();
        let type_node = self.parse_type_or_type_predicate();
        self.check_typescript_syntax(start, &messages::TYPE_ANNOTATIONS_CAN_ONLY_BE_USED_IN_TYPESCRIPT_FILES, &[]);
        Some(type_node)
    }

    pub(crate) fn parse_type_parameters(&mut self) -> Option<Vec<TypeParameter>> {
        if self.token() != SyntaxKind::LessThanToken {
            return None;
        }
        let start = self.token_start();
        let parameters = self.parse_bracketed_list(
            ParsingContext::TypeParameters,
            Parser::parse_type_parameter,
            SyntaxKind::LessThanToken,
            SyntaxKind::GreaterThanToken,
        );
        self.check_typescript_syntax(
            start,
            &messages::TYPE_PARAMETER_DECLARATIONS_CAN_ONLY_BE_USED_IN_TYPESCRIPT_FILES,
            &[],
        );
        Some(parameters)
    }

    fn parse_type_parameter(&mut self) -> TypeParameter {
        let start = self.token_start();
        let mut modifiers = ModifierFlags::NONE;
        loop {
            let flag = match self.token() {
                SyntaxKind::InKeyword => ModifierFlags::IN,
                SyntaxKind::ConstKeyword => ModifierFlags::CONST,
                // `<out>` names a parameter `out`.
                SyntaxKind::OutKeyword if self.look_ahead(|p| {
                    p.next_token();
                    p.is_identifier()
                }) =>
                {
                    ModifierFlags::OUT
                }
                _ => break,
            };
            self.next_token();
            modifiers |= flag;
        }
        let name = self.parse_identifier();
        let constraint = if self.parse_optional(SyntaxKind::ExtendsKeyword) {
            Some(Box::new(self.parse_type()))
        } else {
            None
        };
        let default = if self.parse_optional(SyntaxKind::EqualsToken) {
            Some(Box::new(self.parse_type()))
        } else {
            None
        };
        TypeParameter {
            data: self.finish(SyntaxKind::TypeParameter, start).with_modifiers(modifiers),
            name,
            constraint,
            default,
        }
    }

    pub(crate) fn parse_type_arguments(&mut self) -> Option<Vec<TypeNode>> {
        if self.token() != SyntaxKind::LessThanToken {
            return None;
        }
        let start = self.token_start();
        let arguments = self.with_context(ParserContext::empty(), ParserContext::DISALLOW_CONDITIONAL_TYPES, |p| {
            p.parse_bracketed_list(
                ParsingContext::TypeArguments,
                Parser::parse_type,
                SyntaxKind::LessThanToken,
                SyntaxKind::GreaterThanToken,
            )
        });
        self.check_typescript_syntax(start, &messages::TYPE_ARGUMENTS_CAN_ONLY_BE_USED_IN_TYPESCRIPT_FILES, &[]);
        Some(arguments)
    }

    /// Type arguments in an expression (`f<T>(x)`). Meant to run under
    /// `try_parse`: any error or a missing `>` abandons the attempt.
    pub(crate) fn parse_type_arguments_in_expression(&mut self) -> Option<Vec<TypeNode>> {
        if self.token() != SyntaxKind::LessThanToken {
            return None;
        }
        self.next_token();
        let arguments = self.with_context(ParserContext::empty(), ParserContext::DISALLOW_CONDITIONAL_TYPES, |p| {
            p.parse_delimited_list(ParsingContext::TypeArguments, Parser::parse_type, false)
        });
        if self.token() != SyntaxKind::GreaterThanToken {
            return None;
        }
        self.next_token();
        Some(arguments)
    }

    /// `A`, `A.B.C`. Names after a dot may be reserved words when
    /// `allow_reserved_words` is set (type positions).
    pub(crate) fn parse_entity_name(&mut self, allow_reserved_words: bool) -> EntityName {
        let start = self.token_start();
        let first = if allow_reserved_words && self.token() == SyntaxKind::ThisKeyword {
            self.identifier_from_token()
        } else {
            self.parse_identifier()
        };
        let mut name = EntityName::Identifier(first);
        while self.parse_optional(SyntaxKind::DotToken) {
            let right = if allow_reserved_words {
                self.parse_identifier_name()
            } else {
                self.parse_identifier()
            };
            name = EntityName::Qualified(Box::new(QualifiedName {
                data: self.finish(SyntaxKind::QualifiedName, start),
                left: name,
                right,
            }));
        }
        name
    }

    // ========================================================================
    // Types
    // ========================================================================

    pub(crate) fn parse_type(&mut self) -> TypeNode {
        if !self.enter_recursion() {
            return TypeNode::Missing(self.skip_to_end_of_file());
        }
        let type_node = self.parse_type_worker();
        self.exit_recursion();
        type_node
    }

    fn parse_type_worker(&mut self) -> TypeNode {
        if self.is_start_of_function_or_constructor_type() {
            return self.parse_function_or_constructor_type();
        }
        let start = self.token_start();
        let check_type = self.parse_union_type_or_higher();
        if self.in_context(ParserContext::DISALLOW_CONDITIONAL_TYPES)
            || self.has_preceding_line_break()
            || !self.parse_optional(SyntaxKind::ExtendsKeyword)
        {
            return check_type;
        }
        let extends_type =
            self.with_context(ParserContext::DISALLOW_CONDITIONAL_TYPES, ParserContext::empty(), Parser::parse_type);
        self.parse_expected(SyntaxKind::QuestionToken);
        let true_type =
            self.with_context(ParserContext::empty(), ParserContext::DISALLOW_CONDITIONAL_TYPES, Parser::parse_type);
        self.parse_expected(SyntaxKind::ColonToken);
        let false_type =
            self.with_context(ParserContext::empty(), ParserContext::DISALLOW_CONDITIONAL_TYPES, Parser::parse_type);
        TypeNode::Conditional(Box::new(ConditionalType {
            data: self.finish(SyntaxKind::ConditionalType, start),
            check_type,
            extends_type,
            true_type,
            false_type,
        }))
    }

    /// `x is T`, `asserts x`, `asserts this is T`, or an ordinary type.
    pub(crate) fn parse_type_or_type_predicate(&mut self) -> TypeNode {
        let start = self.token_start();
        let is_asserts = self.token() == SyntaxKind::AssertsKeyword
            && self.look_ahead(|p| {
                p.next_token();
                !p.has_preceding_line_break() && (p.is_identifier() || p.token() == SyntaxKind::ThisKeyword)
            });
        if is_asserts {
            self.next_token();
            let parameter_name = self.identifier_from_token();
            let type_node = if self.token() == SyntaxKind::IsKeyword && !self.has_preceding_line_break() {
                self.next_token();
                Some(Box::new(self.parse_type()))
            } else {
                None
            };
            return TypeNode::Predicate(TypePredicate {
                data: self.finish(SyntaxKind::TypePredicate, start),
                asserts: true,
                parameter_name,
                type_node,
            });
        }

        let is_predicate = (self.is_identifier() || self.token() == SyntaxKind::ThisKeyword)
            && self.look_ahead(|p| {
                p.next_token();
                p.token() == SyntaxKind::IsKeyword && !p.has_preceding_line_break()
            });
        if is_predicate {
            let parameter_name = self.identifier_from_token();
            self.next_token();
            let type_node = self.parse_type();
            return TypeNode::Predicate(TypePredicate {
                data: self.finish(SyntaxKind::TypePredicate, start),
                asserts: false,
                parameter_name,
                type_node: Some(Box::new(type_node)),
            });
        }
        self.parse_type()
    }

    // ========================================================================
    // Function and constructor types
    // ========================================================================

    fn is_start_of_function_or_constructor_type(&mut self) -> bool {
        match self.token() {
            SyntaxKind::LessThanToken | SyntaxKind::NewKeyword => true,
            SyntaxKind::OpenParenToken => self.look_ahead(Parser::is_unambiguously_start_of_function_type),
            SyntaxKind::AbstractKeyword => self.next_token_is(SyntaxKind::NewKeyword),
            _ => false,
        }
    }

    /// After `(`: `()`, `(...`, `(x:`, `(x,`, `(x?`, `(x=` or `(x) =>`.
    fn is_unambiguously_start_of_function_type(&mut self) -> bool {
        self.next_token();
        if matches!(self.token(), SyntaxKind::CloseParenToken | SyntaxKind::DotDotDotToken) {
            return true;
        }
        if !self.skip_parameter_start() {
            return false;
        }
        match self.token() {
            SyntaxKind::ColonToken | SyntaxKind::CommaToken | SyntaxKind::QuestionToken | SyntaxKind::EqualsToken => true,
            SyntaxKind::CloseParenToken => self.next_token() == SyntaxKind::EqualsGreaterThanToken,
            _ => false,
        }
    }

    fn skip_parameter_start(&mut self) -> bool {
        if matches!(
            self.token(),
            SyntaxKind::PublicKeyword | SyntaxKind::PrivateKeyword | SyntaxKind::ProtectedKeyword | SyntaxKind::ReadonlyKeyword
        ) {
            self.next_token();
        }
        if self.is_identifier() || self.token() == SyntaxKind::ThisKeyword {
            self.next_token();
            return true;
        }
        let (open, close) = match self.token() {
            SyntaxKind::OpenBracketToken => (SyntaxKind::OpenBracketToken, SyntaxKind::CloseBracketToken),
            SyntaxKind::OpenBraceToken => (SyntaxKind::OpenBraceToken, SyntaxKind::CloseBraceToken),
            _ => return false,
        };
        let mut depth = 0u32;
        loop {
            let token = self.token();
            if token == SyntaxKind::EndOfFileToken {
                return false;
            }
            if token == open {
                depth += 1;
            } else if token == close {
                depth -= 1;
                if depth == 0 {
                    self.next_token();
                    return true;
                }
            }
            self.next_token();
        }
    }

    fn parse_function_or_constructor_type(&mut self) -> TypeNode {
        let start = self.token_start();
        let modifiers = if self.parse_optional(SyntaxKind::AbstractKeyword) {
            ModifierFlags::ABSTRACT
        } else {
            ModifierFlags::NONE
        };
        let is_constructor = self.parse_optional(SyntaxKind::NewKeyword);
        let type_parameters = self.parse_type_parameters();
        let parameters = self.parse_parameters();
        self.parse_expected(SyntaxKind::EqualsGreaterThanToken);
        let return_type = self.parse_type_or_type_predicate();
        let kind = if is_constructor {
            SyntaxKind::ConstructorType
        } else {
            SyntaxKind::FunctionType
        };
        TypeNode::Function(Box::new(FunctionType {
            data: self.finish(kind, start).with_modifiers(modifiers),
            is_constructor,
            type_parameters,
            parameters,
            return_type,
        }))
    }

    // ========================================================================
    // Union, intersection and type operators
    // ========================================================================

    fn parse_union_type_or_higher(&mut self) -> TypeNode {
        self.parse_union_or_intersection(SyntaxKind::BarToken, Parser::parse_intersection_type_or_higher)
    }

    fn parse_intersection_type_or_higher(&mut self) -> TypeNode {
        self.parse_union_or_intersection(SyntaxKind::AmpersandToken, Parser::parse_type_operator_or_higher)
    }

    /// A leading `|`/`&` is allowed; a single constituent is returned as is.
    fn parse_union_or_intersection(&mut self, operator: SyntaxKind, element: fn(&mut Parser) -> TypeNode) -> TypeNode {
        let start = self.token_start();
        let leading = self.parse_optional(operator);
        let first = if leading && self.is_start_of_function_or_constructor_type() {
            self.parse_function_or_constructor_type()
        } else {
            element(self)
        };
        if self.token() != operator {
            return first;
        }
        let mut types = vec![first];
        while self.parse_optional(operator) {
            types.push(element(self));
        }
        if operator == SyntaxKind::BarToken {
            TypeNode::Union(UnionOrIntersectionType {
                data: self.finish(SyntaxKind::UnionType, start),
                types,
            })
        } else {
            TypeNode::Intersection(UnionOrIntersectionType {
                data: self.finish(SyntaxKind::IntersectionType, start),
                types,
            })
        }
    }

    fn parse_type_operator_or_higher(&mut self) -> TypeNode {
        let start = self.token_start();
        match self.token() {
            SyntaxKind::KeyOfKeyword | SyntaxKind::UniqueKeyword | SyntaxKind::ReadonlyKeyword => {
                let operator = self.token();
                self.next_token();
                let type_node = self.parse_type_operator_or_higher();
                TypeNode::Operator(TypeOperator {
                    data: self.finish(SyntaxKind::TypeOperator, start),
                    operator,
                    type_node: Box::new(type_node),
                })
            }
            SyntaxKind::InferKeyword => self.parse_infer_type(start),
            _ => self.with_context(
                ParserContext::empty(),
                ParserContext::DISALLOW_CONDITIONAL_TYPES,
                Parser::parse_postfix_type_or_higher,
            ),
        }
    }

    /// `infer U` with an optional constraint. In `T extends infer U extends X ? A : B`
    /// the second `extends` starts the conditional unless already inside
    /// an `extends` clause.
    fn parse_infer_type(&mut self, start: u32) -> TypeNode {
        self.next_token();
        let name_start = self.token_start();
        let name = self.parse_identifier();
        let constraint = self.try_parse(|p| {
            if !p.parse_optional(SyntaxKind::ExtendsKeyword) {
                return None;
            }
            let constraint =
                p.with_context(ParserContext::DISALLOW_CONDITIONAL_TYPES, ParserContext::empty(), Parser::parse_type);
            (p.in_context(ParserContext::DISALLOW_CONDITIONAL_TYPES) || p.token() != SyntaxKind::QuestionToken)
                .then_some(constraint)
        });
        let type_parameter = TypeParameter {
            data: self.finish(SyntaxKind::TypeParameter, name_start),
            name,
            constraint: constraint.map(Box::new),
            default: None,
        };
        TypeNode::Infer(Box::new(InferType {
            data: self.finish(SyntaxKind::InferType, start),
            type_parameter,
        }))
    }

    /// `T[]` and `T[K]`; a line break ends the type.
    fn parse_postfix_type_or_higher(&mut self) -> TypeNode {
        let start = self.token_start();
        let mut type_node = self.parse_non_array_type();
        while !self.has_preceding_line_break() && self.token() == SyntaxKind::OpenBracketToken {
            self.next_token();
            if self.parse_optional(SyntaxKind::CloseBracketToken) {
                type_node = TypeNode::Array(ArrayType {
                    data: self.finish(SyntaxKind::ArrayType, start),
                    element_type: Box::new(type_node),
                });
            } else {
                let index_type = self.parse_type();
                self.parse_expected(SyntaxKind::CloseBracketToken);
                type_node = TypeNode::IndexedAccess(IndexedAccessType {
                    data: self.finish(SyntaxKind::IndexedAccessType, start),
                    object_type: Box::new(type_node),
                    index_type: Box::new(index_type),
                });
            }
        }
        type_node
    }

    // ========================================================================
    // Primary types
    // ========================================================================

    fn parse_non_array_type(&mut self) -> TypeNode {
        let start = self.token_start();
        match self.token() {
            kind if kind.is_type_keyword()
                && kind != SyntaxKind::IntrinsicKeyword
                && !self.next_token_is(SyntaxKind::DotToken) =>
            {
                self.next_token();
                TypeNode::Keyword(self.finish(kind, start))
            }
            SyntaxKind::ThisKeyword => {
                self.next_token();
                TypeNode::This(self.finish(SyntaxKind::ThisType, start))
            }
            SyntaxKind::TypeOfKeyword => {
                if self.next_token_is(SyntaxKind::ImportKeyword) {
                    self.parse_import_type(start)
                } else {
                    self.parse_type_query(start)
                }
            }
            SyntaxKind::ImportKeyword => self.parse_import_type(start),
            SyntaxKind::OpenBraceToken => {
                if self.is_start_of_mapped_type() {
                    self.parse_mapped_type(start)
                } else {
                    let members = self.parse_object_type_members();
                    TypeNode::Literal(TypeLiteral {
                        data: self.finish(SyntaxKind::TypeLiteral, start),
                        members,
                    })
                }
            }
            SyntaxKind::OpenBracketToken => self.parse_tuple_type(start),
            SyntaxKind::OpenParenToken => {
                self.next_token();
                let type_node = self.with_context(
                    ParserContext::empty(),
                    ParserContext::DISALLOW_CONDITIONAL_TYPES,
                    Parser::parse_type,
                );
                self.parse_expected(SyntaxKind::CloseParenToken);
                TypeNode::Parenthesized(WrappedType {
                    data: self.finish(SyntaxKind::ParenthesizedType, start),
                    type_node: Box::new(type_node),
                })
            }
            SyntaxKind::StringLiteral
            | SyntaxKind::NumericLiteral
            | SyntaxKind::BigIntLiteral
            | SyntaxKind::TrueKeyword
            | SyntaxKind::FalseKeyword => {
                let literal = self.parse_literal_type_value();
                TypeNode::LiteralType(LiteralType {
                    data: self.finish(SyntaxKind::LiteralType, start),
                    literal: Box::new(literal),
                })
            }
            SyntaxKind::MinusToken
                if self.look_ahead(|p| {
                    matches!(p.next_token(), SyntaxKind::NumericLiteral | SyntaxKind::BigIntLiteral)
                }) =>
            {
                self.next_token();
                let operand = self.parse_literal_type_value();
                let literal = Expression::PrefixUnary(PrefixUnaryExpression {
                    data: self.finish(SyntaxKind::PrefixUnaryExpression, start),
                    operator: SyntaxKind::MinusToken,
                    operand: Box::new(operand),
                });
                TypeNode::LiteralType(LiteralType {
                    data: self.finish(SyntaxKind::LiteralType, start),
                    literal: Box::new(literal),
                })
            }
            SyntaxKind::NoSubstitutionTemplateLiteral | SyntaxKind::TemplateHead => {
                self.parse_template_literal_type(start)
            }
            _ if self.is_identifier() => self.parse_type_reference(start),
            _ => {
                self.error_at_current_token(&messages::TYPE_EXPECTED, &[]);
                TypeNode::Missing(self.missing_data())
            }
        }
    }

    fn parse_literal_type_value(&mut self) -> Expression {
        let start = self.token_start();
        match self.token() {
            SyntaxKind::StringLiteral => Expression::StringLiteral(self.parse_string_literal()),
            SyntaxKind::NumericLiteral => Expression::NumericLiteral(self.parse_numeric_literal()),
            SyntaxKind::BigIntLiteral => Expression::BigIntLiteral(self.parse_bigint_literal()),
            kind => {
                self.next_token();
                Expression::Boolean(BooleanLiteral {
                    data: self.finish(kind, start),
                    value: kind == SyntaxKind::TrueKeyword,
                })
            }
        }
    }

    fn parse_type_reference(&mut self, start: u32) -> TypeNode {
        let type_name = self.parse_entity_name(true);
        let type_arguments = if !self.has_preceding_line_break() {
            self.parse_type_arguments()
        } else {
            None
        };
        TypeNode::Reference(TypeReference {
            data: self.finish(SyntaxKind::TypeReference, start),
            type_name,
            type_arguments,
        })
    }

    fn parse_type_query(&mut self, start: u32) -> TypeNode {
        self.next_token();
        let expr_name = self.parse_entity_name(true);
        let type_arguments = if !self.has_preceding_line_break() {
            self.parse_type_arguments()
        } else {
            None
        };
        TypeNode::Query(TypeQuery {
            data: self.finish(SyntaxKind::TypeQuery, start),
            expr_name,
            type_arguments,
        })
    }

    fn parse_import_type(&mut self, start: u32) -> TypeNode {
        let is_type_of = self.parse_optional(SyntaxKind::TypeOfKeyword);
        self.parse_expected(SyntaxKind::ImportKeyword);
        self.parse_expected(SyntaxKind::OpenParenToken);
        let argument = self.parse_expected_string_literal();
        self.parse_expected(SyntaxKind::CloseParenToken);
        let qualifier = if self.parse_optional(SyntaxKind::DotToken) {
            Some(self.parse_entity_name(true))
        } else {
            None
        };
        let type_arguments = if !self.has_preceding_line_break() {
            self.parse_type_arguments()
        } else {
            None
        };
        TypeNode::Import(Box::new(ImportType {
            data: self.finish(SyntaxKind::ImportType, start),
            is_type_of,
            argument,
            qualifier,
            type_arguments,
        }))
    }

    fn parse_template_literal_type(&mut self, start: u32) -> TypeNode {
        let mut quasis = vec![self.parse_template_element(false)];
        let mut types = Vec::new();
        if quasis[0].data.kind == SyntaxKind::TemplateHead {
            loop {
                types.push(self.parse_type());
                match self.token() {
                    SyntaxKind::TemplateMiddle => quasis.push(self.parse_template_element(false)),
                    SyntaxKind::TemplateTail => {
                        quasis.push(self.parse_template_element(false));
                        break;
                    }
                    _ => {
                        quasis.push(self.missing_template_tail());
                        break;
                    }
                }
            }
        }
        TypeNode::TemplateLiteral(TemplateLiteralType {
            data: self.finish(SyntaxKind::TemplateLiteralType, start),
            quasis,
            types,
        })
    }

    // ========================================================================
    // Tuples
    // ========================================================================

    fn parse_tuple_type(&mut self, start: u32) -> TypeNode {
        let elements = self.with_context(ParserContext::empty(), ParserContext::DISALLOW_CONDITIONAL_TYPES, |p| {
            p.parse_bracketed_list(
                ParsingContext::TupleElementTypes,
                Parser::parse_tuple_element,
                SyntaxKind::OpenBracketToken,
                SyntaxKind::CloseBracketToken,
            )
        });
        TypeNode::Tuple(TupleType {
            data: self.finish(SyntaxKind::TupleType, start),
            elements,
        })
    }

    fn is_named_tuple_member(&mut self) -> bool {
        self.look_ahead(|p| {
            if p.token() == SyntaxKind::DotDotDotToken {
                p.next_token();
            }
            if !p.token().is_identifier_or_keyword() {
                return false;
            }
            match p.next_token() {
                SyntaxKind::ColonToken => true,
                SyntaxKind::QuestionToken => p.next_token() == SyntaxKind::ColonToken,
                _ => false,
            }
        })
    }

    fn parse_tuple_element(&mut self) -> TypeNode {
        let start = self.token_start();
        if self.is_named_tuple_member() {
            let dot_dot_dot = self.parse_optional(SyntaxKind::DotDotDotToken);
            let name = self.parse_identifier_name();
            let question = self.parse_optional(SyntaxKind::QuestionToken);
            self.parse_expected(SyntaxKind::ColonToken);
            let type_node = self.parse_type();
            return TypeNode::NamedTupleMember(NamedTupleMember {
                data: self.finish(SyntaxKind::NamedTupleMember, start),
                dot_dot_dot,
                name,
                question,
                type_node: Box::new(type_node),
            });
        }
        if self.parse_optional(SyntaxKind::DotDotDotToken) {
            let type_node = self.parse_type();
            return TypeNode::Rest(WrappedType {
                data: self.finish(SyntaxKind::RestType, start),
                type_node: Box::new(type_node),
            });
        }
        let type_node = self.parse_type();
        if self.parse_optional(SyntaxKind::QuestionToken) {
            return TypeNode::Optional(WrappedType {
                data: self.finish(SyntaxKind::OptionalType, start),
                type_node: Box::new(type_node),
            });
        }
        type_node
    }

    // ========================================================================
    // Mapped types
    // ========================================================================

    fn is_start_of_mapped_type(&mut self) -> bool {
        self.look_ahead(|p| {
            p.next_token();
            if matches!(p.token(), SyntaxKind::PlusToken | SyntaxKind::MinusToken) {
                return p.next_token() == SyntaxKind::ReadonlyKeyword;
            }
            if p.token() == SyntaxKind::ReadonlyKeyword {
                p.next_token();
            }
            if p.token() != SyntaxKind::OpenBracketToken {
                return false;
            }
            p.next_token();
            if !p.token().is_identifier_or_keyword() {
                return false;
            }
            p.next_token() == SyntaxKind::InKeyword
        })
    }

    fn parse_mapped_type(&mut self, start: u32) -> TypeNode {
        self.parse_expected(SyntaxKind::OpenBraceToken);
        let readonly_token = match self.token() {
            SyntaxKind::ReadonlyKeyword => {
                self.next_token();
                Some(SyntaxKind::ReadonlyKeyword)
            }
            kind @ (SyntaxKind::PlusToken | SyntaxKind::MinusToken) => {
                self.next_token();
                self.parse_expected(SyntaxKind::ReadonlyKeyword);
                Some(kind)
            }
            _ => None,
        };
        self.parse_expected(SyntaxKind::OpenBracketToken);
        let parameter_start = self.token_start();
        let name = self.parse_identifier_name();
        self.parse_expected(SyntaxKind::InKeyword);
        let constraint = self.parse_type();
        let type_parameter = TypeParameter {
            data: self.finish(SyntaxKind::TypeParameter, parameter_start),
            name,
            constraint: Some(Box::new(constraint)),
            default: None,
        };
        let name_type = if self.parse_optional(SyntaxKind::AsKeyword) {
            Some(self.parse_type())
        } else {
            None
        };
        self.parse_expected(SyntaxKind::CloseBracketToken);
        let question_token = match self.token() {
            SyntaxKind::QuestionToken => {
                self.next_token();
                Some(SyntaxKind::QuestionToken)
            }
            kind @ (SyntaxKind::PlusToken | SyntaxKind::MinusToken) => {
                self.next_token();
                self.parse_expected(SyntaxKind::QuestionToken);
                Some(kind)
            }
            _ => None,
        };
        let type_node = if self.parse_optional(SyntaxKind::ColonToken) {
            Some(self.parse_type())
        } else {
            None
        };
        if !self.parse_optional(SyntaxKind::SemicolonToken) {
            self.parse_optional(SyntaxKind::CommaToken);
        }
        self.parse_expected(SyntaxKind::CloseBraceToken);
        TypeNode::Mapped(Box::new(MappedType {
            data: self.finish(SyntaxKind::MappedType, start),
            readonly_token,
            type_parameter,
            name_type,
            question_token,
            type_node,
        }))
    }

    // ========================================================================
    // Interface and type literal members
    // ========================================================================

    pub(crate) fn parse_object_type_members(&mut self) -> Vec<TypeElement> {
        self.with_context(ParserContext::empty(), ParserContext::DISALLOW_CONDITIONAL_TYPES, |p| {
            if !p.parse_expected(SyntaxKind::OpenBraceToken) {
                return Vec::new();
            }
            let members = p.parse_list(ParsingContext::TypeMembers, Parser::parse_type_member);
            p.parse_expected(SyntaxKind::CloseBraceToken);
            members
        })
    }

    fn parse_type_member(&mut self) -> TypeElement {
        let start = self.token_start();
        if matches!(self.token(), SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken) {
            return TypeElement::Call(self.parse_signature_member(start, false));
        }
        if self.token() == SyntaxKind::NewKeyword
            && self.look_ahead(|p| matches!(p.next_token(), SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken))
        {
            self.next_token();
            return TypeElement::Call(self.parse_signature_member(start, true));
        }

        let is_readonly = self.token() == SyntaxKind::ReadonlyKeyword
            && self.look_ahead(|p| {
                p.next_token();
                !p.has_preceding_line_break() && Parser::is_property_name_start(p.token())
            });
        let modifiers = if is_readonly {
            self.next_token();
            ModifierFlags::READONLY
        } else {
            ModifierFlags::NONE
        };

        if self.is_index_signature() {
            let signature = self.parse_index_signature(start, modifiers);
            self.parse_type_member_separator();
            return TypeElement::Index(signature);
        }

        let method_kind = self.parse_accessor_kind();
        let name = self.parse_property_name();
        let question = self.parse_optional(SyntaxKind::QuestionToken);

        if method_kind != MethodKind::Method
            || matches!(self.token(), SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken)
        {
            let type_parameters = self.parse_type_parameters();
            let parameters = self.parse_parameters();
            let return_type = self.parse_return_type();
            self.parse_type_member_separator();
            let kind = match method_kind {
                MethodKind::Method => SyntaxKind::MethodSignature,
                MethodKind::Get => SyntaxKind::GetAccessor,
                MethodKind::Set => SyntaxKind::SetAccessor,
            };
            return TypeElement::Method(MethodSignature {
                data: self.finish(kind, start).with_modifiers(modifiers),
                kind: method_kind,
                name,
                question,
                type_parameters,
                parameters,
                return_type,
            });
        }

        let type_annotation = self.parse_type_annotation();
        self.parse_type_member_separator();
        TypeElement::Property(PropertySignature {
            data: self.finish(SyntaxKind::PropertySignature, start).with_modifiers(modifiers),
            name,
            question,
            type_annotation,
        })
    }

    fn parse_signature_member(&mut self, start: u32, is_construct: bool) -> CallSignature {
        let type_parameters = self.parse_type_parameters();
        let parameters = self.parse_parameters();
        let return_type = self.parse_return_type();
        self.parse_type_member_separator();
        let kind = if is_construct {
            SyntaxKind::ConstructSignature
        } else {
            SyntaxKind::CallSignature
        };
        CallSignature {
            data: self.finish(kind, start),
            is_construct,
            type_parameters,
            parameters,
            return_type,
        }
    }

    fn parse_type_member_separator(&mut self) {
        if !self.parse_optional(SyntaxKind::CommaToken) {
            self.parse_semicolon();
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::parse_program;
    use esforge_ast::*;
    use esforge_options::{ParseOptions, Syntax};

    fn alias_type(source: &str) -> TypeNode {
        let options = ParseOptions {
            syntax: Syntax::Typescript,
            file_name: "input.ts".to_string(),
            ..Default::default()
        };
        let mut result = parse_program(source, &options);
        assert!(result.diagnostics.is_empty(), "unexpected diagnostics: {:?}", result.diagnostics);
        match result.program.statements.remove(0) {
            Statement::TypeAlias(alias) => alias.type_node,
            other => panic!("expected type alias, got {:?}", other.kind()),
        }
    }

    #[test]
    fn test_conditional_with_infer_constraint() {
        match alias_type("type A<T> = T extends [infer U extends string] ? U : never;") {
            TypeNode::Conditional(conditional) => match &conditional.extends_type {
                TypeNode::Tuple(tuple) => match &tuple.elements[0] {
                    TypeNode::Infer(infer) => assert!(infer.type_parameter.constraint.is_some()),
                    other => panic!("expected infer, got {:?}", other.kind()),
                },
                other => panic!("expected tuple, got {:?}", other.kind()),
            },
            other => panic!("expected conditional, got {:?}", other.kind()),
        }
    }

    #[test]
    fn test_function_type_versus_parenthesized() {
        assert!(matches!(alias_type("type F = (a: string) => void;"), TypeNode::Function(_)));
        assert!(matches!(alias_type("type F = (string | number)[];"), TypeNode::Array(_)));
        assert!(matches!(alias_type("type F = new () => object;"), TypeNode::Function(ref f) if f.is_constructor));
    }

    #[test]
    fn test_mapped_type_modifiers() {
        match alias_type("type M<T> = { -readonly [K in keyof T as `get${K}`]+?: T[K] };") {
            TypeNode::Mapped(mapped) => {
                assert_eq!(mapped.readonly_token, Some(SyntaxKind::MinusToken));
                assert_eq!(mapped.question_token, Some(SyntaxKind::PlusToken));
                assert!(matches!(mapped.name_type, Some(TypeNode::TemplateLiteral(_))));
                assert!(matches!(mapped.type_node, Some(TypeNode::IndexedAccess(_))));
            }
            other => panic!("expected mapped type, got {:?}", other.kind()),
        }
    }

    #[test]
    fn test_named_and_rest_tuple_members() {
        match alias_type("type T = [first: string, second?: number, ...rest: boolean[]];") {
            TypeNode::Tuple(tuple) => {
                assert_eq!(tuple.elements.len(), 3);
                assert!(tuple
                    .elements
                    .iter()
                    .all(|element| matches!(element, TypeNode::NamedTupleMember(_))));
            }
            other => panic!("expected tuple, got {:?}", other.kind()),
        }
    }

    #[test]
    fn test_type_literal_members() {
        match alias_type("type O = { readonly a: string; b?(): void, new (x: number): O; [k: string]: unknown; get c(): number };") {
            TypeNode::Literal(literal) => {
                assert_eq!(literal.members.len(), 5);
                match &literal.members[0] {
                    TypeElement::Property(property) => assert!(property.data.has_modifier(ModifierFlags::READONLY)),
                    other => panic!("expected property, got {:?}", other),
                }
                assert!(matches!(literal.members[2], TypeElement::Call(ref c) if c.is_construct));
                assert!(matches!(literal.members[4], TypeElement::Method(ref m) if m.kind == MethodKind::Get));
            }
            other => panic!("expected type literal, got {:?}", other.kind()),
        }
    }

    #[test]
    fn test_leading_bar_and_literal_types() {
        match alias_type("type U = | 'a' | -1 | 2n | true;") {
            TypeNode::Union(union) => assert_eq!(union.types.len(), 4),
            other => panic!("expected union, got {:?}", other.kind()),
        }
    }

    #[test]
    fn test_type_predicates() {
        let options = ParseOptions {
            syntax: Syntax::Typescript,
            file_name: "input.ts".to_string(),
            ..Default::default()
        };
        let result = parse_program(
            "function isString(x: unknown): x is string { return true }\n\
             function check(x: unknown): asserts x {}",
            &options,
        );
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
        let predicates: Vec<bool> = result
            .program
            .statements
            .iter()
            .map(|statement| match statement {
                Statement::Function(function) => match &function.return_type {
                    Some(TypeNode::Predicate(predicate)) => predicate.asserts,
                    other => panic!("expected predicate, got {:?}", other),
                },
                other => panic!("expected function, got {:?}", other.kind()),
            })
            .collect();
        assert_eq!(predicates, vec![false, true]);
    }
}
