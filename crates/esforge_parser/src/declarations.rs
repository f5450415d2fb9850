//! Functions, classes, TypeScript declarations, parameters and binding
//! patterns.

use esforge_ast::node::*;
use esforge_ast::syntax_kind::SyntaxKind;
use esforge_ast::types::*;
use esforge_diagnostics::messages;

use crate::parser::{Parser, ParserContext, ParsingContext};
use crate::utilities::is_literal_property_name;

impl Parser {
    // ========================================================================
    // Decorators
    // ========================================================================

    pub(crate) fn parse_decorators(&mut self) -> Vec<Decorator> {
        let mut decorators = Vec::new();
        while self.token() == SyntaxKind::AtToken {
            let start = self.token_start();
            self.next_token();
            let expression = self.with_context(
                ParserContext::DECORATOR,
                ParserContext::empty(),
                Parser::parse_left_hand_side_expression_or_higher,
            );
            if !self.decorators {
                let end = self.prev_token_end();
                self.grammar_error(start, end, &messages::DECORATORS_ARE_NOT_ENABLED, &[]);
            }
            decorators.push(Decorator {
                data: self.finish(SyntaxKind::Decorator, start),
                expression,
            });
        }
        decorators
    }

    // ========================================================================
    // Property names
    // ========================================================================

    pub(crate) fn parse_property_name(&mut self) -> PropertyName {
        match self.token() {
            SyntaxKind::StringLiteral => PropertyName::StringLiteral(self.parse_string_literal()),
            SyntaxKind::NumericLiteral => PropertyName::NumericLiteral(self.parse_numeric_literal()),
            SyntaxKind::BigIntLiteral => PropertyName::BigIntLiteral(self.parse_bigint_literal()),
            SyntaxKind::PrivateIdentifier => PropertyName::PrivateIdentifier(self.parse_private_identifier()),
            SyntaxKind::OpenBracketToken => {
                let start = self.token_start();
                self.next_token();
                let expression = self.with_context(
                    ParserContext::empty(),
                    ParserContext::DISALLOW_IN,
                    Parser::parse_assignment_expression,
                );
                self.parse_expected(SyntaxKind::CloseBracketToken);
                PropertyName::Computed(ComputedPropertyName {
                    data: self.finish(SyntaxKind::ComputedPropertyName, start),
                    expression: Box::new(expression),
                })
            }
            _ => PropertyName::Identifier(self.parse_identifier_name()),
        }
    }

    pub(crate) fn is_property_name_start(kind: SyntaxKind) -> bool {
        kind == SyntaxKind::OpenBracketToken || is_literal_property_name(kind)
    }

    // ========================================================================
    // Functions
    // ========================================================================

    pub(crate) fn parse_function_declaration(&mut self, start: u32, modifiers: ModifierFlags) -> Statement {
        self.parse_expected(SyntaxKind::FunctionKeyword);
        let is_generator = self.parse_optional(SyntaxKind::AsteriskToken);
        let is_async = modifiers.contains(ModifierFlags::ASYNC);
        let name = if modifiers.contains(ModifierFlags::DEFAULT) && !self.is_identifier() {
            None
        } else {
            Some(self.parse_identifier())
        };
        let function = self.parse_function_rest(
            start,
            SyntaxKind::FunctionDeclaration,
            name,
            is_async,
            is_generator,
            modifiers,
        );
        Statement::Function(Box::new(function))
    }

    /// Everything after the name: type parameters, parameters, return type
    /// and body. A missing body is an overload signature in TypeScript.
    pub(crate) fn parse_function_rest(
        &mut self,
        start: u32,
        kind: SyntaxKind,
        name: Option<Identifier>,
        is_async: bool,
        is_generator: bool,
        modifiers: ModifierFlags,
    ) -> Function {
        let (set, clear) = Self::function_context(is_async, is_generator);
        let (type_parameters, parameters) = self.with_context(set, clear, |p| {
            let type_parameters = p.parse_type_parameters();
            let parameters = p.parse_parameters();
            (type_parameters, parameters)
        });
        let return_type = self.parse_return_type();
        let body = if self.token() == SyntaxKind::OpenBraceToken
            || !(self.typescript || self.in_context(ParserContext::AMBIENT))
        {
            Some(self.parse_function_block(set, clear))
        } else {
            self.parse_semicolon();
            None
        };
        Function {
            data: self.finish(kind, start).with_modifiers(modifiers - ModifierFlags::ASYNC),
            name,
            is_async,
            is_generator,
            type_parameters,
            parameters,
            return_type,
            body,
        }
    }

    pub(crate) fn function_context(is_async: bool, is_generator: bool) -> (ParserContext, ParserContext) {
        let mut set = ParserContext::empty();
        let mut clear = ParserContext::empty();
        if is_async {
            set |= ParserContext::AWAIT;
        } else {
            clear |= ParserContext::AWAIT;
        }
        if is_generator {
            set |= ParserContext::YIELD;
        } else {
            clear |= ParserContext::YIELD;
        }
        (set, clear)
    }

    pub(crate) fn parse_function_block(&mut self, set: ParserContext, clear: ParserContext) -> Block {
        self.with_context(
            set,
            clear | ParserContext::DISALLOW_IN | ParserContext::DECORATOR | ParserContext::IN_CONDITIONAL_WHEN_TRUE,
            Parser::parse_block,
        )
    }

    // ========================================================================
    // Parameters
    // ========================================================================

    pub(crate) fn is_start_of_parameter(&mut self) -> bool {
        match self.token() {
            SyntaxKind::AtToken
            | SyntaxKind::DotDotDotToken
            | SyntaxKind::ThisKeyword
            | SyntaxKind::OpenBraceToken
            | SyntaxKind::OpenBracketToken => true,
            SyntaxKind::PublicKeyword
            | SyntaxKind::PrivateKeyword
            | SyntaxKind::ProtectedKeyword
            | SyntaxKind::ReadonlyKeyword
            | SyntaxKind::OverrideKeyword => true,
            _ => self.is_identifier(),
        }
    }

    pub(crate) fn parse_parameters(&mut self) -> Vec<Parameter> {
        let parameters = self.parse_bracketed_list(
            ParsingContext::Parameters,
            Parser::parse_parameter,
            SyntaxKind::OpenParenToken,
            SyntaxKind::CloseParenToken,
        );
        self.check_rest_parameters(&parameters);
        parameters
    }

    pub(crate) fn check_rest_parameters(&mut self, parameters: &[Parameter]) {
        if let Some((_, init)) = parameters.split_last() {
            if let Some(rest) = init.iter().find(|p| p.dot_dot_dot) {
                let range = rest.data.range;
                self.error_at(range.pos, range.end, &messages::A_REST_PARAMETER_MUST_BE_LAST, &[]);
            }
        }
    }

    /// Accessibility, `readonly` and `override` make a constructor parameter
    /// a parameter property.
    fn parse_parameter_modifiers(&mut self) -> ModifierFlags {
        let mut modifiers = ModifierFlags::NONE;
        loop {
            let flag = match self.token() {
                SyntaxKind::PublicKeyword => ModifierFlags::PUBLIC,
                SyntaxKind::PrivateKeyword => ModifierFlags::PRIVATE,
                SyntaxKind::ProtectedKeyword => ModifierFlags::PROTECTED,
                SyntaxKind::ReadonlyKeyword => ModifierFlags::READONLY,
                SyntaxKind::OverrideKeyword => ModifierFlags::OVERRIDE,
                _ => return modifiers,
            };
            let is_modifier = self.look_ahead(|p| {
                p.next_token();
                !p.has_preceding_line_break() && (p.is_binding_identifier_or_pattern() || p.token() == SyntaxKind::DotDotDotToken)
            });
            if !is_modifier {
                return modifiers;
            }
            let start = self.token_start();
            let text = self.token_value().to_string();
            self.next_token();
            self.check_typescript_syntax(
                start,
                &messages::_0_DECLARATIONS_CAN_ONLY_BE_USED_IN_TYPESCRIPT_FILES,
                &[&text],
            );
            modifiers |= flag;
        }
    }

    pub(crate) fn parse_parameter(&mut self) -> Parameter {
        let start = self.token_start();
        let decorators = self.parse_decorators();
        let modifiers = self.parse_parameter_modifiers();
        let dot_dot_dot = self.parse_optional(SyntaxKind::DotDotDotToken);
        let name = if self.token() == SyntaxKind::ThisKeyword {
            let this_start = self.token_start();
            let identifier = self.identifier_from_token();
            self.check_typescript_syntax(
                this_start,
                &messages::_0_DECLARATIONS_CAN_ONLY_BE_USED_IN_TYPESCRIPT_FILES,
                &["this"],
            );
            BindingName::Identifier(identifier)
        } else {
            self.parse_binding_name()
        };
        let question = if self.token() == SyntaxKind::QuestionToken {
            let question_start = self.token_start();
            self.next_token();
            self.check_typescript_syntax(
                question_start,
                &messages::TYPE_ANNOTATIONS_CAN_ONLY_BE_USED_IN_TYPESCRIPT_FILES,
                &[],
            );
            true
        } else {
            false
        };
        let type_annotation = self.parse_type_annotation();
        let initializer = if self.parse_optional(SyntaxKind::EqualsToken) {
            Some(self.parse_assignment_expression())
        } else {
            None
        };
        Parameter {
            data: self.finish(SyntaxKind::Parameter, start).with_modifiers(modifiers),
            decorators,
            dot_dot_dot,
            name,
            question,
            type_annotation,
            initializer,
        }
    }

    // ========================================================================
    // Binding patterns
    // ========================================================================

    pub(crate) fn parse_binding_name(&mut self) -> BindingName {
        if !self.enter_recursion() {
            let data = self.skip_to_end_of_file();
            return BindingName::Identifier(Identifier {
                data,
                id: NodeId::INVALID,
                text: String::new(),
            });
        }
        let name = match self.token() {
            SyntaxKind::OpenBraceToken => BindingName::Object(self.parse_object_binding_pattern()),
            SyntaxKind::OpenBracketToken => BindingName::Array(self.parse_array_binding_pattern()),
            _ => BindingName::Identifier(self.parse_identifier()),
        };
        self.exit_recursion();
        name
    }

    fn parse_object_binding_pattern(&mut self) -> ObjectBindingPattern {
        let start = self.token_start();
        let elements = self.parse_bracketed_list(
            ParsingContext::ObjectBindingElements,
            Parser::parse_object_binding_element,
            SyntaxKind::OpenBraceToken,
            SyntaxKind::CloseBraceToken,
        );
        ObjectBindingPattern {
            data: self.finish(SyntaxKind::ObjectBindingPattern, start),
            elements,
        }
    }

    fn parse_object_binding_element(&mut self) -> BindingElement {
        let start = self.token_start();
        let dot_dot_dot = self.parse_optional(SyntaxKind::DotDotDotToken);
        let mut flags = NodeFlags::NONE;
        let (property_name, name) = if dot_dot_dot {
            (None, BindingName::Identifier(self.parse_identifier()))
        } else if self.is_identifier() && !self.next_token_is(SyntaxKind::ColonToken) {
            flags |= NodeFlags::SHORTHAND;
            (None, BindingName::Identifier(self.identifier_from_token()))
        } else {
            let property_name = self.parse_property_name();
            self.parse_expected(SyntaxKind::ColonToken);
            (Some(property_name), self.parse_binding_name())
        };
        let initializer = self.parse_binding_initializer();
        BindingElement {
            data: self.finish(SyntaxKind::BindingElement, start).with_flags(flags),
            dot_dot_dot,
            property_name,
            name,
            initializer,
        }
    }

    fn parse_array_binding_pattern(&mut self) -> ArrayBindingPattern {
        let start = self.token_start();
        self.parse_expected(SyntaxKind::OpenBracketToken);
        let mut elements = Vec::new();
        while !matches!(self.token(), SyntaxKind::CloseBracketToken | SyntaxKind::EndOfFileToken) {
            if self.parse_optional(SyntaxKind::CommaToken) {
                elements.push(None);
                continue;
            }
            if !self.is_list_element_start(ParsingContext::ArrayBindingElements) {
                self.error_at_current_token(&messages::IDENTIFIER_EXPECTED, &[]);
                break;
            }
            let element_start = self.token_start();
            let dot_dot_dot = self.parse_optional(SyntaxKind::DotDotDotToken);
            let name = self.parse_binding_name();
            let initializer = self.parse_binding_initializer();
            elements.push(Some(BindingElement {
                data: self.finish(SyntaxKind::BindingElement, element_start),
                dot_dot_dot,
                property_name: None,
                name,
                initializer,
            }));
            if self.token() != SyntaxKind::CloseBracketToken && !self.parse_expected(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.parse_expected(SyntaxKind::CloseBracketToken);
        ArrayBindingPattern {
            data: self.finish(SyntaxKind::ArrayBindingPattern, start),
            elements,
        }
    }

    fn parse_binding_initializer(&mut self) -> Option<Expression> {
        if self.parse_optional(SyntaxKind::EqualsToken) {
            Some(self.parse_assignment_expression())
        } else {
            None
        }
    }

    // ========================================================================
    // Classes
    // ========================================================================

    pub(crate) fn parse_class_declaration(
        &mut self,
        start: u32,
        modifiers: ModifierFlags,
        decorators: Vec<Decorator>,
    ) -> Statement {
        let class = self.parse_class_like(start, modifiers, decorators, SyntaxKind::ClassDeclaration);
        Statement::Class(Box::new(class))
    }

    /// Class declaration or expression; `kind` tells which. Only an
    /// expression or a default export may omit the name.
    pub(crate) fn parse_class_like(
        &mut self,
        start: u32,
        modifiers: ModifierFlags,
        decorators: Vec<Decorator>,
        kind: SyntaxKind,
    ) -> Class {
        self.parse_expected(SyntaxKind::ClassKeyword);
        let name = if self.is_identifier() && self.token() != SyntaxKind::ImplementsKeyword {
            Some(self.identifier_from_token())
        } else if kind == SyntaxKind::ClassDeclaration && !modifiers.contains(ModifierFlags::DEFAULT) {
            Some(self.missing_identifier(&messages::IDENTIFIER_EXPECTED))
        } else {
            None
        };
        let type_parameters = self.parse_type_parameters();

        let mut extends = None;
        let mut super_type_arguments = None;
        let mut implements = Vec::new();
        loop {
            match self.token() {
                SyntaxKind::ExtendsKeyword if extends.is_none() => {
                    self.next_token();
                    extends = Some(Box::new(self.parse_left_hand_side_expression_or_higher()));
                    if self.token() == SyntaxKind::LessThanToken {
                        super_type_arguments = self.parse_type_arguments();
                    }
                }
                SyntaxKind::ImplementsKeyword => {
                    let keyword_start = self.token_start();
                    self.next_token();
                    self.check_typescript_syntax(
                        keyword_start,
                        &messages::_0_DECLARATIONS_CAN_ONLY_BE_USED_IN_TYPESCRIPT_FILES,
                        &["implements"],
                    );
                    implements.extend(self.parse_delimited_list(
                        ParsingContext::HeritageClauseElements,
                        Parser::parse_expression_with_type_arguments,
                        false,
                    ));
                }
                _ => break,
            }
        }

        let members = if self.parse_expected(SyntaxKind::OpenBraceToken) {
            let members = self.parse_list(ParsingContext::ClassMembers, Parser::parse_class_element);
            self.parse_expected(SyntaxKind::CloseBraceToken);
            members
        } else {
            Vec::new()
        };

        Class {
            data: self.finish(kind, start).with_modifiers(modifiers),
            decorators,
            name,
            type_parameters,
            extends,
            super_type_arguments,
            implements,
            members,
        }
    }

    pub(crate) fn parse_expression_with_type_arguments(&mut self) -> ExpressionWithTypeArguments {
        let start = self.token_start();
        let expression = self.parse_left_hand_side_expression_or_higher();
        let type_arguments = if self.token() == SyntaxKind::LessThanToken {
            self.parse_type_arguments()
        } else {
            None
        };
        ExpressionWithTypeArguments {
            data: self.finish(SyntaxKind::ExpressionWithTypeArguments, start),
            expression,
            type_arguments,
        }
    }

    /// Whether the token after a modifier keyword lets it act as a modifier
    /// (`static foo` versus a member named `static`).
    fn next_token_can_follow_class_modifier(&mut self) -> bool {
        self.look_ahead(|p| {
            let modifier = p.token();
            p.next_token();
            if p.has_preceding_line_break() && modifier != SyntaxKind::StaticKeyword {
                return false;
            }
            matches!(
                p.token(),
                SyntaxKind::OpenBraceToken | SyntaxKind::AsteriskToken | SyntaxKind::DotDotDotToken
            ) || Parser::is_property_name_start(p.token())
        })
    }

    fn parse_class_member_modifiers(&mut self) -> ModifierFlags {
        let mut modifiers = ModifierFlags::NONE;
        loop {
            let kind = self.token();
            let flag = match kind {
                SyntaxKind::PublicKeyword => ModifierFlags::PUBLIC,
                SyntaxKind::PrivateKeyword => ModifierFlags::PRIVATE,
                SyntaxKind::ProtectedKeyword => ModifierFlags::PROTECTED,
                SyntaxKind::StaticKeyword => ModifierFlags::STATIC,
                SyntaxKind::ReadonlyKeyword => ModifierFlags::READONLY,
                SyntaxKind::AbstractKeyword => ModifierFlags::ABSTRACT,
                SyntaxKind::OverrideKeyword => ModifierFlags::OVERRIDE,
                SyntaxKind::AccessorKeyword => ModifierFlags::ACCESSOR,
                SyntaxKind::DeclareKeyword => ModifierFlags::AMBIENT,
                SyntaxKind::AsyncKeyword => ModifierFlags::ASYNC,
                _ => return modifiers,
            };
            // `static {` opens a static block, handled by the caller.
            if kind == SyntaxKind::StaticKeyword && self.next_token_is(SyntaxKind::OpenBraceToken) {
                return modifiers;
            }
            if !self.next_token_can_follow_class_modifier() {
                return modifiers;
            }
            let start = self.token_start();
            let text = self.token_value().to_string();
            self.next_token();
            if ModifierFlags::TYPE_SCRIPT_MODIFIER.contains(flag) {
                self.check_typescript_syntax(
                    start,
                    &messages::_0_DECLARATIONS_CAN_ONLY_BE_USED_IN_TYPESCRIPT_FILES,
                    &[&text],
                );
            }
            modifiers |= flag;
        }
    }

    pub(crate) fn is_index_signature(&mut self) -> bool {
        self.token() == SyntaxKind::OpenBracketToken
            && self.look_ahead(|p| {
                p.next_token();
                if p.token() == SyntaxKind::DotDotDotToken || p.token() == SyntaxKind::CloseBracketToken {
                    return true;
                }
                if !p.token().is_identifier_or_keyword() {
                    return false;
                }
                p.next_token();
                matches!(p.token(), SyntaxKind::ColonToken | SyntaxKind::CommaToken)
            })
    }

    pub(crate) fn parse_index_signature(&mut self, start: u32, modifiers: ModifierFlags) -> IndexSignature {
        let parameters = self.parse_bracketed_list(
            ParsingContext::Parameters,
            Parser::parse_parameter,
            SyntaxKind::OpenBracketToken,
            SyntaxKind::CloseBracketToken,
        );
        let type_annotation = self.parse_type_annotation();
        self.check_typescript_syntax(
            start,
            &messages::_0_DECLARATIONS_CAN_ONLY_BE_USED_IN_TYPESCRIPT_FILES,
            &["index signature"],
        );
        IndexSignature {
            data: self.finish(SyntaxKind::IndexSignature, start).with_modifiers(modifiers),
            parameters,
            type_annotation,
        }
    }

    /// `get`/`set` act as accessor keywords when a property name follows.
    pub(crate) fn parse_accessor_kind(&mut self) -> MethodKind {
        let kind = match self.token() {
            SyntaxKind::GetKeyword => MethodKind::Get,
            SyntaxKind::SetKeyword => MethodKind::Set,
            _ => return MethodKind::Method,
        };
        let is_accessor = self.look_ahead(|p| {
            p.next_token();
            Parser::is_property_name_start(p.token())
        });
        if is_accessor {
            self.next_token();
            kind
        } else {
            MethodKind::Method
        }
    }

    fn parse_class_element(&mut self) -> ClassElement {
        let start = self.token_start();
        if self.token() == SyntaxKind::SemicolonToken {
            self.next_token();
            return ClassElement::Semicolon(self.finish(SyntaxKind::SemicolonClassElement, start));
        }

        let decorators = self.parse_decorators();

        if self.token() == SyntaxKind::StaticKeyword && self.next_token_is(SyntaxKind::OpenBraceToken) {
            self.next_token();
            let body = self.parse_function_block(
                ParserContext::empty(),
                ParserContext::AWAIT | ParserContext::YIELD,
            );
            return ClassElement::StaticBlock(ClassStaticBlock {
                data: self.finish(SyntaxKind::ClassStaticBlockDeclaration, start),
                body,
            });
        }

        let modifiers = self.parse_class_member_modifiers();
        let is_async = modifiers.contains(ModifierFlags::ASYNC);
        let is_generator = self.parse_optional(SyntaxKind::AsteriskToken);
        let method_kind = if is_async || is_generator {
            MethodKind::Method
        } else {
            self.parse_accessor_kind()
        };

        if method_kind == MethodKind::Method
            && !is_async
            && !is_generator
            && self.is_constructor_name()
            && self.next_token_is(SyntaxKind::OpenParenToken)
        {
            self.next_token();
            let function = self.parse_function_rest(
                start,
                SyntaxKind::Constructor,
                None,
                false,
                false,
                ModifierFlags::NONE,
            );
            return ClassElement::Constructor(ConstructorDeclaration {
                data: self.finish(SyntaxKind::Constructor, start).with_modifiers(modifiers),
                function,
            });
        }

        if method_kind == MethodKind::Method && !is_generator && self.is_index_signature() {
            let signature = self.parse_index_signature(start, modifiers);
            self.parse_semicolon();
            return ClassElement::IndexSignature(signature);
        }

        let name = self.parse_property_name();
        let question = self.parse_optional_question_token();
        let exclamation = !question && self.parse_definite_assignment_token();

        if is_generator
            || method_kind != MethodKind::Method
            || matches!(self.token(), SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken)
        {
            let kind = match method_kind {
                MethodKind::Method => SyntaxKind::MethodDeclaration,
                MethodKind::Get => SyntaxKind::GetAccessor,
                MethodKind::Set => SyntaxKind::SetAccessor,
            };
            let function = self.parse_function_rest(start, kind, None, is_async, is_generator, ModifierFlags::NONE);
            return ClassElement::Method(MethodDeclaration {
                data: self.finish(kind, start).with_modifiers(modifiers - ModifierFlags::ASYNC),
                decorators,
                kind: method_kind,
                name,
                question,
                function,
            });
        }

        let type_annotation = self.parse_type_annotation();
        let initializer = if self.parse_optional(SyntaxKind::EqualsToken) {
            Some(self.with_context(
                ParserContext::empty(),
                ParserContext::YIELD | ParserContext::AWAIT | ParserContext::DISALLOW_IN,
                Parser::parse_assignment_expression,
            ))
        } else {
            None
        };
        self.parse_semicolon();
        ClassElement::Property(PropertyDeclaration {
            data: self.finish(SyntaxKind::PropertyDeclaration, start).with_modifiers(modifiers),
            decorators,
            name,
            question,
            exclamation,
            type_annotation,
            initializer,
        })
    }

    fn is_constructor_name(&self) -> bool {
        match self.token() {
            SyntaxKind::ConstructorKeyword => true,
            SyntaxKind::StringLiteral => self.token_value() == "constructor",
            _ => false,
        }
    }

    pub(crate) fn parse_optional_question_token(&mut self) -> bool {
        if self.token() != SyntaxKind::QuestionToken {
            return false;
        }
        let start = self.token_start();
        self.next_token();
        self.check_typescript_syntax(start, &messages::TYPE_ANNOTATIONS_CAN_ONLY_BE_USED_IN_TYPESCRIPT_FILES, &[]);
        true
    }

    fn parse_definite_assignment_token(&mut self) -> bool {
        if self.token() != SyntaxKind::ExclamationToken || self.has_preceding_line_break() {
            return false;
        }
        let start = self.token_start();
        self.next_token();
        self.check_typescript_syntax(start, &messages::TYPE_ANNOTATIONS_CAN_ONLY_BE_USED_IN_TYPESCRIPT_FILES, &[]);
        true
    }

    // ========================================================================
    // TypeScript declarations
    // ========================================================================

    pub(crate) fn parse_interface_declaration(&mut self, start: u32, modifiers: ModifierFlags) -> Statement {
        self.parse_expected(SyntaxKind::InterfaceKeyword);
        self.check_typescript_syntax(
            start,
            &messages::_0_DECLARATIONS_CAN_ONLY_BE_USED_IN_TYPESCRIPT_FILES,
            &["interface"],
        );
        let name = self.parse_identifier();
        let type_parameters = self.parse_type_parameters();
        let extends = if self.parse_optional(SyntaxKind::ExtendsKeyword) {
            self.parse_delimited_list(
                ParsingContext::HeritageClauseElements,
                Parser::parse_expression_with_type_arguments,
                false,
            )
        } else {
            Vec::new()
        };
        let members = self.parse_object_type_members();
        Statement::Interface(Box::new(InterfaceDeclaration {
            data: self.finish(SyntaxKind::InterfaceDeclaration, start).with_modifiers(modifiers),
            name,
            type_parameters,
            extends,
            members,
        }))
    }

    pub(crate) fn parse_type_alias_declaration(&mut self, start: u32, modifiers: ModifierFlags) -> Statement {
        self.parse_expected(SyntaxKind::TypeKeyword);
        self.check_typescript_syntax(
            start,
            &messages::_0_DECLARATIONS_CAN_ONLY_BE_USED_IN_TYPESCRIPT_FILES,
            &["type"],
        );
        let name = self.parse_identifier();
        let type_parameters = self.parse_type_parameters();
        self.parse_expected(SyntaxKind::EqualsToken);
        let type_node = self.parse_type();
        self.parse_semicolon();
        Statement::TypeAlias(Box::new(TypeAliasDeclaration {
            data: self.finish(SyntaxKind::TypeAliasDeclaration, start).with_modifiers(modifiers),
            name,
            type_parameters,
            type_node,
        }))
    }

    pub(crate) fn parse_enum_declaration(&mut self, start: u32, modifiers: ModifierFlags) -> Statement {
        self.parse_expected(SyntaxKind::EnumKeyword);
        self.check_typescript_syntax(
            start,
            &messages::_0_DECLARATIONS_CAN_ONLY_BE_USED_IN_TYPESCRIPT_FILES,
            &["enum"],
        );
        let name = self.parse_identifier();
        let members = self.parse_bracketed_list(
            ParsingContext::EnumMembers,
            Parser::parse_enum_member,
            SyntaxKind::OpenBraceToken,
            SyntaxKind::CloseBraceToken,
        );
        Statement::Enum(Box::new(EnumDeclaration {
            data: self.finish(SyntaxKind::EnumDeclaration, start).with_modifiers(modifiers),
            name,
            members,
        }))
    }

    fn parse_enum_member(&mut self) -> EnumMember {
        let start = self.token_start();
        let name = self.parse_property_name();
        let initializer = self.parse_binding_initializer();
        EnumMember {
            data: self.finish(SyntaxKind::EnumMember, start),
            name,
            initializer,
        }
    }

    /// `namespace A.B { }`, `module "m" { }` and `declare global { }`.
    pub(crate) fn parse_module_declaration(&mut self, start: u32, modifiers: ModifierFlags) -> Statement {
        let keyword = self.token();
        let keyword_text = self.token_value().to_string();
        let declaration = match keyword {
            SyntaxKind::GlobalKeyword => {
                let name = self.identifier_from_token();
                let body = self.parse_optional_module_block();
                ModuleDeclaration {
                    data: self
                        .finish(SyntaxKind::ModuleDeclaration, start)
                        .with_modifiers(modifiers)
                        .with_flags(NodeFlags::GLOBAL_AUGMENTATION),
                    name: ModuleName::Identifier(name),
                    body,
                }
            }
            SyntaxKind::ModuleKeyword if self.next_token_is(SyntaxKind::StringLiteral) => {
                self.next_token();
                let name = self.parse_string_literal();
                let body = self.parse_optional_module_block();
                ModuleDeclaration {
                    data: self.finish(SyntaxKind::ModuleDeclaration, start).with_modifiers(modifiers),
                    name: ModuleName::StringLiteral(name),
                    body,
                }
            }
            _ => {
                let flags = if keyword == SyntaxKind::NamespaceKeyword {
                    NodeFlags::NAMESPACE
                } else {
                    NodeFlags::NONE
                };
                self.next_token();
                self.parse_namespace_rest(start, modifiers, flags)
            }
        };
        self.check_typescript_syntax(
            start,
            &messages::_0_DECLARATIONS_CAN_ONLY_BE_USED_IN_TYPESCRIPT_FILES,
            &[&keyword_text],
        );
        Statement::Module(Box::new(declaration))
    }

    fn parse_namespace_rest(&mut self, start: u32, modifiers: ModifierFlags, flags: NodeFlags) -> ModuleDeclaration {
        let name = self.parse_identifier();
        let body = if self.parse_optional(SyntaxKind::DotToken) {
            let inner_start = self.token_start();
            let inner = self.parse_namespace_rest(
                inner_start,
                ModifierFlags::EXPORT,
                NodeFlags::NESTED_NAMESPACE | (flags & NodeFlags::NAMESPACE),
            );
            ModuleBody::Namespace(Box::new(inner))
        } else {
            ModuleBody::Block(self.parse_module_block())
        };
        ModuleDeclaration {
            data: self
                .finish(SyntaxKind::ModuleDeclaration, start)
                .with_modifiers(modifiers)
                .with_flags(flags),
            name: ModuleName::Identifier(name),
            body: Some(body),
        }
    }

    fn parse_optional_module_block(&mut self) -> Option<ModuleBody> {
        if self.token() == SyntaxKind::OpenBraceToken {
            Some(ModuleBody::Block(self.parse_module_block()))
        } else {
            self.parse_semicolon();
            None
        }
    }

    fn parse_module_block(&mut self) -> ModuleBlock {
        let start = self.token_start();
        let statements = if self.parse_expected(SyntaxKind::OpenBraceToken) {
            let statements = self.parse_statement_list(ParsingContext::BlockStatements);
            self.parse_expected(SyntaxKind::CloseBraceToken);
            statements
        } else {
            Vec::new()
        };
        ModuleBlock {
            data: self.finish(SyntaxKind::ModuleBlock, start),
            statements,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::parse_program;
    use esforge_ast::*;
    use esforge_options::{ParseOptions, Syntax};

    fn parse_ts(source: &str) -> ParseResultStatements {
        let options = ParseOptions {
            syntax: Syntax::Typescript,
            decorators: true,
            file_name: "input.ts".to_string(),
            ..Default::default()
        };
        let result = parse_program(source, &options);
        ParseResultStatements {
            codes: result.diagnostics.iter().map(|d| d.code).collect(),
            statements: result.program.statements,
        }
    }

    struct ParseResultStatements {
        codes: Vec<u32>,
        statements: Vec<Statement>,
    }

    fn class_of(statement: &Statement) -> &Class {
        match statement {
            Statement::Class(class) => class,
            other => panic!("expected class, got {:?}", other.kind()),
        }
    }

    #[test]
    fn test_class_members() {
        let parsed = parse_ts(
            "class A extends B<T> implements C { static x = 1; #y?: string; get z() { return 1 } \
             constructor(private readonly a: number) {} static { init() } [key: string]: any; }",
        );
        assert!(parsed.codes.is_empty(), "{:?}", parsed.codes);
        let class = class_of(&parsed.statements[0]);
        assert!(class.super_type_arguments.is_some());
        assert_eq!(class.implements.len(), 1);
        let kinds: Vec<&str> = class
            .members
            .iter()
            .map(|m| match m {
                ClassElement::Property(_) => "property",
                ClassElement::Method(_) => "method",
                ClassElement::Constructor(_) => "constructor",
                ClassElement::IndexSignature(_) => "index",
                ClassElement::StaticBlock(_) => "static",
                ClassElement::Semicolon(_) => ";",
            })
            .collect();
        assert_eq!(kinds, vec!["property", "property", "method", "constructor", "static", "index"]);
        match &class.members[3] {
            ClassElement::Constructor(ctor) => assert!(ctor.function.parameters[0].is_parameter_property()),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_modifier_keywords_as_member_names() {
        let parsed = parse_ts("class A { static() {} get = 1; async\nfoo() {} }");
        assert!(parsed.codes.is_empty(), "{:?}", parsed.codes);
        assert_eq!(class_of(&parsed.statements[0]).members.len(), 4);
    }

    #[test]
    fn test_rest_parameter_must_be_last() {
        let parsed = parse_ts("function f(...a, b) {}");
        assert_eq!(parsed.codes, vec![1014]);
    }

    #[test]
    fn test_nested_namespace() {
        let parsed = parse_ts("namespace A.B { export const x = 1 }");
        match &parsed.statements[0] {
            Statement::Module(module) => match &module.body {
                Some(ModuleBody::Namespace(inner)) => {
                    assert!(inner.data.flags.contains(NodeFlags::NESTED_NAMESPACE));
                    assert!(inner.data.has_modifier(ModifierFlags::EXPORT));
                }
                other => panic!("expected nested namespace, got {:?}", other),
            },
            other => panic!("expected module, got {:?}", other.kind()),
        }
    }

    #[test]
    fn test_decorated_class_range_starts_at_decorator() {
        let parsed = parse_ts("@sealed export class A {}");
        let class = class_of(&parsed.statements[0]);
        assert_eq!(class.data.range.pos, 0);
        assert_eq!(class.decorators.len(), 1);
        assert!(class.data.has_modifier(ModifierFlags::EXPORT));
    }

    #[test]
    fn test_decorators_require_option() {
        let options = ParseOptions::for_file("input.ts");
        let result = parse_program("@d class A {}", &options);
        assert!(result.diagnostics.iter().any(|d| d.code == 1219));
    }
}
