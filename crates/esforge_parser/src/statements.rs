//! Statements and module items.

use esforge_ast::node::*;
use esforge_ast::syntax_kind::SyntaxKind;
use esforge_ast::types::*;
use esforge_diagnostics::messages;

use crate::parser::{Parser, ParserContext, ParsingContext};

impl Parser {
    pub(crate) fn parse_statement_list_element(&mut self) -> Statement {
        self.parse_statement()
    }

    pub(crate) fn parse_statement(&mut self) -> Statement {
        if !self.enter_recursion() {
            return Statement::Missing(self.skip_to_end_of_file());
        }
        let statement = self.parse_statement_worker();
        self.exit_recursion();
        statement
    }

    fn parse_statement_worker(&mut self) -> Statement {
        let start = self.token_start();
        match self.token() {
            SyntaxKind::SemicolonToken => {
                self.next_token();
                Statement::Empty(self.finish(SyntaxKind::EmptyStatement, start))
            }
            SyntaxKind::OpenBraceToken => Statement::Block(self.parse_block()),
            SyntaxKind::VarKeyword => self.parse_variable_statement(start, ModifierFlags::NONE),
            SyntaxKind::LetKeyword if self.is_let_declaration() => {
                self.parse_variable_statement(start, ModifierFlags::NONE)
            }
            SyntaxKind::UsingKeyword if self.is_using_declaration() => {
                self.parse_variable_statement(start, ModifierFlags::NONE)
            }
            SyntaxKind::ConstKeyword => {
                if self.next_token_is(SyntaxKind::EnumKeyword) {
                    self.parse_declaration(start, ModifierFlags::NONE, Vec::new())
                } else {
                    self.parse_variable_statement(start, ModifierFlags::NONE)
                }
            }
            SyntaxKind::FunctionKeyword => self.parse_function_declaration(start, ModifierFlags::NONE),
            SyntaxKind::AsyncKeyword if self.next_token_is_function_on_same_line() => {
                self.next_token();
                self.parse_function_declaration(start, ModifierFlags::ASYNC)
            }
            SyntaxKind::ClassKeyword => self.parse_class_declaration(start, ModifierFlags::NONE, Vec::new()),
            SyntaxKind::EnumKeyword => self.parse_declaration(start, ModifierFlags::NONE, Vec::new()),
            SyntaxKind::AtToken => self.parse_decorated_declaration(start),
            SyntaxKind::IfKeyword => self.parse_if_statement(start),
            SyntaxKind::DoKeyword => self.parse_do_statement(start),
            SyntaxKind::WhileKeyword => self.parse_while_statement(start),
            SyntaxKind::ForKeyword => self.parse_for_statement(start),
            SyntaxKind::ContinueKeyword | SyntaxKind::BreakKeyword => self.parse_jump_statement(start),
            SyntaxKind::ReturnKeyword => self.parse_return_statement(start),
            SyntaxKind::WithKeyword => self.parse_with_statement(start),
            SyntaxKind::SwitchKeyword => self.parse_switch_statement(start),
            SyntaxKind::ThrowKeyword => self.parse_throw_statement(start),
            SyntaxKind::TryKeyword | SyntaxKind::CatchKeyword | SyntaxKind::FinallyKeyword => {
                self.parse_try_statement(start)
            }
            SyntaxKind::DebuggerKeyword => {
                self.next_token();
                self.parse_semicolon();
                Statement::Debugger(self.finish(SyntaxKind::DebuggerStatement, start))
            }
            SyntaxKind::ImportKeyword if !self.is_import_expression_start() => {
                self.parse_import_declaration(start, ModifierFlags::NONE)
            }
            SyntaxKind::ExportKeyword => self.parse_export(start, Vec::new()),
            SyntaxKind::InterfaceKeyword
            | SyntaxKind::TypeKeyword
            | SyntaxKind::NamespaceKeyword
            | SyntaxKind::ModuleKeyword
            | SyntaxKind::DeclareKeyword
            | SyntaxKind::AbstractKeyword
            | SyntaxKind::GlobalKeyword
                if self.is_start_of_declaration() =>
            {
                self.parse_declaration(start, ModifierFlags::NONE, Vec::new())
            }
            _ => self.parse_expression_or_labeled_statement(start),
        }
    }

    pub(crate) fn parse_block(&mut self) -> Block {
        let start = self.token_start();
        let statements = if self.parse_expected(SyntaxKind::OpenBraceToken) {
            let statements = self.parse_statement_list(ParsingContext::BlockStatements);
            self.parse_expected(SyntaxKind::CloseBraceToken);
            statements
        } else {
            Vec::new()
        };
        Block {
            data: self.finish(SyntaxKind::Block, start),
            statements,
        }
    }

    // ========================================================================
    // Lookahead helpers
    // ========================================================================

    fn is_let_declaration(&mut self) -> bool {
        self.look_ahead(|p| {
            p.next_token();
            p.is_binding_identifier_or_pattern()
        })
    }

    pub(crate) fn is_using_declaration(&mut self) -> bool {
        self.look_ahead(|p| {
            p.next_token();
            !p.has_preceding_line_break() && p.is_identifier()
        })
    }

    pub(crate) fn next_token_is_function_on_same_line(&mut self) -> bool {
        self.look_ahead(|p| {
            p.next_token();
            p.token() == SyntaxKind::FunctionKeyword && !p.has_preceding_line_break()
        })
    }

    /// `import(...)` and `import.meta` are expressions.
    fn is_import_expression_start(&mut self) -> bool {
        self.look_ahead(|p| {
            matches!(p.next_token(), SyntaxKind::OpenParenToken | SyntaxKind::DotToken)
        })
    }

    /// Whether a contextual keyword starts a declaration rather than an
    /// expression (`type T = 1` versus `type = 1`).
    pub(crate) fn is_start_of_declaration(&mut self) -> bool {
        self.look_ahead(|p| {
            let keyword = p.token();
            p.next_token();
            if p.has_preceding_line_break() {
                return false;
            }
            match keyword {
                SyntaxKind::InterfaceKeyword | SyntaxKind::TypeKeyword => p.is_identifier(),
                SyntaxKind::NamespaceKeyword | SyntaxKind::ModuleKeyword => {
                    p.is_identifier() || p.token() == SyntaxKind::StringLiteral
                }
                SyntaxKind::AbstractKeyword => p.token() == SyntaxKind::ClassKeyword,
                SyntaxKind::DeclareKeyword => p.token().is_identifier_or_keyword(),
                SyntaxKind::GlobalKeyword => p.token() == SyntaxKind::OpenBraceToken,
                _ => false,
            }
        })
    }

    // ========================================================================
    // Declarations with modifiers
    // ========================================================================

    /// A declaration preceded by any of `declare`, `abstract`, `const` (for
    /// `const enum`) and the modifiers already consumed by the caller.
    pub(crate) fn parse_declaration(
        &mut self,
        start: u32,
        mut modifiers: ModifierFlags,
        decorators: Vec<Decorator>,
    ) -> Statement {
        loop {
            match self.token() {
                SyntaxKind::DeclareKeyword if self.next_token_is_identifier_or_keyword_on_same_line() => {
                    let keyword_start = self.token_start();
                    self.next_token();
                    self.check_typescript_syntax(
                        keyword_start,
                        &messages::_0_DECLARATIONS_CAN_ONLY_BE_USED_IN_TYPESCRIPT_FILES,
                        &["declare"],
                    );
                    modifiers |= ModifierFlags::AMBIENT;
                }
                SyntaxKind::AbstractKeyword if self.next_token_is(SyntaxKind::ClassKeyword) => {
                    let keyword_start = self.token_start();
                    self.next_token();
                    self.check_typescript_syntax(
                        keyword_start,
                        &messages::_0_DECLARATIONS_CAN_ONLY_BE_USED_IN_TYPESCRIPT_FILES,
                        &["abstract"],
                    );
                    modifiers |= ModifierFlags::ABSTRACT;
                }
                SyntaxKind::ConstKeyword if self.next_token_is(SyntaxKind::EnumKeyword) => {
                    self.next_token();
                    modifiers |= ModifierFlags::CONST;
                }
                _ => break,
            }
        }
        if modifiers.contains(ModifierFlags::AMBIENT) {
            self.with_context(ParserContext::AMBIENT, ParserContext::empty(), |p| {
                p.parse_declaration_worker(start, modifiers, decorators)
            })
        } else {
            self.parse_declaration_worker(start, modifiers, decorators)
        }
    }

    fn parse_declaration_worker(
        &mut self,
        start: u32,
        modifiers: ModifierFlags,
        decorators: Vec<Decorator>,
    ) -> Statement {
        match self.token() {
            SyntaxKind::VarKeyword | SyntaxKind::LetKeyword | SyntaxKind::ConstKeyword | SyntaxKind::UsingKeyword => {
                self.parse_variable_statement(start, modifiers)
            }
            SyntaxKind::FunctionKeyword => self.parse_function_declaration(start, modifiers),
            SyntaxKind::AsyncKeyword if self.next_token_is_function_on_same_line() => {
                self.next_token();
                self.parse_function_declaration(start, modifiers | ModifierFlags::ASYNC)
            }
            SyntaxKind::ClassKeyword => self.parse_class_declaration(start, modifiers, decorators),
            SyntaxKind::InterfaceKeyword => self.parse_interface_declaration(start, modifiers),
            SyntaxKind::TypeKeyword => self.parse_type_alias_declaration(start, modifiers),
            SyntaxKind::EnumKeyword => self.parse_enum_declaration(start, modifiers),
            SyntaxKind::NamespaceKeyword | SyntaxKind::ModuleKeyword | SyntaxKind::GlobalKeyword => {
                self.parse_module_declaration(start, modifiers)
            }
            SyntaxKind::ImportKeyword => self.parse_import_declaration(start, modifiers),
            _ => {
                self.error_at_current_token(&messages::DECLARATION_OR_STATEMENT_EXPECTED, &[]);
                let mut statement = self.parse_statement();
                statement.data_mut().modifier_flags |= modifiers;
                statement
            }
        }
    }

    fn parse_decorated_declaration(&mut self, start: u32) -> Statement {
        let decorators = self.parse_decorators();
        match self.token() {
            SyntaxKind::ExportKeyword => self.parse_export(start, decorators),
            SyntaxKind::ClassKeyword => self.parse_class_declaration(start, ModifierFlags::NONE, decorators),
            SyntaxKind::AbstractKeyword | SyntaxKind::DeclareKeyword => {
                self.parse_declaration(start, ModifierFlags::NONE, decorators)
            }
            _ => {
                let (pos, end) = (start, self.prev_token_end());
                self.error_at(pos, end, &messages::DECORATORS_ARE_NOT_VALID_HERE, &[]);
                self.parse_statement()
            }
        }
    }

    // ========================================================================
    // Variable statements
    // ========================================================================

    fn parse_variable_statement(&mut self, start: u32, modifiers: ModifierFlags) -> Statement {
        let declaration_list = self.parse_variable_declaration_list();
        self.parse_semicolon();
        Statement::Variable(VariableStatement {
            data: self.finish(SyntaxKind::VariableStatement, start).with_modifiers(modifiers),
            declaration_list,
        })
    }

    /// `var`/`let`/`const`/`using` followed by declarations. In a for-statement
    /// head the caller sets `DISALLOW_IN`.
    pub(crate) fn parse_variable_declaration_list(&mut self) -> VariableDeclarationList {
        let start = self.token_start();
        let kind = match self.token() {
            SyntaxKind::VarKeyword => VariableKind::Var,
            SyntaxKind::LetKeyword => VariableKind::Let,
            SyntaxKind::ConstKeyword => VariableKind::Const,
            _ => VariableKind::Using,
        };
        self.next_token();
        let declarations = self.parse_delimited_list(
            ParsingContext::VariableDeclarations,
            Parser::parse_variable_declaration,
            false,
        );
        if declarations.is_empty() {
            self.error_at_current_token(&messages::VARIABLE_DECLARATION_EXPECTED, &[]);
        }
        VariableDeclarationList {
            data: self.finish(SyntaxKind::VariableDeclarationList, start),
            kind,
            declarations,
        }
    }

    fn parse_variable_declaration(&mut self) -> VariableDeclaration {
        let start = self.token_start();
        let name = self.parse_binding_name();
        let exclamation = matches!(name, BindingName::Identifier(_))
            && self.token() == SyntaxKind::ExclamationToken
            && !self.has_preceding_line_break();
        if exclamation {
            self.next_token();
        }
        let type_annotation = self.parse_type_annotation();
        let initializer = if self.parse_optional(SyntaxKind::EqualsToken) {
            Some(self.parse_assignment_expression())
        } else {
            None
        };
        VariableDeclaration {
            data: self.finish(SyntaxKind::VariableDeclaration, start),
            name,
            exclamation,
            type_annotation,
            initializer,
        }
    }

    // ========================================================================
    // Control flow
    // ========================================================================

    /// `( expression )` around a condition.
    fn parse_parenthesized_condition(&mut self) -> Expression {
        self.parse_expected(SyntaxKind::OpenParenToken);
        let expression = self.with_context(ParserContext::empty(), ParserContext::DISALLOW_IN, Parser::parse_expression);
        self.parse_expected(SyntaxKind::CloseParenToken);
        expression
    }

    fn parse_if_statement(&mut self, start: u32) -> Statement {
        self.parse_expected(SyntaxKind::IfKeyword);
        let condition = self.parse_parenthesized_condition();
        let then_statement = Box::new(self.parse_statement());
        let else_statement = if self.parse_optional(SyntaxKind::ElseKeyword) {
            Some(Box::new(self.parse_statement()))
        } else {
            None
        };
        Statement::If(IfStatement {
            data: self.finish(SyntaxKind::IfStatement, start),
            condition,
            then_statement,
            else_statement,
        })
    }

    fn parse_do_statement(&mut self, start: u32) -> Statement {
        self.parse_expected(SyntaxKind::DoKeyword);
        let statement = Box::new(self.parse_statement());
        self.parse_expected(SyntaxKind::WhileKeyword);
        let condition = self.parse_parenthesized_condition();
        // A semicolon is always inserted after `do ... while (x)`.
        self.parse_optional(SyntaxKind::SemicolonToken);
        Statement::Do(DoStatement {
            data: self.finish(SyntaxKind::DoStatement, start),
            statement,
            condition,
        })
    }

    fn parse_while_statement(&mut self, start: u32) -> Statement {
        self.parse_expected(SyntaxKind::WhileKeyword);
        let condition = self.parse_parenthesized_condition();
        let statement = Box::new(self.parse_statement());
        Statement::While(WhileStatement {
            data: self.finish(SyntaxKind::WhileStatement, start),
            condition,
            statement,
        })
    }

    fn parse_for_statement(&mut self, start: u32) -> Statement {
        self.parse_expected(SyntaxKind::ForKeyword);
        let is_await = self.parse_optional(SyntaxKind::AwaitKeyword);
        self.parse_expected(SyntaxKind::OpenParenToken);

        let initializer = match self.token() {
            SyntaxKind::SemicolonToken => None,
            SyntaxKind::VarKeyword | SyntaxKind::ConstKeyword => Some(self.parse_for_declaration_list()),
            SyntaxKind::LetKeyword if self.is_let_declaration() => Some(self.parse_for_declaration_list()),
            SyntaxKind::UsingKeyword if self.is_using_declaration() => Some(self.parse_for_declaration_list()),
            _ => Some(ForInitializer::Expression(self.with_context(
                ParserContext::DISALLOW_IN,
                ParserContext::empty(),
                Parser::parse_expression,
            ))),
        };

        match initializer {
            Some(initializer) if self.token() == SyntaxKind::OfKeyword => {
                self.next_token();
                self.check_single_for_declaration(&initializer, "of");
                let expression = self.with_context(
                    ParserContext::empty(),
                    ParserContext::DISALLOW_IN,
                    Parser::parse_assignment_expression,
                );
                self.parse_expected(SyntaxKind::CloseParenToken);
                let statement = Box::new(self.parse_statement());
                Statement::ForOf(ForOfStatement {
                    data: self.finish(SyntaxKind::ForOfStatement, start),
                    is_await,
                    initializer,
                    expression,
                    statement,
                })
            }
            Some(initializer) if self.token() == SyntaxKind::InKeyword => {
                self.next_token();
                self.check_single_for_declaration(&initializer, "in");
                let expression = self.with_context(
                    ParserContext::empty(),
                    ParserContext::DISALLOW_IN,
                    Parser::parse_expression,
                );
                self.parse_expected(SyntaxKind::CloseParenToken);
                let statement = Box::new(self.parse_statement());
                Statement::ForIn(ForInStatement {
                    data: self.finish(SyntaxKind::ForInStatement, start),
                    initializer,
                    expression,
                    statement,
                })
            }
            initializer => {
                self.parse_expected(SyntaxKind::SemicolonToken);
                let condition = if !matches!(self.token(), SyntaxKind::SemicolonToken | SyntaxKind::CloseParenToken) {
                    Some(self.with_context(ParserContext::empty(), ParserContext::DISALLOW_IN, Parser::parse_expression))
                } else {
                    None
                };
                self.parse_expected(SyntaxKind::SemicolonToken);
                let incrementor = if self.token() != SyntaxKind::CloseParenToken {
                    Some(self.with_context(ParserContext::empty(), ParserContext::DISALLOW_IN, Parser::parse_expression))
                } else {
                    None
                };
                self.parse_expected(SyntaxKind::CloseParenToken);
                let statement = Box::new(self.parse_statement());
                Statement::For(ForStatement {
                    data: self.finish(SyntaxKind::ForStatement, start),
                    initializer,
                    condition,
                    incrementor,
                    statement,
                })
            }
        }
    }

    fn parse_for_declaration_list(&mut self) -> ForInitializer {
        ForInitializer::Variable(self.with_context(
            ParserContext::DISALLOW_IN,
            ParserContext::empty(),
            Parser::parse_variable_declaration_list,
        ))
    }

    fn check_single_for_declaration(&mut self, initializer: &ForInitializer, keyword: &str) {
        if let ForInitializer::Variable(list) = initializer {
            if list.declarations.len() > 1 {
                let range = list.declarations[1].data.range;
                self.error_at(
                    range.pos,
                    range.end,
                    &messages::ONLY_A_SINGLE_VARIABLE_DECLARATION_IS_ALLOWED_IN_A_FOR_0_STATEMENT,
                    &[keyword],
                );
            }
        }
    }

    fn parse_jump_statement(&mut self, start: u32) -> Statement {
        let is_break = self.token() == SyntaxKind::BreakKeyword;
        self.next_token();
        let label = if !self.can_parse_semicolon() && self.is_identifier() {
            Some(self.identifier_from_token())
        } else {
            None
        };
        self.parse_semicolon();
        if is_break {
            Statement::Break(JumpStatement {
                data: self.finish(SyntaxKind::BreakStatement, start),
                label,
            })
        } else {
            Statement::Continue(JumpStatement {
                data: self.finish(SyntaxKind::ContinueStatement, start),
                label,
            })
        }
    }

    fn parse_return_statement(&mut self, start: u32) -> Statement {
        self.parse_expected(SyntaxKind::ReturnKeyword);
        let expression = if self.can_parse_semicolon() {
            None
        } else {
            Some(self.parse_expression())
        };
        self.parse_semicolon();
        Statement::Return(ReturnStatement {
            data: self.finish(SyntaxKind::ReturnStatement, start),
            expression,
        })
    }

    fn parse_with_statement(&mut self, start: u32) -> Statement {
        self.parse_expected(SyntaxKind::WithKeyword);
        let expression = self.parse_parenthesized_condition();
        let statement = Box::new(self.parse_statement());
        Statement::With(WithStatement {
            data: self.finish(SyntaxKind::WithStatement, start),
            expression,
            statement,
        })
    }

    fn parse_switch_statement(&mut self, start: u32) -> Statement {
        self.parse_expected(SyntaxKind::SwitchKeyword);
        let expression = self.parse_parenthesized_condition();
        let clauses = if self.parse_expected(SyntaxKind::OpenBraceToken) {
            let clauses = self.parse_list(ParsingContext::SwitchClauses, Parser::parse_case_clause);
            self.parse_expected(SyntaxKind::CloseBraceToken);
            clauses
        } else {
            Vec::new()
        };
        Statement::Switch(SwitchStatement {
            data: self.finish(SyntaxKind::SwitchStatement, start),
            expression,
            clauses,
        })
    }

    fn parse_case_clause(&mut self) -> CaseClause {
        let start = self.token_start();
        let (kind, expression) = if self.parse_optional(SyntaxKind::CaseKeyword) {
            (SyntaxKind::CaseClause, Some(self.parse_expression()))
        } else {
            self.parse_expected(SyntaxKind::DefaultKeyword);
            (SyntaxKind::DefaultClause, None)
        };
        self.parse_expected(SyntaxKind::ColonToken);
        let statements = self.parse_statement_list(ParsingContext::SwitchClauseStatements);
        CaseClause {
            data: self.finish(kind, start),
            expression,
            statements,
        }
    }

    fn parse_throw_statement(&mut self, start: u32) -> Statement {
        self.parse_expected(SyntaxKind::ThrowKeyword);
        let expression = if self.has_preceding_line_break() {
            self.missing_expression(&messages::EXPRESSION_EXPECTED)
        } else {
            self.parse_expression()
        };
        self.parse_semicolon();
        Statement::Throw(ThrowStatement {
            data: self.finish(SyntaxKind::ThrowStatement, start),
            expression,
        })
    }

    fn parse_try_statement(&mut self, start: u32) -> Statement {
        self.parse_expected(SyntaxKind::TryKeyword);
        let try_block = self.parse_block();

        let catch_clause = if self.token() == SyntaxKind::CatchKeyword {
            let catch_start = self.token_start();
            self.next_token();
            let variable_declaration = if self.parse_optional(SyntaxKind::OpenParenToken) {
                let declaration = self.parse_variable_declaration();
                self.parse_expected(SyntaxKind::CloseParenToken);
                Some(declaration)
            } else {
                None
            };
            let block = self.parse_block();
            Some(CatchClause {
                data: self.finish(SyntaxKind::CatchClause, catch_start),
                variable_declaration,
                block,
            })
        } else {
            None
        };

        let finally_block = if catch_clause.is_none() || self.token() == SyntaxKind::FinallyKeyword {
            self.parse_expected(SyntaxKind::FinallyKeyword);
            Some(self.parse_block())
        } else {
            None
        };

        Statement::Try(TryStatement {
            data: self.finish(SyntaxKind::TryStatement, start),
            try_block,
            catch_clause,
            finally_block,
        })
    }

    fn parse_expression_or_labeled_statement(&mut self, start: u32) -> Statement {
        if self.is_identifier() && self.next_token_is(SyntaxKind::ColonToken) {
            let label = self.identifier_from_token();
            self.parse_expected(SyntaxKind::ColonToken);
            let statement = Box::new(self.parse_statement());
            return Statement::Labeled(LabeledStatement {
                data: self.finish(SyntaxKind::LabeledStatement, start),
                label,
                statement,
            });
        }
        let expression = self.parse_expression();
        self.parse_semicolon();
        Statement::Expression(ExpressionStatement {
            data: self.finish(SyntaxKind::ExpressionStatement, start),
            expression,
        })
    }

    // ========================================================================
    // Imports
    // ========================================================================

    fn parse_import_declaration(&mut self, start: u32, modifiers: ModifierFlags) -> Statement {
        self.parse_expected(SyntaxKind::ImportKeyword);
        let clause_start = self.token_start();

        let is_type_only = self.token() == SyntaxKind::TypeKeyword && self.look_ahead(Parser::next_is_type_only_import);
        if is_type_only {
            self.next_token();
            self.check_typescript_syntax(
                clause_start,
                &messages::_0_DECLARATIONS_CAN_ONLY_BE_USED_IN_TYPESCRIPT_FILES,
                &["import type"],
            );
        }

        if self.is_identifier() && self.next_token_is(SyntaxKind::EqualsToken) {
            return self.parse_import_equals_declaration(start, modifiers, is_type_only);
        }

        let import_clause = if self.token() == SyntaxKind::StringLiteral {
            None
        } else {
            let name = if self.is_identifier() {
                Some(self.identifier_from_token())
            } else {
                None
            };
            let named_bindings = if name.is_none() || self.parse_optional(SyntaxKind::CommaToken) {
                Some(self.parse_named_import_bindings())
            } else {
                None
            };
            self.parse_expected(SyntaxKind::FromKeyword);
            Some(ImportClause {
                data: self.finish(SyntaxKind::ImportClause, clause_start),
                is_type_only,
                name,
                named_bindings,
            })
        };

        let module_specifier = self.parse_expected_string_literal();
        let attributes = self.parse_import_attributes();
        self.parse_semicolon();
        Statement::Import(ImportDeclaration {
            data: self.finish(SyntaxKind::ImportDeclaration, start).with_modifiers(modifiers),
            import_clause,
            module_specifier,
            attributes,
        })
    }

    /// After `import type`: `{`, `*`, or a default binding makes the import
    /// type-only; `import type from "m"` imports a binding named `type`.
    fn next_is_type_only_import(&mut self) -> bool {
        match self.next_token() {
            SyntaxKind::OpenBraceToken | SyntaxKind::AsteriskToken => true,
            SyntaxKind::FromKeyword => self.next_token() == SyntaxKind::FromKeyword,
            SyntaxKind::EqualsToken | SyntaxKind::CommaToken => false,
            _ => self.is_identifier(),
        }
    }

    fn parse_named_import_bindings(&mut self) -> NamedImportBindings {
        if self.parse_optional(SyntaxKind::AsteriskToken) {
            self.parse_expected(SyntaxKind::AsKeyword);
            return NamedImportBindings::Namespace(self.parse_identifier());
        }
        NamedImportBindings::Named(self.parse_bracketed_list(
            ParsingContext::ImportOrExportSpecifiers,
            Parser::parse_import_specifier,
            SyntaxKind::OpenBraceToken,
            SyntaxKind::CloseBraceToken,
        ))
    }

    /// `type` before a specifier name marks it type-only unless `type` is
    /// itself the imported name (`{ type }`, `{ type as t }`).
    fn is_type_only_specifier(&mut self) -> bool {
        if self.token() != SyntaxKind::TypeKeyword {
            return false;
        }
        self.look_ahead(|p| match p.next_token() {
            SyntaxKind::AsKeyword => matches!(p.next_token(), SyntaxKind::AsKeyword),
            SyntaxKind::CommaToken | SyntaxKind::CloseBraceToken => false,
            kind => kind.is_identifier_or_keyword() || kind == SyntaxKind::StringLiteral,
        })
    }

    fn parse_module_export_name(&mut self) -> ModuleExportName {
        if self.token() == SyntaxKind::StringLiteral {
            ModuleExportName::StringLiteral(self.parse_string_literal())
        } else {
            ModuleExportName::Identifier(self.parse_identifier_name())
        }
    }

    fn parse_import_specifier(&mut self) -> ImportSpecifier {
        let start = self.token_start();
        let is_type_only = self.is_type_only_specifier();
        if is_type_only {
            self.next_token();
        }
        let first_is_binding = self.is_identifier();
        let first = self.parse_module_export_name();
        let (property_name, name) = if self.parse_optional(SyntaxKind::AsKeyword) {
            (Some(first), self.parse_identifier())
        } else {
            match first {
                ModuleExportName::Identifier(id) if first_is_binding => (None, id),
                ModuleExportName::Identifier(id) => {
                    self.error_at(id.data.range.pos, id.data.range.end, &messages::IDENTIFIER_EXPECTED, &[]);
                    (None, id)
                }
                ModuleExportName::StringLiteral(literal) => {
                    self.error_at(
                        literal.data.range.pos,
                        literal.data.range.end,
                        &messages::_0_EXPECTED,
                        &["as"],
                    );
                    let name = self.missing_identifier(&messages::IDENTIFIER_EXPECTED);
                    (Some(ModuleExportName::StringLiteral(literal)), name)
                }
            }
        };
        ImportSpecifier {
            data: self.finish(SyntaxKind::ImportSpecifier, start),
            is_type_only,
            property_name,
            name,
        }
    }

    /// `with { type: "json" }` or the legacy `assert { ... }`.
    fn parse_import_attributes(&mut self) -> Option<ImportAttributes> {
        // `assert` has no keyword kind of its own; it is recorded as `AssertsKeyword`.
        let keyword = match self.token() {
            SyntaxKind::WithKeyword => SyntaxKind::WithKeyword,
            SyntaxKind::Identifier if self.token_value() == "assert" && !self.has_preceding_line_break() => {
                SyntaxKind::AssertsKeyword
            }
            _ => return None,
        };
        let start = self.token_start();
        self.next_token();
        let elements = self.parse_bracketed_list(
            ParsingContext::ImportAttributes,
            Parser::parse_import_attribute,
            SyntaxKind::OpenBraceToken,
            SyntaxKind::CloseBraceToken,
        );
        Some(ImportAttributes {
            data: self.finish(SyntaxKind::ImportAttributes, start),
            keyword,
            elements,
        })
    }

    fn parse_import_attribute(&mut self) -> ImportAttribute {
        let start = self.token_start();
        let name = self.parse_module_export_name();
        self.parse_expected(SyntaxKind::ColonToken);
        let value = self.parse_expected_string_literal();
        ImportAttribute {
            data: self.finish(SyntaxKind::ImportAttribute, start),
            name,
            value,
        }
    }

    fn parse_import_equals_declaration(&mut self, start: u32, modifiers: ModifierFlags, is_type_only: bool) -> Statement {
        let name = self.identifier_from_token();
        self.parse_expected(SyntaxKind::EqualsToken);
        let module_reference = if self.token() == SyntaxKind::RequireKeyword
            && self.next_token_is(SyntaxKind::OpenParenToken)
        {
            self.next_token();
            self.parse_expected(SyntaxKind::OpenParenToken);
            let specifier = self.parse_expected_string_literal();
            self.parse_expected(SyntaxKind::CloseParenToken);
            ModuleReference::External(specifier)
        } else {
            ModuleReference::Entity(self.parse_entity_name(false))
        };
        self.parse_semicolon();
        self.check_typescript_syntax(
            start,
            &messages::_0_DECLARATIONS_CAN_ONLY_BE_USED_IN_TYPESCRIPT_FILES,
            &["import ="],
        );
        Statement::ImportEquals(ImportEqualsDeclaration {
            data: self.finish(SyntaxKind::ImportEqualsDeclaration, start).with_modifiers(modifiers),
            is_type_only,
            name,
            module_reference,
        })
    }

    // ========================================================================
    // Exports
    // ========================================================================

    fn parse_export(&mut self, start: u32, decorators: Vec<Decorator>) -> Statement {
        self.parse_expected(SyntaxKind::ExportKeyword);
        match self.token() {
            SyntaxKind::EqualsToken => {
                self.next_token();
                let expression = self.parse_assignment_expression();
                self.parse_semicolon();
                self.check_typescript_syntax(
                    start,
                    &messages::_0_DECLARATIONS_CAN_ONLY_BE_USED_IN_TYPESCRIPT_FILES,
                    &["export ="],
                );
                Statement::ExportAssignment(ExportAssignment {
                    data: self.finish(SyntaxKind::ExportAssignment, start),
                    is_export_equals: true,
                    expression,
                })
            }
            SyntaxKind::AsKeyword => {
                self.next_token();
                self.parse_expected(SyntaxKind::NamespaceKeyword);
                let name = self.parse_identifier();
                self.parse_semicolon();
                Statement::NamespaceExport(NamespaceExportDeclaration {
                    data: self.finish(SyntaxKind::NamespaceExportDeclaration, start),
                    name,
                })
            }
            SyntaxKind::DefaultKeyword => {
                self.next_token();
                self.parse_export_default(start, decorators)
            }
            SyntaxKind::AsteriskToken | SyntaxKind::OpenBraceToken => self.parse_export_declaration(start, false),
            SyntaxKind::TypeKeyword
                if self.look_ahead(|p| {
                    matches!(p.next_token(), SyntaxKind::OpenBraceToken | SyntaxKind::AsteriskToken)
                }) =>
            {
                let type_start = self.token_start();
                self.next_token();
                self.check_typescript_syntax(
                    type_start,
                    &messages::_0_DECLARATIONS_CAN_ONLY_BE_USED_IN_TYPESCRIPT_FILES,
                    &["export type"],
                );
                self.parse_export_declaration(start, true)
            }
            SyntaxKind::AtToken => {
                let mut all = decorators;
                all.extend(self.parse_decorators());
                self.parse_declaration(start, ModifierFlags::EXPORT, all)
            }
            _ => self.parse_declaration(start, ModifierFlags::EXPORT, decorators),
        }
    }

    fn parse_export_default(&mut self, start: u32, mut decorators: Vec<Decorator>) -> Statement {
        let modifiers = ModifierFlags::EXPORT_DEFAULT;
        match self.token() {
            SyntaxKind::FunctionKeyword => self.parse_function_declaration(start, modifiers),
            SyntaxKind::AsyncKeyword if self.next_token_is_function_on_same_line() => {
                self.next_token();
                self.parse_function_declaration(start, modifiers | ModifierFlags::ASYNC)
            }
            SyntaxKind::ClassKeyword => self.parse_class_declaration(start, modifiers, decorators),
            SyntaxKind::AtToken => {
                decorators.extend(self.parse_decorators());
                self.parse_declaration(start, modifiers, decorators)
            }
            SyntaxKind::AbstractKeyword if self.next_token_is(SyntaxKind::ClassKeyword) => {
                self.parse_declaration(start, modifiers, decorators)
            }
            SyntaxKind::InterfaceKeyword if self.is_start_of_declaration() => {
                self.parse_interface_declaration(start, modifiers)
            }
            _ => {
                let expression = self.parse_assignment_expression();
                self.parse_semicolon();
                Statement::ExportAssignment(ExportAssignment {
                    data: self.finish(SyntaxKind::ExportAssignment, start),
                    is_export_equals: false,
                    expression,
                })
            }
        }
    }

    fn parse_export_declaration(&mut self, start: u32, is_type_only: bool) -> Statement {
        let (export_clause, module_specifier) = if self.parse_optional(SyntaxKind::AsteriskToken) {
            let clause = if self.parse_optional(SyntaxKind::AsKeyword) {
                Some(ExportClause::Namespace(self.parse_module_export_name()))
            } else {
                None
            };
            self.parse_expected(SyntaxKind::FromKeyword);
            (clause, Some(self.parse_expected_string_literal()))
        } else {
            let specifiers = self.parse_bracketed_list(
                ParsingContext::ImportOrExportSpecifiers,
                Parser::parse_export_specifier,
                SyntaxKind::OpenBraceToken,
                SyntaxKind::CloseBraceToken,
            );
            let module_specifier = if self.parse_optional(SyntaxKind::FromKeyword) {
                Some(self.parse_expected_string_literal())
            } else {
                None
            };
            (Some(ExportClause::Named(specifiers)), module_specifier)
        };
        let attributes = if module_specifier.is_some() {
            self.parse_import_attributes()
        } else {
            None
        };
        self.parse_semicolon();
        Statement::Export(ExportDeclaration {
            data: self.finish(SyntaxKind::ExportDeclaration, start),
            is_type_only,
            export_clause,
            module_specifier,
            attributes,
        })
    }

    fn parse_export_specifier(&mut self) -> ExportSpecifier {
        let start = self.token_start();
        let is_type_only = self.is_type_only_specifier();
        if is_type_only {
            self.next_token();
        }
        let first = self.parse_module_export_name();
        let (property_name, name) = if self.parse_optional(SyntaxKind::AsKeyword) {
            (Some(first), self.parse_module_export_name())
        } else {
            (None, first)
        };
        ExportSpecifier {
            data: self.finish(SyntaxKind::ExportSpecifier, start),
            is_type_only,
            property_name,
            name,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::parse_program;
    use esforge_ast::*;
    use esforge_options::{ParseOptions, Syntax};

    fn parse_ts(source: &str) -> Vec<Statement> {
        let options = ParseOptions {
            syntax: Syntax::Typescript,
            file_name: "input.ts".to_string(),
            ..Default::default()
        };
        let result = parse_program(source, &options);
        assert!(result.diagnostics.is_empty(), "unexpected diagnostics: {:?}", result.diagnostics);
        result.program.statements
    }

    #[test]
    fn test_import_type_forms() {
        let statements = parse_ts("import type from 'a'; import type { T } from 'b'; import type from from 'c';");
        let flags: Vec<bool> = statements
            .iter()
            .map(|s| match s {
                Statement::Import(import) => import.import_clause.as_ref().map_or(false, |c| c.is_type_only),
                other => panic!("expected import, got {:?}", other.kind()),
            })
            .collect();
        assert_eq!(flags, vec![false, true, true]);
    }

    #[test]
    fn test_for_in_disallows_in_operator_in_head() {
        let statements = parse_ts("for (const key in object) {}");
        assert!(matches!(statements[0], Statement::ForIn(_)));
    }

    #[test]
    fn test_export_default_expression_and_declaration() {
        let statements = parse_ts("export default 1 + 2; export default function () {}");
        assert!(matches!(statements[0], Statement::ExportAssignment(_)));
        match &statements[1] {
            Statement::Function(function) => {
                assert!(function.data.has_modifier(ModifierFlags::DEFAULT));
                assert!(function.name.is_none());
            }
            other => panic!("expected function, got {:?}", other.kind()),
        }
    }

    #[test]
    fn test_contextual_keywords_as_identifiers() {
        let statements = parse_ts("type = 1; namespace.x = 2; declare(3);");
        assert!(statements.iter().all(|s| matches!(s, Statement::Expression(_))));
    }
}
