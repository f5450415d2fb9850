//! The parser core: token cursor, speculation, diagnostics and list recovery.
//!
//! Grammar productions live in sibling modules as further `impl Parser`
//! blocks (`statements`, `expressions`, `types`, `jsx`). Every production
//! returns a node; malformed input yields `Missing` placeholders plus a
//! diagnostic so the rest of the file still parses.

use esforge_ast::node::*;
use esforge_ast::syntax_kind::SyntaxKind;
use esforge_ast::types::*;
use esforge_core::text::TextSpan;
use esforge_diagnostics::{messages, Diagnostic, DiagnosticCollection, DiagnosticMessage};
use esforge_options::ParseOptions;
use esforge_scanner::{Scanner, ScannerState};

use crate::utilities::{
    can_start_statement, is_literal_property_name, is_start_of_expression, is_start_of_type, token_to_string,
};

/// Maximum recursion depth to prevent stack overflow on deeply nested input.
pub(crate) const MAX_RECURSION_DEPTH: u32 = 200;

bitflags::bitflags! {
    /// Grammar parameters in effect for the production being parsed.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub(crate) struct ParserContext: u16 {
        /// Inside a generator: `yield` is an operator.
        const YIELD = 1 << 0;
        /// Inside an async function or module top level: `await` is an operator.
        const AWAIT = 1 << 1;
        /// For-statement head: `in` is not a binary operator.
        const DISALLOW_IN = 1 << 2;
        /// Inside `declare` or a `.d.ts`-style ambient block.
        const AMBIENT = 1 << 3;
        /// Parsing a decorator expression: no call arguments after a member chain break.
        const DECORATOR = 1 << 4;
        /// Parsing the `when_true` branch of a conditional.
        const IN_CONDITIONAL_WHEN_TRUE = 1 << 5;
        /// `extends` in a conditional type check position.
        const DISALLOW_CONDITIONAL_TYPES = 1 << 6;
    }
}

/// List productions tracked for error recovery. A token that terminates or
/// starts an element of any enclosing list stops skipping in the inner one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ParsingContext {
    SourceElements,
    BlockStatements,
    SwitchClauses,
    SwitchClauseStatements,
    TypeMembers,
    ClassMembers,
    EnumMembers,
    HeritageClauseElements,
    VariableDeclarations,
    ObjectBindingElements,
    ArrayBindingElements,
    ArgumentExpressions,
    ObjectLiteralMembers,
    ArrayLiteralMembers,
    Parameters,
    TypeParameters,
    TypeArguments,
    TupleElementTypes,
    ImportOrExportSpecifiers,
    ImportAttributes,
}

impl ParsingContext {
    const ALL: [ParsingContext; 20] = [
        ParsingContext::SourceElements,
        ParsingContext::BlockStatements,
        ParsingContext::SwitchClauses,
        ParsingContext::SwitchClauseStatements,
        ParsingContext::TypeMembers,
        ParsingContext::ClassMembers,
        ParsingContext::EnumMembers,
        ParsingContext::HeritageClauseElements,
        ParsingContext::VariableDeclarations,
        ParsingContext::ObjectBindingElements,
        ParsingContext::ArrayBindingElements,
        ParsingContext::ArgumentExpressions,
        ParsingContext::ObjectLiteralMembers,
        ParsingContext::ArrayLiteralMembers,
        ParsingContext::Parameters,
        ParsingContext::TypeParameters,
        ParsingContext::TypeArguments,
        ParsingContext::TupleElementTypes,
        ParsingContext::ImportOrExportSpecifiers,
        ParsingContext::ImportAttributes,
    ];

    #[inline]
    fn bit(self) -> u32 {
        1 << (self as u32)
    }

    fn error_message(self) -> &'static DiagnosticMessage {
        match self {
            ParsingContext::SourceElements
            | ParsingContext::BlockStatements
            | ParsingContext::SwitchClauseStatements => &messages::DECLARATION_OR_STATEMENT_EXPECTED,
            ParsingContext::SwitchClauses => &messages::CASE_OR_DEFAULT_EXPECTED,
            ParsingContext::TypeMembers => &messages::PROPERTY_OR_SIGNATURE_EXPECTED,
            ParsingContext::ClassMembers => &messages::UNEXPECTED_TOKEN,
            ParsingContext::EnumMembers => &messages::ENUM_MEMBER_EXPECTED,
            ParsingContext::HeritageClauseElements | ParsingContext::ArrayLiteralMembers => {
                &messages::EXPRESSION_EXPECTED
            }
            ParsingContext::VariableDeclarations => &messages::VARIABLE_DECLARATION_EXPECTED,
            ParsingContext::ObjectBindingElements
            | ParsingContext::ArrayBindingElements
            | ParsingContext::ImportOrExportSpecifiers
            | ParsingContext::ImportAttributes => &messages::IDENTIFIER_EXPECTED,
            ParsingContext::ArgumentExpressions => &messages::ARGUMENT_EXPRESSION_EXPECTED,
            ParsingContext::ObjectLiteralMembers => &messages::PROPERTY_ASSIGNMENT_EXPECTED,
            ParsingContext::Parameters => &messages::PARAMETER_DECLARATION_EXPECTED,
            ParsingContext::TypeParameters => &messages::TYPE_PARAMETER_DECLARATION_EXPECTED,
            ParsingContext::TypeArguments | ParsingContext::TupleElementTypes => &messages::TYPE_EXPECTED,
        }
    }
}

/// Everything needed to rewind a speculative parse.
pub(crate) struct Checkpoint {
    scanner: ScannerState,
    diagnostics_len: usize,
    prev_token_end: u32,
    next_node_id: u32,
    last_error_pos: Option<u32>,
    context: ParserContext,
}

/// Result of parsing one source text.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseResult {
    pub program: Program,
    /// Lexical and syntax diagnostics in source order.
    pub diagnostics: Vec<Diagnostic>,
}

impl ParseResult {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

/// The parser produces a [`Program`] from JavaScript, TypeScript or JSX source text.
pub struct Parser {
    pub(crate) scanner: Scanner,
    file_name: String,
    source_type: SourceType,
    pub(crate) typescript: bool,
    pub(crate) jsx: bool,
    pub(crate) decorators: bool,
    pub(crate) context: ParserContext,
    diagnostics: DiagnosticCollection,
    /// Tracks recursion depth to prevent stack overflow on deeply nested input.
    recursion_depth: u32,
    depth_error_reported: bool,
    next_node_id: u32,
    /// End of the most recently consumed token; nodes end here.
    prev_token_end: u32,
    /// Start of the last reported syntax error; a second error at the same
    /// position is dropped.
    last_error_pos: Option<u32>,
    parsing_contexts: u32,
}

impl Parser {
    pub fn new(source_text: &str, options: &ParseOptions) -> Self {
        let mut scanner = Scanner::new(source_text);
        scanner.set_collect_comments(true);
        Self {
            scanner,
            file_name: options.file_name.clone(),
            source_type: options.source_type,
            typescript: options.is_typescript(),
            jsx: options.jsx,
            decorators: options.decorators,
            context: ParserContext::empty(),
            diagnostics: DiagnosticCollection::new(),
            recursion_depth: 0,
            depth_error_reported: false,
            next_node_id: 1,
            prev_token_end: 0,
            last_error_pos: None,
            parsing_contexts: 0,
        }
    }

    pub fn parse_program(mut self) -> ParseResult {
        let _span = tracing::debug_span!("parse", file = %self.file_name, len = self.scanner.text_len()).entered();
        let shebang = self.scanner.skip_shebang();
        self.next_token();
        if self.source_type == SourceType::Module {
            self.context |= ParserContext::AWAIT;
        }

        let statements = self.parse_statement_list(ParsingContext::SourceElements);
        let end = self.scanner.text_len() as u32;
        let comments = self.scanner.take_comments();

        let mut diagnostics = self.scanner.take_diagnostics();
        diagnostics.extend(self.diagnostics);
        let mut diagnostics: DiagnosticCollection = diagnostics
            .into_iter()
            .map(|d| d.in_file(&self.file_name))
            .collect::<Vec<_>>()
            .into();
        diagnostics.sort();
        tracing::debug!(
            statements = statements.len(),
            diagnostics = diagnostics.len(),
            "parsed program"
        );

        ParseResult {
            program: Program {
                data: NodeData::new(SyntaxKind::Program, 0, end),
                source_type: self.source_type,
                statements,
                shebang,
                comments,
                file_name: self.file_name,
            },
            diagnostics: diagnostics.into_diagnostics(),
        }
    }

    // ========================================================================
    // Token management
    // ========================================================================

    #[inline]
    pub(crate) fn token(&self) -> SyntaxKind {
        self.scanner.token()
    }

    pub(crate) fn next_token(&mut self) -> SyntaxKind {
        self.prev_token_end = self.scanner.token_end() as u32;
        self.scanner.scan()
    }

    #[inline]
    pub(crate) fn token_start(&self) -> u32 {
        self.scanner.token_start() as u32
    }

    #[inline]
    pub(crate) fn token_end(&self) -> u32 {
        self.scanner.token_end() as u32
    }

    #[inline]
    pub(crate) fn token_value(&self) -> &str {
        self.scanner.token_value()
    }

    #[inline]
    pub(crate) fn has_preceding_line_break(&self) -> bool {
        self.scanner.has_preceding_line_break()
    }

    pub(crate) fn parse_expected(&mut self, kind: SyntaxKind) -> bool {
        if self.token() == kind {
            self.next_token();
            return true;
        }
        self.error_at_current_token(&messages::_0_EXPECTED, &[token_to_string(kind)]);
        false
    }

    pub(crate) fn parse_optional(&mut self, kind: SyntaxKind) -> bool {
        if self.token() == kind {
            self.next_token();
            true
        } else {
            false
        }
    }

    /// Automatic semicolon insertion: a `;`, a `}`, end of file or a line
    /// break ends a statement.
    pub(crate) fn can_parse_semicolon(&self) -> bool {
        matches!(
            self.token(),
            SyntaxKind::SemicolonToken | SyntaxKind::CloseBraceToken | SyntaxKind::EndOfFileToken
        ) || self.has_preceding_line_break()
    }

    pub(crate) fn parse_semicolon(&mut self) -> bool {
        if self.can_parse_semicolon() {
            self.parse_optional(SyntaxKind::SemicolonToken);
            return true;
        }
        self.parse_expected(SyntaxKind::SemicolonToken)
    }

    /// `>` is always scanned alone; binary operator positions widen it.
    pub(crate) fn rescan_greater_than(&mut self) -> SyntaxKind {
        self.scanner.rescan_greater_than_token()
    }

    // ========================================================================
    // Speculation
    // ========================================================================

    pub(crate) fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            scanner: self.scanner.save_state(),
            diagnostics_len: self.diagnostics.len(),
            prev_token_end: self.prev_token_end,
            next_node_id: self.next_node_id,
            last_error_pos: self.last_error_pos,
            context: self.context,
        }
    }

    pub(crate) fn rewind(&mut self, checkpoint: Checkpoint) {
        self.scanner.restore_state(checkpoint.scanner);
        self.diagnostics.truncate(checkpoint.diagnostics_len);
        self.prev_token_end = checkpoint.prev_token_end;
        self.next_node_id = checkpoint.next_node_id;
        self.last_error_pos = checkpoint.last_error_pos;
        self.context = checkpoint.context;
    }

    /// Run `f` and always rewind afterwards.
    pub(crate) fn look_ahead<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let checkpoint = self.checkpoint();
        let result = f(self);
        self.rewind(checkpoint);
        result
    }

    /// Run `f` and keep its result only if it returned `Some` without
    /// reporting a syntax error; otherwise rewind.
    pub(crate) fn try_parse<T>(&mut self, f: impl FnOnce(&mut Self) -> Option<T>) -> Option<T> {
        let checkpoint = self.checkpoint();
        let diagnostics_len = self.diagnostics.len();
        match f(self) {
            Some(result) if self.diagnostics.len() == diagnostics_len => Some(result),
            _ => {
                self.rewind(checkpoint);
                None
            }
        }
    }

    pub(crate) fn next_token_is(&mut self, kind: SyntaxKind) -> bool {
        self.look_ahead(|p| p.next_token() == kind)
    }

    pub(crate) fn next_token_is_identifier_or_keyword_on_same_line(&mut self) -> bool {
        self.look_ahead(|p| {
            p.next_token();
            p.token().is_identifier_or_keyword() && !p.has_preceding_line_break()
        })
    }

    // ========================================================================
    // Context
    // ========================================================================

    #[inline]
    pub(crate) fn in_context(&self, flags: ParserContext) -> bool {
        self.context.contains(flags)
    }

    /// Run `f` with `set` added to and `clear` removed from the context.
    pub(crate) fn with_context<T>(
        &mut self,
        set: ParserContext,
        clear: ParserContext,
        f: impl FnOnce(&mut Self) -> T,
    ) -> T {
        let saved = self.context;
        self.context = (self.context | set) - clear;
        let result = f(self);
        self.context = saved;
        result
    }

    pub(crate) fn enter_recursion(&mut self) -> bool {
        self.recursion_depth += 1;
        if self.recursion_depth > MAX_RECURSION_DEPTH {
            if !self.depth_error_reported {
                self.depth_error_reported = true;
                let (start, end) = (self.token_start(), self.token_end());
                self.diagnostics.add(
                    Diagnostic::at(TextSpan::from_bounds(start, end), &messages::MAXIMUM_NESTING_DEPTH_EXCEEDED, &[])
                        .in_file(&self.file_name),
                );
            }
            self.recursion_depth -= 1;
            return false;
        }
        true
    }

    #[inline]
    pub(crate) fn exit_recursion(&mut self) {
        self.recursion_depth -= 1;
    }

    /// Consume the rest of the input once the nesting limit is hit, so every
    /// enclosing production unwinds without recursing further.
    pub(crate) fn skip_to_end_of_file(&mut self) -> NodeData {
        let start = self.token_start();
        while self.token() != SyntaxKind::EndOfFileToken {
            self.next_token();
        }
        self.finish(SyntaxKind::MissingNode, start)
            .with_flags(NodeFlags::THIS_NODE_HAS_ERROR)
    }

    // ========================================================================
    // Diagnostics
    // ========================================================================

    /// Report a syntax error; a second error at the same start is dropped.
    pub(crate) fn error_at(&mut self, start: u32, end: u32, message: &DiagnosticMessage, args: &[&str]) {
        if self.last_error_pos == Some(start) {
            return;
        }
        self.last_error_pos = Some(start);
        self.diagnostics
            .add(Diagnostic::at(TextSpan::from_bounds(start, end.max(start)), message, args).in_file(&self.file_name));
    }

    pub(crate) fn error_at_current_token(&mut self, message: &DiagnosticMessage, args: &[&str]) {
        let (start, end) = (self.token_start(), self.token_end());
        self.error_at(start, end, message, args);
    }

    /// Report a grammar diagnostic that does not affect recovery (dialect
    /// checks such as TypeScript syntax in a JavaScript file).
    pub(crate) fn grammar_error(&mut self, start: u32, end: u32, message: &DiagnosticMessage, args: &[&str]) {
        self.diagnostics
            .add(Diagnostic::at(TextSpan::from_bounds(start, end.max(start)), message, args).in_file(&self.file_name));
    }

    /// Report a TypeScript-only construct when parsing ECMAScript.
    pub(crate) fn check_typescript_syntax(&mut self, start: u32, message: &DiagnosticMessage, args: &[&str]) {
        if !self.typescript {
            let end = self.prev_token_end;
            self.grammar_error(start, end, message, args);
        }
    }

    // ========================================================================
    // Node construction
    // ========================================================================

    pub(crate) fn alloc_id(&mut self) -> NodeId {
        let id = NodeId(self.next_node_id);
        self.next_node_id += 1;
        id
    }

    /// Node data spanning from `start` to the end of the last consumed token.
    pub(crate) fn finish(&self, kind: SyntaxKind, start: u32) -> NodeData {
        NodeData::new(kind, start, self.prev_token_end.max(start))
    }

    #[inline]
    pub(crate) fn prev_token_end(&self) -> u32 {
        self.prev_token_end
    }

    /// Empty node data at the current token, marked as an error.
    pub(crate) fn missing_data(&mut self) -> NodeData {
        let pos = self.token_start();
        self.prev_token_end = self.prev_token_end.max(pos);
        NodeData::new(SyntaxKind::MissingNode, pos, pos).with_flags(NodeFlags::THIS_NODE_HAS_ERROR)
    }

    pub(crate) fn missing_expression(&mut self, message: &DiagnosticMessage) -> Expression {
        self.error_at_current_token(message, &[]);
        Expression::Missing(self.missing_data())
    }

    pub(crate) fn missing_identifier(&mut self, message: &DiagnosticMessage) -> Identifier {
        self.error_at_current_token(message, &[]);
        let pos = self.token_start();
        self.prev_token_end = self.prev_token_end.max(pos);
        Identifier {
            data: NodeData::new(SyntaxKind::Identifier, pos, pos).with_flags(NodeFlags::THIS_NODE_HAS_ERROR),
            id: self.alloc_id(),
            text: String::new(),
        }
    }

    // ========================================================================
    // Identifiers
    // ========================================================================

    /// Whether the current token can be used as a binding or reference name.
    pub(crate) fn is_identifier(&self) -> bool {
        match self.token() {
            SyntaxKind::Identifier => true,
            SyntaxKind::YieldKeyword => !self.in_context(ParserContext::YIELD),
            SyntaxKind::AwaitKeyword => !self.in_context(ParserContext::AWAIT),
            kind => kind.is_keyword() && !kind.is_reserved_word(),
        }
    }

    /// Consume the current token as an identifier node.
    pub(crate) fn identifier_from_token(&mut self) -> Identifier {
        let start = self.token_start();
        let text = self.token_value().to_string();
        self.next_token();
        Identifier {
            data: self.finish(SyntaxKind::Identifier, start),
            id: self.alloc_id(),
            text,
        }
    }

    pub(crate) fn parse_identifier(&mut self) -> Identifier {
        if self.is_identifier() {
            return self.identifier_from_token();
        }
        self.missing_identifier(&messages::IDENTIFIER_EXPECTED)
    }

    /// Identifier names after `.` and in property positions may be reserved words.
    pub(crate) fn parse_identifier_name(&mut self) -> Identifier {
        if self.token().is_identifier_or_keyword() {
            return self.identifier_from_token();
        }
        self.missing_identifier(&messages::IDENTIFIER_EXPECTED)
    }

    pub(crate) fn parse_private_identifier(&mut self) -> Identifier {
        let start = self.token_start();
        let text = self.token_value().to_string();
        self.next_token();
        Identifier {
            data: self.finish(SyntaxKind::PrivateIdentifier, start),
            id: self.alloc_id(),
            text,
        }
    }

    pub(crate) fn parse_string_literal(&mut self) -> StringLiteral {
        let start = self.token_start();
        let value = self.token_value().to_string();
        let raw = self.scanner.token_text().to_string();
        let single = self.scanner.token_flags().contains(TokenFlags::SINGLE_QUOTE);
        self.next_token();
        let mut data = self.finish(SyntaxKind::StringLiteral, start);
        if single {
            data.flags |= NodeFlags::SINGLE_QUOTE;
        }
        StringLiteral {
            data,
            value,
            raw: Some(raw),
        }
    }

    /// A string literal where the grammar requires one (module specifiers).
    pub(crate) fn parse_expected_string_literal(&mut self) -> StringLiteral {
        if self.token() == SyntaxKind::StringLiteral {
            return self.parse_string_literal();
        }
        self.error_at_current_token(&messages::_0_EXPECTED, &[token_to_string(SyntaxKind::StringLiteral)]);
        StringLiteral {
            data: self.missing_data(),
            value: String::new(),
            raw: None,
        }
    }

    pub(crate) fn parse_numeric_literal(&mut self) -> NumericLiteral {
        let start = self.token_start();
        let raw = self.scanner.token_text().to_string();
        let value = esforge_scanner::numeric_literal_value(self.token_value());
        self.next_token();
        NumericLiteral {
            data: self.finish(SyntaxKind::NumericLiteral, start),
            value,
            raw: Some(raw),
        }
    }

    pub(crate) fn parse_bigint_literal(&mut self) -> BigIntLiteral {
        let start = self.token_start();
        let raw = self.token_value().to_string();
        self.next_token();
        BigIntLiteral {
            data: self.finish(SyntaxKind::BigIntLiteral, start),
            raw,
        }
    }

    // ========================================================================
    // List parsing with recovery
    // ========================================================================

    pub(crate) fn is_list_terminator(&mut self, context: ParsingContext) -> bool {
        let token = self.token();
        if token == SyntaxKind::EndOfFileToken {
            return true;
        }
        match context {
            ParsingContext::SourceElements => false,
            ParsingContext::BlockStatements
            | ParsingContext::SwitchClauses
            | ParsingContext::TypeMembers
            | ParsingContext::ClassMembers
            | ParsingContext::EnumMembers
            | ParsingContext::ObjectLiteralMembers
            | ParsingContext::ObjectBindingElements
            | ParsingContext::ImportOrExportSpecifiers
            | ParsingContext::ImportAttributes => token == SyntaxKind::CloseBraceToken,
            ParsingContext::SwitchClauseStatements => matches!(
                token,
                SyntaxKind::CloseBraceToken | SyntaxKind::CaseKeyword | SyntaxKind::DefaultKeyword
            ),
            ParsingContext::HeritageClauseElements => matches!(
                token,
                SyntaxKind::OpenBraceToken | SyntaxKind::ExtendsKeyword | SyntaxKind::ImplementsKeyword
            ),
            ParsingContext::VariableDeclarations => {
                self.can_parse_semicolon()
                    || matches!(
                        token,
                        SyntaxKind::InKeyword | SyntaxKind::OfKeyword | SyntaxKind::EqualsGreaterThanToken
                    )
            }
            ParsingContext::TypeParameters => matches!(
                token,
                SyntaxKind::GreaterThanToken
                    | SyntaxKind::OpenParenToken
                    | SyntaxKind::OpenBraceToken
                    | SyntaxKind::ExtendsKeyword
                    | SyntaxKind::ImplementsKeyword
            ),
            ParsingContext::ArgumentExpressions => {
                matches!(token, SyntaxKind::CloseParenToken | SyntaxKind::SemicolonToken)
            }
            ParsingContext::ArrayLiteralMembers
            | ParsingContext::TupleElementTypes
            | ParsingContext::ArrayBindingElements => token == SyntaxKind::CloseBracketToken,
            ParsingContext::Parameters => {
                matches!(token, SyntaxKind::CloseParenToken | SyntaxKind::CloseBracketToken)
            }
            ParsingContext::TypeArguments => token == SyntaxKind::GreaterThanToken,
        }
    }

    pub(crate) fn is_list_element_start(&mut self, context: ParsingContext) -> bool {
        let token = self.token();
        match context {
            ParsingContext::SourceElements
            | ParsingContext::BlockStatements
            | ParsingContext::SwitchClauseStatements => self.is_start_of_statement(),
            ParsingContext::SwitchClauses => {
                matches!(token, SyntaxKind::CaseKeyword | SyntaxKind::DefaultKeyword)
            }
            ParsingContext::TypeMembers => {
                matches!(
                    token,
                    SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken | SyntaxKind::OpenBracketToken
                ) || is_literal_property_name(token)
            }
            ParsingContext::ClassMembers => {
                matches!(
                    token,
                    SyntaxKind::SemicolonToken
                        | SyntaxKind::AtToken
                        | SyntaxKind::AsteriskToken
                        | SyntaxKind::OpenBracketToken
                ) || is_literal_property_name(token)
            }
            ParsingContext::EnumMembers => token == SyntaxKind::OpenBracketToken || is_literal_property_name(token),
            ParsingContext::ObjectLiteralMembers => {
                matches!(
                    token,
                    SyntaxKind::OpenBracketToken | SyntaxKind::AsteriskToken | SyntaxKind::DotDotDotToken
                ) || is_literal_property_name(token)
            }
            ParsingContext::ObjectBindingElements => {
                matches!(token, SyntaxKind::OpenBracketToken | SyntaxKind::DotDotDotToken)
                    || is_literal_property_name(token)
            }
            ParsingContext::HeritageClauseElements => {
                if token == SyntaxKind::OpenBraceToken {
                    return false;
                }
                is_start_of_expression(token)
            }
            ParsingContext::VariableDeclarations => self.is_binding_identifier_or_pattern(),
            ParsingContext::ArrayBindingElements => {
                matches!(token, SyntaxKind::CommaToken | SyntaxKind::DotDotDotToken)
                    || self.is_binding_identifier_or_pattern()
            }
            ParsingContext::TypeParameters => {
                matches!(token, SyntaxKind::InKeyword | SyntaxKind::ConstKeyword) || self.is_identifier()
            }
            ParsingContext::ArrayLiteralMembers => {
                matches!(token, SyntaxKind::CommaToken | SyntaxKind::DotDotDotToken) || is_start_of_expression(token)
            }
            ParsingContext::ArgumentExpressions => {
                token == SyntaxKind::DotDotDotToken || is_start_of_expression(token)
            }
            ParsingContext::Parameters => self.is_start_of_parameter(),
            ParsingContext::TypeArguments | ParsingContext::TupleElementTypes => {
                token == SyntaxKind::CommaToken || is_start_of_type(token)
            }
            ParsingContext::ImportOrExportSpecifiers | ParsingContext::ImportAttributes => {
                token.is_identifier_or_keyword() || token == SyntaxKind::StringLiteral
            }
        }
    }

    pub(crate) fn is_binding_identifier_or_pattern(&self) -> bool {
        matches!(self.token(), SyntaxKind::OpenBraceToken | SyntaxKind::OpenBracketToken) || self.is_identifier()
    }

    pub(crate) fn is_start_of_statement(&self) -> bool {
        can_start_statement(self.token())
    }

    /// Whether the current token ends or belongs to some enclosing list.
    fn is_in_some_parsing_context(&mut self) -> bool {
        for context in ParsingContext::ALL {
            if self.parsing_contexts & context.bit() != 0
                && (self.is_list_element_start(context) || self.is_list_terminator(context))
            {
                return true;
            }
        }
        false
    }

    /// Either stop the current list (an enclosing list can use the token) or
    /// report and skip the token. Returns `true` to stop.
    fn abort_parsing_list_or_move_to_next_token(&mut self, context: ParsingContext) -> bool {
        self.error_at_current_token(context.error_message(), &[]);
        if self.is_in_some_parsing_context() {
            return true;
        }
        self.next_token();
        false
    }

    /// Parse a list of elements with no separators.
    pub(crate) fn parse_list<T>(&mut self, context: ParsingContext, mut element: impl FnMut(&mut Self) -> T) -> Vec<T> {
        let saved = self.parsing_contexts;
        self.parsing_contexts |= context.bit();
        let mut list = Vec::new();
        while !self.is_list_terminator(context) {
            if self.is_list_element_start(context) {
                let start = self.token_start();
                list.push(element(self));
                if self.token_start() == start {
                    self.error_at_current_token(context.error_message(), &[]);
                    self.next_token();
                }
                continue;
            }
            if self.abort_parsing_list_or_move_to_next_token(context) {
                break;
            }
        }
        self.parsing_contexts = saved;
        list
    }

    /// Parse statements until the list terminator. Tokens that cannot start
    /// a statement are skipped and covered by a `Statement::Missing`.
    pub(crate) fn parse_statement_list(&mut self, context: ParsingContext) -> Vec<Statement> {
        let saved = self.parsing_contexts;
        self.parsing_contexts |= context.bit();
        let mut statements = Vec::new();
        while !self.is_list_terminator(context) {
            if self.is_list_element_start(context) {
                let start = self.token_start();
                statements.push(self.parse_statement_list_element());
                if self.token_start() == start {
                    statements.push(self.skip_to_next_statement(context));
                }
                continue;
            }
            self.error_at_current_token(context.error_message(), &[]);
            if self.is_in_some_parsing_context() {
                break;
            }
            statements.push(self.skip_to_next_statement(context));
        }
        self.parsing_contexts = saved;
        statements
    }

    /// Error recovery: skip tokens until one can start a statement or close
    /// the list, returning a placeholder that covers the skipped text.
    fn skip_to_next_statement(&mut self, context: ParsingContext) -> Statement {
        let start = self.token_start();
        self.next_token();
        while !self.is_list_terminator(context) && !self.is_list_element_start(context) {
            if self.is_in_some_parsing_context() {
                break;
            }
            self.next_token();
        }
        tracing::trace!(start, end = self.prev_token_end, "skipped tokens during recovery");
        Statement::Missing(self.finish(SyntaxKind::MissingNode, start).with_flags(NodeFlags::THIS_NODE_HAS_ERROR))
    }

    /// Parse a comma-separated list.
    pub(crate) fn parse_delimited_list<T>(
        &mut self,
        context: ParsingContext,
        mut element: impl FnMut(&mut Self) -> T,
        allow_trailing_comma: bool,
    ) -> Vec<T> {
        let saved = self.parsing_contexts;
        self.parsing_contexts |= context.bit();
        let mut list = Vec::new();
        let mut trailing_comma: Option<(u32, u32)> = None;
        loop {
            if self.is_list_element_start(context) {
                let start = self.token_start();
                list.push(element(self));
                let comma = (self.token_start(), self.token_end());
                if self.parse_optional(SyntaxKind::CommaToken) {
                    trailing_comma = Some(comma);
                    continue;
                }
                trailing_comma = None;
                if self.is_list_terminator(context) {
                    break;
                }
                self.parse_expected(SyntaxKind::CommaToken);
                if self.token_start() == start {
                    self.next_token();
                }
                continue;
            }
            if self.is_list_terminator(context) {
                break;
            }
            if self.abort_parsing_list_or_move_to_next_token(context) {
                break;
            }
        }
        if let Some((start, end)) = trailing_comma {
            if !allow_trailing_comma && !list.is_empty() {
                self.error_at(start, end, &messages::TRAILING_COMMA_NOT_ALLOWED, &[]);
            }
        }
        self.parsing_contexts = saved;
        list
    }

    /// `open list close` with the usual expectations on both brackets.
    pub(crate) fn parse_bracketed_list<T>(
        &mut self,
        context: ParsingContext,
        element: impl FnMut(&mut Self) -> T,
        open: SyntaxKind,
        close: SyntaxKind,
    ) -> Vec<T> {
        if self.parse_expected(open) {
            let list = self.parse_delimited_list(context, element, true);
            self.parse_expected(close);
            list
        } else {
            Vec::new()
        }
    }
}

/// Parse `source` with `options`. Never fails: problems are reported as
/// diagnostics alongside a best-effort tree.
pub fn parse_program(source: &str, options: &ParseOptions) -> ParseResult {
    Parser::new(source, options).parse_program()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> ParseResult {
        parse_program(source, &ParseOptions::default())
    }

    #[test]
    fn test_empty_program() {
        let result = parse("");
        assert!(result.program.statements.is_empty());
        assert!(result.diagnostics.is_empty());
        assert_eq!(result.program.data.range.end, 0);
    }

    #[test]
    fn test_try_parse_rewinds_on_error() {
        let mut parser = Parser::new("a b", &ParseOptions::default());
        parser.next_token();
        let result: Option<()> = parser.try_parse(|p| {
            p.next_token();
            p.parse_expected(SyntaxKind::SemicolonToken);
            Some(())
        });
        assert!(result.is_none());
        assert_eq!(parser.token_value(), "a");
        assert!(parser.diagnostics.is_empty());
    }

    #[test]
    fn test_node_ids_are_sequential() {
        let mut parser = Parser::new("a b", &ParseOptions::default());
        parser.next_token();
        let a = parser.parse_identifier();
        let b = parser.parse_identifier();
        assert_eq!(a.id, NodeId(1));
        assert_eq!(b.id, NodeId(2));
        assert_eq!(b.data.range.pos, 2);
    }

    #[test]
    fn test_duplicate_error_position_is_reported_once() {
        let mut parser = Parser::new("?", &ParseOptions::default());
        parser.next_token();
        parser.parse_expected(SyntaxKind::SemicolonToken);
        parser.parse_expected(SyntaxKind::CloseParenToken);
        assert_eq!(parser.diagnostics.len(), 1);
    }
}
