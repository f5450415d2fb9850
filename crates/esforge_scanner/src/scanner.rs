//! The JavaScript/TypeScript scanner.
//!
//! Converts source text into tokens on demand. Offsets are byte offsets into
//! the UTF-8 source. Context-sensitive tokenization is driven by a lexer-mode
//! stack: the scanner pushes and pops template holes itself, and the parser
//! pushes JSX modes when it enters a tag or a child list. Regex literals and
//! compound `>` operators are produced by explicit rescans requested by the
//! parser, which is the only party that knows the syntactic context.

use crate::char_codes::*;
use crate::token::TokenInfo;
use esforge_ast::node::Comment;
use esforge_ast::syntax_kind::SyntaxKind;
use esforge_ast::types::{CommentKind, TokenFlags};
use esforge_core::text::{TextRange, TextSpan};
use esforge_diagnostics::{messages, Diagnostic, DiagnosticCollection, DiagnosticMessage};
use memchr::memmem;

/// A lexing context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexerMode {
    /// Ordinary JavaScript tokens.
    Normal,
    /// Inside `${ ... }` of a template; `depth` counts unmatched `{`.
    TemplateHole { depth: u32 },
    /// Between `<` and `>` of a JSX tag: names may contain `-`, strings have no escapes.
    JsxTag,
    /// Between the opening and closing tags of a JSX element: text, `{`, `<`.
    JsxChildren,
}

/// Saved scanner state for lookahead and speculative parsing.
#[derive(Debug, Clone)]
pub struct ScannerState {
    pos: usize,
    full_start: usize,
    token_start: usize,
    token: SyntaxKind,
    token_value: String,
    template_raw: String,
    token_flags: TokenFlags,
    modes: Vec<LexerMode>,
    diagnostics_len: usize,
    comments_len: usize,
}

/// The scanner converts source text into tokens.
pub struct Scanner {
    /// The source text being scanned.
    text: String,
    /// Current byte position in the text.
    pos: usize,
    /// Start of the current token including leading trivia.
    full_start: usize,
    /// Start of the current token (after leading trivia).
    token_start: usize,
    /// The current token kind.
    token: SyntaxKind,
    /// The cooked value of the current token.
    token_value: String,
    /// Raw text of the current template part, with CRLF normalized.
    template_raw: String,
    /// Token flags for the current token.
    token_flags: TokenFlags,
    /// Mode stack; never empty.
    modes: Vec<LexerMode>,
    /// Whether comments seen while skipping trivia are recorded.
    collect_comments: bool,
    comments: Vec<Comment>,
    /// Accumulated diagnostics.
    diagnostics: DiagnosticCollection,
}

impl Scanner {
    /// Create a new scanner for the given source text.
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            pos: 0,
            full_start: 0,
            token_start: 0,
            token: SyntaxKind::Unknown,
            token_value: String::new(),
            template_raw: String::new(),
            token_flags: TokenFlags::NONE,
            modes: vec![LexerMode::Normal],
            collect_comments: false,
            comments: Vec::new(),
            diagnostics: DiagnosticCollection::new(),
        }
    }

    /// Record comments skipped as trivia; see [`Scanner::take_comments`].
    pub fn set_collect_comments(&mut self, collect: bool) {
        self.collect_comments = collect;
    }

    /// Consume a `#!` line at the very beginning of the file and return it.
    /// Call this before the first `scan()` call.
    pub fn skip_shebang(&mut self) -> Option<String> {
        if self.pos != 0 || !self.text.starts_with("#!") {
            return None;
        }
        let end = self.find_line_end(0);
        let shebang = self.text[..end].to_string();
        self.pos = end;
        Some(shebang)
    }

    /// Get the full source text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Get the full source text length in bytes.
    pub fn text_len(&self) -> usize {
        self.text.len()
    }

    // ========================================================================
    // Mode stack
    // ========================================================================

    pub fn mode(&self) -> LexerMode {
        self.modes.last().copied().unwrap_or(LexerMode::Normal)
    }

    pub fn push_mode(&mut self, mode: LexerMode) {
        self.modes.push(mode);
    }

    /// Pop the innermost mode; the bottom `Normal` mode is never removed.
    pub fn pop_mode(&mut self) -> LexerMode {
        if self.modes.len() > 1 {
            self.modes.pop().unwrap_or(LexerMode::Normal)
        } else {
            LexerMode::Normal
        }
    }

    pub fn mode_depth(&self) -> usize {
        self.modes.len()
    }

    // ========================================================================
    // Lookahead
    // ========================================================================

    /// Look ahead: save state, call f, restore state and return result.
    pub fn look_ahead<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let state = self.save_state();
        let result = f(self);
        self.restore_state(state);
        result
    }

    /// Try scanning: save state, call f, if result is None restore state.
    pub fn try_scan<T>(&mut self, f: impl FnOnce(&mut Self) -> Option<T>) -> Option<T> {
        let state = self.save_state();
        let result = f(self);
        if result.is_none() {
            self.restore_state(state);
        }
        result
    }

    /// Save the full scanner state.
    pub fn save_state(&self) -> ScannerState {
        ScannerState {
            pos: self.pos,
            full_start: self.full_start,
            token_start: self.token_start,
            token: self.token,
            token_value: self.token_value.clone(),
            template_raw: self.template_raw.clone(),
            token_flags: self.token_flags,
            modes: self.modes.clone(),
            diagnostics_len: self.diagnostics.len(),
            comments_len: self.comments.len(),
        }
    }

    /// Restore a saved state, discarding diagnostics and comments recorded since.
    pub fn restore_state(&mut self, state: ScannerState) {
        self.pos = state.pos;
        self.full_start = state.full_start;
        self.token_start = state.token_start;
        self.token = state.token;
        self.token_value = state.token_value;
        self.template_raw = state.template_raw;
        self.token_flags = state.token_flags;
        self.modes = state.modes;
        self.diagnostics.truncate(state.diagnostics_len);
        self.comments.truncate(state.comments_len);
    }

    /// Reset the scanner to a specific position with a fresh mode stack.
    pub fn reset_to(&mut self, pos: usize) {
        let mut pos = pos.min(self.text.len());
        while !self.text.is_char_boundary(pos) {
            pos += 1;
        }
        self.pos = pos;
        self.full_start = pos;
        self.token_start = pos;
        self.token = SyntaxKind::Unknown;
        self.token_value.clear();
        self.template_raw.clear();
        self.token_flags = TokenFlags::NONE;
        self.modes.clear();
        self.modes.push(LexerMode::Normal);
    }

    // ========================================================================
    // Current token
    // ========================================================================

    #[inline]
    pub fn token(&self) -> SyntaxKind {
        self.token
    }

    /// Cooked value of the current token.
    #[inline]
    pub fn token_value(&self) -> &str {
        &self.token_value
    }

    /// Raw source text of the current token.
    #[inline]
    pub fn token_text(&self) -> &str {
        &self.text[self.token_start..self.pos]
    }

    /// Raw text of the current template part (between its delimiters).
    #[inline]
    pub fn template_raw(&self) -> &str {
        &self.template_raw
    }

    /// Start of the current token including leading trivia.
    #[inline]
    pub fn full_start(&self) -> usize {
        self.full_start
    }

    #[inline]
    pub fn token_start(&self) -> usize {
        self.token_start
    }

    /// Current position (end of current token).
    #[inline]
    pub fn token_end(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn token_flags(&self) -> TokenFlags {
        self.token_flags
    }

    #[inline]
    pub fn has_preceding_line_break(&self) -> bool {
        self.token_flags.contains(TokenFlags::PRECEDING_LINE_BREAK)
    }

    #[inline]
    pub fn is_unterminated(&self) -> bool {
        self.token_flags.contains(TokenFlags::UNTERMINATED)
    }

    /// Whether the current identifier-like token was written with escapes.
    #[inline]
    pub fn has_unicode_escape(&self) -> bool {
        self.token_flags.contains(TokenFlags::UNICODE_ESCAPE)
    }

    /// Whether the current token is an identifier or any keyword.
    pub fn is_identifier_or_keyword(&self) -> bool {
        self.token.is_identifier_or_keyword()
    }

    pub fn diagnostics(&self) -> &DiagnosticCollection {
        &self.diagnostics
    }

    /// Take the accumulated diagnostics, leaving an empty collection.
    pub fn take_diagnostics(&mut self) -> DiagnosticCollection {
        std::mem::take(&mut self.diagnostics)
    }

    /// Take the recorded comments in source order.
    pub fn take_comments(&mut self) -> Vec<Comment> {
        std::mem::take(&mut self.comments)
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn token_info(&self) -> TokenInfo {
        TokenInfo {
            kind: self.token,
            pos: self.token_start as u32,
            end: self.pos as u32,
            text: self.token_text().to_string(),
            value: self.token_value.clone(),
            flags: self.token_flags,
        }
    }

    // ========================================================================
    // Character access
    // ========================================================================

    #[inline]
    fn bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }

    /// The character at the current position.
    #[inline]
    fn current_char(&self) -> Option<char> {
        self.char_at_pos(self.pos)
    }

    #[inline]
    fn char_at_pos(&self, pos: usize) -> Option<char> {
        match self.bytes().get(pos) {
            Some(&b) if b.is_ascii() => Some(b as char),
            Some(_) => self.text.get(pos..).and_then(|rest| rest.chars().next()),
            None => None,
        }
    }

    /// The ASCII byte at `pos + offset` as a char; non-ASCII bytes map to `None`.
    #[inline]
    fn peek(&self, offset: usize) -> Option<char> {
        match self.bytes().get(self.pos + offset) {
            Some(&b) if b.is_ascii() => Some(b as char),
            _ => None,
        }
    }

    #[inline]
    fn advance_char(&mut self, ch: char) {
        self.pos += ch.len_utf8();
    }

    fn error(&mut self, message: &DiagnosticMessage, start: usize, end: usize, args: &[&str]) {
        let span = TextSpan::from_bounds(start as u32, end as u32);
        self.diagnostics.add(Diagnostic::at(span, message, args));
    }

    /// Byte offset of the next line terminator at or after `from`, or the end of text.
    fn find_line_end(&self, from: usize) -> usize {
        let bytes = self.bytes();
        let mut cursor = from;
        while let Some(offset) = memchr::memchr3(b'\n', b'\r', LS_PS_LEAD_BYTE, &bytes[cursor..]) {
            let at = cursor + offset;
            if bytes[at] != LS_PS_LEAD_BYTE {
                return at;
            }
            if let Some(ch) = self.char_at_pos(at) {
                if ch == LINE_SEPARATOR || ch == PARAGRAPH_SEPARATOR {
                    return at;
                }
            }
            cursor = at + 1;
        }
        bytes.len()
    }

    fn contains_line_break(&self, start: usize, end: usize) -> bool {
        let slice = &self.text[start..end];
        slice.contains(['\n', '\r', LINE_SEPARATOR, PARAGRAPH_SEPARATOR])
    }

    fn record_comment(&mut self, kind: CommentKind, start: usize, end: usize, has_preceding_line_break: bool) {
        if !self.collect_comments {
            return;
        }
        // Rescans after a restore revisit comments that are already recorded.
        if let Some(last) = self.comments.last() {
            if (start as u32) < last.range.end {
                return;
            }
        }
        self.comments.push(Comment {
            kind,
            text: self.text[start..end].to_string(),
            range: TextRange::new(start as u32, end as u32),
            has_preceding_line_break,
        });
    }

    // ========================================================================
    // Trivia
    // ========================================================================

    /// Skip whitespace and comments, setting PRECEDING_LINE_BREAK as needed.
    fn skip_trivia(&mut self) {
        loop {
            let Some(ch) = self.current_char() else {
                return;
            };
            match ch {
                '\r' | '\n' | LINE_SEPARATOR | PARAGRAPH_SEPARATOR => {
                    self.token_flags |= TokenFlags::PRECEDING_LINE_BREAK;
                    self.advance_char(ch);
                }
                '/' if self.peek(1) == Some('/') => {
                    let start = self.pos;
                    let end = self.find_line_end(start + 2);
                    self.pos = end;
                    let line_break = self.has_preceding_line_break() || start == 0;
                    self.record_comment(CommentKind::Line, start, end, line_break);
                }
                '/' if self.peek(1) == Some('*') => {
                    let start = self.pos;
                    let body_start = start + 2;
                    let end = match memmem::find(&self.bytes()[body_start..], b"*/") {
                        Some(offset) => body_start + offset + 2,
                        None => {
                            self.error(&messages::ASTERISK_SLASH_EXPECTED, self.text.len(), self.text.len(), &[]);
                            self.text.len()
                        }
                    };
                    let line_break = self.has_preceding_line_break() || start == 0;
                    if self.contains_line_break(body_start, end) {
                        self.token_flags |= TokenFlags::PRECEDING_LINE_BREAK;
                    }
                    self.pos = end;
                    self.record_comment(CommentKind::Block, start, end, line_break);
                }
                c if is_white_space_single_line(c) => self.advance_char(c),
                _ => return,
            }
        }
    }

    // ========================================================================
    // Core scanning
    // ========================================================================

    /// Scan the next token according to the current lexer mode.
    pub fn scan(&mut self) -> SyntaxKind {
        self.full_start = self.pos;
        self.token_flags = TokenFlags::NONE;
        self.token_value.clear();
        self.template_raw.clear();

        match self.mode() {
            LexerMode::JsxChildren => {
                self.token = self.scan_jsx_child();
                return self.token;
            }
            LexerMode::JsxTag => {
                self.skip_trivia();
                self.token_start = self.pos;
                self.token = self.scan_jsx_tag_token();
                return self.token;
            }
            LexerMode::Normal | LexerMode::TemplateHole { .. } => {}
        }

        self.skip_trivia();
        self.token_start = self.pos;
        self.token = self.scan_normal_token();
        self.track_template_braces();
        self.token
    }

    /// Keep `TemplateHole` brace depth in sync, and turn the `}` closing a
    /// hole into the next template part.
    fn track_template_braces(&mut self) {
        let Some(LexerMode::TemplateHole { depth }) = self.mode_if_template_hole() else {
            return;
        };
        match self.token {
            SyntaxKind::OpenBraceToken => self.set_top_mode(LexerMode::TemplateHole { depth: depth + 1 }),
            SyntaxKind::CloseBraceToken if depth > 0 => {
                self.set_top_mode(LexerMode::TemplateHole { depth: depth - 1 })
            }
            SyntaxKind::CloseBraceToken => {
                self.pos = self.token_start + 1;
                let kind = self.scan_template_continuation();
                if kind == SyntaxKind::TemplateTail {
                    self.pop_mode();
                }
                self.token = kind;
            }
            _ => {}
        }
    }

    fn mode_if_template_hole(&self) -> Option<LexerMode> {
        Some(self.mode()).filter(|mode| matches!(mode, LexerMode::TemplateHole { .. }))
    }

    fn set_top_mode(&mut self, mode: LexerMode) {
        if let Some(top) = self.modes.last_mut() {
            *top = mode;
        }
    }

    fn scan_normal_token(&mut self) -> SyntaxKind {
        let Some(ch) = self.current_char() else {
            return SyntaxKind::EndOfFileToken;
        };
        match ch {
            '(' => self.single(SyntaxKind::OpenParenToken),
            ')' => self.single(SyntaxKind::CloseParenToken),
            '{' => self.single(SyntaxKind::OpenBraceToken),
            '}' => self.single(SyntaxKind::CloseBraceToken),
            '[' => self.single(SyntaxKind::OpenBracketToken),
            ']' => self.single(SyntaxKind::CloseBracketToken),
            ';' => self.single(SyntaxKind::SemicolonToken),
            ',' => self.single(SyntaxKind::CommaToken),
            '~' => self.single(SyntaxKind::TildeToken),
            '@' => self.single(SyntaxKind::AtToken),
            ':' => self.single(SyntaxKind::ColonToken),
            '#' => self.scan_private_name(),
            '.' => self.scan_dot(),
            '?' => self.scan_question(),
            '<' => self.scan_operator('<', SyntaxKind::LessThanToken, SyntaxKind::LessThanEqualsToken, Some((SyntaxKind::LessThanLessThanToken, SyntaxKind::LessThanLessThanEqualsToken))),
            '>' => self.single(SyntaxKind::GreaterThanToken),
            '=' => self.scan_equals(),
            '!' => self.scan_exclamation(),
            '+' => self.scan_increment('+', SyntaxKind::PlusToken, SyntaxKind::PlusPlusToken, SyntaxKind::PlusEqualsToken),
            '-' => self.scan_increment('-', SyntaxKind::MinusToken, SyntaxKind::MinusMinusToken, SyntaxKind::MinusEqualsToken),
            '*' => self.scan_operator('*', SyntaxKind::AsteriskToken, SyntaxKind::AsteriskEqualsToken, Some((SyntaxKind::AsteriskAsteriskToken, SyntaxKind::AsteriskAsteriskEqualsToken))),
            '/' => self.scan_operator('/', SyntaxKind::SlashToken, SyntaxKind::SlashEqualsToken, None),
            '%' => self.scan_operator('%', SyntaxKind::PercentToken, SyntaxKind::PercentEqualsToken, None),
            '&' => self.scan_operator('&', SyntaxKind::AmpersandToken, SyntaxKind::AmpersandEqualsToken, Some((SyntaxKind::AmpersandAmpersandToken, SyntaxKind::AmpersandAmpersandEqualsToken))),
            '|' => self.scan_operator('|', SyntaxKind::BarToken, SyntaxKind::BarEqualsToken, Some((SyntaxKind::BarBarToken, SyntaxKind::BarBarEqualsToken))),
            '^' => self.scan_operator('^', SyntaxKind::CaretToken, SyntaxKind::CaretEqualsToken, None),
            '\'' | '"' => self.scan_string_literal(ch),
            '`' => self.scan_template_start(),
            '0'..='9' => self.scan_number(),
            '\\' => self.scan_identifier(),
            c if is_identifier_start(c) => self.scan_identifier(),
            c => {
                let start = self.pos;
                self.advance_char(c);
                self.error(&messages::INVALID_CHARACTER, start, self.pos, &[]);
                SyntaxKind::Unknown
            }
        }
    }

    #[inline]
    fn single(&mut self, kind: SyntaxKind) -> SyntaxKind {
        self.pos += 1;
        kind
    }

    /// `op`, `op=`, and optionally `opop` / `opop=`.
    fn scan_operator(
        &mut self,
        op: char,
        plain: SyntaxKind,
        assign: SyntaxKind,
        doubled: Option<(SyntaxKind, SyntaxKind)>,
    ) -> SyntaxKind {
        if let Some((double, double_assign)) = doubled {
            if self.peek(1) == Some(op) {
                if self.peek(2) == Some('=') {
                    self.pos += 3;
                    return double_assign;
                }
                self.pos += 2;
                return double;
            }
        }
        if self.peek(1) == Some('=') {
            self.pos += 2;
            return assign;
        }
        self.pos += 1;
        plain
    }

    fn scan_increment(&mut self, op: char, plain: SyntaxKind, doubled: SyntaxKind, assign: SyntaxKind) -> SyntaxKind {
        match self.peek(1) {
            Some(c) if c == op => {
                self.pos += 2;
                doubled
            }
            Some('=') => {
                self.pos += 2;
                assign
            }
            _ => {
                self.pos += 1;
                plain
            }
        }
    }

    fn scan_dot(&mut self) -> SyntaxKind {
        if self.peek(1) == Some('.') && self.peek(2) == Some('.') {
            self.pos += 3;
            SyntaxKind::DotDotDotToken
        } else if self.peek(1).is_some_and(is_digit) {
            self.scan_number()
        } else {
            self.pos += 1;
            SyntaxKind::DotToken
        }
    }

    fn scan_question(&mut self) -> SyntaxKind {
        if self.peek(1) == Some('?') {
            if self.peek(2) == Some('=') {
                self.pos += 3;
                SyntaxKind::QuestionQuestionEqualsToken
            } else {
                self.pos += 2;
                SyntaxKind::QuestionQuestionToken
            }
        } else if self.peek(1) == Some('.') && !self.peek(2).is_some_and(is_digit) {
            self.pos += 2;
            SyntaxKind::QuestionDotToken
        } else {
            self.pos += 1;
            SyntaxKind::QuestionToken
        }
    }

    fn scan_equals(&mut self) -> SyntaxKind {
        match (self.peek(1), self.peek(2)) {
            (Some('='), Some('=')) => {
                self.pos += 3;
                SyntaxKind::EqualsEqualsEqualsToken
            }
            (Some('='), _) => {
                self.pos += 2;
                SyntaxKind::EqualsEqualsToken
            }
            (Some('>'), _) => {
                self.pos += 2;
                SyntaxKind::EqualsGreaterThanToken
            }
            _ => {
                self.pos += 1;
                SyntaxKind::EqualsToken
            }
        }
    }

    fn scan_exclamation(&mut self) -> SyntaxKind {
        match (self.peek(1), self.peek(2)) {
            (Some('='), Some('=')) => {
                self.pos += 3;
                SyntaxKind::ExclamationEqualsEqualsToken
            }
            (Some('='), _) => {
                self.pos += 2;
                SyntaxKind::ExclamationEqualsToken
            }
            _ => {
                self.pos += 1;
                SyntaxKind::ExclamationToken
            }
        }
    }

    fn scan_private_name(&mut self) -> SyntaxKind {
        let start = self.pos;
        self.pos += 1;
        match self.current_char() {
            Some(c) if is_identifier_start(c) || c == '\\' => {
                self.scan_identifier_parts();
                self.token_value.insert(0, '#');
                SyntaxKind::PrivateIdentifier
            }
            _ => {
                self.error(&messages::INVALID_CHARACTER, start, self.pos, &[]);
                SyntaxKind::HashToken
            }
        }
    }

    // ========================================================================
    // Identifiers
    // ========================================================================

    fn scan_identifier(&mut self) -> SyntaxKind {
        self.scan_identifier_parts();
        if self.token_value.is_empty() {
            return SyntaxKind::Unknown;
        }
        if !self.has_unicode_escape() {
            if let Some(keyword) = SyntaxKind::from_keyword(&self.token_value) {
                return keyword;
            }
        }
        SyntaxKind::Identifier
    }

    /// Accumulate identifier characters (with `\u` escapes) into `token_value`.
    fn scan_identifier_parts(&mut self) {
        let mut first = true;
        while let Some(ch) = self.current_char() {
            if ch == '\\' {
                let start = self.pos;
                if self.peek(1) != Some('u') {
                    self.pos += 1;
                    self.error(&messages::INVALID_CHARACTER, start, self.pos, &[]);
                    break;
                }
                self.pos += 2;
                self.token_flags |= TokenFlags::UNICODE_ESCAPE;
                match self.scan_unicode_escape_body(start) {
                    Some(c) if (first && is_identifier_start(c)) || (!first && is_identifier_part(c)) => {
                        self.token_value.push(c)
                    }
                    Some(_) => self.error(&messages::INVALID_CHARACTER, start, self.pos, &[]),
                    None => {}
                }
            } else if (first && is_identifier_start(ch)) || (!first && is_identifier_part(ch)) {
                self.token_value.push(ch);
                self.advance_char(ch);
            } else {
                break;
            }
            first = false;
        }
    }

    /// Extend the current identifier with `-name` parts (JSX names like `data-id`).
    pub fn scan_jsx_identifier(&mut self) -> SyntaxKind {
        if !self.token.is_identifier_or_keyword() {
            return self.token;
        }
        while self.current_char() == Some('-') {
            self.token_value.push('-');
            self.pos += 1;
            while let Some(ch) = self.current_char() {
                if !is_identifier_part(ch) {
                    break;
                }
                self.token_value.push(ch);
                self.advance_char(ch);
            }
        }
        if self.token_value.contains('-') {
            self.token = SyntaxKind::Identifier;
        }
        self.token
    }

    // ========================================================================
    // Escapes
    // ========================================================================

    /// After `\u`, read `XXXX` or `{X...}`. `start` is the backslash offset.
    fn scan_unicode_escape_body(&mut self, start: usize) -> Option<char> {
        if self.current_char() == Some('{') {
            self.pos += 1;
            self.token_flags |= TokenFlags::EXTENDED_UNICODE_ESCAPE;
            let digits_start = self.pos;
            while self.current_char().is_some_and(is_hex_digit) {
                self.pos += 1;
            }
            let digits = &self.text[digits_start..self.pos];
            if digits.is_empty() {
                self.error(&messages::HEXADECIMAL_DIGIT_EXPECTED, start, self.pos, &[]);
                return None;
            }
            let value = u32::from_str_radix(digits, 16).ok().filter(|v| *v <= 0x10FFFF);
            if value.is_none() {
                self.error(&messages::AN_EXTENDED_UNICODE_ESCAPE_VALUE_MUST_BE_BETWEEN_0X0_AND_0X10FFFF, start, self.pos, &[]);
            }
            if self.current_char() == Some('}') {
                self.pos += 1;
            } else {
                self.error(&messages::UNTERMINATED_UNICODE_ESCAPE_SEQUENCE, start, self.pos, &[]);
                return None;
            }
            value.map(|v| char::from_u32(v).unwrap_or(char::REPLACEMENT_CHARACTER))
        } else {
            let code = self.scan_exact_hex_digits(4, start)?;
            if (0xD800..=0xDBFF).contains(&code) {
                // Combine an escaped surrogate pair into one scalar value.
                if self.peek(0) == Some('\\') && self.peek(1) == Some('u') {
                    let save = self.pos;
                    self.pos += 2;
                    if let Some(low) = self.scan_exact_hex_digits(4, save) {
                        if (0xDC00..=0xDFFF).contains(&low) {
                            let combined = 0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00);
                            return char::from_u32(combined);
                        }
                    }
                    self.pos = save;
                }
                return Some(char::REPLACEMENT_CHARACTER);
            }
            Some(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER))
        }
    }

    fn scan_exact_hex_digits(&mut self, count: usize, start: usize) -> Option<u32> {
        let digits_start = self.pos;
        for _ in 0..count {
            if !self.current_char().is_some_and(is_hex_digit) {
                self.error(&messages::HEXADECIMAL_DIGIT_EXPECTED, start, self.pos, &[]);
                return None;
            }
            self.pos += 1;
        }
        u32::from_str_radix(&self.text[digits_start..self.pos], 16).ok()
    }

    /// Process one escape sequence after the backslash. Returns `false` for
    /// an invalid escape, which is only reported outside templates.
    fn scan_escape_sequence(&mut self, out: &mut String, in_template: bool) -> bool {
        let start = self.pos - 1;
        let Some(ch) = self.current_char() else {
            return true;
        };
        self.advance_char(ch);
        match ch {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'b' => out.push('\u{0008}'),
            'f' => out.push('\u{000C}'),
            'v' => out.push('\u{000B}'),
            '0' if !self.current_char().is_some_and(is_digit) => out.push('\0'),
            '0'..='7' => {
                if in_template {
                    return false;
                }
                self.token_flags |= TokenFlags::OCTAL;
                let mut value = ch as u32 - '0' as u32;
                let max_len = if ch <= '3' { 3 } else { 2 };
                let mut len = 1;
                while len < max_len {
                    match self.current_char() {
                        Some(d) if is_octal_digit(d) => {
                            value = value * 8 + (d as u32 - '0' as u32);
                            self.pos += 1;
                            len += 1;
                        }
                        _ => break,
                    }
                }
                out.push(char::from_u32(value).unwrap_or(char::REPLACEMENT_CHARACTER));
            }
            '8' | '9' => {
                if in_template {
                    return false;
                }
                out.push(ch);
            }
            'x' => {
                let digits_start = self.pos;
                for _ in 0..2 {
                    if !self.current_char().is_some_and(is_hex_digit) {
                        if !in_template {
                            self.error(&messages::HEXADECIMAL_DIGIT_EXPECTED, start, self.pos, &[]);
                        }
                        return false;
                    }
                    self.pos += 1;
                }
                let code = u32::from_str_radix(&self.text[digits_start..self.pos], 16).unwrap_or(0xFFFD);
                out.push(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
            }
            'u' => {
                let diagnostics_len = self.diagnostics.len();
                match self.scan_unicode_escape_body(start) {
                    Some(c) => out.push(c),
                    None => {
                        if in_template {
                            self.diagnostics.truncate(diagnostics_len);
                        }
                        return false;
                    }
                }
            }
            '\r' => {
                if self.current_char() == Some('\n') {
                    self.pos += 1;
                }
            }
            '\n' | LINE_SEPARATOR | PARAGRAPH_SEPARATOR => {}
            other => out.push(other),
        }
        true
    }

    // ========================================================================
    // Strings and templates
    // ========================================================================

    fn scan_string_literal(&mut self, quote: char) -> SyntaxKind {
        let start = self.pos;
        self.pos += 1;
        if quote == '\'' {
            self.token_flags |= TokenFlags::SINGLE_QUOTE;
        }
        let mut value = String::new();
        loop {
            let Some(ch) = self.current_char() else {
                self.error(&messages::UNTERMINATED_STRING_LITERAL, start, self.pos, &[]);
                self.token_flags |= TokenFlags::UNTERMINATED;
                break;
            };
            if ch == quote {
                self.pos += 1;
                break;
            }
            if ch == '\\' {
                self.pos += 1;
                self.scan_escape_sequence(&mut value, false);
                continue;
            }
            if ch == '\n' || ch == '\r' {
                self.error(&messages::UNTERMINATED_STRING_LITERAL, start, self.pos, &[]);
                self.token_flags |= TokenFlags::UNTERMINATED;
                break;
            }
            value.push(ch);
            self.advance_char(ch);
        }
        self.token_value = value;
        SyntaxKind::StringLiteral
    }

    fn scan_template_start(&mut self) -> SyntaxKind {
        self.pos += 1;
        let kind = self.scan_template_part(true);
        if kind == SyntaxKind::TemplateHead {
            self.push_mode(LexerMode::TemplateHole { depth: 0 });
        }
        kind
    }

    /// Scan the part after a `}` that closes a template hole.
    fn scan_template_continuation(&mut self) -> SyntaxKind {
        self.scan_template_part(false)
    }

    /// Scan template characters up to `` ` `` or `${`. `self.pos` is just past
    /// the opening delimiter.
    fn scan_template_part(&mut self, is_start: bool) -> SyntaxKind {
        let start = self.token_start;
        let mut cooked = String::new();
        let mut raw = String::new();
        let mut valid = true;
        let kind = loop {
            let Some(ch) = self.current_char() else {
                self.error(&messages::UNTERMINATED_TEMPLATE_LITERAL, start, self.pos, &[]);
                self.token_flags |= TokenFlags::UNTERMINATED;
                break if is_start {
                    SyntaxKind::NoSubstitutionTemplateLiteral
                } else {
                    SyntaxKind::TemplateTail
                };
            };
            if ch == '`' {
                self.pos += 1;
                break if is_start {
                    SyntaxKind::NoSubstitutionTemplateLiteral
                } else {
                    SyntaxKind::TemplateTail
                };
            }
            if ch == '$' && self.peek(1) == Some('{') {
                self.pos += 2;
                break if is_start {
                    SyntaxKind::TemplateHead
                } else {
                    SyntaxKind::TemplateMiddle
                };
            }
            if ch == '\\' {
                let escape_start = self.pos;
                self.pos += 1;
                if !self.scan_escape_sequence(&mut cooked, true) {
                    valid = false;
                }
                raw.push_str(&self.text[escape_start..self.pos].replace("\r\n", "\n").replace('\r', "\n"));
                continue;
            }
            if ch == '\r' {
                self.pos += 1;
                if self.current_char() == Some('\n') {
                    self.pos += 1;
                }
                cooked.push('\n');
                raw.push('\n');
                continue;
            }
            cooked.push(ch);
            raw.push(ch);
            self.advance_char(ch);
        };
        if valid {
            self.token_value = cooked;
        } else {
            self.token_flags |= TokenFlags::CONTAINS_INVALID_ESCAPE;
            self.token_value.clear();
        }
        self.template_raw = raw;
        kind
    }

    // ========================================================================
    // Rescans requested by the parser
    // ========================================================================

    /// Rescan the current `/` or `/=` token as a regular expression literal.
    pub fn rescan_slash_token(&mut self) -> SyntaxKind {
        if self.token != SyntaxKind::SlashToken && self.token != SyntaxKind::SlashEqualsToken {
            return self.token;
        }
        let start = self.token_start;
        self.pos = start + 1;
        let mut in_character_class = false;
        loop {
            let Some(ch) = self.current_char() else {
                self.error(&messages::UNTERMINATED_REGULAR_EXPRESSION_LITERAL, start, self.pos, &[]);
                self.token_flags |= TokenFlags::UNTERMINATED;
                break;
            };
            if is_line_break(ch) {
                self.error(&messages::UNTERMINATED_REGULAR_EXPRESSION_LITERAL, start, self.pos, &[]);
                self.token_flags |= TokenFlags::UNTERMINATED;
                break;
            }
            self.advance_char(ch);
            match ch {
                '\\' => {
                    if let Some(next) = self.current_char() {
                        if !is_line_break(next) {
                            self.advance_char(next);
                        }
                    }
                }
                '[' => in_character_class = true,
                ']' => in_character_class = false,
                '/' if !in_character_class => {
                    while let Some(flag) = self.current_char() {
                        if !is_identifier_part(flag) {
                            break;
                        }
                        self.advance_char(flag);
                    }
                    break;
                }
                _ => {}
            }
        }
        self.token_value = self.text[start..self.pos].to_string();
        self.token = SyntaxKind::RegularExpressionLiteral;
        self.token
    }

    /// Rescan `>` as `>=`, `>>`, `>>=`, `>>>`, or `>>>=`.
    pub fn rescan_greater_than_token(&mut self) -> SyntaxKind {
        if self.token != SyntaxKind::GreaterThanToken || self.pos != self.token_start + 1 {
            return self.token;
        }
        self.token = match (self.peek(0), self.peek(1), self.peek(2)) {
            (Some('>'), Some('>'), Some('=')) => {
                self.pos += 3;
                SyntaxKind::GreaterThanGreaterThanGreaterThanEqualsToken
            }
            (Some('>'), Some('>'), _) => {
                self.pos += 2;
                SyntaxKind::GreaterThanGreaterThanGreaterThanToken
            }
            (Some('>'), Some('='), _) => {
                self.pos += 2;
                SyntaxKind::GreaterThanGreaterThanEqualsToken
            }
            (Some('>'), _, _) => {
                self.pos += 1;
                SyntaxKind::GreaterThanGreaterThanToken
            }
            (Some('='), _, _) => {
                self.pos += 1;
                SyntaxKind::GreaterThanEqualsToken
            }
            _ => SyntaxKind::GreaterThanToken,
        };
        self.token
    }

    /// Re-read the current token from its start under the current mode.
    /// Used after the parser pushes or pops a JSX mode mid-token.
    pub fn rescan_current_token(&mut self) -> SyntaxKind {
        self.pos = self.full_start;
        let flags = self.token_flags & TokenFlags::PRECEDING_LINE_BREAK;
        let kind = self.scan();
        self.token_flags |= flags;
        kind
    }

    // ========================================================================
    // Numbers
    // ========================================================================

    fn scan_number(&mut self) -> SyntaxKind {
        let start = self.pos;
        if self.current_char() == Some('0') {
            let radix = match self.peek(1) {
                Some('x') | Some('X') => Some((16, TokenFlags::HEX_SPECIFIER)),
                Some('b') | Some('B') => Some((2, TokenFlags::BINARY_SPECIFIER)),
                Some('o') | Some('O') => Some((8, TokenFlags::OCTAL_SPECIFIER)),
                _ => None,
            };
            if let Some((radix, flag)) = radix {
                self.pos += 2;
                self.token_flags |= flag;
                let digits = self.scan_digits(radix);
                if digits.is_empty() {
                    let message = if radix == 16 {
                        &messages::HEXADECIMAL_DIGIT_EXPECTED
                    } else {
                        &messages::DIGIT_EXPECTED
                    };
                    self.error(message, start, self.pos, &[]);
                }
                return self.finish_number(format!("{}{}", &self.text[start..start + 2], digits));
            }
            if self.peek(1).is_some_and(is_digit) {
                // Legacy octal (`017`) or decimal with a leading zero (`089`).
                self.token_flags |= TokenFlags::OCTAL;
                let digits = self.scan_digits(10);
                return self.finish_number(digits);
            }
        }

        let mut cleaned = self.scan_digits(10);
        if self.current_char() == Some('.') {
            self.pos += 1;
            cleaned.push('.');
            cleaned.push_str(&self.scan_digits(10));
        }
        if let Some(e @ ('e' | 'E')) = self.current_char() {
            let exponent_start = self.pos;
            self.pos += 1;
            self.token_flags |= TokenFlags::SCIENTIFIC;
            cleaned.push(e);
            if let Some(sign @ ('+' | '-')) = self.current_char() {
                self.pos += 1;
                cleaned.push(sign);
            }
            let exponent = self.scan_digits(10);
            if exponent.is_empty() {
                self.error(&messages::DIGIT_EXPECTED, exponent_start, self.pos, &[]);
            }
            cleaned.push_str(&exponent);
        }
        self.finish_number(cleaned)
    }

    fn finish_number(&mut self, cleaned: String) -> SyntaxKind {
        let mut kind = SyntaxKind::NumericLiteral;
        if self.current_char() == Some('n') {
            self.pos += 1;
            kind = SyntaxKind::BigIntLiteral;
            self.token_value = format!("{}n", cleaned);
        } else {
            self.token_value = cleaned;
        }
        if let Some(ch) = self.current_char() {
            if is_identifier_start(ch) {
                let ident_start = self.pos;
                while self.current_char().is_some_and(is_identifier_part) {
                    self.pos += 1;
                }
                self.error(
                    &messages::AN_IDENTIFIER_OR_KEYWORD_CANNOT_IMMEDIATELY_FOLLOW_A_NUMERIC_LITERAL,
                    ident_start,
                    self.pos,
                    &[],
                );
            }
        }
        kind
    }

    /// Scan digits in `radix`, validating `_` separators. Returns the digits
    /// with separators removed.
    fn scan_digits(&mut self, radix: u32) -> String {
        let mut digits = String::new();
        let mut allow_separator = false;
        let mut previous_was_separator = false;
        while let Some(ch) = self.current_char() {
            if ch == '_' {
                self.token_flags |= TokenFlags::CONTAINS_SEPARATOR;
                if allow_separator {
                    allow_separator = false;
                    previous_was_separator = true;
                } else if previous_was_separator {
                    self.error(&messages::MULTIPLE_CONSECUTIVE_NUMERIC_SEPARATORS_ARE_NOT_PERMITTED, self.pos, self.pos + 1, &[]);
                } else {
                    self.error(&messages::NUMERIC_SEPARATORS_ARE_NOT_ALLOWED_HERE, self.pos, self.pos + 1, &[]);
                }
                self.pos += 1;
                continue;
            }
            if !ch.is_digit(radix) {
                break;
            }
            digits.push(ch);
            allow_separator = true;
            previous_was_separator = false;
            self.pos += 1;
        }
        if previous_was_separator {
            self.error(&messages::NUMERIC_SEPARATORS_ARE_NOT_ALLOWED_HERE, self.pos - 1, self.pos, &[]);
        }
        digits
    }

    // ========================================================================
    // JSX
    // ========================================================================

    /// Scan a token inside a JSX tag.
    fn scan_jsx_tag_token(&mut self) -> SyntaxKind {
        match self.current_char() {
            Some(quote @ ('"' | '\'')) => self.scan_jsx_string(quote),
            Some('>') => self.single(SyntaxKind::GreaterThanToken),
            _ => {
                let kind = self.scan_normal_token();
                self.token = kind;
                self.scan_jsx_identifier()
            }
        }
    }

    /// JSX attribute strings: no escape processing, may span lines.
    fn scan_jsx_string(&mut self, quote: char) -> SyntaxKind {
        let start = self.pos;
        self.pos += 1;
        match memchr::memchr(quote as u8, &self.bytes()[self.pos..]) {
            Some(offset) => {
                self.token_value = self.text[self.pos..self.pos + offset].to_string();
                self.pos += offset + 1;
            }
            None => {
                self.token_value = self.text[self.pos..].to_string();
                self.pos = self.text.len();
                self.error(&messages::UNTERMINATED_STRING_LITERAL, start, self.pos, &[]);
                self.token_flags |= TokenFlags::UNTERMINATED;
            }
        }
        if quote == '\'' {
            self.token_flags |= TokenFlags::SINGLE_QUOTE;
        }
        SyntaxKind::StringLiteral
    }

    /// Scan a token among JSX children: text, `{`, `<` or `</`.
    fn scan_jsx_child(&mut self) -> SyntaxKind {
        self.token_start = self.pos;
        match self.current_char() {
            None => SyntaxKind::EndOfFileToken,
            Some('{') => self.single(SyntaxKind::OpenBraceToken),
            Some('<') if self.peek(1) == Some('/') => {
                self.pos += 2;
                SyntaxKind::LessThanSlashToken
            }
            Some('<') => self.single(SyntaxKind::LessThanToken),
            Some(_) => {
                let rest = &self.bytes()[self.pos..];
                let len = memchr::memchr2(b'{', b'<', rest).unwrap_or(rest.len());
                let text = &self.text[self.pos..self.pos + len];
                let all_whitespace = text.chars().all(|c| c.is_whitespace());
                self.token_value = text.to_string();
                self.pos += len;
                if all_whitespace {
                    SyntaxKind::JsxTextAllWhiteSpaces
                } else {
                    SyntaxKind::JsxText
                }
            }
        }
    }
}

/// Numeric value of a literal's cleaned text (separators removed, no `n` suffix).
pub fn numeric_literal_value(text: &str) -> f64 {
    let radix = match text.get(..2) {
        Some("0x") | Some("0X") => 16,
        Some("0b") | Some("0B") => 2,
        Some("0o") | Some("0O") => 8,
        _ => 10,
    };
    if radix != 10 {
        return digits_to_f64(&text[2..], radix);
    }
    // Legacy octal: all digits below 8 with a leading zero.
    if text.len() > 1 && text.starts_with('0') && text.bytes().all(|b| (b'0'..=b'7').contains(&b)) {
        return digits_to_f64(&text[1..], 8);
    }
    text.parse::<f64>().unwrap_or(f64::NAN)
}

fn digits_to_f64(digits: &str, radix: u32) -> f64 {
    if let Ok(v) = u64::from_str_radix(digits, radix) {
        return v as f64;
    }
    digits
        .chars()
        .filter_map(|c| c.to_digit(radix))
        .fold(0.0, |acc, d| acc * radix as f64 + d as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan_kinds(source: &str) -> Vec<SyntaxKind> {
        let mut scanner = Scanner::new(source);
        let mut kinds = Vec::new();
        loop {
            let kind = scanner.scan();
            if kind == SyntaxKind::EndOfFileToken {
                break;
            }
            kinds.push(kind);
        }
        kinds
    }

    #[test]
    fn test_scan_simple_tokens() {
        assert_eq!(
            scan_kinds("( ) { } [ ] ; , :"),
            vec![
                SyntaxKind::OpenParenToken,
                SyntaxKind::CloseParenToken,
                SyntaxKind::OpenBraceToken,
                SyntaxKind::CloseBraceToken,
                SyntaxKind::OpenBracketToken,
                SyntaxKind::CloseBracketToken,
                SyntaxKind::SemicolonToken,
                SyntaxKind::CommaToken,
                SyntaxKind::ColonToken,
            ]
        );
    }

    #[test]
    fn test_byte_offsets_after_multibyte_text() {
        let mut scanner = Scanner::new("'é' x");
        assert_eq!(scanner.scan(), SyntaxKind::StringLiteral);
        assert_eq!(scanner.token_end(), 4);
        assert_eq!(scanner.scan(), SyntaxKind::Identifier);
        assert_eq!(scanner.token_start(), 5);
    }

    #[test]
    fn test_string_escapes_are_cooked() {
        let mut scanner = Scanner::new(r#""a\n\x41B\u{43}\
d""#);
        assert_eq!(scanner.scan(), SyntaxKind::StringLiteral);
        assert_eq!(scanner.token_value(), "a\nABCd");
        assert!(scanner.diagnostics().is_empty());
    }

    #[test]
    fn test_unterminated_string_reports_and_flags() {
        let mut scanner = Scanner::new("'abc\nx");
        assert_eq!(scanner.scan(), SyntaxKind::StringLiteral);
        assert!(scanner.is_unterminated());
        assert_eq!(scanner.token_value(), "abc");
        assert_eq!(scanner.diagnostics().diagnostics()[0].code, 1002);
        assert_eq!(scanner.scan(), SyntaxKind::Identifier);
    }

    #[test]
    fn test_unterminated_block_comment() {
        let mut scanner = Scanner::new("a /* never closed");
        assert_eq!(scanner.scan(), SyntaxKind::Identifier);
        assert_eq!(scanner.scan(), SyntaxKind::EndOfFileToken);
        assert_eq!(scanner.diagnostics().diagnostics()[0].code, 1010);
    }

    #[test]
    fn test_template_hole_mode() {
        let mut scanner = Scanner::new("`a${ {b: 1} }c${d}e`");
        assert_eq!(scanner.scan(), SyntaxKind::TemplateHead);
        assert_eq!(scanner.token_value(), "a");
        assert_eq!(scanner.mode(), LexerMode::TemplateHole { depth: 0 });
        assert_eq!(scanner.scan(), SyntaxKind::OpenBraceToken);
        assert_eq!(scanner.scan(), SyntaxKind::Identifier);
        assert_eq!(scanner.scan(), SyntaxKind::ColonToken);
        assert_eq!(scanner.scan(), SyntaxKind::NumericLiteral);
        assert_eq!(scanner.scan(), SyntaxKind::CloseBraceToken);
        assert_eq!(scanner.scan(), SyntaxKind::TemplateMiddle);
        assert_eq!(scanner.token_value(), "c");
        assert_eq!(scanner.scan(), SyntaxKind::Identifier);
        assert_eq!(scanner.scan(), SyntaxKind::TemplateTail);
        assert_eq!(scanner.token_value(), "e");
        assert_eq!(scanner.mode(), LexerMode::Normal);
    }

    #[test]
    fn test_template_invalid_escape_has_no_cooked_value() {
        let mut scanner = Scanner::new(r"`\unicode`");
        assert_eq!(scanner.scan(), SyntaxKind::NoSubstitutionTemplateLiteral);
        assert!(scanner.token_flags().contains(TokenFlags::CONTAINS_INVALID_ESCAPE));
        assert_eq!(scanner.template_raw(), r"\unicode");
        assert!(scanner.diagnostics().is_empty());
    }

    #[test]
    fn test_rescan_slash_as_regex() {
        let mut scanner = Scanner::new("/[/]+/gi.test");
        assert_eq!(scanner.scan(), SyntaxKind::SlashToken);
        assert_eq!(scanner.rescan_slash_token(), SyntaxKind::RegularExpressionLiteral);
        assert_eq!(scanner.token_value(), "/[/]+/gi");
        assert_eq!(scanner.scan(), SyntaxKind::DotToken);
    }

    #[test]
    fn test_rescan_greater_than() {
        let mut scanner = Scanner::new("a >>>= b");
        scanner.scan();
        assert_eq!(scanner.scan(), SyntaxKind::GreaterThanToken);
        assert_eq!(
            scanner.rescan_greater_than_token(),
            SyntaxKind::GreaterThanGreaterThanGreaterThanEqualsToken
        );
    }

    #[test]
    fn test_numeric_forms() {
        let mut scanner = Scanner::new("1_000 0x1F 0b101 0o17 017 .5e3 10n");
        let mut values = Vec::new();
        while scanner.scan() != SyntaxKind::EndOfFileToken {
            values.push(scanner.token_value().to_string());
        }
        assert_eq!(values, vec!["1000", "0x1F", "0b101", "0o17", "017", ".5e3", "10n"]);
        assert_eq!(numeric_literal_value("1000"), 1000.0);
        assert_eq!(numeric_literal_value("0x1F"), 31.0);
        assert_eq!(numeric_literal_value("0b101"), 5.0);
        assert_eq!(numeric_literal_value("017"), 15.0);
        assert_eq!(numeric_literal_value("089"), 89.0);
        assert_eq!(numeric_literal_value(".5e3"), 500.0);
    }

    #[test]
    fn test_bad_numeric_separators() {
        let mut scanner = Scanner::new("1__0 2_");
        scanner.scan();
        scanner.scan();
        let codes: Vec<u32> = scanner.diagnostics().diagnostics().iter().map(|d| d.code).collect();
        assert_eq!(codes, vec![6189, 6188]);
    }

    #[test]
    fn test_identifier_after_number_is_an_error() {
        let mut scanner = Scanner::new("3in");
        assert_eq!(scanner.scan(), SyntaxKind::NumericLiteral);
        assert_eq!(scanner.diagnostics().diagnostics()[0].code, 1351);
    }

    #[test]
    fn test_escaped_identifier_is_not_a_keyword() {
        let mut scanner = Scanner::new(r"\u0069f");
        assert_eq!(scanner.scan(), SyntaxKind::Identifier);
        assert_eq!(scanner.token_value(), "if");
    }

    #[test]
    fn test_private_name() {
        let mut scanner = Scanner::new("#count");
        assert_eq!(scanner.scan(), SyntaxKind::PrivateIdentifier);
        assert_eq!(scanner.token_value(), "#count");
    }

    #[test]
    fn test_shebang_and_comments_are_collected() {
        let mut scanner = Scanner::new("#!/usr/bin/env node\n// one\nlet /* two */ x");
        scanner.set_collect_comments(true);
        assert_eq!(scanner.skip_shebang().as_deref(), Some("#!/usr/bin/env node"));
        assert_eq!(scanner.scan(), SyntaxKind::LetKeyword);
        assert!(scanner.has_preceding_line_break());
        assert_eq!(scanner.scan(), SyntaxKind::Identifier);
        let comments = scanner.take_comments();
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].text, "// one");
        assert_eq!(comments[1].kind, CommentKind::Block);
    }

    #[test]
    fn test_restore_discards_diagnostics_and_modes() {
        let mut scanner = Scanner::new("`a${'x");
        let state = scanner.save_state();
        scanner.scan();
        scanner.scan();
        assert!(!scanner.diagnostics().is_empty());
        scanner.restore_state(state);
        assert!(scanner.diagnostics().is_empty());
        assert_eq!(scanner.mode(), LexerMode::Normal);
    }

    #[test]
    fn test_jsx_modes() {
        let mut scanner = Scanner::new("<my-el a='x\\y'>hi {b}</my-el>");
        assert_eq!(scanner.scan(), SyntaxKind::LessThanToken);
        scanner.push_mode(LexerMode::JsxTag);
        assert_eq!(scanner.scan(), SyntaxKind::Identifier);
        assert_eq!(scanner.token_value(), "my-el");
        assert_eq!(scanner.scan(), SyntaxKind::Identifier);
        assert_eq!(scanner.scan(), SyntaxKind::EqualsToken);
        assert_eq!(scanner.scan(), SyntaxKind::StringLiteral);
        assert_eq!(scanner.token_value(), "x\\y");
        assert_eq!(scanner.scan(), SyntaxKind::GreaterThanToken);
        scanner.pop_mode();
        scanner.push_mode(LexerMode::JsxChildren);
        assert_eq!(scanner.scan(), SyntaxKind::JsxText);
        assert_eq!(scanner.token_value(), "hi ");
        assert_eq!(scanner.scan(), SyntaxKind::OpenBraceToken);
        scanner.push_mode(LexerMode::Normal);
        assert_eq!(scanner.scan(), SyntaxKind::Identifier);
        assert_eq!(scanner.scan(), SyntaxKind::CloseBraceToken);
        scanner.pop_mode();
        assert_eq!(scanner.scan(), SyntaxKind::LessThanSlashToken);
    }
}
