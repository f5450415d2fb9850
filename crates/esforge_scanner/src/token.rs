//! Token information produced by the scanner.

use esforge_ast::syntax_kind::{SyntaxKind, TokenCategory};
use esforge_ast::types::TokenFlags;
use serde::Serialize;

/// Information about a scanned token.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenInfo {
    /// The kind of token.
    pub kind: SyntaxKind,
    /// Start byte offset in the source text (after leading trivia).
    pub pos: u32,
    /// End byte offset in the source text (exclusive).
    pub end: u32,
    /// The raw source text of the token.
    pub text: String,
    /// Cooked value: identifier name, string contents after escape
    /// processing, numeric text without separators. Empty for punctuation.
    pub value: String,
    /// Token flags (preceding line break, numeric format, etc.).
    pub flags: TokenFlags,
}

impl TokenInfo {
    pub fn new(kind: SyntaxKind, pos: u32, end: u32) -> Self {
        Self {
            kind,
            pos,
            end,
            text: String::new(),
            value: String::new(),
            flags: TokenFlags::NONE,
        }
    }

    /// The length of this token in bytes.
    pub fn len(&self) -> u32 {
        self.end - self.pos
    }

    /// Whether this token has zero length.
    pub fn is_empty(&self) -> bool {
        self.pos == self.end
    }

    pub fn category(&self) -> TokenCategory {
        self.kind.category()
    }

    /// Whether there was a line break before this token.
    pub fn has_preceding_line_break(&self) -> bool {
        self.flags.contains(TokenFlags::PRECEDING_LINE_BREAK)
    }

    pub fn is_unterminated(&self) -> bool {
        self.flags.contains(TokenFlags::UNTERMINATED)
    }
}
