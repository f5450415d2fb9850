//! Standalone tokenization without a parser.
//!
//! Without syntactic context the regex-versus-divide question is answered
//! from the previous significant token, and `>` is always merged into its
//! compound operator. JSX is not recognized here.

use crate::scanner::Scanner;
use crate::token::TokenInfo;
use esforge_ast::node::Comment;
use esforge_ast::syntax_kind::SyntaxKind;
use esforge_ast::types::{CommentKind, TokenFlags};
use esforge_diagnostics::DiagnosticCollection;
use std::collections::VecDeque;

/// Iterator over the tokens of a source text, ending with a single EOF token.
pub struct Tokens {
    scanner: Scanner,
    previous: Option<SyntaxKind>,
    with_comments: bool,
    pending: VecDeque<TokenInfo>,
    finished: bool,
}

/// Tokenize `source` starting at byte offset `start`.
pub fn tokenize(source: &str, start: usize) -> Tokens {
    let mut scanner = Scanner::new(source);
    scanner.reset_to(start);
    Tokens {
        scanner,
        previous: None,
        with_comments: false,
        pending: VecDeque::new(),
        finished: false,
    }
}

impl Tokens {
    /// Interleave comment tokens with the regular tokens.
    pub fn with_comments(mut self, enabled: bool) -> Self {
        self.with_comments = enabled;
        self.scanner.set_collect_comments(enabled);
        self
    }

    /// Lexical diagnostics reported so far.
    pub fn diagnostics(&self) -> &DiagnosticCollection {
        self.scanner.diagnostics()
    }

    /// Restart tokenization at byte offset `pos`.
    pub fn reset(&mut self, pos: usize) {
        self.scanner.reset_to(pos);
        self.scanner.take_comments();
        self.previous = None;
        self.pending.clear();
        self.finished = false;
    }

    fn regex_allowed(&self) -> bool {
        match self.previous {
            None => true,
            Some(
                SyntaxKind::CloseParenToken
                | SyntaxKind::CloseBracketToken
                | SyntaxKind::CloseBraceToken
                | SyntaxKind::ThisKeyword
                | SyntaxKind::SuperKeyword
                | SyntaxKind::NullKeyword
                | SyntaxKind::TrueKeyword
                | SyntaxKind::FalseKeyword,
            ) => false,
            Some(kind) => kind.is_punctuation() || kind.is_keyword(),
        }
    }

    fn comment_token(comment: Comment) -> TokenInfo {
        let kind = match comment.kind {
            CommentKind::Line => SyntaxKind::SingleLineCommentTrivia,
            CommentKind::Block => SyntaxKind::MultiLineCommentTrivia,
        };
        let flags = if comment.has_preceding_line_break {
            TokenFlags::PRECEDING_LINE_BREAK
        } else {
            TokenFlags::NONE
        };
        TokenInfo {
            kind,
            pos: comment.range.pos,
            end: comment.range.end,
            value: comment.text.clone(),
            text: comment.text,
            flags,
        }
    }
}

impl Iterator for Tokens {
    type Item = TokenInfo;

    fn next(&mut self) -> Option<TokenInfo> {
        if let Some(token) = self.pending.pop_front() {
            return Some(token);
        }
        if self.finished {
            return None;
        }

        let mut kind = self.scanner.scan();
        match kind {
            SyntaxKind::SlashToken | SyntaxKind::SlashEqualsToken if self.regex_allowed() => {
                kind = self.scanner.rescan_slash_token();
            }
            SyntaxKind::GreaterThanToken => {
                kind = self.scanner.rescan_greater_than_token();
            }
            _ => {}
        }
        if kind == SyntaxKind::EndOfFileToken {
            self.finished = true;
        }
        self.previous = Some(kind);

        let token = self.scanner.token_info();
        if self.with_comments {
            self.pending.extend(self.scanner.take_comments().into_iter().map(Self::comment_token));
            self.pending.push_back(token);
            return self.pending.pop_front();
        }
        Some(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<SyntaxKind> {
        tokenize(source, 0).map(|t| t.kind).collect()
    }

    #[test]
    fn test_ends_with_one_eof() {
        let tokens: Vec<_> = tokenize("a", 0).collect();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[1].kind, SyntaxKind::EndOfFileToken);
        assert_eq!(kinds(""), vec![SyntaxKind::EndOfFileToken]);
    }

    #[test]
    fn test_regex_after_operator_divide_after_value() {
        assert_eq!(
            kinds("x = /a/g"),
            vec![
                SyntaxKind::Identifier,
                SyntaxKind::EqualsToken,
                SyntaxKind::RegularExpressionLiteral,
                SyntaxKind::EndOfFileToken,
            ]
        );
        assert_eq!(
            kinds("a / b / c"),
            vec![
                SyntaxKind::Identifier,
                SyntaxKind::SlashToken,
                SyntaxKind::Identifier,
                SyntaxKind::SlashToken,
                SyntaxKind::Identifier,
                SyntaxKind::EndOfFileToken,
            ]
        );
    }

    #[test]
    fn test_compound_greater_than() {
        assert_eq!(kinds("a >>= 1")[1], SyntaxKind::GreaterThanGreaterThanEqualsToken);
    }

    #[test]
    fn test_comments_interleaved() {
        let tokens: Vec<_> = tokenize("a // note\nb", 0).with_comments(true).collect();
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SyntaxKind::Identifier,
                SyntaxKind::SingleLineCommentTrivia,
                SyntaxKind::Identifier,
                SyntaxKind::EndOfFileToken,
            ]
        );
        assert_eq!(tokens[1].text, "// note");
    }

    #[test]
    fn test_start_offset() {
        let tokens: Vec<_> = tokenize("let x", 4).collect();
        assert_eq!(tokens[0].kind, SyntaxKind::Identifier);
        assert_eq!(tokens[0].pos, 4);
    }
}
