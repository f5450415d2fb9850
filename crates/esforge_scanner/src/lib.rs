//! esforge_scanner: Lexer for JavaScript, TypeScript and JSX source text.
//!
//! The scanner produces tokens on demand for the parser, with:
//! - A lexer-mode stack for template holes and JSX contexts
//! - Cooked string and template values alongside raw text
//! - Parser-driven rescans for regular expressions and `>` operators
//! - Comment collection for printers that preserve comments
//!
//! [`tokenize`] offers parser-free tokenization for tooling.

pub mod char_codes;
mod scanner;
mod token;
mod tokenize;

pub use scanner::{numeric_literal_value, LexerMode, Scanner, ScannerState};
pub use token::TokenInfo;
pub use tokenize::{tokenize, Tokens};
