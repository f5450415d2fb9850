//! esforge_parser: recursive descent parser for JavaScript, TypeScript and JSX.
//!
//! Builds an owned AST from the scanner's tokens. Syntax errors are recorded
//! as diagnostics and parsing continues, so a program is always produced.

mod declarations;
mod expressions;
mod jsx;
mod parser;
mod precedence;
mod statements;
mod types;
mod utilities;

pub use parser::{parse_program, ParseResult, Parser};
pub use precedence::{get_binary_operator_precedence, OperatorPrecedence};
