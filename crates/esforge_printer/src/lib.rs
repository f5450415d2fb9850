//! esforge_printer: AST to source text.
//!
//! Renders a [`Program`](esforge_ast::Program) in expanded or minified form.
//! Output is deterministic and re-parses to the same tree, so printing is a
//! fixed point after one round. While printing, the start of every node that
//! came from source is recorded as a [`Mapping`] for source map generation.

mod expressions;
mod jsx;
mod precedence;
mod printer;
mod statements;
mod types;
mod writer;

pub use printer::{print_program, PrintResult, Printer};
pub use writer::Mapping;
