//! esforge_ast: Abstract Syntax Tree definitions for JavaScript and TypeScript.
//!
//! The tree is owned and serializable. Nodes carry a [`NodeData`] with their
//! syntax kind and source range; identifiers additionally carry a [`NodeId`]
//! that the binder uses to link references to declarations.

pub mod accessors;
pub mod factory;
pub mod node;
pub mod spanless;
pub mod syntax_kind;
pub mod types;
pub mod visitor;
pub mod visitor_mut;

// Re-export key types
pub use node::*;
pub use syntax_kind::{SyntaxKind, TokenCategory};
pub use types::*;
pub use spanless::spanless;
pub use visitor::AstVisitor;
pub use visitor_mut::AstVisitorMut;
