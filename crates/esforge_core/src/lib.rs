//! esforge_core: Core utilities shared by every stage of the engine.
//!
//! Provides text spans and ranges, byte-offset to line/column mapping,
//! and the per-request string interner.

pub mod intern;
pub mod number;
pub mod text;

// Re-export commonly used types
pub use intern::{InternedString, StringInterner};
pub use number::number_to_string;
pub use text::{LineAndColumn, LineMap, TextPos, TextRange, TextSpan};
