//! Flag types and small identifiers attached to AST nodes and tokens.

use serde::{Deserialize, Serialize};

bitflags::bitflags! {
    /// Per-node flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct NodeFlags: u32 {
        const NONE                 = 0;
        /// Created by a transform rather than parsed from source.
        const SYNTHESIZED          = 1 << 0;
        /// `namespace` keyword (as opposed to `module`).
        const NAMESPACE            = 1 << 1;
        /// Inner declaration of a dotted `namespace A.B`.
        const NESTED_NAMESPACE     = 1 << 2;
        /// `declare global { }`.
        const GLOBAL_AUGMENTATION  = 1 << 3;
        /// Member or call that is part of an optional chain.
        const OPTIONAL_CHAIN       = 1 << 4;
        /// Node was produced by error recovery.
        const THIS_NODE_HAS_ERROR  = 1 << 5;
        /// String literal written with single quotes.
        const SINGLE_QUOTE         = 1 << 6;
        /// Arrow function whose single parameter was written without parentheses.
        const BARE_ARROW_PARAMETER = 1 << 7;
        /// Object binding/literal element written in shorthand form.
        const SHORTHAND            = 1 << 8;
    }
}

bitflags::bitflags! {
    /// Modifier flags for declarations and class members.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct ModifierFlags: u32 {
        const NONE              = 0;
        const EXPORT            = 1 << 0;
        const AMBIENT           = 1 << 1;
        const PUBLIC            = 1 << 2;
        const PRIVATE           = 1 << 3;
        const PROTECTED         = 1 << 4;
        const STATIC            = 1 << 5;
        const READONLY          = 1 << 6;
        const ACCESSOR          = 1 << 7;
        const ABSTRACT          = 1 << 8;
        const ASYNC             = 1 << 9;
        const DEFAULT           = 1 << 10;
        const CONST             = 1 << 11;
        const OVERRIDE          = 1 << 12;
        const IN                = 1 << 13;
        const OUT               = 1 << 14;

        const ACCESSIBILITY_MODIFIER = Self::PUBLIC.bits() | Self::PRIVATE.bits() | Self::PROTECTED.bits();
        const PARAMETER_PROPERTY_MODIFIER = Self::ACCESSIBILITY_MODIFIER.bits() | Self::READONLY.bits() | Self::OVERRIDE.bits();

        /// Modifiers that exist only in TypeScript and vanish on erasure.
        const TYPE_SCRIPT_MODIFIER = Self::AMBIENT.bits()
            | Self::PUBLIC.bits()
            | Self::PRIVATE.bits()
            | Self::PROTECTED.bits()
            | Self::READONLY.bits()
            | Self::ABSTRACT.bits()
            | Self::OVERRIDE.bits()
            | Self::IN.bits()
            | Self::OUT.bits();

        const EXPORT_DEFAULT = Self::EXPORT.bits() | Self::DEFAULT.bits();
    }
}

bitflags::bitflags! {
    /// Flags describing a scanned token.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct TokenFlags: u16 {
        const NONE                 = 0;
        const PRECEDING_LINE_BREAK = 1 << 0;
        const UNTERMINATED         = 1 << 1;
        const EXTENDED_UNICODE_ESCAPE = 1 << 2;
        const SCIENTIFIC           = 1 << 3;
        const OCTAL                = 1 << 4;
        const HEX_SPECIFIER        = 1 << 5;
        const BINARY_SPECIFIER     = 1 << 6;
        const OCTAL_SPECIFIER      = 1 << 7;
        const CONTAINS_SEPARATOR   = 1 << 8;
        const UNICODE_ESCAPE       = 1 << 9;
        const CONTAINS_INVALID_ESCAPE = 1 << 10;
        const SINGLE_QUOTE         = 1 << 11;

        const NUMERIC_LITERAL_FLAGS = Self::SCIENTIFIC.bits()
            | Self::OCTAL.bits()
            | Self::HEX_SPECIFIER.bits()
            | Self::BINARY_SPECIFIER.bits()
            | Self::OCTAL_SPECIFIER.bits()
            | Self::CONTAINS_SEPARATOR.bits();
    }
}

/// Identity of an identifier occurrence within one parse.
///
/// The binder maps reference ids to bindings. Synthesized identifiers use
/// [`NodeId::INVALID`] unless a transform allocates a fresh id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const INVALID: NodeId = NodeId(0);

    #[inline]
    pub fn is_valid(self) -> bool {
        self.0 != 0
    }
}

/// Whether a program is a classic script or an ECMAScript module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Script,
    #[default]
    Module,
}

/// `var`, `let`, `const` or `using`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableKind {
    Var,
    Let,
    Const,
    Using,
}

impl VariableKind {
    pub fn as_str(self) -> &'static str {
        match self {
            VariableKind::Var => "var",
            VariableKind::Let => "let",
            VariableKind::Const => "const",
            VariableKind::Using => "using",
        }
    }

    #[inline]
    pub fn is_block_scoped(self) -> bool {
        self != VariableKind::Var
    }
}

/// Plain method, getter or setter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MethodKind {
    Method,
    Get,
    Set,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentKind {
    Line,
    Block,
}
