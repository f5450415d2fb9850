//! Bindings and binding tables.

use esforge_ast::NodeId;
use esforge_core::intern::InternedString;
use esforge_core::text::TextRange;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::scope::ScopeId;

/// Index of a [`Binding`] in its [`ScopeTree`](crate::ScopeTree).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BindingId(pub u32);

impl BindingId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// What kind of declaration introduced a binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BindingKind {
    Var,
    Let,
    Const,
    Function,
    Class,
    Parameter,
    Import,
    /// Interface, type alias or type parameter.
    Type,
    Enum,
    Namespace,
    CatchParameter,
}

impl BindingKind {
    /// Declared with block scoping and a temporal dead zone.
    pub fn is_lexical(self) -> bool {
        matches!(self, BindingKind::Let | BindingKind::Const | BindingKind::Class)
    }

    /// Whether the binding exists at runtime.
    pub fn is_value(self) -> bool {
        self != BindingKind::Type
    }

    /// Hoisted to the top of the enclosing function scope.
    pub fn is_function_scoped(self) -> bool {
        matches!(self, BindingKind::Var | BindingKind::Function | BindingKind::Parameter)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BindingKind::Var => "var",
            BindingKind::Let => "let",
            BindingKind::Const => "const",
            BindingKind::Function => "function",
            BindingKind::Class => "class",
            BindingKind::Parameter => "parameter",
            BindingKind::Import => "import",
            BindingKind::Type => "type",
            BindingKind::Enum => "enum",
            BindingKind::Namespace => "namespace",
            BindingKind::CatchParameter => "catch-parameter",
        }
    }
}

/// A named entity declared in some scope.
#[derive(Debug, Clone)]
pub struct Binding {
    pub id: BindingId,
    pub name: String,
    pub kind: BindingKind,
    pub scope: ScopeId,
    /// Identifier nodes of every declaration merged into this binding.
    pub declarations: Vec<NodeId>,
    /// Range of the first declaring identifier.
    pub range: TextRange,
    /// A type (interface or alias) merged with a value of the same name.
    pub has_type_meaning: bool,
    pub is_exported: bool,
    /// Only declared with `declare`; nothing exists at runtime.
    pub is_ambient: bool,
    /// `import type` or an inline `type` specifier.
    pub is_type_only_import: bool,
    pub value_references: u32,
    pub type_references: u32,
}

impl Binding {
    pub(crate) fn new(id: BindingId, name: &str, kind: BindingKind, scope: ScopeId, declaration: NodeId, range: TextRange) -> Self {
        Self {
            id,
            name: name.to_string(),
            kind,
            scope,
            declarations: vec![declaration],
            range,
            has_type_meaning: kind == BindingKind::Type,
            is_exported: false,
            is_ambient: false,
            is_type_only_import: false,
            value_references: 0,
            type_references: 0,
        }
    }

    /// Referenced somewhere a runtime value is needed.
    #[inline]
    pub fn is_referenced_as_value(&self) -> bool {
        self.value_references > 0
    }
}

/// Maps interned names to the bindings of one scope.
#[derive(Debug, Clone, Default)]
pub struct BindingTable {
    table: FxHashMap<InternedString, BindingId>,
}

impl BindingTable {
    pub fn new() -> Self {
        Self {
            table: FxHashMap::default(),
        }
    }

    pub fn get(&self, name: &InternedString) -> Option<BindingId> {
        self.table.get(name).copied()
    }

    pub fn set(&mut self, name: InternedString, binding: BindingId) {
        self.table.insert(name, binding);
    }

    pub fn has(&self, name: &InternedString) -> bool {
        self.table.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&InternedString, &BindingId)> {
        self.table.iter()
    }
}
