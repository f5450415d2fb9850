//! The scope tree produced by binding one program.

use esforge_ast::NodeId;
use esforge_core::intern::StringInterner;
use esforge_core::text::TextRange;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::module_record::ModuleRecord;
use crate::symbol::{Binding, BindingId, BindingTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ScopeId(pub u32);

impl ScopeId {
    pub const ROOT: ScopeId = ScopeId(0);

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeKind {
    Module,
    Script,
    /// Function, arrow, method or namespace body.
    Function,
    Block,
    Class,
    Catch,
    /// Head of a `for` loop declaring `let`/`const`.
    For,
}

impl ScopeKind {
    /// `var` and function declarations hoist to the nearest scope of this kind.
    pub fn is_var_scope(self) -> bool {
        matches!(self, ScopeKind::Module | ScopeKind::Script | ScopeKind::Function)
    }
}

#[derive(Debug, Clone)]
pub struct Scope {
    pub id: ScopeId,
    pub kind: ScopeKind,
    pub parent: Option<ScopeId>,
    pub children: Vec<ScopeId>,
    pub range: TextRange,
    pub bindings: BindingTable,
}

/// Outcome of resolving one identifier reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Resolved(BindingId),
    /// No declaration in any enclosing scope; a global or a typo.
    Unresolved,
}

impl Resolution {
    pub fn binding(self) -> Option<BindingId> {
        match self {
            Resolution::Resolved(id) => Some(id),
            Resolution::Unresolved => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Reference {
    pub node: NodeId,
    pub name: String,
    pub range: TextRange,
    pub scope: ScopeId,
    pub resolution: Resolution,
    /// Appears in a type annotation, `typeof` query or type-only export.
    pub in_type_position: bool,
}

/// Scopes, bindings and references of one program.
pub struct ScopeTree {
    pub(crate) scopes: Vec<Scope>,
    pub(crate) bindings: Vec<Binding>,
    pub(crate) references: Vec<Reference>,
    pub(crate) reference_index: FxHashMap<NodeId, usize>,
    pub(crate) declaration_index: FxHashMap<NodeId, BindingId>,
    pub(crate) module: ModuleRecord,
    pub(crate) interner: StringInterner,
}

impl ScopeTree {
    pub(crate) fn new(root_kind: ScopeKind, range: TextRange) -> Self {
        Self {
            scopes: vec![Scope {
                id: ScopeId::ROOT,
                kind: root_kind,
                parent: None,
                children: Vec::new(),
                range,
                bindings: BindingTable::new(),
            }],
            bindings: Vec::new(),
            references: Vec::new(),
            reference_index: FxHashMap::default(),
            declaration_index: FxHashMap::default(),
            module: ModuleRecord::default(),
            interner: StringInterner::new(),
        }
    }

    pub fn root(&self) -> &Scope {
        &self.scopes[0]
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.index()]
    }

    pub fn scopes(&self) -> &[Scope] {
        &self.scopes
    }

    pub fn binding(&self, id: BindingId) -> &Binding {
        &self.bindings[id.index()]
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    pub fn references(&self) -> &[Reference] {
        &self.references
    }

    pub fn module_record(&self) -> &ModuleRecord {
        &self.module
    }

    /// The reference recorded for an identifier node, if it was one.
    pub fn reference(&self, node: NodeId) -> Option<&Reference> {
        self.reference_index.get(&node).map(|&i| &self.references[i])
    }

    /// Binding a reference node resolves to.
    pub fn resolve_reference(&self, node: NodeId) -> Option<BindingId> {
        self.reference(node).and_then(|r| r.resolution.binding())
    }

    /// Binding introduced by a declaring identifier node.
    pub fn declaration(&self, node: NodeId) -> Option<BindingId> {
        self.declaration_index.get(&node).copied()
    }

    /// Binding for either a declaring or a referencing identifier.
    pub fn binding_of(&self, node: NodeId) -> Option<BindingId> {
        self.declaration(node).or_else(|| self.resolve_reference(node))
    }

    /// Find `name` starting at `scope` and walking outwards.
    pub fn lookup(&self, scope: ScopeId, name: &str) -> Option<BindingId> {
        let key = self.interner.get(name)?;
        let mut current = Some(scope);
        while let Some(id) = current {
            let scope = &self.scopes[id.index()];
            if let Some(binding) = scope.bindings.get(&key) {
                return Some(binding);
            }
            current = scope.parent;
        }
        None
    }

    /// Bindings declared directly in the root scope, in declaration order.
    pub fn top_level_bindings(&self) -> impl Iterator<Item = &Binding> {
        self.bindings.iter().filter(|b| b.scope == ScopeId::ROOT)
    }

    pub fn unresolved_references(&self) -> impl Iterator<Item = &Reference> {
        self.references
            .iter()
            .filter(|r| r.resolution == Resolution::Unresolved)
    }

    /// Whether any scope declares `name`.
    pub fn is_declared_anywhere(&self, name: &str) -> bool {
        let Some(key) = self.interner.get(name) else {
            return false;
        };
        self.scopes.iter().any(|s| s.bindings.has(&key))
    }

    /// Whether `name` is declared anywhere or read as a free variable.
    pub fn is_name_used(&self, name: &str) -> bool {
        self.is_declared_anywhere(name) || self.references.iter().any(|r| r.name == name)
    }

    /// Nearest enclosing scope (including `scope`) that holds `var`s.
    pub fn var_scope_of(&self, scope: ScopeId) -> ScopeId {
        let mut current = scope;
        loop {
            let s = &self.scopes[current.index()];
            if s.kind.is_var_scope() {
                return current;
            }
            match s.parent {
                Some(parent) => current = parent,
                None => return current,
            }
        }
    }
}

impl std::fmt::Debug for ScopeTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScopeTree")
            .field("scopes", &self.scopes.len())
            .field("bindings", &self.bindings.len())
            .field("references", &self.references.len())
            .finish()
    }
}
