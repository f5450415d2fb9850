//! The binder implementation.
//!
//! Binding is one walk over the tree. Whenever a scope is entered its
//! declarations are collected first (`var` and function-scoped names are
//! hoisted to the nearest function or module scope, lexical names stay in
//! their block), and only then are the statements inside it walked and
//! their identifier references resolved. References therefore see every
//! declaration of every enclosing scope regardless of source order.

use esforge_ast::visitor::{self, AstVisitor};
use esforge_ast::*;
use esforge_core::text::TextRange;
use esforge_diagnostics::{messages, Diagnostic, DiagnosticCollection, DiagnosticMessage};
use serde::{Deserialize, Serialize};

use crate::globals::is_known_global;
use crate::module_record::{ExportEntry, ExportTarget, ImportEntry, ImportName};
use crate::scope::{Reference, Resolution, Scope, ScopeId, ScopeKind, ScopeTree};
use crate::symbol::{Binding, BindingId, BindingKind, BindingTable};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BindOptions {
    /// Warn about value references that resolve to nothing and are not
    /// well-known globals.
    pub report_unresolved: bool,
}

/// Result of binding one program.
#[derive(Debug)]
pub struct BindResult {
    pub scopes: ScopeTree,
    pub diagnostics: Vec<Diagnostic>,
}

/// Bind `program` with `options`.
pub fn bind_program(program: &Program, options: &BindOptions) -> BindResult {
    Binder::new(options.clone()).bind_program(program)
}

/// How a second declaration of a name in one scope is treated.
enum Merge {
    /// Same binding, kind unchanged.
    Keep,
    /// Same binding, kind replaced (e.g. `var f; function f() {}`).
    Replace(BindingKind),
    /// Same binding, which now also names a type.
    AddTypeMeaning,
    Conflict(&'static DiagnosticMessage),
}

fn merge_kinds(existing: BindingKind, incoming: BindingKind) -> Merge {
    use BindingKind::*;
    match (existing, incoming) {
        (Type, Type) => Merge::Keep,
        (Type, value) => Merge::Replace(value),
        (Import, _) | (_, Import) => Merge::Conflict(&messages::IMPORT_DECLARATION_CONFLICTS_WITH_LOCAL_DECLARATION_OF_0),
        (_, Type) => Merge::AddTypeMeaning,
        (Let | Const, _) | (_, Let | Const) => Merge::Conflict(&messages::CANNOT_REDECLARE_BLOCK_SCOPED_VARIABLE_0),
        (Namespace, Namespace) | (Enum, Enum) => Merge::Keep,
        (Namespace, Function | Class | Enum) => Merge::Replace(incoming),
        (Function | Class | Enum, Namespace) => Merge::Keep,
        (Class | Enum | Namespace, _) | (_, Class | Enum | Namespace) => Merge::Conflict(&messages::DUPLICATE_IDENTIFIER_0),
        (Parameter, Parameter) => Merge::Conflict(&messages::DUPLICATE_IDENTIFIER_0),
        (Var | Parameter | CatchParameter, Function) => Merge::Replace(Function),
        _ => Merge::Keep,
    }
}

/// Modifiers relevant to a single declaration.
#[derive(Clone, Copy, Default)]
struct DeclareFlags {
    exported: bool,
    ambient: bool,
    type_only: bool,
}

impl DeclareFlags {
    fn from_modifiers(data: &NodeData) -> Self {
        Self {
            exported: data.has_modifier(ModifierFlags::EXPORT),
            ambient: data.has_modifier(ModifierFlags::AMBIENT),
            type_only: false,
        }
    }
}

/// Builds a [`ScopeTree`] for one program.
pub struct Binder {
    options: BindOptions,
    tree: ScopeTree,
    current: ScopeId,
    diagnostics: DiagnosticCollection,
    file_name: String,
}

impl Binder {
    pub fn new(options: BindOptions) -> Self {
        Self {
            options,
            tree: ScopeTree::new(ScopeKind::Module, TextRange::DUMMY),
            current: ScopeId::ROOT,
            diagnostics: DiagnosticCollection::new(),
            file_name: String::new(),
        }
    }

    pub fn bind_program(mut self, program: &Program) -> BindResult {
        let _span = tracing::debug_span!("bind", file = %program.file_name).entered();
        let root_kind = match program.source_type {
            SourceType::Module => ScopeKind::Module,
            SourceType::Script => ScopeKind::Script,
        };
        self.tree = ScopeTree::new(root_kind, program.data.range);
        self.file_name = program.file_name.clone();

        self.hoist_var_declarations(&program.statements, ScopeId::ROOT);
        self.declare_lexical_declarations(&program.statements, ScopeId::ROOT);
        self.visit_statements(&program.statements);
        self.collect_module_record(&program.statements);
        self.report_unresolved();

        tracing::debug!(
            scopes = self.tree.scopes.len(),
            bindings = self.tree.bindings.len(),
            references = self.tree.references.len(),
            "bound program"
        );
        let mut diagnostics = self.diagnostics;
        diagnostics.sort();
        BindResult {
            scopes: self.tree,
            diagnostics: diagnostics.into_diagnostics(),
        }
    }

    // ========================================================================
    // Scopes
    // ========================================================================

    fn push_scope(&mut self, kind: ScopeKind, range: TextRange) -> ScopeId {
        let id = ScopeId(self.tree.scopes.len() as u32);
        self.tree.scopes.push(Scope {
            id,
            kind,
            parent: Some(self.current),
            children: Vec::new(),
            range,
            bindings: BindingTable::new(),
        });
        self.tree.scopes[self.current.index()].children.push(id);
        self.current = id;
        id
    }

    fn pop_scope(&mut self) {
        if let Some(parent) = self.tree.scopes[self.current.index()].parent {
            self.current = parent;
        }
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    fn declare(&mut self, scope: ScopeId, name: &Identifier, kind: BindingKind, flags: DeclareFlags) -> Option<BindingId> {
        if name.text.is_empty() {
            return None;
        }
        let key = self.tree.interner.intern(&name.text);
        let existing = self.tree.scopes[scope.index()].bindings.get(&key);
        let id = match existing {
            Some(existing_id) => {
                let existing_kind = self.tree.bindings[existing_id.index()].kind;
                match merge_kinds(existing_kind, kind) {
                    Merge::Keep => {}
                    Merge::Replace(kind) => {
                        let binding = &mut self.tree.bindings[existing_id.index()];
                        binding.has_type_meaning |= existing_kind == BindingKind::Type;
                        binding.kind = kind;
                    }
                    Merge::AddTypeMeaning => self.tree.bindings[existing_id.index()].has_type_meaning = true,
                    Merge::Conflict(message) => {
                        let first = self.tree.bindings[existing_id.index()].range;
                        let mut diagnostic = Diagnostic::at(name.data.range.to_span(), message, &[&name.text])
                            .in_file(&self.file_name);
                        if !first.is_dummy() {
                            diagnostic = diagnostic.with_related(
                                Diagnostic::at(first.to_span(), &messages::DUPLICATE_IDENTIFIER_0, &[&name.text])
                                    .in_file(&self.file_name),
                            );
                        }
                        self.diagnostics.add(diagnostic);
                    }
                }
                let binding = &mut self.tree.bindings[existing_id.index()];
                binding.declarations.push(name.id);
                binding.is_exported |= flags.exported;
                binding.is_ambient &= flags.ambient;
                binding.is_type_only_import &= flags.type_only;
                existing_id
            }
            None => {
                let id = BindingId(self.tree.bindings.len() as u32);
                let mut binding = Binding::new(id, &name.text, kind, scope, name.id, name.data.range);
                binding.is_exported = flags.exported;
                binding.is_ambient = flags.ambient;
                binding.is_type_only_import = flags.type_only;
                self.tree.bindings.push(binding);
                self.tree.scopes[scope.index()].bindings.set(key, id);
                id
            }
        };
        if name.id.is_valid() {
            self.tree.declaration_index.insert(name.id, id);
        }
        Some(id)
    }

    fn declare_binding_name(&mut self, scope: ScopeId, name: &BindingName, kind: BindingKind, flags: DeclareFlags) {
        let mut names = Vec::new();
        name.bound_identifiers(&mut names);
        for id in names {
            self.declare(scope, id, kind, flags);
        }
    }

    /// Declare every `var` reachable from `statements` without crossing a
    /// function boundary.
    fn hoist_var_declarations(&mut self, statements: &[Statement], scope: ScopeId) {
        for statement in statements {
            self.hoist_var_statement(statement, scope);
        }
    }

    fn hoist_var_statement(&mut self, statement: &Statement, scope: ScopeId) {
        match statement {
            Statement::Variable(n) if n.declaration_list.kind == VariableKind::Var => {
                let flags = DeclareFlags::from_modifiers(&n.data);
                for decl in &n.declaration_list.declarations {
                    self.declare_binding_name(scope, &decl.name, BindingKind::Var, flags);
                }
            }
            Statement::Block(n) => self.hoist_var_declarations(&n.statements, scope),
            Statement::If(n) => {
                self.hoist_var_statement(&n.then_statement, scope);
                if let Some(else_statement) = &n.else_statement {
                    self.hoist_var_statement(else_statement, scope);
                }
            }
            Statement::Do(n) => self.hoist_var_statement(&n.statement, scope),
            Statement::While(n) => self.hoist_var_statement(&n.statement, scope),
            Statement::With(n) => self.hoist_var_statement(&n.statement, scope),
            Statement::Labeled(n) => self.hoist_var_statement(&n.statement, scope),
            Statement::For(n) => {
                if let Some(ForInitializer::Variable(list)) = &n.initializer {
                    self.hoist_var_list(list, scope);
                }
                self.hoist_var_statement(&n.statement, scope);
            }
            Statement::ForIn(n) => {
                if let ForInitializer::Variable(list) = &n.initializer {
                    self.hoist_var_list(list, scope);
                }
                self.hoist_var_statement(&n.statement, scope);
            }
            Statement::ForOf(n) => {
                if let ForInitializer::Variable(list) = &n.initializer {
                    self.hoist_var_list(list, scope);
                }
                self.hoist_var_statement(&n.statement, scope);
            }
            Statement::Switch(n) => {
                for clause in &n.clauses {
                    self.hoist_var_declarations(&clause.statements, scope);
                }
            }
            Statement::Try(n) => {
                self.hoist_var_declarations(&n.try_block.statements, scope);
                if let Some(catch) = &n.catch_clause {
                    self.hoist_var_declarations(&catch.block.statements, scope);
                }
                if let Some(finally) = &n.finally_block {
                    self.hoist_var_declarations(&finally.statements, scope);
                }
            }
            _ => {}
        }
    }

    fn hoist_var_list(&mut self, list: &VariableDeclarationList, scope: ScopeId) {
        if list.kind == VariableKind::Var {
            for decl in &list.declarations {
                self.declare_binding_name(scope, &decl.name, BindingKind::Var, DeclareFlags::default());
            }
        }
    }

    /// Declare the block-scoped declarations that appear directly in
    /// `statements`.
    fn declare_lexical_declarations(&mut self, statements: &[Statement], scope: ScopeId) {
        for statement in statements {
            match statement {
                Statement::Variable(n) if n.declaration_list.kind != VariableKind::Var => {
                    let kind = match n.declaration_list.kind {
                        VariableKind::Let => BindingKind::Let,
                        _ => BindingKind::Const,
                    };
                    let flags = DeclareFlags::from_modifiers(&n.data);
                    for decl in &n.declaration_list.declarations {
                        self.declare_binding_name(scope, &decl.name, kind, flags);
                    }
                }
                Statement::Function(n) => {
                    if let Some(name) = &n.name {
                        self.declare(scope, name, BindingKind::Function, DeclareFlags::from_modifiers(&n.data));
                    }
                }
                Statement::Class(n) => {
                    if let Some(name) = &n.name {
                        self.declare(scope, name, BindingKind::Class, DeclareFlags::from_modifiers(&n.data));
                    }
                }
                Statement::Enum(n) => {
                    self.declare(scope, &n.name, BindingKind::Enum, DeclareFlags::from_modifiers(&n.data));
                }
                Statement::Interface(n) => {
                    self.declare(scope, &n.name, BindingKind::Type, DeclareFlags::from_modifiers(&n.data));
                }
                Statement::TypeAlias(n) => {
                    self.declare(scope, &n.name, BindingKind::Type, DeclareFlags::from_modifiers(&n.data));
                }
                Statement::Module(n) => {
                    if let ModuleName::Identifier(name) = &n.name {
                        if !n.data.flags.contains(NodeFlags::GLOBAL_AUGMENTATION) {
                            let mut flags = DeclareFlags::from_modifiers(&n.data);
                            flags.ambient |= !module_has_values(n);
                            self.declare(scope, name, BindingKind::Namespace, flags);
                        }
                    }
                }
                Statement::Import(n) => self.declare_import(scope, n),
                Statement::ImportEquals(n) => {
                    let mut flags = DeclareFlags::from_modifiers(&n.data);
                    flags.type_only = n.is_type_only;
                    self.declare(scope, &n.name, BindingKind::Import, flags);
                }
                _ => {}
            }
        }
    }

    fn declare_import(&mut self, scope: ScopeId, node: &ImportDeclaration) {
        let Some(clause) = &node.import_clause else {
            return;
        };
        let clause_flags = DeclareFlags {
            type_only: clause.is_type_only,
            ..DeclareFlags::default()
        };
        if let Some(name) = &clause.name {
            self.declare(scope, name, BindingKind::Import, clause_flags);
        }
        match &clause.named_bindings {
            Some(NamedImportBindings::Namespace(name)) => {
                self.declare(scope, name, BindingKind::Import, clause_flags);
            }
            Some(NamedImportBindings::Named(specifiers)) => {
                for specifier in specifiers {
                    let flags = DeclareFlags {
                        type_only: clause.is_type_only || specifier.is_type_only,
                        ..DeclareFlags::default()
                    };
                    self.declare(scope, &specifier.name, BindingKind::Import, flags);
                }
            }
            None => {}
        }
    }

    fn declare_type_parameters(&mut self, params: &Option<Vec<TypeParameter>>) {
        if let Some(params) = params {
            for param in params {
                self.declare(self.current, &param.name, BindingKind::Type, DeclareFlags::default());
            }
        }
    }

    // ========================================================================
    // References
    // ========================================================================

    fn reference(&mut self, id: &Identifier, in_type_position: bool) {
        if id.text.is_empty() {
            return;
        }
        let resolution = match self.lookup(&id.text, in_type_position) {
            Some(binding) => {
                let binding_ref = &mut self.tree.bindings[binding.index()];
                if in_type_position {
                    binding_ref.type_references += 1;
                } else {
                    binding_ref.value_references += 1;
                }
                Resolution::Resolved(binding)
            }
            None => Resolution::Unresolved,
        };
        let index = self.tree.references.len();
        self.tree.references.push(Reference {
            node: id.id,
            name: id.text.clone(),
            range: id.data.range,
            scope: self.current,
            resolution,
            in_type_position,
        });
        if id.id.is_valid() {
            self.tree.reference_index.insert(id.id, index);
        }
    }

    /// Value lookups skip bindings that only name a type.
    fn lookup(&self, name: &str, in_type_position: bool) -> Option<BindingId> {
        let key = self.tree.interner.get(name)?;
        let mut current = Some(self.current);
        while let Some(id) = current {
            let scope = &self.tree.scopes[id.index()];
            if let Some(binding) = scope.bindings.get(&key) {
                if in_type_position || self.tree.bindings[binding.index()].kind.is_value() {
                    return Some(binding);
                }
            }
            current = scope.parent;
        }
        None
    }

    /// `implements A.B<T>` / `interface I extends A`: the leftmost name is
    /// a type reference.
    fn reference_heritage(&mut self, heritage: &[ExpressionWithTypeArguments]) {
        for clause in heritage {
            let mut expr = &clause.expression;
            while let Expression::PropertyAccess(access) = expr {
                expr = &access.expression;
            }
            if let Expression::Identifier(id) = expr {
                self.reference(id, true);
            }
            if let Some(args) = &clause.type_arguments {
                for arg in args {
                    self.visit_type_node(arg);
                }
            }
        }
    }

    fn report_unresolved(&mut self) {
        if !self.options.report_unresolved {
            return;
        }
        for reference in &self.tree.references {
            if reference.resolution == Resolution::Unresolved
                && !reference.in_type_position
                && !is_known_global(&reference.name)
            {
                self.diagnostics.add(
                    Diagnostic::at(reference.range.to_span(), &messages::CANNOT_FIND_NAME_0, &[&reference.name])
                        .in_file(&self.file_name),
                );
            }
        }
    }

    // ========================================================================
    // Functions and classes
    // ========================================================================

    fn bind_parameters(&mut self, parameters: &[Parameter]) {
        for param in parameters {
            if !param.is_this_parameter() {
                self.declare_binding_name(self.current, &param.name, BindingKind::Parameter, DeclareFlags::default());
            }
        }
        for param in parameters {
            self.visit_parameter(param);
        }
    }

    fn bind_function_body(&mut self, body: &Block) {
        self.hoist_var_declarations(&body.statements, self.current);
        self.declare_lexical_declarations(&body.statements, self.current);
        self.visit_statements(&body.statements);
    }

    fn bind_module_declaration(&mut self, node: &ModuleDeclaration) {
        match &node.body {
            Some(ModuleBody::Block(block)) => {
                self.push_scope(ScopeKind::Function, block.data.range);
                self.hoist_var_declarations(&block.statements, self.current);
                self.declare_lexical_declarations(&block.statements, self.current);
                self.visit_statements(&block.statements);
                self.pop_scope();
            }
            Some(ModuleBody::Namespace(inner)) => {
                self.push_scope(ScopeKind::Function, inner.data.range);
                if let ModuleName::Identifier(name) = &inner.name {
                    let flags = DeclareFlags {
                        exported: true,
                        ambient: !module_has_values(inner),
                        type_only: false,
                    };
                    self.declare(self.current, name, BindingKind::Namespace, flags);
                }
                self.bind_module_declaration(inner);
                self.pop_scope();
            }
            None => {}
        }
    }

    // ========================================================================
    // Module record
    // ========================================================================

    fn collect_module_record(&mut self, statements: &[Statement]) {
        for statement in statements {
            match statement {
                Statement::Import(n) => self.collect_imports(n),
                Statement::Variable(n) if n.data.has_modifier(ModifierFlags::EXPORT) => {
                    let type_only = n.data.has_modifier(ModifierFlags::AMBIENT);
                    for decl in &n.declaration_list.declarations {
                        let mut names = Vec::new();
                        decl.name.bound_identifiers(&mut names);
                        for id in names {
                            self.add_export(&id.text, local(&id.text), type_only, id.data.range);
                        }
                    }
                }
                Statement::Function(n) if n.data.has_modifier(ModifierFlags::EXPORT) => {
                    let type_only = n.data.has_modifier(ModifierFlags::AMBIENT) || n.body.is_none();
                    self.add_declaration_export(&n.data, n.name.as_ref(), type_only);
                }
                Statement::Class(n) if n.data.has_modifier(ModifierFlags::EXPORT) => {
                    let type_only = n.data.has_modifier(ModifierFlags::AMBIENT);
                    self.add_declaration_export(&n.data, n.name.as_ref(), type_only);
                }
                Statement::Enum(n) if n.data.has_modifier(ModifierFlags::EXPORT) => {
                    let type_only = n.data.has_modifier(ModifierFlags::AMBIENT);
                    self.add_export(&n.name.text, local(&n.name.text), type_only, n.name.data.range);
                }
                Statement::Interface(n) if n.data.has_modifier(ModifierFlags::EXPORT) => {
                    self.add_declaration_export(&n.data, Some(&n.name), true);
                }
                Statement::TypeAlias(n) if n.data.has_modifier(ModifierFlags::EXPORT) => {
                    self.add_export(&n.name.text, local(&n.name.text), true, n.name.data.range);
                }
                Statement::Module(n) if n.data.has_modifier(ModifierFlags::EXPORT) => {
                    if let ModuleName::Identifier(name) = &n.name {
                        let type_only = n.data.has_modifier(ModifierFlags::AMBIENT) || !module_has_values(n);
                        self.add_export(&name.text, local(&name.text), type_only, name.data.range);
                    }
                }
                Statement::ImportEquals(n) if n.data.has_modifier(ModifierFlags::EXPORT) => {
                    self.add_export(&n.name.text, local(&n.name.text), n.is_type_only, n.name.data.range);
                }
                Statement::Export(n) => self.collect_export_declaration(n),
                Statement::ExportAssignment(n) => {
                    if n.is_export_equals {
                        self.tree.module.has_export_equals = true;
                    } else {
                        self.add_export("default", ExportTarget::Expression, false, n.data.range);
                    }
                }
                _ => {}
            }
        }
    }

    fn collect_imports(&mut self, node: &ImportDeclaration) {
        let specifier = node.module_specifier.value.clone();
        let Some(clause) = &node.import_clause else {
            return;
        };
        let mut entries = Vec::new();
        if let Some(name) = &clause.name {
            entries.push((name, ImportName::Default, clause.is_type_only));
        }
        match &clause.named_bindings {
            Some(NamedImportBindings::Namespace(name)) => {
                entries.push((name, ImportName::Namespace, clause.is_type_only));
            }
            Some(NamedImportBindings::Named(specifiers)) => {
                for s in specifiers {
                    let imported = match s.imported_name() {
                        "default" => ImportName::Default,
                        other => ImportName::Named(other.to_string()),
                    };
                    entries.push((&s.name, imported, clause.is_type_only || s.is_type_only));
                }
            }
            None => {}
        }
        for (name, imported, is_type_only) in entries {
            let binding = self.tree.declaration(name.id);
            self.tree.module.imports.push(ImportEntry {
                local: name.text.clone(),
                imported,
                specifier: specifier.clone(),
                is_type_only,
                binding,
            });
        }
    }

    fn collect_export_declaration(&mut self, node: &ExportDeclaration) {
        match (&node.module_specifier, &node.export_clause) {
            (Some(specifier), None) => {
                if !node.is_type_only {
                    self.tree.module.star_exports.push(specifier.value.clone());
                }
            }
            (Some(specifier), Some(ExportClause::Namespace(name))) => {
                let target = ExportTarget::ReExportNamespace {
                    specifier: specifier.value.clone(),
                };
                self.add_export(name.text(), target, node.is_type_only, node.data.range);
            }
            (Some(specifier), Some(ExportClause::Named(specifiers))) => {
                for s in specifiers {
                    let target = ExportTarget::ReExport {
                        specifier: specifier.value.clone(),
                        imported: s.local_name().to_string(),
                    };
                    self.add_export(s.name.text(), target, node.is_type_only || s.is_type_only, s.data.range);
                }
            }
            (None, Some(ExportClause::Named(specifiers))) => {
                for s in specifiers {
                    let local_name = s.local_name();
                    let names_type_only = self
                        .tree
                        .lookup(ScopeId::ROOT, local_name)
                        .map(|b| {
                            let binding = self.tree.binding(b);
                            !binding.kind.is_value() || binding.is_type_only_import || binding.is_ambient
                        })
                        .unwrap_or(false);
                    let type_only = node.is_type_only || s.is_type_only || names_type_only;
                    self.add_export(s.name.text(), local(local_name), type_only, s.data.range);
                }
            }
            (None, _) => {}
        }
    }

    fn add_declaration_export(&mut self, data: &NodeData, name: Option<&Identifier>, type_only: bool) {
        let is_default = data.has_modifier(ModifierFlags::DEFAULT);
        match (name, is_default) {
            (Some(name), true) => self.add_export("default", local(&name.text), type_only, name.data.range),
            (Some(name), false) => self.add_export(&name.text, local(&name.text), type_only, name.data.range),
            (None, _) => self.add_export("default", ExportTarget::Expression, type_only, data.range),
        }
    }

    fn add_export(&mut self, exported: &str, target: ExportTarget, is_type_only: bool, range: TextRange) {
        if !is_type_only {
            let duplicate = self
                .tree
                .module
                .exports
                .iter()
                .any(|e| e.exported == exported && !e.is_type_only);
            if duplicate {
                self.diagnostics.add(
                    Diagnostic::at(range.to_span(), &messages::MODULE_HAS_ALREADY_EXPORTED_A_MEMBER_NAMED_0, &[exported])
                        .in_file(&self.file_name),
                );
                return;
            }
        }
        if let ExportTarget::Local { name } = &target {
            if let Some(binding) = self.tree.lookup(ScopeId::ROOT, name) {
                self.tree.bindings[binding.index()].is_exported = true;
            }
        }
        self.tree.module.exports.push(ExportEntry {
            exported: exported.to_string(),
            target,
            is_type_only,
            range,
        });
    }
}

fn local(name: &str) -> ExportTarget {
    ExportTarget::Local { name: name.to_string() }
}

/// A namespace produces a runtime object unless it only holds types.
fn module_has_values(node: &ModuleDeclaration) -> bool {
    if node.data.has_modifier(ModifierFlags::AMBIENT) {
        return false;
    }
    match &node.body {
        Some(ModuleBody::Block(block)) => block.statements.iter().any(|s| match s {
            Statement::Interface(_) | Statement::TypeAlias(_) | Statement::Empty(_) => false,
            Statement::Module(inner) => module_has_values(inner),
            Statement::Import(_) => false,
            other => !other.data().has_modifier(ModifierFlags::AMBIENT),
        }),
        Some(ModuleBody::Namespace(inner)) => module_has_values(inner),
        None => false,
    }
}

// ============================================================================
// Traversal
// ============================================================================

impl AstVisitor for Binder {
    fn visit_statement(&mut self, node: &Statement) {
        match node {
            Statement::For(n) => {
                let lexical = matches!(&n.initializer, Some(ForInitializer::Variable(list)) if list.kind.is_block_scoped());
                if lexical {
                    self.push_scope(ScopeKind::For, n.data.range);
                    if let Some(ForInitializer::Variable(list)) = &n.initializer {
                        self.declare_for_list(list);
                    }
                }
                visitor::walk_statement(self, node);
                if lexical {
                    self.pop_scope();
                }
            }
            Statement::ForIn(ForInStatement { data, initializer, .. })
            | Statement::ForOf(ForOfStatement { data, initializer, .. }) => {
                let lexical = matches!(initializer, ForInitializer::Variable(list) if list.kind.is_block_scoped());
                if lexical {
                    self.push_scope(ScopeKind::For, data.range);
                    if let ForInitializer::Variable(list) = initializer {
                        self.declare_for_list(list);
                    }
                }
                visitor::walk_statement(self, node);
                if lexical {
                    self.pop_scope();
                }
            }
            Statement::Switch(n) => {
                self.visit_expression(&n.expression);
                self.push_scope(ScopeKind::Block, n.data.range);
                for clause in &n.clauses {
                    self.declare_lexical_declarations(&clause.statements, self.current);
                }
                for clause in &n.clauses {
                    if let Some(test) = &clause.expression {
                        self.visit_expression(test);
                    }
                    self.visit_statements(&clause.statements);
                }
                self.pop_scope();
            }
            Statement::Try(n) => {
                self.visit_block(&n.try_block);
                if let Some(catch) = &n.catch_clause {
                    self.push_scope(ScopeKind::Catch, catch.data.range);
                    if let Some(decl) = &catch.variable_declaration {
                        self.declare_binding_name(
                            self.current,
                            &decl.name,
                            BindingKind::CatchParameter,
                            DeclareFlags::default(),
                        );
                        self.visit_variable_declaration(decl);
                    }
                    self.visit_block(&catch.block);
                    self.pop_scope();
                }
                if let Some(finally) = &n.finally_block {
                    self.visit_block(finally);
                }
            }
            Statement::Interface(n) => {
                self.push_scope(ScopeKind::Block, n.data.range);
                self.declare_type_parameters(&n.type_parameters);
                self.reference_heritage(&n.extends);
                visitor::walk_statement(self, node);
                self.pop_scope();
            }
            Statement::TypeAlias(n) => {
                self.push_scope(ScopeKind::Block, n.data.range);
                self.declare_type_parameters(&n.type_parameters);
                visitor::walk_statement(self, node);
                self.pop_scope();
            }
            Statement::Module(n) => self.bind_module_declaration(n),
            Statement::ImportEquals(n) => {
                if let ModuleReference::Entity(entity) = &n.module_reference {
                    self.reference(entity.first_identifier(), n.is_type_only);
                }
            }
            _ => visitor::walk_statement(self, node),
        }
    }

    fn visit_block(&mut self, node: &Block) {
        self.push_scope(ScopeKind::Block, node.data.range);
        self.declare_lexical_declarations(&node.statements, self.current);
        self.visit_statements(&node.statements);
        self.pop_scope();
    }

    fn visit_function(&mut self, node: &Function) {
        self.push_scope(ScopeKind::Function, node.data.range);
        if node.data.kind == SyntaxKind::FunctionExpression {
            if let Some(name) = &node.name {
                self.declare(self.current, name, BindingKind::Function, DeclareFlags::default());
            }
        }
        self.declare_type_parameters(&node.type_parameters);
        self.bind_parameters(&node.parameters);
        if let Some(ret) = &node.return_type {
            self.visit_type_node(ret);
        }
        if let Some(body) = &node.body {
            self.bind_function_body(body);
        }
        self.pop_scope();
    }

    fn visit_arrow_function(&mut self, node: &ArrowFunction) {
        self.push_scope(ScopeKind::Function, node.data.range);
        self.declare_type_parameters(&node.type_parameters);
        self.bind_parameters(&node.parameters);
        if let Some(ret) = &node.return_type {
            self.visit_type_node(ret);
        }
        match &node.body {
            ArrowBody::Block(block) => self.bind_function_body(block),
            ArrowBody::Expression(expr) => self.visit_expression(expr),
        }
        self.pop_scope();
    }

    fn visit_class(&mut self, node: &Class) {
        for decorator in &node.decorators {
            self.visit_decorator(decorator);
        }
        self.push_scope(ScopeKind::Class, node.data.range);
        if node.data.kind == SyntaxKind::ClassExpression {
            if let Some(name) = &node.name {
                self.declare(self.current, name, BindingKind::Class, DeclareFlags::default());
            }
        }
        self.declare_type_parameters(&node.type_parameters);
        if let Some(extends) = &node.extends {
            self.visit_expression(extends);
        }
        if let Some(args) = &node.super_type_arguments {
            for arg in args {
                self.visit_type_node(arg);
            }
        }
        self.reference_heritage(&node.implements);
        for member in &node.members {
            self.visit_class_element(member);
        }
        self.pop_scope();
    }

    fn visit_binding_identifier(&mut self, _node: &Identifier) {}

    fn visit_identifier_reference(&mut self, node: &Identifier) {
        self.reference(node, false);
    }

    fn visit_type_reference_name(&mut self, node: &EntityName) {
        self.reference(node.first_identifier(), true);
    }

    fn visit_import_declaration(&mut self, _node: &ImportDeclaration) {}

    fn visit_export_declaration(&mut self, node: &ExportDeclaration) {
        if node.module_specifier.is_some() {
            return;
        }
        if let Some(ExportClause::Named(specifiers)) = &node.export_clause {
            for specifier in specifiers {
                let local = specifier.property_name.as_ref().unwrap_or(&specifier.name);
                if let ModuleExportName::Identifier(id) = local {
                    self.reference(id, node.is_type_only || specifier.is_type_only);
                }
            }
        }
    }
}

impl Binder {
    fn declare_for_list(&mut self, list: &VariableDeclarationList) {
        let kind = match list.kind {
            VariableKind::Let => BindingKind::Let,
            _ => BindingKind::Const,
        };
        for decl in &list.declarations {
            self.declare_binding_name(self.current, &decl.name, kind, DeclareFlags::default());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_rules() {
        assert!(matches!(merge_kinds(BindingKind::Var, BindingKind::Var), Merge::Keep));
        assert!(matches!(
            merge_kinds(BindingKind::Var, BindingKind::Function),
            Merge::Replace(BindingKind::Function)
        ));
        assert!(matches!(merge_kinds(BindingKind::Class, BindingKind::Type), Merge::AddTypeMeaning));
        assert!(matches!(merge_kinds(BindingKind::Let, BindingKind::Var), Merge::Conflict(_)));
        assert!(matches!(merge_kinds(BindingKind::Import, BindingKind::Function), Merge::Conflict(_)));
        assert!(matches!(merge_kinds(BindingKind::Function, BindingKind::Namespace), Merge::Keep));
    }

    #[test]
    fn test_new_binder_has_module_root() {
        let binder = Binder::new(BindOptions::default());
        assert_eq!(binder.tree.root().kind, ScopeKind::Module);
        assert_eq!(binder.current, ScopeId::ROOT);
    }
}
