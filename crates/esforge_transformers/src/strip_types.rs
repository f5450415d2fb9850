//! TypeScript erasure.
//!
//! Removes everything that only exists for the type checker and lowers the
//! two TypeScript constructs with runtime meaning, `enum` and instantiated
//! `namespace`, into IIFEs that populate a plain object. Import specifiers
//! are elided when the binder saw no value reference to them.

use esforge_ast::visitor::AstVisitor;
use esforge_ast::visitor_mut::{self, AstVisitorMut};
use esforge_ast::*;
use esforge_binder::{BindingId, BindingKind, ScopeTree};
use esforge_diagnostics::messages;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Deserialize;

use crate::context::PassContext;
use crate::pass::Pass;
use crate::pipeline::Configurable;
use crate::util::{entity_to_expression, is_super_call_statement, number_value, prologue_length, take};

const PASS: &str = "strip_types";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct StripTypesOptions {
    /// Keep imports that are never referenced; only `type` imports and
    /// type-only specifiers are removed. An import left without specifiers
    /// becomes a side-effect import.
    pub only_remove_type_imports: bool,
}

#[derive(Debug, Default)]
pub struct StripTypes {
    options: StripTypesOptions,
}

impl StripTypes {
    pub fn new(options: StripTypesOptions) -> Self {
        Self { options }
    }
}

impl Configurable for StripTypes {
    type Options = StripTypesOptions;

    fn from_options(options: Self::Options) -> Result<Self, String> {
        Ok(Self::new(options))
    }
}

impl Pass for StripTypes {
    fn name(&self) -> &'static str {
        PASS
    }

    fn needs_scopes(&self) -> bool {
        true
    }

    fn apply(&self, program: &mut Program, ctx: &mut PassContext) {
        let scopes = ctx.take_scopes();
        let has_jsx = contains_jsx(program);
        let mut eraser = Eraser {
            ctx,
            options: &self.options,
            scopes,
            has_jsx,
            namespace_members: FxHashMap::default(),
        };
        eraser.visit_program(program);
    }
}

fn contains_jsx(program: &Program) -> bool {
    struct Finder(bool);
    impl AstVisitor for Finder {
        fn visit_jsx_element(&mut self, _node: &JsxElement) {
            self.0 = true;
        }
        fn visit_jsx_fragment(&mut self, _node: &JsxFragment) {
            self.0 = true;
        }
    }
    let mut finder = Finder(false);
    finder.visit_program(program);
    finder.0
}

/// A namespace produces a runtime object unless it only holds types.
fn namespace_has_values(node: &ModuleDeclaration) -> bool {
    if node.data.has_modifier(ModifierFlags::AMBIENT) {
        return false;
    }
    match &node.body {
        Some(ModuleBody::Block(block)) => block.statements.iter().any(|s| match s {
            Statement::Interface(_) | Statement::TypeAlias(_) | Statement::Empty(_) => false,
            Statement::Module(inner) => namespace_has_values(inner),
            Statement::Function(f) => f.body.is_some() && !f.data.has_modifier(ModifierFlags::AMBIENT),
            Statement::ImportEquals(n) => !n.is_type_only,
            other => !other.data().has_modifier(ModifierFlags::AMBIENT),
        }),
        Some(ModuleBody::Namespace(inner)) => namespace_has_values(inner),
        None => false,
    }
}

/// `name || (name = {})`, or `name = parent.name || (parent.name = {})`
/// when the declaration is exported from an enclosing namespace.
fn iife_argument(name: &str, parent: Option<&str>) -> Expression {
    match parent {
        Some(parent) => factory::assign(
            factory::ident(name),
            factory::binary(
                factory::member(factory::ident(parent), name),
                SyntaxKind::BarBarToken,
                factory::paren(factory::assign(factory::member(factory::ident(parent), name), factory::object(vec![]))),
            ),
        ),
        None => factory::binary(
            factory::ident(name),
            SyntaxKind::BarBarToken,
            factory::paren(factory::assign(factory::ident(name), factory::object(vec![]))),
        ),
    }
}

struct Eraser<'a> {
    ctx: &'a mut PassContext,
    options: &'a StripTypesOptions,
    scopes: Option<ScopeTree>,
    has_jsx: bool,
    /// Exported namespace variables, rewritten to `Namespace.name`.
    namespace_members: FxHashMap<BindingId, (String, String)>,
}

impl Eraser<'_> {
    // ========================================================================
    // Statement lists
    // ========================================================================

    /// Lower one statement list. `namespace` is the parameter name of the
    /// namespace IIFE whose body this list is, if any.
    fn lower_list(&mut self, statements: Vec<Statement>, namespace: Option<&str>) -> Vec<Statement> {
        let mut declared: FxHashSet<String> = statements
            .iter()
            .filter_map(|stmt| match stmt {
                Statement::Function(f) if f.body.is_some() => f.name.as_ref().map(|n| n.text.clone()),
                Statement::Class(c) => c.name.as_ref().map(|n| n.text.clone()),
                _ => None,
            })
            .collect();
        let mut out = Vec::with_capacity(statements.len());
        for stmt in statements {
            self.lower_statement(stmt, namespace, &mut out, &mut declared);
        }
        out
    }

    fn lower_statement(
        &mut self,
        mut stmt: Statement,
        namespace: Option<&str>,
        out: &mut Vec<Statement>,
        declared: &mut FxHashSet<String>,
    ) {
        if stmt.data().has_modifier(ModifierFlags::AMBIENT) {
            return;
        }
        match stmt {
            Statement::Interface(_) | Statement::TypeAlias(_) | Statement::NamespaceExport(_) => {}
            Statement::Function(ref f) if f.body.is_none() => {}
            Statement::Module(decl) => self.lower_namespace(*decl, namespace, out, declared),
            Statement::Enum(decl) => self.lower_enum(*decl, namespace, out, declared),
            Statement::Import(decl) => {
                if let Some(stmt) = self.strip_import(decl) {
                    out.push(stmt);
                }
            }
            Statement::ImportEquals(decl) => self.lower_import_equals(decl, namespace, out),
            Statement::Export(decl) => {
                if let Some(stmt) = self.strip_export(decl) {
                    out.push(stmt);
                }
            }
            Statement::ExportAssignment(ref mut node) if node.is_export_equals => {
                self.ctx.unsupported(PASS, "an 'export =' assignment", node.data.range);
                self.visit_expression(&mut node.expression);
                out.push(stmt);
            }
            _ => {
                self.visit_statement(&mut stmt);
                match namespace {
                    Some(ns) if stmt.data().has_modifier(ModifierFlags::EXPORT) => {
                        stmt.data_mut().modifier_flags.remove(ModifierFlags::EXPORT_DEFAULT);
                        self.export_from_namespace(stmt, ns, out);
                    }
                    _ => out.push(stmt),
                }
            }
        }
    }

    /// Emit an exported namespace member: variables become property
    /// assignments, functions and classes are declared and then attached.
    fn export_from_namespace(&mut self, stmt: Statement, ns: &str, out: &mut Vec<Statement>) {
        match stmt {
            Statement::Variable(mut node) => {
                let mut assignments = Vec::new();
                let mut patterns = Vec::new();
                let mut attached = Vec::new();
                for decl in std::mem::take(&mut node.declaration_list.declarations) {
                    match &decl.name {
                        BindingName::Identifier(id) => {
                            if let Some(init) = decl.initializer {
                                assignments.push(factory::assign(factory::member(factory::ident(ns), &id.text), init));
                            }
                        }
                        pattern => {
                            let mut ids = Vec::new();
                            pattern.bound_identifiers(&mut ids);
                            attached.extend(ids.iter().map(|id| id.text.clone()));
                            patterns.push(decl);
                        }
                    }
                }
                if !patterns.is_empty() {
                    node.declaration_list.kind = VariableKind::Var;
                    node.declaration_list.declarations = patterns;
                    out.push(Statement::Variable(node));
                }
                if !assignments.is_empty() {
                    out.push(factory::expression_statement(factory::comma(assignments)));
                }
                for name in attached {
                    out.push(attach(ns, &name));
                }
            }
            Statement::Function(ref f) => {
                let name = f.name.as_ref().map(|n| n.text.clone());
                out.push(stmt);
                if let Some(name) = name {
                    out.push(attach(ns, &name));
                }
            }
            Statement::Class(ref c) => {
                let name = c.name.as_ref().map(|n| n.text.clone());
                out.push(stmt);
                if let Some(name) = name {
                    out.push(attach(ns, &name));
                }
            }
            other => out.push(other),
        }
    }

    // ========================================================================
    // Namespaces
    // ========================================================================

    fn lower_namespace(
        &mut self,
        mut decl: ModuleDeclaration,
        parent: Option<&str>,
        out: &mut Vec<Statement>,
        declared: &mut FxHashSet<String>,
    ) {
        let name = match &decl.name {
            ModuleName::Identifier(id) if !decl.data.flags.contains(NodeFlags::GLOBAL_AUGMENTATION) => id.text.clone(),
            _ => return,
        };
        if !namespace_has_values(&decl) {
            return;
        }
        let exported = decl.data.has_modifier(ModifierFlags::EXPORT);
        let body = match decl.body.take() {
            Some(ModuleBody::Block(block)) => block.statements,
            Some(ModuleBody::Namespace(mut inner)) => {
                inner.data.modifier_flags.insert(ModifierFlags::EXPORT);
                vec![Statement::Module(inner)]
            }
            None => return,
        };
        let param = if declares_name(&body, &name) {
            self.ctx.unique_name(&name)
        } else {
            name.clone()
        };
        self.record_namespace_members(&body, &param);
        let lowered = self.lower_list(body, Some(&param));

        if declared.insert(name.clone()) {
            let mut var = factory::declare(VariableKind::Var, &name, None);
            if exported && parent.is_none() {
                var.data_mut().modifier_flags.insert(ModifierFlags::EXPORT);
            }
            out.push(var);
        }
        let argument = iife_argument(&name, if exported { parent } else { None });
        out.push(factory::expression_statement(factory::iife(
            vec![factory::parameter(&param)],
            lowered,
            vec![argument],
        )));
    }

    fn record_namespace_members(&mut self, body: &[Statement], ns: &str) {
        let Some(scopes) = &self.scopes else {
            return;
        };
        for stmt in body {
            let Statement::Variable(node) = stmt else {
                continue;
            };
            if !node.data.has_modifier(ModifierFlags::EXPORT) || node.data.has_modifier(ModifierFlags::AMBIENT) {
                continue;
            }
            for decl in &node.declaration_list.declarations {
                if let BindingName::Identifier(id) = &decl.name {
                    if let Some(binding) = scopes.declaration(id.id) {
                        self.namespace_members.insert(binding, (ns.to_string(), id.text.clone()));
                    }
                }
            }
        }
    }

    fn namespace_member(&self, id: &Identifier) -> Option<Expression> {
        let binding = self.scopes.as_ref()?.resolve_reference(id.id)?;
        let (ns, name) = self.namespace_members.get(&binding)?;
        Some(factory::member(factory::ident(ns), name))
    }

    // ========================================================================
    // Enums
    // ========================================================================

    fn lower_enum(
        &mut self,
        mut decl: EnumDeclaration,
        parent: Option<&str>,
        out: &mut Vec<Statement>,
        declared: &mut FxHashSet<String>,
    ) {
        let name = decl.name.text.clone();
        let exported = decl.data.has_modifier(ModifierFlags::EXPORT);
        let mut values: FxHashMap<String, EnumValue> = FxHashMap::default();
        let mut next = Some(0.0);
        let mut body = Vec::with_capacity(decl.members.len());

        for member in &mut decl.members {
            let member_name = match &member.name {
                PropertyName::Computed(computed) => computed.expression.as_string_value().map(str::to_string),
                other => other.static_name(),
            };
            let Some(member_name) = member_name else {
                self.ctx.unsupported(PASS, "an enum member with a computed name", member.data.range);
                continue;
            };
            let target = factory::element(factory::ident(&name), factory::string(&member_name));

            let value = match &mut member.initializer {
                Some(init) => {
                    self.visit_expression(init);
                    match evaluate(init, &name, &values) {
                        Some(value) => value,
                        None => {
                            self.ctx.report_at(
                                member.data.range,
                                &messages::ENUM_MEMBER_INITIALIZER_0_IS_NOT_CONSTANT,
                                &[&member_name],
                            );
                            let mut init = take(init);
                            qualify_members(&mut init, &name, &values);
                            EnumValue::Computed(init)
                        }
                    }
                }
                None => match next {
                    Some(n) => EnumValue::Number(n),
                    None => {
                        self.ctx.unsupported(PASS, "an enum member without an initializer after a non-numeric member", member.data.range);
                        EnumValue::Computed(factory::void_zero())
                    }
                },
            };
            next = match &value {
                EnumValue::Number(n) => Some(n + 1.0),
                _ => None,
            };
            body.push(factory::expression_statement(match &value {
                EnumValue::Number(n) => reverse_mapped(&name, target, number_value(*n), &member_name),
                EnumValue::String(s) => factory::assign(target, factory::string(s)),
                EnumValue::Computed(expr) => reverse_mapped(&name, target, expr.clone(), &member_name),
            }));
            values.insert(member_name, value);
        }

        if declared.insert(name.clone()) {
            let mut var = factory::declare(VariableKind::Var, &name, None);
            if exported && parent.is_none() {
                var.data_mut().modifier_flags.insert(ModifierFlags::EXPORT);
            }
            out.push(var);
        }
        let argument = iife_argument(&name, if exported { parent } else { None });
        out.push(factory::expression_statement(factory::iife(
            vec![factory::parameter(&name)],
            body,
            vec![argument],
        )));
    }

    // ========================================================================
    // Imports and exports
    // ========================================================================

    /// Whether an import binding is still needed at runtime.
    fn keeps_import(&self, local: &Identifier) -> bool {
        if self.options.only_remove_type_imports {
            return true;
        }
        let Some(scopes) = &self.scopes else {
            return true;
        };
        let Some(binding) = scopes.declaration(local.id) else {
            return true;
        };
        let binding = scopes.binding(binding);
        binding.is_referenced_as_value()
            || binding.is_exported
            || (self.has_jsx && self.ctx.is_implicitly_referenced(&local.text))
    }

    fn strip_import(&mut self, mut decl: ImportDeclaration) -> Option<Statement> {
        let Some(clause) = &mut decl.import_clause else {
            return Some(Statement::Import(decl));
        };
        if clause.is_type_only {
            return None;
        }
        let had_bindings = clause.name.is_some()
            || match &clause.named_bindings {
                Some(NamedImportBindings::Named(specifiers)) => !specifiers.is_empty(),
                Some(NamedImportBindings::Namespace(_)) => true,
                None => false,
            };
        if clause.name.as_ref().is_some_and(|name| !self.keeps_import(name)) {
            clause.name = None;
        }
        match &mut clause.named_bindings {
            Some(NamedImportBindings::Namespace(name)) => {
                if !self.keeps_import(name) {
                    clause.named_bindings = None;
                }
            }
            Some(NamedImportBindings::Named(specifiers)) => {
                let before = specifiers.len();
                specifiers.retain(|s| !s.is_type_only && self.keeps_import(&s.name));
                if specifiers.is_empty() && before > 0 {
                    clause.named_bindings = None;
                }
            }
            None => {}
        }
        if had_bindings && clause.name.is_none() && clause.named_bindings.is_none() {
            if !self.options.only_remove_type_imports {
                return None;
            }
            decl.import_clause = None;
        }
        Some(Statement::Import(decl))
    }

    fn lower_import_equals(&mut self, decl: ImportEqualsDeclaration, namespace: Option<&str>, out: &mut Vec<Statement>) {
        if decl.is_type_only {
            return;
        }
        match &decl.module_reference {
            ModuleReference::External(_) => {
                self.ctx.unsupported(PASS, "an 'import = require()' declaration", decl.data.range);
                out.push(Statement::ImportEquals(decl));
            }
            ModuleReference::Entity(entity) => {
                let exported = decl.data.has_modifier(ModifierFlags::EXPORT);
                if !exported && !self.keeps_import(&decl.name) {
                    return;
                }
                let value = entity_to_expression(entity);
                match namespace {
                    Some(ns) if exported => out.push(factory::expression_statement(factory::assign(
                        factory::member(factory::ident(ns), &decl.name.text),
                        value,
                    ))),
                    _ => {
                        let mut var = factory::variable_statement(
                            VariableKind::Var,
                            vec![factory::variable_declaration(BindingName::Identifier(decl.name), Some(value))],
                        );
                        if exported {
                            var.data_mut().modifier_flags.insert(ModifierFlags::EXPORT);
                        }
                        out.push(var);
                    }
                }
            }
        }
    }

    /// Whether a local export specifier names something with a runtime value.
    fn exports_value(&self, specifier: &ExportSpecifier) -> bool {
        let local = specifier.property_name.as_ref().unwrap_or(&specifier.name);
        let (ModuleExportName::Identifier(id), Some(scopes)) = (local, &self.scopes) else {
            return true;
        };
        let Some(binding) = scopes.resolve_reference(id.id) else {
            return true;
        };
        let binding = scopes.binding(binding);
        binding.kind != BindingKind::Type && !binding.is_ambient && !binding.is_type_only_import
    }

    fn strip_export(&mut self, mut decl: ExportDeclaration) -> Option<Statement> {
        if decl.is_type_only {
            return None;
        }
        let is_reexport = decl.module_specifier.is_some();
        if let Some(ExportClause::Named(specifiers)) = &mut decl.export_clause {
            let before = specifiers.len();
            specifiers.retain(|s| !s.is_type_only && (is_reexport || self.exports_value(s)));
            if specifiers.is_empty() && before > 0 {
                return None;
            }
        }
        Some(Statement::Export(decl))
    }

    // ========================================================================
    // Classes
    // ========================================================================

    fn lower_parameter_properties(function: &mut Function, has_extends: bool) {
        let names: Vec<String> = function
            .parameters
            .iter()
            .filter(|p| p.is_parameter_property())
            .filter_map(|p| p.name.as_identifier().map(|id| id.text.clone()))
            .collect();
        if names.is_empty() {
            return;
        }
        let Some(body) = &mut function.body else {
            return;
        };
        let assignments: Vec<Statement> = names
            .iter()
            .map(|name| {
                factory::expression_statement(factory::assign(factory::member(factory::this(), name), factory::ident(name)))
            })
            .collect();
        let prologue = prologue_length(&body.statements);
        let at = if has_extends {
            body.statements.iter().position(is_super_call_statement).map_or(prologue, |i| i + 1)
        } else {
            prologue
        };
        body.statements.splice(at..at, assignments);
    }
}

fn attach(ns: &str, name: &str) -> Statement {
    factory::expression_statement(factory::assign(factory::member(factory::ident(ns), name), factory::ident(name)))
}

fn declares_name(body: &[Statement], name: &str) -> bool {
    body.iter().any(|stmt| match stmt {
        Statement::Variable(v) => v.declaration_list.declarations.iter().any(|d| {
            let mut ids = Vec::new();
            d.name.bound_identifiers(&mut ids);
            ids.iter().any(|id| id.text == name)
        }),
        Statement::Function(f) => f.name.as_ref().is_some_and(|n| n.text == name),
        Statement::Class(c) => c.name.as_ref().is_some_and(|n| n.text == name),
        Statement::Enum(e) => e.name.text == name,
        Statement::Module(m) => matches!(&m.name, ModuleName::Identifier(id) if id.text == name),
        _ => false,
    })
}

// ============================================================================
// Enum evaluation
// ============================================================================

#[derive(Debug, Clone)]
enum EnumValue {
    Number(f64),
    String(String),
    Computed(Expression),
}

/// `E[E["A"] = value] = "A"`
fn reverse_mapped(enum_name: &str, target: Expression, value: Expression, member: &str) -> Expression {
    factory::assign(
        factory::element(factory::ident(enum_name), factory::assign(target, value)),
        factory::string(member),
    )
}

/// Constant value of an enum initializer, given the members before it.
fn evaluate(expr: &Expression, enum_name: &str, values: &FxHashMap<String, EnumValue>) -> Option<EnumValue> {
    use EnumValue::*;
    let known = |name: &str| match values.get(name) {
        Some(Number(n)) => Some(Number(*n)),
        Some(String(s)) => Some(String(s.clone())),
        _ => None,
    };
    match expr {
        Expression::NumericLiteral(n) => Some(Number(n.value)),
        Expression::StringLiteral(s) => Some(String(s.value.clone())),
        Expression::Template(t) if t.expressions.is_empty() => expr.as_string_value().map(|s| String(s.to_string())),
        Expression::Parenthesized(p) => evaluate(&p.expression, enum_name, values),
        Expression::Identifier(id) => known(&id.text),
        Expression::PropertyAccess(access) if access.expression.is_identifier_named(enum_name) => known(&access.name.text),
        Expression::ElementAccess(access) if access.expression.is_identifier_named(enum_name) => {
            access.argument.as_string_value().and_then(known)
        }
        Expression::PrefixUnary(unary) => {
            let Some(Number(n)) = evaluate(&unary.operand, enum_name, values) else {
                return None;
            };
            match unary.operator {
                SyntaxKind::PlusToken => Some(Number(n)),
                SyntaxKind::MinusToken => Some(Number(-n)),
                SyntaxKind::TildeToken => Some(Number(!to_int32(n) as f64)),
                _ => None,
            }
        }
        Expression::Binary(binary) => {
            let left = evaluate(&binary.left, enum_name, values)?;
            let right = evaluate(&binary.right, enum_name, values)?;
            match (left, right) {
                (Number(a), Number(b)) => fold_numbers(a, binary.operator, b).map(Number),
                (String(a), String(b)) if binary.operator == SyntaxKind::PlusToken => Some(String(a + &b)),
                (String(a), Number(b)) if binary.operator == SyntaxKind::PlusToken => {
                    Some(String(a + &esforge_core::number_to_string(b)))
                }
                (Number(a), String(b)) if binary.operator == SyntaxKind::PlusToken => {
                    Some(String(esforge_core::number_to_string(a) + &b))
                }
                _ => None,
            }
        }
        _ => None,
    }
}

pub(crate) fn to_int32(n: f64) -> i32 {
    if !n.is_finite() {
        return 0;
    }
    (n.trunc() as i64 as u64 & 0xffff_ffff) as u32 as i32
}

/// Numeric binary operators as JavaScript evaluates them.
pub(crate) fn fold_numbers(a: f64, operator: SyntaxKind, b: f64) -> Option<f64> {
    let shift = (to_int32(b) as u32) & 31;
    let value = match operator {
        SyntaxKind::PlusToken => a + b,
        SyntaxKind::MinusToken => a - b,
        SyntaxKind::AsteriskToken => a * b,
        SyntaxKind::SlashToken => a / b,
        SyntaxKind::PercentToken => a % b,
        SyntaxKind::AsteriskAsteriskToken => a.powf(b),
        SyntaxKind::BarToken => (to_int32(a) | to_int32(b)) as f64,
        SyntaxKind::AmpersandToken => (to_int32(a) & to_int32(b)) as f64,
        SyntaxKind::CaretToken => (to_int32(a) ^ to_int32(b)) as f64,
        SyntaxKind::LessThanLessThanToken => to_int32(a).wrapping_shl(shift) as f64,
        SyntaxKind::GreaterThanGreaterThanToken => to_int32(a).wrapping_shr(shift) as f64,
        SyntaxKind::GreaterThanGreaterThanGreaterThanToken => (to_int32(a) as u32).wrapping_shr(shift) as f64,
        _ => return None,
    };
    Some(value)
}

/// Rewrite bare references to earlier members into `E.member`.
fn qualify_members(expr: &mut Expression, enum_name: &str, values: &FxHashMap<String, EnumValue>) {
    struct Qualifier<'a> {
        enum_name: &'a str,
        values: &'a FxHashMap<String, EnumValue>,
    }
    impl AstVisitorMut for Qualifier<'_> {
        fn visit_expression(&mut self, node: &mut Expression) {
            if let Expression::Identifier(id) = node {
                if self.values.contains_key(&id.text) {
                    *node = factory::member(factory::ident(self.enum_name), &id.text);
                    return;
                }
            }
            visitor_mut::walk_expression(self, node);
        }

        fn visit_function(&mut self, _node: &mut Function) {}

        fn visit_arrow_function(&mut self, _node: &mut ArrowFunction) {}
    }
    Qualifier { enum_name, values }.visit_expression(expr);
}

// ============================================================================
// Traversal
// ============================================================================

const ERASED_MODIFIERS: ModifierFlags = ModifierFlags::TYPE_SCRIPT_MODIFIER;

impl AstVisitorMut for Eraser<'_> {
    fn visit_statements(&mut self, nodes: &mut Vec<Statement>) {
        let statements = std::mem::take(nodes);
        *nodes = self.lower_list(statements, None);
    }

    fn visit_statement(&mut self, node: &mut Statement) {
        node.data_mut().modifier_flags.remove(ERASED_MODIFIERS);
        visitor_mut::walk_statement(self, node);
    }

    fn visit_variable_declaration(&mut self, node: &mut VariableDeclaration) {
        node.type_annotation = None;
        node.exclamation = false;
        visitor_mut::walk_variable_declaration(self, node);
    }

    fn visit_expression(&mut self, node: &mut Expression) {
        loop {
            let inner = match node {
                Expression::As(n) => take(&mut n.expression),
                Expression::Satisfies(n) => take(&mut n.expression),
                Expression::TypeAssertion(n) => take(&mut n.expression),
                Expression::NonNull(n) => take(&mut n.expression),
                _ => break,
            };
            *node = inner;
        }
        match node {
            Expression::Identifier(id) => {
                if let Some(replacement) = self.namespace_member(id) {
                    *node = replacement;
                    return;
                }
            }
            Expression::Call(n) => n.type_arguments = None,
            Expression::New(n) => n.type_arguments = None,
            Expression::TaggedTemplate(n) => n.type_arguments = None,
            _ => {}
        }
        visitor_mut::walk_expression(self, node);
    }

    fn visit_object_literal_element(&mut self, node: &mut ObjectLiteralElement) {
        match node {
            ObjectLiteralElement::Shorthand(shorthand) if shorthand.object_assignment_initializer.is_none() => {
                if let Some(value) = self.namespace_member(&shorthand.name) {
                    *node = ObjectLiteralElement::Property(PropertyAssignment {
                        data: shorthand.data.clone(),
                        name: PropertyName::Identifier(shorthand.name.clone()),
                        initializer: value,
                    });
                    return;
                }
            }
            ObjectLiteralElement::Method(method) => method.question = false,
            _ => {}
        }
        visitor_mut::walk_object_literal_element(self, node);
    }

    fn visit_function(&mut self, node: &mut Function) {
        node.data.modifier_flags.remove(ERASED_MODIFIERS);
        node.type_parameters = None;
        node.return_type = None;
        node.parameters.retain(|p| !p.is_this_parameter());
        visitor_mut::walk_function(self, node);
    }

    fn visit_arrow_function(&mut self, node: &mut ArrowFunction) {
        node.type_parameters = None;
        node.return_type = None;
        visitor_mut::walk_arrow_function(self, node);
    }

    fn visit_parameter(&mut self, node: &mut Parameter) {
        node.data.modifier_flags.remove(ERASED_MODIFIERS);
        node.type_annotation = None;
        node.question = false;
        visitor_mut::walk_parameter(self, node);
    }

    fn visit_class(&mut self, node: &mut Class) {
        node.data.modifier_flags.remove(ERASED_MODIFIERS);
        node.type_parameters = None;
        node.super_type_arguments = None;
        node.implements.clear();
        node.members.retain(|member| match member {
            ClassElement::IndexSignature(_) => false,
            ClassElement::Property(p) => !p.data.has_modifier(ModifierFlags::AMBIENT | ModifierFlags::ABSTRACT),
            ClassElement::Method(m) => m.function.body.is_some() && !m.data.has_modifier(ModifierFlags::ABSTRACT),
            ClassElement::Constructor(c) => c.function.body.is_some(),
            _ => true,
        });
        let has_extends = node.extends.is_some();
        for member in &mut node.members {
            match member {
                ClassElement::Property(p) => {
                    p.data.modifier_flags.remove(ERASED_MODIFIERS);
                    p.question = false;
                    p.exclamation = false;
                    p.type_annotation = None;
                }
                ClassElement::Method(m) => {
                    m.data.modifier_flags.remove(ERASED_MODIFIERS);
                    m.question = false;
                }
                ClassElement::Constructor(c) => {
                    c.data.modifier_flags.remove(ERASED_MODIFIERS);
                    Self::lower_parameter_properties(&mut c.function, has_extends);
                }
                _ => {}
            }
        }
        visitor_mut::walk_class(self, node);
    }

    fn visit_jsx_element(&mut self, node: &mut JsxElement) {
        node.opening.type_arguments = None;
        visitor_mut::walk_jsx_element(self, node);
    }

    fn visit_type_node(&mut self, _node: &mut TypeNode) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn number(n: f64) -> Expression {
        factory::number(n)
    }

    #[test]
    fn test_evaluate_arithmetic_and_members() {
        let mut values = FxHashMap::default();
        values.insert("A".to_string(), EnumValue::Number(4.0));
        let expr = factory::binary(factory::ident("A"), SyntaxKind::LessThanLessThanToken, number(2.0));
        assert!(matches!(evaluate(&expr, "E", &values), Some(EnumValue::Number(n)) if n == 16.0));
        let expr = factory::binary(factory::member(factory::ident("E"), "A"), SyntaxKind::BarToken, number(1.0));
        assert!(matches!(evaluate(&expr, "E", &values), Some(EnumValue::Number(n)) if n == 5.0));
        let expr = factory::call(factory::ident("f"), vec![]);
        assert!(evaluate(&expr, "E", &values).is_none());
    }

    #[test]
    fn test_evaluate_strings() {
        let values = FxHashMap::default();
        let expr = factory::binary(factory::string("a"), SyntaxKind::PlusToken, number(1.0));
        assert!(matches!(evaluate(&expr, "E", &values), Some(EnumValue::String(s)) if s == "a1"));
    }

    #[test]
    fn test_to_int32_wraps() {
        assert_eq!(to_int32(4294967297.0), 1);
        assert_eq!(to_int32(-1.0), -1);
        assert_eq!(to_int32(f64::NAN), 0);
        assert_eq!(fold_numbers(-8.0, SyntaxKind::GreaterThanGreaterThanGreaterThanToken, 28.0), Some(15.0));
    }
}
