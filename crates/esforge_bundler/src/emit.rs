//! Turning linked modules into one program.

use esforge_ast::factory;
use esforge_ast::visitor_mut::{self, AstVisitorMut};
use esforge_ast::*;
use esforge_binder::{BindingId, ScopeTree};
use esforge_module::literal_specifier;
use esforge_options::EsTarget;
use rustc_hash::FxHashMap;

use crate::linker::{Linked, LinkedModule, NamespaceObject};

/// Applies canonical names to one module and rewrites its literal
/// `import()` calls of bundled modules.
struct Renamer<'a> {
    scopes: &'a ScopeTree,
    renames: &'a FxHashMap<BindingId, String>,
    dynamic_imports: &'a FxHashMap<String, String>,
}

impl Renamer<'_> {
    fn renamed(&self, node: &Identifier) -> Option<&String> {
        let binding = self.scopes.binding_of(node.id)?;
        self.renames.get(&binding)
    }

    fn rename(&self, node: &mut Identifier) {
        if let Some(name) = self.renamed(node) {
            node.text = name.clone();
        }
    }
}

impl AstVisitorMut for Renamer<'_> {
    fn visit_binding_identifier(&mut self, node: &mut Identifier) {
        self.rename(node);
    }

    fn visit_identifier_reference(&mut self, node: &mut Identifier) {
        self.rename(node);
    }

    fn visit_object_literal_element(&mut self, node: &mut ObjectLiteralElement) {
        // `{ a }` keeps its key when `a` is renamed: `{ a: a$m }`.
        if let ObjectLiteralElement::Shorthand(shorthand) = node {
            if let Some(name) = self.renamed(&shorthand.name).cloned() {
                let mut value = factory::ident(&name);
                if let Some(initializer) = shorthand.object_assignment_initializer.take() {
                    let mut initializer = *initializer;
                    self.visit_expression(&mut initializer);
                    value = factory::assign(value, initializer);
                }
                *node = ObjectLiteralElement::Property(PropertyAssignment {
                    data: shorthand.data.clone(),
                    name: PropertyName::Identifier(shorthand.name.clone()),
                    initializer: value,
                });
                return;
            }
        }
        visitor_mut::walk_object_literal_element(self, node);
    }

    fn visit_binding_name(&mut self, node: &mut BindingName) {
        // `const { a } = o` likewise becomes `const { a: a$m } = o`.
        if let BindingName::Object(pattern) = node {
            for element in &mut pattern.elements {
                if element.dot_dot_dot || element.property_name.is_some() {
                    continue;
                }
                if let BindingName::Identifier(name) = &element.name {
                    if self.renamed(name).is_some() {
                        element.property_name = Some(PropertyName::Identifier(factory::identifier(&name.text)));
                    }
                }
            }
        }
        visitor_mut::walk_binding_name(self, node);
    }

    fn visit_expression(&mut self, node: &mut Expression) {
        if let Expression::Call(call) = node {
            if matches!(*call.expression, Expression::Import(_)) {
                let namespace = call
                    .arguments
                    .first()
                    .and_then(literal_specifier)
                    .and_then(|specifier| self.dynamic_imports.get(specifier));
                if let Some(namespace) = namespace {
                    *node = resolved_namespace(namespace);
                    return;
                }
            }
        }
        visitor_mut::walk_expression(self, node);
    }
}

/// `Promise.resolve().then(function () { return ns; })`
fn resolved_namespace(namespace: &str) -> Expression {
    let resolved = factory::call(factory::member(factory::ident("Promise"), "resolve"), Vec::new());
    let callback = factory::function_expression(Vec::new(), vec![factory::return_statement(Some(factory::ident(namespace)))]);
    factory::call(factory::member(resolved, "then"), vec![callback])
}

fn namespace_statement(namespace: &NamespaceObject) -> Statement {
    let mut properties = Vec::with_capacity(namespace.members.len() + 1);
    properties.push(factory::property("__proto__", factory::null()));
    for (exported, local) in &namespace.members {
        properties.push(factory::getter(exported, factory::ident(local)));
    }
    let frozen = factory::call(
        factory::member(factory::ident("Object"), "freeze"),
        vec![factory::object(properties)],
    );
    factory::declare(VariableKind::Var, &namespace.name, Some(frozen))
}

fn strip_export(data: &mut NodeData) {
    data.modifier_flags.remove(ModifierFlags::EXPORT_DEFAULT);
}

/// Drop module syntax from one module's top level. Declarations lose
/// `export`; `export default <expression>` becomes a declaration of the
/// module's default name.
fn strip_module_syntax(statements: Vec<Statement>, default_name: Option<&str>, kind: VariableKind) -> Vec<Statement> {
    let mut out = Vec::with_capacity(statements.len());
    for statement in statements {
        match statement {
            Statement::Import(_) | Statement::Export(_) => {}
            Statement::ExportAssignment(assignment) if !assignment.is_export_equals => match default_name {
                Some(name) => out.push(factory::declare(kind, name, Some(assignment.expression))),
                None => out.push(factory::expression_statement(assignment.expression)),
            },
            Statement::Function(mut function) => {
                strip_export(&mut function.data);
                if function.name.is_none() {
                    function.name = default_name.map(factory::identifier);
                }
                out.push(Statement::Function(function));
            }
            Statement::Class(mut class) => {
                strip_export(&mut class.data);
                if class.name.is_none() {
                    class.name = default_name.map(factory::identifier);
                }
                out.push(Statement::Class(class));
            }
            mut other => {
                strip_export(other.data_mut());
                out.push(other);
            }
        }
    }
    out
}

fn emit_module(module: LinkedModule, kind: VariableKind, out: &mut Vec<Statement>) {
    let LinkedModule {
        mut program,
        scopes,
        renames,
        default_name,
        namespace,
        dynamic_imports,
        ..
    } = module;
    let mut renamer = Renamer {
        scopes: &scopes,
        renames: &renames,
        dynamic_imports: &dynamic_imports,
    };
    renamer.visit_program(&mut program);
    out.extend(strip_module_syntax(program.statements, default_name.as_deref(), kind));
    if let Some(namespace) = &namespace {
        out.push(namespace_statement(namespace));
    }
}

/// Build the bundle program: hoisted external imports, every module in
/// emission order, then the entry's exports.
pub(crate) fn emit(linked: Linked, target: EsTarget, file_name: &str) -> Program {
    let kind = if target.supports(EsTarget::Es2015) {
        VariableKind::Const
    } else {
        VariableKind::Var
    };
    let Linked {
        modules,
        externals,
        entry_exports,
        entry_star_exports,
        ..
    } = linked;

    let mut statements = Vec::new();
    for (specifier, bindings) in &externals {
        let mut default = None;
        let mut named = Vec::new();
        let mut namespaces = Vec::new();
        for binding in bindings {
            match binding.imported.as_deref() {
                None => namespaces.push(binding.local.as_str()),
                Some("default") => default = Some(binding.local.as_str()),
                Some(imported) => named.push((imported.to_string(), binding.local.clone())),
            }
        }
        if default.is_some() || !named.is_empty() || namespaces.is_empty() {
            statements.push(factory::import_named(specifier, default, named));
        }
        for local in namespaces {
            statements.push(factory::import_namespace(specifier, local));
        }
    }

    for module in modules {
        tracing::trace!(module = %module.id, "emitting module");
        emit_module(module, kind, &mut statements);
    }

    if !entry_exports.is_empty() {
        statements.push(factory::export_named(entry_exports));
    }
    for specifier in &entry_star_exports {
        statements.push(factory::export_star(specifier));
    }

    Program {
        data: NodeData::new(SyntaxKind::Program, 0, 0),
        source_type: SourceType::Module,
        statements,
        shebang: None,
        comments: Vec::new(),
        file_name: file_name.to_string(),
    }
}
