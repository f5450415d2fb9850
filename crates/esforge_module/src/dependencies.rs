//! Dependency extraction.
//!
//! Walks a parsed program in source order and reports every module
//! specifier it can see without evaluating anything: import and re-export
//! declarations, `import(...)` calls, `require(...)` calls and
//! `import x = require(...)`.

use esforge_ast::visitor::{self, AstVisitor};
use esforge_ast::*;
use esforge_core::text::{TextRange, TextSpan};
use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// How a specifier is referenced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DependencyKind {
    /// `import ... from "x"` or `import "x"`.
    StaticImport,
    /// `import("x")` with a literal argument.
    DynamicImport,
    /// `import(expr)` whose argument is not a literal.
    DynamicUnresolved,
    /// `export ... from "x"`.
    ReExport,
    /// `require("x")` or `import x = require("x")`.
    BareReference,
}

impl DependencyKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DependencyKind::StaticImport => "static-import",
            DependencyKind::DynamicImport => "dynamic-import",
            DependencyKind::DynamicUnresolved => "dynamic-unresolved",
            DependencyKind::ReExport => "re-export",
            DependencyKind::BareReference => "bare-reference",
        }
    }

    /// Whether the bundler has to load the target before emitting.
    pub fn is_static(self) -> bool {
        matches!(self, DependencyKind::StaticImport | DependencyKind::ReExport)
    }
}

/// One specifier occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dependency {
    /// Specifier text; empty for [`DependencyKind::DynamicUnresolved`].
    pub text: String,
    pub kind: DependencyKind,
    /// Span of the specifier literal, or of the whole argument when unresolved.
    pub span: TextSpan,
    #[serde(default)]
    pub is_type_only: bool,
    /// Import attributes (`with { type: "json" }`) in source order.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub attributes: IndexMap<String, String>,
}

/// List every dependency of `program` in source order.
///
/// Literal dynamic imports of the same specifier are reported once.
pub fn extract_dependencies(program: &Program) -> Vec<Dependency> {
    let mut extractor = Extractor::default();
    extractor.visit_program(program);
    tracing::trace!(file = %program.file_name, count = extractor.dependencies.len(), "extracted dependencies");
    extractor.dependencies
}

#[derive(Default)]
struct Extractor {
    dependencies: Vec<Dependency>,
    dynamic_seen: FxHashSet<String>,
}

fn attribute_map(attributes: &Option<ImportAttributes>) -> IndexMap<String, String> {
    attributes
        .iter()
        .flat_map(|attrs| attrs.elements.iter())
        .map(|attr| (attr.name.text().to_string(), attr.value.value.clone()))
        .collect()
}

/// A string literal or a template without substitutions.
pub fn literal_specifier(expression: &Expression) -> Option<&str> {
    match expression.skip_outer_expressions() {
        Expression::StringLiteral(literal) => Some(&literal.value),
        Expression::Template(template) if template.expressions.is_empty() => {
            template.quasis.first().and_then(|q| q.cooked.as_deref())
        }
        _ => None,
    }
}

fn is_import_type_only(clause: &ImportClause) -> bool {
    if clause.is_type_only {
        return true;
    }
    match &clause.named_bindings {
        Some(NamedImportBindings::Named(specifiers)) => {
            clause.name.is_none() && !specifiers.is_empty() && specifiers.iter().all(|s| s.is_type_only)
        }
        _ => false,
    }
}

fn is_export_type_only(node: &ExportDeclaration) -> bool {
    if node.is_type_only {
        return true;
    }
    match &node.export_clause {
        Some(ExportClause::Named(specifiers)) => !specifiers.is_empty() && specifiers.iter().all(|s| s.is_type_only),
        _ => false,
    }
}

impl Extractor {
    fn push(&mut self, text: &str, kind: DependencyKind, range: TextRange) -> &mut Dependency {
        self.dependencies.push(Dependency {
            text: text.to_string(),
            kind,
            span: range.to_span(),
            is_type_only: false,
            attributes: IndexMap::new(),
        });
        let last = self.dependencies.len() - 1;
        &mut self.dependencies[last]
    }

    fn dynamic_import(&mut self, call: &CallExpression) {
        let Some(argument) = call.arguments.first() else {
            self.push("", DependencyKind::DynamicUnresolved, call.data.range);
            return;
        };
        match literal_specifier(argument) {
            Some(text) => {
                if self.dynamic_seen.insert(text.to_string()) {
                    let range = argument.range();
                    self.push(text, DependencyKind::DynamicImport, range);
                }
            }
            None => {
                self.push("", DependencyKind::DynamicUnresolved, argument.range());
            }
        }
    }

    fn require_call(&mut self, call: &CallExpression) -> bool {
        if !call.expression.is_identifier_named("require") || call.arguments.len() != 1 {
            return false;
        }
        let Some(text) = literal_specifier(&call.arguments[0]) else {
            return false;
        };
        let range = call.arguments[0].range();
        self.push(text, DependencyKind::BareReference, range);
        true
    }
}

impl AstVisitor for Extractor {
    fn visit_statement(&mut self, node: &Statement) {
        if let Statement::ImportEquals(import) = node {
            if let ModuleReference::External(literal) = &import.module_reference {
                let is_type_only = import.is_type_only;
                self.push(&literal.value, DependencyKind::BareReference, literal.data.range).is_type_only = is_type_only;
            }
        }
        visitor::walk_statement(self, node);
    }

    fn visit_import_declaration(&mut self, node: &ImportDeclaration) {
        let specifier = &node.module_specifier;
        let is_type_only = node.import_clause.as_ref().is_some_and(is_import_type_only);
        let attributes = attribute_map(&node.attributes);
        let dependency = self.push(&specifier.value, DependencyKind::StaticImport, specifier.data.range);
        dependency.is_type_only = is_type_only;
        dependency.attributes = attributes;
    }

    fn visit_export_declaration(&mut self, node: &ExportDeclaration) {
        if let Some(specifier) = &node.module_specifier {
            let is_type_only = is_export_type_only(node);
            let attributes = attribute_map(&node.attributes);
            let dependency = self.push(&specifier.value, DependencyKind::ReExport, specifier.data.range);
            dependency.is_type_only = is_type_only;
            dependency.attributes = attributes;
        }
    }

    fn visit_expression(&mut self, node: &Expression) {
        if let Expression::Call(call) = node {
            if matches!(*call.expression, Expression::Import(_)) {
                self.dynamic_import(call);
                // A computed specifier or the options object can still hold dependencies.
                for (index, argument) in call.arguments.iter().enumerate() {
                    if index > 0 || literal_specifier(argument).is_none() {
                        self.visit_expression(argument);
                    }
                }
                return;
            }
            if self.require_call(call) {
                return;
            }
        }
        visitor::walk_expression(self, node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names_match_serialization() {
        for kind in [
            DependencyKind::StaticImport,
            DependencyKind::DynamicImport,
            DependencyKind::DynamicUnresolved,
            DependencyKind::ReExport,
            DependencyKind::BareReference,
        ] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }

    #[test]
    fn test_literal_specifier_accepts_plain_templates() {
        let literal = factory::string("./a");
        assert_eq!(literal_specifier(&literal), Some("./a"));
        assert_eq!(literal_specifier(&factory::ident("a")), None);
    }
}
