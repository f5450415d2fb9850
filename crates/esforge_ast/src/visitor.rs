//! Read-only AST traversal.
//!
//! Implement [`AstVisitor`] and override the hooks you need; the binder,
//! the dependency extractor and several transform analyses are built on it.

use crate::node::*;

/// Override the `visit_*` methods of interest; the defaults walk into
/// children through the matching `walk_*` function so an override can
/// still descend by calling it.
pub trait AstVisitor: Sized {
    fn visit_program(&mut self, node: &Program) {
        walk_program(self, node)
    }

    fn visit_statements(&mut self, nodes: &Vec<Statement>) {
        for stmt in nodes {
            self.visit_statement(stmt);
        }
    }

    fn visit_statement(&mut self, node: &Statement) {
        walk_statement(self, node)
    }

    fn visit_block(&mut self, node: &Block) {
        self.visit_statements(&node.statements)
    }

    fn visit_variable_declaration(&mut self, node: &VariableDeclaration) {
        walk_variable_declaration(self, node)
    }

    fn visit_expression(&mut self, node: &Expression) {
        walk_expression(self, node)
    }

    fn visit_function(&mut self, node: &Function) {
        walk_function(self, node)
    }

    fn visit_arrow_function(&mut self, node: &ArrowFunction) {
        walk_arrow_function(self, node)
    }

    fn visit_class(&mut self, node: &Class) {
        walk_class(self, node)
    }

    fn visit_class_element(&mut self, node: &ClassElement) {
        walk_class_element(self, node)
    }

    fn visit_object_literal_element(&mut self, node: &ObjectLiteralElement) {
        walk_object_literal_element(self, node)
    }

    fn visit_parameter(&mut self, node: &Parameter) {
        walk_parameter(self, node)
    }

    fn visit_binding_name(&mut self, node: &BindingName) {
        walk_binding_name(self, node)
    }

    fn visit_property_name(&mut self, node: &PropertyName) {
        if let PropertyName::Computed(computed) = node {
            self.visit_expression(&computed.expression);
        }
    }

    fn visit_decorator(&mut self, node: &Decorator) {
        self.visit_expression(&node.expression)
    }

    /// An identifier that introduces a value binding.
    fn visit_binding_identifier(&mut self, _node: &Identifier) {}

    /// An identifier read or written as a value.
    fn visit_identifier_reference(&mut self, _node: &Identifier) {}

    fn visit_import_declaration(&mut self, node: &ImportDeclaration) {
        walk_import_declaration(self, node)
    }

    fn visit_export_declaration(&mut self, _node: &ExportDeclaration) {}

    fn visit_type_node(&mut self, node: &TypeNode) {
        walk_type_node(self, node)
    }

    /// Name of a type reference (`Foo<T>`) or type query (`typeof foo`).
    fn visit_type_reference_name(&mut self, _node: &EntityName) {}

    fn visit_type_parameter(&mut self, node: &TypeParameter) {
        if let Some(constraint) = &node.constraint {
            self.visit_type_node(constraint);
        }
        if let Some(default) = &node.default {
            self.visit_type_node(default);
        }
    }

    fn visit_jsx_element(&mut self, node: &JsxElement) {
        walk_jsx_element(self, node)
    }

    fn visit_jsx_fragment(&mut self, node: &JsxFragment) {
        for child in &node.children {
            self.visit_jsx_child(child);
        }
    }

    fn visit_jsx_child(&mut self, node: &JsxChild) {
        walk_jsx_child(self, node)
    }

    fn visit_jsx_tag_name(&mut self, node: &JsxTagName) {
        walk_jsx_tag_name(self, node)
    }
}

pub fn walk_program<V: AstVisitor>(v: &mut V, node: &Program) {
    v.visit_statements(&node.statements);
}

pub fn walk_statement<V: AstVisitor>(v: &mut V, node: &Statement) {
    match node {
        Statement::Block(n) => v.visit_block(n),
        Statement::Empty(_) | Statement::Debugger(_) | Statement::Missing(_) => {}
        Statement::Variable(n) => {
            for decl in &n.declaration_list.declarations {
                v.visit_variable_declaration(decl);
            }
        }
        Statement::Expression(n) => v.visit_expression(&n.expression),
        Statement::If(n) => {
            v.visit_expression(&n.condition);
            v.visit_statement(&n.then_statement);
            if let Some(else_statement) = &n.else_statement {
                v.visit_statement(else_statement);
            }
        }
        Statement::Do(n) => {
            v.visit_statement(&n.statement);
            v.visit_expression(&n.condition);
        }
        Statement::While(n) => {
            v.visit_expression(&n.condition);
            v.visit_statement(&n.statement);
        }
        Statement::For(n) => {
            if let Some(init) = &n.initializer {
                walk_for_initializer(v, init);
            }
            if let Some(cond) = &n.condition {
                v.visit_expression(cond);
            }
            if let Some(inc) = &n.incrementor {
                v.visit_expression(inc);
            }
            v.visit_statement(&n.statement);
        }
        Statement::ForIn(n) => {
            walk_for_initializer(v, &n.initializer);
            v.visit_expression(&n.expression);
            v.visit_statement(&n.statement);
        }
        Statement::ForOf(n) => {
            walk_for_initializer(v, &n.initializer);
            v.visit_expression(&n.expression);
            v.visit_statement(&n.statement);
        }
        Statement::Continue(_) | Statement::Break(_) => {}
        Statement::Return(n) => {
            if let Some(expr) = &n.expression {
                v.visit_expression(expr);
            }
        }
        Statement::With(n) => {
            v.visit_expression(&n.expression);
            v.visit_statement(&n.statement);
        }
        Statement::Switch(n) => {
            v.visit_expression(&n.expression);
            for clause in &n.clauses {
                if let Some(test) = &clause.expression {
                    v.visit_expression(test);
                }
                v.visit_statements(&clause.statements);
            }
        }
        Statement::Labeled(n) => v.visit_statement(&n.statement),
        Statement::Throw(n) => v.visit_expression(&n.expression),
        Statement::Try(n) => {
            v.visit_block(&n.try_block);
            if let Some(catch) = &n.catch_clause {
                if let Some(decl) = &catch.variable_declaration {
                    v.visit_variable_declaration(decl);
                }
                v.visit_block(&catch.block);
            }
            if let Some(finally) = &n.finally_block {
                v.visit_block(finally);
            }
        }
        Statement::Function(n) => v.visit_function(n),
        Statement::Class(n) => v.visit_class(n),
        Statement::Interface(n) => {
            if let Some(params) = &n.type_parameters {
                for param in params {
                    v.visit_type_parameter(param);
                }
            }
            for member in &n.members {
                walk_type_element(v, member);
            }
        }
        Statement::TypeAlias(n) => {
            if let Some(params) = &n.type_parameters {
                for param in params {
                    v.visit_type_parameter(param);
                }
            }
            v.visit_type_node(&n.type_node);
        }
        Statement::Enum(n) => {
            v.visit_binding_identifier(&n.name);
            for member in &n.members {
                if let Some(init) = &member.initializer {
                    v.visit_expression(init);
                }
            }
        }
        Statement::Module(n) => walk_module_declaration(v, n),
        Statement::Import(n) => v.visit_import_declaration(n),
        Statement::ImportEquals(n) => v.visit_binding_identifier(&n.name),
        Statement::Export(n) => v.visit_export_declaration(n),
        Statement::ExportAssignment(n) => v.visit_expression(&n.expression),
        Statement::NamespaceExport(_) => {}
    }
}

pub fn walk_module_declaration<V: AstVisitor>(v: &mut V, node: &ModuleDeclaration) {
    if let ModuleName::Identifier(name) = &node.name {
        v.visit_binding_identifier(name);
    }
    match &node.body {
        Some(ModuleBody::Block(block)) => v.visit_statements(&block.statements),
        Some(ModuleBody::Namespace(inner)) => walk_module_declaration(v, inner),
        None => {}
    }
}

pub fn walk_for_initializer<V: AstVisitor>(v: &mut V, node: &ForInitializer) {
    match node {
        ForInitializer::Variable(list) => {
            for decl in &list.declarations {
                v.visit_variable_declaration(decl);
            }
        }
        ForInitializer::Expression(expr) => v.visit_expression(expr),
    }
}

pub fn walk_variable_declaration<V: AstVisitor>(v: &mut V, node: &VariableDeclaration) {
    v.visit_binding_name(&node.name);
    if let Some(ty) = &node.type_annotation {
        v.visit_type_node(ty);
    }
    if let Some(init) = &node.initializer {
        v.visit_expression(init);
    }
}

pub fn walk_import_declaration<V: AstVisitor>(v: &mut V, node: &ImportDeclaration) {
    if let Some(clause) = &node.import_clause {
        if let Some(name) = &clause.name {
            v.visit_binding_identifier(name);
        }
        match &clause.named_bindings {
            Some(NamedImportBindings::Namespace(name)) => v.visit_binding_identifier(name),
            Some(NamedImportBindings::Named(specifiers)) => {
                for specifier in specifiers {
                    v.visit_binding_identifier(&specifier.name);
                }
            }
            None => {}
        }
    }
}

pub fn walk_expression<V: AstVisitor>(v: &mut V, node: &Expression) {
    match node {
        Expression::Identifier(id) => v.visit_identifier_reference(id),
        Expression::PrivateIdentifier(_)
        | Expression::This(_)
        | Expression::Super(_)
        | Expression::Null(_)
        | Expression::Boolean(_)
        | Expression::StringLiteral(_)
        | Expression::NumericLiteral(_)
        | Expression::BigIntLiteral(_)
        | Expression::RegularExpressionLiteral(_)
        | Expression::Import(_)
        | Expression::MetaProperty(_)
        | Expression::Omitted(_)
        | Expression::Missing(_) => {}
        Expression::Template(n) => {
            for expr in &n.expressions {
                v.visit_expression(expr);
            }
        }
        Expression::TaggedTemplate(n) => {
            v.visit_expression(&n.tag);
            for expr in &n.template.expressions {
                v.visit_expression(expr);
            }
        }
        Expression::ArrayLiteral(n) => {
            for element in &n.elements {
                v.visit_expression(element);
            }
        }
        Expression::ObjectLiteral(n) => {
            for property in &n.properties {
                v.visit_object_literal_element(property);
            }
        }
        Expression::Function(n) => v.visit_function(n),
        Expression::Arrow(n) => v.visit_arrow_function(n),
        Expression::Class(n) => v.visit_class(n),
        Expression::PropertyAccess(n) => v.visit_expression(&n.expression),
        Expression::ElementAccess(n) => {
            v.visit_expression(&n.expression);
            v.visit_expression(&n.argument);
        }
        Expression::Call(n) => {
            v.visit_expression(&n.expression);
            for arg in &n.arguments {
                v.visit_expression(arg);
            }
        }
        Expression::New(n) => {
            v.visit_expression(&n.expression);
            if let Some(args) = &n.arguments {
                for arg in args {
                    v.visit_expression(arg);
                }
            }
        }
        Expression::Parenthesized(n) => v.visit_expression(&n.expression),
        Expression::PrefixUnary(n) => v.visit_expression(&n.operand),
        Expression::PostfixUnary(n) => v.visit_expression(&n.operand),
        Expression::Await(n) => v.visit_expression(&n.expression),
        Expression::Yield(n) => {
            if let Some(expr) = &n.expression {
                v.visit_expression(expr);
            }
        }
        Expression::Binary(n) => {
            v.visit_expression(&n.left);
            v.visit_expression(&n.right);
        }
        Expression::Conditional(n) => {
            v.visit_expression(&n.condition);
            v.visit_expression(&n.when_true);
            v.visit_expression(&n.when_false);
        }
        Expression::Spread(n) => v.visit_expression(&n.expression),
        Expression::As(n) => {
            v.visit_expression(&n.expression);
            v.visit_type_node(&n.type_node);
        }
        Expression::Satisfies(n) => {
            v.visit_expression(&n.expression);
            v.visit_type_node(&n.type_node);
        }
        Expression::TypeAssertion(n) => {
            v.visit_type_node(&n.type_node);
            v.visit_expression(&n.expression);
        }
        Expression::NonNull(n) => v.visit_expression(&n.expression),
        Expression::JsxElement(n) => v.visit_jsx_element(n),
        Expression::JsxFragment(n) => v.visit_jsx_fragment(n),
    }
}

pub fn walk_object_literal_element<V: AstVisitor>(v: &mut V, node: &ObjectLiteralElement) {
    match node {
        ObjectLiteralElement::Property(n) => {
            v.visit_property_name(&n.name);
            v.visit_expression(&n.initializer);
        }
        ObjectLiteralElement::Shorthand(n) => {
            v.visit_identifier_reference(&n.name);
            if let Some(init) = &n.object_assignment_initializer {
                v.visit_expression(init);
            }
        }
        ObjectLiteralElement::Spread(n) => v.visit_expression(&n.expression),
        ObjectLiteralElement::Method(n) => {
            v.visit_property_name(&n.name);
            v.visit_function(&n.function);
        }
    }
}

pub fn walk_function<V: AstVisitor>(v: &mut V, node: &Function) {
    if let Some(name) = &node.name {
        v.visit_binding_identifier(name);
    }
    if let Some(params) = &node.type_parameters {
        for param in params {
            v.visit_type_parameter(param);
        }
    }
    for param in &node.parameters {
        v.visit_parameter(param);
    }
    if let Some(ret) = &node.return_type {
        v.visit_type_node(ret);
    }
    if let Some(body) = &node.body {
        v.visit_block(body);
    }
}

pub fn walk_arrow_function<V: AstVisitor>(v: &mut V, node: &ArrowFunction) {
    if let Some(params) = &node.type_parameters {
        for param in params {
            v.visit_type_parameter(param);
        }
    }
    for param in &node.parameters {
        v.visit_parameter(param);
    }
    if let Some(ret) = &node.return_type {
        v.visit_type_node(ret);
    }
    match &node.body {
        ArrowBody::Block(block) => v.visit_block(block),
        ArrowBody::Expression(expr) => v.visit_expression(expr),
    }
}

pub fn walk_parameter<V: AstVisitor>(v: &mut V, node: &Parameter) {
    for decorator in &node.decorators {
        v.visit_decorator(decorator);
    }
    v.visit_binding_name(&node.name);
    if let Some(ty) = &node.type_annotation {
        v.visit_type_node(ty);
    }
    if let Some(init) = &node.initializer {
        v.visit_expression(init);
    }
}

pub fn walk_binding_name<V: AstVisitor>(v: &mut V, node: &BindingName) {
    match node {
        BindingName::Identifier(id) => v.visit_binding_identifier(id),
        BindingName::Object(pattern) => {
            for element in &pattern.elements {
                walk_binding_element(v, element);
            }
        }
        BindingName::Array(pattern) => {
            for element in &pattern.elements {
                if let Some(element) = element {
                    walk_binding_element(v, element);
                }
            }
        }
    }
}

pub fn walk_binding_element<V: AstVisitor>(v: &mut V, node: &BindingElement) {
    if let Some(name) = &node.property_name {
        v.visit_property_name(name);
    }
    v.visit_binding_name(&node.name);
    if let Some(init) = &node.initializer {
        v.visit_expression(init);
    }
}

pub fn walk_class<V: AstVisitor>(v: &mut V, node: &Class) {
    for decorator in &node.decorators {
        v.visit_decorator(decorator);
    }
    if let Some(name) = &node.name {
        v.visit_binding_identifier(name);
    }
    if let Some(params) = &node.type_parameters {
        for param in params {
            v.visit_type_parameter(param);
        }
    }
    if let Some(extends) = &node.extends {
        v.visit_expression(extends);
    }
    for member in &node.members {
        v.visit_class_element(member);
    }
}

pub fn walk_class_element<V: AstVisitor>(v: &mut V, node: &ClassElement) {
    match node {
        ClassElement::Property(n) => {
            for decorator in &n.decorators {
                v.visit_decorator(decorator);
            }
            v.visit_property_name(&n.name);
            if let Some(ty) = &n.type_annotation {
                v.visit_type_node(ty);
            }
            if let Some(init) = &n.initializer {
                v.visit_expression(init);
            }
        }
        ClassElement::Method(n) => {
            for decorator in &n.decorators {
                v.visit_decorator(decorator);
            }
            v.visit_property_name(&n.name);
            v.visit_function(&n.function);
        }
        ClassElement::Constructor(n) => v.visit_function(&n.function),
        ClassElement::IndexSignature(n) => {
            for param in &n.parameters {
                v.visit_parameter(param);
            }
            if let Some(ty) = &n.type_annotation {
                v.visit_type_node(ty);
            }
        }
        ClassElement::StaticBlock(n) => v.visit_block(&n.body),
        ClassElement::Semicolon(_) => {}
    }
}

pub fn walk_type_node<V: AstVisitor>(v: &mut V, node: &TypeNode) {
    match node {
        TypeNode::Keyword(_) | TypeNode::This(_) | TypeNode::Missing(_) => {}
        TypeNode::Reference(n) => {
            v.visit_type_reference_name(&n.type_name);
            if let Some(args) = &n.type_arguments {
                for arg in args {
                    v.visit_type_node(arg);
                }
            }
        }
        TypeNode::Function(n) => {
            if let Some(params) = &n.type_parameters {
                for param in params {
                    v.visit_type_parameter(param);
                }
            }
            for param in &n.parameters {
                v.visit_parameter(param);
            }
            v.visit_type_node(&n.return_type);
        }
        TypeNode::Query(n) => {
            v.visit_type_reference_name(&n.expr_name);
            if let Some(args) = &n.type_arguments {
                for arg in args {
                    v.visit_type_node(arg);
                }
            }
        }
        TypeNode::Literal(n) => {
            for member in &n.members {
                walk_type_element(v, member);
            }
        }
        TypeNode::Array(n) => v.visit_type_node(&n.element_type),
        TypeNode::Tuple(n) => {
            for element in &n.elements {
                v.visit_type_node(element);
            }
        }
        TypeNode::NamedTupleMember(n) => v.visit_type_node(&n.type_node),
        TypeNode::Optional(n) | TypeNode::Rest(n) | TypeNode::Parenthesized(n) => {
            v.visit_type_node(&n.type_node)
        }
        TypeNode::Union(n) | TypeNode::Intersection(n) => {
            for ty in &n.types {
                v.visit_type_node(ty);
            }
        }
        TypeNode::Conditional(n) => {
            v.visit_type_node(&n.check_type);
            v.visit_type_node(&n.extends_type);
            v.visit_type_node(&n.true_type);
            v.visit_type_node(&n.false_type);
        }
        TypeNode::Infer(n) => v.visit_type_parameter(&n.type_parameter),
        TypeNode::Operator(n) => v.visit_type_node(&n.type_node),
        TypeNode::IndexedAccess(n) => {
            v.visit_type_node(&n.object_type);
            v.visit_type_node(&n.index_type);
        }
        TypeNode::Mapped(n) => {
            v.visit_type_parameter(&n.type_parameter);
            if let Some(name_type) = &n.name_type {
                v.visit_type_node(name_type);
            }
            if let Some(ty) = &n.type_node {
                v.visit_type_node(ty);
            }
        }
        TypeNode::LiteralType(_) => {}
        TypeNode::TemplateLiteral(n) => {
            for ty in &n.types {
                v.visit_type_node(ty);
            }
        }
        TypeNode::Import(n) => {
            if let Some(args) = &n.type_arguments {
                for arg in args {
                    v.visit_type_node(arg);
                }
            }
        }
        TypeNode::Predicate(n) => {
            if let Some(ty) = &n.type_node {
                v.visit_type_node(ty);
            }
        }
    }
}

pub fn walk_type_element<V: AstVisitor>(v: &mut V, node: &TypeElement) {
    match node {
        TypeElement::Property(n) => {
            if let Some(ty) = &n.type_annotation {
                v.visit_type_node(ty);
            }
        }
        TypeElement::Method(n) => {
            if let Some(params) = &n.type_parameters {
                for param in params {
                    v.visit_type_parameter(param);
                }
            }
            for param in &n.parameters {
                v.visit_parameter(param);
            }
            if let Some(ret) = &n.return_type {
                v.visit_type_node(ret);
            }
        }
        TypeElement::Call(n) => {
            if let Some(params) = &n.type_parameters {
                for param in params {
                    v.visit_type_parameter(param);
                }
            }
            for param in &n.parameters {
                v.visit_parameter(param);
            }
            if let Some(ret) = &n.return_type {
                v.visit_type_node(ret);
            }
        }
        TypeElement::Index(n) => {
            for param in &n.parameters {
                v.visit_parameter(param);
            }
            if let Some(ty) = &n.type_annotation {
                v.visit_type_node(ty);
            }
        }
    }
}

pub fn walk_jsx_element<V: AstVisitor>(v: &mut V, node: &JsxElement) {
    v.visit_jsx_tag_name(&node.opening.tag_name);
    for attribute in &node.opening.attributes {
        match attribute {
            JsxAttributeLike::Attribute(attr) => match &attr.value {
                Some(JsxAttributeValue::Expression(container)) => {
                    if let Some(expr) = &container.expression {
                        v.visit_expression(expr);
                    }
                }
                Some(JsxAttributeValue::Element(element)) => v.visit_jsx_element(element),
                Some(JsxAttributeValue::Fragment(fragment)) => v.visit_jsx_fragment(fragment),
                Some(JsxAttributeValue::StringLiteral(_)) | None => {}
            },
            JsxAttributeLike::Spread(spread) => v.visit_expression(&spread.expression),
        }
    }
    for child in &node.children {
        v.visit_jsx_child(child);
    }
}

pub fn walk_jsx_child<V: AstVisitor>(v: &mut V, node: &JsxChild) {
    match node {
        JsxChild::Text(_) => {}
        JsxChild::Expression(container) => {
            if let Some(expr) = &container.expression {
                v.visit_expression(expr);
            }
        }
        JsxChild::Element(element) => v.visit_jsx_element(element),
        JsxChild::Fragment(fragment) => v.visit_jsx_fragment(fragment),
    }
}

/// Component tags (`<Foo>`, `<a.b>`) reference a value; intrinsic tags
/// (`<div>`, `<svg:rect>`) do not.
pub fn walk_jsx_tag_name<V: AstVisitor>(v: &mut V, node: &JsxTagName) {
    match node {
        JsxTagName::Identifier(id) => {
            if !is_intrinsic_jsx_name(&id.text) {
                v.visit_identifier_reference(id);
            }
        }
        JsxTagName::Member(member) => v.visit_jsx_tag_name(&member.object),
        JsxTagName::Namespaced(_) => {}
    }
}

/// Lower-case names without dots or colons are host elements (`div`).
pub fn is_intrinsic_jsx_name(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_ascii_lowercase()) || name.contains('-')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory;
    use crate::types::VariableKind;

    #[derive(Default)]
    struct NameCollector {
        bindings: Vec<String>,
        references: Vec<String>,
    }

    impl AstVisitor for NameCollector {
        fn visit_binding_identifier(&mut self, node: &Identifier) {
            self.bindings.push(node.text.clone());
        }

        fn visit_identifier_reference(&mut self, node: &Identifier) {
            self.references.push(node.text.clone());
        }
    }

    #[test]
    fn test_bindings_and_references_are_distinguished() {
        let body = vec![
            factory::declare(VariableKind::Const, "a", Some(factory::ident("b"))),
            factory::expression_statement(factory::call(
                factory::member(factory::ident("console"), "log"),
                vec![factory::ident("a")],
            )),
        ];
        let program = Program {
            data: NodeData::synthesized(crate::SyntaxKind::Program),
            source_type: crate::SourceType::Module,
            statements: body,
            shebang: None,
            comments: Vec::new(),
            file_name: String::new(),
        };

        let mut collector = NameCollector::default();
        collector.visit_program(&program);
        assert_eq!(collector.bindings, vec!["a"]);
        assert_eq!(collector.references, vec!["b", "console", "a"]);
    }

    #[test]
    fn test_intrinsic_jsx_names() {
        assert!(is_intrinsic_jsx_name("div"));
        assert!(is_intrinsic_jsx_name("my-element"));
        assert!(!is_intrinsic_jsx_name("Button"));
        assert!(!is_intrinsic_jsx_name("_private"));
    }
}
