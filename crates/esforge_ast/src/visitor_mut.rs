//! In-place AST traversal used by the transform passes and the bundler.
//!
//! Mirrors [`crate::visitor::AstVisitor`] with mutable access, so a hook can
//! replace the node it is handed (`*expr = ...`).

use crate::node::*;
use crate::visitor::is_intrinsic_jsx_name;

/// Override the `visit_*` methods of interest; the defaults walk into
/// children through the matching `walk_*` function so an override can
/// still descend by calling it.
pub trait AstVisitorMut: Sized {
    fn visit_program(&mut self, node: &mut Program) {
        walk_program(self, node)
    }

    fn visit_statements(&mut self, nodes: &mut Vec<Statement>) {
        for stmt in nodes {
            self.visit_statement(stmt);
        }
    }

    fn visit_statement(&mut self, node: &mut Statement) {
        walk_statement(self, node)
    }

    fn visit_block(&mut self, node: &mut Block) {
        self.visit_statements(&mut node.statements)
    }

    fn visit_variable_declaration(&mut self, node: &mut VariableDeclaration) {
        walk_variable_declaration(self, node)
    }

    fn visit_expression(&mut self, node: &mut Expression) {
        walk_expression(self, node)
    }

    fn visit_function(&mut self, node: &mut Function) {
        walk_function(self, node)
    }

    fn visit_arrow_function(&mut self, node: &mut ArrowFunction) {
        walk_arrow_function(self, node)
    }

    fn visit_class(&mut self, node: &mut Class) {
        walk_class(self, node)
    }

    fn visit_class_element(&mut self, node: &mut ClassElement) {
        walk_class_element(self, node)
    }

    fn visit_object_literal_element(&mut self, node: &mut ObjectLiteralElement) {
        walk_object_literal_element(self, node)
    }

    fn visit_parameter(&mut self, node: &mut Parameter) {
        walk_parameter(self, node)
    }

    fn visit_binding_name(&mut self, node: &mut BindingName) {
        walk_binding_name(self, node)
    }

    fn visit_property_name(&mut self, node: &mut PropertyName) {
        if let PropertyName::Computed(computed) = node {
            self.visit_expression(&mut computed.expression);
        }
    }

    fn visit_decorator(&mut self, node: &mut Decorator) {
        self.visit_expression(&mut node.expression)
    }

    /// An identifier that introduces a value binding.
    fn visit_binding_identifier(&mut self, _node: &mut Identifier) {}

    /// An identifier read or written as a value.
    fn visit_identifier_reference(&mut self, _node: &mut Identifier) {}

    fn visit_import_declaration(&mut self, node: &mut ImportDeclaration) {
        walk_import_declaration(self, node)
    }

    fn visit_export_declaration(&mut self, _node: &mut ExportDeclaration) {}

    fn visit_type_node(&mut self, node: &mut TypeNode) {
        walk_type_node(self, node)
    }

    fn visit_type_parameter(&mut self, node: &mut TypeParameter) {
        if let Some(constraint) = &mut node.constraint {
            self.visit_type_node(constraint);
        }
        if let Some(default) = &mut node.default {
            self.visit_type_node(default);
        }
    }

    fn visit_jsx_element(&mut self, node: &mut JsxElement) {
        walk_jsx_element(self, node)
    }

    fn visit_jsx_fragment(&mut self, node: &mut JsxFragment) {
        for child in &mut node.children {
            self.visit_jsx_child(child);
        }
    }

    fn visit_jsx_child(&mut self, node: &mut JsxChild) {
        walk_jsx_child(self, node)
    }

    fn visit_jsx_tag_name(&mut self, node: &mut JsxTagName) {
        walk_jsx_tag_name(self, node)
    }
}

pub fn walk_program<V: AstVisitorMut>(v: &mut V, node: &mut Program) {
    v.visit_statements(&mut node.statements);
}

pub fn walk_statement<V: AstVisitorMut>(v: &mut V, node: &mut Statement) {
    match node {
        Statement::Block(n) => v.visit_block(n),
        Statement::Empty(_) | Statement::Debugger(_) | Statement::Missing(_) => {}
        Statement::Variable(n) => {
            for decl in &mut n.declaration_list.declarations {
                v.visit_variable_declaration(decl);
            }
        }
        Statement::Expression(n) => v.visit_expression(&mut n.expression),
        Statement::If(n) => {
            v.visit_expression(&mut n.condition);
            v.visit_statement(&mut n.then_statement);
            if let Some(else_statement) = &mut n.else_statement {
                v.visit_statement(else_statement);
            }
        }
        Statement::Do(n) => {
            v.visit_statement(&mut n.statement);
            v.visit_expression(&mut n.condition);
        }
        Statement::While(n) => {
            v.visit_expression(&mut n.condition);
            v.visit_statement(&mut n.statement);
        }
        Statement::For(n) => {
            if let Some(init) = &mut n.initializer {
                walk_for_initializer(v, init);
            }
            if let Some(cond) = &mut n.condition {
                v.visit_expression(cond);
            }
            if let Some(inc) = &mut n.incrementor {
                v.visit_expression(inc);
            }
            v.visit_statement(&mut n.statement);
        }
        Statement::ForIn(n) => {
            walk_for_initializer(v, &mut n.initializer);
            v.visit_expression(&mut n.expression);
            v.visit_statement(&mut n.statement);
        }
        Statement::ForOf(n) => {
            walk_for_initializer(v, &mut n.initializer);
            v.visit_expression(&mut n.expression);
            v.visit_statement(&mut n.statement);
        }
        Statement::Continue(_) | Statement::Break(_) => {}
        Statement::Return(n) => {
            if let Some(expr) = &mut n.expression {
                v.visit_expression(expr);
            }
        }
        Statement::With(n) => {
            v.visit_expression(&mut n.expression);
            v.visit_statement(&mut n.statement);
        }
        Statement::Switch(n) => {
            v.visit_expression(&mut n.expression);
            for clause in &mut n.clauses {
                if let Some(test) = &mut clause.expression {
                    v.visit_expression(test);
                }
                v.visit_statements(&mut clause.statements);
            }
        }
        Statement::Labeled(n) => v.visit_statement(&mut n.statement),
        Statement::Throw(n) => v.visit_expression(&mut n.expression),
        Statement::Try(n) => {
            v.visit_block(&mut n.try_block);
            if let Some(catch) = &mut n.catch_clause {
                if let Some(decl) = &mut catch.variable_declaration {
                    v.visit_variable_declaration(decl);
                }
                v.visit_block(&mut catch.block);
            }
            if let Some(finally) = &mut n.finally_block {
                v.visit_block(finally);
            }
        }
        Statement::Function(n) => v.visit_function(n),
        Statement::Class(n) => v.visit_class(n),
        Statement::Interface(n) => {
            if let Some(params) = &mut n.type_parameters {
                for param in params {
                    v.visit_type_parameter(param);
                }
            }
            for member in &mut n.members {
                walk_type_element(v, member);
            }
        }
        Statement::TypeAlias(n) => {
            if let Some(params) = &mut n.type_parameters {
                for param in params {
                    v.visit_type_parameter(param);
                }
            }
            v.visit_type_node(&mut n.type_node);
        }
        Statement::Enum(n) => {
            v.visit_binding_identifier(&mut n.name);
            for member in &mut n.members {
                if let Some(init) = &mut member.initializer {
                    v.visit_expression(init);
                }
            }
        }
        Statement::Module(n) => walk_module_declaration(v, n),
        Statement::Import(n) => v.visit_import_declaration(n),
        Statement::ImportEquals(n) => v.visit_binding_identifier(&mut n.name),
        Statement::Export(n) => v.visit_export_declaration(n),
        Statement::ExportAssignment(n) => v.visit_expression(&mut n.expression),
        Statement::NamespaceExport(_) => {}
    }
}

pub fn walk_module_declaration<V: AstVisitorMut>(v: &mut V, node: &mut ModuleDeclaration) {
    if let ModuleName::Identifier(name) = &mut node.name {
        v.visit_binding_identifier(name);
    }
    match &mut node.body {
        Some(ModuleBody::Block(block)) => v.visit_statements(&mut block.statements),
        Some(ModuleBody::Namespace(inner)) => walk_module_declaration(v, inner),
        None => {}
    }
}

pub fn walk_for_initializer<V: AstVisitorMut>(v: &mut V, node: &mut ForInitializer) {
    match node {
        ForInitializer::Variable(list) => {
            for decl in &mut list.declarations {
                v.visit_variable_declaration(decl);
            }
        }
        ForInitializer::Expression(expr) => v.visit_expression(expr),
    }
}

pub fn walk_variable_declaration<V: AstVisitorMut>(v: &mut V, node: &mut VariableDeclaration) {
    v.visit_binding_name(&mut node.name);
    if let Some(ty) = &mut node.type_annotation {
        v.visit_type_node(ty);
    }
    if let Some(init) = &mut node.initializer {
        v.visit_expression(init);
    }
}

pub fn walk_import_declaration<V: AstVisitorMut>(v: &mut V, node: &mut ImportDeclaration) {
    if let Some(clause) = &mut node.import_clause {
        if let Some(name) = &mut clause.name {
            v.visit_binding_identifier(name);
        }
        match &mut clause.named_bindings {
            Some(NamedImportBindings::Namespace(name)) => v.visit_binding_identifier(name),
            Some(NamedImportBindings::Named(specifiers)) => {
                for specifier in specifiers {
                    v.visit_binding_identifier(&mut specifier.name);
                }
            }
            None => {}
        }
    }
}

pub fn walk_expression<V: AstVisitorMut>(v: &mut V, node: &mut Expression) {
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
            for expr in &mut n.expressions {
                v.visit_expression(expr);
            }
        }
        Expression::TaggedTemplate(n) => {
            v.visit_expression(&mut n.tag);
            for expr in &mut n.template.expressions {
                v.visit_expression(expr);
            }
        }
        Expression::ArrayLiteral(n) => {
            for element in &mut n.elements {
                v.visit_expression(element);
            }
        }
        Expression::ObjectLiteral(n) => {
            for property in &mut n.properties {
                v.visit_object_literal_element(property);
            }
        }
        Expression::Function(n) => v.visit_function(n),
        Expression::Arrow(n) => v.visit_arrow_function(n),
        Expression::Class(n) => v.visit_class(n),
        Expression::PropertyAccess(n) => v.visit_expression(&mut n.expression),
        Expression::ElementAccess(n) => {
            v.visit_expression(&mut n.expression);
            v.visit_expression(&mut n.argument);
        }
        Expression::Call(n) => {
            v.visit_expression(&mut n.expression);
            for arg in &mut n.arguments {
                v.visit_expression(arg);
            }
        }
        Expression::New(n) => {
            v.visit_expression(&mut n.expression);
            if let Some(args) = &mut n.arguments {
                for arg in args {
                    v.visit_expression(arg);
                }
            }
        }
        Expression::Parenthesized(n) => v.visit_expression(&mut n.expression),
        Expression::PrefixUnary(n) => v.visit_expression(&mut n.operand),
        Expression::PostfixUnary(n) => v.visit_expression(&mut n.operand),
        Expression::Await(n) => v.visit_expression(&mut n.expression),
        Expression::Yield(n) => {
            if let Some(expr) = &mut n.expression {
                v.visit_expression(expr);
            }
        }
        Expression::Binary(n) => {
            v.visit_expression(&mut n.left);
            v.visit_expression(&mut n.right);
        }
        Expression::Conditional(n) => {
            v.visit_expression(&mut n.condition);
            v.visit_expression(&mut n.when_true);
            v.visit_expression(&mut n.when_false);
        }
        Expression::Spread(n) => v.visit_expression(&mut n.expression),
        Expression::As(n) => {
            v.visit_expression(&mut n.expression);
            v.visit_type_node(&mut n.type_node);
        }
        Expression::Satisfies(n) => {
            v.visit_expression(&mut n.expression);
            v.visit_type_node(&mut n.type_node);
        }
        Expression::TypeAssertion(n) => {
            v.visit_type_node(&mut n.type_node);
            v.visit_expression(&mut n.expression);
        }
        Expression::NonNull(n) => v.visit_expression(&mut n.expression),
        Expression::JsxElement(n) => v.visit_jsx_element(n),
        Expression::JsxFragment(n) => v.visit_jsx_fragment(n),
    }
}

pub fn walk_object_literal_element<V: AstVisitorMut>(v: &mut V, node: &mut ObjectLiteralElement) {
    match node {
        ObjectLiteralElement::Property(n) => {
            v.visit_property_name(&mut n.name);
            v.visit_expression(&mut n.initializer);
        }
        ObjectLiteralElement::Shorthand(n) => {
            v.visit_identifier_reference(&mut n.name);
            if let Some(init) = &mut n.object_assignment_initializer {
                v.visit_expression(init);
            }
        }
        ObjectLiteralElement::Spread(n) => v.visit_expression(&mut n.expression),
        ObjectLiteralElement::Method(n) => {
            v.visit_property_name(&mut n.name);
            v.visit_function(&mut n.function);
        }
    }
}

pub fn walk_function<V: AstVisitorMut>(v: &mut V, node: &mut Function) {
    if let Some(name) = &mut node.name {
        v.visit_binding_identifier(name);
    }
    if let Some(params) = &mut node.type_parameters {
        for param in params {
            v.visit_type_parameter(param);
        }
    }
    for param in &mut node.parameters {
        v.visit_parameter(param);
    }
    if let Some(ret) = &mut node.return_type {
        v.visit_type_node(ret);
    }
    if let Some(body) = &mut node.body {
        v.visit_block(body);
    }
}

pub fn walk_arrow_function<V: AstVisitorMut>(v: &mut V, node: &mut ArrowFunction) {
    if let Some(params) = &mut node.type_parameters {
        for param in params {
            v.visit_type_parameter(param);
        }
    }
    for param in &mut node.parameters {
        v.visit_parameter(param);
    }
    if let Some(ret) = &mut node.return_type {
        v.visit_type_node(ret);
    }
    match &mut node.body {
        ArrowBody::Block(block) => v.visit_block(block),
        ArrowBody::Expression(expr) => v.visit_expression(expr),
    }
}

pub fn walk_parameter<V: AstVisitorMut>(v: &mut V, node: &mut Parameter) {
    for decorator in &mut node.decorators {
        v.visit_decorator(decorator);
    }
    v.visit_binding_name(&mut node.name);
    if let Some(ty) = &mut node.type_annotation {
        v.visit_type_node(ty);
    }
    if let Some(init) = &mut node.initializer {
        v.visit_expression(init);
    }
}

pub fn walk_binding_name<V: AstVisitorMut>(v: &mut V, node: &mut BindingName) {
    match node {
        BindingName::Identifier(id) => v.visit_binding_identifier(id),
        BindingName::Object(pattern) => {
            for element in &mut pattern.elements {
                walk_binding_element(v, element);
            }
        }
        BindingName::Array(pattern) => {
            for element in &mut pattern.elements {
                if let Some(element) = element {
                    walk_binding_element(v, element);
                }
            }
        }
    }
}

pub fn walk_binding_element<V: AstVisitorMut>(v: &mut V, node: &mut BindingElement) {
    if let Some(name) = &mut node.property_name {
        v.visit_property_name(name);
    }
    v.visit_binding_name(&mut node.name);
    if let Some(init) = &mut node.initializer {
        v.visit_expression(init);
    }
}

pub fn walk_class<V: AstVisitorMut>(v: &mut V, node: &mut Class) {
    for decorator in &mut node.decorators {
        v.visit_decorator(decorator);
    }
    if let Some(name) = &mut node.name {
        v.visit_binding_identifier(name);
    }
    if let Some(params) = &mut node.type_parameters {
        for param in params {
            v.visit_type_parameter(param);
        }
    }
    if let Some(extends) = &mut node.extends {
        v.visit_expression(extends);
    }
    for member in &mut node.members {
        v.visit_class_element(member);
    }
}

pub fn walk_class_element<V: AstVisitorMut>(v: &mut V, node: &mut ClassElement) {
    match node {
        ClassElement::Property(n) => {
            for decorator in &mut n.decorators {
                v.visit_decorator(decorator);
            }
            v.visit_property_name(&mut n.name);
            if let Some(ty) = &mut n.type_annotation {
                v.visit_type_node(ty);
            }
            if let Some(init) = &mut n.initializer {
                v.visit_expression(init);
            }
        }
        ClassElement::Method(n) => {
            for decorator in &mut n.decorators {
                v.visit_decorator(decorator);
            }
            v.visit_property_name(&mut n.name);
            v.visit_function(&mut n.function);
        }
        ClassElement::Constructor(n) => v.visit_function(&mut n.function),
        ClassElement::IndexSignature(n) => {
            for param in &mut n.parameters {
                v.visit_parameter(param);
            }
            if let Some(ty) = &mut n.type_annotation {
                v.visit_type_node(ty);
            }
        }
        ClassElement::StaticBlock(n) => v.visit_block(&mut n.body),
        ClassElement::Semicolon(_) => {}
    }
}

pub fn walk_type_node<V: AstVisitorMut>(v: &mut V, node: &mut TypeNode) {
    match node {
        TypeNode::Keyword(_) | TypeNode::This(_) | TypeNode::Missing(_) => {}
        TypeNode::Reference(n) => {
            if let Some(args) = &mut n.type_arguments {
                for arg in args {
                    v.visit_type_node(arg);
                }
            }
        }
        TypeNode::Function(n) => {
            if let Some(params) = &mut n.type_parameters {
                for param in params {
                    v.visit_type_parameter(param);
                }
            }
            for param in &mut n.parameters {
                v.visit_parameter(param);
            }
            v.visit_type_node(&mut n.return_type);
        }
        TypeNode::Query(n) => {
            if let Some(args) = &mut n.type_arguments {
                for arg in args {
                    v.visit_type_node(arg);
                }
            }
        }
        TypeNode::Literal(n) => {
            for member in &mut n.members {
                walk_type_element(v, member);
            }
        }
        TypeNode::Array(n) => v.visit_type_node(&mut n.element_type),
        TypeNode::Tuple(n) => {
            for element in &mut n.elements {
                v.visit_type_node(element);
            }
        }
        TypeNode::NamedTupleMember(n) => v.visit_type_node(&mut n.type_node),
        TypeNode::Optional(n) | TypeNode::Rest(n) | TypeNode::Parenthesized(n) => {
            v.visit_type_node(&mut n.type_node)
        }
        TypeNode::Union(n) | TypeNode::Intersection(n) => {
            for ty in &mut n.types {
                v.visit_type_node(ty);
            }
        }
        TypeNode::Conditional(n) => {
            v.visit_type_node(&mut n.check_type);
            v.visit_type_node(&mut n.extends_type);
            v.visit_type_node(&mut n.true_type);
            v.visit_type_node(&mut n.false_type);
        }
        TypeNode::Infer(n) => v.visit_type_parameter(&mut n.type_parameter),
        TypeNode::Operator(n) => v.visit_type_node(&mut n.type_node),
        TypeNode::IndexedAccess(n) => {
            v.visit_type_node(&mut n.object_type);
            v.visit_type_node(&mut n.index_type);
        }
        TypeNode::Mapped(n) => {
            v.visit_type_parameter(&mut n.type_parameter);
            if let Some(name_type) = &mut n.name_type {
                v.visit_type_node(name_type);
            }
            if let Some(ty) = &mut n.type_node {
                v.visit_type_node(ty);
            }
        }
        TypeNode::LiteralType(_) => {}
        TypeNode::TemplateLiteral(n) => {
            for ty in &mut n.types {
                v.visit_type_node(ty);
            }
        }
        TypeNode::Import(n) => {
            if let Some(args) = &mut n.type_arguments {
                for arg in args {
                    v.visit_type_node(arg);
                }
            }
        }
        TypeNode::Predicate(n) => {
            if let Some(ty) = &mut n.type_node {
                v.visit_type_node(ty);
            }
        }
    }
}

pub fn walk_type_element<V: AstVisitorMut>(v: &mut V, node: &mut TypeElement) {
    match node {
        TypeElement::Property(n) => {
            if let Some(ty) = &mut n.type_annotation {
                v.visit_type_node(ty);
            }
        }
        TypeElement::Method(n) => {
            if let Some(params) = &mut n.type_parameters {
                for param in params {
                    v.visit_type_parameter(param);
                }
            }
            for param in &mut n.parameters {
                v.visit_parameter(param);
            }
            if let Some(ret) = &mut n.return_type {
                v.visit_type_node(ret);
            }
        }
        TypeElement::Call(n) => {
            if let Some(params) = &mut n.type_parameters {
                for param in params {
                    v.visit_type_parameter(param);
                }
            }
            for param in &mut n.parameters {
                v.visit_parameter(param);
            }
            if let Some(ret) = &mut n.return_type {
                v.visit_type_node(ret);
            }
        }
        TypeElement::Index(n) => {
            for param in &mut n.parameters {
                v.visit_parameter(param);
            }
            if let Some(ty) = &mut n.type_annotation {
                v.visit_type_node(ty);
            }
        }
    }
}

pub fn walk_jsx_element<V: AstVisitorMut>(v: &mut V, node: &mut JsxElement) {
    v.visit_jsx_tag_name(&mut node.opening.tag_name);
    for attribute in &mut node.opening.attributes {
        match attribute {
            JsxAttributeLike::Attribute(attr) => match &mut attr.value {
                Some(JsxAttributeValue::Expression(container)) => {
                    if let Some(expr) = &mut container.expression {
                        v.visit_expression(expr);
                    }
                }
                Some(JsxAttributeValue::Element(element)) => v.visit_jsx_element(element),
                Some(JsxAttributeValue::Fragment(fragment)) => v.visit_jsx_fragment(fragment),
                Some(JsxAttributeValue::StringLiteral(_)) | None => {}
            },
            JsxAttributeLike::Spread(spread) => v.visit_expression(&mut spread.expression),
        }
    }
    for child in &mut node.children {
        v.visit_jsx_child(child);
    }
}

pub fn walk_jsx_child<V: AstVisitorMut>(v: &mut V, node: &mut JsxChild) {
    match node {
        JsxChild::Text(_) => {}
        JsxChild::Expression(container) => {
            if let Some(expr) = &mut container.expression {
                v.visit_expression(expr);
            }
        }
        JsxChild::Element(element) => v.visit_jsx_element(element),
        JsxChild::Fragment(fragment) => v.visit_jsx_fragment(fragment),
    }
}

/// Component tags (`<Foo>`, `<a.b>`) reference a value; intrinsic tags
/// (`<div>`, `<svg:rect>`) do not.
pub fn walk_jsx_tag_name<V: AstVisitorMut>(v: &mut V, node: &mut JsxTagName) {
    match node {
        JsxTagName::Identifier(id) => {
            if !is_intrinsic_jsx_name(&id.text) {
                v.visit_identifier_reference(id);
            }
        }
        JsxTagName::Member(member) => v.visit_jsx_tag_name(&mut member.object),
        JsxTagName::Namespaced(_) => {}
    }
}
