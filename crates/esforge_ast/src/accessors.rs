//! Uniform access to the [`NodeData`] of enum-shaped nodes, plus small
//! shape queries used by the parser, transforms and printer.

use crate::node::*;
use crate::syntax_kind::SyntaxKind;
use esforge_core::text::TextRange;

impl Statement {
    pub fn data(&self) -> &NodeData {
        match self {
            Statement::Block(n) => &n.data,
            Statement::Empty(d) => d,
            Statement::Variable(n) => &n.data,
            Statement::Expression(n) => &n.data,
            Statement::If(n) => &n.data,
            Statement::Do(n) => &n.data,
            Statement::While(n) => &n.data,
            Statement::For(n) => &n.data,
            Statement::ForIn(n) => &n.data,
            Statement::ForOf(n) => &n.data,
            Statement::Continue(n) => &n.data,
            Statement::Break(n) => &n.data,
            Statement::Return(n) => &n.data,
            Statement::With(n) => &n.data,
            Statement::Switch(n) => &n.data,
            Statement::Labeled(n) => &n.data,
            Statement::Throw(n) => &n.data,
            Statement::Try(n) => &n.data,
            Statement::Debugger(d) => d,
            Statement::Function(n) => &n.data,
            Statement::Class(n) => &n.data,
            Statement::Interface(n) => &n.data,
            Statement::TypeAlias(n) => &n.data,
            Statement::Enum(n) => &n.data,
            Statement::Module(n) => &n.data,
            Statement::Import(n) => &n.data,
            Statement::ImportEquals(n) => &n.data,
            Statement::Export(n) => &n.data,
            Statement::ExportAssignment(n) => &n.data,
            Statement::NamespaceExport(n) => &n.data,
            Statement::Missing(d) => d,
        }
    }

    pub fn data_mut(&mut self) -> &mut NodeData {
        match self {
            Statement::Block(n) => &mut n.data,
            Statement::Empty(d) => d,
            Statement::Variable(n) => &mut n.data,
            Statement::Expression(n) => &mut n.data,
            Statement::If(n) => &mut n.data,
            Statement::Do(n) => &mut n.data,
            Statement::While(n) => &mut n.data,
            Statement::For(n) => &mut n.data,
            Statement::ForIn(n) => &mut n.data,
            Statement::ForOf(n) => &mut n.data,
            Statement::Continue(n) => &mut n.data,
            Statement::Break(n) => &mut n.data,
            Statement::Return(n) => &mut n.data,
            Statement::With(n) => &mut n.data,
            Statement::Switch(n) => &mut n.data,
            Statement::Labeled(n) => &mut n.data,
            Statement::Throw(n) => &mut n.data,
            Statement::Try(n) => &mut n.data,
            Statement::Debugger(d) => d,
            Statement::Function(n) => &mut n.data,
            Statement::Class(n) => &mut n.data,
            Statement::Interface(n) => &mut n.data,
            Statement::TypeAlias(n) => &mut n.data,
            Statement::Enum(n) => &mut n.data,
            Statement::Module(n) => &mut n.data,
            Statement::Import(n) => &mut n.data,
            Statement::ImportEquals(n) => &mut n.data,
            Statement::Export(n) => &mut n.data,
            Statement::ExportAssignment(n) => &mut n.data,
            Statement::NamespaceExport(n) => &mut n.data,
            Statement::Missing(d) => d,
        }
    }

    pub fn kind(&self) -> SyntaxKind {
        self.data().kind
    }

    pub fn range(&self) -> TextRange {
        self.data().range
    }

    /// Import/export statements that make a file a module.
    pub fn is_module_syntax(&self) -> bool {
        match self {
            Statement::Import(_)
            | Statement::Export(_)
            | Statement::ExportAssignment(_)
            | Statement::ImportEquals(_) => true,
            Statement::Variable(n) => n.data.has_modifier(crate::types::ModifierFlags::EXPORT),
            Statement::Function(n) => n.data.has_modifier(crate::types::ModifierFlags::EXPORT),
            Statement::Class(n) => n.data.has_modifier(crate::types::ModifierFlags::EXPORT),
            Statement::Enum(n) => n.data.has_modifier(crate::types::ModifierFlags::EXPORT),
            Statement::Module(n) => n.data.has_modifier(crate::types::ModifierFlags::EXPORT),
            Statement::Interface(n) => n.data.has_modifier(crate::types::ModifierFlags::EXPORT),
            Statement::TypeAlias(n) => n.data.has_modifier(crate::types::ModifierFlags::EXPORT),
            _ => false,
        }
    }
}

impl Expression {
    pub fn data(&self) -> &NodeData {
        match self {
            Expression::Identifier(n) | Expression::PrivateIdentifier(n) => &n.data,
            Expression::This(d)
            | Expression::Super(d)
            | Expression::Null(d)
            | Expression::Import(d)
            | Expression::Omitted(d)
            | Expression::Missing(d) => d,
            Expression::Boolean(n) => &n.data,
            Expression::StringLiteral(n) => &n.data,
            Expression::NumericLiteral(n) => &n.data,
            Expression::BigIntLiteral(n) => &n.data,
            Expression::RegularExpressionLiteral(n) => &n.data,
            Expression::Template(n) => &n.data,
            Expression::TaggedTemplate(n) => &n.data,
            Expression::ArrayLiteral(n) => &n.data,
            Expression::ObjectLiteral(n) => &n.data,
            Expression::Function(n) => &n.data,
            Expression::Arrow(n) => &n.data,
            Expression::Class(n) => &n.data,
            Expression::PropertyAccess(n) => &n.data,
            Expression::ElementAccess(n) => &n.data,
            Expression::Call(n) => &n.data,
            Expression::New(n) => &n.data,
            Expression::MetaProperty(n) => &n.data,
            Expression::Parenthesized(n) => &n.data,
            Expression::PrefixUnary(n) => &n.data,
            Expression::PostfixUnary(n) => &n.data,
            Expression::Await(n) => &n.data,
            Expression::Yield(n) => &n.data,
            Expression::Binary(n) => &n.data,
            Expression::Conditional(n) => &n.data,
            Expression::Spread(n) => &n.data,
            Expression::As(n) => &n.data,
            Expression::Satisfies(n) => &n.data,
            Expression::TypeAssertion(n) => &n.data,
            Expression::NonNull(n) => &n.data,
            Expression::JsxElement(n) => &n.data,
            Expression::JsxFragment(n) => &n.data,
        }
    }

    pub fn data_mut(&mut self) -> &mut NodeData {
        match self {
            Expression::Identifier(n) | Expression::PrivateIdentifier(n) => &mut n.data,
            Expression::This(d)
            | Expression::Super(d)
            | Expression::Null(d)
            | Expression::Import(d)
            | Expression::Omitted(d)
            | Expression::Missing(d) => d,
            Expression::Boolean(n) => &mut n.data,
            Expression::StringLiteral(n) => &mut n.data,
            Expression::NumericLiteral(n) => &mut n.data,
            Expression::BigIntLiteral(n) => &mut n.data,
            Expression::RegularExpressionLiteral(n) => &mut n.data,
            Expression::Template(n) => &mut n.data,
            Expression::TaggedTemplate(n) => &mut n.data,
            Expression::ArrayLiteral(n) => &mut n.data,
            Expression::ObjectLiteral(n) => &mut n.data,
            Expression::Function(n) => &mut n.data,
            Expression::Arrow(n) => &mut n.data,
            Expression::Class(n) => &mut n.data,
            Expression::PropertyAccess(n) => &mut n.data,
            Expression::ElementAccess(n) => &mut n.data,
            Expression::Call(n) => &mut n.data,
            Expression::New(n) => &mut n.data,
            Expression::MetaProperty(n) => &mut n.data,
            Expression::Parenthesized(n) => &mut n.data,
            Expression::PrefixUnary(n) => &mut n.data,
            Expression::PostfixUnary(n) => &mut n.data,
            Expression::Await(n) => &mut n.data,
            Expression::Yield(n) => &mut n.data,
            Expression::Binary(n) => &mut n.data,
            Expression::Conditional(n) => &mut n.data,
            Expression::Spread(n) => &mut n.data,
            Expression::As(n) => &mut n.data,
            Expression::Satisfies(n) => &mut n.data,
            Expression::TypeAssertion(n) => &mut n.data,
            Expression::NonNull(n) => &mut n.data,
            Expression::JsxElement(n) => &mut n.data,
            Expression::JsxFragment(n) => &mut n.data,
        }
    }

    pub fn kind(&self) -> SyntaxKind {
        self.data().kind
    }

    pub fn range(&self) -> TextRange {
        self.data().range
    }

    /// Strip parentheses and TypeScript-only wrappers.
    pub fn skip_outer_expressions(&self) -> &Expression {
        let mut expr = self;
        loop {
            expr = match expr {
                Expression::Parenthesized(n) => &n.expression,
                Expression::As(n) => &n.expression,
                Expression::Satisfies(n) => &n.expression,
                Expression::TypeAssertion(n) => &n.expression,
                Expression::NonNull(n) => &n.expression,
                _ => return expr,
            };
        }
    }

    pub fn is_identifier_named(&self, name: &str) -> bool {
        matches!(self, Expression::Identifier(id) if id.text == name)
    }

    pub fn as_identifier(&self) -> Option<&Identifier> {
        match self {
            Expression::Identifier(id) => Some(id),
            _ => None,
        }
    }

    /// Literal string value of a string or no-substitution template literal.
    pub fn as_string_value(&self) -> Option<&str> {
        match self {
            Expression::StringLiteral(s) => Some(&s.value),
            Expression::Template(t) if t.expressions.is_empty() => {
                t.quasis.first().and_then(|q| q.cooked.as_deref())
            }
            _ => None,
        }
    }

    /// Whether evaluating the expression has no observable side effects.
    pub fn is_side_effect_free(&self) -> bool {
        match self {
            Expression::Identifier(_)
            | Expression::This(_)
            | Expression::Null(_)
            | Expression::Boolean(_)
            | Expression::StringLiteral(_)
            | Expression::NumericLiteral(_)
            | Expression::BigIntLiteral(_)
            | Expression::RegularExpressionLiteral(_)
            | Expression::Function(_)
            | Expression::Arrow(_)
            | Expression::Omitted(_) => true,
            Expression::Template(t) => t.expressions.iter().all(Expression::is_side_effect_free),
            Expression::Parenthesized(n) => n.expression.is_side_effect_free(),
            Expression::PrefixUnary(n) => {
                matches!(
                    n.operator,
                    SyntaxKind::ExclamationToken
                        | SyntaxKind::MinusToken
                        | SyntaxKind::PlusToken
                        | SyntaxKind::TildeToken
                        | SyntaxKind::VoidKeyword
                        | SyntaxKind::TypeOfKeyword
                ) && n.operand.is_side_effect_free()
            }
            Expression::ArrayLiteral(n) => n.elements.iter().all(Expression::is_side_effect_free),
            _ => false,
        }
    }

    /// Valid target of a simple assignment or update.
    pub fn is_simple_assignment_target(&self) -> bool {
        match self.skip_outer_expressions() {
            Expression::Identifier(_)
            | Expression::PropertyAccess(_)
            | Expression::ElementAccess(_) => true,
            _ => false,
        }
    }
}

impl TypeNode {
    pub fn data(&self) -> &NodeData {
        match self {
            TypeNode::Keyword(d) | TypeNode::This(d) | TypeNode::Missing(d) => d,
            TypeNode::Reference(n) => &n.data,
            TypeNode::Function(n) => &n.data,
            TypeNode::Query(n) => &n.data,
            TypeNode::Literal(n) => &n.data,
            TypeNode::Array(n) => &n.data,
            TypeNode::Tuple(n) => &n.data,
            TypeNode::NamedTupleMember(n) => &n.data,
            TypeNode::Optional(n) | TypeNode::Rest(n) | TypeNode::Parenthesized(n) => &n.data,
            TypeNode::Union(n) | TypeNode::Intersection(n) => &n.data,
            TypeNode::Conditional(n) => &n.data,
            TypeNode::Infer(n) => &n.data,
            TypeNode::Operator(n) => &n.data,
            TypeNode::IndexedAccess(n) => &n.data,
            TypeNode::Mapped(n) => &n.data,
            TypeNode::LiteralType(n) => &n.data,
            TypeNode::TemplateLiteral(n) => &n.data,
            TypeNode::Import(n) => &n.data,
            TypeNode::Predicate(n) => &n.data,
        }
    }

    pub fn kind(&self) -> SyntaxKind {
        self.data().kind
    }
}

impl ClassElement {
    pub fn data(&self) -> &NodeData {
        match self {
            ClassElement::Property(n) => &n.data,
            ClassElement::Method(n) => &n.data,
            ClassElement::Constructor(n) => &n.data,
            ClassElement::IndexSignature(n) => &n.data,
            ClassElement::StaticBlock(n) => &n.data,
            ClassElement::Semicolon(d) => d,
        }
    }
}

impl ObjectLiteralElement {
    pub fn data(&self) -> &NodeData {
        match self {
            ObjectLiteralElement::Property(n) => &n.data,
            ObjectLiteralElement::Shorthand(n) => &n.data,
            ObjectLiteralElement::Spread(n) => &n.data,
            ObjectLiteralElement::Method(n) => &n.data,
        }
    }
}

impl PropertyName {
    pub fn data(&self) -> &NodeData {
        match self {
            PropertyName::Identifier(n) | PropertyName::PrivateIdentifier(n) => &n.data,
            PropertyName::StringLiteral(n) => &n.data,
            PropertyName::NumericLiteral(n) => &n.data,
            PropertyName::BigIntLiteral(n) => &n.data,
            PropertyName::Computed(n) => &n.data,
        }
    }

    /// Statically known name, if any.
    pub fn static_name(&self) -> Option<String> {
        match self {
            PropertyName::Identifier(id) | PropertyName::PrivateIdentifier(id) => Some(id.text.clone()),
            PropertyName::StringLiteral(s) => Some(s.value.clone()),
            PropertyName::NumericLiteral(n) => Some(esforge_core::number::number_to_string(n.value)),
            PropertyName::BigIntLiteral(_) | PropertyName::Computed(_) => None,
        }
    }

    pub fn is_private(&self) -> bool {
        matches!(self, PropertyName::PrivateIdentifier(_))
    }
}

impl BindingName {
    pub fn data(&self) -> &NodeData {
        match self {
            BindingName::Identifier(n) => &n.data,
            BindingName::Object(n) => &n.data,
            BindingName::Array(n) => &n.data,
        }
    }

    pub fn as_identifier(&self) -> Option<&Identifier> {
        match self {
            BindingName::Identifier(id) => Some(id),
            _ => None,
        }
    }

    /// Collect every identifier bound by this name, in source order.
    pub fn bound_identifiers<'n>(&'n self, out: &mut Vec<&'n Identifier>) {
        match self {
            BindingName::Identifier(id) => out.push(id),
            BindingName::Object(pattern) => {
                for element in &pattern.elements {
                    element.name.bound_identifiers(out);
                }
            }
            BindingName::Array(pattern) => {
                for element in pattern.elements.iter().flatten() {
                    element.name.bound_identifiers(out);
                }
            }
        }
    }
}

impl JsxChild {
    pub fn data(&self) -> &NodeData {
        match self {
            JsxChild::Text(n) => &n.data,
            JsxChild::Expression(n) => &n.data,
            JsxChild::Element(n) => &n.data,
            JsxChild::Fragment(n) => &n.data,
        }
    }
}

impl EntityName {
    /// Dotted text (`A.B.C`).
    pub fn text(&self) -> String {
        match self {
            EntityName::Identifier(id) => id.text.clone(),
            EntityName::Qualified(q) => format!("{}.{}", q.left.text(), q.right.text),
        }
    }

    /// Leftmost identifier.
    pub fn first_identifier(&self) -> &Identifier {
        match self {
            EntityName::Identifier(id) => id,
            EntityName::Qualified(q) => q.left.first_identifier(),
        }
    }
}

impl Parameter {
    /// Parameter declared with an accessibility or `readonly` modifier.
    pub fn is_parameter_property(&self) -> bool {
        self.data
            .has_modifier(crate::types::ModifierFlags::PARAMETER_PROPERTY_MODIFIER)
    }

    /// TypeScript `this` parameter.
    pub fn is_this_parameter(&self) -> bool {
        matches!(&self.name, BindingName::Identifier(id) if id.text == "this")
    }
}
