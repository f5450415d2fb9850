//! Synthetic node construction for transforms and the bundler.
//!
//! Every node built here carries [`NodeData::synthesized`] data: a dummy
//! range and the `SYNTHESIZED` flag, so the printer emits no mapping for it.
//!
//! # Example
//! ```
//! use esforge_ast::factory;
//! let call = factory::call(factory::member(factory::ident("Object"), "assign"), vec![]);
//! assert!(matches!(call, esforge_ast::Expression::Call(_)));
//! ```

use crate::node::*;
use crate::syntax_kind::SyntaxKind;
use crate::types::*;

fn data(kind: SyntaxKind) -> NodeData {
    NodeData::synthesized(kind)
}

pub fn identifier(text: &str) -> Identifier {
    Identifier {
        data: data(SyntaxKind::Identifier),
        id: NodeId::INVALID,
        text: text.to_string(),
    }
}

pub fn ident(text: &str) -> Expression {
    Expression::Identifier(identifier(text))
}

pub fn string(value: &str) -> Expression {
    Expression::StringLiteral(string_literal(value))
}

pub fn string_literal(value: &str) -> StringLiteral {
    StringLiteral {
        data: data(SyntaxKind::StringLiteral),
        value: value.to_string(),
        raw: None,
    }
}

pub fn number(value: f64) -> Expression {
    Expression::NumericLiteral(NumericLiteral {
        data: data(SyntaxKind::NumericLiteral),
        value,
        raw: None,
    })
}

pub fn boolean(value: bool) -> Expression {
    let kind = if value {
        SyntaxKind::TrueKeyword
    } else {
        SyntaxKind::FalseKeyword
    };
    Expression::Boolean(BooleanLiteral {
        data: data(kind),
        value,
    })
}

pub fn null() -> Expression {
    Expression::Null(data(SyntaxKind::NullKeyword))
}

pub fn this() -> Expression {
    Expression::This(data(SyntaxKind::ThisKeyword))
}

/// `void 0`
pub fn void_zero() -> Expression {
    prefix(SyntaxKind::VoidKeyword, number(0.0))
}

pub fn prefix(operator: SyntaxKind, operand: Expression) -> Expression {
    Expression::PrefixUnary(PrefixUnaryExpression {
        data: data(SyntaxKind::PrefixUnaryExpression),
        operator,
        operand: Box::new(operand),
    })
}

pub fn binary(left: Expression, operator: SyntaxKind, right: Expression) -> Expression {
    Expression::Binary(BinaryExpression {
        data: data(SyntaxKind::BinaryExpression),
        left: Box::new(left),
        operator,
        right: Box::new(right),
    })
}

pub fn assign(target: Expression, value: Expression) -> Expression {
    binary(target, SyntaxKind::EqualsToken, value)
}

/// Left-nested comma expression; a single element is returned as is.
pub fn comma(mut expressions: Vec<Expression>) -> Expression {
    if expressions.len() == 1 {
        if let Some(only) = expressions.pop() {
            return only;
        }
    }
    let mut iter = expressions.into_iter();
    let first = iter.next().unwrap_or_else(void_zero);
    iter.fold(first, |acc, next| binary(acc, SyntaxKind::CommaToken, next))
}

pub fn conditional(condition: Expression, when_true: Expression, when_false: Expression) -> Expression {
    Expression::Conditional(ConditionalExpression {
        data: data(SyntaxKind::ConditionalExpression),
        condition: Box::new(condition),
        when_true: Box::new(when_true),
        when_false: Box::new(when_false),
    })
}

pub fn paren(expression: Expression) -> Expression {
    Expression::Parenthesized(ParenthesizedExpression {
        data: data(SyntaxKind::ParenthesizedExpression),
        expression: Box::new(expression),
    })
}

pub fn member(object: Expression, name: &str) -> Expression {
    Expression::PropertyAccess(PropertyAccessExpression {
        data: data(SyntaxKind::PropertyAccessExpression),
        expression: Box::new(object),
        question_dot: false,
        name: identifier(name),
    })
}

pub fn element(object: Expression, argument: Expression) -> Expression {
    Expression::ElementAccess(ElementAccessExpression {
        data: data(SyntaxKind::ElementAccessExpression),
        expression: Box::new(object),
        question_dot: false,
        argument: Box::new(argument),
    })
}

pub fn call(callee: Expression, arguments: Vec<Expression>) -> Expression {
    Expression::Call(CallExpression {
        data: data(SyntaxKind::CallExpression),
        expression: Box::new(callee),
        question_dot: false,
        type_arguments: None,
        arguments,
    })
}

pub fn new_expression(callee: Expression, arguments: Vec<Expression>) -> Expression {
    Expression::New(NewExpression {
        data: data(SyntaxKind::NewExpression),
        expression: Box::new(callee),
        type_arguments: None,
        arguments: Some(arguments),
    })
}

pub fn array(elements: Vec<Expression>) -> Expression {
    Expression::ArrayLiteral(ArrayLiteralExpression {
        data: data(SyntaxKind::ArrayLiteralExpression),
        elements,
    })
}

pub fn spread(expression: Expression) -> Expression {
    Expression::Spread(SpreadElement {
        data: data(SyntaxKind::SpreadElement),
        expression: Box::new(expression),
    })
}

pub fn object(properties: Vec<ObjectLiteralElement>) -> Expression {
    Expression::ObjectLiteral(ObjectLiteralExpression {
        data: data(SyntaxKind::ObjectLiteralExpression),
        properties,
    })
}

pub fn property_name(name: &str) -> PropertyName {
    if is_identifier_name(name) {
        PropertyName::Identifier(identifier(name))
    } else {
        PropertyName::StringLiteral(string_literal(name))
    }
}

pub fn property(name: &str, value: Expression) -> ObjectLiteralElement {
    ObjectLiteralElement::Property(PropertyAssignment {
        data: data(SyntaxKind::PropertyAssignment),
        name: property_name(name),
        initializer: value,
    })
}

/// `get name() { return value; }` as an object literal member.
pub fn getter(name: &str, value: Expression) -> ObjectLiteralElement {
    ObjectLiteralElement::Method(MethodDeclaration {
        data: data(SyntaxKind::GetAccessor),
        decorators: Vec::new(),
        kind: MethodKind::Get,
        name: property_name(name),
        question: false,
        function: function(None, Vec::new(), vec![return_statement(Some(value))]),
    })
}

pub fn parameter(name: &str) -> Parameter {
    Parameter {
        data: data(SyntaxKind::Parameter),
        decorators: Vec::new(),
        dot_dot_dot: false,
        name: BindingName::Identifier(identifier(name)),
        question: false,
        type_annotation: None,
        initializer: None,
    }
}

pub fn block(statements: Vec<Statement>) -> Block {
    Block {
        data: data(SyntaxKind::Block),
        statements,
    }
}

pub fn function(name: Option<&str>, parameters: Vec<Parameter>, body: Vec<Statement>) -> Function {
    Function {
        data: data(SyntaxKind::FunctionExpression),
        name: name.map(identifier),
        is_async: false,
        is_generator: false,
        type_parameters: None,
        parameters,
        return_type: None,
        body: Some(block(body)),
    }
}

pub fn function_expression(parameters: Vec<Parameter>, body: Vec<Statement>) -> Expression {
    Expression::Function(Box::new(function(None, parameters, body)))
}

pub fn arrow(parameters: Vec<Parameter>, body: ArrowBody) -> Expression {
    Expression::Arrow(Box::new(ArrowFunction {
        data: data(SyntaxKind::ArrowFunction),
        is_async: false,
        type_parameters: None,
        parameters,
        return_type: None,
        body,
    }))
}

/// `(function () { body })()`
pub fn iife(parameters: Vec<Parameter>, body: Vec<Statement>, arguments: Vec<Expression>) -> Expression {
    call(paren(function_expression(parameters, body)), arguments)
}

pub fn expression_statement(expression: Expression) -> Statement {
    Statement::Expression(ExpressionStatement {
        data: data(SyntaxKind::ExpressionStatement),
        expression,
    })
}

pub fn return_statement(expression: Option<Expression>) -> Statement {
    Statement::Return(ReturnStatement {
        data: data(SyntaxKind::ReturnStatement),
        expression,
    })
}

pub fn if_statement(condition: Expression, then_statement: Statement, else_statement: Option<Statement>) -> Statement {
    Statement::If(IfStatement {
        data: data(SyntaxKind::IfStatement),
        condition,
        then_statement: Box::new(then_statement),
        else_statement: else_statement.map(Box::new),
    })
}

pub fn variable_declaration(name: BindingName, initializer: Option<Expression>) -> VariableDeclaration {
    VariableDeclaration {
        data: data(SyntaxKind::VariableDeclaration),
        name,
        exclamation: false,
        type_annotation: None,
        initializer,
    }
}

pub fn variable_list(kind: VariableKind, declarations: Vec<VariableDeclaration>) -> VariableDeclarationList {
    VariableDeclarationList {
        data: data(SyntaxKind::VariableDeclarationList),
        kind,
        declarations,
    }
}

pub fn variable_statement(kind: VariableKind, declarations: Vec<VariableDeclaration>) -> Statement {
    Statement::Variable(VariableStatement {
        data: data(SyntaxKind::VariableStatement),
        declaration_list: variable_list(kind, declarations),
    })
}

/// `kind name = init;`
pub fn declare(kind: VariableKind, name: &str, initializer: Option<Expression>) -> Statement {
    variable_statement(
        kind,
        vec![variable_declaration(BindingName::Identifier(identifier(name)), initializer)],
    )
}

pub fn export_named(specifiers: Vec<(String, String)>) -> Statement {
    let specifiers = specifiers
        .into_iter()
        .map(|(local, exported)| ExportSpecifier {
            data: data(SyntaxKind::ExportSpecifier),
            is_type_only: false,
            property_name: if local == exported {
                None
            } else {
                Some(ModuleExportName::Identifier(identifier(&local)))
            },
            name: module_export_name(&exported),
        })
        .collect();
    Statement::Export(ExportDeclaration {
        data: data(SyntaxKind::ExportDeclaration),
        is_type_only: false,
        export_clause: Some(ExportClause::Named(specifiers)),
        module_specifier: None,
        attributes: None,
    })
}

fn module_export_name(name: &str) -> ModuleExportName {
    if is_identifier_name(name) {
        ModuleExportName::Identifier(identifier(name))
    } else {
        ModuleExportName::StringLiteral(string_literal(name))
    }
}

/// `import default, { imported as local } from "specifier"`. With no
/// bindings at all this is a side-effect import.
pub fn import_named(specifier: &str, default: Option<&str>, named: Vec<(String, String)>) -> Statement {
    let named_bindings = if named.is_empty() {
        None
    } else {
        let specifiers = named
            .into_iter()
            .map(|(imported, local)| ImportSpecifier {
                data: data(SyntaxKind::ImportSpecifier),
                is_type_only: false,
                property_name: (imported != local).then(|| module_export_name(&imported)),
                name: identifier(&local),
            })
            .collect();
        Some(NamedImportBindings::Named(specifiers))
    };
    import_with_clause(specifier, default, named_bindings)
}

/// `import * as local from "specifier"`
pub fn import_namespace(specifier: &str, local: &str) -> Statement {
    import_with_clause(specifier, None, Some(NamedImportBindings::Namespace(identifier(local))))
}

fn import_with_clause(specifier: &str, default: Option<&str>, named_bindings: Option<NamedImportBindings>) -> Statement {
    let import_clause = if default.is_none() && named_bindings.is_none() {
        None
    } else {
        Some(ImportClause {
            data: data(SyntaxKind::ImportClause),
            is_type_only: false,
            name: default.map(identifier),
            named_bindings,
        })
    };
    Statement::Import(ImportDeclaration {
        data: data(SyntaxKind::ImportDeclaration),
        import_clause,
        module_specifier: string_literal(specifier),
        attributes: None,
    })
}

/// `export * from "specifier"`
pub fn export_star(specifier: &str) -> Statement {
    Statement::Export(ExportDeclaration {
        data: data(SyntaxKind::ExportDeclaration),
        is_type_only: false,
        export_clause: None,
        module_specifier: Some(string_literal(specifier)),
        attributes: None,
    })
}

/// Whether `text` can be written as a bare identifier.
pub fn is_identifier_name(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c == '$' || c == '_' || unicode_xid::UnicodeXID::is_xid_start(c) => {}
        _ => return false,
    }
    chars.all(|c| c == '$' || c == '\u{200c}' || c == '\u{200d}' || unicode_xid::UnicodeXID::is_xid_continue(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comma_of_single_expression_is_identity() {
        let expr = comma(vec![ident("a")]);
        assert!(expr.is_identifier_named("a"));
    }

    #[test]
    fn test_comma_nests_left() {
        match comma(vec![ident("a"), ident("b"), ident("c")]) {
            Expression::Binary(outer) => {
                assert_eq!(outer.operator, SyntaxKind::CommaToken);
                assert!(outer.right.is_identifier_named("c"));
                assert!(matches!(*outer.left, Expression::Binary(_)));
            }
            other => panic!("expected comma expression, got {:?}", other),
        }
    }

    #[test]
    fn test_property_name_quotes_non_identifiers() {
        assert!(matches!(property_name("ok"), PropertyName::Identifier(_)));
        assert!(matches!(property_name("not-ok"), PropertyName::StringLiteral(_)));
        assert!(matches!(property_name("1x"), PropertyName::StringLiteral(_)));
    }

    #[test]
    fn test_synthesized_nodes_have_dummy_ranges() {
        let stmt = declare(VariableKind::Const, "x", Some(number(1.0)));
        assert!(stmt.range().is_dummy());
        assert!(stmt.data().flags.contains(NodeFlags::SYNTHESIZED));
    }
}
