//! Small tree-editing helpers shared by the passes.

use esforge_ast::{
    factory, ArrowBody, ArrowFunction, BindingName, Block, EntityName, Expression, NodeData, Statement,
    SyntaxKind, VariableKind,
};

use crate::context::PassContext;

/// Move an expression out, leaving a placeholder behind.
pub(crate) fn take(expr: &mut Expression) -> Expression {
    std::mem::replace(expr, Expression::Missing(NodeData::synthesized(SyntaxKind::MissingNode)))
}

pub(crate) fn take_statement(stmt: &mut Statement) -> Statement {
    std::mem::replace(stmt, Statement::Empty(NodeData::synthesized(SyntaxKind::EmptyStatement)))
}

/// Identifier or `this`: safe to evaluate twice.
pub(crate) fn is_simple_reference(expr: &Expression) -> bool {
    matches!(expr, Expression::Identifier(_) | Expression::This(_))
}

/// Number of leading `"use strict"`-style directives.
pub(crate) fn prologue_length(statements: &[Statement]) -> usize {
    statements
        .iter()
        .take_while(|stmt| {
            matches!(stmt, Statement::Expression(e) if matches!(e.expression, Expression::StringLiteral(_)))
        })
        .count()
}

/// Insert `new` after the directive prologue of a body.
pub(crate) fn prepend_statements(statements: &mut Vec<Statement>, new: Vec<Statement>) {
    if new.is_empty() {
        return;
    }
    let at = prologue_length(statements);
    statements.splice(at..at, new);
}

/// `var a, b;`
pub(crate) fn var_declarations(names: Vec<String>) -> Statement {
    let declarations = names
        .iter()
        .map(|name| factory::variable_declaration(BindingName::Identifier(factory::identifier(name)), None))
        .collect();
    factory::variable_statement(VariableKind::Var, declarations)
}

/// Block form of an arrow body: `expr` becomes `{ return expr; }`.
pub(crate) fn into_block(body: ArrowBody) -> Block {
    match body {
        ArrowBody::Block(block) => block,
        ArrowBody::Expression(expr) => factory::block(vec![factory::return_statement(Some(*expr))]),
    }
}

/// Insert `new` at the top of an arrow body, converting it to a block if needed.
pub(crate) fn prepend_to_arrow(node: &mut ArrowFunction, new: Vec<Statement>) {
    if new.is_empty() {
        return;
    }
    match &mut node.body {
        ArrowBody::Block(block) => prepend_statements(&mut block.statements, new),
        ArrowBody::Expression(expr) => {
            let mut statements = new;
            statements.push(factory::return_statement(Some(take(expr))));
            node.body = ArrowBody::Block(factory::block(statements));
        }
    }
}

/// `check === null || value === void 0`, or `check == null` when loose.
pub(crate) fn is_nullish(check: Expression, value: Expression, loose: bool) -> Expression {
    if loose {
        return factory::binary(check, SyntaxKind::EqualsEqualsToken, factory::null());
    }
    factory::binary(
        factory::binary(check, SyntaxKind::EqualsEqualsEqualsToken, factory::null()),
        SyntaxKind::BarBarToken,
        factory::binary(value, SyntaxKind::EqualsEqualsEqualsToken, factory::void_zero()),
    )
}

/// A number as an expression: negative values become `-n` and
/// non-finite values the matching global.
pub(crate) fn number_value(value: f64) -> Expression {
    if value.is_nan() {
        return factory::ident("NaN");
    }
    if value.is_infinite() {
        let infinity = factory::ident("Infinity");
        return if value > 0.0 { infinity } else { factory::prefix(SyntaxKind::MinusToken, infinity) };
    }
    if value < 0.0 || (value == 0.0 && value.is_sign_negative()) {
        return factory::prefix(SyntaxKind::MinusToken, factory::number(-value));
    }
    factory::number(value)
}

/// `A.B.C` in value position.
pub(crate) fn entity_to_expression(name: &EntityName) -> Expression {
    match name {
        EntityName::Identifier(id) => Expression::Identifier(id.clone()),
        EntityName::Qualified(q) => factory::member(entity_to_expression(&q.left), &q.right.text),
    }
}

/// `super(...);` as a statement.
pub(crate) fn is_super_call_statement(stmt: &Statement) -> bool {
    matches!(
        stmt,
        Statement::Expression(e)
            if matches!(&e.expression, Expression::Call(call) if matches!(*call.expression, Expression::Super(_)))
    )
}

/// Split an assignment target into the expression that reads it and the
/// one that writes it, so that its object and key are evaluated once:
/// `f().x` reads as `(_a = f()).x` and writes as `_a.x`.
pub(crate) fn split_target(target: Expression, ctx: &mut PassContext, temps: &mut HoistedTemps) -> (Expression, Expression) {
    match target {
        Expression::Parenthesized(p) => split_target(*p.expression, ctx, temps),
        Expression::PropertyAccess(mut access) => {
            let (first, object) = reuse(*access.expression, ctx, temps);
            access.expression = Box::new(object);
            let write = Expression::PropertyAccess(access.clone());
            access.expression = Box::new(first);
            (Expression::PropertyAccess(access), write)
        }
        Expression::ElementAccess(mut access) => {
            let (first_object, object) = reuse(*access.expression, ctx, temps);
            let (first_key, key) = if access.argument.is_side_effect_free() && !is_simple_reference(&access.argument) {
                (access.argument.as_ref().clone(), *access.argument)
            } else {
                reuse(*access.argument, ctx, temps)
            };
            access.expression = Box::new(object);
            access.argument = Box::new(key);
            let write = Expression::ElementAccess(access.clone());
            access.expression = Box::new(first_object);
            access.argument = Box::new(first_key);
            (Expression::ElementAccess(access), write)
        }
        other => (other.clone(), other),
    }
}

/// An expression to evaluate first and one that reuses its value later:
/// simple references are repeated, anything else goes through a temporary.
pub(crate) fn reuse(expr: Expression, ctx: &mut PassContext, temps: &mut HoistedTemps) -> (Expression, Expression) {
    if is_simple_reference(&expr) {
        return (expr.clone(), expr);
    }
    let temp = ctx.temp_name();
    temps.declare(&temp);
    (factory::paren(factory::assign(factory::ident(&temp), expr)), factory::ident(&temp))
}

/// Temporaries declared with `var` at the top of the function that uses them.
#[derive(Default)]
pub(crate) struct HoistedTemps {
    frames: Vec<Vec<String>>,
}

impl HoistedTemps {
    pub(crate) fn enter(&mut self) {
        self.frames.push(Vec::new());
    }

    pub(crate) fn exit(&mut self) -> Vec<String> {
        self.frames.pop().unwrap_or_default()
    }

    pub(crate) fn declare(&mut self, name: &str) {
        if let Some(frame) = self.frames.last_mut() {
            frame.push(name.to_string());
        }
    }

    /// Pop the current frame and declare its names at the top of `statements`.
    pub(crate) fn exit_into(&mut self, statements: &mut Vec<Statement>) {
        let names = self.exit();
        if !names.is_empty() {
            prepend_statements(statements, vec![var_declarations(names)]);
        }
    }

    /// Pop the current frame into an arrow body, converting it to a block if needed.
    pub(crate) fn exit_into_arrow(&mut self, node: &mut ArrowFunction) {
        let names = self.exit();
        if !names.is_empty() {
            prepend_to_arrow(node, vec![var_declarations(names)]);
        }
    }
}

/// Expand the function-like visits of a pass that hoists temporaries.
///
/// The pass type must have a `temps: HoistedTemps` field.
macro_rules! hoist_temps_in_functions {
    () => {
        fn visit_program(&mut self, node: &mut esforge_ast::Program) {
            self.temps.enter();
            esforge_ast::visitor_mut::walk_program(self, node);
            self.temps.exit_into(&mut node.statements);
        }

        fn visit_function(&mut self, node: &mut esforge_ast::Function) {
            self.temps.enter();
            esforge_ast::visitor_mut::walk_function(self, node);
            match &mut node.body {
                Some(body) => self.temps.exit_into(&mut body.statements),
                None => {
                    self.temps.exit();
                }
            }
        }

        fn visit_arrow_function(&mut self, node: &mut esforge_ast::ArrowFunction) {
            self.temps.enter();
            esforge_ast::visitor_mut::walk_arrow_function(self, node);
            self.temps.exit_into_arrow(node);
        }
    };
}

pub(crate) use hoist_temps_in_functions;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepend_skips_directives() {
        let mut body = vec![
            factory::expression_statement(factory::string("use strict")),
            factory::expression_statement(factory::ident("a")),
        ];
        prepend_statements(&mut body, vec![var_declarations(vec!["_a".into()])]);
        assert!(matches!(body[0], Statement::Expression(_)));
        assert!(matches!(body[1], Statement::Variable(_)));
    }

    #[test]
    fn test_number_value_forms() {
        assert!(matches!(number_value(2.0), Expression::NumericLiteral(_)));
        assert!(matches!(number_value(-2.0), Expression::PrefixUnary(_)));
        assert!(number_value(f64::NAN).is_identifier_named("NaN"));
    }

    #[test]
    fn test_arrow_expression_body_becomes_block() {
        let Expression::Arrow(mut arrow) = factory::arrow(Vec::new(), ArrowBody::Expression(Box::new(factory::ident("x")))) else {
            panic!("expected an arrow");
        };
        prepend_to_arrow(&mut arrow, vec![var_declarations(vec!["_a".into()])]);
        let ArrowBody::Block(block) = &arrow.body else {
            panic!("expected a block body");
        };
        assert!(matches!(block.statements[0], Statement::Variable(_)));
        assert!(matches!(block.statements[1], Statement::Return(_)));
    }
}
