//! ES2018: object spread.
//!
//! `{ a, ...b, c }` becomes `Object.assign(Object.assign({ a }, b), { c })`.
//! Object rest, async generators, `for await` and the regular expression
//! `s` flag are reported.

use esforge_ast::visitor_mut::{self, AstVisitorMut};
use esforge_ast::*;

use super::no_options;
use crate::context::PassContext;
use crate::pass::Pass;

const PASS: &str = "es2018";

#[derive(Debug, Default)]
pub struct Es2018;

no_options!(Es2018);

impl Pass for Es2018 {
    fn name(&self) -> &'static str {
        PASS
    }

    fn apply(&self, program: &mut Program, ctx: &mut PassContext) {
        Lowering { ctx }.visit_program(program);
    }
}

struct Lowering<'a> {
    ctx: &'a mut PassContext,
}

fn object_assign(target: Expression, source: Expression) -> Expression {
    factory::call(factory::member(factory::ident("Object"), "assign"), vec![target, source])
}

fn has_spread(properties: &[ObjectLiteralElement]) -> bool {
    properties.iter().any(|p| matches!(p, ObjectLiteralElement::Spread(_)))
}

/// Fold an object literal with spreads into `Object.assign` calls.
fn assign_chain(properties: Vec<ObjectLiteralElement>) -> Expression {
    let mut acc: Option<Expression> = None;
    let mut pending = Vec::new();
    for property in properties {
        let ObjectLiteralElement::Spread(spread) = property else {
            pending.push(property);
            continue;
        };
        let base = match acc.take() {
            None => factory::object(std::mem::take(&mut pending)),
            Some(acc) if pending.is_empty() => acc,
            Some(acc) => object_assign(acc, factory::object(std::mem::take(&mut pending))),
        };
        acc = Some(object_assign(base, spread.expression));
    }
    match acc {
        Some(acc) if pending.is_empty() => acc,
        Some(acc) => object_assign(acc, factory::object(pending)),
        None => factory::object(pending),
    }
}

impl Lowering<'_> {
    fn check_rest_target(&mut self, target: &Expression) {
        if let Expression::ObjectLiteral(object) = target.skip_outer_expressions() {
            if let Some(ObjectLiteralElement::Spread(spread)) =
                object.properties.iter().find(|p| matches!(p, ObjectLiteralElement::Spread(_)))
            {
                self.ctx.cannot_lower(PASS, "an object rest element", spread.data.range);
            }
        }
    }
}

impl AstVisitorMut for Lowering<'_> {
    fn visit_statement(&mut self, node: &mut Statement) {
        if let Statement::ForOf(for_of) = node {
            if for_of.is_await {
                self.ctx.cannot_lower(PASS, "a for await loop", for_of.data.range);
            }
        }
        visitor_mut::walk_statement(self, node);
    }

    fn visit_function(&mut self, node: &mut Function) {
        if node.is_async && node.is_generator {
            self.ctx.cannot_lower(PASS, "an async generator", node.data.range);
        }
        visitor_mut::walk_function(self, node);
    }

    fn visit_binding_name(&mut self, node: &mut BindingName) {
        if let BindingName::Object(pattern) = node {
            if let Some(rest) = pattern.elements.iter().find(|e| e.dot_dot_dot) {
                self.ctx.cannot_lower(PASS, "an object rest element", rest.data.range);
            }
        }
        visitor_mut::walk_binding_name(self, node);
    }

    fn visit_expression(&mut self, node: &mut Expression) {
        match node {
            // Assignment patterns keep their spread: it is a rest element there.
            Expression::Binary(binary) if binary.operator == SyntaxKind::EqualsToken => {
                if matches!(binary.left.skip_outer_expressions(), Expression::ObjectLiteral(_)) {
                    self.check_rest_target(&binary.left);
                    self.visit_expression(&mut binary.right);
                    return;
                }
            }
            Expression::RegularExpressionLiteral(regex) if regex.flags.contains('s') => {
                self.ctx.cannot_lower(PASS, "the regular expression flag 's'", regex.data.range);
            }
            _ => {}
        }
        visitor_mut::walk_expression(self, node);
        if let Expression::ObjectLiteral(object) = node {
            if has_spread(&object.properties) {
                let properties = std::mem::take(&mut object.properties);
                *node = assign_chain(properties);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spread(name: &str) -> ObjectLiteralElement {
        ObjectLiteralElement::Spread(SpreadAssignment {
            data: NodeData::synthesized(SyntaxKind::SpreadAssignment),
            expression: factory::ident(name),
        })
    }

    #[test]
    fn test_leading_spread_starts_from_empty_object() {
        let Expression::Call(call) = assign_chain(vec![spread("b")]) else {
            panic!("expected Object.assign");
        };
        assert!(matches!(&call.arguments[0], Expression::ObjectLiteral(o) if o.properties.is_empty()));
        assert!(call.arguments[1].is_identifier_named("b"));
    }

    #[test]
    fn test_trailing_properties_are_assigned_last() {
        let result = assign_chain(vec![factory::property("a", factory::number(1.0)), spread("b"), factory::property("c", factory::number(2.0))]);
        let Expression::Call(outer) = result else {
            panic!("expected Object.assign");
        };
        assert!(matches!(&outer.arguments[0], Expression::Call(_)));
        assert!(matches!(&outer.arguments[1], Expression::ObjectLiteral(o) if o.properties.len() == 1));
    }
}
