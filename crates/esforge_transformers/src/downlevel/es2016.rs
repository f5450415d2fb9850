//! ES2016: the exponentiation operator.
//!
//! `a ** b` becomes `Math.pow(a, b)`; `a.b **= c` becomes
//! `a.b = Math.pow(a.b, c)` with the object evaluated once.

use esforge_ast::visitor_mut::{self, AstVisitorMut};
use esforge_ast::*;

use super::no_options;
use crate::context::PassContext;
use crate::pass::Pass;
use crate::util::{hoist_temps_in_functions, split_target, take, HoistedTemps};

#[derive(Debug, Default)]
pub struct Es2016;

no_options!(Es2016);

impl Pass for Es2016 {
    fn name(&self) -> &'static str {
        "es2016"
    }

    fn apply(&self, program: &mut Program, ctx: &mut PassContext) {
        let mut lowering = Lowering {
            ctx,
            temps: HoistedTemps::default(),
        };
        lowering.visit_program(program);
    }
}

struct Lowering<'a> {
    ctx: &'a mut PassContext,
    temps: HoistedTemps,
}

fn math_pow(base: Expression, exponent: Expression) -> Expression {
    factory::call(factory::member(factory::ident("Math"), "pow"), vec![base, exponent])
}

impl AstVisitorMut for Lowering<'_> {
    hoist_temps_in_functions!();

    fn visit_expression(&mut self, node: &mut Expression) {
        visitor_mut::walk_expression(self, node);
        let Expression::Binary(binary) = node else {
            return;
        };
        match binary.operator {
            SyntaxKind::AsteriskAsteriskToken => {
                let base = take(&mut binary.left);
                let exponent = take(&mut binary.right);
                *node = math_pow(base, exponent);
            }
            SyntaxKind::AsteriskAsteriskEqualsToken => {
                // The target is evaluated before the right-hand side, so it saves the object.
                let (target, again) = split_target(take(&mut binary.left), self.ctx, &mut self.temps);
                let exponent = take(&mut binary.right);
                *node = factory::assign(target, math_pow(again, exponent));
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_math_pow_shape() {
        let Expression::Call(call) = math_pow(factory::ident("a"), factory::number(2.0)) else {
            panic!("expected a call");
        };
        assert_eq!(call.arguments.len(), 2);
        assert!(matches!(&*call.expression, Expression::PropertyAccess(p) if p.name.text == "pow"));
    }
}
