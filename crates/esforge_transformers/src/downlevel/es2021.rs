//! ES2021: logical assignment and numeric separators.
//!
//! `a ||= b` becomes `a || (a = b)`, likewise `&&=`; `a ??= b` becomes
//! `a ?? (a = b)`, which `es2020` lowers further. Member targets evaluate
//! their object and key once through temporaries.

use esforge_ast::visitor_mut::{self, AstVisitorMut};
use esforge_ast::*;

use super::no_options;
use crate::context::PassContext;
use crate::pass::Pass;
use crate::util::{hoist_temps_in_functions, split_target, take, HoistedTemps};

#[derive(Debug, Default)]
pub struct Es2021;

no_options!(Es2021);

impl Pass for Es2021 {
    fn name(&self) -> &'static str {
        "es2021"
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

fn logical_operator(assignment: SyntaxKind) -> Option<SyntaxKind> {
    match assignment {
        SyntaxKind::BarBarEqualsToken => Some(SyntaxKind::BarBarToken),
        SyntaxKind::AmpersandAmpersandEqualsToken => Some(SyntaxKind::AmpersandAmpersandToken),
        SyntaxKind::QuestionQuestionEqualsToken => Some(SyntaxKind::QuestionQuestionToken),
        _ => None,
    }
}

impl AstVisitorMut for Lowering<'_> {
    hoist_temps_in_functions!();

    fn visit_expression(&mut self, node: &mut Expression) {
        visitor_mut::walk_expression(self, node);
        match node {
            Expression::Binary(binary) => {
                let Some(operator) = logical_operator(binary.operator) else {
                    return;
                };
                let (read, write) = split_target(take(&mut binary.left), self.ctx, &mut self.temps);
                let value = take(&mut binary.right);
                *node = factory::binary(read, operator, factory::paren(factory::assign(write, value)));
            }
            Expression::NumericLiteral(n) => {
                if n.raw.as_deref().is_some_and(|raw| raw.contains('_')) {
                    n.raw = None;
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logical_operators() {
        assert_eq!(logical_operator(SyntaxKind::BarBarEqualsToken), Some(SyntaxKind::BarBarToken));
        assert_eq!(logical_operator(SyntaxKind::PlusEqualsToken), None);
    }
}
