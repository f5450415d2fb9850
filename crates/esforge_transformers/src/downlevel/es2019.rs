//! ES2019: optional catch bindings.

use esforge_ast::visitor_mut::{self, AstVisitorMut};
use esforge_ast::*;

use super::no_options;
use crate::context::PassContext;
use crate::pass::Pass;

#[derive(Debug, Default)]
pub struct Es2019;

no_options!(Es2019);

impl Pass for Es2019 {
    fn name(&self) -> &'static str {
        "es2019"
    }

    fn apply(&self, program: &mut Program, ctx: &mut PassContext) {
        CatchBindings { ctx }.visit_program(program);
    }
}

struct CatchBindings<'a> {
    ctx: &'a mut PassContext,
}

impl AstVisitorMut for CatchBindings<'_> {
    fn visit_statement(&mut self, node: &mut Statement) {
        if let Statement::Try(try_statement) = node {
            if let Some(clause) = &mut try_statement.catch_clause {
                if clause.variable_declaration.is_none() {
                    let name = self.ctx.unique_name("_unused");
                    clause.variable_declaration = Some(factory::variable_declaration(
                        BindingName::Identifier(factory::identifier(&name)),
                        None,
                    ));
                }
            }
        }
        visitor_mut::walk_statement(self, node);
    }
}
