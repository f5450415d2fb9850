//! ES2017: async functions.
//!
//! Lowering `async` needs a generator-based state machine, which older
//! targets lack as well; async functions are reported and kept.

use esforge_ast::visitor_mut::{self, AstVisitorMut};
use esforge_ast::*;

use super::no_options;
use crate::context::PassContext;
use crate::pass::Pass;

const PASS: &str = "es2017";

#[derive(Debug, Default)]
pub struct Es2017;

no_options!(Es2017);

impl Pass for Es2017 {
    fn name(&self) -> &'static str {
        PASS
    }

    fn apply(&self, program: &mut Program, ctx: &mut PassContext) {
        AsyncReport { ctx }.visit_program(program);
    }
}

struct AsyncReport<'a> {
    ctx: &'a mut PassContext,
}

impl AstVisitorMut for AsyncReport<'_> {
    fn visit_function(&mut self, node: &mut Function) {
        // Async generators were already reported by es2018.
        if node.is_async && !node.is_generator {
            self.ctx.cannot_lower(PASS, "an async function", node.data.range);
        }
        visitor_mut::walk_function(self, node);
    }

    fn visit_arrow_function(&mut self, node: &mut ArrowFunction) {
        if node.is_async {
            self.ctx.cannot_lower(PASS, "an async arrow function", node.data.range);
        }
        visitor_mut::walk_arrow_function(self, node);
    }
}
