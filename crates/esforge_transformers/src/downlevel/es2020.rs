//! ES2020: optional chaining, nullish coalescing and `export * as ns`.
//!
//! A chain is split at its outermost `?.`: the part before it is tested
//! once for `null`/`undefined` and the rest is evaluated against the saved
//! value. `a?.b.c?.d` therefore nests one conditional inside another.

use esforge_ast::visitor_mut::{self, AstVisitorMut};
use esforge_ast::*;

use super::LooseOptions;
use crate::context::PassContext;
use crate::pass::Pass;
use crate::pipeline::Configurable;
use crate::util::{hoist_temps_in_functions, is_nullish, is_simple_reference, reuse, take, HoistedTemps};

const PASS: &str = "es2020";

#[derive(Debug, Default)]
pub struct Es2020 {
    options: LooseOptions,
}

impl Configurable for Es2020 {
    type Options = LooseOptions;

    fn from_options(options: Self::Options) -> Result<Self, String> {
        Ok(Self { options })
    }
}

impl Pass for Es2020 {
    fn name(&self) -> &'static str {
        PASS
    }

    fn apply(&self, program: &mut Program, ctx: &mut PassContext) {
        let mut lowering = Lowering {
            ctx,
            loose: self.options.loose,
            temps: HoistedTemps::default(),
        };
        lowering.visit_program(program);
    }
}

struct Lowering<'a> {
    ctx: &'a mut PassContext,
    loose: bool,
    temps: HoistedTemps,
}

/// Member access or call that belongs to an optional chain.
fn is_chain_link(expr: &Expression) -> bool {
    matches!(expr, Expression::PropertyAccess(_) | Expression::ElementAccess(_) | Expression::Call(_))
        && expr.data().flags.contains(NodeFlags::OPTIONAL_CHAIN)
}

fn has_question_dot(expr: &Expression) -> bool {
    match expr {
        Expression::PropertyAccess(n) => n.question_dot,
        Expression::ElementAccess(n) => n.question_dot,
        Expression::Call(n) => n.question_dot,
        _ => false,
    }
}

/// The expression a chain link applies to.
fn link_object(expr: &Expression) -> Option<&Expression> {
    if !is_chain_link(expr) {
        return None;
    }
    match expr {
        Expression::PropertyAccess(n) => Some(&n.expression),
        Expression::ElementAccess(n) => Some(&n.expression),
        Expression::Call(n) => Some(&n.expression),
        _ => None,
    }
}

fn link_object_mut(expr: &mut Expression) -> Option<&mut Expression> {
    if !is_chain_link(expr) {
        return None;
    }
    match expr {
        Expression::PropertyAccess(n) => Some(&mut n.expression),
        Expression::ElementAccess(n) => Some(&mut n.expression),
        Expression::Call(n) => Some(&mut n.expression),
        _ => None,
    }
}

/// Depth of the outermost `?.` link below `top`, counting `top` as 0.
fn outermost_question_dot(top: &Expression) -> Option<usize> {
    let mut depth = 0;
    let mut link = top;
    loop {
        if !is_chain_link(link) {
            return None;
        }
        if has_question_dot(link) {
            return Some(depth);
        }
        link = link_object(link)?;
        depth += 1;
    }
}

fn clear_chain_flags(top: &mut Expression, depth: usize) {
    let mut link = top;
    for _ in 0..=depth {
        link.data_mut().flags.remove(NodeFlags::OPTIONAL_CHAIN);
        match link {
            Expression::PropertyAccess(n) => {
                n.question_dot = false;
                link = &mut n.expression;
            }
            Expression::ElementAccess(n) => {
                n.question_dot = false;
                link = &mut n.expression;
            }
            Expression::Call(n) => {
                n.question_dot = false;
                link = &mut n.expression;
            }
            _ => return,
        }
    }
}

impl Lowering<'_> {
    /// `check` is true when `value` is nullish.
    fn nullish_check(&mut self, value: Expression) -> (Expression, Expression) {
        let (first, reference) = reuse(value, self.ctx, &mut self.temps);
        let check = is_nullish(first, reference.clone(), self.loose);
        (check, reference)
    }

    /// Visit everything a chain evaluates except its own links.
    fn visit_chain_operands(&mut self, expr: &mut Expression) {
        if !is_chain_link(expr) {
            self.visit_expression(expr);
            return;
        }
        match expr {
            Expression::PropertyAccess(n) => self.visit_chain_operands(&mut n.expression),
            Expression::ElementAccess(n) => {
                self.visit_chain_operands(&mut n.expression);
                self.visit_expression(&mut n.argument);
            }
            Expression::Call(n) => {
                self.visit_chain_operands(&mut n.expression);
                for argument in &mut n.arguments {
                    self.visit_expression(argument);
                }
            }
            _ => {}
        }
    }

    /// Split a chain into the nullish test of its short-circuiting prefix and
    /// the expression evaluated when the test fails.
    fn split_chain(&mut self, mut top: Expression) -> Result<(Expression, Expression), Expression> {
        let Some(depth) = outermost_question_dot(&top) else {
            clear_chain_flags(&mut top, usize::MAX);
            return Err(top);
        };

        // Navigate to the `?.` link.
        let mut link = &mut top;
        for _ in 0..depth {
            match link_object_mut(link) {
                Some(next) => link = next,
                None => return Err(top),
            }
        }
        let is_call = matches!(link, Expression::Call(_));
        let Some(object) = link_object_mut(link) else {
            return Err(top);
        };
        let mut prefix = take(object);

        // Lowering the member chain first would lose the method's receiver.
        if is_call
            && matches!(prefix, Expression::PropertyAccess(_) | Expression::ElementAccess(_))
            && outermost_question_dot(&prefix).is_some()
        {
            self.ctx.cannot_lower(PASS, "an optional call on an optional member", prefix.range());
            if let Some(object) = link_object_mut(link) {
                *object = prefix;
            }
            return Err(top);
        }

        let prefix_lowered = if is_chain_link(&prefix) {
            match self.split_chain(prefix) {
                Ok((check, rest)) => factory::conditional(check, factory::void_zero(), rest),
                Err(plain) => plain,
            }
        } else {
            prefix
        };

        let (check, placeholder) = match (is_call, prefix_lowered) {
            (true, Expression::PropertyAccess(mut access)) => {
                let (first_object, object_ref) = reuse(*access.expression, self.ctx, &mut self.temps);
                access.expression = Box::new(first_object);
                let (check, callee) = self.nullish_check_forced(Expression::PropertyAccess(access));
                (check, CallTarget::Method(callee, object_ref))
            }
            (true, Expression::ElementAccess(mut access)) => {
                let (first_object, object_ref) = reuse(*access.expression, self.ctx, &mut self.temps);
                access.expression = Box::new(first_object);
                let (check, callee) = self.nullish_check_forced(Expression::ElementAccess(access));
                (check, CallTarget::Method(callee, object_ref))
            }
            (_, value) => {
                let (check, reference) = self.nullish_check(value);
                (check, CallTarget::Plain(reference))
            }
        };

        let Some(object) = link_object_mut(link) else {
            return Err(top);
        };
        match placeholder {
            CallTarget::Plain(reference) => *object = reference,
            CallTarget::Method(callee, this_arg) => {
                *object = factory::member(callee, "call");
                if let Expression::Call(call) = link {
                    call.arguments.insert(0, this_arg);
                }
            }
        }
        clear_chain_flags(&mut top, depth);
        Ok((check, top))
    }

    /// Like [`Self::nullish_check`] but always saves the value, so a
    /// method can be called later without re-reading it.
    fn nullish_check_forced(&mut self, value: Expression) -> (Expression, Expression) {
        if is_simple_reference(&value) {
            return self.nullish_check(value);
        }
        let temp = self.ctx.temp_name();
        self.temps.declare(&temp);
        let first = factory::paren(factory::assign(factory::ident(&temp), value));
        let check = is_nullish(first, factory::ident(&temp), self.loose);
        (check, factory::ident(&temp))
    }

    fn lower_coalesce(&mut self, left: Expression, right: Expression) -> Expression {
        let (check, reference) = self.nullish_check(left);
        factory::conditional(check, right, reference)
    }
}

enum CallTarget {
    Plain(Expression),
    /// Callee and the `this` value to call it with.
    Method(Expression, Expression),
}

impl AstVisitorMut for Lowering<'_> {
    hoist_temps_in_functions!();

    fn visit_statements(&mut self, nodes: &mut Vec<Statement>) {
        let mut out = Vec::with_capacity(nodes.len());
        for mut stmt in std::mem::take(nodes) {
            if let Statement::Export(export) = &stmt {
                if let (Some(ExportClause::Namespace(exported)), Some(specifier)) =
                    (&export.export_clause, &export.module_specifier)
                {
                    let local = self.ctx.unique_name(&format!("_{}", sanitize(exported.text())));
                    out.push(Statement::Import(ImportDeclaration {
                        data: NodeData::synthesized(SyntaxKind::ImportDeclaration),
                        import_clause: Some(ImportClause {
                            data: NodeData::synthesized(SyntaxKind::ImportClause),
                            is_type_only: false,
                            name: None,
                            named_bindings: Some(NamedImportBindings::Namespace(factory::identifier(&local))),
                        }),
                        module_specifier: specifier.clone(),
                        attributes: export.attributes.clone(),
                    }));
                    out.push(factory::export_named(vec![(local, exported.text().to_string())]));
                    continue;
                }
            }
            self.visit_statement(&mut stmt);
            out.push(stmt);
        }
        *nodes = out;
    }

    fn visit_expression(&mut self, node: &mut Expression) {
        if is_chain_link(node) {
            self.visit_chain_operands(node);
            *node = match self.split_chain(take(node)) {
                Ok((check, rest)) => factory::conditional(check, factory::void_zero(), rest),
                Err(plain) => plain,
            };
            return;
        }
        if let Expression::PrefixUnary(unary) = node {
            if unary.operator == SyntaxKind::DeleteKeyword && is_chain_link(&unary.operand) {
                self.visit_chain_operands(&mut unary.operand);
                *node = match self.split_chain(take(&mut unary.operand)) {
                    Ok((check, rest)) => factory::conditional(
                        check,
                        factory::boolean(true),
                        factory::prefix(SyntaxKind::DeleteKeyword, rest),
                    ),
                    Err(plain) => factory::prefix(SyntaxKind::DeleteKeyword, plain),
                };
                return;
            }
        }
        visitor_mut::walk_expression(self, node);
        match node {
            Expression::Binary(binary) if binary.operator == SyntaxKind::QuestionQuestionToken => {
                let left = take(&mut binary.left);
                let right = take(&mut binary.right);
                *node = self.lower_coalesce(left, right);
            }
            Expression::BigIntLiteral(n) => {
                self.ctx.cannot_lower(PASS, "a bigint literal", n.data.range);
            }
            _ => {}
        }
    }
}

/// Identifier-safe form of an export name.
fn sanitize(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' || c == '$' { c } else { '_' })
        .collect();
    if factory::is_identifier_name(&cleaned) {
        cleaned
    } else {
        format!("_{}", cleaned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_export_names() {
        assert_eq!(sanitize("ns"), "ns");
        assert_eq!(sanitize("a-b"), "a_b");
        assert_eq!(sanitize("1x"), "_1x");
    }

    #[test]
    fn test_outermost_question_dot_of_plain_member() {
        assert_eq!(outermost_question_dot(&factory::member(factory::ident("a"), "b")), None);
    }
}
