//! Constant folding and dead-branch removal.
//!
//! Only expressions built entirely from literals are folded, so no
//! evaluation order or side effect can change. A removed branch leaves its
//! `var` names behind as a bare `var` declaration, since they are hoisted
//! out of it.

use esforge_ast::visitor::{self, AstVisitor};
use esforge_ast::visitor_mut::{self, AstVisitorMut};
use esforge_ast::*;
use esforge_core::number_to_string;
use serde::Deserialize;

use crate::context::PassContext;
use crate::pass::Pass;
use crate::pipeline::Configurable;
use crate::strip_types::{fold_numbers, to_int32};
use crate::util::{number_value, take, take_statement, var_declarations};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct SimplifyOptions {
    pub fold_constants: bool,
    pub remove_dead_branches: bool,
}

impl Default for SimplifyOptions {
    fn default() -> Self {
        Self {
            fold_constants: true,
            remove_dead_branches: true,
        }
    }
}

#[derive(Debug, Default)]
pub struct Simplify {
    options: SimplifyOptions,
}

impl Configurable for Simplify {
    type Options = SimplifyOptions;

    fn from_options(options: Self::Options) -> Result<Self, String> {
        Ok(Self { options })
    }
}

impl Pass for Simplify {
    fn name(&self) -> &'static str {
        "simplify"
    }

    fn apply(&self, program: &mut Program, _ctx: &mut PassContext) {
        let mut simplifier = Simplifier {
            options: self.options,
            folded: 0,
            removed: 0,
        };
        simplifier.visit_program(program);
        tracing::trace!(folded = simplifier.folded, removed = simplifier.removed, "simplified");
    }
}

/// A literal value known at compile time.
#[derive(Debug, Clone, PartialEq)]
enum Constant {
    Number(f64),
    String(String),
    Boolean(bool),
    Null,
    Undefined,
}

impl Constant {
    fn of(expr: &Expression) -> Option<Constant> {
        match expr {
            Expression::NumericLiteral(n) => Some(Constant::Number(n.value)),
            Expression::StringLiteral(s) => Some(Constant::String(s.value.clone())),
            Expression::Template(t) if t.expressions.is_empty() => expr.as_string_value().map(|s| Constant::String(s.to_string())),
            Expression::Boolean(b) => Some(Constant::Boolean(b.value)),
            Expression::Null(_) => Some(Constant::Null),
            Expression::Parenthesized(p) => Constant::of(&p.expression),
            Expression::PrefixUnary(u) => match (u.operator, &*u.operand) {
                (SyntaxKind::MinusToken, Expression::NumericLiteral(n)) => Some(Constant::Number(-n.value)),
                (SyntaxKind::VoidKeyword, operand) if operand.is_side_effect_free() => Some(Constant::Undefined),
                _ => None,
            },
            _ => None,
        }
    }

    fn is_truthy(&self) -> bool {
        match self {
            Constant::Number(n) => *n != 0.0 && !n.is_nan(),
            Constant::String(s) => !s.is_empty(),
            Constant::Boolean(b) => *b,
            Constant::Null | Constant::Undefined => false,
        }
    }

    fn is_nullish(&self) -> bool {
        matches!(self, Constant::Null | Constant::Undefined)
    }

    fn to_number(&self) -> f64 {
        match self {
            Constant::Number(n) => *n,
            Constant::Boolean(b) => f64::from(u8::from(*b)),
            Constant::Null => 0.0,
            Constant::Undefined => f64::NAN,
            Constant::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    0.0
                } else {
                    trimmed.parse().unwrap_or(f64::NAN)
                }
            }
        }
    }

    fn to_js_string(&self) -> String {
        match self {
            Constant::Number(n) => number_to_string(*n),
            Constant::String(s) => s.clone(),
            Constant::Boolean(b) => b.to_string(),
            Constant::Null => "null".to_string(),
            Constant::Undefined => "undefined".to_string(),
        }
    }

    fn type_of(&self) -> &'static str {
        match self {
            Constant::Number(_) => "number",
            Constant::String(_) => "string",
            Constant::Boolean(_) => "boolean",
            Constant::Null => "object",
            Constant::Undefined => "undefined",
        }
    }

    fn strict_equals(&self, other: &Constant) -> bool {
        self == other
    }

    /// `==`, only where no object conversion can happen.
    fn loose_equals(&self, other: &Constant) -> bool {
        match (self, other) {
            (a, b) if a.is_nullish() || b.is_nullish() => a.is_nullish() && b.is_nullish(),
            (Constant::String(a), Constant::String(b)) => a == b,
            (a, b) => a.to_number() == b.to_number(),
        }
    }

    fn into_expression(self) -> Expression {
        match self {
            Constant::Number(n) => number_value(n),
            Constant::String(s) => factory::string(&s),
            Constant::Boolean(b) => factory::boolean(b),
            Constant::Null => factory::null(),
            Constant::Undefined => factory::void_zero(),
        }
    }
}

/// Result of a numeric fold, unless it has no literal form.
fn finite(value: f64) -> Option<Constant> {
    if !value.is_finite() || (value == 0.0 && value.is_sign_negative()) {
        return None;
    }
    Some(Constant::Number(value))
}

fn fold_binary(left: &Constant, operator: SyntaxKind, right: &Constant) -> Option<Constant> {
    use SyntaxKind::*;
    match operator {
        PlusToken => match (left, right) {
            (Constant::String(_), _) | (_, Constant::String(_)) => {
                Some(Constant::String(left.to_js_string() + &right.to_js_string()))
            }
            (Constant::Number(a), Constant::Number(b)) => finite(a + b),
            _ => None,
        },
        MinusToken | AsteriskToken | SlashToken | PercentToken | AsteriskAsteriskToken | BarToken | AmpersandToken
        | CaretToken | LessThanLessThanToken | GreaterThanGreaterThanToken | GreaterThanGreaterThanGreaterThanToken => {
            match (left, right) {
                (Constant::Number(a), Constant::Number(b)) => fold_numbers(*a, operator, *b).and_then(finite),
                _ => None,
            }
        }
        EqualsEqualsEqualsToken => Some(Constant::Boolean(left.strict_equals(right))),
        ExclamationEqualsEqualsToken => Some(Constant::Boolean(!left.strict_equals(right))),
        EqualsEqualsToken => Some(Constant::Boolean(left.loose_equals(right))),
        ExclamationEqualsToken => Some(Constant::Boolean(!left.loose_equals(right))),
        LessThanToken | GreaterThanToken | LessThanEqualsToken | GreaterThanEqualsToken => {
            let ordering = match (left, right) {
                (Constant::Number(a), Constant::Number(b)) => a.partial_cmp(b),
                (Constant::String(a), Constant::String(b)) => {
                    // JavaScript compares UTF-16 code units.
                    Some(a.encode_utf16().cmp(b.encode_utf16()))
                }
                _ => return None,
            };
            let result = match (operator, ordering) {
                (_, None) => false,
                (LessThanToken, Some(o)) => o.is_lt(),
                (GreaterThanToken, Some(o)) => o.is_gt(),
                (LessThanEqualsToken, Some(o)) => o.is_le(),
                (_, Some(o)) => o.is_ge(),
            };
            Some(Constant::Boolean(result))
        }
        _ => None,
    }
}

fn fold_unary(operator: SyntaxKind, operand: &Constant) -> Option<Constant> {
    match operator {
        SyntaxKind::ExclamationToken => Some(Constant::Boolean(!operand.is_truthy())),
        SyntaxKind::TypeOfKeyword => Some(Constant::String(operand.type_of().to_string())),
        SyntaxKind::PlusToken => finite(operand.to_number()),
        SyntaxKind::TildeToken => match operand {
            Constant::Number(n) => finite(f64::from(!to_int32(*n))),
            _ => None,
        },
        _ => None,
    }
}

/// Names a `var` declaration inside `stmt` hoists out of it.
fn hoisted_var_names(stmt: &Statement) -> Vec<String> {
    struct VarNames(Vec<String>);

    fn binding_names(name: &BindingName, out: &mut Vec<String>) {
        match name {
            BindingName::Identifier(id) => out.push(id.text.clone()),
            BindingName::Object(pattern) => pattern.elements.iter().for_each(|e| binding_names(&e.name, out)),
            BindingName::Array(pattern) => pattern.elements.iter().flatten().for_each(|e| binding_names(&e.name, out)),
        }
    }

    impl VarNames {
        fn list(&mut self, list: &VariableDeclarationList) {
            if list.kind == VariableKind::Var {
                for declaration in &list.declarations {
                    binding_names(&declaration.name, &mut self.0);
                }
            }
        }
    }

    impl AstVisitor for VarNames {
        fn visit_statement(&mut self, node: &Statement) {
            match node {
                Statement::Variable(v) => self.list(&v.declaration_list),
                Statement::For(f) => {
                    if let Some(ForInitializer::Variable(list)) = &f.initializer {
                        self.list(list);
                    }
                }
                Statement::ForIn(f) => {
                    if let ForInitializer::Variable(list) = &f.initializer {
                        self.list(list);
                    }
                }
                Statement::ForOf(f) => {
                    if let ForInitializer::Variable(list) = &f.initializer {
                        self.list(list);
                    }
                }
                _ => {}
            }
            visitor::walk_statement(self, node);
        }

        fn visit_expression(&mut self, _node: &Expression) {}
        fn visit_function(&mut self, _node: &Function) {}
        fn visit_class(&mut self, _node: &Class) {}
    }

    let mut names = VarNames(Vec::new());
    names.visit_statement(stmt);
    let mut seen = rustc_hash::FxHashSet::default();
    names.0.retain(|name| seen.insert(name.clone()));
    names.0
}

struct Simplifier {
    options: SimplifyOptions,
    folded: usize,
    removed: usize,
}

impl Simplifier {
    /// Replacement for a statement whose branch is known, if any.
    fn prune(&mut self, stmt: &mut Statement) -> Option<Vec<Statement>> {
        match stmt {
            Statement::If(if_statement) => {
                let test = Constant::of(&if_statement.condition)?;
                let (kept, dropped) = if test.is_truthy() {
                    (Some(take_statement(&mut if_statement.then_statement)), if_statement.else_statement.take().map(|s| *s))
                } else {
                    (if_statement.else_statement.take().map(|s| *s), Some(take_statement(&mut if_statement.then_statement)))
                };
                let mut out = Vec::new();
                if let Some(dropped) = dropped {
                    let names = hoisted_var_names(&dropped);
                    if !names.is_empty() {
                        out.push(var_declarations(names));
                    }
                }
                out.extend(kept);
                Some(out)
            }
            Statement::While(while_statement) => {
                let test = Constant::of(&while_statement.condition)?;
                if test.is_truthy() {
                    return None;
                }
                let names = hoisted_var_names(&while_statement.statement);
                Some(if names.is_empty() { Vec::new() } else { vec![var_declarations(names)] })
            }
            _ => None,
        }
    }
}

impl AstVisitorMut for Simplifier {
    fn visit_statements(&mut self, nodes: &mut Vec<Statement>) {
        let mut out = Vec::with_capacity(nodes.len());
        for mut stmt in std::mem::take(nodes) {
            self.visit_statement(&mut stmt);
            if self.options.remove_dead_branches {
                if let Some(replacement) = self.prune(&mut stmt) {
                    self.removed += 1;
                    out.extend(replacement);
                    continue;
                }
            }
            out.push(stmt);
        }
        *nodes = out;
    }

    fn visit_expression(&mut self, node: &mut Expression) {
        visitor_mut::walk_expression(self, node);

        if self.options.remove_dead_branches {
            if let Expression::Conditional(conditional) = node {
                if let Some(test) = Constant::of(&conditional.condition) {
                    let kept = if test.is_truthy() {
                        take(&mut conditional.when_true)
                    } else {
                        take(&mut conditional.when_false)
                    };
                    *node = kept;
                    self.removed += 1;
                    return;
                }
            }
        }
        if !self.options.fold_constants {
            return;
        }

        let folded = match node {
            Expression::Binary(binary) => match binary.operator {
                SyntaxKind::AmpersandAmpersandToken | SyntaxKind::BarBarToken | SyntaxKind::QuestionQuestionToken => {
                    let Some(left) = Constant::of(&binary.left) else {
                        return;
                    };
                    let take_left = match binary.operator {
                        SyntaxKind::AmpersandAmpersandToken => !left.is_truthy(),
                        SyntaxKind::BarBarToken => left.is_truthy(),
                        _ => !left.is_nullish(),
                    };
                    Some(if take_left { take(&mut binary.left) } else { take(&mut binary.right) })
                }
                operator => {
                    let (Some(left), Some(right)) = (Constant::of(&binary.left), Constant::of(&binary.right)) else {
                        return;
                    };
                    fold_binary(&left, operator, &right).map(Constant::into_expression)
                }
            },
            Expression::PrefixUnary(unary) => Constant::of(&unary.operand)
                .and_then(|operand| fold_unary(unary.operator, &operand))
                .map(Constant::into_expression),
            _ => None,
        };
        if let Some(folded) = folded {
            *node = folded;
            self.folded += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // === Folding ===

    #[test]
    fn test_fold_arithmetic() {
        let result = fold_binary(&Constant::Number(1.0), SyntaxKind::PlusToken, &Constant::Number(2.0));
        assert_eq!(result, Some(Constant::Number(3.0)));
        let result = fold_binary(&Constant::Number(1.0), SyntaxKind::SlashToken, &Constant::Number(0.0));
        assert_eq!(result, None);
    }

    #[test]
    fn test_fold_string_concatenation() {
        let result = fold_binary(&Constant::String("a".into()), SyntaxKind::PlusToken, &Constant::Number(1.0));
        assert_eq!(result, Some(Constant::String("a1".into())));
    }

    #[test]
    fn test_fold_comparisons() {
        let lt = fold_binary(&Constant::String("a".into()), SyntaxKind::LessThanToken, &Constant::String("b".into()));
        assert_eq!(lt, Some(Constant::Boolean(true)));
        let eq = fold_binary(&Constant::Null, SyntaxKind::EqualsEqualsToken, &Constant::Undefined);
        assert_eq!(eq, Some(Constant::Boolean(true)));
        let strict = fold_binary(&Constant::Null, SyntaxKind::EqualsEqualsEqualsToken, &Constant::Undefined);
        assert_eq!(strict, Some(Constant::Boolean(false)));
    }

    #[test]
    fn test_negative_zero_is_not_folded() {
        let result = fold_binary(&Constant::Number(0.0), SyntaxKind::AsteriskToken, &Constant::Number(-1.0));
        assert_eq!(result, None);
    }

    #[test]
    fn test_fold_unary() {
        assert_eq!(fold_unary(SyntaxKind::ExclamationToken, &Constant::String(String::new())), Some(Constant::Boolean(true)));
        assert_eq!(fold_unary(SyntaxKind::TypeOfKeyword, &Constant::Null), Some(Constant::String("object".into())));
        assert_eq!(fold_unary(SyntaxKind::TildeToken, &Constant::Number(0.0)), Some(Constant::Number(-1.0)));
    }

    // === Options ===

    #[test]
    fn test_options_default_on_and_reject_unknown_keys() {
        let options: SimplifyOptions = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(options.fold_constants && options.remove_dead_branches);
        assert!(serde_json::from_value::<SimplifyOptions>(serde_json::json!({ "inline": true })).is_err());
    }
}
