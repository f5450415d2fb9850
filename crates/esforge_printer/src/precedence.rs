//! Expression precedence and the rules for when a child needs parentheses.

use esforge_ast::{Expression, SyntaxKind};
use esforge_parser::{get_binary_operator_precedence, OperatorPrecedence};

/// Precedence of a binary operator, including assignments and the comma.
pub(crate) fn binary_precedence(operator: SyntaxKind) -> OperatorPrecedence {
    if operator == SyntaxKind::CommaToken {
        OperatorPrecedence::Comma
    } else if operator.is_assignment_operator() {
        OperatorPrecedence::Assignment
    } else {
        get_binary_operator_precedence(operator)
    }
}

/// Precedence of an expression as a whole, as seen by its parent.
pub(crate) fn expression_precedence(expr: &Expression) -> OperatorPrecedence {
    match expr {
        Expression::Binary(n) => binary_precedence(n.operator),
        Expression::Spread(_) | Expression::Arrow(_) => OperatorPrecedence::Assignment,
        Expression::Yield(_) => OperatorPrecedence::Yield,
        Expression::Conditional(_) => OperatorPrecedence::Conditional,
        Expression::As(_) | Expression::Satisfies(_) => OperatorPrecedence::Relational,
        Expression::PrefixUnary(_) | Expression::Await(_) | Expression::TypeAssertion(_) => OperatorPrecedence::Unary,
        Expression::PostfixUnary(_) => OperatorPrecedence::Update,
        Expression::Call(_) => OperatorPrecedence::LeftHandSide,
        Expression::New(n) if n.arguments.is_none() => OperatorPrecedence::LeftHandSide,
        Expression::New(_)
        | Expression::PropertyAccess(_)
        | Expression::ElementAccess(_)
        | Expression::TaggedTemplate(_)
        | Expression::NonNull(_)
        | Expression::MetaProperty(_) => OperatorPrecedence::Member,
        Expression::NumericLiteral(n) if n.raw.is_none() && n.value.is_sign_negative() => OperatorPrecedence::Unary,
        _ => OperatorPrecedence::Primary,
    }
}

/// `a ?? b` cannot be mixed with `||` or `&&` without parentheses.
pub(crate) fn mixes_nullish(operator: SyntaxKind, operand: &Expression) -> bool {
    let Expression::Binary(child) = operand else {
        return false;
    };
    let is_logical = |kind: SyntaxKind| matches!(kind, SyntaxKind::BarBarToken | SyntaxKind::AmpersandAmpersandToken);
    (operator == SyntaxKind::QuestionQuestionToken && is_logical(child.operator))
        || (is_logical(operator) && child.operator == SyntaxKind::QuestionQuestionToken)
}

/// Whether the left operand of a binary expression needs parentheses.
pub(crate) fn left_needs_parens(operator: SyntaxKind, left: &Expression) -> bool {
    let prec = binary_precedence(operator);
    let left_prec = expression_precedence(left);
    if prec == OperatorPrecedence::Assignment {
        return left_prec < OperatorPrecedence::LeftHandSide;
    }
    if operator == SyntaxKind::AsteriskAsteriskToken {
        // `(-a) ** b` and `(a ** b) ** c`.
        return left_prec <= OperatorPrecedence::Exponentiation || left_prec == OperatorPrecedence::Unary;
    }
    left_prec < prec || mixes_nullish(operator, left)
}

/// Whether the right operand of a binary expression needs parentheses.
pub(crate) fn right_needs_parens(operator: SyntaxKind, right: &Expression) -> bool {
    let prec = binary_precedence(operator);
    let right_prec = expression_precedence(right);
    if prec == OperatorPrecedence::Assignment {
        return right_prec < OperatorPrecedence::Yield;
    }
    if operator == SyntaxKind::AsteriskAsteriskToken {
        return right_prec < prec;
    }
    right_prec <= prec || mixes_nullish(operator, right)
}

/// Whether the leftmost token of `expr` satisfies `pred`. Used to keep an
/// expression statement from starting with `{`, `function` or `class`.
pub(crate) fn starts_with(expr: &Expression, pred: &dyn Fn(&Expression) -> bool) -> bool {
    if pred(expr) {
        return true;
    }
    match expr {
        Expression::Binary(n) if !left_needs_parens(n.operator, &n.left) => starts_with(&n.left, pred),
        Expression::Conditional(n) if expression_precedence(&n.condition) > OperatorPrecedence::Conditional => {
            starts_with(&n.condition, pred)
        }
        Expression::Call(n) => starts_with(&n.expression, pred),
        Expression::PropertyAccess(n) => starts_with(&n.expression, pred),
        Expression::ElementAccess(n) => starts_with(&n.expression, pred),
        Expression::TaggedTemplate(n) => starts_with(&n.tag, pred),
        Expression::PostfixUnary(n) => starts_with(&n.operand, pred),
        Expression::NonNull(n) => starts_with(&n.expression, pred),
        Expression::As(n) => starts_with(&n.expression, pred),
        Expression::Satisfies(n) => starts_with(&n.expression, pred),
        _ => false,
    }
}

pub(crate) fn is_statement_ambiguous(expr: &Expression) -> bool {
    matches!(
        expr,
        Expression::ObjectLiteral(_) | Expression::Function(_) | Expression::Class(_)
    )
}

/// `new a.b()()` would apply `new` to the call; the callee must not contain one.
pub(crate) fn contains_call(expr: &Expression) -> bool {
    match expr {
        Expression::Call(_) => true,
        Expression::PropertyAccess(n) => contains_call(&n.expression),
        Expression::ElementAccess(n) => contains_call(&n.expression),
        Expression::TaggedTemplate(n) => contains_call(&n.tag),
        Expression::NonNull(n) => contains_call(&n.expression),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use esforge_ast::factory;

    #[test]
    fn test_multiplication_inside_addition_needs_no_parens() {
        let product = factory::binary(factory::ident("a"), SyntaxKind::AsteriskToken, factory::ident("b"));
        assert!(!right_needs_parens(SyntaxKind::PlusToken, &product));
        let sum = factory::binary(factory::ident("a"), SyntaxKind::PlusToken, factory::ident("b"));
        assert!(right_needs_parens(SyntaxKind::AsteriskToken, &sum));
        assert!(right_needs_parens(SyntaxKind::MinusToken, &sum));
        assert!(!left_needs_parens(SyntaxKind::MinusToken, &sum));
    }

    #[test]
    fn test_exponent_is_right_associative() {
        let pow = factory::binary(factory::ident("a"), SyntaxKind::AsteriskAsteriskToken, factory::ident("b"));
        assert!(left_needs_parens(SyntaxKind::AsteriskAsteriskToken, &pow));
        assert!(!right_needs_parens(SyntaxKind::AsteriskAsteriskToken, &pow));
        let neg = factory::prefix(SyntaxKind::MinusToken, factory::ident("a"));
        assert!(left_needs_parens(SyntaxKind::AsteriskAsteriskToken, &neg));
    }

    #[test]
    fn test_nullish_mixing() {
        let or = factory::binary(factory::ident("a"), SyntaxKind::BarBarToken, factory::ident("b"));
        assert!(left_needs_parens(SyntaxKind::QuestionQuestionToken, &or));
    }

    #[test]
    fn test_statement_start() {
        let call = factory::call(factory::member(factory::object(Vec::new()), "x"), Vec::new());
        assert!(starts_with(&call, &is_statement_ambiguous));
        let call = factory::call(factory::ident("f"), vec![factory::object(Vec::new())]);
        assert!(!starts_with(&call, &is_statement_ambiguous));
    }
}
