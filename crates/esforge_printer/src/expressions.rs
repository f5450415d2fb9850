//! Expressions.

use esforge_ast::*;
use esforge_core::number_to_string;
use esforge_parser::OperatorPrecedence;

use crate::precedence::{contains_call, expression_precedence, left_needs_parens, right_needs_parens, starts_with};
use crate::printer::Printer;

impl Printer<'_> {
    /// Print `expr`, parenthesized when it binds looser than `min`.
    pub(crate) fn print_expression(&mut self, expr: &Expression, min: OperatorPrecedence) {
        if expression_precedence(expr) < min {
            self.print_parenthesized(expr);
        } else {
            self.print_expression_raw(expr);
        }
    }

    /// Arguments, initializers and array elements.
    pub(crate) fn print_assignment_expression(&mut self, expr: &Expression) {
        self.print_expression(expr, OperatorPrecedence::Yield);
    }

    fn print_parenthesized(&mut self, expr: &Expression) {
        self.w.write("(");
        self.print_expression_raw(expr);
        self.w.write(")");
    }

    /// Print `expr` without considering its context.
    pub(crate) fn print_expression_raw(&mut self, expr: &Expression) {
        self.w.mark(expr.range(), None);
        match expr {
            Expression::Identifier(id) | Expression::PrivateIdentifier(id) => self.print_identifier(id),
            Expression::This(_) => self.w.write("this"),
            Expression::Super(_) => self.w.write("super"),
            Expression::Null(_) => self.w.write("null"),
            Expression::Boolean(b) => self.w.write(if b.value { "true" } else { "false" }),
            Expression::StringLiteral(s) => self.print_string_literal(s),
            Expression::NumericLiteral(n) => {
                if n.raw.is_none() && n.value.is_sign_negative() && !n.value.is_nan() {
                    self.w.write("-");
                    self.w.write(&number_to_string(-n.value));
                } else {
                    self.print_numeric_literal(n);
                }
            }
            Expression::BigIntLiteral(n) => self.w.write(&n.raw),
            Expression::RegularExpressionLiteral(re) => {
                self.w.write_regex(&format!("/{}/{}", re.pattern, re.flags));
            }
            Expression::Template(template) => self.print_template(template),
            Expression::TaggedTemplate(node) => {
                self.print_expression(&node.tag, OperatorPrecedence::Member);
                self.print_type_arguments(&node.type_arguments);
                self.print_template(&node.template);
            }
            Expression::ArrayLiteral(node) => {
                self.w.write("[");
                for (i, element) in node.elements.iter().enumerate() {
                    if i > 0 {
                        self.comma();
                    }
                    self.print_assignment_expression(element);
                }
                if matches!(node.elements.last(), Some(Expression::Omitted(_))) {
                    self.w.write(",");
                }
                self.w.write("]");
            }
            Expression::ObjectLiteral(node) => self.print_object_literal(node),
            Expression::Function(node) => self.print_function(node, false),
            Expression::Arrow(node) => self.print_arrow(node),
            Expression::Class(node) => self.print_class(node, false),
            Expression::PropertyAccess(node) => {
                self.print_member_object(&node.expression);
                self.w.write(if node.question_dot { "?." } else { "." });
                self.print_identifier(&node.name);
            }
            Expression::ElementAccess(node) => {
                self.print_member_object(&node.expression);
                if node.question_dot {
                    self.w.write("?.");
                }
                self.w.write("[");
                self.print_expression(&node.argument, OperatorPrecedence::Comma);
                self.w.write("]");
            }
            Expression::Call(node) => {
                self.print_member_object(&node.expression);
                if node.question_dot {
                    self.w.write("?.");
                }
                self.print_type_arguments(&node.type_arguments);
                self.print_arguments(&node.arguments);
            }
            Expression::New(node) => {
                self.w.write("new");
                if expression_precedence(&node.expression) < OperatorPrecedence::Member || contains_call(&node.expression) {
                    self.print_parenthesized(&node.expression);
                } else {
                    self.print_expression_raw(&node.expression);
                }
                self.print_type_arguments(&node.type_arguments);
                if let Some(arguments) = &node.arguments {
                    self.print_arguments(arguments);
                }
            }
            Expression::Import(_) => self.w.write("import"),
            Expression::MetaProperty(node) => {
                self.write_token(node.keyword);
                self.w.write(".");
                self.print_identifier(&node.name);
            }
            Expression::Parenthesized(node) => {
                self.w.write("(");
                self.print_expression(&node.expression, OperatorPrecedence::Comma);
                self.w.write(")");
            }
            Expression::PrefixUnary(node) => {
                self.write_token(node.operator);
                self.print_expression(&node.operand, OperatorPrecedence::Unary);
            }
            Expression::PostfixUnary(node) => {
                self.print_expression(&node.operand, OperatorPrecedence::LeftHandSide);
                self.write_token(node.operator);
            }
            Expression::Await(node) => {
                self.w.write("await");
                self.w.space();
                self.print_expression(&node.expression, OperatorPrecedence::Unary);
            }
            Expression::Yield(node) => {
                self.w.write("yield");
                if node.delegate {
                    self.w.write("*");
                }
                if let Some(argument) = &node.expression {
                    self.w.space();
                    self.print_expression(argument, OperatorPrecedence::Yield);
                }
            }
            Expression::Binary(node) => self.print_binary(node),
            Expression::Conditional(node) => {
                self.print_expression(&node.condition, OperatorPrecedence::NullishCoalescing);
                self.w.space();
                self.w.write("?");
                self.w.space();
                self.print_assignment_expression(&node.when_true);
                self.w.space();
                self.w.write(":");
                self.w.space();
                self.print_assignment_expression(&node.when_false);
            }
            Expression::Spread(node) => {
                self.w.write("...");
                self.print_assignment_expression(&node.expression);
            }
            Expression::Omitted(_) | Expression::Missing(_) => {}
            Expression::As(node) => {
                self.print_expression(&node.expression, OperatorPrecedence::Relational);
                self.w.write("as");
                self.print_type(&node.type_node);
            }
            Expression::Satisfies(node) => {
                self.print_expression(&node.expression, OperatorPrecedence::Relational);
                self.w.write("satisfies");
                self.print_type(&node.type_node);
            }
            Expression::TypeAssertion(node) => {
                self.w.write("<");
                self.print_type(&node.type_node);
                self.w.write(">");
                self.print_expression(&node.expression, OperatorPrecedence::Unary);
            }
            Expression::NonNull(node) => {
                self.print_expression(&node.expression, OperatorPrecedence::LeftHandSide);
                self.w.write("!");
            }
            Expression::JsxElement(node) => self.print_jsx_element(node),
            Expression::JsxFragment(node) => self.print_jsx_fragment(node),
        }
    }

    /// Object of a member access or callee of a call.
    fn print_member_object(&mut self, object: &Expression) {
        match object {
            // `new A` without arguments would take the access as its callee.
            Expression::New(node) if node.arguments.is_none() => self.print_parenthesized(object),
            Expression::NumericLiteral(n) if is_plain_integer(n) => {
                self.print_expression_raw(object);
                self.w.hard_space();
            }
            _ => self.print_expression(object, OperatorPrecedence::LeftHandSide),
        }
    }

    fn print_arguments(&mut self, arguments: &[Expression]) {
        self.w.write("(");
        self.comma_list(arguments, |p, argument| p.print_assignment_expression(argument));
        self.w.write(")");
    }

    fn print_binary(&mut self, node: &BinaryExpression) {
        if left_needs_parens(node.operator, &node.left) {
            self.print_parenthesized(&node.left);
        } else {
            self.print_expression_raw(&node.left);
        }
        if node.operator == SyntaxKind::CommaToken {
            self.comma();
        } else {
            self.w.space();
            self.write_token(node.operator);
            self.w.space();
        }
        if right_needs_parens(node.operator, &node.right) {
            self.print_parenthesized(&node.right);
        } else {
            self.print_expression_raw(&node.right);
        }
    }

    pub(crate) fn print_template(&mut self, template: &TemplateLiteral) {
        self.w.write("`");
        for (i, quasi) in template.quasis.iter().enumerate() {
            self.w.write_raw(&quasi.raw);
            if let Some(expr) = template.expressions.get(i) {
                self.w.write_raw("${");
                self.print_expression(expr, OperatorPrecedence::Comma);
                self.w.write_raw("}");
            }
        }
        self.w.write_raw("`");
    }

    fn print_object_literal(&mut self, node: &ObjectLiteralExpression) {
        self.braced_lines(&node.properties, |p, property, last| {
            p.print_object_element(property);
            if !last {
                p.w.write(",");
            }
        });
    }

    fn print_object_element(&mut self, element: &ObjectLiteralElement) {
        self.w.mark(element.data().range, None);
        match element {
            ObjectLiteralElement::Property(node) => {
                self.print_property_name(&node.name);
                self.colon();
                self.print_assignment_expression(&node.initializer);
            }
            ObjectLiteralElement::Shorthand(node) => {
                self.print_identifier(&node.name);
                if let Some(init) = &node.object_assignment_initializer {
                    self.equals();
                    self.print_assignment_expression(init);
                }
            }
            ObjectLiteralElement::Spread(node) => {
                self.w.write("...");
                self.print_assignment_expression(&node.expression);
            }
            ObjectLiteralElement::Method(node) => self.print_method(node),
        }
    }

    fn print_arrow(&mut self, node: &ArrowFunction) {
        if node.is_async {
            self.w.write("async");
            self.w.space();
        }
        self.print_type_parameters(&node.type_parameters);
        if is_bare_parameter(node) {
            self.print_parameter(&node.parameters[0]);
        } else {
            self.print_parameters(&node.parameters);
        }
        self.print_type_annotation(&node.return_type);
        self.w.space();
        self.w.write("=>");
        self.w.space();
        match &node.body {
            ArrowBody::Block(block) => self.print_block(block),
            ArrowBody::Expression(body) => {
                if starts_with(body, &|e| matches!(e, Expression::ObjectLiteral(_))) {
                    self.print_parenthesized(body);
                } else {
                    self.print_assignment_expression(body);
                }
            }
        }
    }
}

/// `x => x` keeps its bare parameter when nothing requires parentheses.
fn is_bare_parameter(node: &ArrowFunction) -> bool {
    if !node.data.flags.contains(NodeFlags::BARE_ARROW_PARAMETER) || node.type_parameters.is_some() {
        return false;
    }
    match node.parameters.as_slice() {
        [param] => {
            matches!(param.name, BindingName::Identifier(_))
                && !param.dot_dot_dot
                && !param.question
                && param.type_annotation.is_none()
                && param.initializer.is_none()
                && param.data.modifier_flags.is_empty()
                && node.return_type.is_none()
        }
        _ => false,
    }
}

/// `1.toString()` does not lex; such literals need a space before the dot.
fn is_plain_integer(n: &NumericLiteral) -> bool {
    let text = Printer::numeric_text(n);
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}
