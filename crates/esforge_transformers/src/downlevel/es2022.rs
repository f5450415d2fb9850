//! ES2022: class fields and static blocks.
//!
//! Instance fields become assignments in the constructor, after `super()`
//! when the class extends another; a constructor is added when the class
//! has none. Static fields and static blocks of a class declaration run
//! after the declaration. Private names, class expressions with static
//! members and top-level `await` are reported.

use esforge_ast::visitor_mut::{self, AstVisitorMut};
use esforge_ast::*;

use super::no_options;
use crate::context::PassContext;
use crate::pass::Pass;
use crate::util::{is_super_call_statement, prologue_length};

const PASS: &str = "es2022";

#[derive(Debug, Default)]
pub struct Es2022;

no_options!(Es2022);

impl Pass for Es2022 {
    fn name(&self) -> &'static str {
        PASS
    }

    fn apply(&self, program: &mut Program, ctx: &mut PassContext) {
        let mut lowering = Lowering {
            ctx,
            trailing: Vec::new(),
            function_depth: 0,
        };
        lowering.visit_program(program);
    }
}

struct Lowering<'a> {
    ctx: &'a mut PassContext,
    /// Statements to place after the class declaration just visited.
    trailing: Vec<Statement>,
    function_depth: u32,
}

/// `this.name` or `this["name"]` for a field key, `None` when the key
/// cannot be moved (computed or private).
fn field_target(object: Expression, name: &PropertyName) -> Option<Expression> {
    match name {
        PropertyName::Identifier(id) => Some(factory::member(object, &id.text)),
        PropertyName::StringLiteral(s) => Some(factory::element(object, factory::string(&s.value))),
        PropertyName::NumericLiteral(n) => Some(factory::element(object, factory::number(n.value))),
        PropertyName::Computed(computed) => match &*computed.expression {
            Expression::StringLiteral(s) => Some(factory::element(object, factory::string(&s.value))),
            Expression::NumericLiteral(n) => Some(factory::element(object, factory::number(n.value))),
            _ => None,
        },
        PropertyName::PrivateIdentifier(_) | PropertyName::BigIntLiteral(_) => None,
    }
}

fn super_expression() -> Expression {
    Expression::Super(NodeData::synthesized(SyntaxKind::SuperKeyword))
}

/// `constructor(...args) { super(...args); }`, or an empty constructor.
fn synthesized_constructor(has_extends: bool) -> ClassElement {
    let mut parameters = Vec::new();
    let mut body = Vec::new();
    if has_extends {
        let mut args = factory::parameter("args");
        args.dot_dot_dot = true;
        parameters.push(args);
        body.push(factory::expression_statement(factory::call(
            super_expression(),
            vec![factory::spread(factory::ident("args"))],
        )));
    }
    let mut function = factory::function(None, parameters, body);
    function.data.kind = SyntaxKind::Constructor;
    ClassElement::Constructor(ConstructorDeclaration {
        data: NodeData::synthesized(SyntaxKind::Constructor),
        function,
    })
}

/// Rewrite `this` to the class name in static initializers.
struct ThisToClass<'a>(&'a str);

impl AstVisitorMut for ThisToClass<'_> {
    fn visit_expression(&mut self, node: &mut Expression) {
        if let Expression::This(_) = node {
            *node = factory::ident(self.0);
            return;
        }
        visitor_mut::walk_expression(self, node);
    }

    fn visit_function(&mut self, _node: &mut Function) {}

    fn visit_class(&mut self, _node: &mut Class) {}
}

impl Lowering<'_> {
    /// Lower the fields of `class`. `name` is the binding static members
    /// are assigned through; `None` for class expressions.
    fn lower_class(&mut self, class: &mut Class, name: Option<&str>) {
        visitor_mut::walk_class(self, class);

        let mut instance = Vec::new();
        let mut statics = Vec::new();
        let mut kept = Vec::with_capacity(class.members.len());
        for member in std::mem::take(&mut class.members) {
            match member {
                ClassElement::Property(mut p) => {
                    let is_static = p.data.has_modifier(ModifierFlags::STATIC);
                    if p.name.is_private() {
                        self.ctx.cannot_lower(PASS, "a private field", p.data.range);
                        kept.push(ClassElement::Property(p));
                        continue;
                    }
                    if is_static && name.is_none() {
                        self.ctx.cannot_lower(PASS, "a static field of a class expression", p.data.range);
                        kept.push(ClassElement::Property(p));
                        continue;
                    }
                    let object = match name {
                        Some(name) if is_static => factory::ident(name),
                        _ => factory::this(),
                    };
                    let Some(target) = field_target(object, &p.name) else {
                        self.ctx.cannot_lower(PASS, "a field with a computed name", p.data.range);
                        kept.push(ClassElement::Property(p));
                        continue;
                    };
                    let mut value = p.initializer.take().unwrap_or_else(factory::void_zero);
                    let assignment = if is_static {
                        if let Some(name) = name {
                            ThisToClass(name).visit_expression(&mut value);
                        }
                        &mut statics
                    } else {
                        &mut instance
                    };
                    assignment.push(factory::expression_statement(factory::assign(target, value)));
                }
                ClassElement::StaticBlock(block) => match name {
                    Some(name) => {
                        let function = factory::function_expression(Vec::new(), block.body.statements);
                        statics.push(factory::expression_statement(factory::call(
                            factory::member(factory::paren(function), "call"),
                            vec![factory::ident(name)],
                        )));
                    }
                    None => {
                        self.ctx.cannot_lower(PASS, "a static block of a class expression", block.data.range);
                        kept.push(ClassElement::StaticBlock(block));
                    }
                },
                ClassElement::Method(m) if m.name.is_private() => {
                    self.ctx.cannot_lower(PASS, "a private method", m.data.range);
                    kept.push(ClassElement::Method(m));
                }
                other => kept.push(other),
            }
        }
        class.members = kept;

        if !instance.is_empty() {
            let has_extends = class.extends.is_some();
            let position = class.members.iter().position(|m| matches!(m, ClassElement::Constructor(_)));
            let index = match position {
                Some(index) => index,
                None => {
                    class.members.insert(0, synthesized_constructor(has_extends));
                    0
                }
            };
            if let ClassElement::Constructor(ctor) = &mut class.members[index] {
                if let Some(body) = &mut ctor.function.body {
                    let at = if has_extends {
                        body.statements
                            .iter()
                            .position(is_super_call_statement)
                            .map_or_else(|| prologue_length(&body.statements), |i| i + 1)
                    } else {
                        prologue_length(&body.statements)
                    };
                    body.statements.splice(at..at, instance);
                }
            }
        }
        self.trailing.extend(statics);
    }
}

impl AstVisitorMut for Lowering<'_> {
    fn visit_statements(&mut self, nodes: &mut Vec<Statement>) {
        let saved = std::mem::take(&mut self.trailing);
        let mut out = Vec::with_capacity(nodes.len());
        for mut stmt in std::mem::take(nodes) {
            self.visit_statement(&mut stmt);
            out.push(stmt);
            out.append(&mut self.trailing);
        }
        *nodes = out;
        self.trailing = saved;
    }

    fn visit_statement(&mut self, node: &mut Statement) {
        match node {
            Statement::Class(class) => {
                let name = match &class.name {
                    Some(name) => name.text.clone(),
                    None => {
                        let name = self.ctx.unique_name("_default");
                        class.name = Some(factory::identifier(&name));
                        name
                    }
                };
                self.lower_class(class, Some(&name));
            }
            _ => visitor_mut::walk_statement(self, node),
        }
    }

    fn visit_class(&mut self, node: &mut Class) {
        self.lower_class(node, None);
    }

    fn visit_function(&mut self, node: &mut Function) {
        self.function_depth += 1;
        visitor_mut::walk_function(self, node);
        self.function_depth -= 1;
    }

    fn visit_arrow_function(&mut self, node: &mut ArrowFunction) {
        self.function_depth += 1;
        visitor_mut::walk_arrow_function(self, node);
        self.function_depth -= 1;
    }

    fn visit_expression(&mut self, node: &mut Expression) {
        match node {
            Expression::Await(n) if self.function_depth == 0 => {
                self.ctx.cannot_lower(PASS, "a top-level await", n.data.range);
            }
            Expression::Binary(n) if n.operator == SyntaxKind::InKeyword => {
                if let Expression::PrivateIdentifier(id) = &*n.left {
                    self.ctx.cannot_lower(PASS, "a private brand check", id.data.range);
                }
            }
            _ => {}
        }
        visitor_mut::walk_expression(self, node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_targets() {
        assert!(matches!(
            field_target(factory::this(), &factory::property_name("x")),
            Some(Expression::PropertyAccess(_))
        ));
        assert!(matches!(
            field_target(factory::this(), &factory::property_name("a-b")),
            Some(Expression::ElementAccess(_))
        ));
    }

    #[test]
    fn test_synthesized_constructor_forwards_arguments() {
        let ClassElement::Constructor(ctor) = synthesized_constructor(true) else {
            panic!("expected a constructor");
        };
        assert!(ctor.function.parameters[0].dot_dot_dot);
        assert!(is_super_call_statement(&ctor.function.body.unwrap().statements[0]));
    }
}
