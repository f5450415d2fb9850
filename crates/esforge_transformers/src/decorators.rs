//! Legacy (experimental) decorators.
//!
//! `@dec class C { @m method() {} }` becomes
//!
//! ```text
//! let C = class C { method() {} };
//! __decorate([m], C.prototype, "method", null);
//! C = __decorate([dec], C);
//! ```
//!
//! Parameter decorators are wrapped in `__param(index, dec)`; those of the
//! constructor join the class decorators.

use esforge_ast::visitor_mut::{self, AstVisitorMut};
use esforge_ast::*;
use serde::Deserialize;

use crate::context::PassContext;
use crate::helpers::{self, Helper};
use crate::pass::Pass;
use crate::pipeline::Configurable;

const PASS: &str = "decorators";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct DecoratorsOptions {
    /// Inject `__decorate`/`__param` definitions. Off when the host
    /// provides them (for example through a helper library import).
    pub emit_helpers: bool,
}

impl Default for DecoratorsOptions {
    fn default() -> Self {
        Self { emit_helpers: true }
    }
}

#[derive(Debug, Default)]
pub struct Decorators {
    options: DecoratorsOptions,
}

impl Decorators {
    pub fn new(options: DecoratorsOptions) -> Self {
        Self { options }
    }
}

impl Configurable for Decorators {
    type Options = DecoratorsOptions;

    fn from_options(options: Self::Options) -> Result<Self, String> {
        Ok(Self::new(options))
    }
}

impl Pass for Decorators {
    fn name(&self) -> &'static str {
        PASS
    }

    fn apply(&self, program: &mut Program, ctx: &mut PassContext) {
        let mut lowering = Lowering {
            ctx,
            uses_decorate: false,
            uses_param: false,
        };
        lowering.visit_program(program);
        if !self.options.emit_helpers {
            return;
        }
        let mut needed = Vec::new();
        if lowering.uses_decorate {
            needed.push(Helper::Decorate);
        }
        if lowering.uses_param {
            needed.push(Helper::Param);
        }
        helpers::inject(program, &needed);
    }
}

fn has_parameter_decorators(function: &Function) -> bool {
    function.parameters.iter().any(|p| !p.decorators.is_empty())
}

fn is_decorated(class: &Class) -> bool {
    !class.decorators.is_empty()
        || class.members.iter().any(|member| match member {
            ClassElement::Property(p) => !p.decorators.is_empty(),
            ClassElement::Method(m) => !m.decorators.is_empty() || has_parameter_decorators(&m.function),
            ClassElement::Constructor(c) => has_parameter_decorators(&c.function),
            _ => false,
        })
}

/// Property key as the third `__decorate` argument.
fn member_key(name: &PropertyName) -> Option<Expression> {
    match name {
        PropertyName::Identifier(id) => Some(factory::string(&id.text)),
        PropertyName::StringLiteral(s) => Some(factory::string(&s.value)),
        PropertyName::NumericLiteral(n) => Some(factory::number(n.value)),
        PropertyName::Computed(computed) => match &*computed.expression {
            Expression::StringLiteral(s) => Some(factory::string(&s.value)),
            Expression::NumericLiteral(n) => Some(factory::number(n.value)),
            _ => None,
        },
        PropertyName::PrivateIdentifier(_) | PropertyName::BigIntLiteral(_) => None,
    }
}

struct Lowering<'a> {
    ctx: &'a mut PassContext,
    uses_decorate: bool,
    uses_param: bool,
}

impl Lowering<'_> {
    fn decorate(&mut self, decorators: Vec<Expression>, target: Expression, key: Option<Expression>) -> Expression {
        self.uses_decorate = true;
        let mut arguments = vec![factory::array(decorators), target];
        if let Some(key) = key {
            arguments.push(key);
        }
        factory::call(factory::ident(Helper::Decorate.name()), arguments)
    }

    /// Take parameter decorators off `function` as `__param(i, dec)` calls.
    fn take_parameter_decorators(&mut self, function: &mut Function) -> Vec<Expression> {
        let mut out = Vec::new();
        for (index, parameter) in function.parameters.iter_mut().enumerate() {
            for decorator in std::mem::take(&mut parameter.decorators) {
                self.uses_param = true;
                out.push(factory::call(
                    factory::ident(Helper::Param.name()),
                    vec![factory::number(index as f64), decorator.expression],
                ));
            }
        }
        out
    }

    /// `__decorate` statements for the decorated members of `class`.
    fn lower_members(&mut self, class: &mut Class, name: &str) -> Vec<Statement> {
        let mut statements = Vec::new();
        for member in &mut class.members {
            let (name_of, range) = match member {
                ClassElement::Property(p) if !p.decorators.is_empty() => (&p.name, p.data.range),
                ClassElement::Method(m) if !m.decorators.is_empty() || has_parameter_decorators(&m.function) => {
                    (&m.name, m.data.range)
                }
                _ => continue,
            };
            let Some(key) = member_key(name_of) else {
                self.ctx.unsupported(PASS, "a decorator on a member with a computed name", range);
                continue;
            };
            let (decorators, is_static, descriptor) = match member {
                ClassElement::Property(p) => (
                    std::mem::take(&mut p.decorators).into_iter().map(|d| d.expression).collect(),
                    p.data.has_modifier(ModifierFlags::STATIC),
                    factory::void_zero(),
                ),
                ClassElement::Method(m) => {
                    let mut decorators: Vec<Expression> =
                        std::mem::take(&mut m.decorators).into_iter().map(|d| d.expression).collect();
                    decorators.extend(self.take_parameter_decorators(&mut m.function));
                    (decorators, m.data.has_modifier(ModifierFlags::STATIC), factory::null())
                }
                _ => continue,
            };
            let target = if is_static {
                factory::ident(name)
            } else {
                factory::member(factory::ident(name), "prototype")
            };
            let mut call = self.decorate(decorators, target, Some(key));
            if let Expression::Call(c) = &mut call {
                c.arguments.push(descriptor);
            }
            statements.push(factory::expression_statement(call));
        }
        statements
    }

    /// Lower one decorated class declaration into the statements replacing it.
    fn lower_class(&mut self, mut class: Box<Class>) -> Vec<Statement> {
        let modifiers = class.data.modifier_flags;
        let name = match &class.name {
            Some(name) => name.text.clone(),
            None => {
                let name = self.ctx.unique_name("default_1");
                class.name = Some(factory::identifier(&name));
                name
            }
        };

        let mut class_decorators: Vec<Expression> =
            std::mem::take(&mut class.decorators).into_iter().map(|d| d.expression).collect();
        for member in &mut class.members {
            if let ClassElement::Constructor(c) = member {
                let params = self.take_parameter_decorators(&mut c.function);
                class_decorators.extend(params);
            }
        }
        let member_statements = self.lower_members(&mut class, &name);

        if class_decorators.is_empty() {
            let mut out = vec![Statement::Class(class)];
            out.extend(member_statements);
            return out;
        }

        class.data.modifier_flags.remove(ModifierFlags::EXPORT_DEFAULT);
        class.data.kind = SyntaxKind::ClassExpression;
        let mut out = vec![factory::declare(VariableKind::Let, &name, Some(Expression::Class(class)))];
        out.extend(member_statements);
        let decorated = self.decorate(class_decorators, factory::ident(&name), None);
        out.push(factory::expression_statement(factory::assign(factory::ident(&name), decorated)));
        if modifiers.contains(ModifierFlags::EXPORT_DEFAULT) {
            out.push(Statement::ExportAssignment(ExportAssignment {
                data: NodeData::synthesized(SyntaxKind::ExportAssignment),
                is_export_equals: false,
                expression: factory::ident(&name),
            }));
        } else if modifiers.contains(ModifierFlags::EXPORT) {
            out.push(factory::export_named(vec![(name.clone(), name)]));
        }
        out
    }
}

impl AstVisitorMut for Lowering<'_> {
    fn visit_statements(&mut self, nodes: &mut Vec<Statement>) {
        for stmt in nodes.iter_mut() {
            self.visit_statement(stmt);
        }
        if !nodes.iter().any(|s| matches!(s, Statement::Class(c) if is_decorated(c))) {
            return;
        }
        let statements = std::mem::take(nodes);
        for stmt in statements {
            match stmt {
                Statement::Class(class) if is_decorated(&class) => {
                    let lowered = self.lower_class(class);
                    nodes.extend(lowered);
                }
                other => nodes.push(other),
            }
        }
    }

    fn visit_expression(&mut self, node: &mut Expression) {
        if let Expression::Class(class) = node {
            if is_decorated(class) {
                self.ctx.unsupported(PASS, "a decorated class expression", class.data.range);
            }
        }
        visitor_mut::walk_expression(self, node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_key_forms() {
        assert!(matches!(member_key(&factory::property_name("m")), Some(Expression::StringLiteral(_))));
        let computed = PropertyName::Computed(ComputedPropertyName {
            data: NodeData::synthesized(SyntaxKind::ComputedPropertyName),
            expression: Box::new(factory::ident("k")),
        });
        assert!(member_key(&computed).is_none());
    }

    #[test]
    fn test_helpers_on_by_default() {
        assert!(DecoratorsOptions::default().emit_helpers);
    }
}
