//! ES2015: the syntax ES5 engines reject that has a direct ES5 form.
//!
//! Arrow functions become function expressions with `this` and
//! `arguments` saved in the enclosing function. Template literals become
//! string concatenation. Shorthand properties, methods and computed keys
//! in object literals become plain properties and assignments. `let` and
//! `const` become `var`, renamed where hoisting would make two bindings
//! collide. Default and rest parameters move into the body and spread
//! arguments become `apply`/`concat` calls.
//!
//! Classes, destructuring, generators, `for...of` and tagged templates have
//! no such form and are reported.

use esforge_ast::visitor::{self, AstVisitor};
use esforge_ast::visitor_mut::{self, AstVisitorMut};
use esforge_ast::*;
use esforge_core::text::TextRange;
use esforge_binder::{BindingId, BindingKind, ScopeId, ScopeTree};
use rustc_hash::{FxHashMap, FxHashSet};

use super::no_options;
use crate::context::PassContext;
use crate::pass::Pass;
use crate::util::{into_block, prepend_statements, prepend_to_arrow, reuse, take, HoistedTemps};

const PASS: &str = "es2015";

#[derive(Debug, Default)]
pub struct Es2015;

no_options!(Es2015);

impl Pass for Es2015 {
    fn name(&self) -> &'static str {
        PASS
    }

    fn needs_scopes(&self) -> bool {
        true
    }

    fn apply(&self, program: &mut Program, ctx: &mut PassContext) {
        let scopes = ctx.take_scopes();
        let renames = match &scopes {
            Some(scopes) => plan_renames(scopes, ctx),
            None => FxHashMap::default(),
        };
        let mut lowering = Lowering {
            ctx,
            scopes,
            renames,
            frames: Vec::new(),
            temps: HoistedTemps::default(),
            pattern_depth: 0,
        };
        lowering.visit_program(program);
    }
}

/// Whether `scope` is `ancestor` or nested in it.
fn is_within(scopes: &ScopeTree, scope: ScopeId, ancestor: ScopeId) -> bool {
    let mut current = Some(scope);
    while let Some(id) = current {
        if id == ancestor {
            return true;
        }
        current = scopes.scope(id).parent;
    }
    false
}

/// New names for block-scoped bindings that would clash once hoisted to
/// their function: with another binding of that function, or with an outer
/// binding the function reads.
fn plan_renames(scopes: &ScopeTree, ctx: &mut PassContext) -> FxHashMap<BindingId, String> {
    let is_block_scoped =
        |kind: BindingKind, scope: ScopeId| matches!(kind, BindingKind::Let | BindingKind::Const) && !scopes.scope(scope).kind.is_var_scope();

    let mut claimed: FxHashSet<(ScopeId, &str)> = FxHashSet::default();
    for binding in scopes.bindings() {
        if !is_block_scoped(binding.kind, binding.scope) {
            claimed.insert((scopes.var_scope_of(binding.scope), &binding.name));
        }
    }

    let mut renames = FxHashMap::default();
    for binding in scopes.bindings() {
        if !is_block_scoped(binding.kind, binding.scope) {
            continue;
        }
        let var_scope = scopes.var_scope_of(binding.scope);
        let reads_outer = scopes.references().iter().any(|r| {
            r.name == binding.name
                && is_within(scopes, r.scope, var_scope)
                && match r.resolution.binding() {
                    None => true,
                    Some(id) => !is_within(scopes, scopes.binding(id).scope, var_scope),
                }
        });
        if reads_outer || !claimed.insert((var_scope, &binding.name)) {
            renames.insert(binding.id, ctx.unique_name(&binding.name));
        }
    }
    renames
}

/// Names saved for arrow functions inside one non-arrow function.
#[derive(Default)]
struct Frame {
    this_name: Option<String>,
    arguments_name: Option<String>,
    arrow_depth: u32,
}

struct Lowering<'a> {
    ctx: &'a mut PassContext,
    scopes: Option<ScopeTree>,
    renames: FxHashMap<BindingId, String>,
    frames: Vec<Frame>,
    temps: HoistedTemps,
    /// Inside an assignment pattern, where literals are targets.
    pattern_depth: u32,
}

/// Finds closures in a loop body that read one of the loop's bindings.
struct ClosureCapture<'a> {
    names: &'a [String],
    function_depth: u32,
    found: bool,
}

impl AstVisitor for ClosureCapture<'_> {
    fn visit_function(&mut self, node: &Function) {
        self.function_depth += 1;
        visitor::walk_function(self, node);
        self.function_depth -= 1;
    }

    fn visit_arrow_function(&mut self, node: &ArrowFunction) {
        self.function_depth += 1;
        visitor::walk_arrow_function(self, node);
        self.function_depth -= 1;
    }

    fn visit_identifier_reference(&mut self, node: &Identifier) {
        if self.function_depth > 0 && self.names.contains(&node.text) {
            self.found = true;
        }
    }
}

fn declared_names(list: &VariableDeclarationList) -> Vec<String> {
    list.declarations
        .iter()
        .filter_map(|d| d.name.as_identifier().map(|id| id.text.clone()))
        .collect()
}

/// `[a, ...b, c]` as `[a].concat(b, [c])`.
fn concat_spread(elements: Vec<Expression>) -> Expression {
    let mut parts = Vec::new();
    let mut pending = Vec::new();
    for element in elements {
        match element {
            Expression::Spread(spread) => {
                if !pending.is_empty() {
                    parts.push(factory::array(std::mem::take(&mut pending)));
                }
                parts.push(*spread.expression);
            }
            other => pending.push(other),
        }
    }
    if !pending.is_empty() {
        parts.push(factory::array(pending));
    }
    let base = if matches!(parts.first(), Some(Expression::ArrayLiteral(_))) {
        parts.remove(0)
    } else {
        factory::array(Vec::new())
    };
    factory::call(factory::member(base, "concat"), parts)
}

fn has_spread(elements: &[Expression]) -> bool {
    elements.iter().any(|e| matches!(e, Expression::Spread(_)))
}

/// Template literal as `"a" + b + "c"`.
fn concatenate(template: TemplateLiteral) -> Expression {
    let mut quasis = template.quasis.into_iter().map(|q| q.cooked.unwrap_or(q.raw));
    let head = quasis.next().unwrap_or_default();
    let mut result = factory::string(&head);
    for (expr, quasi) in template.expressions.into_iter().zip(quasis) {
        let operand = match expr {
            Expression::Binary(_) | Expression::Conditional(_) | Expression::Yield(_) | Expression::Arrow(_) => {
                factory::paren(expr)
            }
            other => other,
        };
        result = factory::binary(result, SyntaxKind::PlusToken, operand);
        if !quasi.is_empty() {
            result = factory::binary(result, SyntaxKind::PlusToken, factory::string(&quasi));
        }
    }
    result
}

/// Write target for a property of `object` named `name`.
fn property_target(object: Expression, name: PropertyName) -> Expression {
    match name {
        PropertyName::Identifier(id) => factory::member(object, &id.text),
        PropertyName::StringLiteral(s) => factory::element(object, factory::string(&s.value)),
        PropertyName::NumericLiteral(n) => factory::element(object, factory::number(n.value)),
        PropertyName::Computed(computed) => factory::element(object, *computed.expression),
        PropertyName::PrivateIdentifier(id) => factory::member(object, &id.text),
        PropertyName::BigIntLiteral(b) => factory::element(object, Expression::BigIntLiteral(b)),
    }
}

impl Lowering<'_> {
    fn frame(&mut self) -> Option<&mut Frame> {
        self.frames.last_mut()
    }

    fn in_arrow(&self) -> bool {
        self.frames.last().is_some_and(|f| f.arrow_depth > 0)
    }

    fn captured_this(&mut self) -> String {
        if let Some(name) = self.frames.last().and_then(|f| f.this_name.clone()) {
            return name;
        }
        let name = self.ctx.unique_name("_this");
        if let Some(frame) = self.frame() {
            frame.this_name = Some(name.clone());
        }
        name
    }

    fn captured_arguments(&mut self) -> String {
        if let Some(name) = self.frames.last().and_then(|f| f.arguments_name.clone()) {
            return name;
        }
        let name = self.ctx.unique_name("_arguments");
        if let Some(frame) = self.frame() {
            frame.arguments_name = Some(name.clone());
        }
        name
    }

    /// `var _this = this, _arguments = arguments;` for the frame being left.
    fn frame_captures(frame: Frame) -> Vec<Statement> {
        let mut declarations = Vec::new();
        if let Some(name) = frame.this_name {
            declarations.push(factory::variable_declaration(
                BindingName::Identifier(factory::identifier(&name)),
                Some(factory::this()),
            ));
        }
        if let Some(name) = frame.arguments_name {
            declarations.push(factory::variable_declaration(
                BindingName::Identifier(factory::identifier(&name)),
                Some(factory::ident("arguments")),
            ));
        }
        if declarations.is_empty() {
            Vec::new()
        } else {
            vec![factory::variable_statement(VariableKind::Var, declarations)]
        }
    }

    fn rename(&self, node: &mut Identifier) {
        let Some(scopes) = &self.scopes else {
            return;
        };
        if let Some(name) = scopes.binding_of(node.id).and_then(|id| self.renames.get(&id)) {
            node.text = name.clone();
        }
    }

    /// Move default and rest parameters into statements for the body.
    fn lower_parameters(&mut self, parameters: &mut Vec<Parameter>) -> Vec<Statement> {
        let mut body = Vec::new();
        let mut index = 0;
        while index < parameters.len() {
            let parameter = &mut parameters[index];
            let Some(name) = parameter.name.as_identifier().map(|id| id.text.clone()) else {
                self.ctx.cannot_lower(PASS, "a destructuring parameter", parameter.data.range);
                index += 1;
                continue;
            };
            if parameter.dot_dot_dot {
                let slice = factory::call(
                    factory::member(
                        factory::member(factory::member(factory::ident("Array"), "prototype"), "slice"),
                        "call",
                    ),
                    vec![factory::ident("arguments"), factory::number(index as f64)],
                );
                body.push(factory::declare(VariableKind::Var, &name, Some(slice)));
                parameters.truncate(index);
                break;
            }
            if let Some(initializer) = parameter.initializer.take() {
                let check = factory::binary(factory::ident(&name), SyntaxKind::EqualsEqualsEqualsToken, factory::void_zero());
                let assign = factory::expression_statement(factory::assign(factory::ident(&name), initializer));
                body.push(factory::if_statement(check, Statement::Block(factory::block(vec![assign])), None));
            }
            index += 1;
        }
        body
    }

    fn lower_variable_kind(&mut self, list: &mut VariableDeclarationList) {
        if matches!(list.kind, VariableKind::Let | VariableKind::Const) {
            list.kind = VariableKind::Var;
        }
    }

    /// Reports a `for` loop whose block-scoped bindings closures capture:
    /// with `var`, every closure would see the last value.
    fn check_loop_capture(&mut self, initializer: Option<&ForInitializer>, body: &Statement, range: TextRange) {
        let Some(ForInitializer::Variable(list)) = initializer else {
            return;
        };
        if !matches!(list.kind, VariableKind::Let | VariableKind::Const) {
            return;
        }
        let names = declared_names(list);
        let mut capture = ClosureCapture {
            names: &names,
            function_depth: 0,
            found: false,
        };
        capture.visit_statement(body);
        if capture.found {
            self.ctx.cannot_lower(PASS, "a loop binding captured by a closure", range);
        }
    }

    /// `(_a = { a: 1 }, _a[k] = v, _a)` for a literal with computed keys.
    fn lower_computed_keys(&mut self, properties: Vec<ObjectLiteralElement>) -> Result<Expression, Vec<ObjectLiteralElement>> {
        let first_computed = properties.iter().position(|p| {
            matches!(
                p,
                ObjectLiteralElement::Property(PropertyAssignment { name: PropertyName::Computed(_), .. })
                    | ObjectLiteralElement::Method(MethodDeclaration { name: PropertyName::Computed(_), .. })
            )
        });
        let Some(first_computed) = first_computed else {
            return Err(properties);
        };
        if let Some(accessor) = properties[first_computed..].iter().find_map(|p| match p {
            ObjectLiteralElement::Property(_) => None,
            other => Some(other.data().range),
        }) {
            self.ctx.cannot_lower(PASS, "an accessor after a computed property name", accessor);
            return Err(properties);
        }

        let temp = self.ctx.temp_name();
        self.temps.declare(&temp);
        let mut properties = properties;
        let rest = properties.split_off(first_computed);
        let mut expressions = vec![factory::assign(factory::ident(&temp), factory::object(properties))];
        for property in rest {
            if let ObjectLiteralElement::Property(p) = property {
                expressions.push(factory::assign(property_target(factory::ident(&temp), p.name), p.initializer));
            }
        }
        expressions.push(factory::ident(&temp));
        Ok(factory::paren(factory::comma(expressions)))
    }

    /// `f(...a)` as `f.apply(void 0, a)`, keeping the receiver of a method.
    fn lower_spread_call(&mut self, callee: Expression, arguments: Vec<Expression>) -> Expression {
        let arguments = match <[Expression; 1]>::try_from(arguments) {
            Ok([Expression::Spread(spread)]) => *spread.expression,
            Ok([other]) => concat_spread(vec![other]),
            Err(arguments) => concat_spread(arguments),
        };
        let (callee, this_arg) = match callee {
            Expression::PropertyAccess(mut access) => {
                let (first, again) = reuse(*access.expression, self.ctx, &mut self.temps);
                access.expression = Box::new(first);
                (Expression::PropertyAccess(access), again)
            }
            Expression::ElementAccess(mut access) => {
                let (first, again) = reuse(*access.expression, self.ctx, &mut self.temps);
                access.expression = Box::new(first);
                (Expression::ElementAccess(access), again)
            }
            other => (other, factory::void_zero()),
        };
        factory::call(factory::member(callee, "apply"), vec![this_arg, arguments])
    }
}

impl AstVisitorMut for Lowering<'_> {
    fn visit_program(&mut self, node: &mut Program) {
        self.frames.push(Frame::default());
        self.temps.enter();
        visitor_mut::walk_program(self, node);
        self.temps.exit_into(&mut node.statements);
        if let Some(frame) = self.frames.pop() {
            prepend_statements(&mut node.statements, Self::frame_captures(frame));
        }
    }

    fn visit_function(&mut self, node: &mut Function) {
        if node.is_generator {
            self.ctx.cannot_lower(PASS, "a generator function", node.data.range);
        }
        self.frames.push(Frame::default());
        self.temps.enter();
        visitor_mut::walk_function(self, node);
        let prologue = self.lower_parameters(&mut node.parameters);
        let frame = self.frames.pop().unwrap_or_default();
        match &mut node.body {
            Some(body) => {
                prepend_statements(&mut body.statements, prologue);
                prepend_statements(&mut body.statements, Self::frame_captures(frame));
                self.temps.exit_into(&mut body.statements);
            }
            None => {
                self.temps.exit();
            }
        }
    }

    fn visit_arrow_function(&mut self, node: &mut ArrowFunction) {
        if let Some(frame) = self.frame() {
            frame.arrow_depth += 1;
        }
        self.temps.enter();
        visitor_mut::walk_arrow_function(self, node);
        let prologue = self.lower_parameters(&mut node.parameters);
        prepend_to_arrow(node, prologue);
        self.temps.exit_into_arrow(node);
        if let Some(frame) = self.frame() {
            frame.arrow_depth -= 1;
        }
    }

    fn visit_class(&mut self, node: &mut Class) {
        self.ctx.cannot_lower(PASS, "a class", node.data.range);
        visitor_mut::walk_class(self, node);
    }

    fn visit_statement(&mut self, node: &mut Statement) {
        match node {
            Statement::Variable(statement) => self.lower_variable_kind(&mut statement.declaration_list),
            Statement::For(for_statement) => {
                self.check_loop_capture(for_statement.initializer.as_ref(), &for_statement.statement, for_statement.data.range);
                if let Some(ForInitializer::Variable(list)) = &mut for_statement.initializer {
                    self.lower_variable_kind(list);
                }
            }
            Statement::ForIn(for_in) => {
                self.check_loop_capture(Some(&for_in.initializer), &for_in.statement, for_in.data.range);
                if let ForInitializer::Variable(list) = &mut for_in.initializer {
                    self.lower_variable_kind(list);
                }
            }
            Statement::ForOf(for_of) => {
                self.ctx.cannot_lower(PASS, "a for...of loop", for_of.data.range);
            }
            _ => {}
        }
        visitor_mut::walk_statement(self, node);
    }

    fn visit_variable_declaration(&mut self, node: &mut VariableDeclaration) {
        if !matches!(node.name, BindingName::Identifier(_)) {
            self.ctx.cannot_lower(PASS, "a destructuring declaration", node.data.range);
        }
        visitor_mut::walk_variable_declaration(self, node);
    }

    fn visit_binding_identifier(&mut self, node: &mut Identifier) {
        self.rename(node);
    }

    fn visit_identifier_reference(&mut self, node: &mut Identifier) {
        self.rename(node);
    }

    fn visit_object_literal_element(&mut self, node: &mut ObjectLiteralElement) {
        if self.pattern_depth == 0 {
            if let ObjectLiteralElement::Shorthand(shorthand) = node {
                if shorthand.object_assignment_initializer.is_none() {
                    *node = ObjectLiteralElement::Property(PropertyAssignment {
                        data: NodeData::synthesized(SyntaxKind::PropertyAssignment),
                        name: PropertyName::Identifier(factory::identifier(&shorthand.name.text)),
                        initializer: Expression::Identifier(shorthand.name.clone()),
                    });
                }
            }
        }
        visitor_mut::walk_object_literal_element(self, node);
        if let ObjectLiteralElement::Method(method) = node {
            if method.kind == MethodKind::Method {
                let mut function = method.function.clone();
                function.data.kind = SyntaxKind::FunctionExpression;
                *node = ObjectLiteralElement::Property(PropertyAssignment {
                    data: NodeData::synthesized(SyntaxKind::PropertyAssignment),
                    name: method.name.clone(),
                    initializer: Expression::Function(Box::new(function)),
                });
            }
        }
    }

    fn visit_expression(&mut self, node: &mut Expression) {
        match node {
            Expression::This(_) if self.in_arrow() => {
                *node = factory::ident(&self.captured_this());
                return;
            }
            Expression::Identifier(id) if id.text == "arguments" && self.in_arrow() => {
                let local = self.scopes.as_ref().and_then(|s| s.resolve_reference(id.id));
                if local.is_none() {
                    *node = factory::ident(&self.captured_arguments());
                    return;
                }
            }
            Expression::Super(data) if self.in_arrow() => {
                self.ctx.cannot_lower(PASS, "super in an arrow function", data.range);
            }
            Expression::MetaProperty(meta) if self.in_arrow() => {
                self.ctx.cannot_lower(PASS, "new.target in an arrow function", meta.data.range);
            }
            Expression::Binary(binary)
                if binary.operator == SyntaxKind::EqualsToken
                    && matches!(
                        binary.left.skip_outer_expressions(),
                        Expression::ArrayLiteral(_) | Expression::ObjectLiteral(_)
                    ) =>
            {
                self.ctx.cannot_lower(PASS, "a destructuring assignment", binary.data.range);
                self.pattern_depth += 1;
                self.visit_expression(&mut binary.left);
                self.pattern_depth -= 1;
                self.visit_expression(&mut binary.right);
                return;
            }
            Expression::TaggedTemplate(tagged) => {
                self.ctx.cannot_lower(PASS, "a tagged template", tagged.data.range);
            }
            Expression::RegularExpressionLiteral(regex) => {
                if let Some(flag) = regex.flags.chars().find(|c| matches!(c, 'u' | 'y')) {
                    let what = format!("the regular expression flag '{}'", flag);
                    self.ctx.cannot_lower(PASS, &what, regex.data.range);
                }
            }
            _ => {}
        }

        visitor_mut::walk_expression(self, node);

        match node {
            Expression::Arrow(_) => {
                if let Expression::Arrow(arrow) = take(node) {
                    let body = into_block(arrow.body);
                    let mut function = factory::function(None, arrow.parameters, body.statements);
                    function.is_async = arrow.is_async;
                    function.data.range = arrow.data.range;
                    *node = Expression::Function(Box::new(function));
                }
            }
            Expression::Template(_) => {
                if let Expression::Template(template) = take(node) {
                    *node = concatenate(template);
                }
            }
            Expression::ObjectLiteral(object) if self.pattern_depth == 0 => {
                let properties = std::mem::take(&mut object.properties);
                match self.lower_computed_keys(properties) {
                    Ok(lowered) => *node = lowered,
                    Err(properties) => object.properties = properties,
                }
            }
            Expression::ArrayLiteral(array) if self.pattern_depth == 0 && has_spread(&array.elements) => {
                let elements = std::mem::take(&mut array.elements);
                *node = concat_spread(elements);
            }
            Expression::Call(call) if has_spread(&call.arguments) => {
                if matches!(*call.expression, Expression::Super(_)) {
                    return;
                }
                let callee = take(&mut call.expression);
                let arguments = std::mem::take(&mut call.arguments);
                *node = self.lower_spread_call(callee, arguments);
            }
            Expression::New(new_expression) => {
                if new_expression.arguments.as_deref().is_some_and(has_spread) {
                    self.ctx.cannot_lower(PASS, "a spread argument to new", new_expression.data.range);
                }
            }
            Expression::NumericLiteral(n) => {
                let prefixed = n
                    .raw
                    .as_deref()
                    .is_some_and(|raw| ["0b", "0B", "0o", "0O"].iter().any(|p| raw.starts_with(p)));
                if prefixed {
                    n.raw = None;
                }
            }
            Expression::StringLiteral(s) => {
                if s.raw.as_deref().is_some_and(|raw| raw.contains("\\u{")) {
                    s.raw = None;
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
    fn test_concat_spread_starts_from_leading_array() {
        let Expression::Call(call) = concat_spread(vec![
            factory::ident("a"),
            factory::spread(factory::ident("b")),
            factory::ident("c"),
        ]) else {
            panic!("expected a concat call");
        };
        let Expression::PropertyAccess(callee) = &*call.expression else {
            panic!("expected a member callee");
        };
        assert!(matches!(&*callee.expression, Expression::ArrayLiteral(a) if a.elements.len() == 1));
        assert_eq!(call.arguments.len(), 2);
    }

    #[test]
    fn test_concat_spread_leading_spread_uses_empty_array() {
        let Expression::Call(call) = concat_spread(vec![factory::spread(factory::ident("b"))]) else {
            panic!("expected a concat call");
        };
        let Expression::PropertyAccess(callee) = &*call.expression else {
            panic!("expected a member callee");
        };
        assert!(matches!(&*callee.expression, Expression::ArrayLiteral(a) if a.elements.is_empty()));
    }

    #[test]
    fn test_property_targets() {
        assert!(matches!(
            property_target(factory::ident("o"), factory::property_name("x")),
            Expression::PropertyAccess(_)
        ));
        assert!(matches!(
            property_target(factory::ident("o"), factory::property_name("a b")),
            Expression::ElementAccess(_)
        ));
    }
}
