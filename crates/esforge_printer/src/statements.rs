//! Statements and declarations.

use esforge_ast::*;
use esforge_parser::OperatorPrecedence;

use crate::precedence::{is_statement_ambiguous, starts_with};
use crate::printer::Printer;

impl Printer<'_> {
    pub(crate) fn print_statement(&mut self, statement: &Statement) {
        self.w.mark(statement.range(), None);
        match statement {
            Statement::Block(block) => self.print_block(block),
            Statement::Empty(_) => self.w.write(";"),
            Statement::Variable(node) => {
                self.print_modifiers(node.data.modifier_flags);
                self.print_variable_declaration_list(&node.declaration_list);
                self.w.write(";");
            }
            Statement::Expression(node) => self.print_expression_statement(&node.expression),
            Statement::If(node) => self.print_if(node),
            Statement::Do(node) => {
                self.w.write("do");
                self.print_embedded_statement(&node.statement);
                if matches!(*node.statement, Statement::Block(_)) {
                    self.w.space();
                } else {
                    self.w.newline();
                }
                self.w.write("while");
                self.w.space();
                self.print_condition(&node.condition);
                self.w.write(";");
            }
            Statement::While(node) => {
                self.w.write("while");
                self.w.space();
                self.print_condition(&node.condition);
                self.print_embedded_statement(&node.statement);
            }
            Statement::For(node) => self.print_for(node),
            Statement::ForIn(node) => {
                self.w.write("for");
                self.w.space();
                self.w.write("(");
                self.print_for_initializer(&node.initializer);
                self.w.write("in");
                self.print_expression(&node.expression, OperatorPrecedence::Comma);
                self.w.write(")");
                self.print_embedded_statement(&node.statement);
            }
            Statement::ForOf(node) => {
                self.w.write("for");
                if node.is_await {
                    self.w.write("await");
                }
                self.w.space();
                self.w.write("(");
                self.print_for_initializer(&node.initializer);
                self.w.write("of");
                self.print_expression(&node.expression, OperatorPrecedence::Yield);
                self.w.write(")");
                self.print_embedded_statement(&node.statement);
            }
            Statement::Continue(node) | Statement::Break(node) => {
                self.w.write(if matches!(statement, Statement::Continue(_)) { "continue" } else { "break" });
                if let Some(label) = &node.label {
                    self.print_identifier(label);
                }
                self.w.write(";");
            }
            Statement::Return(node) => {
                self.w.write("return");
                if let Some(expr) = &node.expression {
                    self.w.space();
                    self.print_expression(expr, OperatorPrecedence::Comma);
                }
                self.w.write(";");
            }
            Statement::With(node) => {
                self.w.write("with");
                self.w.space();
                self.print_condition(&node.expression);
                self.print_embedded_statement(&node.statement);
            }
            Statement::Switch(node) => self.print_switch(node),
            Statement::Labeled(node) => {
                self.print_identifier(&node.label);
                self.colon();
                self.print_statement(&node.statement);
            }
            Statement::Throw(node) => {
                self.w.write("throw");
                self.w.space();
                self.print_expression(&node.expression, OperatorPrecedence::Comma);
                self.w.write(";");
            }
            Statement::Try(node) => self.print_try(node),
            Statement::Debugger(_) => self.w.write("debugger;"),
            Statement::Function(node) => self.print_function(node, true),
            Statement::Class(node) => self.print_class(node, true),
            Statement::Interface(node) => self.print_interface(node),
            Statement::TypeAlias(node) => {
                self.print_modifiers(node.data.modifier_flags);
                self.w.write("type");
                self.print_identifier(&node.name);
                self.print_type_parameters(&node.type_parameters);
                self.equals();
                self.print_type(&node.type_node);
                self.w.write(";");
            }
            Statement::Enum(node) => self.print_enum(node),
            Statement::Module(node) => self.print_module_declaration(node),
            Statement::Import(node) => self.print_import(node),
            Statement::ImportEquals(node) => {
                self.print_modifiers(node.data.modifier_flags);
                self.w.write("import");
                if node.is_type_only {
                    self.w.write("type");
                }
                self.print_identifier(&node.name);
                self.equals();
                match &node.module_reference {
                    ModuleReference::External(specifier) => {
                        self.w.write("require(");
                        self.print_string_literal(specifier);
                        self.w.write(")");
                    }
                    ModuleReference::Entity(name) => self.print_entity_name(name),
                }
                self.w.write(";");
            }
            Statement::Export(node) => self.print_export(node),
            Statement::ExportAssignment(node) => {
                self.w.write("export");
                if node.is_export_equals {
                    self.equals();
                    self.print_expression(&node.expression, OperatorPrecedence::Yield);
                } else {
                    self.w.write("default");
                    self.w.space();
                    let ambiguous = starts_with(&node.expression, &|e| {
                        matches!(e, Expression::Function(_) | Expression::Class(_))
                    }) || matches!(node.expression, Expression::Binary(ref b) if b.operator == SyntaxKind::CommaToken);
                    if ambiguous {
                        self.w.write("(");
                        self.print_expression_raw(&node.expression);
                        self.w.write(")");
                    } else {
                        self.print_expression(&node.expression, OperatorPrecedence::Yield);
                    }
                }
                self.w.write(";");
            }
            Statement::NamespaceExport(node) => {
                self.w.write("export as namespace");
                self.print_identifier(&node.name);
                self.w.write(";");
            }
            Statement::Missing(_) => {}
        }
    }

    pub(crate) fn print_block(&mut self, block: &Block) {
        self.w.write("{");
        if block.statements.iter().all(|s| matches!(s, Statement::Missing(_))) {
            self.w.write("}");
            return;
        }
        self.w.indent();
        self.w.newline();
        self.print_statement_list(&block.statements);
        if !block.data.range.is_dummy() {
            self.emit_comments_before(block.data.range.end.saturating_sub(1));
        }
        self.w.dedent();
        self.w.newline();
        self.w.write("}");
    }

    /// Body of `if`/`while`/`for`: blocks stay on the same line, anything
    /// else goes on an indented line of its own.
    fn print_embedded_statement(&mut self, statement: &Statement) {
        if matches!(statement, Statement::Block(_)) {
            self.w.space();
            self.print_statement(statement);
        } else if matches!(statement, Statement::Empty(_)) {
            self.w.write(";");
        } else {
            self.w.indent();
            self.w.newline();
            self.print_statement(statement);
            self.w.dedent();
        }
    }

    fn print_condition(&mut self, condition: &Expression) {
        self.w.write("(");
        self.print_expression(condition, OperatorPrecedence::Comma);
        self.w.write(")");
    }

    fn print_expression_statement(&mut self, expr: &Expression) {
        let needs_parens = starts_with(expr, &is_statement_ambiguous) || is_let_bracket(expr);
        if needs_parens {
            self.w.write("(");
            self.print_expression_raw(expr);
            self.w.write(")");
        } else {
            self.print_expression(expr, OperatorPrecedence::Comma);
        }
        self.w.write(";");
    }

    fn print_if(&mut self, node: &IfStatement) {
        self.w.write("if");
        self.w.space();
        self.print_condition(&node.condition);
        let Some(else_statement) = &node.else_statement else {
            self.print_embedded_statement(&node.then_statement);
            return;
        };
        // `if (a) if (b) x; else y;` would bind the else to the inner if.
        if ends_with_dangling_if(&node.then_statement) {
            self.w.space();
            self.w.write("{");
            self.w.indent();
            self.w.newline();
            self.print_statement(&node.then_statement);
            self.w.dedent();
            self.w.newline();
            self.w.write("}");
        } else {
            self.print_embedded_statement(&node.then_statement);
        }
        if matches!(*node.then_statement, Statement::Block(_)) || ends_with_dangling_if(&node.then_statement) {
            self.w.space();
        } else {
            self.w.newline();
        }
        self.w.write("else");
        if matches!(**else_statement, Statement::If(_)) {
            self.w.hard_space();
            self.print_statement(else_statement);
        } else {
            self.print_embedded_statement(else_statement);
        }
    }

    fn print_for(&mut self, node: &ForStatement) {
        self.w.write("for");
        self.w.space();
        self.w.write("(");
        match &node.initializer {
            Some(ForInitializer::Variable(list)) => self.print_variable_declaration_list(list),
            Some(ForInitializer::Expression(expr)) => self.print_for_init_expression(expr),
            None => {}
        }
        self.w.write(";");
        if let Some(condition) = &node.condition {
            self.w.space();
            self.print_expression(condition, OperatorPrecedence::Comma);
        }
        self.w.write(";");
        if let Some(incrementor) = &node.incrementor {
            self.w.space();
            self.print_expression(incrementor, OperatorPrecedence::Comma);
        }
        self.w.write(")");
        self.print_embedded_statement(&node.statement);
    }

    fn print_for_initializer(&mut self, initializer: &ForInitializer) {
        match initializer {
            ForInitializer::Variable(list) => self.print_variable_declaration_list(list),
            ForInitializer::Expression(expr) => self.print_for_init_expression(expr),
        }
    }

    /// `for ((a in b);;)` keeps its parentheses so `in` is not read as for-in.
    fn print_for_init_expression(&mut self, expr: &Expression) {
        let has_in = starts_with(expr, &|e| {
            matches!(e, Expression::Binary(b) if b.operator == SyntaxKind::InKeyword)
        }) || is_let_bracket(expr)
            || matches!(expr, Expression::Identifier(id) if id.text == "let" || id.text == "async");
        if has_in {
            self.w.write("(");
            self.print_expression_raw(expr);
            self.w.write(")");
        } else {
            self.print_expression(expr, OperatorPrecedence::Comma);
        }
    }

    pub(crate) fn print_variable_declaration_list(&mut self, list: &VariableDeclarationList) {
        self.w.write(list.kind.as_str());
        self.w.hard_space();
        self.comma_list(&list.declarations, |p, decl| {
            p.w.mark(decl.data.range, None);
            p.print_binding_name(&decl.name);
            if decl.exclamation {
                p.w.write("!");
            }
            p.print_type_annotation(&decl.type_annotation);
            if let Some(init) = &decl.initializer {
                p.equals();
                p.print_assignment_expression(init);
            }
        });
    }

    fn print_switch(&mut self, node: &SwitchStatement) {
        self.w.write("switch");
        self.w.space();
        self.print_condition(&node.expression);
        self.w.space();
        self.w.write("{");
        self.w.indent();
        for clause in &node.clauses {
            self.w.newline();
            self.leading_comments(clause.data.range);
            match &clause.expression {
                Some(expr) => {
                    self.w.write("case");
                    self.w.space();
                    self.print_expression(expr, OperatorPrecedence::Comma);
                }
                None => self.w.write("default"),
            }
            self.w.write(":");
            if !clause.statements.is_empty() {
                self.w.indent();
                self.w.newline();
                self.print_statement_list(&clause.statements);
                self.w.dedent();
            }
        }
        self.w.dedent();
        self.w.newline();
        self.w.write("}");
    }

    fn print_try(&mut self, node: &TryStatement) {
        self.w.write("try");
        self.w.space();
        self.print_block(&node.try_block);
        if let Some(catch) = &node.catch_clause {
            self.w.space();
            self.w.write("catch");
            if let Some(variable) = &catch.variable_declaration {
                self.w.space();
                self.w.write("(");
                self.print_binding_name(&variable.name);
                self.print_type_annotation(&variable.type_annotation);
                self.w.write(")");
            }
            self.w.space();
            self.print_block(&catch.block);
        }
        if let Some(finally) = &node.finally_block {
            self.w.space();
            self.w.write("finally");
            self.w.space();
            self.print_block(finally);
        }
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    /// Functions in statement position, as expressions and as members share
    /// everything after the name.
    pub(crate) fn print_function(&mut self, node: &Function, as_declaration: bool) {
        if as_declaration {
            self.print_modifiers(node.data.modifier_flags);
        }
        if node.is_async {
            self.w.write("async");
        }
        self.w.write("function");
        if node.is_generator {
            self.w.write("*");
        }
        if let Some(name) = &node.name {
            if node.is_generator {
                self.w.space();
            } else {
                self.w.hard_space();
            }
            self.print_identifier(name);
        }
        self.print_signature(node);
        self.print_function_body(&node.body);
    }

    /// Type parameters, parameters and return type.
    pub(crate) fn print_signature(&mut self, node: &Function) {
        self.print_type_parameters(&node.type_parameters);
        self.print_parameters(&node.parameters);
        self.print_type_annotation(&node.return_type);
    }

    pub(crate) fn print_class(&mut self, node: &Class, as_declaration: bool) {
        self.print_decorators(&node.decorators, true);
        if as_declaration {
            self.print_modifiers(node.data.modifier_flags);
        }
        self.w.write("class");
        if let Some(name) = &node.name {
            self.print_identifier(name);
        }
        self.print_type_parameters(&node.type_parameters);
        if let Some(extends) = &node.extends {
            self.w.write("extends");
            self.w.hard_space();
            self.print_expression(extends, OperatorPrecedence::LeftHandSide);
            self.print_type_arguments(&node.super_type_arguments);
        }
        if !node.implements.is_empty() {
            self.w.write("implements");
            self.comma_list(&node.implements, |p, heritage| p.print_expression_with_type_arguments(heritage));
        }
        self.w.space();
        self.braced_lines(&node.members, |p, member, _| p.print_class_element(member));
    }

    pub(crate) fn print_expression_with_type_arguments(&mut self, node: &ExpressionWithTypeArguments) {
        self.print_expression(&node.expression, OperatorPrecedence::LeftHandSide);
        self.print_type_arguments(&node.type_arguments);
    }

    fn print_class_element(&mut self, member: &ClassElement) {
        self.leading_comments(member.data().range);
        self.w.mark(member.data().range, None);
        match member {
            ClassElement::Property(node) => {
                self.print_decorators(&node.decorators, true);
                self.print_modifiers(node.data.modifier_flags);
                self.print_property_name(&node.name);
                if node.question {
                    self.w.write("?");
                }
                if node.exclamation {
                    self.w.write("!");
                }
                self.print_type_annotation(&node.type_annotation);
                if let Some(init) = &node.initializer {
                    self.equals();
                    self.print_assignment_expression(init);
                }
                self.w.write(";");
            }
            ClassElement::Method(node) => self.print_method(node),
            ClassElement::Constructor(node) => {
                self.print_modifiers(node.data.modifier_flags);
                self.w.write("constructor");
                self.print_signature(&node.function);
                self.print_function_body(&node.function.body);
            }
            ClassElement::IndexSignature(node) => {
                self.print_modifiers(node.data.modifier_flags);
                self.print_index_signature(node);
                self.w.write(";");
            }
            ClassElement::StaticBlock(node) => {
                self.w.write("static");
                self.w.space();
                self.print_block(&node.body);
            }
            ClassElement::Semicolon(_) => self.w.write(";"),
        }
    }

    /// Class and object-literal methods, getters and setters.
    pub(crate) fn print_method(&mut self, node: &MethodDeclaration) {
        self.print_decorators(&node.decorators, true);
        self.print_modifiers(node.data.modifier_flags);
        match node.kind {
            MethodKind::Get => self.w.write("get"),
            MethodKind::Set => self.w.write("set"),
            MethodKind::Method => {
                if node.function.is_async {
                    self.w.write("async");
                }
                if node.function.is_generator {
                    self.w.write("*");
                }
            }
        }
        if node.kind != MethodKind::Method || node.function.is_async {
            self.w.hard_space();
        }
        self.print_property_name(&node.name);
        if node.question {
            self.w.write("?");
        }
        self.print_signature(&node.function);
        self.print_function_body(&node.function.body);
    }

    pub(crate) fn print_index_signature(&mut self, node: &IndexSignature) {
        self.w.write("[");
        self.comma_list(&node.parameters, |p, param| p.print_parameter(param));
        self.w.write("]");
        self.print_type_annotation(&node.type_annotation);
    }

    fn print_interface(&mut self, node: &InterfaceDeclaration) {
        self.print_modifiers(node.data.modifier_flags);
        self.w.write("interface");
        self.print_identifier(&node.name);
        self.print_type_parameters(&node.type_parameters);
        if !node.extends.is_empty() {
            self.w.write("extends");
            self.comma_list(&node.extends, |p, heritage| p.print_expression_with_type_arguments(heritage));
        }
        self.w.space();
        self.braced_lines(&node.members, |p, member, _| {
            p.print_type_element(member);
            p.w.write(";");
        });
    }

    fn print_enum(&mut self, node: &EnumDeclaration) {
        self.print_modifiers(node.data.modifier_flags);
        self.w.write("enum");
        self.print_identifier(&node.name);
        self.w.space();
        self.braced_lines(&node.members, |p, member, last| {
            p.w.mark(member.data.range, None);
            p.print_property_name(&member.name);
            if let Some(init) = &member.initializer {
                p.equals();
                p.print_assignment_expression(init);
            }
            if !last {
                p.w.write(",");
            }
        });
    }

    fn print_module_declaration(&mut self, node: &ModuleDeclaration) {
        self.print_modifiers(node.data.modifier_flags);
        if !node.data.flags.contains(NodeFlags::GLOBAL_AUGMENTATION) {
            let keyword = if node.data.flags.contains(NodeFlags::NAMESPACE) { "namespace" } else { "module" };
            self.w.write(keyword);
            self.w.hard_space();
        }
        let mut current = node;
        loop {
            match &current.name {
                ModuleName::Identifier(id) => self.print_identifier(id),
                ModuleName::StringLiteral(s) => self.print_string_literal(s),
            }
            match &current.body {
                Some(ModuleBody::Namespace(inner)) => {
                    self.w.write(".");
                    current = inner;
                }
                Some(ModuleBody::Block(block)) => {
                    self.w.space();
                    self.w.write("{");
                    if block.statements.is_empty() {
                        self.w.write("}");
                        return;
                    }
                    self.w.indent();
                    self.w.newline();
                    self.print_statement_list(&block.statements);
                    self.w.dedent();
                    self.w.newline();
                    self.w.write("}");
                    return;
                }
                None => {
                    self.w.write(";");
                    return;
                }
            }
        }
    }

    // ========================================================================
    // Imports and exports
    // ========================================================================

    fn print_import(&mut self, node: &ImportDeclaration) {
        self.w.write("import");
        if let Some(clause) = &node.import_clause {
            if clause.is_type_only {
                self.w.write("type");
            }
            self.w.space();
            if let Some(name) = &clause.name {
                self.print_identifier(name);
                if clause.named_bindings.is_some() {
                    self.comma();
                }
            }
            match &clause.named_bindings {
                Some(NamedImportBindings::Namespace(name)) => {
                    self.w.write("*");
                    self.w.space();
                    self.w.write("as");
                    self.print_identifier(name);
                }
                Some(NamedImportBindings::Named(specifiers)) => {
                    self.print_named_list(specifiers, |p, specifier| {
                        if specifier.is_type_only {
                            p.w.write("type");
                        }
                        if let Some(property_name) = &specifier.property_name {
                            p.print_module_export_name(property_name);
                            p.w.write("as");
                        }
                        p.print_identifier(&specifier.name);
                    });
                }
                None => {}
            }
            self.w.space();
            self.w.write("from");
        }
        self.w.space();
        self.print_string_literal(&node.module_specifier);
        self.print_import_attributes(&node.attributes);
        self.w.write(";");
    }

    fn print_export(&mut self, node: &ExportDeclaration) {
        self.w.write("export");
        if node.is_type_only {
            self.w.write("type");
        }
        self.w.space();
        match &node.export_clause {
            None => self.w.write("*"),
            Some(ExportClause::Namespace(name)) => {
                self.w.write("*");
                self.w.space();
                self.w.write("as");
                self.print_module_export_name(name);
            }
            Some(ExportClause::Named(specifiers)) => {
                self.print_named_list(specifiers, |p, specifier| {
                    if specifier.is_type_only {
                        p.w.write("type");
                    }
                    if let Some(property_name) = &specifier.property_name {
                        p.print_module_export_name(property_name);
                        p.w.write("as");
                    }
                    p.print_module_export_name(&specifier.name);
                });
            }
        }
        if let Some(specifier) = &node.module_specifier {
            self.w.space();
            self.w.write("from");
            self.w.space();
            self.print_string_literal(specifier);
            self.print_import_attributes(&node.attributes);
        }
        self.w.write(";");
    }

    /// `{ a, b as c }`, `{}` when empty.
    fn print_named_list<T>(&mut self, items: &[T], print: impl FnMut(&mut Self, &T)) {
        self.w.write("{");
        if !items.is_empty() {
            self.w.space();
            self.comma_list(items, print);
            self.w.space();
        }
        self.w.write("}");
    }

    fn print_import_attributes(&mut self, attributes: &Option<ImportAttributes>) {
        let Some(attributes) = attributes else {
            return;
        };
        self.w.space();
        self.write_token(attributes.keyword);
        self.w.space();
        self.print_named_list(&attributes.elements, |p, attribute| {
            p.print_module_export_name(&attribute.name);
            p.colon();
            p.print_string_literal(&attribute.value);
        });
    }
}

/// `let[a] = b` as an expression statement would parse as a declaration.
fn is_let_bracket(expr: &Expression) -> bool {
    starts_with(expr, &|e| {
        matches!(e, Expression::ElementAccess(access) if access.expression.is_identifier_named("let"))
    })
}

/// Whether `statement` ends in an `if` with no `else`.
fn ends_with_dangling_if(statement: &Statement) -> bool {
    match statement {
        Statement::If(node) => match &node.else_statement {
            None => true,
            Some(else_statement) => ends_with_dangling_if(else_statement),
        },
        Statement::Labeled(node) => ends_with_dangling_if(&node.statement),
        Statement::While(node) => ends_with_dangling_if(&node.statement),
        Statement::For(node) => ends_with_dangling_if(&node.statement),
        Statement::ForIn(node) => ends_with_dangling_if(&node.statement),
        Statement::ForOf(node) => ends_with_dangling_if(&node.statement),
        Statement::With(node) => ends_with_dangling_if(&node.statement),
        _ => false,
    }
}
