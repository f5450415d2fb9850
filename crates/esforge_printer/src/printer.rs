//! The printer: shared state, program layout and small shared pieces.

use esforge_ast::*;
use esforge_core::number_to_string;
use esforge_core::text::TextRange;
use esforge_options::PrintOptions;
use serde::{Deserialize, Serialize};

use crate::writer::{Mapping, TextWriter};

/// Printed text plus the mappings collected while printing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintResult {
    pub code: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mappings: Vec<Mapping>,
}

/// Print `program` with `options`.
pub fn print_program(program: &Program, options: &PrintOptions) -> PrintResult {
    let _span = tracing::trace_span!("print", file = %program.file_name, minify = options.minify).entered();
    let mut printer = Printer::new(options, &program.comments);
    printer.print_program(program);
    printer.finish()
}

/// Converts AST nodes to text.
pub struct Printer<'a> {
    pub(crate) w: TextWriter,
    options: &'a PrintOptions,
    comments: &'a [Comment],
    next_comment: usize,
}

impl<'a> Printer<'a> {
    pub fn new(options: &'a PrintOptions, comments: &'a [Comment]) -> Self {
        Self {
            w: TextWriter::new(options.minify, options.indent, options.new_line.as_str()),
            options,
            comments,
            next_comment: 0,
        }
    }

    pub fn finish(self) -> PrintResult {
        let (code, mappings) = self.w.finish();
        PrintResult { code, mappings }
    }

    pub fn print_program(&mut self, program: &Program) {
        if let Some(shebang) = &program.shebang {
            self.w.write_raw(shebang);
            self.w.hard_newline();
        }
        self.print_statement_list(&program.statements);
        self.emit_comments_before(u32::MAX);
        if self.options.trailing_newline && !self.w.is_at_line_start() {
            self.w.hard_newline();
        }
    }

    pub(crate) fn minify(&self) -> bool {
        self.w.is_minified()
    }

    // ========================================================================
    // Comments
    // ========================================================================

    fn preserves_comments(&self) -> bool {
        self.options.preserve_comments && !self.options.minify
    }

    /// Emit every not yet printed comment that ends at or before `pos`,
    /// each on its own line.
    pub(crate) fn emit_comments_before(&mut self, pos: u32) {
        if !self.preserves_comments() {
            return;
        }
        while let Some(comment) = self.comments.get(self.next_comment) {
            if comment.range.end > pos {
                break;
            }
            self.next_comment += 1;
            if !self.w.is_at_line_start() {
                self.w.hard_newline();
            }
            self.w.write_raw(&comment.text);
            self.w.hard_newline();
        }
    }

    pub(crate) fn leading_comments(&mut self, range: TextRange) {
        if !range.is_dummy() {
            self.emit_comments_before(range.pos);
        }
    }

    // ========================================================================
    // Lists and separators
    // ========================================================================

    pub(crate) fn print_statement_list(&mut self, statements: &[Statement]) {
        let mut first = true;
        for statement in statements {
            if matches!(statement, Statement::Missing(_)) {
                continue;
            }
            if !first {
                self.w.newline();
            }
            first = false;
            self.leading_comments(statement.range());
            self.print_statement(statement);
        }
    }

    /// Source text of a punctuation or keyword kind.
    pub(crate) fn write_token(&mut self, kind: SyntaxKind) {
        match kind.token_text() {
            Some(text) => self.w.write(text),
            None => tracing::warn!(?kind, "no text for token kind"),
        }
    }

    /// `, ` between items (`,` when minifying).
    pub(crate) fn comma(&mut self) {
        self.w.write(",");
        self.w.space();
    }

    pub(crate) fn comma_list<T>(&mut self, items: &[T], mut print: impl FnMut(&mut Self, &T)) {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.comma();
            }
            print(self, item);
        }
    }

    /// `{` + indented lines + `}`; `{}` when empty.
    pub(crate) fn braced_lines<T>(&mut self, items: &[T], mut print: impl FnMut(&mut Self, &T, bool)) {
        self.w.write("{");
        if items.is_empty() {
            self.w.write("}");
            return;
        }
        self.w.indent();
        for (i, item) in items.iter().enumerate() {
            self.w.newline();
            print(self, item, i + 1 == items.len());
        }
        self.w.dedent();
        self.w.newline();
        self.w.write("}");
    }

    /// ` = ` / `=`.
    pub(crate) fn equals(&mut self) {
        self.w.space();
        self.w.write("=");
        self.w.space();
    }

    /// `: ` / `:`.
    pub(crate) fn colon(&mut self) {
        self.w.write(":");
        self.w.space();
    }

    // ========================================================================
    // Names and literals
    // ========================================================================

    pub(crate) fn print_identifier(&mut self, id: &Identifier) {
        self.w.mark(id.data.range, Some(&id.text));
        self.w.write(&id.text);
    }

    pub(crate) fn print_string_literal(&mut self, node: &StringLiteral) {
        self.w.mark(node.data.range, None);
        match &node.raw {
            Some(raw) => self.w.write(raw),
            None => {
                let quote = if node.data.flags.contains(NodeFlags::SINGLE_QUOTE) { '\'' } else { '"' };
                self.w.write(&quote_string(&node.value, quote));
            }
        }
    }

    pub(crate) fn numeric_text(node: &NumericLiteral) -> String {
        match &node.raw {
            Some(raw) => raw.clone(),
            None => number_to_string(node.value),
        }
    }

    pub(crate) fn print_numeric_literal(&mut self, node: &NumericLiteral) {
        self.w.mark(node.data.range, None);
        self.w.write(&Self::numeric_text(node));
    }

    pub(crate) fn print_property_name(&mut self, name: &PropertyName) {
        match name {
            PropertyName::Identifier(id) | PropertyName::PrivateIdentifier(id) => self.print_identifier(id),
            PropertyName::StringLiteral(s) => self.print_string_literal(s),
            PropertyName::NumericLiteral(n) => self.print_numeric_literal(n),
            PropertyName::BigIntLiteral(n) => self.w.write(&n.raw),
            PropertyName::Computed(c) => {
                self.w.write("[");
                self.print_assignment_expression(&c.expression);
                self.w.write("]");
            }
        }
    }

    pub(crate) fn print_module_export_name(&mut self, name: &ModuleExportName) {
        match name {
            ModuleExportName::Identifier(id) => self.print_identifier(id),
            ModuleExportName::StringLiteral(s) => self.print_string_literal(s),
        }
    }

    pub(crate) fn print_entity_name(&mut self, name: &EntityName) {
        match name {
            EntityName::Identifier(id) => self.print_identifier(id),
            EntityName::Qualified(q) => {
                self.print_entity_name(&q.left);
                self.w.write(".");
                self.print_identifier(&q.right);
            }
        }
    }

    // ========================================================================
    // Modifiers, decorators, parameters
    // ========================================================================

    /// Keywords for `flags`, in canonical order, each followed by a space.
    pub(crate) fn print_modifiers(&mut self, flags: ModifierFlags) {
        const ORDER: &[(ModifierFlags, &str)] = &[
            (ModifierFlags::EXPORT, "export"),
            (ModifierFlags::DEFAULT, "default"),
            (ModifierFlags::PUBLIC, "public"),
            (ModifierFlags::PRIVATE, "private"),
            (ModifierFlags::PROTECTED, "protected"),
            (ModifierFlags::AMBIENT, "declare"),
            (ModifierFlags::STATIC, "static"),
            (ModifierFlags::ABSTRACT, "abstract"),
            (ModifierFlags::OVERRIDE, "override"),
            (ModifierFlags::READONLY, "readonly"),
            (ModifierFlags::ACCESSOR, "accessor"),
            (ModifierFlags::CONST, "const"),
            (ModifierFlags::IN, "in"),
            (ModifierFlags::OUT, "out"),
            (ModifierFlags::ASYNC, "async"),
        ];
        for (flag, keyword) in ORDER {
            if flags.contains(*flag) {
                self.w.write(keyword);
                self.w.hard_space();
            }
        }
    }

    pub(crate) fn print_decorators(&mut self, decorators: &[Decorator], on_own_line: bool) {
        for decorator in decorators {
            self.w.mark(decorator.data.range, None);
            self.w.write("@");
            self.print_expression_raw(&decorator.expression);
            if on_own_line {
                self.w.newline();
                if self.minify() {
                    self.w.hard_space();
                }
            } else {
                self.w.hard_space();
            }
        }
    }

    pub(crate) fn print_type_parameters(&mut self, params: &Option<Vec<TypeParameter>>) {
        let Some(params) = params else {
            return;
        };
        self.w.write("<");
        self.comma_list(params, |p, param| p.print_type_parameter(param));
        self.w.write(">");
    }

    pub(crate) fn print_type_arguments(&mut self, args: &Option<Vec<TypeNode>>) {
        let Some(args) = args else {
            return;
        };
        self.w.write("<");
        self.comma_list(args, |p, arg| p.print_type(arg));
        self.w.write(">");
    }

    pub(crate) fn print_type_annotation(&mut self, annotation: &Option<TypeNode>) {
        if let Some(ty) = annotation {
            self.colon();
            self.print_type(ty);
        }
    }

    pub(crate) fn print_parameters(&mut self, params: &[Parameter]) {
        self.w.write("(");
        self.comma_list(params, |p, param| p.print_parameter(param));
        self.w.write(")");
    }

    pub(crate) fn print_parameter(&mut self, param: &Parameter) {
        self.w.mark(param.data.range, None);
        self.print_decorators(&param.decorators, false);
        self.print_modifiers(param.data.modifier_flags);
        if param.dot_dot_dot {
            self.w.write("...");
        }
        self.print_binding_name(&param.name);
        if param.question {
            self.w.write("?");
        }
        self.print_type_annotation(&param.type_annotation);
        if let Some(init) = &param.initializer {
            self.equals();
            self.print_assignment_expression(init);
        }
    }

    pub(crate) fn print_binding_name(&mut self, name: &BindingName) {
        match name {
            BindingName::Identifier(id) => self.print_identifier(id),
            BindingName::Object(pattern) => {
                self.w.write("{");
                if !pattern.elements.is_empty() {
                    self.w.space();
                    self.comma_list(&pattern.elements, |p, element| p.print_binding_element(element));
                    self.w.space();
                }
                self.w.write("}");
            }
            BindingName::Array(pattern) => {
                self.w.write("[");
                for (i, element) in pattern.elements.iter().enumerate() {
                    if i > 0 {
                        self.comma();
                    }
                    if let Some(element) = element {
                        self.print_binding_element(element);
                    }
                }
                if matches!(pattern.elements.last(), Some(None)) {
                    self.w.write(",");
                }
                self.w.write("]");
            }
        }
    }

    fn print_binding_element(&mut self, element: &BindingElement) {
        if element.dot_dot_dot {
            self.w.write("...");
        }
        if let Some(property_name) = &element.property_name {
            self.print_property_name(property_name);
            self.colon();
        }
        self.print_binding_name(&element.name);
        if let Some(init) = &element.initializer {
            self.equals();
            self.print_assignment_expression(init);
        }
    }

    /// Block body of a function, `;` when there is none.
    pub(crate) fn print_function_body(&mut self, body: &Option<Block>) {
        match body {
            Some(block) => {
                self.w.space();
                self.print_block(block);
            }
            None => self.w.write(";"),
        }
    }
}

/// Quote `value` as a JavaScript string literal.
pub(crate) fn quote_string(value: &str, quote: char) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push(quote);
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            '\u{b}' => out.push_str("\\v"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if (c as u32) < 0x20 || c == '\u{7f}' => out.push_str(&format!("\\x{:02x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_string() {
        assert_eq!(quote_string("a\"b\n", '"'), r#""a\"b\n""#);
        assert_eq!(quote_string("it's", '\''), r"'it\'s'");
        assert_eq!(quote_string("\u{1}", '"'), r#""\x01""#);
    }
}
