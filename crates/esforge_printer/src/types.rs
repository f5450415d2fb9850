//! Type annotations and type-level declarations members.

use esforge_ast::*;

use crate::printer::Printer;

impl Printer<'_> {
    pub(crate) fn print_type(&mut self, ty: &TypeNode) {
        match ty {
            TypeNode::Keyword(data) => self.write_token(data.kind),
            TypeNode::Reference(node) => {
                self.print_entity_name(&node.type_name);
                self.print_type_arguments(&node.type_arguments);
            }
            TypeNode::Function(node) => {
                self.print_modifiers(node.data.modifier_flags);
                if node.is_constructor {
                    self.w.write("new");
                    self.w.space();
                }
                self.print_type_parameters(&node.type_parameters);
                self.print_parameters(&node.parameters);
                self.w.space();
                self.w.write("=>");
                self.w.space();
                self.print_type(&node.return_type);
            }
            TypeNode::Query(node) => {
                self.w.write("typeof");
                self.w.hard_space();
                self.print_entity_name(&node.expr_name);
                self.print_type_arguments(&node.type_arguments);
            }
            TypeNode::Literal(node) => self.print_type_members(&node.members),
            TypeNode::Array(node) => {
                self.print_operand_type(&node.element_type);
                self.w.write("[]");
            }
            TypeNode::Tuple(node) => {
                self.w.write("[");
                self.comma_list(&node.elements, |p, element| p.print_type(element));
                self.w.write("]");
            }
            TypeNode::NamedTupleMember(node) => {
                if node.dot_dot_dot {
                    self.w.write("...");
                }
                self.print_identifier(&node.name);
                if node.question {
                    self.w.write("?");
                }
                self.colon();
                self.print_type(&node.type_node);
            }
            TypeNode::Optional(node) => {
                self.print_operand_type(&node.type_node);
                self.w.write("?");
            }
            TypeNode::Rest(node) => {
                self.w.write("...");
                self.print_type(&node.type_node);
            }
            TypeNode::Union(node) => self.print_type_list(&node.types, "|"),
            TypeNode::Intersection(node) => self.print_type_list(&node.types, "&"),
            TypeNode::Conditional(node) => {
                self.print_type(&node.check_type);
                self.w.write("extends");
                self.print_type(&node.extends_type);
                self.w.space();
                self.w.write("?");
                self.w.space();
                self.print_type(&node.true_type);
                self.w.space();
                self.w.write(":");
                self.w.space();
                self.print_type(&node.false_type);
            }
            TypeNode::Infer(node) => {
                self.w.write("infer");
                self.print_type_parameter(&node.type_parameter);
            }
            TypeNode::Parenthesized(node) => {
                self.w.write("(");
                self.print_type(&node.type_node);
                self.w.write(")");
            }
            TypeNode::This(_) => self.w.write("this"),
            TypeNode::Operator(node) => {
                self.write_token(node.operator);
                self.w.hard_space();
                self.print_operand_type(&node.type_node);
            }
            TypeNode::IndexedAccess(node) => {
                self.print_operand_type(&node.object_type);
                self.w.write("[");
                self.print_type(&node.index_type);
                self.w.write("]");
            }
            TypeNode::Mapped(node) => self.print_mapped_type(node),
            TypeNode::LiteralType(node) => self.print_expression_raw(&node.literal),
            TypeNode::TemplateLiteral(node) => {
                self.w.write("`");
                for (i, quasi) in node.quasis.iter().enumerate() {
                    self.w.write_raw(&quasi.raw);
                    if let Some(ty) = node.types.get(i) {
                        self.w.write_raw("${");
                        self.print_type(ty);
                        self.w.write_raw("}");
                    }
                }
                self.w.write_raw("`");
            }
            TypeNode::Import(node) => {
                if node.is_type_of {
                    self.w.write("typeof");
                    self.w.hard_space();
                }
                self.w.write("import(");
                self.print_string_literal(&node.argument);
                self.w.write(")");
                if let Some(qualifier) = &node.qualifier {
                    self.w.write(".");
                    self.print_entity_name(qualifier);
                }
                self.print_type_arguments(&node.type_arguments);
            }
            TypeNode::Predicate(node) => {
                if node.asserts {
                    self.w.write("asserts");
                }
                self.print_identifier(&node.parameter_name);
                if let Some(ty) = &node.type_node {
                    self.w.write("is");
                    self.print_type(ty);
                }
            }
            TypeNode::Missing(_) => {}
        }
    }

    /// Element of `T[]`, `T[K]` and `keyof T`, parenthesized when the
    /// suffix or prefix would bind to part of it.
    fn print_operand_type(&mut self, ty: &TypeNode) {
        let needs_parens = matches!(
            ty,
            TypeNode::Union(_)
                | TypeNode::Intersection(_)
                | TypeNode::Function(_)
                | TypeNode::Conditional(_)
                | TypeNode::Infer(_)
        );
        if needs_parens {
            self.w.write("(");
            self.print_type(ty);
            self.w.write(")");
        } else {
            self.print_type(ty);
        }
    }

    fn print_type_list(&mut self, types: &[TypeNode], separator: &str) {
        for (i, ty) in types.iter().enumerate() {
            if i > 0 {
                self.w.space();
                self.w.write(separator);
                self.w.space();
            }
            if matches!(ty, TypeNode::Function(_) | TypeNode::Conditional(_))
                || (separator == "&" && matches!(ty, TypeNode::Union(_)))
            {
                self.w.write("(");
                self.print_type(ty);
                self.w.write(")");
            } else {
                self.print_type(ty);
            }
        }
    }

    /// `{ a: T; b(): U }` on one line.
    fn print_type_members(&mut self, members: &[TypeElement]) {
        self.w.write("{");
        if members.is_empty() {
            self.w.write("}");
            return;
        }
        self.w.space();
        for (i, member) in members.iter().enumerate() {
            if i > 0 {
                self.w.write(";");
                self.w.space();
            }
            self.print_type_element(member);
        }
        self.w.space();
        self.w.write("}");
    }

    fn print_mapped_type(&mut self, node: &MappedType) {
        self.w.write("{");
        self.w.space();
        match node.readonly_token {
            Some(SyntaxKind::PlusToken) => self.w.write("+readonly"),
            Some(SyntaxKind::MinusToken) => self.w.write("-readonly"),
            Some(_) => self.w.write("readonly"),
            None => {}
        }
        if node.readonly_token.is_some() {
            self.w.space();
        }
        self.w.write("[");
        self.print_identifier(&node.type_parameter.name);
        self.w.write("in");
        if let Some(constraint) = &node.type_parameter.constraint {
            self.print_type(constraint);
        }
        if let Some(name_type) = &node.name_type {
            self.w.write("as");
            self.print_type(name_type);
        }
        self.w.write("]");
        match node.question_token {
            Some(SyntaxKind::PlusToken) => self.w.write("+?"),
            Some(SyntaxKind::MinusToken) => self.w.write("-?"),
            Some(_) => self.w.write("?"),
            None => {}
        }
        if let Some(ty) = &node.type_node {
            self.colon();
            self.print_type(ty);
        }
        self.w.write(";");
        self.w.space();
        self.w.write("}");
    }

    pub(crate) fn print_type_parameter(&mut self, param: &TypeParameter) {
        self.print_modifiers(param.data.modifier_flags);
        self.print_identifier(&param.name);
        if let Some(constraint) = &param.constraint {
            self.w.write("extends");
            self.print_type(constraint);
        }
        if let Some(default) = &param.default {
            self.equals();
            self.print_type(default);
        }
    }

    pub(crate) fn print_type_element(&mut self, member: &TypeElement) {
        match member {
            TypeElement::Property(node) => {
                self.w.mark(node.data.range, None);
                self.print_modifiers(node.data.modifier_flags);
                self.print_property_name(&node.name);
                if node.question {
                    self.w.write("?");
                }
                self.print_type_annotation(&node.type_annotation);
            }
            TypeElement::Method(node) => {
                self.w.mark(node.data.range, None);
                match node.kind {
                    MethodKind::Get => self.w.write("get"),
                    MethodKind::Set => self.w.write("set"),
                    MethodKind::Method => {}
                }
                if node.kind != MethodKind::Method {
                    self.w.hard_space();
                }
                self.print_property_name(&node.name);
                if node.question {
                    self.w.write("?");
                }
                self.print_type_parameters(&node.type_parameters);
                self.print_parameters(&node.parameters);
                self.print_type_annotation(&node.return_type);
            }
            TypeElement::Call(node) => {
                self.w.mark(node.data.range, None);
                if node.is_construct {
                    self.w.write("new");
                    self.w.space();
                }
                self.print_type_parameters(&node.type_parameters);
                self.print_parameters(&node.parameters);
                self.print_type_annotation(&node.return_type);
            }
            TypeElement::Index(node) => {
                self.w.mark(node.data.range, None);
                self.print_modifiers(node.data.modifier_flags);
                self.print_index_signature(node);
            }
        }
    }
}
