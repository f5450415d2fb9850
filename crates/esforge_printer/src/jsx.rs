//! JSX elements, printed close to how they were written.

use esforge_ast::*;
use esforge_parser::OperatorPrecedence;

use crate::printer::Printer;

impl Printer<'_> {
    pub(crate) fn print_jsx_element(&mut self, node: &JsxElement) {
        let opening = &node.opening;
        self.w.mark(opening.data.range, None);
        self.w.write("<");
        self.print_jsx_tag_name(&opening.tag_name);
        self.print_type_arguments(&opening.type_arguments);
        for attribute in &opening.attributes {
            self.w.hard_space();
            self.print_jsx_attribute(attribute);
        }
        if opening.self_closing {
            self.w.write_raw(" />");
            return;
        }
        self.w.write_raw(">");
        self.print_jsx_children(&node.children);
        if let Some(closing) = &node.closing {
            self.w.write_raw("</");
            self.print_jsx_tag_name(&closing.tag_name);
            self.w.write_raw(">");
        }
    }

    pub(crate) fn print_jsx_fragment(&mut self, node: &JsxFragment) {
        self.w.write("<>");
        self.print_jsx_children(&node.children);
        self.w.write_raw("</>");
    }

    fn print_jsx_children(&mut self, children: &[JsxChild]) {
        for child in children {
            match child {
                JsxChild::Text(text) => self.w.write_raw(&text.value),
                JsxChild::Expression(container) => self.print_jsx_expression_container(container),
                JsxChild::Element(element) => self.print_jsx_element(element),
                JsxChild::Fragment(fragment) => self.print_jsx_fragment(fragment),
            }
        }
    }

    fn print_jsx_expression_container(&mut self, container: &JsxExpressionContainer) {
        self.w.write_raw("{");
        if container.dot_dot_dot {
            self.w.write_raw("...");
        }
        if let Some(expr) = &container.expression {
            self.print_expression(expr, OperatorPrecedence::Yield);
        }
        self.w.write_raw("}");
    }

    fn print_jsx_tag_name(&mut self, name: &JsxTagName) {
        match name {
            JsxTagName::Identifier(id) => self.w.write_raw(&id.text),
            JsxTagName::Namespaced(n) => self.print_jsx_namespaced_name(n),
            JsxTagName::Member(m) => {
                self.print_jsx_tag_name(&m.object);
                self.w.write_raw(".");
                self.w.write_raw(&m.property.text);
            }
        }
    }

    fn print_jsx_namespaced_name(&mut self, name: &JsxNamespacedName) {
        self.w.write_raw(&name.namespace.text);
        self.w.write_raw(":");
        self.w.write_raw(&name.name.text);
    }

    fn print_jsx_attribute(&mut self, attribute: &JsxAttributeLike) {
        match attribute {
            JsxAttributeLike::Attribute(attr) => {
                match &attr.name {
                    JsxAttributeName::Identifier(id) => self.w.write_raw(&id.text),
                    JsxAttributeName::Namespaced(n) => self.print_jsx_namespaced_name(n),
                }
                let Some(value) = &attr.value else {
                    return;
                };
                self.w.write_raw("=");
                match value {
                    JsxAttributeValue::StringLiteral(s) => self.print_string_literal(s),
                    JsxAttributeValue::Expression(container) => self.print_jsx_expression_container(container),
                    JsxAttributeValue::Element(element) => self.print_jsx_element(element),
                    JsxAttributeValue::Fragment(fragment) => self.print_jsx_fragment(fragment),
                }
            }
            JsxAttributeLike::Spread(spread) => {
                self.w.write_raw("{...");
                self.print_expression(&spread.expression, OperatorPrecedence::Yield);
                self.w.write_raw("}");
            }
        }
    }
}
