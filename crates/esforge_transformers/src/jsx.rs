//! JSX to factory calls (classic runtime).
//!
//! `<div id="a">{x}</div>` becomes `React.createElement("div", { id: "a" }, x)`.
//! Text children follow the usual whitespace rules: lines are trimmed, lines
//! that are only whitespace vanish and the rest are joined with one space.

use esforge_ast::visitor::is_intrinsic_jsx_name;
use esforge_ast::visitor_mut::{self, AstVisitorMut};
use esforge_ast::*;
use lazy_static::lazy_static;
use regex::Regex;
use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::context::PassContext;
use crate::pass::Pass;
use crate::pipeline::Configurable;
use crate::util::take;

lazy_static! {
    static ref ENTITY_PATH: Regex = Regex::new(r"^[A-Za-z_$][\w$]*(\.[A-Za-z_$][\w$]*)*$").expect("invalid regex");
    static ref ENTITY: Regex = Regex::new(r"&(?:#x([0-9a-fA-F]+)|#([0-9]+)|([A-Za-z][A-Za-z0-9]*));").expect("invalid regex");
    static ref NAMED_ENTITIES: FxHashMap<&'static str, char> = [
        ("amp", '&'),
        ("lt", '<'),
        ("gt", '>'),
        ("quot", '"'),
        ("apos", '\''),
        ("nbsp", '\u{a0}'),
        ("copy", '\u{a9}'),
        ("reg", '\u{ae}'),
        ("trade", '\u{2122}'),
        ("hellip", '\u{2026}'),
        ("mdash", '\u{2014}'),
        ("ndash", '\u{2013}'),
        ("lsquo", '\u{2018}'),
        ("rsquo", '\u{2019}'),
        ("ldquo", '\u{201c}'),
        ("rdquo", '\u{201d}'),
        ("laquo", '\u{ab}'),
        ("raquo", '\u{bb}'),
        ("middot", '\u{b7}'),
        ("bull", '\u{2022}'),
        ("times", '\u{d7}'),
        ("divide", '\u{f7}'),
        ("deg", '\u{b0}'),
        ("euro", '\u{20ac}'),
        ("pound", '\u{a3}'),
        ("yen", '\u{a5}'),
        ("cent", '\u{a2}'),
        ("sect", '\u{a7}'),
        ("para", '\u{b6}'),
        ("larr", '\u{2190}'),
        ("rarr", '\u{2192}'),
        ("uarr", '\u{2191}'),
        ("darr", '\u{2193}'),
    ]
    .into_iter()
    .collect();
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct JsxOptions {
    /// Element factory, a dotted identifier path.
    pub pragma: String,
    /// Fragment component, a dotted identifier path.
    pub pragma_frag: String,
}

impl Default for JsxOptions {
    fn default() -> Self {
        Self {
            pragma: "React.createElement".to_string(),
            pragma_frag: "React.Fragment".to_string(),
        }
    }
}

#[derive(Debug, Default)]
pub struct Jsx {
    options: JsxOptions,
}

impl Jsx {
    pub fn new(options: JsxOptions) -> Result<Self, String> {
        for (option, value) in [("pragma", &options.pragma), ("pragmaFrag", &options.pragma_frag)] {
            if !ENTITY_PATH.is_match(value) {
                return Err(format!("'{}' is not a valid {} (expected a dotted identifier path)", value, option));
            }
        }
        Ok(Self { options })
    }
}

impl Configurable for Jsx {
    type Options = JsxOptions;

    fn from_options(options: Self::Options) -> Result<Self, String> {
        Self::new(options)
    }
}

impl Pass for Jsx {
    fn name(&self) -> &'static str {
        "jsx"
    }

    fn implicit_references(&self) -> Vec<String> {
        let mut roots: Vec<String> = [&self.options.pragma, &self.options.pragma_frag]
            .iter()
            .filter_map(|path| path.split('.').next())
            .map(str::to_string)
            .collect();
        roots.dedup();
        roots
    }

    fn apply(&self, program: &mut Program, _ctx: &mut PassContext) {
        let mut lowering = Lowering {
            pragma: path_expression(&self.options.pragma),
            pragma_frag: path_expression(&self.options.pragma_frag),
        };
        lowering.visit_program(program);
    }
}

/// `a.b.c` as a member expression chain.
fn path_expression(path: &str) -> Expression {
    let mut parts = path.split('.');
    let root = factory::ident(parts.next().unwrap_or_default());
    parts.fold(root, factory::member)
}

/// Replace HTML character references with the characters they name.
/// Unknown names are left as written.
pub(crate) fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    ENTITY
        .replace_all(text, |caps: &regex::Captures| {
            let decoded = if let Some(hex) = caps.get(1) {
                u32::from_str_radix(hex.as_str(), 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = caps.get(2) {
                dec.as_str().parse::<u32>().ok().and_then(char::from_u32)
            } else {
                caps.get(3).and_then(|name| NAMED_ENTITIES.get(name.as_str()).copied())
            };
            match decoded {
                Some(c) => c.to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Text child as it reaches the factory call, or `None` when it is only
/// layout whitespace.
pub(crate) fn clean_text(raw: &str) -> Option<String> {
    let lines: Vec<&str> = raw.split("\r\n").flat_map(|l| l.split(['\n', '\r'])).collect();
    let last_non_empty = lines.iter().rposition(|line| line.chars().any(|c| c != ' ' && c != '\t'));
    let mut out = String::new();
    for (index, line) in lines.iter().enumerate() {
        let mut trimmed = line.replace('\t', " ");
        if index != 0 {
            trimmed = trimmed.trim_start_matches(' ').to_string();
        }
        if index != lines.len() - 1 {
            trimmed = trimmed.trim_end_matches(' ').to_string();
        }
        if trimmed.is_empty() {
            continue;
        }
        out.push_str(&trimmed);
        if last_non_empty.is_some_and(|last| index < last) {
            out.push(' ');
        }
    }
    if out.is_empty() {
        None
    } else {
        Some(decode_entities(&out))
    }
}

struct Lowering {
    pragma: Expression,
    pragma_frag: Expression,
}

impl Lowering {
    fn tag(&self, tag: &JsxTagName) -> Expression {
        match tag {
            JsxTagName::Identifier(id) if id.text == "this" => factory::this(),
            JsxTagName::Identifier(id) if is_intrinsic_jsx_name(&id.text) => factory::string(&id.text),
            JsxTagName::Identifier(id) => Expression::Identifier(id.clone()),
            JsxTagName::Member(member) => factory::member(self.tag(&member.object), &member.property.text),
            JsxTagName::Namespaced(_) => factory::string(&tag.text()),
        }
    }

    fn attribute_value(&mut self, value: Option<JsxAttributeValue>) -> Expression {
        match value {
            None => factory::boolean(true),
            Some(JsxAttributeValue::StringLiteral(s)) => factory::string(&decode_entities(&s.value)),
            Some(JsxAttributeValue::Expression(container)) => match container.expression {
                Some(mut expr) => {
                    self.visit_expression(&mut expr);
                    *expr
                }
                None => factory::void_zero(),
            },
            Some(JsxAttributeValue::Element(element)) => self.element(*element),
            Some(JsxAttributeValue::Fragment(fragment)) => self.fragment(*fragment),
        }
    }

    fn props(&mut self, attributes: Vec<JsxAttributeLike>) -> Expression {
        if attributes.is_empty() {
            return factory::null();
        }
        if let [JsxAttributeLike::Spread(_)] = attributes.as_slice() {
            if let Some(JsxAttributeLike::Spread(mut spread)) = attributes.into_iter().next() {
                self.visit_expression(&mut spread.expression);
                return spread.expression;
            }
            return factory::null();
        }
        let mut properties = Vec::with_capacity(attributes.len());
        for attribute in attributes {
            match attribute {
                JsxAttributeLike::Attribute(attr) => {
                    let name = attr.name.text();
                    let value = self.attribute_value(attr.value);
                    properties.push(factory::property(&name, value));
                }
                JsxAttributeLike::Spread(mut spread) => {
                    self.visit_expression(&mut spread.expression);
                    properties.push(ObjectLiteralElement::Spread(SpreadAssignment {
                        data: NodeData::synthesized(SyntaxKind::SpreadAssignment),
                        expression: spread.expression,
                    }));
                }
            }
        }
        factory::object(properties)
    }

    fn children(&mut self, children: Vec<JsxChild>) -> Vec<Expression> {
        let mut out = Vec::with_capacity(children.len());
        for child in children {
            match child {
                JsxChild::Text(text) => {
                    if let Some(text) = clean_text(&text.value) {
                        out.push(factory::string(&text));
                    }
                }
                JsxChild::Expression(container) => {
                    let Some(mut expr) = container.expression else {
                        continue;
                    };
                    self.visit_expression(&mut expr);
                    out.push(if container.dot_dot_dot { factory::spread(*expr) } else { *expr });
                }
                JsxChild::Element(element) => out.push(self.element(*element)),
                JsxChild::Fragment(fragment) => out.push(self.fragment(*fragment)),
            }
        }
        out
    }

    fn create(&self, tag: Expression, props: Expression, children: Vec<Expression>) -> Expression {
        let mut arguments = vec![tag, props];
        arguments.extend(children);
        factory::call(self.pragma.clone(), arguments)
    }

    fn element(&mut self, element: JsxElement) -> Expression {
        let tag = self.tag(&element.opening.tag_name);
        let props = self.props(element.opening.attributes);
        let children = self.children(element.children);
        self.create(tag, props, children)
    }

    fn fragment(&mut self, fragment: JsxFragment) -> Expression {
        let children = self.children(fragment.children);
        self.create(self.pragma_frag.clone(), factory::null(), children)
    }
}

impl AstVisitorMut for Lowering {
    fn visit_expression(&mut self, node: &mut Expression) {
        if !matches!(node, Expression::JsxElement(_) | Expression::JsxFragment(_)) {
            return visitor_mut::walk_expression(self, node);
        }
        *node = match take(node) {
            Expression::JsxElement(element) => self.element(*element),
            Expression::JsxFragment(fragment) => self.fragment(*fragment),
            other => other,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text_trims_layout_whitespace() {
        assert_eq!(clean_text("\n    \n  "), None);
        assert_eq!(clean_text("  Hello\n    world  ").as_deref(), Some("  Hello world  "));
        assert_eq!(clean_text("a\n\n   b\n").as_deref(), Some("a b"));
        assert_eq!(clean_text(" ").as_deref(), Some(" "));
        assert_eq!(clean_text("\t").as_deref(), Some(" "));
    }

    #[test]
    fn test_decode_entities() {
        assert_eq!(decode_entities("a &amp; b &#65;&#x42; &unknown;"), "a & b AB &unknown;");
    }

    #[test]
    fn test_rejects_invalid_pragma() {
        let options = JsxOptions {
            pragma: "h()".into(),
            ..JsxOptions::default()
        };
        assert!(Jsx::new(options).is_err());
        let options = JsxOptions {
            pragma: "preact.h".into(),
            ..JsxOptions::default()
        };
        assert!(Jsx::new(options).is_ok());
    }

    #[test]
    fn test_implicit_references_are_roots() {
        let jsx = Jsx::default();
        assert_eq!(jsx.implicit_references(), vec!["React".to_string()]);
    }
}
