//! Runtime helpers injected into transformed programs.

use esforge_ast::{Program, Statement};
use esforge_core::text::TextRange;
use esforge_options::ParseOptions;
use lazy_static::lazy_static;
use serde_json::Value;

/// A helper function some pass output calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Helper {
    Decorate,
    Param,
}

impl Helper {
    pub(crate) fn name(self) -> &'static str {
        match self {
            Helper::Decorate => "__decorate",
            Helper::Param => "__param",
        }
    }

    fn source(self) -> &'static str {
        match self {
            Helper::Decorate => DECORATE_SOURCE,
            Helper::Param => PARAM_SOURCE,
        }
    }
}

const DECORATE_SOURCE: &str = r#"var __decorate = (this && this.__decorate) || function (decorators, target, key, desc) {
    var c = arguments.length, r = c < 3 ? target : desc === null ? desc = Object.getOwnPropertyDescriptor(target, key) : desc, d;
    if (typeof Reflect === "object" && typeof Reflect.decorate === "function") r = Reflect.decorate(decorators, target, key, desc);
    else for (var i = decorators.length - 1; i >= 0; i--) if (d = decorators[i]) r = (c < 3 ? d(r) : c > 3 ? d(target, key, r) : d(target, key)) || r;
    return c > 3 && r && Object.defineProperty(target, key, r), r;
};"#;

const PARAM_SOURCE: &str = r#"var __param = (this && this.__param) || function (paramIndex, decorator) {
    return function (target, key) { decorator(target, key, paramIndex); };
};"#;

lazy_static! {
    static ref DECORATE: Vec<Statement> = synthesize(Helper::Decorate);
    static ref PARAM: Vec<Statement> = synthesize(Helper::Param);
}

/// Parse a helper once and strip everything that ties it to its own text:
/// ranges become dummies and identifier ids are dropped, so the printer
/// emits no mappings for it and the binder treats it as new code.
fn synthesize(helper: Helper) -> Vec<Statement> {
    let parsed = esforge_parser::parse_program(helper.source(), &ParseOptions::for_file("helpers.js"));
    if parsed.has_errors() {
        tracing::warn!(helper = helper.name(), "helper source failed to parse");
        return Vec::new();
    }
    let Ok(mut value) = serde_json::to_value(&parsed.program.statements) else {
        return Vec::new();
    };
    let Ok(dummy) = serde_json::to_value(TextRange::DUMMY) else {
        return Vec::new();
    };
    erase_positions(&mut value, &dummy);
    serde_json::from_value(value).unwrap_or_default()
}

fn erase_positions(value: &mut Value, dummy: &Value) {
    match value {
        Value::Object(map) => {
            map.remove("id");
            if let Some(range) = map.get_mut("range") {
                *range = dummy.clone();
            }
            if map.contains_key("value") {
                map.remove("raw");
            }
            map.values_mut().for_each(|v| erase_positions(v, dummy));
        }
        Value::Array(items) => items.iter_mut().for_each(|v| erase_positions(v, dummy)),
        _ => {}
    }
}

fn statements_for(helper: Helper) -> Vec<Statement> {
    match helper {
        Helper::Decorate => DECORATE.clone(),
        Helper::Param => PARAM.clone(),
    }
}

/// Whether the program already declares `name` at the top level.
fn declares(program: &Program, name: &str) -> bool {
    program.statements.iter().any(|stmt| match stmt {
        Statement::Variable(v) => v
            .declaration_list
            .declarations
            .iter()
            .any(|d| d.name.as_identifier().is_some_and(|id| id.text == name)),
        Statement::Function(f) => f.name.as_ref().is_some_and(|id| id.text == name),
        _ => false,
    })
}

/// Insert the given helpers after the directive prologue and the leading
/// imports, skipping any the program already defines.
pub(crate) fn inject(program: &mut Program, helpers: &[Helper]) {
    let mut statements = Vec::new();
    for &helper in helpers {
        if !declares(program, helper.name()) {
            statements.extend(statements_for(helper));
        }
    }
    if statements.is_empty() {
        return;
    }
    let prologue = crate::util::prologue_length(&program.statements);
    let at = prologue
        + program.statements[prologue..]
            .iter()
            .take_while(|stmt| matches!(stmt, Statement::Import(_)))
            .count();
    program.statements.splice(at..at, statements);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_helpers_are_synthesized() {
        let decorate = statements_for(Helper::Decorate);
        assert_eq!(decorate.len(), 1);
        assert!(decorate[0].range().is_dummy());
        assert_eq!(statements_for(Helper::Param).len(), 1);
    }

    #[test]
    fn test_inject_after_imports() {
        let mut program =
            esforge_parser::parse_program("import a from 'a';\nfoo();", &ParseOptions::default()).program;
        inject(&mut program, &[Helper::Decorate, Helper::Param]);
        assert!(matches!(program.statements[0], Statement::Import(_)));
        assert!(declares(&program, "__decorate"));
        assert!(declares(&program, "__param"));
        assert_eq!(program.statements.len(), 4);
    }

    #[test]
    fn test_inject_skips_existing_definition() {
        let mut program =
            esforge_parser::parse_program("var __param = 1;", &ParseOptions::default()).program;
        inject(&mut program, &[Helper::Param]);
        assert_eq!(program.statements.len(), 1);
    }
}
