//! State shared by the passes of one pipeline run.

use esforge_ast::visitor::AstVisitor;
use esforge_ast::{Identifier, Program};
use esforge_binder::ScopeTree;
use esforge_core::text::TextRange;
use esforge_diagnostics::{messages, Diagnostic, DiagnosticMessage};
use esforge_options::EsTarget;
use rustc_hash::FxHashSet;

/// Target level, binding information, generated names and diagnostics for
/// one run over one program. Owned by that run alone.
pub struct PassContext {
    target: EsTarget,
    file_name: String,
    scopes: Option<ScopeTree>,
    diagnostics: Vec<Diagnostic>,
    used_names: FxHashSet<String>,
    implicit_references: FxHashSet<String>,
    next_temp: u32,
}

impl PassContext {
    pub fn new(target: EsTarget, file_name: &str) -> Self {
        Self {
            target,
            file_name: file_name.to_string(),
            scopes: None,
            diagnostics: Vec::new(),
            used_names: FxHashSet::default(),
            implicit_references: FxHashSet::default(),
            next_temp: 0,
        }
    }

    /// A context whose generated names avoid every identifier in `program`.
    pub fn for_program(program: &Program, target: EsTarget) -> Self {
        let mut ctx = Self::new(target, &program.file_name);
        let mut collector = NameCollector(&mut ctx.used_names);
        collector.visit_program(program);
        ctx
    }

    pub fn target(&self) -> EsTarget {
        self.target
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Binding of the program, present while a pass that asked for it runs.
    pub fn scopes(&self) -> Option<&ScopeTree> {
        self.scopes.as_ref()
    }

    pub fn set_scopes(&mut self, scopes: ScopeTree) {
        self.scopes = Some(scopes);
    }

    pub fn clear_scopes(&mut self) {
        self.scopes = None;
    }

    /// Move the binding out, for a pass that reads it while mutating the context.
    pub fn take_scopes(&mut self) -> Option<ScopeTree> {
        self.scopes.take()
    }

    pub fn add_implicit_reference(&mut self, name: String) {
        self.implicit_references.insert(name);
    }

    pub fn is_implicitly_referenced(&self, name: &str) -> bool {
        self.implicit_references.contains(name)
    }

    pub fn report(&mut self, diagnostic: Diagnostic) {
        let diagnostic = if self.file_name.is_empty() {
            diagnostic
        } else {
            diagnostic.in_file(&self.file_name)
        };
        self.diagnostics.push(diagnostic);
    }

    pub fn report_at(&mut self, range: TextRange, message: &DiagnosticMessage, args: &[&str]) {
        let diagnostic = if range.is_dummy() {
            Diagnostic::new(message, args)
        } else {
            Diagnostic::at(range.to_span(), message, args)
        };
        self.report(diagnostic);
    }

    /// `pass` met a construct it does not handle at all.
    pub fn unsupported(&mut self, pass: &str, what: &str, range: TextRange) {
        self.report_at(range, &messages::PASS_0_CANNOT_TRANSFORM_1, &[pass, what]);
    }

    /// `pass` met a construct the current target lacks and cannot lower it.
    pub fn cannot_lower(&mut self, pass: &str, what: &str, range: TextRange) {
        let target = self.target.as_str();
        self.report_at(range, &messages::PASS_0_LEFT_1_FOR_TARGET_2, &[pass, what, target]);
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    /// Whether `name` appears in the program or was handed out before.
    pub fn is_name_taken(&self, name: &str) -> bool {
        self.used_names.contains(name)
            || self.scopes.as_ref().is_some_and(|scopes| scopes.is_name_used(name))
    }

    /// `base`, or `base_1`, `base_2`, ... whichever is free first.
    pub fn unique_name(&mut self, base: &str) -> String {
        let mut candidate = base.to_string();
        let mut suffix = 1;
        while self.is_name_taken(&candidate) {
            candidate = format!("{}_{}", base, suffix);
            suffix += 1;
        }
        self.used_names.insert(candidate.clone());
        candidate
    }

    /// A fresh temporary: `_a` through `_z`, then `_a1`, `_b1`, ...
    pub fn temp_name(&mut self) -> String {
        loop {
            let letter = (b'a' + (self.next_temp % 26) as u8) as char;
            let round = self.next_temp / 26;
            self.next_temp += 1;
            let candidate = if round == 0 {
                format!("_{}", letter)
            } else {
                format!("_{}{}", letter, round)
            };
            if !self.is_name_taken(&candidate) {
                self.used_names.insert(candidate.clone());
                return candidate;
            }
        }
    }
}

struct NameCollector<'a>(&'a mut FxHashSet<String>);

impl AstVisitor for NameCollector<'_> {
    fn visit_binding_identifier(&mut self, node: &Identifier) {
        self.0.insert(node.text.clone());
    }

    fn visit_identifier_reference(&mut self, node: &Identifier) {
        self.0.insert(node.text.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use esforge_options::ParseOptions;

    fn context_for(source: &str) -> PassContext {
        let parsed = esforge_parser::parse_program(source, &ParseOptions::for_file("input.js"));
        PassContext::for_program(&parsed.program, EsTarget::Es5)
    }

    #[test]
    fn test_temp_names_skip_program_names() {
        let mut ctx = context_for("let _a = 1; _b();");
        assert_eq!(ctx.temp_name(), "_c");
        assert_eq!(ctx.temp_name(), "_d");
    }

    #[test]
    fn test_unique_name_suffixes() {
        let mut ctx = context_for("var _this;");
        assert_eq!(ctx.unique_name("_this"), "_this_1");
        assert_eq!(ctx.unique_name("_this"), "_this_2");
        assert_eq!(ctx.unique_name("_arguments"), "_arguments");
    }

    #[test]
    fn test_diagnostics_carry_file_name() {
        let mut ctx = PassContext::new(EsTarget::Es5, "a.js");
        ctx.cannot_lower("es2015", "a class", TextRange::new(3, 9));
        let diagnostic = &ctx.diagnostics()[0];
        assert_eq!(diagnostic.file.as_deref(), Some("a.js"));
        assert!(diagnostic.message_text.contains("'es5'"));
        assert_eq!(diagnostic.span.map(|s| s.start), Some(3));
    }
}
