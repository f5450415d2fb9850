//! Rendering engine diagnostics with miette.

use std::collections::HashMap;
use std::fmt;

use esforge_diagnostics::{Diagnostic, DiagnosticCategory};
use miette::{LabeledSpan, NamedSource, Severity, SourceCode, SourceSpan};

/// One diagnostic paired with the text it points into, if known.
#[derive(Debug)]
pub struct DiagnosticReport {
    diagnostic: Diagnostic,
    source: Option<NamedSource<String>>,
}

impl DiagnosticReport {
    pub fn new(diagnostic: Diagnostic, source: Option<(&str, &str)>) -> Self {
        let source = source.map(|(name, text)| NamedSource::new(name, text.to_string()));
        Self { diagnostic, source }
    }

    /// The diagnostic's span clamped to the source it is rendered against.
    fn span(&self) -> Option<SourceSpan> {
        let span = self.diagnostic.span?;
        let len = self.source.as_ref()?.inner().len();
        let start = (span.start as usize).min(len);
        let length = (span.length as usize).min(len - start);
        Some(SourceSpan::new(start.into(), length))
    }
}

impl fmt::Display for DiagnosticReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.diagnostic.file, &self.source) {
            (Some(file), None) => write!(f, "{}: {}", file, self.diagnostic.message_text),
            _ => f.write_str(&self.diagnostic.message_text),
        }
    }
}

impl std::error::Error for DiagnosticReport {}

impl miette::Diagnostic for DiagnosticReport {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(format!("ES{}", self.diagnostic.code)))
    }

    fn severity(&self) -> Option<Severity> {
        Some(match self.diagnostic.category {
            DiagnosticCategory::Error => Severity::Error,
            DiagnosticCategory::Warning => Severity::Warning,
            DiagnosticCategory::Message => Severity::Advice,
        })
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        self.source.as_ref().map(|source| source as &dyn SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let span = self.span()?;
        let label = LabeledSpan::new_with_span(Some(self.diagnostic.kind.to_string()), span);
        Some(Box::new(std::iter::once(label)))
    }
}

/// Source texts by file name, read on demand for diagnostics that point
/// into modules the command did not read itself.
#[derive(Debug, Default)]
pub struct Sources {
    texts: HashMap<String, Option<String>>,
}

impl Sources {
    pub fn with(mut self, name: &str, text: &str) -> Self {
        self.texts.insert(name.to_string(), Some(text.to_string()));
        self
    }

    fn get(&mut self, name: &str) -> Option<&str> {
        self.texts
            .entry(name.to_string())
            .or_insert_with(|| std::fs::read_to_string(name).ok())
            .as_deref()
    }
}

/// Print every diagnostic to stderr. `fallback` names the file for
/// diagnostics that carry none.
pub fn emit(diagnostics: &[Diagnostic], sources: &mut Sources, fallback: Option<&str>) {
    for diagnostic in diagnostics {
        let file = diagnostic.file.as_deref().or(fallback);
        let source = file.and_then(|name| sources.get(name).map(|text| (name, text)));
        let report = DiagnosticReport::new(diagnostic.clone(), source);
        eprintln!("{:?}", miette::Report::new(report));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use esforge_diagnostics::messages;
    use esforge_core::TextSpan;
    use miette::Diagnostic as _;

    #[test]
    fn test_span_is_clamped_to_source() {
        let diagnostic = Diagnostic::at(TextSpan::new(3, 50), &messages::MODULE_0_HAS_SYNTAX_ERRORS, &["a.js"]);
        let report = DiagnosticReport::new(diagnostic, Some(("a.js", "let x;")));
        let span = report.span().unwrap();
        assert_eq!(span.offset(), 3);
        assert_eq!(span.len(), 3);
    }

    #[test]
    fn test_code_and_severity() {
        let diagnostic = Diagnostic::new(&messages::CIRCULAR_IMPORT_BETWEEN_0_AND_1, &["a", "b"]);
        let report = DiagnosticReport::new(diagnostic, None);
        assert_eq!(report.code().unwrap().to_string(), "ES5004");
        assert_eq!(report.severity(), Some(Severity::Advice));
        assert!(report.labels().is_none());
    }

    #[test]
    fn test_display_names_file_without_source() {
        let diagnostic =
            Diagnostic::new(&messages::FAILED_TO_LOAD_MODULE_0_1, &["x.js", "gone"]).in_file("x.js");
        let report = DiagnosticReport::new(diagnostic, None);
        assert!(report.to_string().starts_with("x.js: "));
    }
}
