//! esforge_diagnostics: Diagnostic messages and error reporting infrastructure.
//!
//! Every recoverable problem found while lexing, parsing, binding,
//! transforming or resolving modules is reported as a [`Diagnostic`] that
//! travels alongside the best-effort result. Messages are declared once in
//! the [`messages`] table and instantiated with positional arguments.

use esforge_core::text::TextSpan;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticCategory {
    Warning,
    Error,
    Message,
}

impl fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticCategory::Warning => write!(f, "warning"),
            DiagnosticCategory::Error => write!(f, "error"),
            DiagnosticCategory::Message => write!(f, "message"),
        }
    }
}

/// Which stage of the engine produced a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticKind {
    /// Malformed token; a placeholder token was produced.
    Lexical,
    /// Malformed construct; the parser synchronized and emitted an error node.
    Syntax,
    /// Unresolved or conflicting binding.
    Binding,
    /// A pass left a construct unchanged because it could not handle it.
    Transform,
    /// A specifier could not be resolved or fetched.
    Resolution,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DiagnosticKind::Lexical => "lexical",
            DiagnosticKind::Syntax => "syntax",
            DiagnosticKind::Binding => "binding",
            DiagnosticKind::Transform => "transform",
            DiagnosticKind::Resolution => "resolution",
        };
        f.write_str(s)
    }
}

/// A diagnostic message template with a code, category and kind.
#[derive(Debug, Clone)]
pub struct DiagnosticMessage {
    /// The diagnostic code (e.g., 1002, 2304).
    pub code: u32,
    pub category: DiagnosticCategory,
    pub kind: DiagnosticKind,
    /// The message template string. May contain `{0}`, `{1}`, etc. placeholders.
    pub message: &'static str,
}

/// A realized diagnostic with location information and resolved message text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    /// The file or module specifier where this diagnostic occurred, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// The source text span where this diagnostic occurred, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<TextSpan>,
    pub message_text: String,
    pub code: u32,
    pub category: DiagnosticCategory,
    pub kind: DiagnosticKind,
    /// Whether processing continued past this problem with a usable result.
    pub recoverable: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_information: Vec<Diagnostic>,
}

impl Diagnostic {
    /// Create a new diagnostic without location info.
    pub fn new(message: &DiagnosticMessage, args: &[&str]) -> Self {
        Self {
            file: None,
            span: None,
            message_text: format_message(message.message, args),
            code: message.code,
            category: message.category,
            kind: message.kind,
            recoverable: default_recoverable(message),
            related_information: Vec::new(),
        }
    }

    /// Create a new diagnostic attached to a span.
    pub fn at(span: TextSpan, message: &DiagnosticMessage, args: &[&str]) -> Self {
        let mut diag = Self::new(message, args);
        diag.span = Some(span);
        diag
    }

    /// Create a new diagnostic with file and span info.
    pub fn with_location(
        file: String,
        span: TextSpan,
        message: &DiagnosticMessage,
        args: &[&str],
    ) -> Self {
        let mut diag = Self::at(span, message, args);
        diag.file = Some(file);
        diag
    }

    /// Attach a file name if none is set yet.
    pub fn in_file(mut self, file: &str) -> Self {
        if self.file.is_none() {
            self.file = Some(file.to_string());
        }
        self
    }

    pub fn with_related(mut self, related: Diagnostic) -> Self {
        self.related_information.push(related);
        self
    }

    pub fn is_error(&self) -> bool {
        self.category == DiagnosticCategory::Error
    }
}

fn default_recoverable(message: &DiagnosticMessage) -> bool {
    !(message.kind == DiagnosticKind::Resolution && message.category == DiagnosticCategory::Error)
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref file) = self.file {
            write!(f, "{}", file)?;
            if let Some(span) = self.span {
                write!(f, "({})", span.start)?;
            }
            write!(f, ": ")?;
        }
        write!(f, "{} ES{}: {}", self.category, self.code, self.message_text)
    }
}

/// Format a diagnostic message template by replacing `{0}`, `{1}`, etc. with arguments.
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{}}}", i), arg);
    }
    result
}

/// A collection of diagnostics accumulated during one request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiagnosticCollection {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollection {
    pub fn new() -> Self {
        Self {
            diagnostics: Vec::new(),
        }
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn extend(&mut self, other: impl IntoIterator<Item = Diagnostic>) {
        self.diagnostics.extend(other);
    }

    /// Drop every diagnostic recorded after `len`. Used to roll back speculative parses.
    pub fn truncate(&mut self, len: usize) {
        self.diagnostics.truncate(len);
    }

    /// Sort diagnostics by file and position. Stable for equal positions.
    pub fn sort(&mut self) {
        self.diagnostics.sort_by(|a, b| {
            let file_cmp = a.file.cmp(&b.file);
            if file_cmp != std::cmp::Ordering::Equal {
                return file_cmp;
            }
            let a_pos = a.span.map(|s| s.start).unwrap_or(0);
            let b_pos = b.span.map(|s| s.start).unwrap_or(0);
            a_pos.cmp(&b_pos)
        });
    }
}

impl IntoIterator for DiagnosticCollection {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.into_iter()
    }
}

impl From<Vec<Diagnostic>> for DiagnosticCollection {
    fn from(diagnostics: Vec<Diagnostic>) -> Self {
        Self { diagnostics }
    }
}

// ============================================================================
// Diagnostic Messages
// ============================================================================

pub mod messages {
    use super::*;

    macro_rules! diag {
        ($code:expr, $category:ident, $kind:ident, $msg:expr) => {
            DiagnosticMessage {
                code: $code,
                category: DiagnosticCategory::$category,
                kind: DiagnosticKind::$kind,
                message: $msg,
            }
        };
    }

    // ========================================================================
    // Scanner errors
    // ========================================================================
    pub const UNTERMINATED_STRING_LITERAL: DiagnosticMessage = diag!(1002, Error, Lexical, "Unterminated string literal.");
    pub const ASTERISK_SLASH_EXPECTED: DiagnosticMessage = diag!(1010, Error, Lexical, "'*/' expected.");
    pub const DIGIT_EXPECTED: DiagnosticMessage = diag!(1124, Error, Lexical, "Digit expected.");
    pub const HEXADECIMAL_DIGIT_EXPECTED: DiagnosticMessage = diag!(1125, Error, Lexical, "Hexadecimal digit expected.");
    pub const UNEXPECTED_END_OF_TEXT: DiagnosticMessage = diag!(1126, Error, Lexical, "Unexpected end of text.");
    pub const INVALID_CHARACTER: DiagnosticMessage = diag!(1127, Error, Lexical, "Invalid character.");
    pub const UNTERMINATED_TEMPLATE_LITERAL: DiagnosticMessage = diag!(1160, Error, Lexical, "Unterminated template literal.");
    pub const UNTERMINATED_REGULAR_EXPRESSION_LITERAL: DiagnosticMessage = diag!(1161, Error, Lexical, "Unterminated regular expression literal.");
    pub const AN_EXTENDED_UNICODE_ESCAPE_VALUE_MUST_BE_BETWEEN_0X0_AND_0X10FFFF: DiagnosticMessage = diag!(1198, Error, Lexical, "An extended Unicode escape value must be between 0x0 and 0x10FFFF inclusive.");
    pub const UNTERMINATED_UNICODE_ESCAPE_SEQUENCE: DiagnosticMessage = diag!(1199, Error, Lexical, "Unterminated Unicode escape sequence.");
    pub const AN_IDENTIFIER_OR_KEYWORD_CANNOT_IMMEDIATELY_FOLLOW_A_NUMERIC_LITERAL: DiagnosticMessage = diag!(1351, Error, Lexical, "An identifier or keyword cannot immediately follow a numeric literal.");
    pub const NUMERIC_SEPARATORS_ARE_NOT_ALLOWED_HERE: DiagnosticMessage = diag!(6188, Error, Lexical, "Numeric separators are not allowed here.");
    pub const MULTIPLE_CONSECUTIVE_NUMERIC_SEPARATORS_ARE_NOT_PERMITTED: DiagnosticMessage = diag!(6189, Error, Lexical, "Multiple consecutive numeric separators are not permitted.");
    pub const UNEXPECTED_TOKEN_DID_YOU_MEAN_0: DiagnosticMessage = diag!(1382, Error, Lexical, "Unexpected token. Did you mean `{0}`?");

    // ========================================================================
    // Parser errors
    // ========================================================================
    pub const IDENTIFIER_EXPECTED: DiagnosticMessage = diag!(1003, Error, Syntax, "Identifier expected.");
    pub const _0_EXPECTED: DiagnosticMessage = diag!(1005, Error, Syntax, "'{0}' expected.");
    pub const TRAILING_COMMA_NOT_ALLOWED: DiagnosticMessage = diag!(1009, Error, Syntax, "Trailing comma not allowed.");
    pub const UNEXPECTED_TOKEN: DiagnosticMessage = diag!(1012, Error, Syntax, "Unexpected token.");
    pub const A_REST_PARAMETER_MUST_BE_LAST: DiagnosticMessage = diag!(1014, Error, Syntax, "A rest parameter must be last in a parameter list.");
    pub const ONLY_A_SINGLE_VARIABLE_DECLARATION_IS_ALLOWED_IN_A_FOR_0_STATEMENT: DiagnosticMessage = diag!(1091, Error, Syntax, "Only a single variable declaration is allowed in a 'for...{0}' statement.");
    pub const EXPRESSION_EXPECTED: DiagnosticMessage = diag!(1109, Error, Syntax, "Expression expected.");
    pub const TYPE_EXPECTED: DiagnosticMessage = diag!(1110, Error, Syntax, "Type expected.");
    pub const CASE_OR_DEFAULT_EXPECTED: DiagnosticMessage = diag!(1130, Error, Syntax, "'case' or 'default' expected.");
    pub const PROPERTY_OR_SIGNATURE_EXPECTED: DiagnosticMessage = diag!(1131, Error, Syntax, "Property or signature expected.");
    pub const ENUM_MEMBER_EXPECTED: DiagnosticMessage = diag!(1132, Error, Syntax, "Enum member expected.");
    pub const VARIABLE_DECLARATION_EXPECTED: DiagnosticMessage = diag!(1134, Error, Syntax, "Variable declaration expected.");
    pub const ARGUMENT_EXPRESSION_EXPECTED: DiagnosticMessage = diag!(1135, Error, Syntax, "Argument expression expected.");
    pub const PROPERTY_ASSIGNMENT_EXPECTED: DiagnosticMessage = diag!(1136, Error, Syntax, "Property assignment expected.");
    pub const PARAMETER_DECLARATION_EXPECTED: DiagnosticMessage = diag!(1138, Error, Syntax, "Parameter declaration expected.");
    pub const TYPE_PARAMETER_DECLARATION_EXPECTED: DiagnosticMessage = diag!(1139, Error, Syntax, "Type parameter declaration expected.");
    pub const DECLARATION_OR_STATEMENT_EXPECTED: DiagnosticMessage = diag!(1128, Error, Syntax, "Declaration or statement expected.");
    pub const MODIFIERS_CANNOT_APPEAR_HERE: DiagnosticMessage = diag!(1184, Error, Syntax, "Modifiers cannot appear here.");
    pub const LINE_TERMINATOR_NOT_PERMITTED_BEFORE_ARROW: DiagnosticMessage = diag!(1200, Error, Syntax, "Line terminator not permitted before arrow.");
    pub const _0_DECLARATIONS_CAN_ONLY_BE_USED_IN_A_MODULE: DiagnosticMessage = diag!(1208, Error, Syntax, "'{0}' declarations can only be used in a module.");
    pub const DECORATORS_ARE_NOT_ENABLED: DiagnosticMessage = diag!(1219, Error, Syntax, "Decorators are not enabled. Set the 'decorators' parse option to use them.");
    pub const DECORATORS_ARE_NOT_VALID_HERE: DiagnosticMessage = diag!(1206, Error, Syntax, "Decorators are not valid here.");
    pub const INVALID_LEFT_HAND_SIDE_OF_ASSIGNMENT: DiagnosticMessage = diag!(2364, Error, Syntax, "The left-hand side of an assignment expression must be a variable or a property access.");
    pub const INVALID_ESCAPE_SEQUENCE_IN_TEMPLATE: DiagnosticMessage = diag!(1488, Error, Syntax, "Invalid escape sequence in template literal.");
    pub const MAXIMUM_NESTING_DEPTH_EXCEEDED: DiagnosticMessage = diag!(1500, Error, Syntax, "Maximum nesting depth exceeded.");
    pub const EXPECTED_CORRESPONDING_JSX_CLOSING_TAG_FOR_0: DiagnosticMessage = diag!(17002, Error, Syntax, "Expected corresponding JSX closing tag for '{0}'.");
    pub const JSX_IS_NOT_ENABLED: DiagnosticMessage = diag!(17004, Error, Syntax, "Cannot use JSX unless the 'jsx' parse option is enabled.");
    pub const JSX_ELEMENT_0_HAS_NO_CORRESPONDING_CLOSING_TAG: DiagnosticMessage = diag!(17008, Error, Syntax, "JSX element '{0}' has no corresponding closing tag.");
    pub const JSX_EXPRESSIONS_MUST_HAVE_ONE_PARENT_ELEMENT: DiagnosticMessage = diag!(2657, Error, Syntax, "JSX expressions must have one parent element.");
    pub const TYPE_ANNOTATIONS_CAN_ONLY_BE_USED_IN_TYPESCRIPT_FILES: DiagnosticMessage = diag!(8010, Error, Syntax, "Type annotations can only be used in TypeScript files.");
    pub const _0_DECLARATIONS_CAN_ONLY_BE_USED_IN_TYPESCRIPT_FILES: DiagnosticMessage = diag!(8006, Error, Syntax, "'{0}' declarations can only be used in TypeScript files.");
    pub const TYPE_ASSERTION_EXPRESSIONS_CAN_ONLY_BE_USED_IN_TYPESCRIPT_FILES: DiagnosticMessage = diag!(8016, Error, Syntax, "Type assertion expressions can only be used in TypeScript files.");
    pub const TYPE_PARAMETER_DECLARATIONS_CAN_ONLY_BE_USED_IN_TYPESCRIPT_FILES: DiagnosticMessage = diag!(8004, Error, Syntax, "Type parameter declarations can only be used in TypeScript files.");
    pub const TYPE_ARGUMENTS_CAN_ONLY_BE_USED_IN_TYPESCRIPT_FILES: DiagnosticMessage = diag!(8011, Error, Syntax, "Type arguments can only be used in TypeScript files.");
    pub const NON_NULL_ASSERTIONS_CAN_ONLY_BE_USED_IN_TYPESCRIPT_FILES: DiagnosticMessage = diag!(8013, Error, Syntax, "Non-null assertions can only be used in TypeScript files.");
    pub const TYPE_SATISFACTION_EXPRESSIONS_CAN_ONLY_BE_USED_IN_TYPESCRIPT_FILES: DiagnosticMessage = diag!(8037, Error, Syntax, "Type satisfaction expressions can only be used in TypeScript files.");

    // ========================================================================
    // Binder errors
    // ========================================================================
    pub const DUPLICATE_IDENTIFIER_0: DiagnosticMessage = diag!(2300, Error, Binding, "Duplicate identifier '{0}'.");
    pub const CANNOT_FIND_NAME_0: DiagnosticMessage = diag!(2304, Warning, Binding, "Cannot find name '{0}'; it is possibly undefined.");
    pub const MODULE_HAS_ALREADY_EXPORTED_A_MEMBER_NAMED_0: DiagnosticMessage = diag!(2308, Error, Binding, "Module has already exported a member named '{0}'.");
    pub const IMPORT_DECLARATION_CONFLICTS_WITH_LOCAL_DECLARATION_OF_0: DiagnosticMessage = diag!(2440, Error, Binding, "Import declaration conflicts with local declaration of '{0}'.");
    pub const CANNOT_REDECLARE_BLOCK_SCOPED_VARIABLE_0: DiagnosticMessage = diag!(2451, Error, Binding, "Cannot redeclare block-scoped variable '{0}'.");

    // ========================================================================
    // Transform diagnostics
    // ========================================================================
    pub const PASS_0_CANNOT_TRANSFORM_1: DiagnosticMessage = diag!(9001, Warning, Transform, "Pass '{0}' cannot transform {1}; it was left unchanged.");
    pub const PASS_0_LEFT_1_FOR_TARGET_2: DiagnosticMessage = diag!(9002, Warning, Transform, "Pass '{0}' cannot lower {1} for target '{2}'; it was left unchanged.");
    pub const ENUM_MEMBER_INITIALIZER_0_IS_NOT_CONSTANT: DiagnosticMessage = diag!(9003, Message, Transform, "Initializer of enum member '{0}' is not constant; it is evaluated at runtime.");

    // ========================================================================
    // Module resolution errors
    // ========================================================================
    pub const CANNOT_FIND_MODULE_0_IMPORTED_FROM_1: DiagnosticMessage = diag!(2307, Error, Resolution, "Cannot find module '{0}' imported from '{1}'.");
    pub const MODULE_0_HAS_NO_EXPORTED_MEMBER_1: DiagnosticMessage = diag!(2305, Error, Resolution, "Module '{0}' has no exported member '{1}'.");
    pub const FAILED_TO_LOAD_MODULE_0_1: DiagnosticMessage = diag!(5001, Error, Resolution, "Failed to load module '{0}': {1}");
    pub const MODULE_GRAPH_EXCEEDS_LIMIT_OF_0_MODULES: DiagnosticMessage = diag!(5002, Error, Resolution, "Module graph exceeds the limit of {0} modules.");
    pub const MODULE_0_HAS_SYNTAX_ERRORS: DiagnosticMessage = diag!(5003, Error, Resolution, "Module '{0}' has syntax errors and cannot be bundled.");
    pub const CIRCULAR_IMPORT_BETWEEN_0_AND_1: DiagnosticMessage = diag!(5004, Message, Resolution, "Circular import between '{0}' and '{1}'.");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_message() {
        let msg = format_message("Pass '{0}' cannot transform {1}.", &["es2015", "a class"]);
        assert_eq!(msg, "Pass 'es2015' cannot transform a class.");
    }

    #[test]
    fn test_format_message_no_args() {
        assert_eq!(format_message("Unexpected token.", &[]), "Unexpected token.");
    }

    #[test]
    fn test_diagnostic_display() {
        let diag = Diagnostic::with_location(
            "test.ts".to_string(),
            TextSpan::new(10, 5),
            &messages::CANNOT_FIND_NAME_0,
            &["foo"],
        );
        let display = format!("{}", diag);
        assert!(display.contains("test.ts(10)"));
        assert!(display.contains("ES2304"));
        assert!(display.contains("foo"));
    }

    #[test]
    fn test_recoverable_defaults() {
        let syntax = Diagnostic::new(&messages::UNEXPECTED_TOKEN, &[]);
        assert!(syntax.recoverable);
        assert_eq!(syntax.kind, DiagnosticKind::Syntax);
        let resolution = Diagnostic::new(&messages::CANNOT_FIND_MODULE_0_IMPORTED_FROM_1, &["./x", "a.js"]);
        assert!(!resolution.recoverable);
        let cycle = Diagnostic::new(&messages::CIRCULAR_IMPORT_BETWEEN_0_AND_1, &["a", "b"]);
        assert!(cycle.recoverable);
    }

    #[test]
    fn test_diagnostic_collection() {
        let mut collection = DiagnosticCollection::new();
        assert!(collection.is_empty());
        collection.add(Diagnostic::new(&messages::UNEXPECTED_TOKEN, &[]));
        collection.add(Diagnostic::new(&messages::CANNOT_FIND_NAME_0, &["x"]));
        assert!(collection.has_errors());
        assert_eq!(collection.error_count(), 1);
        collection.truncate(1);
        assert_eq!(collection.len(), 1);
    }

    #[test]
    fn test_diagnostic_collection_sort() {
        let mut collection = DiagnosticCollection::new();
        collection.add(Diagnostic::with_location("b.ts".into(), TextSpan::new(10, 1), &messages::UNEXPECTED_TOKEN, &[]));
        collection.add(Diagnostic::with_location("a.ts".into(), TextSpan::new(5, 1), &messages::IDENTIFIER_EXPECTED, &[]));
        collection.sort();
        assert_eq!(collection.diagnostics()[0].file.as_deref(), Some("a.ts"));
        assert_eq!(collection.diagnostics()[1].file.as_deref(), Some("b.ts"));
    }

    #[test]
    fn test_serialized_shape() {
        let diag = Diagnostic::at(TextSpan::new(3, 2), &messages::UNTERMINATED_STRING_LITERAL, &[]);
        let json = serde_json::to_value(&diag).unwrap();
        assert_eq!(json["category"], "error");
        assert_eq!(json["kind"], "lexical");
        assert_eq!(json["messageText"], "Unterminated string literal.");
        assert_eq!(json["span"]["start"], 3);
        assert!(json.get("file").is_none());
    }
}
