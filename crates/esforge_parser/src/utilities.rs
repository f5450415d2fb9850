//! Token classification used by the parser's lookahead decisions.

use esforge_ast::syntax_kind::SyntaxKind;

/// Check if a token kind can start a statement.
pub fn can_start_statement(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::OpenBraceToken
            | SyntaxKind::SemicolonToken
            | SyntaxKind::VarKeyword
            | SyntaxKind::LetKeyword
            | SyntaxKind::ConstKeyword
            | SyntaxKind::UsingKeyword
            | SyntaxKind::FunctionKeyword
            | SyntaxKind::ClassKeyword
            | SyntaxKind::EnumKeyword
            | SyntaxKind::IfKeyword
            | SyntaxKind::DoKeyword
            | SyntaxKind::WhileKeyword
            | SyntaxKind::ForKeyword
            | SyntaxKind::ContinueKeyword
            | SyntaxKind::BreakKeyword
            | SyntaxKind::ReturnKeyword
            | SyntaxKind::WithKeyword
            | SyntaxKind::SwitchKeyword
            | SyntaxKind::ThrowKeyword
            | SyntaxKind::TryKeyword
            | SyntaxKind::DebuggerKeyword
            | SyntaxKind::CatchKeyword
            | SyntaxKind::FinallyKeyword
            | SyntaxKind::ExportKeyword
            | SyntaxKind::ImportKeyword
            | SyntaxKind::AtToken
    ) || is_start_of_expression(kind)
        || (kind.is_keyword() && !kind.is_reserved_word())
}

/// Check if a token kind can start an expression.
pub fn is_start_of_expression(kind: SyntaxKind) -> bool {
    if is_left_hand_side_expression_start(kind) {
        return true;
    }
    matches!(
        kind,
        SyntaxKind::PlusToken
            | SyntaxKind::MinusToken
            | SyntaxKind::TildeToken
            | SyntaxKind::ExclamationToken
            | SyntaxKind::DeleteKeyword
            | SyntaxKind::TypeOfKeyword
            | SyntaxKind::VoidKeyword
            | SyntaxKind::PlusPlusToken
            | SyntaxKind::MinusMinusToken
            | SyntaxKind::LessThanToken
            | SyntaxKind::AwaitKeyword
            | SyntaxKind::YieldKeyword
            | SyntaxKind::PrivateIdentifier
            | SyntaxKind::AtToken
            | SyntaxKind::SlashEqualsToken
    )
}

/// Check if a token kind is a left-hand-side expression start.
pub fn is_left_hand_side_expression_start(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::Identifier
            | SyntaxKind::NumericLiteral
            | SyntaxKind::BigIntLiteral
            | SyntaxKind::StringLiteral
            | SyntaxKind::NoSubstitutionTemplateLiteral
            | SyntaxKind::TemplateHead
            | SyntaxKind::OpenParenToken
            | SyntaxKind::OpenBracketToken
            | SyntaxKind::OpenBraceToken
            | SyntaxKind::FunctionKeyword
            | SyntaxKind::ClassKeyword
            | SyntaxKind::NewKeyword
            | SyntaxKind::SlashToken
            | SyntaxKind::RegularExpressionLiteral
            | SyntaxKind::ThisKeyword
            | SyntaxKind::SuperKeyword
            | SyntaxKind::TrueKeyword
            | SyntaxKind::FalseKeyword
            | SyntaxKind::NullKeyword
            | SyntaxKind::ImportKeyword
    ) || (kind.is_keyword() && !kind.is_reserved_word())
}

/// Check if a token kind can start a type.
pub fn is_start_of_type(kind: SyntaxKind) -> bool {
    kind.is_type_keyword()
        || matches!(
            kind,
            SyntaxKind::Identifier
                | SyntaxKind::TypeOfKeyword
                | SyntaxKind::KeyOfKeyword
                | SyntaxKind::UniqueKeyword
                | SyntaxKind::ReadonlyKeyword
                | SyntaxKind::InferKeyword
                | SyntaxKind::ImportKeyword
                | SyntaxKind::AssertsKeyword
                | SyntaxKind::ThisKeyword
                | SyntaxKind::NewKeyword
                | SyntaxKind::AbstractKeyword
                | SyntaxKind::OpenBraceToken
                | SyntaxKind::OpenBracketToken
                | SyntaxKind::OpenParenToken
                | SyntaxKind::LessThanToken
                | SyntaxKind::BarToken
                | SyntaxKind::AmpersandToken
                | SyntaxKind::StringLiteral
                | SyntaxKind::NumericLiteral
                | SyntaxKind::BigIntLiteral
                | SyntaxKind::TrueKeyword
                | SyntaxKind::FalseKeyword
                | SyntaxKind::MinusToken
                | SyntaxKind::AsteriskToken
                | SyntaxKind::QuestionToken
                | SyntaxKind::ExclamationToken
                | SyntaxKind::DotDotDotToken
                | SyntaxKind::NoSubstitutionTemplateLiteral
                | SyntaxKind::TemplateHead
        )
        || (kind.is_keyword() && !kind.is_reserved_word())
}

/// Tokens that may name a property without brackets.
pub fn is_literal_property_name(kind: SyntaxKind) -> bool {
    kind.is_identifier_or_keyword()
        || matches!(
            kind,
            SyntaxKind::StringLiteral
                | SyntaxKind::NumericLiteral
                | SyntaxKind::BigIntLiteral
                | SyntaxKind::PrivateIdentifier
        )
}

/// Human-readable spelling of a token for `'{0}' expected.` messages.
pub fn token_to_string(kind: SyntaxKind) -> &'static str {
    match kind {
        SyntaxKind::Identifier => "identifier",
        SyntaxKind::StringLiteral => "string literal",
        SyntaxKind::EndOfFileToken => "end of file",
        _ => kind.token_text().unwrap_or("token"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contextual_keywords_start_expressions() {
        assert!(is_start_of_expression(SyntaxKind::AsyncKeyword));
        assert!(is_start_of_expression(SyntaxKind::TypeKeyword));
        assert!(!is_start_of_expression(SyntaxKind::CaseKeyword));
    }

    #[test]
    fn test_statement_starts() {
        assert!(can_start_statement(SyntaxKind::AtToken));
        assert!(can_start_statement(SyntaxKind::InterfaceKeyword));
        assert!(!can_start_statement(SyntaxKind::CloseParenToken));
        assert!(!can_start_statement(SyntaxKind::ElseKeyword));
    }
}
