//! Request and response shapes of the five operations.
//!
//! Every type is serde-enabled with camelCase keys so a host can pass JSON
//! straight through; the operations themselves never see the encoding.

use esforge_ast::Program;
use esforge_diagnostics::Diagnostic;
use esforge_module::Dependency;
use esforge_options::{ParseOptions, PrintOptions, TransformOptions};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseRequest {
    pub source: String,
    #[serde(default)]
    pub options: ParseOptions,
}

impl ParseRequest {
    pub fn new(source: impl Into<String>, options: ParseOptions) -> Self {
        Self {
            source: source.into(),
            options,
        }
    }
}

/// A tree plus everything that went wrong producing it. Also the result of
/// [`crate::transform_to_ast`], so a transformed tree can go to `print`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseResponse {
    pub program: Program,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintRequest {
    pub program: Program,
    #[serde(default)]
    pub options: PrintOptions,
    /// Original text the tree was parsed from. Required for source maps.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintResponse {
    pub code: String,
    /// Source Map v3 JSON when `sourceMap` was requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_map: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformRequest {
    pub source: String,
    #[serde(default)]
    pub options: TransformOptions,
}

impl TransformRequest {
    pub fn new(source: impl Into<String>, options: TransformOptions) -> Self {
        Self {
            source: source.into(),
            options,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformResponse {
    pub code: String,
    pub diagnostics: Vec<Diagnostic>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_map: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependenciesRequest {
    pub source: String,
    #[serde(default)]
    pub options: ParseOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependenciesResponse {
    pub specifiers: Vec<Dependency>,
    /// Parse diagnostics; extraction itself never fails.
    pub diagnostics: Vec<Diagnostic>,
}
