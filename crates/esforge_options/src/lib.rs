//! esforge_options: Request options shared by every operation.
//!
//! All option types deserialize from camelCase JSON with defaults for every
//! field, so partial requests and partial `esforge.json` files both work.
//! Per-pass options are kept as raw JSON here; each pass validates its own
//! shape when the pipeline is built.

mod config;
mod target;

pub use config::{find_config_file, load_config, ConfigError, EsforgeConfig, CONFIG_FILE_NAME};
pub use target::EsTarget;

pub use esforge_ast::SourceType;
use serde::{Deserialize, Serialize};

/// Source dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Syntax {
    #[default]
    Ecmascript,
    Typescript,
}

/// Options for `parse` (and the parse step of every other operation).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParseOptions {
    pub target: EsTarget,
    pub source_type: SourceType,
    pub syntax: Syntax,
    pub jsx: bool,
    pub decorators: bool,
    pub file_name: String,
    pub preserve_comments: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            target: EsTarget::default(),
            source_type: SourceType::Module,
            syntax: Syntax::Ecmascript,
            jsx: false,
            decorators: false,
            file_name: "input.js".to_string(),
            preserve_comments: false,
        }
    }
}

impl ParseOptions {
    /// Options inferred from a file extension: `.ts`/`.mts`/`.cts` enable
    /// TypeScript, `.tsx` enables TypeScript and JSX, `.jsx` enables JSX and
    /// `.cjs` parses as a script.
    pub fn for_file(file_name: &str) -> Self {
        let mut options = ParseOptions {
            file_name: file_name.to_string(),
            ..Default::default()
        };
        let extension = file_name.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("");
        match extension {
            "ts" | "mts" | "cts" => options.syntax = Syntax::Typescript,
            "tsx" => {
                options.syntax = Syntax::Typescript;
                options.jsx = true;
            }
            "jsx" => options.jsx = true,
            _ => {}
        }
        if extension == "cjs" || extension == "cts" {
            options.source_type = SourceType::Script;
        }
        options
    }

    #[inline]
    pub fn is_typescript(&self) -> bool {
        self.syntax == Syntax::Typescript
    }
}

/// Line terminator used by the printer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewLine {
    #[default]
    Lf,
    Crlf,
}

impl NewLine {
    pub fn as_str(self) -> &'static str {
        match self {
            NewLine::Lf => "\n",
            NewLine::Crlf => "\r\n",
        }
    }
}

/// Options for `print`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PrintOptions {
    pub minify: bool,
    pub source_map: bool,
    /// Spaces per indentation level in expanded mode.
    pub indent: u8,
    pub new_line: NewLine,
    pub trailing_newline: bool,
    pub preserve_comments: bool,
    /// Name recorded as the source in generated source maps.
    pub source_file_name: Option<String>,
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self {
            minify: false,
            source_map: false,
            indent: 2,
            new_line: NewLine::Lf,
            trailing_newline: true,
            preserve_comments: false,
            source_file_name: None,
        }
    }
}

/// One pipeline entry: a pass name and its pass-specific options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<serde_json::Value>,
}

impl PassConfig {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            options: None,
        }
    }

    pub fn with_options(name: &str, options: serde_json::Value) -> Self {
        Self {
            name: name.to_string(),
            options: Some(options),
        }
    }
}

/// Transform pipeline configuration. When `passes` is `None` the pipeline
/// is derived from `target` and the parse options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PipelineConfig {
    pub target: EsTarget,
    pub passes: Option<Vec<PassConfig>>,
}

/// Options for `transform`: parse, pipeline and print in one request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransformOptions {
    pub parse: ParseOptions,
    pub pipeline: PipelineConfig,
    pub print: PrintOptions,
}

/// Largest source text any operation accepts, in bytes.
pub const MAX_SOURCE_LENGTH: usize = 64 * 1024 * 1024;

/// Default upper bound on the number of modules in one bundle graph.
pub const DEFAULT_MAX_MODULES: usize = 10_000;

/// Configuration for `bundle`. Parse options apply to every module, with
/// the dialect refined per file extension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BundleConfig {
    pub entry: String,
    pub parse: ParseOptions,
    pub pipeline: PipelineConfig,
    pub print: PrintOptions,
    pub max_modules: usize,
}

impl Default for BundleConfig {
    fn default() -> Self {
        Self {
            entry: String::new(),
            parse: ParseOptions::default(),
            pipeline: PipelineConfig::default(),
            print: PrintOptions::default(),
            max_modules: DEFAULT_MAX_MODULES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_parse_options() {
        let options: ParseOptions = serde_json::from_str(r#"{"syntax":"typescript","jsx":true}"#).unwrap();
        assert!(options.is_typescript());
        assert!(options.jsx);
        assert_eq!(options.source_type, SourceType::Module);
        assert_eq!(options.target, EsTarget::EsNext);
    }

    #[test]
    fn test_for_file() {
        let tsx = ParseOptions::for_file("src/app.tsx");
        assert!(tsx.is_typescript() && tsx.jsx);
        let cjs = ParseOptions::for_file("lib/index.cjs");
        assert_eq!(cjs.source_type, SourceType::Script);
        assert!(!cjs.is_typescript());
    }

    #[test]
    fn test_print_defaults() {
        let options: PrintOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options.indent, 2);
        assert!(options.trailing_newline);
        assert_eq!(options.new_line.as_str(), "\n");
    }

    #[test]
    fn test_pipeline_passes() {
        let config: PipelineConfig = serde_json::from_str(
            r#"{"target":"es2015","passes":[{"name":"jsx","options":{"pragma":"h"}},{"name":"simplify"}]}"#,
        )
        .unwrap();
        let passes = config.passes.unwrap();
        assert_eq!(passes.len(), 2);
        assert_eq!(passes[0].options.as_ref().unwrap()["pragma"], "h");
        assert!(passes[1].options.is_none());
    }

    #[test]
    fn test_bundle_config_defaults() {
        let config: BundleConfig = serde_json::from_str(r#"{"entry":"./main.ts"}"#).unwrap();
        assert_eq!(config.max_modules, DEFAULT_MAX_MODULES);
        assert_eq!(config.entry, "./main.ts");
    }
}
