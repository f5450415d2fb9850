//! esforge_compiler: The engine's operations.
//!
//! Each operation takes an owned request and returns a response or an
//! [`EngineError`]:
//! - [`parse`]: source text to a serializable tree
//! - [`print`]: a tree back to text, optionally with a source map
//! - [`transform`]: parse, run the pass pipeline, print
//! - [`extract_dependencies`]: the module specifiers a source refers to
//! - [`bundle`]: an entry module and everything it imports, as one module
//!
//! Nothing is shared between requests, so independent requests can run on
//! any thread; [`transform_many`] does exactly that with rayon.

mod error;
mod request;

use std::path::Path;
use std::sync::Arc;

use esforge_ast::Program;
use esforge_options::{BundleConfig, ParseOptions, PrintOptions, SourceType, MAX_SOURCE_LENGTH};
use esforge_parser::parse_program;
use esforge_printer::print_program;
use esforge_transformers::Pipeline;
use rayon::prelude::*;
use tokio_util::sync::CancellationToken;

pub use error::EngineError;
pub use esforge_bundler::{BundleError, BundleOutput};
pub use esforge_module::{Dependency, DependencyKind, FsResolver, MemoryResolver, ModuleResolver};
pub use esforge_transformers::PipelineError;
pub use request::{
    DependenciesRequest, DependenciesResponse, ParseRequest, ParseResponse, PrintRequest, PrintResponse,
    TransformRequest, TransformResponse,
};

// ============================================================================
// Input validation
// ============================================================================

/// Reject sources over [`MAX_SOURCE_LENGTH`].
pub fn check_source(source: &str) -> Result<(), EngineError> {
    if source.len() > MAX_SOURCE_LENGTH {
        return Err(EngineError::SourceTooLarge {
            len: source.len(),
            limit: MAX_SOURCE_LENGTH,
        });
    }
    Ok(())
}

/// Borrow raw bytes as source text, failing on oversized or non-UTF-8 input.
pub fn source_from_bytes(bytes: &[u8]) -> Result<&str, EngineError> {
    if bytes.len() > MAX_SOURCE_LENGTH {
        return Err(EngineError::SourceTooLarge {
            len: bytes.len(),
            limit: MAX_SOURCE_LENGTH,
        });
    }
    simdutf8::basic::from_utf8(bytes).map_err(|_| EngineError::InvalidEncoding)
}

/// Read a file as source text.
pub fn read_source(path: &Path) -> Result<String, EngineError> {
    let bytes = std::fs::read(path)?;
    source_from_bytes(&bytes).map(str::to_string)
}

/// Deserialize a tree produced by [`parse`] (or by a host).
pub fn program_from_json(json: &str) -> Result<Program, EngineError> {
    serde_json::from_str(json).map_err(|err| EngineError::InvalidAst(err.to_string()))
}

// ============================================================================
// Operations
// ============================================================================

/// Parse `request.source`. Syntax errors are diagnostics; the program is
/// always present.
pub fn parse(request: &ParseRequest) -> Result<ParseResponse, EngineError> {
    check_source(&request.source)?;
    tracing::debug!(
        file = %request.options.file_name,
        len = request.source.len(),
        syntax = ?request.options.syntax,
        "parse"
    );
    let parsed = parse_program(&request.source, &request.options);
    Ok(ParseResponse {
        program: parsed.program,
        diagnostics: parsed.diagnostics,
    })
}

fn source_map(
    mappings: &[esforge_printer::Mapping],
    source: &str,
    options: &PrintOptions,
    file_name: &str,
) -> Result<String, EngineError> {
    let source_name = options.source_file_name.as_deref().unwrap_or(file_name);
    Ok(esforge_sourcemap::generate(mappings, source, source_name, None)?)
}

/// Print a tree. A source map needs the original text in `request.source`;
/// the tree must also fit inside that text.
pub fn print(request: &PrintRequest) -> Result<PrintResponse, EngineError> {
    let PrintRequest {
        program,
        options,
        source,
    } = request;
    tracing::debug!(file = %program.file_name, minify = options.minify, source_map = options.source_map, "print");
    if let Some(source) = source {
        check_source(source)?;
        if program.data.range.end as usize > source.len() {
            return Err(EngineError::InvalidAst(format!(
                "program ends at offset {} but the source is {} bytes",
                program.data.range.end,
                source.len()
            )));
        }
    }

    let printed = print_program(program, options);
    let source_map = match (options.source_map, source) {
        (false, _) => None,
        (true, Some(source)) => Some(source_map(&printed.mappings, source, options, &program.file_name)?),
        (true, None) => {
            return Err(EngineError::InvalidRequest(
                "a source map needs the original source text".to_string(),
            ))
        }
    };
    Ok(PrintResponse {
        code: printed.code,
        source_map,
    })
}

/// Parse and run the pipeline, keeping the tree. The result can be handed
/// to [`print`].
pub fn transform_to_ast(request: &TransformRequest) -> Result<ParseResponse, EngineError> {
    check_source(&request.source)?;
    let options = &request.options;
    tracing::debug!(
        file = %options.parse.file_name,
        len = request.source.len(),
        target = ?options.pipeline.target,
        "transform"
    );
    // Configuration errors are fatal and checked before any parsing work.
    let pipeline = Pipeline::from_config(&options.pipeline, &options.parse)?;
    let parsed = parse_program(&request.source, &options.parse);
    let mut program = parsed.program;
    let mut diagnostics = parsed.diagnostics;
    diagnostics.extend(pipeline.run(&mut program));
    Ok(ParseResponse { program, diagnostics })
}

/// Parse, transform and print `request.source`.
pub fn transform(request: &TransformRequest) -> Result<TransformResponse, EngineError> {
    let ParseResponse { program, diagnostics } = transform_to_ast(request)?;
    let print_options = &request.options.print;
    let printed = print_program(&program, print_options);
    let source_map = if print_options.source_map {
        Some(source_map(
            &printed.mappings,
            &request.source,
            print_options,
            &request.options.parse.file_name,
        )?)
    } else {
        None
    };
    Ok(TransformResponse {
        code: printed.code,
        diagnostics,
        source_map,
    })
}

/// Transform independent sources in parallel. Results are in request order.
pub fn transform_many(requests: &[TransformRequest]) -> Vec<Result<TransformResponse, EngineError>> {
    tracing::debug!(count = requests.len(), "transform batch");
    requests.par_iter().map(transform).collect()
}

/// List the module specifiers `request.source` refers to.
pub fn extract_dependencies(request: &DependenciesRequest) -> Result<DependenciesResponse, EngineError> {
    check_source(&request.source)?;
    tracing::debug!(file = %request.options.file_name, len = request.source.len(), "extract dependencies");
    let parsed = parse_program(&request.source, &request.options);
    Ok(DependenciesResponse {
        specifiers: esforge_module::extract_dependencies(&parsed.program),
        diagnostics: parsed.diagnostics,
    })
}

/// Bundle `config.entry` through `resolver`. Cancelling `cancel` abandons
/// every in-flight fetch.
pub async fn bundle(
    config: &BundleConfig,
    resolver: Arc<dyn ModuleResolver>,
    cancel: CancellationToken,
) -> Result<BundleOutput, EngineError> {
    if config.entry.trim().is_empty() {
        return Err(EngineError::InvalidRequest("bundle entry is empty".to_string()));
    }
    if config.max_modules == 0 {
        return Err(EngineError::InvalidRequest("maxModules must be at least 1".to_string()));
    }
    Ok(esforge_bundler::bundle(config, resolver, cancel).await?)
}

/// Parse options for a file name, with the dialect taken from the
/// extension and every other field from `base`.
pub fn parse_options_for(base: &ParseOptions, file_name: &str) -> ParseOptions {
    let by_extension = ParseOptions::for_file(file_name);
    let mut options = ParseOptions {
        syntax: by_extension.syntax,
        jsx: base.jsx || by_extension.jsx,
        file_name: file_name.to_string(),
        ..base.clone()
    };
    if by_extension.source_type == SourceType::Script {
        options.source_type = SourceType::Script;
    }
    options
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_from_bytes_rejects_invalid_utf8() {
        assert!(matches!(source_from_bytes(&[0x66, 0xff, 0x6f]), Err(EngineError::InvalidEncoding)));
        assert_eq!(source_from_bytes(b"let a;").unwrap(), "let a;");
    }

    #[test]
    fn test_check_source_limit() {
        let big = " ".repeat(MAX_SOURCE_LENGTH + 1);
        match check_source(&big) {
            Err(EngineError::SourceTooLarge { len, limit }) => {
                assert_eq!(len, MAX_SOURCE_LENGTH + 1);
                assert_eq!(limit, MAX_SOURCE_LENGTH);
            }
            other => panic!("expected SourceTooLarge, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_options_for_extension() {
        let base = ParseOptions {
            decorators: true,
            ..Default::default()
        };
        let options = parse_options_for(&base, "src/view.tsx");
        assert!(options.is_typescript() && options.jsx && options.decorators);
        assert_eq!(options.file_name, "src/view.tsx");
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(EngineError::InvalidEncoding.kind(), "invalid-encoding");
        assert_eq!(EngineError::InvalidAst(String::new()).kind(), "invalid-ast");
    }
}
