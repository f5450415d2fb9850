//! esforge: command-line front end for the engine.
//!
//! Usage:
//!   esforge parse <FILE>
//!   esforge print <FILE> [--ast]
//!   esforge transform <FILE>... [--target T] [--pass NAME]...
//!   esforge deps <FILE>
//!   esforge bundle <ENTRY> [-o OUT]
//!
//! Options come from the nearest `esforge.json` and are overridden by flags.
//! Diagnostics go to stderr; results go to stdout or `--out-file`.

mod logging;
mod report;

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Args, Parser as ClapParser, Subcommand};
use esforge_compiler::{
    parse_options_for, program_from_json, read_source, source_from_bytes, DependenciesRequest, FsResolver,
    ParseRequest, PrintRequest, TransformRequest,
};
use esforge_diagnostics::Diagnostic;
use esforge_options::{
    find_config_file, load_config, EsTarget, EsforgeConfig, ParseOptions, PassConfig, PipelineConfig, PrintOptions,
    SourceType, Syntax,
};
use miette::{bail, IntoDiagnostic, WrapErr};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use logging::LogFormat;
use report::Sources;

#[derive(ClapParser, Debug)]
#[command(name = "esforge", version, about = "esforge - parse, transform and bundle JavaScript and TypeScript")]
struct Cli {
    /// Log output format. Levels come from the ESFORGE_LOG environment variable.
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    log_format: LogFormat,

    /// Path to esforge.json. Searched for upward from the working directory by default.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Ignore any esforge.json.
    #[arg(long, global = true)]
    no_config: bool,

    #[command(subcommand)]
    command: Command,
}

/// Dialect flags. Each one only ever turns a feature on; the file
/// extension and config decide the rest.
#[derive(Args, Debug, Default, Clone)]
struct SyntaxArgs {
    /// Parse as TypeScript regardless of extension.
    #[arg(long)]
    typescript: bool,

    /// Enable JSX.
    #[arg(long)]
    jsx: bool,

    /// Enable decorators.
    #[arg(long)]
    decorators: bool,

    /// Parse as a classic script instead of a module.
    #[arg(long)]
    script: bool,

    /// Keep comments in the output.
    #[arg(long)]
    preserve_comments: bool,
}

#[derive(Args, Debug, Default, Clone)]
struct OutputArgs {
    /// Minified output.
    #[arg(long)]
    minify: bool,

    /// Write a source map next to the output file.
    #[arg(long)]
    source_map: bool,

    /// Write the result here instead of stdout.
    #[arg(short = 'o', long)]
    out_file: Option<PathBuf>,
}

#[derive(Args, Debug, Default, Clone)]
struct PipelineArgs {
    /// Output language level.
    #[arg(long)]
    target: Option<EsTarget>,

    /// Run exactly these passes, in declared order. Repeatable.
    #[arg(long = "pass", value_name = "NAME")]
    passes: Vec<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the syntax tree as JSON.
    Parse {
        /// Source file, or `-` for stdin.
        file: String,
        #[command(flatten)]
        syntax: SyntaxArgs,
        /// Single-line JSON.
        #[arg(long)]
        compact: bool,
    },
    /// Parse and print a file, normalizing its formatting.
    Print {
        /// Source file, or a JSON tree with `--ast`.
        file: String,
        /// Treat the input as a tree produced by `esforge parse`.
        #[arg(long)]
        ast: bool,
        #[command(flatten)]
        syntax: SyntaxArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Parse, run the pass pipeline and print.
    Transform {
        #[arg(required = true)]
        files: Vec<String>,
        #[command(flatten)]
        syntax: SyntaxArgs,
        #[command(flatten)]
        pipeline: PipelineArgs,
        #[command(flatten)]
        output: OutputArgs,
        /// Write one `.js` file per input into this directory.
        #[arg(long)]
        out_dir: Option<PathBuf>,
        /// Print the full response as JSON.
        #[arg(long)]
        json: bool,
    },
    /// List the module specifiers a file refers to.
    Deps {
        file: String,
        #[command(flatten)]
        syntax: SyntaxArgs,
        /// Print the full response as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Bundle an entry module and everything it imports.
    Bundle {
        entry: String,
        #[command(flatten)]
        syntax: SyntaxArgs,
        #[command(flatten)]
        pipeline: PipelineArgs,
        #[command(flatten)]
        output: OutputArgs,
        /// Fail when the graph grows past this many modules.
        #[arg(long)]
        max_modules: Option<usize>,
        /// Print the module order and diagnostics as JSON.
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.log_format);
    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{err:?}");
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> miette::Result<ExitCode> {
    let config = project_config(&cli)?;
    match cli.command {
        Command::Parse { file, syntax, compact } => run_parse(&config, &file, &syntax, compact),
        Command::Print {
            file,
            ast,
            syntax,
            output,
        } => run_print(&config, &file, ast, &syntax, &output),
        Command::Transform {
            files,
            syntax,
            pipeline,
            output,
            out_dir,
            json,
        } => run_transform(&config, &files, &syntax, &pipeline, &output, out_dir.as_deref(), json),
        Command::Deps { file, syntax, json } => run_deps(&config, &file, &syntax, json),
        Command::Bundle {
            entry,
            syntax,
            pipeline,
            output,
            max_modules,
            json,
        } => run_bundle(&config, entry, &syntax, &pipeline, &output, max_modules, json),
    }
}

// ============================================================================
// Configuration
// ============================================================================

fn project_config(cli: &Cli) -> miette::Result<EsforgeConfig> {
    if cli.no_config {
        return Ok(EsforgeConfig::default());
    }
    let path = match &cli.config {
        Some(path) => Some(path.clone()),
        None => {
            let cwd = std::env::current_dir().into_diagnostic()?;
            find_config_file(&cwd)
        }
    };
    match path {
        Some(path) => load_config(&path).into_diagnostic(),
        None => Ok(EsforgeConfig::default()),
    }
}

/// Parse options for `file`: config values, then the extension's dialect,
/// then flags.
fn parse_options(base: &ParseOptions, file: &str, syntax: &SyntaxArgs) -> ParseOptions {
    let options = if file == "-" {
        base.clone()
    } else {
        parse_options_for(base, file)
    };
    apply_syntax(options, syntax)
}

fn apply_syntax(mut options: ParseOptions, syntax: &SyntaxArgs) -> ParseOptions {
    if syntax.typescript {
        options.syntax = Syntax::Typescript;
    }
    options.jsx |= syntax.jsx;
    options.decorators |= syntax.decorators;
    options.preserve_comments |= syntax.preserve_comments;
    if syntax.script {
        options.source_type = SourceType::Script;
    }
    options
}

fn print_options(base: &PrintOptions, output: &OutputArgs, syntax: &SyntaxArgs) -> PrintOptions {
    let mut options = base.clone();
    options.minify |= output.minify;
    options.source_map |= output.source_map;
    options.preserve_comments |= syntax.preserve_comments;
    options
}

fn pipeline_config(base: &PipelineConfig, args: &PipelineArgs) -> PipelineConfig {
    let mut config = base.clone();
    if let Some(target) = args.target {
        config.target = target;
    }
    if !args.passes.is_empty() {
        config.passes = Some(args.passes.iter().map(|name| PassConfig::new(name)).collect());
    }
    config
}

// ============================================================================
// Input and output
// ============================================================================

fn read_input(file: &str) -> miette::Result<String> {
    if file == "-" {
        let mut bytes = Vec::new();
        std::io::stdin().read_to_end(&mut bytes).into_diagnostic()?;
        return source_from_bytes(&bytes).map(str::to_string).into_diagnostic();
    }
    read_source(Path::new(file))
        .into_diagnostic()
        .wrap_err_with(|| format!("cannot read {file}"))
}

fn display_name(file: &str) -> &str {
    if file == "-" {
        "<stdin>"
    } else {
        file
    }
}

fn source_map_path(out: &Path) -> PathBuf {
    let mut name = out.as_os_str().to_owned();
    name.push(".map");
    PathBuf::from(name)
}

/// Write `code` (and its map) to `out`, or `code` to stdout.
fn write_output(code: &str, source_map: Option<&str>, out: Option<&Path>) -> miette::Result<()> {
    let Some(out) = out else {
        if source_map.is_some() {
            bail!("--source-map needs --out-file");
        }
        print!("{code}");
        return Ok(());
    };
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).into_diagnostic()?;
    }
    let mut text = code.to_string();
    if let Some(map) = source_map {
        let map_path = source_map_path(out);
        std::fs::write(&map_path, map)
            .into_diagnostic()
            .wrap_err_with(|| format!("cannot write {}", map_path.display()))?;
        let map_name = map_path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
        if !text.ends_with('\n') {
            text.push('\n');
        }
        text.push_str(&format!("//# sourceMappingURL={map_name}\n"));
    }
    std::fs::write(out, text)
        .into_diagnostic()
        .wrap_err_with(|| format!("cannot write {}", out.display()))
}

fn print_json<T: Serialize>(value: &T, compact: bool) -> miette::Result<()> {
    let json = if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    };
    println!("{}", json.into_diagnostic()?);
    Ok(())
}

/// Exit status for a finished command: 1 when any diagnostic is an error.
fn status(diagnostics: &[Diagnostic]) -> ExitCode {
    if diagnostics.iter().any(Diagnostic::is_error) {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}

/// `dist/` + `src/app.tsx` = `dist/app.js`.
fn output_in_dir(dir: &Path, file: &str) -> PathBuf {
    let stem = Path::new(file)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "out".to_string());
    dir.join(format!("{stem}.js"))
}

// ============================================================================
// Commands
// ============================================================================

fn run_parse(config: &EsforgeConfig, file: &str, syntax: &SyntaxArgs, compact: bool) -> miette::Result<ExitCode> {
    let source = read_input(file)?;
    let mut options = parse_options(&config.parse, file, syntax);
    options.file_name = display_name(file).to_string();
    let response = esforge_compiler::parse(&ParseRequest::new(source.as_str(), options)).into_diagnostic()?;
    report::emit(&response.diagnostics, &mut Sources::default().with(display_name(file), &source), Some(display_name(file)));
    print_json(&response.program, compact)?;
    Ok(status(&response.diagnostics))
}

fn run_print(
    config: &EsforgeConfig,
    file: &str,
    ast: bool,
    syntax: &SyntaxArgs,
    output: &OutputArgs,
) -> miette::Result<ExitCode> {
    let input = read_input(file)?;
    let options = print_options(&config.print, output, syntax);
    let (request, diagnostics) = if ast {
        let program = program_from_json(&input).into_diagnostic()?;
        (
            PrintRequest {
                program,
                options,
                source: None,
            },
            Vec::new(),
        )
    } else {
        let mut parse = parse_options(&config.parse, file, syntax);
        parse.file_name = display_name(file).to_string();
        let parsed = esforge_compiler::parse(&ParseRequest::new(input.as_str(), parse)).into_diagnostic()?;
        (
            PrintRequest {
                program: parsed.program,
                options,
                source: Some(input.clone()),
            },
            parsed.diagnostics,
        )
    };
    report::emit(&diagnostics, &mut Sources::default().with(display_name(file), &input), Some(display_name(file)));
    let printed = esforge_compiler::print(&request).into_diagnostic()?;
    write_output(&printed.code, printed.source_map.as_deref(), output.out_file.as_deref())?;
    Ok(status(&diagnostics))
}

fn run_transform(
    config: &EsforgeConfig,
    files: &[String],
    syntax: &SyntaxArgs,
    pipeline: &PipelineArgs,
    output: &OutputArgs,
    out_dir: Option<&Path>,
    json: bool,
) -> miette::Result<ExitCode> {
    if files.len() > 1 && out_dir.is_none() && !json {
        bail!("transforming several files needs --out-dir");
    }
    let mut sources = Sources::default();
    let mut requests = Vec::with_capacity(files.len());
    for file in files {
        let source = read_input(file)?;
        let mut options = config.transform.clone();
        options.parse = parse_options(&config.transform.parse, file, syntax);
        options.parse.file_name = display_name(file).to_string();
        options.pipeline = pipeline_config(&config.transform.pipeline, pipeline);
        options.print = print_options(&config.transform.print, output, syntax);
        if options.print.source_file_name.is_none() {
            options.print.source_file_name = Some(display_name(file).to_string());
        }
        sources = sources.with(display_name(file), &source);
        requests.push(TransformRequest::new(source, options));
    }

    let results = esforge_compiler::transform_many(&requests);
    let mut all = Vec::new();
    let mut responses = Vec::with_capacity(results.len());
    for (file, result) in files.iter().zip(results) {
        let response = result.into_diagnostic().wrap_err_with(|| format!("cannot transform {file}"))?;
        report::emit(&response.diagnostics, &mut sources, Some(display_name(file)));
        all.extend(response.diagnostics.iter().cloned());
        if !json {
            let out = match out_dir {
                Some(dir) => Some(output_in_dir(dir, file)),
                None => output.out_file.clone(),
            };
            write_output(&response.code, response.source_map.as_deref(), out.as_deref())?;
        }
        responses.push(response);
    }
    if json {
        print_json(&responses, false)?;
    }
    Ok(status(&all))
}

fn run_deps(config: &EsforgeConfig, file: &str, syntax: &SyntaxArgs, json: bool) -> miette::Result<ExitCode> {
    let source = read_input(file)?;
    let mut options = parse_options(&config.parse, file, syntax);
    options.file_name = display_name(file).to_string();
    let request = DependenciesRequest {
        source: source.clone(),
        options,
    };
    let response = esforge_compiler::extract_dependencies(&request).into_diagnostic()?;
    report::emit(&response.diagnostics, &mut Sources::default().with(display_name(file), &source), Some(display_name(file)));
    if json {
        print_json(&response, false)?;
    } else {
        for dependency in &response.specifiers {
            println!("{}\t{}", dependency.kind.as_str(), dependency.text);
        }
    }
    Ok(status(&response.diagnostics))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BundleSummary<'a> {
    module_order: &'a [String],
    diagnostics: &'a [Diagnostic],
}

fn run_bundle(
    config: &EsforgeConfig,
    entry: String,
    syntax: &SyntaxArgs,
    pipeline: &PipelineArgs,
    output: &OutputArgs,
    max_modules: Option<usize>,
    json: bool,
) -> miette::Result<ExitCode> {
    if output.source_map {
        bail!("bundles are emitted without source maps");
    }
    let mut bundle = config.bundle.clone();
    bundle.entry = entry;
    bundle.parse = apply_syntax(bundle.parse, syntax);
    bundle.pipeline = pipeline_config(&bundle.pipeline, pipeline);
    bundle.print = print_options(&bundle.print, output, syntax);
    if let Some(max_modules) = max_modules {
        bundle.max_modules = max_modules;
    }

    let cwd = std::env::current_dir().into_diagnostic()?;
    let resolver = Arc::new(FsResolver::new(cwd));
    let runtime = tokio::runtime::Runtime::new().into_diagnostic()?;
    let cancel = CancellationToken::new();
    let result = runtime.block_on(async {
        let on_interrupt = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("interrupted, cancelling bundle");
                on_interrupt.cancel();
            }
        });
        esforge_compiler::bundle(&bundle, resolver, cancel.clone()).await
    });

    let mut sources = Sources::default();
    match result {
        Ok(out) => {
            report::emit(&out.diagnostics, &mut sources, None);
            if json {
                print_json(
                    &BundleSummary {
                        module_order: &out.module_order,
                        diagnostics: &out.diagnostics,
                    },
                    false,
                )?;
                if let Some(path) = output.out_file.as_deref() {
                    write_output(&out.code, None, Some(path))?;
                }
            } else {
                write_output(&out.code, None, output.out_file.as_deref())?;
            }
            Ok(status(&out.diagnostics))
        }
        Err(esforge_compiler::EngineError::Bundle(esforge_compiler::BundleError::Failed {
            diagnostics,
            module_order,
        })) => {
            report::emit(&diagnostics, &mut sources, None);
            if json {
                print_json(
                    &BundleSummary {
                        module_order: &module_order,
                        diagnostics: &diagnostics,
                    },
                    false,
                )?;
            }
            Ok(ExitCode::from(1))
        }
        Err(err) => Err(err).into_diagnostic(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::parse_from([
            "esforge", "--no-config", "transform", "a.ts", "--target", "es2017", "--pass", "strip_types", "--minify",
        ]);
        let Command::Transform {
            syntax, pipeline, output, ..
        } = cli.command
        else {
            panic!("expected transform");
        };
        let base = PipelineConfig {
            target: EsTarget::Es2020,
            passes: None,
        };
        let config = pipeline_config(&base, &pipeline);
        assert_eq!(config.target, EsTarget::Es2017);
        assert_eq!(config.passes.unwrap()[0].name, "strip_types");
        assert!(print_options(&PrintOptions::default(), &output, &syntax).minify);
    }

    #[test]
    fn test_parse_options_layering() {
        let base = ParseOptions {
            decorators: true,
            ..Default::default()
        };
        let syntax = SyntaxArgs {
            jsx: true,
            script: true,
            ..Default::default()
        };
        let options = parse_options(&base, "src/app.ts", &syntax);
        assert!(options.is_typescript());
        assert!(options.jsx && options.decorators);
        assert_eq!(options.source_type, SourceType::Script);
        let stdin = parse_options(&base, "-", &SyntaxArgs::default());
        assert!(!stdin.is_typescript());
    }

    #[test]
    fn test_output_paths() {
        assert_eq!(output_in_dir(Path::new("dist"), "src/app.tsx"), PathBuf::from("dist/app.js"));
        assert_eq!(source_map_path(Path::new("out/a.js")), PathBuf::from("out/a.js.map"));
    }

    #[test]
    fn test_write_output_with_source_map() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested").join("a.js");
        write_output("let a;\n", Some("{\"version\":3}"), Some(&out)).unwrap();
        let code = std::fs::read_to_string(&out).unwrap();
        assert_eq!(code, "let a;\n//# sourceMappingURL=a.js.map\n");
        assert!(dir.path().join("nested").join("a.js.map").is_file());
        assert!(write_output("x", Some("{}"), None).is_err());
    }
}
