//! Concurrent graph traversal.
//!
//! Every newly discovered module is fetched (load, parse, transform,
//! extract, resolve) as its own future. Futures run concurrently in a
//! `FuturesUnordered`; completions are folded into the graph one at a
//! time, so the graph itself needs no locking. Dropping the set on
//! cancellation drops every in-flight fetch with it.

use std::sync::Arc;

use esforge_ast::Program;
use esforge_diagnostics::{messages, Diagnostic};
use esforge_module::{extract_dependencies, Dependency, DependencyKind, ModuleResolver, ResolveError, ResolvedSpecifier};
use esforge_options::{BundleConfig, ParseOptions, Syntax, MAX_SOURCE_LENGTH};
use esforge_parser::parse_program;
use esforge_transformers::{Pipeline, PipelineError};
use futures::stream::{FuturesUnordered, StreamExt};
use rustc_hash::FxHashSet;
use tokio_util::sync::CancellationToken;

use crate::error::BundleError;
use crate::graph::{Edge, EdgeTarget, ModuleGraph, ModuleState};

/// State shared by every fetch of one bundle request.
pub(crate) struct Shared {
    resolver: Arc<dyn ModuleResolver>,
    parse: ParseOptions,
    /// One pipeline per dialect, indexed by `(typescript, jsx)`.
    pipelines: [Pipeline; 4],
}

impl Shared {
    pub(crate) fn new(config: &BundleConfig, resolver: Arc<dyn ModuleResolver>) -> Result<Self, PipelineError> {
        let build = |typescript: bool, jsx: bool| {
            let mut parse = config.parse.clone();
            parse.syntax = if typescript { Syntax::Typescript } else { Syntax::Ecmascript };
            parse.jsx = jsx;
            Pipeline::from_config(&config.pipeline, &parse)
        };
        Ok(Self {
            resolver,
            parse: config.parse.clone(),
            pipelines: [build(false, false)?, build(false, true)?, build(true, false)?, build(true, true)?],
        })
    }

    fn pipeline(&self, options: &ParseOptions) -> &Pipeline {
        let index = usize::from(options.is_typescript()) * 2 + usize::from(options.jsx);
        &self.pipelines[index]
    }
}

/// Parse options for one module: the request's options with the dialect
/// taken from the file extension when it names one.
pub(crate) fn module_parse_options(base: &ParseOptions, id: &str) -> ParseOptions {
    let by_extension = ParseOptions::for_file(id);
    let mut options = base.clone();
    options.file_name = id.to_string();
    match id.rsplit_once('.').map(|(_, ext)| ext) {
        Some("ts" | "mts" | "cts" | "tsx" | "jsx") => {
            options.syntax = by_extension.syntax;
            options.jsx = by_extension.jsx;
        }
        Some("js" | "mjs" | "cjs") => options.syntax = Syntax::Ecmascript,
        _ => {}
    }
    options
}

/// Result of fetching one module.
struct Fetched {
    id: String,
    program: Option<Program>,
    edges: Vec<Edge>,
    diagnostics: Vec<Diagnostic>,
    failed: bool,
}

impl Fetched {
    fn failed(id: &str, diagnostic: Diagnostic) -> Self {
        Self {
            id: id.to_string(),
            program: None,
            edges: Vec::new(),
            diagnostics: vec![diagnostic],
            failed: true,
        }
    }
}

fn load_failure(id: &str, err: &ResolveError) -> Diagnostic {
    let reason = match err {
        ResolveError::Load { message, .. } => message.clone(),
        ResolveError::NotFound { .. } => err.to_string(),
    };
    Diagnostic::new(&messages::FAILED_TO_LOAD_MODULE_0_1, &[id, &reason]).in_file(id)
}

/// Whether a dependency becomes a graph edge. Type-only imports vanish at
/// runtime; `require` calls and computed `import()` are left alone.
fn is_followed(dependency: &Dependency) -> bool {
    !dependency.is_type_only
        && matches!(
            dependency.kind,
            DependencyKind::StaticImport | DependencyKind::ReExport | DependencyKind::DynamicImport
        )
}

async fn fetch_module(shared: Arc<Shared>, id: String) -> Fetched {
    tracing::debug!(module = %id, "fetching module");
    let source = match shared.resolver.load(&id).await {
        Ok(source) => source,
        Err(err) => {
            tracing::warn!(module = %id, error = %err, "module failed to load");
            return Fetched::failed(&id, load_failure(&id, &err));
        }
    };
    if source.len() > MAX_SOURCE_LENGTH {
        let reason = format!("source is {} bytes; the limit is {}", source.len(), MAX_SOURCE_LENGTH);
        return Fetched::failed(
            &id,
            Diagnostic::new(&messages::FAILED_TO_LOAD_MODULE_0_1, &[&id, &reason]).in_file(&id),
        );
    }

    let options = module_parse_options(&shared.parse, &id);
    let parsed = parse_program(&source, &options);
    let mut failed = parsed.has_errors();
    let mut diagnostics = parsed.diagnostics;
    let mut program = parsed.program;
    if failed {
        // The partial tree is still walked for imports so that problems in
        // the rest of the graph are reported in the same run.
        diagnostics.push(Diagnostic::new(&messages::MODULE_0_HAS_SYNTAX_ERRORS, &[&id]).in_file(&id));
    } else {
        diagnostics.extend(shared.pipeline(&options).run(&mut program));
    }

    let mut seen = FxHashSet::default();
    let dependencies: Vec<Dependency> = extract_dependencies(&program)
        .into_iter()
        .filter(is_followed)
        .filter(|d| seen.insert(d.text.clone()))
        .collect();

    let resolver = &shared.resolver;
    let resolutions =
        futures::future::join_all(dependencies.iter().map(|d| resolver.resolve(&d.text, Some(&id)))).await;

    let mut edges = Vec::with_capacity(dependencies.len());
    for (dependency, resolution) in dependencies.into_iter().zip(resolutions) {
        let target = match resolution {
            Ok(ResolvedSpecifier::Module(target)) => EdgeTarget::Module(target),
            Ok(ResolvedSpecifier::External(specifier)) => EdgeTarget::External(specifier),
            Err(err) => {
                tracing::warn!(module = %id, specifier = %dependency.text, error = %err, "unresolved import");
                diagnostics.push(
                    Diagnostic::at(
                        dependency.span,
                        &messages::CANNOT_FIND_MODULE_0_IMPORTED_FROM_1,
                        &[&dependency.text, &id],
                    )
                    .in_file(&id),
                );
                failed = true;
                EdgeTarget::Unresolved
            }
        };
        edges.push(Edge {
            specifier: dependency.text,
            kind: dependency.kind,
            target,
        });
    }

    Fetched {
        id,
        program: Some(program),
        edges,
        diagnostics,
        failed,
    }
}

/// Walk the graph from `config.entry` until every reachable module has
/// settled. Returns the graph (possibly with Errored nodes) and any
/// problems that belong to no single module.
pub(crate) async fn load_graph(
    shared: Arc<Shared>,
    config: &BundleConfig,
    cancel: &CancellationToken,
) -> Result<(ModuleGraph, Vec<Diagnostic>), BundleError> {
    let mut graph = ModuleGraph::new();
    let mut diagnostics = Vec::new();

    let entry = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(BundleError::Cancelled),
        resolved = shared.resolver.resolve(&config.entry, None) => resolved,
    };
    let entry = match entry {
        Ok(ResolvedSpecifier::Module(id)) => id,
        Ok(ResolvedSpecifier::External(specifier)) => {
            let reason = "the entry resolves to an external module";
            diagnostics.push(Diagnostic::new(&messages::FAILED_TO_LOAD_MODULE_0_1, &[&specifier, reason]));
            return Ok((graph, diagnostics));
        }
        Err(err) => {
            tracing::warn!(entry = %config.entry, error = %err, "entry not found");
            diagnostics.push(load_failure(&config.entry, &err));
            return Ok((graph, diagnostics));
        }
    };

    let mut pending = FuturesUnordered::new();
    graph.insert(&entry);
    graph.transition(&entry, ModuleState::Parsing);
    pending.push(fetch_module(shared.clone(), entry));
    let mut limit_reported = false;

    loop {
        let fetched = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!(in_flight = pending.len(), "bundle cancelled");
                return Err(BundleError::Cancelled);
            }
            next = pending.next() => match next {
                Some(fetched) => fetched,
                None => break,
            },
        };
        let Fetched {
            id,
            program,
            mut edges,
            diagnostics: mut module_diagnostics,
            mut failed,
        } = fetched;

        for edge in &mut edges {
            let EdgeTarget::Module(target) = &edge.target else {
                continue;
            };
            if graph.contains(target) {
                continue;
            }
            if graph.len() >= config.max_modules {
                if !limit_reported {
                    let limit = config.max_modules.to_string();
                    module_diagnostics.push(
                        Diagnostic::new(&messages::MODULE_GRAPH_EXCEEDS_LIMIT_OF_0_MODULES, &[&limit]).in_file(&id),
                    );
                    limit_reported = true;
                }
                tracing::warn!(module = %id, specifier = %edge.specifier, "module limit reached");
                edge.target = EdgeTarget::Unresolved;
                failed = true;
                continue;
            }
            graph.insert(target);
            graph.transition(target, ModuleState::Parsing);
            pending.push(fetch_module(shared.clone(), target.clone()));
        }

        if let Some(node) = graph.get_mut(&id) {
            node.program = program;
            node.edges = edges;
            node.diagnostics = module_diagnostics;
        }
        let state = if failed {
            ModuleState::Errored
        } else {
            ModuleState::ResolvingDependencies
        };
        graph.transition(&id, state);
        graph.settle();
    }

    graph.settle_cycles();
    Ok((graph, diagnostics))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialect_follows_extension() {
        let base = ParseOptions::default();
        let ts = module_parse_options(&base, "src/a.ts");
        assert!(ts.is_typescript() && !ts.jsx);
        let tsx = module_parse_options(&base, "src/a.tsx");
        assert!(tsx.is_typescript() && tsx.jsx);
        let js = module_parse_options(&ParseOptions::for_file("x.tsx"), "lib/b.js");
        assert!(!js.is_typescript());
        assert_eq!(js.file_name, "lib/b.js");
    }

    #[test]
    fn test_type_only_and_require_are_not_followed() {
        let parsed = parse_program(
            "import type { T } from './t'; import a from './a'; require('./r'); import(x);",
            &ParseOptions::for_file("m.ts"),
        );
        let followed: Vec<String> = extract_dependencies(&parsed.program)
            .into_iter()
            .filter(is_followed)
            .map(|d| d.text)
            .collect();
        assert_eq!(followed, vec!["./a".to_string()]);
    }
}
