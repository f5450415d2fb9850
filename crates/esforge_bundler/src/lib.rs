//! esforge_bundler: Module graph traversal and bundling.
//!
//! Starting from an entry specifier, every statically or literally
//! dynamically imported module is loaded through a [`ModuleResolver`],
//! parsed, transformed and linked into a single ES module. Externals stay
//! as imports at the top of the output; the entry's exports become the
//! bundle's exports.

mod emit;
mod error;
mod graph;
mod linker;
mod loader;

use std::sync::Arc;

use esforge_diagnostics::{messages, Diagnostic};
use esforge_module::ModuleResolver;
use esforge_options::BundleConfig;
use esforge_printer::print_program;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

pub use error::BundleError;
pub use graph::{Edge, EdgeTarget, ModuleGraph, ModuleNode, ModuleState};

/// A successful bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleOutput {
    pub code: String,
    /// Warnings and messages collected along the way.
    pub diagnostics: Vec<Diagnostic>,
    /// Module ids in the order their code appears in `code`.
    pub module_order: Vec<String>,
}

/// Every module's diagnostics, modules in emission order first and any
/// that never made it into the order after them.
fn collect_diagnostics(graph: &ModuleGraph, order: &[String], mut diagnostics: Vec<Diagnostic>) -> Vec<Diagnostic> {
    for id in order {
        if let Some(node) = graph.get(id) {
            diagnostics.extend(node.diagnostics.iter().cloned());
        }
    }
    for node in graph.nodes().filter(|n| !order.contains(&n.id)) {
        diagnostics.extend(node.diagnostics.iter().cloned());
    }
    diagnostics
}

/// Bundle `config.entry` and everything it imports.
///
/// Fails with [`BundleError::Failed`] when any reachable module cannot be
/// loaded, parsed, resolved or linked, carrying every diagnostic from the
/// whole graph. Firing `cancel` stops the traversal at the next await
/// point with [`BundleError::Cancelled`].
pub async fn bundle(
    config: &BundleConfig,
    resolver: Arc<dyn ModuleResolver>,
    cancel: CancellationToken,
) -> Result<BundleOutput, BundleError> {
    let span = tracing::debug_span!("bundle", entry = %config.entry);
    run(config, resolver, cancel).instrument(span).await
}

async fn run(
    config: &BundleConfig,
    resolver: Arc<dyn ModuleResolver>,
    cancel: CancellationToken,
) -> Result<BundleOutput, BundleError> {
    tracing::debug!(max_modules = config.max_modules, "bundle started");
    let shared = Arc::new(loader::Shared::new(config, resolver)?);
    let (mut graph, diagnostics) = loader::load_graph(shared, config, &cancel).await?;
    if cancel.is_cancelled() {
        return Err(BundleError::Cancelled);
    }

    let (order, back_edges) = graph.emission_order();
    let mut diagnostics = collect_diagnostics(&graph, &order, diagnostics);
    for (from, to) in &back_edges {
        tracing::debug!(from = %from, to = %to, "import cycle");
        let cycle = Diagnostic::new(&messages::CIRCULAR_IMPORT_BETWEEN_0_AND_1, &[from.as_str(), to.as_str()]);
        diagnostics.push(cycle.in_file(from));
    }
    if graph.is_empty() || graph.has_errors() || diagnostics.iter().any(Diagnostic::is_error) {
        return Err(BundleError::Failed {
            diagnostics,
            module_order: order,
        });
    }

    let linked = linker::link(&mut graph, &order);
    if linked.diagnostics.iter().any(Diagnostic::is_error) {
        diagnostics.extend(linked.diagnostics);
        return Err(BundleError::Failed {
            diagnostics,
            module_order: order,
        });
    }
    diagnostics.extend(linked.diagnostics.iter().cloned());

    let file_name = graph.entry().unwrap_or(config.entry.as_str()).to_string();
    let program = emit::emit(linked, config.pipeline.target, &file_name);
    for id in &order {
        graph.transition(id, ModuleState::Emitted);
    }

    let mut print = config.print.clone();
    print.source_map = false;
    print.preserve_comments = false;
    let printed = print_program(&program, &print);
    tracing::debug!(modules = order.len(), bytes = printed.code.len(), "bundle finished");
    Ok(BundleOutput {
        code: printed.code,
        diagnostics,
        module_order: order,
    })
}
