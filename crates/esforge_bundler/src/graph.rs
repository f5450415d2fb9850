//! The module graph and its emission order.

use esforge_ast::Program;
use esforge_diagnostics::Diagnostic;
use esforge_module::DependencyKind;
use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// Lifecycle of one module in a bundle request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModuleState {
    Unvisited,
    Parsing,
    ResolvingDependencies,
    Ready,
    Emitted,
    Errored,
}

impl ModuleState {
    /// Ready, Emitted or Errored: nothing more will happen during traversal.
    pub fn is_settled(self) -> bool {
        matches!(self, ModuleState::Ready | ModuleState::Emitted | ModuleState::Errored)
    }
}

/// Where an import edge points.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "id")]
pub enum EdgeTarget {
    Module(String),
    External(String),
    Unresolved,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub specifier: String,
    pub kind: DependencyKind,
    pub target: EdgeTarget,
}

#[derive(Debug, Clone)]
pub struct ModuleNode {
    pub id: String,
    pub state: ModuleState,
    /// Parsed and transformed tree, once loading finished.
    pub program: Option<Program>,
    /// Outgoing edges, one per distinct specifier, in source order.
    pub edges: Vec<Edge>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ModuleNode {
    fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            state: ModuleState::Unvisited,
            program: None,
            edges: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    pub fn edge(&self, specifier: &str) -> Option<&Edge> {
        self.edges.iter().find(|e| e.specifier == specifier)
    }

    /// Ids of modules this one depends on, in source order.
    pub fn module_targets(&self) -> impl Iterator<Item = &str> {
        self.edges.iter().filter_map(|e| match &e.target {
            EdgeTarget::Module(id) => Some(id.as_str()),
            _ => None,
        })
    }
}

/// Every module reachable from the entry, keyed by resolved id. An id is
/// inserted at most once, so no module is parsed twice.
#[derive(Debug, Clone, Default)]
pub struct ModuleGraph {
    entry: Option<String>,
    nodes: IndexMap<String, ModuleNode>,
}

impl ModuleGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entry(&self) -> Option<&str> {
        self.entry.as_deref()
    }

    /// Add an Unvisited node. Returns false if `id` is already present.
    /// The first module inserted is the entry.
    pub fn insert(&mut self, id: &str) -> bool {
        if self.nodes.contains_key(id) {
            return false;
        }
        if self.entry.is_none() {
            self.entry = Some(id.to_string());
        }
        self.nodes.insert(id.to_string(), ModuleNode::new(id));
        true
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&ModuleNode> {
        self.nodes.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut ModuleNode> {
        self.nodes.get_mut(id)
    }

    /// Nodes in discovery order.
    pub fn nodes(&self) -> impl Iterator<Item = &ModuleNode> {
        self.nodes.values()
    }

    pub fn state(&self, id: &str) -> Option<ModuleState> {
        self.nodes.get(id).map(|n| n.state)
    }

    pub fn transition(&mut self, id: &str, state: ModuleState) {
        if let Some(node) = self.nodes.get_mut(id) {
            tracing::trace!(module = id, from = ?node.state, to = ?state, "module state");
            node.state = state;
        }
    }

    pub fn has_errors(&self) -> bool {
        self.nodes.values().any(|n| n.state == ModuleState::Errored)
    }

    /// Promote nodes whose children have all settled to Ready, repeating
    /// until nothing changes.
    pub fn settle(&mut self) {
        loop {
            let ready: Vec<String> = self
                .nodes
                .values()
                .filter(|n| n.state == ModuleState::ResolvingDependencies)
                .filter(|n| {
                    n.module_targets()
                        .all(|t| self.state(t).is_some_and(ModuleState::is_settled))
                })
                .map(|n| n.id.clone())
                .collect();
            if ready.is_empty() {
                return;
            }
            for id in ready {
                self.transition(&id, ModuleState::Ready);
            }
        }
    }

    /// Called once traversal has drained: whatever still waits on its
    /// children is waiting on a cycle, and every member of it is loaded.
    pub fn settle_cycles(&mut self) {
        self.settle();
        let waiting: Vec<String> = self
            .nodes
            .values()
            .filter(|n| n.state == ModuleState::ResolvingDependencies)
            .map(|n| n.id.clone())
            .collect();
        for id in waiting {
            self.transition(&id, ModuleState::Ready);
        }
    }

    /// Depth-first post-order from the entry, following edges in source
    /// order. A dependency is emitted before its importers; an edge back
    /// to a module still on the stack is the back-edge that breaks its
    /// cycle and is returned alongside the order as `(from, to)`.
    pub fn emission_order(&self) -> (Vec<String>, Vec<(String, String)>) {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut back_edges = Vec::new();
        let Some(entry) = self.entry.as_deref() else {
            return (order, back_edges);
        };
        let mut on_stack: FxHashSet<&str> = FxHashSet::default();
        let mut done: FxHashSet<&str> = FxHashSet::default();
        let mut stack: Vec<(&str, Vec<&str>, usize)> = Vec::new();

        let children = |id: &str| -> Vec<&str> {
            self.nodes.get(id).map(|n| n.module_targets().collect()).unwrap_or_default()
        };
        stack.push((entry, children(entry), 0));
        on_stack.insert(entry);

        while let Some((id, targets, next)) = stack.last_mut() {
            if let Some(&target) = targets.get(*next) {
                *next += 1;
                let from = *id;
                if done.contains(target) {
                    continue;
                }
                if on_stack.contains(target) {
                    back_edges.push((from.to_string(), target.to_string()));
                    continue;
                }
                on_stack.insert(target);
                let grandchildren = children(target);
                stack.push((target, grandchildren, 0));
            } else {
                let id = *id;
                stack.pop();
                on_stack.remove(id);
                done.insert(id);
                order.push(id.to_string());
            }
        }
        (order, back_edges)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(target: &str) -> Edge {
        Edge {
            specifier: format!("./{}", target),
            kind: DependencyKind::StaticImport,
            target: EdgeTarget::Module(target.to_string()),
        }
    }

    fn graph(links: &[(&str, &[&str])]) -> ModuleGraph {
        let mut graph = ModuleGraph::new();
        for (id, _) in links {
            graph.insert(id);
        }
        for (id, targets) in links {
            let node = graph.get_mut(id).unwrap();
            node.edges = targets.iter().map(|t| edge(t)).collect();
            node.state = ModuleState::ResolvingDependencies;
        }
        graph
    }

    #[test]
    fn test_insert_is_idempotent() {
        let mut graph = ModuleGraph::new();
        assert!(graph.insert("a.js"));
        assert!(!graph.insert("a.js"));
        assert_eq!(graph.len(), 1);
        assert_eq!(graph.entry(), Some("a.js"));
    }

    #[test]
    fn test_dependencies_come_first() {
        let g = graph(&[("main", &["a", "b"]), ("a", &["c"]), ("b", &["c"]), ("c", &[])]);
        let (order, back_edges) = g.emission_order();
        assert_eq!(order, vec!["c", "a", "b", "main"]);
        assert!(back_edges.is_empty());
    }

    #[test]
    fn test_cycle_broken_at_first_back_edge() {
        let g = graph(&[("a", &["b"]), ("b", &["a"])]);
        let (order, back_edges) = g.emission_order();
        assert_eq!(order, vec!["b", "a"]);
        assert_eq!(back_edges, vec![("b".to_string(), "a".to_string())]);
    }

    #[test]
    fn test_settle_waits_for_children_then_cycles() {
        let mut g = graph(&[("a", &["b"]), ("b", &["a"]), ("c", &[])]);
        g.settle();
        assert_eq!(g.state("c"), Some(ModuleState::Ready));
        assert_eq!(g.state("a"), Some(ModuleState::ResolvingDependencies));
        g.settle_cycles();
        assert_eq!(g.state("a"), Some(ModuleState::Ready));
        assert_eq!(g.state("b"), Some(ModuleState::Ready));
    }
}
