//! Cross-module linking.
//!
//! Every module is bound, every import is traced through re-exports and
//! `export *` to the binding that finally provides it, and every top-level
//! name in the bundle is given a canonical spelling that is unique across
//! all modules. The result tells the emitter what to rename, which
//! namespace objects to build and which external imports to hoist.

use esforge_ast::Program;
use esforge_binder::{
    assign_missing_ids, bind_program, BindOptions, BindingId, BindingKind, ExportTarget, ImportName, ScopeId,
    ScopeTree,
};
use esforge_core::TextSpan;
use esforge_diagnostics::{messages, Diagnostic};
use esforge_module::DependencyKind;
use indexmap::{IndexMap, IndexSet};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::graph::{EdgeTarget, ModuleGraph};

/// What an imported or exported name finally refers to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Symbol {
    /// A top-level binding of a bundled module.
    Binding(usize, BindingId),
    /// The namespace object of a bundled module.
    Namespace(usize),
    /// The value of `export default <expression>` in a bundled module.
    DefaultExpression(usize),
    /// A name imported from an external module; `None` is the namespace.
    External { specifier: String, name: Option<String> },
}

enum Target {
    Module(usize),
    External(String),
}

struct ModuleInfo {
    id: String,
    key: String,
    program: Program,
    scopes: ScopeTree,
    edges: FxHashMap<String, EdgeTarget>,
}

/// A bundled module ready for emission.
pub(crate) struct LinkedModule {
    pub id: String,
    pub program: Program,
    pub scopes: ScopeTree,
    /// New spellings for bindings whose name changes in the bundle.
    pub renames: FxHashMap<BindingId, String>,
    /// Name for `export default <expression>` or an anonymous default
    /// function or class.
    pub default_name: Option<String>,
    pub namespace: Option<NamespaceObject>,
    /// Namespace object name for each literal `import()` specifier that
    /// points at a bundled module.
    pub dynamic_imports: FxHashMap<String, String>,
}

/// `var name = Object.freeze({ __proto__: null, get member() { ... } })`
pub(crate) struct NamespaceObject {
    pub name: String,
    /// `(exported name, canonical local name)` in export order.
    pub members: Vec<(String, String)>,
}

/// One hoisted binding from an external module.
pub(crate) struct ExternalBinding {
    /// `None` for `* as local`, `Some("default")` for the default export.
    pub imported: Option<String>,
    pub local: String,
}

pub(crate) struct Linked {
    pub modules: Vec<LinkedModule>,
    /// External specifiers in first-use order with the bindings each one
    /// provides. A specifier with no bindings is a side-effect import.
    pub externals: IndexMap<String, Vec<ExternalBinding>>,
    /// `(canonical local, exported)` pairs re-exported by the bundle.
    pub entry_exports: Vec<(String, String)>,
    /// External modules the entry re-exports with `export *`.
    pub entry_star_exports: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Names that must keep their meaning in the output.
const RUNTIME_NAMES: [&str; 2] = ["Object", "Promise"];

struct Namer {
    taken: FxHashSet<String>,
}

impl Namer {
    /// First free name among `wanted`, `wanted$key`, `wanted$key2`, ...
    fn claim(&mut self, wanted: &str, key: &str, avoid: impl Fn(&str) -> bool) -> String {
        let mut candidate = wanted.to_string();
        let mut counter = 1;
        while self.taken.contains(&candidate) || avoid(&candidate) {
            counter += 1;
            candidate = if counter == 2 {
                format!("{}${}", wanted, key)
            } else {
                format!("{}${}{}", wanted, key, counter - 1)
            };
        }
        self.taken.insert(candidate.clone());
        candidate
    }
}

/// Identifier-safe short name for a module id: the file stem, or the
/// directory name for `index` files.
pub(crate) fn module_key(id: &str) -> String {
    let mut parts = id.rsplit('/').filter(|p| !p.is_empty());
    let file = parts.next().unwrap_or("module");
    let stem = file.split('.').next().unwrap_or(file);
    let stem = if stem == "index" {
        parts.next().unwrap_or(stem)
    } else {
        stem
    };
    let mut key: String = stem
        .chars()
        .map(|c| if c == '$' || c == '_' || c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if key.is_empty() || key.starts_with(|c: char| c.is_ascii_digit()) {
        key.insert(0, '_');
    }
    key
}

fn import_name(name: &ImportName) -> Option<&str> {
    match name {
        ImportName::Named(name) => Some(name),
        ImportName::Default => Some("default"),
        ImportName::Namespace => None,
    }
}

struct Linker {
    modules: Vec<ModuleInfo>,
    index: FxHashMap<String, usize>,
    entry: usize,
    diagnostics: Vec<Diagnostic>,
}

impl Linker {
    fn target(&self, module: usize, specifier: &str) -> Option<Target> {
        match self.modules[module].edges.get(specifier)? {
            EdgeTarget::Module(id) => self.index.get(id).map(|&i| Target::Module(i)),
            EdgeTarget::External(specifier) => Some(Target::External(specifier.clone())),
            EdgeTarget::Unresolved => None,
        }
    }

    /// Follow `name` (or the namespace, for `None`) of whatever `specifier`
    /// points at from `module`.
    fn follow(
        &self,
        module: usize,
        specifier: &str,
        name: Option<&str>,
        visited: &mut FxHashSet<(usize, String)>,
    ) -> Option<Symbol> {
        match self.target(module, specifier)? {
            Target::Module(target) => match name {
                None => Some(Symbol::Namespace(target)),
                Some(name) => self.resolve_export(target, name, visited),
            },
            Target::External(specifier) => Some(Symbol::External {
                specifier,
                name: name.map(str::to_string),
            }),
        }
    }

    fn resolve_local(&self, module: usize, name: &str, visited: &mut FxHashSet<(usize, String)>) -> Option<Symbol> {
        let scopes = &self.modules[module].scopes;
        let binding = scopes.lookup(ScopeId::ROOT, name)?;
        if scopes.binding(binding).kind == BindingKind::Import {
            if let Some(entry) = scopes.module_record().import(name) {
                return self.follow(module, &entry.specifier, import_name(&entry.imported), visited);
            }
        }
        Some(Symbol::Binding(module, binding))
    }

    /// What export `name` of `module` refers to. `default` is never taken
    /// from `export *`.
    fn resolve_export(&self, module: usize, name: &str, visited: &mut FxHashSet<(usize, String)>) -> Option<Symbol> {
        if !visited.insert((module, name.to_string())) {
            return None;
        }
        let record = self.modules[module].scopes.module_record();
        if let Some(export) = record.value_exports().find(|e| e.exported == name) {
            return match &export.target {
                ExportTarget::Local { name } => self.resolve_local(module, name, visited),
                ExportTarget::Expression => Some(Symbol::DefaultExpression(module)),
                ExportTarget::ReExport { specifier, imported } => {
                    self.follow(module, specifier, Some(imported), visited)
                }
                ExportTarget::ReExportNamespace { specifier } => self.follow(module, specifier, None, visited),
            };
        }
        if name == "default" {
            return None;
        }
        for star in &record.star_exports {
            if let Some(Target::Module(target)) = self.target(module, star) {
                if let Some(symbol) = self.resolve_export(target, name, visited) {
                    return Some(symbol);
                }
            }
        }
        None
    }

    /// Every value export name of `module`, own exports first, then names
    /// reachable through `export *` in order.
    fn export_names(&self, module: usize, visited: &mut FxHashSet<usize>) -> IndexSet<String> {
        let mut names = IndexSet::new();
        if !visited.insert(module) {
            return names;
        }
        let record = self.modules[module].scopes.module_record();
        names.extend(record.value_exports().map(|e| e.exported.clone()));
        for star in &record.star_exports {
            if let Some(Target::Module(target)) = self.target(module, star) {
                for name in self.export_names(target, visited) {
                    if name != "default" {
                        names.insert(name);
                    }
                }
            }
        }
        names
    }

    fn missing_export(&mut self, importer: usize, specifier: &str, name: &str, span: Option<TextSpan>) {
        let file = self.modules[importer].id.clone();
        let diagnostic = match span {
            Some(span) => Diagnostic::at(span, &messages::MODULE_0_HAS_NO_EXPORTED_MEMBER_1, &[specifier, name]),
            None => Diagnostic::new(&messages::MODULE_0_HAS_NO_EXPORTED_MEMBER_1, &[specifier, name]),
        };
        tracing::warn!(module = %file, specifier, name, "missing export");
        self.diagnostics.push(diagnostic.in_file(&file));
    }
}

/// Link the modules of `graph` in emission `order`, taking their trees.
pub(crate) fn link(graph: &mut ModuleGraph, order: &[String]) -> Linked {
    let mut modules = Vec::with_capacity(order.len());
    let mut diagnostics = Vec::new();
    for id in order {
        let Some(node) = graph.get_mut(id) else {
            continue;
        };
        let Some(mut program) = node.program.take() else {
            continue;
        };
        assign_missing_ids(&mut program);
        let bound = bind_program(&program, &BindOptions::default());
        diagnostics.extend(bound.diagnostics.into_iter().filter(Diagnostic::is_error));
        modules.push(ModuleInfo {
            id: id.clone(),
            key: module_key(id),
            program,
            scopes: bound.scopes,
            edges: node.edges.iter().map(|e| (e.specifier.clone(), e.target.clone())).collect(),
        });
    }
    let index: FxHashMap<String, usize> = modules.iter().enumerate().map(|(i, m)| (m.id.clone(), i)).collect();
    let entry = graph.entry().and_then(|id| index.get(id).copied()).unwrap_or(0);
    let mut linker = Linker {
        modules,
        index,
        entry,
        diagnostics,
    };

    // Trace every import to its source.
    let mut needs_namespace: IndexSet<usize> = IndexSet::new();
    let mut import_symbols: Vec<Vec<(BindingId, Symbol)>> = Vec::with_capacity(linker.modules.len());
    for m in 0..linker.modules.len() {
        let mut resolved = Vec::new();
        let mut missing = Vec::new();
        let record = linker.modules[m].scopes.module_record();
        for entry in record.imports.iter().filter(|e| !e.is_type_only) {
            let Some(binding) = entry.binding else {
                continue;
            };
            let mut visited = FxHashSet::default();
            match linker.follow(m, &entry.specifier, import_name(&entry.imported), &mut visited) {
                Some(symbol) => resolved.push((binding, symbol)),
                None => {
                    let span = linker.modules[m].scopes.binding(binding).range.to_span();
                    let name = import_name(&entry.imported).unwrap_or("*").to_string();
                    missing.push((entry.specifier.clone(), name, span));
                }
            }
        }
        for (specifier, name, span) in missing {
            linker.missing_export(m, &specifier, &name, Some(span));
        }
        import_symbols.push(resolved);
    }

    // Literal `import()` of a bundled module evaluates to its namespace.
    let mut dynamic_targets: Vec<Vec<(String, usize)>> = Vec::with_capacity(linker.modules.len());
    for m in 0..linker.modules.len() {
        let mut targets = Vec::new();
        let module = &linker.modules[m];
        if let Some(node) = graph.get(&module.id) {
            for edge in node.edges.iter().filter(|e| e.kind == DependencyKind::DynamicImport) {
                if let Some(Target::Module(target)) = linker.target(m, &edge.specifier) {
                    targets.push((edge.specifier.clone(), target));
                    needs_namespace.insert(target);
                }
            }
        }
        dynamic_targets.push(targets);
    }

    // What the bundle itself exports.
    let entry_module = linker.entry;
    let mut entry_symbols = Vec::new();
    let mut entry_star_exports = Vec::new();
    if entry_module < linker.modules.len() {
        let names = linker.export_names(entry_module, &mut FxHashSet::default());
        let entry_id = linker.modules[entry_module].id.clone();
        for name in names {
            match linker.resolve_export(entry_module, &name, &mut FxHashSet::default()) {
                Some(symbol) => entry_symbols.push((name, symbol)),
                None => linker.missing_export(entry_module, &entry_id, &name, None),
            }
        }
        let record = linker.modules[entry_module].scopes.module_record();
        for star in &record.star_exports {
            if let Some(Target::External(specifier)) = linker.target(entry_module, star) {
                entry_star_exports.push(specifier);
            }
        }
    }

    for (_, symbol) in import_symbols.iter().flatten() {
        if let Symbol::Namespace(target) = symbol {
            needs_namespace.insert(*target);
        }
    }
    for (_, symbol) in &entry_symbols {
        if let Symbol::Namespace(target) = symbol {
            needs_namespace.insert(*target);
        }
    }

    // Namespace members can name further namespaces.
    let mut namespace_members: FxHashMap<usize, Vec<(String, Symbol)>> = FxHashMap::default();
    let mut next = 0;
    while next < needs_namespace.len() {
        let Some(&m) = needs_namespace.get_index(next) else {
            break;
        };
        next += 1;
        let names = linker.export_names(m, &mut FxHashSet::default());
        let mut members = Vec::with_capacity(names.len());
        for name in names {
            match linker.resolve_export(m, &name, &mut FxHashSet::default()) {
                Some(symbol) => {
                    if let Symbol::Namespace(target) = symbol {
                        needs_namespace.insert(target);
                    }
                    members.push((name, symbol));
                }
                None => {
                    let id = linker.modules[m].id.clone();
                    linker.missing_export(m, &id, &name, None);
                }
            }
        }
        namespace_members.insert(m, members);
    }

    // Canonical names, claimed in emission order.
    let mut namer = Namer {
        taken: RUNTIME_NAMES.iter().map(|s| s.to_string()).collect(),
    };
    for module in &linker.modules {
        namer
            .taken
            .extend(module.scopes.unresolved_references().map(|r| r.name.clone()));
    }
    let mut top_names: Vec<FxHashMap<BindingId, String>> = Vec::with_capacity(linker.modules.len());
    let mut default_names: FxHashMap<usize, String> = FxHashMap::default();
    let mut namespace_names: FxHashMap<usize, String> = FxHashMap::default();
    for (m, module) in linker.modules.iter().enumerate() {
        let scopes = &module.scopes;
        let mut names = FxHashMap::default();
        for binding in scopes.top_level_bindings() {
            if !binding.kind.is_value() || binding.kind == BindingKind::Import || binding.is_ambient {
                continue;
            }
            let own = binding.name.as_str();
            let name = namer.claim(own, &module.key, |c| c != own && scopes.is_declared_anywhere(c));
            names.insert(binding.id, name);
        }
        top_names.push(names);
        let has_default_expression = scopes
            .module_record()
            .value_exports()
            .any(|e| e.exported == "default" && e.target == ExportTarget::Expression);
        if has_default_expression {
            let wanted = format!("{}_default", module.key);
            default_names.insert(m, namer.claim(&wanted, &module.key, |c| scopes.is_declared_anywhere(c)));
        }
        if needs_namespace.contains(&m) {
            let wanted = format!("{}_exports", module.key);
            namespace_names.insert(m, namer.claim(&wanted, &module.key, |c| scopes.is_declared_anywhere(c)));
        }
    }

    // External specifiers in first-use order, then their bindings.
    let mut externals: IndexMap<String, Vec<ExternalBinding>> = IndexMap::new();
    for module in &linker.modules {
        if let Some(node) = graph.get(&module.id) {
            for edge in &node.edges {
                if let (EdgeTarget::External(specifier), DependencyKind::StaticImport | DependencyKind::ReExport) =
                    (&edge.target, edge.kind)
                {
                    externals.entry(specifier.clone()).or_default();
                }
            }
        }
    }
    let mut external_names: FxHashMap<(String, Option<String>), String> = FxHashMap::default();
    let mut local_for_external = |specifier: &str, name: &Option<String>, wanted: &str, namer: &mut Namer| -> String {
        let key = (specifier.to_string(), name.clone());
        if let Some(local) = external_names.get(&key) {
            return local.clone();
        }
        let wanted = match name.as_deref() {
            Some(name) if name != "default" && esforge_ast::factory::is_identifier_name(name) => name.to_string(),
            _ => wanted.to_string(),
        };
        let local = namer.claim(&wanted, &module_key(specifier), |_| false);
        externals.entry(specifier.to_string()).or_default().push(ExternalBinding {
            imported: name.clone(),
            local: local.clone(),
        });
        external_names.insert(key, local.clone());
        local
    };

    let mut canonical = |symbol: &Symbol, wanted: &str, namer: &mut Namer| -> String {
        match symbol {
            Symbol::Binding(m, binding) => top_names[*m]
                .get(binding)
                .cloned()
                .unwrap_or_else(|| linker.modules[*m].scopes.binding(*binding).name.clone()),
            Symbol::Namespace(m) => namespace_names.get(m).cloned().unwrap_or_else(|| wanted.to_string()),
            Symbol::DefaultExpression(m) => default_names.get(m).cloned().unwrap_or_else(|| wanted.to_string()),
            Symbol::External { specifier, name } => local_for_external(specifier, name, wanted, namer),
        }
    };

    // Renames per module, including nested bindings that would shadow a
    // canonical name the module now refers to.
    let mut renames: Vec<FxHashMap<BindingId, String>> = Vec::with_capacity(linker.modules.len());
    for (m, module) in linker.modules.iter().enumerate() {
        let scopes = &module.scopes;
        let mut map = FxHashMap::default();
        for (binding, name) in &top_names[m] {
            if scopes.binding(*binding).name != *name {
                map.insert(*binding, name.clone());
            }
        }
        for (binding, symbol) in &import_symbols[m] {
            let local = scopes.binding(*binding).name.clone();
            let name = canonical(symbol, &local, &mut namer);
            if name != local {
                map.insert(*binding, name);
            }
        }
        let introduced: FxHashSet<&String> = map.values().collect();
        let shadowing: Vec<(BindingId, String)> = scopes
            .bindings()
            .iter()
            .filter(|b| b.scope != ScopeId::ROOT && introduced.contains(&b.name))
            .map(|b| (b.id, b.name.clone()))
            .collect();
        for (binding, name) in shadowing {
            let fresh = namer.claim(&name, &module.key, |c| scopes.is_declared_anywhere(c));
            map.insert(binding, fresh);
        }
        renames.push(map);
    }

    let mut namespaces: FxHashMap<usize, NamespaceObject> = FxHashMap::default();
    for (m, members) in &namespace_members {
        let Some(name) = namespace_names.get(m) else {
            continue;
        };
        let members = members
            .iter()
            .map(|(exported, symbol)| (exported.clone(), canonical(symbol, exported, &mut namer)))
            .collect();
        namespaces.insert(
            *m,
            NamespaceObject {
                name: name.clone(),
                members,
            },
        );
    }

    let entry_exports: Vec<(String, String)> = entry_symbols
        .iter()
        .map(|(exported, symbol)| (canonical(symbol, exported, &mut namer), exported.clone()))
        .collect();

    let Linker {
        modules,
        diagnostics,
        ..
    } = linker;
    let modules = modules
        .into_iter()
        .zip(renames)
        .zip(dynamic_targets)
        .enumerate()
        .map(|(m, ((module, renames), dynamic))| LinkedModule {
            id: module.id,
            program: module.program,
            scopes: module.scopes,
            renames,
            default_name: default_names.get(&m).cloned(),
            namespace: namespaces.remove(&m),
            dynamic_imports: dynamic
                .into_iter()
                .filter_map(|(specifier, target)| namespace_names.get(&target).map(|n| (specifier, n.clone())))
                .collect(),
        })
        .collect();

    Linked {
        modules,
        externals,
        entry_exports,
        entry_star_exports,
        diagnostics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_key() {
        assert_eq!(module_key("src/main.ts"), "main");
        assert_eq!(module_key("src/util/index.ts"), "util");
        assert_eq!(module_key("lib/date-fns.js"), "date_fns");
        assert_eq!(module_key("2d.js"), "_2d");
        assert_eq!(module_key("react"), "react");
    }

    #[test]
    fn test_namer_suffixes_with_module_key() {
        let mut namer = Namer {
            taken: FxHashSet::default(),
        };
        assert_eq!(namer.claim("x", "a", |_| false), "x");
        assert_eq!(namer.claim("x", "b", |_| false), "x$b");
        assert_eq!(namer.claim("x", "b", |_| false), "x$b2");
        assert_eq!(namer.claim("y", "c", |c| c == "y"), "y$c");
    }
}
