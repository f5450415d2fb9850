//! In-memory resolver.
//!
//! Serves modules from a map of id to source. Latency and failures can be
//! injected per id, which is what the bundler tests use to exercise slow
//! branches, cancellation and load errors.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use indexmap::IndexMap;
use rustc_hash::FxHashMap;

use crate::path::{candidates, has_scheme, is_bare_specifier, normalize_path, resolve_relative};
use crate::resolver::{ModuleResolver, ResolveError, ResolvedSpecifier};

/// Resolver over an in-memory file map.
///
/// Relative and rooted specifiers resolve against the importer with the
/// usual extension and `index` probing. A bare specifier resolves to a
/// module only when the map has that exact id; otherwise it is external.
#[derive(Debug, Clone, Default)]
pub struct MemoryResolver {
    files: IndexMap<String, String>,
    latency: FxHashMap<String, Duration>,
    failures: FxHashMap<String, String>,
    /// Ids in the order `load` was called.
    loads: Arc<Mutex<Vec<String>>>,
}

impl MemoryResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a module. The id is normalized.
    #[must_use]
    pub fn with_file(mut self, id: &str, source: &str) -> Self {
        self.files.insert(normalize_path(id), source.to_string());
        self
    }

    /// Delay every `load` of `id` by `delay`.
    #[must_use]
    pub fn with_latency(mut self, id: &str, delay: Duration) -> Self {
        self.latency.insert(normalize_path(id), delay);
        self
    }

    /// Make every `load` of `id` fail with `message`.
    #[must_use]
    pub fn with_failure(mut self, id: &str, message: &str) -> Self {
        self.failures.insert(normalize_path(id), message.to_string());
        self
    }

    /// Ids passed to `load` so far, in call order.
    pub fn loads(&self) -> Vec<String> {
        match self.loads.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn probe(&self, path: &str) -> Option<String> {
        candidates(path).into_iter().find(|candidate| self.files.contains_key(candidate))
    }
}

#[async_trait]
impl ModuleResolver for MemoryResolver {
    async fn resolve(&self, specifier: &str, importer: Option<&str>) -> Result<ResolvedSpecifier, ResolveError> {
        if is_bare_specifier(specifier) {
            let id = normalize_path(specifier);
            if !has_scheme(specifier) && self.files.contains_key(&id) {
                return Ok(ResolvedSpecifier::Module(id));
            }
            return Ok(ResolvedSpecifier::External(specifier.to_string()));
        }
        let path = resolve_relative(importer, specifier);
        self.probe(&path)
            .map(ResolvedSpecifier::Module)
            .ok_or_else(|| ResolveError::NotFound {
                specifier: specifier.to_string(),
            })
    }

    async fn load(&self, id: &str) -> Result<String, ResolveError> {
        if let Ok(mut guard) = self.loads.lock() {
            guard.push(id.to_string());
        }
        if let Some(delay) = self.latency.get(id) {
            tokio::time::sleep(*delay).await;
        }
        if let Some(message) = self.failures.get(id) {
            return Err(ResolveError::Load {
                id: id.to_string(),
                message: message.clone(),
            });
        }
        self.files.get(id).cloned().ok_or_else(|| ResolveError::Load {
            id: id.to_string(),
            message: "no such module".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> MemoryResolver {
        MemoryResolver::new()
            .with_file("src/main.ts", "import './util';")
            .with_file("src/util/index.ts", "export const x = 1;")
            .with_file("lib", "export default 1;")
    }

    #[tokio::test]
    async fn test_resolve_probes_index() {
        let resolved = resolver().resolve("./util", Some("src/main.ts")).await.unwrap();
        assert_eq!(resolved, ResolvedSpecifier::Module("src/util/index.ts".to_string()));
    }

    #[tokio::test]
    async fn test_bare_specifiers() {
        let r = resolver();
        assert_eq!(r.resolve("lib", None).await.unwrap(), ResolvedSpecifier::Module("lib".to_string()));
        assert!(r.resolve("react", Some("src/main.ts")).await.unwrap().is_external());
        assert!(r.resolve("node:fs", None).await.unwrap().is_external());
    }

    #[tokio::test]
    async fn test_missing_relative_is_an_error() {
        let err = resolver().resolve("./nope", Some("src/main.ts")).await.unwrap_err();
        assert_eq!(err, ResolveError::NotFound { specifier: "./nope".to_string() });
    }

    #[tokio::test]
    async fn test_injected_failure_and_load_log() {
        let r = resolver().with_failure("src/main.ts", "disk on fire");
        let err = r.load("src/main.ts").await.unwrap_err();
        assert!(err.to_string().contains("disk on fire"));
        assert_eq!(r.load("lib").await.unwrap(), "export default 1;");
        assert_eq!(r.loads(), vec!["src/main.ts".to_string(), "lib".to_string()]);
    }

    #[tokio::test]
    async fn test_injected_latency() {
        let r = resolver().with_latency("lib", Duration::from_millis(20));
        let started = tokio::time::Instant::now();
        r.load("lib").await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(20));
    }
}
