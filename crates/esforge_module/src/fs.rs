//! File-system resolver used by the CLI.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::path::{
    candidates, combine_paths, has_scheme, is_bare_specifier, normalize_path, normalize_slashes, resolve_relative,
};
use crate::resolver::{ModuleResolver, ResolveError, ResolvedSpecifier};

/// Resolves relative and absolute specifiers against the file system,
/// probing `.ts .tsx .js .jsx .mjs` and `index.*`. Bare specifiers and
/// URL-like specifiers are external.
#[derive(Debug, Clone)]
pub struct FsResolver {
    /// Directory the entry specifier is resolved against.
    root: String,
}

impl FsResolver {
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = normalize_slashes(&root.as_ref().to_string_lossy());
        Self {
            root: normalize_path(&root),
        }
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    async fn probe(&self, path: &str) -> Option<String> {
        for candidate in candidates(path) {
            match tokio::fs::metadata(&candidate).await {
                Ok(meta) if meta.is_file() => return Some(candidate),
                _ => {}
            }
        }
        None
    }
}

#[async_trait]
impl ModuleResolver for FsResolver {
    async fn resolve(&self, specifier: &str, importer: Option<&str>) -> Result<ResolvedSpecifier, ResolveError> {
        if (is_bare_specifier(specifier) && importer.is_some()) || has_scheme(specifier) {
            return Ok(ResolvedSpecifier::External(specifier.to_string()));
        }
        let path = match importer {
            Some(importer) => resolve_relative(Some(importer), specifier),
            // The entry may be written without `./`.
            None => normalize_path(&combine_paths(&self.root, specifier)),
        };
        match self.probe(&path).await {
            Some(id) => {
                tracing::trace!(specifier, id = %id, "resolved");
                Ok(ResolvedSpecifier::Module(id))
            }
            None => Err(ResolveError::NotFound {
                specifier: specifier.to_string(),
            }),
        }
    }

    async fn load(&self, id: &str) -> Result<String, ResolveError> {
        tokio::fs::read_to_string(PathBuf::from(id)).await.map_err(|err| ResolveError::Load {
            id: id.to_string(),
            message: err.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_resolves_with_probing() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("lib")).unwrap();
        std::fs::write(dir.path().join("main.ts"), "import './lib';").unwrap();
        std::fs::write(dir.path().join("lib").join("index.js"), "export {};").unwrap();

        let resolver = FsResolver::new(dir.path());
        let entry = resolver.resolve("main", None).await.unwrap();
        assert!(entry.id().ends_with("/main.ts"), "{:?}", entry);
        let lib = resolver.resolve("./lib", Some(entry.id())).await.unwrap();
        assert!(lib.id().ends_with("/lib/index.js"), "{:?}", lib);
        assert_eq!(resolver.load(lib.id()).await.unwrap(), "export {};");
    }

    #[tokio::test]
    async fn test_bare_and_missing() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = FsResolver::new(dir.path());
        let react = resolver.resolve("react", Some("/x/main.js")).await.unwrap();
        assert_eq!(react, ResolvedSpecifier::External("react".to_string()));
        assert!(matches!(
            resolver.resolve("./missing", Some("/x/main.js")).await,
            Err(ResolveError::NotFound { .. })
        ));
    }
}
