//! The specifier resolver collaborator.
//!
//! The bundler never touches a file system or network itself. It asks a
//! [`ModuleResolver`] to turn a specifier into a module id and to load the
//! source text for an id; both calls may suspend.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Outcome of resolving a specifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "id")]
pub enum ResolvedSpecifier {
    /// A module to load and include, keyed by its id.
    Module(String),
    /// Left to the runtime; kept as an `import` in the output.
    External(String),
}

impl ResolvedSpecifier {
    pub fn id(&self) -> &str {
        match self {
            ResolvedSpecifier::Module(id) | ResolvedSpecifier::External(id) => id,
        }
    }

    pub fn is_external(&self) -> bool {
        matches!(self, ResolvedSpecifier::External(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("cannot find module '{specifier}'")]
    NotFound { specifier: String },

    #[error("failed to load '{id}': {message}")]
    Load { id: String, message: String },
}

/// Maps specifiers to module ids and loads module source.
///
/// `importer` is the id of the module containing the specifier, or `None`
/// for the bundle entry.
#[async_trait]
pub trait ModuleResolver: Send + Sync {
    async fn resolve(&self, specifier: &str, importer: Option<&str>) -> Result<ResolvedSpecifier, ResolveError>;

    async fn load(&self, id: &str) -> Result<String, ResolveError>;
}

#[async_trait]
impl<R: ModuleResolver + ?Sized> ModuleResolver for std::sync::Arc<R> {
    async fn resolve(&self, specifier: &str, importer: Option<&str>) -> Result<ResolvedSpecifier, ResolveError> {
        (**self).resolve(specifier, importer).await
    }

    async fn load(&self, id: &str) -> Result<String, ResolveError> {
        (**self).load(id).await
    }
}
