//! esforge_module: Module-level analysis.
//!
//! - [`extract_dependencies`]: the specifiers a program references
//! - [`ModuleResolver`]: the specifier resolver collaborator used by the bundler
//! - [`MemoryResolver`] and [`FsResolver`]: the two built-in resolvers
//! - [`path`]: specifier and id utilities shared by both resolvers

mod dependencies;
mod fs;
mod memory;
pub mod path;
mod resolver;

pub use dependencies::{extract_dependencies, literal_specifier, Dependency, DependencyKind};
pub use fs::FsResolver;
pub use memory::MemoryResolver;
pub use resolver::{ModuleResolver, ResolveError, ResolvedSpecifier};
