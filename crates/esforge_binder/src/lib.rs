//! esforge_binder: Scope analysis and name resolution.
//!
//! The binder walks a [`Program`](esforge_ast::Program) once, building a
//! tree of scopes, declaring every binding in the scope its hoisting rules
//! place it in, and linking each identifier reference (by [`NodeId`]) to the
//! binding it resolves to. Unresolved names are recorded, never fatal.
//!
//! It also collects the module's import and export tables, which the
//! TypeScript erasure pass and the bundler consume.

mod binder;
mod globals;
mod ids;
mod module_record;
mod scope;
mod symbol;

pub use binder::{bind_program, BindOptions, BindResult, Binder};
pub use globals::is_known_global;
pub use ids::assign_missing_ids;
pub use module_record::{ExportEntry, ExportTarget, ImportEntry, ImportName, ModuleRecord};
pub use scope::{Reference, Resolution, Scope, ScopeId, ScopeKind, ScopeTree};
pub use symbol::{Binding, BindingId, BindingKind, BindingTable};

pub use esforge_ast::NodeId;
