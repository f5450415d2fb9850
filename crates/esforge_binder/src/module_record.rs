//! Import and export tables of a module.

use esforge_core::text::TextRange;
use serde::{Deserialize, Serialize};

use crate::symbol::BindingId;

/// Which export of the source module an import binds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "name")]
pub enum ImportName {
    Named(String),
    Default,
    /// `* as ns`
    Namespace,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportEntry {
    pub local: String,
    pub imported: ImportName,
    pub specifier: String,
    pub is_type_only: bool,
    #[serde(skip)]
    pub binding: Option<BindingId>,
}

/// Where an exported name gets its value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum ExportTarget {
    /// A local binding of this module.
    Local { name: String },
    /// `export default <expression>` with no local name.
    Expression,
    /// `export { a as b } from "x"`
    ReExport { specifier: String, imported: String },
    /// `export * as ns from "x"`
    ReExportNamespace { specifier: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportEntry {
    pub exported: String,
    pub target: ExportTarget,
    pub is_type_only: bool,
    pub range: TextRange,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleRecord {
    pub imports: Vec<ImportEntry>,
    pub exports: Vec<ExportEntry>,
    /// Specifiers of `export * from "x"`.
    pub star_exports: Vec<String>,
    /// `export = expr` is present.
    pub has_export_equals: bool,
}

impl ModuleRecord {
    pub fn export(&self, name: &str) -> Option<&ExportEntry> {
        self.exports.iter().find(|e| e.exported == name)
    }

    pub fn import(&self, local: &str) -> Option<&ImportEntry> {
        self.imports.iter().find(|i| i.local == local)
    }

    /// Value exports, skipping `export type` and interface/alias exports.
    pub fn value_exports(&self) -> impl Iterator<Item = &ExportEntry> {
        self.exports.iter().filter(|e| !e.is_type_only)
    }
}
