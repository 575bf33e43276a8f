//! Cross-file index of `{define:name}` declarations.

use indexmap::IndexMap;
use serde::Serialize;
use smol_str::SmolStr;
use tracing::debug;

use crate::base::{Diagnostics, FileId, SourceRange, codes};
use crate::project::DocumentInfo;

/// One definition site of a name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SymbolInfo {
    pub name: SmolStr,
    pub defined_in: FileId,
    pub span: Option<SourceRange>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SymbolOptions {
    /// Report every definition after the first as `E_DEFINE_DUPLICATE`.
    pub enforce_unique: bool,
}

impl SymbolOptions {
    pub fn with_enforce_unique(mut self, enforce_unique: bool) -> Self {
        self.enforce_unique = enforce_unique;
        self
    }
}

/// Name → definitions, in first-definition order.
///
/// Duplicates are always recorded; uniqueness only adds diagnostics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SymbolTable {
    defs: IndexMap<SmolStr, Vec<SymbolInfo>>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect the `define` commands of `documents`, in iteration order.
    pub fn build<'a>(
        documents: impl IntoIterator<Item = &'a DocumentInfo>,
        options: SymbolOptions,
        diagnostics: &mut Diagnostics,
    ) -> Self {
        let mut table = Self::new();

        for doc in documents {
            for cmd in doc.commands_named("define") {
                let name = cmd.arg_or_empty().trim();
                if name.is_empty() {
                    diagnostics.error(
                        "empty define name",
                        Some(&doc.file_id),
                        cmd.span,
                        codes::DEFINE_EMPTY,
                    );
                    continue;
                }

                let defs = table.defs.entry(SmolStr::new(name)).or_default();
                defs.push(SymbolInfo {
                    name: SmolStr::new(name),
                    defined_in: doc.file_id.clone(),
                    span: cmd.span,
                });

                if options.enforce_unique && defs.len() > 1 {
                    diagnostics.error(
                        format!("duplicate definition for \"{name}\""),
                        Some(&doc.file_id),
                        cmd.span,
                        codes::DEFINE_DUPLICATE,
                    );
                }
            }
        }

        debug!(symbols = table.len(), "symbol table built");
        table
    }

    /// All definitions of `name`, in discovery order.
    pub fn get(&self, name: &str) -> &[SymbolInfo] {
        self.defs.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.defs.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.defs.keys().map(SmolStr::as_str)
    }

    /// Number of distinct names.
    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[SymbolInfo])> {
        self.defs
            .iter()
            .map(|(name, defs)| (name.as_str(), defs.as_slice()))
    }
}
