//! # Semantic Analysis
//!
//! Cross-file facts derived from a loaded project graph. Today that is the
//! symbol table of `{define:...}` declarations.

pub mod symbol_table;

pub use symbol_table::{SymbolInfo, SymbolOptions, SymbolTable};
