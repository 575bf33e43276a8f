//! # scraphand
//!
//! Core library for the sh1 document language: lexing and parsing, multi-file
//! project graphs, command dispatch into a document IR, and a plugin runtime
//! that turns the IR into output files.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! pipeline  → End-to-end build (graph → config → plan → run)
//!   ↓
//! runtime   → Artifacts, plugin catalog, planner, runner, host
//!   ↓
//! execute   → Command registry, dispatcher, document IR
//!   ↓
//! config    → {config:...} assignment language and folding
//!   ↓
//! semantic  → Symbol table of {define:...} declarations
//!   ↓
//! project   → FileSystem, import resolution, project graph
//!   ↓
//! syntax    → AST types
//!   ↓
//! parser    → Logos lexer, AST builder
//!   ↓
//! base      → Primitives (FileId, positions, diagnostics)
//! ```

// ============================================================================
// MODULES (dependency order: base → parser → syntax → project → semantic →
// config → execute → runtime → pipeline)
// ============================================================================

/// Foundation types: FileId, SourceRange, LineIndex, Diagnostics
pub mod base;

/// Parser: Logos lexer and AST builder
pub mod parser;

/// Syntax: AST types for sh1 documents
pub mod syntax;

/// Project management: filesystem, imports, project graph
pub mod project;

/// Semantic analysis: symbol table
pub mod semantic;

/// Configuration: `{config:...}` parsing and folding
pub mod config;

/// Command execution: registry, dispatcher, IR
pub mod execute;

/// Plugin runtime: artifacts, planning, execution
pub mod runtime;

/// End-to-end build
pub mod pipeline;

// Re-export foundation types
pub use base::{Diagnostic, Diagnostics, FileId, LineIndex, Severity, SourcePosition, SourceRange};

// Re-export the entry points
pub use parser::{ParseResult, SyntaxError, parse};
pub use pipeline::{BuildError, BuildOptions, BuildOutcome, LoadedProject, PlanSummary, build_project, load_project};
pub use project::{DiskFs, FileSystem, MemoryFs, ProjectGraph, ProjectGraphBuilder};
pub use runtime::{DiskHost, Host, MemoryHost, PluginCatalog};
