//! Foundation types for the scraphand toolchain.
//!
//! This module provides fundamental types used throughout the compiler:
//! - [`SourcePosition`], [`SourceRange`] - 1-based line/column plus byte offset
//! - [`LineIndex`] - offset to line/column conversion
//! - [`FileId`] - normalized absolute path identifying a file
//! - [`Diagnostic`], [`Diagnostics`] - coded reports accumulated during a run
//!
//! This module has NO dependencies on other scraphand modules.

pub mod diagnostics;
mod file_id;
mod line_index;
mod position;

pub use diagnostics::{Diagnostic, Diagnostics, Severity, codes};
pub use file_id::FileId;
pub use line_index::LineIndex;
pub use position::{SourcePosition, SourceRange};

// Re-export text-size types for convenience
pub use text_size::{TextRange, TextSize};
