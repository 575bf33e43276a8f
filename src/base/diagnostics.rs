//! Diagnostics — coded, severity-tagged reports accumulated during a run.
//!
//! Every phase (graph building, symbol collection, dispatch, planning,
//! plugin execution) reports recoverable problems here instead of failing.
//! The collection is append-only and preserves insertion order.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use super::file_id::FileId;
use super::position::SourceRange;

// ============================================================================
// DIAGNOSTIC TYPES
// ============================================================================

/// Severity level of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Severity::Error)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A diagnostic message with optional location and code.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: Arc<str>,
    /// The file the problem was found in, if any.
    pub file: Option<FileId>,
    pub range: Option<SourceRange>,
    /// Stable code such as `E_IMPORT_NOT_FOUND`.
    pub code: Option<Arc<str>>,
}

impl Diagnostic {
    pub fn new(severity: Severity, message: impl Into<Arc<str>>) -> Self {
        Self {
            severity,
            message: message.into(),
            file: None,
            range: None,
            code: None,
        }
    }

    pub fn error(message: impl Into<Arc<str>>) -> Self {
        Self::new(Severity::Error, message)
    }

    pub fn warning(message: impl Into<Arc<str>>) -> Self {
        Self::new(Severity::Warning, message)
    }

    pub fn info(message: impl Into<Arc<str>>) -> Self {
        Self::new(Severity::Info, message)
    }

    pub fn with_file(mut self, file: FileId) -> Self {
        self.file = Some(file);
        self
    }

    pub fn with_range(mut self, range: Option<SourceRange>) -> Self {
        self.range = range;
        self
    }

    pub fn with_code(mut self, code: impl Into<Arc<str>>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    pub fn is_error(&self) -> bool {
        self.severity.is_error()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.severity)?;
        if let Some(code) = &self.code {
            write!(f, " {code}:")?;
        }
        write!(f, " {}", self.message)?;
        match (&self.file, &self.range) {
            (Some(file), Some(range)) => write!(f, " ({file}:{})", range.start),
            (Some(file), None) => write!(f, " ({file})"),
            _ => Ok(()),
        }
    }
}

// ============================================================================
// DIAGNOSTIC CODES
// ============================================================================

/// Stable diagnostic codes.
///
/// `E_*` codes are errors, `W_*` codes are warnings.
pub mod codes {
    // Project graph
    pub const FILE_NOT_FOUND: &str = "E_FILE_NOT_FOUND";
    pub const READ_FAILED: &str = "E_READ_FAILED";
    pub const IMPORT_NOT_FOUND: &str = "E_IMPORT_NOT_FOUND";
    pub const READ_DIR: &str = "W_READ_DIR";

    // Lexing
    pub const UNTERMINATED_COMMAND: &str = "E_UNTERMINATED_COMMAND";
    pub const UNTERMINATED_LITERAL: &str = "E_UNTERMINATED_LITERAL";
    pub const UNTERMINATED_COMMENT: &str = "E_UNTERMINATED_COMMENT";

    // Symbols
    pub const DEFINE_EMPTY: &str = "E_DEFINE_EMPTY";
    pub const DEFINE_DUPLICATE: &str = "E_DEFINE_DUPLICATE";

    // Dispatch
    pub const UNKNOWN_COMMAND: &str = "E_UNKNOWN_COMMAND";
    pub const CONFIG_PARSE: &str = "E_CONFIG_PARSE";

    // Plugins
    pub const PLUGIN_CRASH: &str = "E_PLUGIN_CRASH";
    pub const PLUGIN_NOT_FOUND: &str = "W_PLUGIN_NOT_FOUND";
    pub const NO_PROVIDER: &str = "W_NO_PROVIDER";
    pub const PLUGIN_CYCLE: &str = "W_PLUGIN_CYCLE";
    pub const DOCGEN_ENTRY_NOT_LOADED: &str = "E_DOCGEN_ENTRY_NOT_LOADED";
}

// ============================================================================
// DIAGNOSTIC COLLECTION
// ============================================================================

/// Ordered, append-only collection of diagnostics for a whole run.
#[derive(Clone, Debug, Default)]
pub struct Diagnostics {
    list: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.list.push(diagnostic);
    }

    /// Add a coded error located in `file`.
    pub fn error(
        &mut self,
        message: impl Into<Arc<str>>,
        file: Option<&FileId>,
        range: Option<SourceRange>,
        code: &'static str,
    ) {
        self.add(Self::located(Severity::Error, message, file, range, code));
    }

    /// Add a coded warning located in `file`.
    pub fn warning(
        &mut self,
        message: impl Into<Arc<str>>,
        file: Option<&FileId>,
        range: Option<SourceRange>,
        code: &'static str,
    ) {
        self.add(Self::located(Severity::Warning, message, file, range, code));
    }

    pub fn info(&mut self, message: impl Into<Arc<str>>) {
        self.add(Diagnostic::info(message));
    }

    fn located(
        severity: Severity,
        message: impl Into<Arc<str>>,
        file: Option<&FileId>,
        range: Option<SourceRange>,
        code: &'static str,
    ) -> Diagnostic {
        let mut diagnostic = Diagnostic::new(severity, message)
            .with_range(range)
            .with_code(code);
        diagnostic.file = file.cloned();
        diagnostic
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.list.iter()
    }

    pub fn as_slice(&self) -> &[Diagnostic] {
        &self.list
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.list.iter().any(Diagnostic::is_error)
    }

    /// Diagnostics carrying `code`, in insertion order.
    pub fn with_code<'a>(&'a self, code: &'a str) -> impl Iterator<Item = &'a Diagnostic> + 'a {
        self.list.iter().filter(move |d| d.code() == Some(code))
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.list
    }
}

impl Extend<Diagnostic> for Diagnostics {
    fn extend<I: IntoIterator<Item = Diagnostic>>(&mut self, iter: I) {
        self.list.extend(iter);
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.list.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.list.iter()
    }
}
