//! Command extraction: the `{name:arg}` instances a document contains.
//!
//! The project graph only needs names, arguments and spans (for `import`
//! and `define`), so this is a thin projection over the AST. When no AST
//! extractor is available the raw text is scanned with a regex instead.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use smol_str::SmolStr;

use crate::base::{LineIndex, SourceRange};
use crate::syntax::Document;

/// A single command occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandInstance {
    pub name: SmolStr,
    pub arg: Option<String>,
    pub span: Option<SourceRange>,
}

impl CommandInstance {
    pub fn is(&self, name: &str) -> bool {
        self.name == name
    }

    /// The argument, or `""` when absent.
    pub fn arg_or_empty(&self) -> &str {
        self.arg.as_deref().unwrap_or_default()
    }
}

/// Extract every named command from a parsed document, in source order.
pub fn extract_commands(document: &Document) -> Vec<CommandInstance> {
    document
        .commands()
        .filter_map(|node| {
            let parts = node.parts();
            if parts.name.is_empty() {
                return None;
            }
            Some(CommandInstance {
                name: SmolStr::new(parts.name),
                arg: parts.arg.map(str::to_string),
                span: Some(node.range),
            })
        })
        .collect()
}

static COMMAND_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{([A-Za-z_][A-Za-z0-9_-]*)(?::([^{}]*))?\}").expect("valid command pattern")
});

/// Recover commands straight from source text.
///
/// Less precise than [`extract_commands`]: comments and literal blocks are
/// not recognised. Spans cover the command name only.
pub fn fallback_extract_commands(text: &str) -> Vec<CommandInstance> {
    let index = LineIndex::new(text);
    COMMAND_PATTERN
        .captures_iter(text)
        .filter_map(|caps| {
            let name = caps.get(1)?;
            let arg = caps
                .get(2)
                .map(|m| m.as_str().trim())
                .filter(|arg| !arg.is_empty())
                .map(str::to_string);
            Some(CommandInstance {
                name: SmolStr::new(name.as_str()),
                arg,
                span: Some(SourceRange::new(
                    index.position(name.start()),
                    index.position(name.end()),
                )),
            })
        })
        .collect()
}
