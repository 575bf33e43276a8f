//! Lexical AST for a single sh1 file.
//!
//! The tree is flat: a [`Document`] root whose children mirror the lexer's
//! tokens one-to-one. Command contents stay unparsed (`name:arg` is split
//! on demand by [`split_command`]).

use serde::Serialize;

use crate::base::SourceRange;

/// Root node of a parsed file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    pub file_name: String,
    pub range: SourceRange,
    pub children: Vec<AstNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum AstNode {
    Text(TextNode),
    Command(CommandNode),
    LiteralBlock(LiteralBlockNode),
}

/// Plain text outside any block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextNode {
    pub value: String,
    pub range: SourceRange,
}

/// Ordinary command block `{...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandNode {
    /// Text between the braces, exactly as written.
    pub raw_content: String,
    /// Exact source slice, braces included.
    pub raw: String,
    pub range: SourceRange,
    /// False when the block ran to end of input.
    pub terminated: bool,
}

/// Literal block `{{...}}`, `{{{...}}}`, ...
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LiteralBlockNode {
    pub fence_width: usize,
    pub content: String,
    pub raw: String,
    pub range: SourceRange,
    pub terminated: bool,
}

impl AstNode {
    pub fn range(&self) -> SourceRange {
        match self {
            AstNode::Text(node) => node.range,
            AstNode::Command(node) => node.range,
            AstNode::LiteralBlock(node) => node.range,
        }
    }

    /// The exact source slice this node was built from.
    pub fn raw(&self) -> &str {
        match self {
            AstNode::Text(node) => &node.value,
            AstNode::Command(node) => &node.raw,
            AstNode::LiteralBlock(node) => &node.raw,
        }
    }

    pub fn as_command(&self) -> Option<&CommandNode> {
        match self {
            AstNode::Command(node) => Some(node),
            _ => None,
        }
    }
}

impl Document {
    /// Command nodes in source order.
    pub fn commands(&self) -> impl Iterator<Item = &CommandNode> {
        self.children.iter().filter_map(AstNode::as_command)
    }
}

impl CommandNode {
    pub fn parts(&self) -> CommandParts<'_> {
        split_command(&self.raw_content)
    }
}

/// A command's `name:arg` split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandParts<'a> {
    pub name: &'a str,
    /// `None` when there is no `:` or nothing but whitespace follows it.
    pub arg: Option<&'a str>,
}

/// Split raw command content at the first `:`, trimming both halves.
pub fn split_command(raw_content: &str) -> CommandParts<'_> {
    let trimmed = raw_content.trim();
    match trimmed.split_once(':') {
        None => CommandParts {
            name: trimmed,
            arg: None,
        },
        Some((name, arg)) => {
            let arg = arg.trim();
            CommandParts {
                name: name.trim(),
                arg: (!arg.is_empty()).then_some(arg),
            }
        }
    }
}
