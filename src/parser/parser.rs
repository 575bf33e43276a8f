//! Token stream → [`Document`].
//!
//! Wraps each token 1:1 into an AST node. Positions are derived by replaying
//! the source from the previous token's end, so skipped comment regions are
//! accounted for and every node carries its exact source slice.

use crate::base::{Diagnostic, FileId, LineIndex, SourcePosition, SourceRange};
use crate::syntax::{AstNode, CommandNode, Document, LiteralBlockNode, TextNode};

use super::lexer::{LexError, Token, TokenKind, tokenize};

/// A syntax problem found while lexing. Parsing itself never fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub message: String,
    pub range: SourceRange,
    pub code: &'static str,
}

impl SyntaxError {
    fn from_lex(error: &LexError, index: &LineIndex<'_>) -> Self {
        let start = index.position(u32::from(error.range.start()) as usize);
        let end = index.position(u32::from(error.range.end()) as usize);
        Self {
            message: error.kind.message(),
            range: SourceRange::new(start, end),
            code: error.kind.code(),
        }
    }

    pub fn to_diagnostic(&self, file: &FileId) -> Diagnostic {
        Diagnostic::error(self.message.as_str())
            .with_file(file.clone())
            .with_range(Some(self.range))
            .with_code(self.code)
    }
}

/// Parse output: a document is always produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseResult {
    pub document: Document,
    pub errors: Vec<SyntaxError>,
}

impl ParseResult {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Parse `source` into a lexical document named `file_name`.
pub fn parse(source: &str, file_name: &str) -> ParseResult {
    let lexed = tokenize(source);

    let mut cursor = SourcePosition::START;
    let mut children = Vec::with_capacity(lexed.tokens.len());

    for token in &lexed.tokens {
        let (start_offset, end_offset) = offsets(token);
        // Skipped comments sit between the cursor and the token start.
        let start = cursor.advance(&source[cursor.offset..start_offset]);
        let raw = &source[start_offset..end_offset];
        let end = start.advance(raw);
        cursor = end;

        children.push(node(token.kind, raw, SourceRange::new(start, end)));
    }

    let end = cursor.advance(&source[cursor.offset..]);
    let errors = if lexed.errors.is_empty() {
        Vec::new()
    } else {
        let index = LineIndex::new(source);
        lexed
            .errors
            .iter()
            .map(|error| SyntaxError::from_lex(error, &index))
            .collect()
    };

    ParseResult {
        document: Document {
            file_name: file_name.to_string(),
            range: SourceRange::new(SourcePosition::START, end),
            children,
        },
        errors,
    }
}

fn offsets(token: &Token<'_>) -> (usize, usize) {
    (
        u32::from(token.range.start()) as usize,
        u32::from(token.range.end()) as usize,
    )
}

fn node(kind: TokenKind<'_>, raw: &str, range: SourceRange) -> AstNode {
    match kind {
        TokenKind::Text(value) => AstNode::Text(TextNode {
            value: value.to_string(),
            range,
        }),
        TokenKind::Command { inner, terminated } => AstNode::Command(CommandNode {
            raw_content: inner.to_string(),
            raw: raw.to_string(),
            range,
            terminated,
        }),
        TokenKind::LiteralBlock {
            fence_width,
            content,
            terminated,
        } => AstNode::LiteralBlock(LiteralBlockNode {
            fence_width,
            content: content.to_string(),
            raw: raw.to_string(),
            range,
            terminated,
        }),
    }
}
