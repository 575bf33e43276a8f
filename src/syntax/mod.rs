//! Syntax: AST types for sh1 documents
//!
//! The AST is lexical rather than grammar-driven; see [`ast`].

pub mod ast;

pub use ast::{
    AstNode, CommandNode, CommandParts, Document, LiteralBlockNode, TextNode, split_command,
};
