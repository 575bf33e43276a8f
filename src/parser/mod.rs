//! Parser: Logos lexer and position-tracking AST builder
//!
//! Both stages are total: malformed input yields a document plus
//! [`SyntaxError`]s, never an `Err`.

pub mod lexer;
#[allow(clippy::module_inception)]
pub mod parser;

pub use lexer::{LexError, LexErrorKind, Lexed, Lexer, Token, TokenKind, tokenize};
pub use parser::{ParseResult, SyntaxError, parse};

#[cfg(test)]
mod tests;
