//! Logos-based lexer for sh1 source text
//!
//! Logos classifies the coarse character runs (text, `/`, comment openers,
//! brace openers). Block bodies are then located by searching the source
//! directly, since their extent depends on the opener (literal fences close
//! on the same number of `}`) and their content is never tokenized.
//! Scanning restarts a fresh logos lexer after every block.

use logos::Logos;
use text_size::{TextRange, TextSize};

use crate::base::codes;

/// A token with its kind and byte range in the source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind<'a>,
    pub range: TextRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind<'a> {
    /// Plain text between blocks and comments.
    Text(&'a str),
    /// `{...}`; `inner` excludes the braces and is never split here.
    Command { inner: &'a str, terminated: bool },
    /// `{{...}}`, `{{{...}}}`, ...; `content` is copied verbatim.
    LiteralBlock {
        fence_width: usize,
        content: &'a str,
        terminated: bool,
    },
}

/// A construct that ran to end of input without its closing delimiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexError {
    pub kind: LexErrorKind,
    /// Range of the opening delimiter.
    pub range: TextRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexErrorKind {
    UnterminatedCommand,
    UnterminatedLiteral { fence_width: usize },
    UnterminatedComment,
}

impl LexErrorKind {
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnterminatedCommand => codes::UNTERMINATED_COMMAND,
            Self::UnterminatedLiteral { .. } => codes::UNTERMINATED_LITERAL,
            Self::UnterminatedComment => codes::UNTERMINATED_COMMENT,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::UnterminatedCommand => {
                "unterminated command block: '{' has no closing '}'".to_string()
            }
            Self::UnterminatedLiteral { fence_width } => format!(
                "unterminated literal block: no closing {}",
                "}".repeat(*fence_width)
            ),
            Self::UnterminatedComment => "unterminated block comment".to_string(),
        }
    }
}

/// Result of lexing: the token stream plus unterminated-construct reports.
#[derive(Debug, Clone, Default)]
pub struct Lexed<'a> {
    pub tokens: Vec<Token<'a>>,
    pub errors: Vec<LexError>,
}

/// Logos token enum - coarse character classes only
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum RawToken {
    #[token("//")]
    LineComment,

    #[token("/*")]
    BlockCommentOpen,

    #[regex(r"\{\{+")]
    LiteralOpen,

    #[token("{")]
    CommandOpen,

    #[token("/")]
    Slash,

    #[regex(r"[^/{]+")]
    Text,
}

/// Single forward scanner over a source buffer.
pub struct Lexer<'a> {
    source: &'a str,
    pos: usize,
    text_start: Option<usize>,
    out: Lexed<'a>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            text_start: None,
            out: Lexed::default(),
        }
    }

    /// Consume the whole input.
    pub fn run(mut self) -> Lexed<'a> {
        let source = self.source;
        'scan: while self.pos < source.len() {
            let base = self.pos;
            let mut raw = RawToken::lexer(&source[base..]);

            while let Some(result) = raw.next() {
                let span = raw.span();
                let start = base + span.start;
                let end = base + span.end;

                match result {
                    Ok(RawToken::LineComment) => {
                        self.flush_text(start);
                        // The newline itself stays in the text stream.
                        self.pos = self.find_from(end, "\n").unwrap_or(source.len());
                        continue 'scan;
                    }
                    Ok(RawToken::BlockCommentOpen) => {
                        self.flush_text(start);
                        self.pos = match self.find_from(end, "*/") {
                            Some(close) => close + 2,
                            None => {
                                self.error(LexErrorKind::UnterminatedComment, start, end);
                                source.len()
                            }
                        };
                        continue 'scan;
                    }
                    Ok(RawToken::LiteralOpen) => {
                        self.flush_text(start);
                        self.literal_block(start, end);
                        continue 'scan;
                    }
                    Ok(RawToken::CommandOpen) => {
                        self.flush_text(start);
                        self.command(start, end);
                        continue 'scan;
                    }
                    Ok(RawToken::Slash | RawToken::Text) | Err(()) => {
                        self.text_start.get_or_insert(start);
                    }
                }
            }

            self.pos = source.len();
        }

        self.flush_text(source.len());
        self.out
    }

    fn literal_block(&mut self, start: usize, content_start: usize) {
        let source = self.source;
        let fence_width = content_start - start;
        let close = "}".repeat(fence_width);

        let (content_end, end, terminated) = match self.find_from(content_start, &close) {
            Some(at) => (at, at + fence_width, true),
            None => {
                self.error(
                    LexErrorKind::UnterminatedLiteral { fence_width },
                    start,
                    content_start,
                );
                (source.len(), source.len(), false)
            }
        };

        self.push(
            TokenKind::LiteralBlock {
                fence_width,
                content: &source[content_start..content_end],
                terminated,
            },
            start,
            end,
        );
        self.pos = end;
    }

    fn command(&mut self, start: usize, inner_start: usize) {
        let source = self.source;
        let (inner_end, end, terminated) = match self.find_from(inner_start, "}") {
            Some(at) => (at, at + 1, true),
            None => {
                self.error(LexErrorKind::UnterminatedCommand, start, inner_start);
                (source.len(), source.len(), false)
            }
        };

        self.push(
            TokenKind::Command {
                inner: &source[inner_start..inner_end],
                terminated,
            },
            start,
            end,
        );
        self.pos = end;
    }

    fn flush_text(&mut self, end: usize) {
        let source = self.source;
        if let Some(start) = self.text_start.take() {
            if end > start {
                self.push(TokenKind::Text(&source[start..end]), start, end);
            }
        }
    }

    fn find_from(&self, from: usize, needle: &str) -> Option<usize> {
        self.source[from..].find(needle).map(|at| from + at)
    }

    fn push(&mut self, kind: TokenKind<'a>, start: usize, end: usize) {
        self.out.tokens.push(Token {
            kind,
            range: text_range(start, end),
        });
    }

    fn error(&mut self, kind: LexErrorKind, start: usize, end: usize) {
        self.out.errors.push(LexError {
            kind,
            range: text_range(start, end),
        });
    }
}

fn text_range(start: usize, end: usize) -> TextRange {
    TextRange::new(TextSize::from(start as u32), TextSize::from(end as u32))
}

/// Tokenize an entire string.
pub fn tokenize(source: &str) -> Lexed<'_> {
    Lexer::new(source).run()
}
