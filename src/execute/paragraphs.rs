//! Paragraph reflow over dispatched IR.
//!
//! The dispatcher emits one paragraph per text node or inline command.
//! Reflow joins consecutive paragraphs into one run of inlines, breaks it
//! again at blank lines inside top-level text, and closes the run at every
//! other block.

use once_cell::sync::Lazy;
use regex::Regex;

use super::detect::normalise_newlines;
use super::ir::{Block, DocumentIr, Inline};

static BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{2,}").expect("valid blank line pattern"));

pub fn reflow_paragraphs(ir: DocumentIr) -> DocumentIr {
    let mut reflow = Reflow::default();
    for block in ir.blocks {
        match block {
            Block::Paragraph { inlines } => inlines.into_iter().for_each(|inline| reflow.push(inline)),
            other => {
                reflow.flush();
                reflow.blocks.push(other);
            }
        }
    }
    reflow.flush();
    DocumentIr::new(reflow.blocks)
}

#[derive(Default)]
struct Reflow {
    blocks: Vec<Block>,
    current: Vec<Inline>,
}

impl Reflow {
    fn push(&mut self, inline: Inline) {
        let Inline::Text { text } = inline else {
            self.current.push(inline);
            return;
        };

        let text = normalise_newlines(&text);
        let mut parts = BLANK_LINES.split(&text).peekable();
        while let Some(part) = parts.next() {
            if !part.is_empty() {
                self.current.push(Inline::text(part));
            }
            if parts.peek().is_some() {
                self.flush();
            }
        }
    }

    /// Close the current paragraph. Whitespace-only runs are dropped.
    fn flush(&mut self) {
        let inlines = std::mem::take(&mut self.current);
        let visible = inlines.iter().any(|inline| match inline {
            Inline::Text { text } => !text.trim().is_empty(),
            _ => true,
        });
        if visible {
            self.blocks.push(Block::paragraph(inlines));
        }
    }
}
