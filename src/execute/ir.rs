//! Block-level document IR produced by command dispatch.

use serde::Serialize;

use super::detect::DetectedBlock;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Inline {
    Text { text: String },
    Strong { children: Vec<Inline> },
    Emphasis { children: Vec<Inline> },
    Underline { children: Vec<Inline> },
    Code { text: String },
    Citation { key: String, locator: Option<String> },
    /// A command nothing rendered; kept for later passes.
    #[serde(rename_all = "camelCase")]
    RawCommand { name: String, arg: Option<String> },
    #[serde(rename_all = "camelCase")]
    Image { asset_id: String, alt: Option<String> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Block {
    Paragraph { inlines: Vec<Inline> },
    /// `level` is 1..=6.
    Heading { level: u8, inlines: Vec<Inline> },
    /// Literal block content. `detected` is filled in by passes that
    /// classify it.
    CodeBlock {
        text: String,
        language: Option<String>,
        detected: Option<DetectedBlock>,
    },
    /// Source text preserved verbatim.
    Raw { text: String },
    /// Placeholder filled in by a bibliography formatter.
    Bibliography {
        style: Option<String>,
        title: Option<String>,
        entries: Vec<String>,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DocumentIr {
    pub blocks: Vec<Block>,
}

impl Inline {
    pub fn text(text: impl Into<String>) -> Self {
        Inline::Text { text: text.into() }
    }
}

impl Block {
    pub fn paragraph(inlines: Vec<Inline>) -> Self {
        Block::Paragraph { inlines }
    }

    /// A paragraph holding one plain text run.
    pub fn text(text: impl Into<String>) -> Self {
        Block::paragraph(vec![Inline::text(text)])
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Block::Paragraph { .. } => "paragraph",
            Block::Heading { .. } => "heading",
            Block::CodeBlock { .. } => "codeBlock",
            Block::Raw { .. } => "raw",
            Block::Bibliography { .. } => "bibliography",
        }
    }
}

impl DocumentIr {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}
