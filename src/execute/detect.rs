//! Literal block classification.
//!
//! `{{{ ... }}}` content is opaque to the dispatcher; later passes (citation
//! formatting, math rendering) need a guess at what language it holds. The
//! guess is heuristic: strong single signals first, then a LaTeX score, then
//! the lighter formats.

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockType {
    Bibtex,
    CslJson,
    Latex,
    Typst,
    Markdown,
    Html,
    Text,
    Unknown,
}

impl BlockType {
    pub fn as_str(self) -> &'static str {
        match self {
            BlockType::Bibtex => "bibtex",
            BlockType::CslJson => "csl-json",
            BlockType::Latex => "latex",
            BlockType::Typst => "typst",
            BlockType::Markdown => "markdown",
            BlockType::Html => "html",
            BlockType::Text => "text",
            BlockType::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for BlockType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectedBlock {
    #[serde(rename = "type")]
    pub kind: BlockType,
    /// In `0.0..=1.0`.
    pub confidence: f32,
    pub reason: String,
}

impl DetectedBlock {
    fn new(kind: BlockType, confidence: f32, reason: impl Into<String>) -> Self {
        Self {
            kind,
            confidence,
            reason: reason.into(),
        }
    }
}

fn pattern(source: &str) -> Regex {
    Regex::new(source).expect("valid block pattern")
}

static BIBTEX_ENTRY: Lazy<Regex> = Lazy::new(|| pattern(r"^@\w+\s*\{"));
static CSL_KEYS: Lazy<Regex> = Lazy::new(|| pattern(r#""issued"|"author"|"title""#));
static LATEX_ENVIRONMENT_MARKER: Lazy<Regex> = Lazy::new(|| pattern(r"\\(begin|end)\{"));
static LATEX_STRONG_COMMANDS: Lazy<Regex> =
    Lazy::new(|| pattern(r"\\(section|subsection|textbf|textit|cite)\b"));

static LATEX_ENVIRONMENTS: Lazy<Regex> = Lazy::new(|| {
    pattern(
        r"\\(begin|end)\{(equation|align|aligned|gather|multline|array|tabular|matrix|pmatrix|bmatrix|vmatrix|cases|itemize|enumerate|figure|table|thebibliography|tikzpicture)\}",
    )
});
static DISPLAY_MATH_BRACKETS: Lazy<Regex> = Lazy::new(|| pattern(r"\\\[[\s\S]*\\\]"));
static INLINE_MATH_PARENS: Lazy<Regex> = Lazy::new(|| pattern(r"\\\([\s\S]*\\\)"));
static DISPLAY_MATH_DOLLARS: Lazy<Regex> = Lazy::new(|| pattern(r"^\s*\$\$[\s\S]*\$\$\s*$"));
static PREAMBLE_COMMANDS: Lazy<Regex> = Lazy::new(|| {
    pattern(r"\\(documentclass|usepackage|newcommand|renewcommand|providecommand|DeclareMathOperator)\b")
});
static MATH_COMMANDS: Lazy<Regex> = Lazy::new(|| {
    pattern(
        r"\\(frac|dfrac|tfrac|sum|prod|int|iint|iiint|oint|sqrt|left|right|cdot|times|pm|mp|leq|geq|neq|approx|equiv|to|mapsto|infty|partial|nabla|mathrm|mathbf|mathit|mathbb|mathcal|text)\b",
    )
});
static GREEK_LETTERS: Lazy<Regex> = Lazy::new(|| {
    pattern(
        r"\\(alpha|beta|gamma|delta|epsilon|varepsilon|zeta|eta|theta|vartheta|iota|kappa|lambda|mu|nu|xi|pi|varpi|rho|varrho|sigma|varsigma|tau|upsilon|phi|varphi|chi|psi|omega|Gamma|Delta|Theta|Lambda|Xi|Pi|Sigma|Upsilon|Phi|Psi|Omega)\b",
    )
});
static ALIGNMENT: Lazy<Regex> = Lazy::new(|| pattern(r"[^\S\r\n]*&[^\S\r\n]*=|\\begin\{align"));
static COMMENT_LINE: Lazy<Regex> = Lazy::new(|| pattern(r"(^|\n)\s*%"));
static DOCUMENT_COMMANDS: Lazy<Regex> =
    Lazy::new(|| pattern(r"\\(section|subsection|textbf|textit|cite|label|ref|pageref)\b"));

static TYPST_DIRECTIVE: Lazy<Regex> = Lazy::new(|| pattern(r"^#(set|show|import)\b"));
static TYPST_WORD: Lazy<Regex> = Lazy::new(|| {
    RegexBuilder::new(r"\btypst\b")
        .case_insensitive(true)
        .build()
        .expect("valid block pattern")
});
static MARKDOWN_LINE: Lazy<Regex> = Lazy::new(|| pattern(r"^(#{1,6}\s+|- |\* |\d+\.\s+)"));
static HTML_TAG: Lazy<Regex> = Lazy::new(|| {
    RegexBuilder::new(r"^<([a-z][a-z0-9]*)\b")
        .case_insensitive(true)
        .build()
        .expect("valid block pattern")
});

/// A LaTeX score at or above this counts as LaTeX.
const LATEX_THRESHOLD: u32 = 4;

/// `\r\n` → `\n`.
pub fn normalise_newlines(text: &str) -> String {
    text.replace("\r\n", "\n")
}

/// Guess the language of a literal block's content.
pub fn detect_block_type(content: &str) -> DetectedBlock {
    let normalised = normalise_newlines(content);
    let text = normalised.trim();
    if text.is_empty() {
        return DetectedBlock::new(BlockType::Text, 1.0, "empty block");
    }

    let first = text
        .split('\n')
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or_default();
    let dollar_wrapped = first.starts_with('$') && text.ends_with('$');

    if BIBTEX_ENTRY.is_match(first) {
        return DetectedBlock::new(BlockType::Bibtex, 0.95, "starts with @type{...}");
    }

    if (first.starts_with('{') || first.starts_with('[')) && CSL_KEYS.is_match(text) {
        return DetectedBlock::new(BlockType::CslJson, 0.7, "JSON-like with CSL-ish keys");
    }

    if LATEX_ENVIRONMENT_MARKER.is_match(text) || LATEX_STRONG_COMMANDS.is_match(text) || dollar_wrapped {
        return DetectedBlock::new(BlockType::Latex, 0.7, "LaTeX control sequences detected");
    }

    if let Some(latex) = score_latex(text, dollar_wrapped) {
        return latex;
    }

    if TYPST_DIRECTIVE.is_match(first) || TYPST_WORD.is_match(first) {
        return DetectedBlock::new(BlockType::Typst, 0.55, "typst-ish directives");
    }

    if MARKDOWN_LINE.is_match(first) || text.contains("```") {
        return DetectedBlock::new(BlockType::Markdown, 0.6, "markdown markers detected");
    }

    if HTML_TAG.is_match(first) {
        return DetectedBlock::new(BlockType::Html, 0.6, "looks like an HTML tag");
    }

    DetectedBlock::new(BlockType::Unknown, 0.2, "no known patterns matched")
}

/// Weaker LaTeX signals, summed.
fn score_latex(text: &str, dollar_wrapped: bool) -> Option<DetectedBlock> {
    let has_script = text.contains(['_', '^']) && text.contains(['\\', '$']);
    let signals: [(bool, u32, &str); 12] = [
        (LATEX_ENVIRONMENTS.is_match(text), 3, "common LaTeX environment"),
        (DISPLAY_MATH_BRACKETS.is_match(text), 3, "\\[...\\] display math"),
        (INLINE_MATH_PARENS.is_match(text), 2, "\\(...\\) inline math"),
        (DISPLAY_MATH_DOLLARS.is_match(text), 3, "$$...$$ display math"),
        (PREAMBLE_COMMANDS.is_match(text), 3, "preamble-style commands"),
        (MATH_COMMANDS.is_match(text), 2, "common math commands"),
        (GREEK_LETTERS.is_match(text), 2, "Greek letter commands"),
        (ALIGNMENT.is_match(text), 2, "alignment markers (&, &=)"),
        (has_script, 1, "math subscripts/superscripts"),
        (COMMENT_LINE.is_match(text), 1, "LaTeX comment (%)"),
        (DOCUMENT_COMMANDS.is_match(text), 2, "LaTeX document commands"),
        (dollar_wrapped, 2, "$...$ math-ish"),
    ];

    let mut score = 0;
    let mut reasons = Vec::new();
    for (matched, weight, reason) in signals {
        if matched {
            score += weight;
            reasons.push(reason);
        }
    }

    if score < LATEX_THRESHOLD {
        return None;
    }
    let confidence = (0.55 + score as f32 * 0.08).min(0.95);
    Some(DetectedBlock::new(BlockType::Latex, confidence, reasons.join("; ")))
}
