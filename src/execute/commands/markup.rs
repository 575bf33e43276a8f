//! Headings, inline emphasis, citations, images and the bibliography
//! placeholder.
//!
//! Inline commands become single-inline paragraphs;
//! [`reflow_paragraphs`] merges them into the surrounding text.
//!
//! [`reflow_paragraphs`]: crate::execute::reflow_paragraphs

use std::path::Path;

use serde_json::Value;

use crate::execute::context::{Asset, ExecuteContext};
use crate::execute::ir::{Block, Inline};
use crate::execute::registry::{CommandCall, CommandRegistry, HandlerResult};

const HEADINGS: [&str; 6] = ["h1", "h2", "h3", "h4", "h5", "h6"];

pub fn register(registry: &mut CommandRegistry) {
    for (idx, name) in HEADINGS.iter().enumerate() {
        let level = idx as u8 + 1;
        registry.register_fn(name, move |call, _ctx| heading(level, call));
    }
    registry.register("b", strong);
    registry.register("i", emphasis);
    registry.register("u", underline);
    registry.register("code", code);
    registry.register("cite", cite);
    registry.register("image", image);
    registry.register("bibliography", bibliography);
}

fn inline(inline: Inline) -> HandlerResult {
    HandlerResult::block(Block::paragraph(vec![inline]))
}

fn text_children(call: &CommandCall<'_>) -> Vec<Inline> {
    vec![Inline::text(call.arg_or_empty())]
}

fn heading(level: u8, call: &CommandCall<'_>) -> HandlerResult {
    HandlerResult::block(Block::Heading {
        level,
        inlines: text_children(call),
    })
}

fn strong(call: &CommandCall<'_>, _ctx: &mut ExecuteContext<'_>) -> HandlerResult {
    inline(Inline::Strong {
        children: text_children(call),
    })
}

fn emphasis(call: &CommandCall<'_>, _ctx: &mut ExecuteContext<'_>) -> HandlerResult {
    inline(Inline::Emphasis {
        children: text_children(call),
    })
}

fn underline(call: &CommandCall<'_>, _ctx: &mut ExecuteContext<'_>) -> HandlerResult {
    inline(Inline::Underline {
        children: text_children(call),
    })
}

fn code(call: &CommandCall<'_>, _ctx: &mut ExecuteContext<'_>) -> HandlerResult {
    inline(Inline::Code {
        text: call.arg_or_empty().to_string(),
    })
}

/// `{cite:key}` or `{cite:key, locator}`.
fn cite(call: &CommandCall<'_>, _ctx: &mut ExecuteContext<'_>) -> HandlerResult {
    let (key, locator) = match call.arg_or_empty().split_once(',') {
        Some((key, locator)) => (key.trim(), Some(locator.trim()).filter(|l| !l.is_empty())),
        None => (call.arg_or_empty(), None),
    };

    if key.is_empty() {
        return inline(Inline::RawCommand {
            name: call.name.to_string(),
            arg: call.arg.map(str::to_string),
        });
    }
    inline(Inline::Citation {
        key: key.to_string(),
        locator: locator.map(str::to_string),
    })
}

/// `{image:path}` or `{image:path|alt text}`. Registers the image as an
/// asset resolved against the current document's directory.
fn image(call: &CommandCall<'_>, ctx: &mut ExecuteContext<'_>) -> HandlerResult {
    let (asset_id, alt) = match call.arg_or_empty().split_once('|') {
        Some((id, alt)) => (id.trim(), Some(alt.trim()).filter(|a| !a.is_empty())),
        None => (call.arg_or_empty(), None),
    };

    if !asset_id.is_empty() && !ctx.assets.contains(asset_id) {
        let path = match ctx.current_doc.file_id.as_path().parent() {
            Some(dir) => dir.join(asset_id),
            None => Path::new(asset_id).to_path_buf(),
        };
        ctx.assets
            .put(Asset::new(asset_id, mime_for(asset_id)).with_path(path));
    }

    inline(Inline::Image {
        asset_id: asset_id.to_string(),
        alt: alt.map(str::to_string),
    })
}

fn mime_for(path: &str) -> &'static str {
    let ext = Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

/// `{bibliography}` or `{bibliography:style}`; style and title fall back to
/// `bibliography.style` / `bibliography.title` from the config.
fn bibliography(call: &CommandCall<'_>, ctx: &mut ExecuteContext<'_>) -> HandlerResult {
    let configured = |key: &str| {
        ctx.config
            .get(key)
            .and_then(Value::as_str)
            .map(str::to_string)
    };

    HandlerResult::block(Block::Bibliography {
        style: call
            .arg
            .map(str::to_string)
            .or_else(|| configured("bibliography.style")),
        title: configured("bibliography.title"),
        entries: Vec::new(),
    })
}
