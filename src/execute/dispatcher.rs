//! AST → IR dispatch, and the project-wide configuration fold.

use tracing::{debug, trace};

use crate::base::{Diagnostics, codes};
use crate::config::{Config, ConfigBuilder};
use crate::project::ProjectGraph;
use crate::semantic::SymbolTable;
use crate::syntax::{AstNode, CommandNode, Document};

use super::context::{AssetStore, ExecuteContext};
use super::ir::{Block, DocumentIr};
use super::registry::{CommandCall, CommandRegistry};

/// How commands without a handler are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchOptions {
    /// Report `E_UNKNOWN_COMMAND`.
    pub error_on_unknown_commands: bool,
    /// Keep the command text as a raw block.
    pub preserve_unknown_as_raw: bool,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self {
            error_on_unknown_commands: true,
            preserve_unknown_as_raw: true,
        }
    }
}

impl DispatchOptions {
    /// Ignore unknown commands entirely.
    pub fn tolerant() -> Self {
        Self {
            error_on_unknown_commands: false,
            preserve_unknown_as_raw: false,
        }
    }
}

/// Walk `document`'s children in order, building its IR.
pub fn dispatch_document(
    document: &Document,
    registry: &CommandRegistry,
    ctx: &mut ExecuteContext<'_>,
    options: &DispatchOptions,
) -> DocumentIr {
    let mut blocks = Vec::new();

    for node in &document.children {
        match node {
            AstNode::Text(text) => {
                if !text.value.trim().is_empty() {
                    blocks.push(Block::text(text.value.as_str()));
                }
            }
            AstNode::LiteralBlock(literal) => blocks.push(Block::CodeBlock {
                text: literal.content.clone(),
                language: None,
                detected: None,
            }),
            AstNode::Command(command) => {
                dispatch_command(command, registry, ctx, options, &mut blocks)
            }
        }
    }

    trace!(file = %ctx.current_doc.file_id, blocks = blocks.len(), "dispatched document");
    DocumentIr::new(blocks)
}

fn dispatch_command(
    command: &CommandNode,
    registry: &CommandRegistry,
    ctx: &mut ExecuteContext<'_>,
    options: &DispatchOptions,
    blocks: &mut Vec<Block>,
) {
    let parts = command.parts();
    let call = CommandCall {
        name: parts.name,
        arg: parts.arg,
        raw_content: &command.raw_content,
        span: command.range,
    };

    match registry.get(call.name) {
        Some(handler) => blocks.extend(handler.handle(&call, ctx).blocks),
        None => {
            if options.error_on_unknown_commands {
                ctx.diagnostics.error(
                    format!("unknown command \"{}\"", call.name),
                    Some(&ctx.current_doc.file_id),
                    Some(call.span),
                    codes::UNKNOWN_COMMAND,
                );
            }
            if options.preserve_unknown_as_raw {
                blocks.push(Block::Raw {
                    text: format!("{{{}}}", command.raw_content),
                });
            }
        }
    }
}

/// Fold every `{config:...}` of the project into one config object.
///
/// Documents are visited dependencies-first, so a dependent's settings
/// override those of the files it imports.
pub fn collect_config(
    graph: &ProjectGraph,
    symbols: &SymbolTable,
    diagnostics: &mut Diagnostics,
) -> Config {
    let registry = CommandRegistry::config_only();
    let options = DispatchOptions::tolerant();
    let mut assets = AssetStore::new();

    let builder = graph
        .dependency_order()
        .into_iter()
        .fold(ConfigBuilder::new(), |builder, doc| {
            let mut ctx = ExecuteContext::new(graph, symbols, &mut *diagnostics, &mut assets, doc)
                .with_config(builder);
            dispatch_document(&doc.ast, &registry, &mut ctx, &options);
            ctx.into_config()
        });

    debug!(keys = builder.config().len(), "configuration collected");
    builder.into_config()
}
