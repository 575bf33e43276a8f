//! `docgen`: dispatches the entry document into block IR, reflows its
//! paragraphs and classifies literal blocks.

use tracing::debug;

use crate::base::{Diagnostics, codes};
use crate::config::ConfigBuilder;
use crate::execute::detect::normalise_newlines;
use crate::execute::{
    AssetStore, Block, CommandRegistry, DispatchOptions, DocumentIr, ExecuteContext, detect_block_type,
    dispatch_document, reflow_paragraphs,
};
use crate::runtime::artifact::Artifact;
use crate::runtime::plugin::{Plugin, PluginContext, PluginError, PluginManifest};

pub const DOCGEN: &str = "docgen";
pub const DOCGEN_IR: &str = "docgen/ir";
pub const DOCGEN_ASSETS: &str = "docgen/assets";

pub struct DocgenPlugin {
    manifest: PluginManifest,
    registry: CommandRegistry,
    options: DispatchOptions,
}

impl DocgenPlugin {
    pub fn new() -> Self {
        Self {
            manifest: Self::describe(),
            registry: CommandRegistry::rendering(),
            options: DispatchOptions::default(),
        }
    }

    pub fn describe() -> PluginManifest {
        PluginManifest::new(DOCGEN).with_provides([DOCGEN_IR, DOCGEN_ASSETS])
    }

    /// Replace the default command set.
    pub fn with_registry(mut self, registry: CommandRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_options(mut self, options: DispatchOptions) -> Self {
        self.options = options;
        self
    }
}

impl Default for DocgenPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for DocgenPlugin {
    fn manifest(&self) -> &PluginManifest {
        &self.manifest
    }

    fn run(&self, ctx: &mut PluginContext<'_>) -> Result<(), PluginError> {
        let project = ctx.project;
        let Some(doc) = project.document(ctx.entry_file) else {
            ctx.diagnostics.error(
                format!("docgen: entry document not loaded: {}", ctx.entry_file),
                Some(ctx.entry_file),
                None,
                codes::DOCGEN_ENTRY_NOT_LOADED,
            );
            return Ok(());
        };

        let mut assets = AssetStore::new();
        let mut exec = ExecuteContext::new(project, ctx.symbols, &mut *ctx.diagnostics, &mut assets, doc)
            .with_config(ConfigBuilder::from(ctx.config.clone()));
        let ir = dispatch_document(&doc.ast, &self.registry, &mut exec, &self.options);
        drop(exec);
        let ir = classify_literals(reflow_paragraphs(ir), &mut *ctx.diagnostics);

        debug!(blocks = ir.len(), assets = assets.len(), "docgen produced IR");
        ctx.diagnostics
            .info(format!("docgen: {} block(s) from {}", ir.len(), doc.file_id));
        ctx.artifacts
            .add(Artifact::new(DOCGEN_IR, ir).with_source_file(doc.file_id.clone()));
        ctx.artifacts
            .add(Artifact::new(DOCGEN_ASSETS, assets).with_source_file(doc.file_id.clone()));
        Ok(())
    }
}

/// Tag each code block with its detected language, one info per block.
fn classify_literals(mut ir: DocumentIr, diagnostics: &mut Diagnostics) -> DocumentIr {
    for block in &mut ir.blocks {
        if let Block::CodeBlock { text, detected, .. } = block {
            *text = normalise_newlines(text);
            let found = detect_block_type(text);
            diagnostics.info(format!(
                "docgen: block detected={} confidence={:.2}",
                found.kind, found.confidence
            ));
            *detected = Some(found);
        }
    }
    ir
}
