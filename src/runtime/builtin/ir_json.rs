//! `ir-json`: writes the latest `docgen/ir` artifact as pretty JSON.
//!
//! Targets come from `outputs` entries with `type=json` (optionally limited
//! to `plugin=ir-json`); without any, the IR lands next to the entry file as
//! `<stem>.ir.json`.

use std::path::Path;

use tracing::debug;

use crate::config::EngineConfig;
use crate::execute::DocumentIr;
use crate::runtime::artifact::Artifact;
use crate::runtime::plugin::{Plugin, PluginContext, PluginError, PluginManifest};

use super::WrittenFile;
use super::docgen::DOCGEN_IR;

pub const IR_JSON: &str = "ir-json";
pub const FILE_JSON: &str = "file/json";

pub struct IrJsonPlugin {
    manifest: PluginManifest,
}

impl IrJsonPlugin {
    pub fn new() -> Self {
        Self {
            manifest: Self::describe(),
        }
    }

    pub fn describe() -> PluginManifest {
        PluginManifest::new(IR_JSON)
            .with_consumes([DOCGEN_IR])
            .with_provides([FILE_JSON])
    }
}

impl Default for IrJsonPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for IrJsonPlugin {
    fn manifest(&self) -> &PluginManifest {
        &self.manifest
    }

    fn run(&self, ctx: &mut PluginContext<'_>) -> Result<(), PluginError> {
        let json = {
            let Some(artifact) = ctx.artifacts.latest_of(DOCGEN_IR) else {
                return Err(PluginError::failed("no docgen/ir artifact to serialize"));
            };
            let ir = artifact
                .downcast_ref::<DocumentIr>()
                .ok_or_else(|| PluginError::failed("docgen/ir artifact is not a DocumentIr"))?;
            serde_json::to_string_pretty(ir)?
        };

        let engine = EngineConfig::from_config(ctx.config);
        let mut targets: Vec<String> = engine
            .outputs_for("json", IR_JSON)
            .map(|output| output.path.clone())
            .collect();
        if targets.is_empty() {
            targets.push(format!("{}.ir.json", ctx.entry_file.stem()));
        }

        for target in targets {
            let path = ctx.host.resolve_output_path(Path::new(&target));
            ctx.host.write_text_file(&path, &json)?;
            debug!(path = %path.display(), bytes = json.len(), "wrote IR json");
            ctx.artifacts.add(
                Artifact::new(
                    FILE_JSON,
                    WrittenFile {
                        path,
                        len: json.len(),
                    },
                )
                .with_source_file(ctx.entry_file.clone()),
            );
        }
        Ok(())
    }
}
