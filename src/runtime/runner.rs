//! Sequential plugin execution with failure isolation.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, warn};

use crate::base::{Diagnostics, FileId, codes};
use crate::config::Config;
use crate::project::ProjectGraph;
use crate::semantic::SymbolTable;

use super::artifact::ArtifactStore;
use super::host::Host;
use super::plugin::{Plugin, PluginContext};

/// The read-only inputs shared by every plugin of a run.
#[derive(Clone, Copy)]
pub struct RunInputs<'a> {
    pub entry_file: &'a FileId,
    pub project: &'a ProjectGraph,
    pub symbols: &'a SymbolTable,
    pub host: &'a dyn Host,
    pub config: &'a Config,
}

#[derive(Debug, Default)]
pub struct RunOutcome {
    pub artifacts: ArtifactStore,
    pub diagnostics: Diagnostics,
}

/// Run `plugins` in order against one shared artifact store.
///
/// A plugin that returns an error or panics is reported as
/// `E_PLUGIN_CRASH`; the remaining plugins still run.
pub fn run_plugins(plugins: &[Box<dyn Plugin>], inputs: RunInputs<'_>) -> RunOutcome {
    let mut outcome = RunOutcome::default();

    for plugin in plugins {
        let name = plugin.name();
        debug!(plugin = name, "running plugin");

        let mut ctx = PluginContext {
            artifacts: &mut outcome.artifacts,
            diagnostics: &mut outcome.diagnostics,
            entry_file: inputs.entry_file,
            project: inputs.project,
            symbols: inputs.symbols,
            host: inputs.host,
            config: inputs.config,
        };
        let result = panic::catch_unwind(AssertUnwindSafe(|| plugin.run(&mut ctx)));

        let failure = match result {
            Ok(Ok(())) => None,
            Ok(Err(err)) => Some(err.to_string()),
            Err(payload) => Some(panic_message(payload.as_ref())),
        };
        if let Some(reason) = failure {
            warn!(plugin = name, %reason, "plugin crashed");
            outcome.diagnostics.error(
                format!("plugin \"{name}\" crashed: {reason}"),
                None,
                None,
                codes::PLUGIN_CRASH,
            );
        }
    }

    outcome
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "panicked".to_string()
    }
}
