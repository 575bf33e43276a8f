//! `{config:...}`: applies assignments to the context's accumulator.

use crate::base::codes;
use crate::config::parse_config;
use crate::execute::context::ExecuteContext;
use crate::execute::registry::{CommandCall, CommandRegistry, HandlerResult};

pub fn register(registry: &mut CommandRegistry) {
    registry.register("config", apply);
}

/// Consume `{config:...}` without applying or reporting it, for passes that
/// run after the project-wide fold.
pub fn register_folded(registry: &mut CommandRegistry) {
    registry.register("config", skip);
}

fn skip(_call: &CommandCall<'_>, _ctx: &mut ExecuteContext<'_>) -> HandlerResult {
    HandlerResult::consumed()
}

fn apply(call: &CommandCall<'_>, ctx: &mut ExecuteContext<'_>) -> HandlerResult {
    for clause in parse_config(call.arg_or_empty()) {
        match clause {
            Ok(assignment) => ctx.config.apply(&assignment),
            Err(err) => ctx.diagnostics.error(
                format!("invalid config directive: {err}"),
                Some(&ctx.current_doc.file_id),
                Some(call.span),
                codes::CONFIG_PARSE,
            ),
        }
    }
    HandlerResult::consumed()
}
