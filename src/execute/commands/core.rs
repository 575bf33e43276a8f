//! `import`, `define` and `p`.

use crate::execute::context::ExecuteContext;
use crate::execute::ir::Block;
use crate::execute::registry::{CommandCall, CommandRegistry, HandlerResult};

pub fn register(registry: &mut CommandRegistry) {
    // Resolved by the project graph.
    registry.register("import", consume);
    // Collected by the symbol table.
    registry.register("define", consume);
    registry.register("p", paragraph);
}

fn consume(_call: &CommandCall<'_>, _ctx: &mut ExecuteContext<'_>) -> HandlerResult {
    HandlerResult::consumed()
}

fn paragraph(call: &CommandCall<'_>, _ctx: &mut ExecuteContext<'_>) -> HandlerResult {
    HandlerResult::block(Block::text(call.arg_or_empty()))
}
