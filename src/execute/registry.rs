//! Command registry: command name → handler.

use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use crate::base::SourceRange;

use super::commands;
use super::context::ExecuteContext;
use super::ir::Block;

/// A command node, split and ready for its handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandCall<'a> {
    pub name: &'a str,
    pub arg: Option<&'a str>,
    /// Text between the braces, untrimmed.
    pub raw_content: &'a str,
    pub span: SourceRange,
}

impl CommandCall<'_> {
    pub fn arg_or_empty(&self) -> &str {
        self.arg.unwrap_or_default()
    }
}

/// What a handler contributes to the IR. No blocks means the command was
/// consumed silently.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HandlerResult {
    pub blocks: Vec<Block>,
}

impl HandlerResult {
    pub fn consumed() -> Self {
        Self::default()
    }

    pub fn block(block: Block) -> Self {
        Self {
            blocks: vec![block],
        }
    }

    pub fn blocks(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }
}

pub trait CommandHandler {
    fn handle(&self, call: &CommandCall<'_>, ctx: &mut ExecuteContext<'_>) -> HandlerResult;
}

impl<F> CommandHandler for F
where
    F: Fn(&CommandCall<'_>, &mut ExecuteContext<'_>) -> HandlerResult,
{
    fn handle(&self, call: &CommandCall<'_>, ctx: &mut ExecuteContext<'_>) -> HandlerResult {
        self(call, ctx)
    }
}

/// Registry of command handlers.
///
/// Registering a name twice replaces the earlier handler.
#[derive(Default)]
pub struct CommandRegistry {
    handlers: FxHashMap<SmolStr, Box<dyn CommandHandler>>,
}

impl CommandRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Core, markup and config commands.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        commands::core::register(&mut registry);
        commands::markup::register(&mut registry);
        commands::config::register(&mut registry);
        registry
    }

    /// Core and markup commands, with `{config:...}` consumed silently.
    /// Used when rendering after [`collect_config`] has already applied and
    /// reported every directive.
    ///
    /// [`collect_config`]: super::collect_config
    pub fn rendering() -> Self {
        let mut registry = Self::new();
        commands::core::register(&mut registry);
        commands::markup::register(&mut registry);
        commands::config::register_folded(&mut registry);
        registry
    }

    /// Only `{config:...}`; used when folding configuration across a project.
    pub fn config_only() -> Self {
        let mut registry = Self::new();
        commands::config::register(&mut registry);
        registry
    }

    pub fn register(&mut self, name: &str, handler: impl CommandHandler + 'static) {
        self.handlers.insert(SmolStr::new(name), Box::new(handler));
    }

    /// Register a closure; spelled out so closure argument types are inferred.
    pub fn register_fn(
        &mut self,
        name: &str,
        handler: impl Fn(&CommandCall<'_>, &mut ExecuteContext<'_>) -> HandlerResult + 'static,
    ) {
        self.register(name, handler);
    }

    pub fn get(&self, name: &str) -> Option<&dyn CommandHandler> {
        self.handlers.get(name).map(|handler| handler.as_ref())
    }

    pub fn has(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Registered command names, sorted.
    pub fn list_commands(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(SmolStr::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl std::fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandRegistry")
            .field("commands", &self.list_commands())
            .finish()
    }
}
