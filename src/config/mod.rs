//! Document-level configuration.
//!
//! `{config:...}` commands carry a small assignment language
//! (`plugins+=docgen, bibliography.style=apa7`). Payloads are split and
//! parsed into [`ConfigAssignment`]s, folded by a [`ConfigBuilder`] across
//! the project's documents in dependency order, and finally viewed through
//! [`EngineConfig`] for the keys the engine itself reads.

pub mod builder;
pub mod engine;
pub mod parse;
pub mod split;

pub use builder::{Config, ConfigBuilder, lookup};
pub use engine::{EngineConfig, OutputSpec};
pub use parse::{ConfigAssignment, ConfigError, ConfigOp, parse_clause, parse_config, parse_value};
pub use split::split_top_level;
