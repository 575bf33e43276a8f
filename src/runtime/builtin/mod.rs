//! Plugins shipped with the engine.

pub mod docgen;
pub mod ir_json;

use std::path::PathBuf;

pub use docgen::{DOCGEN, DOCGEN_ASSETS, DOCGEN_IR, DocgenPlugin};
pub use ir_json::{FILE_JSON, IR_JSON, IrJsonPlugin};

/// Payload of `file/*` artifacts: a file a plugin wrote through the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFile {
    pub path: PathBuf,
    pub len: usize,
}
