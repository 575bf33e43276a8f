//! Command execution: turns a document's AST into block-level IR by
//! dispatching each command to a registered handler.

pub mod commands;
pub mod context;
pub mod detect;
pub mod dispatcher;
pub mod ir;
pub mod paragraphs;
pub mod registry;

pub use context::{Asset, AssetStore, ExecuteContext};
pub use detect::{BlockType, DetectedBlock, detect_block_type};
pub use dispatcher::{DispatchOptions, collect_config, dispatch_document};
pub use ir::{Block, DocumentIr, Inline};
pub use paragraphs::reflow_paragraphs;
pub use registry::{CommandCall, CommandHandler, CommandRegistry, HandlerResult};
