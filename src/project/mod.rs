//! Project management: filesystem access, import resolution and the
//! multi-file project graph.

pub mod commands;
pub mod fs;
pub mod graph;
pub mod import_resolver;

pub use commands::{CommandInstance, extract_commands, fallback_extract_commands};
pub use fs::{DiskFs, FileSystem, MemoryFs, normalize_path};
pub use graph::{
    CyclePolicy, DocumentInfo, GraphError, GraphOptions, IMPLICIT_COMPANION, ImportEdge,
    ProjectGraph, ProjectGraphBuilder,
};
pub use import_resolver::{ImportBase, ImportResolver, ImportResolverOptions};
