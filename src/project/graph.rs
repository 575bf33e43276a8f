//! Project graph: every document reachable from an entry file.
//!
//! Documents are reached two ways:
//! - implicit companions: siblings named `<stem>.<tag>.<ext>`, visited first
//! - explicit `{import:path}` commands, resolved by [`ImportResolver`]
//!
//! Missing files and unresolved imports become diagnostics; only a missing
//! entry (or a cycle under [`CyclePolicy::Fail`]) aborts the build.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};
use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::base::{Diagnostics, FileId, SourceRange, codes};
use crate::parser::{ParseResult, parse};
use crate::syntax::Document;

use super::commands::{CommandInstance, extract_commands, fallback_extract_commands};
use super::fs::FileSystem;
use super::import_resolver::{ImportResolver, ImportResolverOptions};

/// `via` tag of edges created by companion discovery.
pub const IMPLICIT_COMPANION: &str = "<implicit-companion>";

/// A loaded and parsed file. Created once per file id and never mutated.
#[derive(Debug, Clone)]
pub struct DocumentInfo {
    pub file_id: FileId,
    pub source_text: String,
    pub ast: Document,
    pub commands: Vec<CommandInstance>,
}

impl DocumentInfo {
    /// Commands with the given name, in source order.
    pub fn commands_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a CommandInstance> {
        self.commands.iter().filter(move |cmd| cmd.is(name))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportEdge {
    pub from: FileId,
    pub to: FileId,
    /// The import path as written, or [`IMPLICIT_COMPANION`].
    pub via: String,
    pub span: Option<SourceRange>,
}

impl ImportEdge {
    pub fn is_companion(&self) -> bool {
        self.via == IMPLICIT_COMPANION
    }
}

#[derive(Debug, Clone)]
pub struct ProjectGraph {
    pub entry_file: FileId,
    /// Documents in load order.
    pub documents: IndexMap<FileId, DocumentInfo>,
    /// Edges in discovery order.
    pub edges: Vec<ImportEdge>,
}

impl ProjectGraph {
    pub fn entry(&self) -> Option<&DocumentInfo> {
        self.documents.get(&self.entry_file)
    }

    pub fn document(&self, file_id: &FileId) -> Option<&DocumentInfo> {
        self.documents.get(file_id)
    }

    pub fn contains(&self, file_id: &FileId) -> bool {
        self.documents.contains_key(file_id)
    }

    pub fn edges_from<'a>(&'a self, file_id: &'a FileId) -> impl Iterator<Item = &'a ImportEdge> {
        self.edges.iter().filter(move |edge| &edge.from == file_id)
    }

    /// Documents with dependencies before dependents.
    ///
    /// Post-order DFS from the entry over edges in discovery order; a cycle
    /// is broken at the first revisit. Documents not reachable from the
    /// entry follow, in load order.
    pub fn dependency_order(&self) -> Vec<&DocumentInfo> {
        let mut adjacency: FxHashMap<&FileId, Vec<&FileId>> = FxHashMap::default();
        for edge in &self.edges {
            adjacency.entry(&edge.from).or_default().push(&edge.to);
        }

        let mut visited = FxHashSet::default();
        let mut order = Vec::with_capacity(self.documents.len());
        self.post_order(&self.entry_file, &adjacency, &mut visited, &mut order);
        for file_id in self.documents.keys() {
            self.post_order(file_id, &adjacency, &mut visited, &mut order);
        }
        order
    }

    fn post_order<'a>(
        &'a self,
        file_id: &'a FileId,
        adjacency: &FxHashMap<&'a FileId, Vec<&'a FileId>>,
        visited: &mut FxHashSet<&'a FileId>,
        order: &mut Vec<&'a DocumentInfo>,
    ) {
        if !visited.insert(file_id) {
            return;
        }
        if let Some(deps) = adjacency.get(file_id) {
            for &dep in deps {
                self.post_order(dep, adjacency, visited, order);
            }
        }
        if let Some(doc) = self.documents.get(file_id) {
            order.push(doc);
        }
    }
}

// ============================================================================
// BUILDER
// ============================================================================

/// What to do when an import leads back to a file still being visited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CyclePolicy {
    /// Stop recursing silently; the file is already loaded.
    #[default]
    Tolerate,
    /// Abort with [`GraphError::ImportCycle`].
    Fail,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphOptions {
    pub cycle_policy: CyclePolicy,
    /// Discover `<stem>.<tag>.<ext>` companion files.
    pub companions: bool,
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            cycle_policy: CyclePolicy::Tolerate,
            companions: true,
        }
    }
}

impl GraphOptions {
    pub fn with_cycle_policy(mut self, cycle_policy: CyclePolicy) -> Self {
        self.cycle_policy = cycle_policy;
        self
    }

    pub fn with_companions(mut self, companions: bool) -> Self {
        self.companions = companions;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("entry file not found: {0}")]
    EntryNotFound(FileId),

    #[error("import cycle: {}", format_cycle(.cycle))]
    ImportCycle { cycle: Vec<FileId> },
}

fn format_cycle(cycle: &[FileId]) -> String {
    cycle
        .iter()
        .map(FileId::as_str)
        .collect::<Vec<_>>()
        .join(" -> ")
}

pub type ParseFn = dyn Fn(&str, &str) -> ParseResult;
pub type ExtractFn = dyn Fn(&Document) -> Vec<CommandInstance>;

/// Loads, parses and links the documents of a project.
pub struct ProjectGraphBuilder<'a> {
    fs: &'a dyn FileSystem,
    resolver: ImportResolver<'a>,
    options: GraphOptions,
    parse: Box<ParseFn>,
    extract: Option<Box<ExtractFn>>,
}

impl<'a> ProjectGraphBuilder<'a> {
    /// A builder using the sh1 parser and AST command extraction.
    pub fn new(fs: &'a dyn FileSystem) -> Self {
        Self {
            fs,
            resolver: ImportResolver::new(fs, ImportResolverOptions::default()),
            options: GraphOptions::default(),
            parse: Box::new(parse),
            extract: Some(Box::new(extract_commands)),
        }
    }

    pub fn with_resolver_options(mut self, options: ImportResolverOptions) -> Self {
        self.resolver = ImportResolver::new(self.fs, options);
        self
    }

    pub fn with_options(mut self, options: GraphOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_parser(mut self, parse: impl Fn(&str, &str) -> ParseResult + 'static) -> Self {
        self.parse = Box::new(parse);
        self
    }

    pub fn with_extractor(
        mut self,
        extract: impl Fn(&Document) -> Vec<CommandInstance> + 'static,
    ) -> Self {
        self.extract = Some(Box::new(extract));
        self
    }

    /// Scan raw text for commands instead of walking the AST.
    pub fn with_fallback_extraction(mut self) -> Self {
        self.extract = None;
        self
    }

    pub fn options(&self) -> &GraphOptions {
        &self.options
    }

    /// Build the graph reachable from `entry`, reporting into `diagnostics`.
    pub fn build(
        &self,
        entry: impl AsRef<Path>,
        diagnostics: &mut Diagnostics,
    ) -> Result<ProjectGraph, GraphError> {
        let entry_path = self.fs.resolve(Path::new("."), entry.as_ref());
        let entry_file = FileId::new(self.fs.normalize(&entry_path));
        debug!(entry = %entry_file, "building project graph");

        let mut traversal = Traversal {
            builder: self,
            diagnostics,
            documents: IndexMap::new(),
            edges: Vec::new(),
            failed: FxHashSet::default(),
            stack: Vec::new(),
        };
        traversal.visit(entry_file.as_path())?;

        if !traversal.documents.contains_key(&entry_file) {
            return Err(GraphError::EntryNotFound(entry_file));
        }

        debug!(
            documents = traversal.documents.len(),
            edges = traversal.edges.len(),
            "project graph built"
        );
        Ok(ProjectGraph {
            entry_file,
            documents: traversal.documents,
            edges: traversal.edges,
        })
    }
}

struct Traversal<'b, 'a> {
    builder: &'b ProjectGraphBuilder<'a>,
    diagnostics: &'b mut Diagnostics,
    documents: IndexMap<FileId, DocumentInfo>,
    edges: Vec<ImportEdge>,
    /// Files already reported as missing or unreadable.
    failed: FxHashSet<FileId>,
    /// Files currently being visited, outermost first.
    stack: Vec<FileId>,
}

impl Traversal<'_, '_> {
    fn visit(&mut self, path: &Path) -> Result<(), GraphError> {
        let Some(file_id) = self.load(path) else {
            return Ok(());
        };
        self.stack.push(file_id.clone());

        if self.builder.options.companions {
            for companion in self.companions(&file_id) {
                let to = FileId::new(&companion);
                trace!(from = %file_id, to = %to, "companion edge");
                self.edges.push(ImportEdge {
                    from: file_id.clone(),
                    to: to.clone(),
                    via: IMPLICIT_COMPANION.to_string(),
                    span: None,
                });
                self.follow(&to)?;
            }
        }

        let imports: Vec<(String, Option<SourceRange>)> = self.documents[&file_id]
            .commands_named("import")
            .map(|cmd| (cmd.arg_or_empty().to_string(), cmd.span))
            .collect();

        for (import, span) in imports {
            let Some(target) = self
                .builder
                .resolver
                .resolve_existing(file_id.as_path(), &import)
            else {
                self.diagnostics.error(
                    format!("import not found: \"{import}\""),
                    Some(&file_id),
                    span,
                    codes::IMPORT_NOT_FOUND,
                );
                continue;
            };

            let to = FileId::new(self.builder.fs.normalize(&target));
            trace!(from = %file_id, to = %to, via = %import, "import edge");
            self.edges.push(ImportEdge {
                from: file_id.clone(),
                to: to.clone(),
                via: import,
                span,
            });
            self.follow(&to)?;
        }

        self.stack.pop();
        Ok(())
    }

    fn follow(&mut self, to: &FileId) -> Result<(), GraphError> {
        if let Some(start) = self.stack.iter().position(|active| active == to) {
            if self.builder.options.cycle_policy == CyclePolicy::Fail {
                let mut cycle = self.stack[start..].to_vec();
                cycle.push(to.clone());
                return Err(GraphError::ImportCycle { cycle });
            }
            trace!(file = %to, "import cycle tolerated");
            return Ok(());
        }
        if self.documents.contains_key(to) || self.failed.contains(to) {
            return Ok(());
        }
        self.visit(to.as_path())
    }

    fn load(&mut self, path: &Path) -> Option<FileId> {
        let fs = self.builder.fs;
        let normalized = fs.normalize(path);
        let file_id = FileId::new(&normalized);

        if self.documents.contains_key(&file_id) {
            return Some(file_id);
        }
        if self.failed.contains(&file_id) {
            return None;
        }

        if !fs.is_file(&normalized) {
            self.diagnostics.error(
                format!("file not found: {file_id}"),
                Some(&file_id),
                None,
                codes::FILE_NOT_FOUND,
            );
            self.failed.insert(file_id);
            return None;
        }

        let text = match fs.read_text(&normalized) {
            Ok(text) => text,
            Err(err) => {
                self.diagnostics.error(
                    format!("failed to read {file_id}: {err}"),
                    Some(&file_id),
                    None,
                    codes::READ_FAILED,
                );
                self.failed.insert(file_id);
                return None;
            }
        };

        let parsed = (self.builder.parse)(&text, file_id.as_str());
        for error in &parsed.errors {
            self.diagnostics.add(error.to_diagnostic(&file_id));
        }

        let commands = match &self.builder.extract {
            Some(extract) => extract(&parsed.document),
            None => fallback_extract_commands(&text),
        };

        debug!(file = %file_id, commands = commands.len(), "loaded document");
        self.documents.insert(
            file_id.clone(),
            DocumentInfo {
                file_id: file_id.clone(),
                source_text: text,
                ast: parsed.document,
                commands,
            },
        );
        Some(file_id)
    }

    /// Sibling `<stem>.<tag>.<ext>` files, sorted, excluding the file itself.
    fn companions(&mut self, file_id: &FileId) -> Vec<PathBuf> {
        let fs = self.builder.fs;
        let path = file_id.as_path();
        let (Some(stem), Some(ext)) = (
            path.file_stem().and_then(|s| s.to_str()),
            path.extension().and_then(|s| s.to_str()),
        ) else {
            return Vec::new();
        };

        let dir = fs.dirname(path);
        let names = match fs.read_dir(&dir) {
            Ok(names) => names,
            Err(err) => {
                warn!(dir = %dir.display(), error = %err, "cannot list directory for companions");
                self.diagnostics.warning(
                    format!("cannot read directory {}: {err}", dir.display()),
                    Some(file_id),
                    None,
                    codes::READ_DIR,
                );
                return Vec::new();
            }
        };

        let prefix = format!("{stem}.");
        let suffix = format!(".{ext}");
        let mut matches: Vec<PathBuf> = names
            .iter()
            .filter(|name| {
                name.len() > prefix.len() + suffix.len()
                    && name.starts_with(&prefix)
                    && name.ends_with(&suffix)
            })
            .map(|name| fs.normalize(&fs.resolve(&dir, Path::new(name))))
            .filter(|candidate| candidate.as_path() != path)
            .collect();
        matches.sort();
        matches
    }
}
