use std::cell::Cell;
use std::rc::Rc;

use rstest::rstest;

use scraphand::base::codes;
use scraphand::parser::{TokenKind, tokenize};
use scraphand::project::IMPLICIT_COMPANION;
use scraphand::runtime::{
    Artifact, ArtifactStore, Plugin, PluginContext, PluginError, PluginManifest, plan_plugins,
};
use scraphand::semantic::{SymbolOptions, SymbolTable};
use scraphand::{
    BuildOptions, Diagnostics, FileId, MemoryFs, MemoryHost, PluginCatalog, ProjectGraphBuilder,
    build_project, parse,
};

#[rstest]
#[case::plain("just text")]
#[case::mixed("Intro {h1:Welcome} body {{ raw {x} }} tail {b:bold}")]
#[case::literal_widths("{{{a}}}{{b}}{{{{c}}}}")]
#[case::multiline("line one\n{p:two}\n\n{{{\n  code\n}}}\nend\n")]
fn test_raw_slices_reconstruct_source(#[case] source: &str) {
    let result = parse(source, "doc.sh1");
    assert!(result.errors.is_empty());

    let rebuilt: String = result.document.children.iter().map(|node| node.raw()).collect();
    assert_eq!(rebuilt, source);
}

#[rstest]
#[case("{{{abc}}}", 3, "abc")]
#[case("{{x}}", 2, "x")]
fn test_literal_fence_width(#[case] source: &str, #[case] width: usize, #[case] expected: &str) {
    let lexed = tokenize(source);
    assert_eq!(lexed.tokens.len(), 1);
    assert!(matches!(
        lexed.tokens[0].kind,
        TokenKind::LiteralBlock { fence_width, content, terminated: true }
            if fence_width == width && content == expected
    ));
}

#[test]
fn test_mismatched_fence_never_closes_early() {
    let lexed = tokenize("{{{x}}");
    assert!(matches!(
        lexed.tokens[0].kind,
        TokenKind::LiteralBlock { fence_width: 3, terminated: false, .. }
    ));
    assert_eq!(lexed.errors.len(), 1);
}

#[test]
fn test_command_content_is_split_later() {
    let result = parse("{h1:Welcome}", "doc.sh1");
    let command = result.document.commands().next().unwrap();

    assert_eq!(command.raw_content, "h1:Welcome");
    let parts = command.parts();
    assert_eq!((parts.name, parts.arg), ("h1", Some("Welcome")));
}

#[test]
fn test_companion_and_import_edges() {
    let fs = MemoryFs::new()
        .with_file("/p/A.sh1", "{import:B.sh1}")
        .with_file("/p/A.meta.sh1", "meta")
        .with_file("/p/B.sh1", "b");
    let mut diagnostics = Diagnostics::new();

    let graph = ProjectGraphBuilder::new(&fs).build("/p/A.sh1", &mut diagnostics).unwrap();

    let edges: Vec<(&str, &str, &str)> = graph
        .edges
        .iter()
        .map(|e| (e.from.as_str(), e.to.as_str(), e.via.as_str()))
        .collect();
    assert_eq!(
        edges,
        vec![
            ("/p/A.sh1", "/p/A.meta.sh1", IMPLICIT_COMPANION),
            ("/p/A.sh1", "/p/B.sh1", "B.sh1"),
        ]
    );
    assert!(graph.contains(&FileId::from("/p/A.meta.sh1")));
    assert!(graph.contains(&FileId::from("/p/B.sh1")));
    assert!(diagnostics.is_empty());
}

#[test]
fn test_missing_import_reports_once_and_graph_continues() {
    let fs = MemoryFs::new()
        .with_file("/p/A.sh1", "{import:gone.sh1}{import:B.sh1}")
        .with_file("/p/B.sh1", "b");
    let mut diagnostics = Diagnostics::new();

    let graph = ProjectGraphBuilder::new(&fs).build("/p/A.sh1", &mut diagnostics).unwrap();

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics.with_code(codes::IMPORT_NOT_FOUND).count(), 1);
    assert_eq!(graph.edges.len(), 1);
    assert_eq!(graph.documents.len(), 2);
}

#[rstest]
#[case::lenient(false, 0)]
#[case::unique(true, 1)]
fn test_duplicate_defines_are_kept(#[case] enforce_unique: bool, #[case] duplicates: usize) {
    let fs = MemoryFs::new()
        .with_file("/p/A.sh1", "{define:x}{import:B.sh1}")
        .with_file("/p/B.sh1", "{define:x}");
    let mut diagnostics = Diagnostics::new();
    let graph = ProjectGraphBuilder::new(&fs).build("/p/A.sh1", &mut diagnostics).unwrap();

    let symbols = SymbolTable::build(
        graph.documents.values(),
        SymbolOptions::default().with_enforce_unique(enforce_unique),
        &mut diagnostics,
    );

    assert_eq!(symbols.get("x").len(), 2);
    assert_eq!(diagnostics.with_code(codes::DEFINE_DUPLICATE).count(), duplicates);
}

#[test]
fn test_planner_auto_adds_provider_first() {
    let catalog = PluginCatalog::builtin();
    let plan = plan_plugins(&["ir-json"], &catalog, &catalog);

    assert_eq!(plan.names(), vec!["docgen", "ir-json"]);
    assert_eq!(plan.auto_added, vec!["docgen"]);
}

#[test]
fn test_artifact_queries_preserve_order() {
    let mut store = ArtifactStore::new();
    store.add(Artifact::new("x", 1u8));
    store.add(Artifact::new("y", 2u8));
    store.add(Artifact::new("x", 3u8));

    let all: Vec<u8> = store.all().iter().map(|a| *a.downcast_ref::<u8>().unwrap()).collect();
    let xs: Vec<u8> = store.all_of("x").map(|a| *a.downcast_ref::<u8>().unwrap()).collect();
    assert_eq!(all, vec![1, 2, 3]);
    assert_eq!(xs, vec![1, 3]);
}

/// Panics before doing anything; counts how often it ran.
struct Exploding {
    manifest: PluginManifest,
    runs: Rc<Cell<usize>>,
}

impl Plugin for Exploding {
    fn manifest(&self) -> &PluginManifest {
        &self.manifest
    }

    fn run(&self, _ctx: &mut PluginContext<'_>) -> Result<(), PluginError> {
        self.runs.set(self.runs.get() + 1);
        panic!("exploded");
    }
}

#[test]
fn test_crashing_plugin_leaves_others_intact() {
    let runs = Rc::new(Cell::new(0));
    let mut catalog = PluginCatalog::builtin();
    let counter = Rc::clone(&runs);
    catalog.register(PluginManifest::new("exploding"), move || {
        Box::new(Exploding {
            manifest: PluginManifest::new("exploding"),
            runs: Rc::clone(&counter),
        })
    });
    let fs = MemoryFs::new().with_file("/p/doc.sh1", "{h1:Hi}");
    let host = MemoryHost::new("/p");
    let options = BuildOptions::new("/p/doc.sh1").with_plugins(["docgen", "exploding", "ir-json"]);

    let outcome = build_project(&fs, &host, &catalog, &options).unwrap();

    assert_eq!(runs.get(), 1);
    let crashes: Vec<_> = outcome.diagnostics.with_code(codes::PLUGIN_CRASH).collect();
    assert_eq!(crashes.len(), 1);
    assert!(crashes[0].message.contains("\"exploding\""));
    assert_eq!(outcome.artifacts.all_of("docgen/ir").count(), 1);
    assert_eq!(outcome.artifacts.all_of("file/json").count(), 1);
    assert!(host.text("/p/doc.ir.json").is_some());
}
