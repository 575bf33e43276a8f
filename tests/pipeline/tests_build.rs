use rstest::rstest;
use serde_json::{Value, json};

use scraphand::base::codes;
use scraphand::project::{CyclePolicy, GraphError, GraphOptions};
use scraphand::{BuildError, BuildOptions, DiskFs, DiskHost, PluginCatalog, build_project};

use crate::helpers::diagnostic_helpers::{assert_clean, diagnostic_codes};
use crate::helpers::project_fixtures::TempProject;

#[test]
fn test_config_requested_plugin_writes_ir_json() {
    let project = TempProject::with_files(&[
        (
            "main.sh1",
            "{config:plugins+=ir-json}\n{h1:Report}\nSome text.\n{import:chapter.sh1}",
        ),
        ("chapter.sh1", "{define:intro}Chapter text"),
    ]);

    let outcome = project.build("main.sh1", &[]);

    assert_clean(&outcome.diagnostics);
    assert_eq!(outcome.plan.ordered, vec!["docgen", "ir-json"]);
    assert_eq!(outcome.plan.auto_added, vec!["docgen"]);
    assert_eq!(outcome.graph.documents.len(), 2);
    assert!(outcome.symbols.contains("intro"));

    let written: Value = serde_json::from_str(&project.read("main.ir.json").unwrap()).unwrap();
    let blocks = written["blocks"].as_array().unwrap();
    assert_eq!(blocks.len(), 2);
    assert_eq!(
        blocks[0],
        json!({"kind": "heading", "level": 1, "inlines": [{"kind": "text", "text": "Report"}]})
    );
    assert_eq!(blocks[1]["kind"], "paragraph");
}

#[test]
fn test_explicit_plugins_override_config() {
    let project = TempProject::with_files(&[("main.sh1", "{config:plugins+=ir-json}{h1:Report}")]);

    let outcome = project.build("main.sh1", &["docgen"]);

    assert_eq!(outcome.plan.ordered, vec!["docgen"]);
    assert!(outcome.plan.auto_added.is_empty());
    assert!(project.read("main.ir.json").is_none());
    assert_eq!(outcome.artifacts.all_of("docgen/ir").count(), 1);
}

#[test]
fn test_configured_output_path() {
    let project = TempProject::with_files(&[(
        "main.sh1",
        "{config:plugins+=ir-json, outputs+=[type=json, path=build/out.json]}text",
    )]);

    let outcome = project.build("main.sh1", &[]);

    assert_clean(&outcome.diagnostics);
    assert!(project.read("build/out.json").is_some());
    assert!(project.read("main.ir.json").is_none());
    assert_eq!(outcome.engine.outputs.len(), 1);
}

#[test]
fn test_entry_overrides_companion_config() {
    let project = TempProject::with_files(&[
        ("main.meta.sh1", "{config:title=\"Meta\", plugins+=docgen}"),
        ("main.sh1", "{config:title=\"Main\"}"),
    ]);

    let outcome = project.build("main.sh1", &[]);

    assert_eq!(outcome.config.get("title"), Some(&json!("Main")));
    assert_eq!(outcome.config.get("plugins"), Some(&json!(["docgen"])));
    assert_eq!(outcome.plan.ordered, vec!["docgen"]);
    assert!(outcome.graph.edges[0].is_companion());
}

#[test]
fn test_missing_entry_is_fatal() {
    let project = TempProject::new();
    let options = BuildOptions::new(project.path("absent.sh1"));

    let result = build_project(
        &DiskFs,
        &DiskHost::new(project.root()),
        &PluginCatalog::builtin(),
        &options,
    );

    assert!(matches!(
        result,
        Err(BuildError::Graph(GraphError::EntryNotFound(_)))
    ));
}

#[test]
fn test_problems_are_reported_but_outputs_still_written() {
    let project = TempProject::with_files(&[("main.sh1", "{mystery:x}{h1:Still here}")]);

    let outcome = project.build("main.sh1", &["nope", "ir-json"]);

    assert!(outcome.has_errors());
    assert_eq!(
        diagnostic_codes(&outcome.diagnostics),
        vec![codes::PLUGIN_NOT_FOUND, codes::UNKNOWN_COMMAND]
    );
    assert!(project.read("main.ir.json").is_some());
}

#[test]
fn test_syntax_errors_are_forwarded() {
    let project = TempProject::with_files(&[("main.sh1", "intro {h1:unterminated")]);

    let outcome = project.build("main.sh1", &[]);

    assert_eq!(diagnostic_codes(&outcome.diagnostics), vec![codes::UNTERMINATED_COMMAND]);
    assert!(outcome.plan.ordered.is_empty());
}

#[rstest]
#[case::tolerate(CyclePolicy::Tolerate, true)]
#[case::fail(CyclePolicy::Fail, false)]
fn test_cycle_policy(#[case] policy: CyclePolicy, #[case] builds: bool) {
    let project = TempProject::with_files(&[
        ("a.sh1", "{import:b.sh1}"),
        ("b.sh1", "{import:a.sh1}"),
    ]);
    let options = BuildOptions::new(project.path("a.sh1"))
        .with_graph(GraphOptions::default().with_cycle_policy(policy));

    let result = build_project(
        &DiskFs,
        &DiskHost::new(project.root()),
        &PluginCatalog::builtin(),
        &options,
    );

    match result {
        Ok(outcome) => {
            assert!(builds);
            assert_eq!(outcome.graph.documents.len(), 2);
            assert!(outcome.diagnostics.is_empty());
        }
        Err(err) => {
            assert!(!builds);
            assert!(matches!(err, BuildError::Graph(GraphError::ImportCycle { .. })));
        }
    }
}

#[test]
fn test_bad_config_directive_reported_once() {
    let project = TempProject::with_files(&[("main.sh1", "{config:nonsense}Hello")]);

    let outcome = project.build("main.sh1", &["docgen"]);

    assert_eq!(diagnostic_codes(&outcome.diagnostics), vec![codes::CONFIG_PARSE]);
    assert_eq!(outcome.artifacts.all_of("docgen/ir").count(), 1);
}
