use std::cell::RefCell;
use std::rc::Rc;

use super::{Behavior, manifest, project, stub_catalog};
use crate::base::codes;
use crate::config::Config;
use crate::runtime::host::MemoryHost;
use crate::runtime::planner::plan_plugins;
use crate::runtime::runner::{RunInputs, run_plugins};

#[test]
fn test_plugins_share_one_artifact_store() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let catalog = stub_catalog(
        &[
            (manifest("first", &["one"], &[]), Behavior::Provide),
            (manifest("second", &["two"], &["one"]), Behavior::Provide),
        ],
        &log,
    );
    let plan = plan_plugins(&["second"], &catalog, &catalog);
    let project = project(&[("/p/a.sh1", "text")]);
    let host = MemoryHost::new("/p");
    let config = Config::new();

    let outcome = run_plugins(
        &plan.ordered,
        RunInputs {
            entry_file: &project.graph.entry_file,
            project: &project.graph,
            symbols: &project.symbols,
            host: &host,
            config: &config,
        },
    );

    assert_eq!(*log.borrow(), vec!["first", "second"]);
    let kinds: Vec<&str> = outcome.artifacts.all().iter().map(|a| a.kind.as_str()).collect();
    assert_eq!(kinds, vec!["one", "two"]);
    assert!(outcome.diagnostics.is_empty());
}

#[test]
fn test_failures_are_isolated() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let catalog = stub_catalog(
        &[
            (manifest("errs", &[], &[]), Behavior::Fail),
            (manifest("panics", &[], &[]), Behavior::Panic),
            (manifest("works", &["ok"], &[]), Behavior::Provide),
        ],
        &log,
    );
    let plan = plan_plugins(&["errs", "panics", "works"], &catalog, &catalog);
    let project = project(&[("/p/a.sh1", "text")]);
    let host = MemoryHost::new("/p");
    let config = Config::new();

    let outcome = run_plugins(
        &plan.ordered,
        RunInputs {
            entry_file: &project.graph.entry_file,
            project: &project.graph,
            symbols: &project.symbols,
            host: &host,
            config: &config,
        },
    );

    assert_eq!(*log.borrow(), vec!["errs", "panics", "works"]);
    let crashes: Vec<String> = outcome
        .diagnostics
        .with_code(codes::PLUGIN_CRASH)
        .map(|d| d.message.to_string())
        .collect();
    assert_eq!(
        crashes,
        vec![
            "plugin \"errs\" crashed: boom".to_string(),
            "plugin \"panics\" crashed: kaboom".to_string(),
        ]
    );
    assert_eq!(outcome.artifacts.len(), 1);
}
