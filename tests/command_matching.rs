use std::cell::RefCell;
use std::rc::Rc;

use anyhow::anyhow;
use bk_palette::aliases::Alias;
use bk_palette::commands::{Command, CommandMatcher, CommandRegistry, BROWSE_SCORE, DIRECT_SCORE};

fn registry(calls: Rc<RefCell<Vec<Option<String>>>>) -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    registry.register(
        Command::new("pipeline", "Go to pipeline", "Open a pipeline page", move |params| {
            calls.borrow_mut().push(params.map(str::to_string));
            Ok(())
        })
        .with_keywords(&["open", "navigate"])
        .with_param_hint("<pipeline>"),
    );
    registry.register(Command::new("close", "Close palette", "Hide the palette", |_| Ok(())));
    registry.register(
        Command::new("deploy", "Deploy", "Needs a source", |_| Ok(())).available_when(|| Ok(false)),
    );
    registry.register(
        Command::new("broken", "Broken check", "Availability fails", |_| Ok(()))
            .available_when(|| Err(anyhow!("boom"))),
    );
    registry
}

fn go_alias() -> Alias {
    Alias {
        id: "alias-go".into(),
        name: "go".into(),
        command_id: "pipeline".into(),
        default_params: Some("web".into()),
        description: None,
    }
}

#[test]
fn alias_runs_with_default_params() {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let registry = registry(Rc::clone(&calls));
    let aliases = [go_alias()];

    let hits = CommandMatcher::new(&registry, &aliases).search("/go");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].item.id, "pipeline");
    assert_eq!(hits[0].score, DIRECT_SCORE);
    assert_eq!(hits[0].alias.as_deref(), Some("go"));

    hits[0].execute().unwrap();
    assert_eq!(*calls.borrow(), vec![Some("web".to_string())]);
}

#[test]
fn typed_params_override_alias_defaults() {
    let registry = registry(Rc::new(RefCell::new(Vec::new())));
    let aliases = [go_alias()];

    let hits = CommandMatcher::new(&registry, &aliases).search("/GO api-server");
    assert_eq!(hits[0].params.as_deref(), Some("api-server"));
}

#[test]
fn empty_input_lists_only_available_commands() {
    let registry = registry(Rc::new(RefCell::new(Vec::new())));
    let hits = CommandMatcher::new(&registry, &[]).search("   ");

    let ids: Vec<&str> = hits.iter().map(|h| h.item.id.as_str()).collect();
    assert_eq!(ids, ["pipeline", "close"]);
    assert!(hits.iter().all(|h| h.score == BROWSE_SCORE));
}

#[test]
fn unavailable_commands_cannot_be_reached_directly() {
    let registry = registry(Rc::new(RefCell::new(Vec::new())));
    let hits = CommandMatcher::new(&registry, &[]).search("/deploy");
    assert!(hits.iter().all(|h| h.item.id != "deploy"));
}

#[test]
fn keyword_matches_rank_commands() {
    let registry = registry(Rc::new(RefCell::new(Vec::new())));
    let hits = CommandMatcher::new(&registry, &[]).search("navigate");
    assert_eq!(hits.first().map(|h| h.item.id.as_str()), Some("pipeline"));
}

#[test]
fn ties_keep_registry_order() {
    let mut registry = CommandRegistry::new();
    for id in ["zz-build", "aa-build", "mm-build"] {
        registry.register(Command::new(id, id.to_uppercase().replace('-', " x "), "", |_| Ok(())));
    }
    let hits = CommandMatcher::new(&registry, &[]).search("build");
    let ids: Vec<&str> = hits.iter().map(|h| h.item.id.as_str()).collect();
    assert_eq!(ids, ["zz-build", "aa-build", "mm-build"]);
    assert!(hits.iter().all(|h| h.score == hits[0].score));
}

#[test]
fn keyword_hit_ranks_below_id_substring() {
    let mut registry = CommandRegistry::new();
    registry.register(Command::new("ship", "Ship", "", |_| Ok(())).with_keywords(&["deploy"]));
    registry.register(Command::new("redeploy", "Again", "", |_| Ok(())));
    let hits = CommandMatcher::new(&registry, &[]).search("deploy");
    let ids: Vec<&str> = hits.iter().map(|h| h.item.id.as_str()).collect();
    assert_eq!(ids, ["redeploy", "ship"]);
}
