use std::collections::HashSet;

use gworkspace_core::scopes::{
    self, known_tools, BASE_SCOPES, DRIVE_SCOPES, GMAIL_COMPOSE_SCOPE, GMAIL_LABELS_SCOPE,
    GMAIL_MODIFY_SCOPE, GMAIL_READONLY_SCOPE, GMAIL_SEND_SCOPE, TASKS_SCOPES,
};
use gworkspace_core::ScopeResolver;

fn base() -> HashSet<&'static str> {
    BASE_SCOPES.iter().copied().collect()
}

fn with(extra: &[&'static str]) -> HashSet<&'static str> {
    let mut set = base();
    set.extend(extra.iter().copied());
    set
}

fn selections() -> Vec<Vec<&'static str>> {
    vec![
        vec![],
        vec!["gmail"],
        vec!["drive", "drive"],
        vec!["contacts", "calendar", "tasks"],
        vec!["not_a_real_tool", "gmail"],
        known_tools().collect(),
    ]
}

#[test]
fn every_selection_includes_base_scopes() {
    let resolver = ScopeResolver::new();
    for selection in selections() {
        let scopes = resolver.resolve_scopes(Some(&selection[..]));
        assert!(base().is_subset(&scopes), "base missing for {:?}", selection);
    }
}

#[test]
fn gmail_selection_adds_gmail_scopes() {
    let resolver = ScopeResolver::new();
    let scopes = resolver.resolve_scopes(Some(&["gmail"][..]));
    assert_eq!(
        scopes,
        with(&[
            GMAIL_READONLY_SCOPE,
            GMAIL_SEND_SCOPE,
            GMAIL_COMPOSE_SCOPE,
            GMAIL_MODIFY_SCOPE,
            GMAIL_LABELS_SCOPE,
        ])
    );
}

#[test]
fn unknown_tool_resolves_to_base_only() {
    let resolver = ScopeResolver::new();
    assert_eq!(resolver.resolve_scopes(Some(&["not_a_real_tool"][..])), base());
}

#[test]
fn unset_selection_resolves_to_all_scopes() {
    let resolver = ScopeResolver::new();
    let all: Vec<&str> = known_tools().collect();
    assert_eq!(
        resolver.resolve_scopes::<&str>(None),
        resolver.resolve_scopes(Some(&all[..]))
    );
}

#[test]
fn stored_selection_and_explicit_override() {
    let resolver = ScopeResolver::new();
    resolver.set_enabled_tools(["drive"]);

    assert_eq!(resolver.resolve_scopes::<&str>(None), with(DRIVE_SCOPES));
    assert_eq!(resolver.resolve_scopes(Some(&["tasks"][..])), with(TASKS_SCOPES));
    assert_eq!(resolver.current_scopes(), with(DRIVE_SCOPES));
}

#[test]
fn current_scopes_tracks_resolve_none() {
    let resolver = ScopeResolver::new();
    assert_eq!(resolver.current_scopes(), resolver.resolve_scopes::<&str>(None));

    for selection in selections() {
        resolver.set_enabled_tools(selection.iter().copied());
        assert_eq!(resolver.current_scopes(), resolver.resolve_scopes::<&str>(None));
    }
}

#[test]
fn resolution_is_idempotent() {
    let resolver = ScopeResolver::with_enabled_tools(["contacts", "gmail"]);
    let first = resolver.current_scopes();
    let second = resolver.current_scopes();
    assert_eq!(first, second);

    let sorted_a = scopes::sorted(&first);
    let sorted_b = scopes::sorted(&second);
    assert_eq!(sorted_a, sorted_b);
    assert_eq!(sorted_a.len(), first.len());
}

#[test]
fn shared_resolver_across_threads() {
    use std::sync::Arc;

    let resolver = Arc::new(ScopeResolver::with_enabled_tools(["tasks"]));
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let resolver = Arc::clone(&resolver);
            std::thread::spawn(move || resolver.current_scopes())
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), with(TASKS_SCOPES));
    }
}
