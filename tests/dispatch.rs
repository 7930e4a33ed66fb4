//! End-to-end registration, build and lookup.

use std::sync::Arc;
use std::thread;

use route_dispatch::{BuildError, LookupError, Registry, SharedTable};

mod common;

#[test]
fn test_root_route_resolves_without_arguments() {
    let mut registry = common::registry();
    registry.register_route("GET", "/", "Home.Index").unwrap();
    let table = registry.build().unwrap();

    let found = table.lookup("GET", "/").unwrap();
    assert_eq!(found.binding.name(), ("Home", "Index"));
    assert!(found.args.is_empty());
}

#[test]
fn test_placeholder_captures_segment() {
    let mut registry = common::registry();
    registry.register_placeholder("id", "[0-9]+").unwrap();
    registry.register_route("GET", "/:id", "Items.Show").unwrap();
    let table = registry.build().unwrap();

    let found = table.lookup("GET", "/42").unwrap();
    assert_eq!(found.binding.name(), ("Items", "Show"));
    assert_eq!(found.args, vec!["42"]);
    assert!(table.lookup("GET", "/4x2").is_err());
}

#[test]
fn test_unregistered_placeholder_fails_build() {
    let mut registry = common::registry();
    registry.register_route("GET", "/:bad", "Items.Show").unwrap();

    let err = registry.build().unwrap_err();
    assert!(matches!(err, BuildError::UnresolvedPlaceholder { ref path } if path == "/:bad"));
}

#[test]
fn test_unregistered_handler_fails_build() {
    let mut registry = Registry::new();
    registry.register_route("GET", "/", "Home.Index").unwrap();

    let err = registry.build().unwrap_err();
    assert_eq!(err.to_string(), "'Home' - handler not registered");
}

#[test]
fn test_every_exact_path_resolves() {
    let paths = ["/", "/about", "/about/team", "/a", "/ab", "/日本"];
    let mut registry = common::registry();
    for path in paths {
        registry.register_route("GET", path, "Home.Index").unwrap();
    }
    let table = registry.build().unwrap();

    for path in paths {
        let found = table.lookup("GET", path).unwrap();
        assert_eq!(found.binding.name(), ("Home", "Index"), "{path}");
        assert!(found.args.is_empty(), "{path}");
    }
    assert!(table.lookup("GET", "/abc").is_err());
    assert!(table.lookup("GET", "").is_err());
}

#[test]
fn test_captures_left_to_right() {
    let mut registry = common::registry();
    registry.register_placeholder("from", "[0-9]+").unwrap();
    registry.register_placeholder("to", "[0-9]+").unwrap();
    registry
        .register_route("GET", "/range/:from-:to.json", "Items.Range")
        .unwrap();
    let table = registry.build().unwrap();

    let found = table.lookup("GET", "/range/3-17.json").unwrap();
    assert_eq!(found.args, vec!["3", "17"]);
    // the dot is literal
    assert!(table.lookup("GET", "/range/3-17xjson").is_err());

    let out = found.invoke().unwrap();
    assert_eq!(out[0].downcast_ref::<String>().unwrap(), "3..17");
}

#[test]
fn test_not_found_carries_verb_and_path() {
    let mut registry = common::registry();
    registry.register_route("GET", "/", "Home.Index").unwrap();
    let table = registry.build().unwrap();

    assert_eq!(
        table.lookup("POST", "/").unwrap_err(),
        LookupError::NotFound {
            verb: "POST".into(),
            path: "/".into(),
        }
    );
    assert!(matches!(
        table.lookup("GET", "/nothing"),
        Err(LookupError::NotFound { .. })
    ));
}

#[test]
fn test_reregistration_replaces_target() {
    let mut registry = common::registry();
    registry.register_route("GET", "/items", "Items.Show").unwrap();
    registry.register_route("GET", "/items", "Home.Index").unwrap();
    let table = registry.build().unwrap();

    assert_eq!(table.lookup("GET", "/items").unwrap().binding.name(), ("Home", "Index"));
    assert_eq!(table.len(), 1);
}

#[test]
fn test_first_registered_pattern_wins() {
    let mut registry = common::registry();
    registry.register_placeholder("any", ".+").unwrap();
    registry.register_placeholder("id", "[0-9]+").unwrap();
    registry.register_route("GET", "/x/:any", "Items.Show").unwrap();
    registry.register_route("GET", "/x/:id", "Home.Index").unwrap();
    let table = registry.build().unwrap();

    for _ in 0..10 {
        assert_eq!(table.lookup("GET", "/x/1").unwrap().binding.name(), ("Items", "Show"));
    }
}

#[test]
fn test_table_list_matches_registry() {
    let mut registry = common::registry();
    registry.register_placeholder("id", "[0-9]+").unwrap();
    registry.register_route("GET", "/", "Home.Index").unwrap();
    registry.register_route("GET", "/:id", "Items.Show").unwrap();
    let expected = registry.table_list();
    let table = registry.build().unwrap();

    assert_eq!(table.table_list(), &expected);
    let json = serde_json::to_value(table.table_list()).unwrap();
    assert_eq!(json["placeholders"]["id"], "[0-9]+");
    assert_eq!(json["routes"][1]["target"], "Items.Show");
}

#[test]
fn test_concurrent_lookups() {
    let mut registry = common::registry();
    registry.register_placeholder("id", "[0-9]+").unwrap();
    registry.register_route("GET", "/", "Home.Index").unwrap();
    registry.register_route("GET", "/items/:id", "Items.Show").unwrap();
    let table = registry.build().unwrap();

    thread::scope(|s| {
        for worker in 0..8 {
            let table = &table;
            s.spawn(move || {
                for i in 0..200 {
                    let path = format!("/items/{}", worker * 1000 + i);
                    let found = table.lookup("GET", &path).unwrap();
                    assert_eq!(found.args, vec![(worker * 1000 + i).to_string()]);
                    assert!(table.lookup("GET", "/").unwrap().args.is_empty());
                }
            });
        }
    });
}

#[test]
fn test_shared_table_swap_under_readers() {
    let build = |target: &str| {
        let mut registry = common::registry();
        registry.register_route("GET", "/", target).unwrap();
        registry.build().unwrap()
    };
    let shared = Arc::new(SharedTable::new(build("Home.Index")));

    thread::scope(|s| {
        for _ in 0..4 {
            let shared = Arc::clone(&shared);
            s.spawn(move || {
                for _ in 0..200 {
                    let table = shared.load();
                    let (handler, _) = table.lookup("GET", "/").unwrap().binding.name();
                    assert!(handler == "Home" || handler == "Items");
                }
            });
        }
        shared.replace(build("Items.Show"));
    });

    assert_eq!(shared.load().lookup("GET", "/").unwrap().binding.name(), ("Items", "Show"));
}
