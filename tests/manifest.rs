//! Manifest files feeding a registry.

use std::fs;

use route_dispatch::config::{load_manifest, parse_manifest, ConfigError, ValidationError};

mod common;

const MANIFEST: &str = r#"
[placeholders]
id = "[0-9]+"
slug = "[a-z-]+"

[[routes]]
verb = "GET"
path = "/"
target = "Home.Index"

[[routes]]
verb = "GET"
path = "/items/:id"
target = "Items.Show"

[[routes]]
verb = "GET"
path = "/items/:slug/:id"
target = "Items.Range"
"#;

#[test]
fn test_manifest_builds_table() {
    let manifest = parse_manifest(MANIFEST).unwrap();
    let mut registry = common::registry();
    manifest.apply(&mut registry).unwrap();
    let table = registry.build().unwrap();

    assert!(table.lookup("GET", "/").unwrap().args.is_empty());
    assert_eq!(table.lookup("GET", "/items/7").unwrap().args, vec!["7"]);
    assert_eq!(
        table.lookup("GET", "/items/red-shoes/9").unwrap().args,
        vec!["red-shoes", "9"]
    );
    assert_eq!(registry.placeholder("slug"), Some("[a-z-]+"));
    assert_eq!(registry.route("GET", "/items/:id").as_deref(), Some("Items.Show"));
}

#[test]
fn test_load_manifest_from_file() {
    let path = std::env::temp_dir().join(format!("route-dispatch-{}.toml", std::process::id()));
    fs::write(&path, MANIFEST).unwrap();

    let manifest = load_manifest(&path).unwrap();
    fs::remove_file(&path).unwrap();

    assert_eq!(manifest.placeholders.len(), 2);
    assert_eq!(manifest.routes[2].target, "Items.Range");
}

#[test]
fn test_invalid_manifest_reports_every_problem() {
    let err = parse_manifest(
        r#"
        [placeholders]
        id = "[0-9"

        [[routes]]
        path = "/items/:id"
        target = "Items"

        [[routes]]
        path = "/users/:user"
        target = "Users.Show"
        "#,
    )
    .unwrap_err();

    let ConfigError::Validation(errors) = &err else {
        panic!("expected validation errors, got {err}");
    };
    assert_eq!(errors.len(), 4);
    assert!(errors.contains(&ValidationError::MalformedTarget {
        index: 0,
        target: "Items".into(),
    }));
    assert!(errors.contains(&ValidationError::UnresolvedPlaceholder {
        index: 1,
        path: "/users/:user".into(),
    }));
}

#[test]
fn test_manifest_with_unknown_handler_fails_build() {
    let manifest = parse_manifest(
        r#"
        [[routes]]
        path = "/admin"
        target = "Admin.Index"
        "#,
    )
    .unwrap();
    let mut registry = common::registry();
    manifest.apply(&mut registry).unwrap();

    assert!(registry.build().is_err());
}
