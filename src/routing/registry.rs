//! Route declarations and table compilation.
//!
//! # Responsibilities
//! - Accumulate routes, placeholder fragments and handler templates
//! - Compile them into an immutable [`RoutingTable`] in one fail-fast pass
//! - Answer diagnostic queries about what was declared
//!
//! # Data Flow
//! ```text
//! register_route("GET", "/items/:id", "Items.Show")
//!     → RouteSpec, last write wins per (verb, path)
//! register_placeholder("id", "[0-9]+")
//!     → compiled once to validate, stored as a capture group "([0-9]+)"
//! build()
//!     → template + action check per route
//!     → exact path   → StaticTrie
//!     → pattern path → substitute placeholders → ^...$ → PatternSet
//! ```
//!
//! # Design Decisions
//! - Substitution is one left-to-right scan; at each `:` the longest
//!   registered id wins, and an unknown id fails the build
//! - No `:` may survive substitution, so a fragment containing `:` fails
//!   the build of any route that uses it
//! - Literal path text is escaped; only fragments carry regex semantics
//! - Routes keep their first registration slot when overwritten, so
//!   pattern precedence follows declaration order

use std::collections::{BTreeMap, HashMap};

use regex::Regex;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::action::binding::ActionBinding;
use crate::action::handler::{Handler, HandlerTemplate};
use crate::error::{BuildError, RegistrationError};
use crate::routing::router::{RoutingTable, VerbRoutes};

/// Marks a placeholder token in a route path.
const PLACEHOLDER_PREFIX: char = ':';

/// One declared route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteSpec {
    pub verb: String,
    pub path: String,
    pub handler: String,
    pub action: String,
}

impl RouteSpec {
    /// `Handler.Action`.
    pub fn target(&self) -> String {
        format!("{}.{}", self.handler, self.action)
    }

    /// True when the path has no placeholder tokens.
    pub fn is_exact(&self) -> bool {
        !self.path.contains(PLACEHOLDER_PREFIX)
    }
}

/// Split `Handler.Action` into its two non-empty parts.
pub(crate) fn parse_target(target: &str) -> Result<(&str, &str), RegistrationError> {
    let mut parts = target.split('.');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(handler), Some(action), None) if !handler.is_empty() && !action.is_empty() => {
            Ok((handler, action))
        }
        _ => Err(RegistrationError::MalformedTarget(target.to_string())),
    }
}

#[derive(Debug, Clone)]
struct Placeholder {
    fragment: String,
    /// Fragment as spliced into a route pattern.
    pattern: String,
}

impl Placeholder {
    fn compile(id: &str, fragment: &str) -> Result<Self, RegistrationError> {
        if id.is_empty() {
            return Err(RegistrationError::EmptyPlaceholderId);
        }
        let compiled = Regex::new(fragment).map_err(|source| RegistrationError::InvalidFragment {
            id: id.to_string(),
            fragment: fragment.to_string(),
            source,
        })?;

        // group 0 is the whole match
        let pattern = if compiled.captures_len() == 1 {
            format!("({fragment})")
        } else {
            format!("(?:{fragment})")
        };

        Ok(Self {
            fragment: fragment.to_string(),
            pattern,
        })
    }
}

/// Everything declared in a registry or compiled into a table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TableList {
    /// Placeholder id → fragment, sorted by id.
    pub placeholders: BTreeMap<String, String>,
    /// Routes in registration order.
    pub routes: Vec<TableEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableEntry {
    pub verb: String,
    pub path: String,
    pub target: String,
}

/// Builder for a [`RoutingTable`].
#[derive(Debug, Default)]
pub struct Registry {
    routes: Vec<RouteSpec>,
    index: HashMap<(String, String), usize>,
    placeholders: HashMap<String, Placeholder>,
    handlers: HashMap<String, HandlerTemplate>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `target` for `(verb, path)`, replacing any earlier target.
    pub fn register_route(
        &mut self,
        verb: &str,
        path: &str,
        target: &str,
    ) -> Result<(), RegistrationError> {
        let (handler, action) = parse_target(target)?;
        if path.is_empty() {
            return Err(RegistrationError::EmptyPath);
        }

        let spec = RouteSpec {
            verb: verb.to_string(),
            path: path.to_string(),
            handler: handler.to_string(),
            action: action.to_string(),
        };

        match self.index.get(&(spec.verb.clone(), spec.path.clone())) {
            Some(&slot) => self.routes[slot] = spec,
            None => {
                self.index.insert((spec.verb.clone(), spec.path.clone()), self.routes.len());
                self.routes.push(spec);
            }
        }
        Ok(())
    }

    /// Declare the regex fragment substituted for `:id` in route paths.
    pub fn register_placeholder(
        &mut self,
        id: &str,
        fragment: &str,
    ) -> Result<(), RegistrationError> {
        let placeholder = Placeholder::compile(id, fragment)?;
        self.placeholders.insert(id.to_string(), placeholder);
        Ok(())
    }

    /// Replace every placeholder with the given set. Stops at the first
    /// invalid entry, leaving the entries before it registered.
    pub fn register_placeholders<'a, I>(&mut self, placeholders: I) -> Result<(), RegistrationError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        self.placeholders.clear();
        for (id, fragment) in placeholders {
            self.register_placeholder(id, fragment)?;
        }
        Ok(())
    }

    /// Register `template` under [`Handler::name`], replacing any earlier
    /// template of that name.
    pub fn register_handler_template<H: Handler>(&mut self, template: H) {
        self.handlers.insert(H::name().to_string(), HandlerTemplate::new(template));
    }

    /// Fragment registered under `id`.
    pub fn placeholder(&self, id: &str) -> Option<&str> {
        self.placeholders.get(id).map(|p| p.fragment.as_str())
    }

    /// `Handler.Action` target registered for `(verb, path)`.
    pub fn route(&self, verb: &str, path: &str) -> Option<String> {
        self.index
            .get(&(verb.to_string(), path.to_string()))
            .map(|&slot| self.routes[slot].target())
    }

    pub fn routes(&self) -> &[RouteSpec] {
        &self.routes
    }

    pub fn handler(&self, name: &str) -> Option<&HandlerTemplate> {
        self.handlers.get(name)
    }

    pub fn table_list(&self) -> TableList {
        TableList {
            placeholders: self
                .placeholders
                .iter()
                .map(|(id, p)| (id.clone(), p.fragment.clone()))
                .collect(),
            routes: self
                .routes
                .iter()
                .map(|spec| TableEntry {
                    verb: spec.verb.clone(),
                    path: spec.path.clone(),
                    target: spec.target(),
                })
                .collect(),
        }
    }

    /// Regex source for a pattern path, or `None` if a `:` would remain
    /// after substitution: an unregistered placeholder, or a fragment
    /// whose own text contains `:` (`[[:digit:]]`, `(?:a|b)`).
    pub(crate) fn substitute(&self, path: &str) -> Option<String> {
        let mut out = String::with_capacity(path.len() * 2);
        let mut rest = path;

        while let Some(at) = rest.find(PLACEHOLDER_PREFIX) {
            out.push_str(&regex::escape(&rest[..at]));
            let token = &rest[at + PLACEHOLDER_PREFIX.len_utf8()..];

            let (id, placeholder) = self
                .placeholders
                .iter()
                .filter(|(id, _)| token.starts_with(id.as_str()))
                .max_by_key(|(id, _)| id.len())?;
            if placeholder.fragment.contains(PLACEHOLDER_PREFIX) {
                return None;
            }

            out.push_str(&placeholder.pattern);
            rest = &token[id.len()..];
        }

        out.push_str(&regex::escape(rest));
        Some(out)
    }

    /// Compile every route into a [`RoutingTable`]. The first error aborts.
    pub fn build(&self) -> Result<RoutingTable, BuildError> {
        self.compile()
            .inspect_err(|err| warn!(error = %err, "Routing table build failed"))
    }

    fn compile(&self) -> Result<RoutingTable, BuildError> {
        let mut verbs: HashMap<String, VerbRoutes> = HashMap::new();

        for spec in &self.routes {
            let template = self
                .handlers
                .get(&spec.handler)
                .ok_or_else(|| BuildError::HandlerNotRegistered {
                    handler: spec.handler.clone(),
                })?;
            if !template.has_action(&spec.action) {
                return Err(BuildError::ActionUndefined {
                    handler: spec.handler.clone(),
                    action: spec.action.clone(),
                });
            }

            let binding = ActionBinding::new(&spec.handler, &spec.action, Some(template.clone()));
            let routes = verbs.entry(spec.verb.clone()).or_default();

            if spec.is_exact() {
                routes.exact.add(&spec.path, binding)?;
                debug!(
                    verb = %spec.verb,
                    path = %spec.path,
                    target = %spec.target(),
                    "Exact route compiled"
                );
                continue;
            }

            let source = self
                .substitute(&spec.path)
                .ok_or_else(|| BuildError::UnresolvedPlaceholder {
                    path: spec.path.clone(),
                })?;
            let anchored = format!("^{source}$");
            let pattern = Regex::new(&anchored).map_err(|source| BuildError::PatternCompile {
                handler: spec.handler.clone(),
                action: spec.action.clone(),
                pattern: anchored.clone(),
                source,
            })?;

            debug!(
                verb = %spec.verb,
                path = %spec.path,
                pattern = %anchored,
                target = %spec.target(),
                "Pattern route compiled"
            );
            routes.patterns.push(pattern, binding);
        }

        info!(
            routes = self.routes.len(),
            verbs = verbs.len(),
            handlers = self.handlers.len(),
            "Routing table built"
        );

        Ok(RoutingTable::new(verbs, self.handlers.clone(), self.table_list()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::handler::Actions;
    use crate::error::TrieError;

    #[derive(Default)]
    struct Home;

    impl Home {
        fn index(&mut self) -> String {
            "home".into()
        }
    }

    impl Handler for Home {
        fn actions(actions: &mut Actions<Self>) {
            actions.add("Index", Home::index);
        }
    }

    #[derive(Default)]
    struct Items;

    impl Items {
        fn show(&mut self, id: String) -> String {
            id
        }
    }

    impl Handler for Items {
        fn actions(actions: &mut Actions<Self>) {
            actions.add("Show", Items::show);
        }
    }

    fn registry() -> Registry {
        let mut registry = Registry::new();
        registry.register_handler_template(Home);
        registry.register_handler_template(Items);
        registry
    }

    #[test]
    fn test_parse_target() {
        assert_eq!(parse_target("Home.Index").unwrap(), ("Home", "Index"));
        for bad in ["", "Home", "Home.", ".Index", "a.b.c"] {
            assert!(
                matches!(parse_target(bad), Err(RegistrationError::MalformedTarget(_))),
                "{bad}"
            );
        }
    }

    #[test]
    fn test_register_route_rejects_empty_path() {
        let mut registry = Registry::new();
        assert!(matches!(
            registry.register_route("GET", "", "Home.Index"),
            Err(RegistrationError::EmptyPath)
        ));
    }

    #[test]
    fn test_register_placeholder_errors() {
        let mut registry = Registry::new();
        assert!(matches!(
            registry.register_placeholder("", "[0-9]+"),
            Err(RegistrationError::EmptyPlaceholderId)
        ));
        assert!(matches!(
            registry.register_placeholder("id", "[0-9"),
            Err(RegistrationError::InvalidFragment { .. })
        ));
        assert_eq!(registry.placeholder("id"), None);
    }

    #[test]
    fn test_last_registration_wins() {
        let mut registry = registry();
        registry.register_route("GET", "/", "Items.Show").unwrap();
        registry.register_route("GET", "/", "Home.Index").unwrap();

        assert_eq!(registry.routes().len(), 1);
        assert_eq!(registry.route("GET", "/").as_deref(), Some("Home.Index"));
        assert!(registry.build().is_ok());
    }

    #[test]
    fn test_register_placeholders_replaces_set() {
        let mut registry = Registry::new();
        registry.register_placeholder("old", "x").unwrap();
        registry
            .register_placeholders([("id", "[0-9]+"), ("name", "[a-z]+")])
            .unwrap();

        assert_eq!(registry.placeholder("old"), None);
        assert_eq!(registry.placeholder("id"), Some("[0-9]+"));
    }

    #[test]
    fn test_substitute_longest_id_and_escape() {
        let mut registry = Registry::new();
        registry.register_placeholder("id", "[0-9]+").unwrap();
        registry.register_placeholder("idx", "[a-z]").unwrap();

        assert_eq!(registry.substitute("/a.b/:idx").unwrap(), r"/a\.b/([a-z])");
        assert_eq!(registry.substitute("/:id/:idx").unwrap(), "/([0-9]+)/([a-z])");
        assert_eq!(registry.substitute("/:nope"), None);
    }

    #[test]
    fn test_substitute_keeps_explicit_groups() {
        let mut registry = Registry::new();
        registry.register_placeholder("date", r"(\d{4})-(\d{2})").unwrap();
        assert_eq!(registry.substitute("/:date").unwrap(), r"/(?:(\d{4})-(\d{2}))");
    }

    #[test]
    fn test_build_errors() {
        let mut registry = registry();
        registry.register_route("GET", "/x", "Missing.Index").unwrap();
        assert!(matches!(registry.build(), Err(BuildError::HandlerNotRegistered { .. })));

        let mut registry = registry_with("/x", "Home.Missing");
        assert!(matches!(registry.build(), Err(BuildError::ActionUndefined { .. })));

        registry = registry_with("/:bad", "Home.Index");
        assert!(matches!(registry.build(), Err(BuildError::UnresolvedPlaceholder { .. })));
    }

    #[test]
    fn test_fragment_with_colon_is_unresolved() {
        for fragment in ["[[:digit:]]+", "(?:a|b)"] {
            let mut registry = registry_with("/items/:id", "Items.Show");
            registry.register_placeholder("id", fragment).unwrap();

            assert_eq!(registry.substitute("/items/:id"), None, "{fragment}");
            let err = registry.build().unwrap_err();
            assert_eq!(
                err.to_string(),
                "placeholder in '/items/:id' path is not registered",
                "{fragment}"
            );
        }
    }

    fn registry_with(path: &str, target: &str) -> Registry {
        let mut registry = registry();
        registry.register_route("GET", path, target).unwrap();
        registry
    }

    #[test]
    fn test_build_pattern_compile_error() {
        // a named group compiles alone but not twice in one pattern
        let mut registry = registry_with("/:n/:n", "Items.Show");
        registry.register_placeholder("n", "(?P<n>[a-z]+)").unwrap();
        assert!(matches!(registry.build(), Err(BuildError::PatternCompile { .. })));
    }

    #[test]
    fn test_table_list_order() {
        let mut registry = registry();
        registry.register_placeholder("b", "y").unwrap();
        registry.register_placeholder("a", "x").unwrap();
        registry.register_route("POST", "/z", "Home.Index").unwrap();
        registry.register_route("GET", "/a", "Home.Index").unwrap();

        let list = registry.table_list();
        assert_eq!(list.placeholders.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(list.routes[0].path, "/z");
        assert_eq!(list.routes[1].target, "Home.Index");
    }

    #[test]
    fn test_trie_duplicate_is_build_error() {
        let err = BuildError::from(TrieError::AlreadyExists("/".into()));
        assert_eq!(err.to_string(), "'/' already exists");
    }
}
