//! Request-time route lookup.
//!
//! # Responsibilities
//! - Resolve `(verb, path)` to an [`ActionBinding`] and captured arguments
//! - Report which verbs answer a path
//! - Expose the handler templates the table was built with
//!
//! # Design Decisions
//! - Exact (trie) matches are tried first and always win
//! - Patterns are scanned in registration order; first full match wins
//! - The table is never mutated after build; lookups take `&self` only

use std::collections::HashMap;

use tracing::trace;

use crate::action::binding::ActionBinding;
use crate::action::handler::HandlerTemplate;
use crate::action::value::Value;
use crate::capability::CapabilityResolver;
use crate::error::{InvocationError, LookupError};
use crate::routing::pattern::PatternSet;
use crate::routing::registry::TableList;
use crate::routing::trie::StaticTrie;

/// Compiled routes of one verb.
#[derive(Debug, Default)]
pub(crate) struct VerbRoutes {
    pub(crate) exact: StaticTrie<ActionBinding>,
    pub(crate) patterns: PatternSet<ActionBinding>,
}

/// A successful lookup.
#[derive(Debug)]
pub struct Matched<'a> {
    pub binding: &'a ActionBinding,
    /// Captured path segments, left to right. Empty for exact routes.
    pub args: Vec<String>,
}

impl Matched<'_> {
    /// Captured segments as call arguments.
    pub fn arguments(&self) -> Vec<Value> {
        self.args.iter().cloned().map(Value::new).collect()
    }

    /// Run the bound action on a fresh instance with the captured arguments.
    pub fn invoke(&self) -> Result<Vec<Value>, InvocationError> {
        self.binding.invoke(self.arguments())
    }
}

/// Immutable per-verb routing table produced by
/// [`Registry::build`](crate::routing::Registry::build).
#[derive(Debug)]
pub struct RoutingTable {
    verbs: HashMap<String, VerbRoutes>,
    handlers: HashMap<String, HandlerTemplate>,
    listing: TableList,
}

impl RoutingTable {
    pub(crate) fn new(
        verbs: HashMap<String, VerbRoutes>,
        handlers: HashMap<String, HandlerTemplate>,
        listing: TableList,
    ) -> Self {
        Self {
            verbs,
            handlers,
            listing,
        }
    }

    /// Find the route answering `verb` and `path`.
    pub fn lookup(&self, verb: &str, path: &str) -> Result<Matched<'_>, LookupError> {
        let not_found = || LookupError::NotFound {
            verb: verb.to_string(),
            path: path.to_string(),
        };
        let routes = self.verbs.get(verb).ok_or_else(|| {
            trace!(verb, path, "Unknown verb");
            not_found()
        })?;

        if let Some(binding) = routes.exact.get(path) {
            trace!(verb, path, "Exact route matched");
            return Ok(Matched {
                binding,
                args: Vec::new(),
            });
        }

        match routes.patterns.find(path) {
            Some(found) => {
                trace!(verb, path, captures = found.captures.len(), "Pattern route matched");
                Ok(Matched {
                    binding: found.value,
                    args: found.captures,
                })
            }
            None => {
                trace!(verb, path, "No route matched");
                Err(not_found())
            }
        }
    }

    /// Verbs with a route answering `path`, sorted.
    pub fn allowed(&self, path: &str) -> Vec<&str> {
        let mut verbs: Vec<&str> = self
            .verbs
            .iter()
            .filter(|(_, routes)| {
                routes.exact.get(path).is_some() || routes.patterns.find(path).is_some()
            })
            .map(|(verb, _)| verb.as_str())
            .collect();
        verbs.sort_unstable();
        verbs
    }

    /// Verbs with at least one route, sorted.
    pub fn verbs(&self) -> Vec<&str> {
        let mut verbs: Vec<&str> = self.verbs.keys().map(String::as_str).collect();
        verbs.sort_unstable();
        verbs
    }

    /// Number of compiled routes across all verbs.
    pub fn len(&self) -> usize {
        self.verbs
            .values()
            .map(|routes| routes.exact.len() + routes.patterns.len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn handler(&self, name: &str) -> Option<&HandlerTemplate> {
        self.handlers.get(name)
    }

    pub fn capabilities(&self) -> CapabilityResolver<'_> {
        CapabilityResolver::new(&self.handlers)
    }

    /// Everything this table was built from.
    pub fn table_list(&self) -> &TableList {
        &self.listing
    }
}
