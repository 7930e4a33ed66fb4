//! Method + path dispatch engine.
//!
//! # Architecture Overview
//!
//! ```text
//!   setup                                   request time
//!   ─────                                   ────────────
//!   config (TOML manifest)                  (verb, path)
//!        │                                       │
//!        ▼                                       ▼
//!   routing::Registry ──build()──▶ routing::RoutingTable::lookup
//!        ▲                          (StaticTrie, then PatternSet)
//!        │                                       │
//!   action::Handler types                        ▼
//!   (action tables)              action::ActionBinding + captured args
//!                                                │
//!                       capability::CapabilityResolver::inject_shared
//!                                                │
//!                                                ▼
//!                               validate (arity, coercion) → call
//! ```
//!
//! ```
//! use route_dispatch::{Actions, Handler, Registry};
//!
//! #[derive(Default)]
//! struct Items;
//!
//! impl Items {
//!     fn show(&mut self, id: String) -> String {
//!         format!("item {id}")
//!     }
//! }
//!
//! impl Handler for Items {
//!     fn actions(actions: &mut Actions<Self>) {
//!         actions.add("Show", Items::show);
//!     }
//! }
//!
//! let mut registry = Registry::new();
//! registry.register_handler_template(Items);
//! registry.register_placeholder("id", "[0-9]+").unwrap();
//! registry.register_route("GET", "/items/:id", "Items.Show").unwrap();
//! let table = registry.build().unwrap();
//!
//! let found = table.lookup("GET", "/items/42").unwrap();
//! assert_eq!(found.args, vec!["42"]);
//! let out = found.invoke().unwrap();
//! assert_eq!(out[0].downcast_ref::<String>().unwrap(), "item 42");
//! ```

pub mod action;
pub mod capability;
pub mod config;
pub mod error;
pub mod observability;
pub mod routing;

pub use action::{
    call_by_name, ActionBinding, Actions, Handler, HandlerTemplate, Instance, Kind, Prepared,
    Reflect, Repr, Signature, TypeDescriptor, Value,
};
pub use capability::{Capabilities, CapabilityResolver};
pub use error::{
    BuildError, CapabilityError, InvocationError, LookupError, RegistrationError, TrieError,
};
pub use routing::{Matched, Registry, RoutingTable, SharedTable, TableList};
