//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Compilation (at startup):
//!     register_route / register_placeholder / register_handler_template
//!     → registry.rs (declarations, last write wins per verb + path)
//!     → build(): exact paths → trie.rs, placeholder paths → pattern.rs
//!     → Freeze as immutable RoutingTable
//!
//! Incoming Request (verb, path)
//!     → router.rs (per-verb lookup)
//!     → trie.rs exact match, else pattern.rs in registration order
//!     → Return: ActionBinding + captured arguments, or NotFound
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - Exact paths never touch a regex
//! - Deterministic: same input always matches same route
//! - Exact match beats any pattern; among patterns, first registered wins

pub mod pattern;
pub mod registry;
pub mod router;
pub mod shared;
pub mod trie;

pub use pattern::PatternSet;
pub use registry::{Registry, RouteSpec, TableEntry, TableList};
pub use router::{Matched, RoutingTable};
pub use shared::SharedTable;
pub use trie::StaticTrie;
