//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! registry.rs  → debug! per compiled route, info! per built table, warn! on failure
//! router.rs    → trace! per lookup hit or miss
//! capability   → warn! on failed shared-state injection
//!     → logging.rs (subscriber installed by the embedding binary)
//! ```
//!
//! # Design Decisions
//! - The library only emits events; it never installs a subscriber itself
//! - Events carry structured fields (verb, path, target) for filtering

pub mod logging;
