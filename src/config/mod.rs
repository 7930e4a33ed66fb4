//! Route manifest subsystem.
//!
//! # Data Flow
//! ```text
//! manifest file (TOML)
//!     → loader.rs (read & deserialize)
//!     → validation.rs (semantic checks, all errors at once)
//!     → RouteManifest (validated)
//!     → RouteManifest::apply(&mut Registry)
//!     → Registry::build()
//! ```
//!
//! # Design Decisions
//! - Manifests carry placeholders and routes only; handler types are code
//! - Placeholders are applied before routes
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_manifest, parse_manifest, ConfigError};
pub use schema::{RouteConfig, RouteManifest};
pub use validation::{validate_manifest, ValidationError};
