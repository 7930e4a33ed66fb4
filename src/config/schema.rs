//! Route manifest schema.
//!
//! A manifest declares placeholders and routes; handler templates are Rust
//! types and are registered in code.
//!
//! ```toml
//! [placeholders]
//! id = "[0-9]+"
//!
//! [[routes]]
//! verb = "GET"
//! path = "/items/:id"
//! target = "Items.Show"
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::RegistrationError;
use crate::routing::Registry;

/// Root of a route manifest.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RouteManifest {
    /// Placeholder id → regex fragment.
    pub placeholders: BTreeMap<String, String>,

    /// Routes, in declaration order.
    pub routes: Vec<RouteConfig>,
}

/// One route declaration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RouteConfig {
    #[serde(default = "default_verb")]
    pub verb: String,

    pub path: String,

    /// `Handler.Action`.
    pub target: String,
}

fn default_verb() -> String {
    "GET".to_string()
}

impl RouteManifest {
    /// Feed placeholders, then routes, into `registry`.
    pub fn apply(&self, registry: &mut Registry) -> Result<(), RegistrationError> {
        for (id, fragment) in &self.placeholders {
            registry.register_placeholder(id, fragment)?;
        }
        for route in &self.routes {
            registry.register_route(&route.verb, &route.path, &route.target)?;
        }
        Ok(())
    }
}
