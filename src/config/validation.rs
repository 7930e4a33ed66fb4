//! Manifest validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check every target, path and placeholder fragment
//! - Check routes only reference declared placeholders
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Pure function: RouteManifest → Result<(), Vec<ValidationError>>
//! - Reuses the registry's own rules through a scratch registry, so a
//!   manifest that validates also applies

use thiserror::Error;

use crate::config::schema::RouteManifest;
use crate::error::RegistrationError;
use crate::routing::registry::parse_target;
use crate::routing::Registry;

/// A problem in a route manifest.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("routes[{index}]: '{target}' - invalid handler.action name")]
    MalformedTarget { index: usize, target: String },

    #[error("routes[{index}]: path is empty")]
    EmptyPath { index: usize },

    #[error("placeholders: id is empty")]
    EmptyPlaceholderId,

    #[error("placeholders.{id}: {reason}")]
    InvalidFragment { id: String, reason: String },

    #[error("routes[{index}]: placeholder in '{path}' path is not registered")]
    UnresolvedPlaceholder { index: usize, path: String },
}

/// Validate `manifest`, collecting every problem.
pub fn validate_manifest(manifest: &RouteManifest) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut scratch = Registry::new();

    for (id, fragment) in &manifest.placeholders {
        match scratch.register_placeholder(id, fragment) {
            Ok(()) => {}
            Err(RegistrationError::EmptyPlaceholderId) => {
                errors.push(ValidationError::EmptyPlaceholderId)
            }
            Err(err) => errors.push(ValidationError::InvalidFragment {
                id: id.clone(),
                reason: err.to_string(),
            }),
        }
    }

    for (index, route) in manifest.routes.iter().enumerate() {
        if parse_target(&route.target).is_err() {
            errors.push(ValidationError::MalformedTarget {
                index,
                target: route.target.clone(),
            });
        }
        if route.path.is_empty() {
            errors.push(ValidationError::EmptyPath { index });
            continue;
        }
        if scratch.substitute(&route.path).is_none() {
            errors.push(ValidationError::UnresolvedPlaceholder {
                index,
                path: route.path.clone(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
