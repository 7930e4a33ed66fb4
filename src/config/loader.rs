//! Manifest loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::RouteManifest;
use crate::config::validation::{validate_manifest, ValidationError};

/// Error type for manifest loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Validation(_) => None,
        }
    }
}

/// Parse and validate a manifest from TOML text.
pub fn parse_manifest(content: &str) -> Result<RouteManifest, ConfigError> {
    let manifest: RouteManifest = toml::from_str(content).map_err(ConfigError::Parse)?;
    validate_manifest(&manifest).map_err(ConfigError::Validation)?;
    Ok(manifest)
}

/// Load and validate a manifest from a TOML file.
pub fn load_manifest(path: &Path) -> Result<RouteManifest, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let manifest = parse_manifest(&content)?;
    tracing::debug!(
        path = %path.display(),
        placeholders = manifest.placeholders.len(),
        routes = manifest.routes.len(),
        "Route manifest loaded"
    );
    Ok(manifest)
}
