//! Error taxonomy for every phase of dispatch.
//!
//! # Phases
//! ```text
//! Registry::register_*  → RegistrationError
//! Registry::build       → BuildError (wraps TrieError)
//! RoutingTable::lookup  → LookupError
//! ActionBinding::*      → InvocationError
//! CapabilityResolver    → CapabilityError
//! ```
//!
//! # Design Decisions
//! - Registration and build errors are fail-fast; no partial table escapes
//! - Lookup misses are ordinary values, cheap to construct
//! - Invocation errors always carry both "have" and "want" type lists

use thiserror::Error;

/// Renders a type list as `(A, B, C)`.
pub(crate) fn type_list(types: &[String]) -> String {
    format!("({})", types.join(", "))
}

fn type_at<'a>(types: &'a [String], position: &usize) -> &'a str {
    types.get(*position).map(String::as_str).unwrap_or("?")
}

/// Errors raised while declaring routes, placeholders and handler templates.
#[derive(Debug, Error)]
pub enum RegistrationError {
    /// Target is empty or not of the form `Handler.Action`.
    #[error("'{0}' - invalid handler.action name")]
    MalformedTarget(String),

    /// Route path is the empty string.
    #[error("path is empty")]
    EmptyPath,

    /// Placeholder id is the empty string.
    #[error("placeholder id is empty")]
    EmptyPlaceholderId,

    /// Placeholder fragment is not a valid regular expression.
    #[error("'{id}' - invalid placeholder fragment '{fragment}'")]
    InvalidFragment {
        id: String,
        fragment: String,
        #[source]
        source: regex::Error,
    },
}

/// Structural errors of the static prefix tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrieError {
    #[error("path is empty")]
    EmptyPath,

    #[error("'{0}' already exists")]
    AlreadyExists(String),
}

/// Errors raised while compiling registered routes into a routing table.
#[derive(Debug, Error)]
pub enum BuildError {
    /// A route names a handler type with no registered template.
    #[error("'{handler}' - handler not registered")]
    HandlerNotRegistered { handler: String },

    /// The handler type has no action of that name.
    #[error("'{handler}.{action}' - action undefined")]
    ActionUndefined { handler: String, action: String },

    /// A placeholder in the path has no registered fragment.
    #[error("placeholder in '{path}' path is not registered")]
    UnresolvedPlaceholder { path: String },

    /// The fully substituted path did not compile.
    #[error("'{handler}.{action}' - pattern '{pattern}' does not compile")]
    PatternCompile {
        handler: String,
        action: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The exact index rejected the path.
    #[error(transparent)]
    Duplicate(#[from] TrieError),
}

/// A request that no route answers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("'[{verb}]: {path}' - not found")]
    NotFound { verb: String, path: String },
}

/// Errors raised while resolving, validating or calling an action.
#[derive(Debug, Error)]
pub enum InvocationError {
    /// The binding has no handler template, or the instance belongs to another type.
    #[error("'{handler}.{action}' - handler is invalid")]
    HandlerInvalid { handler: String, action: String },

    /// The handler type has no action of that name.
    #[error("'{handler}.{action}' - action undefined")]
    ActionUndefined { handler: String, action: String },

    /// Argument count differs from the declared parameter count.
    #[error(
        "wrong number of arguments in call to '{handler}.{action}': have {}, want {}",
        type_list(.have),
        type_list(.want)
    )]
    ArityMismatch {
        handler: String,
        action: String,
        have: Vec<String>,
        want: Vec<String>,
    },

    /// An argument is neither the declared type, a capability it satisfies,
    /// nor convertible from a value of the same kind.
    #[error(
        "cannot use argument {position} as type {} in call to '{handler}.{action}': \
         have {}, want {}",
        type_at(.want, .position),
        type_list(.have),
        type_list(.want)
    )]
    ArgumentTypeMismatch {
        handler: String,
        action: String,
        position: usize,
        have: Vec<String>,
        want: Vec<String>,
    },

    /// Return count differs from the expected return list.
    #[error(
        "wrong number of return values from '{handler}.{action}': have {}, want {}",
        type_list(.have),
        type_list(.want)
    )]
    ReturnArityMismatch {
        handler: String,
        action: String,
        have: Vec<String>,
        want: Vec<String>,
    },

    /// A return type name differs from the expected name.
    #[error(
        "cannot use return value {position} as type {} from '{handler}.{action}': have {}, want {}",
        type_at(.want, .position),
        type_list(.have),
        type_list(.want)
    )]
    ReturnTypeMismatch {
        handler: String,
        action: String,
        position: usize,
        have: Vec<String>,
        want: Vec<String>,
    },
}

/// Errors raised while injecting shared state into a handler instance.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CapabilityError {
    #[error("have not embedded \"{shared}\" in \"{target}\"")]
    NoEmbeddedField { target: String, shared: String },
}
