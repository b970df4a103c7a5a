//! Invariant violations raised while checking.
//!
//! These are distinct from diagnostics: a diagnostic is recorded and
//! checking continues, while a `CheckerError` aborts the whole run. They
//! signal input the checker is not designed to recover from, such as a
//! header binding an optional type or a generic location that does not
//! point into its function.

use jsig_binder::ScopeError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckerError {
    #[error(transparent)]
    Scope(#[from] ScopeError),

    #[error("cannot bind `{0}` to an optional type")]
    OptionalAssignment(String),

    #[error("malformed generic location for `{name}`: {reason}")]
    MalformedGenericLocation { name: String, reason: String },

    #[error("source file not found: {0}")]
    SourceNotFound(String),

    #[error("module nesting exceeds {0} levels")]
    ModuleDepthExceeded(usize),

    #[error("unsupported object property kind `{0}`")]
    UnsupportedPropertyKind(String),

    #[error("invalid {kind} JSON for {path}: {message}")]
    InvalidJson {
        kind: &'static str,
        path: String,
        message: String,
    },
}

pub type CheckResult<T> = Result<T, CheckerError>;
