//! Error types for routing and dispatch.

use thiserror::Error;

/// Router-specific errors.
///
/// The first three variants happen per request; everything else is raised
/// while the route table, registry or dispatcher is being built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouterError {
    /// No route matched the request.
    #[error("Route not found: {method} {path}")]
    RouteNotFound { method: String, path: String },

    /// No action is registered under the controller.
    #[error("Controller '{0}' not found.")]
    ControllerNotFound(String),

    /// The controller is known but has no such action.
    #[error("Method '{action}' not found in controller '{controller}'.")]
    ActionNotFound { controller: String, action: String },

    /// Invalid path pattern.
    #[error("invalid path pattern: {0}")]
    InvalidPattern(String),

    /// A parameter name appears more than once in one pattern.
    #[error("duplicate parameter '{name}' in pattern {pattern}")]
    DuplicateParam { pattern: String, name: String },

    /// Malformed `Controller@action[::auth]` target.
    #[error("invalid route target: {0}")]
    InvalidTarget(String),

    /// The same handler identifier was registered twice.
    #[error("handler '{0}' registered twice")]
    DuplicateHandler(String),

    /// A route references a handler that was never registered.
    #[error("route {pattern} references unregistered handler '{handler}'")]
    UnregisteredHandler { handler: String, pattern: String },

    /// Handler parameters do not line up with the route pattern.
    #[error("handler '{handler}' expects parameters {expected:?} but route {pattern} provides {found:?}")]
    ParamMismatch {
        handler: String,
        pattern: String,
        expected: Vec<String>,
        found: Vec<String>,
    },
}

impl RouterError {
    /// Returns true for the per-request "no route" failure.
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::RouteNotFound { .. })
    }
}

/// Result type alias for router operations.
pub type Result<T> = std::result::Result<T, RouterError>;
