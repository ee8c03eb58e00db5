//! Route and user declarations.
//!
//! The declaration is a JSON document. Routes are grouped by method and kept
//! in array order, which is the order the router tries them in.

use std::collections::BTreeMap;
use std::path::Path;

use portico_auth::{AuthError, UserStore};
use portico_router::{Method, RouteTable, RouterError};
use serde::Deserialize;
use thiserror::Error;

/// The declaration compiled into the binary.
pub const DEFAULT_CONFIG: &str = include_str!("../routes.json");

/// Errors raised while loading a declaration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The declaration file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    /// The declaration is not valid JSON for this shape.
    #[error("invalid declaration: {0}")]
    Json(#[from] serde_json::Error),

    /// A method key is not an HTTP method.
    #[error("unknown HTTP method '{0}'")]
    UnknownMethod(String),

    /// A user entry carries neither a password nor a hash.
    #[error("user '{0}' needs a password or password_hash")]
    MissingPassword(String),

    /// A route pattern or target is malformed.
    #[error(transparent)]
    Route(#[from] RouterError),

    /// A user entry was rejected.
    #[error("user rejected: {0}")]
    User(#[from] AuthError),
}

/// One route line.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RouteDecl {
    /// Path pattern, e.g. `/blog/cat/:category`.
    pub path: String,
    /// `Controller@action`, optionally suffixed with `::auth`.
    pub target: String,
}

/// One user line.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserDecl {
    pub username: String,
    /// Plaintext password, hashed at start-up.
    #[serde(default)]
    pub password: Option<String>,
    /// Pre-computed Argon2 PHC hash.
    #[serde(default)]
    pub password_hash: Option<String>,
}

/// The whole declaration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AppConfig {
    /// Routes keyed by method token.
    pub routes: BTreeMap<String, Vec<RouteDecl>>,
    /// Known users.
    #[serde(default)]
    pub users: Vec<UserDecl>,
    /// Action rendered when an auth-gated route is hit anonymously.
    #[serde(default)]
    pub login: Option<String>,
}

impl AppConfig {
    /// Parses a JSON declaration.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a declaration from disk, or the built-in one when `path` is `None`.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Self::from_json(DEFAULT_CONFIG);
        };
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Compiles the route declarations.
    pub fn route_table(&self) -> Result<RouteTable, ConfigError> {
        let mut builder = RouteTable::builder();
        for (method, routes) in &self.routes {
            let parsed =
                Method::parse(method).ok_or_else(|| ConfigError::UnknownMethod(method.clone()))?;
            for route in routes {
                builder = builder.route(parsed, &route.path, &route.target);
            }
        }
        Ok(builder.build()?)
    }

    /// Hashes and collects the declared users.
    pub fn user_store(&self) -> Result<UserStore, ConfigError> {
        let mut store = UserStore::new();
        for user in &self.users {
            match (&user.password_hash, &user.password) {
                (Some(hash), _) => store.add_hashed(&user.username, hash.as_str())?,
                (None, Some(password)) => store.add(&user.username, password)?,
                (None, None) => return Err(ConfigError::MissingPassword(user.username.clone())),
            }
        }
        Ok(store)
    }
}
