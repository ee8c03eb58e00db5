//! Credential store for known users.

use std::collections::HashMap;

use tracing::debug;

use crate::error::{AuthError, Result};
use crate::password::{hash_password, validate_password, verify_password};

/// Usernames mapped to Argon2 password hashes.
///
/// Built once at start-up and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct UserStore {
    users: HashMap<String, String>,
}

impl UserStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a user, hashing the plaintext password.
    pub fn add(&mut self, username: &str, password: &str) -> Result<()> {
        validate_password(password)?;
        let hash = hash_password(password)?;
        self.add_hashed(username, hash)
    }

    /// Adds a user with an already hashed password.
    pub fn add_hashed(&mut self, username: &str, password_hash: impl Into<String>) -> Result<()> {
        if username.trim().is_empty() {
            return Err(AuthError::Validation("username must not be empty".to_string()));
        }
        if self.users.contains_key(username) {
            return Err(AuthError::Validation(format!(
                "user '{username}' already exists"
            )));
        }
        self.users.insert(username.to_string(), password_hash.into());
        Ok(())
    }

    /// Checks a username and password pair.
    ///
    /// Returns the stored username on success.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<&str> {
        match self.users.get_key_value(username) {
            Some((name, hash)) if verify_password(password, hash) => Ok(name.as_str()),
            _ => {
                debug!(username, "credential check failed");
                Err(AuthError::InvalidCredentials)
            }
        }
    }

    /// Returns true if the user exists.
    pub fn contains(&self, username: &str) -> bool {
        self.users.contains_key(username)
    }

    /// Number of users.
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Returns true if there are no users.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
