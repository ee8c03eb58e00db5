//! # portico-auth
//!
//! The authentication side of a portico front controller.
//!
//! This crate provides:
//! - Argon2id password hashing ([`hash_password`], [`verify_password`])
//! - [`UserStore`], an in-memory credential table built at start-up
//! - [`Session`], per-request sign-in state persisted in SQLite
//!
//! ## Quick Start
//!
//! ```rust
//! use portico_auth::{Session, UserStore};
//!
//! let mut users = UserStore::new();
//! users.add("user1", "password1").expect("valid user");
//!
//! let mut session = Session::new();
//! assert!(!session.is_authenticated());
//!
//! let username = users.authenticate("user1", "password1").expect("valid login");
//! session.login(username);
//! assert!(session.is_authenticated());
//! ```
//!
//! Sessions are saved with `Session::save(pool).await` and reloaded from the
//! request cookie with `Session::load_or_new(pool, key).await`.

mod error;
mod password;
mod session;
mod user;

pub use error::{AuthError, Result};
pub use password::{hash_password, validate_password, verify_password, MIN_PASSWORD_LEN};
pub use session::{create_session_table, Session, CREATE_SESSION_TABLE_SQL};
pub use user::UserStore;

use sqlx::SqlitePool;

/// Creates all authentication tables.
///
/// Call this during application setup.
pub async fn create_tables(pool: &SqlitePool) -> Result<()> {
    create_session_table(pool).await
}
