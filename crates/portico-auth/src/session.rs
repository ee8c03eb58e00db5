//! Per-request session state backed by SQLite.

use chrono::{DateTime, Duration, Utc};
use sqlx::{FromRow, Row, SqlitePool};

use crate::error::{AuthError, Result};

/// A session tracking who is signed in.
///
/// Loaded at the start of a request, handed to the dispatcher as explicit
/// state, then saved if it changed.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Session {
    /// Unique session key (64 character hex string).
    pub session_key: String,
    /// Signed-in username, if any.
    pub username: Option<String>,
    /// Session expiration timestamp.
    pub expire_date: DateTime<Utc>,
}

impl Session {
    /// Default session expiration time (2 weeks).
    pub const DEFAULT_EXPIRY_DAYS: i64 = 14;

    /// Creates a new anonymous session.
    pub fn new() -> Self {
        Self {
            session_key: generate_session_key(),
            username: None,
            expire_date: Utc::now() + Duration::days(Self::DEFAULT_EXPIRY_DAYS),
        }
    }

    /// Creates a new session for a user.
    pub fn for_user(username: &str) -> Self {
        let mut session = Self::new();
        session.username = Some(username.to_string());
        session
    }

    /// Signs a user into this session under a fresh key.
    pub fn login(&mut self, username: &str) {
        self.session_key = generate_session_key();
        self.username = Some(username.to_string());
        self.extend(Self::DEFAULT_EXPIRY_DAYS);
    }

    /// Signs the user out.
    pub fn logout(&mut self) {
        self.username = None;
    }

    /// Returns whether this session has expired.
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expire_date
    }

    /// Returns true if a user is signed in and the session is live.
    pub fn is_authenticated(&self) -> bool {
        self.username.is_some() && !self.is_expired()
    }

    /// Extends the session expiration.
    pub fn extend(&mut self, days: i64) {
        self.expire_date = Utc::now() + Duration::days(days);
    }

    /// Saves the session to the database.
    pub async fn save(&self, pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r"
            INSERT INTO portico_session (session_key, username, expire_date)
            VALUES (?, ?, ?)
            ON CONFLICT(session_key) DO UPDATE SET
                username = excluded.username,
                expire_date = excluded.expire_date
            ",
        )
        .bind(&self.session_key)
        .bind(&self.username)
        .bind(self.expire_date)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Finds a live session by its key.
    pub async fn get_by_key(pool: &SqlitePool, session_key: &str) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "SELECT session_key, username, expire_date FROM portico_session
             WHERE session_key = ? AND expire_date > ?",
        )
        .bind(session_key)
        .bind(Utc::now())
        .fetch_optional(pool)
        .await?
        .ok_or(AuthError::SessionNotFound)
    }

    /// Loads the session for a cookie value, or starts an anonymous one.
    pub async fn load_or_new(pool: &SqlitePool, session_key: Option<&str>) -> Result<Self> {
        let Some(key) = session_key else {
            return Ok(Self::new());
        };
        match Self::get_by_key(pool, key).await {
            Ok(session) => Ok(session),
            Err(AuthError::SessionNotFound) => Ok(Self::new()),
            Err(err) => Err(err),
        }
    }

    /// Deletes all expired sessions.
    pub async fn clear_expired(pool: &SqlitePool) -> Result<u64> {
        let result = sqlx::query("DELETE FROM portico_session WHERE expire_date < ?")
            .bind(Utc::now())
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Returns the count of live sessions.
    pub async fn count(pool: &SqlitePool) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) FROM portico_session WHERE expire_date > ?")
            .bind(Utc::now())
            .fetch_one(pool)
            .await?;
        Ok(row.get(0))
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Generates a cryptographically secure session key.
fn generate_session_key() -> String {
    use rand::RngExt;
    let mut rng = rand::rng();
    let mut bytes = [0u8; 32];
    rng.fill(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// SQL to create the `portico_session` table.
pub const CREATE_SESSION_TABLE_SQL: &str = r"
CREATE TABLE IF NOT EXISTS portico_session (
    session_key VARCHAR(64) PRIMARY KEY,
    username TEXT,
    expire_date TIMESTAMP NOT NULL
)
";

/// Creates the `portico_session` table if it doesn't exist.
pub async fn create_session_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(CREATE_SESSION_TABLE_SQL).execute(pool).await?;
    Ok(())
}
