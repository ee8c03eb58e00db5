//! Per-request application state.

use std::sync::Arc;

use portico_auth::{Session, UserStore};
use portico_router::Authenticator;

/// Name of the cookie carrying the session key.
pub const SESSION_COOKIE: &str = "portico_session";

/// State handed to the dispatcher for one request.
#[derive(Debug, Clone)]
pub struct AppState {
    session: Session,
    users: Arc<UserStore>,
    changed: bool,
}

impl AppState {
    /// Wraps a loaded session.
    pub const fn new(session: Session, users: Arc<UserStore>) -> Self {
        Self {
            session,
            users,
            changed: false,
        }
    }

    /// The current session.
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Known users.
    pub fn users(&self) -> &UserStore {
        &self.users
    }

    /// Signs a user in. The session must be saved afterwards.
    pub fn login(&mut self, username: &str) {
        self.session.login(username);
        self.changed = true;
    }

    /// Returns true if the session was modified by a handler.
    pub const fn is_changed(&self) -> bool {
        self.changed
    }

    /// Consumes the state, returning the session.
    pub fn into_session(self) -> Session {
        self.session
    }
}

impl Authenticator for AppState {
    fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }
}

/// `Set-Cookie` value for a session.
pub fn session_cookie(session: &Session) -> String {
    format!(
        "{SESSION_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax",
        session.session_key
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_marks_changed() {
        let mut state = AppState::new(Session::new(), Arc::new(UserStore::new()));
        assert!(!state.is_authenticated());
        assert!(!state.is_changed());

        state.login("user1");
        assert!(state.is_authenticated());
        assert!(state.is_changed());
        assert_eq!(state.session().username.as_deref(), Some("user1"));
    }

    #[test]
    fn test_session_cookie() {
        let session = Session::new();
        let cookie = session_cookie(&session);
        assert!(cookie.starts_with(&format!("portico_session={}", session.session_key)));
        assert!(cookie.contains("HttpOnly"));
    }
}
