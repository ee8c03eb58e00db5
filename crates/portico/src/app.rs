//! The assembled front controller.

use std::sync::Arc;

use portico_auth::{Session, UserStore};
use portico_router::{Dispatcher, Outcome, Request, Response};
use sqlx::SqlitePool;
use tracing::info;

use crate::config::{AppConfig, ConfigError};
use crate::controllers::{self, escape_html};
use crate::state::{session_cookie, AppState, SESSION_COOKIE};

/// Route table, controllers and users wired into one dispatcher.
///
/// Built once at start-up; every request borrows it immutably.
pub struct App {
    dispatcher: Dispatcher<AppState>,
    users: Arc<UserStore>,
    debug_trace: bool,
}

impl App {
    /// Builds and validates the application from a declaration.
    pub fn build(config: &AppConfig) -> Result<Self, ConfigError> {
        let table = config.route_table()?;
        let users = Arc::new(config.user_store()?);

        let mut dispatcher = Dispatcher::new(table, controllers::registry()?)?;
        if let Some(login) = &config.login {
            dispatcher = dispatcher.with_login(login)?;
        }

        info!(
            routes = dispatcher.router().table().len(),
            users = users.len(),
            "front controller ready"
        );

        Ok(Self {
            dispatcher,
            users,
            debug_trace: false,
        })
    }

    /// Appends the request diagnostics trailer to every response except the
    /// login prompt.
    #[must_use]
    pub fn with_debug_trace(mut self, enabled: bool) -> Self {
        self.debug_trace = enabled;
        self
    }

    /// The dispatcher.
    pub const fn dispatcher(&self) -> &Dispatcher<AppState> {
        &self.dispatcher
    }

    /// Handles one request with an already loaded session.
    ///
    /// Returns the session as well when a handler changed it.
    pub fn respond(&self, request: &Request, session: Session) -> (Response, Option<Session>) {
        let mut state = AppState::new(session, Arc::clone(&self.users));
        let outcome = self.dispatcher.dispatch(request, &mut state);
        let login_required = matches!(outcome, Ok(Outcome::LoginRequired));
        let mut response = self.dispatcher.render(outcome, request, &mut state);

        if self.debug_trace && !login_required {
            response.push_str(&self.debug_trailer(request));
        }

        let changed = state.is_changed();
        (response, changed.then(|| state.into_session()))
    }

    /// Handles one request, loading and saving its session.
    pub async fn serve(&self, pool: &SqlitePool, request: &Request) -> portico_auth::Result<Response> {
        let session = Session::load_or_new(pool, request.cookie(SESSION_COOKIE)).await?;
        let (response, changed) = self.respond(request, session);

        let Some(session) = changed else {
            return Ok(response);
        };
        session.save(pool).await?;
        Ok(response.header("Set-Cookie", session_cookie(&session)))
    }

    /// Current path, matched route, their segments and the method.
    pub fn debug_trailer(&self, request: &Request) -> String {
        let matched = self
            .dispatcher
            .router()
            .resolve(&request.method, &request.uri)
            .ok()
            .map(|res| res.entry().pattern.pattern().to_string());
        let route_parts: Vec<&str> = matched
            .as_deref()
            .map(|route| route.split('/').collect())
            .unwrap_or_default();

        format!(
            "<br><b>Current URL:</b>{}\
             <br><b>Matched Route:</b>{}\
             <br><b>URL Parts:</b>{}\
             <br><b>Route Parts:</b>{}\
             <br><b>HTTP Method:</b>{}",
            escape_html(&request.path),
            escape_html(matched.as_deref().unwrap_or_default()),
            escape_html(&format!("{:?}", request.path_parts())),
            escape_html(&format!("{route_parts:?}")),
            escape_html(&request.method),
        )
    }
}
