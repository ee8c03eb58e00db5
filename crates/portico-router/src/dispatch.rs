//! Auth-gated dispatch to registered handlers.
//!
//! The dispatcher takes a request through a fixed sequence: resolve the
//! route, check authentication if the route demands it, look up the handler,
//! invoke it exactly once. Route tables and registries are validated against
//! each other when the dispatcher is built, so a mistyped handler name or a
//! handler that expects different parameters than its route provides is a
//! start-up error rather than a per-request one.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::{Result, RouterError};
use crate::request::{PathParams, Request};
use crate::response::Response;
use crate::router::{Resolution, Router};
use crate::table::{HandlerId, RouteTable};

/// Answers whether the caller of the current request is authenticated.
pub trait Authenticator {
    /// Returns true if the caller is authenticated.
    fn is_authenticated(&self) -> bool;
}

impl Authenticator for bool {
    fn is_authenticated(&self) -> bool {
        *self
    }
}

/// Everything a handler sees for one request.
pub struct Context<'a, S> {
    request: &'a Request,
    params: PathParams,
    state: &'a mut S,
}

impl<'a, S> Context<'a, S> {
    /// Creates a context for one invocation.
    pub fn new(request: &'a Request, params: PathParams, state: &'a mut S) -> Self {
        Self {
            request,
            params,
            state,
        }
    }

    /// The incoming request.
    pub const fn request(&self) -> &'a Request {
        self.request
    }

    /// Path parameters by name.
    pub const fn params(&self) -> &PathParams {
        &self.params
    }

    /// A single path parameter, or the empty string if absent.
    pub fn param(&self, name: &str) -> &str {
        self.params.get(name).unwrap_or_default()
    }

    /// Path parameter values in the order the route pattern declares them.
    pub fn args(&self) -> Vec<&str> {
        self.params.values().collect()
    }

    /// Per-request state.
    pub fn state(&self) -> &S {
        &*self.state
    }

    /// Per-request state, mutably.
    pub fn state_mut(&mut self) -> &mut S {
        &mut *self.state
    }
}

/// An invocable controller action.
pub trait Action<S>: Send + Sync {
    /// Parameter names the action expects, in route pattern order.
    fn params(&self) -> &[String];

    /// Runs the action.
    fn call(&self, ctx: &mut Context<'_, S>) -> Response;
}

/// A boxed handler function.
pub type Handler<S> = Arc<dyn Fn(&mut Context<'_, S>) -> Response + Send + Sync>;

struct FnAction<S> {
    params: Vec<String>,
    handler: Handler<S>,
}

impl<S> Action<S> for FnAction<S> {
    fn params(&self) -> &[String] {
        &self.params
    }

    fn call(&self, ctx: &mut Context<'_, S>) -> Response {
        (self.handler)(ctx)
    }
}

/// Maps handler identifiers to actions.
pub struct HandlerRegistry<S> {
    actions: HashMap<HandlerId, Arc<dyn Action<S>>>,
}

impl<S> Default for HandlerRegistry<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> HandlerRegistry<S> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            actions: HashMap::new(),
        }
    }

    /// Looks up an action.
    ///
    /// A miss reports whether the controller itself is unknown or only the
    /// action is.
    pub fn resolve(&self, id: &HandlerId) -> Result<&dyn Action<S>> {
        self.actions
            .get(id)
            .map(|action| &**action)
            .ok_or_else(|| {
                let controller = id.controller();
                if self.actions.keys().any(|known| known.controller() == controller) {
                    RouterError::ActionNotFound {
                        controller: controller.to_string(),
                        action: id.action().to_string(),
                    }
                } else {
                    RouterError::ControllerNotFound(controller.to_string())
                }
            })
    }

    /// Returns true if the identifier is registered.
    pub fn contains(&self, id: &HandlerId) -> bool {
        self.actions.contains_key(id)
    }

    /// Number of registered actions.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl<S: 'static> HandlerRegistry<S> {
    /// Registers a closure under `Controller@action`.
    ///
    /// `params` names the path parameters the handler reads, in the order
    /// the route pattern declares them.
    pub fn register<F>(&mut self, id: &str, params: &[&str], handler: F) -> Result<()>
    where
        F: Fn(&mut Context<'_, S>) -> Response + Send + Sync + 'static,
    {
        let action = FnAction {
            params: params.iter().map(|p| (*p).to_string()).collect(),
            handler: Arc::new(handler),
        };
        self.register_action(id, action)
    }

    /// Registers an action implementation.
    pub fn register_action(&mut self, id: &str, action: impl Action<S> + 'static) -> Result<()> {
        let id = HandlerId::parse(id)?;
        if self.actions.contains_key(&id) {
            return Err(RouterError::DuplicateHandler(id.to_string()));
        }
        self.actions.insert(id, Arc::new(action));
        Ok(())
    }
}

/// What a dispatch produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The handler ran and produced this response.
    Invoked(Response),
    /// The route needs an authenticated caller and there is none.
    LoginRequired,
}

/// Routes requests and invokes their handlers.
pub struct Dispatcher<S> {
    router: Router,
    registry: HandlerRegistry<S>,
    login: Option<HandlerId>,
}

impl<S: Authenticator + 'static> Dispatcher<S> {
    /// Builds a dispatcher, checking every route against the registry.
    pub fn new(table: RouteTable, registry: HandlerRegistry<S>) -> Result<Self> {
        for entry in table.iter() {
            let handler = &entry.target.handler;
            let Some(action) = registry.actions.get(handler) else {
                return Err(RouterError::UnregisteredHandler {
                    handler: handler.to_string(),
                    pattern: entry.pattern.pattern().to_string(),
                });
            };
            if action.params() != entry.pattern.param_names() {
                return Err(RouterError::ParamMismatch {
                    handler: handler.to_string(),
                    pattern: entry.pattern.pattern().to_string(),
                    expected: action.params().to_vec(),
                    found: entry.pattern.param_names().to_vec(),
                });
            }
        }

        Ok(Self {
            router: Router::new(table),
            registry,
            login: None,
        })
    }

    /// Names the action rendered in place of auth-gated handlers.
    pub fn with_login(mut self, id: &str) -> Result<Self> {
        let id = HandlerId::parse(id)?;
        let action = self.registry.resolve(&id)?;
        if !action.params().is_empty() {
            return Err(RouterError::ParamMismatch {
                handler: id.to_string(),
                pattern: String::new(),
                expected: action.params().to_vec(),
                found: Vec::new(),
            });
        }
        self.login = Some(id);
        Ok(self)
    }

    /// Returns the router.
    pub const fn router(&self) -> &Router {
        &self.router
    }

    /// Resolves and dispatches a request.
    pub fn dispatch(&self, request: &Request, state: &mut S) -> Result<Outcome> {
        let resolution = self.router.resolve(&request.method, &request.uri)?;
        self.dispatch_resolution(resolution, request, state)
    }

    /// Dispatches an already resolved request.
    pub fn dispatch_resolution(
        &self,
        resolution: Resolution<'_>,
        request: &Request,
        state: &mut S,
    ) -> Result<Outcome> {
        let target = resolution.target();

        if target.auth_required && !state.is_authenticated() {
            debug!(handler = %target.handler, "authentication required");
            return Ok(Outcome::LoginRequired);
        }

        let action = self.registry.resolve(&target.handler)?;
        let mut ctx = Context::new(request, resolution.into_params(), state);
        Ok(Outcome::Invoked(action.call(&mut ctx)))
    }

    /// Dispatches a request and turns every outcome into a response.
    pub fn handle(&self, request: &Request, state: &mut S) -> Response {
        let outcome = self.dispatch(request, state);
        self.render(outcome, request, state)
    }

    /// Turns a dispatch result into a response.
    ///
    /// Login-required renders the configured login action (401 if none).
    /// Errors become a plain-text `Error: ...` message, 404 when no route
    /// matched and 500 otherwise.
    pub fn render(&self, outcome: Result<Outcome>, request: &Request, state: &mut S) -> Response {
        match outcome {
            Ok(Outcome::Invoked(response)) => response,
            Ok(Outcome::LoginRequired) => self.present_login(request, state),
            Err(err) => {
                warn!(method = %request.method, path = %request.path, error = %err, "dispatch failed");
                let message = format!("Error: {err}");
                if err.is_not_found() {
                    Response::not_found(message)
                } else {
                    Response::internal_server_error(message)
                }
            }
        }
    }

    fn present_login(&self, request: &Request, state: &mut S) -> Response {
        let Some(id) = &self.login else {
            return Response::unauthorized();
        };
        // `with_login` only accepts registered actions.
        match self.registry.resolve(id) {
            Ok(action) => {
                let mut ctx = Context::new(request, PathParams::new(), state);
                action.call(&mut ctx)
            }
            Err(err) => {
                warn!(login = %id, error = %err, "login action unavailable");
                Response::unauthorized()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn table() -> RouteTable {
        RouteTable::builder()
            .get("/", "HomeController@index")
            .get("/login", "LoginController@index")
            .get("/blog/item/:id", "BlogController@item")
            .get("/dashboard", "DashBoardController@index::auth")
            .build()
            .unwrap()
    }

    fn registry(calls: &Arc<AtomicUsize>) -> HandlerRegistry<bool> {
        let mut registry: HandlerRegistry<bool> = HandlerRegistry::new();
        registry
            .register("HomeController@index", &[], |_| Response::text("Home Controller"))
            .unwrap();
        registry
            .register("LoginController@index", &[], |_| Response::html("<form></form>"))
            .unwrap();
        registry
            .register("BlogController@item", &["id"], |ctx| {
                Response::text(format!("Blog Item ID: {}", ctx.param("id")))
            })
            .unwrap();
        let counter = Arc::clone(calls);
        registry
            .register("DashBoardController@index", &[], move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                Response::text("Dashboard")
            })
            .unwrap();
        registry
    }

    #[test]
    fn test_dispatch_invokes_handler() {
        let calls = Arc::new(AtomicUsize::new(0));
        let dispatcher = Dispatcher::new(table(), registry(&calls)).unwrap();

        let outcome = dispatcher
            .dispatch(&Request::get("/blog/item/9"), &mut false)
            .unwrap();
        assert_eq!(outcome, Outcome::Invoked(Response::text("Blog Item ID: 9")));
    }

    #[test]
    fn test_auth_gate_blocks_handler() {
        let calls = Arc::new(AtomicUsize::new(0));
        let dispatcher = Dispatcher::new(table(), registry(&calls)).unwrap();

        let outcome = dispatcher
            .dispatch(&Request::get("/dashboard"), &mut false)
            .unwrap();
        assert_eq!(outcome, Outcome::LoginRequired);
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let outcome = dispatcher
            .dispatch(&Request::get("/dashboard"), &mut true)
            .unwrap();
        assert_eq!(outcome, Outcome::Invoked(Response::text("Dashboard")));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_handle_renders_login() {
        let calls = Arc::new(AtomicUsize::new(0));
        let dispatcher = Dispatcher::new(table(), registry(&calls))
            .unwrap()
            .with_login("LoginController@index")
            .unwrap();

        let res = dispatcher.handle(&Request::get("/dashboard"), &mut false);
        assert_eq!(res.body_string(), Some("<form></form>".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_handle_without_login_is_unauthorized() {
        let calls = Arc::new(AtomicUsize::new(0));
        let dispatcher = Dispatcher::new(table(), registry(&calls)).unwrap();

        let res = dispatcher.handle(&Request::get("/dashboard"), &mut false);
        assert_eq!(res.status, 401);
    }

    #[test]
    fn test_handle_not_found_message() {
        let calls = Arc::new(AtomicUsize::new(0));
        let dispatcher = Dispatcher::new(table(), registry(&calls)).unwrap();

        let res = dispatcher.handle(&Request::get("/missing"), &mut true);
        assert_eq!(res.status, 404);
        assert_eq!(
            res.body_string(),
            Some("Error: Route not found: GET /missing".to_string())
        );
    }

    #[test]
    fn test_unregistered_handler_fails_fast() {
        let calls = Arc::new(AtomicUsize::new(0));
        let table = RouteTable::builder()
            .get("/", "HomeController@index")
            .post("/dashboard/insert", "DashBoardController@insert::auth")
            .build()
            .unwrap();

        let err = Dispatcher::new(table, registry(&calls)).err().unwrap();
        assert_eq!(
            err,
            RouterError::UnregisteredHandler {
                handler: "DashBoardController@insert".to_string(),
                pattern: "/dashboard/insert".to_string(),
            }
        );
    }

    #[test]
    fn test_param_mismatch_fails_fast() {
        let mut registry: HandlerRegistry<bool> = HandlerRegistry::new();
        registry
            .register("ShowController@detail", &["title", "category"], |_| {
                Response::ok()
            })
            .unwrap();
        let table = RouteTable::builder()
            .get("/show/:category/:title", "ShowController@detail")
            .build()
            .unwrap();

        let err = Dispatcher::new(table, registry).err().unwrap();
        assert!(matches!(err, RouterError::ParamMismatch { .. }));
    }

    #[test]
    fn test_duplicate_registration() {
        let mut registry: HandlerRegistry<bool> = HandlerRegistry::new();
        registry.register("A@b", &[], |_| Response::ok()).unwrap();
        assert_eq!(
            registry.register("A@b", &[], |_| Response::ok()),
            Err(RouterError::DuplicateHandler("A@b".to_string()))
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_registry_resolve_unknown() {
        let registry: HandlerRegistry<bool> = HandlerRegistry::new();
        let id = HandlerId::parse("Missing@index").unwrap();
        assert!(!registry.contains(&id));
        assert_eq!(
            registry.resolve(&id).err(),
            Some(RouterError::ControllerNotFound("Missing".to_string()))
        );
    }

    #[test]
    fn test_registry_resolve_unknown_action() {
        let calls = Arc::new(AtomicUsize::new(0));
        let registry = registry(&calls);
        let id = HandlerId::parse("BlogController@archive").unwrap();
        assert_eq!(
            registry.resolve(&id).err(),
            Some(RouterError::ActionNotFound {
                controller: "BlogController".to_string(),
                action: "archive".to_string(),
            })
        );
        assert_eq!(
            registry.resolve(&id).err().unwrap().to_string(),
            "Method 'archive' not found in controller 'BlogController'."
        );
    }

    #[test]
    fn test_render_handler_error_is_server_error() {
        let calls = Arc::new(AtomicUsize::new(0));
        let dispatcher = Dispatcher::new(table(), registry(&calls)).unwrap();

        let err = RouterError::ControllerNotFound("GoneController".to_string());
        let res = dispatcher.render(Err(err), &Request::get("/"), &mut true);
        assert_eq!(res.status, 500);
        assert_eq!(
            res.headers.get("Content-Type"),
            Some(&"text/plain; charset=utf-8".to_string())
        );
        assert_eq!(
            res.body_string(),
            Some("Error: Controller 'GoneController' not found.".to_string())
        );
    }

    #[test]
    fn test_unresolvable_login_falls_back_to_unauthorized() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut dispatcher = Dispatcher::new(table(), registry(&calls)).unwrap();
        dispatcher.login = Some(HandlerId::parse("LoginController@form").unwrap());

        let res = dispatcher.handle(&Request::get("/dashboard"), &mut false);
        assert_eq!(res.status, 401);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_with_login_requires_registered_action() {
        let calls = Arc::new(AtomicUsize::new(0));
        let dispatcher = Dispatcher::new(table(), registry(&calls)).unwrap();
        assert!(dispatcher.with_login("Nope@index").is_err());
    }
}
