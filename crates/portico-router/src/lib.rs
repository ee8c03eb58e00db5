//! # portico-router
//!
//! Front-controller routing: a static route table, first-match path
//! resolution and auth-gated dispatch to named controller actions.
//!
//! This crate provides:
//! - Path patterns with `:name` parameters, matched segment by segment
//! - A route table keyed by HTTP method, ordered by declaration
//! - `Controller@action` targets with an optional `::auth` marker
//! - A handler registry validated against the table at start-up
//! - A dispatcher that never invokes an auth-gated handler for an
//!   unauthenticated caller
//!
//! ## Quick Start
//!
//! ```
//! use portico_router::{Dispatcher, HandlerRegistry, Outcome, Request, Response, RouteTable};
//!
//! let table = RouteTable::builder()
//!     .get("/blog/show", "BlogController@show")
//!     .get("/blog/cat/:category", "BlogController@category")
//!     .get("/dashboard", "DashBoardController@index::auth")
//!     .build()
//!     .unwrap();
//!
//! let mut registry: HandlerRegistry<bool> = HandlerRegistry::new();
//! registry
//!     .register("BlogController@show", &[], |_| Response::text("Blog Show"))
//!     .unwrap();
//! registry
//!     .register("BlogController@category", &["category"], |ctx| {
//!         Response::text(format!("Blog Category: {}", ctx.param("category")))
//!     })
//!     .unwrap();
//! registry
//!     .register("DashBoardController@index", &[], |_| Response::text("Dashboard"))
//!     .unwrap();
//!
//! let dispatcher = Dispatcher::new(table, registry).unwrap();
//!
//! // `bool` is the simplest authenticator.
//! let mut signed_in = false;
//! let outcome = dispatcher
//!     .dispatch(&Request::get("/blog/cat/tech"), &mut signed_in)
//!     .unwrap();
//! assert_eq!(outcome, Outcome::Invoked(Response::text("Blog Category: tech")));
//!
//! let outcome = dispatcher
//!     .dispatch(&Request::get("/dashboard"), &mut signed_in)
//!     .unwrap();
//! assert_eq!(outcome, Outcome::LoginRequired);
//! ```
//!
//! ## Route Order
//!
//! For each method, routes are tried in the order they were declared and the
//! first match wins. Declare literal routes before overlapping parameterized
//! ones:
//!
//! ```ignore
//! RouteTable::builder()
//!     .get("/blog/show", "BlogController@show") // wins for /blog/show
//!     .get("/blog/:id", "BlogController@item")
//! ```

mod dispatch;
mod error;
mod path;
mod request;
mod response;
mod router;
mod table;

pub use dispatch::{Action, Authenticator, Context, Dispatcher, Handler, HandlerRegistry, Outcome};
pub use error::{Result, RouterError};
pub use path::PathPattern;
pub use request::{strip_query, Method, PathParams, Request};
pub use response::Response;
pub use router::{Resolution, Router};
pub use table::{HandlerId, RouteEntry, RouteTable, RouteTableBuilder, RouteTarget, AUTH_MARKER};
