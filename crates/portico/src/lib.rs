//! # portico
//!
//! A small blog served through a front controller: one entry point that
//! routes every request to a `Controller@action` from a static declaration.
//!
//! The pieces:
//! - [`config`] loads the route and user declaration (JSON)
//! - [`controllers`] registers the controller actions
//! - [`state`] carries the per-request session and answers the auth check
//! - [`app`] wires them into a validated [`portico_router::Dispatcher`]
//! - [`cgi`] decodes CGI requests and encodes responses
//!
//! ```
//! use portico::{App, AppConfig};
//! use portico_auth::Session;
//! use portico_router::Request;
//!
//! let app = App::build(&AppConfig::load(None).unwrap()).unwrap();
//! let (response, _) = app.respond(&Request::get("/blog/item/7"), Session::new());
//! assert_eq!(response.body_string().unwrap(), "Blog Item ID: 7");
//! ```

pub mod app;
pub mod cgi;
pub mod config;
pub mod controllers;
pub mod state;

pub use app::App;
pub use config::{AppConfig, ConfigError};
pub use state::AppState;
