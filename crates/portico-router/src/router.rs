//! Request resolution against the route table.

use tracing::debug;

use crate::error::{Result, RouterError};
use crate::request::{strip_query, Method, PathParams};
use crate::table::{RouteEntry, RouteTable, RouteTarget};

/// The outcome of a successful route lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution<'a> {
    entry: &'a RouteEntry,
    params: PathParams,
}

impl<'a> Resolution<'a> {
    /// The matched route.
    pub const fn entry(&self) -> &'a RouteEntry {
        self.entry
    }

    /// The matched route's target.
    pub const fn target(&self) -> &'a RouteTarget {
        &self.entry.target
    }

    /// Parameters extracted from the path, in pattern order.
    pub const fn params(&self) -> &PathParams {
        &self.params
    }

    /// Consumes the resolution, returning the parameters.
    pub fn into_params(self) -> PathParams {
        self.params
    }
}

/// Resolves `(method, path)` pairs against a [`RouteTable`].
///
/// Routes are tried in declaration order and the first match wins, so a
/// literal route such as `/blog/show` must be declared before an
/// overlapping `/blog/:id`.
#[derive(Debug, Clone, Default)]
pub struct Router {
    table: RouteTable,
}

impl Router {
    /// Creates a router over a built table.
    pub const fn new(table: RouteTable) -> Self {
        Self { table }
    }

    /// Returns the underlying table.
    pub const fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Finds the first route matching the method and path.
    ///
    /// Any query string or fragment on `raw_path` is ignored. Unknown
    /// methods resolve to [`RouterError::RouteNotFound`].
    pub fn resolve(&self, method: &str, raw_path: &str) -> Result<Resolution<'_>> {
        let path = strip_query(raw_path);
        let not_found = || RouterError::RouteNotFound {
            method: method.to_string(),
            path: path.to_string(),
        };

        let Some(parsed) = Method::parse(method) else {
            debug!(method, path, "unknown method");
            return Err(not_found());
        };

        for entry in self.table.routes(parsed) {
            if let Some(params) = entry.pattern.match_path(path) {
                debug!(
                    method,
                    path,
                    route = entry.pattern.pattern(),
                    handler = %entry.target.handler,
                    "route matched"
                );
                return Ok(Resolution { entry, params });
            }
        }

        debug!(method, path, "no route matched");
        Err(not_found())
    }
}
