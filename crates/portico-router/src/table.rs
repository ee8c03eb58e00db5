//! Static route table.

use std::collections::HashMap;

use crate::error::{Result, RouterError};
use crate::path::PathPattern;
use crate::request::Method;

/// Suffix on a route target marking it as auth-required.
pub const AUTH_MARKER: &str = "::auth";

/// A `Controller@action` handler identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HandlerId {
    controller: String,
    action: String,
}

impl HandlerId {
    /// Parses `Controller@action`. Exactly one `@` with non-empty halves.
    pub fn parse(s: &str) -> Result<Self> {
        match s.split_once('@') {
            Some((controller, action))
                if !controller.is_empty() && !action.is_empty() && !action.contains('@') =>
            {
                Ok(Self {
                    controller: controller.to_string(),
                    action: action.to_string(),
                })
            }
            _ => Err(RouterError::InvalidTarget(s.to_string())),
        }
    }

    /// The controller half.
    pub fn controller(&self) -> &str {
        &self.controller
    }

    /// The action half.
    pub fn action(&self) -> &str {
        &self.action
    }
}

impl std::fmt::Display for HandlerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.controller, self.action)
    }
}

/// What a route dispatches to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTarget {
    /// Handler to invoke.
    pub handler: HandlerId,
    /// Whether the caller must be authenticated.
    pub auth_required: bool,
}

impl RouteTarget {
    /// Parses a declaration string such as `DashBoardController@index::auth`.
    pub fn parse(s: &str) -> Result<Self> {
        let (id, auth_required) = s
            .strip_suffix(AUTH_MARKER)
            .map_or((s, false), |id| (id, true));

        Ok(Self {
            handler: HandlerId::parse(id)?,
            auth_required,
        })
    }
}

impl std::fmt::Display for RouteTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.handler)?;
        if self.auth_required {
            f.write_str(AUTH_MARKER)?;
        }
        Ok(())
    }
}

/// A single route definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry {
    /// HTTP method.
    pub method: Method,
    /// Path pattern.
    pub pattern: PathPattern,
    /// Dispatch target.
    pub target: RouteTarget,
}

/// Routes grouped by method, each group in declaration order.
///
/// Immutable once built; share it behind an `Arc` between requests.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: HashMap<Method, Vec<RouteEntry>>,
    /// Declaration order of methods, for listing.
    methods: Vec<Method>,
}

impl RouteTable {
    /// Starts a new table declaration.
    pub fn builder() -> RouteTableBuilder {
        RouteTableBuilder::default()
    }

    /// Returns the ordered entries for a method.
    pub fn routes(&self, method: Method) -> &[RouteEntry] {
        self.routes.get(&method).map(Vec::as_slice).unwrap_or_default()
    }

    /// Iterates all entries, grouped by method in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &RouteEntry> {
        self.methods.iter().flat_map(|m| self.routes(*m))
    }

    /// Total number of routes.
    pub fn len(&self) -> usize {
        self.routes.values().map(Vec::len).sum()
    }

    /// Returns true if no routes are declared.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Builder collecting raw `(method, pattern, target)` declarations.
#[derive(Debug, Clone, Default)]
pub struct RouteTableBuilder {
    declared: Vec<(Method, String, String)>,
}

impl RouteTableBuilder {
    /// Adds a route.
    #[must_use]
    pub fn route(mut self, method: Method, pattern: &str, target: &str) -> Self {
        self.declared
            .push((method, pattern.to_string(), target.to_string()));
        self
    }

    /// Adds a GET route.
    #[must_use]
    pub fn get(self, pattern: &str, target: &str) -> Self {
        self.route(Method::Get, pattern, target)
    }

    /// Adds a POST route.
    #[must_use]
    pub fn post(self, pattern: &str, target: &str) -> Self {
        self.route(Method::Post, pattern, target)
    }

    /// Adds a DELETE route.
    #[must_use]
    pub fn delete(self, pattern: &str, target: &str) -> Self {
        self.route(Method::Delete, pattern, target)
    }

    /// Compiles every pattern and target.
    pub fn build(self) -> Result<RouteTable> {
        let mut table = RouteTable::default();

        for (method, pattern, target) in self.declared {
            let entry = RouteEntry {
                method,
                pattern: PathPattern::parse(&pattern)?,
                target: RouteTarget::parse(&target)?,
            };
            if !table.methods.contains(&method) {
                table.methods.push(method);
            }
            table.routes.entry(method).or_default().push(entry);
        }

        Ok(table)
    }
}
