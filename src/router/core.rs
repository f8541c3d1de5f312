//! Route table construction and ordered first-match resolution.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use http::Method;
use smallvec::SmallVec;
use tracing::{debug, info, warn};

use crate::dispatcher::Handler;
use crate::error::{Error, Result};

/// Maximum number of path parameters before heap allocation.
///
/// Nearly every route in practice has a handful of parameters at most;
/// `SmallVec` keeps the common case off the heap.
pub const MAX_INLINE_PARAMS: usize = 8;

/// Stack-allocated parameter bindings for the match path.
///
/// Parameter names come from the frozen route table, so they are shared
/// `Arc<str>`s; values are per-request captures from the URL.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// Method selector for one route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodFilter {
    /// Matches every HTTP method (`mock.all` registrations).
    Any,
    /// Matches exactly one method.
    Only(Method),
}

impl MethodFilter {
    /// Whether this filter accepts `method`.
    #[must_use]
    pub fn matches(&self, method: &Method) -> bool {
        match self {
            MethodFilter::Any => true,
            MethodFilter::Only(m) => m == method,
        }
    }
}

impl fmt::Display for MethodFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MethodFilter::Any => f.write_str("ALL"),
            MethodFilter::Only(m) => write!(f, "{m}"),
        }
    }
}

#[derive(Debug, Clone)]
enum Segment {
    Literal(String),
    Param(Arc<str>),
}

/// A compiled path pattern.
///
/// Created at registration time and immutable thereafter. `:name`
/// segments bind any single non-empty path segment; all other segments
/// must match literally.
#[derive(Debug, Clone)]
pub struct RoutePattern {
    raw: String,
    segments: Vec<Segment>,
}

impl RoutePattern {
    /// Compile a pattern such as `/users/:id/posts`.
    ///
    /// Fails with [`Error::InvalidPattern`] when the same parameter name
    /// appears twice in one pattern.
    pub fn parse(pattern: &str) -> Result<Self> {
        let mut segments = Vec::new();
        for part in split_segments(pattern) {
            if let Some(name) = part.strip_prefix(':') {
                if segments.iter().any(|s| match s {
                    Segment::Param(existing) => existing.as_ref() == name,
                    Segment::Literal(_) => false,
                }) {
                    return Err(Error::InvalidPattern {
                        pattern: pattern.to_string(),
                        name: name.to_string(),
                    });
                }
                segments.push(Segment::Param(Arc::from(name)));
            } else {
                segments.push(Segment::Literal(part.to_string()));
            }
        }
        Ok(RoutePattern {
            raw: pattern.to_string(),
            segments,
        })
    }

    /// The pattern as registered.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Try to match a request path against this pattern.
    ///
    /// The path is split on `/` after removing one leading and one
    /// trailing slash, and each segment is percent-decoded before
    /// comparison. Returns the parameter bindings on success.
    fn matches(&self, path: &str) -> Option<ParamVec> {
        let path_segments: Vec<Cow<'_, str>> = split_segments(path)
            .map(|seg| match urlencoding::decode(seg) {
                Ok(decoded) => decoded,
                Err(_) => Cow::Borrowed(seg),
            })
            .collect();

        if path_segments.len() != self.segments.len() {
            return None;
        }

        let mut params = ParamVec::new();
        for (pattern_seg, path_seg) in self.segments.iter().zip(&path_segments) {
            match pattern_seg {
                Segment::Param(name) => {
                    if path_seg.is_empty() {
                        return None;
                    }
                    params.push((Arc::clone(name), path_seg.to_string()));
                }
                Segment::Literal(lit) => {
                    if lit.as_str() != &**path_seg {
                        return None;
                    }
                }
            }
        }
        Some(params)
    }
}

/// One registered route: method filter, compiled pattern, handler.
#[derive(Clone)]
pub struct Route {
    /// Method selector.
    pub method: MethodFilter,
    /// Compiled path pattern.
    pub pattern: RoutePattern,
    /// Handler invoked on match.
    pub handler: Handler,
}

/// Result of successfully matching a request to a route.
pub struct RouteMatch<'r> {
    /// Handler bound to the matched route.
    pub handler: &'r Handler,
    /// The pattern that matched, as registered.
    pub pattern: &'r str,
    /// Parameter bindings in pattern order.
    pub params: ParamVec,
}

/// Insertion-ordered route table, frozen after construction.
///
/// Resolution walks entries in registration order and returns the first
/// structural match, so earlier registrations shadow later overlapping
/// ones. The table is read-only after startup and needs no locking
/// during matching.
#[derive(Clone, Default)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    /// Build the frozen table from registered routes.
    #[must_use]
    pub fn new(routes: Vec<Route>) -> Self {
        let summary: Vec<String> = routes
            .iter()
            .take(10)
            .map(|r| format!("{} {}", r.method, r.pattern.as_str()))
            .collect();
        info!(
            target: "mockd::router",
            routes_count = routes.len(),
            routes_summary = ?summary,
            "route table frozen"
        );
        Router { routes }
    }

    /// Match a request against the table.
    ///
    /// Returns `None` when nothing matches; the dispatcher translates
    /// that into a 404.
    #[must_use]
    pub fn route(&self, method: &Method, path: &str) -> Option<RouteMatch<'_>> {
        debug!(target: "mockd::router", %method, path, "route match attempt");
        for route in &self.routes {
            if !route.method.matches(method) {
                continue;
            }
            if let Some(params) = route.pattern.matches(path) {
                debug!(
                    target: "mockd::router",
                    %method,
                    path,
                    pattern = route.pattern.as_str(),
                    params = ?params,
                    "route matched"
                );
                return Some(RouteMatch {
                    handler: &route.handler,
                    pattern: route.pattern.as_str(),
                    params,
                });
            }
        }
        warn!(target: "mockd::router", %method, path, "no route matched");
        None
    }

    /// Number of registered routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Split a path or pattern on `/` after stripping one leading and one
/// trailing slash. The root path yields no segments.
fn split_segments(path: &str) -> impl Iterator<Item = &str> {
    let mut trimmed = path.strip_prefix('/').unwrap_or(path);
    trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);
    // The root path has zero segments; interior empty segments are kept
    // and simply fail to match anything but an empty literal.
    let is_root = trimmed.is_empty();
    trimmed.split('/').filter(move |_| !is_root)
}
