//! # Runtime Module
//!
//! The root object a mock script talks to. Construction is explicitly
//! two-phase:
//!
//! 1. **Registration phase** — a [`RuntimeBuilder`] collects route
//!    registrations (`get`/`post`/`put`/`patch`/`delete`/`all`), the
//!    declared listen port, and any top-level timers scheduled through
//!    the builder's scheduler handle.
//! 2. **Frozen phase** — [`RuntimeBuilder::build`] compiles the route
//!    table, seals the scheduler's startup barrier, and returns the
//!    [`Runtime`]. From then on the table never changes; a fresh runtime
//!    instance is the only way to a different table.
//!
//! The split guarantees that top-level pending operations registered
//! during script evaluation are counted before emptiness of the pending
//! set can ever be read as "ready to shut down".
//!
//! ## Example
//!
//! ```rust
//! use mockd::http::{RawRequest, Response};
//! use mockd::runtime::Runtime;
//!
//! # fn main() -> Result<(), mockd::Error> {
//! let mut builder = Runtime::builder();
//! builder.listen(3000);
//! builder.get("/users/:id", |req| {
//!     Response::text(format!("user:{}", req.param("id").unwrap_or(""))).into()
//! })?;
//! let runtime = builder.build();
//!
//! let raw = runtime.handle(RawRequest {
//!     method: "GET".into(),
//!     url: "/users/42".into(),
//!     headers: vec![],
//!     body: vec![],
//! });
//! assert_eq!(raw.status, 200);
//! runtime.wait_idle();
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use http::Method;
use tracing::info;

use crate::dispatcher::{Dispatcher, Handler, Reply};
use crate::error::Result;
use crate::http::{RawRequest, RawResponse, Request};
use crate::router::{MethodFilter, Route, RoutePattern, Router};
use crate::runtime_config::RuntimeConfig;
use crate::scheduler::Scheduler;
use crate::store::KvStore;

/// Collects registrations during the startup phase.
pub struct RuntimeBuilder {
    routes: Vec<Route>,
    listen: Option<u16>,
    config: RuntimeConfig,
    store: Arc<KvStore>,
    scheduler: Scheduler,
}

impl RuntimeBuilder {
    /// Start a registration phase with configuration from the
    /// environment.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(RuntimeConfig::from_env())
    }

    /// Start a registration phase with explicit configuration.
    #[must_use]
    pub fn with_config(config: RuntimeConfig) -> Self {
        RuntimeBuilder {
            routes: Vec::new(),
            listen: None,
            config,
            store: Arc::new(KvStore::new()),
            scheduler: Scheduler::new(config),
        }
    }

    /// Declare the listen port the transport should bind.
    pub fn listen(&mut self, port: u16) {
        self.listen = Some(port);
    }

    /// Register a route for an explicit method filter.
    ///
    /// The pattern is compiled here; a malformed pattern (duplicate
    /// parameter names) fails registration and is fatal to startup.
    /// Overlapping patterns are allowed — the first registration wins at
    /// match time.
    pub fn route<F>(&mut self, method: MethodFilter, pattern: &str, handler: F) -> Result<()>
    where
        F: Fn(Request) -> Reply + Send + Sync + 'static,
    {
        let pattern = RoutePattern::parse(pattern)?;
        self.routes.push(Route {
            method,
            pattern,
            handler: Arc::new(handler) as Handler,
        });
        Ok(())
    }

    /// Register a GET route.
    pub fn get<F>(&mut self, pattern: &str, handler: F) -> Result<()>
    where
        F: Fn(Request) -> Reply + Send + Sync + 'static,
    {
        self.route(MethodFilter::Only(Method::GET), pattern, handler)
    }

    /// Register a POST route.
    pub fn post<F>(&mut self, pattern: &str, handler: F) -> Result<()>
    where
        F: Fn(Request) -> Reply + Send + Sync + 'static,
    {
        self.route(MethodFilter::Only(Method::POST), pattern, handler)
    }

    /// Register a PUT route.
    pub fn put<F>(&mut self, pattern: &str, handler: F) -> Result<()>
    where
        F: Fn(Request) -> Reply + Send + Sync + 'static,
    {
        self.route(MethodFilter::Only(Method::PUT), pattern, handler)
    }

    /// Register a PATCH route.
    pub fn patch<F>(&mut self, pattern: &str, handler: F) -> Result<()>
    where
        F: Fn(Request) -> Reply + Send + Sync + 'static,
    {
        self.route(MethodFilter::Only(Method::PATCH), pattern, handler)
    }

    /// Register a DELETE route.
    pub fn delete<F>(&mut self, pattern: &str, handler: F) -> Result<()>
    where
        F: Fn(Request) -> Reply + Send + Sync + 'static,
    {
        self.route(MethodFilter::Only(Method::DELETE), pattern, handler)
    }

    /// Register a route matching every method.
    pub fn all<F>(&mut self, pattern: &str, handler: F) -> Result<()>
    where
        F: Fn(Request) -> Reply + Send + Sync + 'static,
    {
        self.route(MethodFilter::Any, pattern, handler)
    }

    /// Shared store handle, available already during registration so
    /// handlers can capture it.
    #[must_use]
    pub fn store(&self) -> Arc<KvStore> {
        Arc::clone(&self.store)
    }

    /// Scheduler handle for top-level timers and deferred handlers.
    #[must_use]
    pub fn scheduler(&self) -> Scheduler {
        self.scheduler.clone()
    }

    /// Freeze the route table and seal the startup barrier.
    pub fn build(self) -> Runtime {
        let router = Router::new(self.routes);
        // Everything registered during script evaluation is counted by
        // now; only from here on may an empty pending set mean idle.
        self.scheduler.seal();
        info!(
            target: "mockd::runtime",
            routes = router.len(),
            listen = self.listen,
            "runtime started"
        );
        Runtime {
            dispatcher: Dispatcher::new(router),
            listen: self.listen,
            config: self.config,
            store: self.store,
            scheduler: self.scheduler,
        }
    }
}

impl Default for RuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A frozen runtime instance.
///
/// Owns the route table, the shared store, and the completion scheduler.
/// The transport collaborator calls [`Runtime::handle`] per request and
/// [`Runtime::wait_idle`] before tearing the process down.
pub struct Runtime {
    dispatcher: Dispatcher,
    listen: Option<u16>,
    config: RuntimeConfig,
    store: Arc<KvStore>,
    scheduler: Scheduler,
}

impl Runtime {
    /// Open a registration phase.
    #[must_use]
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Handle one parsed request and serialize the outcome.
    #[must_use]
    pub fn handle(&self, raw: RawRequest) -> RawResponse {
        self.dispatcher.handle(raw)
    }

    /// Declared listen port, if the script set one.
    #[must_use]
    pub fn listen_port(&self) -> Option<u16> {
        self.listen
    }

    /// Runtime configuration in effect.
    #[must_use]
    pub fn config(&self) -> RuntimeConfig {
        self.config
    }

    /// The shared key-value store.
    #[must_use]
    pub fn store(&self) -> Arc<KvStore> {
        Arc::clone(&self.store)
    }

    /// The completion scheduler.
    #[must_use]
    pub fn scheduler(&self) -> Scheduler {
        self.scheduler.clone()
    }

    /// Block until no pending operations remain.
    ///
    /// The startup barrier is already sealed, so this returns as soon as
    /// every timer and deferred completion has settled.
    pub fn wait_idle(&self) {
        self.scheduler.wait_idle();
    }

    /// Passthrough diagnostic sink for script output.
    ///
    /// Accepts arbitrary strings and forwards them to the log; never
    /// affects response generation.
    pub fn log(&self, message: &str) {
        info!(target: "mockd::script", "{message}");
    }
}
