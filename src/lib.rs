//! # mockd
//!
//! **mockd** is the core runtime of a mock HTTP server: route dispatch,
//! a Web-flavored request/response object model, an async completion
//! scheduler that keeps the process alive exactly as long as necessary,
//! and a shared key-value store.
//!
//! ## Overview
//!
//! Scripts register route handlers against a [`runtime::RuntimeBuilder`],
//! optionally schedule top-level timers, and freeze the result into a
//! [`runtime::Runtime`]. An external transport collaborator (socket
//! handling is out of scope here) feeds parsed requests into
//! [`runtime::Runtime::handle`] and writes the serialized responses it
//! gets back.
//!
//! ## Architecture
//!
//! The library is organized into several key modules, leaves first:
//!
//! - **[`web`]** — URL parsing, case-insensitive headers, UTF-8
//!   encode/decode: the Web-primitive subset handlers observe
//! - **[`http`]** — the [`http::Request`]/[`http::Response`] model and
//!   the raw transport representation at the crate boundary
//! - **[`store`]** — the process-wide key-value store shared by all
//!   handlers
//! - **[`router`]** — ordered route table with `:name` parameters and an
//!   `ALL` method wildcard; first registered structural match wins
//! - **[`scheduler`]** — reference-counted pending-operation registry
//!   with an explicit startup barrier; timers run on `may` coroutines
//! - **[`dispatcher`]** — wires a request through router → handler →
//!   scheduler → serialization
//! - **[`runtime`]** — the root object gluing all of the above together
//!
//! ## Request Handling Flow
//!
//! 1. Transport hands a parsed request to the dispatcher
//! 2. The router resolves the first matching route and binds path
//!    parameters
//! 3. The handler runs; it may return an immediate response or suspend
//! 4. A suspended handler's completion is tracked by the scheduler and
//!    the dispatcher parks until it resolves
//! 5. The final response is serialized back to the transport
//!
//! No route match becomes a 404, a handler fault becomes a logged 500;
//! neither ever crashes the runtime.
//!
//! ## Quick Start
//!
//! ```no_run
//! use mockd::http::Response;
//! use mockd::runtime::Runtime;
//!
//! # fn main() -> Result<(), mockd::Error> {
//! let mut builder = Runtime::builder();
//! builder.listen(3000);
//! builder.get("/hello", |_req| Response::text("Hello, World!").into())?;
//! let runtime = builder.build();
//! // transport loop: runtime.handle(raw_request) per request
//! runtime.wait_idle();
//! # Ok(())
//! # }
//! ```
//!
//! ## Runtime Considerations
//!
//! mockd uses the `may` coroutine runtime for timers and deferred
//! completions, not tokio or async-std. Coroutine stack size is
//! configurable via the `MOCKD_STACK_SIZE` environment variable.

pub mod dispatcher;
mod error;
pub mod http;
pub mod router;
pub mod runtime;
pub mod runtime_config;
pub mod scheduler;
pub mod store;
pub mod web;

pub use dispatcher::{DeferredReply, Dispatcher, Handler, Reply, Resolver};
pub use error::{Error, Result};
pub use http::{RawRequest, RawResponse, Request, Response};
pub use router::{MethodFilter, Router};
pub use runtime::{Runtime, RuntimeBuilder};
pub use runtime_config::RuntimeConfig;
pub use scheduler::{PendingOp, Scheduler, TimerHandle};
pub use store::KvStore;
