//! # Dispatcher Module
//!
//! The root of the request path: wires an incoming transport request
//! through the router, the matched handler, and — when the handler
//! suspends — the completion scheduler, then serializes the final
//! response back to the transport representation.
//!
//! ## Handler shapes
//!
//! A handler is a plain function from [`Request`](crate::http::Request)
//! to [`Reply`]. It may answer in two shapes:
//!
//! - `Reply::Immediate(response)` — the synchronous path; no pending
//!   operation is created.
//! - `Reply::Deferred(..)` — the handler suspends. A pending operation is
//!   registered with the scheduler at the moment of suspension and the
//!   dispatcher parks on the reply channel until the matching
//!   [`Resolver`] settles it (typically from a timer callback).
//!
//! The two shapes are an explicit tagged variant rather than implicit
//! thenable detection.
//!
//! ## Error handling
//!
//! - No route matches: default 404 with no body.
//! - Handler panics: caught, logged with detail, surfaced as an opaque
//!   500. Never propagated to the transport as a crash.
//! - A deferred handler whose resolver is dropped without resolving:
//!   surfaced as a 500 the same way.

mod core;

pub use core::{DeferredReply, Dispatcher, Handler, Reply, Resolver};
