//! # Router Module
//!
//! Path matching and route resolution for the mock runtime.
//!
//! ## Overview
//!
//! The router is responsible for:
//! - Compiling `:name` path patterns into segment sequences at
//!   registration time
//! - Matching incoming requests against the registered patterns
//! - Extracting path parameters from matched routes
//!
//! ## Architecture
//!
//! Matching is an explicit ordered table scan. Patterns are compiled once
//! when the runtime is built and the table is frozen afterwards; at match
//! time the router walks entries in registration order and returns the
//! first structural match. Overlapping patterns are legal and resolved by
//! that order, so an `ALL` route registered before a `GET` route at the
//! same path shadows it.
//!
//! ## Example
//!
//! ```rust,ignore
//! let m = router.route(&Method::GET, "/users/42").expect("match");
//! assert_eq!(m.params[0].1, "42");
//! ```

mod core;

pub use core::{MethodFilter, ParamVec, Route, RouteMatch, RoutePattern, Router, MAX_INLINE_PARAMS};
