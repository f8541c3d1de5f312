//! # Web Primitives Module
//!
//! The leaf layer of the runtime: the small subset of Web-standard
//! primitives that request handlers observe.
//!
//! - [`Url`] / [`SearchParams`] — absolute URL parsing with the WHATWG
//!   component names (`protocol`, `hostname`, `port`, `pathname`,
//!   `search`, `hash`) and first-occurrence query lookup.
//! - [`Headers`] — a case-insensitive, insertion-ordered header map.
//! - [`encoding`] — UTF-8 byte encoding and decoding.
//!
//! These types cover only the contract handlers observe; they are not
//! full implementations of the corresponding Web standards.

pub mod encoding;
mod headers;
mod url;

pub use headers::Headers;
pub use url::{SearchParams, Url};
