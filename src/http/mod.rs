//! # Request/Response Model
//!
//! The object model handlers see, plus the raw transport representation
//! at the crate boundary.
//!
//! The transport collaborator (socket handling is out of scope for this
//! core) delivers a [`RawRequest`] — method, URL, header pairs, and body
//! bytes already split out of the wire format — and takes back a
//! [`RawResponse`] ready to serialize. Inside the core, handlers work
//! with [`Request`] and [`Response`].

mod request;
mod response;

pub use request::Request;
pub use response::Response;

use serde::{Deserialize, Serialize};

/// A parsed request as handed over by the transport layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRequest {
    /// HTTP method token (e.g. `"GET"`).
    pub method: String,
    /// Request target as it appeared on the request line.
    pub url: String,
    /// Header pairs in wire order.
    pub headers: Vec<(String, String)>,
    /// Body bytes; empty when the request carried no body.
    pub body: Vec<u8>,
}

/// A response in the transport representation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// Reason phrase matching the status code.
    pub reason: &'static str,
    /// Header pairs in the order handlers set them.
    pub headers: Vec<(String, String)>,
    /// Body bytes; `None` for an empty (e.g. 204) response.
    pub body: Option<Vec<u8>>,
}

/// Reason phrase for a status code.
#[must_use]
pub fn status_reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "OK",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reason_phrases() {
        assert_eq!(status_reason(200), "OK");
        assert_eq!(status_reason(204), "No Content");
        assert_eq!(status_reason(404), "Not Found");
        assert_eq!(status_reason(500), "Internal Server Error");
    }
}
