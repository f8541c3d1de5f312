//! Response builder.

use serde_json::Value;

use crate::http::{status_reason, RawResponse};
use crate::web::Headers;

/// A response under construction by a handler.
///
/// Defaults to status 200 with no headers. A textual body implies
/// `Content-Type: text/plain` and a JSON body `Content-Type:
/// application/json`, in both cases only when the handler did not set an
/// explicit content type. Once returned to the dispatcher the response is
/// not touched again.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    status: u16,
    headers: Headers,
    body: Option<Vec<u8>>,
}

impl Response {
    /// A 200 response with a plain-text body.
    #[must_use]
    pub fn text(body: impl Into<String>) -> Self {
        let mut headers = Headers::new();
        headers.set("Content-Type", "text/plain");
        Response {
            status: 200,
            headers,
            body: Some(body.into().into_bytes()),
        }
    }

    /// A 200 response with a JSON body.
    #[must_use]
    pub fn json(body: Value) -> Self {
        let mut headers = Headers::new();
        headers.set("Content-Type", "application/json");
        Response {
            status: 200,
            headers,
            body: Some(body.to_string().into_bytes()),
        }
    }

    /// A 200 response with a raw byte body and no implied content type.
    #[must_use]
    pub fn bytes(body: Vec<u8>) -> Self {
        Response {
            status: 200,
            headers: Headers::new(),
            body: Some(body),
        }
    }

    /// A bodiless response with the given status.
    #[must_use]
    pub fn empty(status: u16) -> Self {
        Response {
            status,
            headers: Headers::new(),
            body: None,
        }
    }

    /// Replace the status code.
    #[must_use]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// Set a header, overriding any implied default under the same name.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.set(name, value);
        self
    }

    /// Status code.
    #[must_use]
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Response headers.
    #[must_use]
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Shorthand for a case-insensitive header lookup.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// Body bytes, if any.
    #[must_use]
    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    /// Serialize into the transport representation.
    #[must_use]
    pub fn into_raw(self) -> RawResponse {
        RawResponse {
            reason: status_reason(self.status),
            status: self.status,
            headers: self
                .headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            body: self.body,
        }
    }
}
