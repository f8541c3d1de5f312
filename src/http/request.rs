//! Immutable-on-read request view handed to handlers.

use http::Method;

use crate::error::{Error, Result};
use crate::http::RawRequest;
use crate::router::ParamVec;
use crate::web::Headers;

/// An incoming request as seen by a handler.
///
/// The method, URL, headers, and path parameters are fixed once the
/// request reaches the handler. The body is held as raw bytes and decoded
/// lazily: [`Request::text`] and [`Request::json`] may be called any
/// number of times and always operate on the same underlying buffer.
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    url: String,
    path: String,
    query: Option<String>,
    hash: Option<String>,
    headers: Headers,
    params: ParamVec,
    body: Vec<u8>,
}

impl Request {
    /// Build the request model from the transport representation.
    ///
    /// The URL is split into path, query, and fragment here; path
    /// parameters stay empty until the router binds them at match time.
    pub(crate) fn from_raw(raw: RawRequest) -> Self {
        // Method tokens the http crate rejects outright (non-token bytes)
        // fall back to GET; they cannot match any registered route anyway.
        let method = Method::from_bytes(raw.method.as_bytes()).unwrap_or(Method::GET);
        let (path, query, hash) = split_target(&raw.url);
        Request {
            method,
            path,
            query,
            hash,
            url: raw.url,
            headers: raw.headers.into_iter().collect(),
            params: ParamVec::new(),
            body: raw.body,
        }
    }

    pub(crate) fn bind_params(&mut self, params: ParamVec) {
        self.params = params;
    }

    /// HTTP method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Raw request target as received from the transport.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Path component of the request target.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Query string without the leading `?`, if present.
    #[must_use]
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Fragment without the leading `#`, if present.
    #[must_use]
    pub fn hash(&self) -> Option<&str> {
        self.hash.as_deref()
    }

    /// Request headers.
    #[must_use]
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Shorthand for a case-insensitive header lookup.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// Path parameter bound by the matched route pattern.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// All path parameters in pattern order.
    #[must_use]
    pub fn params(&self) -> &ParamVec {
        &self.params
    }

    /// First value of a query parameter, form-decoded.
    #[must_use]
    pub fn query_param(&self, name: &str) -> Option<String> {
        let query = self.query.as_deref()?;
        url::form_urlencoded::parse(query.as_bytes())
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
    }

    /// Raw body bytes.
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Body decoded as UTF-8 text.
    ///
    /// Invalid sequences are replaced rather than failing; repeated calls
    /// return the same result.
    #[must_use]
    pub fn text(&self) -> String {
        crate::web::encoding::decode(&self.body)
    }

    /// Body parsed as JSON.
    ///
    /// Fails with [`Error::BodyParse`] on invalid JSON. Repeated calls
    /// re-parse the same buffer and return consistent results.
    pub fn json(&self) -> Result<serde_json::Value> {
        serde_json::from_slice(&self.body).map_err(Error::from)
    }
}

impl From<RawRequest> for Request {
    fn from(raw: RawRequest) -> Self {
        Request::from_raw(raw)
    }
}

/// Split a request target into path, query, and fragment.
fn split_target(target: &str) -> (String, Option<String>, Option<String>) {
    let (before_hash, hash) = match target.split_once('#') {
        Some((b, h)) => (b, Some(h.to_string())),
        None => (target, None),
    };
    let (path, query) = match before_hash.split_once('?') {
        Some((p, q)) => (p, Some(q.to_string())),
        None => (before_hash, None),
    };
    (path.to_string(), query, hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(method: &str, url: &str, body: &[u8]) -> RawRequest {
        RawRequest {
            method: method.to_string(),
            url: url.to_string(),
            headers: vec![("Content-Type".to_string(), "text/plain".to_string())],
            body: body.to_vec(),
        }
    }

    #[test]
    fn splits_target_components() {
        let req = Request::from_raw(raw("GET", "/users/42?debug=1&x=2#top", b""));
        assert_eq!(req.path(), "/users/42");
        assert_eq!(req.query(), Some("debug=1&x=2"));
        assert_eq!(req.hash(), Some("top"));
        assert_eq!(req.url(), "/users/42?debug=1&x=2#top");
        assert_eq!(req.query_param("debug"), Some("1".to_string()));
        assert_eq!(req.query_param("missing"), None);
    }

    #[test]
    fn header_lookup_is_case_insensitive() {
        let req = Request::from_raw(raw("GET", "/", b""));
        assert_eq!(req.header("content-type"), Some("text/plain"));
    }

    #[test]
    fn json_is_idempotent() {
        let req = Request::from_raw(raw("POST", "/json", br#"{"name":"ada"}"#));
        for _ in 0..2 {
            let value = req.json().expect("valid body");
            assert_eq!(value["name"], "ada");
        }
        assert_eq!(req.text(), r#"{"name":"ada"}"#);
    }

    #[test]
    fn json_on_garbage_is_a_parse_error() {
        let req = Request::from_raw(raw("POST", "/json", b"not-json"));
        assert!(matches!(req.json(), Err(Error::BodyParse(_))));
    }
}
