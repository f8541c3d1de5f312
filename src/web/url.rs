//! Absolute URL parsing exposed with WHATWG component names.

use crate::error::{Error, Result};

/// A parsed absolute URL.
///
/// Thin wrapper over [`url::Url`] exposing the component accessors that
/// handlers observe: `protocol`, `hostname`, `port`, `pathname`, `search`,
/// `hash`, and `search_params`.
#[derive(Debug, Clone, PartialEq)]
pub struct Url {
    inner: url::Url,
}

impl Url {
    /// Parse an absolute URL string.
    pub fn parse(input: &str) -> Result<Self> {
        let inner = url::Url::parse(input).map_err(Error::from)?;
        Ok(Url { inner })
    }

    /// Scheme with trailing colon, e.g. `"http:"`.
    #[must_use]
    pub fn protocol(&self) -> String {
        format!("{}:", self.inner.scheme())
    }

    /// Host name without port, or `""` when the URL has no host.
    #[must_use]
    pub fn hostname(&self) -> &str {
        self.inner.host_str().unwrap_or("")
    }

    /// Explicit port as a string, or `""` when absent.
    ///
    /// The scheme's default port (e.g. 80 for `http`) counts as absent,
    /// matching browser `URL` behavior.
    #[must_use]
    pub fn port(&self) -> String {
        self.inner
            .port()
            .map(|p| p.to_string())
            .unwrap_or_default()
    }

    /// Path component, always starting with `/`.
    #[must_use]
    pub fn pathname(&self) -> &str {
        self.inner.path()
    }

    /// Query string including the leading `?`, or `""` when absent.
    #[must_use]
    pub fn search(&self) -> String {
        match self.inner.query() {
            Some(q) => format!("?{q}"),
            None => String::new(),
        }
    }

    /// Fragment including the leading `#`, or `""` when absent.
    #[must_use]
    pub fn hash(&self) -> String {
        match self.inner.fragment() {
            Some(f) => format!("#{f}"),
            None => String::new(),
        }
    }

    /// Decoded query parameters in document order.
    #[must_use]
    pub fn search_params(&self) -> SearchParams {
        SearchParams {
            pairs: self.inner.query_pairs().into_owned().collect(),
        }
    }
}

/// Decoded query-string parameters.
///
/// Preserves document order so that [`SearchParams::get`] can return the
/// first occurrence of a repeated key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchParams {
    pairs: Vec<(String, String)>,
}

impl SearchParams {
    /// First value recorded under `name`, or `None` when unset.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// All values recorded under `name`, in document order.
    #[must_use]
    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// Iterate over `(name, value)` pairs in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn components() {
        let u = Url::parse("http://example.com:8080/path?foo=bar&baz=1#frag")
            .expect("parse URL");
        assert_eq!(u.protocol(), "http:");
        assert_eq!(u.hostname(), "example.com");
        assert_eq!(u.port(), "8080");
        assert_eq!(u.pathname(), "/path");
        assert_eq!(u.search(), "?foo=bar&baz=1");
        assert_eq!(u.hash(), "#frag");
    }

    #[test]
    fn default_port_is_elided() {
        let u = Url::parse("http://example.com/").expect("parse URL");
        assert_eq!(u.port(), "");
        assert_eq!(u.search(), "");
        assert_eq!(u.hash(), "");
    }

    #[test]
    fn search_params_first_occurrence_wins() {
        let u = Url::parse("http://example.com/path?a=1&b=2&a=3").expect("parse URL");
        let sp = u.search_params();
        assert_eq!(sp.get("a"), Some("1"));
        assert_eq!(sp.get("b"), Some("2"));
        assert_eq!(sp.get("missing"), None);
        assert_eq!(sp.get_all("a"), vec!["1", "3"]);
    }
}
