//! Case-insensitive, insertion-ordered header map.

use std::fmt;

/// An ordered collection of header name/value pairs.
///
/// Lookup is case-insensitive per RFC 7230; the name's original casing is
/// preserved for serialization. Insertion order is kept so that responses
/// serialize headers in the order handlers set them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    /// Create an empty header map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a header value by name, case-insensitively.
    ///
    /// Returns `None` when the header is not present; never fails.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Whether a header with the given name is present.
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Set a header, replacing any existing value under the same name.
    ///
    /// A replaced header keeps its position and original name casing.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self
            .entries
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(&name))
        {
            Some((_, v)) => *v = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Remove a header by name. Removing an absent header is a no-op.
    ///
    /// Returns `true` if a header was removed.
    pub fn delete(&mut self, name: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.entries.len() != before
    }

    /// Iterate over `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of headers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for Headers {
    fn from_iter<T: IntoIterator<Item = (N, V)>>(iter: T) -> Self {
        let mut headers = Headers::new();
        for (name, value) in iter {
            headers.set(name, value);
        }
        headers
    }
}

impl fmt::Display for Headers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in self.iter() {
            writeln!(f, "{name}: {value}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_is_case_insensitive() {
        let mut h = Headers::new();
        h.set("X-Foo", "bar");
        assert_eq!(h.get("x-foo"), Some("bar"));
        assert_eq!(h.get("X-FOO"), Some("bar"));
        assert_eq!(h.get("X-Bar"), None);
    }

    #[test]
    fn set_replaces_in_place() {
        let mut h = Headers::new();
        h.set("A", "1");
        h.set("B", "2");
        h.set("a", "3");
        assert_eq!(h.len(), 2);
        let pairs: Vec<_> = h.iter().collect();
        assert_eq!(pairs, vec![("A", "3"), ("B", "2")]);
    }

    #[test]
    fn delete_then_has() {
        let mut h = Headers::new();
        h.set("X-Baz", "qux");
        assert!(h.has("x-baz"));
        assert!(h.delete("X-BAZ"));
        assert!(!h.has("X-Baz"));
        assert!(!h.delete("X-Baz"));
    }
}
