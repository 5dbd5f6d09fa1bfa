use std::collections::HashMap;
use std::fmt;

use ahash::RandomState;
use compact_str::CompactString;
use derive_more::Deref;

use crate::infrastructure::server_impl::parser::CRLF;

pub type HeaderMap = HashMap<String, String, RandomState>;

/// Header names mapped to their values, exactly as they were parsed.
///
/// Names are not case normalised. A repeated name keeps the value seen last.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deref)]
pub struct Headers(HeaderMap);

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` under `name`, returning the value it replaced.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(name.into(), value.into())
    }

    /// Looks a header up ignoring ASCII case.
    ///
    /// When several stored names only differ in case, any one of them may
    /// be returned.
    pub fn get_ignore_case(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| unicase::eq_ascii(key.as_str(), name))
            .map(|(_, value)| value.as_str())
    }

    /// Returns the headers ordered by name.
    pub fn sorted(&self) -> Vec<(&str, &str)> {
        let mut pairs: Vec<_> = self
            .0
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
            .collect();
        pairs.sort_unstable();
        pairs
    }
}

impl<K, V> FromIterator<(K, V)> for Headers
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        for (name, value) in iter {
            headers.insert(name, value);
        }
        headers
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: CompactString,
    pub path: String,
    pub version: CompactString,
    pub headers: Headers,
    pub body: String,
}

/// Writes the request back in wire form, headers ordered by name.
impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}{CRLF}", self.method, self.path, self.version)?;
        for (name, value) in self.headers.sorted() {
            write!(f, "{name}: {value}{CRLF}")?;
        }
        write!(f, "{CRLF}{}", self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::server_impl::parser::parse_http;

    fn sample() -> Request {
        Request {
            method: "POST".into(),
            path: "/submit".to_string(),
            version: "HTTP/1.1".into(),
            headers: [("Host", "example.com"), ("Content-Type", "text/plain")]
                .into_iter()
                .collect(),
            body: "first\r\n\r\nsecond".to_string(),
        }
    }

    #[test]
    fn success_display_wire_shape() {
        assert_eq!(
            sample().to_string(),
            "POST /submit HTTP/1.1\r\nContent-Type: text/plain\r\nHost: example.com\r\n\r\nfirst\r\n\r\nsecond"
        );
    }

    #[test]
    fn success_display_then_parse_is_identity() {
        let request = sample();
        let reparsed = parse_http(&request.to_string()).unwrap();
        assert_eq!(reparsed, request);

        let bare = Request {
            method: "DELETE".into(),
            path: "/item/7".to_string(),
            version: "HTTP/1.0".into(),
            headers: Headers::new(),
            body: String::new(),
        };
        assert_eq!(parse_http(&bare.to_string()).unwrap(), bare);
    }

    #[test]
    fn success_lookup_ignoring_case() {
        let request = sample();
        assert_eq!(request.headers.get("host"), None);
        assert_eq!(request.headers.get_ignore_case("host"), Some("example.com"));
        assert_eq!(
            request.headers.get_ignore_case("CONTENT-TYPE"),
            Some("text/plain")
        );
        assert_eq!(request.headers.get_ignore_case("accept"), None);
    }

    #[test]
    fn success_insert_replaces() {
        let mut headers = Headers::new();
        assert_eq!(headers.insert("A", "1"), None);
        assert_eq!(headers.insert("A", "2"), Some("1".to_string()));
        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("A").map(String::as_str), Some("2"));
    }
}
