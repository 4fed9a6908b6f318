//! HTTP request method handling.
//!
//! The method set is closed: every token that is not one of the six supported
//! methods maps to [`Method::Unknown`] instead of failing the parse.

use std::fmt;

/// The request method recognised by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Head,
    Options,
    /// Any token outside the supported set, or a missing request line.
    #[default]
    Unknown,
}

impl Method {
    /// Maps a request-line token to a method, ignoring ASCII case.
    pub fn from_token(token: &str) -> Self {
        const KNOWN: [(&str, Method); 6] = [
            ("GET", Method::Get),
            ("POST", Method::Post),
            ("PUT", Method::Put),
            ("DELETE", Method::Delete),
            ("HEAD", Method::Head),
            ("OPTIONS", Method::Options),
        ];

        KNOWN
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(token))
            .map_or(Method::Unknown, |(_, method)| *method)
    }

    /// Canonical upper-case name, as used by route bindings.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Head => "HEAD",
            Method::Options => "OPTIONS",
            Method::Unknown => "UNKNOWN",
        }
    }

    #[inline]
    pub fn is_unknown(&self) -> bool {
        matches!(self, Method::Unknown)
    }
}

impl From<&str> for Method {
    fn from(token: &str) -> Self {
        Method::from_token(token)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn match_ignore_case() {
        assert_eq!(Method::from_token("GET"), Method::Get);
        assert_eq!(Method::from_token("get"), Method::Get);
        assert_eq!(Method::from_token("pOsT"), Method::Post);
        assert_eq!(Method::from_token("Options"), Method::Options);
        assert_eq!(Method::from_token("delete"), Method::Delete);
    }

    #[test]
    fn unsupported_is_unknown() {
        assert_eq!(Method::from_token("PATCH"), Method::Unknown);
        assert_eq!(Method::from_token("CONNECT"), Method::Unknown);
        assert_eq!(Method::from_token(""), Method::Unknown);
        assert!(Method::from_token("GETS").is_unknown());
    }

    #[test]
    fn canonical_names() {
        assert_eq!(Method::Head.as_str(), "HEAD");
        assert_eq!(Method::Unknown.to_string(), "UNKNOWN");
        assert_eq!(Method::from("put").as_str(), "PUT");
    }
}
