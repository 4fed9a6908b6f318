//! HTTP request representation and parsing.
//!
//! [`Request::parse`] turns the raw bytes accumulated for one request into a
//! structured [`Request`]. Validation is intentionally weak: an incomplete
//! request line leaves the method, path and version at their zero values and
//! the parse still succeeds. Callers that need a usable request line check
//! [`Request::is_well_formed`].
//!
//! Header and query maps keep insertion order and are last-write-wins on
//! duplicate names. Header names are compared as received, without case folding.

use indexmap::IndexMap;

use crate::ensure;
use crate::protocol::{Method, ParseError};

/// Ordered name/value map used for headers and query parameters.
pub type FieldMap = IndexMap<String, String>;

/// A parsed HTTP request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Request {
    method: Method,
    path: String,
    version: String,
    headers: FieldMap,
    query_params: FieldMap,
    body: String,
    well_formed: bool,
}

impl Request {
    /// Parses one request from its raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Empty`] if `raw` holds no bytes. Every other input
    /// produces a request.
    pub fn parse(raw: &[u8]) -> Result<Self, ParseError> {
        ensure!(!raw.is_empty(), ParseError::Empty);

        let text = String::from_utf8_lossy(raw);
        let mut rest: &str = &text;
        let mut request = Request::default();

        if let Some(request_line) = next_line(&mut rest) {
            request.parse_request_line(request_line);
        }

        while let Some(line) = next_line(&mut rest) {
            if line.is_empty() || line == "\r" {
                break;
            }
            let line = line.strip_suffix('\r').unwrap_or(line);
            request.parse_header_line(line);
        }

        request.body = rest.strip_suffix('\n').unwrap_or(rest).to_owned();

        Ok(request)
    }

    fn parse_request_line(&mut self, line: &str) {
        let mut tokens = line.split_ascii_whitespace();
        let (Some(method), Some(target), Some(version)) = (tokens.next(), tokens.next(), tokens.next()) else {
            return;
        };

        self.method = Method::from_token(method);
        self.version = version.to_owned();
        self.well_formed = true;

        match target.split_once('?') {
            Some((path, query)) => {
                self.path = path.to_owned();
                self.parse_query(query);
            }
            None => self.path = target.to_owned(),
        }
    }

    fn parse_header_line(&mut self, line: &str) {
        if let Some((name, value)) = line.split_once(':') {
            self.headers.insert(trim_field(name).to_owned(), trim_field(value).to_owned());
        }
    }

    fn parse_query(&mut self, query: &str) {
        for segment in query.split('&') {
            if let Some((name, value)) = segment.split_once('=') {
                self.query_params.insert(name.to_owned(), value.to_owned());
            }
        }
    }

    pub fn method(&self) -> Method {
        self.method
    }

    /// Request path with the query component removed.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Protocol version token as received, e.g. `HTTP/1.1`.
    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn headers(&self) -> &FieldMap {
        &self.headers
    }

    /// Looks up a header by its exact, case-sensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    pub fn has_header(&self, name: &str) -> bool {
        self.headers.contains_key(name)
    }

    pub fn query_params(&self) -> &FieldMap {
        &self.query_params
    }

    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query_params.get(name).map(String::as_str)
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Whether the request line carried all of method, path and version.
    pub fn is_well_formed(&self) -> bool {
        self.well_formed
    }
}

/// Pops the next `\n`-terminated line off `rest`, without the terminator.
fn next_line<'a>(rest: &mut &'a str) -> Option<&'a str> {
    if rest.is_empty() {
        return None;
    }

    match rest.split_once('\n') {
        Some((line, remaining)) => {
            *rest = remaining;
            Some(line)
        }
        None => Some(std::mem::take(rest)),
    }
}

fn trim_field(field: &str) -> &str {
    field.trim_matches([' ', '\t'])
}
