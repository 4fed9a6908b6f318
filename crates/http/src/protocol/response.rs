//! HTTP response representation.
//!
//! A [`Response`] is built and mutated by a handler, then consumed once by the
//! [`ResponseEncoder`](crate::codec::ResponseEncoder). Headers keep insertion
//! order, which is also the order they are written to the wire.

use bytes::Bytes;
use indexmap::IndexMap;
use std::fmt;

use crate::protocol::FieldMap;

/// Value of the default `Server` header.
pub const SERVER_NAME: &str = "nano-http";

pub const CONTENT_TYPE: &str = "Content-Type";

/// The closed set of status codes the server produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCode {
    Ok,
    Created,
    NoContent,
    BadRequest,
    NotFound,
    MethodNotAllowed,
    InternalServerError,
    NotImplemented,
}

impl StatusCode {
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::Created => 201,
            StatusCode::NoContent => 204,
            StatusCode::BadRequest => 400,
            StatusCode::NotFound => 404,
            StatusCode::MethodNotAllowed => 405,
            StatusCode::InternalServerError => 500,
            StatusCode::NotImplemented => 501,
        }
    }

    /// The three-digit code as written in the status line.
    pub fn code_str(&self) -> &'static str {
        match self {
            StatusCode::Ok => "200",
            StatusCode::Created => "201",
            StatusCode::NoContent => "204",
            StatusCode::BadRequest => "400",
            StatusCode::NotFound => "404",
            StatusCode::MethodNotAllowed => "405",
            StatusCode::InternalServerError => "500",
            StatusCode::NotImplemented => "501",
        }
    }

    /// Reason phrase written in the status line.
    pub fn reason(&self) -> &'static str {
        http::StatusCode::from_u16(self.as_u16()).ok().and_then(|status| status.canonical_reason()).unwrap_or("Unknown")
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.as_u16(), self.reason())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    status: StatusCode,
    headers: FieldMap,
    body: Bytes,
}

impl Default for Response {
    fn default() -> Self {
        let mut headers = IndexMap::with_capacity(4);
        headers.insert("Server".to_owned(), SERVER_NAME.to_owned());
        headers.insert("Connection".to_owned(), "close".to_owned());
        Self { status: StatusCode::Ok, headers, body: Bytes::new() }
    }
}

/// An error response whose text body is the status reason phrase.
impl From<StatusCode> for Response {
    fn from(status: StatusCode) -> Self {
        Self::with_text(status, status.reason())
    }
}

impl Response {
    pub fn new() -> Self {
        Self::default()
    }

    /// `200 OK` with `body` and no content type. An empty body is left empty.
    pub fn ok(body: impl Into<Bytes>) -> Self {
        let mut response = Self::default();
        response.set_body(body);
        response
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::with_text(StatusCode::NotFound, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::with_text(StatusCode::BadRequest, message)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::with_text(StatusCode::InternalServerError, message)
    }

    fn with_text(status: StatusCode, message: impl Into<String>) -> Self {
        let mut response = Self::default();
        response.set_status(status);
        response.set_text_response(Into::<String>::into(message));
        response
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    pub fn headers(&self) -> &FieldMap {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Sets a header, overwriting any existing value with the same name.
    pub fn add_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.insert(name.into(), value.into());
    }

    pub fn set_content_type(&mut self, content_type: impl Into<String>) {
        self.add_header(CONTENT_TYPE, content_type);
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header(CONTENT_TYPE)
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn set_body(&mut self, body: impl Into<Bytes>) {
        self.body = body.into();
    }

    pub fn set_json_response(&mut self, json: impl Into<Bytes>) {
        self.set_body(json);
        self.set_content_type(mime::APPLICATION_JSON.to_string());
    }

    pub fn set_html_response(&mut self, html: impl Into<Bytes>) {
        self.set_body(html);
        self.set_content_type(mime::TEXT_HTML_UTF_8.to_string());
    }

    pub fn set_text_response(&mut self, text: impl Into<Bytes>) {
        self.set_body(text);
        self.set_content_type(mime::TEXT_PLAIN_UTF_8.to_string());
    }

    /// Consumes the response into its wire form.
    pub fn to_bytes(self) -> Bytes {
        crate::codec::encode_response(self)
    }
}
