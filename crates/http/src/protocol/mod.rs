//! Core HTTP protocol types.
//!
//! - [`Request`]: a parsed request, produced by [`Request::parse`]
//! - [`Method`]: the closed set of supported request methods
//! - [`Response`] / [`StatusCode`]: what handlers return
//! - [`HttpError`], [`ParseError`], [`SendError`]: per-connection errors
//!
//! These types carry no I/O. Framing and serialization live in [`crate::codec`],
//! the per-socket state machine in [`crate::connection`].

mod method;
pub use method::Method;

mod request;
pub use request::FieldMap;
pub use request::Request;

mod response;
pub use response::Response;
pub use response::StatusCode;
pub use response::CONTENT_TYPE;
pub use response::SERVER_NAME;

mod error;
pub use error::HttpError;
pub use error::ParseError;
pub use error::SendError;
