//! Per-connection request handling.
//!
//! [`HttpConnection`] drives one accepted socket through
//! `Accepted → Reading → Parsed | ParseFailed → Dispatched → Responded → Closed`.
//! There is no keep-alive: every connection serves a single request and is
//! closed once the response is written.

mod http_connection;

pub use http_connection::ConnectionState;
pub use http_connection::DEFAULT_READ_TIMEOUT;
pub use http_connection::HttpConnection;
