//! A minimal HTTP/1.1 server core
//!
//! This crate provides the protocol half of a small, connection-per-request
//! HTTP/1.1 server built on top of tokio: a forgiving request parser, a
//! deterministic response builder, and the per-connection state machine that
//! ties them to a socket. Routing and the listener live in `nano-web`.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use tokio::net::TcpListener;
//! use tracing::{error, info, warn};
//! use nano_http::connection::HttpConnection;
//! use nano_http::handler::make_handler;
//! use nano_http::protocol::{Request, Response};
//!
//! #[tokio::main]
//! async fn main() {
//!     let tcp_listener = match TcpListener::bind("127.0.0.1:8080").await {
//!         Ok(tcp_listener) => tcp_listener,
//!         Err(e) => {
//!             error!(cause = %e, "bind server error");
//!             return;
//!         }
//!     };
//!
//!     let handler = Arc::new(make_handler(hello_world));
//!
//!     loop {
//!         let (tcp_stream, _remote_addr) = match tcp_listener.accept().await {
//!             Ok(stream_and_addr) => stream_and_addr,
//!             Err(e) => {
//!                 warn!(cause = %e, "failed to accept");
//!                 continue;
//!             }
//!         };
//!
//!         let handler = handler.clone();
//!         tokio::spawn(async move {
//!             let (reader, writer) = tcp_stream.into_split();
//!             if let Err(e) = HttpConnection::new(reader, writer).process(handler).await {
//!                 error!(cause = %e, "connection failed");
//!             }
//!         });
//!     }
//! }
//!
//! fn hello_world(request: &Request) -> Response {
//!     info!(path = request.path(), "request");
//!     let mut response = Response::new();
//!     response.set_text_response("Hello World!\r\n");
//!     response
//! }
//! ```
//!
//! # Architecture
//!
//! - [`protocol`]: [`Request`](protocol::Request), [`Response`](protocol::Response) and error types
//! - [`codec`]: request boundary detection and response serialization
//! - [`connection`]: the per-socket state machine
//! - [`handler`]: the [`Handler`](handler::Handler) trait
//!
//! # Limitations
//!
//! - One request per connection, no keep-alive or pipelining
//! - No chunked transfer encoding, no `Expect: 100-continue`
//! - The request body is whatever arrived with the end of the headers
//! - No TLS (use a reverse proxy for HTTPS)

pub mod codec;
pub mod connection;
pub mod handler;
pub mod protocol;

mod utils;
pub(crate) use utils::ensure;
