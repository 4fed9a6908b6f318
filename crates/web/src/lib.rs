//! Routing, built-in routes and the listener for `nano-http`.
//!
//! ```no_run
//! use nano_web::{Server, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), nano_web::ServerError> {
//!     let server = Server::with_default_routes(ServerConfig::default().with_port(3000));
//!     server.run_until(async { tokio::signal::ctrl_c().await.unwrap_or_default() }).await
//! }
//! ```

pub mod config;
pub mod router;
pub mod routes;
pub mod server;

pub use config::ServerConfig;
pub use router::{RouteBinding, RouteTable};
pub use server::{Server, ServerError};
