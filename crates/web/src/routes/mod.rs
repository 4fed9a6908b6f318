//! Built-in route handlers.
//!
//! Each handler is a plain function (or small struct) from request to response;
//! [`RouteTable::with_default_routes`](crate::RouteTable::with_default_routes)
//! wires them up.

mod echo;
mod health;
mod root;
mod static_files;

pub use echo::echo;
pub use health::Health;
pub use root::root;
pub use static_files::StaticFiles;
