//! Request handler abstraction.
//!
//! A handler is a synchronous function from [`Request`] to [`Response`]. The
//! connection handler runs it on tokio's blocking pool, so implementations are
//! free to touch the filesystem.

use std::fmt;

use crate::protocol::{Request, Response};

pub trait Handler: Send + Sync {
    fn call(&self, req: &Request) -> Response;
}

/// Wraps a closure or fn item as a [`Handler`].
pub struct HandlerFn<F> {
    f: F,
}

impl<F> fmt::Debug for HandlerFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerFn").finish_non_exhaustive()
    }
}

impl<F> Handler for HandlerFn<F>
where
    F: Fn(&Request) -> Response + Send + Sync,
{
    fn call(&self, req: &Request) -> Response {
        (self.f)(req)
    }
}

pub fn make_handler<F>(f: F) -> HandlerFn<F>
where
    F: Fn(&Request) -> Response + Send + Sync,
{
    HandlerFn { f }
}

impl<H: Handler + ?Sized> Handler for std::sync::Arc<H> {
    fn call(&self, req: &Request) -> Response {
        (**self).call(req)
    }
}
