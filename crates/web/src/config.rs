//! Server configuration.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;

use nano_http::connection::DEFAULT_READ_TIMEOUT;

pub const DEFAULT_PORT: u16 = 8080;

/// Listen backlog, the only bound on pending connections.
pub const DEFAULT_BACKLOG: u32 = 100;

/// Idle worker count when the host's parallelism can't be determined.
const FALLBACK_WORKERS: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_address: IpAddr,
    pub port: u16,
    pub backlog: u32,
    pub read_timeout: Duration,
    /// Size of the idle worker pool; `None` sizes it to the host's parallelism.
    pub workers: Option<usize>,
    /// Directory served under `/static`.
    pub static_root: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            backlog: DEFAULT_BACKLOG,
            read_timeout: DEFAULT_READ_TIMEOUT,
            workers: None,
            static_root: PathBuf::from("."),
        }
    }
}

impl ServerConfig {
    #[must_use]
    pub fn with_bind_address(mut self, bind_address: IpAddr) -> Self {
        self.bind_address = bind_address;
        self
    }

    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    #[must_use]
    pub fn with_backlog(mut self, backlog: u32) -> Self {
        self.backlog = backlog;
        self
    }

    #[must_use]
    pub fn with_read_timeout(mut self, read_timeout: Duration) -> Self {
        self.read_timeout = read_timeout;
        self
    }

    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    #[must_use]
    pub fn with_static_root(mut self, static_root: impl Into<PathBuf>) -> Self {
        self.static_root = static_root.into();
        self
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_address, self.port)
    }

    pub fn worker_count(&self) -> usize {
        self.workers
            .unwrap_or_else(|| std::thread::available_parallelism().map_or(FALLBACK_WORKERS, NonZeroUsize::get))
    }
}
