//! The listener and the server lifecycle.
//!
//! A [`Server`] moves through `Idle → Running → Stopped` exactly once. While
//! running it owns one accept loop, a pool of idle workers and one task per
//! accepted connection, all spawned on a single [`TaskTracker`] so that
//! [`Server::stop`] can wait for every one of them.

use std::io;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use nano_http::connection::HttpConnection;
use thiserror::Error;
use tokio::net::{TcpListener, TcpSocket, TcpStream};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info, trace, warn};

use crate::config::ServerConfig;
use crate::router::RouteTable;

/// Pause after a failed accept, so a persistent error such as fd exhaustion
/// doesn't spin the loop.
const ACCEPT_ERROR_BACKOFF: Duration = Duration::from_millis(10);

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("can't listen on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("server is already running")]
    AlreadyRunning,

    #[error("server has been stopped")]
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Idle,
    Running(SocketAddr),
    Stopped,
}

#[derive(Debug)]
pub struct Server {
    config: ServerConfig,
    routes: Arc<RouteTable>,
    lifecycle: Mutex<Lifecycle>,
    shutdown: CancellationToken,
    tracker: TaskTracker,
}

impl Server {
    pub fn new(config: ServerConfig, routes: RouteTable) -> Self {
        Self {
            config,
            routes: Arc::new(routes),
            lifecycle: Mutex::new(Lifecycle::Idle),
            shutdown: CancellationToken::new(),
            tracker: TaskTracker::new(),
        }
    }

    /// A server answering the built-in routes, with static files served from
    /// `config.static_root`.
    pub fn with_default_routes(config: ServerConfig) -> Self {
        let routes = RouteTable::with_default_routes(config.static_root.clone());
        Self::new(config, routes)
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// The bound address while running. With port `0` this carries the port
    /// the OS picked.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        match *self.lifecycle() {
            Lifecycle::Running(addr) => Some(addr),
            Lifecycle::Idle | Lifecycle::Stopped => None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.local_addr().is_some()
    }

    /// Binds, listens and starts accepting connections in the background.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// [`ServerError::Bind`] if the socket can't be bound or put into the
    /// listening state, [`ServerError::AlreadyRunning`] on a second call, and
    /// [`ServerError::Stopped`] once the server has been stopped.
    pub fn start(&self) -> Result<SocketAddr, ServerError> {
        let mut lifecycle = self.lifecycle();
        match *lifecycle {
            Lifecycle::Idle => {}
            Lifecycle::Running(_) => return Err(ServerError::AlreadyRunning),
            Lifecycle::Stopped => return Err(ServerError::Stopped),
        }

        let requested = self.config.socket_addr();
        let listener = listen(requested, self.config.backlog).map_err(|source| ServerError::Bind { addr: requested, source })?;
        let local_addr = listener.local_addr().map_err(|source| ServerError::Bind { addr: requested, source })?;

        let workers = self.config.worker_count();
        for id in 0..workers {
            let shutdown = self.shutdown.clone();
            self.tracker.spawn(async move {
                trace!(worker = id, "worker idle");
                shutdown.cancelled().await;
                trace!(worker = id, "worker exit");
            });
        }

        self.tracker.spawn(accept_loop(
            listener,
            Arc::clone(&self.routes),
            self.config.read_timeout,
            self.shutdown.clone(),
            self.tracker.clone(),
        ));

        *lifecycle = Lifecycle::Running(local_addr);
        info!(%local_addr, backlog = self.config.backlog, workers, "server listening");
        Ok(local_addr)
    }

    /// Stops accepting and waits until every in-flight connection has been
    /// served. Calling it again, or on a server that never started, only marks
    /// the server stopped.
    pub async fn stop(&self) {
        let previous = std::mem::replace(&mut *self.lifecycle(), Lifecycle::Stopped);
        if let Lifecycle::Running(local_addr) = previous {
            info!(%local_addr, "server stopping");
        }

        self.shutdown.cancel();
        self.tracker.close();
        self.tracker.wait().await;

        if let Lifecycle::Running(local_addr) = previous {
            info!(%local_addr, "server stopped");
        }
    }

    /// Starts the server, runs until `signal` completes, then stops it.
    ///
    /// # Errors
    ///
    /// Whatever [`Server::start`] fails with; the signal is not awaited then.
    pub async fn run_until<F>(&self, signal: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()>,
    {
        self.start()?;
        signal.await;
        self.stop().await;
        Ok(())
    }

    fn lifecycle(&self) -> MutexGuard<'_, Lifecycle> {
        self.lifecycle.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn listen(addr: SocketAddr, backlog: u32) -> io::Result<TcpListener> {
    let socket = match addr {
        SocketAddr::V4(_) => TcpSocket::new_v4()?,
        SocketAddr::V6(_) => TcpSocket::new_v6()?,
    };
    socket.set_reuseaddr(true)?;
    socket.bind(addr)?;
    socket.listen(backlog)
}

async fn accept_loop(
    listener: TcpListener,
    routes: Arc<RouteTable>,
    read_timeout: Duration,
    shutdown: CancellationToken,
    tracker: TaskTracker,
) {
    loop {
        let accepted = tokio::select! {
            biased;
            () = shutdown.cancelled() => break,
            accepted = listener.accept() => accepted,
        };

        let (tcp_stream, remote_addr) = match accepted {
            Ok(stream_and_addr) => stream_and_addr,
            Err(e) => {
                warn!(cause = %e, "failed to accept");
                tokio::time::sleep(ACCEPT_ERROR_BACKOFF).await;
                continue;
            }
        };

        tracker.spawn(serve_connection(tcp_stream, remote_addr, Arc::clone(&routes), read_timeout));
    }

    debug!("accept loop exit, listener closed");
}

async fn serve_connection(tcp_stream: TcpStream, remote_addr: SocketAddr, routes: Arc<RouteTable>, read_timeout: Duration) {
    debug!(%remote_addr, "accepted connection");

    let (reader, writer) = tcp_stream.into_split();
    let connection = HttpConnection::new(reader, writer).with_read_timeout(read_timeout);
    match connection.process(routes).await {
        Ok(()) => {
            debug!(%remote_addr, "finished process, connection shutdown");
        }
        Err(e) => {
            error!(%remote_addr, cause = %e, "connection failed, connection shutdown");
        }
    }
}
