use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use futures::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio_util::codec::{FramedRead, FramedWrite};
use tracing::{debug, error, trace, warn};

use crate::codec::{RequestDecoder, ResponseEncoder};
use crate::handler::Handler;
use crate::protocol::{HttpError, ParseError, Request, Response, SendError};

/// Initial capacity of the read buffer.
const READ_BUFFER_SIZE: usize = 4 * 1024;

/// How long a client may take to deliver its request.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(5);

/// Body of the response sent when nothing parseable arrived.
const INVALID_REQUEST: &str = "Invalid HTTP request";

/// Where a connection is in its single request/response exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Accepted,
    Reading,
    Parsed,
    ParseFailed,
    Dispatched,
    Responded,
    Closed,
}

/// One accepted connection, serving exactly one request.
///
/// The exchange runs strictly in order: read until the request boundary,
/// parse, dispatch to the handler, write the complete response, close. A read
/// error or timeout closes the connection without writing anything; an empty
/// request is answered with `400 Bad Request`.
///
/// # Type Parameters
///
/// * `R`: The async readable stream type
/// * `W`: The async writable stream type
#[derive(Debug)]
pub struct HttpConnection<R, W> {
    framed_read: FramedRead<R, RequestDecoder>,
    framed_write: FramedWrite<W, ResponseEncoder>,
    read_timeout: Duration,
    state: ConnectionState,
}

impl<R, W> HttpConnection<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            framed_read: FramedRead::with_capacity(reader, RequestDecoder::new(), READ_BUFFER_SIZE),
            framed_write: FramedWrite::new(writer, ResponseEncoder::new()),
            read_timeout: DEFAULT_READ_TIMEOUT,
            state: ConnectionState::Accepted,
        }
    }

    #[must_use]
    pub fn with_read_timeout(mut self, read_timeout: Duration) -> Self {
        self.read_timeout = read_timeout;
        self
    }

    /// Drives the connection to completion.
    ///
    /// # Errors
    ///
    /// Returns the read, timeout or write failure that ended the connection
    /// early. Request-level failures are answered on the wire instead.
    pub async fn process<H>(mut self, handler: Arc<H>) -> Result<(), HttpError>
    where
        H: Handler + ?Sized + 'static,
    {
        let result = self.do_process(handler).await;
        self.transition(ConnectionState::Closed);
        result
    }

    async fn do_process<H>(&mut self, handler: Arc<H>) -> Result<(), HttpError>
    where
        H: Handler + ?Sized + 'static,
    {
        self.transition(ConnectionState::Reading);
        let frame = self.read_frame().await?;

        let response = match Request::parse(&frame) {
            Ok(request) => {
                self.transition(ConnectionState::Parsed);
                debug!(method = %request.method(), path = request.path(), version = request.version(), "parsed request");

                self.transition(ConnectionState::Dispatched);
                dispatch(handler, request).await
            }
            Err(e) => {
                self.transition(ConnectionState::ParseFailed);
                warn!(cause = %e, "can't parse request");
                Response::bad_request(INVALID_REQUEST)
            }
        };

        debug!(status = response.status().as_u16(), body_size = response.body().len(), "sending response");
        // send flushes, so the whole response is on the wire before closing
        self.framed_write.send(response).await?;
        self.transition(ConnectionState::Responded);

        self.framed_write.get_mut().shutdown().await.map_err(SendError::io)?;
        Ok(())
    }

    async fn read_frame(&mut self) -> Result<Bytes, ParseError> {
        match tokio::time::timeout(self.read_timeout, self.framed_read.next()).await {
            Ok(Some(Ok(frame))) => Ok(frame),
            Ok(Some(Err(e))) => Err(e),
            // peer closed without sending anything
            Ok(None) => Ok(Bytes::new()),
            Err(_elapsed) => Err(ParseError::timeout(self.read_timeout)),
        }
    }

    fn transition(&mut self, next: ConnectionState) {
        trace!(from = ?self.state, to = ?next, "connection state");
        self.state = next;
    }
}

/// Runs the synchronous handler off the async workers; a panic becomes a 500.
async fn dispatch<H>(handler: Arc<H>, request: Request) -> Response
where
    H: Handler + ?Sized + 'static,
{
    let path = request.path().to_owned();
    match tokio::task::spawn_blocking(move || handler.call(&request)).await {
        Ok(response) => response,
        Err(e) => {
            error!(cause = %e, path = %path, "request handler failed");
            Response::internal_error("Internal Server Error")
        }
    }
}
