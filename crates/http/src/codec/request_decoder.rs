//! Request boundary detection.
//!
//! The [`RequestDecoder`] accumulates bytes until the end of the header section
//! (`\r\n\r\n`) shows up, then yields everything read so far as one frame. No
//! `Content-Length` driven read happens: a body is only as complete as whatever
//! arrived together with the header terminator.
//!
//! # Example
//!
//! ```
//! use bytes::BytesMut;
//! use nano_http::codec::RequestDecoder;
//! use tokio_util::codec::Decoder;
//!
//! let mut decoder = RequestDecoder::new();
//! let mut buffer = BytesMut::from("GET / HTTP/1.1\r\nHost: a\r\n");
//! assert!(decoder.decode(&mut buffer).unwrap().is_none());
//!
//! buffer.extend_from_slice(b"\r\n");
//! let frame = decoder.decode(&mut buffer).unwrap().unwrap();
//! assert!(frame.ends_with(b"\r\n\r\n"));
//! ```

use bytes::{Bytes, BytesMut};
use tokio_util::codec::Decoder;
use tracing::trace;

use crate::protocol::ParseError;

const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";

/// Splits a byte stream at the first request boundary.
///
/// The decoder remembers how far it has already scanned, so feeding it many
/// small reads does not rescan the accumulated prefix.
#[derive(Debug, Default)]
pub struct RequestDecoder {
    scanned: usize,
}

impl RequestDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    fn take_frame(&mut self, src: &mut BytesMut) -> Bytes {
        self.scanned = 0;
        src.split().freeze()
    }
}

impl Decoder for RequestDecoder {
    type Item = Bytes;
    type Error = ParseError;

    /// Returns the accumulated bytes once they contain `\r\n\r\n`.
    ///
    /// - `Ok(Some(frame))`: the header terminator was seen, `frame` is the whole buffer
    /// - `Ok(None)`: need more data
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        // resume a few bytes back, the terminator may straddle two reads
        let start = self.scanned.saturating_sub(HEADER_TERMINATOR.len() - 1);

        let found = src[start..].windows(HEADER_TERMINATOR.len()).any(|window| window == HEADER_TERMINATOR);
        if !found {
            self.scanned = src.len();
            return Ok(None);
        }

        trace!(frame_size = src.len(), "found request boundary");
        Ok(Some(self.take_frame(src)))
    }

    /// Called once the peer stopped sending: whatever arrived is the request.
    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if let Some(frame) = self.decode(src)? {
            return Ok(Some(frame));
        }

        if src.is_empty() {
            return Ok(None);
        }

        trace!(frame_size = src.len(), "peer closed before request boundary");
        Ok(Some(self.take_frame(src)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn need_more_data() {
        let mut decoder = RequestDecoder::new();
        let mut buf = BytesMut::from("GET / HTTP/1.1\r\nHost: 127.0.0.1\r\n");

        assert!(decoder.decode(&mut buf).unwrap().is_none());
        assert_eq!(buf.len(), 33);
    }

    #[test]
    fn frame_includes_early_body() {
        let mut decoder = RequestDecoder::new();
        let mut buf = BytesMut::from("POST /echo HTTP/1.1\r\nContent-Length: 3\r\n\r\nabc");

        let frame = decoder.decode(&mut buf).unwrap().unwrap();

        assert!(frame.ends_with(b"\r\n\r\nabc"));
        assert!(buf.is_empty());
    }

    #[test]
    fn terminator_split_across_reads() {
        let mut decoder = RequestDecoder::new();
        let mut buf = BytesMut::from("GET / HTTP/1.1\r\n\r");
        assert!(decoder.decode(&mut buf).unwrap().is_none());

        buf.extend_from_slice(b"\n");
        let frame = decoder.decode(&mut buf).unwrap().unwrap();
        assert_eq!(&frame[..], b"GET / HTTP/1.1\r\n\r\n");
    }

    #[test]
    fn byte_by_byte() {
        let input = b"GET /health HTTP/1.1\r\nHost: x\r\n\r\n";
        let mut decoder = RequestDecoder::new();
        let mut buf = BytesMut::new();

        let mut frames = Vec::new();
        for byte in input {
            buf.extend_from_slice(&[*byte]);
            if let Some(frame) = decoder.decode(&mut buf).unwrap() {
                frames.push(frame);
            }
        }

        assert_eq!(frames.len(), 1);
        assert_eq!(&frames[0][..], &input[..]);
    }

    #[test]
    fn eof_yields_partial_request() {
        let mut decoder = RequestDecoder::new();
        let mut buf = BytesMut::from("GET /partial HTTP/1.1\r\n");

        assert!(decoder.decode(&mut buf).unwrap().is_none());
        let frame = decoder.decode_eof(&mut buf).unwrap().unwrap();
        assert_eq!(&frame[..], b"GET /partial HTTP/1.1\r\n");
    }

    #[test]
    fn eof_on_empty_buffer() {
        let mut decoder = RequestDecoder::new();
        let mut buf = BytesMut::new();

        assert!(decoder.decode_eof(&mut buf).unwrap().is_none());
    }
}
