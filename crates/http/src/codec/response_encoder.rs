//! Response serialization.
//!
//! The wire form is fully determined by the [`Response`]:
//!
//! ```text
//! HTTP/1.1 <code> <reason>\r\n
//! <name>: <value>\r\n        (one per header, in insertion order)
//! \r\n
//! <body>
//! ```
//!
//! The encoder adds nothing on its own; in particular no `Content-Length` is
//! injected, the connection is always closed after the response.

use bytes::{BufMut, Bytes, BytesMut};
use tokio_util::codec::Encoder;

use crate::protocol::{Response, SendError};

/// Initial buffer size reserved for the status line and headers
const INIT_HEADER_SIZE: usize = 1024;

#[derive(Debug, Default)]
pub struct ResponseEncoder;

impl ResponseEncoder {
    pub fn new() -> Self {
        Self
    }
}

impl Encoder<Response> for ResponseEncoder {
    type Error = SendError;

    fn encode(&mut self, item: Response, dst: &mut BytesMut) -> Result<(), Self::Error> {
        write_response(&item, dst);
        Ok(())
    }
}

/// Serializes a response into a fresh buffer.
pub(crate) fn encode_response(response: Response) -> Bytes {
    let mut dst = BytesMut::new();
    write_response(&response, &mut dst);
    dst.freeze()
}

fn write_response(response: &Response, dst: &mut BytesMut) {
    dst.reserve(INIT_HEADER_SIZE + response.body().len());

    let status = response.status();
    dst.put_slice(b"HTTP/1.1 ");
    dst.put_slice(status.code_str().as_bytes());
    dst.put_u8(b' ');
    dst.put_slice(status.reason().as_bytes());
    dst.put_slice(b"\r\n");

    for (name, value) in response.headers() {
        dst.put_slice(name.as_bytes());
        dst.put_slice(b": ");
        dst.put_slice(value.as_bytes());
        dst.put_slice(b"\r\n");
    }
    dst.put_slice(b"\r\n");
    dst.put_slice(response.body());
}
