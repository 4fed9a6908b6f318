//! Wire codecs for the connection handler.
//!
//! - [`RequestDecoder`]: finds the request boundary in the incoming byte stream
//! - [`ResponseEncoder`]: serializes a [`Response`](crate::protocol::Response)
//!
//! Both plug into `tokio_util::codec::{FramedRead, FramedWrite}`.

mod request_decoder;
mod response_encoder;

pub use request_decoder::RequestDecoder;
pub use response_encoder::ResponseEncoder;
pub(crate) use response_encoder::encode_response;
