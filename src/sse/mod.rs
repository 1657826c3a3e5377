//! Server-sent-event framing shared by the relay (encoding), the provider
//! client (decoding upstream deltas) and the stream consumer.

mod decoder;
mod frame;

pub use decoder::SseDecoder;
pub use frame::{parse_frame, Frame, Framing, StreamEvent, DATA_PREFIX, DONE};
