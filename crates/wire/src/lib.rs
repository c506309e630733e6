//! Wire protocol for node-to-node calls.
//!
//! This crate provides the protocol and codecs for one call:
//! - Typed messages (`PingRequest`, `PingResponse`) and the envelopes that
//!   carry them
//! - Deterministic bincode encoding
//! - Length-prefixed framing over any async byte stream

pub mod codec;
pub mod error;
pub mod frame;
pub mod protocol;

pub use codec::{decode, decode_request, decode_response, encode, encode_request, encode_response};
pub use error::{Result, WireError};
pub use frame::{read_frame, write_frame, MAX_FRAME_SIZE};
pub use protocol::{PingRequest, PingResponse, RequestEnvelope, ResponseEnvelope, PING_METHOD};
