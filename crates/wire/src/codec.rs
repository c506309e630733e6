//! Deterministic message encoding.
//!
//! All payloads use bincode with fixed-width little-endian integers. Trailing
//! bytes after a value are an error, and decoding never allocates past
//! [`MAX_FRAME_SIZE`].

use bincode::Options;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Result, WireError};
use crate::frame::MAX_FRAME_SIZE;
use crate::protocol::{PingRequest, PingResponse};

fn options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_little_endian()
        .reject_trailing_bytes()
}

/// Encode any wire value.
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    let bytes = options().serialize(value)?;
    if bytes.len() > MAX_FRAME_SIZE {
        return Err(WireError::FrameTooLarge { size: bytes.len() });
    }
    Ok(bytes)
}

/// Decode any wire value, rejecting truncated input and trailing bytes.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    Ok(options()
        .with_limit(MAX_FRAME_SIZE as u64)
        .deserialize(bytes)?)
}

pub fn encode_request(request: &PingRequest) -> Result<Vec<u8>> {
    encode(request)
}

pub fn decode_request(bytes: &[u8]) -> Result<PingRequest> {
    decode(bytes)
}

pub fn encode_response(response: &PingResponse) -> Result<Vec<u8>> {
    encode(response)
}

pub fn decode_response(bytes: &[u8]) -> Result<PingResponse> {
    decode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::RequestEnvelope;
    use corelib::NodeId;

    #[test]
    fn test_request_layout_is_fixed_width() {
        let bytes = encode_request(&PingRequest {
            sender_id: NodeId(2),
        })
        .unwrap();
        assert_eq!(bytes, 2i64.to_le_bytes().to_vec());
    }

    #[test]
    fn test_response_layout_is_length_prefixed_string() {
        let bytes = encode_response(&PingResponse {
            message: "hi".to_string(),
        })
        .unwrap();
        let mut expected = 2u64.to_le_bytes().to_vec();
        expected.extend_from_slice(b"hi");
        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_truncated_request_is_malformed() {
        let err = decode_request(&[1, 2, 3]).unwrap_err();
        assert!(matches!(err, WireError::Malformed(_)));
        assert!(err.is_malformed());
    }

    #[test]
    fn test_trailing_bytes_are_rejected() {
        let mut bytes = encode_request(&PingRequest {
            sender_id: NodeId(1),
        })
        .unwrap();
        bytes.push(0);
        assert!(matches!(decode_request(&bytes), Err(WireError::Malformed(_))));
    }

    #[test]
    fn test_string_length_beyond_input_is_malformed() {
        // Claims a 1000-byte message but carries none of it.
        let bytes = 1000u64.to_le_bytes();
        assert!(decode_response(&bytes).unwrap_err().is_malformed());
    }

    #[test]
    fn test_invalid_utf8_is_malformed() {
        let mut bytes = 2u64.to_le_bytes().to_vec();
        bytes.extend_from_slice(&[0xff, 0xfe]);
        assert!(matches!(decode_response(&bytes), Err(WireError::Malformed(_))));
    }

    #[test]
    fn test_envelope_decoded_as_wrong_type_is_malformed() {
        let envelope = RequestEnvelope::new("Node.Ping", 9, vec![1, 2, 3]);
        let bytes = encode(&envelope).unwrap();
        assert!(decode_request(&bytes).is_err());
    }
}
