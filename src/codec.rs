//! Value serialization to and from raw slot bytes.

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors produced while encoding or decoding slot values.
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("failed to encode value: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("failed to decode stored bytes: {0}")]
    Decode(#[source] serde_json::Error),
}

/// JSON codec for slot values.
///
/// Total for every serde-representable value: scalars, strings, booleans,
/// nested records, and homogeneous lists of those. Decoding bytes that were
/// not produced by a matching encode returns [`CodecError::Decode`]; it never
/// panics. A decode failure is also how a violated key/type contract
/// surfaces when two keys with different value types alias the same slot.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl JsonCodec {
    pub fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, CodecError> {
        serde_json::to_vec(value).map_err(CodecError::Encode)
    }

    pub fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, CodecError> {
        serde_json::from_slice(bytes).map_err(CodecError::Decode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Nested {
        name: String,
        scores: Vec<u32>,
    }

    #[test]
    fn round_trips_nested_records() {
        let codec = JsonCodec;
        let value = Nested {
            name: "hish".to_string(),
            scores: vec![1, 2, 3],
        };

        let bytes = codec.encode(&value).expect("encode");
        let back: Nested = codec.decode(&bytes).expect("decode");

        assert_eq!(back, value);
    }

    #[test]
    fn garbage_bytes_fail_with_decode_error() {
        let codec = JsonCodec;
        let err = codec.decode::<Nested>(b"\x00\xff not json").expect_err("must fail");
        assert!(matches!(err, CodecError::Decode(_)));
    }

    #[test]
    fn mismatched_shape_fails_loudly_not_silently() {
        let codec = JsonCodec;
        let bytes = codec.encode(&42u32).expect("encode");
        let err = codec.decode::<Nested>(&bytes).expect_err("wrong type must fail");
        assert!(matches!(err, CodecError::Decode(_)));
    }
}
