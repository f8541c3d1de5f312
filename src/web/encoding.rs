//! UTF-8 byte encoding and decoding.
//!
//! The `TextEncoder`/`TextDecoder` contract boundary: `encode` yields the
//! UTF-8 bytes of a string, `decode` turns bytes back into a string with
//! invalid sequences replaced (the non-fatal decoder mode).

/// Encode a string as UTF-8 bytes.
#[must_use]
pub fn encode(input: &str) -> Vec<u8> {
    input.as_bytes().to_vec()
}

/// Decode UTF-8 bytes into a string.
///
/// Invalid sequences become U+FFFD replacement characters rather than an
/// error.
#[must_use]
pub fn decode(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
