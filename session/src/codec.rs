//! Access-token payload decoding.
//!
//! Tokens are three dot-separated base64url segments. Only the middle
//! (payload) segment is decoded; the signature is never checked here because
//! the server is the only party that can verify it.

#[cfg(test)]
#[path = "codec_test.rs"]
mod codec_test;

use base64::Engine as _;
use base64::alphabet;
use base64::engine::{GeneralPurpose, GeneralPurposeConfig};
use serde_json::{Map, Value};

/// Standard alphabet, caller-supplied padding, lenient trailing bits to match
/// what browsers accept from `atob`.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_allow_trailing_bits(true),
);

/// Error returned by [`decode`] when a token cannot be read.
#[derive(Debug, thiserror::Error)]
pub enum MalformedToken {
    /// The token did not split into exactly three segments.
    #[error("token must have 3 segments, found {0}")]
    SegmentCount(usize),
    /// The payload length leaves a base64 remainder of one character.
    #[error("payload segment has an invalid base64url length")]
    InvalidLength,
    /// The payload is not valid base64 after alphabet translation.
    #[error("payload segment is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    /// The decoded payload is not UTF-8 text.
    #[error("payload is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    /// The payload text is not valid JSON.
    #[error("payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// The payload parsed, but not as a JSON object.
    #[error("payload is not a JSON object")]
    NotAnObject,
}

/// Decode the claims object carried in a token's payload segment.
///
/// # Errors
///
/// Returns [`MalformedToken`] for a wrong segment count, an invalid base64url
/// payload, non-UTF-8 bytes, or a payload that is not a JSON object.
pub fn decode(token: &str) -> Result<Map<String, Value>, MalformedToken> {
    let segments: Vec<&str> = token.split('.').collect();
    let [_, payload, _] = segments.as_slice() else {
        return Err(MalformedToken::SegmentCount(segments.len()));
    };

    let text = base64url_decode(payload)?;
    match serde_json::from_str::<Value>(&text)? {
        Value::Object(claims) => Ok(claims),
        _ => Err(MalformedToken::NotAnObject),
    }
}

/// Translate a base64url segment to the standard alphabet, pad it, and decode
/// it to UTF-8 text.
fn base64url_decode(segment: &str) -> Result<String, MalformedToken> {
    let mut base64: String = segment
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();

    match base64.len() % 4 {
        0 => {}
        1 => return Err(MalformedToken::InvalidLength),
        rem => base64.extend(std::iter::repeat_n('=', 4 - rem)),
    }

    let bytes = PAYLOAD_ENGINE.decode(base64.as_bytes())?;
    Ok(String::from_utf8(bytes)?)
}

/// Whether `token` has three segments and a decodable payload.
#[must_use]
pub fn is_valid_format(token: &str) -> bool {
    !token.is_empty() && decode(token).is_ok()
}
