//! The pastexen wire format.
//!
//! Request: `key=value\n` header lines ended by a blank line, then exactly
//! `size` raw payload bytes.
//!
//! ```text
//! proto=pastexen
//! version=1.0
//! type=png
//! size=48213
//!
//! <48213 bytes>
//! ```
//!
//! Response: the same line format; only `url` is consumed.

use crate::{ContentKind, ProtocolError};

use std::panic::Location;

use error_location::ErrorLocation;

const PROTO_NAME: &str = "pastexen";
const PROTO_VERSION: &str = "1.0";

/// Responses larger than this are cut off and parsed as-is.
pub(crate) const MAX_RESPONSE_BYTES: usize = 64 * 1024;

/// Serialize the header block, including the terminating blank line.
pub fn encode_header(kind: ContentKind, size: usize) -> Vec<u8> {
    format!(
        "proto={}\nversion={}\ntype={}\nsize={}\n\n",
        PROTO_NAME,
        PROTO_VERSION,
        kind.tag(),
        size
    )
    .into_bytes()
}

/// Whether `buf` already holds a complete response (fields plus blank line).
pub(crate) fn response_complete(buf: &[u8]) -> bool {
    let start = buf.iter().position(|b| !b"\r\n".contains(b)).unwrap_or(buf.len());
    let body = &buf[start..];
    body.windows(2).any(|w| w == b"\n\n") || body.windows(4).any(|w| w == b"\r\n\r\n")
}

/// Extract the `url` field from a server response.
///
/// Leading blank lines are skipped; parsing stops at the first blank line
/// after a field.
///
/// # Errors
///
/// `MalformedResponse` when the bytes are not UTF-8, a line has no `=`, or
/// `url` is missing or empty.
#[track_caller]
pub fn parse_response(bytes: &[u8]) -> Result<String, ProtocolError> {
    let malformed = |reason: String| ProtocolError::MalformedResponse {
        reason,
        location: ErrorLocation::from(Location::caller()),
    };

    let text = std::str::from_utf8(bytes)
        .map_err(|e| malformed(format!("response is not UTF-8: {}", e)))?;

    let mut seen_field = false;
    let mut url = None;

    for line in text.lines() {
        let line = line.trim_end_matches('\r');
        if line.is_empty() {
            if seen_field {
                break;
            }
            continue;
        }

        let (key, value) = line
            .split_once('=')
            .ok_or_else(|| malformed(format!("line without '=': {:?}", line)))?;
        seen_field = true;

        if key.trim() == "url" {
            url = Some(value.trim().to_string());
        }
    }

    match url {
        Some(url) if !url.is_empty() => Ok(url),
        Some(_) => Err(malformed("empty url field".to_string())),
        None if bytes.is_empty() => Err(malformed("empty response".to_string())),
        None => Err(malformed("missing url field".to_string())),
    }
}
