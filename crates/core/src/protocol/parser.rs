//! Byte-level RTSP request parsing.
//!
//! [`parse_request`] works on whatever bytes the caller has accumulated and
//! runs these phases in order, stopping at the first failure:
//!
//! 1. find the `\r\n\r\n` header terminator
//! 2. split the request line into method, URL and version
//! 3. validate the URL and its `rtsp` scheme
//! 4. check the version is `RTSP/1.0`
//! 5. collect header lines
//! 6. resolve `Content-Length`
//! 7. slice the body

use url::Url;

use super::header::Header;
use super::request::{CONTENT_LENGTH, RTSP_VERSION, RtspRequest};
use crate::error::ParseError;

const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";
const URL_SCHEME: &str = "rtsp";

/// Parse one request from the front of `raw`.
///
/// On success returns the request and the number of bytes it occupied
/// (header block, terminator and content). Anything past that belongs to the
/// next message and is left for the caller.
pub fn parse_request(raw: &[u8]) -> Result<(RtspRequest, usize), ParseError> {
    let result = parse_phases(raw);
    match &result {
        Ok((request, consumed)) => tracing::trace!(
            method = %request.method,
            url = %request.url,
            headers = request.header.len(),
            content = request.content.len(),
            consumed,
            "parsed request"
        ),
        Err(e) if e.is_recoverable() => {
            tracing::trace!(error = %e, buffered = raw.len(), "request incomplete")
        }
        Err(e) => tracing::debug!(error = %e, buffered = raw.len(), "malformed request"),
    }
    result
}

fn parse_phases(raw: &[u8]) -> Result<(RtspRequest, usize), ParseError> {
    let head_end = find_terminator(raw).ok_or(ParseError::UnterminatedMessage)?;
    let head = String::from_utf8_lossy(&raw[..head_end]);

    let mut lines = head.split("\r\n");
    let request_line = lines.next().unwrap_or_default();

    let tokens: Vec<&str> = request_line.split_whitespace().collect();
    let [method, url, version] = tokens[..] else {
        return Err(ParseError::MalformedRequestLine(request_line.to_string()));
    };

    let url = parse_url(url)?;

    if version != RTSP_VERSION {
        return Err(ParseError::UnsupportedVersion {
            expected: RTSP_VERSION,
            actual: version.to_string(),
        });
    }

    let mut header = Header::new();
    for line in lines {
        let (name, value) = line
            .split_once(':')
            .ok_or_else(|| ParseError::MalformedHeader(line.to_string()))?;
        header.append(name, value.trim_start());
    }

    let length = content_length(&head)?;

    let body_start = head_end + HEADER_TERMINATOR.len();
    let available = raw.len() - body_start;
    if available < length {
        return Err(ParseError::IncompleteContent {
            expected: length,
            available,
        });
    }

    let request = RtspRequest {
        method: method.into(),
        url,
        header,
        content: raw[body_start..body_start + length].to_vec(),
    };
    Ok((request, body_start + length))
}

/// Read the body length declared by a header block.
///
/// The block may include the request line and the trailing blank line. A
/// missing `Content-Length` means no body. The header name is matched
/// ignoring ASCII case and the first occurrence wins.
pub fn content_length(header_block: &str) -> Result<usize, ParseError> {
    let Some(value) = header_block
        .split("\r\n")
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.eq_ignore_ascii_case(CONTENT_LENGTH))
        .map(|(_, value)| value.trim())
    else {
        return Ok(0);
    };

    value
        .parse::<usize>()
        .map_err(|_| ParseError::InvalidContentLength(value.to_string()))
}

fn find_terminator(raw: &[u8]) -> Option<usize> {
    raw.windows(HEADER_TERMINATOR.len())
        .position(|window| window == HEADER_TERMINATOR)
}

/// Only absolute URLs are accepted; `*` and path-only targets are invalid.
fn parse_url(token: &str) -> Result<Url, ParseError> {
    let url = Url::parse(token).map_err(|source| ParseError::InvalidUrl {
        url: token.to_string(),
        source,
    })?;

    // `Url` lowercases the scheme, so compare against the text as written.
    let written = token
        .trim_start_matches(|c: char| c <= ' ')
        .get(..url.scheme().len())
        .unwrap_or(url.scheme());
    if written != URL_SCHEME {
        return Err(ParseError::UnsupportedScheme(written.to_string()));
    }

    Ok(url)
}
