use std::io::{self, Write};

use url::Url;

use super::header::Header;
use super::method::Method;
use super::parser;
use crate::error::ParseError;

/// The only protocol version this crate reads and writes.
pub const RTSP_VERSION: &str = "RTSP/1.0";

/// Header carrying the body length (RFC 2326 §12.14).
pub const CONTENT_LENGTH: &str = "Content-Length";

/// A parsed RTSP request (RFC 2326 §6).
///
/// ```text
/// Method SP Request-URI SP RTSP-Version CRLF
/// *(Header: Value CRLF)
/// CRLF
/// [body]
/// ```
///
/// Each call to [`parse`](Self::parse) builds a fresh request owned by the
/// caller. Serializing with [`serialize`](Self::serialize) and parsing the
/// result gives back an equal request, once `Content-Length` matches the
/// body (as [`with_content`](Self::with_content) keeps it).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RtspRequest {
    /// RTSP method (OPTIONS, DESCRIBE, SETUP, PLAY, etc.).
    pub method: Method,
    /// Absolute request URL with scheme `rtsp`.
    pub url: Url,
    /// Headers, iterated in ascending name order.
    pub header: Header,
    /// Body bytes; empty unless `Content-Length` was greater than zero.
    pub content: Vec<u8>,
}

impl RtspRequest {
    pub fn new(method: impl Into<Method>, url: Url) -> Self {
        RtspRequest {
            method: method.into(),
            url,
            header: Header::new(),
            content: Vec::new(),
        }
    }

    /// Parse a complete request from `raw`.
    ///
    /// Bytes after the declared content are ignored; use
    /// [`parse_request`](super::parse_request) to learn how many were consumed.
    pub fn parse(raw: &[u8]) -> Result<Self, ParseError> {
        parser::parse_request(raw).map(|(request, _)| request)
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.header.append(name, value);
        self
    }

    /// Set the body and a matching `Content-Length` header.
    pub fn with_content(mut self, content: impl Into<Vec<u8>>) -> Self {
        self.content = content.into();
        if self.content.is_empty() {
            self.header.remove(CONTENT_LENGTH);
        } else {
            self.header
                .insert(CONTENT_LENGTH, self.content.len().to_string());
        }
        self
    }

    /// Look up a header value by name, ignoring ASCII case (RFC 2326 §4.2).
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.header.get_ignore_case(name)
    }

    /// Returns the CSeq header value, which numbers and orders RTSP
    /// request/response pairs (RFC 2326 §12.17).
    pub fn cseq(&self) -> Option<&str> {
        self.header_value("CSeq")
    }

    /// Length of the body in bytes.
    pub fn content_length(&self) -> usize {
        self.content.len()
    }

    /// Serialize to the RTSP wire format.
    ///
    /// Headers are written in ascending byte order of name, multiple values
    /// joined with `", "`. The body is appended verbatim. A non-empty body
    /// always gets `Content-Length: <body length>`, replacing any stored
    /// `Content-Length` entry whatever its case.
    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.serialized_len_hint());
        self.write_head(&mut out);
        out.extend_from_slice(&self.content);
        out
    }

    /// Write the serialized request to `writer`.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let mut head = Vec::with_capacity(self.serialized_len_hint());
        self.write_head(&mut head);
        writer.write_all(&head)?;
        writer.write_all(&self.content)
    }

    fn write_head(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(self.method.as_str().as_bytes());
        out.push(b' ');
        out.extend_from_slice(self.url.as_str().as_bytes());
        out.push(b' ');
        out.extend_from_slice(RTSP_VERSION.as_bytes());
        out.extend_from_slice(b"\r\n");

        let mut lines: Vec<(&str, String)> = self
            .header
            .iter()
            .filter(|(name, _)| {
                self.content.is_empty() || !name.eq_ignore_ascii_case(CONTENT_LENGTH)
            })
            .map(|(name, values)| (name, values.join(", ")))
            .collect();
        if !self.content.is_empty() {
            let at = lines.partition_point(|(name, _)| *name < CONTENT_LENGTH);
            lines.insert(at, (CONTENT_LENGTH, self.content.len().to_string()));
        }

        for (name, value) in lines {
            out.extend_from_slice(name.as_bytes());
            out.extend_from_slice(b": ");
            out.extend_from_slice(value.as_bytes());
            out.extend_from_slice(b"\r\n");
        }

        out.extend_from_slice(b"\r\n");
    }

    fn serialized_len_hint(&self) -> usize {
        let header_len: usize = self
            .header
            .iter()
            .map(|(name, values)| {
                name.len() + 4 + values.iter().map(|v| v.len() + 2).sum::<usize>()
            })
            .sum();
        self.method.as_str().len()
            + self.url.as_str().len()
            + RTSP_VERSION.len()
            + header_len
            + self.content.len()
            + CONTENT_LENGTH.len()
            + 30
    }
}
