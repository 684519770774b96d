//! RTSP request messages (RFC 2326 §6).
//!
//! This module turns raw bytes into [`RtspRequest`] values and back.
//!
//! ## RTSP message format (RFC 2326 §4)
//!
//! RTSP messages follow HTTP/1.1 framing with a different method set:
//!
//! ```text
//! ANNOUNCE rtsp://server/stream RTSP/1.0\r\n
//! CSeq: 7\r\n
//! Content-Length: 306\r\n
//! Content-Type: application/sdp\r\n
//! \r\n
//! v=0...
//! ```
//!
//! A message ends after the blank line plus exactly `Content-Length` body
//! bytes. Headers are written in ascending byte order of name, so a parsed
//! request serializes back to the same bytes.
//!
//! | Piece | Role |
//! |-------|------|
//! | [`Header`] | sorted name → values container |
//! | [`Method`] | request verb, unknown verbs kept verbatim |
//! | [`parse_request`] | bytes → request, plus bytes consumed |
//! | [`content_length`] | `Content-Length` lookup on a header block |
//! | [`RtspRequest::serialize`] | request → bytes |
//! | [`RequestReader`] | framed requests from any `Read` |

pub mod header;
pub mod method;
pub mod parser;
pub mod reader;
pub mod request;

pub use header::Header;
pub use method::Method;
pub use parser::{content_length, parse_request};
pub use reader::RequestReader;
pub use request::{CONTENT_LENGTH, RTSP_VERSION, RtspRequest};
