//! Error types for the RTSP message layer.

/// Errors that can occur while reading RTSP requests.
///
/// - **Protocol**: [`Parse`](Self::Parse) wraps a classified [`ParseError`].
/// - **Transport**: [`Io`](Self::Io) and [`UnexpectedEof`](Self::UnexpectedEof)
///   come from the byte source feeding a [`RequestReader`](crate::protocol::RequestReader).
#[derive(Debug, thiserror::Error)]
pub enum RtspError {
    /// Underlying I/O or socket error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The bytes received so far do not form a valid RTSP request.
    #[error("RTSP parse error: {0}")]
    Parse(#[from] ParseError),

    /// The byte source ended in the middle of a message.
    #[error("stream ended with {buffered} bytes of an incomplete message")]
    UnexpectedEof { buffered: usize },
}

/// Specific kind of RTSP request parse failure (RFC 2326 §6).
///
/// Parsing runs in fixed phases and reports the first one that fails.
/// [`UnterminatedMessage`](Self::UnterminatedMessage) and
/// [`IncompleteContent`](Self::IncompleteContent) mean "not enough bytes yet";
/// every other kind means the message is malformed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// No `\r\n\r\n` separator between the header block and the body.
    #[error("could not find end of request header block")]
    UnterminatedMessage,

    /// Request line did not have the `Method URI Version` format.
    #[error("unable to parse request line '{0}'")]
    MalformedRequestLine(String),

    /// The request URI is not a structurally valid absolute URL.
    #[error("unable to parse url '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The request URI parsed but its scheme is not `rtsp`.
    #[error("invalid url scheme '{0}'")]
    UnsupportedScheme(String),

    /// The protocol token is not `RTSP/1.0`.
    #[error("expected '{expected}', got '{actual}'")]
    UnsupportedVersion {
        expected: &'static str,
        actual: String,
    },

    /// A header line did not contain a colon separator.
    #[error("invalid header line '{0}'")]
    MalformedHeader(String),

    /// `Content-Length` is present but not a non-negative integer.
    #[error("invalid Content-Length value '{0}'")]
    InvalidContentLength(String),

    /// Fewer body bytes are available than `Content-Length` declares.
    #[error("not enough bytes for content: expected {expected}, have {available}")]
    IncompleteContent { expected: usize, available: usize },
}

impl ParseError {
    /// Whether the caller should read more bytes and parse again.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::UnterminatedMessage | Self::IncompleteContent { .. }
        )
    }
}

/// Convenience alias for `Result<T, RtspError>`.
pub type Result<T> = std::result::Result<T, RtspError>;
