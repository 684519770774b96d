pub mod buffer;
pub mod error;
pub mod protocol;

pub use buffer::{BufferPool, PoolConfig, PoolStats, PooledBuffer};
pub use error::{ParseError, Result, RtspError};
pub use protocol::{Header, Method, RequestReader, RtspRequest};
pub use url::Url;
