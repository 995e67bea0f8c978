//! A uniform, callback-free, non-blocking byte stream over file, socket,
//! HTTP and in-memory backends, with write-back and read-ahead caching.
//!
//! ```no_run
//! # async fn run() -> unistream::Result<()> {
//! let mut stream = unistream::open("file:///tmp/example.bin")?;
//! stream.open().await?;
//! let mut buf = [0u8; 64];
//! let n = stream.read(&mut buf).await?;
//! stream.close().await?;
//! # let _ = n;
//! # Ok(())
//! # }
//! ```

pub mod backend;
mod buffer;
mod cache;
mod dispatch;
mod error;
mod flags;
pub mod item;
mod stream;
pub mod url;

pub use backend::{Backend, CtrlOp};
pub use dispatch::{init_from_url, init_from_url_with_opts};
pub use error::{Result, StreamError};
pub use flags::StreamHandle;
pub use stream::{Stream, StreamOpts, DEFAULT_CACHE_SIZE};
pub use url::{Scheme, UrlValue};

/// Convenience alias for [`init_from_url`].
pub fn open(url: &str) -> Result<Stream> {
    init_from_url(url)
}
