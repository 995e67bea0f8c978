//! Backend trait (C4) and its concrete transports.
//!
//! A `Backend` is the thing a `Stream` drives: it knows how to open, read,
//! write, seek and sync exactly one underlying transport. `Stream` itself
//! never matches on the URL scheme again once a backend has been built —
//! all scheme-specific behavior lives here.

mod data;
mod file;
mod http;
mod sock;

pub use data::DataBackend;
pub use file::FileBackend;
pub use http::HttpBackend;
pub use sock::SockBackend;

use async_trait::async_trait;

use crate::error::Result;

/// Out-of-band control operations a backend may or may not support, mirroring
/// the original's `tb_async_stream_ctrl` opcode space (e.g. querying size).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CtrlOp {
    /// Query the total size of the underlying resource, if known up front.
    GetSize,
}

/// A single underlying transport: file, socket, HTTP, or in-memory data.
///
/// All methods take `&mut self`, which is what gives `Stream` its "at most
/// one outstanding operation" invariant for free — the borrow checker will
/// not let two operators run concurrently against the same backend.
#[async_trait]
pub trait Backend: Send {
    async fn open(&mut self) -> Result<()>;

    async fn close(&mut self) -> Result<()>;

    /// Read up to `buf.len()` bytes. Returns `Ok(0)` at end of stream,
    /// never on a transient empty read — same contract as `AsyncRead`.
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Write as many of `data`'s bytes as the backend accepts in one
    /// completion. Callers loop until all bytes are accounted for.
    async fn write(&mut self, data: &[u8]) -> Result<usize>;

    /// Reposition to an absolute byte offset, returning the new offset.
    async fn seek(&mut self, offset: u64) -> Result<u64>;

    /// Flush any backend-internal buffering. `closing` is set when this
    /// sync is the last one before `close`, letting backends that only
    /// need to flush-on-close (e.g. HTTP, which has no mid-stream flush)
    /// skip unnecessary work on intermediate syncs.
    async fn sync(&mut self, closing: bool) -> Result<()>;

    /// Out-of-band control operation. Backends that don't implement a given
    /// op return `Err(StreamError::Unsupported)`; `Ok(true)` signals the op
    /// mutated backend state the caller should be aware of.
    async fn ctrl(&mut self, op: CtrlOp) -> Result<bool>;

    /// A deferred, proactor-scheduled callback: wait `delay`, then return.
    /// `Stream::task` forwards directly to this and races it against
    /// cancellation, so implementations need not watch the stop flag
    /// themselves — a plain timer is the correct, complete implementation.
    async fn task(&mut self, delay: std::time::Duration) -> Result<()> {
        tokio::time::sleep(delay).await;
        Ok(())
    }

    /// Current byte offset, independent of the stream's own read/write
    /// cache bookkeeping.
    fn offset(&self) -> u64;

    /// Short, constant label for logging (`"file"`, `"sock"`, `"http"`, `"data"`).
    fn label(&self) -> &'static str;
}
