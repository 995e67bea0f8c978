//! The core `Stream` type (C7): a uniform, cached byte stream over one
//! backend. Every composed operator here is a plain `async fn` — the
//! suspended stack frame it leaves behind while `.await`ing a backend
//! completion is, itself, the "continuation" the original modeled as an
//! explicit `open_and`/`sync_and` struct (see `SPEC_FULL.md` §9).

use std::sync::Arc;

use tracing::instrument;

use crate::backend::{Backend, CtrlOp};
use crate::buffer::ScopedBuffer;
use crate::cache;
use crate::error::{Result, StreamError};
use crate::flags::{StreamFlags, StreamHandle};
use crate::url::UrlValue;

/// Default capacity for both caches when a stream is built via [`crate::open`]
/// without an explicit [`crate::StreamOpts`] override.
pub const DEFAULT_CACHE_SIZE: usize = 8 * 1024;

#[derive(Debug, Clone, Copy)]
pub struct StreamOpts {
    pub rcache_maxn: usize,
    pub wcache_maxn: usize,
}

impl Default for StreamOpts {
    fn default() -> Self {
        Self {
            rcache_maxn: DEFAULT_CACHE_SIZE,
            wcache_maxn: DEFAULT_CACHE_SIZE,
        }
    }
}

/// A uniform, non-blocking byte stream over exactly one backend, with a
/// read-ahead cache and a write-back cache layered in front of it.
///
/// `&mut self` on every operator is load-bearing: it is what lets the
/// compiler, rather than a runtime flag, enforce that at most one operation
/// is ever outstanding on a given stream.
pub struct Stream {
    backend: Box<dyn Backend + Send>,
    url: UrlValue,
    rcache_maxn: usize,
    wcache_maxn: usize,
    rcache: ScopedBuffer,
    wcache: ScopedBuffer,
    flags: Arc<StreamFlags>,
}

impl Stream {
    pub(crate) fn new(backend: Box<dyn Backend + Send>, url: UrlValue, opts: StreamOpts) -> Self {
        Self {
            backend,
            url,
            rcache_maxn: opts.rcache_maxn,
            wcache_maxn: opts.wcache_maxn,
            rcache: ScopedBuffer::new(),
            wcache: ScopedBuffer::new(),
            flags: StreamFlags::new(),
        }
    }

    /// A clonable cancellation handle, usable from another task while this
    /// stream is borrowed `&mut` by an in-flight operator.
    pub fn handle(&self) -> StreamHandle {
        StreamHandle::new(Arc::clone(&self.flags))
    }

    pub fn url(&self) -> &UrlValue {
        &self.url
    }

    pub fn offset(&self) -> u64 {
        self.backend.offset()
    }

    pub fn is_open(&self) -> bool {
        self.flags.is_open()
    }

    fn check_not_stopped(&self) -> Result<()> {
        if self.flags.is_stopped() {
            return Err(StreamError::Killed);
        }
        Ok(())
    }

    /// Open the backend. Fails fast if already open or already killed.
    #[instrument(skip(self), fields(url = %self.url.raw(), backend = self.backend.label()))]
    pub async fn open(&mut self) -> Result<()> {
        if self.flags.is_open() {
            return Err(StreamError::AlreadyOpen);
        }
        self.check_not_stopped()?;
        match self.backend.open().await {
            Ok(()) => {
                self.flags.set_open(true);
                Ok(())
            }
            Err(err) => {
                self.flags.set_stopped(true);
                Err(err)
            }
        }
    }

    /// Close cleanly: flush the write cache, sync, then close the backend.
    #[instrument(skip(self))]
    pub async fn close(&mut self) -> Result<()> {
        if !self.flags.is_open() {
            return Err(StreamError::NotOpen);
        }
        let flush_result = self.sync(true).await;
        let close_result = self.backend.close().await;
        self.flags.set_open(false);
        self.flags.set_stopped(true);
        flush_result?;
        close_result
    }

    /// Kill-then-close: force the stop flag, then run the same teardown
    /// `close` would, swallowing backend errors since the stream is being
    /// torn down unconditionally. Mirrors `tb_async_stream_exit`.
    pub async fn exit(&mut self) {
        self.flags.set_stopped(true);
        if self.flags.is_open() {
            let _ = self.backend.close().await;
            self.flags.set_open(false);
        }
    }

    /// Read through the read-ahead cache: served from `rcache` if it has
    /// data, otherwise refilled from the backend in one completion.
    #[instrument(skip(self, buf), fields(requested = buf.len()))]
    pub async fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        if !self.flags.is_open() {
            return Err(StreamError::NotOpen);
        }
        self.check_not_stopped()?;
        if buf.is_empty() {
            return Ok(0);
        }
        if self.rcache.is_empty() {
            if self.rcache_maxn == 0 {
                return self.backend.read(buf).await;
            }
            cache::refill_read_cache(self.backend.as_mut(), &mut self.rcache, self.rcache_maxn).await?;
            if self.rcache.is_empty() {
                return Ok(0);
            }
        }
        let n = buf.len().min(self.rcache.len());
        buf[..n].copy_from_slice(&self.rcache.as_slice()[..n]);
        self.rcache.drain_front(n);
        Ok(n)
    }

    /// Write through the write-back cache: coalesces into `wcache`,
    /// draining to the backend once the threshold is reached.
    #[instrument(skip(self, data), fields(len = data.len()))]
    pub async fn write(&mut self, data: &[u8]) -> Result<usize> {
        if !self.flags.is_open() {
            return Err(StreamError::NotOpen);
        }
        self.check_not_stopped()?;
        if self.wcache_maxn == 0 {
            return self.backend.write(data).await;
        }
        self.wcache.append(data);
        if self.wcache.len() >= self.wcache_maxn {
            cache::drain_write_cache(self.backend.as_mut(), &mut self.wcache).await?;
        }
        Ok(data.len())
    }

    /// Absolute seek. A no-op if already at `offset` — no cache flush, no
    /// backend call. Otherwise a dirty write cache is flushed first: once
    /// the backend's own offset moves, previously buffered bytes would
    /// land at the wrong place if drained later.
    pub async fn seek(&mut self, offset: u64) -> Result<u64> {
        if !self.flags.is_open() {
            return Err(StreamError::NotOpen);
        }
        self.check_not_stopped()?;
        if self.offset() == offset {
            return Ok(offset);
        }
        if !self.wcache.is_empty() {
            cache::drain_write_cache(self.backend.as_mut(), &mut self.wcache).await?;
        }
        self.rcache.clear();
        self.backend.seek(offset).await
    }

    /// Flush the write cache, then ask the backend to sync. A no-op on a
    /// clean cache, matching the original's "dirty cache forces sync" rule
    /// stated the other way around: a clean cache never forces one.
    #[instrument(skip(self))]
    pub async fn sync(&mut self, closing: bool) -> Result<()> {
        if !self.flags.is_open() {
            return Err(StreamError::NotOpen);
        }
        self.check_not_stopped()?;
        if !self.wcache.is_empty() {
            cache::drain_write_cache(self.backend.as_mut(), &mut self.wcache).await?;
        }
        self.backend.sync(closing).await
    }

    /// Forward to the backend's deferred callback, racing it against
    /// cancellation so a kill cuts a long delay short instead of making
    /// the caller wait it out.
    pub async fn task(&mut self, delay: std::time::Duration) -> Result<()> {
        self.check_not_stopped()?;
        tokio::select! {
            result = self.backend.task(delay) => result,
            () = self.flags.wait_for_stop() => Err(StreamError::Killed),
        }
    }

    /// Sync-and-read: if the write cache is dirty, sync first so the read
    /// observes previously buffered writes, then read.
    pub async fn read_after(&mut self, buf: &mut [u8]) -> Result<usize> {
        if !self.wcache.is_empty() {
            self.sync(false).await?;
        }
        self.read(buf).await
    }

    /// Sync-and-write: if the write cache is already dirty past capacity
    /// it would have drained on its own in `write`; this variant exists
    /// for callers that need the write ordered strictly after any prior
    /// dirty bytes are durably flushed (e.g. before a seek elsewhere).
    pub async fn writ_after(&mut self, data: &[u8]) -> Result<usize> {
        if !self.wcache.is_empty() {
            self.sync(false).await?;
        }
        self.write(data).await
    }

    /// Open-and-read: open the stream if it isn't already, then read.
    pub async fn oread(&mut self, buf: &mut [u8]) -> Result<usize> {
        if !self.flags.is_open() {
            self.open().await?;
        }
        self.read_after(buf).await
    }

    /// Open-and-write: open the stream if it isn't already, then write.
    pub async fn owrit(&mut self, data: &[u8]) -> Result<usize> {
        if !self.flags.is_open() {
            self.open().await?;
        }
        self.writ_after(data).await
    }

    /// Open-and-seek: open the stream if it isn't already, then seek.
    pub async fn oseek(&mut self, offset: u64) -> Result<u64> {
        if !self.flags.is_open() {
            self.open().await?;
        }
        self.seek(offset).await
    }

    pub async fn ctrl(&mut self, op: CtrlOp) -> Result<bool> {
        self.check_not_stopped()?;
        self.backend.ctrl(op).await
    }
}
