//! Cache engine (C5): the write-back coalescing and read-ahead lending
//! logic shared by every `Stream`, independent of which backend it drives.
//!
//! Grounded in `tb_async_stream_cwrit_done`/`cwrit_func` (write-cache drain)
//! and `tb_async_stream_cread_done` (read-cache lending) in the original.

use crate::backend::Backend;
use crate::buffer::ScopedBuffer;
use crate::error::Result;

/// Drain `wcache` to `backend` in a `write_all`-style loop, stopping only
/// once every buffered byte has been accepted. The original's
/// `tb_async_stream_cwrit_func` drove this same loop one completion at a
/// time via a continuation; here it's just a `while` loop across awaits.
pub async fn drain_write_cache(backend: &mut (dyn Backend + Send), wcache: &mut ScopedBuffer) -> Result<()> {
    while !wcache.is_empty() {
        let n = backend.write(wcache.as_slice()).await?;
        if n == 0 {
            break;
        }
        wcache.drain_front(n);
    }
    Ok(())
}

/// Refill `rcache` from `backend` up to its configured capacity, replacing
/// whatever partial contents remain. Returns the number of fresh bytes
/// read, which may be 0 at end of stream.
pub async fn refill_read_cache(
    backend: &mut (dyn Backend + Send),
    rcache: &mut ScopedBuffer,
    capacity: usize,
) -> Result<usize> {
    rcache.clear();
    let dest = rcache.as_dest_slice(capacity);
    let n = backend.read(dest).await?;
    rcache.truncate(n);
    Ok(n)
}
