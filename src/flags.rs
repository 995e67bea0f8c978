use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Notify;

/// The two atomic booleans every stream carries (`bopened`/`bstoped` in the
/// original), plus a `Notify` so an in-flight backend future can wake up on
/// cancellation instead of only noticing it on its next poll. Wrapped in an
/// `Arc` so a [`StreamHandle`] can cancel a stream from outside the
/// `&mut Stream` borrow an in-flight operator holds.
#[derive(Debug, Default)]
pub struct StreamFlags {
    opened: AtomicBool,
    stopped: AtomicBool,
    notify: Notify,
}

impl StreamFlags {
    /// A freshly constructed stream is closed but *not* stopped — `kill`
    /// and a failed `open` are the only things that raise `stopped`.
    /// `tb_async_stream_open_` clears `bstoped` at the top of open and only
    /// re-raises it on failure; it never starts out set.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            opened: AtomicBool::new(false),
            stopped: AtomicBool::new(false),
            notify: Notify::new(),
        })
    }

    /// Wait until either `kill` is called or already-stopped, racing no
    /// sleep of its own. Used by `Stream::task` to cut a backend delay
    /// short on cancellation.
    pub async fn wait_for_stop(&self) {
        if self.is_stopped() {
            return;
        }
        self.notify.notified().await;
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.opened.load(Ordering::Acquire)
    }

    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }

    #[inline]
    pub fn set_open(&self, value: bool) {
        self.opened.store(value, Ordering::Release);
    }

    #[inline]
    pub fn set_stopped(&self, value: bool) {
        self.stopped.store(value, Ordering::Release);
        if value {
            self.notify.notify_waiters();
        }
    }
}

/// A clonable cancellation handle for a [`crate::Stream`].
///
/// Kill can race an in-flight operator: the operator holds `&mut Stream`
/// for the duration of its `.await` chain, so `kill` cannot go through
/// `Stream` itself. It goes through the shared `Arc<StreamFlags>` instead.
#[derive(Debug, Clone)]
pub struct StreamHandle {
    flags: Arc<StreamFlags>,
}

impl StreamHandle {
    pub(crate) fn new(flags: Arc<StreamFlags>) -> Self {
        Self { flags }
    }

    /// Request cancellation. Idempotent; re-raising an already-set flag is
    /// explicitly allowed by the spec.
    pub fn kill(&self) {
        self.flags.set_stopped(true);
    }

    pub fn is_stopped(&self) -> bool {
        self.flags.is_stopped()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_stream_is_closed_and_not_stopped() {
        let flags = StreamFlags::new();
        assert!(!flags.is_stopped());
        assert!(!flags.is_open());
    }

    #[test]
    fn handle_kill_is_visible_through_flags() {
        let flags = StreamFlags::new();
        let handle = StreamHandle::new(Arc::clone(&flags));
        assert!(!flags.is_stopped());
        handle.kill();
        assert!(flags.is_stopped());
    }
}
