/// A growable byte buffer scoped to a single stream's cache.
///
/// `Conn` in the teacher used a `BufferSet` of reusable `Vec<u8>`s per
/// connection; `ScopedBuffer` is the same idea narrowed to one buffer,
/// used once each for the read cache and the write cache on `Stream`.
#[derive(Debug, Default, Clone)]
pub struct ScopedBuffer {
    data: Vec<u8>,
}

impl ScopedBuffer {
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Grow capacity to at least `maxn` bytes without touching existing
    /// contents, mirroring `tb_scoped_buffer_resize`.
    pub fn reserve_at_least(&mut self, maxn: usize) {
        if self.data.capacity() < maxn {
            self.data.reserve(maxn - self.data.capacity());
        }
    }

    pub fn append(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    /// Discard the first `n` bytes, shifting the remainder to the front.
    /// The C original called this `memmov`; here it is a `Vec::drain`.
    pub fn drain_front(&mut self, n: usize) {
        let n = n.min(self.data.len());
        self.data.drain(..n);
    }

    /// View the buffer as a destination slice of exactly `len` bytes,
    /// growing it (uninitialized bytes are zeroed) if necessary. Used to
    /// lend the read-cache buffer to a backend's `read`.
    pub fn as_dest_slice(&mut self, len: usize) -> &mut [u8] {
        if self.data.len() < len {
            self.data.resize(len, 0);
        }
        &mut self.data[..len]
    }

    /// Shrink the logical length to `len`, dropping any trailing bytes.
    /// No-op if `len >= self.len()`.
    pub fn truncate(&mut self, len: usize) {
        self.data.truncate(len);
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_and_drain_front() {
        let mut buf = ScopedBuffer::new();
        buf.append(b"abc");
        buf.append(b"de");
        assert_eq!(buf.as_slice(), b"abcde");
        buf.drain_front(3);
        assert_eq!(buf.as_slice(), b"de");
    }

    #[test]
    fn drain_front_past_end_clears() {
        let mut buf = ScopedBuffer::new();
        buf.append(b"ab");
        buf.drain_front(10);
        assert!(buf.is_empty());
    }

    #[test]
    fn reserve_at_least_does_not_touch_contents() {
        let mut buf = ScopedBuffer::new();
        buf.append(b"hi");
        buf.reserve_at_least(64);
        assert!(buf.capacity() >= 64);
        assert_eq!(buf.as_slice(), b"hi");
    }

    #[test]
    fn truncate_drops_trailing_bytes() {
        let mut buf = ScopedBuffer::new();
        buf.append(b"abcdef");
        buf.truncate(3);
        assert_eq!(buf.as_slice(), b"abc");
    }

    #[test]
    fn as_dest_slice_grows_and_zeroes() {
        let mut buf = ScopedBuffer::new();
        let slice = buf.as_dest_slice(4);
        assert_eq!(slice, &[0u8; 4]);
    }
}
