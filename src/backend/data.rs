use async_trait::async_trait;

use super::{Backend, CtrlOp};
use crate::error::{Result, StreamError};
use crate::url::UrlValue;

/// `data://` backend: an in-memory byte buffer decoded from hex digits
/// following the scheme, e.g. `data://AABBCC` yields the bytes `AA BB CC`.
///
/// This is the one backend with no external resource to open, matching the
/// original's `TB_STREAM_TYPE_DATA`, which treats the URL body itself as the
/// stream's entire contents rather than a locator for something else.
#[derive(Debug)]
pub struct DataBackend {
    bytes: Vec<u8>,
    offset: u64,
    opened: bool,
}

impl DataBackend {
    pub fn new(url: &UrlValue) -> Result<Self> {
        let body = url
            .raw()
            .strip_prefix("data://")
            .ok_or_else(|| StreamError::BadUrl(url.raw().to_string()))?;
        let bytes = decode_hex(body).ok_or_else(|| StreamError::BadUrl(url.raw().to_string()))?;
        Ok(Self {
            bytes,
            offset: 0,
            opened: false,
        })
    }
}

fn decode_hex(body: &str) -> Option<Vec<u8>> {
    if body.len() % 2 != 0 {
        return None;
    }
    (0..body.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(body.get(i..i + 2)?, 16).ok())
        .collect()
}

#[async_trait]
impl Backend for DataBackend {
    async fn open(&mut self) -> Result<()> {
        self.offset = 0;
        self.opened = true;
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        self.opened = false;
        Ok(())
    }

    async fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        if !self.opened {
            return Err(StreamError::NotOpen);
        }
        let start = self.offset as usize;
        if start >= self.bytes.len() {
            return Ok(0);
        }
        let n = buf.len().min(self.bytes.len() - start);
        buf[..n].copy_from_slice(&self.bytes[start..start + n]);
        self.offset = self.offset.saturating_add(n as u64);
        Ok(n)
    }

    async fn write(&mut self, data: &[u8]) -> Result<usize> {
        if !self.opened {
            return Err(StreamError::NotOpen);
        }
        let start = self.offset as usize;
        if start + data.len() > self.bytes.len() {
            self.bytes.resize(start + data.len(), 0);
        }
        self.bytes[start..start + data.len()].copy_from_slice(data);
        self.offset = self.offset.saturating_add(data.len() as u64);
        Ok(data.len())
    }

    async fn seek(&mut self, offset: u64) -> Result<u64> {
        self.offset = offset;
        Ok(self.offset)
    }

    async fn sync(&mut self, _closing: bool) -> Result<()> {
        Ok(())
    }

    async fn ctrl(&mut self, op: CtrlOp) -> Result<bool> {
        match op {
            CtrlOp::GetSize => Ok(true),
        }
    }

    fn offset(&self) -> u64 {
        self.offset
    }

    fn label(&self) -> &'static str {
        "data"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::url;

    #[test]
    fn decodes_hex_body() {
        assert_eq!(decode_hex("AABB"), Some(vec![0xAA, 0xBB]));
        assert_eq!(decode_hex(""), Some(vec![]));
        assert_eq!(decode_hex("A"), None);
        assert_eq!(decode_hex("zz"), None);
    }

    #[tokio::test]
    async fn read_after_open_returns_decoded_bytes() {
        let u = url::parse("data://AABBCC").unwrap();
        let mut backend = DataBackend::new(&u).unwrap();
        backend.open().await.unwrap();
        let mut buf = [0u8; 3];
        let n = backend.read(&mut buf).await.unwrap();
        assert_eq!(n, 3);
        assert_eq!(buf, [0xAA, 0xBB, 0xCC]);
        assert_eq!(backend.read(&mut buf).await.unwrap(), 0);
    }
}
