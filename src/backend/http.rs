use async_trait::async_trait;

use super::{Backend, CtrlOp};
use crate::error::{Result, StreamError};
use crate::url::UrlValue;

/// `http://`/`https://` backend, built on `reqwest`.
///
/// HTTP has no native read/write-at-offset model, so this backend maps the
/// core's operators onto a single request/response exchange: `open` issues
/// a GET and buffers the body, `read` drains that buffer, and `write`
/// accumulates bytes that `sync`/`close` ship as a POST. This mirrors the
/// original's HTTP stream, which likewise only drives one HTTP transaction
/// per open/close cycle rather than a byte-addressable resource.
pub struct HttpBackend {
    url: String,
    client: reqwest::Client,
    read_buf: bytes::Bytes,
    write_buf: Vec<u8>,
    offset: u64,
    opened: bool,
}

impl std::fmt::Debug for HttpBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpBackend").field("url", &self.url).finish()
    }
}

impl HttpBackend {
    pub fn new(url: &UrlValue) -> Self {
        Self {
            url: url.raw().to_string(),
            client: reqwest::Client::new(),
            read_buf: bytes::Bytes::new(),
            write_buf: Vec::new(),
            offset: 0,
            opened: false,
        }
    }
}

#[async_trait]
impl Backend for HttpBackend {
    #[tracing::instrument(skip(self), fields(url = %self.url))]
    async fn open(&mut self) -> Result<()> {
        let response = self.client.get(&self.url).send().await?;
        let response = response.error_for_status()?;
        self.read_buf = response.bytes().await?;
        self.offset = 0;
        self.opened = true;
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        if !self.write_buf.is_empty() {
            self.sync(true).await?;
        }
        self.opened = false;
        Ok(())
    }

    async fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        if !self.opened {
            return Err(StreamError::NotOpen);
        }
        let n = buf.len().min(self.read_buf.len());
        buf[..n].copy_from_slice(&self.read_buf[..n]);
        self.read_buf = self.read_buf.split_off(n);
        self.offset = self.offset.saturating_add(n as u64);
        Ok(n)
    }

    async fn write(&mut self, data: &[u8]) -> Result<usize> {
        self.write_buf.extend_from_slice(data);
        self.offset = self.offset.saturating_add(data.len() as u64);
        Ok(data.len())
    }

    async fn seek(&mut self, _offset: u64) -> Result<u64> {
        Err(StreamError::Unsupported)
    }

    /// Ship the accumulated write buffer as one POST. Only meaningful on
    /// `closing`, since HTTP has no concept of a mid-stream partial flush.
    async fn sync(&mut self, closing: bool) -> Result<()> {
        if !closing || self.write_buf.is_empty() {
            return Ok(());
        }
        let body = std::mem::take(&mut self.write_buf);
        let response = self.client.post(&self.url).body(body).send().await?;
        response.error_for_status()?;
        Ok(())
    }

    async fn ctrl(&mut self, op: CtrlOp) -> Result<bool> {
        match op {
            CtrlOp::GetSize => Err(StreamError::Unsupported),
        }
    }

    fn offset(&self) -> u64 {
        self.offset
    }

    fn label(&self) -> &'static str {
        "http"
    }
}
