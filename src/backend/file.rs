use async_trait::async_trait;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};

use super::{Backend, CtrlOp};
use crate::error::{Result, StreamError};
use crate::url::UrlValue;

/// `file://` (and bare-path) backend, built on `tokio::fs::File`.
///
/// Grounded in the teacher's `tokio::Stream` (`src/tokio/stream.rs`), which
/// wraps a single `tokio::net::TcpStream` the same way this wraps a single
/// `tokio::fs::File` — open once, then drive reads/writes/seeks against it.
#[derive(Debug)]
pub struct FileBackend {
    path: String,
    file: Option<File>,
    offset: u64,
}

impl FileBackend {
    pub fn new(url: &UrlValue) -> Self {
        Self {
            path: url.path(),
            file: None,
            offset: 0,
        }
    }

    fn file_mut(&mut self) -> Result<&mut File> {
        self.file.as_mut().ok_or(StreamError::NotOpen)
    }
}

#[async_trait]
impl Backend for FileBackend {
    #[tracing::instrument(skip(self), fields(path = %self.path))]
    async fn open(&mut self) -> Result<()> {
        let file = tokio::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)
            .await?;
        self.file = Some(file);
        self.offset = 0;
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(mut file) = self.file.take() {
            file.flush().await?;
        }
        Ok(())
    }

    async fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let n = self.file_mut()?.read(buf).await?;
        self.offset = self.offset.saturating_add(n as u64);
        Ok(n)
    }

    async fn write(&mut self, data: &[u8]) -> Result<usize> {
        let n = self.file_mut()?.write(data).await?;
        self.offset = self.offset.saturating_add(n as u64);
        Ok(n)
    }

    async fn seek(&mut self, offset: u64) -> Result<u64> {
        let new_offset = self
            .file_mut()?
            .seek(std::io::SeekFrom::Start(offset))
            .await?;
        self.offset = new_offset;
        Ok(new_offset)
    }

    async fn sync(&mut self, _closing: bool) -> Result<()> {
        self.file_mut()?.flush().await?;
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
        "file"
    }
}
