//! URL dispatcher (C8): turns a URL string into a concrete backend and
//! wraps it in a `Stream`. Grounded directly in
//! `tb_async_stream_init_from_url`'s scheme table.

use crate::backend::{Backend, DataBackend, FileBackend, HttpBackend, SockBackend};
use crate::error::Result;
use crate::stream::{Stream, StreamOpts};
use crate::url::{self, Scheme};

/// Build and return a closed `Stream` for `url`, selecting its backend by
/// scheme. The stream is not opened; call [`Stream::open`] (or one of the
/// `o*` composed operators) to connect.
pub fn init_from_url(url: &str) -> Result<Stream> {
    init_from_url_with_opts(url, StreamOpts::default())
}

pub fn init_from_url_with_opts(url: &str, opts: StreamOpts) -> Result<Stream> {
    let parsed = url::parse(url)?;
    let backend: Box<dyn Backend + Send> = match parsed.scheme() {
        Scheme::File => Box::new(FileBackend::new(&parsed)),
        Scheme::Sock => Box::new(SockBackend::new(&parsed)?),
        Scheme::Http => Box::new(HttpBackend::new(&parsed)),
        Scheme::Data => Box::new(DataBackend::new(&parsed)?),
    };
    Ok(Stream::new(backend, parsed, opts))
}
