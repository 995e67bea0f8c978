use thiserror::Error;

pub type Result<T> = core::result::Result<T, StreamError>;

/// Terminal state codes surfaced by a composed operator.
///
/// `Io`/`Http` pass the underlying transport error through untouched;
/// the rest are the core's own taxonomy (see `SPEC_FULL.md` §7).
#[derive(Debug, Error)]
pub enum StreamError {
    /// The stream was stopped (`kill`, a failed open, or a cascaded stop
    /// from a failed composed prerequisite) before this operation resolved.
    #[error("stream was killed")]
    Killed,

    /// The back-end does not implement this operation.
    #[error("operation not supported by this backend")]
    Unsupported,

    /// A backend completion arrived with a non-OK status that carries no
    /// more specific meaning (e.g. a write-cache drain failure surfaced
    /// through `sync`).
    #[error("unknown error")]
    UnknownError,

    /// A read/seek/sync/task was attempted before `open` resolved.
    #[error("stream is not open")]
    NotOpen,

    /// `open` was called on a stream that is already open.
    #[error("stream is already open")]
    AlreadyOpen,

    /// An operator other than `open`/`close`/`exit` was attempted on a
    /// stopped stream.
    #[error("stream is already stopped")]
    AlreadyStopped,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("bad url: {0}")]
    BadUrl(String),

    #[error("unrecognized url scheme: {0}")]
    UnrecognizedScheme(String),
}
