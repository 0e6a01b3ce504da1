use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while setting up an upload queue or loading files into it.
///
/// Per-file upload failures never show up here: they are absorbed into the
/// record they belong to (see [`crate::UploadStatus::Error`]).
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Path has no usable file name: {0:?}")]
    InvalidFileName(PathBuf),
    #[error("Invalid uploader configuration: {0}")]
    Config(#[from] serde_env::Error),
    #[error("Upload queue needs a tokio runtime, none is running on this thread")]
    NoRuntime,
}

impl UploadError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Failure reported by a [`crate::Transport`] for a single file.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransferError {
    /// The request never produced a response (connection refused, body error, ...).
    #[error("Upload request failed: {0}")]
    Request(String),
    /// The server answered with a non-2xx status.
    #[error("Upload rejected with HTTP {status}: {body}")]
    Status { status: u16, body: String },
    /// The server answered 2xx but its envelope carried a non-zero `errno`.
    #[error("Upload rejected by server (errno {errno}): {message}")]
    Rejected { errno: i64, message: String },
}

impl TransferError {
    pub fn request(message: impl Into<String>) -> Self {
        Self::Request(message.into())
    }
}

/// Failure of an asynchronous before-upload hook. Only ever logged.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Before-upload hook failed: {0}")]
pub struct GateError(pub String);

impl GateError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}
