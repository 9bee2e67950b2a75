//! The error returned by every request operation.

use crate::base::neterror::NetError;
use std::io;
use thiserror::Error;

/// Failure of a GET, POST or download.
///
/// `Net` and `Io` together form the I/O kind (nothing useful came back from
/// the server or the disk); `Http` means the server answered with something
/// other than `200 OK`.
#[derive(Debug, Error)]
pub enum RequestError {
    /// The server answered with a non-200 status.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Resolving, connecting, or reading/writing the connection failed.
    #[error(transparent)]
    Net(#[from] NetError),

    /// A local file could not be read, created or written.
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl RequestError {
    pub fn http<M: Into<String>>(status: u16, message: M) -> Self {
        RequestError::Http {
            status,
            message: message.into(),
        }
    }

    /// The HTTP status for `Http` errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            RequestError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True for network and filesystem failures.
    pub fn is_io(&self) -> bool {
        matches!(self, RequestError::Net(_) | RequestError::Io(_))
    }
}
