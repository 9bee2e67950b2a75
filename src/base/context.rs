//! Ergonomic error context helpers.
//!
//! Socket-level `io::Error`s carry an `ErrorKind` that tells us which network
//! failure happened; these helpers fold them into `NetError`.

use crate::base::neterror::NetError;
use std::io::{self, ErrorKind};

/// Extension trait for adding context to IO Results.
pub trait IoResultExt<T> {
    /// Map an error from connecting or using a socket.
    ///
    /// # Example
    /// ```ignore
    /// use simplehttp::base::context::IoResultExt;
    ///
    /// let stream = TcpStream::connect(addr).await.connection_context()?;
    /// ```
    fn connection_context(self) -> Result<T, NetError>;

    /// Map an error from host name resolution.
    fn dns_context(self) -> Result<T, NetError>;
}

impl<T> IoResultExt<T> for Result<T, io::Error> {
    fn connection_context(self) -> Result<T, NetError> {
        self.map_err(|e| net_error_from_io(&e))
    }

    fn dns_context(self) -> Result<T, NetError> {
        self.map_err(|_| NetError::NameNotResolved)
    }
}

pub(crate) fn net_error_from_io(err: &io::Error) -> NetError {
    match err.kind() {
        ErrorKind::ConnectionRefused => NetError::ConnectionRefused,
        ErrorKind::ConnectionReset => NetError::ConnectionReset,
        ErrorKind::ConnectionAborted => NetError::ConnectionAborted,
        ErrorKind::NotConnected | ErrorKind::BrokenPipe | ErrorKind::UnexpectedEof => {
            NetError::ConnectionClosed
        }
        ErrorKind::AddrNotAvailable => NetError::AddressInvalid,
        ErrorKind::TimedOut => NetError::ConnectionTimedOut,
        ErrorKind::PermissionDenied => NetError::NetworkAccessDenied,
        _ => NetError::ConnectionFailed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Error;

    #[test]
    fn test_connection_context() {
        let result: Result<(), io::Error> =
            Err(Error::new(ErrorKind::ConnectionRefused, "refused"));
        assert_eq!(
            result.connection_context().unwrap_err(),
            NetError::ConnectionRefused
        );

        let result: Result<(), io::Error> = Err(Error::new(ErrorKind::BrokenPipe, "pipe"));
        assert_eq!(
            result.connection_context().unwrap_err(),
            NetError::ConnectionClosed
        );

        let result: Result<(), io::Error> = Err(Error::new(ErrorKind::Other, "?"));
        assert_eq!(
            result.connection_context().unwrap_err(),
            NetError::ConnectionFailed
        );
    }

    #[test]
    fn test_dns_context() {
        let result: Result<(), io::Error> = Err(Error::new(ErrorKind::NotFound, "no such host"));
        assert_eq!(result.dns_context().unwrap_err(), NetError::NameNotResolved);
    }
}
