//! Request body for POST operations.

use bytes::Bytes;
use futures::stream::BoxStream;
use futures::Stream;
use http_body::{Body, Frame, SizeHint};
use std::fmt;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Request body for HTTP methods that send data.
///
/// `Stream` bodies are produced lazily (multipart uploads read files while the
/// request is being written); `len` is the exact byte count when known.
#[derive(Default)]
pub enum RequestBody {
    /// No body (GET).
    #[default]
    Empty,
    /// Body produced chunk by chunk.
    Stream {
        stream: BoxStream<'static, io::Result<Bytes>>,
        len: Option<u64>,
    },
}

impl fmt::Debug for RequestBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestBody::Empty => f.write_str("Empty"),
            RequestBody::Stream { len, .. } => f.debug_struct("Stream").field("len", len).finish(),
        }
    }
}

impl RequestBody {
    /// Wrap a stream of chunks with an optional exact length.
    pub fn stream<S>(stream: S, len: Option<u64>) -> Self
    where
        S: Stream<Item = io::Result<Bytes>> + Send + 'static,
    {
        RequestBody::Stream {
            stream: Box::pin(stream),
            len,
        }
    }

    /// Check if the body is empty.
    pub fn is_empty(&self) -> bool {
        match self {
            RequestBody::Empty => true,
            RequestBody::Stream { len, .. } => *len == Some(0),
        }
    }

    /// The body length in bytes, if known without consuming it.
    pub fn len(&self) -> Option<u64> {
        match self {
            RequestBody::Empty => Some(0),
            RequestBody::Stream { len, .. } => *len,
        }
    }
}

impl Body for RequestBody {
    type Data = Bytes;
    type Error = io::Error;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        match self.get_mut() {
            RequestBody::Empty => Poll::Ready(None),
            RequestBody::Stream { stream, .. } => stream
                .as_mut()
                .poll_next(cx)
                .map(|chunk| chunk.map(|r| r.map(Frame::data))),
        }
    }

    fn is_end_stream(&self) -> bool {
        match self {
            RequestBody::Empty => true,
            RequestBody::Stream { len, .. } => *len == Some(0),
        }
    }

    fn size_hint(&self) -> SizeHint {
        match self.len() {
            Some(n) => SizeHint::with_exact(n),
            None => SizeHint::default(),
        }
    }
}
