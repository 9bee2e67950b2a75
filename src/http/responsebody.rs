//! Response body streaming.
//! Mirrors Chromium's HttpStream::ReadResponseBody.

use crate::base::neterror::NetError;
use bytes::{Bytes, BytesMut};
use futures::Stream;
use http_body::Frame;
use http_body_util::combinators::UnsyncBoxBody;
use http_body_util::{BodyExt, Full, StreamBody};
use hyper::body::Incoming;

/// Response body wrapper for streaming.
///
/// Wraps any body (a live hyper connection or a canned one from a test
/// transport) and hands it out either whole or in bounded chunks.
pub struct ResponseBody {
    inner: UnsyncBoxBody<Bytes, NetError>,
    pending: Bytes,
}

impl ResponseBody {
    /// Create a new response body wrapper around a hyper body.
    pub fn new(inner: Incoming) -> Self {
        Self::from_body(inner.map_err(|e| {
            tracing::debug!(error = %e, "response body read failed");
            NetError::HttpBodyError
        }))
    }

    /// Wrap any body whose errors are already `NetError`s.
    pub fn from_body<B>(body: B) -> Self
    where
        B: http_body::Body<Data = Bytes, Error = NetError> + Send + 'static,
    {
        Self {
            inner: UnsyncBoxBody::new(body),
            pending: Bytes::new(),
        }
    }

    /// A complete in-memory body.
    pub fn from_bytes<B: Into<Bytes>>(data: B) -> Self {
        Self::from_body(Full::new(data.into()).map_err(|never| match never {}))
    }

    /// A body delivered as the given sequence of chunks.
    pub fn from_stream<S>(chunks: S) -> Self
    where
        S: Stream<Item = Result<Bytes, NetError>> + Send + 'static,
    {
        use futures::StreamExt;
        Self::from_body(StreamBody::new(chunks.map(|r| r.map(Frame::data))))
    }

    /// An empty body.
    pub fn empty() -> Self {
        Self::from_bytes(Bytes::new())
    }

    /// Read the next chunk of at most `max` bytes; `None` at end of body.
    ///
    /// Data frames larger than `max` are split across calls.
    pub async fn next_chunk(&mut self, max: usize) -> Result<Option<Bytes>, NetError> {
        let max = max.max(1);
        while self.pending.is_empty() {
            match self.inner.frame().await {
                Some(Ok(frame)) => {
                    if let Ok(data) = frame.into_data() {
                        self.pending = data;
                    }
                }
                Some(Err(e)) => return Err(e),
                None => return Ok(None),
            }
        }

        let take = max.min(self.pending.len());
        Ok(Some(self.pending.split_to(take)))
    }

    /// Read entire body as bytes.
    pub async fn bytes(mut self) -> Result<Bytes, NetError> {
        let mut out = BytesMut::from(&std::mem::take(&mut self.pending)[..]);
        while let Some(frame) = self.inner.frame().await {
            if let Ok(data) = frame?.into_data() {
                out.extend_from_slice(&data);
            }
        }
        Ok(out.freeze())
    }

    /// Read body as UTF-8 string.
    pub async fn text(self) -> Result<String, NetError> {
        self.text_with_charset(None).await
    }

    /// Read body as text in `charset` (UTF-8 when `None`).
    pub async fn text_with_charset(self, charset: Option<&str>) -> Result<String, NetError> {
        let bytes = self.bytes().await?;
        decode_text(&bytes, charset)
    }
}

/// Decode a whole body.
///
/// UTF-8 is decoded strictly; ISO-8859-1 and US-ASCII map each byte to the
/// code point of the same value. Other charsets are not supported.
pub fn decode_text(bytes: &[u8], charset: Option<&str>) -> Result<String, NetError> {
    let charset = charset.map(|c| c.trim().trim_matches('"').to_ascii_lowercase());
    match charset.as_deref() {
        None | Some("utf-8") | Some("utf8") => {
            let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
            String::from_utf8(bytes.to_vec()).map_err(|_| NetError::InvalidUtf8)
        }
        Some("iso-8859-1") | Some("latin1") | Some("latin-1") | Some("us-ascii")
        | Some("ascii") => Ok(bytes.iter().map(|&b| b as char).collect()),
        Some(other) => {
            tracing::debug!(charset = other, "unsupported response charset");
            Err(NetError::EncodingDetectionFailed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunked(parts: &[&'static [u8]]) -> ResponseBody {
        let chunks: Vec<Result<Bytes, NetError>> =
            parts.iter().map(|p| Ok(Bytes::from_static(*p))).collect();
        ResponseBody::from_stream(futures::stream::iter(chunks))
    }

    #[tokio::test]
    async fn test_next_chunk_splits_large_frames() {
        let mut body = chunked(&[b"abcdefg", b"hi"]);
        let mut seen = Vec::new();
        while let Some(chunk) = body.next_chunk(3).await.unwrap() {
            assert!(chunk.len() <= 3);
            seen.push(chunk);
        }
        let lens: Vec<_> = seen.iter().map(|c| c.len()).collect();
        assert_eq!(lens, [3, 3, 1, 2]);
        assert_eq!(seen.concat(), b"abcdefghi");
    }

    #[tokio::test]
    async fn test_bytes_after_partial_read() {
        let mut body = chunked(&[b"hello ", b"world"]);
        let first = body.next_chunk(2).await.unwrap().unwrap();
        assert_eq!(&first[..], b"he");
        assert_eq!(&body.bytes().await.unwrap()[..], b"llo world");
    }

    #[tokio::test]
    async fn test_stream_error_surfaces() {
        let chunks = vec![Ok(Bytes::from_static(b"ok")), Err(NetError::ConnectionReset)];
        let body = ResponseBody::from_stream(futures::stream::iter(chunks));
        assert_eq!(body.bytes().await.unwrap_err(), NetError::ConnectionReset);
    }

    #[tokio::test]
    async fn test_text_multibyte_across_chunks() {
        // "é" split between two frames must still decode.
        let body = chunked(&[b"caf\xC3", b"\xA9"]);
        assert_eq!(body.text().await.unwrap(), "café");
    }

    #[test]
    fn test_decode_charsets() {
        assert_eq!(decode_text(b"\xE9t\xE9", Some("ISO-8859-1")).unwrap(), "été");
        assert_eq!(decode_text(b"\xEF\xBB\xBFhi", Some("utf-8")).unwrap(), "hi");
        assert_eq!(
            decode_text(b"\xFF", None).unwrap_err(),
            NetError::InvalidUtf8
        );
        assert_eq!(
            decode_text(b"x", Some("shift_jis")).unwrap_err(),
            NetError::EncodingDetectionFailed
        );
    }

    #[tokio::test]
    async fn test_empty_body() {
        let mut body = ResponseBody::empty();
        assert!(body.next_chunk(8).await.unwrap().is_none());
    }
}
