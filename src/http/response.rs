//! HTTP Response with body access.

use crate::base::neterror::NetError;
use crate::http::ResponseBody;
use http::header::{CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_TYPE};
use http::{HeaderMap, StatusCode, Version};
use hyper::body::Incoming;

/// HTTP Response with accessible body.
/// This is the user-facing response type that owns the body.
pub struct HttpResponse {
    status: StatusCode,
    version: Version,
    reason: Option<String>,
    headers: HeaderMap,
    body: Option<ResponseBody>,
}

impl HttpResponse {
    /// Create from hyper Response<Incoming>.
    pub fn from_hyper(resp: http::Response<Incoming>) -> Self {
        let (parts, body) = resp.into_parts();
        // hyper only records the reason phrase when it differs from the
        // canonical one.
        let reason = parts
            .extensions
            .get::<hyper::ext::ReasonPhrase>()
            .map(|r| String::from_utf8_lossy(r.as_bytes()).into_owned());
        Self {
            status: parts.status,
            version: parts.version,
            reason,
            headers: parts.headers,
            body: Some(ResponseBody::new(body)),
        }
    }

    /// Assemble a response from its parts. Used by custom transports.
    pub fn from_parts(status: StatusCode, headers: HeaderMap, body: ResponseBody) -> Self {
        Self {
            status,
            version: Version::HTTP_11,
            reason: None,
            headers,
            body: Some(body),
        }
    }

    /// Override the reason phrase sent by the server.
    pub fn with_reason<S: Into<String>>(mut self, reason: S) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Get the status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Get the HTTP version.
    pub fn version(&self) -> Version {
        self.version
    }

    /// The server's status message: its reason phrase, or the canonical
    /// reason for the status code when the server sent the standard one.
    pub fn status_message(&self) -> String {
        match &self.reason {
            Some(reason) => reason.clone(),
            None => self.status.canonical_reason().unwrap_or_default().to_string(),
        }
    }

    /// Get a reference to the headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// `Content-Length`, when present and numeric.
    pub fn content_length(&self) -> Option<u64> {
        self.headers
            .get(CONTENT_LENGTH)?
            .to_str()
            .ok()?
            .trim()
            .parse()
            .ok()
    }

    /// Raw `Content-Disposition` value.
    pub fn content_disposition(&self) -> Option<&str> {
        self.headers.get(CONTENT_DISPOSITION)?.to_str().ok()
    }

    /// `charset` parameter of `Content-Type`.
    pub fn charset(&self) -> Option<String> {
        let content_type = self.headers.get(CONTENT_TYPE)?.to_str().ok()?;
        content_type.split(';').skip(1).find_map(|param| {
            let (key, value) = param.split_once('=')?;
            key.trim()
                .eq_ignore_ascii_case("charset")
                .then(|| value.trim().trim_matches('"').to_string())
        })
    }

    /// Take the response body for consumption.
    /// Can only be called once - subsequent calls return None.
    pub fn take_body(&mut self) -> Option<ResponseBody> {
        self.body.take()
    }

    /// Convenience method to consume body as bytes.
    pub async fn bytes(mut self) -> Result<bytes::Bytes, NetError> {
        self.body
            .take()
            .ok_or(NetError::HttpBodyError)?
            .bytes()
            .await
    }

    /// Convenience method to consume body as text in the declared charset.
    pub async fn text(mut self) -> Result<String, NetError> {
        let charset = self.charset();
        self.body
            .take()
            .ok_or(NetError::HttpBodyError)?
            .text_with_charset(charset.as_deref())
            .await
    }
}

impl std::fmt::Debug for HttpResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpResponse")
            .field("status", &self.status)
            .field("version", &self.version)
            .field("reason", &self.reason)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}
