//! The seam between request logic and the network.
//!
//! [`SimpleHttpRequest`](crate::client::SimpleHttpRequest) builds an
//! `http::Request` with an absolute URI and hands it to a [`Transport`].
//! [`HyperTransport`] sends it over a fresh HTTP/1.1 connection; tests plug in
//! transports that answer with canned responses.

use crate::base::neterror::NetError;
use crate::http::streamfactory::HttpStreamFactory;
use crate::http::{HttpResponse, RequestBody};
use http::header::HOST;
use http::{HeaderValue, Request, Uri};
use std::future::Future;
use url::{Position, Url};

/// Sends one request and returns the response with an unread body.
pub trait Transport: Send + Sync {
    fn execute(
        &self,
        request: Request<RequestBody>,
    ) -> impl Future<Output = Result<HttpResponse, NetError>> + Send;
}

impl<T: Transport> Transport for &T {
    fn execute(
        &self,
        request: Request<RequestBody>,
    ) -> impl Future<Output = Result<HttpResponse, NetError>> + Send {
        (**self).execute(request)
    }
}

impl<T: Transport> Transport for std::sync::Arc<T> {
    fn execute(
        &self,
        request: Request<RequestBody>,
    ) -> impl Future<Output = Result<HttpResponse, NetError>> + Send {
        (**self).execute(request)
    }
}

/// Default transport: one hyper HTTP/1.1 connection per request.
#[derive(Debug, Default, Clone)]
pub struct HyperTransport {
    factory: HttpStreamFactory,
}

impl HyperTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Transport for HyperTransport {
    async fn execute(&self, request: Request<RequestBody>) -> Result<HttpResponse, NetError> {
        let url = Url::parse(&request.uri().to_string()).map_err(|_| NetError::InvalidUrl)?;
        let (mut parts, body) = request.into_parts();

        // HTTP/1.1 wants origin-form on the wire and an explicit Host header.
        parts.uri = url[Position::BeforePath..Position::AfterQuery]
            .parse::<Uri>()
            .map_err(|_| NetError::InvalidUrl)?;
        if !parts.headers.contains_key(HOST) {
            let host = &url[Position::BeforeHost..Position::AfterPort];
            let value = HeaderValue::from_str(host).map_err(|_| NetError::InvalidUrl)?;
            parts.headers.insert(HOST, value);
        }

        let mut stream = self.factory.request_stream(&url).await?;
        let response = stream
            .send_request(Request::from_parts(parts, body))
            .await?;
        Ok(HttpResponse::from_hyper(response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_rejects_relative_uri() {
        let request = Request::get("/relative").body(RequestBody::Empty).unwrap();
        let err = HyperTransport::new().execute(request).await.unwrap_err();
        assert_eq!(err, NetError::InvalidUrl);
    }

    #[tokio::test]
    async fn test_rejects_unknown_scheme() {
        let request = Request::get("ftp://example.com/file")
            .body(RequestBody::Empty)
            .unwrap();
        let err = HyperTransport::new().execute(request).await.unwrap_err();
        assert_eq!(err, NetError::UnknownUrlScheme);
    }
}
