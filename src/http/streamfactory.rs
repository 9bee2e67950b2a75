use crate::base::neterror::NetError;
use crate::http::RequestBody;
use crate::socket::connectjob::ConnectJob;
use http::{Request, Response};
use hyper::body::Incoming;
use hyper::client::conn::http1;
use hyper_util::rt::TokioIo;
use tokio::spawn;
use url::Url;

/// One HTTP/1.1 connection, good for a single request.
/// Equivalent to net::HttpStream.
pub struct HttpStream {
    sender: http1::SendRequest<RequestBody>,
}

impl HttpStream {
    pub async fn send_request(
        &mut self,
        req: Request<RequestBody>,
    ) -> Result<Response<Incoming>, NetError> {
        self.sender.ready().await.map_err(|e| {
            tracing::debug!(error = %e, "connection closed before request");
            NetError::ConnectionClosed
        })?;
        self.sender.send_request(req).await.map_err(|e| {
            tracing::debug!(error = %e, "request failed");
            if e.is_user() {
                NetError::RequestBodyError
            } else if e.is_incomplete_message() {
                NetError::EmptyResponse
            } else if e.is_parse() {
                NetError::InvalidResponse
            } else {
                NetError::ConnectionClosed
            }
        })
    }
}

/// Opens a fresh connection for every request; nothing is pooled.
#[derive(Debug, Default, Clone, Copy)]
pub struct HttpStreamFactory;

impl HttpStreamFactory {
    pub fn new() -> Self {
        Self
    }

    pub async fn request_stream(&self, url: &Url) -> Result<HttpStream, NetError> {
        // 1. DNS -> TCP -> TLS
        let socket = ConnectJob::connect(url).await?;

        // 2. Handshake (HTTP/1.1 only)
        let io = TokioIo::new(socket);
        let (sender, conn) = http1::handshake(io)
            .await
            .map_err(|_| NetError::ConnectionFailed)?;

        // 3. Spawn the connection driver; it ends once the response body is
        // consumed or dropped and the sender is gone.
        spawn(async move {
            if let Err(e) = conn.await {
                tracing::debug!(error = %e, "connection driver finished with error");
            }
        });

        Ok(HttpStream { sender })
    }
}
