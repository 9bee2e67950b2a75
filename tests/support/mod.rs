//! Shared test helpers: a canned-response transport and a local HTTP/1.1
//! server.

#![allow(dead_code)]

use bytes::Bytes;
use http::{HeaderMap, HeaderValue, Method, Request, StatusCode, Uri};
use http_body_util::BodyExt;
use simplehttp::{HttpResponse, NetError, RequestBody, ResponseBody, Transport};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

/// A request as seen by [`FakeTransport`], body fully collected.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// What [`FakeTransport`] answers with on every call.
#[derive(Debug, Clone)]
pub struct Canned {
    pub status: StatusCode,
    pub reason: Option<String>,
    pub headers: Vec<(&'static str, String)>,
    pub chunks: Vec<Bytes>,
    pub fail_with: Option<NetError>,
}

impl Canned {
    pub fn ok<B: Into<Bytes>>(body: B) -> Self {
        Self {
            status: StatusCode::OK,
            reason: None,
            headers: Vec::new(),
            chunks: vec![body.into()],
            fail_with: None,
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status: StatusCode::from_u16(status).unwrap(),
            ..Self::ok(Bytes::new())
        }
    }

    pub fn chunks<I: IntoIterator<Item = &'static [u8]>>(chunks: I) -> Self {
        Self {
            chunks: chunks.into_iter().map(Bytes::from_static).collect(),
            ..Self::ok(Bytes::new())
        }
    }

    pub fn reason(mut self, reason: &str) -> Self {
        self.reason = Some(reason.to_string());
        self
    }

    pub fn header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    /// Deliver the chunks, then fail the body stream.
    pub fn fail_with(mut self, err: NetError) -> Self {
        self.fail_with = Some(err);
        self
    }

    fn response(&self) -> HttpResponse {
        let mut headers = HeaderMap::new();
        for (name, value) in &self.headers {
            headers.append(*name, HeaderValue::from_str(value).unwrap());
        }
        let mut items: Vec<Result<Bytes, NetError>> =
            self.chunks.iter().cloned().map(Ok).collect();
        if let Some(err) = self.fail_with {
            items.push(Err(err));
        }
        let body = ResponseBody::from_stream(futures::stream::iter(items));
        let response = HttpResponse::from_parts(self.status, headers, body);
        match &self.reason {
            Some(reason) => response.with_reason(reason.clone()),
            None => response,
        }
    }
}

/// Records every request and answers with the same [`Canned`] response.
#[derive(Debug, Clone)]
pub struct FakeTransport {
    canned: Canned,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl FakeTransport {
    pub fn new(canned: Canned) -> Self {
        Self {
            canned,
            requests: Arc::default(),
        }
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last(&self) -> Recorded {
        self.requests().pop().expect("no request recorded")
    }
}

impl Transport for FakeTransport {
    async fn execute(&self, request: Request<RequestBody>) -> Result<HttpResponse, NetError> {
        let (parts, body) = request.into_parts();
        let body = body
            .collect()
            .await
            .map_err(|_| NetError::RequestBodyError)?
            .to_bytes();
        self.requests.lock().unwrap().push(Recorded {
            method: parts.method,
            uri: parts.uri,
            headers: parts.headers,
            body,
        });
        Ok(self.canned.response())
    }
}

/// A transport that always fails before sending anything.
#[derive(Debug, Clone, Copy)]
pub struct FailingTransport(pub NetError);

impl Transport for FailingTransport {
    async fn execute(&self, _request: Request<RequestBody>) -> Result<HttpResponse, NetError> {
        Err(self.0)
    }
}

/// Serve HTTP/1.1 on a random local port with `handler`, one task per
/// connection. Returns the bound address.
pub async fn serve<F, Fut>(handler: F) -> SocketAddr
where
    F: Fn(Request<hyper::body::Incoming>) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = http::Response<http_body_util::Full<Bytes>>> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                break;
            };
            let handler = handler.clone();
            tokio::spawn(async move {
                let service = hyper::service::service_fn(move |req| {
                    let fut = handler(req);
                    async move { Ok::<_, std::convert::Infallible>(fut.await) }
                });
                let _ = hyper::server::conn::http1::Builder::new()
                    .serve_connection(hyper_util::rt::TokioIo::new(stream), service)
                    .await;
            });
        }
    });

    addr
}
