//! The request facade.
//!
//! # Example
//!
//! ```rust,no_run
//! use simplehttp::{Params, SimpleHttpRequest};
//!
//! # async fn run() -> Result<(), simplehttp::RequestError> {
//! let client = SimpleHttpRequest::builder()
//!     .download_dir("/tmp")
//!     .build();
//!
//! let page = client
//!     .get_with("https://example.com/search", &Params::new().with("q", "rust"))
//!     .await?;
//!
//! let file = client
//!     .download_with_progress("https://example.com/a.zip", "/tmp", &mut |done: u64, total: i64| {
//!         println!("{done}/{total}");
//!     })
//!     .await?;
//! println!("{} ({} bytes)", file.path.display(), file.downloaded);
//! # Ok(())
//! # }
//! ```

use crate::base::neterror::NetError;
use crate::base::requesterror::RequestError;
use crate::download::filename::resolve_filename;
use crate::download::{save_body, DownloadProgress, DownloadedFile, DEFAULT_PROGRESS_STEP};
use crate::http::query::append_query;
use crate::http::{Form, HttpResponse, HyperTransport, Params, RequestBody, Transport};
use http::header::{HeaderName, CACHE_CONTROL, CONNECTION, CONTENT_LENGTH, CONTENT_TYPE, PRAGMA};
use http::{HeaderValue, Method, Request, StatusCode};
use std::io;
use std::path::{Path, PathBuf};
use url::Url;

const CHARSET: HeaderName = HeaderName::from_static("charset");
const KEEP_ALIVE: &str = "Keep-Alive";
const UTF_8: &str = "UTF-8";
const NO_CACHE: &str = "no-cache";

/// Issues GET, multipart POST and download requests.
///
/// Holds no per-request state: every call opens its own connection through
/// the [`Transport`] and releases it before returning.
#[derive(Debug, Clone)]
pub struct SimpleHttpRequest<T = HyperTransport> {
    transport: T,
    download_dir: Option<PathBuf>,
    progress_step: usize,
}

impl Default for SimpleHttpRequest {
    fn default() -> Self {
        Self::new()
    }
}

impl SimpleHttpRequest {
    /// Create a client that talks to the network directly.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Create a new client builder.
    pub fn builder() -> SimpleHttpRequestBuilder {
        SimpleHttpRequestBuilder::default()
    }
}

impl<T: Transport> SimpleHttpRequest<T> {
    /// Create a client with default settings over a custom transport.
    pub fn with_transport(transport: T) -> Self {
        SimpleHttpRequest::builder().transport(transport).build()
    }

    /// The transport requests are sent through.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Directory used by [`download`](Self::download).
    pub fn download_dir(&self) -> Option<&Path> {
        self.download_dir.as_deref()
    }

    /// GET `url` and return the body as text.
    pub async fn get(&self, url: &str) -> Result<String, RequestError> {
        self.get_with(url, &Params::new()).await
    }

    /// GET `url` with `params` appended as a query string and return the body
    /// as text.
    pub async fn get_with(&self, url: &str, params: &Params) -> Result<String, RequestError> {
        let url = append_query(url, params)?;
        let request = request_builder(Method::GET, &url, false)
            .body(RequestBody::Empty)
            .map_err(|_| NetError::InvalidUrl)?;
        let response = self.execute(request).await?;
        Ok(response.text().await?)
    }

    /// POST an empty multipart form to `url` and return the body as text.
    pub async fn post(&self, url: &str) -> Result<String, RequestError> {
        self.post_with(url, &Params::new()).await
    }

    /// POST `params` as `multipart/form-data` and return the body as text.
    ///
    /// File parameters are opened before anything is sent; a missing file
    /// fails with [`RequestError::Io`].
    pub async fn post_with(&self, url: &str, params: &Params) -> Result<String, RequestError> {
        let url = parse_url(url)?;
        let form = Form::from_params(params).await?;

        let content_type =
            HeaderValue::from_str(&form.content_type()).map_err(|_| NetError::InvalidHeader)?;
        let request = request_builder(Method::POST, &url, false)
            .header(CONTENT_TYPE, content_type)
            .header(CONTENT_LENGTH, form.content_length())
            .body(form.into_body())
            .map_err(|_| NetError::InvalidUrl)?;

        let response = self.execute(request).await?;
        Ok(response.text().await?)
    }

    /// Download `url` into the download directory: the configured one, or
    /// the platform's downloads folder.
    ///
    /// Fails with an [`io::ErrorKind::NotFound`] error when there is neither.
    pub async fn download(&self, url: &str) -> Result<DownloadedFile, RequestError> {
        let dir = self.download_dir.as_deref().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, "no download directory available")
        })?;
        self.download_with(url, dir, self.progress_step, None).await
    }

    /// Download `url` into `dir`.
    pub async fn download_to<P: AsRef<Path>>(
        &self,
        url: &str,
        dir: P,
    ) -> Result<DownloadedFile, RequestError> {
        self.download_with(url, dir, self.progress_step, None).await
    }

    /// Download `url` into `dir`, reporting progress after every chunk of at
    /// most the configured step size.
    pub async fn download_with_progress<P, D>(
        &self,
        url: &str,
        dir: D,
        progress: &mut P,
    ) -> Result<DownloadedFile, RequestError>
    where
        P: DownloadProgress + Send,
        D: AsRef<Path>,
    {
        self.download_with(url, dir, self.progress_step, Some(progress))
            .await
    }

    /// Download `url` into `dir`, reading at most `step` bytes between
    /// progress notifications. A `step` of 0 means the default step.
    ///
    /// Non-200 responses fail before any file is created. If the transfer
    /// fails afterwards the partial file is removed.
    pub async fn download_with<D: AsRef<Path>>(
        &self,
        url: &str,
        dir: D,
        step: usize,
        progress: Option<&mut (dyn DownloadProgress + Send)>,
    ) -> Result<DownloadedFile, RequestError> {
        let url = parse_url(url)?;
        let step = if step == 0 { DEFAULT_PROGRESS_STEP } else { step };

        let request = request_builder(Method::GET, &url, true)
            .body(RequestBody::Empty)
            .map_err(|_| NetError::InvalidUrl)?;
        let mut response = self.execute(request).await?;

        let name = resolve_filename(response.content_disposition(), &url);
        let path = dir.as_ref().join(name);
        let content_length = response.content_length();
        let body = response.take_body().ok_or(NetError::HttpBodyError)?;

        tracing::debug!(%url, path = %path.display(), ?content_length, "downloading");
        let file = save_body(body, &path, step, content_length, progress).await?;
        tracing::debug!(%url, bytes = file.downloaded, "download complete");
        Ok(file)
    }

    /// Send `request`; anything but `200 OK` becomes [`RequestError::Http`].
    async fn execute(&self, request: Request<RequestBody>) -> Result<HttpResponse, RequestError> {
        let method = request.method().clone();
        let uri = request.uri().clone();
        tracing::debug!(%method, %uri, "sending request");

        let response = self.transport.execute(request).await?;
        let status = response.status();
        if status != StatusCode::OK {
            let message = response.status_message();
            tracing::warn!(%method, %uri, status = status.as_u16(), %message, "request failed");
            return Err(RequestError::http(status.as_u16(), message));
        }

        tracing::debug!(%method, %uri, status = status.as_u16(), "response received");
        Ok(response)
    }
}

fn parse_url(url: &str) -> Result<Url, NetError> {
    Url::parse(url).map_err(|_| NetError::InvalidUrl)
}

fn request_builder(method: Method, url: &Url, use_cache: bool) -> http::request::Builder {
    let mut builder = Request::builder()
        .method(method)
        .uri(url.as_str())
        .header(CONNECTION, KEEP_ALIVE)
        .header(CHARSET, UTF_8);
    if !use_cache {
        builder = builder
            .header(CACHE_CONTROL, NO_CACHE)
            .header(PRAGMA, NO_CACHE);
    }
    builder
}

/// Builder for creating a [`SimpleHttpRequest`].
#[derive(Debug, Clone)]
pub struct SimpleHttpRequestBuilder<T = HyperTransport> {
    transport: T,
    download_dir: Option<PathBuf>,
    progress_step: usize,
}

impl Default for SimpleHttpRequestBuilder {
    fn default() -> Self {
        Self {
            transport: HyperTransport::new(),
            download_dir: dirs::download_dir(),
            progress_step: DEFAULT_PROGRESS_STEP,
        }
    }
}

impl<T> SimpleHttpRequestBuilder<T> {
    /// Set the directory used by `download(url)`. Defaults to the platform's
    /// downloads folder when it has one.
    pub fn download_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.download_dir = Some(dir.into());
        self
    }

    /// Drop the default directory, so `download(url)` needs an explicit one.
    pub fn without_download_dir(mut self) -> Self {
        self.download_dir = None;
        self
    }

    /// Set the default number of bytes between progress notifications.
    /// 0 keeps the default.
    pub fn progress_step_size(mut self, step: usize) -> Self {
        if step > 0 {
            self.progress_step = step;
        }
        self
    }

    /// Send requests through `transport` instead of the network.
    pub fn transport<U: Transport>(self, transport: U) -> SimpleHttpRequestBuilder<U> {
        SimpleHttpRequestBuilder {
            transport,
            download_dir: self.download_dir,
            progress_step: self.progress_step,
        }
    }

    /// Build the client.
    pub fn build(self) -> SimpleHttpRequest<T> {
        SimpleHttpRequest {
            transport: self.transport,
            download_dir: self.download_dir,
            progress_step: self.progress_step,
        }
    }
}
