//! Synchronous wrapper around [`client::SimpleHttpRequest`](crate::client::SimpleHttpRequest).
//!
//! Each wrapper owns a current-thread tokio runtime and blocks the calling
//! thread until the operation completes. Do not call these methods from
//! inside an async context; use the async client there.
//!
//! ```rust,no_run
//! use simplehttp::blocking::SimpleHttpRequest;
//!
//! let client = SimpleHttpRequest::new()?;
//! let body = client.get("http://example.com/")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::base::requesterror::RequestError;
use crate::client::{self, SimpleHttpRequestBuilder};
use crate::download::{DownloadProgress, DownloadedFile};
use crate::http::{HyperTransport, Params, Transport};
use std::io;
use std::path::Path;
use tokio::runtime::{Builder, Runtime};

/// Blocking GET, POST and download operations.
#[derive(Debug)]
pub struct SimpleHttpRequest<T = HyperTransport> {
    inner: client::SimpleHttpRequest<T>,
    runtime: Runtime,
}

impl SimpleHttpRequest {
    /// Create a client that talks to the network directly.
    pub fn new() -> io::Result<Self> {
        Self::from_async(client::SimpleHttpRequest::new())
    }

    /// Build from a configured async builder.
    pub fn from_builder<T: Transport>(
        builder: SimpleHttpRequestBuilder<T>,
    ) -> io::Result<SimpleHttpRequest<T>> {
        SimpleHttpRequest::from_async(builder.build())
    }
}

impl<T: Transport> SimpleHttpRequest<T> {
    /// Wrap an async client, starting its private runtime.
    pub fn from_async(inner: client::SimpleHttpRequest<T>) -> io::Result<Self> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        Ok(Self { inner, runtime })
    }

    /// Create a client with default settings over a custom transport.
    pub fn with_transport(transport: T) -> io::Result<Self> {
        Self::from_async(client::SimpleHttpRequest::with_transport(transport))
    }

    /// The wrapped async client.
    pub fn as_async(&self) -> &client::SimpleHttpRequest<T> {
        &self.inner
    }

    pub fn get(&self, url: &str) -> Result<String, RequestError> {
        self.runtime.block_on(self.inner.get(url))
    }

    pub fn get_with(&self, url: &str, params: &Params) -> Result<String, RequestError> {
        self.runtime.block_on(self.inner.get_with(url, params))
    }

    pub fn post(&self, url: &str) -> Result<String, RequestError> {
        self.runtime.block_on(self.inner.post(url))
    }

    pub fn post_with(&self, url: &str, params: &Params) -> Result<String, RequestError> {
        self.runtime.block_on(self.inner.post_with(url, params))
    }

    pub fn download(&self, url: &str) -> Result<DownloadedFile, RequestError> {
        self.runtime.block_on(self.inner.download(url))
    }

    pub fn download_to<P: AsRef<Path>>(
        &self,
        url: &str,
        dir: P,
    ) -> Result<DownloadedFile, RequestError> {
        self.runtime.block_on(self.inner.download_to(url, dir))
    }

    pub fn download_with_progress<P, D>(
        &self,
        url: &str,
        dir: D,
        progress: &mut P,
    ) -> Result<DownloadedFile, RequestError>
    where
        P: DownloadProgress + Send,
        D: AsRef<Path>,
    {
        self.runtime
            .block_on(self.inner.download_with_progress(url, dir, progress))
    }

    pub fn download_with<D: AsRef<Path>>(
        &self,
        url: &str,
        dir: D,
        step: usize,
        progress: Option<&mut (dyn DownloadProgress + Send)>,
    ) -> Result<DownloadedFile, RequestError> {
        self.runtime
            .block_on(self.inner.download_with(url, dir, step, progress))
    }
}
