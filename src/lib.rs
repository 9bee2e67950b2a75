//! # simplehttp
//!
//! A small HTTP utility: GET with query parameters, multipart POST with text
//! and file fields, and streamed file downloads with progress callbacks.
//!
//! Each operation opens its own HTTP/1.1 connection (hyper over tokio, TLS
//! through BoringSSL), treats anything other than `200 OK` as an error, and
//! releases every connection and file handle before returning.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use simplehttp::{Params, SimpleHttpRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), simplehttp::RequestError> {
//!     let client = SimpleHttpRequest::new();
//!
//!     let params = Params::new()
//!         .with("title", "holiday")
//!         .with_file("photo", "beach.jpg");
//!     let reply = client.post_with("https://example.com/upload", &params).await?;
//!     println!("{reply}");
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`base`] - Error types
//! - [`client`] - The async request facade
//! - [`blocking`] - The same operations for synchronous callers
//! - [`download`] - File naming, progress and body-to-file streaming
//! - [`http`] - Parameters, multipart encoding, bodies and the transport seam
//! - [`socket`] - DNS, TCP and TLS connection setup

pub mod base;
pub mod blocking;
pub mod client;
pub mod download;
pub mod http;
pub mod socket;

pub use base::{NetError, RequestError};
pub use client::{SimpleHttpRequest, SimpleHttpRequestBuilder};
pub use download::{DownloadProgress, DownloadedFile};
pub use http::{HttpResponse, HyperTransport, ParamValue, Params, RequestBody, ResponseBody, Transport};
