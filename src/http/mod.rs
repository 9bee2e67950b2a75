//! HTTP request and response plumbing.
//!
//! - [`params`] / [`query`]: request parameters and query string encoding
//! - [`multipart`]: `multipart/form-data` bodies with a fixed boundary
//! - [`transport`]: the pluggable request sender and its hyper implementation

pub mod mime;
pub mod multipart;
pub mod params;
pub mod query;
pub mod requestbody;
pub mod response;
pub mod responsebody;
pub mod streamfactory;
pub mod transport;

// Re-exports for convenience
pub use multipart::{Form, Part, BOUNDARY};
pub use params::{ParamValue, Params};
pub use requestbody::RequestBody;
pub use response::HttpResponse;
pub use responsebody::ResponseBody;
pub use transport::{HyperTransport, Transport};
