//! Base types and error handling.
//!
//! - [`NetError`]: network error codes in the style of Chromium's `net_error_list.h`
//! - [`RequestError`]: what every request operation returns on failure
//! - [`context`]: mapping of socket `io::Error`s onto `NetError`

pub mod context;
pub mod neterror;
pub mod requesterror;

pub use neterror::NetError;
pub use requesterror::RequestError;
