//! Streaming a response body into a file.
//!
//! - [`filename`]: picking the destination name
//! - [`progress`]: progress callbacks

pub mod filename;
pub mod progress;

pub use progress::{DownloadProgress, DEFAULT_PROGRESS_STEP, UNKNOWN_TOTAL};

use crate::base::neterror::NetError;
use crate::base::requesterror::RequestError;
use crate::http::ResponseBody;
use progress::ProgressTracker;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

/// A completed download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedFile {
    /// Where the file was written.
    pub path: PathBuf,
    /// Bytes written to `path`.
    pub downloaded: u64,
    /// `Content-Length` announced by the server, if any.
    pub content_length: Option<u64>,
}

impl DownloadedFile {
    /// Expected size as reported to progress callbacks: `-1` when unknown.
    pub fn total(&self) -> i64 {
        self.content_length
            .and_then(|len| i64::try_from(len).ok())
            .unwrap_or(UNKNOWN_TOTAL)
    }
}

/// Stream `body` into `path`, `step` bytes at a time.
///
/// Bytes land in a temporary file next to `path`, which replaces `path` only
/// once the body is complete. On failure or cancellation the temporary file
/// is removed and any existing file at `path` is left untouched. After each
/// chunk the tracker reports cumulative progress. A body shorter than
/// `content_length` is an error.
pub(crate) async fn save_body(
    mut body: ResponseBody,
    path: &Path,
    step: usize,
    content_length: Option<u64>,
    listener: Option<&mut (dyn DownloadProgress + Send)>,
) -> Result<DownloadedFile, RequestError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let (file, temp_path) = NamedTempFile::new_in(dir)?.into_parts();
    let mut file = File::from_std(file);
    let mut tracker = ProgressTracker::new(listener, content_length);

    while let Some(chunk) = body.next_chunk(step).await? {
        file.write_all(&chunk).await?;
        tracker.advance(chunk.len());
        tracing::trace!(downloaded = tracker.downloaded(), "chunk written");
    }
    file.flush().await?;
    file.sync_all().await?;
    drop(file);

    let downloaded = tracker.downloaded();
    if let Some(expected) = content_length {
        if downloaded != expected {
            tracing::warn!(expected, downloaded, "download length mismatch");
            return Err(NetError::ContentLengthMismatch.into());
        }
    }

    temp_path.persist(path).map_err(|e| e.error)?;
    tracing::debug!(path = %path.display(), downloaded, "download saved");

    Ok(DownloadedFile {
        path: path.to_path_buf(),
        downloaded,
        content_length,
    })
}
