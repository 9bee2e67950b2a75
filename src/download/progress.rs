//! Download progress notification.

/// Reported as `total` when the server sent no `Content-Length`.
pub const UNKNOWN_TOTAL: i64 = -1;

/// Default number of bytes between progress notifications.
pub const DEFAULT_PROGRESS_STEP: usize = 8192;

/// Receives download progress.
///
/// `downloaded` is the cumulative number of bytes written so far; `total` is
/// the expected size, or [`UNKNOWN_TOTAL`] when the server did not say.
///
/// Any `FnMut(u64, i64)` closure is a `DownloadProgress`.
pub trait DownloadProgress {
    fn on_progress(&mut self, downloaded: u64, total: i64);
}

impl<F> DownloadProgress for F
where
    F: FnMut(u64, i64),
{
    fn on_progress(&mut self, downloaded: u64, total: i64) {
        self(downloaded, total)
    }
}

/// Counts bytes and forwards them to an optional listener.
pub(crate) struct ProgressTracker<'a> {
    listener: Option<&'a mut (dyn DownloadProgress + Send)>,
    downloaded: u64,
    total: i64,
}

impl<'a> ProgressTracker<'a> {
    pub(crate) fn new(
        listener: Option<&'a mut (dyn DownloadProgress + Send)>,
        content_length: Option<u64>,
    ) -> Self {
        let total = content_length
            .and_then(|len| i64::try_from(len).ok())
            .unwrap_or(UNKNOWN_TOTAL);
        Self {
            listener,
            downloaded: 0,
            total,
        }
    }

    pub(crate) fn advance(&mut self, bytes: usize) {
        self.downloaded += bytes as u64;
        if let Some(listener) = self.listener.as_mut() {
            listener.on_progress(self.downloaded, self.total);
        }
    }

    pub(crate) fn downloaded(&self) -> u64 {
        self.downloaded
    }
}
