//! Best-effort removal of temporary files.

use std::io;
use std::path::Path;

/// Delete each path, logging and swallowing failures.
///
/// Paths that no longer exist are skipped. Returns how many files were removed.
/// Async callers use [`cleanup_temp_files_async`].
pub fn cleanup_temp_files<I, P>(paths: I) -> usize
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut removed = 0;
    for path in paths {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            continue;
        }
        if record(path, std::fs::remove_file(path)) {
            removed += 1;
        }
    }
    removed
}

/// [`cleanup_temp_files`] on `tokio::fs`, for use inside the pipeline.
pub async fn cleanup_temp_files_async<I, P>(paths: I) -> usize
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut removed = 0;
    for path in paths {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            continue;
        }
        if record(path, tokio::fs::remove_file(path).await) {
            removed += 1;
        }
    }
    removed
}

fn record(path: &Path, result: io::Result<()>) -> bool {
    match result {
        Ok(()) => {
            tracing::debug!(path = %path.display(), "cleaned up temp file");
            true
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => false,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "could not clean up temp file");
            false
        }
    }
}
