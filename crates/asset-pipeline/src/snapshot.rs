//! On-disk snapshot artifacts that never outlive their variant.

use std::path::{Path, PathBuf};

use promokit_capture_engine::Snapshot;
use promokit_common::error::CaptureResult;

/// A captured snapshot written to disk, removed when the guard drops.
#[derive(Debug)]
pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    /// Write `snapshot` to `path` and take ownership of the file.
    pub fn create(path: PathBuf, snapshot: &Snapshot) -> CaptureResult<Self> {
        // Own the path before writing so a partial write is cleaned up too.
        let guard = Self { path };
        snapshot.write_to(&guard.path)?;
        Ok(guard)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for SnapshotFile {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!(path = %self.path.display(), "Removed snapshot"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(
                path = %self.path.display(),
                error = %e,
                "Failed to remove snapshot"
            ),
        }
    }
}
