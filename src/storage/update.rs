use std::fs;
use std::path::PathBuf;
use tracing::{debug, warn};
use crate::core::error::Result;
use crate::storage::blocks;
use crate::storage::file_lock::FileLock;
use crate::storage::layout::StorageLayout;
use crate::storage::meta::MetaData;

/// Exclusive update scope over a store.
///
/// Holds the writer lock and an on-disk marker for its whole lifetime. `finish`
/// persists the metadata and removes the marker; a scope that is dropped
/// without finishing releases the lock but leaves the marker, so the next
/// open knows the update never completed.
pub struct UpdateScope {
    lock: Option<FileLock>,
    marker: PathBuf,
    finished: bool,
}

impl UpdateScope {
    pub fn begin(storage: &StorageLayout) -> Result<Self> {
        let lock = FileLock::acquire(storage)?;
        let marker = storage.update_marker_path();
        fs::write(&marker, b"")?;
        debug!(store = %storage.base_dir.display(), "update started");
        Ok(UpdateScope {
            lock: Some(lock),
            marker,
            finished: false,
        })
    }

    /// Persists the metadata and ends the update.
    pub fn finish(mut self, storage: &StorageLayout, meta: &MetaData) -> Result<()> {
        let result = meta
            .save(storage)
            .and_then(|_| blocks::remove_block(&self.marker).map(|_| ()));
        self.finished = result.is_ok();
        self.lock.take();
        debug!(store = %storage.base_dir.display(), ok = self.finished, "update finished");
        result
    }
}

impl Drop for UpdateScope {
    fn drop(&mut self) {
        if !self.finished {
            warn!(marker = %self.marker.display(), "update scope released without finishing");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ErrorKind;

    #[test]
    fn finish_removes_marker_and_releases_lock() {
        let dir = tempfile::tempdir().unwrap();
        let layout = StorageLayout::new(dir.path().to_path_buf()).unwrap();
        let meta = MetaData::new("db", 0);

        let scope = UpdateScope::begin(&layout).unwrap();
        assert!(layout.update_marker_path().exists());
        assert_eq!(UpdateScope::begin(&layout).err().unwrap().kind, ErrorKind::Locked);

        scope.finish(&layout, &meta).unwrap();
        assert!(!layout.update_marker_path().exists());
        assert_eq!(MetaData::load(&layout).unwrap(), meta);
        assert!(UpdateScope::begin(&layout).is_ok());
    }

    #[test]
    fn abandoned_scope_keeps_marker() {
        let dir = tempfile::tempdir().unwrap();
        let layout = StorageLayout::new(dir.path().to_path_buf()).unwrap();

        drop(UpdateScope::begin(&layout).unwrap());
        assert!(layout.update_marker_path().exists());
        assert!(UpdateScope::begin(&layout).is_ok());
    }
}
