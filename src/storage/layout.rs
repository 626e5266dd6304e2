use std::path::PathBuf;
use std::fs;
use crate::core::error::Result;
use crate::index::IndexType;

/// Directory structure for data files
#[derive(Debug, Clone)]
pub struct StorageLayout {
    pub base_dir: PathBuf,      // Root directory, holds the record table
    pub idx_dir: PathBuf,       // One .idx file per index type
    pub meta_dir: PathBuf,      // Metadata and update marker
}

impl StorageLayout {
    pub fn new(base_dir: PathBuf) -> Result<Self> {
        let idx_dir = base_dir.join("idx");
        let meta_dir = base_dir.join("meta");

        fs::create_dir_all(&idx_dir)?;
        fs::create_dir_all(&meta_dir)?;

        Ok(StorageLayout {
            base_dir,
            idx_dir,
            meta_dir,
        })
    }

    pub fn records_path(&self) -> PathBuf {
        self.base_dir.join("records.bin")
    }

    pub fn index_path(&self, index_type: IndexType) -> PathBuf {
        self.idx_dir.join(format!("{}.idx", index_type.file_stem()))
    }

    pub fn meta_path(&self) -> PathBuf {
        self.meta_dir.join("meta.bin")
    }

    /// Present while an exclusive update is in progress
    pub fn update_marker_path(&self) -> PathBuf {
        self.meta_dir.join("updating")
    }

    pub fn lock_path(&self) -> PathBuf {
        self.base_dir.join(".lock")
    }
}
