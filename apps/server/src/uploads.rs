use std::path::PathBuf;

use nestfund_core::errors::{Error, Result};
use nestfund_core::savings::ImageStoreTrait;

/// Stores goal images as plain files under the configured upload directory.
/// Stored files are served back under `/uploads/{filename}`.
pub struct FsImageStore {
    root: PathBuf,
}

impl FsImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FsImageStore { root: root.into() }
    }
}

impl ImageStoreTrait for FsImageStore {
    fn save(&self, filename: &str, bytes: &[u8]) -> Result<String> {
        std::fs::create_dir_all(&self.root)
            .map_err(|e| Error::Upload(format!("Failed to create upload directory: {e}")))?;
        let path = self.root.join(filename);
        std::fs::write(&path, bytes)
            .map_err(|e| Error::Upload(format!("Failed to store image {filename}: {e}")))?;
        Ok(filename.to_string())
    }
}
