//! File-based byte store with persistence.
//!
//! Stores each key in its own file inside a directory. Suitable for caches
//! that should survive process restarts on a single machine.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use sha3::{Digest, Sha3_256};
use tracing::{debug, instrument};

use dex_core::error::{DexError, Result};
use dex_core::traits::ByteStore;

/// File-based byte store.
///
/// # Layout
///
/// ```text
/// <dir>/<hex(sha3-256(fully qualified key))>.json
/// ```
///
/// File names are a fixed-length digest of the key, so keys of any length
/// and content map to a valid name. Writes go to a temporary file first and
/// are renamed into place. Writes are not fsynced: a torn file after a crash
/// fails to decode and reads as a miss.
#[derive(Clone, Debug)]
pub struct FileStorage {
    dir: PathBuf,
}

/// File extension of stored entries
const EXTENSION: &str = "json";
/// File extension of in-progress writes
const TEMP_EXTENSION: &str = "tmp";

impl FileStorage {
    /// Opens a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|e| {
            DexError::IoError(std::io::Error::new(
                e.kind(),
                format!("Failed to create cache directory {}: {}", dir.display(), e),
            ))
        })?;
        debug!(dir = %dir.display(), "Opened file storage");
        Ok(Self { dir })
    }

    /// Returns the storage directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let digest = Sha3_256::digest(key.as_bytes());
        self.dir.join(format!("{}.{}", hex::encode(digest), EXTENSION))
    }

    fn backend_error(action: &str, path: &Path, err: std::io::Error) -> DexError {
        DexError::BackendFailure(format!("{} {}: {}", action, path.display(), err))
    }
}

impl ByteStore for FileStorage {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path_for(key);
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Self::backend_error("read", &path, e)),
        }
    }

    #[instrument(skip(self, bytes), fields(len = bytes.len()))]
    fn write(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path_for(key);
        let temp_path = path.with_extension(TEMP_EXTENSION);

        let write_temp = || -> std::io::Result<()> {
            let mut file = fs::File::create(&temp_path)?;
            file.write_all(bytes)
        };
        write_temp().map_err(|e| Self::backend_error("write", &temp_path, e))?;

        fs::rename(&temp_path, &path).map_err(|e| Self::backend_error("rename", &path, e))
    }

    fn delete(&self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Self::backend_error("delete", &path, e)),
        }
    }
}
