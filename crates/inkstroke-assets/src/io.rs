//! Byte sources for asset loading.

use std::collections::HashMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use crate::error::{AssetError, AssetResult};

/// Future type for async byte loading.
pub type BytesFuture = Pin<Box<dyn Future<Output = AssetResult<Vec<u8>>> + Send + 'static>>;

/// Trait for loading bytes from various sources.
pub trait BytesReader: Send + Sync {
    /// Read all bytes from a path.
    ///
    /// No work happens until the returned future is polled, so the read runs
    /// on whichever thread drives it.
    fn read_bytes(&self, path: &Path) -> BytesFuture;
}

/// Reads files relative to a base directory.
pub struct FileReader {
    base_path: PathBuf,
}

impl FileReader {
    pub fn new(base_path: impl AsRef<Path>) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Resolve a path relative to the base path.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_path.join(path)
        }
    }

    pub fn read_bytes_sync(&self, path: &Path) -> AssetResult<Vec<u8>> {
        read_file(self.resolve_path(path))
    }
}

fn read_file(full_path: PathBuf) -> AssetResult<Vec<u8>> {
    std::fs::read(&full_path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            AssetError::NotFound {
                path: full_path.display().to_string(),
            }
        } else {
            AssetError::IoError {
                path: full_path.clone(),
                source: e,
            }
        }
    })
}

impl BytesReader for FileReader {
    fn read_bytes(&self, path: &Path) -> BytesFuture {
        let full_path = self.resolve_path(path);
        Box::pin(async move {
            let bytes = read_file(full_path.clone())?;
            tracing::trace!("Read {} bytes from {}", bytes.len(), full_path.display());
            Ok(bytes)
        })
    }
}

/// In-memory bytes reader for testing or embedded assets.
#[derive(Default)]
pub struct MemoryReader {
    /// Stored bytes keyed by path string.
    files: HashMap<String, Vec<u8>>,
}

impl MemoryReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl AsRef<str>, bytes: Vec<u8>) {
        self.files.insert(path.as_ref().to_string(), bytes);
    }

    pub fn insert_static(&mut self, path: impl AsRef<str>, bytes: &'static [u8]) {
        self.files.insert(path.as_ref().to_string(), bytes.to_vec());
    }

    pub fn contains(&self, path: impl AsRef<str>) -> bool {
        self.files.contains_key(path.as_ref())
    }
}

impl BytesReader for MemoryReader {
    fn read_bytes(&self, path: &Path) -> BytesFuture {
        let key = path.to_string_lossy().to_string();
        let result = self
            .files
            .get(&key)
            .cloned()
            .ok_or(AssetError::NotFound { path: key });

        Box::pin(async move { result })
    }
}
