//! Embedding external files into an archive.

use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

use crate::error::{Error, Result};
use crate::sink::{size_u32, ByteSink};

/// Reads files referenced by a manifest
///
/// Relative paths are resolved against the base directory, which is normally the directory the
/// manifest was loaded from.
#[derive(Debug, Clone, Default)]
pub struct FileEmbedder {
    base_dir: Option<PathBuf>,
}

/// The full contents of an embedded file
#[derive(Debug, Clone)]
pub struct EmbeddedFile {
    path: PathBuf,
    data: Vec<u8>,
}

impl FileEmbedder {
    pub fn new(base_dir: Option<PathBuf>) -> FileEmbedder {
        FileEmbedder { base_dir }
    }

    /// Resolve a manifest path against the base directory.
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Read an entire file into memory.
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()), err)]
    pub fn load(&self, path: impl AsRef<Path>) -> Result<EmbeddedFile> {
        let path = self.resolve(path);
        let data = std::fs::read(&path).map_err(|source| Error::ReadFile {
            path: path.clone(),
            source,
        })?;
        debug!("read {} bytes from {}", data.len(), path.display());

        Ok(EmbeddedFile { path, data })
    }

    /// Append the raw contents of a file to `sink`, returning its size.
    ///
    /// No header or padding is written.
    pub fn embed(&self, sink: &mut ByteSink, path: impl AsRef<Path>) -> Result<u32> {
        let file = self.load(path)?;
        file.append_to(sink)
    }
}

impl EmbeddedFile {
    /// The resolved path the file was read from
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Size of the file as stored in the archive
    pub fn size(&self) -> Result<u32> {
        size_u32(self.data.len())
    }

    /// Append the raw bytes to `sink`, returning the number written.
    pub fn append_to(&self, sink: &mut ByteSink) -> Result<u32> {
        let size = self.size()?;
        sink.append(&self.data);
        Ok(size)
    }
}
