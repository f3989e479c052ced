//! Concurrent image loading and Base64 encoding.
//!
//! [`ImageLoader::load_all`] reads and encodes every path as its own rayon
//! task. Results are collected by index, so the returned images are in input
//! order no matter which read finishes first.
//!
//! ## Failure handling
//!
//! A file that cannot be read (missing, permission denied, I/O error) or is
//! empty yields an [`Image`] with an empty payload. The batch always
//! completes; callers decide what an empty payload means for them.
//!
//! ## Workers
//!
//! By default tasks run on rayon's global pool. [`ImageLoader::max_workers`]
//! runs the batch on a dedicated pool of at most that many threads (clamped
//! to the core count). There is no timeout: a read that never returns blocks
//! its task, and therefore the batch, indefinitely.
//!
//! ## Sources
//!
//! Bytes come from an [`ImageSource`]. Production code uses [`FsSource`];
//! tests substitute in-memory sources to control timing and failures.

use crate::config::effective_workers;
use crate::encoding;
use crate::image_store::Image;
use rayon::prelude::*;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Extensions accepted by [`validate_image_path`].
pub const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp"];

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Image not found: {0}")]
    NotFound(PathBuf),
    #[error("Not a regular file: {0}")]
    NotAFile(PathBuf),
    #[error("Image is not readable: {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Unsupported image format (expected jpg, jpeg, png, gif or bmp): {0}")]
    UnsupportedFormat(PathBuf),
}

/// Where image bytes come from.
pub trait ImageSource: Send + Sync {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;
}

/// Reads images from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsSource;

impl ImageSource for FsSource {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }
}

pub struct ImageLoader {
    source: Box<dyn ImageSource>,
    max_workers: Option<usize>,
}

impl ImageLoader {
    /// Filesystem loader on the global rayon pool.
    pub fn new() -> Self {
        Self::with_source(FsSource)
    }

    pub fn with_source(source: impl ImageSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            max_workers: None,
        }
    }

    /// Cap the number of threads used by [`load_all`](Self::load_all).
    /// `None` restores the default pool.
    pub fn max_workers(mut self, max: Option<usize>) -> Self {
        self.max_workers = max;
        self
    }

    /// Read and encode one image. Never fails: problems produce an empty payload.
    pub fn load(&self, path: &str) -> Image {
        match self.source.read(Path::new(path)) {
            Ok(bytes) if bytes.is_empty() => {
                tracing::warn!(path, "image file is empty");
                Image::new(path, "")
            }
            Ok(bytes) => {
                let payload = encoding::encode(&bytes);
                tracing::debug!(path, bytes = bytes.len(), "image encoded");
                Image::new(path, payload)
            }
            Err(e) => {
                tracing::warn!(path, error = %e, "could not read image");
                Image::new(path, "")
            }
        }
    }

    /// Load every path concurrently; the result is in the same order as `paths`.
    pub fn load_all<S: AsRef<str> + Sync>(&self, paths: &[S]) -> Vec<Image> {
        let run = || {
            paths
                .par_iter()
                .with_max_len(1)
                .map(|p| self.load(p.as_ref()))
                .collect::<Vec<_>>()
        };

        match effective_workers(self.max_workers) {
            None => run(),
            Some(threads) => match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
                Ok(pool) => pool.install(run),
                Err(e) => {
                    tracing::warn!(error = %e, "could not build loader pool, using global pool");
                    run()
                }
            },
        }
    }
}

impl std::fmt::Debug for ImageLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageLoader")
            .field("max_workers", &self.max_workers)
            .finish_non_exhaustive()
    }
}

impl Default for ImageLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Check that a path names a readable image file with a supported extension.
pub fn validate_image_path(path: &Path) -> Result<(), LoadError> {
    let meta = std::fs::metadata(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => LoadError::NotFound(path.to_path_buf()),
        _ => LoadError::Unreadable {
            path: path.to_path_buf(),
            source: e,
        },
    })?;
    if !meta.is_file() {
        return Err(LoadError::NotAFile(path.to_path_buf()));
    }
    std::fs::File::open(path).map_err(|e| LoadError::Unreadable {
        path: path.to_path_buf(),
        source: e,
    })?;

    let supported = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|s| s.eq_ignore_ascii_case(ext))
        });
    if !supported {
        return Err(LoadError::UnsupportedFormat(path.to_path_buf()));
    }
    Ok(())
}
