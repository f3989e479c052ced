//! Shared test utilities for the spice-deck test suite.
//!
//! Fixture images are generated on the fly with the `image` crate instead of
//! being checked in, so every test gets fresh files in its own temp dir.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! let red = write_png(tmp.path(), "red.png", 8, 8, [255, 0, 0]);
//! builder.add_image(&path_string(&red));
//! ```

use image::{Rgb, RgbImage};
use std::path::{Path, PathBuf};

// =========================================================================
// Fixture images
// =========================================================================

/// Write a solid-color PNG and return its path.
pub fn write_png(dir: &Path, name: &str, width: u32, height: u32, rgb: [u8; 3]) -> PathBuf {
    let path = dir.join(name);
    RgbImage::from_pixel(width, height, Rgb(rgb))
        .save(&path)
        .unwrap_or_else(|e| panic!("could not write fixture {}: {e}", path.display()));
    path
}

// =========================================================================
// Conversions
// =========================================================================

/// A path as the `String` the builder and loader take.
pub fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
