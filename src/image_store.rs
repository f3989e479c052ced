//! Encoded images and the named lists that hold them.
//!
//! An [`Image`] pairs its source path with a Base64 payload. An empty payload
//! is the loader's "could not read this file" sentinel; the builder drops
//! such images instead of storing them.
//!
//! An [`ImageList`] is an ordered sequence bound to one template marker.
//! Order matters twice: it is the on-page sequence, and image `i` is paired
//! with label `i`.

use crate::render;

/// An image ready for embedding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    path: String,
    payload: String,
}

impl Image {
    pub fn new(path: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            payload: payload.into(),
        }
    }

    /// Source location, also used as alt text and for label derivation.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Base64 text; empty when the source could not be read.
    pub fn payload(&self) -> &str {
        &self.payload
    }

    pub fn is_loaded(&self) -> bool {
        !self.payload.is_empty()
    }
}

/// Ordered images bound to one `<SPICE_IMAGES…>` marker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageList {
    images: Vec<Image>,
}

impl ImageList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, image: Image) {
        self.images.push(image);
    }

    /// Images in insertion order.
    pub fn images(&self) -> &[Image] {
        &self.images
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// `<img>` elements for every image, in order, with no separator.
    ///
    /// Callers substitute [`render::NO_IMAGES_FALLBACK`] for empty lists
    /// rather than an empty string.
    pub fn render_fragment(&self) -> String {
        render::image_tags(&self.images).into_string()
    }
}

impl FromIterator<Image> for ImageList {
    fn from_iter<I: IntoIterator<Item = Image>>(iter: I) -> Self {
        Self {
            images: iter.into_iter().collect(),
        }
    }
}
