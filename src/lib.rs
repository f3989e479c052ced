//! # SPICE Deck
//!
//! Builds self-contained HTML slideshows from a set of images. Every image is
//! embedded as Base64 inside an HTML template, so the output is a single file
//! that opens anywhere with no server and no sibling assets. The same inputs
//! can also be exported as an animated GIF.
//!
//! # Pipeline
//!
//! ```text
//! paths ──load+encode──▶ PresentationBuilder ──validate+substitute──▶ out.html
//!        (rayon, ordered)  (contents, lists,       (TemplateEngine)
//!                           labels, author, help)
//! ```
//!
//! A caller fills a [`builder::PresentationBuilder`] through its fluent API,
//! then hands it to a [`template::TemplateEngine`], which checks that every
//! image list has one label per image and only then writes the result.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`encoding`] | Base64 codec and `data:` URIs for embedded images |
//! | [`naming`] | Marker syntax (`<TAG>`), image list tags, label derivation |
//! | [`image_store`] | `Image` and ordered `ImageList` |
//! | [`loader`] | Concurrent, order-preserving image loading; path validation |
//! | [`content`] | Scalar `(tag, value)` substitutions |
//! | [`builder`] | `PresentationBuilder`, the aggregate handed to the engine |
//! | [`render`] | HTML fragments built with Maud |
//! | [`template`] | Template resolution, validation, substitution, atomic output |
//! | [`gif`] | Animated GIF export |
//! | [`config`] | JSON/TOML presentation config, merging and input checks |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Literal Markers, Not a Template Language
//!
//! Templates are ordinary HTML files with `<SPICE_…>` markers replaced
//! verbatim. There are no loops or expressions. The one conditional is the
//! help section, which disappears entirely unless its text, link and badge are
//! all set. Designers can edit templates in any HTML editor and preview them
//! directly in a browser.
//!
//! ## Fragments Through Maud
//!
//! The pieces the engine generates (image tags, labels, the help badge) are
//! built with [Maud](https://maud.lambda.xyz/), so file names and help values
//! are escaped on the way in. Labels, like the title and text, are passed
//! through as markup. The surrounding template is left untouched.
//!
//! ## Validate, Then Write Once
//!
//! A label/image count mismatch means the slideshow would pair captions with
//! the wrong pictures, so nothing is written at all. When output is written it
//! goes to a temp file first and replaces the destination in one rename.
//!
//! ## Image Failures Are Local
//!
//! One unreadable image never aborts a batch. The loader reports it with an
//! empty payload and the builder leaves it out; the count check at emission
//! then decides whether the presentation is still consistent.

pub mod builder;
pub mod config;
pub mod content;
pub mod encoding;
pub mod gif;
pub mod image_store;
pub mod loader;
pub mod naming;
pub mod output;
pub mod render;
pub mod template;

#[cfg(test)]
pub(crate) mod test_helpers;
