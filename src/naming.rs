//! Naming conventions shared by the builder and the template engine.
//!
//! ## Markers
//!
//! Templates carry literal `<TAG_NAME>` substrings. They look like HTML tags
//! but are matched as plain text, so a genuine element that happens to be
//! spelled the same way would also be replaced.
//!
//! ## Image list tags
//!
//! The default list is `SPICE_IMAGES`; additional lists are numbered from one:
//! - list 0 → `SPICE_IMAGES`
//! - list 1 → `SPICE_IMAGES_1`
//! - list 2 → `SPICE_IMAGES_2`
//!
//! ## Labels
//!
//! A label derived from an image is its filename without extension:
//! `/a/cat.png` → `cat`. When the path has no usable stem the raw path is used.

use std::path::Path;

pub const TITLE: &str = "SPICE_TITLE";
pub const TEXT: &str = "SPICE_TEXT";
pub const DEFAULT_IMAGE_LIST: &str = "SPICE_IMAGES";
pub const LABELS: &str = "SPICE_LABELS";
pub const AUTHOR_IMAGE: &str = "SPICE_AUTHOR_IMAGE";
pub const HELP_TEXT: &str = "SPICE_HELP_TEXT";
pub const HELP_CONTENT: &str = "SPICE_HELP_CONTENT";
pub const HELP_SECTION: &str = "SPICE_HELP_SECTION";
pub const BUILDING_INFO: &str = "SPICE_BUILDING_INFO";

/// Tags registered for the help section's benefit. Templates may place them
/// directly, but most only carry `<SPICE_HELP_SECTION>`.
pub fn is_help_part(tag: &str) -> bool {
    tag == HELP_TEXT || tag == HELP_CONTENT
}

/// Wrap a tag name in angle brackets: `SPICE_TITLE` → `<SPICE_TITLE>`.
pub fn marker(tag: &str) -> String {
    format!("<{tag}>")
}

/// Tag for the `index`-th image list (0 is the default list).
pub fn image_list_tag(index: usize) -> String {
    if index == 0 {
        DEFAULT_IMAGE_LIST.to_string()
    } else {
        format!("{DEFAULT_IMAGE_LIST}_{index}")
    }
}

/// Inverse of [`image_list_tag`]. Returns `None` for tags outside the convention.
pub fn image_list_index(tag: &str) -> Option<usize> {
    if tag == DEFAULT_IMAGE_LIST {
        return Some(0);
    }
    let rest = tag.strip_prefix(DEFAULT_IMAGE_LIST)?.strip_prefix('_')?;
    match rest.parse::<usize>() {
        Ok(0) | Err(_) => None,
        Ok(n) => Some(n),
    }
}

/// Derive a caption from an image path.
pub fn label_from_path(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| path.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_wraps_tag() {
        assert_eq!(marker(TITLE), "<SPICE_TITLE>");
    }

    #[test]
    fn help_parts_are_text_and_content_only() {
        assert!(is_help_part(HELP_TEXT));
        assert!(is_help_part(HELP_CONTENT));
        assert!(!is_help_part(HELP_SECTION));
        assert!(!is_help_part(TITLE));
    }

    #[test]
    fn list_tags_follow_numbering() {
        assert_eq!(image_list_tag(0), "SPICE_IMAGES");
        assert_eq!(image_list_tag(1), "SPICE_IMAGES_1");
        assert_eq!(image_list_tag(12), "SPICE_IMAGES_12");
    }

    #[test]
    fn list_index_parses_convention() {
        assert_eq!(image_list_index("SPICE_IMAGES"), Some(0));
        assert_eq!(image_list_index("SPICE_IMAGES_3"), Some(3));
    }

    #[test]
    fn list_index_rejects_other_tags() {
        assert_eq!(image_list_index("SPICE_IMAGES_"), None);
        assert_eq!(image_list_index("SPICE_IMAGES_0"), None);
        assert_eq!(image_list_index("SPICE_IMAGES_x"), None);
        assert_eq!(image_list_index("SPICE_IMAGESX"), None);
        assert_eq!(image_list_index("SPICE_TITLE"), None);
    }

    #[test]
    fn label_is_stem_without_extension() {
        assert_eq!(label_from_path("/a/cat.png"), "cat");
        assert_eq!(label_from_path("/a/dog.jpg"), "dog");
        assert_eq!(label_from_path("relative/2024-01-05.tif"), "2024-01-05");
    }

    #[test]
    fn label_keeps_inner_dots() {
        assert_eq!(label_from_path("scan.v2.png"), "scan.v2");
    }

    #[test]
    fn label_falls_back_to_raw_path() {
        assert_eq!(label_from_path(""), "");
        assert_eq!(label_from_path("/"), "/");
        assert_eq!(label_from_path(".."), "..");
    }
}
