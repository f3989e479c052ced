//! HTML fragments substituted into templates.
//!
//! Fragments are built with [maud](https://maud.lambda.xyz/), so paths and
//! help values are escaped on interpolation. Labels are the exception: like
//! the title and text, they are template content and may carry inline markup,
//! so they are emitted as-is. The help badge anchor is assembled here and
//! travels through the content registry as already-escaped HTML.

use crate::encoding::data_uri;
use crate::image_store::Image;
use maud::{Markup, PreEscaped, html};

/// Shown in place of an image list that has no images.
pub const NO_IMAGES_FALLBACK: &str = "<p>No images available</p>";

/// One `<img>` per image, concatenated with no separator.
pub fn image_tags(images: &[Image]) -> Markup {
    html! {
        @for image in images {
            img src=(data_uri(image.payload())) alt=(image.path()) loading="lazy";
        }
    }
}

/// One `<span>` per label, concatenated with no separator. Label text is not
/// escaped.
pub fn label_tags(labels: &[String]) -> Markup {
    html! {
        @for label in labels {
            span { (PreEscaped(label)) }
        }
    }
}

pub fn author_image(payload: &str) -> Markup {
    html! {
        img.author-image src=(data_uri(payload)) alt="Author";
    }
}

/// Anchor wrapping the help badge image, registered as `SPICE_HELP_CONTENT`.
pub fn help_content(link: &str, badge_url: &str) -> Markup {
    html! {
        a href=(link) {
            img src=(badge_url) alt="Help Badge";
        }
    }
}

/// The block that replaces `<SPICE_HELP_SECTION>` when help is complete.
pub fn help_section(text: &str, content: &Markup) -> Markup {
    html! {
        div.help-button-container {
            div.help-text { (text) }
            div.help-badge { (content) }
        }
    }
}

/// Build provenance stamped into `<SPICE_BUILDING_INFO>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildInfo {
    pub version: String,
    pub git_hash: String,
    pub target: String,
    pub profile: String,
    pub generated_at: String,
}

impl BuildInfo {
    /// Build info for this binary, timestamped now (local time).
    pub fn current() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            git_hash: env!("GIT_HASH").to_string(),
            target: env!("SPICE_BUILD_TARGET").to_string(),
            profile: env!("SPICE_BUILD_PROFILE").to_string(),
            generated_at: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }

    /// Render as an HTML comment.
    pub fn to_comment(&self) -> String {
        let hash = if self.git_hash.is_empty() {
            "unknown"
        } else {
            self.git_hash.as_str()
        };
        format!(
            "<!--\n    spice-deck build information\n    ----------------------------\n    Generated on: {}\n    Version: {}\n    Commit: {}\n    Target: {} ({})\n-->",
            self.generated_at, self.version, hash, self.target, self.profile
        )
    }
}
