//! CLI output formatting.
//!
//! Each command has a `format_*` function that returns `Vec<String>` and a
//! `print_*` wrapper that writes those lines to stdout. Format functions are
//! pure, so tests assert on exact lines without capturing stdout.
//!
//! Entities lead with a 3-digit positional index; paths and sizes are shown
//! as indented context lines.
//!
//! ## Spice build
//!
//! ```text
//! Presentation → deck/ndvi.html
//!     Template: templates/slider.html
//!     SPICE_IMAGES (3 images)
//!     SPICE_IMAGES_1 (3 images)
//!     Labels: 3
//! Wrote 182403 bytes
//! ```
//!
//! ## Builder summary (debug)
//!
//! ```text
//! Presentation: NDVI 2023
//! Contents
//!     001 SPICE_TITLE: NDVI 2023
//! Image lists
//!     SPICE_IMAGES (2 images)
//!         001 jan.png
//!         002 feb.png
//! Labels
//!     001 jan
//!     002 feb
//! Author image: none
//! Help: none
//! Template: default
//! ```

use crate::builder::PresentationBuilder;
use crate::config::CheckReport;
use crate::gif::GifReport;
use crate::render::BuildInfo;
use crate::template::Emission;

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Truncate to `max` characters, appending `...` if truncated.
fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

// ============================================================================
// Builder summary
// ============================================================================

/// Everything the builder holds, as logged before emission in debug mode.
///
/// Content values are flattened to one line and cut at 60 characters;
/// Base64 payloads are shown by size only.
pub fn format_builder_summary(builder: &PresentationBuilder) -> Vec<String> {
    let mut lines = vec![format!("Presentation: {}", builder.title())];

    lines.push("Contents".to_string());
    for (i, entry) in builder.contents().iter().enumerate() {
        let value = entry.value().replace('\n', " ");
        lines.push(format!(
            "{}{} {}: {}",
            indent(1),
            format_index(i + 1),
            entry.tag(),
            truncate(value.trim(), 60)
        ));
    }

    lines.push("Image lists".to_string());
    for (tag, list) in builder.image_lists() {
        lines.push(format!(
            "{}{} ({})",
            indent(1),
            tag,
            plural(list.len(), "image", "images")
        ));
        for (i, image) in list.images().iter().enumerate() {
            lines.push(format!("{}{} {}", indent(2), format_index(i + 1), image.path()));
        }
    }

    lines.push("Labels".to_string());
    for (i, label) in builder.labels().iter().enumerate() {
        lines.push(format!("{}{} {}", indent(1), format_index(i + 1), label));
    }

    lines.push(match builder.author_image() {
        Some(payload) => format!("Author image: {} bytes base64", payload.len()),
        None => "Author image: none".to_string(),
    });
    lines.push(match builder.help() {
        Some(help) if help.is_complete() => format!("Help: {}", help.link),
        Some(_) => "Help: incomplete, section will be removed".to_string(),
        None => "Help: none".to_string(),
    });
    lines.push(format!(
        "Template: {}",
        builder.template().unwrap_or("default")
    ));
    lines
}

// ============================================================================
// spice
// ============================================================================

pub fn format_emission(emission: &Emission) -> Vec<String> {
    let mut lines = vec![format!(
        "Presentation \u{2192} {}",
        emission.output.display()
    )];
    lines.push(format!("{}Template: {}", indent(1), emission.template));
    for (tag, count) in &emission.lists {
        lines.push(format!(
            "{}{} ({})",
            indent(1),
            tag,
            plural(*count, "image", "images")
        ));
    }
    lines.push(format!("{}Labels: {}", indent(1), emission.labels));
    lines.push(format!("Wrote {} bytes", emission.bytes));
    lines
}

pub fn print_emission(emission: &Emission) {
    for line in format_emission(emission) {
        println!("{}", line);
    }
}

// ============================================================================
// gif
// ============================================================================

pub fn format_gif_report(report: &GifReport) -> Vec<String> {
    vec![
        format!("Animation \u{2192} {}", report.output.display()),
        format!(
            "{}{} at {}x{}",
            indent(1),
            plural(report.frames, "frame", "frames"),
            report.width,
            report.height
        ),
    ]
}

pub fn print_gif_report(report: &GifReport) {
    for line in format_gif_report(report) {
        println!("{}", line);
    }
}

// ============================================================================
// check
// ============================================================================

/// One line per image with its validation result, then the template that
/// would be used, any label count mismatches, and an overall verdict.
pub fn format_check_output(report: &CheckReport) -> Vec<String> {
    let mut lines = vec!["Images".to_string()];
    for (i, (path, result)) in report.images.iter().enumerate() {
        lines.push(format!("{}{} {}", indent(1), format_index(i + 1), path));
        if let Err(e) = result {
            lines.push(format!("{}Error: {}", indent(2), e));
        }
    }

    match &report.template {
        Ok(origin) => lines.push(format!("Template: {}", origin)),
        Err(e) => lines.push(format!("Template: {}", e)),
    }

    for (tag, images, labels) in &report.label_mismatches {
        lines.push(format!(
            "Labels: {} has {} but there are {}",
            tag,
            plural(*images, "image", "images"),
            plural(*labels, "label", "labels")
        ));
    }

    let problems = report.problem_count();
    lines.push(if problems == 0 {
        "All inputs OK".to_string()
    } else {
        format!("{} found", plural(problems, "problem", "problems"))
    });
    lines
}

pub fn print_check_output(report: &CheckReport) {
    for line in format_check_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// info
// ============================================================================

pub fn format_build_info(info: &BuildInfo) -> Vec<String> {
    let commit = if info.git_hash.is_empty() {
        "unknown"
    } else {
        info.git_hash.as_str()
    };
    vec![
        format!("spice-deck {}", info.version),
        format!("{}Commit: {}", indent(1), commit),
        format!("{}Target: {} ({})", indent(1), info.target, info.profile),
        format!(
            "{}Image formats: {}",
            indent(1),
            crate::loader::SUPPORTED_EXTENSIONS.join(", ")
        ),
    ]
}

pub fn print_build_info(info: &BuildInfo) {
    for line in format_build_info(info) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
