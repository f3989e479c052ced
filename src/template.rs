//! Template loading and emission.
//!
//! A template is plain text containing literal `<SPICE_…>` markers. The
//! engine never parses HTML: every substitution is a verbatim substring
//! replacement on a fresh copy of the cached template text, so anything in
//! the template that happens to look like a marker is replaced too.
//!
//! ## Resolution
//!
//! [`TemplateEngine::load_from`] turns an identifier into template text:
//!
//! | Identifier | Result |
//! |---|---|
//! | contains `.html` | that path; missing is an error |
//! | bare name | `<templates>/<name>.html` if it exists |
//! | otherwise / none | `<templates>/base_template.html` if it exists |
//! | nothing on disk | built-in template compiled into the binary |
//!
//! ## Emission order
//!
//! 1. Validate: every image list must have exactly as many images as there
//!    are labels. A mismatch aborts before anything is written.
//! 2. Scalar contents. Duplicate tags resolve to the last registered value.
//! 3. Image lists (empty lists get [`NO_IMAGES_FALLBACK`]). A template's
//!    `<SPICE_IMAGES>` marker gets the fallback too when no default list
//!    was registered.
//! 4. Labels, author image, help section, build info.
//!
//! Markers with no matching template text are logged and skipped.
//! [`TemplateEngine::write`] renders, then writes atomically: a temp file in
//! the destination directory is persisted over the output only on success.

use crate::builder::PresentationBuilder;
use crate::naming::{self, DEFAULT_IMAGE_LIST};
use crate::output;
use crate::render::{self, BuildInfo, NO_IMAGES_FALLBACK};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

/// Template used when no template file can be found on disk.
pub const BUILTIN_TEMPLATE: &str = include_str!("../static/base_template.html");

/// Directory searched for named templates, relative to the working directory.
pub const TEMPLATES_DIR: &str = "templates";

/// File name of the on-disk default template inside [`TEMPLATES_DIR`].
pub const DEFAULT_TEMPLATE_FILE: &str = "base_template.html";

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Template not found: {0}")]
    NotFound(PathBuf),
    #[error(
        "Image list {tag} has {images} images but there are {labels} labels; counts must match"
    )]
    Validation {
        tag: String,
        images: usize,
        labels: usize,
    },
    #[error("Could not write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Where the engine's template text came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateOrigin {
    File(PathBuf),
    BuiltIn,
    Inline,
}

impl std::fmt::Display for TemplateOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TemplateOrigin::File(path) => write!(f, "{}", path.display()),
            TemplateOrigin::BuiltIn => write!(f, "built-in template"),
            TemplateOrigin::Inline => write!(f, "inline template"),
        }
    }
}

/// What an emission produced, for reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Emission {
    pub output: PathBuf,
    pub template: TemplateOrigin,
    /// `(tag, image count)` per list, in tag order.
    pub lists: Vec<(String, usize)>,
    pub labels: usize,
    pub bytes: usize,
}

#[derive(Debug, Clone)]
pub struct TemplateEngine {
    origin: TemplateOrigin,
    text: String,
}

impl TemplateEngine {
    /// Resolve `identifier` against `./templates` and load it.
    pub fn load(identifier: Option<&str>) -> Result<Self, TemplateError> {
        Self::load_from(Path::new(TEMPLATES_DIR), identifier)
    }

    pub fn load_from(templates_dir: &Path, identifier: Option<&str>) -> Result<Self, TemplateError> {
        let origin = resolve(templates_dir, identifier)?;
        let text = match &origin {
            TemplateOrigin::File(path) => fs::read_to_string(path)?,
            TemplateOrigin::BuiltIn => BUILTIN_TEMPLATE.to_string(),
            TemplateOrigin::Inline => unreachable!("resolve never yields an inline template"),
        };
        tracing::debug!(template = %origin, bytes = text.len(), "template loaded");
        Ok(Self { origin, text })
    }

    /// Engine over template text held in memory.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            origin: TemplateOrigin::Inline,
            text: text.into(),
        }
    }

    pub fn origin(&self) -> &TemplateOrigin {
        &self.origin
    }

    /// The cached template, never modified by emission.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Check that every image list pairs one-to-one with the labels.
    pub fn validate(builder: &PresentationBuilder) -> Result<(), TemplateError> {
        let labels = builder.labels().len();
        for (tag, list) in builder.image_lists() {
            if list.len() != labels {
                return Err(TemplateError::Validation {
                    tag: tag.clone(),
                    images: list.len(),
                    labels,
                });
            }
        }
        Ok(())
    }

    /// Render with build information for this binary, stamped now.
    pub fn render(&self, builder: &PresentationBuilder) -> Result<String, TemplateError> {
        self.render_with(builder, &BuildInfo::current())
    }

    pub fn render_with(
        &self,
        builder: &PresentationBuilder,
        build_info: &BuildInfo,
    ) -> Result<String, TemplateError> {
        if builder.is_debug() {
            for line in output::format_builder_summary(builder) {
                tracing::info!("{line}");
            }
        }
        Self::validate(builder)?;

        let mut out = self.text.clone();

        for entry in builder.contents().effective() {
            if substitute(&mut out, entry.tag(), entry.value()) {
                continue;
            }
            if naming::is_help_part(entry.tag()) {
                tracing::debug!(tag = entry.tag(), "help marker not in template");
            } else {
                tracing::warn!(tag = entry.tag(), "marker not found in template");
            }
        }

        for (tag, list) in builder.image_lists() {
            let fragment = if list.is_empty() {
                NO_IMAGES_FALLBACK.to_string()
            } else {
                list.render_fragment()
            };
            if !substitute(&mut out, tag, &fragment) {
                tracing::warn!(tag = tag.as_str(), "image list marker not found in template");
            }
        }
        if builder.image_list(DEFAULT_IMAGE_LIST).is_none() {
            substitute(&mut out, DEFAULT_IMAGE_LIST, NO_IMAGES_FALLBACK);
        }

        let labels = render::label_tags(builder.labels()).into_string();
        substitute(&mut out, naming::LABELS, &labels);

        let author = builder
            .author_image()
            .map(|payload| render::author_image(payload).into_string())
            .unwrap_or_default();
        substitute(&mut out, naming::AUTHOR_IMAGE, &author);

        match builder.help().filter(|h| h.is_complete()) {
            Some(help) => {
                let content = render::help_content(&help.link, &help.badge_url);
                let section = render::help_section(&help.text, &content).into_string();
                substitute(&mut out, naming::HELP_SECTION, &section);
            }
            None => {
                remove_help_block(&mut out);
                substitute(&mut out, naming::HELP_SECTION, "");
            }
        }

        substitute(&mut out, naming::BUILDING_INFO, &build_info.to_comment());

        Ok(out)
    }

    /// Render and write to `output`, creating parent directories.
    ///
    /// Nothing is written when validation fails, and an existing file at
    /// `output` is only replaced once the new content is fully on disk.
    pub fn write(
        &self,
        builder: &PresentationBuilder,
        output: &Path,
    ) -> Result<Emission, TemplateError> {
        let html = self.render(builder)?;
        write_atomic(output, html.as_bytes())?;
        tracing::info!(output = %output.display(), bytes = html.len(), "presentation written");

        Ok(Emission {
            output: output.to_path_buf(),
            template: self.origin.clone(),
            lists: builder
                .image_lists()
                .iter()
                .map(|(tag, list)| (tag.clone(), list.len()))
                .collect(),
            labels: builder.labels().len(),
            bytes: html.len(),
        })
    }
}

/// Pick the template file for `identifier`, or fall back to the built-in one.
pub fn resolve(templates_dir: &Path, identifier: Option<&str>) -> Result<TemplateOrigin, TemplateError> {
    let identifier = identifier.map(str::trim).filter(|id| !id.is_empty());

    if let Some(id) = identifier {
        if id.contains(".html") {
            let path = PathBuf::from(id);
            return if path.is_file() {
                Ok(TemplateOrigin::File(path))
            } else {
                Err(TemplateError::NotFound(path))
            };
        }
        let named = templates_dir.join(format!("{id}.html"));
        if named.is_file() {
            return Ok(TemplateOrigin::File(named));
        }
        tracing::warn!(template = id, "named template not found, using default");
    }

    let default = templates_dir.join(DEFAULT_TEMPLATE_FILE);
    if default.is_file() {
        Ok(TemplateOrigin::File(default))
    } else {
        Ok(TemplateOrigin::BuiltIn)
    }
}

/// Replace every occurrence of `<tag>`. Returns whether any was found.
fn substitute(text: &mut String, tag: &str, value: &str) -> bool {
    let marker = naming::marker(tag);
    if !text.contains(&marker) {
        return false;
    }
    *text = text.replace(&marker, value);
    true
}

/// Drop the first help-section container, from its opening tag through the
/// first `</div>` after it.
fn remove_help_block(text: &mut String) {
    const OPEN: &str = r#"<div class="help-section">"#;
    const CLOSE: &str = "</div>";
    let Some(start) = text.find(OPEN) else {
        return;
    };
    if let Some(len) = text[start..].find(CLOSE) {
        text.replace_range(start..start + len + CLOSE.len(), "");
    }
}

/// Write `bytes` to `path` via a temp file persisted on success.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), TemplateError> {
    let write_err = |source: io::Error| TemplateError::Write {
        path: path.to_path_buf(),
        source,
    };
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    fs::create_dir_all(dir).map_err(write_err)?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(bytes).map_err(write_err)?;
    tmp.flush().map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}
