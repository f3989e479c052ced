//! Presentation configuration file.
//!
//! A config file describes one export: what to build, from which images, and
//! where to write it. JSON and TOML are both accepted; the format is chosen by
//! file extension (`.toml` → TOML, anything else → JSON).
//!
//! ## Example
//!
//! ```json
//! {
//!   "export_format": "spice",
//!   "output_filename": "ndvi.html",
//!   "title": "NDVI 2023",
//!   "main_text": "Monthly composites",
//!   "images": ["jan.png", "feb.png"],
//!   "images_1": ["jan_rgb.png", "feb_rgb.png"],
//!   "labels": ["Jan", "Feb"],
//!   "label_by_name": false,
//!   "author_image": "me.png",
//!   "template": "slider",
//!   "help_text": "Drag the slider",
//!   "help_link": "https://example.org/help",
//!   "help_badge_url": "https://example.org/badge.svg",
//!   "max_workers": 4
//! }
//! ```
//!
//! `images` feeds the `SPICE_IMAGES` list, `images_N` feeds `SPICE_IMAGES_N`.
//! Any other unknown key is rejected to catch typos early.

use crate::loader::{LoadError, validate_image_path};
use crate::naming;
use crate::template::{self, TemplateOrigin};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_TITLE: &str = "SPICE Presentation";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
    #[error("Author image could not be loaded: {0}")]
    AuthorImage(String),
}

/// What an export produces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Self-contained HTML slideshow
    #[default]
    Spice,
    /// Animated GIF
    Gif,
}

/// Help badge shown in the presentation's help section.
///
/// The section is rendered only when all three values are non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HelpConfig {
    pub text: String,
    pub link: String,
    pub badge_url: String,
}

impl HelpConfig {
    pub fn new(
        text: impl Into<String>,
        link: impl Into<String>,
        badge_url: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            link: link.into(),
            badge_url: badge_url.into(),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.text.is_empty() && !self.link.is_empty() && !self.badge_url.is_empty()
    }
}

/// Contents of a presentation config file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PresentationConfig {
    pub export_format: Option<ExportFormat>,
    pub output_filename: Option<PathBuf>,
    pub title: Option<String>,
    pub main_text: Option<String>,
    pub labels: Vec<String>,
    pub label_by_name: bool,
    pub author_image: Option<String>,
    pub template: Option<String>,
    pub help_text: Option<String>,
    pub help_link: Option<String>,
    pub help_badge_url: Option<String>,
    /// Cap on concurrent image loads. Absent means one task per image on
    /// the default pool.
    pub max_workers: Option<usize>,
    /// `images`, `images_1`, … keyed by their config name.
    #[serde(flatten)]
    pub image_keys: BTreeMap<String, Vec<String>>,
}

impl PresentationConfig {
    /// Validate required fields and image list keys.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.export_format.is_none() {
            return Err(ConfigError::Validation(
                "missing required field: export_format".into(),
            ));
        }
        if self.output_filename.is_none() {
            return Err(ConfigError::Validation(
                "missing required field: output_filename".into(),
            ));
        }
        if self.max_workers == Some(0) {
            return Err(ConfigError::Validation(
                "max_workers must be at least 1".into(),
            ));
        }
        for key in self.image_keys.keys() {
            if list_tag_for_key(key).is_none() {
                return Err(ConfigError::Validation(format!(
                    "unknown key `{key}` (image lists are `images`, `images_1`, `images_2`, ...)"
                )));
            }
        }
        Ok(())
    }

    /// Image lists keyed by template tag (`SPICE_IMAGES`, `SPICE_IMAGES_1`, …).
    pub fn image_lists(&self) -> BTreeMap<String, Vec<String>> {
        self.image_keys
            .iter()
            .filter_map(|(key, paths)| list_tag_for_key(key).map(|tag| (tag, paths.clone())))
            .collect()
    }

    /// Paths of the default list (`images`).
    pub fn images(&self) -> &[String] {
        self.image_keys
            .get("images")
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn help(&self) -> HelpConfig {
        HelpConfig::new(
            self.help_text.clone().unwrap_or_default(),
            self.help_link.clone().unwrap_or_default(),
            self.help_badge_url.clone().unwrap_or_default(),
        )
    }

    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or(DEFAULT_TITLE)
    }

    /// Layer `overrides` on top of `self`. Set options and non-empty lists in
    /// `overrides` win; an image list given in `overrides` replaces the
    /// whole list of the same key.
    pub fn merge(mut self, overrides: PresentationConfig) -> PresentationConfig {
        fn take<T>(base: &mut Option<T>, over: Option<T>) {
            if over.is_some() {
                *base = over;
            }
        }
        take(&mut self.export_format, overrides.export_format);
        take(&mut self.output_filename, overrides.output_filename);
        take(&mut self.title, overrides.title);
        take(&mut self.main_text, overrides.main_text);
        take(&mut self.author_image, overrides.author_image);
        take(&mut self.template, overrides.template);
        take(&mut self.help_text, overrides.help_text);
        take(&mut self.help_link, overrides.help_link);
        take(&mut self.help_badge_url, overrides.help_badge_url);
        take(&mut self.max_workers, overrides.max_workers);
        if !overrides.labels.is_empty() {
            self.labels = overrides.labels;
        }
        self.label_by_name |= overrides.label_by_name;
        for (key, paths) in overrides.image_keys {
            if !paths.is_empty() {
                self.image_keys.insert(key, paths);
            }
        }
        self
    }

    /// Check every input without building anything: image paths, the
    /// author image, template resolution and label counts.
    pub fn check(&self, templates_dir: &Path) -> CheckReport {
        let mut images = Vec::new();
        for paths in self.image_lists().values() {
            for path in paths {
                images.push((path.clone(), validate_image_path(Path::new(path))));
            }
        }
        if let Some(author) = &self.author_image {
            images.push((author.clone(), validate_image_path(Path::new(author))));
        }

        let template = template::resolve(templates_dir, self.template.as_deref())
            .map_err(|e| e.to_string());

        // Labels derived from names come from the default list, or the first
        // list by tag, so every other list must match that length.
        let lists = self.image_lists();
        let label_count = if self.label_by_name {
            lists
                .get(naming::DEFAULT_IMAGE_LIST)
                .or_else(|| lists.values().next())
                .map_or(0, Vec::len)
        } else {
            self.labels.len()
        };
        let label_mismatches = lists
            .into_iter()
            .filter(|(_, paths)| paths.len() != label_count)
            .map(|(tag, paths)| (tag, paths.len(), label_count))
            .collect();

        CheckReport {
            images,
            template,
            label_mismatches,
        }
    }
}

/// Outcome of [`PresentationConfig::check`].
#[derive(Debug)]
pub struct CheckReport {
    /// Every referenced image with its validation result, lists first.
    pub images: Vec<(String, Result<(), LoadError>)>,
    pub template: Result<TemplateOrigin, String>,
    /// `(tag, images, labels)` for each list whose count differs from the
    /// labels.
    pub label_mismatches: Vec<(String, usize, usize)>,
}

impl CheckReport {
    pub fn problem_count(&self) -> usize {
        self.images.iter().filter(|(_, r)| r.is_err()).count()
            + usize::from(self.template.is_err())
            + self.label_mismatches.len()
    }

    pub fn is_ok(&self) -> bool {
        self.problem_count() == 0
    }
}

/// Map a config key to its template tag: `images` → `SPICE_IMAGES`,
/// `images_2` → `SPICE_IMAGES_2`.
fn list_tag_for_key(key: &str) -> Option<String> {
    if key == "images" {
        return Some(naming::image_list_tag(0));
    }
    let index: usize = key.strip_prefix("images_")?.parse().ok()?;
    (index > 0).then(|| naming::image_list_tag(index))
}

/// Load and validate a config file, picking the parser by extension.
pub fn load_config(path: &Path) -> Result<PresentationConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let is_toml = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("toml"));
    let config: PresentationConfig = if is_toml {
        toml::from_str(&content)?
    } else {
        serde_json::from_str(&content)?
    };
    config.validate()?;
    Ok(config)
}

/// Resolve the effective worker count.
///
/// - `None` → `None` (default pool, one task per image)
/// - `Some(n)` → `Some(min(n, cores))`, never below one
pub fn effective_workers(max: Option<usize>) -> Option<usize> {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    max.map(|n| n.clamp(1, cores))
}

/// A stock config with every key present, printed by `gen-config`.
///
/// Only `export_format` and `output_filename` are required; `null` values
/// may be dropped.
pub fn stock_config_json() -> &'static str {
    r#"{
  "export_format": "spice",
  "output_filename": "presentation.html",
  "title": "SPICE Presentation",
  "main_text": "",
  "images": ["first.png", "second.png"],
  "labels": ["First", "Second"],
  "label_by_name": false,
  "author_image": null,
  "template": null,
  "help_text": null,
  "help_link": null,
  "help_badge_url": null,
  "max_workers": null
}
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn parse_minimal_json() {
        let tmp = TempDir::new().unwrap();
        let path = write(
            &tmp,
            "c.json",
            r#"{"export_format": "gif", "output_filename": "out.gif", "images": ["a.png"]}"#,
        );
        let config = load_config(&path).unwrap();
        assert_eq!(config.export_format, Some(ExportFormat::Gif));
        assert_eq!(config.output_filename, Some(PathBuf::from("out.gif")));
        assert_eq!(config.images(), ["a.png".to_string()]);
        assert_eq!(config.title(), DEFAULT_TITLE);
        assert!(!config.label_by_name);
    }

    #[test]
    fn image_keys_map_to_list_tags() {
        let tmp = TempDir::new().unwrap();
        let path = write(
            &tmp,
            "c.json",
            r#"{
                "export_format": "spice",
                "output_filename": "out.html",
                "images": ["a.png", "b.png"],
                "images_1": ["c.png"],
                "images_2": []
            }"#,
        );
        let lists = load_config(&path).unwrap().image_lists();
        assert_eq!(
            lists.keys().collect::<Vec<_>>(),
            vec!["SPICE_IMAGES", "SPICE_IMAGES_1", "SPICE_IMAGES_2"]
        );
        assert_eq!(lists["SPICE_IMAGES"], vec!["a.png", "b.png"]);
        assert!(lists["SPICE_IMAGES_2"].is_empty());
    }

    #[test]
    fn parse_toml_by_extension() {
        let tmp = TempDir::new().unwrap();
        let path = write(
            &tmp,
            "c.toml",
            r#"
export_format = "spice"
output_filename = "out.html"
title = "Demo"
labels = ["X"]
images = ["x.png"]
max_workers = 2
"#,
        );
        let config = load_config(&path).unwrap();
        assert_eq!(config.title(), "Demo");
        assert_eq!(config.labels, vec!["X"]);
        assert_eq!(config.max_workers, Some(2));
    }

    #[test]
    fn help_fields_build_help_config() {
        let config = PresentationConfig {
            help_text: Some("Need help?".into()),
            help_link: Some("https://example.org".into()),
            ..Default::default()
        };
        let help = config.help();
        assert_eq!(help.text, "Need help?");
        assert_eq!(help.badge_url, "");
        assert!(!help.is_complete());
    }

    #[test]
    fn missing_export_format_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = write(&tmp, "c.json", r#"{"output_filename": "out.html"}"#);
        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("export_format"));
    }

    #[test]
    fn missing_output_filename_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = write(&tmp, "c.json", r#"{"export_format": "spice"}"#);
        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("output_filename"));
    }

    #[test]
    fn invalid_export_format_is_a_parse_error() {
        let tmp = TempDir::new().unwrap();
        let path = write(
            &tmp,
            "c.json",
            r#"{"export_format": "pdf", "output_filename": "out.pdf"}"#,
        );
        assert!(matches!(load_config(&path), Err(ConfigError::Json(_))));
    }

    #[test]
    fn unknown_list_key_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = write(
            &tmp,
            "c.json",
            r#"{"export_format": "spice", "output_filename": "o.html", "imagez": ["a.png"]}"#,
        );
        assert!(matches!(
            load_config(&path),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn zero_workers_is_rejected() {
        let config = PresentationConfig {
            export_format: Some(ExportFormat::Spice),
            output_filename: Some("o.html".into()),
            max_workers: Some(0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn list_tag_for_key_follows_convention() {
        assert_eq!(list_tag_for_key("images").as_deref(), Some("SPICE_IMAGES"));
        assert_eq!(list_tag_for_key("images_3").as_deref(), Some("SPICE_IMAGES_3"));
        assert_eq!(list_tag_for_key("images_0"), None);
        assert_eq!(list_tag_for_key("images_"), None);
        assert_eq!(list_tag_for_key("labels"), None);
    }

    #[test]
    fn effective_workers_clamps_to_cores() {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        assert_eq!(effective_workers(None), None);
        assert_eq!(effective_workers(Some(1)), Some(1));
        assert_eq!(effective_workers(Some(usize::MAX)), Some(cores));
        assert_eq!(effective_workers(Some(0)), Some(1));
    }

    #[test]
    fn stock_config_is_valid() {
        let config: PresentationConfig = serde_json::from_str(stock_config_json()).unwrap();
        config.validate().unwrap();
        assert_eq!(config.image_lists().len(), 1);
    }

    // =========================================================================
    // Merge
    // =========================================================================

    #[test]
    fn merge_prefers_set_overrides() {
        let base = PresentationConfig {
            export_format: Some(ExportFormat::Spice),
            output_filename: Some("base.html".into()),
            title: Some("Base".into()),
            labels: vec!["a".into()],
            image_keys: BTreeMap::from([("images".to_string(), vec!["a.png".to_string()])]),
            ..Default::default()
        };
        let overrides = PresentationConfig {
            title: Some("Override".into()),
            image_keys: BTreeMap::from([
                ("images".to_string(), Vec::new()),
                ("images_1".to_string(), vec!["b.png".to_string()]),
            ]),
            ..Default::default()
        };
        let merged = base.merge(overrides);
        assert_eq!(merged.title(), "Override");
        assert_eq!(merged.output_filename, Some(PathBuf::from("base.html")));
        assert_eq!(merged.labels, vec!["a"]);
        assert_eq!(merged.images(), ["a.png".to_string()]);
        assert_eq!(merged.image_lists()["SPICE_IMAGES_1"], vec!["b.png"]);
    }

    #[test]
    fn merge_label_by_name_is_sticky() {
        let base = PresentationConfig {
            label_by_name: true,
            ..Default::default()
        };
        assert!(base.merge(PresentationConfig::default()).label_by_name);
    }

    // =========================================================================
    // Check
    // =========================================================================

    #[test]
    fn check_reports_each_problem() {
        let tmp = TempDir::new().unwrap();
        let good = write(&tmp, "a.png", "x");
        let config = PresentationConfig {
            labels: vec!["only".into()],
            author_image: Some(tmp.path().join("me.txt").to_string_lossy().into_owned()),
            template: Some(tmp.path().join("gone.html").to_string_lossy().into_owned()),
            image_keys: BTreeMap::from([(
                "images".to_string(),
                vec![
                    good.to_string_lossy().into_owned(),
                    tmp.path().join("missing.png").to_string_lossy().into_owned(),
                ],
            )]),
            ..Default::default()
        };

        let report = config.check(tmp.path());
        assert_eq!(report.images.len(), 3);
        assert!(report.images[0].1.is_ok());
        assert!(matches!(report.images[1].1, Err(LoadError::NotFound(_))));
        assert!(matches!(report.images[2].1, Err(LoadError::NotFound(_))));
        assert!(report.template.is_err());
        assert_eq!(
            report.label_mismatches,
            vec![("SPICE_IMAGES".to_string(), 2, 1)]
        );
        assert_eq!(report.problem_count(), 4);
    }

    #[test]
    fn check_labels_by_name_from_default_list() {
        let tmp = TempDir::new().unwrap();
        let good = write(&tmp, "a.png", "x").to_string_lossy().into_owned();
        let config = PresentationConfig {
            label_by_name: true,
            image_keys: BTreeMap::from([
                ("images".to_string(), vec![good.clone(), good.clone()]),
                ("images_1".to_string(), vec![good.clone(), good.clone(), good.clone()]),
            ]),
            ..Default::default()
        };
        let report = config.check(tmp.path());
        assert_eq!(
            report.label_mismatches,
            vec![("SPICE_IMAGES_1".to_string(), 3, 2)]
        );
        assert_eq!(report.problem_count(), 1);
    }

    #[test]
    fn check_labels_by_name_from_first_list_without_default() {
        let tmp = TempDir::new().unwrap();
        let good = write(&tmp, "a.png", "x").to_string_lossy().into_owned();
        let config = PresentationConfig {
            label_by_name: true,
            image_keys: BTreeMap::from([
                ("images_1".to_string(), vec![good.clone()]),
                ("images_2".to_string(), vec![good.clone(), good.clone()]),
            ]),
            ..Default::default()
        };
        let report = config.check(tmp.path());
        assert_eq!(
            report.label_mismatches,
            vec![("SPICE_IMAGES_2".to_string(), 2, 1)]
        );
    }

    #[test]
    fn check_labels_by_name_ignores_explicit_labels() {
        let tmp = TempDir::new().unwrap();
        let good = write(&tmp, "a.png", "x");
        let config = PresentationConfig {
            label_by_name: true,
            labels: vec!["unused".into(), "extra".into()],
            image_keys: BTreeMap::from([(
                "images".to_string(),
                vec![good.to_string_lossy().into_owned()],
            )]),
            ..Default::default()
        };
        let report = config.check(tmp.path());
        assert!(report.is_ok());
        assert_eq!(report.template, Ok(TemplateOrigin::BuiltIn));
    }

    #[test]
    fn missing_file_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let result = load_config(&tmp.path().join("absent.json"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
