//! Presentation assembly.
//!
//! [`PresentationBuilder`] owns everything a template needs: scalar contents,
//! named image lists, the shared label sequence, the optional author image
//! and help badge, and which template to use. Mutators return `&mut Self` so
//! calls chain:
//!
//! ```no_run
//! use spice_deck::builder::PresentationBuilder;
//!
//! let mut builder = PresentationBuilder::new("NDVI 2023", false);
//! builder
//!     .add_title("NDVI 2023")
//!     .add_images_async(&["jan.png", "feb.png"])
//!     .generate_labels_from_images()
//!     .set_template("slider");
//! ```
//!
//! Image failures never abort a build step: an unreadable image is logged and
//! left out of its list. Label/image count mismatches are caught later, when
//! the template engine emits.

use crate::config::{ConfigError, HelpConfig, PresentationConfig};
use crate::content::ContentRegistry;
use crate::image_store::{Image, ImageList};
use crate::loader::ImageLoader;
use crate::naming::{self, DEFAULT_IMAGE_LIST};
use crate::render;
use std::collections::BTreeMap;

#[derive(Debug)]
pub struct PresentationBuilder {
    title: String,
    debug: bool,
    contents: ContentRegistry,
    image_lists: BTreeMap<String, ImageList>,
    labels: Vec<String>,
    author_image: Option<String>,
    help: Option<HelpConfig>,
    template: Option<String>,
    loader: ImageLoader,
}

impl PresentationBuilder {
    /// `debug` makes the template engine log a summary of this builder
    /// before emitting.
    pub fn new(title: impl Into<String>, debug: bool) -> Self {
        let title = title.into();
        tracing::debug!(%title, "presentation builder created");
        Self {
            title,
            debug,
            contents: ContentRegistry::new(),
            image_lists: BTreeMap::new(),
            labels: Vec::new(),
            author_image: None,
            help: None,
            template: None,
            loader: ImageLoader::new(),
        }
    }

    /// Assemble a builder from a merged config.
    ///
    /// Lists load in tag order. Labels come from file names when
    /// `label_by_name` is set, otherwise from `labels`. A configured author
    /// image that cannot be loaded is an error; the help section is only
    /// registered when at least one help value is present.
    pub fn from_config(
        config: &PresentationConfig,
        loader: ImageLoader,
        debug: bool,
    ) -> Result<Self, ConfigError> {
        let mut builder = Self::new(config.title(), debug)
            .with_loader(loader.max_workers(config.max_workers));
        builder.add_title(config.title());
        if let Some(text) = &config.main_text {
            builder.add_content(naming::TEXT, text.as_str());
        }

        for (tag, paths) in config.image_lists() {
            builder.add_images_to_list(&tag, paths.as_slice());
        }

        if config.label_by_name {
            builder.generate_labels_from_images();
        } else {
            builder.add_labels(config.labels.iter().cloned());
        }

        if let Some(author) = &config.author_image {
            builder.set_author_image(author);
            if builder.author_image().is_none() {
                return Err(ConfigError::AuthorImage(author.clone()));
            }
        }

        let help = config.help();
        if !(help.text.is_empty() && help.link.is_empty() && help.badge_url.is_empty()) {
            builder.set_help_config(help);
        }

        if let Some(template) = &config.template {
            builder.set_template(template.as_str());
        }
        Ok(builder)
    }

    /// Replace the loader used for every image operation.
    pub fn with_loader(mut self, loader: ImageLoader) -> Self {
        self.loader = loader;
        self
    }

    /// Register the `SPICE_TITLE` substitution.
    pub fn add_title(&mut self, text: impl Into<String>) -> &mut Self {
        self.contents.add(naming::TITLE, text);
        self
    }

    pub fn add_content(&mut self, tag: impl Into<String>, text: impl Into<String>) -> &mut Self {
        let tag = tag.into();
        tracing::debug!(%tag, "content added");
        self.contents.add(tag, text);
        self
    }

    /// Load one image into the default list.
    pub fn add_image(&mut self, path: &str) -> &mut Self {
        self.add_image_to_list(DEFAULT_IMAGE_LIST, path)
    }

    /// Load a batch concurrently into the default list, keeping input order.
    pub fn add_images_async<S: AsRef<str> + Sync>(&mut self, paths: &[S]) -> &mut Self {
        self.add_images_to_list(DEFAULT_IMAGE_LIST, paths)
    }

    /// Load one image into a named list, creating the list on first use.
    pub fn add_image_to_list(&mut self, list_tag: &str, path: &str) -> &mut Self {
        let image = self.loader.load(path);
        self.insert_loaded(list_tag, vec![image]);
        self
    }

    /// Load a batch concurrently into a named list, keeping input order.
    pub fn add_images_to_list<S: AsRef<str> + Sync>(
        &mut self,
        list_tag: &str,
        paths: &[S],
    ) -> &mut Self {
        if paths.is_empty() {
            return self;
        }
        let images = self.loader.load_all(paths);
        self.insert_loaded(list_tag, images);
        self
    }

    fn insert_loaded(&mut self, list_tag: &str, images: Vec<Image>) {
        if !self.image_lists.contains_key(list_tag) && naming::image_list_index(list_tag).is_none() {
            tracing::warn!(list = list_tag, "list tag does not follow the SPICE_IMAGES_N convention");
        }
        let list = self.image_lists.entry(list_tag.to_string()).or_default();
        for image in images {
            if image.is_loaded() {
                tracing::debug!(list = list_tag, path = image.path(), "image added");
                list.add(image);
            } else {
                tracing::warn!(
                    list = list_tag,
                    path = image.path(),
                    "image could not be encoded, skipping"
                );
            }
        }
    }

    /// Append labels. Counts are checked at emission, not here.
    pub fn add_labels<I, S>(&mut self, labels: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels.extend(labels.into_iter().map(Into::into));
        self
    }

    /// Replace all labels with one per image, derived from each image's
    /// filename.
    ///
    /// Labels come from the default list; when there is no default list,
    /// from the first list in tag order. With no lists at all the labels
    /// become empty.
    pub fn generate_labels_from_images(&mut self) -> &mut Self {
        let source = self
            .image_lists
            .get(DEFAULT_IMAGE_LIST)
            .or_else(|| self.image_lists.values().next());
        self.labels = source
            .map(|list| {
                list.images()
                    .iter()
                    .map(|img| naming::label_from_path(img.path()))
                    .collect()
            })
            .unwrap_or_default();
        tracing::debug!(count = self.labels.len(), "labels generated from image names");
        self
    }

    /// Encode and store the author image. The first successful call wins;
    /// later calls are ignored.
    pub fn set_author_image(&mut self, path: &str) -> &mut Self {
        if self.author_image.is_some() {
            tracing::debug!(path, "author image already set, ignoring");
            return self;
        }
        let image = self.loader.load(path);
        if image.is_loaded() {
            self.author_image = Some(image.payload().to_string());
        } else {
            tracing::warn!(path, "author image could not be encoded");
        }
        self
    }

    /// Register help text and the badge anchor for the help section.
    pub fn set_help(
        &mut self,
        text: impl Into<String>,
        link: impl Into<String>,
        badge_url: impl Into<String>,
    ) -> &mut Self {
        self.set_help_config(HelpConfig::new(text, link, badge_url))
    }

    pub fn set_help_config(&mut self, help: HelpConfig) -> &mut Self {
        self.contents.add(naming::HELP_TEXT, help.text.clone());
        self.contents.add(
            naming::HELP_CONTENT,
            render::help_content(&help.link, &help.badge_url).into_string(),
        );
        self.help = Some(help);
        self
    }

    /// Record the template to use; resolved and loaded by the engine.
    pub fn set_template(&mut self, template: impl Into<String>) -> &mut Self {
        self.template = Some(template.into());
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    pub fn contents(&self) -> &ContentRegistry {
        &self.contents
    }

    pub fn image_lists(&self) -> &BTreeMap<String, ImageList> {
        &self.image_lists
    }

    pub fn image_list(&self, tag: &str) -> Option<&ImageList> {
        self.image_lists.get(tag)
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Base64 payload of the author image, if one was set.
    pub fn author_image(&self) -> Option<&str> {
        self.author_image.as_deref()
    }

    pub fn help(&self) -> Option<&HelpConfig> {
        self.help.as_ref()
    }

    pub fn template(&self) -> Option<&str> {
        self.template.as_deref()
    }
}
