use clap::{Parser, Subcommand};
use spice_deck::builder::PresentationBuilder;
use spice_deck::config::{self, ExportFormat, PresentationConfig};
use spice_deck::loader::{self, ImageLoader};
use spice_deck::render::BuildInfo;
use spice_deck::template::{TEMPLATES_DIR, TemplateEngine};
use spice_deck::{gif, naming, output};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing_subscriber::prelude::*;

/// Inputs shared by every command that reads images.
///
/// Anything given here overrides the same value from `--config`.
#[derive(clap::Args, Clone, Default)]
struct InputArgs {
    /// Presentation config file (JSON, or TOML with a .toml extension)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Export format for `build`, overriding the config's export_format
    #[arg(long, value_enum)]
    format: Option<ExportFormat>,

    /// Images for the main list, comma separated
    #[arg(short, long, value_delimiter = ',')]
    images: Vec<String>,

    /// Additional image list, comma separated. Repeat for SPICE_IMAGES_1, _2, ...
    #[arg(long = "list", value_name = "IMAGES")]
    lists: Vec<String>,

    /// Labels, comma separated, one per image
    #[arg(short, long, value_delimiter = ',')]
    labels: Vec<String>,

    /// Derive labels from image file names
    #[arg(long)]
    label_by_name: bool,

    /// Presentation title
    #[arg(long)]
    title: Option<String>,

    /// Free text for <SPICE_TEXT>
    #[arg(long)]
    text: Option<String>,

    /// Author photo shown in the header
    #[arg(long)]
    author_image: Option<String>,

    /// Template name (looked up in templates/) or path to an .html file
    #[arg(long)]
    template: Option<String>,

    /// Help section text
    #[arg(long)]
    help_text: Option<String>,

    /// Help section link target
    #[arg(long)]
    help_link: Option<String>,

    /// Help section badge image URL
    #[arg(long)]
    help_badge_url: Option<String>,

    /// Cap on concurrent image loads (default: one task per image)
    #[arg(long)]
    max_workers: Option<usize>,
}

impl InputArgs {
    fn overrides(&self) -> PresentationConfig {
        let mut image_keys = BTreeMap::new();
        if !self.images.is_empty() {
            image_keys.insert("images".to_string(), self.images.clone());
        }
        for (i, list) in self.lists.iter().enumerate() {
            let paths: Vec<String> = list
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(String::from)
                .collect();
            image_keys.insert(format!("images_{}", i + 1), paths);
        }

        PresentationConfig {
            export_format: self.format,
            output_filename: self.output.clone(),
            title: self.title.clone(),
            main_text: self.text.clone(),
            labels: self.labels.clone(),
            label_by_name: self.label_by_name,
            author_image: self.author_image.clone(),
            template: self.template.clone(),
            help_text: self.help_text.clone(),
            help_link: self.help_link.clone(),
            help_badge_url: self.help_badge_url.clone(),
            max_workers: self.max_workers,
            image_keys,
        }
    }

    /// Config file (if any) with command-line values layered on top.
    fn resolve(&self) -> Result<PresentationConfig, config::ConfigError> {
        let base = match &self.config {
            Some(path) => config::load_config(path)?,
            None => PresentationConfig::default(),
        };
        let merged = base.merge(self.overrides());
        if merged.max_workers == Some(0) {
            return Err(config::ConfigError::Validation(
                "max_workers must be at least 1".into(),
            ));
        }
        Ok(merged)
    }
}

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "spice-deck")]
#[command(about = "Self-contained HTML slideshows and animated GIFs from images")]
#[command(long_about = "\
Self-contained HTML slideshows and animated GIFs from images

Every image is embedded in the output as Base64, so the resulting .html file
can be mailed, uploaded or opened offline with nothing else alongside it.

Templates are plain HTML with literal markers:

  <SPICE_TITLE>           presentation title
  <SPICE_TEXT>            free text
  <SPICE_IMAGES>          main image list (<SPICE_IMAGES_1>, _2, ... for more)
  <SPICE_LABELS>          one <span> per label
  <SPICE_AUTHOR_IMAGE>    author photo, or nothing
  <SPICE_HELP_SECTION>    help badge, removed unless text, link and badge are set
  <SPICE_BUILDING_INFO>   build information comment

Template lookup: a path containing .html is used as-is; a bare name is looked
up as templates/<name>.html; otherwise templates/base_template.html, and
finally the built-in template.

Every list must have exactly one label per image, or nothing is written.

Run 'spice-deck gen-config' to print a documented config file.")]
#[command(version = version_string())]
struct Cli {
    /// Log debug diagnostics and a summary of the presentation before writing
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Export in the format named by the config's export_format
    Build(InputArgs),
    /// Build an HTML slideshow
    Spice(InputArgs),
    /// Build an animated GIF from the main image list
    Gif(InputArgs),
    /// Validate images, template and label counts without writing anything
    Check(InputArgs),
    /// Print a stock config file with every key present
    GenConfig,
    /// Show version and build information
    Info,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    match cli.command {
        Command::Build(args) => {
            let config = args.resolve()?;
            match config.export_format.unwrap_or_default() {
                ExportFormat::Spice => run_spice(&config, cli.debug)?,
                ExportFormat::Gif => run_gif(&config)?,
            }
        }
        Command::Spice(args) => run_spice(&args.resolve()?, cli.debug)?,
        Command::Gif(args) => run_gif(&args.resolve()?)?,
        Command::Check(args) => {
            let config = args.resolve()?;
            let report = config.check(Path::new(TEMPLATES_DIR));
            output::print_check_output(&report);
            if !report.is_ok() {
                return Err(format!("{} problem(s) found", report.problem_count()).into());
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_json());
        }
        Command::Info => {
            output::print_build_info(&BuildInfo::current());
        }
    }

    Ok(())
}

/// Diagnostics go to stderr. `RUST_LOG` wins over `--debug`.
fn init_tracing(debug: bool) {
    let default = if debug { "spice_deck=debug" } else { "spice_deck=info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run_spice(config: &PresentationConfig, debug: bool) -> Result<(), Box<dyn std::error::Error>> {
    let lists = config.image_lists();
    if lists.values().all(Vec::is_empty) {
        return Err("no images given (use --images or a config file)".into());
    }
    for path in lists.values().flatten() {
        loader::validate_image_path(Path::new(path))?;
    }

    let output_path = config
        .output_filename
        .clone()
        .unwrap_or_else(|| PathBuf::from("presentation.html"));

    let engine = TemplateEngine::load(config.template.as_deref())?;
    let builder = PresentationBuilder::from_config(config, ImageLoader::new(), debug)?;
    let emission = engine.write(&builder, &output_path)?;
    output::print_emission(&emission);
    Ok(())
}

fn run_gif(config: &PresentationConfig) -> Result<(), Box<dyn std::error::Error>> {
    let images = config.images();
    if images.is_empty() {
        return Err(format!(
            "no images given for {} (use --images or a config file)",
            naming::DEFAULT_IMAGE_LIST
        )
        .into());
    }
    for path in images {
        loader::validate_image_path(Path::new(path))?;
    }

    let output_path = config
        .output_filename
        .clone()
        .unwrap_or_else(|| PathBuf::from("animation.gif"));
    let report = gif::export_gif(&output_path, images)?;
    output::print_gif_report(&report);
    Ok(())
}
