use clap::{Parser, Subcommand};
use imgpress::config::{self, EditorConfig};
use imgpress::imaging::{Anchor, AspectRatio, Corner, CropRegion, FilterKind, OutputFormat};
use imgpress::source::{self, SourceImage};
use imgpress::{batch, output, process};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Options that shape every output image. Each one overrides the config file.
#[derive(clap::Args, Clone)]
struct TransformArgs {
    /// Output format: webp, jpeg or png
    #[arg(long)]
    format: Option<OutputFormat>,

    /// Lossy quality, 0.0-1.0
    #[arg(long)]
    quality: Option<f32>,

    /// Output size as a percentage of the source, 10-100
    #[arg(long)]
    scale: Option<u32>,

    /// Color filter: none, grayscale or sepia
    #[arg(long)]
    filter: Option<FilterKind>,

    /// Text tiled diagonally across the image
    #[arg(long)]
    watermark: Option<String>,

    /// Copyright caption text
    #[arg(long)]
    copyright: Option<String>,

    /// Caption corner: top-left, top-right, bottom-left or bottom-right
    #[arg(long)]
    copyright_position: Option<Corner>,

    /// Crop rectangle in resized pixels, as X,Y,W,H
    #[arg(long, value_name = "X,Y,W,H", conflicts_with = "aspect")]
    crop: Option<CropRegion>,

    /// Crop to an aspect ratio preset: 1:1, 4:3, 16:9, 3:2 or 2:3
    #[arg(long, value_name = "W:H")]
    aspect: Option<AspectRatio>,

    /// Where the crop is measured from
    #[arg(long)]
    anchor: Option<Anchor>,
}

#[derive(Parser)]
#[command(name = "imgpress")]
#[command(version)]
#[command(about = "Batch image editor: resize, crop, filter, watermark and compress")]
#[command(long_about = "\
Batch image editor: resize, crop, filter, watermark and compress

Every image runs through the same pipeline:

  resize → crop → filter → watermark → copyright → encode

INPUT can be a directory, an image file or a .zip archive. Supported
inputs are JPEG, PNG, WebP and GIF; outputs are WebP, JPEG or PNG.

Settings come from ./imgpress.toml (or --config FILE) and can be
overridden per run with flags. Run 'imgpress gen-config' to generate a
documented config file.")]
struct Cli {
    /// Config file (default: ./imgpress.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compress every image from the inputs into one ZIP archive
    Batch {
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Archive path (default: output.archive_name from config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also write a JSON report of the batch
        #[arg(long)]
        report: Option<PathBuf>,

        /// Descend into subdirectories of directory inputs
        #[arg(long)]
        recursive: bool,

        /// Swap each entry's extension for the output format's
        #[arg(long)]
        rename_extensions: bool,

        #[command(flatten)]
        transform: TransformArgs,
    },
    /// Compress a single image
    Single {
        input: PathBuf,

        /// Output path (default: compressed-<name>)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        transform: TransformArgs,
    },
    /// List the images that would be loaded from the inputs
    List {
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Descend into subdirectories of directory inputs
        #[arg(long)]
        recursive: bool,
    },
    /// Print a stock imgpress.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Batch {
            inputs,
            output: archive_path,
            report,
            recursive,
            rename_extensions,
            transform,
        } => {
            let mut overrides = transform_overrides(&transform);
            if rename_extensions {
                set(&mut overrides, "output", "rename_extensions", true.into());
            }
            let editor = load_editor_config(cli.config.as_deref(), overrides)?;
            let options = editor.transform_options()?;
            let batch_options = batch::BatchOptions {
                rename_extensions: editor.output.rename_extensions,
            };

            let sources = source::collect_sources(&inputs, recursive).map_err(|e| {
                eprintln!("{}", e.status_message());
                e
            })?;
            output::print_load_status(&sources);
            if sources.images.is_empty() {
                return Ok(());
            }

            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    for line in output::format_batch_event(&event) {
                        println!("{}", line);
                    }
                }
            });
            let outcome = batch::run_batch(&sources.images, &options, &batch_options, Some(tx));
            // The sender is dropped by now, so the printer drains and exits.
            printer
                .join()
                .map_err(|_| "progress printer thread panicked")?;
            let outcome = outcome?;

            let archive_path =
                archive_path.unwrap_or_else(|| PathBuf::from(&editor.output.archive_name));
            if !outcome.report.processed.is_empty() {
                if let Some(parent) = archive_path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(&archive_path, &outcome.archive)?;
            }
            if let Some(report_path) = report {
                std::fs::write(&report_path, serde_json::to_string_pretty(&outcome.report)?)?;
            }
            output::print_batch_summary(&outcome.report, &archive_path, outcome.archive.len());
        }
        Command::Single {
            input,
            output: output_path,
            transform,
        } => {
            let editor = load_editor_config(cli.config.as_deref(), transform_overrides(&transform))?;
            let options = editor.transform_options()?;

            let name = input
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .ok_or_else(|| format!("not a file: {}", input.display()))?;
            let source = SourceImage::new(name, std::fs::read(&input)?);
            let result = process::process(&source, &options).map_err(|e| {
                eprintln!("{}", e.status_message());
                e
            })?;

            let rename_to = editor.output.rename_extensions.then_some(options.format);
            let output_path = output_path
                .unwrap_or_else(|| PathBuf::from(format!("compressed-{}", source.output_name(rename_to))));
            std::fs::write(&output_path, &result.output.bytes)?;
            output::print_single_output(
                &source.name,
                &output_path.display().to_string(),
                &result,
            );
        }
        Command::List { inputs, recursive } => {
            let sources = source::collect_sources(&inputs, recursive).map_err(|e| {
                eprintln!("{}", e.status_message());
                e
            })?;
            output::print_load_status(&sources);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Log to stderr. `RUST_LOG` wins over `-v`.
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Stock defaults, then the config file, then the command-line overrides.
fn load_editor_config(
    path: Option<&Path>,
    overrides: toml::Value,
) -> Result<EditorConfig, config::ConfigError> {
    let file = match path {
        Some(p) => Some(config::load_raw_config(p)?),
        None => config::find_config(Path::new("."))?,
    };
    config::load_config(file, Some(overrides))
}

/// Translate transform flags into a TOML overlay shaped like `imgpress.toml`.
fn transform_overrides(args: &TransformArgs) -> toml::Value {
    let mut root = toml::Value::Table(toml::Table::new());

    if let Some(format) = args.format {
        set(&mut root, "output", "format", format.to_string().into());
    }
    if let Some(quality) = args.quality {
        set(&mut root, "output", "quality", f64::from(quality).into());
    }
    if let Some(scale) = args.scale {
        set(&mut root, "output", "scale_percent", i64::from(scale).into());
    }
    if let Some(filter) = args.filter {
        set(&mut root, "effects", "filter", filter.to_string().into());
    }
    if let Some(text) = &args.watermark {
        set(&mut root, "effects", "watermark", text.clone().into());
    }
    if let Some(text) = &args.copyright {
        set(&mut root, "copyright", "text", text.clone().into());
    }
    if let Some(corner) = args.copyright_position {
        set(&mut root, "copyright", "position", corner.to_string().into());
    }
    if let Some(region) = args.crop {
        set(&mut root, "crop", "x", i64::from(region.x).into());
        set(&mut root, "crop", "y", i64::from(region.y).into());
        set(&mut root, "crop", "width", i64::from(region.width).into());
        set(&mut root, "crop", "height", i64::from(region.height).into());
    }
    if let Some(aspect) = args.aspect {
        set(&mut root, "crop", "aspect", String::from(aspect).into());
    }
    if let Some(anchor) = args.anchor {
        set(&mut root, "crop", "anchor", anchor.to_string().into());
    }
    root
}

/// Insert `section.key = value` into a table-shaped TOML value.
fn set(root: &mut toml::Value, section: &str, key: &str, value: toml::Value) {
    if let toml::Value::Table(table) = root {
        let entry = table
            .entry(section)
            .or_insert_with(|| toml::Value::Table(toml::Table::new()));
        if let toml::Value::Table(section) = entry {
            section.insert(key.to_string(), value);
        }
    }
}
