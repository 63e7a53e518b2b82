//! Scanlabel: labeled, reading-ordered bounding boxes from scanned pages.
//!
//! Scanlabel takes the connected components an image-processing library
//! finds on a scanned page and turns them into text-unit boxes ready for
//! object-detection training data. Small fragments such as dots and accents
//! are merged into their base glyph, boxes are put into column-major
//! reading order, and the result is written as normalized CSV.
//!
//! # Modules
//!
//! - [`ir`]: Box model, typed geometry and JSON I/O
//! - [`merge`]: Region filter and diacritic merge
//! - [`order`]: Column-major reading order
//! - [`editor`]: Interactive box editor state machine
//! - [`tagging`]: Bulk class assignment
//! - [`export`]: Normalized CSV encoder
//! - [`pipeline`]: Async detection run over an external image processor
//! - [`settings`]: Persisted thresholds
//! - [`error`]: Error types for scanlabel operations

pub mod editor;
pub mod error;
pub mod export;
pub mod ir;
pub mod logging;
pub mod merge;
pub mod order;
pub mod pipeline;
pub mod settings;
pub mod tagging;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

pub use error::ScanlabelError;

use ir::{BoundingBox, BoxClass, BoxId};
use settings::Settings;

/// The scanlabel CLI application.
#[derive(Parser)]
#[command(name = "scanlabel")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    /// Print diagnostic logs to stderr (filter with RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Settings file to use instead of the per-user default.
    #[arg(long, global = true, env = "SCANLABEL_SETTINGS")]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Filter raw components and merge diacritics into text-unit boxes.
    Merge(MergeArgs),
    /// Sort boxes into column-major reading order.
    Order(OrderArgs),
    /// Assign or clear the class of selected boxes.
    Tag(TagArgs),
    /// Write boxes as normalized CSV.
    Export(ExportArgs),
    /// Show, reset or locate the persisted settings.
    #[command(subcommand)]
    Settings(SettingsCommand),
}

#[derive(clap::Args)]
struct MergeArgs {
    /// Components JSON from the labeling step (index 0 is the background).
    input: PathBuf,

    /// Where to write the boxes JSON (stdout if omitted).
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(clap::Args)]
struct OrderArgs {
    /// Boxes JSON to order.
    input: PathBuf,

    /// Where to write the ordered boxes JSON (stdout if omitted).
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(clap::Args)]
struct TagArgs {
    /// Boxes JSON to modify.
    input: PathBuf,

    /// Comma-separated box ids to tag.
    #[arg(long, value_delimiter = ',', required = true)]
    ids: Vec<u64>,

    /// Class to assign ('primary', 'secondary' or 'frame'). Omit to clear.
    #[arg(long)]
    class: Option<String>,

    /// Where to write the result (defaults to rewriting the input).
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(clap::Args)]
struct ExportArgs {
    /// Boxes JSON to export.
    input: PathBuf,

    /// Image file name written into every record (defaults to the --image
    /// file name).
    #[arg(long, required_unless_present = "image")]
    filename: Option<String>,

    /// Source image; its dimensions are read from the file header.
    #[arg(long, conflicts_with_all = ["width", "height"], required_unless_present_all = ["width", "height"])]
    image: Option<PathBuf>,

    /// Image width in pixels.
    #[arg(long, requires = "height")]
    width: Option<u32>,

    /// Image height in pixels.
    #[arg(long, requires = "width")]
    height: Option<u32>,

    /// Comma-separated box ids to leave out.
    #[arg(long, value_delimiter = ',')]
    exclude: Vec<u64>,

    /// Where to write the CSV (stdout if omitted).
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Subcommand)]
enum SettingsCommand {
    /// Print the effective settings as TOML.
    Show,
    /// Overwrite the settings file with defaults.
    Reset,
    /// Print the settings file location.
    Path,
}

/// Run the scanlabel CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), ScanlabelError> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let settings_path = cli.settings.unwrap_or_else(Settings::default_path);

    match cli.command {
        Some(Commands::Merge(args)) => run_merge(args, &settings_path),
        Some(Commands::Order(args)) => run_order(args),
        Some(Commands::Tag(args)) => run_tag(args),
        Some(Commands::Export(args)) => run_export(args),
        Some(Commands::Settings(cmd)) => run_settings(cmd, &settings_path),
        None => {
            println!("scanlabel {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Labeled, reading-ordered bounding boxes from scanned pages.");
            println!();
            println!("Run 'scanlabel --help' for usage information.");
            Ok(())
        }
    }
}

/// Writes boxes to `output`, or pretty JSON to stdout.
fn emit_boxes(output: Option<&Path>, boxes: &[BoundingBox]) -> Result<(), ScanlabelError> {
    match output {
        Some(path) => ir::io_json::write_boxes_json(path, boxes),
        None => {
            let json = ir::io_json::to_boxes_json_string(boxes).map_err(|source| {
                ScanlabelError::BoxesJsonWrite {
                    path: PathBuf::from("<stdout>"),
                    source,
                }
            })?;
            println!("{}", json);
            Ok(())
        }
    }
}

fn run_merge(args: MergeArgs, settings_path: &Path) -> Result<(), ScanlabelError> {
    let settings = Settings::load(settings_path)?;
    let components = ir::io_json::read_components_json(&args.input)?;
    let outcome = merge::merge_regions(
        pipeline::foreground_components(&components),
        &settings.merge_params(),
    );

    emit_boxes(args.output.as_deref(), &outcome.boxes)?;
    if args.output.is_some() {
        print!("{}", outcome.report);
    } else {
        eprint!("{}", outcome.report);
    }
    Ok(())
}

fn run_order(args: OrderArgs) -> Result<(), ScanlabelError> {
    let boxes = ir::io_json::read_boxes_json(&args.input)?;
    let ordered = order::reading_order(boxes);
    emit_boxes(args.output.as_deref(), &ordered)
}

fn run_tag(args: TagArgs) -> Result<(), ScanlabelError> {
    let class = args
        .class
        .as_deref()
        .map(str::parse::<BoxClass>)
        .transpose()?;
    let mut boxes = ir::io_json::read_boxes_json(&args.input)?;
    let ids: BTreeSet<BoxId> = args.ids.into_iter().map(BoxId::from).collect();

    let matched = tagging::assign_class(&mut boxes, &ids, class);

    let output = args.output.as_deref().unwrap_or(&args.input);
    ir::io_json::write_boxes_json(output, &boxes)?;

    match class {
        Some(c) => println!("Tagged {} box(es) as {}", matched, c),
        None => println!("Cleared class on {} box(es)", matched),
    }
    if matched < ids.len() {
        eprintln!("Warning: {} id(s) did not match any box", ids.len() - matched);
    }

    let counts: Vec<String> = tagging::class_histogram(&boxes)
        .into_iter()
        .map(|(class, n)| match class {
            Some(c) => format!("{}={}", c, n),
            None => format!("untagged={}", n),
        })
        .collect();
    println!("Class counts: {}", counts.join(", "));
    Ok(())
}

fn run_export(args: ExportArgs) -> Result<(), ScanlabelError> {
    let boxes = ir::io_json::read_boxes_json(&args.input)?;

    let (width, height) = match (&args.image, args.width, args.height) {
        (Some(image), _, _) => image_dimensions(image)?,
        (None, Some(w), Some(h)) => (w, h),
        _ => (0, 0),
    };

    let filename = match (&args.filename, &args.image) {
        (Some(name), _) => name.clone(),
        (None, Some(image)) => image
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        (None, None) => String::new(),
    };

    let excluded: BTreeSet<BoxId> = args.exclude.into_iter().map(BoxId::from).collect();
    let encoded = export::export_session(&filename, boxes, &excluded, width, height)?;

    match args.output {
        Some(path) => export::write_export(&path, &encoded),
        None => {
            println!("{}", encoded);
            Ok(())
        }
    }
}

/// Reads `(width, height)` from an image header without decoding pixels.
fn image_dimensions(path: &Path) -> Result<(u32, u32), ScanlabelError> {
    let size = imagesize::size(path).map_err(|source| ScanlabelError::ImageDimensionRead {
        path: path.to_path_buf(),
        source,
    })?;
    match (u32::try_from(size.width), u32::try_from(size.height)) {
        (Ok(w), Ok(h)) => Ok((w, h)),
        _ => Err(error::ExportError::DimensionsUnavailable {
            width: 0,
            height: 0,
        }
        .into()),
    }
}

fn run_settings(cmd: SettingsCommand, settings_path: &Path) -> Result<(), ScanlabelError> {
    match cmd {
        SettingsCommand::Show => {
            let settings = Settings::load(settings_path)?;
            let text = settings
                .to_toml_string()
                .map_err(|source| ScanlabelError::SettingsWrite {
                    path: settings_path.to_path_buf(),
                    source,
                })?;
            print!("{}", text);
        }
        SettingsCommand::Reset => {
            Settings::reset(settings_path)?;
            println!("Settings reset to defaults: {}", settings_path.display());
        }
        SettingsCommand::Path => println!("{}", settings_path.display()),
    }
    Ok(())
}
