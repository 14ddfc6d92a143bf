//! retouch: interactive terminal image editor.
//!
//! Loads one image, then offers a numbered menu of edits (brightness,
//! contrast, grayscale, padding, threshold, blend), undo and history.
//! Every edit is previewed and committed; the last
//! [`SessionConfig::capacity`](retouch_core::SessionConfig) snapshots are
//! kept for undo. Choosing "Save and exit" writes the active image.
//!
//! # Usage
//!
//! ```text
//! cargo run --release --bin retouch -- [OPTIONS] [IMAGE_PATH]
//! ```

#![allow(clippy::print_stdout, clippy::print_stderr)]

mod console;
mod menu;
mod repl;

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use retouch_core::{ImageSource, Presenter, ResizeFilter, Session, SessionConfig};
use retouch_io::{FsCodec, LogPresenter, PreviewWriter};

use crate::console::Console;
use crate::repl::Exit;

/// Interactive image editor with previews and a bounded undo history.
#[derive(Parser)]
#[command(name = "retouch", version)]
struct Cli {
    /// Image to edit (PNG, JPEG, BMP, WebP). Prompted for when omitted.
    image_path: Option<PathBuf>,

    /// Number of snapshots kept for undo, including the current image.
    #[arg(long, default_value_t = SessionConfig::DEFAULT_CAPACITY, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    capacity: usize,

    /// Filter used to resize blend overlays (nearest, triangle, catmull-rom, gaussian, lanczos3).
    #[arg(long, value_enum, default_value_t = CLI_DEFAULT_FILTER)]
    resize_filter: Filter,

    /// Write a side-by-side PNG preview of every edit into this directory.
    ///
    /// Without it previews are only logged.
    #[arg(long)]
    preview_dir: Option<PathBuf>,

    /// Full session config as a JSON string.
    ///
    /// When provided, `--capacity` and `--resize-filter` are ignored.
    /// The JSON must be a valid `SessionConfig` serialization; missing
    /// fields take their defaults.
    #[arg(long)]
    config_json: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Overlay resize filter selection.
#[derive(Clone, Copy, ValueEnum)]
enum Filter {
    /// Nearest-neighbor (fastest, blocky).
    Nearest,
    /// Bilinear interpolation (fast, decent quality).
    Triangle,
    /// Bicubic Catmull-Rom (moderate, good quality).
    CatmullRom,
    /// Gaussian (moderate, smooth).
    Gaussian,
    /// Lanczos with 3 lobes (slowest, sharpest).
    Lanczos3,
}

/// Maps a [`ResizeFilter`] to the local CLI [`Filter`] enum.
const fn filter_from_core(f: ResizeFilter) -> Filter {
    match f {
        ResizeFilter::Nearest => Filter::Nearest,
        ResizeFilter::Triangle => Filter::Triangle,
        ResizeFilter::CatmullRom => Filter::CatmullRom,
        ResizeFilter::Gaussian => Filter::Gaussian,
        ResizeFilter::Lanczos3 => Filter::Lanczos3,
    }
}

/// The CLI default filter, derived from [`SessionConfig::DEFAULT_RESIZE_FILTER`]
/// so the two cannot silently diverge.
const CLI_DEFAULT_FILTER: Filter = filter_from_core(SessionConfig::DEFAULT_RESIZE_FILTER);

/// Build a [`SessionConfig`] from CLI arguments.
///
/// If `--config-json` is provided, the JSON is parsed directly and the
/// individual flags are ignored.
fn config_from_cli(cli: &Cli) -> Result<SessionConfig, String> {
    let config = if let Some(ref json) = cli.config_json {
        serde_json::from_str(json).map_err(|e| format!("Error parsing --config-json: {e}"))?
    } else {
        SessionConfig {
            capacity: cli.capacity,
            resize_filter: match cli.resize_filter {
                Filter::Nearest => ResizeFilter::Nearest,
                Filter::Triangle => ResizeFilter::Triangle,
                Filter::CatmullRom => ResizeFilter::CatmullRom,
                Filter::Gaussian => ResizeFilter::Gaussian,
                Filter::Lanczos3 => ResizeFilter::Lanczos3,
            },
        }
    };
    config.validate().map_err(|e| e.to_string())?;
    Ok(config)
}

/// Log to stderr so the menu on stdout stays readable.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match config_from_cli(&cli) {
        Ok(c) => c,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };

    let stdin = io::stdin();
    let mut console = Console::new(stdin.lock(), io::stdout());

    let path = match cli.image_path {
        Some(path) => path,
        None => match console.ask("Enter path of image to load: ") {
            Ok(answer) => PathBuf::from(answer),
            Err(e) => {
                eprintln!("Error: {e}");
                return ExitCode::FAILURE;
            }
        },
    };

    let mut source = FsCodec;
    let mut sink = FsCodec;

    let image = match source.load(&path) {
        Ok(img) => img,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut session = match Session::open(image, config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut presenter: Box<dyn Presenter> = match cli.preview_dir {
        Some(dir) => {
            let writer = PreviewWriter::new(dir);
            tracing::info!(dir = %writer.dir().display(), "writing previews");
            Box::new(writer)
        }
        None => Box::new(LogPresenter),
    };

    match repl::run(
        &mut session,
        &mut console,
        &mut source,
        &mut sink,
        &mut *presenter,
    ) {
        Ok(Exit::Saved(path)) => {
            tracing::info!(path = %path.display(), "done");
            ExitCode::SUCCESS
        }
        Ok(Exit::EndOfInput) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
