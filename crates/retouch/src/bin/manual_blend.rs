//! manual-blend: blend two images once and write the result.
//!
//! Non-interactive counterpart of the editor's blend option. The second
//! image is resized to the first when their dimensions differ, then each
//! channel is computed as `(1 - alpha) * first + alpha * second`.
//!
//! # Usage
//!
//! ```text
//! cargo run --release --bin manual-blend -- IMG1 IMG2 [-a ALPHA] [-o OUTPUT]
//! ```

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use retouch_core::blend::validate_alpha;
use retouch_core::{ImageSink, ImageSource, SessionConfig, SessionError, blend};
use retouch_io::{CodecError, FsCodec};

/// Blend two images with a fixed weight and save the result.
#[derive(Parser)]
#[command(name = "manual-blend", version)]
struct Args {
    /// First image; the output takes its dimensions.
    img1: PathBuf,

    /// Second image, resized to the first when needed.
    img2: PathBuf,

    /// Weight of the second image (0.0 - 1.0).
    #[arg(short, long, default_value_t = 0.5, value_parser = parse_alpha)]
    alpha: f64,

    /// Where to write the blend. The extension picks the format.
    #[arg(short, long, default_value = "manual_blend.jpg")]
    output: PathBuf,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn parse_alpha(input: &str) -> Result<f64, String> {
    let alpha: f64 = input.parse().map_err(|e: std::num::ParseFloatError| e.to_string())?;
    validate_alpha(alpha).map_err(|e| e.to_string())?;
    Ok(alpha)
}

#[derive(Debug, thiserror::Error)]
enum BlendError {
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error(transparent)]
    Blend(#[from] SessionError),
}

/// Load both inputs, blend them and save to `args.output`.
fn run(args: &Args, codec: &mut FsCodec) -> Result<PathBuf, BlendError> {
    let base = codec.load(&args.img1)?;
    let overlay = codec.load(&args.img2)?;
    let blended = blend(
        &base,
        &overlay,
        args.alpha,
        SessionConfig::DEFAULT_RESIZE_FILTER,
    )?;
    codec.save(&blended, &args.output)?;
    Ok(args.output.clone())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(&args, &mut FsCodec) {
        Ok(path) => {
            println!(
                "Saved blended image as '{}' with α={}",
                path.display(),
                args.alpha
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
