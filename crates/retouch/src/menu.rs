//! The numbered menu and the prompts behind each option.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use retouch_core::padding::BorderType;
use retouch_core::{Command, ImageSource, Overlay, Padding};

use crate::console::{Console, MenuError};

pub const MENU: &str = "
==== retouch ====
1. Adjust brightness
2. Adjust contrast
3. Convert to grayscale
4. Add padding
5. Apply threshold
6. Blend with another image
7. Undo last operation
8. View history
9. Save and exit";

/// One entry of [`MENU`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Brightness,
    Contrast,
    Grayscale,
    Pad,
    Threshold,
    Blend,
    Undo,
    History,
    SaveExit,
}

impl Choice {
    /// Parse a menu selection.
    pub fn parse(input: &str) -> Result<Self, MenuError> {
        match input.trim() {
            "1" => Ok(Self::Brightness),
            "2" => Ok(Self::Contrast),
            "3" => Ok(Self::Grayscale),
            "4" => Ok(Self::Pad),
            "5" => Ok(Self::Threshold),
            "6" => Ok(Self::Blend),
            "7" => Ok(Self::Undo),
            "8" => Ok(Self::History),
            "9" => Ok(Self::SaveExit),
            other => Err(MenuError::InvalidChoice(other.to_string())),
        }
    }
}

/// Ask for a menu selection and the parameters it needs.
///
/// A blend overlay is loaded through `source` here, so a missing or
/// unreadable file is reported before the session sees the command.
pub fn read_command<R, W, S>(
    console: &mut Console<R, W>,
    source: &mut S,
) -> Result<Command, MenuError>
where
    R: BufRead,
    W: Write,
    S: ImageSource + ?Sized,
{
    let choice = Choice::parse(&console.ask("Select an option [1-9]: ")?)?;
    match choice {
        Choice::Brightness => Ok(Command::Brightness {
            delta: console.ask_parsed("  Brightness delta (-255..255): ", "brightness delta")?,
        }),
        Choice::Contrast => Ok(Command::Contrast {
            factor: console.ask_parsed("  Contrast factor (e.g. 1.2): ", "contrast factor")?,
        }),
        Choice::Grayscale => Ok(Command::Grayscale),
        Choice::Pad => read_padding(console).map(Command::Pad),
        Choice::Threshold => {
            let level = console.ask_parsed("  Threshold (0-255): ", "threshold")?;
            let inverse = console
                .ask("  Inverse? (y/N): ")?
                .to_ascii_lowercase()
                .starts_with('y');
            Ok(Command::Threshold { level, inverse })
        }
        Choice::Blend => {
            let path = console.ask("  Second image path: ")?;
            let alpha = console.ask_parsed("  Alpha (0.0-1.0): ", "alpha")?;
            let image = source
                .load(Path::new(&path))
                .map_err(|err| MenuError::Load(err.to_string()))?;
            Ok(Command::Blend {
                overlay: Overlay::new(path, image),
                alpha,
            })
        }
        Choice::Undo => Ok(Command::Undo),
        Choice::History => Ok(Command::ViewHistory),
        Choice::SaveExit => Ok(Command::SaveExit {
            path: PathBuf::from(console.ask("  Save as (filename): ")?),
        }),
    }
}

fn read_padding<R: BufRead, W: Write>(console: &mut Console<R, W>) -> Result<Padding, MenuError> {
    let top = console.ask_parsed("  Top padding px: ", "top padding")?;
    let bottom = console.ask_parsed("  Bottom padding px: ", "bottom padding")?;
    let left = console.ask_parsed("  Left padding px: ", "left padding")?;
    let right = console.ask_parsed("  Right padding px: ", "right padding")?;

    let names = BorderType::NAMES
        .iter()
        .enumerate()
        .map(|(i, name)| format!("{i}={name}"))
        .collect::<Vec<_>>()
        .join(" ");
    console.say(format_args!("  Border types: {names}"))?;
    let index: u32 = console.ask_parsed("  Choose border type: ", "border type")?;
    let color = if index == 0 {
        parse_color(&console.ask("  Constant color (R,G,B): ")?)?
    } else {
        [0, 0, 0]
    };
    let border = BorderType::from_index(index, color).map_err(|err| MenuError::Parse {
        field: "border type",
        input: index.to_string(),
        reason: err.to_string(),
    })?;

    Ok(Padding {
        top,
        bottom,
        left,
        right,
        border,
    })
}

/// Parse `r,g,b` with each component in `0..=255`.
fn parse_color(input: &str) -> Result<[u8; 3], MenuError> {
    let invalid = |reason: &str| MenuError::Parse {
        field: "constant color",
        input: input.to_string(),
        reason: reason.to_string(),
    };
    let parts: Vec<&str> = input.split(',').map(str::trim).collect();
    let [r, g, b] = parts.as_slice() else {
        return Err(invalid("expected three comma-separated values"));
    };
    let channel = |s: &str| s.parse::<u8>().map_err(|err| invalid(&err.to_string()));
    Ok([channel(*r)?, channel(*g)?, channel(*b)?])
}
