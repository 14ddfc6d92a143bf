//! Line-oriented prompts over any reader and writer.

use std::fmt::Display;
use std::io::{self, BufRead, Write};
use std::str::FromStr;

/// Why reading an answer failed.
#[derive(Debug, thiserror::Error)]
pub enum MenuError {
    /// Reading input or writing output failed.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// The input stream ended.
    #[error("end of input")]
    EndOfInput,

    /// The menu selection is not one of the listed options.
    #[error("invalid choice {0:?}")]
    InvalidChoice(String),

    /// An answer could not be parsed.
    #[error("could not read {field} from {input:?}: {reason}")]
    Parse {
        /// What was being asked for.
        field: &'static str,
        /// The text entered.
        input: String,
        /// Parser message.
        reason: String,
    },

    /// The blend overlay could not be loaded.
    #[error("{0}")]
    Load(String),
}

/// Prompts on `output` and reads one answer per line from `input`.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub const fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print one line.
    pub fn say(&mut self, line: impl Display) -> io::Result<()> {
        writeln!(self.output, "{line}")
    }

    /// Print `prompt` without a newline and read the trimmed answer.
    ///
    /// # Errors
    ///
    /// [`MenuError::EndOfInput`] when the input is exhausted.
    pub fn ask(&mut self, prompt: &str) -> Result<String, MenuError> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(MenuError::EndOfInput);
        }
        Ok(line.trim().to_string())
    }

    /// Ask and parse the answer as `T`.
    pub fn ask_parsed<T>(&mut self, prompt: &str, field: &'static str) -> Result<T, MenuError>
    where
        T: FromStr,
        T::Err: Display,
    {
        let input = self.ask(prompt)?;
        input.parse().map_err(|err: T::Err| MenuError::Parse {
            field,
            reason: err.to_string(),
            input,
        })
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }
}
