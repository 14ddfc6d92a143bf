//! The interactive loop: show the menu, read a command, run it, report.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use retouch_core::{ImageSink, ImageSource, Outcome, Presenter, Session, UndoOutcome};

use crate::console::{Console, MenuError};
use crate::menu::{MENU, read_command};

/// How the loop ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Exit {
    /// The image was saved to this path.
    Saved(PathBuf),
    /// Input ran out before a save; nothing was written.
    EndOfInput,
}

/// Run commands against `session` until it is saved or input ends.
///
/// Bad selections, unparsable answers and failed operations are reported
/// and the menu is shown again. Only I/O errors on the console end the
/// loop early.
pub fn run<R, W, Src, Snk, P>(
    session: &mut Session,
    console: &mut Console<R, W>,
    source: &mut Src,
    sink: &mut Snk,
    presenter: &mut P,
) -> io::Result<Exit>
where
    R: BufRead,
    W: Write,
    Src: ImageSource + ?Sized,
    Snk: ImageSink + ?Sized,
    P: Presenter + ?Sized,
{
    loop {
        console.say(MENU)?;
        let command = match read_command(console, source) {
            Ok(command) => command,
            Err(MenuError::EndOfInput) => {
                console.say("")?;
                console.say("End of input; exiting without saving.")?;
                tracing::info!("input closed before save");
                return Ok(Exit::EndOfInput);
            }
            Err(MenuError::Io(err)) => return Err(err),
            Err(err) => {
                console.say(format_args!("Error: {err}"))?;
                continue;
            }
        };

        match session.execute(command, presenter, sink) {
            Ok(Outcome::Saved(path)) => {
                console.say(format_args!("Saved '{}'. Bye!", path.display()))?;
                return Ok(Exit::Saved(path));
            }
            Ok(outcome) => report(console, session, &outcome)?,
            Err(err) => {
                tracing::debug!(%err, "command failed");
                console.say(format_args!("Error: {err}"))?;
            }
        }
    }
}

fn report<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    session: &Session,
    outcome: &Outcome,
) -> io::Result<()> {
    match outcome {
        Outcome::Committed(record) => console.say(format_args!("Applied: {record}")),
        Outcome::Undo(UndoOutcome::Undone(record)) => console.say(format_args!("Undid: {record}")),
        Outcome::Undo(UndoOutcome::NothingToUndo) => console.say("Nothing to undo."),
        Outcome::Undo(UndoOutcome::HistoryExpired { expired }) => console.say(format_args!(
            "Cannot undo further: the {expired} oldest operation(s) fell outside the {}-snapshot undo window.",
            session.config().capacity
        )),
        Outcome::History(entries) if entries.is_empty() => console.say("History: (empty)"),
        Outcome::History(entries) => {
            console.say("History:")?;
            for entry in entries {
                console.say(format_args!(" {entry}"))?;
            }
            Ok(())
        }
        Outcome::Saved(path) => console.say(format_args!("Saved '{}'.", path.display())),
    }
}
