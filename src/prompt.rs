//! Questions put to the learner mid-command.
//!
//! The navigation engine asks through [`Prompter`]; the CLI answers from the
//! terminal and tests answer from a script.

use std::io::{self, BufRead, Write};

use crate::model::LessonSpec;

/// What to do when starting a lesson that already has progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestartChoice {
    Resume,
    StartOver,
    Cancel,
}

pub trait Prompter {
    /// Asks whether to resume, start over, or cancel.
    fn restart_choice(&mut self, lesson: &LessonSpec) -> io::Result<RestartChoice>;

    /// Reads a free-text note for the current step.
    fn note(&mut self) -> io::Result<String>;
}

/// Prompts on a line-oriented terminal.
pub struct Terminal<R, W> {
    input: R,
    output: W,
}

impl Terminal<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Terminal<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Reads one line without its terminator. `None` at end of input.
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
    }
}

impl<R: BufRead, W: Write> Prompter for Terminal<R, W> {
    fn restart_choice(&mut self, lesson: &LessonSpec) -> io::Result<RestartChoice> {
        writeln!(
            self.output,
            "You've already started \"{}\" ({}).",
            lesson.title, lesson.name
        )?;
        loop {
            write!(
                self.output,
                "Do you want to (r)esume, (s)tart over, or (c)ancel? "
            )?;
            self.output.flush()?;

            let Some(answer) = self.read_line()? else {
                // End of input: nobody is there to answer.
                return Ok(RestartChoice::Cancel);
            };
            match answer.trim().to_lowercase().as_str() {
                "r" | "resume" => return Ok(RestartChoice::Resume),
                "s" | "start over" | "start-over" => return Ok(RestartChoice::StartOver),
                "c" | "cancel" => return Ok(RestartChoice::Cancel),
                other => writeln!(self.output, "Unrecognized choice: \"{other}\"")?,
            }
        }
    }

    /// Lines are read until an empty line or end of input.
    fn note(&mut self) -> io::Result<String> {
        writeln!(
            self.output,
            "Enter your note. Finish with an empty line:"
        )?;
        self.output.flush()?;

        let mut lines = Vec::new();
        while let Some(line) = self.read_line()? {
            if line.trim().is_empty() {
                break;
            }
            lines.push(line);
        }
        Ok(lines.join("\n"))
    }
}
