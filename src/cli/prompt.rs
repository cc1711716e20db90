use std::io::{self, BufRead, Write};
use thiserror::Error;

/// Invalid answers tolerated per question before giving up on it.
pub const MAX_PROMPT_ATTEMPTS: usize = 3;

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("Input closed")]
    Eof,

    #[error("No valid answer after {0} attempts")]
    TooManyAttempts(usize),

    #[error("Terminal I/O failed")]
    Io(#[from] io::Error),
}

/// Line-based question and answer over any reader and writer.
pub struct Prompter<R, W> {
    input: R,
    output: W,
    max_attempts: usize,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            max_attempts: MAX_PROMPT_ATTEMPTS,
        }
    }

    pub fn say(&mut self, message: &str) -> Result<(), PromptError> {
        writeln!(self.output, "{message}")?;
        Ok(())
    }

    /// Prints `prompt` and returns the next line without its line ending.
    pub fn ask(&mut self, prompt: &str) -> Result<String, PromptError> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(PromptError::Eof);
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Asks until `validate` accepts the answer, printing its message after each
    /// rejection. Gives up after the configured number of attempts.
    pub fn ask_until_valid<T, F>(&mut self, prompt: &str, mut validate: F) -> Result<T, PromptError>
    where
        F: FnMut(&str) -> Result<T, String>,
    {
        for attempt in 1..=self.max_attempts {
            let answer = self.ask(prompt)?;
            match validate(answer.trim()) {
                Ok(value) => return Ok(value),
                Err(reason) if attempt < self.max_attempts => {
                    self.say(&format!("{reason}. Please try again."))?;
                }
                Err(reason) => self.say(&reason)?,
            }
        }
        Err(PromptError::TooManyAttempts(self.max_attempts))
    }

    pub fn into_output(self) -> W {
        self.output
    }
}
