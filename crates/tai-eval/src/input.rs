//! Line sources for `pucho`.

use std::collections::VecDeque;
use std::io::{self, BufRead};

/// Supplies one line of input per `pucho` statement.
pub trait InputSource {
    /// Read the next line without its line terminator. `None` at end of input.
    fn read_line(&mut self) -> io::Result<Option<String>>;
}

/// Reads from the process's standard input.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinInput;

impl InputSource for StdinInput {
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }
}

/// Serves a fixed list of lines, then end of input.
#[derive(Debug, Default, Clone)]
pub struct ScriptedInput {
    lines: VecDeque<String>,
}

impl ScriptedInput {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

impl InputSource for ScriptedInput {
    fn read_line(&mut self) -> io::Result<Option<String>> {
        Ok(self.lines.pop_front())
    }
}
