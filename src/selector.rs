//! Operator selection of the version to install
//!
//! One line is read and interpreted as a zero-based index into the listed
//! entries. Invalid input is an error; there is no re-prompt.

use crate::error::SelectionError;
use std::io::{BufRead, Write};

/// Prompt shown before reading the index
pub const PROMPT: &str = "Pick index to install (or ctrl+c to kill the process): ";

/// Validate `input` as an index into a list of `count` entries
pub fn parse_selection(input: &str, count: usize) -> Result<usize, SelectionError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(SelectionError::Empty);
    }

    let index: i64 = input.parse().map_err(|_| SelectionError::NotANumber {
        input: input.to_string(),
    })?;

    match usize::try_from(index) {
        Ok(i) if i < count => Ok(i),
        _ => Err(SelectionError::OutOfRange {
            index,
            max: count.saturating_sub(1),
        }),
    }
}

/// Print the prompt, read one line and validate it
pub fn prompt_selection<R, W>(
    reader: &mut R,
    writer: &mut W,
    count: usize,
) -> Result<usize, SelectionError>
where
    R: BufRead + ?Sized,
    W: Write + ?Sized,
{
    writer
        .write_all(PROMPT.as_bytes())
        .and_then(|()| writer.flush())
        .map_err(SelectionError::Prompt)?;

    let mut line = String::new();
    reader.read_line(&mut line).map_err(SelectionError::Prompt)?;
    parse_selection(&line, count)
}
