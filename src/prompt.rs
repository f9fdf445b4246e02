//! Interactive selection and table rendering for the terminal.
use anyhow::{Context as _, Result};
use std::io::{self, BufRead, Write};

/// Ask the user to choose from a list.
///
/// The interactive link mode goes through this trait so it can be driven by
/// a scripted implementation in tests.
#[cfg_attr(test, mockall::automock)]
pub trait Prompt {
    /// Ask `question` and return the chosen entries of `choices`, in the
    /// order given.  An empty result means nothing was chosen.
    ///
    /// # Errors
    ///
    /// Returns an error if the answer cannot be read.
    fn select_many(&self, question: &str, choices: &[String]) -> Result<Vec<String>>;
}

/// [`Prompt`] reading answers from standard input.
///
/// Accepts a comma-separated list of names or 1-based numbers.  An empty
/// line or end of input selects nothing; an unknown entry re-asks.
#[derive(Debug, Default)]
pub struct StdinPrompt;

impl Prompt for StdinPrompt {
    fn select_many(&self, question: &str, choices: &[String]) -> Result<Vec<String>> {
        let stdin = io::stdin();
        ask(&mut stdin.lock(), &mut io::stdout().lock(), question, choices)
    }
}

/// Run the selection dialogue over arbitrary reader/writer handles.
///
/// # Errors
///
/// Returns an error if reading or writing fails.
pub fn ask<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    question: &str,
    choices: &[String],
) -> Result<Vec<String>> {
    writeln!(output, "\n{question}")?;
    for (i, choice) in choices.iter().enumerate() {
        writeln!(output, "  \x1b[1m{}\x1b[0m) {choice}", i + 1)?;
    }

    loop {
        write!(output, "\nSelect [1-{}, comma-separated]: ", choices.len())?;
        output.flush()?;

        let mut line = String::new();
        let read = input.read_line(&mut line).context("reading selection")?;
        if read == 0 {
            return Ok(Vec::new());
        }

        match parse_selection(&line, choices) {
            Ok(selected) => return Ok(selected),
            Err(bad) => writeln!(output, "  '{bad}' is not one of the listed disks")?,
        }
    }
}

/// Parse a comma-separated answer into choices.
///
/// Each entry is either a listed name or its 1-based number.  Duplicates
/// are dropped, keeping the first occurrence.
///
/// # Errors
///
/// Returns the first entry that matches no choice.
pub fn parse_selection(answer: &str, choices: &[String]) -> Result<Vec<String>, String> {
    let mut selected: Vec<String> = Vec::new();
    for token in answer.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let choice = token
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| choices.get(i))
            .or_else(|| choices.iter().find(|c| c.as_str() == token))
            .ok_or_else(|| token.to_string())?;
        if !selected.contains(choice) {
            selected.push(choice.clone());
        }
    }
    Ok(selected)
}

/// Render `rows` under `headers` as a boxed plain-text table.
///
/// Column widths follow the widest cell; the result has no trailing newline.
#[must_use]
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let separator = widths.iter().fold(String::from("+"), |mut acc, w| {
        acc.push_str(&"-".repeat(w + 2));
        acc.push('+');
        acc
    });
    let mut lines = vec![
        separator.clone(),
        render_row(&widths, headers.iter().copied()),
        separator.clone(),
    ];
    for row in rows {
        lines.push(render_row(&widths, row.iter().map(String::as_str)));
    }
    lines.push(separator);
    lines.join("\n")
}

fn render_row<'a>(widths: &[usize], cells: impl IntoIterator<Item = &'a str>) -> String {
    widths
        .iter()
        .zip(cells)
        .fold(String::from("|"), |mut acc, (w, cell)| {
            let pad = w.saturating_sub(cell.chars().count());
            acc.push(' ');
            acc.push_str(cell);
            acc.push_str(&" ".repeat(pad));
            acc.push_str(" |");
            acc
        })
}
