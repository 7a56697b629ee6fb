// UI layer: operator prompts and menus.
//
// The workflow only talks to the `Prompter` trait so it can be driven by a
// script in tests. `Console` is the real implementation: prompts go through
// `dialoguer`, everything else is printed to stdout.

use std::error::Error;
use std::io::Write;

use dialoguer::Input;
use tracing::debug;

use crate::error::{SelectionError, WorkflowError};

/// Answer that leaves any menu without doing anything.
pub const QUIT_SENTINEL: &str = "00";

/// Everything the workflow needs from the operator's terminal.
pub trait Prompter {
    /// Ask for a single whitespace-delimited token.
    fn ask(&mut self, prompt: &str) -> std::io::Result<String>;

    /// Ask for a whole line of free text.
    fn ask_line(&mut self, prompt: &str) -> std::io::Result<String>;

    /// Print a line to the operator.
    fn say(&mut self, message: &str);
}

impl<P: Prompter + ?Sized> Prompter for &mut P {
    fn ask(&mut self, prompt: &str) -> std::io::Result<String> {
        (**self).ask(prompt)
    }

    fn ask_line(&mut self, prompt: &str) -> std::io::Result<String> {
        (**self).ask_line(prompt)
    }

    fn say(&mut self, message: &str) {
        (**self).say(message)
    }
}

/// Interactive terminal prompter.
#[derive(Debug, Default)]
pub struct Console;

impl Prompter for Console {
    fn ask(&mut self, prompt: &str) -> std::io::Result<String> {
        let answer = Input::<String>::new().with_prompt(prompt).interact_text()?;
        Ok(first_token(&answer).to_string())
    }

    fn ask_line(&mut self, prompt: &str) -> std::io::Result<String> {
        let answer = Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?;
        Ok(answer.trim_end_matches(['\r', '\n']).to_string())
    }

    fn say(&mut self, message: &str) {
        println!("{message}");
    }
}

fn first_token(answer: &str) -> &str {
    answer.split_whitespace().next().unwrap_or("")
}

/// What the operator picked from a menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Zero-based position into the listed items.
    Index(usize),
    Quit,
}

/// Turn a 1-based menu answer into a position in a list of `len` items.
///
/// `00` quits whatever the list holds, even when it is empty. Zero,
/// negative and too large numbers are rejected, never clamped.
pub fn parse_selection(answer: &str, len: usize) -> Result<Selection, SelectionError> {
    let answer = answer.trim();
    if answer == QUIT_SENTINEL {
        return Ok(Selection::Quit);
    }
    let index: i64 = answer
        .parse()
        .map_err(|_| SelectionError::NotANumber(answer.to_string()))?;
    match usize::try_from(index) {
        Ok(i) if (1..=len).contains(&i) => Ok(Selection::Index(i - 1)),
        _ => Err(SelectionError::OutOfRange { index, len }),
    }
}

/// Print `items` as a numbered menu under `title`, then read the answer.
pub fn select<P, S>(prompter: &mut P, title: &str, items: &[S]) -> Result<Selection, WorkflowError>
where
    P: Prompter + ?Sized,
    S: AsRef<str>,
{
    for (i, item) in items.iter().enumerate() {
        prompter.say(&format!("> [{title}]: {} == {}", i + 1, item.as_ref()));
    }
    prompter.say(&format!("> [{title}]: {QUIT_SENTINEL} == Quit"));
    let answer = prompter.ask(&format!("> [{title}]"))?;
    Ok(parse_selection(&answer, items.len())?)
}

/// Write a fatal error for the operator. Errors share stdout with every
/// other message; the log only sees them at debug level.
pub fn report_fatal<W: Write>(out: &mut W, error: &dyn Error) -> std::io::Result<()> {
    debug!("run failed: {error:?}");
    writeln!(out, "{error}")
}

/// The user-facing handle of a profile URL: everything after the last `/`.
pub fn profile_handle(url: &str) -> &str {
    match url.rfind('/') {
        Some(pos) => &url[pos + 1..],
        None => url,
    }
}
