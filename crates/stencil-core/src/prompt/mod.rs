//! Interactive widgets and prompt flows
//!
//! Every widget implements [`Prompt`]: it owns the [`Console`] while running
//! and returns either [`Completion::Done`] with its value or
//! [`Completion::Cancelled`]. Flows chain widgets together:
//!
//! - [`flow::PromptFlow`] runs a fixed list of constructed widgets
//! - [`questions::run_questions`] walks a question manifest, evaluating
//!   conditions and item lists against earlier answers

pub mod answer;
pub mod flow;
pub mod input;
pub mod list;
pub mod questions;
pub mod terminal;
pub mod validate;

use console::style;
use std::io;

pub use answer::{AnswerValue, Selection, SelectionItem};
pub use flow::{FlowControl, PromptFlow};
pub use input::{InputPrompt, InputState};
pub use list::{ListItem, ListPrompt, ListState};
pub use questions::{run_questions, QuestionManifest, QuestionStep};
pub use terminal::{Console, Key, ScriptedConsole, TermConsole};
pub use validate::{Rule, ValidationError, Validator};

/// How a widget run ended
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    Done(AnswerValue),
    Cancelled,
}

impl Completion {
    pub fn is_done(&self) -> bool {
        matches!(self, Completion::Done(_))
    }

    pub fn value(&self) -> Option<&AnswerValue> {
        match self {
            Completion::Done(value) => Some(value),
            Completion::Cancelled => None,
        }
    }
}

/// Capability interface shared by all widgets
pub trait Prompt {
    /// Identifier the answer is stored under (may be empty)
    fn id(&self) -> &str;

    /// Run until the user commits a value or cancels
    fn run(&mut self, console: &mut dyn Console) -> io::Result<Completion>;
}

/// Glyphs drawn by the widgets
pub(crate) mod marks {
    pub const QUESTION: &str = "? ";
    pub const DONE: &str = "\u{2714} ";
    pub const ARROW: &str = "\u{2192} ";
    pub const BOX_EMPTY: &str = "[ ]  ";
    pub const BOX_CHECKED: &str = "[x]  ";
    pub const SEPARATOR: &str = "\u{2500}";
    pub const ERROR: &str = "! ";
}

/// Interrupt cancels text-like widgets
pub(crate) fn cancel_on_interrupt(key: Key) -> bool {
    key == Key::Interrupt
}

/// Interrupt or `q` cancels list widgets
pub(crate) fn cancel_on_quit(key: Key) -> bool {
    matches!(key, Key::Interrupt | Key::Char('q'))
}

/// `? question` header of an active widget
pub(crate) fn question_line(question: &str) -> String {
    format!(
        "{}{}",
        style(marks::QUESTION).green().for_stderr(),
        style(question).bold().for_stderr()
    )
}

/// `✔ question answer` line printed once a widget completes
pub(crate) fn done_line(question: &str, answer: &str) -> String {
    format!(
        "{}{} {}",
        style(marks::DONE).green().for_stderr(),
        style(question).bold().for_stderr(),
        style(answer).cyan().for_stderr()
    )
}

pub(crate) fn cancelled_line(question: &str) -> String {
    format!(
        "{}{}",
        style(marks::ERROR).red().for_stderr(),
        style(question).dim().for_stderr()
    )
}

pub(crate) fn help_line(help: &str) -> String {
    format!("  {}", style(help).dim().for_stderr())
}
