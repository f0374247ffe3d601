//! Single-line text input and yes/no confirmation

use super::answer::AnswerValue;
use super::terminal::{Console, Key};
use super::validate::{ValidationError, Validator};
use super::{
    cancel_on_interrupt, cancelled_line, done_line, help_line, marks, question_line, Completion,
    Prompt,
};
use console::style;
use std::io;

const TEXT_CHAR_LIMIT: usize = 160;

/// State of an input widget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputState {
    Editing,
    Done,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputKind {
    Text,
    Confirm,
}

type KeyHandler = fn(&mut InputPrompt, Key) -> InputState;

/// Text entry widget; [`InputPrompt::confirm`] builds the yes/no variant
pub struct InputPrompt {
    kind: InputKind,
    id: String,
    question: String,
    description: String,
    help: String,
    buffer: String,
    default_value: String,
    validator: Validator,
    error: Option<ValidationError>,
    handler: KeyHandler,
}

impl InputPrompt {
    pub fn text() -> Self {
        Self {
            kind: InputKind::Text,
            id: String::new(),
            question: String::new(),
            description: String::new(),
            help: String::new(),
            buffer: String::new(),
            default_value: String::new(),
            validator: Validator::default(),
            error: None,
            handler: text_keys,
        }
    }

    pub fn confirm() -> Self {
        Self {
            kind: InputKind::Confirm,
            handler: confirm_keys,
            ..Self::text()
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn question(mut self, question: impl Into<String>) -> Self {
        self.question = question.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = help.into();
        self
    }

    /// Initial buffer contents
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.buffer = value.into();
        self
    }

    /// Answer used when a confirm widget receives Enter on an empty buffer
    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = value.into();
        self
    }

    pub fn validator(mut self, validator: Validator) -> Self {
        self.validator = validator;
        self
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn error(&self) -> Option<&ValidationError> {
        self.error.as_ref()
    }

    /// Feed one key to the state machine
    pub fn handle_key(&mut self, key: Key) -> InputState {
        (self.handler)(self, key)
    }

    /// Value the widget commits in its current state
    pub fn committed_value(&self) -> AnswerValue {
        match self.kind {
            InputKind::Text => AnswerValue::Text(self.buffer.clone()),
            InputKind::Confirm => {
                AnswerValue::Bool(self.buffer.to_lowercase().starts_with('y'))
            }
        }
    }

    fn edit(&mut self, key: Key, limit: usize) {
        match key {
            Key::Char(c) if self.buffer.chars().count() < limit => self.buffer.push(c),
            Key::Backspace => {
                self.buffer.pop();
            }
            _ => return,
        }
        self.error = self.validator.validate(&self.buffer).err();
    }

    fn view(&self) -> String {
        let mut out = question_line(&self.question);

        if !self.description.is_empty() {
            let desc = format!(" ({})", self.description);
            out.push_str(&style(desc).dim().for_stderr().to_string());
        }

        out.push(' ');
        out.push_str(&style(&self.buffer).cyan().for_stderr().to_string());

        if !self.help.is_empty() {
            out.push('\n');
            out.push_str(&help_line(&self.help));
        }

        if let Some(err) = &self.error {
            out.push('\n');
            let msg = format!("  {}{}", marks::ERROR, capitalize(&err.to_string()));
            out.push_str(&style(msg).magenta().for_stderr().to_string());
        }

        out
    }
}

impl Prompt for InputPrompt {
    fn id(&self) -> &str {
        &self.id
    }

    fn run(&mut self, console: &mut dyn Console) -> io::Result<Completion> {
        loop {
            console.draw(&self.view())?;

            match self.handle_key(console.read_key()?) {
                InputState::Editing => continue,
                InputState::Done => {
                    let value = self.committed_value();
                    console.finish(&done_line(&self.question, &value.display()))?;
                    return Ok(Completion::Done(value));
                }
                InputState::Cancelled => {
                    console.finish(&cancelled_line(&self.question))?;
                    return Ok(Completion::Cancelled);
                }
            }
        }
    }
}

fn text_keys(p: &mut InputPrompt, key: Key) -> InputState {
    if cancel_on_interrupt(key) {
        return InputState::Cancelled;
    }

    match key {
        Key::Enter => match p.validator.validate(&p.buffer) {
            Ok(()) => {
                p.error = None;
                InputState::Done
            }
            Err(e) => {
                p.error = Some(e);
                InputState::Editing
            }
        },
        _ => {
            p.edit(key, TEXT_CHAR_LIMIT);
            InputState::Editing
        }
    }
}

fn confirm_keys(p: &mut InputPrompt, key: Key) -> InputState {
    if cancel_on_interrupt(key) {
        return InputState::Cancelled;
    }

    match key {
        Key::Char('y' | 'Y') => {
            p.buffer = "y".to_string();
            InputState::Done
        }
        Key::Char('n' | 'N') => {
            p.buffer = "n".to_string();
            InputState::Done
        }
        Key::Enter => {
            let typed = p.buffer.to_lowercase();
            let answer = if typed.is_empty() {
                p.default_value.to_lowercase()
            } else if typed == "yes" || typed == "no" {
                typed
            } else {
                String::new()
            };

            if answer.is_empty() {
                InputState::Editing
            } else {
                p.buffer = answer;
                InputState::Done
            }
        }
        Key::Char(_) => {
            // single character field: a new key replaces the previous one
            p.buffer.clear();
            p.edit(key, 1);
            InputState::Editing
        }
        _ => {
            p.edit(key, 1);
            InputState::Editing
        }
    }
}

fn capitalize(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
