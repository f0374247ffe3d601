//! Single-pick and multi-pick list widgets

use super::answer::{AnswerValue, Selection, SelectionItem};
use super::terminal::{Console, Key};
use super::{
    cancel_on_quit, cancelled_line, done_line, help_line, marks, question_line, Completion, Prompt,
};
use console::style;
use serde_json::Value;
use std::io;

const SEPARATOR_WIDTH: usize = 30;

/// One entry of a list widget; an empty label makes it a separator
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListItem {
    text: String,
    description: String,
    checked: bool,
    payload: Option<Value>,
}

impl ListItem {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn separator() -> Self {
        Self::default()
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    pub fn payload(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_checked(&self) -> bool {
        self.checked
    }

    pub fn is_separator(&self) -> bool {
        self.text.is_empty()
    }

    fn to_selection(&self, index: usize) -> SelectionItem {
        SelectionItem {
            index,
            label: self.text.clone(),
            payload: self.payload.clone(),
        }
    }
}

/// State of a list widget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListState {
    Browsing,
    Done,
    Cancelled,
}

type KeyHandler = fn(&mut ListPrompt, Key) -> ListState;

/// List widget; [`ListPrompt::picker`] commits one item, [`ListPrompt::choices`]
/// commits every checked item
pub struct ListPrompt {
    id: String,
    question: String,
    help: String,
    items: Vec<ListItem>,
    cursor: usize,
    multi: bool,
    selection: Option<Selection>,
    handler: KeyHandler,
}

impl ListPrompt {
    pub fn picker() -> Self {
        Self {
            id: String::new(),
            question: String::new(),
            help: "Use the arrow keys to move, Enter to select.".to_string(),
            items: Vec::new(),
            cursor: 0,
            multi: false,
            selection: None,
            handler: picker_keys,
        }
    }

    pub fn choices() -> Self {
        Self {
            help: "Use the space key to toggle selection, Enter key to finish.".to_string(),
            multi: true,
            handler: choices_keys,
            ..Self::picker()
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

    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = help.into();
        self
    }

    pub fn items(mut self, items: Vec<ListItem>) -> Self {
        self.items = items;
        self
    }

    /// Highlight `index` initially; out-of-range values are ignored
    pub fn initial_index(mut self, index: usize) -> Self {
        if index < self.items.len() {
            self.cursor = index;
        }
        self
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn list(&self) -> &[ListItem] {
        &self.items
    }

    /// Feed one key to the state machine
    pub fn handle_key(&mut self, key: Key) -> ListState {
        (self.handler)(self, key)
    }

    /// Selection committed by the last `Enter`, if any
    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    fn move_cursor(&mut self, key: Key) {
        match key {
            Key::Up | Key::Char('k') => self.cursor = self.cursor.saturating_sub(1),
            Key::Down | Key::Char('j') => {
                if self.cursor + 1 < self.items.len() {
                    self.cursor += 1;
                }
            }
            _ => {}
        }
    }

    fn checked_items(&self) -> Vec<SelectionItem> {
        self.items
            .iter()
            .enumerate()
            .filter(|(_, item)| !item.is_separator() && item.checked)
            .map(|(index, item)| item.to_selection(index))
            .collect()
    }

    fn view(&self) -> String {
        let mut lines = vec![question_line(&self.question), String::new()];

        for (index, item) in self.items.iter().enumerate() {
            lines.push(self.item_line(index, item));
        }

        if !self.help.is_empty() {
            lines.push(String::new());
            lines.push(help_line(&self.help));
        }

        lines.join("\n")
    }

    fn item_line(&self, index: usize, item: &ListItem) -> String {
        if item.is_separator() {
            let rule = marks::SEPARATOR.repeat(SEPARATOR_WIDTH);
            return format!("    {}", style(rule).dim().for_stderr());
        }

        let check = match (self.multi, item.checked) {
            (false, _) => "",
            (true, true) => marks::BOX_CHECKED,
            (true, false) => marks::BOX_EMPTY,
        };

        let desc = if item.description.is_empty() {
            String::new()
        } else {
            let d = format!(" ({})", item.description);
            style(d).dim().for_stderr().to_string()
        };

        if index == self.cursor {
            let composed = format!("{}{}{}", marks::ARROW, check, item.text);
            format!("  {}{}", style(composed).cyan().for_stderr(), desc)
        } else if item.checked && self.multi {
            let composed = format!("{}{}", check, item.text);
            format!("    {}{}", style(composed).color256(30).for_stderr(), desc)
        } else {
            format!("    {}{}{}", check, item.text, desc)
        }
    }
}

impl Prompt for ListPrompt {
    fn id(&self) -> &str {
        &self.id
    }

    fn run(&mut self, console: &mut dyn Console) -> io::Result<Completion> {
        loop {
            console.draw(&self.view())?;

            match self.handle_key(console.read_key()?) {
                ListState::Browsing => continue,
                ListState::Done => {
                    let selection = self
                        .selection
                        .clone()
                        .unwrap_or(Selection::Single(None));
                    console.finish(&done_line(&self.question, &selection.canonical()))?;
                    return Ok(Completion::Done(AnswerValue::Selection(selection)));
                }
                ListState::Cancelled => {
                    console.finish(&cancelled_line(&self.question))?;
                    return Ok(Completion::Cancelled);
                }
            }
        }
    }
}

fn picker_keys(p: &mut ListPrompt, key: Key) -> ListState {
    if cancel_on_quit(key) {
        return ListState::Cancelled;
    }

    match key {
        Key::Enter => match p.items.get(p.cursor) {
            Some(item) if !item.is_separator() => {
                p.selection = Some(Selection::Single(Some(item.to_selection(p.cursor))));
                ListState::Done
            }
            _ => ListState::Browsing,
        },
        _ => {
            p.move_cursor(key);
            ListState::Browsing
        }
    }
}

fn choices_keys(p: &mut ListPrompt, key: Key) -> ListState {
    if cancel_on_quit(key) {
        return ListState::Cancelled;
    }

    match key {
        Key::Char(' ') => {
            if let Some(item) = p.items.get_mut(p.cursor) {
                if !item.is_separator() {
                    item.checked = !item.checked;
                }
            }
            ListState::Browsing
        }
        Key::Enter => {
            p.selection = Some(Selection::Multi(p.checked_items()));
            ListState::Done
        }
        _ => {
            p.move_cursor(key);
            ListState::Browsing
        }
    }
}
