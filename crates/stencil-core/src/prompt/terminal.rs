//! Key input and frame drawing for interactive widgets

use std::collections::VecDeque;
use std::io;

/// Keys the widgets react to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Backspace,
    Up,
    Down,
    Char(char),
    /// Ctrl+C
    Interrupt,
    Other,
}

/// Terminal seam used by every widget
///
/// A widget draws a frame, reads one key, updates its state and redraws
/// until it reaches a terminal state, then calls [`Console::finish`] with a
/// one-line summary of the answer.
pub trait Console {
    fn read_key(&mut self) -> io::Result<Key>;

    /// Replace the previously drawn frame
    fn draw(&mut self, frame: &str) -> io::Result<()>;

    /// Clear the active frame and print the final summary line
    fn finish(&mut self, summary: &str) -> io::Result<()>;
}

/// Real terminal backed by `console::Term` on stderr
pub struct TermConsole {
    term: console::Term,
    drawn_lines: usize,
}

impl Default for TermConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl TermConsole {
    pub fn new() -> Self {
        Self {
            term: console::Term::stderr(),
            drawn_lines: 0,
        }
    }

    fn clear_frame(&mut self) -> io::Result<()> {
        if self.drawn_lines > 0 {
            self.term.clear_line()?;
            self.term.clear_last_lines(self.drawn_lines - 1)?;
            self.drawn_lines = 0;
        }
        Ok(())
    }
}

impl Console for TermConsole {
    fn read_key(&mut self) -> io::Result<Key> {
        // a detached Term reports every key as unknown
        if !self.term.is_term() {
            return Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "interactive input requires a terminal",
            ));
        }

        let key = match self.term.read_key() {
            Ok(key) => key,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => return Ok(Key::Interrupt),
            Err(e) => return Err(e),
        };

        Ok(match key {
            console::Key::Enter => Key::Enter,
            console::Key::Backspace => Key::Backspace,
            console::Key::ArrowUp => Key::Up,
            console::Key::ArrowDown => Key::Down,
            console::Key::Char('\u{3}') => Key::Interrupt,
            console::Key::Char(c) if !c.is_control() => Key::Char(c),
            _ => Key::Other,
        })
    }

    fn draw(&mut self, frame: &str) -> io::Result<()> {
        self.clear_frame()?;
        self.term.hide_cursor()?;
        self.term.write_str(frame)?;
        self.drawn_lines = frame.lines().count().max(1);
        self.term.show_cursor()
    }

    fn finish(&mut self, summary: &str) -> io::Result<()> {
        self.clear_frame()?;
        self.term.write_line(summary)
    }
}

/// Console that replays a fixed key script
///
/// Every drawn frame and the final summary are recorded. Once the script
/// is exhausted further reads yield [`Key::Interrupt`], so a widget waiting
/// for more input cancels instead of blocking.
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    keys: VecDeque<Key>,
    pub frames: Vec<String>,
    pub summaries: Vec<String>,
}

impl ScriptedConsole {
    pub fn new(keys: impl IntoIterator<Item = Key>) -> Self {
        Self {
            keys: keys.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Queue one `Key::Char` per character of `text`
    pub fn typing(mut self, text: &str) -> Self {
        self.keys.extend(text.chars().map(Key::Char));
        self
    }

    /// Queue a single key
    pub fn then(mut self, key: Key) -> Self {
        self.keys.push_back(key);
        self
    }

    pub fn remaining(&self) -> usize {
        self.keys.len()
    }

    pub fn last_frame(&self) -> Option<&str> {
        self.frames.last().map(String::as_str)
    }
}

impl Console for ScriptedConsole {
    fn read_key(&mut self) -> io::Result<Key> {
        Ok(self.keys.pop_front().unwrap_or(Key::Interrupt))
    }

    fn draw(&mut self, frame: &str) -> io::Result<()> {
        self.frames.push(frame.to_string());
        Ok(())
    }

    fn finish(&mut self, summary: &str) -> io::Result<()> {
        self.summaries.push(summary.to_string());
        Ok(())
    }
}
