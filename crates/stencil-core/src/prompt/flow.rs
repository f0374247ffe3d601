//! Ad hoc prompt flows
//!
//! A [`PromptFlow`] runs already-constructed widgets in order. After each
//! completed widget a handler decides whether to record the answer and go
//! on, or to abort the rest of the flow. Aborting is not an error: callers
//! check [`PromptFlow::is_aborted`].

use super::answer::AnswerValue;
use super::terminal::Console;
use super::{Completion, Prompt};
use crate::answers::AnswerSet;
use std::collections::BTreeMap;
use std::io;

/// Decision returned by a flow handler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowControl {
    /// Record the answer and run the next widget
    Continue,
    /// Stop without recording the answer
    Abort,
}

#[derive(Default)]
pub struct PromptFlow {
    prompts: Vec<Box<dyn Prompt>>,
    results: BTreeMap<String, AnswerValue>,
    aborted: bool,
}

impl PromptFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(mut self, prompt: impl Prompt + 'static) -> Self {
        self.prompts.push(Box::new(prompt));
        self
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted
    }

    pub fn result(&self, id: &str) -> Option<&AnswerValue> {
        self.results.get(id)
    }

    /// Recorded answers in normalized form
    pub fn answers(&self) -> AnswerSet {
        self.results
            .iter()
            .map(|(id, value)| (id.clone(), value.normalized()))
            .collect()
    }

    /// Run with the default handler, which records every answer
    pub fn run(&mut self, console: &mut dyn Console) -> io::Result<()> {
        self.run_with(console, |_, _| FlowControl::Continue)
    }

    /// Run every widget in order, consulting `handler` after each completion
    ///
    /// A cancelled widget marks the flow aborted. Terminal errors are
    /// returned immediately.
    pub fn run_with<F>(&mut self, console: &mut dyn Console, mut handler: F) -> io::Result<()>
    where
        F: FnMut(&dyn Prompt, &AnswerValue) -> FlowControl,
    {
        for prompt in self.prompts.iter_mut() {
            if self.aborted {
                break;
            }

            match prompt.run(console)? {
                Completion::Cancelled => self.aborted = true,
                Completion::Done(value) => match handler(&**prompt, &value) {
                    FlowControl::Continue => {
                        if !prompt.id().is_empty() {
                            self.results.insert(prompt.id().to_string(), value);
                        }
                    }
                    FlowControl::Abort => self.aborted = true,
                },
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::input::InputPrompt;
    use crate::prompt::terminal::{Key, ScriptedConsole};
    use serde_json::json;

    fn save_flow() -> PromptFlow {
        PromptFlow::new()
            .add(InputPrompt::confirm().id("confirm").default_value("y"))
            .add(InputPrompt::text().id("name"))
    }

    fn stop_on_decline(p: &dyn Prompt, value: &AnswerValue) -> FlowControl {
        if p.id() == "confirm" && value.as_bool() != Some(true) {
            FlowControl::Abort
        } else {
            FlowControl::Continue
        }
    }

    #[test]
    fn test_default_handler_records_everything() {
        let mut console = ScriptedConsole::new([Key::Char('y')])
            .typing("mine")
            .then(Key::Enter);
        let mut flow = save_flow();
        flow.run(&mut console).unwrap();

        assert!(!flow.is_aborted());
        assert_eq!(flow.result("confirm"), Some(&AnswerValue::Bool(true)));
        assert_eq!(flow.answers()["name"], json!("mine"));
    }

    #[test]
    fn test_handler_abort_skips_remaining_prompts() {
        let mut console = ScriptedConsole::new([Key::Char('n')]).typing("unused");
        let mut flow = save_flow();
        flow.run_with(&mut console, stop_on_decline).unwrap();

        assert!(flow.is_aborted());
        assert!(flow.result("confirm").is_none());
        assert!(flow.result("name").is_none());
        assert_eq!(console.remaining(), "unused".len());
    }

    #[test]
    fn test_cancel_aborts_without_error() {
        let mut console = ScriptedConsole::new([Key::Enter, Key::Interrupt]);
        let mut flow = save_flow();
        flow.run_with(&mut console, stop_on_decline).unwrap();

        assert!(flow.is_aborted());
        assert_eq!(flow.result("confirm"), Some(&AnswerValue::Bool(true)));
        assert!(flow.result("name").is_none());
    }

    #[test]
    fn test_unnamed_prompts_are_not_recorded() {
        let mut console = ScriptedConsole::default().typing("x").then(Key::Enter);
        let mut flow = PromptFlow::new().add(InputPrompt::text());
        flow.run(&mut console).unwrap();
        assert!(flow.answers().is_empty());
    }
}
