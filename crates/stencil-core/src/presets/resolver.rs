//! Mapping a preset request to a template reference
//!
//! `@dir` names a built-in template, any other name a user preset. Without a
//! name the user picks interactively, with manual configuration (and an
//! optional save) as the last entry.

use super::{PresetStore, TemplateRef, UserPreset};
use crate::answers::AnswerSet;
use crate::error::{Error, Result};
use crate::expression::Evaluator;
use crate::prompt::{
    run_questions, Completion, Console, FlowControl, InputPrompt, ListItem, ListPrompt, Prompt,
    PromptFlow, QuestionManifest,
};
use crate::templates::{TargetKind, TemplateCatalog, PROMPT_FILE};
use serde_json::Value;
use std::path::Path;
use tracing::{debug, warn};

/// Last entry of the preset selector
pub const MANUAL_ENTRY: &str = "[Manually select features]";

/// Directory under the asset root holding per-extension file templates
pub const FILE_TYPES_DIR: &str = "types";

pub struct PresetResolver<'a> {
    catalog: &'a TemplateCatalog,
    store: &'a mut PresetStore,
    evaluator: &'a Evaluator,
    /// Seed visible to question expressions, never stored in answers
    base: AnswerSet,
}

impl<'a> PresetResolver<'a> {
    pub fn new(
        catalog: &'a TemplateCatalog,
        store: &'a mut PresetStore,
        evaluator: &'a Evaluator,
    ) -> Self {
        Self {
            catalog,
            store,
            evaluator,
            base: AnswerSet::new(),
        }
    }

    /// Expose the output base name to questions as `name`
    pub fn output_name(mut self, name: &str) -> Self {
        self.base
            .insert("name".to_string(), Value::String(name.to_string()));
        self
    }

    /// Resolve an explicit name for `kind` without any interaction
    pub fn find(&self, kind: TargetKind, name: &str) -> Result<TemplateRef> {
        if let Some(dir) = name.strip_prefix('@') {
            return self
                .catalog
                .find(kind, dir)
                .cloned()
                .map(TemplateRef::Builtin)
                .ok_or_else(|| Error::not_found("default preset", dir));
        }

        self.store
            .find(kind, name)
            .cloned()
            .map(TemplateRef::Preset)
            .ok_or_else(|| Error::not_found("preset", name))
    }

    /// Resolve a name of any kind, as used by introspection commands
    pub fn lookup(&self, name: &str) -> Result<TemplateRef> {
        if let Some(dir) = name.strip_prefix('@') {
            return self
                .catalog
                .find_any(dir)
                .cloned()
                .map(TemplateRef::Builtin)
                .ok_or_else(|| Error::not_found("default preset", dir));
        }

        self.store
            .find_by_name(name)
            .cloned()
            .map(TemplateRef::Preset)
            .ok_or_else(|| Error::not_found("preset", name))
    }

    /// Resolve `name` if given, otherwise run the interactive selector
    pub fn resolve(
        &mut self,
        kind: TargetKind,
        name: Option<&str>,
        console: &mut dyn Console,
    ) -> Result<TemplateRef> {
        match name.map(str::trim).filter(|n| !n.is_empty()) {
            Some(name) => self.find(kind, name),
            None => self.run_selector(kind, console),
        }
    }

    /// Run the question manifest of the `types/<ext>` file template
    pub fn resolve_by_extension(
        &self,
        ext: &str,
        console: &mut dyn Console,
    ) -> Result<TemplateRef> {
        let ext = ext.trim_start_matches('.');
        if !is_plain_extension(ext) {
            return Err(Error::not_found("file type", format!(".{}", ext)));
        }

        let dir = format!("{}/{}", FILE_TYPES_DIR, ext);
        if !self.catalog.root().join(&dir).is_dir() {
            return Err(Error::not_found("file type", format!(".{}", ext)));
        }

        let options = self.ask(&self.catalog.root().join(&dir), console)?;

        Ok(TemplateRef::Preset(UserPreset {
            name: ext.to_string(),
            kind: TargetKind::File,
            template: dir,
            options,
        }))
    }

    fn run_selector(&mut self, kind: TargetKind, console: &mut dyn Console) -> Result<TemplateRef> {
        let mut entries: Vec<TemplateRef> = self
            .store
            .items_of_kind(kind)
            .cloned()
            .map(TemplateRef::Preset)
            .collect();
        entries.extend(self.catalog.of_kind(kind).cloned().map(TemplateRef::Builtin));

        let mut items = list_items(&entries);
        items.push(ListItem::new(MANUAL_ENTRY));

        let index = pick(
            ListPrompt::picker().question("Pick a preset").items(items),
            console,
        )?;

        match entries.into_iter().nth(index) {
            Some(entry) => Ok(entry),
            None => self.run_manual_config(kind, console),
        }
    }

    fn run_manual_config(
        &mut self,
        kind: TargetKind,
        console: &mut dyn Console,
    ) -> Result<TemplateRef> {
        let builtins: Vec<TemplateRef> = self
            .catalog
            .of_kind(kind)
            .cloned()
            .map(TemplateRef::Builtin)
            .collect();

        if builtins.is_empty() {
            return Err(Error::not_found("default preset", kind.as_str()));
        }

        let index = pick(
            ListPrompt::picker()
                .question("Pick an item to use:")
                .items(list_items(&builtins)),
            console,
        )?;

        let Some(TemplateRef::Builtin(builtin)) = builtins.into_iter().nth(index) else {
            return Err(Error::Aborted);
        };

        let options = self.ask(builtin.path(), console)?;
        let mut preset = UserPreset {
            name: builtin.display_name(),
            kind,
            template: builtin.dir().to_string(),
            options,
        };

        if let Some(name) = run_save_prompt(console)? {
            preset.name = name;
            match self.store.add(preset.clone()) {
                Ok(()) => self.store.save()?,
                Err(Error::PresetExists(name)) => {
                    warn!(preset = %name, "preset already exists, not saved")
                }
                Err(e) => return Err(e),
            }
        }

        Ok(TemplateRef::Preset(preset))
    }

    /// Run the question manifest of a template directory, if it has one
    fn ask(&self, template_dir: &Path, console: &mut dyn Console) -> Result<AnswerSet> {
        let path = template_dir.join(PROMPT_FILE);
        if !path.is_file() {
            debug!(dir = %template_dir.display(), "no questions to ask");
            return Ok(AnswerSet::new());
        }

        let manifest = QuestionManifest::load(&path)?;
        run_questions(&manifest, &self.base, self.evaluator, console)
    }
}

/// A single path component that cannot leave `types/`
fn is_plain_extension(ext: &str) -> bool {
    !ext.is_empty()
        && !ext
            .chars()
            .any(|c| c == '/' || c == '\\' || c == ':' || c.is_control())
}

fn list_items(entries: &[TemplateRef]) -> Vec<ListItem> {
    entries
        .iter()
        .map(|e| ListItem::new(e.name()).description(e.description()))
        .collect()
}

/// Run a picker and return the chosen index
fn pick(mut picker: ListPrompt, console: &mut dyn Console) -> Result<usize> {
    match picker.run(console)? {
        Completion::Done(value) => value
            .as_single()
            .map(|item| item.index)
            .ok_or(Error::Aborted),
        Completion::Cancelled => Err(Error::Aborted),
    }
}

/// Ask whether to keep the configuration; returns the chosen preset name
fn run_save_prompt(console: &mut dyn Console) -> Result<Option<String>> {
    let mut flow = PromptFlow::new()
        .add(
            InputPrompt::confirm()
                .id("confirm")
                .question("Save for later use?")
                .description("Y/n")
                .default_value("y"),
        )
        .add(InputPrompt::text().id("name").question("Enter the preset name:"));

    flow.run_with(console, |prompt, value| {
        if prompt.id() == "confirm" && value.as_bool() != Some(true) {
            FlowControl::Abort
        } else {
            FlowControl::Continue
        }
    })?;

    if flow.is_aborted() {
        return Ok(None);
    }

    Ok(flow
        .result("name")
        .and_then(|v| v.as_text())
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string))
}
