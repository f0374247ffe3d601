//! Manifest-driven question flow (`prompt.yml`)
//!
//! Steps run in declaration order. Every expression a step carries (`when`,
//! question, description, item fields) is evaluated against the default seed
//! overlaid with the answers collected so far, so later steps can react to
//! earlier ones.

use super::input::InputPrompt;
use super::list::{ListItem, ListPrompt};
use super::terminal::Console;
use super::validate::{Rule, Validator};
use super::{Completion, Prompt};
use crate::answers::{merge, truthy, AnswerSet};
use crate::error::{Error, Result};
use crate::expression::{Evaluator, ExpressionError};
use crate::templates::manifest::{expr_string, read_yaml, ManifestError};
use crate::templates::version;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use tracing::{debug, warn};

/// Widget a step is rendered with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetKind {
    Input,
    Confirm,
    Picker,
    Choices,
}

impl WidgetKind {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "input" => Some(WidgetKind::Input),
            "confirm" => Some(WidgetKind::Confirm),
            "picker" => Some(WidgetKind::Picker),
            "choices" => Some(WidgetKind::Choices),
            _ => None,
        }
    }
}

/// Candidate entry of a picker or choices step
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepItem {
    #[serde(default, deserialize_with = "expr_string")]
    pub text: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    #[serde(default, deserialize_with = "expr_string")]
    pub description: String,

    #[serde(default, deserialize_with = "expr_string")]
    pub checked: String,
}

/// One question of a question manifest
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuestionStep {
    pub id: String,

    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default, deserialize_with = "expr_string")]
    pub question: String,

    #[serde(default, deserialize_with = "expr_string")]
    pub description: String,

    /// Initial buffer of input steps
    #[serde(default, deserialize_with = "expr_string")]
    pub value: String,

    #[serde(default)]
    pub default: Value,

    #[serde(default, deserialize_with = "expr_string")]
    pub when: String,

    #[serde(default)]
    pub items: Vec<StepItem>,

    #[serde(default)]
    pub rules: Vec<BTreeMap<String, serde_yaml::Value>>,
}

/// Parsed `prompt.yml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuestionManifest {
    #[serde(default, deserialize_with = "expr_string")]
    pub version: String,

    #[serde(default)]
    pub steps: Vec<QuestionStep>,

    #[serde(default)]
    pub consts: Vec<AnswerSet>,
}

impl QuestionManifest {
    /// Load and check a question manifest; step ids must be unique
    pub fn load(path: &Path) -> std::result::Result<Self, ManifestError> {
        debug!(file = %path.display(), "reading question definition");
        let manifest: Self = read_yaml(path)?;
        version::warn_if_newer(path, &manifest.version);

        if let Some(id) = manifest.duplicate_id() {
            return Err(ManifestError::DuplicateStep {
                path: path.to_path_buf(),
                id: id.to_string(),
            });
        }

        Ok(manifest)
    }

    fn duplicate_id(&self) -> Option<&str> {
        let mut seen = HashSet::new();
        self.steps
            .iter()
            .map(|step| step.id.as_str())
            .find(|id| !seen.insert(*id))
    }

    /// Merged constant blocks; later blocks override earlier ones
    pub fn constants(&self) -> AnswerSet {
        self.consts.iter().fold(AnswerSet::new(), |all, block| merge(&all, block))
    }

    /// Every step's static default plus the constants
    pub fn defaults(&self) -> AnswerSet {
        let steps: AnswerSet = self
            .steps
            .iter()
            .map(|step| (step.id.clone(), step.default.clone()))
            .collect();

        merge(&steps, &self.constants())
    }
}

/// Run every visible step of `manifest` and collect the answers
///
/// `base` holds values the caller already knows, such as the output `name`.
/// Expressions see `base`, overlaid by the manifest defaults, overlaid by the
/// answers so far. The result holds the constants plus one entry per answered
/// step; `base` and steps hidden by their `when` expression are absent.
/// Cancelling any widget returns [`Error::Aborted`].
pub fn run_questions(
    manifest: &QuestionManifest,
    base: &AnswerSet,
    evaluator: &Evaluator,
    console: &mut dyn Console,
) -> Result<AnswerSet> {
    let seed = merge(base, &manifest.defaults());
    let mut answers = AnswerSet::new();

    for step in &manifest.steps {
        let context = merge(&seed, &answers);

        if !evaluator.render_bool(&step_name(step, "when"), &step.when, &context, true)? {
            debug!(step = %step.id, "step skipped");
            continue;
        }

        let mut widget = build_widget(step, evaluator, &context)?;
        match widget.run(console)? {
            Completion::Cancelled => return Err(Error::Aborted),
            Completion::Done(value) => {
                answers.insert(step.id.clone(), value.normalized());
            }
        }
    }

    Ok(merge(&manifest.constants(), &answers))
}

fn step_name(step: &QuestionStep, field: &str) -> String {
    format!("{}.{}", step.id, field)
}

fn build_widget(
    step: &QuestionStep,
    evaluator: &Evaluator,
    context: &AnswerSet,
) -> Result<Box<dyn Prompt>> {
    let kind = WidgetKind::parse(&step.kind).ok_or_else(|| ManifestError::UnknownWidget {
        step: step.id.clone(),
        kind: step.kind.clone(),
    })?;

    let question = evaluator.render(&step_name(step, "question"), &step.question, context)?;
    let description =
        evaluator.render(&step_name(step, "description"), &step.description, context)?;

    let widget: Box<dyn Prompt> = match kind {
        WidgetKind::Input => Box::new(
            InputPrompt::text()
                .id(&step.id)
                .question(question)
                .description(description)
                .value(evaluator.render(&step_name(step, "value"), &step.value, context)?)
                .validator(build_validator(step)),
        ),
        WidgetKind::Confirm => {
            let yes = truthy(&step.default, false);
            let (hint, default) = if yes { ("Y/n", "y") } else { ("y/N", "n") };
            Box::new(
                InputPrompt::confirm()
                    .id(&step.id)
                    .question(question)
                    .description(hint)
                    .default_value(default),
            )
        }
        WidgetKind::Picker => Box::new(
            ListPrompt::picker()
                .id(&step.id)
                .question(question)
                .items(build_items(step, evaluator, context)?),
        ),
        WidgetKind::Choices => Box::new(
            ListPrompt::choices()
                .id(&step.id)
                .question(question)
                .items(build_items(step, evaluator, context)?),
        ),
    };

    Ok(widget)
}

fn build_items(
    step: &QuestionStep,
    evaluator: &Evaluator,
    context: &AnswerSet,
) -> std::result::Result<Vec<ListItem>, ExpressionError> {
    step.items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let name = step_name(step, &format!("items[{}]", index));
            let mut entry = ListItem::new(evaluator.render(&name, &item.text, context)?)
                .description(evaluator.render(&name, &item.description, context)?)
                .checked(evaluator.render_bool(&name, &item.checked, context, false)?);
            if let Some(data) = &item.data {
                entry = entry.payload(data.clone());
            }
            Ok(entry)
        })
        .collect()
}

fn build_validator(step: &QuestionStep) -> Validator {
    let mut rules = Vec::new();

    for entry in &step.rules {
        for (name, arg) in entry {
            match Rule::from_entry(name, arg) {
                Ok(Some(rule)) => rules.push(rule),
                Ok(None) => {}
                Err(reason) => {
                    warn!(step = %step.id, rule = %name, "{}, rule ignored", reason)
                }
            }
        }
    }

    Validator::new(rules)
}
