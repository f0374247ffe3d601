//! Template generation pipeline
//!
//! [`Generator::plan`] resolves the file rules of a template into concrete
//! input/output pairs and runs the pre-flight checks. [`Generator::render`]
//! does the same and then writes every file. Nothing is read from or written
//! to an output location before pre-flight has passed for the whole list,
//! and every file is rendered in memory before the first one is written.

use super::manifest::{FileRule, TemplateManifest};
use super::{TargetKind, ROOT_PREFIX, TEMPLATE_FILE};
use crate::answers::AnswerSet;
use crate::error::RenderError;
use crate::expression::Evaluator;
use crate::presets::TemplateRef;
use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// One resolved file of a render
#[derive(Debug, Clone, PartialEq)]
pub struct RenderItem {
    pub rule: FileRule,
    /// Absolute input path
    pub input: PathBuf,
    /// Output path including the target root
    pub output: PathBuf,
}

/// Ordered list of resolved files
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderResult {
    items: Vec<RenderItem>,
    asset_root: PathBuf,
    target_root: PathBuf,
}

impl RenderResult {
    pub fn items(&self) -> &[RenderItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Output paths relative to the target root
    pub fn outputs(&self) -> Vec<PathBuf> {
        self.items
            .iter()
            .map(|item| relative_to(&item.output, &self.target_root))
            .collect()
    }

    /// Aligned `input -> output` lines, one per file
    pub fn summary(&self) -> String {
        let rows: Vec<(String, String)> = self
            .items
            .iter()
            .map(|item| {
                (
                    relative_to(&item.input, &self.asset_root)
                        .display()
                        .to_string(),
                    relative_to(&item.output, &self.target_root)
                        .display()
                        .to_string(),
                )
            })
            .collect();

        let width = rows.iter().map(|(input, _)| input.len()).max().unwrap_or(0);

        rows.iter()
            .map(|(input, output)| format!("{:<width$} -> {}", input, output, width = width))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn relative_to(path: &Path, base: &Path) -> PathBuf {
    path.strip_prefix(base).unwrap_or(path).to_path_buf()
}

/// Renders one template into a target directory
pub struct Generator {
    name: String,
    asset_root: PathBuf,
    target_root: PathBuf,
    evaluator: Evaluator,
}

impl Generator {
    /// `name` is the output base name: the project directory for project
    /// templates, available to every expression as `name`
    pub fn new(name: impl Into<String>, asset_root: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            asset_root: asset_root.into(),
            target_root: PathBuf::from("."),
            evaluator: Evaluator::new(),
        }
    }

    /// Directory outputs are placed under (default: current directory)
    pub fn target_root(mut self, dir: impl Into<PathBuf>) -> Self {
        self.target_root = dir.into();
        self
    }

    pub fn evaluator(mut self, evaluator: Evaluator) -> Self {
        self.evaluator = evaluator;
        self
    }

    /// Resolve and check every file without writing anything
    pub fn plan(&self, template: &TemplateRef) -> Result<RenderResult, RenderError> {
        let (result, _) = self.prepare(template)?;
        Ok(result)
    }

    /// Resolve, check, render every file in memory, then write them all
    pub fn render(&self, template: &TemplateRef) -> Result<RenderResult, RenderError> {
        let (result, data) = self.prepare(template)?;

        let contents = result
            .items
            .iter()
            .map(|item| self.produce(item, &result.target_root, &data))
            .collect::<Result<Vec<_>, _>>()?;

        for (item, bytes) in result.items.iter().zip(contents) {
            write_file(&item.output, &bytes)?;
        }

        Ok(result)
    }

    fn prepare(&self, template: &TemplateRef) -> Result<(RenderResult, AnswerSet), RenderError> {
        let template_dir = self.asset_root.join(template.template_dir());
        let manifest_path = template_dir.join(TEMPLATE_FILE);
        if !manifest_path.is_file() {
            return Err(RenderError::ManifestNotFound(template_dir));
        }

        let manifest = TemplateManifest::load(&manifest_path)?;

        let mut data = template.answers()?;
        data.insert("name".to_string(), Value::String(self.name.clone()));

        let output_dir = match template.kind() {
            TargetKind::Project => self.target_root.join(&self.name),
            TargetKind::File => self.target_root.clone(),
        };

        let mut items = Vec::new();
        for rule in &manifest.files {
            if !self.evaluator.render_bool(&rule.input, &rule.when, &data, true)? {
                debug!(input = %rule.input, "rule skipped");
                continue;
            }

            items.push(RenderItem {
                rule: rule.clone(),
                input: self.input_path(&template_dir, &rule.input),
                output: output_dir.join(self.output_name(rule, &data)?),
            });
        }

        preflight(&items)?;

        let result = RenderResult {
            items,
            asset_root: self.asset_root.clone(),
            target_root: self.target_root.clone(),
        };
        Ok((result, data))
    }

    fn input_path(&self, template_dir: &Path, input: &str) -> PathBuf {
        match input.strip_prefix(ROOT_PREFIX) {
            Some(rest) => self.asset_root.join(rest),
            None => template_dir.join(input),
        }
    }

    /// Output path relative to the output directory
    fn output_name(&self, rule: &FileRule, data: &AnswerSet) -> Result<PathBuf, RenderError> {
        let rendered = if rule.output.is_empty() {
            let base = rule.input.rsplit('/').next().unwrap_or(&rule.input);
            base.to_string()
        } else {
            self.evaluator.render(&rule.input, &rule.output, data)?
        };

        contained(&rendered).ok_or(RenderError::OutputOutside(rendered))
    }

    /// Final bytes of one item; nothing is written here
    fn produce(
        &self,
        item: &RenderItem,
        target_root: &Path,
        data: &AnswerSet,
    ) -> Result<Vec<u8>, RenderError> {
        let bytes = fs::read(&item.input).map_err(|source| RenderError::Io {
            path: item.input.clone(),
            source,
        })?;

        let contents = if item.rule.bypass {
            bytes
        } else {
            let text = String::from_utf8(bytes).map_err(|e| RenderError::Io {
                path: item.input.clone(),
                source: io::Error::new(io::ErrorKind::InvalidData, e),
            })?;

            let file_name = relative_to(&item.output, target_root);
            let mut file_data = data.clone();
            file_data.insert(
                "fileName".to_string(),
                Value::String(file_name.to_string_lossy().replace('\\', "/")),
            );

            let rendered =
                self.evaluator
                    .render(&file_name.to_string_lossy(), &text, &file_data)?;
            rendered
                .trim_start_matches([' ', '\t', '\r', '\n'])
                .as_bytes()
                .to_vec()
        };

        Ok(contents)
    }
}

fn write_file(path: &Path, contents: &[u8]) -> Result<(), RenderError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| RenderError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    fs::write(path, contents).map_err(|source| RenderError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(file = %path.display(), "file written");
    Ok(())
}

/// Rendered `out` as a relative path below the output directory
///
/// Root and drive prefixes are dropped so `/a/b` becomes `a/b`. Any `..`
/// component, or a path with nothing left, yields `None`.
fn contained(rendered: &str) -> Option<PathBuf> {
    let mut path = PathBuf::new();
    for component in Path::new(rendered).components() {
        match component {
            Component::Normal(part) => path.push(part),
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
            Component::ParentDir => return None,
        }
    }

    (!path.as_os_str().is_empty()).then_some(path)
}

/// Whether `name` can be used as a single new directory name
pub fn is_valid_dir_name(name: &str) -> bool {
    const RESERVED: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

    !name.trim().is_empty()
        && name != "."
        && name != ".."
        && !name.chars().any(|c| c.is_control() || RESERVED.contains(&c))
}

/// Checks over the complete list; any failure means nothing gets written
fn preflight(items: &[RenderItem]) -> Result<(), RenderError> {
    let mut seen = HashSet::new();
    for item in items {
        if !seen.insert(&item.output) {
            return Err(RenderError::OutputConflict(item.output.clone()));
        }
    }

    for item in items {
        if !item.input.is_file() {
            return Err(RenderError::InputMissing(item.input.clone()));
        }
        if item.output.exists() {
            return Err(RenderError::OutputConflict(item.output.clone()));
        }
    }

    Ok(())
}
