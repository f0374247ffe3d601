//! Discovery of built-in templates under the asset root

use super::manifest::{ManifestError, TemplateManifest};
use super::{TargetKind, PROMPT_FILE, TEMPLATE_FILE};
use crate::answers::AnswerSet;
use crate::prompt::QuestionManifest;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// A template directory shipped under the asset root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltinTemplate {
    kind: TargetKind,
    dir: String,
    path: PathBuf,
}

impl BuiltinTemplate {
    pub fn kind(&self) -> TargetKind {
        self.kind
    }

    /// Path relative to the asset root with `/` separators; its public
    /// name is `@<dir>`
    pub fn dir(&self) -> &str {
        &self.dir
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn display_name(&self) -> String {
        format!("[Default] @{}", self.dir)
    }

    /// Question manifest of this template; absent means nothing to ask
    pub fn questions(&self) -> Result<QuestionManifest, ManifestError> {
        let path = self.path.join(PROMPT_FILE);
        if !path.is_file() {
            return Ok(QuestionManifest::default());
        }
        QuestionManifest::load(&path)
    }

    /// Answers used when this template is chosen without configuration
    ///
    /// Recomputed from the question manifest on every call.
    pub fn default_answers(&self) -> Result<AnswerSet, ManifestError> {
        Ok(self.questions()?.defaults())
    }
}

/// Every built-in template found under one asset root
#[derive(Debug, Clone)]
pub struct TemplateCatalog {
    root: PathBuf,
    templates: Vec<BuiltinTemplate>,
}

impl TemplateCatalog {
    /// Walk `root` and register every directory holding a readable
    /// `templates.yml`
    ///
    /// A missing root yields an empty catalog. Unreadable manifests are
    /// skipped so one broken template does not hide the others.
    pub fn discover(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let mut templates = Vec::new();

        for entry in WalkDir::new(&root)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_dir())
        {
            let manifest_path = entry.path().join(TEMPLATE_FILE);
            if !manifest_path.is_file() {
                continue;
            }

            let manifest = match TemplateManifest::load(&manifest_path) {
                Ok(m) => m,
                Err(e) => {
                    debug!(error = %e, "skipping template");
                    continue;
                }
            };

            let Ok(relative) = entry.path().strip_prefix(&root) else {
                continue;
            };
            let dir = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");

            templates.push(BuiltinTemplate {
                kind: manifest.kind,
                dir,
                path: entry.path().to_path_buf(),
            });
        }

        debug!(root = %root.display(), count = templates.len(), "templates discovered");
        Self { root, templates }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn all(&self) -> &[BuiltinTemplate] {
        &self.templates
    }

    pub fn of_kind(&self, kind: TargetKind) -> impl Iterator<Item = &BuiltinTemplate> {
        self.templates.iter().filter(move |t| t.kind == kind)
    }

    /// Built-in of `kind` whose directory is exactly `dir`
    pub fn find(&self, kind: TargetKind, dir: &str) -> Option<&BuiltinTemplate> {
        self.of_kind(kind).find(|t| t.dir == dir)
    }

    /// Built-in whose directory is exactly `dir`, of any kind
    pub fn find_any(&self, dir: &str) -> Option<&BuiltinTemplate> {
        self.templates.iter().find(|t| t.dir == dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;

    fn write_template(root: &Path, dir: &str, kind: &str, prompt: Option<&str>) {
        let path = root.join(dir);
        fs::create_dir_all(&path).unwrap();
        fs::write(
            path.join(TEMPLATE_FILE),
            format!("version: \"1\"\ntype: {}\nfiles: []\n", kind),
        )
        .unwrap();
        if let Some(prompt) = prompt {
            fs::write(path.join(PROMPT_FILE), prompt).unwrap();
        }
    }

    #[test]
    fn test_discover_by_kind() {
        let tmp = tempfile::tempdir().unwrap();
        write_template(tmp.path(), "projects/cpp/console", "project", None);
        write_template(tmp.path(), "projects/cpp/widgets", "project", None);
        write_template(tmp.path(), "files/cpp/class", "file", None);
        fs::create_dir_all(tmp.path().join("shared")).unwrap();

        let catalog = TemplateCatalog::discover(tmp.path());
        let projects: Vec<_> = catalog
            .of_kind(TargetKind::Project)
            .map(|t| t.dir())
            .collect();
        assert_eq!(projects, vec!["projects/cpp/console", "projects/cpp/widgets"]);
        assert_eq!(catalog.of_kind(TargetKind::File).count(), 1);
        assert_eq!(catalog.all().len(), 3);
    }

    #[test]
    fn test_find_respects_kind() {
        let tmp = tempfile::tempdir().unwrap();
        write_template(tmp.path(), "files/cpp/class", "file", None);

        let catalog = TemplateCatalog::discover(tmp.path());
        assert!(catalog.find(TargetKind::File, "files/cpp/class").is_some());
        assert!(catalog.find(TargetKind::Project, "files/cpp/class").is_none());
        assert!(catalog.find(TargetKind::File, "widgets").is_none());
        assert!(catalog.find_any("files/cpp/class").is_some());
    }

    #[test]
    fn test_display_name() {
        let tmp = tempfile::tempdir().unwrap();
        write_template(tmp.path(), "projects/app", "project", None);
        let catalog = TemplateCatalog::discover(tmp.path());
        assert_eq!(catalog.all()[0].display_name(), "[Default] @projects/app");
    }

    #[test]
    fn test_default_answers() {
        let tmp = tempfile::tempdir().unwrap();
        write_template(
            tmp.path(),
            "projects/app",
            "project",
            Some("steps:\n  - id: useTests\n    type: confirm\n    default: true\nconsts:\n  - std: 17\n"),
        );
        write_template(tmp.path(), "projects/bare", "project", None);

        let catalog = TemplateCatalog::discover(tmp.path());
        let app = catalog.find(TargetKind::Project, "projects/app").unwrap();
        let answers = app.default_answers().unwrap();
        assert_eq!(answers["useTests"], json!(true));
        assert_eq!(answers["std"], json!(17));
        assert_eq!(answers, app.default_answers().unwrap());

        let bare = catalog.find(TargetKind::Project, "projects/bare").unwrap();
        assert!(bare.default_answers().unwrap().is_empty());
    }

    #[test]
    fn test_missing_root_is_empty() {
        let catalog = TemplateCatalog::discover("/nonexistent/stencil/templates");
        assert!(catalog.all().is_empty());
    }
}
