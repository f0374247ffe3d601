//! Presets: reusable bindings of a template plus its answers
//!
//! A [`TemplateRef`] is what the generator consumes. It is either a built-in
//! template (answers recomputed from its question manifest on demand) or a
//! [`UserPreset`] carrying frozen answers.

pub mod resolver;
pub mod store;

use crate::answers::AnswerSet;
use crate::templates::{BuiltinTemplate, ManifestError, TargetKind};
use serde::{Deserialize, Serialize};

pub use resolver::PresetResolver;
pub use store::PresetStore;

/// A named set of answers for one template directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPreset {
    pub name: String,

    #[serde(rename = "type")]
    pub kind: TargetKind,

    /// Template directory relative to the asset root
    pub template: String,

    #[serde(default)]
    pub options: AnswerSet,
}

/// A template reference the generator can render
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateRef {
    Builtin(BuiltinTemplate),
    Preset(UserPreset),
}

impl TemplateRef {
    /// Name shown in selectors and listings
    pub fn name(&self) -> String {
        match self {
            TemplateRef::Builtin(t) => t.display_name(),
            TemplateRef::Preset(p) => p.name.clone(),
        }
    }

    pub fn kind(&self) -> TargetKind {
        match self {
            TemplateRef::Builtin(t) => t.kind(),
            TemplateRef::Preset(p) => p.kind,
        }
    }

    pub fn template_dir(&self) -> &str {
        match self {
            TemplateRef::Builtin(t) => t.dir(),
            TemplateRef::Preset(p) => &p.template,
        }
    }

    /// Secondary text shown next to the name in selectors
    pub fn description(&self) -> String {
        match self {
            TemplateRef::Builtin(_) => String::new(),
            TemplateRef::Preset(p) => format!("@{}", p.template),
        }
    }

    pub fn answers(&self) -> Result<AnswerSet, ManifestError> {
        match self {
            TemplateRef::Builtin(t) => t.default_answers(),
            TemplateRef::Preset(p) => Ok(p.options.clone()),
        }
    }

    /// Snapshot as a preset with the answers resolved
    pub fn to_preset(&self) -> Result<UserPreset, ManifestError> {
        match self {
            TemplateRef::Builtin(t) => Ok(UserPreset {
                name: t.display_name(),
                kind: t.kind(),
                template: t.dir().to_string(),
                options: t.default_answers()?,
            }),
            TemplateRef::Preset(p) => Ok(p.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_preset_yaml_shape() {
        let yaml = r#"
name: mine
type: project
template: projects/cpp/console
options:
  useTests: true
  std: 17
"#;
        let preset: UserPreset = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(preset.kind, TargetKind::Project);
        assert_eq!(preset.options["std"], json!(17));

        let back = serde_yaml::to_string(&preset).unwrap();
        assert!(back.contains("type: project"));
        assert!(back.contains("template: projects/cpp/console"));
    }

    #[test]
    fn test_preset_ref_accessors() {
        let preset = UserPreset {
            name: "mine".into(),
            kind: TargetKind::File,
            template: "files/cpp/class".into(),
            options: AnswerSet::new(),
        };
        let r = TemplateRef::Preset(preset.clone());
        assert_eq!(r.name(), "mine");
        assert_eq!(r.kind(), TargetKind::File);
        assert_eq!(r.template_dir(), "files/cpp/class");
        assert_eq!(r.description(), "@files/cpp/class");
        assert_eq!(r.to_preset().unwrap(), preset);
    }
}
