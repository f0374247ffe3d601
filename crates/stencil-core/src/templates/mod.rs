//! Template discovery, manifests and rendering
//!
//! This module provides:
//! - Template manifest types (`templates.yml`)
//! - Discovery of built-in templates under the asset root
//! - The generation pipeline (plan, pre-flight, render, write)
//! - Manifest format version checking

pub mod catalog;
pub mod generator;
pub mod manifest;
pub mod version;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

pub use catalog::{BuiltinTemplate, TemplateCatalog};
pub use generator::{is_valid_dir_name, Generator, RenderItem, RenderResult};
pub use manifest::{FileRule, ManifestError, TemplateManifest};
pub use version::check_compatibility;

/// File manifest inside every template directory
pub const TEMPLATE_FILE: &str = "templates.yml";

/// Optional question manifest inside a template directory
pub const PROMPT_FILE: &str = "prompt.yml";

/// Prefix marking a rule input relative to the asset root
pub const ROOT_PREFIX: &str = "@/";

/// What a template produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TargetKind {
    /// A new directory named after the output base name
    Project,
    /// Files placed directly in the target directory
    File,
}

impl TargetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetKind::Project => "project",
            TargetKind::File => "file",
        }
    }

    /// Anything other than `project` is treated as a file template
    pub fn from_name(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("project") {
            TargetKind::Project
        } else {
            TargetKind::File
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for TargetKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TargetKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(TargetKind::from_name(&raw))
    }
}
