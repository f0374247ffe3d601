//! Template manifest types and parsing

use super::version;
use super::TargetKind;
use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::Value as YamlValue;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failure to load or interpret a manifest
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("duplicate step id '{id}' in {path}")]
    DuplicateStep { path: PathBuf, id: String },

    #[error("invalid type, given = '{kind}' (step '{step}')")]
    UnknownWidget { step: String, kind: String },
}

/// Read and parse a YAML manifest
pub(crate) fn read_yaml<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, ManifestError> {
    let content = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    serde_yaml::from_str(&content).map_err(|source| ManifestError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Accept any YAML scalar where an expression string is expected
///
/// `when: true` and `checked: yes` are common in hand-written manifests; they
/// are kept as their textual form and evaluated like any other expression.
pub(crate) fn expr_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match YamlValue::deserialize(deserializer)? {
        YamlValue::Null => Ok(String::new()),
        YamlValue::String(s) => Ok(s),
        YamlValue::Bool(b) => Ok(b.to_string()),
        YamlValue::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a string expression, found {:?}",
            other
        ))),
    }
}

/// A single file rule (templates.yml `files` entry)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileRule {
    /// Source path, relative to the template directory or `@/`-prefixed
    /// for the asset root
    #[serde(rename = "in")]
    pub input: String,

    /// Output name expression; empty keeps the input's base name
    #[serde(rename = "out", default, deserialize_with = "expr_string")]
    pub output: String,

    /// Visibility expression; empty means always
    #[serde(default, deserialize_with = "expr_string")]
    pub when: String,

    /// Copy verbatim instead of rendering
    #[serde(default)]
    pub bypass: bool,
}

/// Per-template file manifest (`<template>/templates.yml`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateManifest {
    /// Manifest format version
    #[serde(default, deserialize_with = "expr_string")]
    pub version: String,

    /// Whether the template produces a project directory or a single file
    #[serde(rename = "type")]
    pub kind: TargetKind,

    /// Ordered file rules
    #[serde(default)]
    pub files: Vec<FileRule>,
}

impl TemplateManifest {
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        tracing::debug!(file = %path.display(), "reading template definition");
        let manifest: Self = read_yaml(path)?;
        version::warn_if_newer(path, &manifest.version);
        Ok(manifest)
    }
}
