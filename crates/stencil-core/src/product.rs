//! Product configuration trait for CLI binaries
//!
//! This trait defines the interface a binary implements to configure where
//! templates and presets live and how the session is presented.

use crate::templates::TargetKind;
use std::path::{Path, PathBuf};

/// Configuration trait for a scaffolding product
///
/// Each binary implements this trait to define:
/// - Product identity (name, display name)
/// - Template asset root and its override variable
/// - User preset file name
/// - Post-generation instructions
pub trait ProductConfig: Clone + Send + Sync + 'static {
    /// Internal product name (used for CLI command, env vars)
    fn name(&self) -> &'static str;

    /// Human-readable display name
    fn display_name(&self) -> &'static str;

    /// Environment variable name for overriding the template asset root
    fn template_dir_env(&self) -> &'static str;

    /// Template asset root used when neither flag nor env var is set
    fn default_template_dir(&self) -> PathBuf;

    /// File name of the user preset store inside the home directory
    fn preset_file_name(&self) -> &'static str;

    /// Generate the "next steps" instructions after generation
    fn next_steps(&self, output: &Path, kind: TargetKind) -> Vec<String>;
}
