//! Stencil Core - Template-driven project and file scaffolding
//!
//! This library provides the core functionality for generating projects and
//! single files from versioned templates, parametrized by an interactive
//! question/answer session.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Layer 1: Core Operations** - expression evaluation, input widgets,
//!   manifests and the generation pipeline
//! - **Layer 2: Workflow Orchestration** - `ProductConfig`, `Settings`, the
//!   preset store and the preset resolver
//! - **Layer 3: CLI/TUI Interface** - Optional cliclack-framed sessions
//!   (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based session module
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use stencil_core::{Evaluator, Generator, PresetResolver, PresetStore, TargetKind, TemplateCatalog};
//! use stencil_core::prompt::TermConsole;
//!
//! let catalog = TemplateCatalog::discover("templates");
//! let mut store = PresetStore::open("/home/ada/.stencil.preset")?;
//! let evaluator = Evaluator::new();
//! let mut console = TermConsole::new();
//!
//! let template = PresetResolver::new(&catalog, &mut store, &evaluator)
//!     .resolve(TargetKind::Project, Some("@projects/cpp/console"), &mut console)?;
//! let result = Generator::new("demo", catalog.root()).render(&template)?;
//! println!("{}", result.summary());
//! ```

pub mod answers;
pub mod config;
pub mod error;
pub mod expression;
pub mod presets;
pub mod product;
pub mod prompt;
pub mod templates;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use answers::AnswerSet;
pub use config::{Overrides, Settings};
pub use error::{Error, PersistenceError, RenderError, Result};
pub use expression::{Capabilities, Evaluator, ExpressionError};
pub use presets::{PresetResolver, PresetStore, TemplateRef, UserPreset};
pub use product::ProductConfig;
pub use templates::{
    BuiltinTemplate, Generator, ManifestError, RenderResult, TargetKind, TemplateCatalog,
    TemplateManifest,
};

#[cfg(feature = "tui")]
pub use tui::{run_new, run_new_file, NewArgs, NewFileArgs};
