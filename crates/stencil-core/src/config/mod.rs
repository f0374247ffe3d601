//! Effective settings for one invocation

pub mod settings;

pub use settings::{Overrides, Settings};
