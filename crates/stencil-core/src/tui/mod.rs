//! Session framing using cliclack (Charm-style inline output)
//!
//! This module is optional and only available when the `tui` feature is enabled.

#[cfg(feature = "tui")]
mod session;

#[cfg(feature = "tui")]
pub use session::{run_new, run_new_file, NewArgs, NewFileArgs};
