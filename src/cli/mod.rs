//! Command-line interface for coverpick.
//!
//! The picker is normally a window, but the arguments decide what it works on:
//! a single file, or a whole album directory with `-a`. `--pick` runs the same
//! pipeline without a window.

mod commands;
mod target;

pub use commands::{Cli, cmd_pick, run_command};
pub use target::{TargetError, validate_target};
