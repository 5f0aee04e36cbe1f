//! CLI argument definitions and dispatch.
//!
//! There is one command: open the picker for a path. `--pick` swaps the window
//! for a headless run (`pick`).

mod pick;

use clap::Parser;
use std::path::PathBuf;
use tokio::runtime::Runtime;

use crate::config::Config;
use crate::session::TargetFileSet;

pub use pick::cmd_pick;

/// Add cover art from the iTunes Store to an album or a single file
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Album mode: store the cover in every .mp3 in this directory and replace folder.jpg
    #[arg(short, long)]
    pub album: bool,

    /// Search with this query instead of the album/artist tags of the first file
    #[arg(short, long)]
    pub query: Option<String>,

    /// Don't open a window: embed the N-th search result (0-based) and exit
    #[arg(long, value_name = "N")]
    pub pick: Option<usize>,

    /// Config file (defaults to the OS config directory)
    #[arg(long, env = "COVERPICK_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// An mp3 file, or a folder of mp3 files in album mode
    pub filename: PathBuf,
}

/// Run a headless command if one was requested.
///
/// Returns `Ok(true)` if a command was run, `Ok(false)` if the picker window
/// should open instead.
pub fn run_command(
    cli: &Cli,
    rt: &Runtime,
    config: &Config,
    targets: &TargetFileSet,
    query: &str,
) -> anyhow::Result<bool> {
    match cli.pick {
        Some(index) => {
            cmd_pick(rt, config, targets.clone(), query, index)?;
            Ok(true)
        }
        None => Ok(false),
    }
}
