//! coverpick - pick album art from the iTunes Store and embed it.
//!
//! Searches for a query (by default the album and artist of the first file),
//! shows the results as a grid of thumbnails and, once one is clicked, embeds
//! the full-resolution artwork into one file or a whole album directory.

// Hide console window on Windows when running as GUI
// CLI commands will attach to the parent console or allocate one
#![cfg_attr(target_os = "windows", windows_subsystem = "windows")]

pub mod catalog;
pub mod cli;
pub mod config;
pub mod cover;
pub mod error;
pub mod grid;
pub mod session;
pub mod tags;
#[cfg(test)]
pub mod test_utils;
pub mod ui;

use clap::Parser;
use iced::{Size, Theme, application, window};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use error::ResultExt;
use ui::CoverPick;

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Headless runs print their status; attach to the console for output
    #[cfg(target_os = "windows")]
    if args.pick.is_some() {
        attach_console();
    }

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("coverpick=info")))
        .init();

    let config = match &args.config {
        Some(path) => config::load_from(path),
        None => config::load(),
    };

    let targets = match cli::validate_target(&args.filename, args.album) {
        Ok(targets) => targets,
        Err(e) => {
            #[cfg(target_os = "windows")]
            attach_console();
            let err = error::Error::from(e);
            eprintln!("{}", err);
            std::process::exit(err.exit_code().unwrap_or(1));
        }
    };
    if targets.is_album() {
        tracing::info!("Album mode: {} files", targets.len());
    }

    let query = match &args.query {
        Some(query) => query.trim().to_string(),
        None => targets.first().map(default_query).unwrap_or_default(),
    };
    tracing::info!("Query={}", query);

    // Thumbnail fetches run here; iced's own executor runs the UI tasks
    let runtime = tokio::runtime::Runtime::new().with_context("Failed to start async runtime")?;

    if cli::run_command(&args, &runtime, &config, &targets, &query)? {
        return Ok(());
    }

    let handle = runtime.handle().clone();
    application(CoverPick::title, CoverPick::update, CoverPick::view)
        .subscription(CoverPick::subscription)
        .theme(|_| Theme::Dark)
        .window(window::Settings {
            size: Size::new(
                config.display.viewport_width as f32,
                config.display.viewport_height as f32,
            ),
            ..Default::default()
        })
        .run_with(move || CoverPick::new(&config, targets, query, handle))
        .map_err(|e| anyhow::anyhow!("GUI Error: {}", e))
}

/// Query from the first file's tags; empty if they can't be read
fn default_query(path: &std::path::Path) -> String {
    match tags::derive_query(path).with_context(format!("Reading tags of {}", path.display())) {
        Ok(query) => query,
        Err(e) => {
            tracing::warn!("Could not read tags: {}", e);
            String::new()
        }
    }
}

/// Attach to parent console on Windows for CLI output.
/// This is needed because windows_subsystem = "windows" detaches from console.
#[cfg(target_os = "windows")]
fn attach_console() {
    use windows_sys::Win32::System::Console::{ATTACH_PARENT_PROCESS, AttachConsole};
    // SAFETY: no preconditions; failure just means no console output
    unsafe {
        let _ = AttachConsole(ATTACH_PARENT_PROCESS);
    }
}
