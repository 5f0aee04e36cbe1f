//! Picker session state.
//!
//! The session is a plain state machine: it holds the candidates of the current
//! search, the generation counter used to drop stale async results, and the
//! status line. It never does I/O itself; the UI (or the headless CLI) runs the
//! async work and feeds the results back in.
//!
//! ```text
//! Idle -> Searching -> Displaying -> (Selecting <-> Displaying)
//!      -> Embedding -> Reporting -> (AutoClosing | Idle)
//! ```

pub mod pipeline;

pub use pipeline::{Pipeline, PipelineError};

use crate::catalog::{Candidate, CatalogError};
use crate::cover::EmbedReport;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Shown when a selection is made with nothing to embed into
pub const STATUS_NO_FILES: &str = "No files found";

/// Shown when the full-resolution download fails
pub const STATUS_DOWNLOAD_FAILED: &str = "Could not download artwork";

/// Shown when the background embedding task died
pub const STATUS_EMBED_FAILED: &str = "Could not save artwork";

/// Where the session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for a query
    Idle,
    /// A search is in flight
    Searching,
    /// Candidates are on screen
    Displaying,
    /// A candidate was clicked and is being checked against the targets
    Selecting,
    /// Download and embedding are running
    Embedding,
    /// Embedding finished, summary being produced
    Reporting,
    /// Everything saved, the window closes after the delay
    AutoClosing,
}

/// The files a session embeds into.
///
/// Built once at startup and never changed. In album mode it also knows the
/// directory whose `folder.jpg` gets replaced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetFileSet {
    files: Vec<PathBuf>,
    album_dir: Option<PathBuf>,
}

impl TargetFileSet {
    /// A single file
    pub fn single(path: impl Into<PathBuf>) -> Self {
        Self {
            files: vec![path.into()],
            album_dir: None,
        }
    }

    /// Every `.mp3` under `dir`, recursively, in path order.
    pub fn album(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let mut files: Vec<PathBuf> = walkdir::WalkDir::new(&dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry: {}", e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file() && is_mp3(entry.path()))
            .map(walkdir::DirEntry::into_path)
            .collect();
        files.sort();

        tracing::info!(dir = %dir.display(), count = files.len(), "Collected album files");
        Self {
            files,
            album_dir: Some(dir),
        }
    }

    /// Album mode with an explicit file list
    pub fn with_files(dir: impl Into<PathBuf>, files: Vec<PathBuf>) -> Self {
        Self {
            files,
            album_dir: Some(dir.into()),
        }
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Directory holding the shared `folder.jpg`, in album mode only
    pub fn album_dir(&self) -> Option<&Path> {
        self.album_dir.as_deref()
    }

    pub fn is_album(&self) -> bool {
        self.album_dir.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// File the default query is read from
    pub fn first(&self) -> Option<&Path> {
        self.files.first().map(PathBuf::as_path)
    }
}

fn is_mp3(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("mp3"))
}

/// Status line after an embedding run
pub fn summary(report: &EmbedReport) -> String {
    let mut status = format!("Saved {}/{} files!", report.embedded(), report.total());
    if report.all_embedded() {
        status.push_str(" Closing...");
    }
    status
}

/// State of one picker session
#[derive(Debug)]
pub struct Session {
    phase: Phase,
    generation: u64,
    candidates: Vec<Candidate>,
    targets: TargetFileSet,
    /// Query field contents and result messages, shown in the same place
    status: String,
    autoclose: Duration,
}

impl Session {
    pub fn new(targets: TargetFileSet, initial_query: impl Into<String>, autoclose: Duration) -> Self {
        Self {
            phase: Phase::Idle,
            generation: 0,
            candidates: Vec::new(),
            targets,
            status: initial_query.into(),
            autoclose,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn targets(&self) -> &TargetFileSet {
        &self.targets
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// The user edited the query field
    pub fn set_status(&mut self, text: impl Into<String>) {
        self.status = text.into();
    }

    /// Whether async results tagged with `generation` still apply
    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }

    /// Whether clicking a candidate does anything right now
    pub fn accepts_selection(&self) -> bool {
        matches!(self.phase, Phase::Displaying | Phase::Idle) && !self.candidates.is_empty()
    }

    /// Start a new search. Returns the generation to tag its results with,
    /// or `None` for a blank query (or while an embedding is running).
    pub fn begin_search(&mut self, query: &str) -> Option<u64> {
        let query = query.trim();
        if query.is_empty() {
            tracing::debug!("Ignoring blank query");
            return None;
        }
        if matches!(self.phase, Phase::Embedding | Phase::AutoClosing) {
            tracing::debug!(phase = ?self.phase, "Ignoring search while busy");
            return None;
        }

        self.generation += 1;
        self.candidates.clear();
        self.status = query.to_string();
        self.phase = Phase::Searching;
        tracing::info!(generation = self.generation, query, "Searching");
        Some(self.generation)
    }

    /// Apply search results. Stale generations are dropped and return `false`.
    pub fn finish_search(
        &mut self,
        generation: u64,
        result: Result<Vec<Candidate>, CatalogError>,
    ) -> bool {
        if !self.is_current(generation) || self.phase != Phase::Searching {
            tracing::debug!(generation, current = self.generation, "Dropping stale search results");
            return false;
        }

        self.candidates = match result {
            Ok(candidates) => candidates,
            Err(e) => {
                tracing::warn!("Search failed: {}", e);
                Vec::new()
            }
        };
        self.phase = Phase::Displaying;
        tracing::info!(count = self.candidates.len(), "Showing candidates");
        true
    }

    /// Pick a candidate. Returns it when the embedding pipeline should run.
    pub fn select(&mut self, index: usize) -> Option<Candidate> {
        if !self.accepts_selection() {
            return None;
        }
        let candidate = self.candidates.get(index)?.clone();

        self.phase = Phase::Selecting;
        if self.targets.is_empty() {
            self.status = STATUS_NO_FILES.to_string();
            self.phase = Phase::Displaying;
            return None;
        }

        tracing::info!(artist = %candidate.artist, title = %candidate.title, "Selected");
        self.phase = Phase::Embedding;
        Some(candidate)
    }

    /// Record how the pipeline went. Returns the autoclose delay when every
    /// file was saved.
    pub fn finish_embedding(
        &mut self,
        result: Result<EmbedReport, PipelineError>,
    ) -> Option<Duration> {
        if self.phase != Phase::Embedding {
            tracing::warn!(phase = ?self.phase, "Embedding result without a running embedding");
            return None;
        }

        let report = match result {
            Ok(report) => report,
            Err(e) => {
                tracing::error!("{}", e);
                self.status = match e {
                    PipelineError::DownloadFailed(_) => STATUS_DOWNLOAD_FAILED,
                    PipelineError::TaskJoin(_) => STATUS_EMBED_FAILED,
                }
                .to_string();
                self.phase = Phase::Displaying;
                return None;
            }
        };

        self.phase = Phase::Reporting;
        self.status = summary(&report);
        for failure in report.failures() {
            tracing::warn!(path = %failure.path.display(), outcome = ?failure.outcome, "Not embedded");
        }

        if report.all_embedded() {
            self.phase = Phase::AutoClosing;
            Some(self.autoclose)
        } else {
            self.phase = Phase::Idle;
            None
        }
    }
}
