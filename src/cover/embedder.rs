//! Batch cover embedding.
//!
//! Writes one image into the front-cover slot of every target file. Files are
//! handled one at a time and independently: a file that can't be opened or
//! saved is recorded and skipped, the rest of the batch still runs.

use crate::tags::{CoverMime, TagContainer, TagError, TagHandle};
use std::path::{Path, PathBuf};

/// What happened to a single file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmbedOutcome {
    Embedded,
    OpenFailed(String),
    SaveFailed(String),
}

/// Outcome for one target file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileResult {
    pub path: PathBuf,
    pub outcome: EmbedOutcome,
}

/// Per-file results of a batch, in target order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmbedReport {
    pub files: Vec<FileResult>,
}

impl EmbedReport {
    /// Number of files that now carry the artwork
    pub fn embedded(&self) -> usize {
        self.files
            .iter()
            .filter(|f| f.outcome == EmbedOutcome::Embedded)
            .count()
    }

    pub fn total(&self) -> usize {
        self.files.len()
    }

    /// True when every file was embedded (and there was at least one)
    pub fn all_embedded(&self) -> bool {
        self.total() > 0 && self.embedded() == self.total()
    }

    /// Files that did not get the artwork
    pub fn failures(&self) -> impl Iterator<Item = &FileResult> {
        self.files
            .iter()
            .filter(|f| f.outcome != EmbedOutcome::Embedded)
    }
}

/// Embeds artwork into a list of files through a [`TagContainer`]
#[derive(Debug, Clone, Default)]
pub struct BatchEmbedder<T> {
    tags: T,
}

impl<T: TagContainer> BatchEmbedder<T> {
    pub fn new(tags: T) -> Self {
        Self { tags }
    }

    /// Embed `artwork` into each file in order.
    pub fn embed_all(&self, files: &[PathBuf], artwork: &[u8]) -> EmbedReport {
        let mime = CoverMime::sniff(artwork);
        let files = files
            .iter()
            .map(|path| FileResult {
                path: path.clone(),
                outcome: self.embed_one(path, artwork, mime),
            })
            .collect::<Vec<_>>();

        let report = EmbedReport { files };
        tracing::info!(
            embedded = report.embedded(),
            total = report.total(),
            "Embedded artwork"
        );
        report
    }

    fn embed_one(&self, path: &Path, artwork: &[u8], mime: CoverMime) -> EmbedOutcome {
        let mut handle = match self.tags.open(path) {
            Ok(handle) => handle,
            Err(e) => {
                tracing::warn!("{}", e);
                return EmbedOutcome::OpenFailed(reason(e));
            }
        };

        handle.set_cover_image(artwork, mime);
        match handle.save() {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "Saved artwork");
                EmbedOutcome::Embedded
            }
            Err(e) => {
                tracing::warn!("{}", e);
                EmbedOutcome::SaveFailed(reason(e))
            }
        }
    }
}

fn reason(error: TagError) -> String {
    match error {
        TagError::OpenFailed { reason, .. } | TagError::SaveFailed { reason, .. } => reason,
    }
}
