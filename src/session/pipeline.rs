//! The selection pipeline: download, folder art, embed.
//!
//! Runs off the UI thread. Filesystem and tag work is blocking, so it goes
//! through `spawn_blocking`; only the download is truly async.

use super::TargetFileSet;
use crate::catalog::Candidate;
use crate::cover::{
    ArtworkFs, ArtworkSource, BatchEmbedder, EmbedReport, FetchError, FolderArtworkReplacer,
    LocalFs, download_url,
};
use crate::tags::TagContainer;
use std::sync::Arc;

/// Errors that stop the pipeline before any file is touched
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PipelineError {
    #[error("Artwork download failed: {0}")]
    DownloadFailed(String),

    #[error("Background task failed: {0}")]
    TaskJoin(String),
}

impl From<FetchError> for PipelineError {
    fn from(e: FetchError) -> Self {
        match e {
            FetchError::DownloadFailed(reason) => PipelineError::DownloadFailed(reason),
        }
    }
}

impl From<tokio::task::JoinError> for PipelineError {
    fn from(e: tokio::task::JoinError) -> Self {
        PipelineError::TaskJoin(e.to_string())
    }
}

/// Everything needed to turn a selected candidate into embedded artwork
pub struct Pipeline<T, F = LocalFs> {
    source: Arc<dyn ArtworkSource>,
    embedder: BatchEmbedder<T>,
    replacer: FolderArtworkReplacer<F>,
    display_size: u32,
    download_size: u32,
}

impl<T: Clone, F: Clone> Clone for Pipeline<T, F> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            embedder: self.embedder.clone(),
            replacer: self.replacer.clone(),
            display_size: self.display_size,
            download_size: self.download_size,
        }
    }
}

impl<T> Pipeline<T, LocalFs>
where
    T: TagContainer + Clone + 'static,
{
    pub fn new(source: Arc<dyn ArtworkSource>, tags: T, display_size: u32, download_size: u32) -> Self {
        Self::with_fs(source, tags, LocalFs, display_size, download_size)
    }
}

impl<T, F> Pipeline<T, F>
where
    T: TagContainer + Clone + 'static,
    F: ArtworkFs + Clone + 'static,
{
    pub fn with_fs(
        source: Arc<dyn ArtworkSource>,
        tags: T,
        fs: F,
        display_size: u32,
        download_size: u32,
    ) -> Self {
        Self {
            source,
            embedder: BatchEmbedder::new(tags),
            replacer: FolderArtworkReplacer::new(fs),
            display_size,
            download_size,
        }
    }

    /// Download the candidate's full-resolution artwork and embed it into
    /// every target. In album mode the shared `folder.jpg` is replaced first
    /// and whatever it ends up holding is what gets embedded.
    pub async fn apply_selection(
        &self,
        candidate: &Candidate,
        targets: &TargetFileSet,
    ) -> Result<EmbedReport, PipelineError> {
        let url = download_url(&candidate.thumbnail_url, self.display_size, self.download_size);
        tracing::info!(%url, "Downloading artwork");
        let downloaded = self.source.fetch(&url).await?;
        if downloaded.is_empty() {
            return Err(PipelineError::DownloadFailed("empty response".to_string()));
        }

        let artwork = match targets.album_dir() {
            Some(dir) => {
                let replacer = self.replacer.clone();
                let dir = dir.to_path_buf();
                tokio::task::spawn_blocking(move || {
                    let outcome = replacer.replace(&dir, &downloaded);
                    tracing::debug!(?outcome, "Folder art replacement finished");
                    replacer.final_artwork(&dir, downloaded)
                })
                .await?
            }
            None => downloaded,
        };

        let embedder = self.embedder.clone();
        let files = targets.files().to_vec();
        let report = tokio::task::spawn_blocking(move || embedder.embed_all(&files, &artwork)).await?;
        Ok(report)
    }
}
