//! Cover art acquisition and embedding.
//!
//! This module covers everything between "the user saw a thumbnail" and
//! "the artwork is inside every target file":
//!
//! 1. **Thumbnails** - decoded, display-sized previews, fetched once per URL
//! 2. **Fetcher** - full-resolution download for the chosen candidate
//! 3. **Folder art** - replacing the shared `folder.jpg` in album mode
//! 4. **Embedder** - writing the artwork into each file's tags
//!
//! # Design Principles
//!
//! - **Non-blocking**: network work runs on background tasks
//! - **Graceful degradation**: a failed thumbnail or file never stops the rest
//! - **No data loss**: the existing `folder.jpg` is only removed once its
//!   replacement is on disk

pub mod embedder;
pub mod fetcher;
pub mod folder;
pub mod thumbnails;

pub use embedder::{BatchEmbedder, EmbedOutcome, EmbedReport, FileResult};
pub use fetcher::{ArtworkFetcher, ArtworkSource, FetchError, download_url};
pub use folder::{ArtworkFs, FolderArtworkReplacer, LocalFs, ReplaceAborted, ReplaceOutcome};
pub use thumbnails::{CacheError, DecodedThumbnail, ThumbnailCache, ThumbnailState};
