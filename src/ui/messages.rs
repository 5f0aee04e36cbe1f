//! Message types for the picker window.

use crate::catalog::{Candidate, CatalogError};
use crate::cover::{EmbedReport, ThumbnailState};
use crate::session::PipelineError;
use iced::{Size, keyboard};

/// All possible messages that can be sent in the application
#[derive(Debug, Clone)]
pub enum Message {
    // Query bar
    QueryChanged(String),
    Search,
    SearchFinished(u64, Result<Vec<Candidate>, CatalogError>),

    // Grid
    /// A thumbnail left `Pending`: search generation, URL, final state
    ThumbnailLoaded(u64, String, ThumbnailState),
    Select(usize),
    Resized(Size),

    // Pipeline
    EmbeddingFinished(Result<EmbedReport, PipelineError>),
    AutoClose,

    // Keyboard
    KeyPressed(keyboard::Key, keyboard::Modifiers),
}
