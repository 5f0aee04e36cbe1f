//! Application-wide error types.
//!
//! Library modules use specific error types via `thiserror`, while
//! CLI/main uses `anyhow` for convenient error propagation.
//!
//! # Design
//!
//! - [`Error`]: Top-level application error enum
//! - Module-specific errors (e.g. [`CatalogError`], [`TagError`]) for detailed handling
//! - All errors implement `std::error::Error` for compatibility

use crate::catalog::CatalogError;
use crate::cli::TargetError;
use crate::tags::TagError;

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level application error.
///
/// Aggregates errors from all subsystems for unified handling.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Catalog search error
    #[error("Search error: {0}")]
    Catalog(#[from] CatalogError),

    /// Tag reading/writing error
    #[error("Tag error: {0}")]
    Tag(#[from] TagError),

    /// Unusable path argument
    #[error(transparent)]
    Target(#[from] TargetError),

    /// Invalid candidate selection
    #[error("Invalid selection: {0}")]
    Selection(String),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create a selection error.
    pub fn selection(message: impl Into<String>) -> Self {
        Self::Selection(message.into())
    }

    /// Add context to an error.
    pub fn context(self, ctx: impl Into<String>) -> Self {
        Self::WithContext {
            context: ctx.into(),
            source: Box::new(self),
        }
    }

    /// Process exit code for errors that carry one
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::Target(e) => Some(e.exit_code()),
            Self::WithContext { source, .. } => source.exit_code(),
            _ => None,
        }
    }
}

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn with_context(self, ctx: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Io(e).context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, TagError> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Tag(e).context(ctx))
    }
}
