//! Audio tag container access.
//!
//! Uses the lofty crate for format-independent tag access (ID3v2 for MP3,
//! Vorbis comments for FLAC/OGG, MP4 atoms for M4A). The rest of the crate only
//! sees the [`TagContainer`] / [`TagHandle`] pair, so batch embedding can be
//! tested without real audio files.

use lofty::config::WriteOptions;
use lofty::file::TaggedFileExt;
use lofty::picture::{MimeType, Picture, PictureType};
use lofty::probe::Probe;
use lofty::tag::{Accessor, ItemKey, Tag, TagExt};
use std::path::{Path, PathBuf};

/// Image format of an embedded cover
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverMime {
    Jpeg,
    Png,
}

impl CoverMime {
    /// Detect the format from the image bytes. Anything that isn't PNG is
    /// treated as JPEG, which is what the artwork provider serves.
    pub fn sniff(data: &[u8]) -> Self {
        match image::guess_format(data) {
            Ok(image::ImageFormat::Png) => CoverMime::Png,
            _ => CoverMime::Jpeg,
        }
    }

    fn to_lofty(self) -> MimeType {
        match self {
            CoverMime::Jpeg => MimeType::Jpeg,
            CoverMime::Png => MimeType::Png,
        }
    }
}

/// Per-file tag failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TagError {
    #[error("Could not open file {path}: {reason}")]
    OpenFailed { path: PathBuf, reason: String },

    #[error("Could not save file {path}: {reason}")]
    SaveFailed { path: PathBuf, reason: String },
}

impl TagError {
    pub fn open_failed(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::OpenFailed {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn save_failed(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::SaveFailed {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// Something that can open the tag container of an audio file.
pub trait TagContainer: Send + Sync {
    type Handle: TagHandle;

    /// Open and parse the file's tags.
    fn open(&self, path: &Path) -> Result<Self::Handle, TagError>;
}

/// An opened tag container.
pub trait TagHandle {
    /// Replace the front cover. Any existing front cover is dropped, not kept
    /// alongside the new one.
    fn set_cover_image(&mut self, data: &[u8], mime: CoverMime);

    /// Write the tags back to the file.
    fn save(&mut self) -> Result<(), TagError>;
}

/// Tag container backed by lofty
#[derive(Debug, Clone, Copy, Default)]
pub struct LoftyTags;

/// An opened lofty tag plus the file it belongs to
pub struct LoftyHandle {
    path: PathBuf,
    tag: Tag,
}

impl TagContainer for LoftyTags {
    type Handle = LoftyHandle;

    fn open(&self, path: &Path) -> Result<LoftyHandle, TagError> {
        let tagged_file = Probe::open(path)
            .and_then(|file| file.read())
            .map_err(|e| TagError::open_failed(path, e))?;

        // Work on the primary tag, creating one if the file has none yet
        let tag = tagged_file
            .primary_tag()
            .cloned()
            .unwrap_or_else(|| Tag::new(tagged_file.primary_tag_type()));

        Ok(LoftyHandle {
            path: path.to_path_buf(),
            tag,
        })
    }
}

impl TagHandle for LoftyHandle {
    fn set_cover_image(&mut self, data: &[u8], mime: CoverMime) {
        self.tag.remove_picture_type(PictureType::CoverFront);
        self.tag.push_picture(Picture::new_unchecked(
            PictureType::CoverFront,
            Some(mime.to_lofty()),
            None,
            data.to_vec(),
        ));
    }

    fn save(&mut self) -> Result<(), TagError> {
        self.tag
            .save_to_path(&self.path, WriteOptions::default())
            .map_err(|e| TagError::save_failed(&self.path, e))
    }
}

/// Build a search query from an audio file's tags.
///
/// Album (or title when there is no album) followed by album artist (or artist).
pub fn derive_query(path: &Path) -> Result<String, TagError> {
    let tagged_file = Probe::open(path)
        .and_then(|file| file.read())
        .map_err(|e| TagError::open_failed(path, e))?;

    let Some(tag) = tagged_file
        .primary_tag()
        .or_else(|| tagged_file.first_tag())
    else {
        return Ok(String::new());
    };

    let album = tag.album();
    let title = tag.title();
    let artist = tag.artist();
    Ok(build_query(
        album.as_deref(),
        title.as_deref(),
        tag.get_string(&ItemKey::AlbumArtist),
        artist.as_deref(),
    ))
}

/// Combine tag fields into a query, skipping blank values
pub fn build_query(
    album: Option<&str>,
    title: Option<&str>,
    album_artist: Option<&str>,
    artist: Option<&str>,
) -> String {
    fn present(s: Option<&str>) -> Option<&str> {
        s.map(str::trim).filter(|s| !s.is_empty())
    }

    let name = present(album).or_else(|| present(title));
    let by = present(album_artist).or_else(|| present(artist));

    [name, by]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ")
}
