//! Result grid layout.
//!
//! Pure layout computation for the picker: candidates are placed row by row
//! in provider order, bounded by how many thumbnails fit in the viewport.
//! Rows that don't fit are dropped, and nothing in a dropped row is fetched.

use crate::catalog::Candidate;

/// Space around each thumbnail, in pixels
pub const MARGIN: u32 = 10;

/// Longest caption shown under a thumbnail
pub const MAX_TITLE_CHARS: usize = 55;

/// Characters of the artist kept when a caption is shortened
pub const ARTIST_PREFIX_CHARS: usize = 25;

/// A single slot in the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridCell<'a> {
    /// A candidate and its index in the search results
    Candidate(usize, &'a Candidate),
    /// Placeholder shown when a search returned nothing
    NoResults,
}

/// One row of the grid
pub type Row<'a> = Vec<GridCell<'a>>;

/// How many thumbnails fit along an axis. Never less than one.
pub fn fit_count(extent: u32, item_size: u32) -> usize {
    let step = item_size.saturating_add(MARGIN).max(1);
    ((extent / step) as usize).max(1)
}

/// Lay out candidates into rows bounded by the viewport.
pub fn layout(
    candidates: &[Candidate],
    item_size: u32,
    viewport_width: u32,
    viewport_height: u32,
) -> Vec<Row<'_>> {
    layout_captioned(candidates, item_size, 0, viewport_width, viewport_height)
}

/// Like [`layout`], for tiles that draw a caption of `caption_height` pixels
/// under each thumbnail. Every row pays for its own caption.
pub fn layout_captioned(
    candidates: &[Candidate],
    item_size: u32,
    caption_height: u32,
    viewport_width: u32,
    viewport_height: u32,
) -> Vec<Row<'_>> {
    if candidates.is_empty() {
        return vec![vec![GridCell::NoResults]];
    }

    let items_per_row = fit_count(viewport_width, item_size);
    let max_rows = fit_count(viewport_height, item_size.saturating_add(caption_height));

    candidates
        .iter()
        .enumerate()
        .map(|(i, c)| GridCell::Candidate(i, c))
        .collect::<Vec<_>>()
        .chunks(items_per_row)
        .take(max_rows)
        .map(|chunk| chunk.to_vec())
        .collect()
}

/// Indices of every candidate that made it into the layout
pub fn visible_candidates(rows: &[Row<'_>]) -> Vec<usize> {
    rows.iter()
        .flatten()
        .filter_map(|cell| match cell {
            GridCell::Candidate(i, _) => Some(*i),
            GridCell::NoResults => None,
        })
        .collect()
}

/// Caption for a thumbnail: "Artist - Title", shortened to fit.
///
/// Long captions keep the first 25 characters of the artist, then "-", then
/// as much of the title as fits in 55 characters.
pub fn display_title(artist: &str, title: &str) -> String {
    let full = format!("{} - {}", artist, title);
    if full.chars().count() <= MAX_TITLE_CHARS {
        return full;
    }

    let mut caption: String = artist.chars().take(ARTIST_PREFIX_CHARS).collect();
    caption.push('-');
    let remaining = MAX_TITLE_CHARS.saturating_sub(caption.chars().count());
    caption.extend(title.chars().take(remaining));
    caption
}
