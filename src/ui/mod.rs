//! The picker window.
//!
//! A query bar on top, a grid of candidate thumbnails below. Clicking a
//! thumbnail runs the selection pipeline in the background; the result shows
//! up in the query bar, which doubles as the status line.

mod messages;
pub mod theme;
mod update;
mod views;

use iced::widget::image;
use iced::{Element, Subscription, Task, keyboard, window};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

pub use messages::Message;

use crate::catalog::{CatalogApi, ItunesClient};
use crate::config::Config;
use crate::cover::{ArtworkFetcher, ThumbnailCache};
use crate::grid;
use crate::session::{Pipeline, Session, TargetFileSet};
use crate::tags::LoftyTags;

/// What the grid shows for one thumbnail URL
#[derive(Debug, Clone)]
enum Thumbnail {
    Loading,
    Ready(image::Handle),
    Failed,
}

pub struct CoverPick {
    session: Session,
    catalog: Arc<dyn CatalogApi>,
    cache: ThumbnailCache,
    pipeline: Pipeline<LoftyTags>,
    /// Display-ready images for the current search, keyed by URL
    thumbnails: HashMap<String, Thumbnail>,
    thumbnail_size: u32,
    viewport: (u32, u32),
}

impl CoverPick {
    /// Build the picker and kick off the first search when a query is known.
    pub fn new(
        config: &Config,
        targets: TargetFileSet,
        query: String,
        runtime: tokio::runtime::Handle,
    ) -> (Self, Task<Message>) {
        let fetcher = Arc::new(ArtworkFetcher::from_config(&config.provider));
        let size = config.display.thumbnail_size;

        let app = Self {
            session: Session::new(
                targets,
                query,
                Duration::from_secs(config.display.autoclose_secs),
            ),
            catalog: Arc::new(ItunesClient::from_config(&config.provider)),
            cache: ThumbnailCache::new(fetcher.clone(), runtime, config.thumbnail_capacity(), size),
            pipeline: Pipeline::new(fetcher, LoftyTags, size, config.provider.download_size),
            thumbnails: HashMap::new(),
            thumbnail_size: size,
            viewport: (config.display.viewport_width, config.display.viewport_height),
        };

        (app, Task::done(Message::Search))
    }

    pub fn title(&self) -> String {
        let targets = self.session.targets();
        let name = targets
            .album_dir()
            .or_else(|| targets.first())
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        if name.is_empty() {
            "coverpick".to_string()
        } else {
            format!("coverpick - {}", name)
        }
    }

    pub fn subscription(&self) -> Subscription<Message> {
        Subscription::batch([
            keyboard::on_key_press(|key, modifiers| Some(Message::KeyPressed(key, modifiers))),
            window::resize_events().map(|(_id, size)| Message::Resized(size)),
        ])
    }

    pub fn view(&self) -> Element<'_, Message> {
        views::picker_view(self)
    }

    /// Rows of candidates that fit below the query bar
    fn grid_rows(&self) -> Vec<grid::Row<'_>> {
        grid::layout_captioned(
            self.session.candidates(),
            self.thumbnail_size,
            theme::layout::CAPTION_HEIGHT,
            self.viewport.0,
            self.viewport.1.saturating_sub(theme::layout::HEADER_HEIGHT),
        )
    }
}
