//! Message handling for the picker window.

use iced::Task;
use iced::keyboard::{self, key};
use std::collections::HashSet;

use super::{CoverPick, Message, Thumbnail};
use crate::cover::ThumbnailState;
use crate::grid;

impl CoverPick {
    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::QueryChanged(text) => {
                self.session.set_status(text);
                Task::none()
            }
            Message::Search => self.start_search(),
            Message::SearchFinished(generation, result) => {
                if self.session.finish_search(generation, result) {
                    self.request_thumbnails()
                } else {
                    Task::none()
                }
            }
            Message::ThumbnailLoaded(generation, url, state) => {
                if self.session.is_current(generation) {
                    self.store_thumbnail(url, &state);
                } else {
                    tracing::debug!(%url, "Dropping thumbnail from an old search");
                }
                Task::none()
            }
            Message::Resized(size) => {
                self.viewport = (size.width as u32, size.height as u32);
                self.request_thumbnails()
            }
            Message::Select(index) => self.start_embedding(index),
            Message::EmbeddingFinished(result) => match self.session.finish_embedding(result) {
                Some(delay) => {
                    tracing::info!("All files saved, closing in {:?}", delay);
                    Task::perform(tokio::time::sleep(delay), |()| Message::AutoClose)
                }
                None => Task::none(),
            },
            Message::AutoClose => iced::exit(),
            Message::KeyPressed(key, modifiers) => handle_keyboard(key, modifiers),
        }
    }

    fn start_search(&mut self) -> Task<Message> {
        let query = self.session.status().to_string();
        let Some(generation) = self.session.begin_search(&query) else {
            return Task::none();
        };
        self.thumbnails.clear();

        let catalog = self.catalog.clone();
        let query = self.session.status().to_string();
        let size = self.thumbnail_size;
        Task::perform(
            async move { catalog.search(&query, (size, size)).await },
            move |result| Message::SearchFinished(generation, result),
        )
    }

    /// Ask the cache for every thumbnail the grid shows that isn't on screen yet.
    fn request_thumbnails(&mut self) -> Task<Message> {
        let generation = self.session.generation();
        let visible: HashSet<usize> = grid::visible_candidates(&self.grid_rows())
            .into_iter()
            .collect();

        let mut tasks = Vec::new();
        let urls: Vec<String> = self
            .session
            .candidates()
            .iter()
            .enumerate()
            .filter(|(i, _)| visible.contains(i))
            .map(|(_, c)| c.thumbnail_url.clone())
            .filter(|url| !self.thumbnails.contains_key(url))
            .collect();

        for url in urls {
            let state = self.cache.get(&url);
            if state.is_pending() {
                self.thumbnails.insert(url.clone(), Thumbnail::Loading);
                let cache = self.cache.clone();
                tasks.push(Task::perform(
                    async move {
                        let state = cache.wait(&url).await;
                        (url, state)
                    },
                    move |(url, state)| Message::ThumbnailLoaded(generation, url, state),
                ));
            } else {
                self.store_thumbnail(url, &state);
            }
        }

        Task::batch(tasks)
    }

    fn store_thumbnail(&mut self, url: String, state: &ThumbnailState) {
        let thumbnail = match state {
            ThumbnailState::Pending => Thumbnail::Loading,
            ThumbnailState::Ready(decoded) => Thumbnail::Ready(iced::widget::image::Handle::from_rgba(
                decoded.width,
                decoded.height,
                decoded.rgba.clone(),
            )),
            ThumbnailState::Failed(_) => Thumbnail::Failed,
        };
        self.thumbnails.insert(url, thumbnail);
    }

    fn start_embedding(&mut self, index: usize) -> Task<Message> {
        let Some(candidate) = self.session.select(index) else {
            return Task::none();
        };

        let pipeline = self.pipeline.clone();
        let targets = self.session.targets().clone();
        Task::perform(
            async move { pipeline.apply_selection(&candidate, &targets).await },
            Message::EmbeddingFinished,
        )
    }
}

/// Escape closes the picker. Enter is handled by the query field itself.
fn handle_keyboard(key: keyboard::Key, modifiers: keyboard::Modifiers) -> Task<Message> {
    match key.as_ref() {
        keyboard::Key::Named(key::Named::Escape) if modifiers.is_empty() => {
            tracing::debug!(target: "ui::keyboard", "Escape pressed - closing");
            iced::exit()
        }
        _ => Task::none(),
    }
}
