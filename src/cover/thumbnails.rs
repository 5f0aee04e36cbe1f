//! Thumbnail cache.
//!
//! Maps a candidate's thumbnail URL to a decoded, display-sized image. The
//! cache is owned by the session and shared by handle; it is the only mutable
//! state touched by background tasks.
//!
//! # Guarantees
//!
//! - `get` never blocks: a miss inserts a `Pending` entry, schedules exactly
//!   one fetch and returns immediately.
//! - Any number of concurrent requests for one URL share that single fetch.
//! - An entry leaves `Pending` once. Later resolutions are rejected.
//! - Only `get` schedules fetches; `wait` never re-requests an evicted URL.
//! - Capacity is bounded; least recently used entries are evicted.

use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::watch;

use super::fetcher::ArtworkSource;

/// RGBA8 pixels ready for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedThumbnail {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// State of one cache entry
#[derive(Debug, Clone)]
pub enum ThumbnailState {
    Pending,
    Ready(Arc<DecodedThumbnail>),
    Failed(String),
}

impl ThumbnailState {
    pub fn is_pending(&self) -> bool {
        matches!(self, ThumbnailState::Pending)
    }
}

/// Cache misuse, reported to the caller of `resolve`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CacheError {
    #[error("Thumbnail {0} was already resolved")]
    DoubleResolve(String),

    #[error("No thumbnail entry for {0}")]
    UnknownEntry(String),
}

/// Reason reported by `wait` for a URL with no entry
const NOT_CACHED: &str = "evicted before it loaded";

struct Slot {
    state: ThumbnailState,
    notify: watch::Sender<ThumbnailState>,
}

struct Inner {
    entries: Mutex<LruCache<String, Slot>>,
    source: Arc<dyn ArtworkSource>,
    runtime: Handle,
    display_size: u32,
}

/// Session-owned thumbnail cache. Cloning shares the same cache.
#[derive(Clone)]
pub struct ThumbnailCache {
    inner: Arc<Inner>,
}

impl ThumbnailCache {
    /// Create a cache that fetches through `source` on `runtime`.
    ///
    /// A capacity of zero is treated as one.
    pub fn new(
        source: Arc<dyn ArtworkSource>,
        runtime: Handle,
        capacity: usize,
        display_size: u32,
    ) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Arc::new(Inner {
                entries: Mutex::new(LruCache::new(capacity)),
                source,
                runtime,
                display_size,
            }),
        }
    }

    /// Current state for a URL, scheduling a fetch on first request.
    pub fn get(&self, url: &str) -> ThumbnailState {
        let mut entries = self.inner.entries.lock();

        if let Some(slot) = entries.get(url) {
            return slot.state.clone();
        }

        let (notify, _) = watch::channel(ThumbnailState::Pending);
        if let Some((evicted, _)) = entries.push(
            url.to_string(),
            Slot {
                state: ThumbnailState::Pending,
                notify,
            },
        ) && evicted != url
        {
            tracing::debug!(url = %evicted, "Evicted thumbnail");
        }
        drop(entries);

        self.spawn_fetch(url.to_string());
        ThumbnailState::Pending
    }

    /// Wait until the entry for `url` leaves `Pending`.
    ///
    /// Only subscribes: it never schedules a fetch and leaves LRU order alone.
    /// A URL that was never requested, or was evicted, yields `Failed`.
    pub async fn wait(&self, url: &str) -> ThumbnailState {
        let mut receiver = {
            let entries = self.inner.entries.lock();
            match entries.peek(url) {
                Some(slot) if slot.state.is_pending() => slot.notify.subscribe(),
                Some(slot) => return slot.state.clone(),
                None => return ThumbnailState::Failed(NOT_CACHED.to_string()),
            }
        };

        match receiver.wait_for(|s| !s.is_pending()).await {
            Ok(state) => state.clone(),
            Err(_) => ThumbnailState::Failed(NOT_CACHED.to_string()),
        }
    }

    /// Transition a pending entry to its terminal state.
    ///
    /// Called once by the fetch task. A second call leaves the entry untouched.
    pub fn resolve(
        &self,
        url: &str,
        result: Result<DecodedThumbnail, String>,
    ) -> Result<(), CacheError> {
        let mut entries = self.inner.entries.lock();
        let Some(slot) = entries.peek_mut(url) else {
            return Err(CacheError::UnknownEntry(url.to_string()));
        };

        if !slot.state.is_pending() {
            return Err(CacheError::DoubleResolve(url.to_string()));
        }

        slot.state = match result {
            Ok(image) => ThumbnailState::Ready(Arc::new(image)),
            Err(reason) => ThumbnailState::Failed(reason),
        };
        slot.notify.send_replace(slot.state.clone());
        Ok(())
    }

    /// Whether an entry exists for the URL (does not touch LRU order)
    pub fn contains(&self, url: &str) -> bool {
        self.inner.entries.lock().contains(url)
    }

    pub fn len(&self) -> usize {
        self.inner.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn spawn_fetch(&self, url: String) {
        let cache = self.clone();
        self.inner.runtime.spawn(async move {
            let size = cache.inner.display_size;
            let result = match cache.inner.source.fetch(&url).await {
                Ok(bytes) => tokio::task::spawn_blocking(move || decode_thumbnail(&bytes, size))
                    .await
                    .map_err(|e| e.to_string())
                    .and_then(|decoded| decoded.map_err(|e| e.to_string())),
                Err(e) => Err(e.to_string()),
            };

            if let Err(ref reason) = result {
                tracing::warn!(%url, %reason, "Thumbnail failed");
            }
            if let Err(e) = cache.resolve(&url, result) {
                tracing::debug!("Dropped thumbnail result: {}", e);
            }
        });
    }
}

/// Decode image bytes and scale them to fit a `size` x `size` box.
pub fn decode_thumbnail(bytes: &[u8], size: u32) -> Result<DecodedThumbnail, image::ImageError> {
    let image = image::load_from_memory(bytes)?;
    let image = if image.width() > size || image.height() > size {
        image.thumbnail(size, size)
    } else {
        image
    };
    let rgba = image.into_rgba8();

    Ok(DecodedThumbnail {
        width: rgba.width(),
        height: rgba.height(),
        rgba: rgba.into_raw(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cover::fetcher::FetchError;
    use crate::cover::fetcher::mocks::MockArtwork;
    use crate::test_utils::png_bytes;
    use std::time::Duration;
    use tokio::task::JoinSet;

    fn cache_with(source: Arc<MockArtwork>, capacity: usize) -> ThumbnailCache {
        ThumbnailCache::new(source, Handle::current(), capacity, 250)
    }

    #[test]
    fn test_decode_scales_down_keeping_aspect() {
        let decoded = decode_thumbnail(&png_bytes(500, 250), 250).unwrap();
        assert_eq!((decoded.width, decoded.height), (250, 125));
        assert_eq!(decoded.rgba.len(), 250 * 125 * 4);
    }

    #[test]
    fn test_decode_keeps_small_images() {
        let decoded = decode_thumbnail(&png_bytes(100, 100), 250).unwrap();
        assert_eq!((decoded.width, decoded.height), (100, 100));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_thumbnail(b"definitely not an image", 250).is_err());
    }

    #[tokio::test]
    async fn test_get_returns_pending_then_ready() {
        let source = Arc::new(MockArtwork::with_bytes(png_bytes(300, 300)));
        let cache = cache_with(source.clone(), 8);

        assert!(cache.get("http://x/1").is_pending());
        let state = cache.wait("http://x/1").await;

        match state {
            ThumbnailState::Ready(image) => assert_eq!((image.width, image.height), (250, 250)),
            other => panic!("expected ready thumbnail, got {:?}", other),
        }
        assert!(matches!(cache.get("http://x/1"), ThumbnailState::Ready(_)));
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_requests_share_one_fetch() {
        let source = Arc::new(
            MockArtwork::with_bytes(png_bytes(64, 64)).delayed(Duration::from_millis(50)),
        );
        let cache = cache_with(source.clone(), 8);

        let mut tasks = JoinSet::new();
        for _ in 0..16 {
            let cache = cache.clone();
            tasks.spawn(async move {
                cache.get("http://x/shared");
                cache.wait("http://x/shared").await
            });
        }

        let mut images = Vec::new();
        while let Some(result) = tasks.join_next().await {
            match result.unwrap() {
                ThumbnailState::Ready(image) => images.push(image),
                other => panic!("expected ready thumbnail, got {:?}", other),
            }
        }

        assert_eq!(source.calls(), 1);
        assert_eq!(images.len(), 16);
        assert!(images.iter().all(|image| Arc::ptr_eq(image, &images[0])));
    }

    #[tokio::test]
    async fn test_failed_fetch_is_terminal() {
        let source = Arc::new(MockArtwork::with_error(FetchError::DownloadFailed(
            "404".to_string(),
        )));
        let cache = cache_with(source.clone(), 8);

        cache.get("http://x/missing");
        let state = cache.wait("http://x/missing").await;
        assert!(matches!(state, ThumbnailState::Failed(_)));

        // Failed entries are not refetched
        assert!(matches!(cache.get("http://x/missing"), ThumbnailState::Failed(_)));
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_second_resolve_is_rejected() {
        // Slow source so the manual resolutions below win the race
        let source = Arc::new(
            MockArtwork::with_bytes(png_bytes(8, 8)).delayed(Duration::from_secs(60)),
        );
        let cache = cache_with(source, 8);
        cache.get("http://x/a");

        let first = DecodedThumbnail {
            width: 1,
            height: 1,
            rgba: vec![1, 2, 3, 4],
        };
        cache.resolve("http://x/a", Ok(first.clone())).unwrap();

        let second = cache.resolve("http://x/a", Err("late failure".to_string()));
        assert_eq!(second, Err(CacheError::DoubleResolve("http://x/a".to_string())));

        match cache.get("http://x/a") {
            ThumbnailState::Ready(image) => assert_eq!(*image, first),
            other => panic!("value changed after first resolution: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_resolve_unknown_entry() {
        let cache = cache_with(Arc::new(MockArtwork::with_bytes(png_bytes(8, 8))), 8);
        let result = cache.resolve("http://x/never-requested", Err("x".to_string()));
        assert!(matches!(result, Err(CacheError::UnknownEntry(_))));
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_distinct_urls_resolve_independently() {
        let source = Arc::new(
            MockArtwork::with_bytes(png_bytes(8, 8)).delayed(Duration::from_secs(60)),
        );
        let cache = cache_with(source, 8);
        cache.get("http://x/a");
        cache.get("http://x/b");

        cache.resolve("http://x/a", Err("broken".to_string())).unwrap();

        assert!(matches!(cache.get("http://x/a"), ThumbnailState::Failed(_)));
        assert!(cache.get("http://x/b").is_pending());
    }

    #[tokio::test]
    async fn test_lru_eviction_bounds_size() {
        let source = Arc::new(
            MockArtwork::with_bytes(png_bytes(8, 8)).delayed(Duration::from_secs(60)),
        );
        let cache = cache_with(source, 2);

        cache.get("http://x/1");
        cache.get("http://x/2");
        cache.get("http://x/1"); // touch, so 2 is now oldest
        cache.get("http://x/3");

        assert_eq!(cache.len(), 2);
        assert!(cache.contains("http://x/1"));
        assert!(!cache.contains("http://x/2"));
        assert!(cache.contains("http://x/3"));
    }

    #[tokio::test]
    async fn test_wait_on_evicted_pending_entry_fails() {
        let source = Arc::new(
            MockArtwork::with_bytes(png_bytes(8, 8)).delayed(Duration::from_secs(60)),
        );
        let cache = cache_with(source, 1);

        cache.get("http://x/old");
        let waiter = {
            let cache = cache.clone();
            tokio::spawn(async move { cache.wait("http://x/old").await })
        };
        tokio::task::yield_now().await;
        cache.get("http://x/new");

        let state = waiter.await.unwrap();
        assert!(matches!(state, ThumbnailState::Failed(_)));
    }

    #[tokio::test]
    async fn test_wait_never_fetches() {
        let source = Arc::new(MockArtwork::with_bytes(png_bytes(8, 8)));
        let cache = cache_with(source.clone(), 8);

        let state = cache.wait("http://x/never-requested").await;

        assert!(matches!(state, ThumbnailState::Failed(_)));
        assert!(!cache.contains("http://x/never-requested"));
        assert_eq!(source.calls(), 0);
    }

    #[tokio::test]
    async fn test_small_capacity_fetches_each_url_once() {
        let source = Arc::new(
            MockArtwork::with_bytes(png_bytes(8, 8)).delayed(Duration::from_millis(20)),
        );
        let cache = cache_with(source.clone(), 2);

        let mut waiters = JoinSet::new();
        for i in 0..4 {
            let url = format!("http://x/{}", i);
            cache.get(&url);
            let cache = cache.clone();
            waiters.spawn(async move { cache.wait(&url).await });
        }
        while let Some(result) = waiters.join_next().await {
            result.unwrap();
        }

        // Late waiters on evicted entries never re-request them
        assert_eq!(source.calls(), 4);
        let mut urls = source.urls();
        urls.sort();
        urls.dedup();
        assert_eq!(urls.len(), 4);
        assert_eq!(cache.len(), 2);
    }
}
