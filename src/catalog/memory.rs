//! In-memory catalog for offline runs and fixtures
use super::{ItemPage, PlaylistMetadata, VideoCatalog, VideoDuration};
use crate::error::{AnalyzerError, Result};
use crate::playlist::PlaylistId;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

struct StoredPlaylist {
    metadata: Option<PlaylistMetadata>,
    video_ids: Vec<String>,
}

/// Catalog backed by maps, paging with numeric continuation tokens.
///
/// Individual pages and duration batches can be marked as failing, which is
/// how the degradation paths of the aggregator get exercised.
pub struct InMemoryCatalog {
    page_size: usize,
    playlists: HashMap<String, StoredPlaylist>,
    durations: HashMap<String, String>,
    failing_pages: HashSet<usize>,
    failing_batches: HashSet<usize>,
    batch_calls: AtomicUsize,
    page_calls: AtomicUsize,
}

impl InMemoryCatalog {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            playlists: HashMap::new(),
            durations: HashMap::new(),
            failing_pages: HashSet::new(),
            failing_batches: HashSet::new(),
            batch_calls: AtomicUsize::new(0),
            page_calls: AtomicUsize::new(0),
        }
    }

    /// Add a playlist; `None` metadata makes the metadata lookup fail
    pub fn with_playlist(
        mut self,
        playlist_id: &str,
        metadata: Option<(&str, &str)>,
        videos: &[(&str, &str)],
    ) -> Self {
        for (video_id, duration) in videos {
            self.durations.insert(video_id.to_string(), duration.to_string());
        }
        self.playlists.insert(
            playlist_id.to_string(),
            StoredPlaylist {
                metadata: metadata.map(|(title, channel)| PlaylistMetadata {
                    title: title.to_string(),
                    channel_name: channel.to_string(),
                }),
                video_ids: videos.iter().map(|(id, _)| id.to_string()).collect(),
            },
        );
        self
    }

    /// Remove a video's duration record so lookups silently omit it
    pub fn without_duration(mut self, video_id: &str) -> Self {
        self.durations.remove(video_id);
        self
    }

    /// Make the given 1-based page fail
    pub fn with_failing_page(mut self, page: usize) -> Self {
        self.failing_pages.insert(page);
        self
    }

    /// Make the given 1-based duration lookup call fail
    pub fn with_failing_batch(mut self, batch: usize) -> Self {
        self.failing_batches.insert(batch);
        self
    }

    pub fn page_calls(&self) -> usize {
        self.page_calls.load(Ordering::SeqCst)
    }

    pub fn batch_calls(&self) -> usize {
        self.batch_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VideoCatalog for InMemoryCatalog {
    async fn playlist_metadata(&self, playlist_id: &PlaylistId) -> Result<PlaylistMetadata> {
        self.playlists
            .get(playlist_id.as_str())
            .and_then(|playlist| playlist.metadata.clone())
            .ok_or_else(|| AnalyzerError::Upstream(format!("Playlist {} not found", playlist_id)))
    }

    async fn playlist_items(
        &self,
        playlist_id: &PlaylistId,
        page_token: Option<&str>,
    ) -> Result<ItemPage> {
        let call = self.page_calls.fetch_add(1, Ordering::SeqCst) + 1;

        let offset = match page_token {
            None | Some("") => 0,
            Some(token) => token
                .parse::<usize>()
                .map_err(|_| AnalyzerError::Upstream(format!("Bad page token {}", token)))?,
        };
        let page = offset / self.page_size + 1;
        if self.failing_pages.contains(&page) {
            return Err(AnalyzerError::Upstream(format!("Page {} unavailable", call)));
        }

        let Some(playlist) = self.playlists.get(playlist_id.as_str()) else {
            return Ok(ItemPage::default());
        };

        let end = (offset + self.page_size).min(playlist.video_ids.len());
        let video_ids = playlist
            .video_ids
            .get(offset..end)
            .map(<[String]>::to_vec)
            .unwrap_or_default();
        let next_page_token = (end < playlist.video_ids.len()).then(|| end.to_string());

        Ok(ItemPage {
            video_ids,
            next_page_token,
        })
    }

    async fn video_durations(&self, video_ids: &[String]) -> Result<Vec<VideoDuration>> {
        let call = self.batch_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.failing_batches.contains(&call) {
            return Err(AnalyzerError::Upstream(format!("Batch call {} failed", call)));
        }

        Ok(video_ids
            .iter()
            .filter_map(|id| {
                self.durations.get(id).map(|duration| VideoDuration {
                    video_id: id.clone(),
                    duration: duration.clone(),
                })
            })
            .collect())
    }

    fn provider_name(&self) -> &'static str {
        "memory"
    }
}
