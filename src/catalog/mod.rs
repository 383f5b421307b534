/// Video catalog access
///
/// The aggregator talks to the upstream video catalog only through the
/// [`VideoCatalog`] trait, so any provider that can list playlist items and
/// look up video durations can be substituted.

pub mod memory;
pub mod youtube;

pub use memory::InMemoryCatalog;
pub use youtube::YouTubeCatalog;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::playlist::PlaylistId;

/// Display metadata for a playlist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistMetadata {
    pub title: String,
    pub channel_name: String,
}

/// One page of item references
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemPage {
    /// Video ids in playlist order
    pub video_ids: Vec<String>,
    /// Continuation token for the next page, `None` on the last page
    pub next_page_token: Option<String>,
}

/// Raw duration record returned by a batched lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoDuration {
    pub video_id: String,
    /// Compact encoding, e.g. `PT1H2M3S`
    pub duration: String,
}

/// Capability set of an upstream video catalog
#[async_trait]
pub trait VideoCatalog: Send + Sync {
    /// Resolve a playlist to its title and owning channel
    async fn playlist_metadata(&self, playlist_id: &PlaylistId) -> Result<PlaylistMetadata>;

    /// Fetch one page of item references; `None` requests the first page
    async fn playlist_items(
        &self,
        playlist_id: &PlaylistId,
        page_token: Option<&str>,
    ) -> Result<ItemPage>;

    /// Look up durations for a batch of video ids. Videos the catalog cannot
    /// resolve are simply absent from the result.
    async fn video_durations(&self, video_ids: &[String]) -> Result<Vec<VideoDuration>>;

    /// Short provider name for logging
    fn provider_name(&self) -> &'static str;
}
