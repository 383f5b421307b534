use super::{ItemPage, PlaylistMetadata, VideoCatalog, VideoDuration};
use crate::config::CatalogConfig;
use crate::error::{AnalyzerError, Result};
use crate::playlist::PlaylistId;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// YouTube Data API v3 catalog
pub struct YouTubeCatalog {
    config: CatalogConfig,
    api_key: String,
    base: Url,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct PlaylistListResponse {
    #[serde(default)]
    items: Vec<PlaylistResource>,
}

#[derive(Debug, Deserialize)]
struct PlaylistResource {
    snippet: Option<PlaylistSnippet>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistSnippet {
    title: Option<String>,
    channel_title: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistItemListResponse {
    items: Option<Vec<PlaylistItemResource>>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistItemResource {
    content_details: Option<PlaylistItemContentDetails>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistItemContentDetails {
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VideoListResponse {
    items: Option<Vec<VideoResource>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoResource {
    id: String,
    content_details: Option<VideoContentDetails>,
}

#[derive(Debug, Deserialize)]
struct VideoContentDetails {
    duration: Option<String>,
}

impl YouTubeCatalog {
    pub fn new(config: CatalogConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| AnalyzerError::Configuration("YouTube API key required".to_string()))?;

        // A trailing slash keeps `join` from replacing the last path segment
        let mut base = config.api_base.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base = Url::parse(&base)
            .map_err(|e| AnalyzerError::Configuration(format!("Invalid API base {}: {}", config.api_base, e)))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            config,
            api_key,
            base,
            client,
        })
    }

    fn endpoint(&self, resource: &str) -> Result<Url> {
        self.base
            .join(resource)
            .map_err(|e| AnalyzerError::Configuration(format!("Invalid endpoint {}: {}", resource, e)))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        debug!("Requesting {}", url.path());

        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AnalyzerError::Upstream(format!("YouTube API error {}: {}", status, text)));
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl VideoCatalog for YouTubeCatalog {
    async fn playlist_metadata(&self, playlist_id: &PlaylistId) -> Result<PlaylistMetadata> {
        let mut url = self.endpoint("playlists")?;
        url.query_pairs_mut()
            .append_pair("part", "snippet")
            .append_pair("id", playlist_id.as_str())
            .append_pair("key", &self.api_key);

        let response: PlaylistListResponse = self.get_json(url).await?;

        let snippet = response
            .items
            .into_iter()
            .next()
            .and_then(|item| item.snippet)
            .ok_or_else(|| AnalyzerError::Upstream(format!("Playlist {} not found", playlist_id)))?;

        Ok(PlaylistMetadata {
            title: snippet.title.unwrap_or_default(),
            channel_name: snippet.channel_title.unwrap_or_default(),
        })
    }

    async fn playlist_items(
        &self,
        playlist_id: &PlaylistId,
        page_token: Option<&str>,
    ) -> Result<ItemPage> {
        let mut url = self.endpoint("playlistItems")?;
        url.query_pairs_mut()
            .append_pair("part", "contentDetails")
            .append_pair("maxResults", &self.config.page_size.to_string())
            .append_pair("playlistId", playlist_id.as_str())
            .append_pair("pageToken", page_token.unwrap_or(""))
            .append_pair("key", &self.api_key);

        let response: PlaylistItemListResponse = self.get_json(url).await?;

        let items = response
            .items
            .ok_or_else(|| AnalyzerError::Upstream("Page has no items".to_string()))?;

        let video_ids = items
            .into_iter()
            .filter_map(|item| item.content_details.and_then(|details| details.video_id))
            .collect();

        Ok(ItemPage {
            video_ids,
            next_page_token: response.next_page_token.filter(|token| !token.is_empty()),
        })
    }

    async fn video_durations(&self, video_ids: &[String]) -> Result<Vec<VideoDuration>> {
        let mut url = self.endpoint("videos")?;
        url.query_pairs_mut()
            .append_pair("part", "contentDetails")
            .append_pair("id", &video_ids.join(","))
            .append_pair("key", &self.api_key);

        let response: VideoListResponse = self.get_json(url).await?;

        Ok(response
            .items
            .unwrap_or_default()
            .into_iter()
            .filter_map(|video| {
                let duration = video.content_details.and_then(|details| details.duration)?;
                Some(VideoDuration {
                    video_id: video.id,
                    duration,
                })
            })
            .collect())
    }

    fn provider_name(&self) -> &'static str {
        "youtube"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_key(key: Option<&str>) -> CatalogConfig {
        CatalogConfig {
            api_key: key.map(str::to_string),
            ..CatalogConfig::default()
        }
    }

    #[test]
    fn test_requires_api_key() {
        assert!(YouTubeCatalog::new(config_with_key(None)).is_err());
        assert!(YouTubeCatalog::new(config_with_key(Some("  "))).is_err());
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let catalog = YouTubeCatalog::new(config_with_key(Some("test-key"))).unwrap();
        let url = catalog.endpoint("playlistItems").unwrap();
        assert_eq!(url.as_str(), "https://www.googleapis.com/youtube/v3/playlistItems");
    }

    #[test]
    fn test_page_response_parsing() {
        let body = r#"{
            "nextPageToken": "CDIQAA",
            "items": [
                {"contentDetails": {"videoId": "a1"}},
                {"contentDetails": {}},
                {"contentDetails": {"videoId": "b2"}}
            ]
        }"#;
        let page: PlaylistItemListResponse = serde_json::from_str(body).unwrap();
        assert_eq!(page.next_page_token.as_deref(), Some("CDIQAA"));
        assert_eq!(page.items.unwrap().len(), 3);
    }

    #[test]
    fn test_error_body_has_no_items() {
        let body = r#"{"error": {"code": 403, "message": "quotaExceeded"}}"#;
        let page: PlaylistItemListResponse = serde_json::from_str(body).unwrap();
        assert!(page.items.is_none());
    }
}
