//! Playlist duration aggregation
use super::{
    parse_compact_duration, AggregateResult, Degradation, PageStream, PlaylistId, Range,
    UNKNOWN_CREATOR, UNKNOWN_PLAYLIST,
};
use crate::catalog::{ItemPage, PlaylistMetadata, VideoCatalog, VideoDuration};
use crate::config::Config;
use crate::error::{AnalyzerError, Result};
use futures::stream::{self, StreamExt};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Tuning knobs for one aggregator
#[derive(Debug, Clone)]
pub struct AggregatorOptions {
    /// Ids per duration lookup
    pub batch_size: usize,
    /// Upper bound on enumerated pages
    pub max_pages: usize,
    /// Duration batches in flight at once
    pub concurrent_batches: usize,
    /// Deadline for each catalog call
    pub call_timeout: Duration,
}

impl Default for AggregatorOptions {
    fn default() -> Self {
        Self {
            batch_size: 50,
            max_pages: 200,
            concurrent_batches: 4,
            call_timeout: Duration::from_secs(15),
        }
    }
}

impl From<&Config> for AggregatorOptions {
    fn from(config: &Config) -> Self {
        Self {
            batch_size: config.catalog.batch_size,
            max_pages: config.catalog.max_pages,
            concurrent_batches: config.aggregation.concurrent_batches,
            call_timeout: Duration::from_secs(config.catalog.timeout_seconds),
        }
    }
}

/// Totals collected from the duration batches
#[derive(Debug, Default)]
struct DurationSum {
    total_seconds: u64,
    resolved: usize,
    skipped_items: usize,
    warnings: Vec<Degradation>,
}

/// Resolves playlist URLs into [`AggregateResult`]s against a catalog
#[derive(Clone)]
pub struct PlaylistAggregator {
    catalog: Arc<dyn VideoCatalog>,
    options: AggregatorOptions,
}

impl PlaylistAggregator {
    pub fn new(catalog: Arc<dyn VideoCatalog>, options: AggregatorOptions) -> Self {
        Self { catalog, options }
    }

    pub fn options(&self) -> &AggregatorOptions {
        &self.options
    }

    /// Aggregate the durations of `range` within the playlist at `url`.
    ///
    /// Only an unusable URL fails. Catalog problems degrade the result and are
    /// listed in [`AggregateResult::warnings`].
    pub async fn aggregate(&self, url: &str, range: Range) -> Result<AggregateResult> {
        let playlist_id = PlaylistId::from_url(url)?;
        info!(
            "🔍 Analyzing playlist {} via {} (range {}-{})",
            playlist_id,
            self.catalog.provider_name(),
            range.start,
            range.end
        );

        let mut warnings = Vec::new();

        let metadata = self.lookup_metadata(&playlist_id, &mut warnings).await;

        let (video_ids, stop) = self.enumerate(&playlist_id).await;
        warnings.extend(stop);
        let total_items = video_ids.len();

        let span = range.resolve(total_items);
        let selected = &video_ids[span];
        debug!("Selected {} of {} items", selected.len(), total_items);

        let sum = self.sum_durations(selected).await;
        warnings.extend(sum.warnings);

        let unresolved = selected
            .len()
            .saturating_sub(sum.skipped_items)
            .saturating_sub(sum.resolved);
        if unresolved > 0 {
            warn!("⚠️ {} selected items had no resolvable duration", unresolved);
            warnings.push(Degradation::UnresolvedItems { count: unresolved });
        }

        let result = AggregateResult::derive(
            metadata,
            total_items,
            range,
            selected.len(),
            sum.total_seconds,
            warnings,
        );

        info!(
            "✅ {}: {} of {} videos, {}s total",
            result.playlist_title, result.selected_count, result.total_items, result.total_seconds
        );
        Ok(result)
    }

    async fn lookup_metadata(
        &self,
        playlist_id: &PlaylistId,
        warnings: &mut Vec<Degradation>,
    ) -> (String, String) {
        let placeholder = || (UNKNOWN_PLAYLIST.to_string(), UNKNOWN_CREATOR.to_string());

        match self.with_timeout(self.catalog.playlist_metadata(playlist_id)).await {
            Ok(metadata) => {
                let title = Some(metadata.title).filter(|t| !t.is_empty());
                let channel = Some(metadata.channel_name).filter(|c| !c.is_empty());
                (
                    title.unwrap_or_else(|| UNKNOWN_PLAYLIST.to_string()),
                    channel.unwrap_or_else(|| UNKNOWN_CREATOR.to_string()),
                )
            }
            Err(e) => {
                warn!("⚠️ Metadata lookup failed for {}, using placeholders: {}", playlist_id, e);
                warnings.push(Degradation::MetadataUnavailable { reason: e.to_string() });
                placeholder()
            }
        }
    }

    async fn enumerate(&self, playlist_id: &PlaylistId) -> (Vec<String>, Option<Degradation>) {
        let catalog = TimedCatalog {
            inner: self.catalog.as_ref(),
            timeout: self.options.call_timeout,
        };
        PageStream::new(&catalog, playlist_id, self.options.max_pages)
            .collect_ids()
            .await
    }

    async fn sum_durations(&self, selected: &[String]) -> DurationSum {
        let batch_size = self.options.batch_size.max(1);
        let concurrency = self.options.concurrent_batches.max(1);

        let batches: Vec<Vec<String>> = selected.chunks(batch_size).map(<[String]>::to_vec).collect();

        let mut lookups = stream::iter(batches.into_iter().enumerate())
            .map(|(index, chunk)| async move {
                let outcome = self.with_timeout(self.catalog.video_durations(&chunk)).await;
                (index + 1, chunk.len(), outcome)
            })
            .buffer_unordered(concurrency);

        let mut sum = DurationSum::default();
        while let Some((batch, items, outcome)) = lookups.next().await {
            match outcome {
                Ok(records) => {
                    for record in records {
                        match parse_compact_duration(&record.duration) {
                            Some(seconds) => {
                                sum.total_seconds = sum.total_seconds.saturating_add(seconds);
                                sum.resolved += 1;
                            }
                            None => debug!(
                                "Unparseable duration {:?} for {}",
                                record.duration, record.video_id
                            ),
                        }
                    }
                }
                Err(e) => {
                    warn!("⚠️ Skipping duration batch {} ({} items): {}", batch, items, e);
                    sum.skipped_items += items;
                    sum.warnings.push(Degradation::BatchSkipped {
                        batch,
                        items,
                        reason: e.to_string(),
                    });
                }
            }
        }

        // Completion order varies with concurrency
        sum.warnings.sort_by_key(|w| match w {
            Degradation::BatchSkipped { batch, .. } => *batch,
            _ => 0,
        });
        sum
    }

    async fn with_timeout<T>(&self, call: impl Future<Output = Result<T>>) -> Result<T> {
        bounded(self.options.call_timeout, call).await
    }
}

async fn bounded<T>(limit: Duration, call: impl Future<Output = Result<T>>) -> Result<T> {
    tokio::time::timeout(limit, call)
        .await
        .map_err(|_| AnalyzerError::Upstream(format!("timed out after {:?}", limit)))?
}

/// Applies the per-call deadline to page fetches
struct TimedCatalog<'a> {
    inner: &'a dyn VideoCatalog,
    timeout: Duration,
}

#[async_trait::async_trait]
impl<'a> VideoCatalog for TimedCatalog<'a> {
    async fn playlist_metadata(&self, playlist_id: &PlaylistId) -> Result<PlaylistMetadata> {
        bounded(self.timeout, self.inner.playlist_metadata(playlist_id)).await
    }

    async fn playlist_items(
        &self,
        playlist_id: &PlaylistId,
        page_token: Option<&str>,
    ) -> Result<ItemPage> {
        bounded(self.timeout, self.inner.playlist_items(playlist_id, page_token)).await
    }

    async fn video_durations(&self, video_ids: &[String]) -> Result<Vec<VideoDuration>> {
        bounded(self.timeout, self.inner.video_durations(video_ids)).await
    }

    fn provider_name(&self) -> &'static str {
        self.inner.provider_name()
    }
}
