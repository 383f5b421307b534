//! Lazy enumeration of playlist item pages
use super::{Degradation, PlaylistId};
use crate::catalog::VideoCatalog;
use futures::stream::{self, Stream, StreamExt};
use tracing::{debug, warn};

enum Cursor {
    First,
    Next(String),
    Done,
}

/// Follows continuation tokens page by page.
///
/// Yields each page's video ids in playlist order. A failed or malformed page
/// yields one `Err` and ends the stream; the pages already yielded stay valid.
pub struct PageStream<'a> {
    catalog: &'a dyn VideoCatalog,
    playlist_id: &'a PlaylistId,
    max_pages: usize,
}

impl<'a> PageStream<'a> {
    pub fn new(catalog: &'a dyn VideoCatalog, playlist_id: &'a PlaylistId, max_pages: usize) -> Self {
        Self {
            catalog,
            playlist_id,
            max_pages,
        }
    }

    pub fn into_stream(self) -> impl Stream<Item = Result<Vec<String>, Degradation>> + 'a {
        let Self {
            catalog,
            playlist_id,
            max_pages,
        } = self;

        stream::unfold((Cursor::First, 0usize), move |(cursor, fetched)| async move {
            let token = match cursor {
                Cursor::Done => return None,
                Cursor::First => None,
                Cursor::Next(token) => Some(token),
            };
            let page = fetched + 1;

            if fetched >= max_pages {
                warn!("⚠️ Page limit of {} reached for playlist {}", max_pages, playlist_id);
                let stop = Degradation::EnumerationStopped {
                    page,
                    reason: format!("page limit of {} reached", max_pages),
                };
                return Some((Err(stop), (Cursor::Done, fetched)));
            }

            match catalog.playlist_items(playlist_id, token.as_deref()).await {
                Ok(items) => {
                    debug!("Page {}: {} items", page, items.video_ids.len());
                    let next = match items.next_page_token {
                        Some(token) => Cursor::Next(token),
                        None => Cursor::Done,
                    };
                    Some((Ok(items.video_ids), (next, page)))
                }
                Err(e) => {
                    warn!("⚠️ Stopping enumeration of {} at page {}: {}", playlist_id, page, e);
                    let stop = Degradation::EnumerationStopped {
                        page,
                        reason: e.to_string(),
                    };
                    Some((Err(stop), (Cursor::Done, page)))
                }
            }
        })
    }

    /// Drain the stream into the full ordered id list, plus the reason
    /// enumeration stopped early, if it did.
    pub async fn collect_ids(self) -> (Vec<String>, Option<Degradation>) {
        let pages = self.into_stream();
        futures::pin_mut!(pages);

        let mut ids = Vec::new();
        while let Some(page) = pages.next().await {
            match page {
                Ok(mut batch) => ids.append(&mut batch),
                Err(stop) => return (ids, Some(stop)),
            }
        }
        (ids, None)
    }
}
