/// Playlist aggregation module
///
/// Turns a playlist URL and an optional item range into duration totals:
/// identifier extraction, paged enumeration, range resolution, batched
/// duration lookup and the derived per-speed figures.

pub mod aggregator;
pub mod duration;
pub mod pages;
pub mod range;

// Re-export main types
pub use aggregator::{AggregatorOptions, PlaylistAggregator};
pub use duration::{parse_compact_duration, Hms};
pub use pages::PageStream;
pub use range::Range;

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

use crate::error::{AnalyzerError, Result};

/// Playback speeds reported for every aggregate, with their display labels
pub const SPEED_FACTORS: [(f64, &str); 4] = [(1.0, "1x"), (1.25, "1.25x"), (1.5, "1.5x"), (2.0, "2x")];

pub const UNKNOWN_PLAYLIST: &str = "Unknown Playlist";
pub const UNKNOWN_CREATOR: &str = "Unknown Creator";

/// Opaque playlist identifier taken from a URL's `list=` parameter
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlaylistId(String);

impl PlaylistId {
    /// Extract the identifier from a playlist URL.
    ///
    /// The value runs from the first `list=` up to the next `&`.
    pub fn from_url(url: &str) -> Result<Self> {
        let invalid = || AnalyzerError::invalid_input("Invalid playlist URL");

        let (_, after) = url.trim().split_once("list=").ok_or_else(invalid)?;
        // A second `list=` terminates the value as well
        let after = after.split("list=").next().unwrap_or_default();
        let id = after.split('&').next().unwrap_or_default();

        if id.is_empty() {
            return Err(invalid());
        }
        Ok(Self(id.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlaylistId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn playlist_url_patterns() -> &'static [Regex; 2] {
    static PATTERNS: OnceLock<[Regex; 2]> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            Regex::new(r"(?i)youtube\.com/.*(list=|playlist)").expect("valid playlist pattern"),
            Regex::new(r"(?i)youtu\.be/.*list=").expect("valid short link pattern"),
        ]
    })
}

/// Whether a browser address looks like a playlist page worth pre-filling
pub fn is_likely_playlist(url: &str) -> bool {
    !url.is_empty() && playlist_url_patterns().iter().any(|re| re.is_match(url))
}

/// Upstream irregularity that was absorbed instead of failing the request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Degradation {
    /// Title/channel lookup failed; placeholders were used
    MetadataUnavailable { reason: String },
    /// Enumeration ended early; items collected so far were kept
    EnumerationStopped { page: usize, reason: String },
    /// A duration batch failed and its items are missing from the total
    BatchSkipped { batch: usize, items: usize, reason: String },
    /// Selected items the catalog returned no usable duration for
    UnresolvedItems { count: usize },
}

impl fmt::Display for Degradation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MetadataUnavailable { reason } => write!(f, "playlist metadata unavailable: {}", reason),
            Self::EnumerationStopped { page, reason } => {
                write!(f, "enumeration stopped at page {}: {}", page, reason)
            }
            Self::BatchSkipped { batch, items, reason } => {
                write!(f, "duration batch {} ({} items) skipped: {}", batch, items, reason)
            }
            Self::UnresolvedItems { count } => write!(f, "{} items had no resolvable duration", count),
        }
    }
}

/// Duration at one playback speed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeedTotal {
    pub factor: f64,
    pub label: String,
    pub duration: Hms,
}

/// Totals for one playlist request. All figures are derived in
/// [`AggregateResult::derive`] and never changed afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateResult {
    pub playlist_title: String,
    pub channel_name: String,
    pub total_items: usize,
    pub range: Range,
    pub selected_count: usize,
    pub total_seconds: u64,
    pub average_seconds: u64,
    pub per_speed: Vec<SpeedTotal>,
    pub warnings: Vec<Degradation>,
}

impl AggregateResult {
    pub fn derive(
        metadata: (String, String),
        total_items: usize,
        range: Range,
        selected_count: usize,
        total_seconds: u64,
        warnings: Vec<Degradation>,
    ) -> Self {
        let average_seconds = if selected_count > 0 {
            total_seconds / selected_count as u64
        } else {
            0
        };

        let per_speed = SPEED_FACTORS
            .iter()
            .map(|&(factor, label)| SpeedTotal {
                factor,
                label: label.to_string(),
                duration: Hms::from_seconds(total_seconds as f64 / factor),
            })
            .collect();

        let (playlist_title, channel_name) = metadata;

        Self {
            playlist_title,
            channel_name,
            total_items,
            range,
            selected_count,
            total_seconds,
            average_seconds,
            per_speed,
            warnings,
        }
    }

    /// Total at normal speed in hours, rounded to two places
    pub fn total_hours(&self) -> f64 {
        (self.total_seconds as f64 / 3600.0 * 100.0).round() / 100.0
    }

    pub fn average(&self) -> Hms {
        Hms::from_whole_seconds(self.average_seconds)
    }

    pub fn range_label(&self) -> String {
        self.range.label(self.total_items)
    }

    pub fn speed(&self, label: &str) -> Option<&SpeedTotal> {
        self.per_speed.iter().find(|total| total.label == label)
    }

    pub fn is_degraded(&self) -> bool {
        !self.warnings.is_empty()
    }
}
