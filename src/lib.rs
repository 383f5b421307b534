/// Playlist Analyzer - Rust Implementation
///
/// Totals the watch time of a video playlist, or a range of it, at several
/// playback speeds, and spreads that time over the days before a deadline.

pub mod api;
pub mod catalog;
pub mod client;
pub mod config;
pub mod error;
pub mod playlist;
pub mod schedule;

// Re-export main types for easy access
pub use crate::catalog::{InMemoryCatalog, VideoCatalog, YouTubeCatalog};
pub use crate::client::AnalyzerClient;
pub use crate::config::Config;
pub use crate::error::{AnalyzerError, Result};
pub use crate::playlist::{AggregateResult, AggregatorOptions, Degradation, Hms, PlaylistAggregator, PlaylistId, Range};
pub use crate::schedule::{plan, StudyPlan};
