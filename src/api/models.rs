//! API data models

use serde::{Deserialize, Serialize};

use crate::playlist::{AggregateResult, Hms};
use crate::schedule::StudyPlan;

/// Query for `GET /api/analyze`
#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeQuery {
    pub url: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

/// Query for `GET /api/plan`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanQuery {
    /// Kept raw so a malformed number is reported like any other bad input
    pub total_hours: Option<String>,
    pub speed: Option<String>,
    pub start: Option<String>,
    pub deadline: Option<String>,
}

/// Error body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { error: message.into() }
    }
}

/// Watch time at each supported speed
#[derive(Debug, Serialize, Deserialize)]
pub struct SpeedTotals {
    #[serde(rename = "1x")]
    pub normal: Hms,
    #[serde(rename = "1.25x")]
    pub x1_25: Hms,
    #[serde(rename = "1.5x")]
    pub x1_5: Hms,
    #[serde(rename = "2x")]
    pub x2: Hms,
}

/// Body of a successful analysis
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    pub playlist_title: String,
    pub channel_name: String,
    pub total_videos: usize,
    pub range: String,
    pub range_videos: usize,
    pub average_video: Hms,
    pub total: SpeedTotals,
    pub total_hours: f64,
    /// Upstream problems that were worked around
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl From<&AggregateResult> for AnalyzeResponse {
    fn from(result: &AggregateResult) -> Self {
        let at = |label: &str| result.speed(label).map(|total| total.duration).unwrap_or_default();

        Self {
            playlist_title: result.playlist_title.clone(),
            channel_name: result.channel_name.clone(),
            total_videos: result.total_items,
            range: result.range_label(),
            range_videos: result.selected_count,
            average_video: result.average(),
            total: SpeedTotals {
                normal: at("1x"),
                x1_25: at("1.25x"),
                x1_5: at("1.5x"),
                x2: at("2x"),
            },
            total_hours: result.total_hours(),
            warnings: result.warnings.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Body of a plan request
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanResponse {
    pub achievable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub study_days: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub needed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_day: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub needed_seconds: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seconds_per_day: Option<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub day_breakdown: Vec<String>,
}

impl PlanResponse {
    pub fn not_achievable() -> Self {
        Self {
            achievable: false,
            message: Some("No study days left before the deadline".to_string()),
            study_days: None,
            needed: None,
            per_day: None,
            needed_seconds: None,
            seconds_per_day: None,
            day_breakdown: Vec::new(),
        }
    }
}

impl From<StudyPlan> for PlanResponse {
    fn from(plan: StudyPlan) -> Self {
        Self {
            achievable: true,
            message: None,
            study_days: Some(plan.study_days),
            needed: Some(plan.needed),
            per_day: Some(plan.per_day),
            needed_seconds: Some(plan.needed_seconds),
            seconds_per_day: Some(plan.seconds_per_day),
            day_breakdown: plan.daily_breakdown.into_iter().map(|day| day.summary).collect(),
        }
    }
}
