//! API request handlers

use serde_json::Value;

use super::models::{AnalyzeQuery, AnalyzeResponse, PlanQuery, PlanResponse};
use crate::config::ScheduleConfig;
use crate::error::{AnalyzerError, Result};
use crate::playlist::{PlaylistAggregator, Range};
use crate::schedule::{self, parse_instant, parse_speed};

/// Lenient integer parsing: anything unreadable falls back to the default
fn int_param(value: Option<&str>, default: i64) -> i64 {
    value
        .and_then(|raw| raw.trim().parse::<i64>().ok())
        .unwrap_or(default)
}

/// Handle health check requests
pub async fn health_check() -> Result<Value> {
    Ok(serde_json::json!({
        "status": "healthy",
        "service": "playlist-analyzer",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Handle playlist analysis requests
pub async fn analyze(aggregator: &PlaylistAggregator, query: &AnalyzeQuery) -> Result<AnalyzeResponse> {
    let url = query
        .url
        .as_deref()
        .filter(|url| !url.trim().is_empty())
        .ok_or_else(|| AnalyzerError::invalid_input("Invalid playlist URL"))?;

    let range = Range::new(
        int_param(query.start.as_deref(), 1),
        int_param(query.end.as_deref(), 0),
    );

    let result = aggregator.aggregate(url, range).await?;
    Ok(AnalyzeResponse::from(&result))
}

/// Handle study plan requests
pub async fn plan(query: &PlanQuery, limits: &ScheduleConfig) -> Result<PlanResponse> {
    let total_hours = query
        .total_hours
        .as_deref()
        .and_then(|raw| raw.trim().parse::<f64>().ok())
        .filter(|hours| hours.is_finite() && *hours >= 0.0)
        .ok_or_else(|| AnalyzerError::invalid_input("totalHours must be a non-negative number"))?;
    let speed = parse_speed(query.speed.as_deref().unwrap_or("1x"))?;

    let start = query
        .start
        .as_deref()
        .ok_or_else(|| AnalyzerError::invalid_input("start is required"))?;
    let deadline = query
        .deadline
        .as_deref()
        .ok_or_else(|| AnalyzerError::invalid_input("deadline is required"))?;

    let start = parse_instant(start)?;
    let deadline = parse_instant(deadline)?;

    let span_days = deadline.date().signed_duration_since(start.date()).num_days();
    if span_days > i64::from(limits.max_plan_days) {
        return Err(AnalyzerError::invalid_input(format!(
            "Plans can span at most {} days",
            limits.max_plan_days
        )));
    }

    Ok(schedule::plan(total_hours, speed, start, deadline)
        .map(PlanResponse::from)
        .unwrap_or_else(PlanResponse::not_achievable))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_param() {
        assert_eq!(int_param(None, 1), 1);
        assert_eq!(int_param(Some("7"), 1), 7);
        assert_eq!(int_param(Some(" 3 "), 1), 3);
        assert_eq!(int_param(Some("abc"), 0), 0);
    }

    #[tokio::test]
    async fn test_plan_handler() {
        let query = PlanQuery {
            total_hours: Some("10".to_string()),
            speed: Some("2x".to_string()),
            start: Some("2024-01-01T00:00".to_string()),
            deadline: Some("2024-01-06T00:00".to_string()),
        };
        let response = plan(&query, &ScheduleConfig::default()).await.unwrap();

        assert!(response.achievable);
        assert_eq!(response.study_days, Some(5));
        assert_eq!(response.per_day.as_deref(), Some("1h 0m 0s"));
        assert_eq!(response.day_breakdown.len(), 6);
        assert_eq!(response.day_breakdown[5], "Sat, Jan 6: Revision Only");
    }

    #[tokio::test]
    async fn test_plan_handler_not_achievable() {
        let query = PlanQuery {
            total_hours: Some("3".to_string()),
            speed: None,
            start: Some("2024-01-06T00:00".to_string()),
            deadline: Some("2024-01-06T00:00".to_string()),
        };
        let response = plan(&query, &ScheduleConfig::default()).await.unwrap();
        assert!(!response.achievable);
        assert!(response.day_breakdown.is_empty());
    }

    #[tokio::test]
    async fn test_plan_handler_bad_input() {
        let query = PlanQuery {
            total_hours: Some("3".to_string()),
            speed: Some("zero".to_string()),
            start: Some("2024-01-01".to_string()),
            deadline: Some("2024-01-02".to_string()),
        };
        assert!(plan(&query, &ScheduleConfig::default()).await.unwrap_err().is_invalid_input());
    }

    #[tokio::test]
    async fn test_plan_handler_unreadable_hours() {
        let query = PlanQuery {
            total_hours: Some("abc".to_string()),
            speed: None,
            start: Some("2024-01-01".to_string()),
            deadline: Some("2024-01-03".to_string()),
        };
        let err = plan(&query, &ScheduleConfig::default()).await.unwrap_err();
        assert!(err.is_invalid_input());
        assert_eq!(err.to_string(), "totalHours must be a non-negative number");
    }

    #[tokio::test]
    async fn test_plan_handler_span_limit() {
        let limits = ScheduleConfig { max_plan_days: 30 };
        let query = |deadline: &str| PlanQuery {
            total_hours: Some("1".to_string()),
            speed: None,
            start: Some("2024-01-01T08:00".to_string()),
            deadline: Some(deadline.to_string()),
        };

        let response = plan(&query("2024-01-31T08:00"), &limits).await.unwrap();
        assert_eq!(response.study_days, Some(30));

        let err = plan(&query("2024-02-01T08:00"), &limits).await.unwrap_err();
        assert!(err.is_invalid_input());
        assert_eq!(err.to_string(), "Plans can span at most 30 days");
    }
}
