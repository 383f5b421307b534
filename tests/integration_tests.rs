use playlist_analyzer_rust::catalog::InMemoryCatalog;
use playlist_analyzer_rust::playlist::{PageStream, UNKNOWN_CREATOR, UNKNOWN_PLAYLIST};
use playlist_analyzer_rust::{
    plan, AggregatorOptions, Degradation, PlaylistAggregator, PlaylistId, Range, StudyPlan,
};
use std::sync::Arc;

const URL: &str = "https://www.youtube.com/watch?v=first&list=PLcourse&index=1";

fn course(count: usize, duration: &str) -> InMemoryCatalog {
    let ids: Vec<String> = (0..count).map(|i| format!("vid{}", i)).collect();
    let videos: Vec<(&str, &str)> = ids.iter().map(|id| (id.as_str(), duration)).collect();
    InMemoryCatalog::new(50).with_playlist("PLcourse", Some(("Algorithms", "Prof")), &videos)
}

fn options(concurrent_batches: usize) -> AggregatorOptions {
    AggregatorOptions {
        concurrent_batches,
        ..AggregatorOptions::default()
    }
}

#[tokio::test]
async fn test_pagination_follows_tokens() {
    let catalog = Arc::new(course(237, "PT4M"));
    let aggregator = PlaylistAggregator::new(catalog.clone(), options(4));

    let result = aggregator.aggregate(URL, Range::full()).await.unwrap();

    assert_eq!(result.total_items, 237);
    assert_eq!(result.selected_count, 237);
    assert_eq!(result.total_seconds, 237 * 240);
    assert_eq!(catalog.page_calls(), 5);
    assert_eq!(catalog.batch_calls(), 5);
    assert!(!result.is_degraded());
}

#[tokio::test]
async fn test_concurrency_does_not_change_totals() {
    let sequential = PlaylistAggregator::new(Arc::new(course(333, "PT1H2M3S")), options(1))
        .aggregate(URL, Range::new(7, 300))
        .await
        .unwrap();
    let parallel = PlaylistAggregator::new(Arc::new(course(333, "PT1H2M3S")), options(8))
        .aggregate(URL, Range::new(7, 300))
        .await
        .unwrap();

    assert_eq!(sequential.selected_count, 294);
    assert_eq!(sequential.total_seconds, 294 * 3723);
    assert_eq!(sequential, parallel);
}

#[tokio::test]
async fn test_empty_playlist_is_not_an_error() {
    let catalog = InMemoryCatalog::new(50).with_playlist("PLcourse", Some(("Empty", "Nobody")), &[]);
    let result = PlaylistAggregator::new(Arc::new(catalog), options(2))
        .aggregate(URL, Range::full())
        .await
        .unwrap();

    assert_eq!(result.total_items, 0);
    assert_eq!(result.selected_count, 0);
    assert_eq!(result.total_seconds, 0);
    assert_eq!(result.average_seconds, 0);
    assert_eq!(result.range_label(), "1-0");
}

#[tokio::test]
async fn test_unknown_playlist_degrades_to_empty() {
    let result = PlaylistAggregator::new(Arc::new(course(3, "PT1M")), options(2))
        .aggregate("https://www.youtube.com/playlist?list=PLmissing", Range::full())
        .await
        .unwrap();

    assert_eq!(result.playlist_title, UNKNOWN_PLAYLIST);
    assert_eq!(result.channel_name, UNKNOWN_CREATOR);
    assert_eq!(result.total_items, 0);
}

#[tokio::test]
async fn test_failed_page_keeps_collected_items() {
    let catalog = course(180, "PT2M").with_failing_page(3);
    let result = PlaylistAggregator::new(Arc::new(catalog), options(2))
        .aggregate(URL, Range::full())
        .await
        .unwrap();

    assert_eq!(result.total_items, 100);
    assert_eq!(result.total_seconds, 100 * 120);
    assert!(matches!(
        result.warnings.as_slice(),
        [Degradation::EnumerationStopped { page: 3, .. }]
    ));
}

#[tokio::test]
async fn test_page_limit_stops_enumeration() {
    let catalog = course(180, "PT2M");
    let playlist_id = PlaylistId::from_url(URL).unwrap();

    let (ids, stop) = PageStream::new(&catalog, &playlist_id, 2).collect_ids().await;

    assert_eq!(ids.len(), 100);
    assert_eq!(ids[0], "vid0");
    assert_eq!(ids[99], "vid99");
    assert!(matches!(stop, Some(Degradation::EnumerationStopped { page: 3, .. })));
}

#[tokio::test]
async fn test_start_past_end_selects_nothing() {
    let result = PlaylistAggregator::new(Arc::new(course(10, "PT1M")), options(2))
        .aggregate(URL, Range::new(11, 0))
        .await
        .unwrap();

    assert_eq!(result.total_items, 10);
    assert_eq!(result.selected_count, 0);
    assert_eq!(result.total_seconds, 0);
    assert_eq!(result.average_seconds, 0);
}

#[tokio::test]
async fn test_malformed_url_is_rejected() {
    let err = PlaylistAggregator::new(Arc::new(course(10, "PT1M")), options(2))
        .aggregate("https://www.youtube.com/watch?v=abc", Range::full())
        .await
        .unwrap_err();

    assert!(err.is_invalid_input());
}

#[tokio::test]
async fn test_aggregate_feeds_study_plan() {
    // 20 videos * 30 minutes = 10 hours
    let result = PlaylistAggregator::new(Arc::new(course(20, "PT30M")), options(2))
        .aggregate(URL, Range::full())
        .await
        .unwrap();
    assert_eq!(result.total_hours(), 10.0);

    let start = playlist_analyzer_rust::schedule::parse_instant("2024-01-01T09:00").unwrap();
    let deadline = playlist_analyzer_rust::schedule::parse_instant("2024-01-06T09:00").unwrap();
    let study: StudyPlan = plan(result.total_hours(), 2.0, start, deadline).unwrap();

    assert_eq!(study.study_days, 5);
    assert_eq!(study.hours_per_day, 1.0);
    assert_eq!(study.daily_breakdown.last().map(|day| day.revision_only), Some(true));
}
