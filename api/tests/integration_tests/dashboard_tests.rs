//! Integration tests for the dashboard aggregate endpoints.
//!
//! Tests cover the full request path: query parameter validation, tenant
//! scoping, window resolution, rollup, and the canonical response schema
//! shared by every endpoint.

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use shared::models::RawMetricEvent;

use super::common::{get, seed_event, test_app, yesterday};

#[tokio::test]
async fn test_overview_totals_and_roi() {
    let (app, store) = test_app();
    store
        .insert_batch(vec![
            seed_event("evt-1", "tenant-1", "youtube", 100.0, 50.0),
            seed_event("evt-2", "tenant-1", "facebook", 200.0, 50.0),
        ])
        .unwrap();

    let (status, response) =
        get(app, "/api/v1/dashboard/overview?tenant_id=tenant-1&range=7d").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["tenant_id"], "tenant-1");
    assert_eq!(response["total_revenue"], 300.0);
    assert_eq!(response["total_spend"], 100.0);
    // Sum-then-divide: (300 - 100) / 100 * 100, not the mean of per-event ROIs.
    assert_eq!(response["roi_percent"], 200.0);
    assert_eq!(response["roi_status"], "defined");
}

#[tokio::test]
async fn test_trends_series_is_complete_and_ascending() {
    let (app, store) = test_app();
    store
        .insert(seed_event("evt-1", "tenant-1", "youtube", 100.0, 50.0))
        .unwrap();

    let (status, response) =
        get(app, "/api/v1/dashboard/trends?tenant_id=tenant-1&range=7d").await;

    assert_eq!(status, StatusCode::OK);
    let days = response["days"].as_array().unwrap();
    assert_eq!(days.len(), 7, "every window day present, no gaps");

    let dates: Vec<&str> = days.iter().map(|d| d["date"].as_str().unwrap()).collect();
    let mut sorted = dates.clone();
    sorted.sort_unstable();
    assert_eq!(dates, sorted, "ascending date order");

    // Days without events are zero-valued with an undefined ROI marker.
    let empty_days: Vec<_> = days
        .iter()
        .filter(|d| d["roi_status"] == "undefined")
        .collect();
    assert_eq!(empty_days.len(), 6);
    for day in empty_days {
        assert_eq!(day["total_revenue"], 0.0);
        assert!(day["roi_percent"].is_null());
    }
}

#[tokio::test]
async fn test_trends_does_not_leak_other_tenants() {
    let (app, store) = test_app();
    store
        .insert_batch(vec![
            seed_event("evt-1", "tenant-a", "youtube", 100.0, 50.0),
            seed_event("evt-2", "tenant-b", "youtube", 9999.0, 1.0),
        ])
        .unwrap();

    let (status, response) =
        get(app, "/api/v1/dashboard/trends?tenant_id=tenant-a&range=7d").await;

    assert_eq!(status, StatusCode::OK);
    let total: f64 = response["days"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["total_revenue"].as_f64().unwrap())
        .sum();
    assert!((total - 100.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_channels_scenario() {
    let (app, store) = test_app();
    store
        .insert_batch(vec![
            seed_event("evt-1", "tenant-1", "youtube", 100.0, 50.0),
            seed_event("evt-2", "tenant-1", "facebook", 200.0, 50.0),
        ])
        .unwrap();

    let (status, response) =
        get(app, "/api/v1/dashboard/channels?tenant_id=tenant-1&range=7d").await;

    assert_eq!(status, StatusCode::OK);
    let channels = response["channels"].as_array().unwrap();
    assert_eq!(channels.len(), 2);

    assert_eq!(channels[0]["platform"], "facebook");
    assert_eq!(channels[0]["roi_percent"], 300.0);
    assert_eq!(channels[0]["efficiency_score"], 100.0);

    assert_eq!(channels[1]["platform"], "youtube");
    assert_eq!(channels[1]["roi_percent"], 100.0);
}

#[tokio::test]
async fn test_revenue_and_cost_breakdowns() {
    let (app, store) = test_app();
    store
        .insert_batch(vec![
            seed_event("evt-1", "tenant-1", "youtube", 100.0, 50.0),
            seed_event("evt-2", "tenant-1", "facebook", 300.0, 25.0),
        ])
        .unwrap();

    let (status, response) =
        get(app.clone(), "/api/v1/dashboard/revenue?tenant_id=tenant-1&range=7d").await;
    assert_eq!(status, StatusCode::OK);
    let sources = response["sources"].as_array().unwrap();
    assert_eq!(sources[0]["platform"], "facebook");
    assert_eq!(sources[0]["share_percent"], 75.0);

    let (status, response) =
        get(app, "/api/v1/dashboard/costs?tenant_id=tenant-1&range=7d").await;
    assert_eq!(status, StatusCode::OK);
    let sources = response["sources"].as_array().unwrap();
    assert_eq!(sources[0]["platform"], "youtube");
    assert_eq!(sources[0]["spend"], 50.0);
    assert!(sources[0]["cost_per_click"].is_null(), "no clicks seeded");
}

#[tokio::test]
async fn test_malformed_rows_are_skipped_and_counted() {
    let (app, store) = test_app();
    let mut no_timestamp = RawMetricEvent::new("evt-3", "tenant-1", "youtube", yesterday());
    no_timestamp.created_at = None;
    store
        .insert_batch(vec![
            seed_event("evt-1", "tenant-1", "youtube", 100.0, 50.0),
            // Negative spend: rejected, counted, other buckets untouched.
            seed_event("evt-2", "tenant-1", "youtube", 10.0, -5.0),
            no_timestamp,
        ])
        .unwrap();

    let (status, response) =
        get(app, "/api/v1/dashboard/overview?tenant_id=tenant-1&range=7d").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["meta"]["skipped_events"], 2);
    assert_eq!(response["total_revenue"], 100.0);
    assert_eq!(response["total_spend"], 50.0);
}

#[tokio::test]
async fn test_zero_spend_with_revenue_is_flagged_unbounded() {
    let (app, store) = test_app();
    store
        .insert(seed_event("evt-1", "tenant-1", "organic", 40.0, 0.0))
        .unwrap();

    let (status, response) =
        get(app, "/api/v1/dashboard/overview?tenant_id=tenant-1&range=7d").await;

    assert_eq!(status, StatusCode::OK);
    assert!(response["roi_percent"].is_null());
    assert_eq!(response["roi_status"], "unbounded");
}

#[tokio::test]
async fn test_range_vocabulary_is_uniform_across_endpoints() {
    for endpoint in ["overview", "trends", "channels", "revenue", "costs"] {
        // Every enumerated token is accepted everywhere.
        for range in ["7d", "30d", "90d"] {
            let (app, _store) = test_app();
            let uri = format!("/api/v1/dashboard/{endpoint}?tenant_id=tenant-1&range={range}");
            let (status, _) = get(app, &uri).await;
            assert_eq!(status, StatusCode::OK, "{endpoint} must accept {range}");
        }

        // Every unknown token is rejected everywhere.
        let (app, _store) = test_app();
        let uri = format!("/api/v1/dashboard/{endpoint}?tenant_id=tenant-1&range=365d");
        let (status, response) = get(app, &uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{endpoint} must reject 365d");
        assert_eq!(response["error"], "invalid_range");
    }
}

#[tokio::test]
async fn test_trends_window_lengths_per_range() {
    let (app, _store) = test_app();
    for (range, expected) in [("7d", 7), ("30d", 30), ("90d", 90)] {
        let uri = format!("/api/v1/dashboard/trends?tenant_id=tenant-1&range={range}");
        let (status, response) = get(app.clone(), &uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(response["days"].as_array().unwrap().len(), expected);
    }
}

#[tokio::test]
async fn test_window_metadata_matches_series() {
    let (app, _store) = test_app();
    let (status, response) =
        get(app, "/api/v1/dashboard/trends?tenant_id=tenant-1&range=7d").await;

    assert_eq!(status, StatusCode::OK);
    let days = response["days"].as_array().unwrap();
    assert_eq!(response["meta"]["range"], "7d");
    assert_eq!(response["meta"]["start_date"], days[0]["date"]);
    assert_eq!(response["meta"]["end_date"], days[6]["date"]);
}

#[tokio::test]
async fn test_repeated_requests_are_stable() {
    let (app, store) = test_app();
    // Many events over several days and platforms to exercise ordering.
    let mut batch = Vec::new();
    for day in 1..=5_i64 {
        for (i, platform) in ["youtube", "facebook", "instagram", "twitter"]
            .iter()
            .enumerate()
        {
            #[allow(clippy::cast_precision_loss)]
            let revenue = (day * 10 + i as i64) as f64;
            batch.push(
                RawMetricEvent::new(
                    format!("evt-{day}-{i}"),
                    "tenant-1",
                    *platform,
                    Utc::now() - Duration::days(day),
                )
                .with_revenue(revenue)
                .with_spend(7.5),
            );
        }
    }
    store.insert_batch(batch).unwrap();

    let (_, first) =
        get(app.clone(), "/api/v1/dashboard/channels?tenant_id=tenant-1&range=7d").await;
    let (_, second) =
        get(app, "/api/v1/dashboard/channels?tenant_id=tenant-1&range=7d").await;

    assert_eq!(first, second, "identical inputs yield identical output");
}
