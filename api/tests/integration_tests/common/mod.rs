//! Common test utilities and helpers for integration tests.
//!
//! This module provides shared functionality used across all integration
//! tests, including test app setup, store seeding, and HTTP request helpers.

use api::{create_router, AppState};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{DateTime, Duration, Utc};
use http_body_util::BodyExt;
use serde_json::Value;
use shared::config::EngineConfig;
use shared::models::RawMetricEvent;
use shared::storage::InMemoryEventStore;
use std::sync::Arc;

/// Creates a test router over a fresh in-memory event store.
///
/// # Returns
///
/// A tuple containing the configured router and the store handle for
/// seeding events.
pub fn test_app() -> (Router, Arc<InMemoryEventStore>) {
    let store = InMemoryEventStore::new_shared();
    let state = AppState::new(store.clone(), EngineConfig::default());
    let router = create_router(state);
    (router, store)
}

/// A timestamp inside yesterday, which the default exclude-today policy
/// always places inside every window.
pub fn yesterday() -> DateTime<Utc> {
    Utc::now() - Duration::days(1)
}

/// Builds a raw event for the given tenant with revenue and spend set.
pub fn seed_event(
    id: &str,
    tenant: &str,
    platform: &str,
    revenue: f64,
    spend: f64,
) -> RawMetricEvent {
    RawMetricEvent::new(id, tenant, platform, yesterday())
        .with_revenue(revenue)
        .with_spend(spend)
}

/// Helper to make a GET request.
///
/// # Arguments
///
/// * `app` - The Axum router to send the request to
/// * `uri` - The URI path to GET from
///
/// # Returns
///
/// A tuple containing the response status code and parsed JSON response body.
pub async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = tower::ServiceExt::oneshot(
        app,
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap();

    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

    (status, json)
}
