//! Dashboard aggregate endpoints.
//!
//! Exposes the query service operations to the dashboard UI. Every endpoint
//! takes the tenant id and range token as query parameters and uses the
//! request time as the reference instant; the engine itself performs no
//! authentication, only tenant scoping.

use crate::state::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use shared::models::RangeToken;
use shared::query::{
    ChannelPerformance, CostBreakdown, EngineError, Overview, RevenueBySource, Trends,
};

/// Query parameters shared by every dashboard endpoint.
#[derive(Debug, Deserialize)]
pub struct DashboardParams {
    /// The tenant whose aggregates are requested.
    pub tenant_id: String,
    /// The symbolic look-back range ("7d", "30d", "90d").
    pub range: String,
}

/// Error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct DashboardError {
    /// Machine-readable error kind.
    pub error: String,
    /// Human-readable message.
    pub message: String,
}

type ErrorResponse = (StatusCode, Json<DashboardError>);

fn parse_range(token: &str) -> Result<RangeToken, ErrorResponse> {
    token.parse().map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(DashboardError {
                error: "invalid_range".to_string(),
                message: format!("Unknown range token: '{token}'"),
            }),
        )
    })
}

fn engine_error(err: EngineError) -> ErrorResponse {
    match err {
        EngineError::EmptyTenant => (
            StatusCode::BAD_REQUEST,
            Json(DashboardError {
                error: "invalid_tenant".to_string(),
                message: err.to_string(),
            }),
        ),
        EngineError::InvalidRange { .. } => (
            StatusCode::BAD_REQUEST,
            Json(DashboardError {
                error: "invalid_range".to_string(),
                message: err.to_string(),
            }),
        ),
        EngineError::Store(_) => (
            StatusCode::BAD_GATEWAY,
            Json(DashboardError {
                error: "store_error".to_string(),
                message: err.to_string(),
            }),
        ),
    }
}

/// Creates the dashboard routes.
///
/// # Routes
///
/// - `GET /api/v1/dashboard/overview` - whole-window totals
/// - `GET /api/v1/dashboard/trends` - day-bucketed time series
/// - `GET /api/v1/dashboard/channels` - per-platform comparison
/// - `GET /api/v1/dashboard/revenue` - revenue by source
/// - `GET /api/v1/dashboard/costs` - cost breakdown
pub fn dashboard_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/dashboard/overview", get(get_overview))
        .route("/api/v1/dashboard/trends", get(get_trends))
        .route("/api/v1/dashboard/channels", get(get_channels))
        .route("/api/v1/dashboard/revenue", get(get_revenue))
        .route("/api/v1/dashboard/costs", get(get_costs))
        .with_state(state)
}

async fn get_overview(
    State(state): State<AppState>,
    Query(params): Query<DashboardParams>,
) -> Result<Json<Overview>, ErrorResponse> {
    let range = parse_range(&params.range)?;
    state
        .query_service()
        .overview(&params.tenant_id, range, Utc::now())
        .map(Json)
        .map_err(engine_error)
}

async fn get_trends(
    State(state): State<AppState>,
    Query(params): Query<DashboardParams>,
) -> Result<Json<Trends>, ErrorResponse> {
    let range = parse_range(&params.range)?;
    state
        .query_service()
        .trends(&params.tenant_id, range, Utc::now())
        .map(Json)
        .map_err(engine_error)
}

async fn get_channels(
    State(state): State<AppState>,
    Query(params): Query<DashboardParams>,
) -> Result<Json<ChannelPerformance>, ErrorResponse> {
    let range = parse_range(&params.range)?;
    state
        .query_service()
        .channel_performance(&params.tenant_id, range, Utc::now())
        .map(Json)
        .map_err(engine_error)
}

async fn get_revenue(
    State(state): State<AppState>,
    Query(params): Query<DashboardParams>,
) -> Result<Json<RevenueBySource>, ErrorResponse> {
    let range = parse_range(&params.range)?;
    state
        .query_service()
        .revenue_by_source(&params.tenant_id, range, Utc::now())
        .map(Json)
        .map_err(engine_error)
}

async fn get_costs(
    State(state): State<AppState>,
    Query(params): Query<DashboardParams>,
) -> Result<Json<CostBreakdown>, ErrorResponse> {
    let range = parse_range(&params.range)?;
    state
        .query_service()
        .cost_breakdown(&params.tenant_id, range, Utc::now())
        .map(Json)
        .map_err(engine_error)
}
