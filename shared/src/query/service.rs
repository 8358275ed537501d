//! Query service implementation.
//!
//! Each operation fetches the tenant's raw events once, partitions out
//! malformed rows, and reduces the remainder. The service holds no mutable
//! state: two calls with identical parameters against an unchanged store
//! return identical responses.

use crate::config::EngineConfig;
use crate::models::{
    ChannelBucket, CostSlice, DailyBucket, MetricEvent, RangeToken, RevenueSlice, Roi, Window,
};
use crate::rollup::{
    cost_slices, fetch_bounds, partition_events, resolve, revenue_slices, rollup_channels,
    rollup_daily,
};
use crate::storage::{EventStore, EventStoreError};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Errors returned by the query service.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The caller supplied an empty tenant id. Tenant scoping is asserted
    /// before the adapter is touched.
    #[error("tenant id must not be empty")]
    EmptyTenant,

    /// The caller supplied a range token outside the configured set. The
    /// request fails whole; no range is ever silently defaulted.
    #[error("unsupported range token: '{token}'")]
    InvalidRange {
        /// The rejected token.
        token: String,
    },

    /// The event store failed. Propagated unchanged; the engine performs
    /// no retries and fabricates no partial results.
    #[error("event store error: {0}")]
    Store(#[from] EventStoreError),
}

/// Metadata embedded in every query response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryMeta {
    /// The requested range token.
    pub range: RangeToken,
    /// First day of the resolved window, inclusive.
    pub start_date: NaiveDate,
    /// Last day of the resolved window, inclusive.
    pub end_date: NaiveDate,
    /// Number of malformed rows skipped while aggregating. Surfaced here
    /// so a bad row is visible diagnostics, never a hidden data loss.
    pub skipped_events: usize,
}

/// Whole-window totals for the overview cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Overview {
    /// The tenant the totals belong to.
    pub tenant_id: String,
    /// Revenue summed over the whole window.
    pub total_revenue: f64,
    /// Ad spend summed over the whole window.
    pub total_spend: f64,
    /// ROI derived once from the window sums.
    #[serde(flatten)]
    pub roi: Roi,
    /// Views summed over the whole window.
    pub total_views: u64,
    /// Clicks summed over the whole window.
    pub total_clicks: u64,
    /// Response metadata.
    pub meta: QueryMeta,
}

/// Day-bucketed time series for trend charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trends {
    /// The tenant the series belongs to.
    pub tenant_id: String,
    /// One bucket per window day, ascending, zero-valued days included.
    pub days: Vec<DailyBucket>,
    /// Response metadata.
    pub meta: QueryMeta,
}

/// Cross-platform comparison for channel views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelPerformance {
    /// The tenant the channels belong to.
    pub tenant_id: String,
    /// One bucket per platform, ordered by window ROI descending.
    pub channels: Vec<ChannelBucket>,
    /// Response metadata.
    pub meta: QueryMeta,
}

/// Per-platform revenue breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueBySource {
    /// The tenant the breakdown belongs to.
    pub tenant_id: String,
    /// One slice per platform, ordered by revenue descending.
    pub sources: Vec<RevenueSlice>,
    /// Response metadata.
    pub meta: QueryMeta,
}

/// Per-platform cost breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    /// The tenant the breakdown belongs to.
    pub tenant_id: String,
    /// One slice per platform, ordered by spend descending.
    pub sources: Vec<CostSlice>,
    /// Response metadata.
    pub meta: QueryMeta,
}

/// The public query service.
///
/// # Example
///
/// ```
/// use shared::config::EngineConfig;
/// use shared::models::RangeToken;
/// use shared::query::QueryService;
/// use shared::storage::InMemoryEventStore;
///
/// let service = QueryService::new(InMemoryEventStore::new_shared(), EngineConfig::default());
/// let overview = service
///     .overview("tenant-1", RangeToken::Days30, chrono::Utc::now())
///     .unwrap();
/// assert_eq!(overview.total_revenue, 0.0);
/// ```
#[derive(Clone)]
pub struct QueryService {
    store: Arc<dyn EventStore>,
    config: EngineConfig,
}

impl QueryService {
    /// Creates a query service over the given store and configuration.
    pub fn new(store: Arc<dyn EventStore>, config: EngineConfig) -> Self {
        Self { store, config }
    }

    /// Returns the engine configuration the service was built with.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Resolves the window, fetches the tenant's rows once, and partitions
    /// out malformed ones. Shared by every operation so tenant scoping and
    /// the current-day policy cannot diverge across endpoints.
    fn load_window(
        &self,
        tenant_id: &str,
        range: RangeToken,
        now: DateTime<Utc>,
    ) -> Result<(Window, Vec<MetricEvent>, usize), EngineError> {
        if tenant_id.trim().is_empty() {
            return Err(EngineError::EmptyTenant);
        }

        let window = resolve(range, now, &self.config)?;
        let (start, end) = fetch_bounds(&window, self.config.timezone);
        let raw = self.store.fetch_events(tenant_id, start, end)?;
        let (mut events, skipped) = partition_events(raw);

        // A store that returns foreign rows must not leak into aggregates.
        events.retain(|e| e.tenant_id == tenant_id);

        Ok((window, events, skipped))
    }

    fn meta(window: &Window, skipped: usize) -> QueryMeta {
        QueryMeta {
            range: window.range,
            start_date: window.start_date,
            end_date: window.end_date,
            skipped_events: skipped,
        }
    }

    /// Sums the whole resolved window into overview totals.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] for an empty tenant, a rejected range token,
    /// or a store failure.
    pub fn overview(
        &self,
        tenant_id: &str,
        range: RangeToken,
        now: DateTime<Utc>,
    ) -> Result<Overview, EngineError> {
        let (window, events, skipped) = self.load_window(tenant_id, range, now)?;

        let mut total_revenue = 0.0;
        let mut total_spend = 0.0;
        let mut total_views: u64 = 0;
        let mut total_clicks: u64 = 0;

        // The fetch is already window-bounded; fold in fixed order anyway
        // so float totals are reproducible for identical inputs.
        let mut ordered: Vec<&MetricEvent> = events.iter().collect();
        ordered.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        for event in ordered {
            total_revenue += event.revenue_generated;
            total_spend += event.ad_spend;
            total_views += event.views;
            total_clicks += event.clicks;
        }

        Ok(Overview {
            tenant_id: tenant_id.to_string(),
            total_revenue,
            total_spend,
            roi: Roi::from_totals(total_revenue, total_spend),
            total_views,
            total_clicks,
            meta: Self::meta(&window, skipped),
        })
    }

    /// Returns one daily bucket per window day, ascending, including
    /// zero-valued days.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] for an empty tenant, a rejected range token,
    /// or a store failure.
    pub fn trends(
        &self,
        tenant_id: &str,
        range: RangeToken,
        now: DateTime<Utc>,
    ) -> Result<Trends, EngineError> {
        let (window, events, skipped) = self.load_window(tenant_id, range, now)?;
        let days = rollup_daily(tenant_id, &window, &events, self.config.timezone);

        Ok(Trends {
            tenant_id: tenant_id.to_string(),
            days,
            meta: Self::meta(&window, skipped),
        })
    }

    /// Returns per-platform window rollups ordered by ROI.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] for an empty tenant, a rejected range token,
    /// or a store failure.
    pub fn channel_performance(
        &self,
        tenant_id: &str,
        range: RangeToken,
        now: DateTime<Utc>,
    ) -> Result<ChannelPerformance, EngineError> {
        let (window, events, skipped) = self.load_window(tenant_id, range, now)?;
        let channels = rollup_channels(&events);

        Ok(ChannelPerformance {
            tenant_id: tenant_id.to_string(),
            channels,
            meta: Self::meta(&window, skipped),
        })
    }

    /// Returns the revenue metric family per platform.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] for an empty tenant, a rejected range token,
    /// or a store failure.
    pub fn revenue_by_source(
        &self,
        tenant_id: &str,
        range: RangeToken,
        now: DateTime<Utc>,
    ) -> Result<RevenueBySource, EngineError> {
        let (window, events, skipped) = self.load_window(tenant_id, range, now)?;
        let sources = revenue_slices(&events);

        Ok(RevenueBySource {
            tenant_id: tenant_id.to_string(),
            sources,
            meta: Self::meta(&window, skipped),
        })
    }

    /// Returns the cost metric family per platform.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] for an empty tenant, a rejected range token,
    /// or a store failure.
    pub fn cost_breakdown(
        &self,
        tenant_id: &str,
        range: RangeToken,
        now: DateTime<Utc>,
    ) -> Result<CostBreakdown, EngineError> {
        let (window, events, skipped) = self.load_window(tenant_id, range, now)?;
        let sources = cost_slices(&events);

        Ok(CostBreakdown {
            tenant_id: tenant_id.to_string(),
            sources,
            meta: Self::meta(&window, skipped),
        })
    }
}
