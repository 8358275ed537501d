//! Event store trait and implementations.
//!
//! Provides the `EventStore` trait for abstracting the raw-event read path
//! and an `InMemoryEventStore` implementation for development and testing.
//! Raw events are owned by the external ingestion path; this engine never
//! writes through the trait, and it never retries a failed fetch.

use crate::models::RawMetricEvent;
use chrono::{DateTime, Utc};
use std::sync::{Arc, RwLock};
use thiserror::Error;

/// Errors that can occur during event store operations.
#[derive(Debug, Error)]
pub enum EventStoreError {
    /// Failed to acquire lock on the store.
    #[error("Failed to acquire lock on event store")]
    LockError,

    /// Generic storage error.
    #[error("Storage error: {0}")]
    StorageError(String),
}

/// Trait for raw-event read access.
///
/// Implementations must be thread-safe (Send + Sync). The contract is a
/// pure read: rows for exactly one tenant, inclusive of `start`, exclusive
/// of `end`, in arbitrary order. The caller sorts and buckets itself.
pub trait EventStore: Send + Sync {
    /// Fetches a tenant's raw events within the half-open range
    /// `[start, end)`. Rows whose timestamp is missing or unparsable may be
    /// returned regardless of range; the engine skips and counts them.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage fails. Failures propagate
    /// unchanged; retries, if any, belong to the implementation.
    fn fetch_events(
        &self,
        tenant_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<RawMetricEvent>, EventStoreError>;
}

/// In-memory event store implementation.
///
/// The insert methods are inherent rather than part of [`EventStore`]
/// because the engine treats the store as read-only; they exist so tests
/// and development setups can seed data.
#[derive(Debug, Default)]
pub struct InMemoryEventStore {
    events: Arc<RwLock<Vec<RawMetricEvent>>>,
}

impl InMemoryEventStore {
    /// Creates a new empty in-memory event store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Creates a new in-memory event store wrapped in an Arc.
    #[must_use]
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Inserts a single raw event.
    ///
    /// # Errors
    ///
    /// Returns an error if the store lock is poisoned.
    pub fn insert(&self, event: RawMetricEvent) -> Result<(), EventStoreError> {
        let mut events = self
            .events
            .write()
            .map_err(|_| EventStoreError::LockError)?;
        events.push(event);
        Ok(())
    }

    /// Inserts multiple raw events.
    ///
    /// # Errors
    ///
    /// Returns an error if the store lock is poisoned.
    pub fn insert_batch(&self, new_events: Vec<RawMetricEvent>) -> Result<(), EventStoreError> {
        let mut events = self
            .events
            .write()
            .map_err(|_| EventStoreError::LockError)?;
        events.extend(new_events);
        Ok(())
    }

    /// Returns the total number of stored events across all tenants.
    ///
    /// # Errors
    ///
    /// Returns an error if the store lock is poisoned.
    pub fn count(&self) -> Result<usize, EventStoreError> {
        let events = self.events.read().map_err(|_| EventStoreError::LockError)?;
        Ok(events.len())
    }

    /// Clears all stored events.
    ///
    /// # Errors
    ///
    /// Returns an error if the store lock is poisoned.
    pub fn clear(&self) -> Result<(), EventStoreError> {
        let mut events = self
            .events
            .write()
            .map_err(|_| EventStoreError::LockError)?;
        events.clear();
        Ok(())
    }
}

impl EventStore for InMemoryEventStore {
    fn fetch_events(
        &self,
        tenant_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<RawMetricEvent>, EventStoreError> {
        let events = self.events.read().map_err(|_| EventStoreError::LockError)?;

        let matching: Vec<RawMetricEvent> = events
            .iter()
            .filter(|e| {
                if e.tenant_id != tenant_id {
                    return false;
                }
                // Rows without a parsable timestamp still belong to the
                // tenant's result set so the engine can count the skip.
                match e.created_at {
                    Some(ts) => ts >= start && ts < end,
                    None => true,
                }
            })
            .cloned()
            .collect();

        Ok(matching)
    }
}

/// `ClickHouse`-backed event store implementation.
///
/// Issues one SQL query per fetch with tenant and half-open time-range
/// predicates. Timestamps are stored as nanosecond epochs.
#[derive(Clone)]
pub struct ClickHouseEventStore {
    client: Arc<clickhouse::Client>,
}

impl ClickHouseEventStore {
    /// Creates a new `ClickHouse` event store with the given client.
    #[must_use]
    pub fn new(client: Arc<clickhouse::Client>) -> Self {
        Self { client }
    }

    /// Creates a new `ClickHouse` event store wrapped in an Arc.
    #[must_use]
    pub fn new_shared(client: Arc<clickhouse::Client>) -> Arc<Self> {
        Arc::new(Self::new(client))
    }

    /// Helper to execute async operations synchronously.
    fn block_on<F, T>(future: F) -> Result<T, EventStoreError>
    where
        F: std::future::Future<Output = Result<T, clickhouse::error::Error>>,
    {
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current()
                .block_on(future)
                .map_err(|e| EventStoreError::StorageError(e.to_string()))
        })
    }
}

impl EventStore for ClickHouseEventStore {
    fn fetch_events(
        &self,
        tenant_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<RawMetricEvent>, EventStoreError> {
        #[derive(clickhouse::Row, serde::Deserialize)]
        struct EventRow {
            id: String,
            tenant_id: String,
            platform: String,
            content_type: String,
            content_category: String,
            views: i64,
            likes: i64,
            comments: i64,
            shares: i64,
            saves: i64,
            clicks: i64,
            ad_spend: f64,
            revenue_generated: f64,
            created_at: i64,
            posted_at: i64,
            updated_at: i64,
        }

        let sql = format!(
            "SELECT id, tenant_id, platform, content_type, content_category, \
             views, likes, comments, shares, saves, clicks, \
             ad_spend, revenue_generated, created_at, posted_at, updated_at \
             FROM metric_events \
             WHERE tenant_id = '{}' AND created_at >= {} AND created_at < {}",
            tenant_id.replace('\'', "''"),
            start.timestamp_nanos_opt().unwrap_or(0),
            end.timestamp_nanos_opt().unwrap_or(0),
        );

        let client = Arc::clone(&self.client);

        Self::block_on(async move {
            let rows: Vec<EventRow> = client.query(&sql).fetch_all::<EventRow>().await?;

            let events: Vec<RawMetricEvent> = rows
                .into_iter()
                .map(|row| {
                    let optional_ts = |nanos: i64| {
                        (nanos != 0).then(|| DateTime::from_timestamp_nanos(nanos))
                    };
                    let optional_tag =
                        |tag: String| if tag.is_empty() { None } else { Some(tag) };

                    RawMetricEvent {
                        id: row.id,
                        tenant_id: row.tenant_id,
                        platform: row.platform,
                        content_type: optional_tag(row.content_type),
                        content_category: optional_tag(row.content_category),
                        views: row.views,
                        likes: row.likes,
                        comments: row.comments,
                        shares: row.shares,
                        saves: row.saves,
                        clicks: row.clicks,
                        ad_spend: row.ad_spend,
                        revenue_generated: row.revenue_generated,
                        cost_per_click: None,
                        cost_per_impression: None,
                        roi_percentage: None,
                        roas_ratio: None,
                        created_at: optional_ts(row.created_at),
                        posted_at: optional_ts(row.posted_at),
                        updated_at: optional_ts(row.updated_at),
                    }
                })
                .collect();

            Ok(events)
        })
    }
}
