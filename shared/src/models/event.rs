//! Metric event data model.
//!
//! Defines the raw event row shape returned by the event store and the
//! validated event the rollup engine aggregates. Raw events are owned by the
//! external ingestion path; the engine only ever reads them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use validator::Validate;

/// A raw metric event row as returned by the event store, before validation.
///
/// Counters are signed at this layer: a negative value is a malformed row to
/// be rejected during validation, not a type error at the store boundary.
/// `created_at` deserializes leniently so that one unparsable timestamp never
/// fails a whole batch; it surfaces as `None` and is rejected per-row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawMetricEvent {
    /// Unique event identifier.
    pub id: String,

    /// Owning tenant. Every aggregate is scoped to exactly one tenant.
    pub tenant_id: String,

    /// Source platform (e.g. "youtube", "facebook", "instagram", "twitter").
    pub platform: String,

    /// Descriptive content tag, passed through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,

    /// Descriptive category tag, passed through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_category: Option<String>,

    /// View count.
    #[serde(default)]
    pub views: i64,
    /// Like count.
    #[serde(default)]
    pub likes: i64,
    /// Comment count.
    #[serde(default)]
    pub comments: i64,
    /// Share count.
    #[serde(default)]
    pub shares: i64,
    /// Save count.
    #[serde(default)]
    pub saves: i64,
    /// Click count.
    #[serde(default)]
    pub clicks: i64,

    /// Ad spend in currency-agnostic units.
    #[serde(default)]
    pub ad_spend: f64,

    /// Generated revenue in currency-agnostic units.
    #[serde(default)]
    pub revenue_generated: f64,

    /// Precomputed per-event ratio. Informational only; never read by any
    /// rollup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_per_click: Option<f64>,
    /// Precomputed per-event ratio. Informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_per_impression: Option<f64>,
    /// Precomputed per-event ratio. Informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roi_percentage: Option<f64>,
    /// Precomputed per-event ratio. Informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roas_ratio: Option<f64>,

    /// Ingestion timestamp. The single authoritative field for bucketing
    /// and window filtering.
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub created_at: Option<DateTime<Utc>>,

    /// Original posting time. Informational, not used for bucketing.
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub posted_at: Option<DateTime<Utc>>,

    /// Last update time. Informational, not used for bucketing.
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Deserializes a timestamp from an RFC 3339 string or integer unix
/// nanoseconds, mapping anything unparsable to `None`.
fn lenient_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        serde_json::Value::String(s) => DateTime::parse_from_rfc3339(&s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        serde_json::Value::Number(n) => n.as_i64().map(DateTime::from_timestamp_nanos),
        _ => None,
    }))
}

impl RawMetricEvent {
    /// Creates a raw event with zeroed counters and money fields.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        tenant_id: impl Into<String>,
        platform: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            tenant_id: tenant_id.into(),
            platform: platform.into(),
            content_type: None,
            content_category: None,
            views: 0,
            likes: 0,
            comments: 0,
            shares: 0,
            saves: 0,
            clicks: 0,
            ad_spend: 0.0,
            revenue_generated: 0.0,
            cost_per_click: None,
            cost_per_impression: None,
            roi_percentage: None,
            roas_ratio: None,
            created_at: Some(created_at),
            posted_at: None,
            updated_at: None,
        }
    }

    /// Sets the revenue field.
    #[must_use]
    pub fn with_revenue(mut self, revenue: f64) -> Self {
        self.revenue_generated = revenue;
        self
    }

    /// Sets the ad spend field.
    #[must_use]
    pub fn with_spend(mut self, spend: f64) -> Self {
        self.ad_spend = spend;
        self
    }

    /// Sets the view counter.
    #[must_use]
    pub fn with_views(mut self, views: i64) -> Self {
        self.views = views;
        self
    }

    /// Sets the click counter.
    #[must_use]
    pub fn with_clicks(mut self, clicks: i64) -> Self {
        self.clicks = clicks;
        self
    }

    /// Sets the content type tag.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// Errors describing a single malformed event row.
///
/// A malformed row is skipped and counted; it never fails the whole query
/// and never lands in a default bucket.
#[derive(Debug, Error)]
pub enum MalformedEvent {
    /// The event has no parsable `created_at` timestamp.
    #[error("event '{id}' has a missing or unparsable created_at")]
    MissingTimestamp {
        /// The offending event id.
        id: String,
    },

    /// A counter field is negative.
    #[error("event '{id}' has a negative {field} counter")]
    NegativeCounter {
        /// The offending event id.
        id: String,
        /// The counter field name.
        field: &'static str,
    },

    /// A money field is negative or not a finite number.
    #[error("event '{id}' has a negative or non-finite {field}")]
    NegativeMoney {
        /// The offending event id.
        id: String,
        /// The money field name.
        field: &'static str,
    },

    /// Field-level validation failed (empty id, tenant, or platform).
    #[error("event '{id}' failed validation: {source}")]
    Invalid {
        /// The offending event id.
        id: String,
        /// The underlying validation errors.
        source: validator::ValidationErrors,
    },
}

/// A validated metric event, the unit the rollup engine aggregates.
///
/// # Example
///
/// ```
/// use chrono::Utc;
/// use shared::models::{MetricEvent, RawMetricEvent};
///
/// let raw = RawMetricEvent::new("evt-1", "tenant-1", "youtube", Utc::now())
///     .with_revenue(100.0)
///     .with_spend(50.0);
///
/// let event = MetricEvent::try_from(raw).unwrap();
/// assert_eq!(event.revenue_generated, 100.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct MetricEvent {
    /// Unique event identifier.
    #[validate(length(min = 1, message = "Event id cannot be empty"))]
    pub id: String,

    /// Owning tenant.
    #[validate(length(min = 1, message = "Tenant id cannot be empty"))]
    pub tenant_id: String,

    /// Source platform.
    #[validate(length(min = 1, message = "Platform cannot be empty"))]
    pub platform: String,

    /// Descriptive content tag.
    pub content_type: Option<String>,
    /// Descriptive category tag.
    pub content_category: Option<String>,

    /// View count.
    pub views: u64,
    /// Like count.
    pub likes: u64,
    /// Comment count.
    pub comments: u64,
    /// Share count.
    pub shares: u64,
    /// Save count.
    pub saves: u64,
    /// Click count.
    pub clicks: u64,

    /// Ad spend, non-negative.
    pub ad_spend: f64,
    /// Generated revenue, non-negative.
    pub revenue_generated: f64,

    /// Precomputed per-event ratio, carried through untouched. No rollup
    /// ever reads it; every aggregate ratio is re-derived from sums.
    pub cost_per_click: Option<f64>,
    /// Precomputed per-event ratio, carried through untouched.
    pub cost_per_impression: Option<f64>,
    /// Precomputed per-event ratio, carried through untouched.
    pub roi_percentage: Option<f64>,
    /// Precomputed per-event ratio, carried through untouched.
    pub roas_ratio: Option<f64>,

    /// Ingestion timestamp, authoritative for bucketing.
    pub created_at: DateTime<Utc>,
    /// Original posting time, informational.
    pub posted_at: Option<DateTime<Utc>>,
    /// Last update time, informational.
    pub updated_at: Option<DateTime<Utc>>,
}

impl TryFrom<RawMetricEvent> for MetricEvent {
    type Error = MalformedEvent;

    fn try_from(raw: RawMetricEvent) -> Result<Self, Self::Error> {
        let Some(created_at) = raw.created_at else {
            return Err(MalformedEvent::MissingTimestamp { id: raw.id });
        };

        let id = raw.id.clone();
        let counter = |value: i64, field: &'static str| -> Result<u64, MalformedEvent> {
            u64::try_from(value).map_err(|_| MalformedEvent::NegativeCounter {
                id: id.clone(),
                field,
            })
        };
        let money = |value: f64, field: &'static str| -> Result<f64, MalformedEvent> {
            // `>= 0.0` is false for NaN as well, so non-finite garbage is
            // rejected by the same check.
            if value >= 0.0 && value.is_finite() {
                Ok(value)
            } else {
                Err(MalformedEvent::NegativeMoney {
                    id: id.clone(),
                    field,
                })
            }
        };

        let event = Self {
            views: counter(raw.views, "views")?,
            likes: counter(raw.likes, "likes")?,
            comments: counter(raw.comments, "comments")?,
            shares: counter(raw.shares, "shares")?,
            saves: counter(raw.saves, "saves")?,
            clicks: counter(raw.clicks, "clicks")?,
            ad_spend: money(raw.ad_spend, "ad_spend")?,
            revenue_generated: money(raw.revenue_generated, "revenue_generated")?,
            cost_per_click: raw.cost_per_click,
            cost_per_impression: raw.cost_per_impression,
            roi_percentage: raw.roi_percentage,
            roas_ratio: raw.roas_ratio,
            id: raw.id,
            tenant_id: raw.tenant_id,
            platform: raw.platform,
            content_type: raw.content_type,
            content_category: raw.content_category,
            created_at,
            posted_at: raw.posted_at,
            updated_at: raw.updated_at,
        };

        if let Err(source) = event.validate() {
            return Err(MalformedEvent::Invalid {
                id: event.id,
                source,
            });
        }

        Ok(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(id: &str) -> RawMetricEvent {
        RawMetricEvent::new(id, "tenant-1", "youtube", Utc::now())
    }

    #[test]
    fn test_valid_event_converts() {
        let event = MetricEvent::try_from(
            raw("evt-1")
                .with_revenue(100.0)
                .with_spend(50.0)
                .with_views(1000)
                .with_clicks(42),
        )
        .unwrap();

        assert_eq!(event.id, "evt-1");
        assert_eq!(event.views, 1000);
        assert_eq!(event.clicks, 42);
        assert_eq!(event.revenue_generated, 100.0);
        assert_eq!(event.ad_spend, 50.0);
    }

    #[test]
    fn test_missing_timestamp_rejected() {
        let mut event = raw("evt-1");
        event.created_at = None;

        let result = MetricEvent::try_from(event);
        assert!(matches!(
            result,
            Err(MalformedEvent::MissingTimestamp { id }) if id == "evt-1"
        ));
    }

    #[test]
    fn test_negative_counter_rejected() {
        let result = MetricEvent::try_from(raw("evt-1").with_views(-3));
        assert!(matches!(
            result,
            Err(MalformedEvent::NegativeCounter { field: "views", .. })
        ));
    }

    #[test]
    fn test_negative_spend_rejected() {
        let result = MetricEvent::try_from(raw("evt-1").with_spend(-5.0));
        assert!(matches!(
            result,
            Err(MalformedEvent::NegativeMoney {
                field: "ad_spend",
                ..
            })
        ));
    }

    #[test]
    fn test_nan_revenue_rejected() {
        let result = MetricEvent::try_from(raw("evt-1").with_revenue(f64::NAN));
        assert!(matches!(
            result,
            Err(MalformedEvent::NegativeMoney {
                field: "revenue_generated",
                ..
            })
        ));
    }

    #[test]
    fn test_empty_tenant_rejected() {
        let event = RawMetricEvent::new("evt-1", "", "youtube", Utc::now());
        let result = MetricEvent::try_from(event);
        assert!(matches!(result, Err(MalformedEvent::Invalid { .. })));
    }

    #[test]
    fn test_lenient_timestamp_rfc3339() {
        let json = r#"{
            "id": "evt-1",
            "tenant_id": "tenant-1",
            "platform": "youtube",
            "created_at": "2024-08-23T10:30:00Z"
        }"#;

        let event: RawMetricEvent = serde_json::from_str(json).unwrap();
        assert_eq!(
            event.created_at.unwrap().to_rfc3339(),
            "2024-08-23T10:30:00+00:00"
        );
    }

    #[test]
    fn test_lenient_timestamp_nanos() {
        let json = r#"{
            "id": "evt-1",
            "tenant_id": "tenant-1",
            "platform": "youtube",
            "created_at": 1724409000000000000
        }"#;

        let event: RawMetricEvent = serde_json::from_str(json).unwrap();
        assert!(event.created_at.is_some());
    }

    #[test]
    fn test_lenient_timestamp_garbage_is_none() {
        let json = r#"{
            "id": "evt-1",
            "tenant_id": "tenant-1",
            "platform": "youtube",
            "created_at": "not a timestamp"
        }"#;

        let event: RawMetricEvent = serde_json::from_str(json).unwrap();
        assert!(event.created_at.is_none());
    }

    #[test]
    fn test_precomputed_ratios_pass_through() {
        let json = r#"{
            "id": "evt-1",
            "tenant_id": "tenant-1",
            "platform": "youtube",
            "created_at": "2024-08-23T10:30:00Z",
            "roi_percentage": 250.0,
            "roas_ratio": 3.5
        }"#;

        let event: RawMetricEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.roi_percentage, Some(250.0));
        assert_eq!(event.roas_ratio, Some(3.5));
    }
}
