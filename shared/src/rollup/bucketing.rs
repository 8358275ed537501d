//! Day bucketing and malformed-row partitioning.
//!
//! Every event maps to exactly one calendar-day key: its `created_at`
//! truncated to midnight in the single configured time zone. Rows that fail
//! validation are partitioned out with a skip count before any bucketing
//! runs; they never fall into a default bucket.

use crate::models::{MetricEvent, RawMetricEvent};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Returns the calendar-day bucket key for a timestamp in the given zone.
#[must_use]
pub fn bucket_key(created_at: DateTime<Utc>, tz: Tz) -> NaiveDate {
    created_at.with_timezone(&tz).date_naive()
}

/// Returns the UTC instant at which the given local calendar day begins.
#[must_use]
pub fn day_start_utc(date: NaiveDate, tz: Tz) -> DateTime<Utc> {
    let midnight = date.and_time(NaiveTime::MIN);
    // Some zones skip midnight on a DST transition; take the earliest valid
    // instant of the day in that case.
    for offset_hours in 0..3 {
        let candidate = midnight + Duration::hours(offset_hours);
        if let Some(local) = tz.from_local_datetime(&candidate).earliest() {
            return local.with_timezone(&Utc);
        }
    }
    Utc.from_utc_datetime(&midnight)
}

/// Validates a batch of raw rows, returning the events that survive and the
/// count of skipped rows. Each skip is logged at WARN with its reason.
#[must_use]
pub fn partition_events(raw: Vec<RawMetricEvent>) -> (Vec<MetricEvent>, usize) {
    let mut events = Vec::with_capacity(raw.len());
    let mut skipped = 0;

    for row in raw {
        match MetricEvent::try_from(row) {
            Ok(event) => events.push(event),
            Err(reason) => {
                tracing::warn!(%reason, "skipping malformed metric event");
                skipped += 1;
            }
        }
    }

    (events, skipped)
}
