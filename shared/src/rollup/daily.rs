//! Daily aggregation.
//!
//! Reduces all events sharing a calendar-day key into one `DailyBucket`.
//! Revenue and spend are summed across all events and platforms first, then
//! ROI is derived once. Per-event ratio fields are never read: averaging
//! ratios of differently-weighted denominators produces a meaningless
//! number, so the only operation here is sum-then-divide.

use crate::models::{DailyBucket, MetricEvent, PlatformTotals, Roi, Window};
use crate::rollup::bucketing::bucket_key;
use chrono::NaiveDate;
use chrono_tz::Tz;
use std::collections::BTreeMap;

/// Rolls a tenant's window events up into one bucket per window day,
/// ascending, with zero-valued buckets for days without events.
///
/// Events are folded in a fixed `(created_at, id)` order and platforms are
/// kept in ordered maps, so identical inputs always produce identical
/// output, down to floating-point summation order.
#[must_use]
pub fn rollup_daily(
    tenant_id: &str,
    window: &Window,
    events: &[MetricEvent],
    tz: Tz,
) -> Vec<DailyBucket> {
    let mut ordered: Vec<&MetricEvent> = events.iter().collect();
    ordered.sort_by(|a, b| {
        a.created_at
            .cmp(&b.created_at)
            .then_with(|| a.id.cmp(&b.id))
    });

    let mut by_day: BTreeMap<NaiveDate, Vec<&MetricEvent>> = BTreeMap::new();
    for event in ordered {
        let key = bucket_key(event.created_at, tz);
        // The fetch bounds already cover exactly the window; anything
        // outside is a store inconsistency and must not leak into a bucket.
        if window.contains(key) {
            by_day.entry(key).or_default().push(event);
        }
    }

    window
        .bucket_keys
        .iter()
        .map(|date| match by_day.get(date) {
            Some(day_events) => aggregate_day(tenant_id, *date, day_events),
            None => DailyBucket::empty(tenant_id, *date),
        })
        .collect()
}

/// Reduces the events of one day into a single bucket.
fn aggregate_day(tenant_id: &str, date: NaiveDate, events: &[&MetricEvent]) -> DailyBucket {
    let mut platform_sums: BTreeMap<String, (f64, f64)> = BTreeMap::new();
    let mut total_revenue = 0.0;
    let mut total_spend = 0.0;

    for event in events {
        total_revenue += event.revenue_generated;
        total_spend += event.ad_spend;

        let entry = platform_sums.entry(event.platform.clone()).or_insert((0.0, 0.0));
        entry.0 += event.revenue_generated;
        entry.1 += event.ad_spend;
    }

    let platform_breakdown = platform_sums
        .into_iter()
        .map(|(platform, (revenue, spend))| (platform, PlatformTotals::new(revenue, spend)))
        .collect();

    DailyBucket {
        tenant_id: tenant_id.to_string(),
        date,
        platform_breakdown,
        total_revenue,
        total_spend,
        roi: Roi::from_totals(total_revenue, total_spend),
    }
}
