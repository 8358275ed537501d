//! Channel rollup.
//!
//! A parallel reduction keyed by platform instead of day, covering the whole
//! requested window. The same sum-then-divide invariant applies: `avg_roi`
//! is derived once from the platform's summed revenue and spend, never from
//! averaging daily ROI values.

use crate::models::{ChannelBucket, CostSlice, MetricEvent, RevenueSlice, Roi, RoiStatus};
use std::collections::BTreeMap;

/// Per-platform running sums over the window.
#[derive(Debug, Clone, Copy, Default)]
struct PlatformSums {
    revenue: f64,
    spend: f64,
    clicks: u64,
}

/// Folds events into per-platform sums in a fixed order. `BTreeMap` keys
/// keep the merge order deterministic for reproducible float summation.
fn platform_sums(events: &[MetricEvent]) -> BTreeMap<String, PlatformSums> {
    let mut ordered: Vec<&MetricEvent> = events.iter().collect();
    ordered.sort_by(|a, b| {
        a.created_at
            .cmp(&b.created_at)
            .then_with(|| a.id.cmp(&b.id))
    });

    let mut sums: BTreeMap<String, PlatformSums> = BTreeMap::new();
    for event in ordered {
        let entry = sums.entry(event.platform.clone()).or_default();
        entry.revenue += event.revenue_generated;
        entry.spend += event.ad_spend;
        entry.clicks += event.clicks;
    }
    sums
}

/// Ordering rank for a window ROI: unbounded outranks every defined value,
/// undefined ranks below all.
fn roi_rank(roi: &Roi) -> (u8, f64) {
    match roi.roi_status {
        RoiStatus::Unbounded => (2, 0.0),
        RoiStatus::Defined => (1, roi.roi_percent.unwrap_or(0.0)),
        RoiStatus::Undefined => (0, 0.0),
    }
}

/// Rolls the window's events up into one `ChannelBucket` per platform,
/// ordered by `avg_roi` descending with ties broken by platform name.
#[must_use]
pub fn rollup_channels(events: &[MetricEvent]) -> Vec<ChannelBucket> {
    let sums = platform_sums(events);

    let rois: BTreeMap<&String, Roi> = sums
        .iter()
        .map(|(platform, s)| (platform, Roi::from_totals(s.revenue, s.spend)))
        .collect();

    // Min-max normalization over the defined window ROIs: the best
    // platform scores 100, the worst 0, linear in between. Unbounded ROI
    // pins to 100, undefined to 0.
    let defined: Vec<f64> = rois.values().filter_map(Roi::as_percent).collect();
    let min = defined.iter().copied().fold(f64::INFINITY, f64::min);
    let max = defined.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let score = |roi: &Roi| -> f64 {
        match roi.roi_status {
            RoiStatus::Unbounded => 100.0,
            RoiStatus::Undefined => 0.0,
            RoiStatus::Defined => {
                let value = roi.roi_percent.unwrap_or(0.0);
                if (max - min).abs() < f64::EPSILON {
                    100.0
                } else {
                    (value - min) / (max - min) * 100.0
                }
            }
        }
    };

    let mut channels: Vec<ChannelBucket> = sums
        .iter()
        .map(|(platform, s)| {
            let avg_roi = rois[platform];
            ChannelBucket {
                platform: platform.clone(),
                revenue: s.revenue,
                spend: s.spend,
                avg_roi,
                efficiency_score: score(&avg_roi),
            }
        })
        .collect();

    channels.sort_by(|a, b| {
        let (rank_a, value_a) = roi_rank(&a.avg_roi);
        let (rank_b, value_b) = roi_rank(&b.avg_roi);
        rank_b
            .cmp(&rank_a)
            .then_with(|| value_b.total_cmp(&value_a))
            .then_with(|| a.platform.cmp(&b.platform))
    });

    channels
}

/// The channel rollup restricted to the revenue metric family: per-platform
/// revenue plus share of the tenant's total window revenue, ordered by
/// revenue descending with ties broken by platform name.
#[must_use]
pub fn revenue_slices(events: &[MetricEvent]) -> Vec<RevenueSlice> {
    let sums = platform_sums(events);
    let total: f64 = sums.values().map(|s| s.revenue).sum();

    let mut slices: Vec<RevenueSlice> = sums
        .into_iter()
        .map(|(platform, s)| RevenueSlice {
            platform,
            revenue: s.revenue,
            share_percent: if total > 0.0 {
                s.revenue / total * 100.0
            } else {
                0.0
            },
        })
        .collect();

    slices.sort_by(|a, b| {
        b.revenue
            .total_cmp(&a.revenue)
            .then_with(|| a.platform.cmp(&b.platform))
    });
    slices
}

/// The channel rollup restricted to the cost metric family: per-platform
/// spend, clicks, and sum-then-divide cost per click (null without clicks),
/// ordered by spend descending with ties broken by platform name.
#[must_use]
pub fn cost_slices(events: &[MetricEvent]) -> Vec<CostSlice> {
    let sums = platform_sums(events);

    let mut slices: Vec<CostSlice> = sums
        .into_iter()
        .map(|(platform, s)| {
            #[allow(clippy::cast_precision_loss)]
            let cost_per_click = (s.clicks > 0).then(|| s.spend / s.clicks as f64);
            CostSlice {
                platform,
                spend: s.spend,
                clicks: s.clicks,
                cost_per_click,
            }
        })
        .collect();

    slices.sort_by(|a, b| {
        b.spend
            .total_cmp(&a.spend)
            .then_with(|| a.platform.cmp(&b.platform))
    });
    slices
}
