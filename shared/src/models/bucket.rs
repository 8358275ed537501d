//! Derived aggregate shapes.
//!
//! Buckets are engine-owned: constructed fresh per query from the matching
//! events, never mutated after construction, and discarded once the response
//! is built. There is no caching layer in this core.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Whether a ratio could be derived from the summed totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoiStatus {
    /// Spend was positive; `roi_percent` carries the value.
    Defined,
    /// No spend and no revenue. There is nothing to divide.
    Undefined,
    /// Revenue with zero spend. The ratio is unbounded and must be flagged
    /// rather than divided.
    Unbounded,
}

/// The canonical ROI representation used by every aggregate.
///
/// `roi_percent` is always a number or null, never a string and never a
/// silently coerced `0` or infinity. One schema everywhere: daily buckets,
/// channel buckets, and overview totals all serialize ROI through this type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Roi {
    /// `(revenue - spend) / spend * 100`, present only when defined.
    pub roi_percent: Option<f64>,
    /// Whether the ratio is defined, undefined, or unbounded.
    pub roi_status: RoiStatus,
}

impl Roi {
    /// Derives ROI from summed totals. This is the only place the division
    /// happens: numerators and denominators are summed across all
    /// contributing events first, then divided once.
    #[must_use]
    pub fn from_totals(revenue: f64, spend: f64) -> Self {
        if spend > 0.0 {
            Self {
                roi_percent: Some((revenue - spend) / spend * 100.0),
                roi_status: RoiStatus::Defined,
            }
        } else if revenue > 0.0 {
            Self {
                roi_percent: None,
                roi_status: RoiStatus::Unbounded,
            }
        } else {
            Self {
                roi_percent: None,
                roi_status: RoiStatus::Undefined,
            }
        }
    }

    /// Returns the percentage when defined.
    #[must_use]
    pub fn as_percent(&self) -> Option<f64> {
        self.roi_percent
    }

    /// Returns true when the ratio could be derived.
    #[must_use]
    pub fn is_defined(&self) -> bool {
        self.roi_status == RoiStatus::Defined
    }
}

/// Per-platform revenue/spend totals inside a daily bucket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlatformTotals {
    /// Summed revenue for the platform.
    pub revenue: f64,
    /// Summed ad spend for the platform.
    pub spend: f64,
    /// Sum-then-divide ROI scoped to the platform.
    #[serde(flatten)]
    pub roi: Roi,
}

impl PlatformTotals {
    /// Builds platform totals, deriving ROI from the sums.
    #[must_use]
    pub fn new(revenue: f64, spend: f64) -> Self {
        Self {
            revenue,
            spend,
            roi: Roi::from_totals(revenue, spend),
        }
    }
}

/// One calendar day of a tenant's aggregated performance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBucket {
    /// Owning tenant.
    pub tenant_id: String,

    /// The calendar-day bucket key in the configured time zone.
    pub date: NaiveDate,

    /// Per-platform sub-aggregates, ordered by platform name.
    pub platform_breakdown: BTreeMap<String, PlatformTotals>,

    /// Revenue summed across all events and platforms in the bucket.
    pub total_revenue: f64,

    /// Ad spend summed across all events and platforms in the bucket.
    pub total_spend: f64,

    /// ROI derived once from the summed totals.
    #[serde(flatten)]
    pub roi: Roi,
}

impl DailyBucket {
    /// Creates a zero-valued bucket for a day with no events. Trend series
    /// carry these so charts render zero points instead of gaps.
    #[must_use]
    pub fn empty(tenant_id: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            date,
            platform_breakdown: BTreeMap::new(),
            total_revenue: 0.0,
            total_spend: 0.0,
            roi: Roi::from_totals(0.0, 0.0),
        }
    }

    /// Merges two partial buckets for the same day, re-deriving every ratio
    /// from the combined sums. Partial sums are associative and commutative,
    /// so per-platform partials may be computed independently and merged;
    /// ratios are never averaged across partials.
    #[must_use]
    pub fn merge(mut self, other: Self) -> Self {
        for (platform, totals) in other.platform_breakdown {
            let entry = self
                .platform_breakdown
                .entry(platform)
                .or_insert_with(|| PlatformTotals::new(0.0, 0.0));
            *entry = PlatformTotals::new(entry.revenue + totals.revenue, entry.spend + totals.spend);
        }
        self.total_revenue += other.total_revenue;
        self.total_spend += other.total_spend;
        self.roi = Roi::from_totals(self.total_revenue, self.total_spend);
        self
    }
}

/// A platform's aggregated performance over a whole window, used for
/// channel-comparison views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelBucket {
    /// The platform this bucket summarizes.
    pub platform: String,

    /// Revenue summed over the whole window.
    pub revenue: f64,

    /// Ad spend summed over the whole window.
    pub spend: f64,

    /// Sum-then-divide ROI across the window, not an average of daily ROIs.
    #[serde(flatten)]
    pub avg_roi: Roi,

    /// Bounded 0-100 normalization of the platform's ROI relative to the
    /// tenant's best-performing platform in the window.
    pub efficiency_score: f64,
}

/// Per-platform revenue restricted to the revenue metric family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueSlice {
    /// The platform.
    pub platform: String,
    /// Revenue summed over the window.
    pub revenue: f64,
    /// Share of the tenant's total window revenue, in percent.
    pub share_percent: f64,
}

/// Per-platform cost restricted to the spend metric family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostSlice {
    /// The platform.
    pub platform: String,
    /// Ad spend summed over the window.
    pub spend: f64,
    /// Clicks summed over the window.
    pub clicks: u64,
    /// Summed spend divided by summed clicks; null when there are no clicks.
    pub cost_per_click: Option<f64>,
}
