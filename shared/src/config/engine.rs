//! Engine configuration.
//!
//! Holds the time zone used for bucketing, the current-day window policy,
//! and the set of range tokens a deployment accepts.

use crate::models::RangeToken;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// How the window resolver treats the still-accumulating current day.
///
/// Whichever policy a deployment picks applies uniformly to trends,
/// overview totals, and channel rollups: every operation resolves its
/// window through the same function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurrentDayPolicy {
    /// The window ends on the most recent complete day. A `7d` window has
    /// exactly 7 bucket keys.
    ExcludeToday,
    /// The window includes the current day with its partial data, summed
    /// and divided like any other day. A `7d` window has 8 bucket keys.
    IncludeToday,
}

/// Engine configuration, passed in at construction time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// The single time zone used for day bucketing across the deployment.
    /// The engine never mixes time zones.
    pub timezone: Tz,

    /// Current-day window policy.
    pub current_day: CurrentDayPolicy,

    /// Range tokens this deployment accepts. Defaults to the full
    /// vocabulary; a token outside this set fails with a validation error.
    pub ranges: Vec<RangeToken>,
}

impl EngineConfig {
    /// Creates a configuration with the default settings: UTC bucketing,
    /// current day excluded, all range tokens enabled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            timezone: chrono_tz::UTC,
            current_day: CurrentDayPolicy::ExcludeToday,
            ranges: RangeToken::all().to_vec(),
        }
    }

    /// Sets the bucketing time zone.
    #[must_use]
    pub fn with_timezone(mut self, timezone: Tz) -> Self {
        self.timezone = timezone;
        self
    }

    /// Sets the current-day policy.
    #[must_use]
    pub fn with_current_day(mut self, policy: CurrentDayPolicy) -> Self {
        self.current_day = policy;
        self
    }

    /// Restricts the accepted range tokens.
    #[must_use]
    pub fn with_ranges(mut self, ranges: Vec<RangeToken>) -> Self {
        self.ranges = ranges;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if no range tokens are enabled.
    pub fn validate(&self) -> Result<(), String> {
        if self.ranges.is_empty() {
            return Err("At least one range token must be enabled".to_string());
        }
        Ok(())
    }

    /// Returns true when the deployment accepts the token.
    #[must_use]
    pub fn accepts(&self, range: RangeToken) -> bool {
        self.ranges.contains(&range)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}
