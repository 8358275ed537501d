//! Range token vocabulary and resolved windows.
//!
//! `RangeToken` is the single authoritative enumeration of look-back ranges.
//! Every query operation accepts exactly this set; no operation may accept a
//! superset or subset.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// A symbolic look-back range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RangeToken {
    /// The last 7 days.
    #[serde(rename = "7d")]
    Days7,
    /// The last 30 days.
    #[serde(rename = "30d")]
    Days30,
    /// The last 90 days.
    #[serde(rename = "90d")]
    Days90,
}

impl RangeToken {
    /// Returns every token in the vocabulary.
    #[must_use]
    pub const fn all() -> [Self; 3] {
        [Self::Days7, Self::Days30, Self::Days90]
    }

    /// Returns the number of look-back days.
    #[must_use]
    pub const fn days(&self) -> i64 {
        match self {
            Self::Days7 => 7,
            Self::Days30 => 30,
            Self::Days90 => 90,
        }
    }

    /// Returns the wire representation of the token.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Days7 => "7d",
            Self::Days30 => "30d",
            Self::Days90 => "90d",
        }
    }
}

impl std::fmt::Display for RangeToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when a string is not a known range token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown range token: '{0}'")]
pub struct ParseRangeError(pub String);

impl FromStr for RangeToken {
    type Err = ParseRangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "7d" => Ok(Self::Days7),
            "30d" => Ok(Self::Days30),
            "90d" => Ok(Self::Days90),
            other => Err(ParseRangeError(other.to_string())),
        }
    }
}

/// A resolved query window: an ordered, contiguous, inclusive sequence of
/// calendar-day bucket keys. Computed once per query, immutable thereafter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    /// The token the window was resolved from.
    pub range: RangeToken,
    /// First day of the window, inclusive.
    pub start_date: NaiveDate,
    /// Last day of the window, inclusive.
    pub end_date: NaiveDate,
    /// Every day key from `start_date` to `end_date`, ascending.
    pub bucket_keys: Vec<NaiveDate>,
}

impl Window {
    /// Returns the number of day buckets in the window.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bucket_keys.len()
    }

    /// Returns true when the window contains no bucket keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bucket_keys.is_empty()
    }

    /// Returns true when the date falls inside the window.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_tokens() {
        assert_eq!("7d".parse::<RangeToken>().unwrap(), RangeToken::Days7);
        assert_eq!("30d".parse::<RangeToken>().unwrap(), RangeToken::Days30);
        assert_eq!("90d".parse::<RangeToken>().unwrap(), RangeToken::Days90);
    }

    #[test]
    fn test_parse_rejects_unknown_tokens() {
        for bad in ["14d", "7D", "7", "", "week"] {
            let result = bad.parse::<RangeToken>();
            assert!(result.is_err(), "token '{bad}' should be rejected");
        }
    }

    #[test]
    fn test_days() {
        assert_eq!(RangeToken::Days7.days(), 7);
        assert_eq!(RangeToken::Days30.days(), 30);
        assert_eq!(RangeToken::Days90.days(), 90);
    }

    #[test]
    fn test_display_round_trips() {
        for token in RangeToken::all() {
            assert_eq!(token.to_string().parse::<RangeToken>().unwrap(), token);
        }
    }

    #[test]
    fn test_serde_uses_wire_names() {
        assert_eq!(
            serde_json::to_string(&RangeToken::Days7).unwrap(),
            "\"7d\""
        );
        let token: RangeToken = serde_json::from_str("\"30d\"").unwrap();
        assert_eq!(token, RangeToken::Days30);
    }

    #[test]
    fn test_window_contains() {
        let start = NaiveDate::from_ymd_opt(2024, 8, 18).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 8, 24).unwrap();
        let window = Window {
            range: RangeToken::Days7,
            start_date: start,
            end_date: end,
            bucket_keys: start.iter_days().take(7).collect(),
        };

        assert_eq!(window.len(), 7);
        assert!(window.contains(start));
        assert!(window.contains(end));
        assert!(!window.contains(start.pred_opt().unwrap()));
        assert!(!window.contains(end.succ_opt().unwrap()));
    }
}
