//! Window resolution.
//!
//! Translates a symbolic range token and a reference instant into the
//! concrete, inclusive sequence of calendar-day keys a query must return.
//! Every query operation resolves its window here, so the current-day
//! policy can never diverge across endpoints.

use crate::config::{CurrentDayPolicy, EngineConfig};
use crate::models::{RangeToken, Window};
use crate::query::EngineError;
use crate::rollup::bucketing::day_start_utc;
use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;

/// Resolves a range token against a reference instant.
///
/// `start_date` is the day of `now` in the configured zone minus the range's
/// day count. `end_date` depends on the configured [`CurrentDayPolicy`]:
/// the day before `now` when the still-accumulating current day is excluded,
/// the day of `now` when it is included.
///
/// # Errors
///
/// Returns [`EngineError::InvalidRange`] when the token is outside the
/// deployment's configured range set. The range is never silently defaulted.
pub fn resolve(
    range: RangeToken,
    now: DateTime<Utc>,
    config: &EngineConfig,
) -> Result<Window, EngineError> {
    if !config.accepts(range) {
        return Err(EngineError::InvalidRange {
            token: range.to_string(),
        });
    }

    let today = now.with_timezone(&config.timezone).date_naive();
    let start_date = today - Duration::days(range.days());
    let end_date = match config.current_day {
        CurrentDayPolicy::ExcludeToday => today - Duration::days(1),
        CurrentDayPolicy::IncludeToday => today,
    };

    let bucket_keys: Vec<_> = start_date
        .iter_days()
        .take_while(|day| *day <= end_date)
        .collect();

    Ok(Window {
        range,
        start_date,
        end_date,
        bucket_keys,
    })
}

/// Returns the half-open UTC fetch bounds covering the window: inclusive of
/// the window's first local midnight, exclusive of the midnight after its
/// last day.
#[must_use]
pub fn fetch_bounds(window: &Window, tz: Tz) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = day_start_utc(window.start_date, tz);
    let end = day_start_utc(window.end_date + Duration::days(1), tz);
    (start, end)
}
