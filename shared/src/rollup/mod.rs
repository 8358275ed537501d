//! The rollup engine core.
//!
//! Raw events flow one way through this module: bucketing assigns each
//! validated event a calendar-day key, the daily and channel reducers merge
//! events sharing a key into one aggregate each, and the window resolver
//! decides which keys a query must return.

pub mod bucketing;
pub mod channel;
pub mod daily;
pub mod window;

pub use bucketing::{bucket_key, day_start_utc, partition_events};
pub use channel::{cost_slices, revenue_slices, rollup_channels};
pub use daily::rollup_daily;
pub use window::{fetch_bounds, resolve};
