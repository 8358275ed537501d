//! Adsight Shared Library
//!
//! This crate contains the metrics rollup engine for the Adsight marketing
//! analytics platform: event models, day/channel aggregation, window
//! resolution, and the tenant-scoped query service.
//!
//! # Modules
//!
//! - [`models`] - Raw and validated metric events, buckets, range tokens
//! - [`config`] - Engine configuration (time zone, window policy, ranges)
//! - [`rollup`] - Bucketing, daily and channel aggregation, window resolver
//! - [`storage`] - Event store trait and implementations
//! - [`query`] - The public query service combining the above
//!
//! # Example
//!
//! ```
//! use shared::config::EngineConfig;
//! use shared::models::RangeToken;
//! use shared::query::QueryService;
//! use shared::storage::InMemoryEventStore;
//!
//! let store = InMemoryEventStore::new_shared();
//! let service = QueryService::new(store, EngineConfig::default());
//!
//! let now = chrono::Utc::now();
//! let trends = service.trends("tenant-1", RangeToken::Days7, now).unwrap();
//! assert_eq!(trends.days.len(), 7);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod models;
pub mod query;
pub mod rollup;
pub mod storage;

/// Re-export common dependencies for convenience.
pub use chrono;
pub use chrono_tz;
pub use serde;
pub use serde_json;
pub use validator;
