//! The tenant-scoped query service.
//!
//! This module is the engine's public contract: it combines window
//! resolution, the event store, and the daily/channel reducers to answer
//! overview, trends, channel-performance, and breakdown requests. Every
//! operation is a pure function of the stored events, the parameters, and
//! the reference instant.

pub mod service;

pub use service::{
    ChannelPerformance, CostBreakdown, EngineError, Overview, QueryMeta, QueryService,
    RevenueBySource, Trends,
};
