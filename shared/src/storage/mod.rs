//! Storage traits and implementations.
//!
//! This module provides the abstraction over the raw-event store. The
//! `EventStore` trait is the engine's single I/O boundary: a pure read
//! source returning raw rows for one tenant within a timestamp range.

pub mod event_store;

pub use event_store::{
    ClickHouseEventStore, EventStore, EventStoreError, InMemoryEventStore,
};
