//! Application state module.
//!
//! Defines the shared application state that is passed to route handlers.

use shared::config::EngineConfig;
use shared::query::QueryService;
use shared::storage::{EventStore, InMemoryEventStore};
use std::sync::Arc;

/// Application state shared across all request handlers.
///
/// Holds the event store the rollup engine reads from and the engine
/// configuration. Handlers build a [`QueryService`] per request; the
/// service itself is stateless.
#[derive(Clone)]
pub struct AppState {
    /// The raw-event read source.
    event_store: Arc<dyn EventStore>,
    /// The rollup engine configuration.
    engine: EngineConfig,
}

impl AppState {
    /// Creates a new application state with the given store and engine
    /// configuration.
    pub fn new(event_store: Arc<dyn EventStore>, engine: EngineConfig) -> Self {
        Self {
            event_store,
            engine,
        }
    }

    /// Creates a new application state with an in-memory store and default
    /// engine configuration.
    ///
    /// This is useful for development and testing.
    #[must_use]
    pub fn with_in_memory_store() -> Self {
        Self {
            event_store: Arc::new(InMemoryEventStore::new()),
            engine: EngineConfig::default(),
        }
    }

    /// Returns a reference to the event store.
    #[must_use]
    pub fn event_store(&self) -> &dyn EventStore {
        self.event_store.as_ref()
    }

    /// Builds a query service over the state's store and configuration.
    #[must_use]
    pub fn query_service(&self) -> QueryService {
        QueryService::new(Arc::clone(&self.event_store), self.engine.clone())
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_in_memory_store()
    }
}
