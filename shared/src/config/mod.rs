//! Configuration module for the Adsight rollup engine.
//!
//! Engine settings are explicit construction-time values, never ambient or
//! global state, so two deployments or two tests can run with different
//! settings without interference.

pub mod engine;

pub use engine::{CurrentDayPolicy, EngineConfig};
