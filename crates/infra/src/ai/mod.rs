//! AI orchestration adapters.
//!
//! Narratives are optional: failures are logged and isolated so they never
//! affect the forecast itself.

pub mod narrator;

pub use narrator::{InMemoryNarrativeSink, NarrativeSink, Narrator};
