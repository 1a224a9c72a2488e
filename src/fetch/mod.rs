// src/fetch/mod.rs
// =============================================================================
// Bounded, retrying HTTP fetches.
//
// Submodules:
// - transport: one HTTP attempt and the classification of its failure
// - engine: concurrency cap, retry loop, order-preserving fan-in
// =============================================================================

mod engine;
pub mod transport;

pub use engine::{FetchEngine, FetchResult};
pub use transport::EngineError;
