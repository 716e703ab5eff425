//! Sequencing of the upstream lookups and shaping of their results.

pub mod bundle;
pub mod normalizer;
pub mod orchestrator;

pub use bundle::ServerBundle;
pub use normalizer::normalize;
pub use orchestrator::ServerAggregator;
