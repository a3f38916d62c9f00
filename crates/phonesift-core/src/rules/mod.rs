pub mod dedup;
pub mod validation;

pub use dedup::{DedupDecision, Deduplicator};
pub use validation::ColumnSchema;
