use crate::domain::{NormalizedRecord, Row};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CleanStats {
    pub total_processed: usize,
    pub duplicates_removed: usize,
    pub invalid_phones: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CleanOutcome {
    pub kept_records: Vec<NormalizedRecord>,
    pub original_rows: Vec<Row>,
    pub stats: CleanStats,
}
