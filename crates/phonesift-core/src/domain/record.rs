use crate::domain::row::Row;
use serde::Serialize;

/// A cleaned row: the phone column holds the formatted canonical list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedRecord {
    /// Position of the source row in the input sheet.
    pub source_index: usize,
    pub row: Row,
    pub phone: String,
}

impl NormalizedRecord {
    pub fn has_numbers(&self) -> bool {
        !self.phone.is_empty()
    }
}
