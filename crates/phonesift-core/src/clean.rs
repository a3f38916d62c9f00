use crate::domain::{CellValue, NormalizedRecord, PhoneNormalizer, Row};
use crate::dto::{CleanOutcome, CleanStats};
use crate::error::CoreError;
use crate::rules::{ColumnSchema, Deduplicator};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanerOptions {
    pub normalizer: PhoneNormalizer,
    pub columns: ColumnSchema,
}

/// Runs normalization and deduplication over one sheet at a time.
#[derive(Debug, Clone)]
pub struct Cleaner {
    options: CleanerOptions,
    dedup: Deduplicator,
}

impl Cleaner {
    pub fn new(options: CleanerOptions) -> Self {
        let dedup = Deduplicator::new(options.normalizer.terminator());
        Self { options, dedup }
    }

    pub fn options(&self) -> &CleanerOptions {
        &self.options
    }

    pub fn registered_count(&self) -> usize {
        self.dedup.registered_count()
    }

    /// Cleans a whole sheet. The registry is reset first, so every call sees
    /// only its own rows. Fails before any row is cleaned when the first row
    /// lacks a required column.
    pub fn process_rows(&mut self, rows: &[Row]) -> Result<CleanOutcome, CoreError> {
        self.dedup.reset();

        let Some(first) = rows.first() else {
            return Ok(CleanOutcome::default());
        };
        let columns = &self.options.columns;
        let display_source = columns.validate(first)?;

        let mut invalid_phones = 0;
        let mut records = Vec::with_capacity(rows.len());
        for (source_index, row) in rows.iter().enumerate() {
            let phone = self.options.normalizer.normalize_cell(row.get(columns.phone()));
            let mut cleaned = columns.canonicalize(row, &display_source);
            cleaned.insert(columns.phone(), CellValue::Text(phone.clone()));
            let record = NormalizedRecord {
                source_index,
                row: cleaned,
                phone,
            };
            if !record.has_numbers() {
                invalid_phones += 1;
            }
            records.push(record);
        }

        let kept_records: Vec<NormalizedRecord> = records
            .into_iter()
            .filter(|record| self.dedup.process_record(record).is_kept())
            .collect();

        let stats = CleanStats {
            total_processed: rows.len(),
            duplicates_removed: rows.len() - kept_records.len(),
            invalid_phones,
        };

        Ok(CleanOutcome {
            kept_records,
            original_rows: rows.to_vec(),
            stats,
        })
    }
}

impl Default for Cleaner {
    fn default() -> Self {
        Self::new(CleanerOptions::default())
    }
}

/// Cleans a sheet with the default local convention and column names.
pub fn process_rows(rows: &[Row]) -> Result<CleanOutcome, CoreError> {
    Cleaner::default().process_rows(rows)
}
