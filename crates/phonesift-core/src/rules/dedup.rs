use crate::domain::phone::{parse_formatted, CanonicalNumber, DEFAULT_TERMINATOR};
use crate::domain::record::NormalizedRecord;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DedupDecision {
    /// Nothing to compare; the record is always kept.
    NoNumbers,
    /// At least one number was not registered before.
    Kept { new_numbers: usize },
    /// Every number was already registered.
    Duplicate,
}

impl DedupDecision {
    pub const fn is_kept(self) -> bool {
        !matches!(self, DedupDecision::Duplicate)
    }
}

/// First-seen-wins duplicate detection over a run-scoped number registry.
#[derive(Debug, Clone)]
pub struct Deduplicator {
    registry: HashSet<CanonicalNumber>,
    terminator: char,
}

impl Default for Deduplicator {
    fn default() -> Self {
        Self::new(DEFAULT_TERMINATOR)
    }
}

impl Deduplicator {
    pub fn new(terminator: char) -> Self {
        Self {
            registry: HashSet::new(),
            terminator,
        }
    }

    pub fn reset(&mut self) {
        self.registry.clear();
    }

    pub fn process(&mut self, numbers: &[CanonicalNumber]) -> DedupDecision {
        if numbers.is_empty() {
            return DedupDecision::NoNumbers;
        }

        let mut new_numbers = 0;
        for number in numbers {
            if self.registry.insert(number.clone()) {
                new_numbers += 1;
            }
        }

        if new_numbers == 0 {
            DedupDecision::Duplicate
        } else {
            DedupDecision::Kept { new_numbers }
        }
    }

    pub fn process_record(&mut self, record: &NormalizedRecord) -> DedupDecision {
        let numbers = parse_formatted(&record.phone, self.terminator);
        self.process(&numbers)
    }

    pub fn contains(&self, number: &CanonicalNumber) -> bool {
        self.registry.contains(number)
    }

    pub fn registered_count(&self) -> usize {
        self.registry.len()
    }
}
