pub mod phone;
pub mod record;
pub mod row;

pub use phone::{normalize, normalize_cell, CanonicalNumber, PhoneNormalizer};
pub use record::NormalizedRecord;
pub use row::{CellValue, Row};
