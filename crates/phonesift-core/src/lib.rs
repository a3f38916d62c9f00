pub mod clean;
pub mod domain;
pub mod dto;
pub mod error;
pub mod rules;

pub use clean::{process_rows, Cleaner, CleanerOptions};
pub use domain::*;
pub use dto::*;
pub use error::CoreError;
pub use rules::*;
