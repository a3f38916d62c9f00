use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("missing required column: {column}{}", accepted_suffix(.accepted))]
    MissingColumn {
        column: String,
        accepted: Vec<String>,
    },
    #[error("invalid country code: {0}")]
    InvalidCountryCode(String),
    #[error("invalid number terminator: {0:?}")]
    InvalidTerminator(char),
    #[error("column name is required")]
    InvalidColumnName,
    #[error("invalid canonical number: {0}")]
    InvalidCanonicalNumber(String),
}

fn accepted_suffix(accepted: &[String]) -> String {
    if accepted.len() < 2 {
        return String::new();
    }
    format!(" (accepted: {})", accepted.join(", "))
}
