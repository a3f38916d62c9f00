use crate::domain::row::CellValue;
use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

pub const TRUNK_PREFIX: char = '0';
pub const INTERNATIONAL_PREFIX: &str = "00";
pub const DEFAULT_COUNTRY_CODE: &str = "855";
pub const DEFAULT_TERMINATOR: char = ';';
pub const MIN_DIGITS: usize = 7;
pub const MAX_DIGITS: usize = 11;

// Country codes are only stripped from numbers longer than this.
const COUNTRY_CODE_MIN_LEN: usize = 8;
const HANDLE_MARKER: char = '@';
const MESSENGER_KEYWORD: &str = "telegram";

/// A digit-only local number: leading trunk prefix, 7 to 11 digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CanonicalNumber(String);

impl CanonicalNumber {
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        if is_canonical(raw) {
            Ok(Self(raw.to_string()))
        } else {
            Err(CoreError::InvalidCanonicalNumber(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CanonicalNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for CanonicalNumber {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if is_canonical(&value) {
            Ok(Self(value))
        } else {
            Err(CoreError::InvalidCanonicalNumber(value))
        }
    }
}

impl From<CanonicalNumber> for String {
    fn from(value: CanonicalNumber) -> Self {
        value.0
    }
}

fn is_canonical(value: &str) -> bool {
    (MIN_DIGITS..=MAX_DIGITS).contains(&value.len())
        && value.starts_with(TRUNK_PREFIX)
        && value.bytes().all(|b| b.is_ascii_digit())
}

/// Turns free-form phone fields into canonical local numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneNormalizer {
    country_code: String,
    terminator: char,
}

impl Default for PhoneNormalizer {
    fn default() -> Self {
        Self {
            country_code: DEFAULT_COUNTRY_CODE.to_string(),
            terminator: DEFAULT_TERMINATOR,
        }
    }
}

impl PhoneNormalizer {
    pub fn new(country_code: &str, terminator: char) -> Result<Self, CoreError> {
        let country_code = country_code.trim();
        if country_code.is_empty() || !country_code.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CoreError::InvalidCountryCode(country_code.to_string()));
        }
        if !is_valid_terminator(terminator) {
            return Err(CoreError::InvalidTerminator(terminator));
        }
        Ok(Self {
            country_code: country_code.to_string(),
            terminator,
        })
    }

    pub fn country_code(&self) -> &str {
        &self.country_code
    }

    pub fn terminator(&self) -> char {
        self.terminator
    }

    /// Normalizes a raw phone field into its formatted canonical list.
    pub fn normalize(&self, raw: &str) -> String {
        self.format_numbers(&self.canonical_numbers(raw))
    }

    /// Only text cells can carry phone numbers.
    pub fn normalize_cell(&self, value: Option<&CellValue>) -> String {
        match value {
            Some(CellValue::Text(raw)) => self.normalize(raw),
            _ => String::new(),
        }
    }

    /// Extracts the distinct canonical numbers of a field in first-seen order.
    pub fn canonical_numbers(&self, raw: &str) -> Vec<CanonicalNumber> {
        let mut seen = HashSet::new();
        let mut numbers = Vec::new();

        for segment in raw.split(|c: char| c == ',' || c == '/') {
            let segment = segment.trim();
            if segment.is_empty() || is_handle_segment(segment) {
                continue;
            }

            let mut found: Vec<CanonicalNumber> = segment
                .split_whitespace()
                .filter_map(|token| self.clean_token(token))
                .collect();
            // "077 123 456" is one number written in groups.
            if found.is_empty() && segment.split_whitespace().all(is_digit_group) {
                found.extend(self.clean_token(segment));
            }

            for number in found {
                if seen.insert(number.clone()) {
                    numbers.push(number);
                }
            }
        }

        numbers
    }

    pub fn clean_token(&self, token: &str) -> Option<CanonicalNumber> {
        let mut digits: String = token.chars().filter(char::is_ascii_digit).collect();
        if digits.is_empty() {
            return None;
        }

        if digits.starts_with(INTERNATIONAL_PREFIX) {
            digits.drain(..INTERNATIONAL_PREFIX.len());
        }

        if digits.len() > COUNTRY_CODE_MIN_LEN && digits.starts_with(self.country_code.as_str()) {
            digits.drain(..self.country_code.len());
        }

        if !digits.starts_with(TRUNK_PREFIX) {
            digits.insert(0, TRUNK_PREFIX);
        }

        if !(MIN_DIGITS..=MAX_DIGITS).contains(&digits.len()) {
            return None;
        }

        Some(CanonicalNumber(digits))
    }

    pub fn format_numbers(&self, numbers: &[CanonicalNumber]) -> String {
        numbers
            .iter()
            .map(|number| format!("{}{}", number, self.terminator))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Reads a formatted field back into its numbers. Tokens that are not
    /// canonical are ignored.
    pub fn parse_numbers(&self, formatted: &str) -> Vec<CanonicalNumber> {
        parse_formatted(formatted, self.terminator)
    }
}

pub(crate) fn parse_formatted(formatted: &str, terminator: char) -> Vec<CanonicalNumber> {
    formatted
        .split_whitespace()
        .filter_map(|token| CanonicalNumber::parse(token.trim_matches(terminator)).ok())
        .collect()
}

fn is_digit_group(token: &str) -> bool {
    token.chars().any(|ch| ch.is_ascii_digit())
        && token.chars().all(|ch| ch.is_ascii_digit() || matches!(ch, '+' | '-'))
}

fn is_handle_segment(segment: &str) -> bool {
    segment.contains(HANDLE_MARKER) || segment.to_ascii_lowercase().contains(MESSENGER_KEYWORD)
}

fn is_valid_terminator(terminator: char) -> bool {
    !terminator.is_ascii_digit() && !terminator.is_whitespace() && !matches!(terminator, ',' | '/')
}

pub fn normalize(raw: &str) -> String {
    PhoneNormalizer::default().normalize(raw)
}

pub fn normalize_cell(value: Option<&CellValue>) -> String {
    PhoneNormalizer::default().normalize_cell(value)
}

#[cfg(test)]
mod tests {
    use super::{normalize, normalize_cell, CanonicalNumber, PhoneNormalizer};
    use crate::domain::row::CellValue;
    use crate::error::CoreError;

    #[test]
    fn normalize_keeps_canonical_numbers() {
        for raw in ["0123456", "012345678", "01234567890", "077123456"] {
            assert_eq!(normalize(raw), format!("{raw};"));
        }
    }

    #[test]
    fn normalize_rejects_empty_and_non_numeric() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
        assert_eq!(normalize("abc"), "");
        assert_eq!(normalize_cell(None), "");
        assert_eq!(normalize_cell(Some(&CellValue::Empty)), "");
    }

    #[test]
    fn normalize_ignores_numeric_cells() {
        assert_eq!(normalize_cell(Some(&CellValue::Number(77123456.0))), "");
        assert_eq!(
            normalize_cell(Some(&CellValue::Text("77123456".to_string()))),
            "077123456;"
        );
    }

    #[test]
    fn normalize_collapses_repeats_within_a_field() {
        assert_eq!(normalize("077 123 456, 077 123 456"), "077123456;");
        assert_eq!(normalize("077123456, 077-123-456"), "077123456;");
    }

    #[test]
    fn normalize_joins_only_pure_digit_groups() {
        assert_eq!(normalize("+855 77-123 456"), "077123456;");
        assert_eq!(normalize("room 101 floor 2345"), "");
        assert_eq!(normalize("077 123 456 ext"), "");
    }

    #[test]
    fn normalize_strips_international_prefix() {
        assert_eq!(normalize("0077123456"), "077123456;");
        assert_eq!(normalize("0012345678"), "012345678;");
    }

    #[test]
    fn normalize_strips_country_code_on_long_numbers() {
        assert_eq!(normalize("85577123456"), "077123456;");
        assert_eq!(normalize("+855 77123456"), "077123456;");
        assert_eq!(normalize("+85577123456"), "077123456;");
        assert_eq!(normalize("0085577123456"), "077123456;");
    }

    #[test]
    fn normalize_keeps_short_country_code_prefix() {
        // Eight digits is not long enough to carry a country code.
        assert_eq!(normalize("85512345"), "085512345;");
    }

    #[test]
    fn normalize_skips_handle_segments() {
        assert_eq!(normalize("Telegram: @someuser, 077123456"), "077123456;");
        assert_eq!(normalize("TELEGRAM 012345678 / 011222333"), "011222333;");
        assert_eq!(normalize("@handle 012345678"), "");
    }

    #[test]
    fn normalize_splits_on_commas_slashes_and_spaces() {
        assert_eq!(
            normalize("012345678/ 077123456 , 011222333 099888777"),
            "012345678; 077123456; 011222333; 099888777;"
        );
    }

    #[test]
    fn normalize_drops_out_of_range_lengths() {
        assert_eq!(normalize("12345"), "");
        assert_eq!(normalize("0123456789012"), "");
        assert_eq!(normalize("12345, 077123456"), "077123456;");
    }

    #[test]
    fn custom_terminator_and_country_code() {
        let normalizer = PhoneNormalizer::new("44", '|').expect("normalizer");
        assert_eq!(normalizer.normalize("447911123456"), "07911123456|");
        let numbers = normalizer.parse_numbers("07911123456| 012345678|");
        assert_eq!(numbers.len(), 2);
        assert_eq!(numbers[1].as_str(), "012345678");
    }

    #[test]
    fn new_rejects_invalid_settings() {
        assert_eq!(
            PhoneNormalizer::new("+855", ';'),
            Err(CoreError::InvalidCountryCode("+855".to_string()))
        );
        assert!(PhoneNormalizer::new("", ';').is_err());
        assert_eq!(
            PhoneNormalizer::new("855", ','),
            Err(CoreError::InvalidTerminator(','))
        );
        assert!(PhoneNormalizer::new("855", '7').is_err());
        assert!(PhoneNormalizer::new("855", ' ').is_err());
    }

    #[test]
    fn parse_numbers_reads_formatted_output() {
        let normalizer = PhoneNormalizer::default();
        let formatted = normalizer.normalize("077123456, 012345678");
        let numbers = normalizer.parse_numbers(&formatted);
        let values: Vec<&str> = numbers.iter().map(CanonicalNumber::as_str).collect();
        assert_eq!(values, ["077123456", "012345678"]);
        assert!(normalizer.parse_numbers("").is_empty());
    }

    #[test]
    fn canonical_number_parse_validates_shape() {
        assert!(CanonicalNumber::parse("077123456").is_ok());
        assert!(CanonicalNumber::parse("77123456").is_err());
        assert!(CanonicalNumber::parse("0771x3456").is_err());
        assert!(CanonicalNumber::parse("012345").is_err());
    }
}
