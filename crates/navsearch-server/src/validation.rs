//! Request parameter validation
//!
//! Guards the message lookup routes: malformed ids and field parameters are
//! rejected with structured violations before any query reaches storage.

use crate::error::Violation;
use chrono::{Datelike, Utc};
use navsearch_ingest::message::is_valid_message_id;

/// Two-digit year field width ("YY")
const YEAR_FORMAT_LENGTH: usize = 2;

/// Three-digit number field width ("###")
const NUM_FORMAT_LENGTH: usize = 3;

/// Validate a canonical message id
pub fn validate_message_id(id: &str) -> Result<(), Vec<Violation>> {
    if is_valid_message_id(id) {
        Ok(())
    } else {
        Err(vec![Violation::new(
            "INVALID_MESSAGE_ID",
            "Invalid Message ID",
            "Message ID must include type, year, and number. \
             Message ID format is \"(NAVADMIN|ALNAV)YY###\"",
        )])
    }
}

/// A year is valid when it has two digits and is not in the future
pub fn is_valid_year(year: &str) -> bool {
    if year.len() != YEAR_FORMAT_LENGTH || !year.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    let current = Utc::now().year() % 100;
    year.parse::<i32>().map(|y| y <= current).unwrap_or(false)
}

/// A message number is valid when it has exactly three digits
pub fn is_valid_num(num: &str) -> bool {
    num.len() == NUM_FORMAT_LENGTH && num.chars().all(|c| c.is_ascii_digit())
}

/// Validate (year, num) path parameters, collecting every violation
pub fn validate_year_num(year: &str, num: &str) -> Result<(), Vec<Violation>> {
    let mut violations = Vec::new();

    if !is_valid_year(year) {
        violations.push(Violation::new(
            "INVALID_MESSAGE_YEAR",
            "Invalid Message \"year\" Parameter",
            "Message year must be a present or past date in \"YY\" format",
        ));
    }
    if !is_valid_num(num) {
        violations.push(Violation::new(
            "INVALID_MESSAGE_NUM",
            "Invalid Message \"num\" Parameter",
            "Message number must be in \"###\" format (ex: \"2\" --> \"002\")",
        ));
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}
