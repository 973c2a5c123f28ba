// =====================================================================================
// VALIDATION SERVICE - FIELD RULES
// =====================================================================================

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

static NAME_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z\s]+$").expect("valid name regex"));

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email regex")
});

static PHONE_NUMBER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{10,13}$").expect("valid phone number regex"));

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Stateless field checks. Lengths count characters, not bytes.
pub struct ValidationService;

impl ValidationService {
    pub fn is_within_length(value: &str, min: usize, max: usize) -> bool {
        let length = value.chars().count();
        length >= min && length <= max
    }

    /// Letters and whitespace only, `min..=max` characters.
    pub fn is_valid_name(value: &str, min: usize, max: usize) -> bool {
        Self::is_within_length(value, min, max) && NAME_REGEX.is_match(value)
    }

    pub fn is_valid_username(value: &str) -> bool {
        Self::is_within_length(value, 5, 100)
    }

    /// 8 to 100 characters with at least one letter and one digit.
    pub fn is_valid_password(value: &str) -> bool {
        Self::is_within_length(value, 8, 100)
            && value.chars().any(|c| c.is_ascii_alphabetic())
            && value.chars().any(|c| c.is_ascii_digit())
    }

    pub fn is_valid_email(value: &str) -> bool {
        EMAIL_REGEX.is_match(value)
    }

    /// Doctor contact numbers: 10 to 13 digits.
    pub fn is_valid_contact_number(value: &str) -> bool {
        PHONE_NUMBER_REGEX.is_match(value)
    }

    /// Patient phone numbers, same shape as contact numbers.
    pub fn is_valid_phone_number(value: &str) -> bool {
        PHONE_NUMBER_REGEX.is_match(value)
    }

    pub fn parse_date(value: &str) -> Option<NaiveDate> {
        // chrono accepts single-digit fields; the wire format does not
        if value.len() != 10 {
            return None;
        }
        NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
    }
}
