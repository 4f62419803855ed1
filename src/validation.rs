//! Field validation and normalization.
//!
//! Each function takes raw user input and returns the normalized value that
//! gets stored, or a [`ValidationError`] naming the field and the reason.

use crate::error::{Field, ValidationError, ValidationReason, ValidationResult};
use regex_lite::Regex;
use std::sync::LazyLock;

static FIRST_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][a-zA-Z]*$").expect("first name pattern"));

static LAST_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z]+(['-][a-zA-Z]+)*$").expect("last name pattern"));

// Up to three alphanumeric groups split by a single '.' or '_', one domain
// label and a 2-3 character top-level segment.
static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9]+[._]?[a-z0-9]+[._]?[a-z0-9]+@\w+\.\w{2,3}$").expect("email pattern")
});

/// Number of digits in a normalized phone number.
pub const PHONE_DIGITS: usize = 10;

/// Validate a first name: one uppercase letter followed by letters only.
pub fn validate_person_name_first(s: &str) -> ValidationResult<String> {
    let first = s.trim();
    if FIRST_NAME.is_match(first) {
        Ok(first.to_string())
    } else {
        Err(ValidationError::malformed(Field::FirstName))
    }
}

/// Validate a last name: letter runs optionally joined by a single hyphen or
/// apostrophe, e.g. `O'Brien` or `Smith-Jones`.
pub fn validate_person_name_last(s: &str) -> ValidationResult<String> {
    let last = s.trim();
    if LAST_NAME.is_match(last) {
        Ok(last.to_string())
    } else {
        Err(ValidationError::malformed(Field::LastName))
    }
}

/// Reduce a phone number to its digits and format it as `NNN-NNN-NNNN`.
pub fn validate_phone(s: &str) -> ValidationResult<String> {
    let digits: String = s.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() != PHONE_DIGITS {
        return Err(ValidationError::new(
            Field::Phone,
            ValidationReason::WrongDigitCount,
            format!(
                "Not a valid phone number, must have {} digits (found {})",
                PHONE_DIGITS,
                digits.len()
            ),
        ));
    }
    Ok(format!("{}-{}-{}", &digits[..3], &digits[3..6], &digits[6..]))
}

/// Validate and lowercase an email address.
pub fn validate_email(s: &str) -> ValidationResult<String> {
    let email = s.trim().to_lowercase();
    if EMAIL.is_match(&email) {
        Ok(email)
    } else {
        Err(ValidationError::malformed(Field::Email))
    }
}

/// Validate a generic name or description: more than one character once trimmed.
pub fn validate_free_text(field: Field, s: &str) -> ValidationResult<String> {
    let text = s.trim();
    if text.chars().count() > 1 {
        Ok(text.to_string())
    } else {
        Err(ValidationError::too_short(field))
    }
}

/// Anything that can be coerced into a floating-point amount.
pub trait NumericInput {
    fn to_number(&self) -> Option<f64>;
}

impl NumericInput for str {
    fn to_number(&self) -> Option<f64> {
        self.trim().parse().ok()
    }
}

impl NumericInput for &str {
    fn to_number(&self) -> Option<f64> {
        (**self).to_number()
    }
}

impl NumericInput for String {
    fn to_number(&self) -> Option<f64> {
        self.as_str().to_number()
    }
}

impl NumericInput for f64 {
    fn to_number(&self) -> Option<f64> {
        Some(*self)
    }
}

impl NumericInput for f32 {
    fn to_number(&self) -> Option<f64> {
        Some(f64::from(*self))
    }
}

impl NumericInput for i32 {
    fn to_number(&self) -> Option<f64> {
        Some(f64::from(*self))
    }
}

impl NumericInput for u32 {
    fn to_number(&self) -> Option<f64> {
        Some(f64::from(*self))
    }
}

/// Validate a price or hour count: numeric, finite and strictly positive.
pub fn validate_positive_number<V>(field: Field, v: &V) -> ValidationResult<f64>
where
    V: NumericInput + ?Sized,
{
    let number = v.to_number().filter(|n| n.is_finite()).ok_or_else(|| {
        ValidationError::new(
            field,
            ValidationReason::NotNumeric,
            format!("{} must be numeric", capitalize(field.as_str())),
        )
    })?;

    if number > 0.0 {
        Ok(number)
    } else {
        Err(ValidationError::new(
            field,
            ValidationReason::NotPositive,
            format!("{} must be greater than zero", capitalize(field.as_str())),
        ))
    }
}

/// Validate a store-assigned identifier used as a foreign key.
pub fn validate_reference(field: Field, id: i64) -> ValidationResult<i64> {
    if id > 0 {
        Ok(id)
    } else {
        Err(ValidationError::new(
            field,
            ValidationReason::Malformed,
            format!("Not a valid {} id: {}", field, id),
        ))
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}
