//! Raw-input normalization for card fields.
//!
//! # Responsibility
//! - Accept loosely typed caller input (absent, text, integer).
//! - Turn it into typed card values or a `CardRejection` carrying the
//!   user-facing message.
//!
//! # Invariants
//! - Card numbers are checked on their string form; leading zeros survive.
//! - Years come out as four-digit values in `2000..=2099`.

use crate::clock::Clock;
use crate::model::card::{NAME_MAX_CHARS, NUMBER_DIGITS};
use crate::service::card_service::{CardField, CardRejection};
use once_cell::sync::Lazy;
use regex::Regex;

static DIGITS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+$").expect("valid digits regex"));

const CENTURY_BASE: i64 = 2000;
const CENTURY_LAST: i64 = 2099;

/// One raw field value as received from a caller.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FieldInput {
    #[default]
    Missing,
    Text(String),
    Int(i64),
}

impl FieldInput {
    /// Empty text and zero count as absent, matching form-post semantics.
    fn is_blank(&self) -> bool {
        match self {
            Self::Missing => true,
            Self::Text(text) => text.is_empty(),
            Self::Int(value) => *value == 0,
        }
    }

    fn parse_int(&self, field: CardField) -> Result<i64, CardRejection> {
        match self {
            Self::Missing => Err(CardRejection::Required(field)),
            Self::Text(text) if text.is_empty() => Err(CardRejection::Required(field)),
            Self::Text(text) => text
                .trim()
                .parse::<i64>()
                .map_err(|_| CardRejection::NotNumeric(field)),
            Self::Int(value) => Ok(*value),
        }
    }
}

impl From<&str> for FieldInput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldInput {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

macro_rules! field_input_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for FieldInput {
                fn from(value: $ty) -> Self {
                    Self::Int(i64::from(value))
                }
            }
        )*
    };
}

field_input_from_int!(u8, u16, u32, i32, i64);

impl<T: Into<FieldInput>> From<Option<T>> for FieldInput {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Missing, Into::into)
    }
}

/// Validates a card number and returns its canonical 16-digit text.
pub fn validate_number(input: &FieldInput) -> Result<String, CardRejection> {
    if input.is_blank() {
        return Err(CardRejection::Required(CardField::Number));
    }
    let text = match input {
        FieldInput::Text(text) => text.trim().to_string(),
        FieldInput::Int(value) => value.to_string(),
        FieldInput::Missing => return Err(CardRejection::Required(CardField::Number)),
    };
    if !DIGITS_RE.is_match(&text) {
        return Err(CardRejection::NotNumeric(CardField::Number));
    }
    if text.len() != NUMBER_DIGITS {
        return Err(CardRejection::NumberLength);
    }
    Ok(text)
}

pub fn validate_month(input: &FieldInput) -> Result<u8, CardRejection> {
    let month = input.parse_int(CardField::Month)?;
    match u8::try_from(month) {
        Ok(month) if (1..=12).contains(&month) => Ok(month),
        _ => Err(CardRejection::MonthOutOfRange),
    }
}

/// Validates an expiry year against the clock's current year.
///
/// Two-digit values map into the 2000s; four-digit values must already be
/// in that century.
pub fn validate_year(input: &FieldInput, clock: &impl Clock) -> Result<u16, CardRejection> {
    let raw = input.parse_int(CardField::Year)?;
    let current_year = i64::from(clock.current_year());
    let out_of_range = CardRejection::YearOutOfRange {
        min: current_year - CENTURY_BASE,
    };

    let year = match raw {
        0..=99 => CENTURY_BASE + raw,
        CENTURY_BASE..=CENTURY_LAST => raw,
        _ => return Err(out_of_range),
    };
    if year < current_year {
        return Err(out_of_range);
    }
    u16::try_from(year).map_err(|_| out_of_range)
}

pub fn validate_name(input: &FieldInput) -> Result<String, CardRejection> {
    if input.is_blank() {
        return Err(CardRejection::Required(CardField::Name));
    }
    let name = match input {
        FieldInput::Missing => return Err(CardRejection::Required(CardField::Name)),
        FieldInput::Text(text) => text.clone(),
        FieldInput::Int(value) => value.to_string(),
    };
    if name.chars().count() > NAME_MAX_CHARS {
        return Err(CardRejection::NameTooLong);
    }
    Ok(name)
}

/// Accepts expiry in the current month or later.
pub fn validate_expiry(month: u8, year: u16, clock: &impl Clock) -> Result<(), CardRejection> {
    let current_year = clock.current_year();
    let current_month = clock.current_month();
    let year = i32::from(year);
    let month = u32::from(month);

    if year > current_year || (year == current_year && month >= current_month) {
        Ok(())
    } else {
        Err(CardRejection::ExpiredDate)
    }
}
