//! Card domain model.
//!
//! # Responsibility
//! - Define the persisted payment card record.
//! - Provide structural checks shared by repository write/read paths.
//!
//! # Invariants
//! - `id` is stable and never reused for another card.
//! - `number` is exactly 16 ASCII digits; leading zeros are significant.
//! - `month` is within `1..=12`.
//! - `name` is non-empty and at most `NAME_MAX_CHARS` characters.
//!
//! Business rules (expiry window, required-field messages) live in
//! `service::card_service`, not here.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Number of digits in a card number.
pub const NUMBER_DIGITS: usize = 16;
/// Upper bound for holder name length, in characters.
pub const NAME_MAX_CHARS: usize = 50;

const MASK_VISIBLE_DIGITS: usize = 4;

/// Stable identifier of one stored card row.
pub type CardId = Uuid;

/// Structural validation failures for a card record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardValidationError {
    NilId,
    InvalidNumber(String),
    MonthOutOfRange(u8),
    EmptyName,
    NameTooLong { chars: usize },
}

impl Display for CardValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "card id must not be nil"),
            Self::InvalidNumber(masked) => write!(
                f,
                "card number must be {NUMBER_DIGITS} ascii digits, got `{masked}`"
            ),
            Self::MonthOutOfRange(month) => write!(f, "month {month} is outside 1..=12"),
            Self::EmptyName => write!(f, "name must not be empty"),
            Self::NameTooLong { chars } => write!(
                f,
                "name has {chars} characters, limit is {NAME_MAX_CHARS}"
            ),
        }
    }
}

impl Error for CardValidationError {}

/// Persisted payment card entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    /// 16 decimal digits stored as text.
    pub number: String,
    /// Expiry month, `1..=12`.
    pub month: u8,
    /// Four-digit expiry year.
    pub year: u16,
    /// Card holder name.
    pub name: String,
}

impl Card {
    /// Creates a card with a generated id.
    ///
    /// Does not validate; repository writes call [`Card::validate`].
    pub fn new(number: impl Into<String>, month: u8, year: u16, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            number: number.into(),
            month,
            year,
            name: name.into(),
        }
    }

    /// Checks field shapes enforced at the storage boundary.
    pub fn validate(&self) -> Result<(), CardValidationError> {
        if self.id.is_nil() {
            return Err(CardValidationError::NilId);
        }
        if !is_card_number(&self.number) {
            return Err(CardValidationError::InvalidNumber(mask_number(
                &self.number,
            )));
        }
        if !(1..=12).contains(&self.month) {
            return Err(CardValidationError::MonthOutOfRange(self.month));
        }
        if self.name.is_empty() {
            return Err(CardValidationError::EmptyName);
        }
        let chars = self.name.chars().count();
        if chars > NAME_MAX_CHARS {
            return Err(CardValidationError::NameTooLong { chars });
        }
        Ok(())
    }

    /// Card number with everything but the last four digits hidden.
    pub fn masked_number(&self) -> String {
        mask_number(&self.number)
    }
}

/// Returns whether `value` has the exact shape of a stored card number.
pub fn is_card_number(value: &str) -> bool {
    value.len() == NUMBER_DIGITS && value.bytes().all(|byte| byte.is_ascii_digit())
}

/// Masks a (possibly malformed) number for logs and error text.
pub fn mask_number(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    let visible_from = chars.len().saturating_sub(MASK_VISIBLE_DIGITS);
    chars
        .iter()
        .enumerate()
        .map(|(index, ch)| if index < visible_from { '*' } else { *ch })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{is_card_number, mask_number, Card, CardValidationError};

    #[test]
    fn mask_keeps_last_four_digits() {
        assert_eq!(mask_number("1111222233334444"), "************4444");
        assert_eq!(mask_number("123"), "123");
        assert_eq!(mask_number(""), "");
    }

    #[test]
    fn card_number_shape() {
        assert!(is_card_number("0000222233334444"));
        assert!(!is_card_number("111122223333444"));
        assert!(!is_card_number("11112222333344445"));
        assert!(!is_card_number("1111222233334a44"));
    }

    #[test]
    fn validate_counts_name_in_chars_not_bytes() {
        let card = Card::new("1111222233334444", 1, 2030, "é".repeat(50));
        assert_eq!(card.validate(), Ok(()));

        let card = Card::new("1111222233334444", 1, 2030, "é".repeat(51));
        assert_eq!(
            card.validate(),
            Err(CardValidationError::NameTooLong { chars: 51 })
        );
    }
}
