//! Card use-case service.
//!
//! # Responsibility
//! - Validate raw card input field by field, in a fixed order.
//! - Guard number uniqueness before and during insert.
//! - Remove cards by exact number match.
//!
//! # Invariants
//! - The first failing check aborts the call; nothing is written.
//! - Callers never see a raw UNIQUE violation; it is reported as
//!   `CardRejection::AlreadyExists`.
//! - Card numbers are logged masked only.

use crate::clock::{Clock, SystemClock};
use crate::model::card::Card;
use crate::repo::card_repo::{CardRepository, RepoError};
use crate::service::card_fields::{
    validate_expiry, validate_month, validate_name, validate_number, validate_year, FieldInput,
};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Card fields named in user-facing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardField {
    Number,
    Month,
    Year,
    Name,
}

impl CardField {
    pub fn label(self) -> &'static str {
        match self {
            Self::Number => "Number",
            Self::Month => "Month",
            Self::Year => "Year",
            Self::Name => "Name",
        }
    }
}

/// Business-rule rejection. `Display` is the message shown to users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardRejection {
    Required(CardField),
    NotNumeric(CardField),
    NumberLength,
    MonthOutOfRange,
    /// `min` is the current year in two-digit form.
    YearOutOfRange {
        min: i64,
    },
    NameTooLong,
    ExpiredDate,
    AlreadyExists,
    NotExists,
}

impl CardRejection {
    /// Stable snake_case code for log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Required(_) => "required",
            Self::NotNumeric(_) => "not_numeric",
            Self::NumberLength => "number_length",
            Self::MonthOutOfRange => "month_range",
            Self::YearOutOfRange { .. } => "year_range",
            Self::NameTooLong => "name_too_long",
            Self::ExpiredDate => "expired",
            Self::AlreadyExists => "already_exists",
            Self::NotExists => "not_exists",
        }
    }
}

impl Display for CardRejection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Required(field) => write!(f, "`{}` is required.", field.label()),
            Self::NotNumeric(field) => write!(f, "`{}` must have only numbers.", field.label()),
            Self::NumberLength => write!(f, "`Number` must have 16 digits."),
            Self::MonthOutOfRange => write!(f, "`Month` should be in the range 1-12."),
            Self::YearOutOfRange { min } => write!(f, "`Year` should be in the range {min}-99."),
            Self::NameTooLong => write!(f, "`Name` must have at most 50 characters."),
            Self::ExpiredDate => write!(f, "Expire date must be greater than current."),
            Self::AlreadyExists => write!(f, "Card with such number already exists."),
            Self::NotExists => write!(f, "Card with such name was not exists."),
        }
    }
}

impl Error for CardRejection {}

/// Errors from card service operations.
#[derive(Debug)]
pub enum CardServiceError {
    /// Input or uniqueness rule failed.
    Rejected(CardRejection),
    /// Storage failure other than a duplicate number.
    Repo(RepoError),
}

impl CardServiceError {
    pub fn rejection(&self) -> Option<&CardRejection> {
        match self {
            Self::Rejected(rejection) => Some(rejection),
            Self::Repo(_) => None,
        }
    }
}

impl Display for CardServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rejected(rejection) => write!(f, "{rejection}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CardServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Rejected(_) => None,
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<CardRejection> for CardServiceError {
    fn from(value: CardRejection) -> Self {
        Self::Rejected(value)
    }
}

impl From<RepoError> for CardServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::DuplicateNumber(_) => Self::Rejected(CardRejection::AlreadyExists),
            other => Self::Repo(other),
        }
    }
}

pub type CardServiceResult<T> = Result<T, CardServiceError>;

/// Card service over an injected repository and clock.
pub struct CardService<R: CardRepository, C: Clock = SystemClock> {
    repo: R,
    clock: C,
}

impl<R: CardRepository> CardService<R> {
    /// Creates a service that checks expiry against the local date.
    pub fn new(repo: R) -> Self {
        Self::with_clock(repo, SystemClock)
    }
}

impl<R: CardRepository, C: Clock> CardService<R, C> {
    pub fn with_clock(repo: R, clock: C) -> Self {
        Self { repo, clock }
    }

    /// Validates raw input and stores a new card.
    ///
    /// # Contract
    /// - Checks run as number, month, year, name, expiry, uniqueness.
    /// - Returns the stored card with normalized values.
    pub fn create(
        &self,
        number: impl Into<FieldInput>,
        month: impl Into<FieldInput>,
        year: impl Into<FieldInput>,
        name: impl Into<FieldInput>,
    ) -> CardServiceResult<Card> {
        let result = self.create_inner(number.into(), month.into(), year.into(), name.into());
        match &result {
            Ok(card) => info!(
                "event=card_create module=service status=ok number={} card_id={}",
                card.masked_number(),
                card.id
            ),
            Err(err) => log_failure("card_create", err),
        }
        result
    }

    fn create_inner(
        &self,
        number: FieldInput,
        month: FieldInput,
        year: FieldInput,
        name: FieldInput,
    ) -> CardServiceResult<Card> {
        let number = validate_number(&number)?;
        let month = validate_month(&month)?;
        let year = validate_year(&year, &self.clock)?;
        let name = validate_name(&name)?;
        validate_expiry(month, year, &self.clock)?;
        self.ensure_absent(&number)?;

        let card = Card::new(number, month, year, name);
        self.repo.insert(&card)?;
        Ok(card)
    }

    /// Returns whether a card with exactly this number is stored.
    pub fn exists(&self, number: &str) -> CardServiceResult<bool> {
        Ok(self.repo.find_by_number(number)?.is_some())
    }

    /// Fails with `AlreadyExists` when the number is taken.
    pub fn ensure_absent(&self, number: &str) -> CardServiceResult<()> {
        if self.exists(number)? {
            return Err(CardRejection::AlreadyExists.into());
        }
        Ok(())
    }

    /// Deletes the card with exactly this number and returns it.
    pub fn remove(&self, number: &str) -> CardServiceResult<Card> {
        let result = self.remove_inner(number);
        match &result {
            Ok(card) => info!(
                "event=card_remove module=service status=ok number={} card_id={}",
                card.masked_number(),
                card.id
            ),
            Err(err) => log_failure("card_remove", err),
        }
        result
    }

    fn remove_inner(&self, number: &str) -> CardServiceResult<Card> {
        let card = self
            .repo
            .find_by_number(number)?
            .ok_or(CardRejection::NotExists)?;
        match self.repo.delete(card.id) {
            Ok(()) => Ok(card),
            // Deleted between lookup and delete.
            Err(RepoError::NotFound(_)) => Err(CardRejection::NotExists.into()),
            Err(err) => Err(err.into()),
        }
    }

    pub fn get(&self, number: &str) -> CardServiceResult<Option<Card>> {
        Ok(self.repo.find_by_number(number)?)
    }

    pub fn list(&self) -> CardServiceResult<Vec<Card>> {
        Ok(self.repo.list()?)
    }

    pub fn count(&self) -> CardServiceResult<u64> {
        Ok(self.repo.count()?)
    }
}

fn log_failure(event: &str, err: &CardServiceError) {
    match err {
        CardServiceError::Rejected(rejection) => info!(
            "event={} module=service status=rejected reason={}",
            event,
            rejection.code()
        ),
        CardServiceError::Repo(err) => error!(
            "event={} module=service status=error error={}",
            event, err
        ),
    }
}
