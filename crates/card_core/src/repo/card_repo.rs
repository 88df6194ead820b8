//! Card repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide lookup/insert/delete over the `cards` table.
//! - Surface the UNIQUE constraint on `number` as a semantic error.
//!
//! # Invariants
//! - Write paths call `Card::validate()` before SQL mutations.
//! - Read paths reject invalid persisted rows instead of masking them.
//! - A rejected duplicate insert leaves the table unchanged.

use crate::db::DbError;
use crate::model::card::{mask_number, Card, CardId, CardValidationError};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const CARD_SELECT_SQL: &str = "SELECT id, number, month, year, name FROM cards";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for card persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(CardValidationError),
    Db(DbError),
    NotFound(CardId),
    /// Insert rejected by the UNIQUE constraint; carries the masked number.
    DuplicateNumber(String),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "card not found: {id}"),
            Self::DuplicateNumber(masked) => write!(f, "duplicate card number: {masked}"),
            Self::InvalidData(message) => write!(f, "invalid persisted card data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::DuplicateNumber(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<CardValidationError> for RepoError {
    fn from(value: CardValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Storage seam used by the card service.
pub trait CardRepository {
    /// Exact-match lookup by card number.
    fn find_by_number(&self, number: &str) -> RepoResult<Option<Card>>;
    /// Inserts one card; fails with `DuplicateNumber` if the number is taken.
    fn insert(&self, card: &Card) -> RepoResult<CardId>;
    /// Hard-deletes one card by id.
    fn delete(&self, id: CardId) -> RepoResult<()>;
    /// Lists all cards ordered by number.
    fn list(&self) -> RepoResult<Vec<Card>>;
    fn count(&self) -> RepoResult<u64>;
}

impl<R: CardRepository + ?Sized> CardRepository for &R {
    fn find_by_number(&self, number: &str) -> RepoResult<Option<Card>> {
        (**self).find_by_number(number)
    }

    fn insert(&self, card: &Card) -> RepoResult<CardId> {
        (**self).insert(card)
    }

    fn delete(&self, id: CardId) -> RepoResult<()> {
        (**self).delete(id)
    }

    fn list(&self) -> RepoResult<Vec<Card>> {
        (**self).list()
    }

    fn count(&self) -> RepoResult<u64> {
        (**self).count()
    }
}

/// SQLite-backed card repository.
pub struct SqliteCardRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCardRepository<'conn> {
    /// Wraps a connection returned by `db::open_db*`.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl CardRepository for SqliteCardRepository<'_> {
    fn find_by_number(&self, number: &str) -> RepoResult<Option<Card>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CARD_SELECT_SQL} WHERE number = ?1;"))?;
        let mut rows = stmt.query([number])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_card_row(row)?));
        }
        Ok(None)
    }

    fn insert(&self, card: &Card) -> RepoResult<CardId> {
        card.validate()?;

        let inserted = self.conn.execute(
            "INSERT INTO cards (id, number, month, year, name)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                card.id.to_string(),
                card.number.as_str(),
                card.month,
                card.year,
                card.name.as_str(),
            ],
        );

        match inserted {
            Ok(_) => Ok(card.id),
            Err(err) => {
                let err = DbError::from(err);
                if err.is_unique_violation() && self.number_taken(&card.number)? {
                    return Err(RepoError::DuplicateNumber(card.masked_number()));
                }
                Err(err.into())
            }
        }
    }

    fn delete(&self, id: CardId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM cards WHERE id = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }

    fn list(&self) -> RepoResult<Vec<Card>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CARD_SELECT_SQL} ORDER BY number ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut cards = Vec::new();
        while let Some(row) = rows.next()? {
            cards.push(parse_card_row(row)?);
        }
        Ok(cards)
    }

    fn count(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM cards;", [], |row| row.get(0))?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative row count `{count}`")))
    }
}

impl SqliteCardRepository<'_> {
    // UNIQUE also covers the `id` primary key; only a taken number is a duplicate card.
    fn number_taken(&self, number: &str) -> RepoResult<bool> {
        let taken = self
            .conn
            .query_row(
                "SELECT 1 FROM cards WHERE number = ?1;",
                [number],
                |row| row.get::<_, i64>(0),
            )
            .optional()?;
        Ok(taken.is_some())
    }
}

fn parse_card_row(row: &Row<'_>) -> RepoResult<Card> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text)
        .map_err(|_| RepoError::InvalidData(format!("invalid id `{id_text}` in cards.id")))?;

    let month: i64 = row.get("month")?;
    let month = u8::try_from(month)
        .map_err(|_| RepoError::InvalidData(format!("invalid month `{month}` in cards.month")))?;

    let year: i64 = row.get("year")?;
    let year = u16::try_from(year)
        .map_err(|_| RepoError::InvalidData(format!("invalid year `{year}` in cards.year")))?;

    let card = Card {
        id,
        number: row.get("number")?,
        month,
        year,
        name: row.get("name")?,
    };
    card.validate().map_err(|err| {
        RepoError::InvalidData(format!(
            "card {} ({}) failed validation: {err}",
            card.id,
            mask_number(&card.number)
        ))
    })?;
    Ok(card)
}
