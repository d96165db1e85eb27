//! Household repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over the `people`, `cards` and
//!   `payment_log` tables.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths validate models before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Construction fails on unmigrated or structurally incomplete
//!   connections.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::card::{
    Cadence, CardId, CardValidationError, CreditCardAccount, PaymentLogEntry,
};
use crate::model::person::{Person, PersonId, PersonValidationError};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const PERSON_SELECT_SQL: &str = "SELECT
    uuid,
    name,
    email
FROM people";

const CARD_SELECT_SQL: &str = "SELECT
    uuid,
    person_uuid,
    nickname,
    issuer,
    color,
    due_date,
    amount_due,
    autopay,
    remind_days_before,
    cadence,
    last_paid_on
FROM cards";

const REQUIRED_TABLES: &[(&str, &[&str])] = &[
    ("people", &["uuid", "name", "email"]),
    (
        "cards",
        &[
            "uuid",
            "person_uuid",
            "nickname",
            "issuer",
            "color",
            "due_date",
            "amount_due",
            "autopay",
            "remind_days_before",
            "cadence",
            "last_paid_on",
        ],
    ),
    (
        "payment_log",
        &["uuid", "card_uuid", "paid_on", "amount", "due_before", "due_after"],
    ),
];

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for household persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    PersonValidation(PersonValidationError),
    CardValidation(CardValidationError),
    Db(DbError),
    PersonNotFound(PersonId),
    CardNotFound(CardId),
    InvalidData(String),
    /// Connection has not been migrated to the schema this binary expects.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PersonValidation(err) => write!(f, "{err}"),
            Self::CardValidation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::PersonNotFound(id) => write!(f, "person not found: {id}"),
            Self::CardNotFound(id) => write!(f, "card not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} is behind expected {expected_version}; \
                 open it through db::open_db first"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing")
            }
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::PersonValidation(err) => Some(err),
            Self::CardValidation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<PersonValidationError> for RepoError {
    fn from(value: PersonValidationError) -> Self {
        Self::PersonValidation(value)
    }
}

impl From<CardValidationError> for RepoError {
    fn from(value: CardValidationError) -> Self {
        Self::CardValidation(value)
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

/// Repository interface for the household collection.
pub trait HouseholdRepository {
    /// Inserts a person together with any cards the record carries.
    fn create_person(&self, person: &Person) -> RepoResult<PersonId>;
    fn get_person(&self, id: PersonId) -> RepoResult<Option<Person>>;
    /// Lists all people with their cards, in creation order.
    fn list_people(&self) -> RepoResult<Vec<Person>>;
    /// Hard-deletes a person; cards and payment history cascade.
    fn delete_person(&self, id: PersonId) -> RepoResult<()>;
    fn create_card(&self, person_id: PersonId, card: &CreditCardAccount) -> RepoResult<CardId>;
    /// Full-row update of one card by stable ID.
    fn update_card(&self, card: &CreditCardAccount) -> RepoResult<()>;
    fn delete_card(&self, id: CardId) -> RepoResult<()>;
    /// Finds a card and its owning person.
    fn find_card(&self, id: CardId) -> RepoResult<Option<(PersonId, CreditCardAccount)>>;
    fn append_payment(&self, entry: &PaymentLogEntry) -> RepoResult<()>;
    /// Payment history for one card, most recent first.
    fn list_payments(&self, card_id: CardId) -> RepoResult<Vec<PaymentLogEntry>>;
    fn count_people(&self) -> RepoResult<u64>;
    /// Removes every stored record. Used by reset and snapshot import.
    fn clear_all(&self) -> RepoResult<()>;
}

/// SQLite-backed household repository.
pub struct SqliteHouseholdRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteHouseholdRepository<'conn> {
    /// Wraps a connection after verifying it carries the expected schema.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations have not run.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the schema
    ///   does not match what this binary was built against.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let expected_version = latest_version();
        let actual_version: u32 =
            conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
        if actual_version < expected_version {
            return Err(RepoError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }

        for &(table, columns) in REQUIRED_TABLES {
            if !table_exists(conn, table)? {
                return Err(RepoError::MissingRequiredTable(table));
            }
            let present = table_columns(conn, table)?;
            for &column in columns {
                if !present.iter().any(|name| name == column) {
                    return Err(RepoError::MissingRequiredColumn { table, column });
                }
            }
        }

        Ok(Self { conn })
    }
}

impl HouseholdRepository for SqliteHouseholdRepository<'_> {
    fn create_person(&self, person: &Person) -> RepoResult<PersonId> {
        person.validate()?;
        for card in &person.cards {
            card.validate()?;
        }

        self.conn.execute(
            "INSERT INTO people (uuid, name, email) VALUES (?1, ?2, ?3);",
            params![
                person.id.to_string(),
                person.name.as_str(),
                person.email.as_deref(),
            ],
        )?;

        for card in &person.cards {
            insert_card(self.conn, person.id, card)?;
        }

        Ok(person.id)
    }

    fn get_person(&self, id: PersonId) -> RepoResult<Option<Person>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PERSON_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;

        let Some(row) = rows.next()? else {
            return Ok(None);
        };
        let mut person = parse_person_row(row)?;
        person.cards = self.cards_of(id)?;
        Ok(Some(person))
    }

    fn list_people(&self) -> RepoResult<Vec<Person>> {
        // rowid tiebreak keeps creation order stable when timestamps land
        // in the same millisecond.
        let mut stmt = self.conn.prepare(&format!(
            "{PERSON_SELECT_SQL} ORDER BY created_at ASC, rowid ASC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut people = Vec::new();
        while let Some(row) = rows.next()? {
            people.push(parse_person_row(row)?);
        }

        let mut cards_by_owner = self.all_cards_by_owner()?;
        for person in &mut people {
            person.cards = cards_by_owner.remove(&person.id).unwrap_or_default();
        }

        Ok(people)
    }

    fn delete_person(&self, id: PersonId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM people WHERE uuid = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::PersonNotFound(id));
        }
        Ok(())
    }

    fn create_card(&self, person_id: PersonId, card: &CreditCardAccount) -> RepoResult<CardId> {
        card.validate()?;

        let owner_exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM people WHERE uuid = ?1);",
            [person_id.to_string()],
            |row| row.get(0),
        )?;
        if owner_exists == 0 {
            return Err(RepoError::PersonNotFound(person_id));
        }

        insert_card(self.conn, person_id, card)?;
        Ok(card.id)
    }

    fn update_card(&self, card: &CreditCardAccount) -> RepoResult<()> {
        card.validate()?;

        let changed = self.conn.execute(
            "UPDATE cards
             SET
                nickname = ?1,
                issuer = ?2,
                color = ?3,
                due_date = ?4,
                amount_due = ?5,
                autopay = ?6,
                remind_days_before = ?7,
                cadence = ?8,
                last_paid_on = ?9,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?10;",
            params![
                card.nickname.as_str(),
                card.issuer.as_str(),
                card.color.as_str(),
                date_to_db(card.due_date),
                card.amount_due,
                bool_to_int(card.autopay),
                card.remind_days_before,
                card.cadence.as_str(),
                card.last_paid_on.map(date_to_db),
                card.id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::CardNotFound(card.id));
        }
        Ok(())
    }

    fn delete_card(&self, id: CardId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM cards WHERE uuid = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::CardNotFound(id));
        }
        Ok(())
    }

    fn find_card(&self, id: CardId) -> RepoResult<Option<(PersonId, CreditCardAccount)>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CARD_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;

        let Some(row) = rows.next()? else {
            return Ok(None);
        };
        let owner = parse_db_uuid(row.get::<_, String>("person_uuid")?, "cards.person_uuid")?;
        Ok(Some((owner, parse_card_row(row)?)))
    }

    fn append_payment(&self, entry: &PaymentLogEntry) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO payment_log (uuid, card_uuid, paid_on, amount, due_before, due_after)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                entry.id.to_string(),
                entry.card_id.to_string(),
                date_to_db(entry.paid_on),
                entry.amount,
                date_to_db(entry.due_before),
                date_to_db(entry.due_after),
            ],
        )?;
        Ok(())
    }

    fn list_payments(&self, card_id: CardId) -> RepoResult<Vec<PaymentLogEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT uuid, card_uuid, paid_on, amount, due_before, due_after
             FROM payment_log
             WHERE card_uuid = ?1
             ORDER BY paid_on DESC, rowid DESC;",
        )?;
        let mut rows = stmt.query([card_id.to_string()])?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next()? {
            entries.push(parse_payment_row(row)?);
        }
        Ok(entries)
    }

    fn count_people(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM people;", [], |row| row.get(0))?;
        Ok(count.max(0) as u64)
    }

    fn clear_all(&self) -> RepoResult<()> {
        // Cards and payment history cascade, but explicit deletes keep the
        // behavior independent of the foreign_keys pragma.
        self.conn.execute("DELETE FROM payment_log;", [])?;
        self.conn.execute("DELETE FROM cards;", [])?;
        self.conn.execute("DELETE FROM people;", [])?;
        Ok(())
    }
}

impl SqliteHouseholdRepository<'_> {
    fn cards_of(&self, owner: PersonId) -> RepoResult<Vec<CreditCardAccount>> {
        let mut stmt = self.conn.prepare(&format!(
            "{CARD_SELECT_SQL} WHERE person_uuid = ?1 ORDER BY created_at ASC, rowid ASC;"
        ))?;
        let mut rows = stmt.query([owner.to_string()])?;
        let mut cards = Vec::new();
        while let Some(row) = rows.next()? {
            cards.push(parse_card_row(row)?);
        }
        Ok(cards)
    }

    fn all_cards_by_owner(&self) -> RepoResult<HashMap<PersonId, Vec<CreditCardAccount>>> {
        let mut stmt = self.conn.prepare(&format!(
            "{CARD_SELECT_SQL} ORDER BY created_at ASC, rowid ASC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut by_owner: HashMap<PersonId, Vec<CreditCardAccount>> = HashMap::new();
        while let Some(row) = rows.next()? {
            let owner = parse_db_uuid(row.get::<_, String>("person_uuid")?, "cards.person_uuid")?;
            by_owner.entry(owner).or_default().push(parse_card_row(row)?);
        }
        Ok(by_owner)
    }
}

fn insert_card(conn: &Connection, owner: PersonId, card: &CreditCardAccount) -> RepoResult<()> {
    conn.execute(
        "INSERT INTO cards (
            uuid,
            person_uuid,
            nickname,
            issuer,
            color,
            due_date,
            amount_due,
            autopay,
            remind_days_before,
            cadence,
            last_paid_on
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11);",
        params![
            card.id.to_string(),
            owner.to_string(),
            card.nickname.as_str(),
            card.issuer.as_str(),
            card.color.as_str(),
            date_to_db(card.due_date),
            card.amount_due,
            bool_to_int(card.autopay),
            card.remind_days_before,
            card.cadence.as_str(),
            card.last_paid_on.map(date_to_db),
        ],
    )?;
    Ok(())
}

fn parse_person_row(row: &Row<'_>) -> RepoResult<Person> {
    let id = parse_db_uuid(row.get::<_, String>("uuid")?, "people.uuid")?;
    let person = Person {
        id,
        name: row.get("name")?,
        email: row.get("email")?,
        cards: Vec::new(),
    };
    person.validate()?;
    Ok(person)
}

fn parse_card_row(row: &Row<'_>) -> RepoResult<CreditCardAccount> {
    let id = parse_db_uuid(row.get::<_, String>("uuid")?, "cards.uuid")?;

    let cadence_text: String = row.get("cadence")?;
    let cadence = parse_cadence(&cadence_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid cadence `{cadence_text}` in cards.cadence"))
    })?;

    let due_date = parse_db_date(&row.get::<_, String>("due_date")?, "cards.due_date")?;
    let last_paid_on = match row.get::<_, Option<String>>("last_paid_on")? {
        Some(value) => Some(parse_db_date(&value, "cards.last_paid_on")?),
        None => None,
    };

    let autopay = match row.get::<_, i64>("autopay")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid autopay value `{other}` in cards.autopay"
            )));
        }
    };

    let lead: i64 = row.get("remind_days_before")?;
    let remind_days_before = u32::try_from(lead).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid reminder lead `{lead}` in cards.remind_days_before"
        ))
    })?;

    let card = CreditCardAccount {
        id,
        nickname: row.get("nickname")?,
        issuer: row.get("issuer")?,
        color: row.get("color")?,
        due_date,
        amount_due: row.get("amount_due")?,
        autopay,
        remind_days_before,
        cadence,
        last_paid_on,
    };
    card.validate()?;
    Ok(card)
}

fn parse_payment_row(row: &Row<'_>) -> RepoResult<PaymentLogEntry> {
    Ok(PaymentLogEntry {
        id: parse_db_uuid(row.get::<_, String>("uuid")?, "payment_log.uuid")?,
        card_id: parse_db_uuid(row.get::<_, String>("card_uuid")?, "payment_log.card_uuid")?,
        paid_on: parse_db_date(&row.get::<_, String>("paid_on")?, "payment_log.paid_on")?,
        amount: row.get("amount")?,
        due_before: parse_db_date(&row.get::<_, String>("due_before")?, "payment_log.due_before")?,
        due_after: parse_db_date(&row.get::<_, String>("due_after")?, "payment_log.due_after")?,
    })
}

fn parse_cadence(value: &str) -> Option<Cadence> {
    match value {
        "weekly" => Some(Cadence::Weekly),
        "biweekly" => Some(Cadence::Biweekly),
        "monthly" => Some(Cadence::Monthly),
        _ => None,
    }
}

fn date_to_db(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn parse_db_date(value: &str, source: &str) -> RepoResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| RepoError::InvalidData(format!("invalid date `{value}` in {source}")))
}

fn parse_db_uuid(value: String, source: &str) -> RepoResult<Uuid> {
    Uuid::parse_str(&value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid `{value}` in {source}")))
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_columns(conn: &Connection, table: &str) -> RepoResult<Vec<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    let mut columns = Vec::new();
    while let Some(row) = rows.next()? {
        columns.push(row.get::<_, String>(1)?);
    }
    Ok(columns)
}
