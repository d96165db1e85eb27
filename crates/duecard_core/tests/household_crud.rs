use chrono::NaiveDate;
use duecard_core::db::migrations::latest_version;
use duecard_core::db::open_db_in_memory;
use duecard_core::{
    Cadence, CardValidationError, CreditCardAccount, HouseholdRepository, PaymentLogEntry, Person,
    RepoError, SqliteHouseholdRepository,
};
use rusqlite::Connection;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn card(nickname: &str, due: NaiveDate, amount: f64) -> CreditCardAccount {
    let mut card = CreditCardAccount::new(nickname, "Chase", due, Cadence::Monthly);
    card.amount_due = amount;
    card
}

#[test]
fn create_person_with_cards_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteHouseholdRepository::try_new(&conn).unwrap();

    let mut person = Person::new("Avery Chen", Some("avery@example.com".to_string()));
    person.cards.push(card("Sapphire", date(2026, 8, 10), 482.19));
    let id = repo.create_person(&person).unwrap();

    let loaded = repo.get_person(id).unwrap().unwrap();
    assert_eq!(loaded.id, person.id);
    assert_eq!(loaded.name, "Avery Chen");
    assert_eq!(loaded.email.as_deref(), Some("avery@example.com"));
    assert_eq!(loaded.cards.len(), 1);
    assert_eq!(loaded.cards[0].nickname, "Sapphire");
    assert_eq!(loaded.cards[0].due_date, date(2026, 8, 10));
    assert_eq!(loaded.cards[0].cadence, Cadence::Monthly);
}

#[test]
fn list_people_keeps_insertion_order_with_nested_cards() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteHouseholdRepository::try_new(&conn).unwrap();

    let avery = Person::new("Avery", None);
    let jordan = Person::new("Jordan", None);
    repo.create_person(&avery).unwrap();
    repo.create_person(&jordan).unwrap();
    repo.create_card(jordan.id, &card("Platinum", date(2026, 9, 1), 120.0))
        .unwrap();

    let people = repo.list_people().unwrap();
    assert_eq!(people.len(), 2);
    assert_eq!(people[0].id, avery.id);
    assert!(people[0].cards.is_empty());
    assert_eq!(people[1].id, jordan.id);
    assert_eq!(people[1].cards.len(), 1);
}

#[test]
fn delete_person_cascades_to_cards_and_history() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteHouseholdRepository::try_new(&conn).unwrap();

    let person = Person::new("Avery", None);
    repo.create_person(&person).unwrap();
    let owned = card("Sapphire", date(2026, 8, 10), 50.0);
    repo.create_card(person.id, &owned).unwrap();
    repo.append_payment(&PaymentLogEntry::new(
        owned.id,
        date(2026, 7, 10),
        50.0,
        date(2026, 7, 10),
        date(2026, 8, 10),
    ))
    .unwrap();

    repo.delete_person(person.id).unwrap();

    assert!(repo.get_person(person.id).unwrap().is_none());
    assert!(repo.find_card(owned.id).unwrap().is_none());
    assert!(repo.list_payments(owned.id).unwrap().is_empty());
}

#[test]
fn delete_missing_person_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteHouseholdRepository::try_new(&conn).unwrap();

    let ghost = Person::new("Ghost", None);
    let err = repo.delete_person(ghost.id).unwrap_err();
    assert!(matches!(err, RepoError::PersonNotFound(id) if id == ghost.id));
}

#[test]
fn create_card_requires_existing_owner() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteHouseholdRepository::try_new(&conn).unwrap();

    let ghost = Person::new("Ghost", None);
    let err = repo
        .create_card(ghost.id, &card("Orphan", date(2026, 8, 10), 0.0))
        .unwrap_err();
    assert!(matches!(err, RepoError::PersonNotFound(id) if id == ghost.id));
}

#[test]
fn update_card_persists_all_fields() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteHouseholdRepository::try_new(&conn).unwrap();

    let person = Person::new("Avery", None);
    repo.create_person(&person).unwrap();
    let mut owned = card("Sapphire", date(2026, 8, 10), 50.0);
    repo.create_card(person.id, &owned).unwrap();

    owned.nickname = "Sapphire Reserve".to_string();
    owned.autopay = true;
    owned.remind_days_before = 9;
    owned.cadence = Cadence::Biweekly;
    owned.last_paid_on = Some(date(2026, 8, 1));
    repo.update_card(&owned).unwrap();

    let (owner, loaded) = repo.find_card(owned.id).unwrap().unwrap();
    assert_eq!(owner, person.id);
    assert_eq!(loaded.nickname, "Sapphire Reserve");
    assert!(loaded.autopay);
    assert_eq!(loaded.remind_days_before, 9);
    assert_eq!(loaded.cadence, Cadence::Biweekly);
    assert_eq!(loaded.last_paid_on, Some(date(2026, 8, 1)));
}

#[test]
fn update_missing_card_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteHouseholdRepository::try_new(&conn).unwrap();

    let orphan = card("Orphan", date(2026, 8, 10), 0.0);
    let err = repo.update_card(&orphan).unwrap_err();
    assert!(matches!(err, RepoError::CardNotFound(id) if id == orphan.id));
}

#[test]
fn validation_failure_blocks_card_writes() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteHouseholdRepository::try_new(&conn).unwrap();

    let person = Person::new("Avery", None);
    repo.create_person(&person).unwrap();

    let mut invalid = card("Sapphire", date(2026, 8, 10), 0.0);
    invalid.remind_days_before = 0;
    let err = repo.create_card(person.id, &invalid).unwrap_err();
    assert!(matches!(
        err,
        RepoError::CardValidation(CardValidationError::ZeroReminderLead)
    ));
}

#[test]
fn payment_log_lists_most_recent_first() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteHouseholdRepository::try_new(&conn).unwrap();

    let person = Person::new("Avery", None);
    repo.create_person(&person).unwrap();
    let owned = card("Sapphire", date(2026, 8, 10), 50.0);
    repo.create_card(person.id, &owned).unwrap();

    let first = PaymentLogEntry::new(
        owned.id,
        date(2026, 6, 10),
        40.0,
        date(2026, 6, 10),
        date(2026, 7, 10),
    );
    let second = PaymentLogEntry::new(
        owned.id,
        date(2026, 7, 10),
        50.0,
        date(2026, 7, 10),
        date(2026, 8, 10),
    );
    repo.append_payment(&first).unwrap();
    repo.append_payment(&second).unwrap();

    let entries = repo.list_payments(owned.id).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].id, second.id);
    assert_eq!(entries[1].id, first.id);
}

#[test]
fn clear_all_empties_every_table() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteHouseholdRepository::try_new(&conn).unwrap();

    let person = Person::new("Avery", None);
    repo.create_person(&person).unwrap();
    repo.create_card(person.id, &card("Sapphire", date(2026, 8, 10), 50.0))
        .unwrap();

    repo.clear_all().unwrap();
    assert_eq!(repo.count_people().unwrap(), 0);
    assert!(repo.list_people().unwrap().is_empty());
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    let result = SqliteHouseholdRepository::try_new(&conn);
    match result {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert!(expected_version > 0),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_required_tables() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteHouseholdRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredTable("people"))
    ));
}

#[test]
fn repository_rejects_connection_missing_required_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE people (
            uuid TEXT PRIMARY KEY NOT NULL,
            name TEXT NOT NULL
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteHouseholdRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredColumn {
            table: "people",
            column: "email"
        })
    ));
}
