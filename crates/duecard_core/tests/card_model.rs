use chrono::NaiveDate;
use duecard_core::{
    derive_color_from_nickname, Cadence, CardValidationError, CreditCardAccount, Person,
    PersonValidationError, DEFAULT_REMINDER_LEAD_DAYS,
};
use uuid::Uuid;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn new_card_sets_form_defaults() {
    let card = CreditCardAccount::new("Sapphire", "Chase", date(2026, 8, 10), Cadence::Monthly);

    assert!(!card.id.is_nil());
    assert_eq!(card.amount_due, 0.0);
    assert!(!card.autopay);
    assert_eq!(card.remind_days_before, DEFAULT_REMINDER_LEAD_DAYS);
    assert_eq!(card.last_paid_on, None);
    assert_eq!(card.color, derive_color_from_nickname("Sapphire"));
    assert!(card.validate().is_ok());
}

#[test]
fn with_id_rejects_nil_uuid() {
    let err = CreditCardAccount::with_id(
        Uuid::nil(),
        "Sapphire",
        "Chase",
        date(2026, 8, 10),
        Cadence::Monthly,
    )
    .unwrap_err();
    assert_eq!(err, CardValidationError::NilUuid);
}

#[test]
fn validate_rejects_bad_field_values() {
    let base = CreditCardAccount::new("Sapphire", "Chase", date(2026, 8, 10), Cadence::Monthly);

    let mut card = base.clone();
    card.nickname = "  ".to_string();
    assert_eq!(card.validate(), Err(CardValidationError::EmptyNickname));

    let mut card = base.clone();
    card.issuer = String::new();
    assert_eq!(card.validate(), Err(CardValidationError::EmptyIssuer));

    let mut card = base.clone();
    card.remind_days_before = 0;
    assert_eq!(card.validate(), Err(CardValidationError::ZeroReminderLead));

    let mut card = base.clone();
    card.amount_due = -1.0;
    assert_eq!(card.validate(), Err(CardValidationError::InvalidAmount));

    let mut card = base.clone();
    card.amount_due = f64::NAN;
    assert_eq!(card.validate(), Err(CardValidationError::InvalidAmount));

    let mut card = base;
    card.color = "teal".to_string();
    assert!(matches!(
        card.validate(),
        Err(CardValidationError::InvalidColor(_))
    ));
}

#[test]
fn card_serialization_uses_expected_wire_fields() {
    let card_id = Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap();
    let mut card = CreditCardAccount::with_id(
        card_id,
        "Sapphire",
        "Chase",
        date(2026, 8, 10),
        Cadence::Biweekly,
    )
    .unwrap();
    card.amount_due = 482.19;
    card.autopay = true;
    card.last_paid_on = Some(date(2026, 7, 27));

    let json = serde_json::to_value(&card).unwrap();
    assert_eq!(json["id"], card_id.to_string());
    assert_eq!(json["nickname"], "Sapphire");
    assert_eq!(json["issuer"], "Chase");
    assert_eq!(json["due_date"], "2026-08-10");
    assert_eq!(json["amount_due"], 482.19);
    assert_eq!(json["autopay"], true);
    assert_eq!(json["cadence"], "biweekly");
    assert_eq!(json["last_paid_on"], "2026-07-27");

    let decoded: CreditCardAccount = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, card);
}

#[test]
fn person_deserialization_defaults_missing_cards() {
    let value = serde_json::json!({
        "id": "11111111-2222-4333-8444-555555555555",
        "name": "Avery Chen",
        "email": null
    });

    let person: Person = serde_json::from_value(value).unwrap();
    assert!(person.cards.is_empty());
    assert!(person.validate().is_ok());
}

#[test]
fn person_validation_rejects_bad_email_shape() {
    let person = Person::new("Avery", Some("avery-at-example".to_string()));
    assert!(matches!(
        person.validate(),
        Err(PersonValidationError::InvalidEmail(_))
    ));
}
