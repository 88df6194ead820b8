use card_core::{Card, CardValidationError};
use uuid::Uuid;

#[test]
fn card_new_sets_fields_and_fresh_id() {
    let first = Card::new("1111222233334444", 1, 2030, "Test Name");
    let second = Card::new("1111222233334444", 1, 2030, "Test Name");

    assert!(!first.id.is_nil());
    assert_ne!(first.id, second.id);
    assert_eq!(first.number, "1111222233334444");
    assert_eq!(first.month, 1);
    assert_eq!(first.year, 2030);
    assert_eq!(first.name, "Test Name");
    assert_eq!(first.validate(), Ok(()));
}

#[test]
fn masked_number_hides_all_but_last_four() {
    let card = Card::new("1111222233334444", 1, 2030, "Test Name");
    assert_eq!(card.masked_number(), "************4444");
}

#[test]
fn validate_rejects_malformed_fields() {
    let short = Card::new("1111", 1, 2030, "Test Name");
    assert_eq!(
        short.validate(),
        Err(CardValidationError::InvalidNumber("1111".to_string()))
    );

    let bad_month = Card::new("1111222233334444", 13, 2030, "Test Name");
    assert_eq!(
        bad_month.validate(),
        Err(CardValidationError::MonthOutOfRange(13))
    );

    let unnamed = Card::new("1111222233334444", 1, 2030, "");
    assert_eq!(unnamed.validate(), Err(CardValidationError::EmptyName));

    let mut nil = Card::new("1111222233334444", 1, 2030, "Test Name");
    nil.id = Uuid::nil();
    assert_eq!(nil.validate(), Err(CardValidationError::NilId));
}

#[test]
fn card_serialization_uses_expected_wire_fields() {
    let card_id = Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap();
    let card = Card {
        id: card_id,
        number: "0000222233334444".to_string(),
        month: 3,
        year: 2031,
        name: "Test Name".to_string(),
    };

    let json = serde_json::to_value(&card).unwrap();
    assert_eq!(json["id"], card_id.to_string());
    assert_eq!(json["number"], "0000222233334444");
    assert_eq!(json["month"], 3);
    assert_eq!(json["year"], 2031);
    assert_eq!(json["name"], "Test Name");

    let decoded: Card = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, card);
}
