use card_core::db::open_db_in_memory;
use card_core::{Card, CardRepository, RepoError, SqliteCardRepository};
use uuid::Uuid;

#[test]
fn insert_and_find_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCardRepository::new(&conn);

    let card = Card::new("1111222233334444", 1, 2019, "Test Name");
    let id = repo.insert(&card).unwrap();
    assert_eq!(id, card.id);

    let loaded = repo.find_by_number("1111222233334444").unwrap().unwrap();
    assert_eq!(loaded, card);
}

#[test]
fn find_by_number_is_exact_match() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCardRepository::new(&conn);
    repo.insert(&Card::new("0111222233334444", 1, 2030, "Test Name"))
        .unwrap();

    assert!(repo.find_by_number("111222233334444").unwrap().is_none());
    assert!(repo.find_by_number("0111222233334444").unwrap().is_some());
}

#[test]
fn duplicate_number_is_rejected_without_changing_count() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCardRepository::new(&conn);

    repo.insert(&Card::new("1111222233334444", 1, 2019, "Test Name"))
        .unwrap();

    let err = repo
        .insert(&Card::new("1111222233334444", 2, 2020, "Test Name2"))
        .unwrap_err();
    assert!(matches!(err, RepoError::DuplicateNumber(ref masked) if masked == "************4444"));
    assert_eq!(repo.count().unwrap(), 1);

    repo.insert(&Card::new("1111222233335555", 1, 2019, "Test Name"))
        .unwrap();
    assert_eq!(repo.count().unwrap(), 2);
}

#[test]
fn insert_validates_before_writing() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCardRepository::new(&conn);

    let err = repo
        .insert(&Card::new("1111", 1, 2030, "Test Name"))
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
    assert_eq!(repo.count().unwrap(), 0);
}

#[test]
fn delete_removes_row_and_reports_missing_id() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCardRepository::new(&conn);

    let card = Card::new("1111222233334444", 1, 2030, "Test Name");
    repo.insert(&card).unwrap();
    repo.delete(card.id).unwrap();
    assert_eq!(repo.count().unwrap(), 0);

    let err = repo.delete(card.id).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(id) if id == card.id));

    let missing = Uuid::new_v4();
    assert!(matches!(
        repo.delete(missing).unwrap_err(),
        RepoError::NotFound(id) if id == missing
    ));
}

#[test]
fn list_is_ordered_by_number() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCardRepository::new(&conn);

    for number in ["3333222233334444", "1111222233334444", "2222222233334444"] {
        repo.insert(&Card::new(number, 5, 2030, "Test Name")).unwrap();
    }

    let numbers: Vec<String> = repo
        .list()
        .unwrap()
        .into_iter()
        .map(|card| card.number)
        .collect();
    assert_eq!(
        numbers,
        vec!["1111222233334444", "2222222233334444", "3333222233334444"]
    );
}

#[test]
fn corrupted_rows_are_reported_not_masked() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO cards (id, number, month, year, name)
         VALUES ('not-a-uuid', '1111222233334444', 1, 2030, 'Test Name');",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO cards (id, number, month, year, name)
         VALUES ('11111111-2222-4333-8444-555555555555', 'abcd222233334444', 1, 2030, 'Test Name');",
        [],
    )
    .unwrap();
    let repo = SqliteCardRepository::new(&conn);

    let err = repo.find_by_number("1111222233334444").unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(ref message) if message.contains("cards.id")));

    let err = repo.find_by_number("abcd222233334444").unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(ref message) if message.contains("************4444")));
}
