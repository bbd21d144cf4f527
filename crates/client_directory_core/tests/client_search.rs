use client_directory_core::db::open_db_in_memory;
use client_directory_core::{
    ClientDirectory, ClientFilter, ClientMatch, NewClient, SqliteClientRepository,
};
use rusqlite::Connection;

struct Fixture {
    alice: i64,
    anna: i64,
    bob: i64,
}

fn seeded(conn: &Connection) -> (ClientDirectory<SqliteClientRepository<'_>>, Fixture) {
    let directory = ClientDirectory::new(SqliteClientRepository::try_new(conn).unwrap());
    directory.ensure_schema().unwrap();

    let alice = directory
        .add_client(&NewClient::new("A", "Smith", "alice@example.com").with_phones(["1", "2"]))
        .unwrap();
    let anna = directory
        .add_client(&NewClient::new("A", "Jones", "anna@example.com").with_phones(["3"]))
        .unwrap();
    let bob = directory
        .add_client(&NewClient::new("B", "Smith", "bob@example.com"))
        .unwrap();

    (directory, Fixture { alice, anna, bob })
}

fn pairs(rows: &[ClientMatch]) -> Vec<(i64, Option<&str>)> {
    rows.iter()
        .map(|row| (row.client_id, row.phone.as_deref()))
        .collect()
}

#[test]
fn no_filters_returns_every_client_phone_pairing() {
    let conn = open_db_in_memory().unwrap();
    let (directory, ids) = seeded(&conn);

    let rows = directory.find_clients(&ClientFilter::default()).unwrap();

    assert_eq!(
        pairs(&rows),
        vec![
            (ids.alice, Some("1")),
            (ids.alice, Some("2")),
            (ids.anna, Some("3")),
            (ids.bob, None),
        ]
    );
    let bob = &rows[3];
    assert_eq!(bob.first_name.as_deref(), Some("B"));
    assert_eq!(bob.last_name.as_deref(), Some("Smith"));
    assert_eq!(bob.email.as_deref(), Some("bob@example.com"));
}

#[test]
fn first_name_and_phone_filters_are_and_combined() {
    let conn = open_db_in_memory().unwrap();
    let (directory, ids) = seeded(&conn);

    let rows = directory
        .find_clients(&ClientFilter::default().first_name("A").phone("2"))
        .unwrap();

    assert_eq!(pairs(&rows), vec![(ids.alice, Some("2"))]);
}

#[test]
fn phone_filter_excludes_clients_without_phones() {
    let conn = open_db_in_memory().unwrap();
    let (directory, _) = seeded(&conn);

    let rows = directory
        .find_clients(&ClientFilter::default().last_name("Smith").phone("3"))
        .unwrap();

    assert!(rows.is_empty());
}

#[test]
fn last_name_filter_keeps_clients_without_phones() {
    let conn = open_db_in_memory().unwrap();
    let (directory, ids) = seeded(&conn);

    let rows = directory
        .find_clients(&ClientFilter::default().last_name("Smith"))
        .unwrap();

    assert_eq!(
        pairs(&rows),
        vec![
            (ids.alice, Some("1")),
            (ids.alice, Some("2")),
            (ids.bob, None),
        ]
    );
}

#[test]
fn email_filter_matches_exactly() {
    let conn = open_db_in_memory().unwrap();
    let (directory, ids) = seeded(&conn);

    let rows = directory
        .find_clients(&ClientFilter::default().email("anna@example.com"))
        .unwrap();
    assert_eq!(pairs(&rows), vec![(ids.anna, Some("3"))]);

    let rows = directory
        .find_clients(&ClientFilter::default().email("ANNA@example.com"))
        .unwrap();
    assert!(rows.is_empty());
}

#[test]
fn empty_criteria_are_ignored() {
    let conn = open_db_in_memory().unwrap();
    let (directory, _) = seeded(&conn);

    let unfiltered = directory.find_clients(&ClientFilter::default()).unwrap();
    let blank = directory
        .find_clients(
            &ClientFilter::default()
                .first_name("")
                .last_name("")
                .email("")
                .phone(""),
        )
        .unwrap();

    assert_eq!(blank, unfiltered);
}

#[test]
fn filter_values_are_bound_not_interpolated() {
    let conn = open_db_in_memory().unwrap();
    let (directory, _) = seeded(&conn);

    let rows = directory
        .find_clients(&ClientFilter::default().first_name("A' OR '1' = '1"))
        .unwrap();

    assert!(rows.is_empty());
}

#[test]
fn search_on_empty_store_returns_no_rows() {
    let conn = open_db_in_memory().unwrap();
    let directory = ClientDirectory::new(SqliteClientRepository::try_new(&conn).unwrap());
    directory.ensure_schema().unwrap();

    assert!(directory
        .find_clients(&ClientFilter::default())
        .unwrap()
        .is_empty());
}
