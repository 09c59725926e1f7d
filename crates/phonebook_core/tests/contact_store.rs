use phonebook_core::{Contact, ContactStore, StoreError, StorePaths};
use std::fs;
use tempfile::TempDir;

fn open_store(dir: &TempDir) -> ContactStore {
    ContactStore::with_paths(&StorePaths::beside(dir.path())).unwrap()
}

fn mirror_lines(store: &ContactStore) -> Vec<String> {
    fs::read_to_string(store.mirror_path())
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

fn listing_lines(store: &ContactStore) -> Vec<String> {
    store
        .list()
        .unwrap()
        .iter()
        .map(Contact::mirror_line)
        .collect()
}

fn names(contacts: &[Contact]) -> Vec<&str> {
    contacts.iter().map(|contact| contact.name.as_str()).collect()
}

#[test]
fn initialize_creates_missing_directories_and_empty_mirror() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(&dir);

    assert!(dir.path().join("Db_Files").is_dir());
    assert!(dir.path().join("Text_Files").is_dir());
    assert!(store.db_path().is_file());
    assert_eq!(fs::read_to_string(store.mirror_path()).unwrap(), "");
}

#[test]
fn initialize_fails_when_database_file_is_not_sqlite() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("Directory.db");
    fs::write(&db_path, "Ann Lee: 555\nBob Jones: 556\n").unwrap();

    let result = ContactStore::initialize(&db_path, dir.path().join("Directory.txt"));
    assert!(matches!(result, Err(StoreError::Unavailable(_))));
}

#[test]
fn initialize_fails_when_directory_cannot_be_created() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "not a directory").unwrap();

    let result = ContactStore::initialize(
        blocker.join("Directory.db"),
        dir.path().join("Directory.txt"),
    );
    assert!(matches!(result, Err(StoreError::CreateDir { .. })));
}

#[test]
fn initialize_regenerates_stale_mirror_and_keeps_contacts() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(&dir);
    store.add("Ann Lee", "555").unwrap();
    let mirror_path = store.mirror_path().to_path_buf();
    store.close().unwrap();

    fs::write(&mirror_path, "garbage\n").unwrap();

    let reopened = open_store(&dir);
    assert_eq!(names(&reopened.list().unwrap()), vec!["Ann Lee"]);
    assert_eq!(mirror_lines(&reopened), vec!["Ann Lee: 555"]);
}

#[test]
fn add_then_list_shows_exactly_that_contact() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(&dir);

    let added = store.add("Ann Lee", "+1 (555) 010-0000").unwrap();

    let listed = store.list().unwrap();
    assert_eq!(listed, vec![added]);
    assert_eq!(listed[0].phone, "+1 (555) 010-0000");
}

#[test]
fn duplicate_add_is_rejected_without_touching_mirror() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(&dir);
    store.add("Ann Lee", "1").unwrap();
    let before = fs::read_to_string(store.mirror_path()).unwrap();

    let err = store.add("Ann Lee", "2").unwrap_err();
    assert!(matches!(err, StoreError::DuplicateName(ref name) if name == "Ann Lee"));

    let listed = store.list().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].phone, "1");
    assert_eq!(fs::read_to_string(store.mirror_path()).unwrap(), before);
}

#[test]
fn invalid_add_is_reported_as_validation_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(&dir);

    let err = store.add("Ann\nLee", "1").unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));
    assert!(store.list().unwrap().is_empty());
}

#[test]
fn remove_missing_name_reports_not_found_and_keeps_contacts() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(&dir);
    store.add("Ann Lee", "1").unwrap();

    let err = store.remove("Bob Jones").unwrap_err();
    assert!(matches!(err, StoreError::NotFound(ref name) if name == "Bob Jones"));
    assert_eq!(names(&store.list().unwrap()), vec!["Ann Lee"]);
}

#[test]
fn remove_not_found_still_heals_mirror() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(&dir);
    store.add("Ann Lee", "1").unwrap();
    fs::write(store.mirror_path(), "").unwrap();

    assert!(store.remove("Nobody").is_err());
    assert_eq!(mirror_lines(&store), vec!["Ann Lee: 1"]);
}

#[test]
fn remove_not_found_wins_over_mirror_failure() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(&dir);
    store.add("Ann Lee", "1").unwrap();
    fs::remove_dir_all(store.mirror_path().parent().unwrap()).unwrap();

    let err = store.remove("Nobody").unwrap_err();
    assert!(matches!(err, StoreError::NotFound(ref name) if name == "Nobody"));

    let err = store.remove("Ann Lee").unwrap_err();
    assert!(matches!(err, StoreError::Mirror(_)));
    assert!(store.list().unwrap().is_empty());
}

#[test]
fn remove_existing_name_reports_one_and_updates_mirror() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(&dir);
    store.add("Ann Lee", "1").unwrap();
    store.add("Bob Jones", "2").unwrap();

    assert_eq!(store.remove("Ann Lee").unwrap(), 1);
    assert_eq!(mirror_lines(&store), vec!["Bob Jones: 2"]);
}

#[test]
fn listing_sorts_by_text_after_first_space() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(&dir);
    store.add("Alice Smith", "1").unwrap();
    store.add("Bob Jones", "2").unwrap();
    store.add("Carol", "3").unwrap();

    assert_eq!(
        names(&store.list().unwrap()),
        vec!["Carol", "Bob Jones", "Alice Smith"]
    );
}

#[test]
fn mirror_matches_listing_after_mixed_operations() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = open_store(&dir);

    store.add("Alice Smith", "1").unwrap();
    store.add("Bob Jones", "2").unwrap();
    assert_eq!(mirror_lines(&store), listing_lines(&store));

    store.add("Carol", "3").unwrap();
    let _ = store.add("Carol", "4");
    store.remove("Alice Smith").unwrap();
    let _ = store.remove("Alice Smith");
    assert_eq!(mirror_lines(&store), listing_lines(&store));
    assert_eq!(mirror_lines(&store), vec!["Carol: 3", "Bob Jones: 2"]);

    store.reset().unwrap();
    store.add("Dan Brown", "5").unwrap();
    assert_eq!(mirror_lines(&store), listing_lines(&store));
    assert_eq!(mirror_lines(&store), vec!["Dan Brown: 5"]);
}

#[test]
fn reset_empties_contacts_and_mirror() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = open_store(&dir);
    store.add("Ann Lee", "1").unwrap();
    store.add("Carol", "2").unwrap();

    store.reset().unwrap();

    assert!(store.list().unwrap().is_empty());
    assert_eq!(fs::read_to_string(store.mirror_path()).unwrap(), "");
}

#[test]
fn reset_allows_previous_names_again() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = open_store(&dir);
    store.add("Ann Lee", "1").unwrap();

    store.reset().unwrap();

    let readded = store.add("Ann Lee", "9").unwrap();
    assert_eq!(readded.phone, "9");
}

#[test]
fn list_is_idempotent_without_mutation() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(&dir);
    store.add("Bob Jones", "2").unwrap();
    store.add("Carol", "3").unwrap();

    assert_eq!(store.list().unwrap(), store.list().unwrap());
}

#[test]
fn close_releases_handle_and_data_survives() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(&dir);
    store.add("Ann Lee", "1").unwrap();
    store.close().unwrap();

    let reopened = open_store(&dir);
    assert_eq!(names(&reopened.list().unwrap()), vec!["Ann Lee"]);
}

#[test]
fn mirror_write_failure_is_reported_after_commit() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(&dir);
    let mirror_dir = store.mirror_path().parent().unwrap().to_path_buf();

    fs::remove_dir_all(&mirror_dir).unwrap();
    let err = store.add("Ann Lee", "1").unwrap_err();
    assert!(matches!(err, StoreError::Mirror(_)));
    assert_eq!(names(&store.list().unwrap()), vec!["Ann Lee"]);

    fs::create_dir_all(&mirror_dir).unwrap();
    store.add("Bob Jones", "2").unwrap();
    assert_eq!(mirror_lines(&store), vec!["Bob Jones: 2", "Ann Lee: 1"]);
}
