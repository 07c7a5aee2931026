#![forbid(unsafe_code)]

use ec_core::UserId;
use ec_storage::{NewUser, SqliteStore};
use std::path::PathBuf;

fn temp_dir(test_name: &str) -> PathBuf {
    let base = std::env::temp_dir();
    let pid = std::process::id();
    let nonce = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let dir = base.join(format!("ec_storage_{test_name}_{pid}_{nonce}"));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

fn new_user(name: &str, email: Option<&str>) -> NewUser {
    NewUser {
        name: name.to_string(),
        email: email.map(str::to_string),
        kind: "resident".to_string(),
    }
}

#[test]
fn duplicate_email_is_invalid_input_and_writes_nothing() {
    let storage_dir = temp_dir("duplicate_email_is_invalid_input_and_writes_nothing");
    let mut store = SqliteStore::open(&storage_dir).expect("open store");

    let first = store
        .create_user(new_user("Dana", Some(" dana@example.org ")))
        .expect("first user");
    assert_eq!(first.email.as_deref(), Some("dana@example.org"));
    assert_eq!(first.kind, "RESIDENT");

    let err = store
        .create_user(new_user("Dana again", Some("dana@example.org")))
        .expect_err("duplicate email");
    assert_eq!(err.code(), "INVALID_INPUT");
    assert!(err.to_string().contains("email already exists"));

    let next = store
        .create_user(new_user("Omer", None))
        .expect("user without email");
    assert_eq!(next.user_id.get(), first.user_id.get() + 1);
    store
        .create_user(new_user("Lior", Some("   ")))
        .expect("blank email is stored as none");
}

#[test]
fn deactivation_is_persisted_and_missing_users_are_not_found() {
    let storage_dir = temp_dir("deactivation_is_persisted_and_missing_users_are_not_found");
    let mut store = SqliteStore::open(&storage_dir).expect("open store");
    let user = store.create_user(new_user("Yael", None)).expect("user");
    assert!(user.is_active);

    let inactive = store
        .set_user_active(user.user_id, false)
        .expect("deactivate");
    assert!(!inactive.is_active);
    assert!(!store.get_user(user.user_id).expect("reload").is_active);

    let missing = UserId::new(user.user_id.get() + 100);
    assert_eq!(store.get_user(missing).expect_err("missing").code(), "NOT_FOUND");
    let err = store.set_user_active(missing, true).expect_err("missing");
    assert_eq!(err.code(), "NOT_FOUND");
}
