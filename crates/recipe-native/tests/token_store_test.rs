// File-backed token slot and sessions persisted through it

use std::fs;

use jsonwebtoken::{encode, EncodingKey, Header};
use recipe_core::runtime::TokenStore;
use recipe_core::{Session, StoreError};
use recipe_native::runtime_impl::StoredToken;
use recipe_native::FileTokenStore;
use serde_json::json;

fn token(user_id: &str) -> String {
    encode(
        &Header::default(),
        &json!({
            "sub": user_id,
            "https://hasura.io/jwt/claims": {
                "x-hasura-user-id": user_id,
                "x-hasura-default-role": "user",
                "x-hasura-allowed-roles": ["user"]
            }
        }),
        &EncodingKey::from_secret(b"test-secret"),
    )
    .unwrap()
}

#[test]
fn test_missing_file_is_empty_slot() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileTokenStore::new("auth-token", dir.path().join("auth-token.json"));
    assert_eq!(store.load().unwrap(), None);
    assert!(store.clear().is_ok());
}

#[test]
fn test_store_creates_directories_and_records_metadata() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("slot").join("auth-token.json");
    let store = FileTokenStore::new("auth-token", &path);

    store.store("abc.def.ghi").unwrap();
    assert_eq!(store.load().unwrap().as_deref(), Some("abc.def.ghi"));

    let stored: StoredToken = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(stored.name, "auth-token");
    assert_eq!(stored.token, "abc.def.ghi");
    assert!(chrono::DateTime::parse_from_rfc3339(&stored.stored_at).is_ok());

    store.clear().unwrap();
    assert!(!path.exists());
    assert_eq!(store.load().unwrap(), None);
}

#[test]
fn test_corrupt_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("auth-token.json");
    fs::write(&path, "{not json").unwrap();

    let store = FileTokenStore::new("auth-token", &path);
    assert!(matches!(store.load(), Err(StoreError::Corrupt(_))));

    // A corrupt slot reads as signed out rather than failing the caller
    let session = Session::new(store);
    assert!(!session.is_authenticated());
    assert_eq!(session.user_id(), None);
}

#[test]
fn test_session_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("auth-token.json");

    let first = Session::new(FileTokenStore::new("auth-token", &path));
    first.login(&token("42"), None).unwrap();
    drop(first);

    let second = Session::new(FileTokenStore::new("auth-token", &path));
    assert!(second.is_authenticated());
    assert_eq!(second.user_id(), Some("42".to_string()));

    second.logout().unwrap();
    assert!(!path.exists());
}

#[test]
fn test_slot_replaced_by_another_process() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("auth-token.json");
    let session = Session::new(FileTokenStore::new("auth-token", &path));
    session.login(&token("1"), None).unwrap();
    assert_eq!(session.user_id(), Some("1".to_string()));

    FileTokenStore::new("auth-token", &path).store(&token("2")).unwrap();
    assert_eq!(session.user_id(), Some("2".to_string()));
}
