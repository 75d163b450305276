use serde_json::json;

use super::*;

fn temp_dir(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "flavorbag_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

#[test]
fn login_response_field_fallbacks() {
    let s = UserSession::from_login_response(
        &json!({"token": "t", "username": "ana", "id": "u1"}),
        "typed",
    );
    assert_eq!(s.token.as_deref(), Some("t"));
    assert_eq!(s.username, "ana");
    assert_eq!(s.id.as_deref(), Some("u1"));

    let s = UserSession::from_login_response(&json!({"name": "bo", "_id": 12}), "typed");
    assert_eq!(s.token, None);
    assert_eq!(s.username, "bo");
    assert_eq!(s.id.as_deref(), Some("12"));

    let s = UserSession::from_login_response(
        &json!({"token": "t", "user": {"username": "cy", "_id": "u3"}}),
        "typed",
    );
    assert_eq!(s.token.as_deref(), Some("t"));
    assert_eq!(s.username, "cy");
    assert_eq!(s.id.as_deref(), Some("u3"));

    let s = UserSession::from_login_response(&json!({}), "typed");
    assert_eq!(s.username, "typed");
    assert_eq!(s.id, None);
}

#[test]
fn store_save_load_clear() {
    let dir = temp_dir("user_store");
    let store = UserStore::new(dir.join("nested").join("user.json"));
    assert_eq!(store.load().unwrap(), None);

    let session = UserSession {
        token: None,
        username: "ana".to_string(),
        id: Some("u1".to_string()),
    };
    store.save(&session).unwrap();
    assert_eq!(store.load().unwrap(), Some(session));

    store.clear().unwrap();
    assert_eq!(store.load().unwrap(), None);
    store.clear().unwrap();

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn corrupt_store_is_a_serde_error() {
    let dir = temp_dir("user_store_corrupt");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("user.json");
    std::fs::write(&path, b"{not json").unwrap();
    let err = UserStore::new(&path).load().unwrap_err();
    assert!(matches!(err, FlavorError::Serde(_)));
    std::fs::remove_dir_all(&dir).ok();
}
