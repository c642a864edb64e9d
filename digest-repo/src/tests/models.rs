use mongodb::bson::{Bson, doc};

use crate::models::{ChatSettings, StoredMessage, UserMessageCount};

#[test]
fn test_stored_message_without_id_omits_id() {
    let msg = StoredMessage {
        id: None,
        chat_id: -100,
        message_id: 5,
        user_id: Some(7),
        username: None,
        text: "hello".to_string(),
        date: 1_700_000_000,
    };

    let document = mongodb::bson::to_document(&msg).unwrap();

    assert!(!document.contains_key("_id"));
    assert_eq!(document.get_i64("chat_id").unwrap(), -100);
    assert_eq!(document.get_i64("date").unwrap(), 1_700_000_000);
    assert_eq!(document.get("username"), Some(&Bson::Null));
}

#[test]
fn test_settings_missing_fields_default_to_none() {
    let settings: ChatSettings =
        mongodb::bson::from_document(doc! { "chat_id": 1_i64, "keywords": "a,b" }).unwrap();

    assert_eq!(settings.chat_id, 1);
    assert_eq!(settings.keywords.as_deref(), Some("a,b"));
    assert!(settings.digest_time.is_none());
    assert!(settings.admin_user_id.is_none());
}

#[test]
fn test_user_count_accepts_int32_count() {
    let row: UserMessageCount = mongodb::bson::from_document(doc! {
        "user_id": 42_i64,
        "username": Bson::Null,
        "count": 17_i32,
    })
    .unwrap();

    assert_eq!(row.user_id, Some(42));
    assert!(row.username.is_none());
    assert_eq!(row.count, 17);
}
