use std::collections::HashMap;

use sea_orm::{EntityTrait, PaginatorTrait};
use serde_json::json;
use student_portal::entity::session;
use student_portal::{db, SqliteSessionStore};
use time::{Duration, OffsetDateTime};
use tower_sessions::session::{Id, Record};
use tower_sessions::{ExpiredDeletion, SessionStore};

fn record(expires_in: Duration) -> Record {
    let mut data = HashMap::new();
    data.insert("hallticketnumber".to_string(), json!("CSE20251"));
    Record {
        id: Id::default(),
        data,
        expiry_date: OffsetDateTime::now_utc() + expires_in,
    }
}

async fn store() -> (SqliteSessionStore, sea_orm::DatabaseConnection) {
    let conn = db::open_in_memory().await.unwrap();
    (SqliteSessionStore::new(conn.clone()), conn)
}

#[tokio::test]
async fn create_then_load() {
    let (store, _) = store().await;
    let mut rec = record(Duration::hours(1));
    store.create(&mut rec).await.unwrap();

    let loaded = store.load(&rec.id).await.unwrap().unwrap();
    assert_eq!(loaded.id, rec.id);
    assert_eq!(loaded.data["hallticketnumber"], json!("CSE20251"));
}

#[tokio::test]
async fn save_overwrites_existing_record() {
    let (store, conn) = store().await;
    let mut rec = record(Duration::hours(1));
    store.create(&mut rec).await.unwrap();

    rec.data
        .insert("hallticketnumber".to_string(), json!("CSE20252"));
    store.save(&rec).await.unwrap();

    let loaded = store.load(&rec.id).await.unwrap().unwrap();
    assert_eq!(loaded.data["hallticketnumber"], json!("CSE20252"));
    assert_eq!(session::Entity::find().count(&conn).await.unwrap(), 1);
}

#[tokio::test]
async fn expired_records_are_hidden_and_swept() {
    let (store, conn) = store().await;
    let mut live = record(Duration::hours(1));
    let mut stale = record(Duration::hours(-1));
    store.create(&mut live).await.unwrap();
    store.create(&mut stale).await.unwrap();

    assert!(store.load(&stale.id).await.unwrap().is_none());
    assert_eq!(session::Entity::find().count(&conn).await.unwrap(), 2);

    store.delete_expired().await.unwrap();
    assert_eq!(session::Entity::find().count(&conn).await.unwrap(), 1);
    assert!(store.load(&live.id).await.unwrap().is_some());
}

#[tokio::test]
async fn delete_removes_the_record() {
    let (store, _) = store().await;
    let mut rec = record(Duration::hours(1));
    store.create(&mut rec).await.unwrap();

    store.delete(&rec.id).await.unwrap();
    assert!(store.load(&rec.id).await.unwrap().is_none());
    // Deleting again is not an error.
    store.delete(&rec.id).await.unwrap();
}
