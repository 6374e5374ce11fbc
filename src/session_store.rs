use async_trait::async_trait;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    QueryFilter, Set, TransactionTrait,
};
use time::OffsetDateTime;
use tower_sessions::{session::Id, session::Record, session_store, ExpiredDeletion, SessionStore};

use crate::entity::session::{self, ActiveModel as SessionActiveModel, Entity as SessionEntity};

/// Login sessions persisted in the portal's SQLite database.
///
/// Records are MessagePack-encoded into the `sessions` table created by the
/// portal migrations, so sessions survive restarts and live next to the data
/// they guard. Sessions past their expiry date are never returned by
/// [`SessionStore::load`] and are removed in bulk by
/// [`ExpiredDeletion::delete_expired`].
///
/// ```no_run
/// use student_portal::SqliteSessionStore;
/// use time::Duration;
/// use tower_sessions::{Expiry, SessionManagerLayer};
///
/// # async fn example(conn: sea_orm::DatabaseConnection) {
/// let store = SqliteSessionStore::new(conn);
/// let layer = SessionManagerLayer::new(store)
///     .with_secure(false)
///     .with_expiry(Expiry::OnInactivity(Duration::hours(24)));
/// # }
/// ```
///
/// # Error Mapping
///
/// - Database errors → `session_store::Error::Backend`
/// - Encoding errors (including unrepresentable expiry dates) → `session_store::Error::Encode`
/// - Decoding errors → `session_store::Error::Decode`
#[derive(Debug, Clone)]
pub struct SqliteSessionStore {
    conn: DatabaseConnection,
}

impl SqliteSessionStore {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl SessionStore for SqliteSessionStore {
    /// Inserts a new record, drawing a fresh id for as long as the current one
    /// is already taken.
    async fn create(&self, record: &mut Record) -> session_store::Result<()> {
        let txn = self.conn.begin().await.map_err(backend)?;

        while SessionEntity::find_by_id(record.id.to_string())
            .one(&txn)
            .await
            .map_err(backend)?
            .is_some()
        {
            record.id = Id::default();
        }

        let (data, expiry_date) = encode(record)?;
        SessionActiveModel {
            id: Set(record.id.to_string()),
            data: Set(data),
            expiry_date: Set(expiry_date),
        }
        .insert(&txn)
        .await
        .map_err(backend)?;

        txn.commit().await.map_err(backend)?;
        Ok(())
    }

    /// Upserts the record.
    async fn save(&self, record: &Record) -> session_store::Result<()> {
        let (data, expiry_date) = encode(record)?;

        match SessionEntity::find_by_id(record.id.to_string())
            .one(&self.conn)
            .await
            .map_err(backend)?
        {
            Some(existing) => {
                let mut active_model = existing.into_active_model();
                active_model.data = Set(data);
                active_model.expiry_date = Set(expiry_date);
                active_model.update(&self.conn).await.map_err(backend)?;
            }
            None => {
                SessionActiveModel {
                    id: Set(record.id.to_string()),
                    data: Set(data),
                    expiry_date: Set(expiry_date),
                }
                .insert(&self.conn)
                .await
                .map_err(backend)?;
            }
        }

        Ok(())
    }

    /// Loads a record that has not yet expired.
    async fn load(&self, session_id: &Id) -> session_store::Result<Option<Record>> {
        let now = to_db_time(OffsetDateTime::now_utc())?;

        let session = SessionEntity::find_by_id(session_id.to_string())
            .filter(session::Column::ExpiryDate.gt(now))
            .one(&self.conn)
            .await
            .map_err(backend)?;

        session
            .map(|model| {
                rmp_serde::from_slice(&model.data)
                    .map_err(|e| session_store::Error::Decode(e.to_string()))
            })
            .transpose()
    }

    async fn delete(&self, session_id: &Id) -> session_store::Result<()> {
        SessionEntity::delete_by_id(session_id.to_string())
            .exec(&self.conn)
            .await
            .map_err(backend)?;
        Ok(())
    }
}

#[async_trait]
impl ExpiredDeletion for SqliteSessionStore {
    /// Removes every record whose expiry date has passed.
    ///
    /// The binary runs this once an hour.
    async fn delete_expired(&self) -> session_store::Result<()> {
        let now = to_db_time(OffsetDateTime::now_utc())?;

        let res = SessionEntity::delete_many()
            .filter(session::Column::ExpiryDate.lt(now))
            .exec(&self.conn)
            .await
            .map_err(backend)?;

        if res.rows_affected > 0 {
            tracing::debug!(removed = res.rows_affected, "deleted expired sessions");
        }
        Ok(())
    }
}

fn backend(err: DbErr) -> session_store::Error {
    session_store::Error::Backend(err.to_string())
}

fn encode(record: &Record) -> session_store::Result<(Vec<u8>, DateTimeWithTimeZone)> {
    let data =
        rmp_serde::to_vec(record).map_err(|e| session_store::Error::Encode(e.to_string()))?;
    Ok((data, to_db_time(record.expiry_date)?))
}

/// `time::OffsetDateTime` → chrono UTC timestamp as stored in the `sessions` table.
fn to_db_time(at: OffsetDateTime) -> session_store::Result<DateTimeWithTimeZone> {
    chrono::DateTime::from_timestamp(at.unix_timestamp(), at.nanosecond())
        .map(Into::into)
        .ok_or_else(|| session_store::Error::Encode(format!("expiry date {at} is out of range")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn db_time_is_utc_and_keeps_the_instant() {
        let at = datetime!(2025-03-01 10:30:00.5 +05:30);
        let db = to_db_time(at).unwrap();
        assert_eq!(db.offset().local_minus_utc(), 0);
        assert_eq!(db.timestamp(), at.unix_timestamp());
        assert_eq!(db.timestamp_subsec_nanos(), 500_000_000);
    }
}
