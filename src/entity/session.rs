//! Login session entity.
//!
//! Backing table for [`crate::SqliteSessionStore`]. Rows are written by the
//! tower-sessions layer whenever a handler touches the session (login,
//! logout) and swept once their expiry date has passed.

use sea_orm::entity::prelude::*;

/// A persisted tower-sessions record.
///
/// # Database Schema
///
/// | Column      | Type            | Description                                  |
/// |-------------|-----------------|----------------------------------------------|
/// | id          | TEXT (PK)       | Session ID as rendered by `tower_sessions::Id` |
/// | data        | BLOB            | MessagePack-encoded `Record`                 |
/// | expiry_date | TEXT (RFC 3339) | Instant after which the session is invalid   |
///
/// SQLite stores the expiry as RFC 3339 text. Every value is written in UTC,
/// so lexical comparison in `WHERE expiry_date > ?` matches instant order.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "sessions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
    pub id: String,

    /// The MessagePack-encoded session record, including the hall-ticket
    /// number stored at login.
    pub data: Vec<u8>,

    /// Used to filter out stale sessions on load and to bulk-delete them in
    /// [`tower_sessions::ExpiredDeletion::delete_expired`].
    pub expiry_date: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
