//! Student account entity.

use sea_orm::entity::prelude::*;
use serde::Serialize;

/// A registered student.
///
/// `hallticketnumber`, `username` and `email` are each unique. The password is
/// only ever stored as a bcrypt hash and is never serialized.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(unique)]
    pub username: String,
    #[sea_orm(unique)]
    pub email: String,
    pub phone: String,
    pub branch: String,
    /// Enrollment/exam identifier used as the student key across tables.
    #[sea_orm(unique)]
    pub hallticketnumber: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub profile_image: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
