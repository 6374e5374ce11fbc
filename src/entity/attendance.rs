//! Monthly attendance entity.

use sea_orm::entity::prelude::*;
use serde::Serialize;

/// Attendance counts for one student, one subject and one month.
///
/// `(student_id, subject_id, month)` is unique and `present + absent == total`
/// holds for every stored row (CHECK constraint plus query-layer validation).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "attendance")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Hall-ticket number of the student.
    pub student_id: String,
    pub subject_id: i32,
    /// Free-form month label, e.g. `"January 2025"`.
    pub month: String,
    pub total: i32,
    pub present: i32,
    pub absent: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::subject::Entity",
        from = "Column::SubjectId",
        to = "super::subject::Column::Id"
    )]
    Subject,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::StudentId",
        to = "super::user::Column::Hallticketnumber"
    )]
    Student,
}

impl Related<super::subject::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subject.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
