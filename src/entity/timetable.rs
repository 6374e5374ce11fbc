use sea_orm::entity::prelude::*;
use serde::Serialize;

/// One period of the weekly timetable for a branch and semester.
///
/// `(day, period, branch, semester)` is unique. A slot without a subject is a
/// free period.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "timetable")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Full English weekday name, e.g. `"Monday"`.
    pub day: String,
    pub period: i32,
    pub branch: String,
    pub semester: i32,
    pub subject_id: Option<i32>,
    pub room_number: Option<String>,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::subject::Entity",
        from = "Column::SubjectId",
        to = "super::subject::Column::Id"
    )]
    Subject,
}

impl Related<super::subject::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subject.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
