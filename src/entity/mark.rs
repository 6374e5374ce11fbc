use sea_orm::entity::prelude::*;
use serde::Serialize;

/// Marks scored by a student in one exam of one subject.
///
/// `0 <= marks <= max_marks` holds for every stored row.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "marks")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub student_id: String,
    pub subject_id: i32,
    /// e.g. `"Mid Term 1"`, `"Final Exam"`.
    pub exam_type: String,
    pub marks: i32,
    pub max_marks: i32,
    pub exam_date: Date,
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
