//! Fee line item entity.

use sea_orm::entity::prelude::*;
use serde::Serialize;

/// One fee charged to a student for an academic year and semester.
///
/// The outstanding balance (`amount - paid_amount`) and the payment status are
/// derived on read; see [`Model::due_amount`] and [`crate::aggregate::PaymentStatus`].
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "fees")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub student_id: String,
    pub fee_type: String,
    pub amount: f64,
    pub paid_amount: f64,
    pub due_date: Date,
    pub payment_date: Option<Date>,
    pub transaction_id: Option<String>,
    /// e.g. `"2024-2025"`.
    pub academic_year: String,
    pub semester: i32,
}

impl Model {
    /// Unpaid remainder of this line item.
    pub fn due_amount(&self) -> f64 {
        self.amount - self.paid_amount
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::StudentId",
        to = "super::user::Column::Hallticketnumber"
    )]
    Student,
}

impl ActiveModelBehavior for ActiveModel {}
