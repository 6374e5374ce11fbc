//! Query layer.
//!
//! [`Repository`] wraps the sea-orm connection and exposes one parameterized
//! read or write per resource. Handlers get it through the router state.

use chrono::NaiveDate;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, FromQueryResult,
    JoinType, NotSet, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};
use serde::Serialize;

use crate::entity::{
    assignment, assignment_submission, attendance, fee, mark, notification, subject, timetable,
    user,
};
use crate::error::{FieldError, PortalError, Result};

const DUPLICATE_USER: &str = "User already exists with this email, username, or hall ticket number";
const DUPLICATE_SUBMISSION: &str = "You have already submitted this assignment";

/// Attendance row joined with its subject.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult, Serialize)]
pub struct AttendanceRow {
    pub id: i32,
    pub subject_id: i32,
    pub subject_name: String,
    pub subject_code: String,
    pub month: String,
    pub total: i32,
    pub present: i32,
    pub absent: i32,
}

/// Mark row joined with its subject.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult, Serialize)]
pub struct MarkRow {
    pub subject_id: i32,
    pub subject_name: String,
    pub subject_code: String,
    pub exam_type: String,
    pub marks: i32,
    pub max_marks: i32,
    pub exam_date: NaiveDate,
}

/// Timetable slot left-joined with its subject; free periods have no subject.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult, Serialize)]
pub struct TimetableRow {
    pub id: i32,
    pub day: String,
    pub period: i32,
    pub branch: String,
    pub semester: i32,
    pub subject_id: Option<i32>,
    pub subject_name: Option<String>,
    pub subject_code: Option<String>,
    pub room_number: Option<String>,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult, Serialize)]
pub struct AssignmentRow {
    pub id: i32,
    pub subject_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub due_date: NaiveDate,
    pub max_marks: i32,
    pub branch: String,
    pub semester: i32,
    pub subject_name: String,
    pub subject_code: String,
}

/// Submission joined with the assignment it answers and that assignment's subject.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult, Serialize)]
pub struct SubmissionRow {
    pub id: i32,
    pub assignment_id: i32,
    pub student_id: String,
    pub submission_date: NaiveDate,
    pub file_path: Option<String>,
    pub marks: Option<i32>,
    pub remarks: Option<String>,
    pub assignment_title: String,
    pub assignment_description: Option<String>,
    pub due_date: NaiveDate,
    pub max_marks: i32,
    pub subject_name: String,
    pub subject_code: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Submitted {
    pub submission_id: i32,
    pub is_late: bool,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub username: String,
    pub email: String,
    pub phone: String,
    pub branch: String,
    pub hallticketnumber: String,
    pub password_hash: String,
}

/// Profile fields to overwrite. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub profile_image: Option<String>,
}

impl ProfileChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.profile_image.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct NewSubject {
    pub code: String,
    pub name: String,
    pub branch: String,
    pub semester: i32,
    pub credits: i32,
}

#[derive(Debug, Clone)]
pub struct NewAttendance {
    pub student_id: String,
    pub subject_id: i32,
    pub month: String,
    pub total: i32,
    pub present: i32,
    pub absent: i32,
}

#[derive(Debug, Clone)]
pub struct NewMark {
    pub student_id: String,
    pub subject_id: i32,
    pub exam_type: String,
    pub marks: i32,
    pub max_marks: i32,
    pub exam_date: NaiveDate,
}

#[derive(Debug, Clone)]
pub struct NewFee {
    pub student_id: String,
    pub fee_type: String,
    pub amount: f64,
    pub due_date: NaiveDate,
    pub academic_year: String,
    pub semester: i32,
}

#[derive(Debug, Clone)]
pub struct NewTimetableSlot {
    pub day: String,
    pub period: i32,
    pub branch: String,
    pub semester: i32,
    pub subject_id: Option<i32>,
    pub room_number: Option<String>,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Debug, Clone)]
pub struct NewNotification {
    pub title: String,
    pub message: String,
    pub category: String,
    pub priority: i32,
    pub date: NaiveDate,
    pub expiry_date: Option<NaiveDate>,
}

#[derive(Debug, Clone)]
pub struct NewAssignment {
    pub subject_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub due_date: NaiveDate,
    pub max_marks: i32,
    pub branch: String,
    pub semester: i32,
}

/// Handle to the portal database.
#[derive(Clone, Debug)]
pub struct Repository {
    db: DatabaseConnection,
}

impl Repository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Inserts a user and returns its id. Any uniqueness clash on username,
    /// email or hall-ticket number is a [`PortalError::Conflict`].
    pub async fn create_user(&self, new: NewUser) -> Result<i32> {
        let model = user::ActiveModel {
            id: NotSet,
            name: Set(new.name),
            username: Set(new.username),
            email: Set(new.email),
            phone: Set(new.phone),
            branch: Set(new.branch),
            hallticketnumber: Set(new.hallticketnumber),
            password_hash: Set(new.password_hash),
            profile_image: Set(None),
        };
        let res = user::Entity::insert(model)
            .exec(&self.db)
            .await
            .map_err(|e| PortalError::from_db(e, DUPLICATE_USER))?;
        Ok(res.last_insert_id)
    }

    pub async fn find_user(&self, hallticketnumber: &str) -> Result<Option<user::Model>> {
        let found = user::Entity::find()
            .filter(user::Column::Hallticketnumber.eq(hallticketnumber))
            .one(&self.db)
            .await?;
        Ok(found)
    }

    /// Looks a user up by hall-ticket number and email together.
    pub async fn find_user_by_email(
        &self,
        hallticketnumber: &str,
        email: &str,
    ) -> Result<Option<user::Model>> {
        let found = user::Entity::find()
            .filter(user::Column::Hallticketnumber.eq(hallticketnumber))
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?;
        Ok(found)
    }

    /// Replaces the stored password hash. Returns the number of rows changed.
    pub async fn set_password(&self, hallticketnumber: &str, password_hash: &str) -> Result<u64> {
        let res = user::Entity::update_many()
            .col_expr(user::Column::PasswordHash, Expr::value(password_hash))
            .filter(user::Column::Hallticketnumber.eq(hallticketnumber))
            .exec(&self.db)
            .await?;
        Ok(res.rows_affected)
    }

    /// Applies the non-empty fields of `changes`. Returns the number of rows
    /// changed, `0` meaning the student does not exist.
    pub async fn update_profile(
        &self,
        hallticketnumber: &str,
        changes: ProfileChanges,
    ) -> Result<u64> {
        if changes.is_empty() {
            return Err(PortalError::BadRequest("No fields to update".into()));
        }

        let mut update = user::Entity::update_many();
        if let Some(name) = changes.name {
            update = update.col_expr(user::Column::Name, Expr::value(name));
        }
        if let Some(email) = changes.email {
            update = update.col_expr(user::Column::Email, Expr::value(email));
        }
        if let Some(phone) = changes.phone {
            update = update.col_expr(user::Column::Phone, Expr::value(phone));
        }
        if let Some(image) = changes.profile_image {
            update = update.col_expr(user::Column::ProfileImage, Expr::value(image));
        }

        let res = update
            .filter(user::Column::Hallticketnumber.eq(hallticketnumber))
            .exec(&self.db)
            .await
            .map_err(|e| PortalError::from_db(e, "Email already in use"))?;
        Ok(res.rows_affected)
    }

    pub async fn count_users(&self) -> Result<u64> {
        Ok(user::Entity::find().count(&self.db).await?)
    }

    /// Attendance for a student, optionally restricted to one month label.
    pub async fn attendance_rows(
        &self,
        student_id: &str,
        month: Option<&str>,
    ) -> Result<Vec<AttendanceRow>> {
        let mut query = attendance::Entity::find()
            .select_only()
            .columns([
                attendance::Column::Id,
                attendance::Column::SubjectId,
                attendance::Column::Month,
                attendance::Column::Total,
                attendance::Column::Present,
                attendance::Column::Absent,
            ])
            .column_as(subject::Column::Name, "subject_name")
            .column_as(subject::Column::Code, "subject_code")
            .join(JoinType::InnerJoin, attendance::Relation::Subject.def())
            .filter(attendance::Column::StudentId.eq(student_id));
        if let Some(month) = month {
            query = query.filter(attendance::Column::Month.eq(month));
        }

        let rows = query
            .order_by_asc(attendance::Column::SubjectId)
            .order_by_asc(attendance::Column::Id)
            .into_model::<AttendanceRow>()
            .all(&self.db)
            .await?;
        Ok(rows)
    }

    pub async fn mark_rows(&self, student_id: &str) -> Result<Vec<MarkRow>> {
        let rows = mark::Entity::find()
            .select_only()
            .columns([
                mark::Column::SubjectId,
                mark::Column::ExamType,
                mark::Column::Marks,
                mark::Column::MaxMarks,
                mark::Column::ExamDate,
            ])
            .column_as(subject::Column::Name, "subject_name")
            .column_as(subject::Column::Code, "subject_code")
            .join(JoinType::InnerJoin, mark::Relation::Subject.def())
            .filter(mark::Column::StudentId.eq(student_id))
            .order_by_asc(mark::Column::SubjectId)
            .order_by_asc(mark::Column::ExamType)
            .into_model::<MarkRow>()
            .all(&self.db)
            .await?;
        Ok(rows)
    }

    /// Fee line items, newest academic year and semester first.
    pub async fn fee_rows(&self, student_id: &str) -> Result<Vec<fee::Model>> {
        let rows = fee::Entity::find()
            .filter(fee::Column::StudentId.eq(student_id))
            .order_by_desc(fee::Column::AcademicYear)
            .order_by_desc(fee::Column::Semester)
            .order_by_asc(fee::Column::Id)
            .all(&self.db)
            .await?;
        Ok(rows)
    }

    /// Timetable slots ordered by period. Callers group by day.
    pub async fn timetable_rows(
        &self,
        branch: Option<&str>,
        semester: Option<i32>,
        day: Option<&str>,
    ) -> Result<Vec<TimetableRow>> {
        let mut query = timetable::Entity::find()
            .select_only()
            .columns([
                timetable::Column::Id,
                timetable::Column::Day,
                timetable::Column::Period,
                timetable::Column::Branch,
                timetable::Column::Semester,
                timetable::Column::SubjectId,
                timetable::Column::RoomNumber,
                timetable::Column::StartTime,
                timetable::Column::EndTime,
            ])
            .column_as(subject::Column::Name, "subject_name")
            .column_as(subject::Column::Code, "subject_code")
            .join(JoinType::LeftJoin, timetable::Relation::Subject.def());
        if let Some(branch) = branch {
            query = query.filter(timetable::Column::Branch.eq(branch));
        }
        if let Some(semester) = semester {
            query = query.filter(timetable::Column::Semester.eq(semester));
        }
        if let Some(day) = day {
            query = query.filter(timetable::Column::Day.eq(day));
        }

        let rows = query
            .order_by_asc(timetable::Column::Period)
            .order_by_asc(timetable::Column::Id)
            .into_model::<TimetableRow>()
            .all(&self.db)
            .await?;
        Ok(rows)
    }

    /// Most urgent notifications first. Notifications whose expiry date lies
    /// before `today` are left out.
    pub async fn notifications(
        &self,
        category: Option<&str>,
        limit: u64,
        today: NaiveDate,
    ) -> Result<Vec<notification::Model>> {
        let mut query = notification::Entity::find().filter(
            Condition::any()
                .add(notification::Column::ExpiryDate.is_null())
                .add(notification::Column::ExpiryDate.gte(today)),
        );
        if let Some(category) = category {
            query = query.filter(notification::Column::Category.eq(category));
        }

        let rows = query
            .order_by_desc(notification::Column::Priority)
            .order_by_desc(notification::Column::Date)
            .limit(limit)
            .all(&self.db)
            .await?;
        Ok(rows)
    }

    pub async fn assignments(
        &self,
        branch: Option<&str>,
        semester: Option<i32>,
    ) -> Result<Vec<AssignmentRow>> {
        let mut query = assignment_query();
        if let Some(branch) = branch {
            query = query.filter(assignment::Column::Branch.eq(branch));
        }
        if let Some(semester) = semester {
            query = query.filter(assignment::Column::Semester.eq(semester));
        }
        let rows = query
            .order_by_asc(assignment::Column::DueDate)
            .order_by_asc(assignment::Column::Id)
            .into_model::<AssignmentRow>()
            .all(&self.db)
            .await?;
        Ok(rows)
    }

    /// Assignments for `branch` due on or after `from`, soonest first.
    pub async fn upcoming_assignments(
        &self,
        branch: &str,
        from: NaiveDate,
        limit: u64,
    ) -> Result<Vec<AssignmentRow>> {
        let rows = assignment_query()
            .filter(assignment::Column::Branch.eq(branch))
            .filter(assignment::Column::DueDate.gte(from))
            .order_by_asc(assignment::Column::DueDate)
            .order_by_asc(assignment::Column::Id)
            .limit(limit)
            .into_model::<AssignmentRow>()
            .all(&self.db)
            .await?;
        Ok(rows)
    }

    /// A student's submissions, newest first.
    pub async fn submissions_for(&self, student_id: &str) -> Result<Vec<SubmissionRow>> {
        let rows = assignment_submission::Entity::find()
            .select_only()
            .columns([
                assignment_submission::Column::Id,
                assignment_submission::Column::AssignmentId,
                assignment_submission::Column::StudentId,
                assignment_submission::Column::SubmissionDate,
                assignment_submission::Column::FilePath,
                assignment_submission::Column::Marks,
                assignment_submission::Column::Remarks,
            ])
            .column_as(assignment::Column::Title, "assignment_title")
            .column_as(assignment::Column::Description, "assignment_description")
            .column_as(assignment::Column::DueDate, "due_date")
            .column_as(assignment::Column::MaxMarks, "max_marks")
            .column_as(subject::Column::Name, "subject_name")
            .column_as(subject::Column::Code, "subject_code")
            .join(
                JoinType::InnerJoin,
                assignment_submission::Relation::Assignment.def(),
            )
            .join(JoinType::InnerJoin, assignment::Relation::Subject.def())
            .filter(assignment_submission::Column::StudentId.eq(student_id))
            .order_by_desc(assignment_submission::Column::SubmissionDate)
            .order_by_desc(assignment_submission::Column::Id)
            .into_model::<SubmissionRow>()
            .all(&self.db)
            .await?;
        Ok(rows)
    }

    /// Records a submission dated `today`.
    ///
    /// Fails with [`PortalError::NotFound`] when the student or the assignment
    /// does not exist and with [`PortalError::Conflict`] when the student has
    /// already submitted. The submission is late when `today` is after the
    /// assignment's due date.
    pub async fn submit_assignment(
        &self,
        student_id: &str,
        assignment_id: i32,
        file_path: Option<String>,
        today: NaiveDate,
    ) -> Result<Submitted> {
        if self.find_user(student_id).await?.is_none() {
            return Err(PortalError::not_found("User not found"));
        }
        let assignment = assignment::Entity::find_by_id(assignment_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| PortalError::not_found("Assignment not found"))?;

        let existing = assignment_submission::Entity::find()
            .filter(assignment_submission::Column::AssignmentId.eq(assignment_id))
            .filter(assignment_submission::Column::StudentId.eq(student_id))
            .count(&self.db)
            .await?;
        if existing > 0 {
            return Err(PortalError::conflict(DUPLICATE_SUBMISSION));
        }

        let model = assignment_submission::ActiveModel {
            id: NotSet,
            assignment_id: Set(assignment_id),
            student_id: Set(student_id.to_string()),
            submission_date: Set(today),
            file_path: Set(file_path),
            marks: Set(None),
            remarks: Set(None),
        };
        let res = assignment_submission::Entity::insert(model)
            .exec(&self.db)
            .await
            .map_err(|e| PortalError::from_db(e, DUPLICATE_SUBMISSION))?;

        Ok(Submitted {
            submission_id: res.last_insert_id,
            is_late: today > assignment.due_date,
        })
    }

    /// `(total classes, classes attended)` across all of a student's records.
    pub async fn attendance_totals(&self, student_id: &str) -> Result<(i64, i64)> {
        let sums = attendance::Entity::find()
            .select_only()
            .column_as(attendance::Column::Total.sum(), "total")
            .column_as(attendance::Column::Present.sum(), "present")
            .filter(attendance::Column::StudentId.eq(student_id))
            .into_tuple::<(Option<i64>, Option<i64>)>()
            .one(&self.db)
            .await?;
        let (total, present) = sums.unwrap_or_default();
        Ok((total.unwrap_or(0), present.unwrap_or(0)))
    }

    /// `(marks scored, maximum marks)` across all of a student's exams.
    pub async fn marks_totals(&self, student_id: &str) -> Result<(i64, i64)> {
        let sums = mark::Entity::find()
            .select_only()
            .column_as(mark::Column::Marks.sum(), "total_marks")
            .column_as(mark::Column::MaxMarks.sum(), "total_max_marks")
            .filter(mark::Column::StudentId.eq(student_id))
            .into_tuple::<(Option<i64>, Option<i64>)>()
            .one(&self.db)
            .await?;
        let (marks, max_marks) = sums.unwrap_or_default();
        Ok((marks.unwrap_or(0), max_marks.unwrap_or(0)))
    }

    /// `(amount charged, amount paid)` across all of a student's fees.
    pub async fn fee_totals(&self, student_id: &str) -> Result<(f64, f64)> {
        let sums = fee::Entity::find()
            .select_only()
            .column_as(fee::Column::Amount.sum(), "total_amount")
            .column_as(fee::Column::PaidAmount.sum(), "total_paid")
            .filter(fee::Column::StudentId.eq(student_id))
            .into_tuple::<(Option<f64>, Option<f64>)>()
            .one(&self.db)
            .await?;
        let (amount, paid) = sums.unwrap_or_default();
        Ok((amount.unwrap_or(0.0), paid.unwrap_or(0.0)))
    }

    pub async fn add_subject(&self, new: NewSubject) -> Result<i32> {
        let model = subject::ActiveModel {
            id: NotSet,
            code: Set(new.code),
            name: Set(new.name),
            branch: Set(new.branch),
            semester: Set(new.semester),
            credits: Set(new.credits),
        };
        let res = subject::Entity::insert(model)
            .exec(&self.db)
            .await
            .map_err(|e| PortalError::from_db(e, "Subject code already exists"))?;
        Ok(res.last_insert_id)
    }

    /// Inserts one month of attendance. Counts must be non-negative and
    /// `present + absent` must equal `total`.
    pub async fn record_attendance(&self, new: NewAttendance) -> Result<i32> {
        let mut errors = Vec::new();
        if new.total < 0 || new.present < 0 || new.absent < 0 {
            errors.push(FieldError::new("total", "Attendance counts must not be negative"));
        }
        if new.present + new.absent != new.total {
            errors.push(FieldError::new("present", "present + absent must equal total"));
        }
        if !errors.is_empty() {
            return Err(PortalError::Validation(errors));
        }

        let model = attendance::ActiveModel {
            id: NotSet,
            student_id: Set(new.student_id),
            subject_id: Set(new.subject_id),
            month: Set(new.month),
            total: Set(new.total),
            present: Set(new.present),
            absent: Set(new.absent),
        };
        let res = attendance::Entity::insert(model)
            .exec(&self.db)
            .await
            .map_err(|e| PortalError::from_db(e, "Attendance already recorded for this month"))?;
        Ok(res.last_insert_id)
    }

    /// Inserts one exam result with `0 <= marks <= max_marks`.
    pub async fn record_mark(&self, new: NewMark) -> Result<i32> {
        if new.marks < 0 || new.marks > new.max_marks {
            return Err(PortalError::Validation(vec![FieldError::new(
                "marks",
                "Marks must be between 0 and max marks",
            )]));
        }

        let model = mark::ActiveModel {
            id: NotSet,
            student_id: Set(new.student_id),
            subject_id: Set(new.subject_id),
            exam_type: Set(new.exam_type),
            marks: Set(new.marks),
            max_marks: Set(new.max_marks),
            exam_date: Set(new.exam_date),
        };
        let res = mark::Entity::insert(model)
            .exec(&self.db)
            .await
            .map_err(|e| PortalError::from_db(e, "Marks already recorded for this exam"))?;
        Ok(res.last_insert_id)
    }

    /// Charges a fee with nothing paid yet.
    pub async fn add_fee(&self, new: NewFee) -> Result<i32> {
        if new.amount < 0.0 {
            return Err(PortalError::Validation(vec![FieldError::new(
                "amount",
                "Amount must not be negative",
            )]));
        }

        let model = fee::ActiveModel {
            id: NotSet,
            student_id: Set(new.student_id),
            fee_type: Set(new.fee_type),
            amount: Set(new.amount),
            paid_amount: Set(0.0),
            due_date: Set(new.due_date),
            payment_date: Set(None),
            transaction_id: Set(None),
            academic_year: Set(new.academic_year),
            semester: Set(new.semester),
        };
        let res = fee::Entity::insert(model).exec(&self.db).await?;
        Ok(res.last_insert_id)
    }

    /// Adds `amount` to what has been paid against a fee and records the
    /// payment date and transaction. Payments beyond the outstanding balance
    /// are rejected.
    pub async fn record_fee_payment(
        &self,
        fee_id: i32,
        amount: f64,
        paid_on: NaiveDate,
        transaction_id: Option<String>,
    ) -> Result<fee::Model> {
        let current = fee::Entity::find_by_id(fee_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| PortalError::not_found("Fee not found"))?;

        if amount <= 0.0 || amount > current.due_amount() {
            return Err(PortalError::Validation(vec![FieldError::new(
                "amount",
                "Payment must be positive and no more than the amount due",
            )]));
        }

        let paid_amount = current.paid_amount + amount;
        let mut model: fee::ActiveModel = current.into();
        model.paid_amount = Set(paid_amount);
        model.payment_date = Set(Some(paid_on));
        model.transaction_id = Set(transaction_id);
        let updated = model.update(&self.db).await?;

        tracing::debug!(fee_id, paid_amount, "recorded fee payment");
        Ok(updated)
    }

    pub async fn add_timetable_slot(&self, new: NewTimetableSlot) -> Result<i32> {
        let model = timetable::ActiveModel {
            id: NotSet,
            day: Set(new.day),
            period: Set(new.period),
            branch: Set(new.branch),
            semester: Set(new.semester),
            subject_id: Set(new.subject_id),
            room_number: Set(new.room_number),
            start_time: Set(new.start_time),
            end_time: Set(new.end_time),
        };
        let res = timetable::Entity::insert(model)
            .exec(&self.db)
            .await
            .map_err(|e| PortalError::from_db(e, "Timetable slot already taken"))?;
        Ok(res.last_insert_id)
    }

    pub async fn add_notification(&self, new: NewNotification) -> Result<i32> {
        let model = notification::ActiveModel {
            id: NotSet,
            title: Set(new.title),
            message: Set(new.message),
            category: Set(new.category),
            priority: Set(new.priority),
            date: Set(new.date),
            expiry_date: Set(new.expiry_date),
        };
        let res = notification::Entity::insert(model).exec(&self.db).await?;
        Ok(res.last_insert_id)
    }

    pub async fn add_assignment(&self, new: NewAssignment) -> Result<i32> {
        let model = assignment::ActiveModel {
            id: NotSet,
            subject_id: Set(new.subject_id),
            title: Set(new.title),
            description: Set(new.description),
            due_date: Set(new.due_date),
            max_marks: Set(new.max_marks),
            branch: Set(new.branch),
            semester: Set(new.semester),
        };
        let res = assignment::Entity::insert(model).exec(&self.db).await?;
        Ok(res.last_insert_id)
    }
}

fn assignment_query() -> sea_orm::Select<assignment::Entity> {
    assignment::Entity::find()
        .select_only()
        .columns([
            assignment::Column::Id,
            assignment::Column::SubjectId,
            assignment::Column::Title,
            assignment::Column::Description,
            assignment::Column::DueDate,
            assignment::Column::MaxMarks,
            assignment::Column::Branch,
            assignment::Column::Semester,
        ])
        .column_as(subject::Column::Name, "subject_name")
        .column_as(subject::Column::Code, "subject_code")
        .join(JoinType::InnerJoin, assignment::Relation::Subject.def())
}
