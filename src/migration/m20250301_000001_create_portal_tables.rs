//! Creates the academic schema: users, subjects, attendance, marks, fees,
//! timetable, notifications, assignments and assignment submissions.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Name).string().not_null())
                    .col(ColumnDef::new(Users::Username).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::Phone).string().not_null())
                    .col(ColumnDef::new(Users::Branch).string().not_null())
                    .col(
                        ColumnDef::new(Users::Hallticketnumber)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::ProfileImage).string().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Subjects::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Subjects::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Subjects::Code).string().not_null().unique_key())
                    .col(ColumnDef::new(Subjects::Name).string().not_null())
                    .col(ColumnDef::new(Subjects::Branch).string().not_null())
                    .col(ColumnDef::new(Subjects::Semester).integer().not_null())
                    .col(
                        ColumnDef::new(Subjects::Credits)
                            .integer()
                            .not_null()
                            .default(4),
                    )
                    .to_owned(),
            )
            .await?;

        // Attendance
        manager
            .create_table(
                Table::create()
                    .table(Attendance::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Attendance::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Attendance::StudentId).string().not_null())
                    .col(ColumnDef::new(Attendance::SubjectId).integer().not_null())
                    .col(ColumnDef::new(Attendance::Month).string().not_null())
                    .col(
                        ColumnDef::new(Attendance::Total)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Attendance::Present)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Attendance::Absent)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .check(
                        Expr::expr(Expr::col(Attendance::Present).add(Expr::col(Attendance::Absent)))
                            .eq(Expr::col(Attendance::Total)),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Attendance::Table, Attendance::StudentId)
                            .to(Users::Table, Users::Hallticketnumber),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Attendance::Table, Attendance::SubjectId)
                            .to(Subjects::Table, Subjects::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_attendance_student_subject_month")
                    .table(Attendance::Table)
                    .col(Attendance::StudentId)
                    .col(Attendance::SubjectId)
                    .col(Attendance::Month)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // Marks
        manager
            .create_table(
                Table::create()
                    .table(Marks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Marks::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Marks::StudentId).string().not_null())
                    .col(ColumnDef::new(Marks::SubjectId).integer().not_null())
                    .col(ColumnDef::new(Marks::ExamType).string().not_null())
                    .col(ColumnDef::new(Marks::Marks).integer().not_null())
                    .col(
                        ColumnDef::new(Marks::MaxMarks)
                            .integer()
                            .not_null()
                            .default(100),
                    )
                    .col(ColumnDef::new(Marks::ExamDate).date().not_null())
                    .check(
                        Expr::col(Marks::Marks)
                            .gte(0)
                            .and(Expr::col(Marks::Marks).lte(Expr::col(Marks::MaxMarks))),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Marks::Table, Marks::StudentId)
                            .to(Users::Table, Users::Hallticketnumber),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Marks::Table, Marks::SubjectId)
                            .to(Subjects::Table, Subjects::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_marks_student_subject_exam")
                    .table(Marks::Table)
                    .col(Marks::StudentId)
                    .col(Marks::SubjectId)
                    .col(Marks::ExamType)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // Fees. Due amount and payment status are derived on read.
        manager
            .create_table(
                Table::create()
                    .table(Fees::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Fees::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Fees::StudentId).string().not_null())
                    .col(ColumnDef::new(Fees::FeeType).string().not_null())
                    .col(ColumnDef::new(Fees::Amount).double().not_null())
                    .col(
                        ColumnDef::new(Fees::PaidAmount)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(Fees::DueDate).date().not_null())
                    .col(ColumnDef::new(Fees::PaymentDate).date().null())
                    .col(ColumnDef::new(Fees::TransactionId).string().null())
                    .col(ColumnDef::new(Fees::AcademicYear).string().not_null())
                    .col(ColumnDef::new(Fees::Semester).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Fees::Table, Fees::StudentId)
                            .to(Users::Table, Users::Hallticketnumber),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_fees_student")
                    .table(Fees::Table)
                    .col(Fees::StudentId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // Timetable
        manager
            .create_table(
                Table::create()
                    .table(Timetable::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Timetable::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Timetable::Day).string().not_null())
                    .col(ColumnDef::new(Timetable::Period).integer().not_null())
                    .col(ColumnDef::new(Timetable::Branch).string().not_null())
                    .col(ColumnDef::new(Timetable::Semester).integer().not_null())
                    .col(ColumnDef::new(Timetable::SubjectId).integer().null())
                    .col(ColumnDef::new(Timetable::RoomNumber).string().null())
                    .col(ColumnDef::new(Timetable::StartTime).string().not_null())
                    .col(ColumnDef::new(Timetable::EndTime).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Timetable::Table, Timetable::SubjectId)
                            .to(Subjects::Table, Subjects::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_timetable_slot")
                    .table(Timetable::Table)
                    .col(Timetable::Day)
                    .col(Timetable::Period)
                    .col(Timetable::Branch)
                    .col(Timetable::Semester)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // Notifications
        manager
            .create_table(
                Table::create()
                    .table(Notifications::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Notifications::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Notifications::Title).string().not_null())
                    .col(ColumnDef::new(Notifications::Message).string().not_null())
                    .col(
                        ColumnDef::new(Notifications::Category)
                            .string()
                            .not_null()
                            .default("general"),
                    )
                    .col(
                        ColumnDef::new(Notifications::Priority)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Notifications::Date).date().not_null())
                    .col(ColumnDef::new(Notifications::ExpiryDate).date().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_notifications_date")
                    .table(Notifications::Table)
                    .col(Notifications::Date)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // Assignments and submissions
        manager
            .create_table(
                Table::create()
                    .table(Assignments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Assignments::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Assignments::SubjectId).integer().not_null())
                    .col(ColumnDef::new(Assignments::Title).string().not_null())
                    .col(ColumnDef::new(Assignments::Description).string().null())
                    .col(ColumnDef::new(Assignments::DueDate).date().not_null())
                    .col(
                        ColumnDef::new(Assignments::MaxMarks)
                            .integer()
                            .not_null()
                            .default(10),
                    )
                    .col(ColumnDef::new(Assignments::Branch).string().not_null())
                    .col(ColumnDef::new(Assignments::Semester).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Assignments::Table, Assignments::SubjectId)
                            .to(Subjects::Table, Subjects::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AssignmentSubmissions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AssignmentSubmissions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AssignmentSubmissions::AssignmentId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AssignmentSubmissions::StudentId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AssignmentSubmissions::SubmissionDate)
                            .date()
                            .not_null(),
                    )
                    .col(ColumnDef::new(AssignmentSubmissions::FilePath).string().null())
                    .col(ColumnDef::new(AssignmentSubmissions::Marks).integer().null())
                    .col(ColumnDef::new(AssignmentSubmissions::Remarks).string().null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(AssignmentSubmissions::Table, AssignmentSubmissions::AssignmentId)
                            .to(Assignments::Table, Assignments::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(AssignmentSubmissions::Table, AssignmentSubmissions::StudentId)
                            .to(Users::Table, Users::Hallticketnumber),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_submissions_assignment_student")
                    .table(AssignmentSubmissions::Table)
                    .col(AssignmentSubmissions::AssignmentId)
                    .col(AssignmentSubmissions::StudentId)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AssignmentSubmissions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Assignments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Notifications::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Timetable::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Fees::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Marks::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Attendance::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Subjects::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Name,
    Username,
    Email,
    Phone,
    Branch,
    Hallticketnumber,
    PasswordHash,
    ProfileImage,
}

#[derive(DeriveIden)]
enum Subjects {
    Table,
    Id,
    Code,
    Name,
    Branch,
    Semester,
    Credits,
}

#[derive(DeriveIden)]
enum Attendance {
    Table,
    Id,
    StudentId,
    SubjectId,
    Month,
    Total,
    Present,
    Absent,
}

#[derive(DeriveIden)]
enum Marks {
    Table,
    Id,
    StudentId,
    SubjectId,
    ExamType,
    Marks,
    MaxMarks,
    ExamDate,
}

#[derive(DeriveIden)]
enum Fees {
    Table,
    Id,
    StudentId,
    FeeType,
    Amount,
    PaidAmount,
    DueDate,
    PaymentDate,
    TransactionId,
    AcademicYear,
    Semester,
}

#[derive(DeriveIden)]
enum Timetable {
    Table,
    Id,
    Day,
    Period,
    Branch,
    Semester,
    SubjectId,
    RoomNumber,
    StartTime,
    EndTime,
}

#[derive(DeriveIden)]
enum Notifications {
    Table,
    Id,
    Title,
    Message,
    Category,
    Priority,
    Date,
    ExpiryDate,
}

#[derive(DeriveIden)]
enum Assignments {
    Table,
    Id,
    SubjectId,
    Title,
    Description,
    DueDate,
    MaxMarks,
    Branch,
    Semester,
}

#[derive(DeriveIden)]
enum AssignmentSubmissions {
    Table,
    Id,
    AssignmentId,
    StudentId,
    SubmissionDate,
    FilePath,
    Marks,
    Remarks,
}
