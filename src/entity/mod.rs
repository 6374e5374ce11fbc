//! Database entity models for the student portal.
//!
//! One Sea-ORM entity per table. Student-owned rows reference the student by
//! hall-ticket number (`users.hallticketnumber`) rather than by surrogate id,
//! so every per-student query filters on a text key.

/// Portal users (students) and their login credentials.
pub mod user;

/// Subjects taught per branch and semester.
pub mod subject;

/// Monthly attendance counts per student and subject.
pub mod attendance;

/// Exam marks per student, subject and exam type.
pub mod mark;

/// Fee line items per student, academic year and semester.
pub mod fee;

/// Weekly timetable slots per branch and semester.
pub mod timetable;

/// Portal-wide notifications.
pub mod notification;

/// Assignments published per branch and semester.
pub mod assignment;

/// Student submissions against assignments.
pub mod assignment_submission;

/// Login sessions persisted by [`crate::SqliteSessionStore`].
pub mod session;
