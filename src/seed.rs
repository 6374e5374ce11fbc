//! Sample data for a fresh database.
//!
//! Everything goes through the [`Repository`] administrative writes, so the
//! same invariants apply as for any other writer. Counts and marks are
//! derived from the row position rather than drawn at random, which keeps the
//! sample data identical across runs.

use chrono::{Months, NaiveDate};
use tracing::info;

use crate::error::Result;
use crate::password::PasswordHasher;
use crate::repository::{
    NewAssignment, NewAttendance, NewFee, NewMark, NewNotification, NewSubject,
    NewTimetableSlot, NewUser, Repository,
};

/// Password of every sample student.
pub const SAMPLE_PASSWORD: &str = "password123";

const SUBJECTS: &[(&str, &str, &str, i32, i32)] = &[
    ("MA101", "Engineering Mathematics", "CSE", 1, 4),
    ("CS101", "Introduction to Programming", "CSE", 1, 4),
    ("PH101", "Engineering Physics", "CSE", 1, 3),
    ("CS201", "Data Structures", "CSE", 3, 4),
    ("CS202", "Database Systems", "CSE", 3, 4),
    ("EC101", "Basic Electronics", "ECE", 1, 4),
];

const STUDENTS: &[(&str, &str, &str, &str, &str, &str)] = &[
    ("John Doe", "johndoe", "john@example.com", "9876543210", "CSE", "CSE20251"),
    ("Jane Smith", "janesmith", "jane@example.com", "9876543211", "CSE", "CSE20252"),
    ("Raj Patel", "rajpatel", "raj@example.com", "9876543212", "ECE", "ECE20251"),
];

const MONTHS: &[&str] = &["January 2025", "February 2025", "March 2025"];
const EXAMS: &[(&str, i32)] = &[
    ("Mid Term 1", 50),
    ("Mid Term 2", 50),
    ("Assignment 1", 20),
    ("Assignment 2", 20),
    ("Final Exam", 100),
];
const FEES: &[(&str, f64)] = &[
    ("Tuition Fee", 45000.0),
    ("Examination Fee", 5000.0),
    ("Library Fee", 2000.0),
    ("Hostel Fee", 35000.0),
];
const DAYS: &[&str] = &["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"];
const PERIODS: &[(&str, &str)] = &[
    ("9:00", "10:00"),
    ("10:00", "11:00"),
    ("11:00", "12:00"),
    ("12:00", "13:00"),
    ("13:30", "14:30"),
    ("14:30", "15:30"),
    ("15:30", "16:30"),
    ("16:30", "17:30"),
];

/// Inserts the sample subjects, students and academic records.
///
/// Dates are laid out relative to `today` so that notifications are current
/// and some assignments are still upcoming.
pub async fn seed(repo: &Repository, hasher: &PasswordHasher, today: NaiveDate) -> Result<()> {
    let next_month = today.checked_add_months(Months::new(1)).unwrap_or(today);

    let mut subject_ids = Vec::with_capacity(SUBJECTS.len());
    for &(code, name, branch, semester, credits) in SUBJECTS {
        let id = repo
            .add_subject(NewSubject {
                code: code.into(),
                name: name.into(),
                branch: branch.into(),
                semester,
                credits,
            })
            .await?;
        subject_ids.push((id, branch, semester));
    }

    let password_hash = hasher.hash(SAMPLE_PASSWORD).await?;
    for (s, &(name, username, email, phone, branch, hallticketnumber)) in
        STUDENTS.iter().enumerate()
    {
        repo.create_user(NewUser {
            name: name.into(),
            username: username.into(),
            email: email.into(),
            phone: phone.into(),
            branch: branch.into(),
            hallticketnumber: hallticketnumber.into(),
            password_hash: password_hash.clone(),
        })
        .await?;

        let subjects = subject_ids.iter().filter(|(_, b, _)| *b == branch);
        for (j, &(subject_id, _, _)) in subjects.enumerate() {
            for (m, month) in MONTHS.iter().enumerate() {
                let present = 15 + ((s + 2 * j + 3 * m) % 6) as i32;
                repo.record_attendance(NewAttendance {
                    student_id: hallticketnumber.into(),
                    subject_id,
                    month: (*month).into(),
                    total: 20,
                    present,
                    absent: 20 - present,
                })
                .await?;
            }

            for (e, &(exam_type, max_marks)) in EXAMS.iter().enumerate() {
                let spread = (max_marks * 3 / 10).max(1);
                let marks = max_marks * 7 / 10 + ((s + j + e) as i32 * 7) % spread;
                repo.record_mark(NewMark {
                    student_id: hallticketnumber.into(),
                    subject_id,
                    exam_type: exam_type.into(),
                    marks,
                    max_marks,
                    exam_date: today,
                })
                .await?;
            }
        }

        for (f, &(fee_type, amount)) in FEES.iter().enumerate() {
            let fee_id = repo
                .add_fee(NewFee {
                    student_id: hallticketnumber.into(),
                    fee_type: fee_type.into(),
                    amount,
                    due_date: next_month,
                    academic_year: "2024-2025".into(),
                    semester: 1,
                })
                .await?;
            let paid = if (s + f) % 2 == 0 { amount } else { (amount * 0.5).floor() };
            repo.record_fee_payment(fee_id, paid, today, Some(format!("TXN{:04}{}", s + 1, f + 1)))
                .await?;
        }
    }

    let notifications = [
        ("Mid Term Exams", "Mid Term exams start from March 15, 2025", "exams", 2, today),
        ("Fee Payment", "Last date for fee payment is April 10, 2025", "fees", 1, today),
        (
            "Holiday Notice",
            "College will remain closed on March 20, 2025 for Holi",
            "general",
            0,
            today,
        ),
        (
            "Placement Drive",
            "Microsoft campus recruitment drive on March 25, 2025",
            "placement",
            2,
            next_month,
        ),
    ];
    for (title, message, category, priority, date) in notifications {
        repo.add_notification(NewNotification {
            title: title.into(),
            message: message.into(),
            category: category.into(),
            priority,
            date,
            expiry_date: None,
        })
        .await?;
    }

    for (branch, semester) in [("CSE", 1), ("ECE", 1)] {
        let taught: Vec<i32> = subject_ids
            .iter()
            .filter(|(_, b, sem)| *b == branch && *sem == semester)
            .map(|(id, _, _)| *id)
            .collect();
        for (d, day) in DAYS.iter().enumerate() {
            for (p, &(start, end)) in PERIODS.iter().enumerate() {
                // The last period of the day is kept free.
                let subject_id = if p + 1 == PERIODS.len() || taught.is_empty() {
                    None
                } else {
                    Some(taught[(d + p) % taught.len()])
                };
                repo.add_timetable_slot(NewTimetableSlot {
                    day: (*day).into(),
                    period: p as i32 + 1,
                    branch: branch.into(),
                    semester,
                    subject_id,
                    room_number: Some(format!("{branch}-{}", (d + p) % 10 + 1)),
                    start_time: start.into(),
                    end_time: end.into(),
                })
                .await?;
            }
        }
    }

    let assignments = [
        ("CS101", "Programming Assignment 1", "Implement a linked list in C++", next_month),
        (
            "CS202",
            "Database Design",
            "Design an ER diagram for a library management system",
            next_month,
        ),
        (
            "PH101",
            "Physics Lab Report",
            "Submit the lab report for the pendulum experiment",
            today,
        ),
    ];
    for (code, title, description, due_date) in assignments {
        let Some(i) = SUBJECTS.iter().position(|subject| subject.0 == code) else {
            continue;
        };
        repo.add_assignment(NewAssignment {
            subject_id: subject_ids[i].0,
            title: title.into(),
            description: Some(description.into()),
            due_date,
            max_marks: 10,
            branch: "CSE".into(),
            semester: 1,
        })
        .await?;
    }

    info!(
        subjects = SUBJECTS.len(),
        students = STUDENTS.len(),
        "inserted sample data"
    );
    Ok(())
}
