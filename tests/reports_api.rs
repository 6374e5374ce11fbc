mod common;

use axum::http::StatusCode;
use chrono::{Days, NaiveDate};
use serde_json::json;
use student_portal::api::today;
use student_portal::repository::{
    NewAttendance, NewFee, NewMark, NewNotification, NewSubject, NewTimetableSlot,
};

use common::{test_app, TestApp};

async fn subject(app: &TestApp, code: &str, name: &str) -> i32 {
    app.repo
        .add_subject(NewSubject {
            code: code.into(),
            name: name.into(),
            branch: "ECE".into(),
            semester: 5,
            credits: 4,
        })
        .await
        .unwrap()
}

async fn attendance(app: &TestApp, student: &str, subject_id: i32, month: &str, total: i32, present: i32) {
    app.repo
        .record_attendance(NewAttendance {
            student_id: student.into(),
            subject_id,
            month: month.into(),
            total,
            present,
            absent: total - present,
        })
        .await
        .unwrap();
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[tokio::test]
async fn attendance_rolls_up_per_subject() {
    let app = test_app().await;
    app.add_student("ECE20251", "ECE").await;
    let dsp = subject(&app, "EC301", "DSP").await;
    let vlsi = subject(&app, "EC302", "VLSI").await;
    attendance(&app, "ECE20251", dsp, "January 2025", 20, 16).await;
    attendance(&app, "ECE20251", dsp, "February 2025", 20, 18).await;
    attendance(&app, "ECE20251", vlsi, "January 2025", 10, 5).await;

    let res = app.get("/api/attendance/ECE20251").await;
    assert_eq!(res.status, StatusCode::OK);
    let data = &res.body["data"];

    let subjects = data["attendance"].as_array().unwrap();
    assert_eq!(subjects.len(), 2);
    let first = &subjects[0];
    assert_eq!(first["subject_code"], "EC301");
    assert_eq!(first["total"], 40);
    assert_eq!(first["present"], 34);
    assert_eq!(first["absent"], 6);
    assert_eq!(first["percentage"], 85.0);
    assert_eq!(first["monthly_data"].as_array().unwrap().len(), 2);

    let overall = &data["overall"];
    assert_eq!(overall["total"], 50);
    assert_eq!(overall["present"], 39);
    assert_eq!(overall["absent"], 11);
    assert_eq!(overall["percentage"], 78.0);
}

#[tokio::test]
async fn attendance_for_one_month_is_unaggregated() {
    let app = test_app().await;
    app.add_student("ECE20251", "ECE").await;
    let dsp = subject(&app, "EC301", "DSP").await;
    attendance(&app, "ECE20251", dsp, "January 2025", 20, 16).await;
    attendance(&app, "ECE20251", dsp, "February 2025", 20, 18).await;

    let res = app
        .get("/api/attendance/ECE20251?month=February%202025")
        .await;
    assert_eq!(res.status, StatusCode::OK);
    let rows = res.body["data"]["attendance"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["month"], "February 2025");
    assert_eq!(rows[0]["percentage"], 90.0);
    assert!(rows[0].get("monthly_data").is_none());
    assert_eq!(res.body["data"]["overall"]["total"], 20);
}

#[tokio::test]
async fn student_without_records_gets_zero_percentages() {
    let app = test_app().await;
    app.add_student("ECE20251", "ECE").await;

    let res = app.get("/api/attendance/ECE20251").await;
    assert_eq!(res.body["data"]["attendance"], json!([]));
    assert_eq!(res.body["data"]["overall"]["percentage"], 0.0);

    let res = app.get("/api/marks/ECE20251").await;
    assert_eq!(res.body["data"]["overall"]["percentage"], 0.0);

    let res = app.get("/api/fees/ECE20251").await;
    assert_eq!(res.body["data"]["overall"]["payment_progress"], 0.0);
}

#[tokio::test]
async fn marks_are_grouped_by_subject() {
    let app = test_app().await;
    app.add_student("ECE20251", "ECE").await;
    let dsp = subject(&app, "EC301", "DSP").await;
    for (exam_type, marks, max_marks) in [("Mid Term 1", 40, 50), ("Final Exam", 85, 100)] {
        app.repo
            .record_mark(NewMark {
                student_id: "ECE20251".into(),
                subject_id: dsp,
                exam_type: exam_type.into(),
                marks,
                max_marks,
                exam_date: date(2025, 3, 1),
            })
            .await
            .unwrap();
    }

    let res = app.get("/api/marks/ECE20251").await;
    assert_eq!(res.status, StatusCode::OK);
    let subjects = res.body["data"]["marks"].as_array().unwrap();
    assert_eq!(subjects.len(), 1);
    assert_eq!(subjects[0]["exams"].as_array().unwrap().len(), 2);
    assert_eq!(subjects[0]["total_marks"], 125);
    assert_eq!(subjects[0]["total_max_marks"], 150);
    assert_eq!(subjects[0]["percentage"], 83.33);
    assert_eq!(res.body["data"]["overall"]["total_marks"], 125);
}

#[tokio::test]
async fn fees_show_derived_due_and_status() {
    let app = test_app().await;
    app.add_student("ECE20251", "ECE").await;
    let tuition = app
        .repo
        .add_fee(NewFee {
            student_id: "ECE20251".into(),
            fee_type: "Tuition Fee".into(),
            amount: 45000.0,
            due_date: date(2025, 4, 10),
            academic_year: "2024-2025".into(),
            semester: 1,
        })
        .await
        .unwrap();
    app.repo
        .add_fee(NewFee {
            student_id: "ECE20251".into(),
            fee_type: "Library Fee".into(),
            amount: 2000.0,
            due_date: date(2025, 4, 10),
            academic_year: "2024-2025".into(),
            semester: 1,
        })
        .await
        .unwrap();
    app.repo
        .record_fee_payment(tuition, 20000.0, date(2025, 3, 1), Some("TXN1".into()))
        .await
        .unwrap();

    let res = app.get("/api/fees/ECE20251").await;
    assert_eq!(res.status, StatusCode::OK);
    let groups = res.body["data"]["fees"].as_array().unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0]["academic_year"], "2024-2025");

    let items = groups[0]["fees"].as_array().unwrap();
    assert_eq!(items[0]["due_amount"], 25000.0);
    assert_eq!(items[0]["payment_status"], "partial");
    assert_eq!(items[0]["transaction_id"], "TXN1");
    assert_eq!(items[1]["payment_status"], "pending");

    let overall = &res.body["data"]["overall"];
    assert_eq!(overall["total_amount"], 47000.0);
    assert_eq!(overall["total_paid"], 20000.0);
    assert_eq!(overall["total_due"], 27000.0);
    assert_eq!(overall["payment_progress"], 42.55);
}

#[tokio::test]
async fn timetable_is_keyed_by_day_and_period() {
    let app = test_app().await;
    let dsp = subject(&app, "EC301", "DSP").await;
    for (day, period, subject_id) in [
        ("Tuesday", 1, Some(dsp)),
        ("Monday", 2, None),
        ("Monday", 1, Some(dsp)),
    ] {
        app.repo
            .add_timetable_slot(NewTimetableSlot {
                day: day.into(),
                period,
                branch: "ECE".into(),
                semester: 5,
                subject_id,
                room_number: Some("ECE-1".into()),
                start_time: "9:00".into(),
                end_time: "10:00".into(),
            })
            .await
            .unwrap();
    }

    let res = app.get("/api/timetable?branch=ECE&semester=5").await;
    assert_eq!(res.status, StatusCode::OK);
    let timetable = &res.body["data"]["timetable"];
    let days: Vec<&String> = timetable.as_object().unwrap().keys().collect();
    assert_eq!(days, ["Monday", "Tuesday"]);
    assert_eq!(timetable["Monday"]["1"]["subject_code"], "EC301");
    assert_eq!(timetable["Monday"]["2"]["subject_name"], "Free Period");
    assert_eq!(timetable["Monday"]["2"]["subject_code"], "-");

    let res = app.get("/api/timetable?branch=CSE").await;
    assert_eq!(res.body["data"]["timetable"], json!({}));

    let res = app.get("/api/timetable?semester=five").await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unfiltered_timetable_keeps_newest_slot_per_cell() {
    let app = test_app().await;
    let dsp = subject(&app, "EC301", "DSP").await;
    for (branch, semester) in [("ECE", 5), ("CSE", 1)] {
        app.repo
            .add_timetable_slot(NewTimetableSlot {
                day: "Monday".into(),
                period: 1,
                branch: branch.into(),
                semester,
                subject_id: Some(dsp),
                room_number: None,
                start_time: "9:00".into(),
                end_time: "10:00".into(),
            })
            .await
            .unwrap();
    }

    let res = app.get("/api/timetable").await;
    let cell = &res.body["data"]["timetable"]["Monday"]["1"];
    assert_eq!(cell["branch"], "CSE");
    assert_eq!(cell["semester"], 1);

    let res = app.get("/api/timetable?branch=ECE").await;
    let cell = &res.body["data"]["timetable"]["Monday"]["1"];
    assert_eq!(cell["branch"], "ECE");
    assert_eq!(cell["semester"], 5);
}

#[tokio::test]
async fn notifications_are_most_urgent_first() {
    let app = test_app().await;
    let today = today();
    let yesterday = today.checked_sub_days(Days::new(1)).unwrap();
    for (title, category, priority, date, expiry_date) in [
        ("Holiday", "general", 0, today, None),
        ("Exams", "exams", 2, yesterday, None),
        ("Placement", "placement", 2, today, None),
        ("Old news", "general", 5, yesterday, Some(yesterday)),
    ] {
        app.repo
            .add_notification(NewNotification {
                title: title.into(),
                message: format!("{title} details"),
                category: category.into(),
                priority,
                date,
                expiry_date,
            })
            .await
            .unwrap();
    }

    let res = app.get("/api/notifications").await;
    assert_eq!(res.status, StatusCode::OK);
    let titles: Vec<&str> = res.body["data"]["notifications"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, ["Placement", "Exams", "Holiday"]);

    let res = app.get("/api/notifications?category=general&limit=1").await;
    let list = res.body["data"]["notifications"].as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["title"], "Holiday");

    let res = app.get("/api/notifications?limit=0").await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn profile_read_and_update() {
    let app = test_app().await;
    app.add_student("CSE20251", "CSE").await;
    app.add_student("CSE20252", "CSE").await;

    let res = app.get("/api/profile/CSE20251").await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"]["user"]["email"], "cse20251@example.com");

    let res = app.get("/api/profile/NOPE").await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);

    let res = app
        .put("/api/profile/CSE20251", json!({ "name": "  ", "phone": "" }))
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["message"], "No fields to update");

    let res = app
        .put("/api/profile/CSE20251", json!({ "email": "cse20252@example.com" }))
        .await;
    assert_eq!(res.status, StatusCode::CONFLICT);
    assert_eq!(res.body["message"], "Email already in use");

    let res = app
        .put("/api/profile/CSE20251", json!({ "email": "bad-email" }))
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    let res = app
        .put("/api/profile/NOPE", json!({ "name": "Ghost" }))
        .await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);

    let res = app
        .put(
            "/api/profile/CSE20251",
            json!({ "name": "John Q. Doe", "phone": "9000000000" }),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["message"], "Profile updated successfully");

    let user = app.repo.find_user("CSE20251").await.unwrap().unwrap();
    assert_eq!(user.name, "John Q. Doe");
    assert_eq!(user.phone, "9000000000");
    assert_eq!(user.email, "cse20251@example.com");
}
