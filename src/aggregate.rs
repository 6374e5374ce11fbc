//! Grouping and percentage summaries over query rows.
//!
//! Everything here is pure: rows in, serializable summaries out. Percentages
//! are rounded to two decimals and are `0` whenever the denominator is zero.

use std::collections::BTreeMap;

use chrono::{NaiveDate, Weekday};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::entity::fee;
use crate::repository::{AttendanceRow, MarkRow, TimetableRow};

pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// `part / whole * 100`, rounded to 2 decimals; `0` when `whole` is not positive.
pub fn percentage(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        round2(part / whole * 100.0)
    } else {
        0.0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AttendanceTotals {
    pub total: i64,
    pub present: i64,
    pub absent: i64,
    pub percentage: f64,
}

impl AttendanceTotals {
    fn add(&mut self, row: &AttendanceRow) {
        self.total += i64::from(row.total);
        self.present += i64::from(row.present);
        self.absent += i64::from(row.absent);
        self.percentage = percentage(self.present as f64, self.total as f64);
    }

    fn of(row: &AttendanceRow) -> Self {
        let mut t = Self::default();
        t.add(row);
        t
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyAttendance {
    pub month: String,
    #[serde(flatten)]
    pub counts: AttendanceTotals,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectAttendance {
    pub subject_id: i32,
    pub subject_name: String,
    pub subject_code: String,
    #[serde(flatten)]
    pub counts: AttendanceTotals,
    pub monthly_data: Vec<MonthlyAttendance>,
}

/// A single month's row, returned as-is when the caller filters by month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendanceEntry {
    pub subject_id: i32,
    pub subject_name: String,
    pub subject_code: String,
    pub month: String,
    #[serde(flatten)]
    pub counts: AttendanceTotals,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AttendanceView {
    BySubject(Vec<SubjectAttendance>),
    Monthly(Vec<AttendanceEntry>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendanceReport {
    pub attendance: AttendanceView,
    pub overall: AttendanceTotals,
}

/// Rolls attendance rows up per subject (ordered by subject id), keeping each
/// month underneath its subject.
pub fn attendance_by_subject(rows: &[AttendanceRow]) -> Vec<SubjectAttendance> {
    let mut by_subject: BTreeMap<i32, SubjectAttendance> = BTreeMap::new();
    for row in rows {
        let subject = by_subject
            .entry(row.subject_id)
            .or_insert_with(|| SubjectAttendance {
                subject_id: row.subject_id,
                subject_name: row.subject_name.clone(),
                subject_code: row.subject_code.clone(),
                counts: AttendanceTotals::default(),
                monthly_data: Vec::new(),
            });
        subject.counts.add(row);
        subject.monthly_data.push(MonthlyAttendance {
            month: row.month.clone(),
            counts: AttendanceTotals::of(row),
        });
    }
    by_subject.into_values().collect()
}

pub fn attendance_overall(rows: &[AttendanceRow]) -> AttendanceTotals {
    rows.iter().fold(AttendanceTotals::default(), |mut acc, row| {
        acc.add(row);
        acc
    })
}

/// Per-subject rollups when `month_filtered` is false, otherwise the raw
/// monthly rows. The overall block is always computed across all rows.
pub fn attendance_report(rows: &[AttendanceRow], month_filtered: bool) -> AttendanceReport {
    let attendance = if month_filtered {
        AttendanceView::Monthly(
            rows.iter()
                .map(|row| AttendanceEntry {
                    subject_id: row.subject_id,
                    subject_name: row.subject_name.clone(),
                    subject_code: row.subject_code.clone(),
                    month: row.month.clone(),
                    counts: AttendanceTotals::of(row),
                })
                .collect(),
        )
    } else {
        AttendanceView::BySubject(attendance_by_subject(rows))
    };
    AttendanceReport {
        attendance,
        overall: attendance_overall(rows),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MarksTotals {
    pub total_marks: i64,
    pub total_max_marks: i64,
    pub percentage: f64,
}

impl MarksTotals {
    pub fn new(total_marks: i64, total_max_marks: i64) -> Self {
        Self {
            total_marks,
            total_max_marks,
            percentage: percentage(total_marks as f64, total_max_marks as f64),
        }
    }

    fn add(&mut self, marks: i32, max_marks: i32) {
        *self = Self::new(
            self.total_marks + i64::from(marks),
            self.total_max_marks + i64::from(max_marks),
        );
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExamResult {
    pub exam_type: String,
    pub marks: i32,
    pub max_marks: i32,
    pub percentage: f64,
    pub exam_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectMarks {
    pub subject_id: i32,
    pub subject_name: String,
    pub subject_code: String,
    pub exams: Vec<ExamResult>,
    #[serde(flatten)]
    pub totals: MarksTotals,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarksReport {
    pub marks: Vec<SubjectMarks>,
    pub overall: MarksTotals,
}

pub fn marks_report(rows: &[MarkRow]) -> MarksReport {
    let mut by_subject: BTreeMap<i32, SubjectMarks> = BTreeMap::new();
    let mut overall = MarksTotals::default();

    for row in rows {
        let subject = by_subject
            .entry(row.subject_id)
            .or_insert_with(|| SubjectMarks {
                subject_id: row.subject_id,
                subject_name: row.subject_name.clone(),
                subject_code: row.subject_code.clone(),
                exams: Vec::new(),
                totals: MarksTotals::default(),
            });
        subject.exams.push(ExamResult {
            exam_type: row.exam_type.clone(),
            marks: row.marks,
            max_marks: row.max_marks,
            percentage: percentage(f64::from(row.marks), f64::from(row.max_marks)),
            exam_date: row.exam_date,
        });
        subject.totals.add(row.marks, row.max_marks);
        overall.add(row.marks, row.max_marks);
    }

    MarksReport {
        marks: by_subject.into_values().collect(),
        overall,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Paid,
    Partial,
    Pending,
}

impl PaymentStatus {
    pub fn derive(amount: f64, paid_amount: f64) -> Self {
        if amount - paid_amount <= 0.0 {
            Self::Paid
        } else if paid_amount > 0.0 {
            Self::Partial
        } else {
            Self::Pending
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeeItem {
    pub id: i32,
    pub fee_type: String,
    pub amount: f64,
    pub paid_amount: f64,
    pub due_amount: f64,
    pub due_date: NaiveDate,
    pub payment_status: PaymentStatus,
    pub payment_date: Option<NaiveDate>,
    pub transaction_id: Option<String>,
}

impl From<&fee::Model> for FeeItem {
    fn from(row: &fee::Model) -> Self {
        Self {
            id: row.id,
            fee_type: row.fee_type.clone(),
            amount: row.amount,
            paid_amount: row.paid_amount,
            due_amount: row.due_amount(),
            due_date: row.due_date,
            payment_status: PaymentStatus::derive(row.amount, row.paid_amount),
            payment_date: row.payment_date,
            transaction_id: row.transaction_id.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct FeeTotals {
    pub total_amount: f64,
    pub total_paid: f64,
    pub total_due: f64,
    pub payment_progress: f64,
}

impl FeeTotals {
    pub fn new(total_amount: f64, total_paid: f64) -> Self {
        Self {
            total_amount,
            total_paid,
            total_due: total_amount - total_paid,
            payment_progress: percentage(total_paid, total_amount),
        }
    }

    fn add(&mut self, amount: f64, paid_amount: f64) {
        *self = Self::new(self.total_amount + amount, self.total_paid + paid_amount);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeeGroup {
    pub academic_year: String,
    pub semester: i32,
    pub fees: Vec<FeeItem>,
    #[serde(flatten)]
    pub totals: FeeTotals,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeesReport {
    pub fees: Vec<FeeGroup>,
    pub overall: FeeTotals,
}

/// Groups fee rows by `(academic_year, semester)`, keeping groups in the order
/// they first appear in `rows`.
pub fn fees_report(rows: &[fee::Model]) -> FeesReport {
    let mut groups: Vec<FeeGroup> = Vec::new();
    let mut overall = FeeTotals::default();

    for row in rows {
        let idx = match groups
            .iter()
            .position(|g| g.academic_year == row.academic_year && g.semester == row.semester)
        {
            Some(idx) => idx,
            None => {
                groups.push(FeeGroup {
                    academic_year: row.academic_year.clone(),
                    semester: row.semester,
                    fees: Vec::new(),
                    totals: FeeTotals::default(),
                });
                groups.len() - 1
            }
        };
        let group = &mut groups[idx];
        group.fees.push(FeeItem::from(row));
        group.totals.add(row.amount, row.paid_amount);
        overall.add(row.amount, row.paid_amount);
    }

    FeesReport {
        fees: groups,
        overall,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimetableEntry {
    pub branch: String,
    pub semester: i32,
    pub subject_id: Option<i32>,
    pub subject_name: String,
    pub subject_code: String,
    pub room_number: Option<String>,
    pub start_time: String,
    pub end_time: String,
}

/// Timetable keyed day → period, serialized as a JSON object whose days appear
/// in week order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeekTimetable(pub Vec<(String, BTreeMap<i32, TimetableEntry>)>);

impl WeekTimetable {
    pub fn day(&self, day: &str) -> Option<&BTreeMap<i32, TimetableEntry>> {
        self.0.iter().find(|(d, _)| d == day).map(|(_, periods)| periods)
    }
}

impl Serialize for WeekTimetable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (day, periods) in &self.0 {
            map.serialize_entry(day, periods)?;
        }
        map.end()
    }
}

/// Position of a weekday name in the week (Monday = 0). Unknown names sort last.
pub fn day_order(day: &str) -> u32 {
    day.parse::<Weekday>()
        .map(|w| w.num_days_from_monday())
        .unwrap_or(7)
}

pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Groups slots by day then period.
///
/// A (day, period) cell holds one slot. Without a branch and semester filter
/// several classes can share a cell; the most recently added slot (highest
/// id) is kept, and its `branch` and `semester` tell which class it belongs
/// to.
pub fn group_timetable(mut rows: Vec<TimetableRow>) -> WeekTimetable {
    rows.sort_by(|a, b| {
        day_order(&a.day)
            .cmp(&day_order(&b.day))
            .then_with(|| a.day.cmp(&b.day))
            .then_with(|| a.period.cmp(&b.period))
            .then_with(|| a.id.cmp(&b.id))
    });

    let mut days: Vec<(String, BTreeMap<i32, TimetableEntry>)> = Vec::new();
    for row in rows {
        let entry = TimetableEntry {
            branch: row.branch,
            semester: row.semester,
            subject_id: row.subject_id,
            subject_name: row.subject_name.unwrap_or_else(|| "Free Period".to_string()),
            subject_code: row.subject_code.unwrap_or_else(|| "-".to_string()),
            room_number: row.room_number,
            start_time: row.start_time,
            end_time: row.end_time,
        };
        match days.last_mut() {
            Some((day, periods)) if *day == row.day => {
                periods.insert(row.period, entry);
            }
            _ => {
                days.push((row.day, BTreeMap::from([(row.period, entry)])));
            }
        }
    }
    WeekTimetable(days)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DashboardAttendance {
    pub total_classes: i64,
    pub classes_attended: i64,
    pub classes_missed: i64,
    pub percentage: f64,
}

impl DashboardAttendance {
    pub fn new(total_classes: i64, classes_attended: i64) -> Self {
        Self {
            total_classes,
            classes_attended,
            classes_missed: total_classes - classes_attended,
            percentage: percentage(classes_attended as f64, total_classes as f64),
        }
    }
}
