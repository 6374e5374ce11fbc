//! Attendance, marks, fees and timetable reports.

use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};

use super::envelope::ApiResponse;
use super::validate::{self, Validator};
use super::AppState;
use crate::aggregate::{self, AttendanceReport, FeesReport, MarksReport, WeekTimetable};
use crate::error::Result;

#[derive(Debug, Default, Deserialize)]
pub struct AttendanceQuery {
    pub month: Option<String>,
}

/// Per-subject rollups, or the raw rows of one month when `?month=` is given.
pub async fn attendance(
    State(state): State<AppState>,
    Path(hallticketnumber): Path<String>,
    Query(query): Query<AttendanceQuery>,
) -> Result<ApiResponse<AttendanceReport>> {
    let hallticketnumber = validate::hall_ticket(&hallticketnumber)?;
    let month = query
        .month
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty());

    let rows = state.repo.attendance_rows(&hallticketnumber, month).await?;
    Ok(ApiResponse::ok(aggregate::attendance_report(
        &rows,
        month.is_some(),
    )))
}

pub async fn marks(
    State(state): State<AppState>,
    Path(hallticketnumber): Path<String>,
) -> Result<ApiResponse<MarksReport>> {
    let hallticketnumber = validate::hall_ticket(&hallticketnumber)?;
    let rows = state.repo.mark_rows(&hallticketnumber).await?;
    Ok(ApiResponse::ok(aggregate::marks_report(&rows)))
}

pub async fn fees(
    State(state): State<AppState>,
    Path(hallticketnumber): Path<String>,
) -> Result<ApiResponse<FeesReport>> {
    let hallticketnumber = validate::hall_ticket(&hallticketnumber)?;
    let rows = state.repo.fee_rows(&hallticketnumber).await?;
    Ok(ApiResponse::ok(aggregate::fees_report(&rows)))
}

#[derive(Debug, Default, Deserialize)]
pub struct TimetableQuery {
    pub branch: Option<String>,
    pub semester: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TimetablePayload {
    pub timetable: WeekTimetable,
}

pub async fn timetable(
    State(state): State<AppState>,
    Query(query): Query<TimetableQuery>,
) -> Result<ApiResponse<TimetablePayload>> {
    let mut v = Validator::new();
    let semester = v.optional_int("semester", query.semester.as_deref());
    v.finish()?;
    let branch = query
        .branch
        .as_deref()
        .map(str::trim)
        .filter(|b| !b.is_empty());

    let rows = state.repo.timetable_rows(branch, semester, None).await?;
    Ok(ApiResponse::ok(TimetablePayload {
        timetable: aggregate::group_timetable(rows),
    }))
}
