use axum::extract::{Path, State};
use chrono::Datelike;
use serde::Serialize;

use super::envelope::ApiResponse;
use super::validate;
use super::{today, AppState};
use crate::aggregate::{weekday_name, DashboardAttendance, FeeTotals, MarksTotals};
use crate::entity::{notification, user};
use crate::error::{PortalError, Result};
use crate::repository::{AssignmentRow, TimetableRow};

const RECENT_NOTIFICATIONS: u64 = 5;
const UPCOMING_ASSIGNMENTS: u64 = 5;

#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub user: user::Model,
    pub attendance: DashboardAttendance,
    pub marks: MarksTotals,
    pub fees: FeeTotals,
    pub recent_notifications: Vec<notification::Model>,
    pub upcoming_assignments: Vec<AssignmentRow>,
    pub todays_timetable: Vec<TimetableRow>,
}

/// Everything the landing page shows for one student, in a single payload.
///
/// The student is looked up first; the remaining reads are independent and
/// run concurrently, and the first one to fail fails the request.
pub async fn dashboard(
    State(state): State<AppState>,
    Path(hallticketnumber): Path<String>,
) -> Result<ApiResponse<Dashboard>> {
    let hallticketnumber = validate::hall_ticket(&hallticketnumber)?;
    let repo = &state.repo;

    let user = repo
        .find_user(&hallticketnumber)
        .await?
        .ok_or_else(|| PortalError::not_found("User not found"))?;

    let today = today();
    let weekday = weekday_name(today.weekday());

    let (
        (total_classes, classes_attended),
        (total_marks, total_max_marks),
        (total_amount, total_paid),
        recent_notifications,
        upcoming_assignments,
        todays_timetable,
    ) = tokio::try_join!(
        repo.attendance_totals(&hallticketnumber),
        repo.marks_totals(&hallticketnumber),
        repo.fee_totals(&hallticketnumber),
        repo.notifications(None, RECENT_NOTIFICATIONS, today),
        repo.upcoming_assignments(&user.branch, today, UPCOMING_ASSIGNMENTS),
        repo.timetable_rows(Some(&user.branch), None, Some(weekday)),
    )?;

    Ok(ApiResponse::ok(Dashboard {
        user,
        attendance: DashboardAttendance::new(total_classes, classes_attended),
        marks: MarksTotals::new(total_marks, total_max_marks),
        fees: FeeTotals::new(total_amount, total_paid),
        recent_notifications,
        upcoming_assignments,
        todays_timetable,
    }))
}
