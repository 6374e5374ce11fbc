//! Notifications, assignments and assignment submissions.

use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use super::envelope::ApiResponse;
use super::extract::JsonBody;
use super::validate::{self, Validator};
use super::{today, AppState};
use crate::entity::notification;
use crate::error::Result;
use crate::repository::{AssignmentRow, SubmissionRow, Submitted};

const DEFAULT_NOTIFICATION_LIMIT: u64 = 10;

#[derive(Debug, Default, Deserialize)]
pub struct NotificationQuery {
    pub category: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct NotificationsPayload {
    pub notifications: Vec<notification::Model>,
}

pub async fn notifications(
    State(state): State<AppState>,
    Query(query): Query<NotificationQuery>,
) -> Result<ApiResponse<NotificationsPayload>> {
    let mut v = Validator::new();
    let limit = match v.optional_int("limit", query.limit.as_deref()) {
        Some(n) if n > 0 => n as u64,
        Some(_) => {
            v.fail("limit", "limit must be a positive integer");
            0
        }
        None => DEFAULT_NOTIFICATION_LIMIT,
    };
    v.finish()?;
    let category = query
        .category
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty());

    let notifications = state.repo.notifications(category, limit, today()).await?;
    Ok(ApiResponse::ok(NotificationsPayload { notifications }))
}

#[derive(Debug, Default, Deserialize)]
pub struct AssignmentQuery {
    pub branch: Option<String>,
    pub semester: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AssignmentsPayload {
    pub assignments: Vec<AssignmentRow>,
}

pub async fn assignments(
    State(state): State<AppState>,
    Query(query): Query<AssignmentQuery>,
) -> Result<ApiResponse<AssignmentsPayload>> {
    let mut v = Validator::new();
    let semester = v.optional_int("semester", query.semester.as_deref());
    v.finish()?;
    let branch = query
        .branch
        .as_deref()
        .map(str::trim)
        .filter(|b| !b.is_empty());

    let assignments = state.repo.assignments(branch, semester).await?;
    Ok(ApiResponse::ok(AssignmentsPayload { assignments }))
}

#[derive(Debug, Serialize)]
pub struct SubmissionsPayload {
    pub submissions: Vec<SubmissionRow>,
}

pub async fn submissions(
    State(state): State<AppState>,
    Path(hallticketnumber): Path<String>,
) -> Result<ApiResponse<SubmissionsPayload>> {
    let hallticketnumber = validate::hall_ticket(&hallticketnumber)?;
    let submissions = state.repo.submissions_for(&hallticketnumber).await?;
    Ok(ApiResponse::ok(SubmissionsPayload { submissions }))
}

#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    pub student_id: Option<String>,
    /// Accepted as a JSON number or a numeric string.
    pub assignment_id: Option<Value>,
    pub file_path: Option<String>,
}

/// Records a submission dated today and reports whether it was late.
pub async fn submit(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<SubmitRequest>,
) -> Result<ApiResponse<Submitted>> {
    let mut v = Validator::new();
    let student_id = v.required(
        "student_id",
        body.student_id.as_deref(),
        "Student ID is required",
    );
    let assignment_id = assignment_id(body.assignment_id.as_ref());
    if assignment_id.is_none() {
        v.fail("assignment_id", "Assignment ID is required");
    }
    v.finish()?;
    let assignment_id = assignment_id.unwrap_or_default();

    let file_path = body
        .file_path
        .map(|p| p.trim().to_owned())
        .filter(|p| !p.is_empty());

    let submitted = state
        .repo
        .submit_assignment(&student_id, assignment_id, file_path, today())
        .await?;

    info!(
        %student_id,
        assignment_id,
        late = submitted.is_late,
        "assignment submitted"
    );
    let message = if submitted.is_late {
        "Assignment submitted successfully (late submission)"
    } else {
        "Assignment submitted successfully"
    };
    Ok(ApiResponse::created(submitted).message(message))
}

fn assignment_id(raw: Option<&Value>) -> Option<i32> {
    match raw? {
        Value::Number(n) => n.as_i64().and_then(|n| i32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
