use axum::extract::{Path, State};
use serde::Deserialize;

use super::auth::UserPayload;
use super::envelope::ApiResponse;
use super::extract::JsonBody;
use super::validate::{self, Validator};
use super::AppState;
use crate::error::{PortalError, Result};
use crate::repository::ProfileChanges;

pub async fn show(
    State(state): State<AppState>,
    Path(hallticketnumber): Path<String>,
) -> Result<ApiResponse<UserPayload>> {
    let hallticketnumber = validate::hall_ticket(&hallticketnumber)?;
    let user = state
        .repo
        .find_user(&hallticketnumber)
        .await?
        .ok_or_else(|| PortalError::not_found("User not found"))?;
    Ok(ApiResponse::ok(UserPayload { user }))
}

#[derive(Debug, Default, Deserialize)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub profile_image: Option<String>,
}

/// Overwrites the provided, non-blank profile fields.
pub async fn update(
    State(state): State<AppState>,
    Path(hallticketnumber): Path<String>,
    JsonBody(body): JsonBody<ProfileUpdate>,
) -> Result<ApiResponse<()>> {
    let hallticketnumber = validate::hall_ticket(&hallticketnumber)?;

    let mut v = Validator::new();
    let email = v.optional_email("email", body.email.as_deref());
    v.finish()?;

    let changes = ProfileChanges {
        name: non_blank(body.name),
        email,
        phone: non_blank(body.phone),
        profile_image: non_blank(body.profile_image),
    };

    let updated = state.repo.update_profile(&hallticketnumber, changes).await?;
    if updated == 0 {
        return Err(PortalError::not_found("User not found"));
    }
    Ok(ApiResponse::done("Profile updated successfully"))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}
