//! Registration, login and password management.

use axum::extract::State;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::info;

use super::envelope::ApiResponse;
use super::extract::JsonBody;
use super::validate::Validator;
use super::AppState;
use crate::entity::user;
use crate::error::{PortalError, Result};
use crate::repository::NewUser;

/// Session key holding the logged-in student's hall-ticket number.
pub const STUDENT_KEY: &str = "hallticketnumber";

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub branch: Option<String>,
    pub hallticketnumber: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registered {
    pub user_id: i32,
}

#[derive(Debug, Serialize)]
pub struct UserPayload {
    pub user: user::Model,
}

pub async fn register(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<RegisterRequest>,
) -> Result<ApiResponse<Registered>> {
    let mut v = Validator::new();
    let name = v.required("name", body.name.as_deref(), "Name is required");
    let username = v.required("username", body.username.as_deref(), "Username is required");
    let email = v.email("email", body.email.as_deref());
    let phone = v.required("phone", body.phone.as_deref(), "Phone number is required");
    let branch = v.required("branch", body.branch.as_deref(), "Branch is required");
    let hallticketnumber = v.required(
        "hallticketnumber",
        body.hallticketnumber.as_deref(),
        "Hall ticket number is required",
    );
    let password = v.password("password", body.password.as_deref(), "Password");
    v.finish()?;

    let password_hash = state.hasher.hash(&password).await?;
    let user_id = state
        .repo
        .create_user(NewUser {
            name,
            username,
            email,
            phone,
            branch,
            hallticketnumber: hallticketnumber.clone(),
            password_hash,
        })
        .await?;

    info!(%hallticketnumber, user_id, "registered student");
    Ok(ApiResponse::created(Registered { user_id }).message("Registration successful"))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub hallticketnumber: Option<String>,
    pub password: Option<String>,
}

/// Checks credentials and binds the session to the student.
///
/// An unknown hall-ticket number and a wrong password are indistinguishable
/// to the caller.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    JsonBody(body): JsonBody<LoginRequest>,
) -> Result<ApiResponse<UserPayload>> {
    let mut v = Validator::new();
    let hallticketnumber = v.required(
        "hallticketnumber",
        body.hallticketnumber.as_deref(),
        "Hall ticket number is required",
    );
    let password = match body.password.as_deref().filter(|p| !p.is_empty()) {
        Some(p) => p.to_owned(),
        None => {
            v.fail("password", "Password is required");
            String::new()
        }
    };
    v.finish()?;

    let user = state
        .repo
        .find_user(&hallticketnumber)
        .await?
        .ok_or_else(|| PortalError::unauthorized("Invalid credentials"))?;
    if !state.hasher.verify(&password, &user.password_hash).await? {
        return Err(PortalError::unauthorized("Invalid credentials"));
    }

    session.cycle_id().await?;
    session.insert(STUDENT_KEY, &user.hallticketnumber).await?;

    info!(hallticketnumber = %user.hallticketnumber, "student logged in");
    Ok(ApiResponse::ok(UserPayload { user }).message("Login successful"))
}

pub async fn logout(session: Session) -> Result<ApiResponse<()>> {
    session.flush().await?;
    Ok(ApiResponse::done("Logged out successfully"))
}

/// The student bound to the current session.
pub async fn current_user(
    State(state): State<AppState>,
    session: Session,
) -> Result<ApiResponse<UserPayload>> {
    let hallticketnumber = session
        .get::<String>(STUDENT_KEY)
        .await?
        .ok_or_else(|| PortalError::unauthorized("Not logged in"))?;

    match state.repo.find_user(&hallticketnumber).await? {
        Some(user) => Ok(ApiResponse::ok(UserPayload { user })),
        None => {
            session.flush().await?;
            Err(PortalError::unauthorized("Not logged in"))
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePasswordRequest {
    pub hallticketnumber: Option<String>,
    pub email: Option<String>,
    pub old_password: Option<String>,
    pub new_password: Option<String>,
}

pub async fn update_password(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<UpdatePasswordRequest>,
) -> Result<ApiResponse<()>> {
    let mut v = Validator::new();
    let hallticketnumber = v.required(
        "hallticketnumber",
        body.hallticketnumber.as_deref(),
        "Hall ticket number is required",
    );
    let email = v.email("email", body.email.as_deref());
    let old_password = match body.old_password.as_deref().filter(|p| !p.is_empty()) {
        Some(p) => p.to_owned(),
        None => {
            v.fail("oldPassword", "Old password is required");
            String::new()
        }
    };
    let new_password = v.password("newPassword", body.new_password.as_deref(), "New password");
    v.finish()?;

    let user = state
        .repo
        .find_user_by_email(&hallticketnumber, &email)
        .await?
        .ok_or_else(|| PortalError::not_found("User not found"))?;
    if !state.hasher.verify(&old_password, &user.password_hash).await? {
        return Err(PortalError::unauthorized("Invalid credentials"));
    }

    let hash = state.hasher.hash(&new_password).await?;
    state.repo.set_password(&hallticketnumber, &hash).await?;

    info!(%hallticketnumber, "password updated");
    Ok(ApiResponse::done("Password updated successfully"))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForgotPasswordRequest {
    pub hallticketnumber: Option<String>,
    pub email: Option<String>,
    pub new_password: Option<String>,
}

/// Resets the password of the student matching both hall-ticket number and email.
pub async fn forgot_password(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<ForgotPasswordRequest>,
) -> Result<ApiResponse<()>> {
    let mut v = Validator::new();
    let hallticketnumber = v.required(
        "hallticketnumber",
        body.hallticketnumber.as_deref(),
        "Hall ticket number is required",
    );
    let email = v.email("email", body.email.as_deref());
    let new_password = v.password("newPassword", body.new_password.as_deref(), "New password");
    v.finish()?;

    if state
        .repo
        .find_user_by_email(&hallticketnumber, &email)
        .await?
        .is_none()
    {
        return Err(PortalError::not_found("User not found"));
    }

    let hash = state.hasher.hash(&new_password).await?;
    state.repo.set_password(&hallticketnumber, &hash).await?;

    info!(%hallticketnumber, "password reset");
    Ok(ApiResponse::done("Password reset successfully"))
}
