//! Handlers for the `/auth` resource (register, login, own profile).

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use kitchenry_core::error::CoreError;
use kitchenry_db::models::user::{CreateUser, UpdateUser, User, UserResponse};
use kitchenry_db::repositories::{HouseholdRepo, UserRepo};
use serde::{Deserialize, Serialize};

use crate::auth::jwt::generate_access_token;
use crate::auth::password::{
    hash_password, validate_password_strength, verify_password, MIN_PASSWORD_LENGTH,
};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::CurrentUser;
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful authentication response returned by register and login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

fn issue_token(state: &AppState, user: &User) -> AppResult<AuthResponse> {
    let token = generate_access_token(user.id, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;
    Ok(AuthResponse {
        token,
        user: UserResponse::from(user),
    })
}

fn validate_email(email: &str) -> AppResult<()> {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(AppError::validation("Invalid email address")),
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/auth/register
///
/// Create an account and log it in.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<impl IntoResponse> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(AppError::validation("Name must not be empty"));
    }
    validate_email(&input.email)?;
    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    if UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .is_some()
    {
        return Err(AppError::conflict("Email already registered"));
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            name: name.to_string(),
            email: input.email.trim().to_string(),
            password_hash,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, "User registered");

    let body = issue_token(&state, &user)?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: body })))
}

/// POST /api/auth/login
///
/// Authenticate with email + password.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let invalid = || AppError::Core(CoreError::Unauthorized("Invalid email or password".into()));

    let user = UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .ok_or_else(invalid)?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        return Err(invalid());
    }

    tracing::info!(user_id = user.id, "User logged in");

    Ok(Json(DataResponse {
        data: issue_token(&state, &user)?,
    }))
}

/// GET /api/auth/me
pub async fn me(user: CurrentUser) -> AppResult<impl IntoResponse> {
    Ok(Json(DataResponse {
        data: UserResponse::from(&user.0),
    }))
}

/// PUT /api/auth/me
///
/// Update name, email and allergies. Omitted fields keep their values.
pub async fn update_me(
    user: CurrentUser,
    State(state): State<AppState>,
    Json(mut input): Json<UpdateUser>,
) -> AppResult<impl IntoResponse> {
    if let Some(name) = input.name.as_mut() {
        *name = name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::validation("Name must not be empty"));
        }
    }
    if let Some(email) = input.email.as_mut() {
        validate_email(email)?;
        *email = email.trim().to_string();
        if let Some(other) = UserRepo::find_by_email(&state.pool, email).await? {
            if other.id != user.id() {
                return Err(AppError::conflict("Email already registered"));
            }
        }
    }
    if let Some(allergies) = input.allergies.take() {
        input.allergies = Some(
            allergies
                .into_iter()
                .map(|a| a.trim().to_string())
                .filter(|a| !a.is_empty())
                .collect(),
        );
    }

    let updated = UserRepo::update(&state.pool, user.id(), &input)
        .await?
        .ok_or(AppError::not_found("User", user.id()))?;

    tracing::info!(user_id = updated.id, "Profile updated");

    Ok(Json(DataResponse {
        data: UserResponse::from(&updated),
    }))
}

/// DELETE /api/auth/me
///
/// Delete the account. An owner must hand over a household that still has
/// other members; a household the user owns alone is dissolved.
pub async fn delete_me(
    user: CurrentUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    if let Some(household_id) = user.household_id() {
        if let Some(household) = HouseholdRepo::find_by_id(&state.pool, household_id).await? {
            if household.owner_id == user.id() {
                if HouseholdRepo::member_count(&state.pool, household_id).await? > 1 {
                    return Err(AppError::conflict(
                        "Transfer household ownership before deleting account",
                    ));
                }
                HouseholdRepo::delete(&state.pool, household_id).await?;
                tracing::info!(household_id, user_id = user.id(), "Household dissolved");
            }
        }
    }

    UserRepo::delete_account(&state.pool, user.id()).await?;

    tracing::info!(user_id = user.id(), "Account deleted");

    Ok(Json(MessageResponse::new("Account deleted successfully")))
}
