//! Handlers for the `/households` resource.
//!
//! Membership lives on the user row; a user belongs to at most one
//! household. Join codes and ownership transfer are owner-only.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use kitchenry_core::sharing::{generate_join_code, is_expired, normalize_join_code, share_expiry};
use kitchenry_core::types::{DbId, Timestamp};
use kitchenry_db::models::household::{Household, HouseholdResponse};
use kitchenry_db::models::user::UserResponse;
use kitchenry_db::repositories::{HouseholdRepo, UserRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::CurrentUser;
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct CreateHouseholdRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct InviteRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct JoinRequest {
    pub join_code: String,
}

#[derive(Debug, Deserialize)]
pub struct TransferRequest {
    pub user_id: DbId,
}

#[derive(Debug, Serialize)]
pub struct JoinCodeResponse {
    pub join_code: String,
    pub expires_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn with_members(state: &AppState, household: Household) -> AppResult<HouseholdResponse> {
    let member_ids = HouseholdRepo::member_ids(&state.pool, household.id).await?;
    Ok(HouseholdResponse {
        household,
        member_ids,
    })
}

/// The caller's household, or 400 if they have none.
async fn my_household(state: &AppState, user: &CurrentUser) -> AppResult<Household> {
    let household_id = user
        .household_id()
        .ok_or_else(|| AppError::validation("You are not in a household"))?;
    HouseholdRepo::find_by_id(&state.pool, household_id)
        .await?
        .ok_or(AppError::not_found("Household", household_id))
}

/// The caller's household, or 403 unless they own it.
async fn owned_household(state: &AppState, user: &CurrentUser) -> AppResult<Household> {
    let household = my_household(state, user).await?;
    if household.owner_id != user.id() {
        return Err(AppError::forbidden("Only the household owner can do this"));
    }
    Ok(household)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/households
///
/// Create a household owned by the caller, who must not be in one yet.
pub async fn create_household(
    user: CurrentUser,
    State(state): State<AppState>,
    Json(input): Json<CreateHouseholdRequest>,
) -> AppResult<impl IntoResponse> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(AppError::validation("Household name must not be empty"));
    }

    let household = HouseholdRepo::create(&state.pool, name, user.id())
        .await?
        .ok_or_else(|| AppError::conflict("You are already in a household"))?;

    tracing::info!(household_id = household.id, user_id = user.id(), "Household created");

    let data = with_members(&state, household).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data })))
}

/// GET /api/households/me
///
/// The caller's household, or `null`.
pub async fn get_my_household(
    user: CurrentUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let household = match user.household_id() {
        Some(id) => match HouseholdRepo::find_by_id(&state.pool, id).await? {
            Some(h) => Some(with_members(&state, h).await?),
            None => None,
        },
        None => None,
    };
    Ok(Json(DataResponse { data: household }))
}

/// GET /api/households/members
pub async fn list_members(
    user: CurrentUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let household = my_household(&state, &user).await?;
    let members: Vec<UserResponse> = UserRepo::list_by_household(&state.pool, household.id)
        .await?
        .iter()
        .map(UserResponse::from)
        .collect();
    Ok(Json(DataResponse { data: members }))
}

/// POST /api/households/invite
///
/// Add a registered, household-less user to the caller's household.
pub async fn invite_member(
    user: CurrentUser,
    State(state): State<AppState>,
    Json(input): Json<InviteRequest>,
) -> AppResult<impl IntoResponse> {
    let household = my_household(&state, &user).await?;
    let invitee = UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .ok_or_else(|| AppError::NotFound("No user with that email".into()))?;

    if !UserRepo::join_household(&state.pool, invitee.id, household.id).await? {
        return Err(AppError::conflict("User is already in a household"));
    }

    tracing::info!(
        household_id = household.id,
        user_id = user.id(),
        invitee_id = invitee.id,
        "Member invited",
    );

    let data = with_members(&state, household).await?;
    Ok(Json(DataResponse { data }))
}

/// POST /api/households/leave
///
/// Members leave freely. The owner may leave only as the last member, which
/// dissolves the household.
pub async fn leave_household(
    user: CurrentUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let household = my_household(&state, &user).await?;

    if household.owner_id == user.id() {
        if HouseholdRepo::member_count(&state.pool, household.id).await? > 1 {
            return Err(AppError::conflict(
                "Transfer household ownership before leaving",
            ));
        }
        HouseholdRepo::delete(&state.pool, household.id).await?;
        tracing::info!(household_id = household.id, user_id = user.id(), "Household dissolved");
        return Ok(Json(MessageResponse::new("Household dissolved")));
    }

    UserRepo::set_household(&state.pool, user.id(), None).await?;
    tracing::info!(household_id = household.id, user_id = user.id(), "Member left household");

    Ok(Json(MessageResponse::new("Left household")))
}

/// POST /api/households/join-code
///
/// Generate a fresh join code, replacing any previous one. Owner only.
pub async fn generate_code(
    user: CurrentUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let household = owned_household(&state, &user).await?;
    let code = generate_join_code();
    let expires_at = share_expiry(Utc::now(), state.config.join_code_expiry_days);

    HouseholdRepo::set_join_code(&state.pool, household.id, &code, expires_at)
        .await?
        .ok_or(AppError::not_found("Household", household.id))?;

    tracing::info!(household_id = household.id, user_id = user.id(), "Join code generated");

    Ok(Json(DataResponse {
        data: JoinCodeResponse {
            join_code: code,
            expires_at,
        },
    }))
}

/// DELETE /api/households/join-code
pub async fn revoke_code(
    user: CurrentUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let household = owned_household(&state, &user).await?;
    HouseholdRepo::clear_join_code(&state.pool, household.id).await?;

    tracing::info!(household_id = household.id, user_id = user.id(), "Join code revoked");

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/households/join
///
/// Join a household by code. Codes are case-insensitive.
pub async fn join_by_code(
    user: CurrentUser,
    State(state): State<AppState>,
    Json(input): Json<JoinRequest>,
) -> AppResult<impl IntoResponse> {
    if user.household_id().is_some() {
        return Err(AppError::conflict("You are already in a household"));
    }

    let code = normalize_join_code(&input.join_code);
    let household = HouseholdRepo::find_by_join_code(&state.pool, &code)
        .await?
        .ok_or_else(|| AppError::validation("Invalid join code"))?;

    let expired = household
        .join_code_expires_at
        .is_none_or(|expires_at| is_expired(expires_at, Utc::now()));
    if expired {
        return Err(AppError::validation("Join code has expired"));
    }

    if !UserRepo::join_household(&state.pool, user.id(), household.id).await? {
        return Err(AppError::conflict("You are already in a household"));
    }

    tracing::info!(household_id = household.id, user_id = user.id(), "Joined household by code");

    let data = with_members(&state, household).await?;
    Ok(Json(DataResponse { data }))
}

/// POST /api/households/transfer
///
/// Hand ownership to another current member. Owner only.
pub async fn transfer_ownership(
    user: CurrentUser,
    State(state): State<AppState>,
    Json(input): Json<TransferRequest>,
) -> AppResult<impl IntoResponse> {
    let household = owned_household(&state, &user).await?;

    if !HouseholdRepo::transfer_owner(&state.pool, household.id, input.user_id).await? {
        return Err(AppError::validation(
            "New owner must be a member of the household",
        ));
    }

    tracing::info!(
        household_id = household.id,
        user_id = user.id(),
        new_owner_id = input.user_id,
        "Household ownership transferred",
    );

    let household = HouseholdRepo::find_by_id(&state.pool, household.id)
        .await?
        .ok_or(AppError::not_found("Household", household.id))?;
    let data = with_members(&state, household).await?;
    Ok(Json(DataResponse { data }))
}
