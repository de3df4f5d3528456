//! Handlers for the `/recipes` resource.
//!
//! Recipes are visible to their author and to the members of their household;
//! anything else answers 404 so ids of other households do not leak.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use kitchenry_core::recipe::{upload_file_name, validate_draft, RecipeDraft, UPLOADS_PATH};
use kitchenry_core::recipe_card::{card_filename, render_png, CardLayout};
use kitchenry_core::scaling::{
    scale_ingredients, ScaledIngredients, MAX_SCALED_SERVINGS, MIN_SCALED_SERVINGS,
};
use kitchenry_core::search::{
    category_filter, clamp_limit, clamp_offset, contains_pattern, DEFAULT_LIST_LIMIT,
    MAX_LIST_LIMIT,
};
use kitchenry_core::sharing::{generate_token, share_expiry, SHARE_TOKEN_LEN};
use kitchenry_core::types::{DbId, Timestamp};
use kitchenry_db::models::recipe::{Recipe, RecipeFilter};
use kitchenry_db::repositories::{FavoriteRepo, RecipeRepo, ShareRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::CurrentUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Extensions accepted for recipe images.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

pub const EXPORT_FILENAME: &str = "kitchenry-recipes.json";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /recipes`.
#[derive(Debug, Deserialize)]
pub struct RecipeListParams {
    pub category: Option<String>,
    pub search: Option<String>,
    #[serde(default)]
    pub favorites_only: bool,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct ScaleParams {
    pub servings: i32,
}

/// A recipe with its ingredient list rescaled.
#[derive(Debug, Serialize)]
pub struct ScaledRecipe {
    pub recipe: Recipe,
    #[serde(flatten)]
    pub scaled: ScaledIngredients,
}

#[derive(Debug, Serialize)]
pub struct PrintView {
    pub recipe: Recipe,
    pub total_time: i32,
    pub printed_at: Timestamp,
}

#[derive(Debug, Serialize)]
pub struct ShareResponse {
    pub share_id: String,
    pub share_url: String,
    pub expires_at: Timestamp,
}

#[derive(Debug, Serialize)]
pub struct FavoriteState {
    pub recipe_id: DbId,
    pub is_favorite: bool,
}

#[derive(Debug, Serialize)]
pub struct ImageResponse {
    pub image_url: String,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load a recipe the caller can see, or 404.
pub async fn visible_recipe(state: &AppState, user: &CurrentUser, id: DbId) -> AppResult<Recipe> {
    RecipeRepo::find_visible(&state.pool, id, user.viewer())
        .await?
        .ok_or(AppError::not_found("Recipe", id))
}

fn checked_draft(draft: RecipeDraft) -> AppResult<RecipeDraft> {
    validate_draft(&draft)?;
    Ok(draft.normalized())
}

/// Lowercased extension of an upload's file name, if it is an accepted one.
pub fn image_extension(file_name: &str) -> Option<String> {
    let (_, ext) = file_name.rsplit_once('.')?;
    let ext = ext.to_ascii_lowercase();
    IMAGE_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

/// Delete the stored file behind an `image_url`, if it is one of our uploads.
/// Anything that is not a single file name inside `upload_dir` is left alone.
async fn remove_upload(state: &AppState, image_url: &str) {
    let Some(file_name) = upload_file_name(image_url) else {
        return;
    };
    if std::path::Path::new(file_name).file_name() != Some(std::ffi::OsStr::new(file_name)) {
        tracing::warn!(image_url, "Refusing to remove image outside the upload directory");
        return;
    }
    let path = state.config.upload_dir.join(file_name);
    if let Err(e) = tokio::fs::remove_file(&path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!(path = %path.display(), error = %e, "Failed to remove recipe image");
        }
    }
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

/// GET /api/recipes
///
/// List visible recipes, newest first. `category=All` means no filter and
/// `search` matches title, description and tags literally.
pub async fn list_recipes(
    user: CurrentUser,
    State(state): State<AppState>,
    Query(params): Query<RecipeListParams>,
) -> AppResult<impl IntoResponse> {
    let filter = RecipeFilter {
        category: category_filter(params.category.as_deref()).map(str::to_string),
        search_pattern: contains_pattern(params.search.as_deref()),
        favorites_only: params.favorites_only,
        limit: clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT),
        offset: clamp_offset(params.offset),
    };
    let recipes = RecipeRepo::list(&state.pool, user.viewer(), &filter).await?;

    Ok(Json(DataResponse { data: recipes }))
}

/// POST /api/recipes
///
/// Create a recipe in the caller's household (or personally when they have
/// none).
pub async fn create_recipe(
    user: CurrentUser,
    State(state): State<AppState>,
    Json(input): Json<RecipeDraft>,
) -> AppResult<impl IntoResponse> {
    let draft = checked_draft(input)?;
    let recipe = RecipeRepo::create(&state.pool, user.id(), user.household_id(), &draft).await?;

    tracing::info!(recipe_id = recipe.id, user_id = user.id(), "Recipe created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: recipe })))
}

/// GET /api/recipes/{id}
pub async fn get_recipe(
    user: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let recipe = visible_recipe(&state, &user, id).await?;
    Ok(Json(DataResponse { data: recipe }))
}

/// PUT /api/recipes/{id}
///
/// Replace a recipe's content.
pub async fn update_recipe(
    user: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<RecipeDraft>,
) -> AppResult<impl IntoResponse> {
    visible_recipe(&state, &user, id).await?;
    let draft = checked_draft(input)?;

    let recipe = RecipeRepo::update(&state.pool, id, user.id(), &draft)
        .await?
        .ok_or(AppError::not_found("Recipe", id))?;

    tracing::info!(recipe_id = id, user_id = user.id(), "Recipe updated");

    Ok(Json(DataResponse { data: recipe }))
}

/// DELETE /api/recipes/{id}
pub async fn delete_recipe(
    user: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let recipe = visible_recipe(&state, &user, id).await?;

    if !RecipeRepo::delete(&state.pool, id).await? {
        return Err(AppError::not_found("Recipe", id));
    }
    remove_upload(&state, &recipe.image_url).await;

    tracing::info!(recipe_id = id, user_id = user.id(), "Recipe deleted");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Image upload
// ---------------------------------------------------------------------------

/// POST /api/recipes/{id}/image
///
/// Multipart upload (field `file`). The bytes must decode as an image; the
/// file is stored as `{id}.{ext}` and replaces any previous image.
pub async fn upload_image(
    user: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    mut multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let recipe = visible_recipe(&state, &user, id).await?;

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let ext = field
            .file_name()
            .and_then(image_extension)
            .ok_or_else(|| {
                AppError::validation(format!(
                    "Unsupported image type. Allowed: {}",
                    IMAGE_EXTENSIONS.join(", ")
                ))
            })?;
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        upload = Some((ext, bytes));
        break;
    }
    let (ext, bytes) =
        upload.ok_or_else(|| AppError::BadRequest("Missing multipart field 'file'".into()))?;

    let decoded = {
        let bytes = bytes.clone();
        tokio::task::spawn_blocking(move || image::load_from_memory(&bytes).is_ok())
            .await
            .map_err(|e| AppError::InternalError(format!("Image check failed: {e}")))?
    };
    if !decoded {
        return Err(AppError::validation("Uploaded file is not a valid image"));
    }

    tokio::fs::create_dir_all(&state.config.upload_dir)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to create upload dir: {e}")))?;

    if !recipe.image_url.is_empty() {
        remove_upload(&state, &recipe.image_url).await;
    }

    let file_name = format!("{id}.{ext}");
    tokio::fs::write(state.config.upload_dir.join(&file_name), &bytes)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to store image: {e}")))?;

    let image_url = format!("{UPLOADS_PATH}/{file_name}");
    RecipeRepo::set_image_url(&state.pool, id, &image_url).await?;

    tracing::info!(recipe_id = id, user_id = user.id(), bytes = bytes.len(), "Recipe image stored");

    Ok(Json(DataResponse {
        data: ImageResponse { image_url },
    }))
}

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

/// POST /api/recipes/{id}/favorite
///
/// Flip the caller's favorite flag and return the new state.
pub async fn toggle_favorite(
    user: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    visible_recipe(&state, &user, id).await?;
    let is_favorite = FavoriteRepo::toggle(&state.pool, user.id(), id).await?;

    tracing::info!(recipe_id = id, user_id = user.id(), is_favorite, "Favorite toggled");

    Ok(Json(DataResponse {
        data: FavoriteState {
            recipe_id: id,
            is_favorite,
        },
    }))
}

/// GET /api/recipes/{id}/scaled?servings=N
pub async fn scaled_recipe(
    user: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<ScaleParams>,
) -> AppResult<impl IntoResponse> {
    if !(MIN_SCALED_SERVINGS..=MAX_SCALED_SERVINGS).contains(&params.servings) {
        return Err(AppError::validation(format!(
            "Servings must be between {MIN_SCALED_SERVINGS} and {MAX_SCALED_SERVINGS}"
        )));
    }
    let recipe = visible_recipe(&state, &user, id).await?;
    let scaled = scale_ingredients(&recipe.ingredients.0, recipe.servings, params.servings);

    Ok(Json(DataResponse {
        data: ScaledRecipe { recipe, scaled },
    }))
}

/// GET /api/recipes/{id}/print
pub async fn print_recipe(
    user: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let recipe = visible_recipe(&state, &user, id).await?;
    let total_time = recipe.total_time();

    Ok(Json(DataResponse {
        data: PrintView {
            recipe,
            total_time,
            printed_at: Utc::now(),
        },
    }))
}

/// POST /api/recipes/{id}/share
///
/// Create a public, expiring share link.
pub async fn share_recipe(
    user: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    visible_recipe(&state, &user, id).await?;

    let token = generate_token(SHARE_TOKEN_LEN);
    let expires_at = share_expiry(Utc::now(), state.config.share_expiry_days);
    let share = ShareRepo::create(&state.pool, id, user.id(), &token, expires_at).await?;

    tracing::info!(recipe_id = id, user_id = user.id(), "Share link created");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: ShareResponse {
                share_url: format!("/shared/{}", share.share_token),
                share_id: share.share_token,
                expires_at: share.expires_at,
            },
        }),
    ))
}

/// GET /api/recipes/export
///
/// Every visible recipe in the native import format, as a download.
pub async fn export_recipes(
    user: CurrentUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let drafts: Vec<RecipeDraft> = RecipeRepo::list_visible(&state.pool, user.viewer())
        .await?
        .iter()
        .map(Recipe::to_draft)
        .collect();
    let body = serde_json::to_string_pretty(&drafts)
        .map_err(|e| AppError::InternalError(format!("Export serialization failed: {e}")))?;

    tracing::info!(user_id = user.id(), count = drafts.len(), "Recipes exported");

    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{EXPORT_FILENAME}\""),
            ),
        ],
        body,
    ))
}

/// GET /api/recipes/{id}/card
///
/// Shareable recipe card as a PNG download. An uploaded photo is drawn into
/// the card; remote photo links are left out.
pub async fn recipe_card(
    user: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let recipe = visible_recipe(&state, &user, id).await?;
    let layout = CardLayout::for_recipe(&recipe.to_draft());
    let photo = load_upload(&state, &recipe.image_url).await;

    let png = tokio::task::spawn_blocking(move || render_png(&layout, photo.as_ref()))
        .await
        .map_err(|e| AppError::InternalError(format!("Recipe card task failed: {e}")))??;

    Ok((
        [
            (header::CONTENT_TYPE, "image/png".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", card_filename(&recipe.title)),
            ),
        ],
        png,
    ))
}

/// Decode the uploaded photo behind an `image_url`. Unreadable files are
/// skipped so the card still renders.
async fn load_upload(state: &AppState, image_url: &str) -> Option<image::DynamicImage> {
    let file_name = upload_file_name(image_url)?;
    let path = state.config.upload_dir.join(file_name);
    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Recipe image unreadable");
            return None;
        }
    };
    match image::load_from_memory(&bytes) {
        Ok(photo) => Some(photo),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Recipe image undecodable");
            None
        }
    }
}
