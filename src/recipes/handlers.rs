use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use crate::auth::extractors::{AuthUser, MaybeAuthUser};
use crate::error::ApiError;
use crate::social;
use crate::state::AppState;

use super::dto::{
    CreateRecipeRequest, EditRecipeRequest, ListParams, MessageResponse, RecipeDetails,
    RecipeListItem, RecipeListResponse,
};
use super::query::RecipeFilter;
use super::repo::Recipe;
use super::{repo, services};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/recipes", get(list_recipes))
        .route("/recipes/saved", get(list_saved))
        .route("/recipes/:id", get(get_recipe))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/recipes", post(create_recipe))
        .route("/recipes/:id", put(edit_recipe).delete(delete_recipe))
}

#[instrument(skip(state))]
pub async fn list_recipes(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<RecipeListResponse>, ApiError> {
    let filter = RecipeFilter::from_params(&params);
    let (rows, total) = repo::list(&state.db, &filter).await?;
    Ok(Json(RecipeListResponse {
        items: rows.into_iter().map(RecipeListItem::from).collect(),
        total_pages: RecipeFilter::total_pages(total, filter.limit),
        page: filter.page,
        limit: filter.limit,
    }))
}

#[instrument(skip(state))]
pub async fn get_recipe(
    State(state): State<AppState>,
    MaybeAuthUser(user_id): MaybeAuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<RecipeDetails>, ApiError> {
    let recipe = repo::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("recipe"))?;
    let nutrition = repo::find_nutrition(&state.db, id).await?;
    let liked = match user_id {
        Some(uid) => social::repo::has_liked(&state.db, id, uid).await?,
        None => false,
    };
    Ok(Json(RecipeDetails {
        recipe,
        nutrition,
        liked,
    }))
}

#[instrument(skip(state, payload))]
pub async fn create_recipe(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateRecipeRequest>,
) -> Result<(StatusCode, Json<Recipe>), ApiError> {
    let recipe = services::create_recipe(&state, user_id, payload).await?;
    Ok((StatusCode::CREATED, Json(recipe)))
}

#[instrument(skip(state, payload))]
pub async fn edit_recipe(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<EditRecipeRequest>,
) -> Result<Json<Recipe>, ApiError> {
    let recipe = services::edit_recipe(&state, id, user_id, payload).await?;
    Ok(Json(recipe))
}

#[instrument(skip(state))]
pub async fn delete_recipe(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    services::delete_recipe(&state, id, user_id).await?;
    Ok(Json(MessageResponse {
        message: "recipe deleted".into(),
    }))
}

#[instrument(skip(state))]
pub async fn list_saved(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<RecipeListItem>>, ApiError> {
    let rows = repo::list_saved(&state.db, user_id).await?;
    Ok(Json(rows.into_iter().map(RecipeListItem::from).collect()))
}
