use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use harvest_core::GeneratedRecipe;
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

use crate::api::{ApiError, ErrorResponse, IngredientsRequest};
use crate::AppState;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SuggestionsResponse {
    pub suggestions: Vec<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/generate-recipe", post(generate_recipe))
        .route("/suggestions/{food_name}", get(suggestions))
}

/// Generate one recipe from leftover ingredients
///
/// Missing fields in the model output are filled with defaults, so a 200
/// response always has every field.
#[utoipa::path(
    post,
    path = "/generate-recipe",
    tag = "generator",
    request_body = IngredientsRequest,
    responses(
        (status = 200, description = "Generated recipe", body = GeneratedRecipe),
        (status = 400, description = "No usable ingredients", body = ErrorResponse),
        (status = 502, description = "Every API key failed", body = ErrorResponse)
    )
)]
pub async fn generate_recipe(
    State(engine): State<AppState>,
    payload: Result<Json<IngredientsRequest>, JsonRejection>,
) -> Result<Json<GeneratedRecipe>, ApiError> {
    let Json(request) = payload?;
    let recipe = engine.generate_recipe(&request.ingredients).await?;
    Ok(Json(recipe))
}

/// Suggest dish titles for one food
#[utoipa::path(
    get,
    path = "/suggestions/{food_name}",
    tag = "generator",
    params(
        ("food_name" = String, Path, description = "Food to build the dishes around")
    ),
    responses(
        (status = 200, description = "Dish titles", body = SuggestionsResponse),
        (status = 400, description = "Blank food name", body = ErrorResponse),
        (status = 502, description = "Every API key failed", body = ErrorResponse)
    )
)]
pub async fn suggestions(
    State(engine): State<AppState>,
    Path(food_name): Path<String>,
) -> Result<Json<SuggestionsResponse>, ApiError> {
    let suggestions = engine.suggestions(&food_name).await?;
    Ok(Json(SuggestionsResponse { suggestions }))
}

#[derive(OpenApi)]
#[openapi(
    paths(generate_recipe, suggestions),
    components(schemas(GeneratedRecipe, SuggestionsResponse))
)]
pub struct ApiDoc;
