use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use harvest_core::{EcoRecipe, EnrichedMeal};
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

use crate::api::{ApiError, ErrorResponse, IngredientsRequest};
use crate::AppState;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AutoSuggestResponse {
    pub status_code: u16,
    pub results: Vec<EcoRecipe>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MealLinksResponse {
    pub results: Vec<EnrichedMeal>,
}

/// Returns the router for the /recipe-engine endpoints
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/recipe-engine/auto-suggest", post(auto_suggest))
        .route("/recipe-engine/meal-links", post(meal_links))
}

/// Suggest three low-waste recipes
#[utoipa::path(
    post,
    path = "/recipe-engine/auto-suggest",
    tag = "recipe-engine",
    request_body = IngredientsRequest,
    responses(
        (status = 200, description = "Eco-friendly recipes", body = AutoSuggestResponse),
        (status = 400, description = "No usable ingredients", body = ErrorResponse),
        (status = 502, description = "Every API key failed", body = ErrorResponse)
    )
)]
pub async fn auto_suggest(
    State(engine): State<AppState>,
    payload: Result<Json<IngredientsRequest>, JsonRejection>,
) -> Result<Json<AutoSuggestResponse>, ApiError> {
    let Json(request) = payload?;
    let results = engine.auto_suggest(&request.ingredients).await?;
    Ok(Json(AutoSuggestResponse {
        status_code: 200,
        results,
    }))
}

/// Suggest meals and link each one to a recipe page
///
/// Meals without a search match link to a web search instead.
#[utoipa::path(
    post,
    path = "/recipe-engine/meal-links",
    tag = "recipe-engine",
    request_body = IngredientsRequest,
    responses(
        (status = 200, description = "Meals with recipe links", body = MealLinksResponse),
        (status = 400, description = "No usable ingredients", body = ErrorResponse),
        (status = 502, description = "Every API key failed", body = ErrorResponse)
    )
)]
pub async fn meal_links(
    State(engine): State<AppState>,
    payload: Result<Json<IngredientsRequest>, JsonRejection>,
) -> Result<Json<MealLinksResponse>, ApiError> {
    let Json(request) = payload?;
    let results = engine.meal_links(&request.ingredients).await?;
    Ok(Json(MealLinksResponse { results }))
}

#[derive(OpenApi)]
#[openapi(
    paths(auto_suggest, meal_links),
    components(schemas(EcoRecipe, EnrichedMeal, AutoSuggestResponse, MealLinksResponse))
)]
pub struct ApiDoc;
