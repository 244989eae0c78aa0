pub mod generator;
pub mod recipe_engine;

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use harvest_core::GenerationError;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

use crate::AppState;

/// Shared error response used by all endpoints
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Ingredient list accepted by every generation endpoint.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct IngredientsRequest {
    pub ingredients: Vec<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HealthResponse {
    pub message: String,
}

/// A failed request, rendered as `{"error": ...}` with a matching status.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<GenerationError> for ApiError {
    fn from(err: GenerationError) -> Self {
        let status = match &err {
            GenerationError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            GenerationError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GenerationError::AllProvidersExhausted { .. }
            | GenerationError::Provider(_)
            | GenerationError::MalformedResponse(_) => StatusCode::BAD_GATEWAY,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}

/// All routes, with `state` attached.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/api-docs/openapi.json", get(openapi_json))
        .merge(generator::router())
        .merge(recipe_engine::router())
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/",
    tag = "health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    )
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        message: "Harvest recipe engine is running".to_string(),
    })
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(openapi())
}

/// Generate the complete OpenAPI spec by merging all module specs
pub fn openapi() -> utoipa::openapi::OpenApi {
    #[derive(OpenApi)]
    #[openapi(
        info(title = "Harvest", description = "Recipe generation from leftover ingredients"),
        paths(health),
        components(schemas(ErrorResponse, IngredientsRequest, HealthResponse))
    )]
    struct BaseApi;

    let mut spec = BaseApi::openapi();

    let modules: Vec<utoipa::openapi::OpenApi> = vec![
        generator::ApiDoc::openapi(),
        recipe_engine::ApiDoc::openapi(),
    ];

    for module_spec in modules {
        spec.paths.paths.extend(module_spec.paths.paths);

        if let Some(module_components) = module_spec.components {
            if let Some(spec_components) = spec.components.as_mut() {
                spec_components.schemas.extend(module_components.schemas);
            }
        }
    }

    spec
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::{header, Request};
    use harvest_core::{
        CredentialPool, Enricher, FakeGenerationClient, FakeReply, FakeSearch, FallbackPipeline,
        RecipeEngine,
    };
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;

    fn app(client: FakeGenerationClient, search: FakeSearch) -> Router {
        let pool = CredentialPool::from_comma_separated("key-a,key-b").unwrap();
        let engine = RecipeEngine::new(
            FallbackPipeline::new(pool, client, Duration::from_secs(5)),
            Enricher::new(search, Duration::from_secs(5), 4),
        );
        router(Arc::new(engine))
    }

    fn replying(text: &str) -> FakeGenerationClient {
        FakeGenerationClient::new().with_default_reply(FakeReply::Text(text.to_string()))
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn generate_recipe_returns_coerced_recipe() {
        let app = app(replying("```json\n{\"title\":\"Toast\"}\n```"), FakeSearch::new());

        let (status, body) = send(
            app,
            post_json("/generate-recipe", json!({"ingredients": ["apple", "bread"]})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"], "Toast");
        assert_eq!(body["instructions"], "No instructions provided.");
        assert_eq!(body["ingredients_used"], "apple, bread");
    }

    #[tokio::test]
    async fn exhausted_keys_map_to_bad_gateway() {
        let client = FakeGenerationClient::new()
            .with_default_reply(FakeReply::Fail("HTTP 401: invalid key".to_string()));
        let app = app(client, FakeSearch::new());

        let (status, body) = send(
            app,
            post_json("/generate-recipe", json!({"ingredients": ["apple", "bread"]})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(
            body,
            json!({"error": "All API keys failed. Last error: HTTP 401: invalid key"})
        );
    }

    #[tokio::test]
    async fn blank_ingredients_are_a_bad_request() {
        let app = app(replying("{}"), FakeSearch::new());

        let (status, body) = send(
            app,
            post_json("/recipe-engine/auto-suggest", json!({"ingredients": ["  "]})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().starts_with("Invalid input"));
    }

    #[tokio::test]
    async fn malformed_body_is_a_bad_request_with_error_payload() {
        let app = app(replying("{}"), FakeSearch::new());

        let (status, body) = send(app, post_json("/generate-recipe", json!({"items": 1}))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn auto_suggest_wraps_results_with_status_code() {
        let app = app(
            replying(r#"{"recipes":[{"title":"Rice Bowl","co2_saved":"0.2 kg"}]}"#),
            FakeSearch::new(),
        );

        let (status, body) = send(
            app,
            post_json("/recipe-engine/auto-suggest", json!({"ingredients": ["rice"]})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status_code"], 200);
        assert_eq!(body["results"][0]["title"], "Rice Bowl");
        assert_eq!(body["results"][0]["eco_benefit"], "Eco-friendly choice");
    }

    #[tokio::test]
    async fn meal_links_returns_enriched_meals() {
        let search = FakeSearch::new().with_results(
            "Fried Rice",
            &[("Easy Fried Rice", "https://www.allrecipes.com/recipe/79543/fried-rice/")],
        );
        let app = app(replying(r#"["Fried Rice"]"#), search);

        let (status, body) = send(
            app,
            post_json("/recipe-engine/meal-links", json!({"ingredients": ["rice", "egg"]})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"results": [{
                "meal_name": "Easy Fried Rice",
                "recipe_link": "https://www.allrecipes.com/recipe/79543/fried-rice/"
            }]})
        );
    }

    #[tokio::test]
    async fn suggestions_take_the_food_from_the_path() {
        let client = replying(r#"["Pumpkin Soup","Pumpkin Pie","Pumpkin Bread"]"#);
        let app = app(client, FakeSearch::new());

        let (status, body) = send(
            app,
            Request::get("/suggestions/pumpkin").body(Body::empty()).unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"suggestions": ["Pumpkin Soup", "Pumpkin Pie", "Pumpkin Bread"]})
        );
    }

    #[tokio::test]
    async fn health_and_openapi_are_served() {
        let app = app(replying("{}"), FakeSearch::new());

        let (status, body) =
            send(app.clone(), Request::get("/").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["message"].is_string());

        let (status, body) = send(
            app,
            Request::get("/api-docs/openapi.json").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["paths"]["/generate-recipe"].is_object());
        assert!(body["paths"]["/suggestions/{food_name}"].is_object());
    }
}
