mod api;
mod service;

use anyhow::Context;
use axum::extract::MatchedPath;
use axum::http::{header, HeaderValue, Method, Request};
use harvest_core::{AiConfig, DefaultEngine, SearchConfig};
use std::env;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::service::RecipeService;

/// Application state shared across all handlers
pub type AppState = Arc<dyn RecipeService>;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";

/// Browser origin of the web frontend.
const FRONTEND_ORIGIN: &str = "http://localhost:3000";

fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Check for --openapi flag to dump spec and exit
    if env::args().any(|arg| arg == "--openapi") {
        println!("{}", api::openapi().to_pretty_json()?);
        return Ok(());
    }

    dotenvy::dotenv().ok();
    init_tracing();

    let ai = AiConfig::from_env().context("Failed to load generation settings")?;
    let search = SearchConfig::from_env().context("Failed to load search settings")?;
    let engine = DefaultEngine::from_config(&ai, &search).context("Failed to build HTTP clients")?;

    tracing::info!(
        model = %ai.model,
        keys = ai.credentials.len(),
        search = %search.base_url,
        "Recipe engine ready"
    );

    let state: AppState = Arc::new(engine);

    let cors = CorsLayer::new()
        .allow_origin(HeaderValue::from_static(FRONTEND_ORIGIN))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    let app = api::router(state).layer(cors).layer(
        TraceLayer::new_for_http()
            .make_span_with(|request: &Request<_>| {
                let matched_path = request
                    .extensions()
                    .get::<MatchedPath>()
                    .map(MatchedPath::as_str)
                    .unwrap_or(request.uri().path());

                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    path = %matched_path,
                )
            })
            .on_request(|_request: &Request<_>, _span: &Span| {})
            .on_response(
                |response: &axum::http::Response<_>, latency: std::time::Duration, _span: &Span| {
                    let status = response.status().as_u16();
                    if status >= 500 {
                        tracing::error!(
                            status = %status,
                            latency_ms = %latency.as_millis(),
                            "request failed with server error"
                        );
                    } else {
                        tracing::info!(
                            status = %status,
                            latency_ms = %latency.as_millis(),
                            "request completed"
                        );
                    }
                },
            )
            .on_failure(
                |error: tower_http::classify::ServerErrorsFailureClass,
                 latency: std::time::Duration,
                 _span: &Span| {
                    tracing::error!(
                        error = %error,
                        latency_ms = %latency.as_millis(),
                        "request failed"
                    );
                },
            ),
    );

    let bind_addr = env::var("HARVEST_BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", bind_addr))?;

    tracing::info!("Server listening on {}", listener.local_addr()?);
    tracing::info!("OpenAPI spec available at /api-docs/openapi.json");

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
