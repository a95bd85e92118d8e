//! HTTP route definitions

use crate::api::handlers;
use crate::api::models::*;
use crate::config::{AspectRatio, StorageBackendKind, StylePreset};
use crate::error::ErrorBody;
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Pixilator Gateway API",
        version = "1.0.0",
        description = "Text-to-image generation with prompt refinement, style presets and a public library.",
        license(name = "MIT"),
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        handlers::generate,
        handlers::service_info,
        handlers::library,
        handlers::list_styles,
        handlers::list_aspect_ratios,
        handlers::list_models,
        handlers::health_check,
    ),
    components(schemas(
        GenerationRequest,
        GenerationRecord,
        LibraryResponse,
        StylesResponse,
        StylePreset,
        AspectRatiosResponse,
        AspectRatio,
        ModelsResponse,
        ImageModelInfo,
        ServiceInfo,
        HealthResponse,
        ErrorBody,
    )),
    tags(
        (name = "Images", description = "Image generation endpoints"),
        (name = "Library", description = "Public generation library"),
        (name = "Presets", description = "Styles, aspect ratios and models"),
        (name = "Health", description = "Health and monitoring endpoints"),
    )
)]
pub struct ApiDoc;

/// Create the main application router
pub fn create_router(state: Arc<crate::AppState>) -> Router {
    let router = Router::new()
        // Health check endpoint
        .route("/health", get(handlers::health_check))
        // Image generation
        .route("/generate", get(handlers::service_info).post(handlers::generate))
        // Public library
        .route("/library", get(handlers::library))
        // Presets
        .route("/styles", get(handlers::list_styles))
        .route("/aspect-ratios", get(handlers::list_aspect_ratios))
        .route("/models", get(handlers::list_models))
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // Uploaded images are served from disk when storing locally
    let router = if state.stores.kind == StorageBackendKind::Local {
        router.nest_service(
            "/images",
            ServeDir::new(&state.settings.storage.local.base_path),
        )
    } else {
        router
    };

    router
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
