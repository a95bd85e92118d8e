//! HTTP request handlers

use crate::api::models::{
    AspectRatiosResponse, GenerationRecord, GenerationRequest, HealthResponse, ImageModelInfo,
    LibraryQuery, LibraryResponse, ModelsResponse, ServiceInfo, StylesResponse,
};
use crate::error::{AppError, ErrorBody};
use crate::middleware::client_key;
use crate::storage::LibraryFilter;
use crate::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::HeaderMap,
    Json,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const SERVICE_BANNER: &str = "Pixilator Image Generation API";
pub const DATABASE_NOT_CONFIGURED: &str = "Database not configured";
pub const DATABASE_NOT_READY: &str = "Database not ready - no images available yet";
pub const INVALID_LIBRARY_QUERY: &str = "Invalid library query";

/// Generate an image from a prompt
#[utoipa::path(
    post,
    path = "/generate",
    tag = "Images",
    request_body = GenerationRequest,
    responses(
        (status = 200, description = "Image generated", body = GenerationRecord),
        (status = 400, description = "Missing or empty prompt", body = ErrorBody),
        (status = 429, description = "Rate limit exceeded", body = ErrorBody),
        (status = 500, description = "Generation failed", body = ErrorBody),
    )
)]
pub async fn generate(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Result<Json<GenerationRequest>, JsonRejection>,
) -> Result<Json<GenerationRecord>, AppError> {
    let Json(request) = body.map_err(|rejection| {
        debug!(error = %rejection.body_text(), "Rejected malformed generation request");
        AppError::Validation(rejection.body_text())
    })?;

    let client = client_key(&headers);
    let record = state.orchestrator.handle(&client, request).await?;
    Ok(Json(record))
}

/// Service banner
#[utoipa::path(
    get,
    path = "/generate",
    tag = "Images",
    responses((status = 200, description = "Service banner", body = ServiceInfo))
)]
pub async fn service_info() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        message: SERVICE_BANNER.to_string(),
    })
}

/// List public generations, newest first
#[utoipa::path(
    get,
    path = "/library",
    tag = "Library",
    params(LibraryQuery),
    responses((status = 200, description = "Library page, possibly empty with an error note", body = LibraryResponse))
)]
pub async fn library(
    State(state): State<Arc<AppState>>,
    query: Result<Query<LibraryQuery>, QueryRejection>,
) -> Json<LibraryResponse> {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => {
            debug!(error = %rejection.body_text(), "Rejected malformed library query");
            return Json(LibraryResponse::unavailable(INVALID_LIBRARY_QUERY));
        }
    };

    let records = &state.stores.records;
    if !records.is_configured() {
        return Json(LibraryResponse::unavailable(DATABASE_NOT_CONFIGURED));
    }

    let paging = &state.settings.library;
    let limit = query
        .limit
        .unwrap_or(paging.default_limit)
        .clamp(1, paging.max_limit.max(1));
    let offset = query.offset.unwrap_or(0);

    let mut filter = LibraryFilter::public(offset, limit);
    filter.style = query.style.filter(|s| !s.is_empty());
    filter.model_version = query.model_version.filter(|m| !m.is_empty());

    match records.query(&filter).await {
        Ok(rows) => {
            let total = rows.len();
            info!(total, offset, limit, "Library page served");
            Json(LibraryResponse {
                total,
                has_more: total == limit,
                images: rows.into_iter().map(GenerationRecord::from).collect(),
                error: None,
            })
        }
        Err(e) => {
            warn!(store = %records.name(), error = %e, "Library query failed");
            Json(LibraryResponse::unavailable(DATABASE_NOT_READY))
        }
    }
}

/// List style presets
#[utoipa::path(
    get,
    path = "/styles",
    tag = "Presets",
    responses((status = 200, description = "Style presets", body = StylesResponse))
)]
pub async fn list_styles(State(state): State<Arc<AppState>>) -> Json<StylesResponse> {
    Json(StylesResponse {
        styles: state.catalog.styles().to_vec(),
    })
}

/// List aspect ratios
#[utoipa::path(
    get,
    path = "/aspect-ratios",
    tag = "Presets",
    responses((status = 200, description = "Aspect ratios", body = AspectRatiosResponse))
)]
pub async fn list_aspect_ratios(State(state): State<Arc<AppState>>) -> Json<AspectRatiosResponse> {
    Json(AspectRatiosResponse {
        aspect_ratios: state.catalog.aspect_ratios().to_vec(),
    })
}

/// List selectable image models
#[utoipa::path(
    get,
    path = "/models",
    tag = "Presets",
    responses((status = 200, description = "Image models", body = ModelsResponse))
)]
pub async fn list_models(State(state): State<Arc<AppState>>) -> Json<ModelsResponse> {
    let models = state
        .settings
        .inference
        .image_models
        .iter()
        .map(|m| ImageModelInfo {
            id: m.id.clone(),
            name: m.name.clone(),
        })
        .collect();

    Json(ModelsResponse {
        models,
        default_model: state.orchestrator.default_model().to_string(),
    })
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        storage: state.stores.kind.to_string(),
    })
}
