use crate::config::Config;
use crate::errors::AppError;
use crate::export_service::ExportService;
use crate::models::*;
use crate::search_service::SearchService;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// Search pipeline over the dataset.
    pub search_service: SearchService,
    /// Record export encoder.
    pub export_service: ExportService,
}

/// Health check endpoint.
///
/// Returns the service status and version. Does not touch the dataset.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "fiscal-search-api",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// POST /search
///
/// Filters the dataset with the fields of the search form.
///
/// # Returns
///
/// * `Result<Json<SearchResponse>, AppError>` - Matching records and their count, or:
///   - 400 when `Quantity` is below 1 or a filter names an unknown column.
///   - 500 when the dataset is missing or unreadable.
pub async fn search_records(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, AppError> {
    tracing::info!(
        "POST /search - fields: {:?}, contribuinte: {:?}, quantity: {:?}",
        request.fields.keys().collect::<Vec<_>>(),
        request.contribuinte,
        request.quantity
    );

    if let Some(quantity) = request.quantity {
        if quantity < 1 {
            return Err(AppError::BadRequest(
                "Quantity must be greater than 0".to_string(),
            ));
        }
    }

    // Every search re-reads the whole file
    let search_service = state.search_service.clone();
    let results = tokio::task::spawn_blocking(move || search_service.search_records(&request))
        .await
        .map_err(|e| AppError::InternalError(format!("Search task failed: {}", e)))??;

    tracing::info!("Search returned {} record(s)", results.len());

    Ok(Json(SearchResponse {
        count: results.len(),
        results,
    }))
}

/// POST /export
///
/// Encodes the given records as a CSV or XLSX attachment.
pub async fn export_records(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ExportRequest>,
) -> Result<Response, AppError> {
    tracing::info!(
        "POST /export - {} record(s) as {}",
        request.data.len(),
        request.format
    );

    let exported = state.export_service.export_records(&request)?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, exported.media_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", exported.filename),
            ),
        ],
        exported.content,
    )
        .into_response())
}

/// GET /schema
///
/// Lists the fields the search form can send and their types.
pub async fn get_schema() -> Json<SchemaResponse> {
    Json(SchemaResponse::default())
}
