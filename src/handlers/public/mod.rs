// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Service info, health probe, and the envelopes for unmatched routes and
// methods.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

use crate::api::format::ServiceInfo;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET / - Service name, version and the catalogue routes
pub async fn root() -> ApiResult<ServiceInfo> {
    Ok(ApiResponse::success(ServiceInfo {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        endpoints: vec![
            "GET /games",
            "GET /games/:id",
            "GET /games/:id/characters",
            "POST /games/create",
            "PATCH /games/:id",
            "DELETE /games/:id",
            "GET /characters",
            "GET /characters/:id",
            "POST /characters/create",
            "DELETE /characters/:id",
        ],
    }))
}

/// GET /health - Liveness including a store round trip
pub async fn health(State(state): State<AppState>) -> Response {
    let now = chrono::Utc::now();

    match state.store.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "status": "ok",
                "database": "ok",
                "timestamp": now,
            })),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            let err = ApiError::service_unavailable(e.to_string());
            let mut body = err.to_json();
            body["status"] = json!("degraded");
            body["database"] = json!("unavailable");
            body["timestamp"] = json!(now);
            (err.status_code(), Json(body)).into_response()
        }
    }
}

/// Router fallback for unknown paths
pub async fn not_found() -> ApiError {
    ApiError::not_found("no route")
}

/// Method fallback for known paths
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
