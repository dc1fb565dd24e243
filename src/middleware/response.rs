use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::ApiError;

/// Wrapper for API responses that adds the success envelope.
///
/// `T` must serialize to a JSON object; its keys are placed next to
/// `"success": true` rather than nested under a `data` key.
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub status_code: Option<StatusCode>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a successful API response with default 200 status
    pub fn success(data: T) -> Self {
        Self {
            data,
            status_code: None,
        }
    }

    /// Create an API response with custom status code
    pub fn with_status(data: T, status_code: StatusCode) -> Self {
        Self {
            data,
            status_code: Some(status_code),
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = self.status_code.unwrap_or(StatusCode::OK);

        let fields = match serde_json::to_value(&self.data) {
            Ok(Value::Object(fields)) => fields,
            Ok(other) => {
                tracing::error!("Response payload is not a JSON object: {}", other);
                return ApiError::internal_server_error("response payload is not an object")
                    .into_response();
            }
            Err(e) => {
                tracing::error!("Failed to serialize response data: {}", e);
                return ApiError::internal_server_error(e.to_string()).into_response();
            }
        };

        let mut envelope = Map::with_capacity(fields.len() + 1);
        envelope.insert("success".to_string(), Value::Bool(true));
        envelope.extend(fields);

        (status, Json(Value::Object(envelope))).into_response()
    }
}

pub type ApiResult<T> = Result<ApiResponse<T>, ApiError>;
