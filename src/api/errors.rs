use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use crate::errors::ExemptorError;

impl IntoResponse for ExemptorError {
    fn into_response(self) -> axum::response::Response {
        let status = if self.is_configuration() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        let body = json!({"error": self.to_string(), "type": self.classify().error_type});
        (status, Json(body)).into_response()
    }
}
