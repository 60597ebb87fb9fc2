use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// Request-level failure taxonomy.
///
/// `InvalidInput` is raised before any I/O happens; the upstream variants
/// carry the collaborator's own message as diagnostic detail. A failure of
/// either upstream aborts the whole request, there is no partial response.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("No route found.")]
    NoRouteFound,
    #[error("Internal Server Error")]
    Upstream(String),
    #[error("Upstream request timed out")]
    UpstreamTimeout(String),
}

impl ApiError {
    /// Classifies a transport failure from either collaborator.
    pub fn from_upstream(context: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::UpstreamTimeout(format!("{context}: {err}"))
        } else {
            ApiError::Upstream(format!("{context}: {err}"))
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, details) = match &self {
            ApiError::InvalidInput(_) | ApiError::NoRouteFound => (StatusCode::BAD_REQUEST, None),
            ApiError::Upstream(detail) => {
                tracing::error!(%detail, "upstream failure");
                (StatusCode::BAD_GATEWAY, Some(detail.clone()))
            }
            ApiError::UpstreamTimeout(detail) => {
                tracing::error!(%detail, "upstream timeout");
                (StatusCode::GATEWAY_TIMEOUT, Some(detail.clone()))
            }
        };
        let body = ErrorResponse {
            error: self.to_string(),
            details,
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_input_maps_to_400() {
        let response = ApiError::InvalidInput("bad".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn no_route_maps_to_400() {
        let response = ApiError::NoRouteFound.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn upstream_failures_map_to_gateway_statuses() {
        assert_eq!(
            ApiError::Upstream("store down".into()).into_response().status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ApiError::UpstreamTimeout("slow".into()).into_response().status(),
            StatusCode::GATEWAY_TIMEOUT
        );
    }

    #[test]
    fn details_are_omitted_for_client_errors() {
        let body = ErrorResponse {
            error: "No route found.".into(),
            details: None,
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(!json.contains("details"));
    }
}
