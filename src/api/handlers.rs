//! HTTP API handlers.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use tracing::{debug, error, warn};

use crate::error::{BusinessError, ServiceError};
use crate::metrics;
use crate::service::{BetReceipt, BetValidationService, DecimalBet, PlaceBetRequest};

/// Application state shared with handlers.
#[derive(Clone)]
pub struct AppState {
    /// Bet validation service.
    pub service: Arc<BetValidationService>,
    /// Prometheus handle, when metrics are enabled.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create new app state without a metrics endpoint.
    pub fn new(service: BetValidationService) -> Self {
        Self {
            service: Arc::new(service),
            metrics: None,
        }
    }

    /// Serve `/metrics` from `handle`.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

/// Error body returned for every failed request.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Business error description, or "Internal Error".
    pub error: &'static str,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status: "ok".
    pub status: &'static str,
}

/// Maps service errors onto HTTP responses.
///
/// Business rejections are 418 with their description. Internal errors are
/// 500 with a fixed body; the detail only goes to the log.
#[derive(Debug)]
pub struct ApiError(pub ServiceError);

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        ApiError(e)
    }
}

impl From<BusinessError> for ApiError {
    fn from(kind: BusinessError) -> Self {
        ApiError(ServiceError::BusinessLogic(kind))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.0 {
            ServiceError::BusinessLogic(kind) => {
                warn!(code = kind.code(), error = kind.description(), "Request rejected");
                metrics::record_bet_rejected(kind);
                (
                    StatusCode::IM_A_TEAPOT,
                    Json(ErrorResponse {
                        error: kind.description(),
                    }),
                )
                    .into_response()
            }
            ServiceError::Internal(detail) => {
                error!(error = %detail, "Request failed");
                metrics::record_internal_error();
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        error: "Internal Error",
                    }),
                )
                    .into_response()
            }
        }
    }
}

/// Health check handler - always returns 200.
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}

/// Prometheus exposition, or 404 when metrics are disabled.
pub async fn metrics_text(State(state): State<AppState>, method: Method, uri: Uri) -> Response {
    match &state.metrics {
        Some(handle) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => not_found(method, uri).await.into_response(),
    }
}

/// List available bets with decimal odds.
pub async fn list_available(
    State(state): State<AppState>,
) -> Result<Json<Vec<DecimalBet>>, ApiError> {
    let bets = state.service.list_available().await?;
    Ok(Json(bets))
}

/// Validate and place a bet.
///
/// The body is decoded by hand so a missing content type or malformed JSON
/// answers 418 "Invalid Bet ID" like every other rejection.
pub async fn place_bet(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<BetReceipt>), ApiError> {
    if !is_json(&headers) {
        debug!("Bet body is not declared as JSON");
        return Err(BusinessError::InvalidBetId.into());
    }

    let request: PlaceBetRequest = serde_json::from_slice(&body).map_err(|e| {
        debug!(error = %e, "Unparseable bet body");
        ApiError::from(BusinessError::InvalidBetId)
    })?;

    let receipt = state.service.place_bet(&request).await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}

/// Unsupported method or unknown path.
pub async fn not_found(method: Method, uri: Uri) -> (StatusCode, String) {
    (
        StatusCode::NOT_FOUND,
        format!("Cannot {} {}\n", method, uri.path()),
    )
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(|essence| essence.trim().eq_ignore_ascii_case("application/json"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(content_type: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_str(content_type).unwrap());
        headers
    }

    #[test]
    fn json_content_type_detection() {
        assert!(is_json(&headers("application/json")));
        assert!(is_json(&headers("application/json; charset=utf-8")));
        assert!(is_json(&headers("Application/JSON")));
        assert!(!is_json(&headers("text/plain")));
        assert!(!is_json(&headers("application/jsonx")));
        assert!(!is_json(&HeaderMap::new()));
    }

    #[test]
    fn business_errors_are_teapots() {
        let response = ApiError::from(BusinessError::InvalidStake).into_response();
        assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
    }

    #[test]
    fn internal_errors_are_500() {
        let response = ApiError(ServiceError::internal("secret detail")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn not_found_names_method_and_path() {
        let (status, body) = not_found(Method::DELETE, Uri::from_static("/bets?x=1")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "Cannot DELETE /bets\n");
    }
}
