//! HTTP adapter: JSON prediction API.
//!
//! Routes:
//! - `GET /`: liveness message
//! - `POST /predict`: score one feature record
//!
//! Wire keys are the ones the operator form already consumes
//! (`resultado`, `probabilidad`, `mensaje`, `error`).

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_http::cors::CorsLayer;

use crate::application::InferenceService;
use crate::domain::PredictionResult;

pub const HEALTH_MESSAGE: &str = "API de predicción de diabetes funcionando correctamente";

/// Successful prediction body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    /// Predicted class, 0 or 1
    #[serde(rename = "resultado")]
    pub result: u8,
    /// Positive-class probability rounded to two decimals
    #[serde(rename = "probabilidad")]
    pub probability: f64,
    #[serde(rename = "mensaje")]
    pub message: String,
}

impl From<PredictionResult> for PredictionResponse {
    fn from(result: PredictionResult) -> Self {
        Self {
            result: result.class.label(),
            probability: result.rounded_probability(),
            message: result.message().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    #[serde(rename = "mensaje")]
    pub message: String,
}

/// Request-level failure, always reported as 400 with `{"error": ...}`.
#[derive(Debug)]
pub struct ApiError(String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, Json(ErrorResponse { error: self.0 })).into_response()
    }
}

/// Build the router around a loaded inference service.
pub fn router(service: Arc<InferenceService>) -> Router {
    Router::new()
        .route("/", get(health_handler))
        .route("/predict", post(predict_handler))
        .layer(CorsLayer::permissive())
        .with_state(service)
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        message: HEALTH_MESSAGE.to_string(),
    })
}

async fn predict_handler(
    State(service): State<Arc<InferenceService>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<PredictionResponse>, ApiError> {
    let Json(body) = body.map_err(|rejection| {
        tracing::warn!("Rejected prediction request: {}", rejection.status());
        ApiError(rejection.body_text())
    })?;

    let result = service
        .predict_json(&body)
        .map_err(|e| ApiError(e.to_string()))?;
    Ok(Json(result.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::trained_service;
    use axum::body::Body;
    use axum::http::{header, Request};
    use tower::ServiceExt;

    fn app() -> Router {
        router(Arc::new(trained_service()))
    }

    async fn json_body(resp: Response) -> Value {
        let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn predict_request(body: impl Into<Body>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/predict")
            .header(header::CONTENT_TYPE, "application/json")
            .body(body.into())
            .unwrap()
    }

    const SCENARIO: &str = r#"{"Pregnancies": 2, "Glucose": 120, "BloodPressure": 70,
        "SkinThickness": 20, "Insulin": 80, "BMI": 25.5,
        "DiabetesPedigreeFunction": 0.5, "Age": 35}"#;

    #[tokio::test]
    async fn test_health() {
        let req = Request::builder().uri("/").body(Body::empty()).unwrap();
        let resp = app().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let json = json_body(resp).await;
        assert_eq!(json["mensaje"], HEALTH_MESSAGE);
    }

    #[tokio::test]
    async fn test_predict_scenario() {
        let resp = app().oneshot(predict_request(SCENARIO)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let json = json_body(resp).await;
        let result = json["resultado"].as_u64().unwrap();
        let probability = json["probabilidad"].as_f64().unwrap();
        assert!(result <= 1);
        assert!((0.0..=1.0).contains(&probability));
        assert_eq!((probability * 100.0).round() / 100.0, probability);

        let expected = if result == 1 {
            "Riesgo de diabetes detectado"
        } else {
            "Sin riesgo aparente"
        };
        assert_eq!(json["mensaje"], expected);
    }

    #[tokio::test]
    async fn test_predict_reference_patient() {
        let body = r#"{"Pregnancies": 6, "Glucose": 148, "BloodPressure": 72,
            "SkinThickness": 35, "Insulin": 0, "BMI": 33.6,
            "DiabetesPedigreeFunction": 0.627, "Age": 50}"#;
        let resp = app().oneshot(predict_request(body)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let json = json_body(resp).await;
        assert_eq!(json.as_object().unwrap().len(), 3);
        assert_eq!(json["resultado"], 1);
        assert_eq!(json["probabilidad"].as_f64().unwrap(), 0.77);
        assert_eq!(json["mensaje"], "Riesgo de diabetes detectado");
    }

    #[tokio::test]
    async fn test_missing_field_then_recovery() {
        let app = app();
        let body = r#"{"Pregnancies": 2, "BloodPressure": 70, "SkinThickness": 20,
            "Insulin": 80, "BMI": 25.5, "DiabetesPedigreeFunction": 0.5, "Age": 35}"#;

        let resp = app.clone().oneshot(predict_request(body)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = json_body(resp).await;
        assert!(json["error"].as_str().unwrap().contains("Glucose"));

        let resp = app.oneshot(predict_request(SCENARIO)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let resp = app().oneshot(predict_request("{not json")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(json_body(resp).await["error"].is_string());
    }

    #[tokio::test]
    async fn test_non_numeric_field_is_bad_request() {
        let body = SCENARIO.replace("\"Glucose\": 120", "\"Glucose\": \"high\"");
        let resp = app().oneshot(predict_request(body)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_cors_headers_present() {
        let req = Request::builder()
            .method("POST")
            .uri("/predict")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ORIGIN, "http://localhost:8080")
            .body(Body::from(SCENARIO))
            .unwrap();
        let resp = app().oneshot(req).await.unwrap();
        assert!(resp
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    }
}
