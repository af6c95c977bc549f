//! HTTP routes for the dashboard

use crate::dashboard::{page, user_message, Dashboard};
use crate::error::FurnaceError;
use crate::types::features::{OperatorInputs, FEATURE_SCHEMA};
use axum::{
    extract::State,
    http::{Method, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(ErrorBody { error: message })).into_response()
}

/// Build the dashboard router
pub fn router(dashboard: Arc<Dashboard>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/schema", get(schema))
        .route("/api/predict", post(predict))
        .route("/api/importances", get(importances))
        .route("/api/metrics", get(metrics))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(dashboard)
}

async fn index() -> Html<String> {
    Html(page::render_index())
}

async fn health() -> &'static str {
    "ok"
}

async fn schema() -> impl IntoResponse {
    Json(FEATURE_SCHEMA)
}

async fn predict(
    State(dashboard): State<Arc<Dashboard>>,
    Json(inputs): Json<OperatorInputs>,
) -> Response {
    match dashboard.evaluate(&inputs) {
        Ok(view) => Json(view).into_response(),
        Err(e @ FurnaceError::InvalidInput { .. }) => {
            error_response(StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
        }
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, user_message(&e)),
    }
}

async fn importances(State(dashboard): State<Arc<Dashboard>>) -> Response {
    match dashboard.importances() {
        Ok(ranking) => Json(ranking).into_response(),
        Err(e) => error_response(StatusCode::NOT_FOUND, e.to_string()),
    }
}

async fn metrics(State(dashboard): State<Arc<Dashboard>>) -> impl IntoResponse {
    Json(dashboard.metrics().snapshot())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::Artifacts;
    use crate::error::Result;
    use crate::models::inference::tests::{stub_artifacts, IdentityScaler};
    use crate::models::inference::PredictionEngine;
    use crate::models::traits::Regressor;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;

    /// Regressor failing on high Fe content, succeeding otherwise
    struct PickyModel;

    impl Regressor for PickyModel {
        fn predict(&self, features: &[f32]) -> Result<f64> {
            if features[0] > 65.0 {
                return Err(FurnaceError::prediction("input rejected by model"));
            }
            Ok(1510.0)
        }

        fn name(&self) -> &str {
            "picky"
        }
    }

    fn app(artifacts: Artifacts) -> Router {
        router(Arc::new(Dashboard::new(PredictionEngine::new(artifacts))))
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_predict_default_sliders() {
        let app = app(stub_artifacts(1480.0, None));
        let (status, body) = send(&app, post_json("/api/predict", "{}")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["predicted_temperature"], 1480.0);
        assert_eq!(body["efficiency_score"], 99.0);
        assert_eq!(body["efficiency_progress"], 99);
        assert_eq!(body["risk_level"], "stable");
        assert_eq!(body["importances"], Value::Null);
        assert_eq!(
            body["importance_message"],
            "Feature importance not available for this model type."
        );
    }

    #[tokio::test]
    async fn test_predict_with_importances() {
        let weights = vec![0.1, 0.2, 0.05, 0.3, 0.01, 0.02, 0.08, 0.09, 0.11, 0.04];
        let app = app(stub_artifacts(1440.0, Some(weights)));
        let (status, body) = send(&app, post_json("/api/predict", r#"{"Coke_rate": 500.0}"#)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["risk_level"], "warning");
        assert_eq!(body["inputs"]["Coke_rate"], 500.0);
        let ranking = body["importances"].as_array().unwrap();
        assert_eq!(ranking.len(), 10);
        assert_eq!(ranking[0]["feature"], "Hot_blast_temp");

        let (status, body) = send(&app, get_req("/api/importances")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["feature"], "Hot_blast_temp");
        assert_eq!(body[9]["feature"], "Blast_pressure");
    }

    #[tokio::test]
    async fn test_predict_out_of_range_is_422() {
        let app = app(stub_artifacts(1480.0, None));
        let (status, body) = send(&app, post_json("/api/predict", r#"{"moisture_percent": 9.5}"#)).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"].as_str().unwrap().contains("Moisture_percent"));
    }

    #[tokio::test]
    async fn test_prediction_error_keeps_serving() {
        let app = app(Artifacts {
            model: Arc::new(PickyModel),
            scaler: Arc::new(IdentityScaler),
        });

        let (status, body) = send(&app, post_json("/api/predict", r#"{"fe_percent": 67.0}"#)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Prediction Error: input rejected by model");

        let (status, body) = send(&app, post_json("/api/predict", r#"{"fe_percent": 60.0}"#)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["risk_level"], "warning");

        let (_, metrics) = send(&app, get_req("/api/metrics")).await;
        assert_eq!(metrics["evaluations"], 1);
        assert_eq!(metrics["prediction_errors"], 1);
    }

    #[tokio::test]
    async fn test_importances_unavailable_is_404() {
        let app = app(stub_artifacts(1480.0, None));
        let (status, body) = send(&app, get_req("/api/importances")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            body["error"],
            "Feature importance not available for this model type."
        );
    }

    #[tokio::test]
    async fn test_schema_and_index() {
        let app = app(stub_artifacts(1480.0, None));

        let (status, body) = send(&app, get_req("/api/schema")).await;
        assert_eq!(status, StatusCode::OK);
        let fields = body.as_array().unwrap();
        assert_eq!(fields.len(), 10);
        assert_eq!(fields[0]["name"], "Fe_percent");
        assert_eq!(fields[9]["name"], "CO2_percent");
        assert_eq!(fields[3]["max"], 1200.0);

        let response = app.clone().oneshot(get_req("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("Blast Furnace Digital Twin"));

        let response = app.clone().oneshot(get_req("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
