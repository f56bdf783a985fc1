//! # API REST
//!
//! REST API for the esoplan recommendation engine.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, CORS)
//!
//! All decision logic lives in `esoplan-core`; this crate only feeds
//! structured records into the engine and renders its output, plus the
//! static reference table the results page links to.

#![warn(rust_2018_idioms)]

pub mod references;

use axum::{
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

use esoplan_core::{PatientRecord, PlanError, RecommendationResult};
use references::{reference_groups, ReferenceGroup, TrialReference};

/// Health check response body.
#[derive(Serialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(health, recommend, references),
    components(schemas(
        HealthRes,
        PatientRecord,
        RecommendationResult,
        ReferenceGroup,
        TrialReference,
    ))
)]
struct ApiDoc;

/// Builds the application router with all routes, Swagger UI and CORS.
pub fn router() -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/recommend", post(recommend))
        .route("/references", get(references))
        .merge(
            SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()),
        )
        .layer(CorsLayer::permissive())
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for monitoring and load balancer probes.
#[axum::debug_handler]
async fn health() -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: "Esoplan REST API is alive".into(),
    })
}

#[utoipa::path(
    post,
    path = "/recommend",
    request_body = PatientRecord,
    responses(
        (status = 200, description = "Treatment-pathway recommendation", body = RecommendationResult),
        (status = 400, description = "A numeric field was supplied as non-numeric text")
    )
)]
/// Produces a treatment-pathway recommendation for a patient record.
///
/// The record is evaluated by the pure engine in `esoplan-core`. Partial
/// records are fine — missing or unknown values degrade to defaults — but
/// non-numeric text in a numeric field (age, tumour size, PD-L1 CPS) is a
/// user-input validation failure and returns `400` with the message to
/// re-prompt with.
///
/// # Errors
/// Returns `400 Bad Request` if a supplied numeric field cannot be parsed.
#[axum::debug_handler]
async fn recommend(
    Json(patient): Json<PatientRecord>,
) -> Result<Json<RecommendationResult>, (StatusCode, String)> {
    match esoplan_core::recommend(&patient) {
        Ok(result) => Ok(Json(result)),
        Err(err @ PlanError::InvalidInput(_)) => {
            tracing::warn!("rejected patient record: {err}");
            Err((StatusCode::BAD_REQUEST, err.to_string()))
        }
    }
}

#[utoipa::path(
    get,
    path = "/references",
    responses(
        (status = 200, description = "Grouped trial citations", body = [ReferenceGroup])
    )
)]
/// Returns the static grouped trial-citation table.
#[axum::debug_handler]
async fn references() -> Json<Vec<ReferenceGroup>> {
    Json(reference_groups())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn health_endpoint_responds_ok() {
        let response = router()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["ok"], true);
    }

    #[tokio::test]
    async fn recommend_returns_summary_and_details() {
        let response = router()
            .oneshot(post_json(
                "/recommend",
                serde_json::json!({
                    "stage": "T3N1M0",
                    "histology": "adenocarcinoma",
                    "tumour_location": "gej_siewert2"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert!(json["summary"]
            .as_str()
            .unwrap()
            .contains("Peri-operative chemotherapy (FLOT)"));
        assert!(!json["details"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn recommend_rejects_non_numeric_age() {
        let response = router()
            .oneshot(post_json(
                "/recommend",
                serde_json::json!({"age": "seventy"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn references_endpoint_returns_grouped_table() {
        let response = router()
            .oneshot(Request::get("/references").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json.as_array().unwrap().len(), 4);
        assert_eq!(json[3]["heading"], "Guidelines");
    }
}
