use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::core::{AnalysisError, Analyzer};
use crate::models::{AnalyzeRequest, ErrorResponse, HealthResponse};
use crate::services::{ProfileStore, TextGenerator};
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ProfileStore>,
    pub generator: Arc<dyn TextGenerator>,
    pub analyzer: Analyzer,
}

/// Configure analysis routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/analyze", web::post().to(analyze));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let store_healthy = match state.store.health_check().await {
        Ok(healthy) => healthy,
        Err(e) => {
            tracing::warn!("Store health check failed: {}", e);
            false
        }
    };

    let status = if store_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Analyze endpoint
///
/// POST /analyze
///
/// Request body:
/// ```json
/// {
///   "user_id": "string",
///   "product_name": "string"
/// }
/// ```
async fn analyze(
    state: web::Data<AppState>,
    req: web::Json<AnalyzeRequest>,
) -> Result<HttpResponse, AnalysisError> {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for analyze request: {:?}", errors);
        return Ok(HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        }));
    }

    tracing::info!("Analyzing '{}' for user {}", req.product_name, req.user_id);

    let report = state
        .analyzer
        .analyze(
            state.store.as_ref(),
            state.generator.as_ref(),
            &req.user_id,
            &req.product_name,
        )
        .await
        .map_err(|e| {
            match &e {
                AnalysisError::Store(inner) => tracing::error!("Store failure during analysis: {}", inner),
                other => tracing::info!("Analysis rejected: {}", other),
            }
            e
        })?;

    tracing::info!(
        "Returning {} evaluations and {} recommendations for user {} (verdict {}, fallback {})",
        report.nutrition.len(),
        report.recommendations.len(),
        req.user_id,
        report.verdict,
        report.explanation.is_fallback()
    );

    Ok(HttpResponse::Ok().json(report.into_response()))
}
