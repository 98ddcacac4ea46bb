use serde::{Deserialize, Serialize};
use crate::models::domain::{NutrientEvaluation, RecommendationCandidate};

/// Response for the analyze endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub ai_description: String,
    pub nutrition_analysis: Vec<NutrientEvaluation>,
    pub indirect_allergy: String,
    pub recommendations: Vec<RecommendationCandidate>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
