// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    normalize_column_name, Catalog, CatalogRow, CellValue, Direction, IndirectWarning,
    NutrientAssessment, NutrientEvaluation, Product, RecommendationCandidate, UserProfile,
    UserRecord, Verdict, TRACKED_NUTRIENTS,
};
pub use requests::AnalyzeRequest;
pub use responses::{AnalyzeResponse, ErrorResponse, HealthResponse};
