use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to analyze a product for a user
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AnalyzeRequest {
    #[validate(length(min = 1))]
    pub user_id: String,
    #[validate(length(min = 1))]
    pub product_name: String,
}
