use thiserror::Error;

use crate::core::{
    allergy::{allergy_verdict, indirect_allergy_warning},
    evaluator::evaluate_nutrients,
    explanation::{explain, Explanation, ExplanationContext},
    recommender::Recommender,
    rules::{resolve_rules, RuleSet},
};
use crate::models::{
    AnalyzeResponse, Catalog, IndirectWarning, NutrientEvaluation, RecommendationCandidate,
    UserProfile, Verdict,
};
use crate::services::{ProfileStore, StoreError, TextGenerator};

/// Failures that end an analysis request
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("사용자 정보를 찾을 수 없습니다.")]
    UserNotFound(String),

    #[error("'{0}' 제품을 찾을 수 없습니다.")]
    ProductNotFound(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Everything computed for one request
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub user: UserProfile,
    pub rules: RuleSet,
    pub verdict: Verdict,
    pub nutrition: Vec<NutrientEvaluation>,
    pub indirect_warning: Option<IndirectWarning>,
    pub explanation: Explanation,
    pub recommendations: Vec<RecommendationCandidate>,
}

impl AnalysisReport {
    pub fn into_response(self) -> AnalyzeResponse {
        AnalyzeResponse {
            ai_description: self.explanation.text().to_string(),
            nutrition_analysis: self.nutrition,
            indirect_allergy: self
                .indirect_warning
                .map(|w| w.to_string())
                .unwrap_or_default(),
            recommendations: self.recommendations,
        }
    }
}

/// Request pipeline for product analysis
///
/// # Pipeline Stages
/// 1. Load user profile and catalog
/// 2. Locate the queried product
/// 3. Resolve health rules, allergy verdict and nutrient evaluation
/// 4. Indirect allergy warning and best-effort explanation
/// 5. Similar-product recommendations
#[derive(Debug, Clone)]
pub struct Analyzer {
    recommender: Recommender,
    temperature: f32,
}

impl Analyzer {
    pub fn new(recommender: Recommender, temperature: f32) -> Self {
        Self {
            recommender,
            temperature,
        }
    }

    /// Run the full analysis for one user and product
    pub async fn analyze(
        &self,
        store: &dyn ProfileStore,
        generator: &dyn TextGenerator,
        user_id: &str,
        product_name: &str,
    ) -> Result<AnalysisReport, AnalysisError> {
        let user: UserProfile = store
            .fetch_user(user_id)
            .await?
            .map(UserProfile::from)
            .ok_or_else(|| AnalysisError::UserNotFound(user_id.to_string()))?;

        let rows = store.fetch_catalog().await?;
        let catalog = Catalog::from_rows(&rows);

        tracing::debug!(
            "Loaded {} products ({} tracked nutrient columns)",
            catalog.len(),
            catalog.nutrient_columns.len()
        );

        let target = catalog
            .find(product_name)
            .ok_or_else(|| AnalysisError::ProductNotFound(product_name.to_string()))?;

        let rules = resolve_rules(&user.health_conditions);
        let verdict = allergy_verdict(&user.allergies, target.allergens.as_deref());
        let nutrition = evaluate_nutrients(target, &catalog, &rules);
        let indirect_warning =
            indirect_allergy_warning(&user.allergies, target.indirect_allergens.as_deref());

        let warning_text = indirect_warning
            .as_ref()
            .map(|w| w.to_string())
            .unwrap_or_default();
        let context = ExplanationContext {
            product_name,
            allergies: &user.allergies,
            health_goals: &user.health_conditions,
            evaluations: &nutrition,
            verdict,
            warning: &warning_text,
        };
        let explanation = explain(generator, &context, self.temperature).await;

        let recommendations = self
            .recommender
            .recommend(&catalog, target, &user.allergies);

        Ok(AnalysisReport {
            user,
            rules,
            verdict,
            nutrition,
            indirect_warning,
            explanation,
            recommendations,
        })
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(Recommender::default(), 0.3)
    }
}
