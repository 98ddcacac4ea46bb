use crate::models::{NutrientEvaluation, Verdict};
use crate::services::TextGenerator;

/// Description returned when text generation fails
pub const FALLBACK_DESCRIPTION: &str = "(AI 설명 생성 실패)";

/// Inputs embedded in the explanation prompt
#[derive(Debug, Clone)]
pub struct ExplanationContext<'a> {
    pub product_name: &'a str,
    pub allergies: &'a [String],
    pub health_goals: &'a [String],
    pub evaluations: &'a [NutrientEvaluation],
    pub verdict: Verdict,
    pub warning: &'a str,
}

/// Outcome of explanation generation
#[derive(Debug, Clone, PartialEq)]
pub enum Explanation {
    Generated(String),
    Fallback { cause: String },
}

impl Explanation {
    /// Text shown to the user
    pub fn text(&self) -> &str {
        match self {
            Explanation::Generated(text) => text,
            Explanation::Fallback { .. } => FALLBACK_DESCRIPTION,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Explanation::Fallback { .. })
    }
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "없음".to_string()
    } else {
        items.join(", ")
    }
}

/// Build the fixed-template prompt
pub fn compose_prompt(context: &ExplanationContext<'_>) -> String {
    let summary = context
        .evaluations
        .iter()
        .map(|e| format!("{}({})", e.nutrient, e.evaluation))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "제품명: {}\n사용자 알레르기: {}\n건강목표: {}\n성분 평가 요약: {}\n최종 판정: {}\n경고 문구: {}\n",
        context.product_name,
        join_or_none(context.allergies),
        join_or_none(context.health_goals),
        summary,
        context.verdict,
        context.warning,
    )
}

/// Generate a rationale, substituting the fallback on any failure
pub async fn explain(
    generator: &dyn TextGenerator,
    context: &ExplanationContext<'_>,
    temperature: f32,
) -> Explanation {
    let prompt = compose_prompt(context);

    match generator.generate(&prompt, temperature).await {
        Ok(text) => Explanation::Generated(text.trim().to_string()),
        Err(e) => {
            tracing::error!(
                "Explanation generation failed for {}: {}",
                context.product_name,
                e
            );
            Explanation::Fallback {
                cause: e.to_string(),
            }
        }
    }
}
