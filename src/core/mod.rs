// Core algorithm exports
pub mod allergy;
pub mod analyzer;
pub mod evaluator;
pub mod explanation;
pub mod parsing;
pub mod recommender;
pub mod rules;
pub mod similarity;

pub use allergy::{allergy_verdict, has_allergen_conflict, indirect_allergy_warning};
pub use analyzer::{AnalysisError, AnalysisReport, Analyzer};
pub use evaluator::{classify, evaluate_nutrients, population_average};
pub use explanation::{compose_prompt, explain, Explanation, ExplanationContext, FALLBACK_DESCRIPTION};
pub use parsing::{parse_quantity, split_list, strip_and_parse};
pub use recommender::Recommender;
pub use rules::{resolve_rules, RuleSet, DEFAULT_RULE};
pub use similarity::{cosine_similarity, median, per_100};
