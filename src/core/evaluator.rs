use crate::core::{rules::RuleSet, similarity::per_100};
use crate::models::{Catalog, NutrientAssessment, NutrientEvaluation, Product};

/// Ratio above which a nutrient is considered higher than average
const ABOVE_AVERAGE_RATIO: f64 = 1.1;
/// Ratio below which a nutrient is considered lower than average
const BELOW_AVERAGE_RATIO: f64 = 0.9;

/// Evaluate every nutrient named by the rule set, in rule order
///
/// The target is compared per 100 units against the catalog average, so
/// products with different serving sizes stay comparable.
pub fn evaluate_nutrients(
    target: &Product,
    catalog: &Catalog,
    rules: &RuleSet,
) -> Vec<NutrientEvaluation> {
    rules
        .nutrients()
        .map(|nutrient| NutrientEvaluation {
            nutrient: nutrient.to_string(),
            evaluation: evaluate_nutrient(target, catalog, nutrient),
        })
        .collect()
}

/// Classify one nutrient of the target product
pub fn evaluate_nutrient(target: &Product, catalog: &Catalog, nutrient: &str) -> NutrientAssessment {
    let raw = target.nutrient(nutrient);
    let target_per_100 = raw
        .zip(target.serving_size)
        .and_then(|(value, serving)| per_100(value, serving));
    let average = population_average(catalog, nutrient);

    classify(raw, target_per_100, average)
}

/// Average per-100 value over catalog rows with a serving size
///
/// Rows whose nutrient is missing, or whose serving size is zero, are
/// skipped rather than counted as zero.
pub fn population_average(catalog: &Catalog, nutrient: &str) -> Option<f64> {
    let values: Vec<f64> = catalog
        .products
        .iter()
        .filter_map(|product| {
            let serving = product.serving_size?;
            per_100(product.nutrient(nutrient)?, serving)
        })
        .collect();

    if values.is_empty() {
        return None;
    }

    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Classification policy for a single nutrient
///
/// A zero raw or per-100 value means the nutrient is not present, regardless
/// of the average.
#[inline]
pub fn classify(raw: Option<f64>, per_100: Option<f64>, average: Option<f64>) -> NutrientAssessment {
    if raw == Some(0.0) || per_100 == Some(0.0) {
        return NutrientAssessment::NotPresent;
    }

    let (Some(_), Some(value), Some(average)) = (raw, per_100, average) else {
        return NutrientAssessment::InsufficientData;
    };

    if average == 0.0 {
        return NutrientAssessment::InsufficientData;
    }

    let ratio = value / average;
    if ratio > ABOVE_AVERAGE_RATIO {
        NutrientAssessment::AboveAverage
    } else if ratio < BELOW_AVERAGE_RATIO {
        NutrientAssessment::BelowAverage
    } else {
        NutrientAssessment::NearAverage
    }
}
