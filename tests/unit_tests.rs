// Unit tests for Ramen Fit

use ramen_fit::core::{
    allergy::{allergy_verdict, indirect_allergy_warning},
    evaluator::{classify, evaluate_nutrient},
    explanation::{explain, ExplanationContext, FALLBACK_DESCRIPTION},
    parsing::{parse_quantity, split_list, strip_and_parse},
    recommender::Recommender,
    rules::resolve_rules,
    similarity::cosine_similarity,
};
use ramen_fit::models::{Catalog, CatalogRow, CellValue, NutrientAssessment, Product, Verdict};
use ramen_fit::services::{GenerationError, TextGenerator};

fn catalog_row(id: f64, name: &str, allergens: &str, serving: &str, sodium: &str, fat: &str) -> CatalogRow {
    CatalogRow::new()
        .with("id", id)
        .with("품명", name)
        .with("상품이미지링크", format!("https://img/{}.png", id).as_str())
        .with("알레르기", allergens)
        .with("개별내용량", serving)
        .with("나트륨", sodium)
        .with("지방", fat)
}

fn sample_catalog() -> Catalog {
    Catalog::from_rows(&[
        catalog_row(1.0, "신라면", "밀, 대두", "120g", "1,790mg", "16g"),
        catalog_row(2.0, "진라면", "밀, 계란", "120g", "1,800mg", "15g"),
        catalog_row(3.0, "안성탕면", "밀", "125g", "1,730mg", "15g"),
        catalog_row(4.0, "너구리", "밀, 새우", "120g", "1,760mg", "17g"),
        catalog_row(5.0, "컵누들", "대두", "37.8g", "540mg", "0g"),
    ])
}

#[test]
fn test_numeric_strings_with_units() {
    assert_eq!(strip_and_parse("1,200mg"), Some(1200.0));
    assert_eq!(strip_and_parse("1,200g"), Some(1200.0));
    assert_eq!(strip_and_parse("1,200kcal"), Some(1200.0));
    assert_eq!(strip_and_parse("1200"), Some(1200.0));
}

#[test]
fn test_non_numeric_is_absent() {
    assert_eq!(strip_and_parse("미표기"), None);
    assert_eq!(parse_quantity(&CellValue::Null), None);
}

#[test]
fn test_split_list_trims_tokens() {
    let tokens = split_list(&CellValue::from(" 계란 ;우유,, 밀 "));
    assert_eq!(tokens, vec!["계란", "우유", "밀"]);
}

#[test]
fn test_zero_nutrient_is_not_present_regardless_of_average() {
    for average in [None, Some(0.0), Some(10.0), Some(1e6)] {
        assert_eq!(classify(Some(0.0), Some(0.0), average), NutrientAssessment::NotPresent);
    }

    let catalog = sample_catalog();
    let cup = catalog.find("컵누들").unwrap();
    assert_eq!(evaluate_nutrient(cup, &catalog, "지방"), NutrientAssessment::NotPresent);
}

#[test]
fn test_rule_merge_has_no_duplicates() {
    let rules = resolve_rules(&["고지혈증".to_string(), "심혈관질환".to_string()]);
    let names: Vec<&str> = rules.nutrients().collect();

    for expected in ["나트륨", "지방", "포화지방", "콜레스테롤"] {
        assert_eq!(names.iter().filter(|n| **n == expected).count(), 1, "{}", expected);
    }
}

#[test]
fn test_egg_allergy_is_unsuitable() {
    let allergies = vec!["계란".to_string()];
    assert_eq!(allergy_verdict(&allergies, Some("밀, 계란")), Verdict::Unsuitable);
    assert_eq!(allergy_verdict(&["EGG".to_string()], Some("contains egg")), Verdict::Unsuitable);
}

#[test]
fn test_indirect_marker_warning() {
    let allergies = vec!["새우".to_string()];
    let warning = indirect_allergy_warning(&allergies, Some("TRUE")).unwrap();
    assert_eq!(warning.to_string(), "'새우' 간접 알레르기 주의");
}

#[test]
fn test_recommendations_exclude_self_and_allergens() {
    let catalog = sample_catalog();
    let target = catalog.find("신라면").unwrap();
    let allergies = vec!["계란".to_string(), "새우".to_string()];

    let result = Recommender::new(10, 100.0).recommend(&catalog, target, &allergies);
    let names: Vec<&str> = result.iter().map(|r| r.name.as_str()).collect();

    assert!(!names.contains(&"신라면"));
    assert!(!names.contains(&"진라면"));
    assert!(!names.contains(&"너구리"));
    assert_eq!(names.len(), 2);
}

#[test]
fn test_self_similarity_is_one() {
    let v = [1490.0, 13.3, 0.0, 8.2];
    assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-9);
}

#[test]
fn test_tie_order_follows_pool_order() {
    let make = |id: i64, name: &str| {
        let mut p = Product::new(name);
        p.id = Some(id);
        p.serving_size = Some(100.0);
        p.nutrients.insert("나트륨".to_string(), Some(100.0));
        p
    };
    let target = make(0, "target");

    let forward = Catalog::new(
        vec![target.clone(), make(1, "a"), make(2, "b")],
        vec!["나트륨".to_string()],
    );
    let reversed = Catalog::new(
        vec![target.clone(), make(2, "b"), make(1, "a")],
        vec!["나트륨".to_string()],
    );

    let recommender = Recommender::default();
    let ids = |c: &Catalog| -> Vec<i64> {
        recommender.recommend(c, &target, &[]).iter().map(|r| r.id).collect()
    };

    assert_eq!(ids(&forward), vec![1, 2]);
    assert_eq!(ids(&reversed), vec![2, 1]);
}

struct TimedOut;

#[async_trait::async_trait]
impl TextGenerator for TimedOut {
    async fn generate(&self, _prompt: &str, _temperature: f32) -> Result<String, GenerationError> {
        Err(GenerationError::ApiError("504 Gateway Timeout".to_string()))
    }
}

#[test]
fn test_explanation_fallback_on_failure() {
    let context = ExplanationContext {
        product_name: "신라면",
        allergies: &[],
        health_goals: &[],
        evaluations: &[],
        verdict: Verdict::Suitable,
        warning: "",
    };

    let explanation = tokio_test::block_on(explain(&TimedOut, &context, 0.3));

    assert_eq!(explanation.text(), FALLBACK_DESCRIPTION);
}
