// Integration tests for Ramen Fit

use actix_web::{http::StatusCode, test, web, App};
use async_trait::async_trait;
use ramen_fit::core::{Analyzer, Recommender, FALLBACK_DESCRIPTION};
use ramen_fit::errors::handle_json_payload_error;
use ramen_fit::models::{AnalyzeResponse, CatalogRow, CellValue, ErrorResponse, HealthResponse, NutrientAssessment, UserRecord};
use ramen_fit::routes::{self, AppState};
use ramen_fit::services::{GenerationError, ProfileStore, StoreError, TextGenerator};
use serde_json::json;
use std::sync::{Arc, Mutex};

struct FakeStore {
    users: Vec<UserRecord>,
    catalog: Vec<CatalogRow>,
    fail: bool,
}

#[async_trait]
impl ProfileStore for FakeStore {
    async fn fetch_user(&self, user_id: &str) -> Result<Option<UserRecord>, StoreError> {
        if self.fail {
            return Err(sqlx::Error::PoolTimedOut.into());
        }
        Ok(self.users.iter().find(|u| u.user_id == user_id).cloned())
    }

    async fn fetch_catalog(&self) -> Result<Vec<CatalogRow>, StoreError> {
        if self.fail {
            return Err(sqlx::Error::PoolTimedOut.into());
        }
        Ok(self.catalog.clone())
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        Ok(!self.fail)
    }
}

/// Records prompts and answers with a canned description
#[derive(Default)]
struct FakeGenerator {
    prompts: Mutex<Vec<String>>,
    fail: bool,
}

#[async_trait]
impl TextGenerator for FakeGenerator {
    async fn generate(&self, prompt: &str, _temperature: f32) -> Result<String, GenerationError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        if self.fail {
            return Err(GenerationError::EmptyResponse);
        }
        Ok("나트륨 함량이 높은 편입니다.\n".to_string())
    }
}

fn user(id: &str, allergies: Option<&str>, conditions: Option<&str>) -> UserRecord {
    UserRecord {
        user_id: id.to_string(),
        allergies: CellValue::from(allergies.map(str::to_string)),
        medical_conditions: CellValue::from(conditions.map(str::to_string)),
    }
}

fn product(id: f64, name: &str, allergens: &str, indirect: &str, sodium: &str, kcal: &str) -> CatalogRow {
    CatalogRow::new()
        .with("id", id)
        .with("품명", name)
        .with("상품이미지링크", format!("https://img/{}.png", id).as_str())
        .with("알레르기", allergens)
        .with("간접 알레르기", indirect)
        .with("개별 내용량", "120g")
        .with("나트륨", sodium)
        .with("칼로리", kcal)
        .with("지방", "16g")
}

fn fake_store(fail: bool) -> FakeStore {
    FakeStore {
        users: vec![
            user("u-1", Some("계란, 새우"), Some("고혈압")),
            user("u-2", None, Some("비염")),
            user("u-3", Some("우유"), Some("고지혈증; 심혈관질환")),
        ],
        catalog: vec![
            product(1.0, "신라면", "밀, 대두", "새우", "1,790mg", "500kcal"),
            product(2.0, "진라면", "밀, 계란", "", "1,800mg", "500kcal"),
            product(3.0, "안성탕면", "밀", "", "1,730mg", "505kcal"),
            product(4.0, "짜파게티", "밀, 대두", "O", "1,000mg", "610kcal"),
            product(5.0, "너구리", "밀, 새우", "", "1,760mg", "495kcal"),
            product(6.0, "사리곰탕", "밀, 우유", "", "1,400mg", "490kcal"),
        ],
        fail,
    }
}

fn state(store: FakeStore, generator: Arc<FakeGenerator>) -> AppState {
    AppState {
        store: Arc::new(store),
        generator,
        analyzer: Analyzer::new(Recommender::new(3, 100.0), 0.3),
    }
}

macro_rules! app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state))
                .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
                .configure(routes::configure_routes),
        )
        .await
    };
}

fn analyze_request(user_id: &str, product_name: &str) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/analyze")
        .set_json(json!({ "user_id": user_id, "product_name": product_name }))
}

#[actix_web::test]
async fn test_unknown_user_is_not_found() {
    let app = app!(state(fake_store(false), Arc::default()));

    let resp = test::call_service(&app, analyze_request("ghost", "신라면").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(body.message, "사용자 정보를 찾을 수 없습니다.");
    assert_eq!(body.status_code, 404);
}

#[actix_web::test]
async fn test_unknown_product_is_not_found() {
    let app = app!(state(fake_store(false), Arc::default()));

    let resp = test::call_service(&app, analyze_request("u-1", "없는라면").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(body.message, "'없는라면' 제품을 찾을 수 없습니다.");
}

#[actix_web::test]
async fn test_default_rule_yields_single_evaluation() {
    let app = app!(state(fake_store(false), Arc::default()));

    let resp = test::call_service(&app, analyze_request("u-2", "신라면").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: AnalyzeResponse = test::read_body_json(resp).await;
    assert_eq!(body.nutrition_analysis.len(), 1);
    assert_eq!(body.nutrition_analysis[0].nutrient, "칼로리");
    assert_eq!(body.nutrition_analysis[0].evaluation, NutrientAssessment::NearAverage);
    assert_eq!(body.indirect_allergy, "");
}

#[actix_web::test]
async fn test_full_analysis() {
    let generator = Arc::new(FakeGenerator::default());
    let app = app!(state(fake_store(false), generator.clone()));

    let resp = test::call_service(&app, analyze_request("u-1", "신라면").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: AnalyzeResponse = test::read_body_json(resp).await;

    assert_eq!(body.ai_description, "나트륨 함량이 높은 편입니다.");
    assert_eq!(body.nutrition_analysis.len(), 1);
    assert_eq!(body.nutrition_analysis[0].nutrient, "나트륨");
    assert_eq!(body.indirect_allergy, "'새우' 간접 알레르기 주의");

    // 진라면 (계란) and 너구리 (새우) conflict with the user's allergies
    let ids: Vec<i64> = body.recommendations.iter().map(|r| r.id).collect();
    assert_eq!(ids.len(), 3);
    assert!(!ids.contains(&1));
    assert!(!ids.contains(&2));
    assert!(!ids.contains(&5));

    let prompts = generator.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("최종 판정: 적합"));
    assert!(prompts[0].contains("사용자 알레르기: 계란, 새우"));
}

#[actix_web::test]
async fn test_response_shape() {
    let app = app!(state(fake_store(false), Arc::default()));

    let resp = test::call_service(&app, analyze_request("u-3", "안성탕면").to_request()).await;
    let body: serde_json::Value = test::read_body_json(resp).await;

    assert!(body["ai_description"].is_string());
    assert!(body["indirect_allergy"].is_string());
    let first = &body["recommendations"][0];
    assert!(first["id"].is_i64());
    assert!(first["name"].is_string());
    assert!(first["image_url"].is_string());
    assert!(first.get("similarity").is_none());

    let nutrients: Vec<&str> = body["nutrition_analysis"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["nutrient"].as_str().unwrap())
        .collect();
    assert_eq!(nutrients, vec!["지방", "포화지방", "트랜스지방", "나트륨", "콜레스테롤"]);
}

#[actix_web::test]
async fn test_generation_failure_uses_fallback() {
    let generator = Arc::new(FakeGenerator {
        fail: true,
        ..Default::default()
    });
    let app = app!(state(fake_store(false), generator));

    let resp = test::call_service(&app, analyze_request("u-1", "짜파게티").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: AnalyzeResponse = test::read_body_json(resp).await;
    assert_eq!(body.ai_description, FALLBACK_DESCRIPTION);
    // Truthy marker names the first allergy
    assert_eq!(body.indirect_allergy, "'계란' 간접 알레르기 주의");
}

#[actix_web::test]
async fn test_store_failure_is_unavailable() {
    let app = app!(state(fake_store(true), Arc::default()));

    let resp = test::call_service(&app, analyze_request("u-1", "신라면").to_request()).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[actix_web::test]
async fn test_blank_fields_are_rejected() {
    let app = app!(state(fake_store(false), Arc::default()));

    let resp = test::call_service(&app, analyze_request("", "신라면").to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_malformed_json_is_rejected() {
    let app = app!(state(fake_store(false), Arc::default()));

    let req = test::TestRequest::post()
        .uri("/analyze")
        .insert_header(("content-type", "application/json"))
        .set_payload("{\"user_id\": ")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_health_reports_store_state() {
    let app = app!(state(fake_store(true), Arc::default()));

    let req = test::TestRequest::get().uri("/health").to_request();
    let body: HealthResponse = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body.status, "degraded");
}
