use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::core::parsing::{parse_quantity, split_list};

/// Serving size column of the product catalog
pub const SERVING_SIZE_COLUMN: &str = "개별내용량";
pub const NAME_COLUMN: &str = "품명";
pub const ID_COLUMN: &str = "id";
pub const IMAGE_COLUMN: &str = "상품이미지링크";
pub const ALLERGEN_COLUMN: &str = "알레르기";
pub const INDIRECT_ALLERGEN_COLUMN: &str = "간접알레르기";

/// Nutrient columns tracked for evaluation and similarity, in vector order
pub const TRACKED_NUTRIENTS: [&str; 12] = [
    "열량", "칼로리", "나트륨", "당류", "탄수화물", "지방", "단백질",
    "콜레스테롤", "포화지방", "트랜스지방", "칼슘", "카페인",
];

/// A single column value as read from the relational store
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Null,
}

impl From<Option<String>> for CellValue {
    fn from(value: Option<String>) -> Self {
        value.map_or(CellValue::Null, CellValue::Text)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl CellValue {
    /// Text form of the cell, `None` for null
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Text(text) => Some(text.clone()),
            CellValue::Number(n) => Some(n.to_string()),
            CellValue::Null => None,
        }
    }
}

/// Raw row of the `user_private` table
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub user_id: String,
    pub allergies: CellValue,
    pub medical_conditions: CellValue,
}

/// User allergies and health conditions, read-only for a request
#[derive(Debug, Clone, PartialEq)]
pub struct UserProfile {
    pub user_id: String,
    pub allergies: Vec<String>,
    pub health_conditions: Vec<String>,
}

impl From<UserRecord> for UserProfile {
    fn from(record: UserRecord) -> Self {
        Self {
            allergies: split_list(&record.allergies),
            health_conditions: split_list(&record.medical_conditions),
            user_id: record.user_id,
        }
    }
}

/// Raw catalog row: column name and value pairs in select order
#[derive(Debug, Clone, Default)]
pub struct CatalogRow {
    pub cells: Vec<(String, CellValue)>,
}

impl CatalogRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style append, mostly for fixtures
    pub fn with(mut self, column: &str, value: impl Into<CellValue>) -> Self {
        self.cells.push((column.to_string(), value.into()));
        self
    }

    pub fn push(&mut self, column: String, value: CellValue) {
        self.cells.push((column, value));
    }
}

/// Normalize a catalog column name to its logical field name
///
/// Whitespace is removed and a trailing parenthesized unit is dropped, so
/// `"나트륨 (mg)"` and `"나트륨"` address the same field.
pub fn normalize_column_name(raw: &str) -> String {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    match compact.find('(') {
        Some(idx) if idx > 0 && compact.ends_with(')') => compact[..idx].to_string(),
        _ => compact,
    }
}

/// A catalog product with unit-bearing fields coerced to numbers
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: Option<i64>,
    pub name: String,
    pub image_url: Option<String>,
    pub allergens: Option<String>,
    pub indirect_allergens: Option<String>,
    pub serving_size: Option<f64>,
    pub nutrients: HashMap<String, Option<f64>>,
}

impl Product {
    pub fn new(name: &str) -> Self {
        Self {
            id: None,
            name: name.to_string(),
            image_url: None,
            allergens: None,
            indirect_allergens: None,
            serving_size: None,
            nutrients: HashMap::new(),
        }
    }

    /// Parsed nutrient value, `None` when the column is missing or unparseable
    pub fn nutrient(&self, name: &str) -> Option<f64> {
        self.nutrients.get(name).copied().flatten()
    }

    /// Convert a raw row, returning `None` for rows without a name
    pub fn from_row(row: &CatalogRow) -> Option<Self> {
        let mut name = None;
        let mut product = Product::new("");

        for (column, value) in &row.cells {
            let field = normalize_column_name(column);
            match field.as_str() {
                NAME_COLUMN => name = value.as_text().filter(|n| !n.trim().is_empty()),
                ID_COLUMN => product.id = parse_id(value),
                IMAGE_COLUMN => product.image_url = value.as_text(),
                ALLERGEN_COLUMN => product.allergens = value.as_text(),
                INDIRECT_ALLERGEN_COLUMN => product.indirect_allergens = value.as_text(),
                SERVING_SIZE_COLUMN => product.serving_size = parse_quantity(value),
                other if TRACKED_NUTRIENTS.contains(&other) => {
                    product.nutrients.insert(other.to_string(), parse_quantity(value));
                }
                _ => {}
            }
        }

        product.name = name?;
        Some(product)
    }
}

fn parse_id(value: &CellValue) -> Option<i64> {
    match value {
        CellValue::Text(text) => text.trim().parse::<i64>().ok(),
        CellValue::Number(n) if n.fract() == 0.0 => Some(*n as i64),
        _ => None,
    }
}

/// The full product table for one request
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub products: Vec<Product>,
    /// Tracked nutrient columns present in the source table, in tracked order
    pub nutrient_columns: Vec<String>,
}

impl Catalog {
    pub fn new(products: Vec<Product>, nutrient_columns: Vec<String>) -> Self {
        Self {
            products,
            nutrient_columns,
        }
    }

    /// Normalize column names and coerce unit-bearing fields of raw rows
    pub fn from_rows(rows: &[CatalogRow]) -> Self {
        let mut present: Vec<String> = Vec::new();
        let mut products = Vec::with_capacity(rows.len());

        for row in rows {
            for (column, _) in &row.cells {
                let field = normalize_column_name(column);
                if TRACKED_NUTRIENTS.contains(&field.as_str()) && !present.contains(&field) {
                    present.push(field);
                }
            }

            match Product::from_row(row) {
                Some(product) => products.push(product),
                None => tracing::debug!("Skipping catalog row without a product name"),
            }
        }

        let nutrient_columns = TRACKED_NUTRIENTS
            .iter()
            .filter(|n| present.iter().any(|p| p == *n))
            .map(|n| n.to_string())
            .collect();

        Self::new(products, nutrient_columns)
    }

    /// First product whose name matches exactly
    pub fn find(&self, name: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.name == name)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

/// Whether a nutrient should be low or high for a health condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Low,
    High,
}

/// Classification of a nutrient relative to the catalog average
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NutrientAssessment {
    #[serde(rename = "미함유")]
    NotPresent,
    #[serde(rename = "정보부족")]
    InsufficientData,
    #[serde(rename = "평균보다 높음")]
    AboveAverage,
    #[serde(rename = "평균보다 낮음")]
    BelowAverage,
    #[serde(rename = "평균과 비슷함")]
    NearAverage,
}

impl NutrientAssessment {
    pub fn label(&self) -> &'static str {
        match self {
            NutrientAssessment::NotPresent => "미함유",
            NutrientAssessment::InsufficientData => "정보부족",
            NutrientAssessment::AboveAverage => "평균보다 높음",
            NutrientAssessment::BelowAverage => "평균보다 낮음",
            NutrientAssessment::NearAverage => "평균과 비슷함",
        }
    }
}

impl fmt::Display for NutrientAssessment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One entry of the nutrition report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutrientEvaluation {
    pub nutrient: String,
    pub evaluation: NutrientAssessment,
}

/// Allergy suitability verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    #[serde(rename = "적합")]
    Suitable,
    #[serde(rename = "부적합")]
    Unsuitable,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Suitable => f.write_str("적합"),
            Verdict::Unsuitable => f.write_str("부적합"),
        }
    }
}

/// Indirect (trace / cross-contamination) allergy warning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndirectWarning {
    pub allergen: String,
}

impl fmt::Display for IndirectWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' 간접 알레르기 주의", self.allergen)
    }
}

/// Recommended alternative product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationCandidate {
    pub id: i64,
    pub name: String,
    pub image_url: String,
    #[serde(skip_serializing, default)]
    pub similarity: f64,
}
