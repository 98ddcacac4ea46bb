use crate::core::{
    allergy::has_allergen_conflict,
    similarity::{cosine_similarity, median},
};
use crate::models::{Catalog, Product, RecommendationCandidate};

/// Similar-product recommender
///
/// # Pipeline Stages
/// 1. Candidate pool: drop allergen conflicts and the queried product
/// 2. Per-100-unit nutrient vectors over the tracked columns
/// 3. Median imputation of missing values from the pool
/// 4. Cosine similarity ranking, stable on ties
#[derive(Debug, Clone)]
pub struct Recommender {
    top_k: usize,
    default_serving_size: f64,
}

impl Recommender {
    pub fn new(top_k: usize, default_serving_size: f64) -> Self {
        Self {
            top_k,
            default_serving_size,
        }
    }

    /// Recommend up to `top_k` products most similar to `target`
    ///
    /// # Arguments
    /// * `catalog` - The full product table
    /// * `target` - The queried product
    /// * `allergies` - User allergy tokens used to exclude candidates
    pub fn recommend(
        &self,
        catalog: &Catalog,
        target: &Product,
        allergies: &[String],
    ) -> Vec<RecommendationCandidate> {
        let pool: Vec<&Product> = catalog
            .products
            .iter()
            .filter(|p| p.name != target.name)
            .filter(|p| !has_allergen_conflict(allergies, p.allergens.as_deref()))
            .filter(|p| {
                if p.id.is_none() {
                    tracing::debug!("Product {} has no id, not recommendable", p.name);
                }
                p.id.is_some()
            })
            .collect();

        if pool.is_empty() {
            return Vec::new();
        }

        let columns = &catalog.nutrient_columns;
        let pool_vectors: Vec<Vec<Option<f64>>> = pool
            .iter()
            .map(|p| self.per_100_vector(p, columns))
            .collect();

        let fill: Vec<f64> = (0..columns.len())
            .map(|j| median(pool_vectors.iter().map(|v| v[j])).unwrap_or(0.0))
            .collect();

        let target_vector = impute(&self.per_100_vector(target, columns), &fill);

        let mut ranked: Vec<(usize, f64)> = pool_vectors
            .iter()
            .enumerate()
            .map(|(idx, vector)| (idx, cosine_similarity(&target_vector, &impute(vector, &fill))))
            .collect();

        // Stable sort keeps pool order among equal similarities
        ranked.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        ranked.truncate(self.top_k);

        ranked
            .into_iter()
            .filter_map(|(idx, similarity)| {
                let product = pool[idx];
                Some(RecommendationCandidate {
                    id: product.id?,
                    name: product.name.clone(),
                    image_url: product.image_url.clone().unwrap_or_default(),
                    similarity,
                })
            })
            .collect()
    }

    /// Per-100-unit values of the given columns
    ///
    /// A missing or non-positive serving size falls back to the configured
    /// default.
    pub fn per_100_vector(&self, product: &Product, columns: &[String]) -> Vec<Option<f64>> {
        let serving = product
            .serving_size
            .filter(|s| *s > 0.0)
            .unwrap_or(self.default_serving_size);

        columns
            .iter()
            .map(|column| {
                product
                    .nutrient(column)
                    .map(|value| value / serving * 100.0)
                    .filter(|v| v.is_finite())
            })
            .collect()
    }
}

impl Default for Recommender {
    fn default() -> Self {
        Self::new(3, 100.0)
    }
}

#[inline]
fn impute(vector: &[Option<f64>], fill: &[f64]) -> Vec<f64> {
    vector
        .iter()
        .zip(fill)
        .map(|(value, fallback)| value.unwrap_or(*fallback))
        .collect()
}
