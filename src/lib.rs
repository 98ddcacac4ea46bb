//! Ramen Fit - product suitability analysis and recommendation service
//!
//! Judges whether a catalog product suits a user's allergies and health
//! conditions, explains the judgment through a text-generation backend and
//! recommends similar products by per-100-unit nutrient profile.

pub mod config;
pub mod core;
pub mod errors;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{Analyzer, Recommender, cosine_similarity, strip_and_parse};
pub use models::{AnalyzeRequest, AnalyzeResponse, Catalog, CatalogRow, Product, UserProfile};
