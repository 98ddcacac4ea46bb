// Service exports
pub mod mysql;
pub mod openai;

pub use mysql::{MySqlStore, StoreError};
pub use openai::{GenerationError, OpenAiClient};

use crate::models::{CatalogRow, UserRecord};
use async_trait::async_trait;

/// Read-only access to user profiles and the product catalog
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Fetch one user row, `None` if no such user exists
    async fn fetch_user(&self, user_id: &str) -> Result<Option<UserRecord>, StoreError>;

    /// Fetch every catalog row
    async fn fetch_catalog(&self) -> Result<Vec<CatalogRow>, StoreError>;

    /// Connectivity probe
    async fn health_check(&self) -> Result<bool, StoreError>;
}

/// Single-shot text generation
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str, temperature: f32) -> Result<String, GenerationError>;
}
