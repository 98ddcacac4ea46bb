use async_trait::async_trait;
use sqlx::mysql::{MySqlPool, MySqlPoolOptions, MySqlRow};
use sqlx::{Column, Row};
use std::time::Duration;
use thiserror::Error;

use crate::models::{CatalogRow, CellValue, UserRecord};
use crate::services::ProfileStore;

/// Errors that can occur when interacting with MySQL
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),
}

/// MySQL-backed store for user profiles and the product catalog
///
/// Every call acquires its own connection, runs one read-only statement and
/// returns the connection to the pool when it goes out of scope, on success
/// and error paths alike.
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    /// Create a new MySQL store from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let pool = MySqlPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Create a new MySQL store from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, StoreError> {
        tracing::info!("Connecting to MySQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }
}

#[async_trait]
impl ProfileStore for MySqlStore {
    async fn fetch_user(&self, user_id: &str) -> Result<Option<UserRecord>, StoreError> {
        let query = r#"
            SELECT user_id, allergies, medical_conditions
            FROM user_private
            WHERE user_id = ?
        "#;

        let mut conn = self.pool.acquire().await?;
        let row = sqlx::query(query)
            .bind(user_id)
            .fetch_optional(&mut *conn)
            .await?;

        let Some(row) = row else {
            tracing::debug!("No user_private row for {}", user_id);
            return Ok(None);
        };

        Ok(Some(UserRecord {
            user_id: decode_cell(&row, 0)
                .as_text()
                .unwrap_or_else(|| user_id.to_string()),
            allergies: decode_cell(&row, 1),
            medical_conditions: decode_cell(&row, 2),
        }))
    }

    async fn fetch_catalog(&self) -> Result<Vec<CatalogRow>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        let rows = sqlx::query("SELECT * FROM ramen_db")
            .fetch_all(&mut *conn)
            .await?;

        let catalog: Vec<CatalogRow> = rows
            .iter()
            .map(|row| {
                let mut catalog_row = CatalogRow::new();
                for (idx, column) in row.columns().iter().enumerate() {
                    catalog_row.push(column.name().to_string(), decode_cell(row, idx));
                }
                catalog_row
            })
            .collect();

        tracing::debug!("Fetched {} catalog rows", catalog.len());

        Ok(catalog)
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        let mut conn = self.pool.acquire().await?;
        sqlx::query("SELECT 1")
            .fetch_one(&mut *conn)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

/// Decode a column of unknown type into a cell value
///
/// Integer, floating point and text decodings are tried in turn; anything
/// else (e.g. DECIMAL) is read as its raw textual form.
fn decode_cell(row: &MySqlRow, idx: usize) -> CellValue {
    if let Ok(value) = row.try_get::<Option<i64>, _>(idx) {
        return value.map_or(CellValue::Null, |n| CellValue::Number(n as f64));
    }
    if let Ok(value) = row.try_get::<Option<u64>, _>(idx) {
        return value.map_or(CellValue::Null, |n| CellValue::Number(n as f64));
    }
    if let Ok(value) = row.try_get::<Option<f64>, _>(idx) {
        return value.map_or(CellValue::Null, CellValue::Number);
    }
    if let Ok(value) = row.try_get::<Option<String>, _>(idx) {
        return CellValue::from(value);
    }
    match row.try_get_unchecked::<Option<String>, _>(idx) {
        Ok(value) => CellValue::from(value),
        Err(e) => {
            tracing::debug!("Undecodable column {}: {}", idx, e);
            CellValue::Null
        }
    }
}
