//! Option store: named JSON values persisted as whole documents

use crate::error::{FormError, Result};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use sqlx::{Row, SqlitePool};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Key/value persistence for JSON documents
#[async_trait]
pub trait OptionStore: Send + Sync {
    /// Read the value stored under `key`
    async fn get_option(&self, key: &str) -> Result<Option<Value>>;

    /// Store `value` under `key`, replacing any previous value
    async fn update_option(&self, key: &str, value: &Value) -> Result<()>;

    /// Remove `key`; returns whether it existed
    async fn delete_option(&self, key: &str) -> Result<bool>;
}

/// Option store backed by a SQLite `options` table
pub struct SqliteOptionStore {
    db: SqlitePool,
}

impl SqliteOptionStore {
    /// Create a new option store
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Connect to `database_url` and initialize the options table
    pub async fn connect(database_url: &str) -> Result<Self> {
        let db = SqlitePool::connect(database_url).await?;
        let store = Self::new(db);
        store.init_db().await?;
        Ok(store)
    }

    /// Initialize the options table
    pub async fn init_db(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS options (
                option_name TEXT PRIMARY KEY,
                option_value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.db)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl OptionStore for SqliteOptionStore {
    async fn get_option(&self, key: &str) -> Result<Option<Value>> {
        let row = sqlx::query("SELECT option_value FROM options WHERE option_name = ?")
            .bind(key)
            .fetch_optional(&self.db)
            .await?;

        match row {
            Some(row) => {
                let raw: String = row.try_get("option_value")?;
                let value = serde_json::from_str(&raw).map_err(|e| {
                    FormError::Storage(format!("Option {} holds invalid JSON: {}", key, e))
                })?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    async fn update_option(&self, key: &str, value: &Value) -> Result<()> {
        let encoded = serde_json::to_string(value)?;

        sqlx::query(
            r#"
            INSERT INTO options (option_name, option_value, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(option_name) DO UPDATE SET
                option_value = excluded.option_value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(encoded)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.db)
        .await?;

        Ok(())
    }

    async fn delete_option(&self, key: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM options WHERE option_name = ?")
            .bind(key)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// In-process option store, lost on restart
#[derive(Default)]
pub struct MemoryOptionStore {
    options: RwLock<HashMap<String, Value>>,
}

impl MemoryOptionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OptionStore for MemoryOptionStore {
    async fn get_option(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.options.read().await.get(key).cloned())
    }

    async fn update_option(&self, key: &str, value: &Value) -> Result<()> {
        self.options
            .write()
            .await
            .insert(key.to_string(), value.clone());
        Ok(())
    }

    async fn delete_option(&self, key: &str) -> Result<bool> {
        Ok(self.options.write().await.remove(key).is_some())
    }
}
