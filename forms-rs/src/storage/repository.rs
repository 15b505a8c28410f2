//! Form repository over a single option key
//!
//! The whole collection lives in one JSON array. Every write reads the
//! current array, modifies it and writes it back; concurrent writers are
//! not serialized, the last write wins.

use crate::error::Result;
use crate::forms::FormDefinition;
use crate::storage::options::OptionStore;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::warn;

/// Document-level persistence for form definitions
#[async_trait]
pub trait FormRepository: Send + Sync {
    /// All stored definitions, in storage order
    async fn list(&self) -> Result<Vec<FormDefinition>>;

    /// One definition by id
    async fn get(&self, id: &str) -> Result<Option<FormDefinition>>;

    /// Insert or replace a definition (replacement keeps its position)
    async fn put(&self, form: FormDefinition) -> Result<()>;

    /// Remove a definition; returns whether it existed
    async fn delete(&self, id: &str) -> Result<bool>;
}

/// Stores the form collection as a JSON array under one option key
pub struct OptionFormRepository {
    store: Arc<dyn OptionStore>,
    key: String,
}

impl OptionFormRepository {
    pub fn new(store: Arc<dyn OptionStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Option key the collection is stored under
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Stored entries as raw JSON, decodable or not
    async fn load_raw(&self) -> Result<Vec<Value>> {
        let Some(value) = self.store.get_option(&self.key).await? else {
            return Ok(Vec::new());
        };

        match value {
            Value::Array(items) => Ok(items),
            _ => {
                warn!(key = %self.key, "Stored form collection is not an array; treating as empty");
                Ok(Vec::new())
            }
        }
    }

    async fn load(&self) -> Result<Vec<FormDefinition>> {
        Ok(self
            .load_raw()
            .await?
            .into_iter()
            .filter_map(|item| match serde_json::from_value::<FormDefinition>(item) {
                Ok(form) => Some(form),
                Err(e) => {
                    warn!(key = %self.key, error = %e, "Skipping undecodable stored form");
                    None
                }
            })
            .collect())
    }

    async fn save(&self, items: Vec<Value>) -> Result<()> {
        self.store.update_option(&self.key, &Value::Array(items)).await
    }
}

fn stored_id(item: &Value) -> Option<&str> {
    item.get("id").and_then(Value::as_str)
}

#[async_trait]
impl FormRepository for OptionFormRepository {
    async fn list(&self) -> Result<Vec<FormDefinition>> {
        self.load().await
    }

    async fn get(&self, id: &str) -> Result<Option<FormDefinition>> {
        Ok(self.load().await?.into_iter().find(|form| form.id == id))
    }

    // Entries that do not decode are written back untouched.
    async fn put(&self, form: FormDefinition) -> Result<()> {
        let mut items = self.load_raw().await?;
        let encoded = serde_json::to_value(&form)?;

        match items
            .iter_mut()
            .find(|item| stored_id(item) == Some(form.id.as_str()))
        {
            Some(existing) => *existing = encoded,
            None => items.push(encoded),
        }

        self.save(items).await
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let mut items = self.load_raw().await?;
        let before = items.len();
        items.retain(|item| stored_id(item) != Some(id));

        if items.len() == before {
            return Ok(false);
        }

        self.save(items).await?;
        Ok(true)
    }
}
