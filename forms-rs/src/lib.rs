//! forms-rs: dynamic form definitions for site administration
//!
//! Stores form definitions (typed fields, single-condition visibility rules
//! and email notification actions) as one JSON collection and serves them
//! over a small REST API.
//!
//! # Example
//!
//! ```no_run
//! use forms_rs::forms::{ConditionEvaluator, FormManager, FormRequest};
//! use forms_rs::storage::{MemoryOptionStore, OptionFormRepository};
//! use serde_json::json;
//! use std::collections::HashMap;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(MemoryOptionStore::new());
//!     let manager = FormManager::new(Arc::new(OptionFormRepository::new(store, "forms")));
//!
//!     let form = manager
//!         .create(FormRequest {
//!             name: "Contact".to_string(),
//!             fields: json!([
//!                 { "type": "text", "label": "Country", "name": "country" },
//!                 { "type": "text", "label": "State", "name": "state",
//!                   "showIf": { "field": "country", "operator": "equals", "value": "US" } }
//!             ]),
//!             actions: json!(null),
//!         })
//!         .await?;
//!
//!     let values = HashMap::from([("country".to_string(), "US".to_string())]);
//!     assert!(ConditionEvaluator::is_visible(&form.fields[1], &values));
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration management
//! - [`error`]: Error types and handling
//! - [`forms`]: Definition model, normalization, evaluation and rendering
//! - [`storage`]: Option store and form repository
//! - [`api`]: REST API

pub mod api;
pub mod config;
pub mod error;
pub mod forms;
pub mod storage;

// Re-export commonly used types
pub use config::Config;
pub use error::{FormError, Result};
