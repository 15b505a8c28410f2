//! Form definition store
//!
//! Owns every persisted [`FormDefinition`]. Inbound definitions are
//! normalized before they are stored; updates replace name, fields and
//! actions wholesale.

use crate::error::{FormError, Result};
use crate::forms::actions::ActionCompiler;
use crate::forms::sanitize::sanitize_text_field;
use crate::forms::types::{FormDefinition, FormRequest};
use crate::forms::validator::FieldValidator;
use crate::storage::FormRepository;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Suffix appended to the name of a duplicated form
pub const COPY_SUFFIX: &str = " (Copy)";

/// Manages form definitions on top of a [`FormRepository`]
#[derive(Clone)]
pub struct FormManager {
    repo: Arc<dyn FormRepository>,
}

impl FormManager {
    /// Create a new form manager
    pub fn new(repo: Arc<dyn FormRepository>) -> Self {
        Self { repo }
    }

    /// List all forms in storage order
    pub async fn list(&self) -> Result<Vec<FormDefinition>> {
        let forms = self.repo.list().await?;
        debug!(count = forms.len(), "Listed forms");
        Ok(forms)
    }

    /// Get a form by ID
    pub async fn get(&self, id: &str) -> Result<FormDefinition> {
        self.repo
            .get(id)
            .await?
            .ok_or_else(|| FormError::NotFound(format!("Form not found: {}", id)))
    }

    /// Create a new form from a raw request
    pub async fn create(&self, request: FormRequest) -> Result<FormDefinition> {
        let name = validated_name(&request.name)?;
        let existing = self.repo.list().await?;

        let form = FormDefinition {
            id: generate_id(&existing),
            name,
            fields: FieldValidator::normalize_all(&request.fields),
            actions: ActionCompiler::normalize_actions(&request.actions),
        };

        self.repo.put(form.clone()).await?;
        info!(id = %form.id, name = %form.name, fields = form.fields.len(), "Created form");

        Ok(form)
    }

    /// Replace name, fields and actions of an existing form
    pub async fn update(&self, id: &str, request: FormRequest) -> Result<FormDefinition> {
        let name = validated_name(&request.name)?;
        let existing = self.get(id).await?;

        let form = FormDefinition {
            id: existing.id,
            name,
            fields: FieldValidator::normalize_all(&request.fields),
            actions: ActionCompiler::normalize_actions(&request.actions),
        };

        self.repo.put(form.clone()).await?;
        info!(id = %form.id, name = %form.name, fields = form.fields.len(), "Updated form");

        Ok(form)
    }

    /// Delete a form
    pub async fn remove(&self, id: &str) -> Result<()> {
        if !self.repo.delete(id).await? {
            return Err(FormError::NotFound(format!("Form not found: {}", id)));
        }

        info!(id = %id, "Deleted form");
        Ok(())
    }

    /// Copy a form under a new ID, suffixing its name
    pub async fn duplicate(&self, id: &str) -> Result<FormDefinition> {
        let source = self.get(id).await?;
        let existing = self.repo.list().await?;

        let copy = FormDefinition {
            id: generate_id(&existing),
            name: format!("{}{}", source.name, COPY_SUFFIX),
            fields: source.fields,
            actions: source.actions,
        };

        self.repo.put(copy.clone()).await?;
        info!(source = %id, id = %copy.id, "Duplicated form");

        Ok(copy)
    }
}

fn validated_name(raw: &str) -> Result<String> {
    let name = sanitize_text_field(raw);
    if name.is_empty() {
        return Err(FormError::Validation("Form name is required".to_string()));
    }
    Ok(name)
}

/// Generate a fresh form ID not present in `existing`
fn generate_id(existing: &[FormDefinition]) -> String {
    loop {
        let id = format!("form_{}", Uuid::new_v4().simple());
        if !existing.iter().any(|form| form.id == id) {
            return id;
        }
    }
}
