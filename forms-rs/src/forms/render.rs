//! Markup skeleton for stored forms and `mt_form` embed references

use crate::error::Result;
use crate::forms::manager::FormManager;
use crate::forms::types::{FieldDefinition, FieldType, FormDefinition};
use askama::Template;
use regex::Regex;
use std::sync::OnceLock;
use tracing::{debug, warn};

#[derive(Clone, Copy)]
struct ConditionView<'a> {
    field: &'a str,
    operator: &'static str,
    value: &'a str,
}

struct FieldView<'a> {
    input_id: String,
    name: &'a str,
    label: &'a str,
    input_type: &'static str,
    multiline: bool,
    required: bool,
    condition: Option<ConditionView<'a>>,
}

#[derive(Template)]
#[template(path = "form.html")]
struct FormSkeleton<'a> {
    form_id: &'a str,
    fields: Vec<FieldView<'a>>,
}

impl<'a> FieldView<'a> {
    fn new(form_id: &str, field: &'a FieldDefinition) -> Self {
        Self {
            input_id: format!("mt-{}-{}", form_id, field.name),
            name: &field.name,
            label: &field.label,
            input_type: field.field_type.as_str(),
            multiline: field.field_type == FieldType::Textarea,
            required: field.required,
            condition: field.show_if.as_ref().map(|condition| ConditionView {
                field: &condition.field,
                operator: condition.operator.as_str(),
                value: &condition.value,
            }),
        }
    }
}

/// A parsed `mt_form id="..."` reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedReference {
    pub id: String,
}

fn embed_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"^\s*\[?\s*mt_form\s+id\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s\]"']+))\s*\]?\s*$"#)
            .expect("valid regex")
    })
}

impl EmbedReference {
    /// Parse `mt_form id="<id>"`, optionally wrapped in brackets
    pub fn parse(input: &str) -> Option<Self> {
        let captures = embed_pattern().captures(input)?;
        let id = captures
            .get(1)
            .or_else(|| captures.get(2))
            .or_else(|| captures.get(3))?
            .as_str()
            .trim();

        if id.is_empty() {
            return None;
        }

        Some(Self { id: id.to_string() })
    }
}

/// Renders stored forms into their input skeleton
pub struct FormRenderer;

impl FormRenderer {
    /// One labeled control per field, in field order
    pub fn render(form: &FormDefinition) -> Result<String> {
        let skeleton = FormSkeleton {
            form_id: &form.id,
            fields: form
                .fields
                .iter()
                .map(|field| FieldView::new(&form.id, field))
                .collect(),
        };

        Ok(skeleton.render()?)
    }

    /// Resolve an embed reference to markup.
    ///
    /// Unparseable references, unknown IDs and storage failures all
    /// produce an empty string.
    pub async fn render_embed(manager: &FormManager, reference: &str) -> String {
        let Some(embed) = EmbedReference::parse(reference) else {
            debug!(reference = %reference, "Ignoring unparseable embed reference");
            return String::new();
        };

        let form = match manager.get(&embed.id).await {
            Ok(form) => form,
            Err(e) => {
                debug!(id = %embed.id, error = %e, "Embed reference did not resolve");
                return String::new();
            }
        };

        Self::render(&form).unwrap_or_else(|e| {
            warn!(id = %form.id, error = %e, "Failed to render form");
            String::new()
        })
    }
}
