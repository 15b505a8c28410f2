//! Notification action normalization and compilation
//!
//! Email actions reach the store as `null`, a single object or an array.
//! They are normalized into a list here; the collapsed stored shape is
//! produced by the serde adapter on [`FormActions`].

use crate::forms::placeholders::PlaceholderRenderer;
use crate::forms::sanitize::{sanitize_text_field, sanitize_textarea};
use crate::forms::types::{
    scalar_to_string, EmailAction, FieldValues, FormActions, FormDefinition, DEFAULT_SUBJECT,
    DEFAULT_TEMPLATE,
};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// A notification ready to be handed to a mailer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompiledNotification {
    pub to: Vec<String>,
    pub subject: String,
    pub body: String,
}

/// Normalizes and compiles email notification actions
pub struct ActionCompiler;

impl ActionCompiler {
    /// Normalize `actions.email`: null, a single action record or an array.
    ///
    /// Actions with an empty recipient after trimming are dropped.
    pub fn normalize(raw: &Value) -> Vec<EmailAction> {
        match raw {
            Value::Null => Vec::new(),
            Value::Array(items) => items.iter().filter_map(Self::normalize_one).collect(),
            other => Self::normalize_one(other).into_iter().collect(),
        }
    }

    /// Normalize one action record
    pub fn normalize_one(raw: &Value) -> Option<EmailAction> {
        let obj = raw.as_object()?;
        let text = |key: &str| obj.get(key).map(scalar_to_string).unwrap_or_default();

        let to = sanitize_text_field(&text("to"));
        if to.is_empty() {
            debug!("Dropping email action without recipient");
            return None;
        }

        let subject = sanitize_text_field(&text("subject"));
        let template = sanitize_textarea(&text("template"));

        Some(EmailAction {
            to,
            subject: if subject.is_empty() {
                DEFAULT_SUBJECT.to_string()
            } else {
                subject
            },
            template: if template.is_empty() {
                DEFAULT_TEMPLATE.to_string()
            } else {
                template
            },
        })
    }

    /// Normalize a raw `actions` object
    pub fn normalize_actions(raw: &Value) -> FormActions {
        let email = raw
            .get("email")
            .map(Self::normalize)
            .unwrap_or_default();

        FormActions { email }
    }

    /// Resolve every email action of `form` against submitted `values`
    pub fn compile(form: &FormDefinition, values: &FieldValues) -> Vec<CompiledNotification> {
        form.actions
            .email
            .iter()
            .filter_map(|action| {
                let to = split_recipients(&action.to);
                if to.is_empty() {
                    return None;
                }

                Some(CompiledNotification {
                    to,
                    subject: PlaceholderRenderer::render(&action.subject, form, values),
                    body: PlaceholderRenderer::render(&action.template, form, values),
                })
            })
            .collect()
    }
}

/// Split a comma separated recipient string, dropping empty entries
pub fn split_recipients(to: &str) -> Vec<String> {
    to.split(',')
        .map(str::trim)
        .filter(|addr| !addr.is_empty())
        .map(str::to_string)
        .collect()
}
