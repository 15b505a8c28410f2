//! Placeholder resolution for notification templates
//!
//! Templates reference submitted values with `{{fieldName}}`. The reserved
//! `{{all}}` token expands to one `label: value` line per form field.

use crate::forms::types::{FieldValues, FormDefinition};

/// Reserved token expanding to every field's value
pub const ALL_FIELDS_TOKEN: &str = "all";

/// Resolves `{{...}}` placeholders against a form and its submitted values
pub struct PlaceholderRenderer;

impl PlaceholderRenderer {
    /// Render `template`, replacing every placeholder.
    ///
    /// Unknown names and fields without a value resolve to the empty string.
    /// An unterminated `{{` is copied through literally.
    pub fn render(template: &str, form: &FormDefinition, values: &FieldValues) -> String {
        let mut output = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(start) = rest.find("{{") {
            output.push_str(&rest[..start]);
            let after_open = &rest[start + 2..];

            match after_open.find("}}") {
                Some(end) => {
                    let name = after_open[..end].trim();
                    output.push_str(&Self::resolve(name, form, values));
                    rest = &after_open[end + 2..];
                }
                None => {
                    output.push_str(&rest[start..]);
                    rest = "";
                }
            }
        }

        output.push_str(rest);
        output
    }

    /// Deterministic `label: value` listing of every field, in field order
    pub fn all_fields(form: &FormDefinition, values: &FieldValues) -> String {
        form.fields
            .iter()
            .map(|field| {
                let value = values.get(&field.name).map(String::as_str).unwrap_or("");
                format!("{}: {}", field.label, value)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Extract the distinct placeholder names used in a template, sorted
    pub fn extract_placeholders(template: &str) -> Vec<String> {
        let mut names = Vec::new();
        let mut rest = template;

        while let Some(start) = rest.find("{{") {
            let after_open = &rest[start + 2..];
            let Some(end) = after_open.find("}}") else {
                break;
            };

            let name = after_open[..end].trim();
            if !name.is_empty() {
                names.push(name.to_string());
            }
            rest = &after_open[end + 2..];
        }

        names.sort();
        names.dedup();
        names
    }

    fn resolve(name: &str, form: &FormDefinition, values: &FieldValues) -> String {
        if name == ALL_FIELDS_TOKEN {
            return Self::all_fields(form, values);
        }
        values.get(name).cloned().unwrap_or_default()
    }
}
