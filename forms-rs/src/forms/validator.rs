//! Field schema normalization
//!
//! Fields arrive as untyped JSON from the admin editor. Anything that cannot
//! be turned into a usable field is dropped instead of failing the save.

use crate::forms::sanitize::{sanitize_key, sanitize_text_field};
use crate::forms::types::{scalar_to_string, ConditionOperator, FieldCondition, FieldDefinition, FieldType};
use serde_json::{Map, Value};
use std::collections::HashSet;
use tracing::debug;

/// Normalizes raw field records into [`FieldDefinition`]s
pub struct FieldValidator;

impl FieldValidator {
    /// Normalize one raw field record.
    ///
    /// Returns `None` when the record is not an object or when its label or
    /// name is empty after sanitization.
    pub fn normalize(raw: &Value) -> Option<FieldDefinition> {
        let obj = raw.as_object()?;

        let field_type = FieldType::parse(&string_at(obj, "type"));
        let label = sanitize_text_field(&string_at(obj, "label"));
        let name = sanitize_key(&string_at(obj, "name"));

        if label.is_empty() || name.is_empty() {
            debug!(label = %label, name = %name, "Dropping field without label or name");
            return None;
        }

        let show_if = obj
            .get("showIf")
            .and_then(|condition| Self::normalize_condition(condition, &name));

        Some(FieldDefinition {
            field_type,
            label,
            name,
            required: is_truthy(obj.get("required")),
            show_if,
        })
    }

    /// Normalize the `showIf` record of the field named `owner`.
    ///
    /// The condition is dropped (field always visible) when its field or
    /// operator is empty, the operator is unknown, or it references `owner`.
    pub fn normalize_condition(raw: &Value, owner: &str) -> Option<FieldCondition> {
        let obj = raw.as_object()?;

        let field = sanitize_key(&string_at(obj, "field"));
        let operator_raw = string_at(obj, "operator");

        if field.is_empty() || operator_raw.trim().is_empty() {
            return None;
        }

        if field == owner {
            debug!(field = %owner, "Dropping self-referencing condition");
            return None;
        }

        let Some(operator) = ConditionOperator::parse(&operator_raw) else {
            debug!(field = %owner, operator = %operator_raw, "Dropping condition with unknown operator");
            return None;
        };

        Some(FieldCondition {
            field,
            operator,
            value: sanitize_text_field(&string_at(obj, "value")),
        })
    }

    /// Normalize a raw field list, keeping order.
    ///
    /// Invalid entries are dropped, as are later entries repeating an
    /// earlier field's name. A non-array input yields an empty list.
    pub fn normalize_all(raw: &Value) -> Vec<FieldDefinition> {
        let Some(items) = raw.as_array() else {
            return Vec::new();
        };

        let mut seen = HashSet::new();
        let fields: Vec<FieldDefinition> = items
            .iter()
            .filter_map(Self::normalize)
            .filter(|field| {
                let first = seen.insert(field.name.clone());
                if !first {
                    debug!(name = %field.name, "Dropping field with duplicate name");
                }
                first
            })
            .collect();

        if fields.len() != items.len() {
            debug!(
                received = items.len(),
                kept = fields.len(),
                "Field list normalized with drops"
            );
        }

        fields
    }
}

fn string_at(obj: &Map<String, Value>, key: &str) -> String {
    obj.get(key).map(scalar_to_string).unwrap_or_default()
}

fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Some(Value::String(s)) => matches!(
            s.trim().to_lowercase().as_str(),
            "1" | "true" | "on" | "yes"
        ),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_valid_field() {
        let field = FieldValidator::normalize(&json!({
            "type": "Email",
            "label": " Your <b>email</b> ",
            "name": "Your_Email",
            "required": true
        }))
        .unwrap();

        assert_eq!(field.field_type, FieldType::Email);
        assert_eq!(field.label, "Your email");
        assert_eq!(field.name, "your_email");
        assert!(field.required);
        assert!(field.show_if.is_none());
    }

    #[test]
    fn test_unknown_type_falls_back_to_text() {
        let field = FieldValidator::normalize(&json!({
            "type": "select", "label": "Pick", "name": "pick"
        }))
        .unwrap();
        assert_eq!(field.field_type, FieldType::Text);

        let field = FieldValidator::normalize(&json!({ "label": "Pick", "name": "pick" })).unwrap();
        assert_eq!(field.field_type, FieldType::Text);
    }

    #[test]
    fn test_drops_field_without_label_or_name() {
        assert!(FieldValidator::normalize(&json!({ "label": "", "name": "x" })).is_none());
        assert!(FieldValidator::normalize(&json!({ "label": "Name", "name": "---" })).is_none());
        assert!(FieldValidator::normalize(&json!({ "label": "<i></i>", "name": "x" })).is_none());
        assert!(FieldValidator::normalize(&json!("text")).is_none());
    }

    #[test]
    fn test_required_truthiness() {
        let required = |v: Value| {
            FieldValidator::normalize(&json!({ "label": "A", "name": "a", "required": v }))
                .unwrap()
                .required
        };
        assert!(required(json!("1")));
        assert!(required(json!("on")));
        assert!(required(json!(1)));
        assert!(!required(json!("0")));
        assert!(!required(json!(null)));
        assert!(!required(json!(false)));
    }

    #[test]
    fn test_condition_kept() {
        let field = FieldValidator::normalize(&json!({
            "label": "State", "name": "state",
            "showIf": { "field": "country", "operator": "equals", "value": "US" }
        }))
        .unwrap();

        let condition = field.show_if.unwrap();
        assert_eq!(condition.field, "country");
        assert_eq!(condition.operator, ConditionOperator::Equals);
        assert_eq!(condition.value, "US");
    }

    #[test]
    fn test_condition_dropped_when_incomplete() {
        for show_if in [
            json!({ "field": "", "operator": "equals", "value": "US" }),
            json!({ "field": "country", "operator": "", "value": "US" }),
            json!({ "field": "country", "operator": "matches", "value": "US" }),
            json!({ "field": "state", "operator": "equals", "value": "US" }),
            json!(null),
        ] {
            let field = FieldValidator::normalize(&json!({
                "label": "State", "name": "state", "showIf": show_if
            }))
            .unwrap();
            assert!(field.show_if.is_none(), "condition should be dropped");
        }
    }

    #[test]
    fn test_condition_symbolic_operator() {
        let field = FieldValidator::normalize(&json!({
            "label": "Beer", "name": "beer",
            "showIf": { "field": "age", "operator": ">", "value": 17 }
        }))
        .unwrap();

        let condition = field.show_if.unwrap();
        assert_eq!(condition.operator, ConditionOperator::GreaterThan);
        assert_eq!(condition.value, "17");
    }

    #[test]
    fn test_normalize_all_drops_invalid_and_duplicates() {
        let fields = FieldValidator::normalize_all(&json!([
            { "label": "", "name": "x" },
            { "label": "Valid", "name": "valid_name" },
            { "label": "Again", "name": "valid_name" },
            { "label": "Other", "name": "other", "type": "textarea" }
        ]));

        let names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["valid_name", "other"]);
        assert_eq!(fields[0].label, "Valid");
    }

    #[test]
    fn test_normalize_all_non_array() {
        assert!(FieldValidator::normalize_all(&json!(null)).is_empty());
        assert!(FieldValidator::normalize_all(&json!({ "label": "A", "name": "a" })).is_empty());
    }
}
