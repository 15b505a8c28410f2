//! Form definition types and data structures

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// Submitted (or sample) values keyed by field machine name
pub type FieldValues = HashMap<String, String>;

/// Input control kind of a field
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum FieldType {
    #[default]
    Text,
    Email,
    Textarea,
}

impl FieldType {
    /// Parse a type name, falling back to `Text` for anything unrecognized
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "email" => FieldType::Email,
            "textarea" => FieldType::Textarea,
            _ => FieldType::Text,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Email => "email",
            FieldType::Textarea => "textarea",
        }
    }
}

impl From<String> for FieldType {
    fn from(s: String) -> Self {
        FieldType::parse(&s)
    }
}

/// Comparison applied by a visibility condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "String")]
pub enum ConditionOperator {
    Equals,
    NotEquals,
    Contains,
    GreaterThan,
    LessThan,
}

impl ConditionOperator {
    /// Parse an operator name.
    ///
    /// Accepts the camelCase names plus the symbolic `>` / `<` forms and
    /// snake_case spellings older editors produced.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            ">" => return Some(ConditionOperator::GreaterThan),
            "<" => return Some(ConditionOperator::LessThan),
            "=" | "==" => return Some(ConditionOperator::Equals),
            "!=" => return Some(ConditionOperator::NotEquals),
            _ => {}
        }

        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();

        match normalized.as_str() {
            "equals" => Some(ConditionOperator::Equals),
            "notequals" => Some(ConditionOperator::NotEquals),
            "contains" => Some(ConditionOperator::Contains),
            "greaterthan" => Some(ConditionOperator::GreaterThan),
            "lessthan" => Some(ConditionOperator::LessThan),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConditionOperator::Equals => "equals",
            ConditionOperator::NotEquals => "notEquals",
            ConditionOperator::Contains => "contains",
            ConditionOperator::GreaterThan => "greaterThan",
            ConditionOperator::LessThan => "lessThan",
        }
    }
}

impl TryFrom<String> for ConditionOperator {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        ConditionOperator::parse(&s).ok_or_else(|| format!("unknown condition operator: {}", s))
    }
}

/// Visibility condition gating a field on a sibling field's value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldCondition {
    /// Name of the sibling field whose value is compared
    pub field: String,
    pub operator: ConditionOperator,
    #[serde(default)]
    pub value: String,
}

/// A single field of a form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
    /// Display label (plain text)
    pub label: String,
    /// Machine name, `[a-z0-9_]`, unique within the form
    pub name: String,
    #[serde(default)]
    pub required: bool,
    /// Absent means always visible
    #[serde(
        rename = "showIf",
        default,
        deserialize_with = "stored_condition",
        skip_serializing_if = "Option::is_none"
    )]
    pub show_if: Option<FieldCondition>,
}

/// Read a stored `showIf`; a condition without a field or with an unusable
/// operator reads as absent instead of failing the whole definition.
fn stored_condition<'de, D>(deserializer: D) -> Result<Option<FieldCondition>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .and_then(|value| serde_json::from_value::<FieldCondition>(value).ok())
        .filter(|condition| !condition.field.trim().is_empty()))
}

/// Email notification sent on submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailAction {
    /// Recipient(s), comma separated
    pub to: String,
    #[serde(default = "default_subject")]
    pub subject: String,
    /// Body with `{{fieldName}}` and `{{all}}` placeholders
    #[serde(default = "default_template")]
    pub template: String,
}

pub const DEFAULT_SUBJECT: &str = "New form submission";
pub const DEFAULT_TEMPLATE: &str = "You have a new submission\n\n{{all}}";

fn default_subject() -> String {
    DEFAULT_SUBJECT.to_string()
}

fn default_template() -> String {
    DEFAULT_TEMPLATE.to_string()
}

/// Actions attached to a form
///
/// Email actions are always a list in memory; the stored shape of `email`
/// is `null`, a single object or an array depending on the count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormActions {
    #[serde(default, with = "email_shape")]
    pub email: Vec<EmailAction>,
}

/// A complete form definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormDefinition {
    /// Opaque identifier, generated at creation
    pub id: String,
    pub name: String,
    /// Render order
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
    #[serde(default)]
    pub actions: FormActions,
}

impl FormDefinition {
    /// Look up a field by machine name
    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Body of a create or update request.
///
/// `fields` and `actions` are kept untyped; they go through the permissive
/// normalization pass rather than strict deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FormRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub fields: serde_json::Value,
    #[serde(default)]
    pub actions: serde_json::Value,
}

/// Convert a JSON object of submitted values into `FieldValues`.
///
/// Strings are taken as-is, numbers and booleans use their JSON text,
/// arrays are joined with ", " and null/objects become empty strings.
pub fn field_values_from_json(values: &serde_json::Map<String, serde_json::Value>) -> FieldValues {
    values
        .iter()
        .map(|(k, v)| (k.clone(), scalar_to_string(v)))
        .collect()
}

/// Text form of a scalar JSON value
pub(crate) fn scalar_to_string(value: &serde_json::Value) -> String {
    use serde_json::Value;

    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(items) => items
            .iter()
            .map(scalar_to_string)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        Value::Null | Value::Object(_) => String::new(),
    }
}

/// Serde adapter for the null / object / array shape of `actions.email`
pub(crate) mod email_shape {
    use super::EmailAction;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(EmailAction),
        Many(Vec<EmailAction>),
    }

    pub fn serialize<S>(actions: &[EmailAction], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match actions {
            [] => serializer.serialize_none(),
            [single] => single.serialize(serializer),
            many => many.serialize(serializer),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<EmailAction>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
            None => Vec::new(),
            Some(OneOrMany::One(action)) => vec![action],
            Some(OneOrMany::Many(actions)) => actions,
        })
    }
}
