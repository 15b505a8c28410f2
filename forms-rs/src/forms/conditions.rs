//! Conditional visibility evaluation

use crate::forms::types::{ConditionOperator, FieldCondition, FieldDefinition, FieldValues, FormDefinition};

/// Decides whether fields are active for a given set of values
pub struct ConditionEvaluator;

impl ConditionEvaluator {
    /// Whether `field` is visible given the current `values`.
    ///
    /// Fields without a condition are always visible. A condition naming a
    /// field with no value compares against the empty string; a condition
    /// naming no field at all is ignored.
    pub fn is_visible(field: &FieldDefinition, values: &FieldValues) -> bool {
        match &field.show_if {
            Some(condition) if !condition.field.is_empty() => Self::evaluate(condition, values),
            _ => true,
        }
    }

    /// Evaluate a single condition
    pub fn evaluate(condition: &FieldCondition, values: &FieldValues) -> bool {
        let current = values
            .get(&condition.field)
            .map(String::as_str)
            .unwrap_or("");
        let target = condition.value.as_str();

        match condition.operator {
            ConditionOperator::Equals => current == target,
            ConditionOperator::NotEquals => current != target,
            ConditionOperator::Contains => current.contains(target),
            ConditionOperator::GreaterThan => {
                compare_numbers(current, target, |a, b| a > b)
            }
            ConditionOperator::LessThan => {
                compare_numbers(current, target, |a, b| a < b)
            }
        }
    }

    /// Visible fields of `form`, in field order
    pub fn visible_fields<'a>(
        form: &'a FormDefinition,
        values: &FieldValues,
    ) -> Vec<&'a FieldDefinition> {
        form.fields
            .iter()
            .filter(|field| Self::is_visible(field, values))
            .collect()
    }

    /// Names of the visible fields of `form`, in field order
    pub fn visible_names(form: &FormDefinition, values: &FieldValues) -> Vec<String> {
        Self::visible_fields(form, values)
            .into_iter()
            .map(|field| field.name.clone())
            .collect()
    }
}

fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

fn compare_numbers(current: &str, target: &str, cmp: impl Fn(f64, f64) -> bool) -> bool {
    match (parse_number(current), parse_number(target)) {
        (Some(a), Some(b)) => cmp(a, b),
        _ => false,
    }
}
