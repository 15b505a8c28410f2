//! Dynamic form engine
//!
//! Form definitions with typed fields, single-condition visibility rules and
//! email notification actions.

pub mod actions;
pub mod conditions;
pub mod manager;
pub mod placeholders;
pub mod render;
pub mod sanitize;
pub mod types;
pub mod validator;

pub use actions::{ActionCompiler, CompiledNotification};
pub use conditions::ConditionEvaluator;
pub use manager::FormManager;
pub use placeholders::PlaceholderRenderer;
pub use render::{EmbedReference, FormRenderer};
pub use types::{
    ConditionOperator, EmailAction, FieldCondition, FieldDefinition, FieldType, FieldValues,
    FormActions, FormDefinition, FormRequest,
};
pub use validator::FieldValidator;
