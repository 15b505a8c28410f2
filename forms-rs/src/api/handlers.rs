//! API request handlers for form definitions

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::error;

use crate::error::FormError;
use crate::forms::types::field_values_from_json;
use crate::forms::{
    ActionCompiler, CompiledNotification, ConditionEvaluator, FormDefinition, FormManager,
    FormRenderer, FormRequest,
};

/// Shared application state
pub struct AppState {
    pub forms: FormManager,
}

/// Response envelope for single-form operations
#[derive(Debug, Serialize)]
pub struct FormResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form: Option<FormDefinition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FormResponse {
    pub fn form(form: FormDefinition) -> Self {
        Self {
            success: true,
            form: Some(form),
            error: None,
        }
    }

    pub fn done() -> Self {
        Self {
            success: true,
            form: None,
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            form: None,
            error: Some(msg.into()),
        }
    }
}

/// Error half of every handler result
pub type ApiError = (StatusCode, Json<FormResponse>);

/// Sample or submitted values for preview endpoints
#[derive(Debug, Default, Deserialize)]
pub struct ValuesRequest {
    #[serde(default)]
    pub values: Map<String, Value>,
}

#[derive(Debug, Serialize)]
pub struct VisibilityResponse {
    pub success: bool,
    pub visible: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct NotificationsResponse {
    pub success: bool,
    pub notifications: Vec<CompiledNotification>,
}

#[derive(Debug, Deserialize)]
pub struct EmbedQuery {
    pub shortcode: String,
}

fn error_response(e: FormError) -> ApiError {
    match e {
        FormError::Validation(_) => (
            StatusCode::BAD_REQUEST,
            Json(FormResponse::error(e.to_string())),
        ),
        FormError::NotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(FormResponse::error(e.to_string())),
        ),
        _ => {
            error!("Form operation failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(FormResponse::error(e.to_string())),
            )
        }
    }
}

fn body_rejection(rejection: JsonRejection) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(FormResponse::error(format!(
            "Invalid request body: {}",
            rejection.body_text()
        ))),
    )
}

/// GET /health - Health check
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "forms-rs",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /api/forms - List all forms
pub async fn list_forms(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<FormDefinition>>, ApiError> {
    let forms = state.forms.list().await.map_err(error_response)?;
    Ok(Json(forms))
}

/// GET /api/forms/:id - Get a specific form
pub async fn get_form(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<FormResponse>, ApiError> {
    let form = state.forms.get(&id).await.map_err(error_response)?;
    Ok(Json(FormResponse::form(form)))
}

/// POST /api/forms - Create a new form
pub async fn create_form(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<FormRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<FormResponse>), ApiError> {
    let Json(request) = payload.map_err(body_rejection)?;

    let form = state.forms.create(request).await.map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(FormResponse::form(form))))
}

/// PUT /api/forms/:id - Replace a form's name, fields and actions
pub async fn update_form(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<FormRequest>, JsonRejection>,
) -> Result<Json<FormResponse>, ApiError> {
    let Json(request) = payload.map_err(body_rejection)?;

    let form = state
        .forms
        .update(&id, request)
        .await
        .map_err(error_response)?;
    Ok(Json(FormResponse::form(form)))
}

/// DELETE /api/forms/:id - Delete a form
pub async fn delete_form(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<FormResponse>, ApiError> {
    state.forms.remove(&id).await.map_err(error_response)?;
    Ok(Json(FormResponse::done()))
}

/// POST /api/forms/:id/duplicate - Copy a form under a new ID
pub async fn duplicate_form(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<FormResponse>), ApiError> {
    let form = state.forms.duplicate(&id).await.map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(FormResponse::form(form))))
}

/// POST /api/forms/:id/visibility - Visible field names for sample values
pub async fn form_visibility(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<ValuesRequest>, JsonRejection>,
) -> Result<Json<VisibilityResponse>, ApiError> {
    let Json(request) = payload.map_err(body_rejection)?;
    let form = state.forms.get(&id).await.map_err(error_response)?;

    let values = field_values_from_json(&request.values);
    Ok(Json(VisibilityResponse {
        success: true,
        visible: ConditionEvaluator::visible_names(&form, &values),
    }))
}

/// POST /api/forms/:id/notifications - Preview compiled notifications
pub async fn form_notifications(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<ValuesRequest>, JsonRejection>,
) -> Result<Json<NotificationsResponse>, ApiError> {
    let Json(request) = payload.map_err(body_rejection)?;
    let form = state.forms.get(&id).await.map_err(error_response)?;

    let values = field_values_from_json(&request.values);
    Ok(Json(NotificationsResponse {
        success: true,
        notifications: ActionCompiler::compile(&form, &values),
    }))
}

/// GET /api/forms/:id/render - Input skeleton; empty for unknown forms
pub async fn render_form(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Html<String>, ApiError> {
    let form = match state.forms.get(&id).await {
        Ok(form) => form,
        Err(FormError::NotFound(_)) => return Ok(Html(String::new())),
        Err(e) => return Err(error_response(e)),
    };

    let html = FormRenderer::render(&form).map_err(error_response)?;
    Ok(Html(html))
}

/// GET /api/embed?shortcode=... - Resolve an `mt_form` embed reference
pub async fn render_embed(
    State(state): State<Arc<AppState>>,
    Query(query): Query<EmbedQuery>,
) -> Html<String> {
    Html(FormRenderer::render_embed(&state.forms, &query.shortcode).await)
}
