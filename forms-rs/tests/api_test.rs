//! Integration tests for the forms REST API

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use forms_rs::api::{router, AppState};
use forms_rs::forms::FormManager;
use forms_rs::storage::{MemoryOptionStore, OptionFormRepository};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn app() -> Router {
    let store = Arc::new(MemoryOptionStore::new());
    let repo = OptionFormRepository::new(store, "main_tree_forms");
    router(Arc::new(AppState {
        forms: FormManager::new(Arc::new(repo)),
    }))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

async fn send_json(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let (status, bytes) = send(app, method, uri, body).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn create_contact_form(app: &Router) -> Value {
    let (status, body) = send_json(
        app,
        Method::POST,
        "/api/forms",
        Some(json!({
            "name": "Contact",
            "fields": [
                { "type": "text", "label": "Country", "name": "country" },
                { "type": "text", "label": "State", "name": "state",
                  "showIf": { "field": "country", "operator": "equals", "value": "US" } },
                { "type": "email", "label": "Email", "name": "email", "required": true }
            ],
            "actions": {
                "email": { "to": "owner@example.com", "subject": "From {{email}}" }
            }
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    body["form"].clone()
}

#[tokio::test]
async fn test_health() {
    let app = app();
    let (status, body) = send_json(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_list_starts_empty() {
    let app = app();
    let (status, body) = send_json(&app, Method::GET, "/api/forms", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_create_and_get() {
    let app = app();
    let form = create_contact_form(&app).await;
    let id = form["id"].as_str().unwrap();

    let (status, body) = send_json(&app, Method::GET, &format!("/api/forms/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["form"], form);
    assert_eq!(body["form"]["actions"]["email"]["to"], "owner@example.com");

    let (_, list) = send_json(&app, Method::GET, "/api/forms", None).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_create_without_name_is_bad_request() {
    let app = app();
    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/forms",
        Some(json!({ "name": "", "fields": [] })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("name"));
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let app = app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/forms")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{ not json"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_unknown_form_is_not_found() {
    let app = app();

    for (method, uri) in [
        (Method::GET, "/api/forms/form_missing"),
        (Method::DELETE, "/api/forms/form_missing"),
        (Method::POST, "/api/forms/form_missing/duplicate"),
    ] {
        let (status, body) = send_json(&app, method, uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", uri);
        assert_eq!(body["success"], false);
        assert!(body["error"].is_string());
    }

    let (status, _) = send_json(
        &app,
        Method::PUT,
        "/api/forms/form_missing",
        Some(json!({ "name": "X", "fields": [] })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_delete_duplicate() {
    let app = app();
    let form = create_contact_form(&app).await;
    let id = form["id"].as_str().unwrap().to_string();

    let (status, body) = send_json(
        &app,
        Method::PUT,
        &format!("/api/forms/{}", id),
        Some(json!({
            "name": "Contact v2",
            "fields": [{ "type": "textarea", "label": "Message", "name": "message" }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["form"]["name"], "Contact v2");
    assert_eq!(body["form"]["fields"].as_array().unwrap().len(), 1);
    assert!(body["form"]["actions"]["email"].is_null());

    let (status, body) = send_json(
        &app,
        Method::POST,
        &format!("/api/forms/{}/duplicate", id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["form"]["name"], "Contact v2 (Copy)");
    assert_ne!(body["form"]["id"], json!(id));

    let (status, body) = send_json(&app, Method::DELETE, &format!("/api/forms/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true }));

    let (_, list) = send_json(&app, Method::GET, "/api/forms", None).await;
    let names: Vec<&str> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Contact v2 (Copy)"]);
}

#[tokio::test]
async fn test_visibility_preview() {
    let app = app();
    let form = create_contact_form(&app).await;
    let uri = format!("/api/forms/{}/visibility", form["id"].as_str().unwrap());

    let (status, body) = send_json(
        &app,
        Method::POST,
        &uri,
        Some(json!({ "values": { "country": "US" } })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["visible"], json!(["country", "state", "email"]));

    let (_, body) = send_json(&app, Method::POST, &uri, Some(json!({}))).await;
    assert_eq!(body["visible"], json!(["country", "email"]));
}

#[tokio::test]
async fn test_notifications_preview() {
    let app = app();
    let form = create_contact_form(&app).await;
    let uri = format!("/api/forms/{}/notifications", form["id"].as_str().unwrap());

    let (status, body) = send_json(
        &app,
        Method::POST,
        &uri,
        Some(json!({ "values": { "country": "FR", "email": "ada@example.com" } })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let notification = &body["notifications"][0];
    assert_eq!(notification["to"], json!(["owner@example.com"]));
    assert_eq!(notification["subject"], "From ada@example.com");
    assert_eq!(
        notification["body"],
        "You have a new submission\n\nCountry: FR\nState: \nEmail: ada@example.com"
    );
}

#[tokio::test]
async fn test_render_and_embed() {
    let app = app();
    let form = create_contact_form(&app).await;
    let id = form["id"].as_str().unwrap();

    let (status, html) = send(&app, Method::GET, &format!("/api/forms/{}/render", id), None).await;
    let html = String::from_utf8(html).unwrap();
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains(&format!("data-form-id=\"{}\"", id)));
    assert!(html.contains("type=\"email\""));

    let (status, html) = send(&app, Method::GET, "/api/forms/form_missing/render", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.is_empty());

    let (status, embedded) = send(
        &app,
        Method::GET,
        &format!("/api/embed?shortcode=mt_form%20id%3D%22{}%22", id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(String::from_utf8(embedded).unwrap().contains("name=\"state\""));

    let (_, embedded) = send(
        &app,
        Method::GET,
        "/api/embed?shortcode=mt_form%20id%3D%22nope%22",
        None,
    )
    .await;
    assert!(embedded.is_empty());
}
