use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, Todo};
use serde_json::Value;
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(String::new())
        .unwrap()
}

// --- list ---

#[tokio::test]
async fn list_todos_empty() {
    let resp = app().oneshot(empty_request("GET", "/api/todos")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let todos: Vec<Todo> = body_json(resp).await;
    assert!(todos.is_empty());
}

// --- create ---

#[tokio::test]
async fn create_todo_returns_201() {
    let resp = app()
        .oneshot(json_request("POST", "/api/todos", r#"{"title":"Buy milk"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let todo: Todo = body_json(resp).await;
    assert_eq!(todo.id, 1);
    assert_eq!(todo.title, "Buy milk");
    assert!(!todo.completed);
    assert!(!todo.important);
}

#[tokio::test]
async fn create_todo_keeps_optional_fields() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/api/todos",
            r#"{"title":"Submit thesis","notes":"ch. 3","dueDate":"2026-01-20","category":"uni","important":true}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let todo: Value = body_json(resp).await;
    assert_eq!(todo["dueDate"], "2026-01-20");
    assert_eq!(todo["category"], "uni");
    assert_eq!(todo["important"], true);
    assert_eq!(todo["completed"], false);
}

#[tokio::test]
async fn create_todo_short_title_returns_400_with_message() {
    let resp = app()
        .oneshot(json_request("POST", "/api/todos", r#"{"title":"abc"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = body_json(resp).await;
    assert_eq!(body["error"], "Bad Request");
    assert!(body["message"].as_str().unwrap().contains("minimum 4"));
}

#[tokio::test]
async fn create_todo_missing_title_returns_400() {
    let resp = app()
        .oneshot(json_request("POST", "/api/todos", r#"{"notes":"x"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = body_json(resp).await;
    assert_eq!(body["message"], "title must not be blank");
}

#[tokio::test]
async fn create_todo_malformed_json_is_plain_text() {
    let resp = app()
        .oneshot(json_request("POST", "/api/todos", r#"{"title":"#))
        .await
        .unwrap();

    assert!(resp.status().is_client_error());
    let body = body_bytes(resp).await;
    assert!(serde_json::from_slice::<Value>(&body).is_err());
    assert!(!body.is_empty());
}

// --- update / toggles ---

#[tokio::test]
async fn update_todo_not_found() {
    let resp = app()
        .oneshot(json_request("PUT", "/api/todos/42", r#"{"title":"Nope!"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = body_json(resp).await;
    assert_eq!(body["message"], "Todo not found: 42");
}

#[tokio::test]
async fn toggle_completed_not_found() {
    let resp = app()
        .oneshot(empty_request("PATCH", "/api/todos/7/toggle-completed"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn bad_id_returns_400() {
    let resp = app()
        .oneshot(empty_request("PATCH", "/api/todos/abc/toggle-important"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- delete ---

#[tokio::test]
async fn delete_missing_todo_returns_204() {
    let resp = app()
        .oneshot(empty_request("DELETE", "/api/todos/9"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(resp).await.is_empty());
}

// --- full lifecycle ---

#[tokio::test]
async fn crud_lifecycle() {
    use tower::Service;

    let mut app = app().into_service();

    // create
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("POST", "/api/todos", r#"{"title":"Walk dog"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Todo = body_json(resp).await;
    let id = created.id;

    // toggle completed
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("PATCH", &format!("/api/todos/{id}/toggle-completed")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let toggled: Todo = body_json(resp).await;
    assert!(toggled.completed);
    assert!(toggled.updated_at >= created.updated_at);

    // toggle important
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("PATCH", &format!("/api/todos/{id}/toggle-important")))
        .await
        .unwrap();
    let toggled: Todo = body_json(resp).await;
    assert!(toggled.important);

    // update: blank title is ignored, category applied
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "PUT",
            &format!("/api/todos/{id}"),
            r#"{"title":"  ","category":"home","completed":false}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Todo = body_json(resp).await;
    assert_eq!(updated.title, "Walk dog");
    assert_eq!(updated.category.as_deref(), Some("home"));
    assert!(!updated.completed);
    assert!(updated.important); // unchanged

    // list
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", "/api/todos"))
        .await
        .unwrap();
    let todos: Vec<Todo> = body_json(resp).await;
    assert_eq!(todos.len(), 1);
    assert_eq!(todos[0].id, id);

    // delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("DELETE", &format!("/api/todos/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    // list after delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", "/api/todos"))
        .await
        .unwrap();
    let todos: Vec<Todo> = body_json(resp).await;
    assert!(todos.is_empty());
}
