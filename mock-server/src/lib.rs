use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, put},
    Json, Router,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;

const TITLE_MIN_CHARS: usize = 4;
const TITLE_MAX_CHARS: usize = 200;
const NOTES_MAX_CHARS: usize = 1000;
const CATEGORY_MAX_CHARS: usize = 60;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub notes: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub category: Option<String>,
    pub important: bool,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTodo {
    #[serde(default)]
    pub title: Option<String>,
    pub notes: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub category: Option<String>,
    pub important: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTodo {
    pub title: Option<String>,
    pub notes: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub category: Option<String>,
    pub important: Option<bool>,
    pub completed: Option<bool>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ApiError {
    Validation(String),
    NotFound(i64),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Validation(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::NotFound(id) => (StatusCode::NOT_FOUND, format!("Todo not found: {id}")),
        };
        let body = json!({
            "error": status.canonical_reason().unwrap_or_default(),
            "message": message,
        });
        (status, Json(body)).into_response()
    }
}

#[derive(Debug)]
pub struct Store {
    todos: BTreeMap<i64, Todo>,
    next_id: i64,
}

impl Default for Store {
    fn default() -> Self {
        Self {
            todos: BTreeMap::new(),
            next_id: 1,
        }
    }
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/api/todos", get(list_todos).post(create_todo))
        .route("/api/todos/{id}", put(update_todo).delete(delete_todo))
        .route("/api/todos/{id}/toggle-completed", patch(toggle_completed))
        .route("/api/todos/{id}/toggle-important", patch(toggle_important))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn check_len(field: &str, value: Option<&str>, max: usize) -> Result<(), ApiError> {
    match value {
        Some(v) if v.chars().count() > max => Err(ApiError::Validation(format!(
            "{field} must be at most {max} characters"
        ))),
        _ => Ok(()),
    }
}

fn validate_create(input: &CreateTodo) -> Result<String, ApiError> {
    let title = input.title.as_deref().unwrap_or_default();
    if title.trim().is_empty() {
        return Err(ApiError::Validation("title must not be blank".to_string()));
    }
    if title.chars().count() < TITLE_MIN_CHARS {
        return Err(ApiError::Validation(format!(
            "title is too short (minimum {TITLE_MIN_CHARS} characters)"
        )));
    }
    check_len("title", Some(title), TITLE_MAX_CHARS)?;
    check_len("notes", input.notes.as_deref(), NOTES_MAX_CHARS)?;
    check_len("category", input.category.as_deref(), CATEGORY_MAX_CHARS)?;
    Ok(title.to_string())
}

fn validate_update(input: &UpdateTodo) -> Result<(), ApiError> {
    check_len("title", input.title.as_deref(), TITLE_MAX_CHARS)?;
    check_len("notes", input.notes.as_deref(), NOTES_MAX_CHARS)?;
    check_len("category", input.category.as_deref(), CATEGORY_MAX_CHARS)
}

async fn list_todos(State(db): State<Db>) -> Json<Vec<Todo>> {
    let store = db.read().await;
    Json(store.todos.values().cloned().collect())
}

async fn create_todo(
    State(db): State<Db>,
    Json(input): Json<CreateTodo>,
) -> Result<(StatusCode, Json<Todo>), ApiError> {
    let title = validate_create(&input)?;
    let mut store = db.write().await;
    let now = Utc::now();
    let todo = Todo {
        id: store.next_id,
        title,
        notes: input.notes,
        due_date: input.due_date,
        category: input.category,
        important: input.important.unwrap_or(false),
        completed: false,
        created_at: now,
        updated_at: now,
    };
    store.next_id += 1;
    store.todos.insert(todo.id, todo.clone());
    info!(id = todo.id, "created todo");
    Ok((StatusCode::CREATED, Json(todo)))
}

async fn update_todo(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(input): Json<UpdateTodo>,
) -> Result<Json<Todo>, ApiError> {
    validate_update(&input)?;
    let mut store = db.write().await;
    let todo = store.todos.get_mut(&id).ok_or(ApiError::NotFound(id))?;
    if let Some(title) = input.title.filter(|t| !t.trim().is_empty()) {
        todo.title = title;
    }
    if let Some(notes) = input.notes {
        todo.notes = Some(notes);
    }
    if let Some(due_date) = input.due_date {
        todo.due_date = Some(due_date);
    }
    if let Some(category) = input.category {
        todo.category = Some(category);
    }
    if let Some(important) = input.important {
        todo.important = important;
    }
    if let Some(completed) = input.completed {
        todo.completed = completed;
    }
    todo.updated_at = Utc::now();
    info!(id, "updated todo");
    Ok(Json(todo.clone()))
}

async fn toggle_completed(
    State(db): State<Db>,
    Path(id): Path<i64>,
) -> Result<Json<Todo>, ApiError> {
    let mut store = db.write().await;
    let todo = store.todos.get_mut(&id).ok_or(ApiError::NotFound(id))?;
    todo.completed = !todo.completed;
    todo.updated_at = Utc::now();
    info!(id, completed = todo.completed, "toggled completed");
    Ok(Json(todo.clone()))
}

async fn toggle_important(
    State(db): State<Db>,
    Path(id): Path<i64>,
) -> Result<Json<Todo>, ApiError> {
    let mut store = db.write().await;
    let todo = store.todos.get_mut(&id).ok_or(ApiError::NotFound(id))?;
    todo.important = !todo.important;
    todo.updated_at = Utc::now();
    info!(id, important = todo.important, "toggled important");
    Ok(Json(todo.clone()))
}

/// Deleting an id that does not exist still answers 204.
async fn delete_todo(State(db): State<Db>, Path(id): Path<i64>) -> StatusCode {
    if db.write().await.todos.remove(&id).is_some() {
        info!(id, "deleted todo");
    }
    StatusCode::NO_CONTENT
}
