use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, put};
use axum::{Json, Router};
use serde_json::{json, Value};
use taskboard_client::{Services, TaskApi};
use taskboard_core::{AppConfig, TaskboardError};
use taskboard_domain::{Priority, TaskDraft};

#[derive(Clone, Default)]
struct Seen {
    headers: Arc<Mutex<Vec<(Option<String>, Option<String>)>>>,
    queries: Arc<Mutex<Vec<HashMap<String, String>>>>,
}

impl Seen {
    fn record(&self, headers: &HeaderMap) {
        let value = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(String::from)
        };
        self.headers
            .lock()
            .unwrap()
            .push((value("authorization"), value("x-request-id")));
    }
}

async fn board_tasks(
    State(seen): State<Seen>,
    headers: HeaderMap,
    Path(board_id): Path<i64>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    seen.record(&headers);
    seen.queries.lock().unwrap().push(query);
    Json(json!([
        {"id": 1, "title": "Fix bug", "description": null, "status": "To Do",
         "priority": "High", "assignedTo": "", "boardId": board_id, "archived": false,
         "createdAt": "2024-05-01T09:00:00", "updatedAt": null}
    ]))
}

async fn update_task(
    State(seen): State<Seen>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    seen.record(&headers);
    if body["status"] == "Nowhere" {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({"message": "Invalid status"})),
        ));
    }
    Ok(Json(json!({
        "id": id, "title": body["title"], "status": body["status"],
        "priority": body["priority"], "boardId": body["boardId"]
    })))
}

async fn archived() -> (StatusCode, &'static str) {
    (StatusCode::BAD_GATEWAY, "<html>upstream down</html>")
}

async fn spawn_stub() -> (String, Seen) {
    let seen = Seen::default();
    let app = Router::new()
        .route("/api/v1/tasks/board/{board_id}", get(board_tasks))
        .route("/api/v1/tasks/{id}", put(update_task))
        .route("/api/v1/tasks/archived", get(archived))
        .with_state(seen.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), seen)
}

fn services(api_url: &str, token: Option<&str>) -> Services {
    let config = AppConfig {
        api_url: api_url.to_string(),
        auth_url: api_url.to_string(),
        ..AppConfig::default()
    };
    Services::remote(&config, token).unwrap()
}

fn draft(status: &str) -> TaskDraft {
    TaskDraft {
        title: "Fix bug".into(),
        description: String::new(),
        status: status.into(),
        priority: Priority::High,
        assigned_to: String::new(),
        board_id: 3,
    }
}

#[tokio::test]
async fn test_requests_carry_token_and_request_id() {
    let (url, seen) = spawn_stub().await;
    let services = services(&url, Some("tok-123"));

    let tasks = services.tasks.board_tasks(3, true).await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].board_id, 3);
    assert_eq!(tasks[0].description, None);

    let headers = seen.headers.lock().unwrap().clone();
    assert_eq!(headers[0].0.as_deref(), Some("Bearer tok-123"));
    assert!(headers[0].1.as_deref().is_some_and(|id| id.len() == 36));
    assert_eq!(
        seen.queries.lock().unwrap()[0].get("archived").map(String::as_str),
        Some("false")
    );
}

#[tokio::test]
async fn test_update_returns_server_representation() {
    let (url, _) = spawn_stub().await;
    let services = services(&url, Some("tok"));
    let task = services.tasks.update_task(1, &draft("Doing")).await.unwrap();
    assert_eq!(task.status, "Doing");
    assert_eq!(task.priority, Priority::High);
}

#[tokio::test]
async fn test_error_status_carries_server_message() {
    let (url, _) = spawn_stub().await;
    let services = services(&url, None);
    let err = services
        .tasks
        .update_task(1, &draft("Nowhere"))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(400));
    assert_eq!(err.user_message(), "Invalid status");
}

#[tokio::test]
async fn test_non_json_error_body_is_previewed() {
    let (url, _) = spawn_stub().await;
    let err = services(&url, None).tasks.archived_tasks().await.unwrap_err();
    assert_eq!(err.status(), Some(502));
    assert_eq!(err.user_message(), "<html>upstream down</html>");
}

#[tokio::test]
async fn test_unreachable_server_is_a_network_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let err = services(&url, None)
        .tasks
        .board_tasks(1, false)
        .await
        .unwrap_err();
    assert!(matches!(err, TaskboardError::Network(_)));
    assert_eq!(err.user_message(), "Network error. Please try again.");
}

#[tokio::test]
async fn test_trait_object_is_usable_directly() {
    let (url, _) = spawn_stub().await;
    let services = services(&url, None);
    let api: &dyn TaskApi = services.tasks.as_ref();
    assert_eq!(api.board_tasks(9, false).await.unwrap()[0].board_id, 9);
}
