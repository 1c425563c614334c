use std::path::Path;
use std::sync::{Arc, Mutex};

use assert_cmd::Command;
use axum::extract::{Path as UrlPath, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use predicates::prelude::*;
use serde_json::{json, Value};
use tempfile::{tempdir, TempDir};

const TOKEN: &str = "stub-token";

#[derive(Default)]
struct Store {
    next_id: i64,
    boards: Vec<Value>,
    tasks: Vec<Value>,
}

impl Store {
    fn id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

type Shared = Arc<Mutex<Store>>;
type Reply = Result<Json<Value>, (StatusCode, Json<Value>)>;

fn authorized(headers: &HeaderMap) -> Result<(), (StatusCode, Json<Value>)> {
    let expected = format!("Bearer {TOKEN}");
    match headers.get("authorization").and_then(|v| v.to_str().ok()) {
        Some(value) if value == expected => Ok(()),
        _ => Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({"message": "Unauthorized"})),
        )),
    }
}

async fn login(Json(body): Json<Value>) -> Reply {
    if body["password"] != "password1" {
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({"message": "Invalid username or password"})),
        ));
    }
    Ok(Json(json!({
        "token": TOKEN,
        "username": body["username"],
        "role": "ADMIN",
        "email": "admin@example.com",
    })))
}

async fn profile(headers: HeaderMap) -> Reply {
    authorized(&headers)?;
    Ok(Json(
        json!({"username": "admin", "email": "admin@example.com", "role": "ADMIN"}),
    ))
}

async fn users(headers: HeaderMap) -> Reply {
    authorized(&headers)?;
    Ok(Json(json!([
        {"username": "admin", "email": "admin@example.com", "role": "ADMIN"},
        {"username": "ann", "email": "ann@example.com", "role": "USER"},
    ])))
}

async fn list_boards(State(store): State<Shared>, headers: HeaderMap) -> Reply {
    authorized(&headers)?;
    Ok(Json(Value::Array(store.lock().unwrap().boards.clone())))
}

async fn create_board(
    State(store): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply {
    authorized(&headers)?;
    let mut store = store.lock().unwrap();
    let board = json!({
        "id": store.id(),
        "name": body["name"],
        "description": body["description"],
        "columns": body["columns"],
    });
    store.boards.push(board.clone());
    Ok(Json(board))
}

async fn delete_board(
    State(store): State<Shared>,
    headers: HeaderMap,
    UrlPath(id): UrlPath<i64>,
) -> Result<StatusCode, (StatusCode, Json<Value>)> {
    authorized(&headers)?;
    let mut store = store.lock().unwrap();
    store.boards.retain(|board| board["id"] != id);
    store.tasks.retain(|task| task["boardId"] != id);
    Ok(StatusCode::NO_CONTENT)
}

async fn board_tasks(
    State(store): State<Shared>,
    headers: HeaderMap,
    UrlPath(board_id): UrlPath<i64>,
) -> Reply {
    authorized(&headers)?;
    let tasks = store
        .lock()
        .unwrap()
        .tasks
        .iter()
        .filter(|task| task["boardId"] == board_id && task["archived"] == false)
        .cloned()
        .collect();
    Ok(Json(Value::Array(tasks)))
}

async fn create_task(
    State(store): State<Shared>,
    headers: HeaderMap,
    Json(mut body): Json<Value>,
) -> Reply {
    authorized(&headers)?;
    let mut store = store.lock().unwrap();
    body["id"] = json!(store.id());
    body["archived"] = json!(false);
    store.tasks.push(body.clone());
    Ok(Json(body))
}

async fn update_task(
    State(store): State<Shared>,
    headers: HeaderMap,
    UrlPath(id): UrlPath<i64>,
    Json(body): Json<Value>,
) -> Reply {
    authorized(&headers)?;
    let mut store = store.lock().unwrap();
    let task = store
        .tasks
        .iter_mut()
        .find(|task| task["id"] == id)
        .ok_or((StatusCode::NOT_FOUND, Json(json!({"message": "Task not found"}))))?;
    if let (Some(task), Some(changes)) = (task.as_object_mut(), body.as_object()) {
        for (key, value) in changes {
            task.insert(key.clone(), value.clone());
        }
    }
    Ok(Json(task.clone()))
}

async fn notifications(headers: HeaderMap) -> Reply {
    authorized(&headers)?;
    Ok(Json(json!([
        {"id": 1, "type": "TASK_CREATED", "message": "Task created", "read": false,
         "createdAt": "2024-05-01T09:00:00"},
        {"id": 1, "type": "TASK_CREATED", "message": "Task created", "read": false,
         "createdAt": "2024-05-01T09:00:00"},
        {"id": 2, "type": "TASK_ASSIGNED", "message": "Task assigned", "read": true,
         "createdAt": "2024-05-02T09:00:00"},
    ])))
}

fn router(store: Shared) -> Router {
    Router::new()
        .route("/api/v1/login", post(login))
        .route("/api/v1/auth/profile", get(profile))
        .route("/api/v1/admin/users", get(users))
        .route("/api/v1/boards", get(list_boards).post(create_board))
        .route("/api/v1/boards/{id}", delete(delete_board))
        .route("/api/v1/tasks", post(create_task))
        .route("/api/v1/tasks/{id}", put(update_task))
        .route("/api/v1/tasks/board/{board_id}", get(board_tasks))
        .route("/api/v1/notifications", get(notifications))
        .with_state(store)
}

/// Serve the stub on a background thread with its own runtime.
fn spawn_stub() -> String {
    let (tx, rx) = std::sync::mpsc::channel();
    std::thread::spawn(move || {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            tx.send(listener.local_addr().unwrap()).unwrap();
            axum::serve(listener, router(Shared::default())).await.unwrap();
        });
    });
    format!("http://{}", rx.recv().unwrap())
}

struct Env {
    url: String,
    dir: TempDir,
}

impl Env {
    fn new() -> Self {
        Self {
            url: spawn_stub(),
            dir: tempdir().unwrap(),
        }
    }

    fn storage(&self) -> &Path {
        self.dir.path()
    }

    fn taskboard(&self) -> Command {
        let mut cmd = Command::cargo_bin("taskboard").unwrap();
        cmd.env("XDG_CONFIG_HOME", self.storage())
            .env_remove("TASKBOARD_DEBUG_LOG")
            .args(["--api-url", &self.url, "--auth-url", &self.url])
            .arg("--storage")
            .arg(self.storage().join("session.json"));
        cmd
    }

    fn run(&self, args: &[&str]) -> Value {
        let output = self
            .taskboard()
            .args(args)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        parse_json_output(&String::from_utf8_lossy(&output))
    }

    fn fail(&self, args: &[&str]) -> Value {
        let output = self
            .taskboard()
            .args(args)
            .assert()
            .failure()
            .code(1)
            .get_output()
            .stderr
            .clone();
        parse_json_output(&String::from_utf8_lossy(&output))
    }

    fn signed_in() -> Self {
        let env = Self::new();
        env.run(&["login", "--username", "admin", "--password", "password1"]);
        env
    }

    fn create_board(&self) -> String {
        let json = self.run(&[
            "board",
            "create",
            "--name",
            "Sprint 1",
            "--description",
            "First sprint",
            "--columns",
            "To Do,Doing,Done",
        ]);
        json["data"]["id"].to_string()
    }
}

fn parse_json_output(output: &str) -> Value {
    let line = output.lines().last().unwrap_or_default();
    serde_json::from_str(line).expect("Failed to parse JSON output")
}

#[test]
fn test_login_stores_session() {
    let env = Env::new();
    let json = env.run(&["login", "--username", "admin", "--password", "password1"]);
    assert!(json["success"].as_bool().unwrap());
    assert_eq!(json["data"]["role"], "ADMIN");
    assert!(env.storage().join("session.json").exists());

    let me = env.run(&["whoami"]);
    assert_eq!(me["data"]["username"], "admin");
}

#[test]
fn test_wrong_password_reports_server_message() {
    let env = Env::new();
    let json = env.fail(&["login", "--username", "admin", "--password", "nope-nope"]);
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "Invalid username or password");
}

#[test]
fn test_commands_require_a_session() {
    let env = Env::new();
    let json = env.fail(&["board", "list"]);
    assert_eq!(json["error"], "Please log in first");
}

#[test]
fn test_logout_forgets_session() {
    let env = Env::signed_in();
    env.run(&["logout"]);
    env.fail(&["board", "list"]);
}

#[test]
fn test_create_task_and_move_it_between_columns() {
    let env = Env::signed_in();
    let board_id = env.create_board();

    let created = env.run(&[
        "task",
        "create",
        "--board-id",
        &board_id,
        "--title",
        "Fix bug",
        "--priority",
        "High",
    ]);
    assert_eq!(created["data"]["status"], "To Do");
    let task_id = created["data"]["id"].to_string();

    let moved = env.run(&[
        "task", "move", "--board-id", &board_id, "--id", &task_id, "--to", "Doing",
    ]);
    assert_eq!(moved["data"]["moved"], true);

    let listed = env.run(&["task", "list", "--board-id", &board_id]);
    assert_eq!(listed["data"]["count"], 1);
    assert_eq!(listed["data"]["items"][0]["title"], "Fix bug");
    assert_eq!(listed["data"]["items"][0]["status"], "Doing");
    assert_eq!(listed["data"]["items"][0]["priority"], "High");
}

#[test]
fn test_move_to_current_column_is_a_no_op() {
    let env = Env::signed_in();
    let board_id = env.create_board();
    let created = env.run(&["task", "create", "--board-id", &board_id, "--title", "Fix bug"]);
    let task_id = created["data"]["id"].to_string();

    let moved = env.run(&[
        "task", "move", "--board-id", &board_id, "--id", &task_id, "--to", "To Do",
    ]);
    assert_eq!(moved["data"]["moved"], false);
}

#[test]
fn test_move_to_unknown_column_is_rejected() {
    let env = Env::signed_in();
    let board_id = env.create_board();
    let created = env.run(&["task", "create", "--board-id", &board_id, "--title", "Fix bug"]);
    let task_id = created["data"]["id"].to_string();

    env.taskboard()
        .args(["task", "move", "--board-id", &board_id, "--id", &task_id, "--to", "Nowhere"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not a column"));
}

#[test]
fn test_overlong_description_is_rejected_before_sending() {
    let env = Env::signed_in();
    let board_id = env.create_board();
    let description = vec!["word"; 1001].join(" ");

    let json = env.fail(&[
        "task",
        "create",
        "--board-id",
        &board_id,
        "--title",
        "Write docs",
        "--description",
        &description,
    ]);
    assert_eq!(
        json["fields"]["description"],
        "Description must be 1000 words or less"
    );

    let listed = env.run(&["task", "list", "--board-id", &board_id]);
    assert_eq!(listed["data"]["count"], 0);
}

#[test]
fn test_duplicate_board_name_is_rejected() {
    let env = Env::signed_in();
    env.create_board();

    let json = env.fail(&[
        "board",
        "create",
        "--name",
        "  sprint 1 ",
        "--description",
        "Again",
    ]);
    assert_eq!(json["fields"]["name"], "A board with this name already exists");
}

#[test]
fn test_board_delete_needs_confirmation() {
    let env = Env::signed_in();
    let board_id = env.create_board();

    env.taskboard()
        .args(["board", "delete", "--id", &board_id])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be undone"));

    let deleted = env.run(&["board", "delete", "--id", &board_id, "--yes"]);
    assert_eq!(deleted["data"]["deleted"].to_string(), board_id);
    let listed = env.run(&["board", "list"]);
    assert_eq!(listed["data"]["count"], 0);
}

#[test]
fn test_board_list_reports_completion() {
    let env = Env::signed_in();
    let board_id = env.create_board();
    let created = env.run(&["task", "create", "--board-id", &board_id, "--title", "Ship it"]);
    let task_id = created["data"]["id"].to_string();
    env.run(&["task", "move", "--board-id", &board_id, "--id", &task_id, "--to", "Done"]);

    let listed = env.run(&["board", "list"]);
    assert_eq!(listed["data"]["count"], 1);
    assert_eq!(listed["data"]["items"][0]["stats"]["completed"], 1);
    assert_eq!(listed["data"]["items"][0]["stats"]["percentage"], 100);
}

#[test]
fn test_notifications_are_deduplicated() {
    let env = Env::signed_in();
    let json = env.run(&["notification", "list"]);
    assert_eq!(json["data"]["count"], 2);
    assert_eq!(json["data"]["unread"], 1);
    assert_eq!(json["data"]["items"][0]["id"], 2);
}

#[test]
fn test_completions_generate_script() {
    Command::cargo_bin("taskboard")
        .unwrap()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("taskboard"));
}
