//! Controller sessions against the live server.
//!
//! # Design
//! Starts the real API server on a random port, then drives full
//! `TodoController` sessions over HTTP with ureq: every issued operation is
//! executed for real and its response resolved back in. Covers the happy
//! path end-to-end plus the optimistic rollback when two sessions race on
//! the same todo.

use std::sync::Arc;

use axum::http::HeaderValue;
use todo_core::{HttpMethod, HttpRequest, HttpResponse, TodoController};
use todo_server::store::TodoStore;

/// Start the server with an in-memory store on a random port and return
/// its base URL.
fn start_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            let store = Arc::new(TodoStore::in_memory());
            todo_server::run(
                listener,
                store,
                HeaderValue::from_static("http://localhost:3000"),
            )
            .await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

/// Execute an `HttpRequest` using ureq and return an `HttpResponse`.
///
/// Disables ureq's automatic status-code-as-error behavior so 4xx/5xx
/// responses are returned as data rather than `Err`, letting the
/// controller handle status interpretation.
fn execute(req: &HttpRequest) -> HttpResponse {
    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();

    let mut response = match (req.method, &req.body) {
        (HttpMethod::Get, _) => agent.get(&req.path).call(),
        (HttpMethod::Delete, _) => agent.delete(&req.path).call(),
        (HttpMethod::Post, Some(body)) => agent
            .post(&req.path)
            .content_type("application/json")
            .send(body.as_bytes()),
        (HttpMethod::Post, None) => agent.post(&req.path).send_empty(),
        (HttpMethod::Put, Some(body)) => agent
            .put(&req.path)
            .content_type("application/json")
            .send(body.as_bytes()),
        (HttpMethod::Put, None) => agent.put(&req.path).send_empty(),
    }
    .expect("HTTP transport error");

    let status = response.status().as_u16();
    let body = response.body_mut().read_to_string().unwrap_or_default();

    HttpResponse {
        status,
        headers: Vec::new(),
        body,
    }
}

/// Fresh controller with its initial load already executed and resolved.
fn connect(base_url: &str) -> TodoController {
    let (mut controller, load) = TodoController::new(base_url);
    let response = execute(load.request());
    controller.resolve(load, response);
    controller
}

fn contents(controller: &TodoController) -> Vec<&str> {
    controller
        .state()
        .todos
        .iter()
        .map(|t| t.content.as_str())
        .collect()
}

#[test]
fn full_session_lifecycle() {
    let base = start_server();

    // Step 1: connect — list starts empty.
    let mut controller = connect(&base);
    assert!(controller.state().todos.is_empty(), "expected empty list");
    assert!(!controller.state().is_loading);
    assert!(controller.state().error.is_none());

    // Step 2: submit two todos.
    let op = controller.submit("make portfolio").unwrap();
    let response = execute(op.request());
    controller.resolve(op, response);

    let op = controller.submit("training coding test").unwrap();
    let response = execute(op.request());
    controller.resolve(op, response);

    assert_eq!(
        contents(&controller),
        vec!["make portfolio", "training coding test"]
    );
    let first_id = controller.state().todos[0].id.clone();
    let second_id = controller.state().todos[1].id.clone();
    assert!(!first_id.is_empty(), "server must assign ids");
    assert_ne!(first_id, second_id);

    // Step 3: edit the first todo and save new content.
    let copy = controller.begin_edit(&first_id).unwrap();
    assert_eq!(copy, "make portfolio");

    let op = controller.update(&first_id, "updated content").unwrap();
    let response = execute(op.request());
    controller.resolve(op, response);

    assert_eq!(
        contents(&controller),
        vec!["updated content", "training coding test"]
    );
    assert!(controller.state().editing_id.is_none());
    assert!(controller.state().error.is_none());

    // Step 4: complete both todos.
    let op = controller.complete(&first_id).unwrap();
    let response = execute(op.request());
    controller.resolve(op, response);
    assert_eq!(contents(&controller), vec!["training coding test"]);

    let op = controller.complete(&second_id).unwrap();
    let response = execute(op.request());
    controller.resolve(op, response);
    assert!(controller.state().todos.is_empty());
    assert!(controller.state().error.is_none());

    // Step 5: a fresh session sees the same empty server state.
    let verifier = connect(&base);
    assert!(verifier.state().todos.is_empty());
}

#[test]
fn racing_sessions_roll_back_the_loser() {
    let base = start_server();

    // Seed one todo through the first session.
    let mut first = connect(&base);
    let op = first.submit("shared todo").unwrap();
    let response = execute(op.request());
    first.resolve(op, response);
    let id = first.state().todos[0].id.clone();

    // Second session loads the same todo.
    let mut second = connect(&base);
    assert_eq!(contents(&second), vec!["shared todo"]);

    // First session completes it on the server.
    let op = first.complete(&id).unwrap();
    let response = execute(op.request());
    first.resolve(op, response);
    assert!(first.state().todos.is_empty());
    assert!(first.state().error.is_none());

    // Second session tries the same: the optimistic removal happens, then
    // the 404 answer rolls it back and raises the banner.
    let op = second.complete(&id).unwrap();
    assert!(second.state().todos.is_empty());

    let response = execute(op.request());
    second.resolve(op, response);
    assert_eq!(contents(&second), vec!["shared todo"]);
    assert_eq!(
        second.state().error.as_deref(),
        Some("Failed to complete todo")
    );

    // The stale edit path behaves the same way over PUT.
    let op = second.update(&id, "still here?").unwrap();
    let response = execute(op.request());
    second.resolve(op, response);
    assert_eq!(contents(&second), vec!["shared todo"]);
    assert_eq!(
        second.state().error.as_deref(),
        Some("Failed to update todo")
    );
}
