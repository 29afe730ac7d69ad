//! Task board lifecycle: posting, taking, and completing tasks.

use axum::http::StatusCode;
use serde_json::{Value, json};

use kasilink_integration_tests::{TOKEN_A, TOKEN_B, TestApp};

async fn post_task(app: &TestApp, token: &str) -> Value {
    let response = app
        .post(
            "/api/tasks",
            Some(token),
            json!({
                "title": "Deliver parcel",
                "description": "Pick up from X, drop at Y",
                "budget": "150",
                "location": "Soweto",
            }),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED, "{}", response.message());
    response.body
}

#[tokio::test]
async fn test_task_lifecycle() {
    let app = TestApp::new();

    // User A posts a task: open and unassigned.
    let task = post_task(&app, TOKEN_A).await;
    assert_eq!(task["status"], "open");
    assert_eq!(task["assigneeId"], Value::Null);
    assert_eq!(task["creatorId"], "user-a");
    assert_eq!(task["budget"], "150");
    let uri = format!("/api/tasks/{}/status", task["id"]);

    // User B takes it: assignee recorded.
    let taken = app
        .patch(&uri, Some(TOKEN_B), json!({"status": "in_progress"}))
        .await;
    assert_eq!(taken.status, StatusCode::OK);
    assert_eq!(taken.body["status"], "in_progress");
    assert_eq!(taken.body["assigneeId"], "user-b");

    // Re-taking an in-progress task is an invalid transition.
    let retaken = app
        .patch(&uri, Some(TOKEN_A), json!({"status": "in_progress"}))
        .await;
    assert_eq!(retaken.status, StatusCode::CONFLICT);

    // Only the creator signs off on completion.
    let by_assignee = app
        .patch(&uri, Some(TOKEN_B), json!({"status": "completed"}))
        .await;
    assert_eq!(by_assignee.status, StatusCode::FORBIDDEN);

    let completed = app
        .patch(&uri, Some(TOKEN_A), json!({"status": "completed"}))
        .await;
    assert_eq!(completed.status, StatusCode::OK);
    assert_eq!(completed.body["status"], "completed");
    assert_eq!(completed.body["assigneeId"], "user-b");

    // Completed is terminal.
    let reopened = app
        .patch(&uri, Some(TOKEN_B), json!({"status": "in_progress"}))
        .await;
    assert_eq!(reopened.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_creator_cannot_take_own_task() {
    let app = TestApp::new();
    let task = post_task(&app, TOKEN_A).await;
    let uri = format!("/api/tasks/{}/status", task["id"]);

    let response = app
        .patch(&uri, Some(TOKEN_A), json!({"status": "in_progress"}))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    // The task is untouched.
    let listed = app.get("/api/tasks", None).await;
    assert_eq!(listed.body[0]["status"], "open");
    assert_eq!(listed.body[0]["assigneeId"], Value::Null);
}

#[tokio::test]
async fn test_creator_may_complete_untaken_task() {
    let app = TestApp::new();
    let task = post_task(&app, TOKEN_A).await;
    let uri = format!("/api/tasks/{}/status", task["id"]);

    let completed = app
        .patch(&uri, Some(TOKEN_A), json!({"status": "completed"}))
        .await;
    assert_eq!(completed.status, StatusCode::OK);
    assert_eq!(completed.body["status"], "completed");
    assert_eq!(completed.body["assigneeId"], Value::Null);
}

#[tokio::test]
async fn test_budget_must_be_positive() {
    let app = TestApp::new();
    let response = app
        .post(
            "/api/tasks",
            Some(TOKEN_A),
            json!({
                "title": "Free labour",
                "description": "d",
                "budget": "0",
                "location": "here",
            }),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_anonymous_task_access() {
    let app = TestApp::new();
    post_task(&app, TOKEN_A).await;

    // Listing is public.
    let listed = app.get("/api/tasks", None).await;
    assert_eq!(listed.status, StatusCode::OK);
    assert_eq!(listed.body.as_array().map(Vec::len), Some(1));

    // Posting and transitions are not.
    let anonymous_post = app
        .post(
            "/api/tasks",
            None,
            json!({
                "title": "T",
                "description": "d",
                "budget": "10",
                "location": "here",
            }),
        )
        .await;
    assert_eq!(anonymous_post.status, StatusCode::UNAUTHORIZED);

    let anonymous_patch = app
        .patch("/api/tasks/1/status", None, json!({"status": "in_progress"}))
        .await;
    assert_eq!(anonymous_patch.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_transition_on_missing_task_is_404() {
    let app = TestApp::new();
    let response = app
        .patch("/api/tasks/999/status", Some(TOKEN_A), json!({"status": "completed"}))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
