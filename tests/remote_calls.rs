mod common;
use common::{StubServer, TEST_KEY};

use serde_json::Value;
use wip_mcp::errors::ToolErrorKind;

fn output_json(output: &wip_mcp::mcp::envelope::ToolOutput) -> Value {
    serde_json::from_str(output.text().expect("text block")).expect("pretty JSON")
}

#[tokio::test]
async fn create_comment_posts_todo_comment_with_key_in_query() {
    let stub = StubServer::start(200, r#"{"id":"c1","body":"nice"}"#).await;
    let app = stub.app();

    let out = app
        .tool_executor
        .execute(
            "wip_create_comment",
            serde_json::json!({ "todo_id": "t1", "body": "nice" }),
        )
        .await
        .expect("call succeeds");

    let req = stub.single_request();
    assert_eq!(req.method, "POST");
    assert_eq!(req.target, format!("/v1/comments?api_key={}", TEST_KEY));
    assert_eq!(req.header("content-type"), Some("application/json"));
    assert_eq!(
        req.body_json(),
        serde_json::json!({
            "commentable_type": "Todo",
            "commentable_id": "t1",
            "body": "nice"
        })
    );
    assert_eq!(output_json(&out), serde_json::json!({"id": "c1", "body": "nice"}));
    assert!(out.text().unwrap().contains('\n'), "output is pretty-printed");
}

#[tokio::test]
async fn user_todos_forwards_only_supplied_filters() {
    let stub = StubServer::start(200, "[]").await;
    let app = stub.app();

    app.tool_executor
        .execute(
            "wip_get_user_todos",
            serde_json::json!({ "username": "ada", "since": "2024-01" }),
        )
        .await
        .expect("call succeeds");

    let req = stub.single_request();
    assert_eq!(req.method, "GET");
    assert_eq!(
        req.target,
        format!("/v1/users/ada/todos?since=2024-01&api_key={}", TEST_KEY)
    );
    assert!(req.body.is_empty());
}

#[tokio::test]
async fn pagination_parameters_precede_api_key() {
    let stub = StubServer::start(200, "[]").await;
    let app = stub.app();

    app.tool_executor
        .execute(
            "get_my_projects",
            serde_json::json!({ "limit": 10, "starting_after": "p9" }),
        )
        .await
        .expect("alias call succeeds");

    let req = stub.single_request();
    assert_eq!(
        req.target,
        format!("/v1/users/me/projects?limit=10&starting_after=p9&api_key={}", TEST_KEY)
    );
}

#[tokio::test]
async fn identifiers_are_percent_encoded_in_path() {
    let stub = StubServer::start(200, "[]").await;
    let app = stub.app();

    app.tool_executor
        .execute(
            "wip_get_todo_comments",
            serde_json::json!({ "todo_id": "a/b c?d" }),
        )
        .await
        .expect("call succeeds");

    let req = stub.single_request();
    assert!(
        req.target.starts_with("/v1/todos/a%2Fb%20c%3Fd/comments?"),
        "{}",
        req.target
    );
}

#[tokio::test]
async fn no_content_becomes_ok_marker() {
    let stub = StubServer::start(204, "").await;
    let app = stub.app();

    let out = app
        .tool_executor
        .execute("wip_delete_reaction", serde_json::json!({ "reaction_id": "r1" }))
        .await
        .expect("delete succeeds");

    let req = stub.single_request();
    assert_eq!(req.method, "DELETE");
    assert_eq!(req.target, format!("/v1/reactions/r1?api_key={}", TEST_KEY));
    assert_eq!(output_json(&out), serde_json::json!({ "ok": true }));
}

#[tokio::test]
async fn json_error_field_becomes_message() {
    let stub = StubServer::start(404, r#"{"error":"Not found"}"#).await;
    let app = stub.app();

    let err = app
        .tool_executor
        .execute("wip_get_todo", serde_json::json!({ "todo_id": "missing" }))
        .await
        .unwrap_err();

    assert_eq!(err.message, "WIP API error (404): Not found");
    assert_eq!(err.kind, ToolErrorKind::NotFound);
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn plain_text_error_is_used_verbatim() {
    let stub = StubServer::start(403, "Forbidden").await;
    let app = stub.app();

    let err = app
        .tool_executor
        .execute("wip_get_me", Value::Null)
        .await
        .unwrap_err();

    assert_eq!(err.message, "WIP API error (403): Forbidden");
    assert_eq!(err.kind, ToolErrorKind::Denied);
}

#[tokio::test]
async fn unstructured_error_falls_back_to_status() {
    let stub = StubServer::start(500, r#"{"detail":"boom"}"#).await;
    let app = stub.app();

    let err = app
        .tool_executor
        .execute("wip_get_me", Value::Null)
        .await
        .unwrap_err();

    assert_eq!(err.message, "WIP API error (500): HTTP 500");
    assert_eq!(err.status(), Some(500));
}

#[tokio::test]
async fn success_body_is_passed_through_unchanged() {
    let body = r#"{"id":"t1","nested":{"list":[1,2,3]},"flag":false}"#;
    let stub = StubServer::start(200, body).await;
    let app = stub.app();

    let out = app
        .tool_executor
        .execute("wip_get_todo", serde_json::json!({ "todo_id": "t1" }))
        .await
        .expect("call succeeds");

    let expected: Value = serde_json::from_str(body).unwrap();
    assert_eq!(output_json(&out), expected);
}

#[tokio::test]
async fn non_json_success_body_is_returned_as_string() {
    let stub = StubServer::start(200, "hello").await;
    let app = stub.app();

    let out = app
        .tool_executor
        .execute("wip_get_me", Value::Null)
        .await
        .expect("call succeeds");

    assert_eq!(output_json(&out), Value::String("hello".to_string()));
}

#[tokio::test]
async fn invalid_arguments_never_reach_the_network() {
    let stub = StubServer::start(200, "{}").await;
    let app = stub.app();

    let err = app
        .tool_executor
        .execute("wip_create_todo", serde_json::json!({ "attachments": [] }))
        .await
        .unwrap_err();

    assert_eq!(err.kind, ToolErrorKind::InvalidParams);
    assert!(stub.requests().is_empty());
}

#[tokio::test]
async fn create_todo_omits_empty_attachments() {
    let stub = StubServer::start(201, r#"{"id":"t2"}"#).await;
    let app = stub.app();

    app.tool_executor
        .execute(
            "wip_create_todo",
            serde_json::json!({ "body": "shipped #proj", "attachments": [] }),
        )
        .await
        .expect("call succeeds");

    let req = stub.single_request();
    assert_eq!(req.body_json(), serde_json::json!({ "body": "shipped #proj" }));
}

#[tokio::test]
async fn fractional_limit_is_forwarded_verbatim() {
    let stub = StubServer::start(200, "[]").await;
    let app = stub.app();

    app.tool_executor
        .execute("wip_get_my_todos", serde_json::json!({ "limit": 2.5 }))
        .await
        .expect("remote decides on odd page sizes");

    let req = stub.single_request();
    assert_eq!(
        req.target,
        format!("/v1/users/me/todos?limit=2.5&api_key={}", TEST_KEY)
    );
}

#[tokio::test]
async fn zero_limit_reaches_the_remote() {
    let stub = StubServer::start(200, "[]").await;
    let app = stub.app();

    app.tool_executor
        .execute(
            "wip_get_project_todos",
            serde_json::json!({ "project_id": "p1", "limit": 0 }),
        )
        .await
        .expect("call succeeds");

    let req = stub.single_request();
    assert_eq!(
        req.target,
        format!("/v1/projects/p1/todos?limit=0&api_key={}", TEST_KEY)
    );
}

#[tokio::test]
async fn empty_comment_body_is_sent_and_remote_error_surfaces() {
    let stub = StubServer::start(422, r#"{"error":"Body can't be blank"}"#).await;
    let app = stub.app();

    let err = app
        .tool_executor
        .execute(
            "wip_create_comment",
            serde_json::json!({ "todo_id": "t1", "body": "" }),
        )
        .await
        .unwrap_err();

    assert_eq!(stub.single_request().body_json()["body"], "");
    assert_eq!(err.message, "WIP API error (422): Body can't be blank");
}

#[tokio::test]
async fn empty_error_body_yields_empty_message() {
    let stub = StubServer::start(500, "").await;
    let app = stub.app();

    let err = app
        .tool_executor
        .execute("wip_get_me", Value::Null)
        .await
        .unwrap_err();

    assert_eq!(err.message, "WIP API error (500): ");
}

#[tokio::test]
async fn reserved_characters_in_username_are_escaped() {
    let stub = StubServer::start(200, "{}").await;
    let app = stub.app();

    app.tool_executor
        .execute("wip_get_user", serde_json::json!({ "username": "a;b:c@d&e=f+g,h$i" }))
        .await
        .expect("call succeeds");

    let req = stub.single_request();
    assert_eq!(
        req.target,
        format!("/v1/users/a%3Bb%3Ac%40d%26e%3Df%2Bg%2Ch%24i?api_key={}", TEST_KEY)
    );
}
