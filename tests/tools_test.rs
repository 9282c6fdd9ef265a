//! Integration tests for the Open WebUI tools, run against a mock upstream.
//!
//! Run with: cargo test --test tools_test

mod common;

use common::{DEFAULT_KEY, MockOpenWebUi, call};
use openwebui_mcp_server::domains::tools::{ErrorKind, ToolRegistry};
use serde_json::{Value, json};
use std::time::Duration;
use tokio::net::TcpListener;

fn user() -> Value {
    json!({"id": "u1", "name": "Ada", "email": "ada@example.com", "role": "admin"})
}

fn group() -> Value {
    json!({"id": "g1", "name": "Engineering", "description": "", "user_ids": ["u1"]})
}

fn model() -> Value {
    json!({"id": "helper", "name": "Helper", "base_model_id": "llama3:8b", "meta": {}, "params": {}})
}

fn knowledge_base() -> Value {
    json!({"id": "k1", "name": "Docs", "description": "Manuals"})
}

fn chat() -> Value {
    json!({"id": "c1", "title": "Hello", "chat": {"messages": [{"role": "user", "content": "hi"}]}})
}

fn tool() -> Value {
    json!({"id": "weather", "name": "Weather", "meta": {}})
}

fn function() -> Value {
    json!({"id": "filter", "name": "Filter", "type": "filter", "is_active": true})
}

/// One tool call against a well-formed upstream reply.
struct Case {
    name: &'static str,
    args: Value,
    method: &'static str,
    path: &'static str,
    reply: Value,
    /// The `data` of the success envelope.
    expected: Value,
}

fn case(
    name: &'static str,
    args: Value,
    method: &'static str,
    path: &'static str,
    reply: Value,
    expected: Value,
) -> Case {
    Case {
        name,
        args,
        method,
        path,
        reply,
        expected,
    }
}

/// A case whose typed record serializes back to the upstream reply.
fn same(
    name: &'static str,
    args: Value,
    method: &'static str,
    path: &'static str,
    reply: Value,
) -> Case {
    let expected = reply.clone();
    case(name, args, method, path, reply, expected)
}

fn deleted(id: &str) -> Value {
    json!({"id": id, "deleted": true})
}

/// Every tool, with the request it must produce and the payload it must return.
fn cases() -> Vec<Case> {
    vec![
        same("get_current_user", json!({}), "GET", "/api/v1/auths/", user()),
        same(
            "list_users",
            json!({}),
            "GET",
            "/api/v1/users/",
            json!({"users": [user()], "total": 1}),
        ),
        same("get_user", json!({"user_id": "u1"}), "GET", "/api/v1/users/u1", user()),
        same(
            "update_user_role",
            json!({"user_id": "u1", "role": "user"}),
            "POST",
            "/api/v1/users/u1/update/role",
            user(),
        ),
        case(
            "delete_user",
            json!({"user_id": "u1"}),
            "DELETE",
            "/api/v1/users/u1",
            json!(true),
            deleted("u1"),
        ),
        same("list_groups", json!({}), "GET", "/api/v1/groups/", json!([group()])),
        same(
            "create_group",
            json!({"name": "Engineering"}),
            "POST",
            "/api/v1/groups/create",
            group(),
        ),
        same("get_group", json!({"group_id": "g1"}), "GET", "/api/v1/groups/id/g1", group()),
        same(
            "update_group",
            json!({"group_id": "g1", "name": "Eng"}),
            "POST",
            "/api/v1/groups/id/g1/update",
            group(),
        ),
        same(
            "add_user_to_group",
            json!({"group_id": "g1", "user_id": "u1"}),
            "POST",
            "/api/v1/groups/id/g1/users/add",
            group(),
        ),
        same(
            "remove_user_from_group",
            json!({"group_id": "g1", "user_id": "u1"}),
            "POST",
            "/api/v1/groups/id/g1/users/remove",
            group(),
        ),
        case(
            "delete_group",
            json!({"group_id": "g1"}),
            "DELETE",
            "/api/v1/groups/id/g1",
            json!(true),
            deleted("g1"),
        ),
        case(
            "list_models",
            json!({}),
            "GET",
            "/api/v1/models/",
            json!({"data": [model()]}),
            json!([model()]),
        ),
        same(
            "get_model",
            json!({"model_id": "llama3:8b"}),
            "GET",
            "/api/v1/models/llama3:8b",
            model(),
        ),
        same(
            "create_model",
            json!({"id": "helper", "name": "Helper", "base_model_id": "llama3:8b"}),
            "POST",
            "/api/v1/models/create",
            model(),
        ),
        same(
            "update_model",
            json!({"model_id": "helper", "temperature": 0.2}),
            "POST",
            "/api/v1/models/helper/update",
            model(),
        ),
        case(
            "delete_model",
            json!({"model_id": "helper"}),
            "DELETE",
            "/api/v1/models/helper",
            json!(true),
            deleted("helper"),
        ),
        case(
            "list_knowledge_bases",
            json!({}),
            "GET",
            "/api/v1/knowledge/",
            json!({"items": [knowledge_base()], "total": 1}),
            json!([knowledge_base()]),
        ),
        same(
            "get_knowledge_base",
            json!({"knowledge_id": "k1"}),
            "GET",
            "/api/v1/knowledge/k1",
            knowledge_base(),
        ),
        same(
            "create_knowledge_base",
            json!({"name": "Docs"}),
            "POST",
            "/api/v1/knowledge/create",
            knowledge_base(),
        ),
        case(
            "delete_knowledge_base",
            json!({"knowledge_id": "k1"}),
            "DELETE",
            "/api/v1/knowledge/k1",
            json!(true),
            deleted("k1"),
        ),
        same(
            "list_chats",
            json!({}),
            "GET",
            "/api/v1/chats/",
            json!([{"id": "c1", "title": "Hello"}]),
        ),
        case(
            "get_chat",
            json!({"chat_id": "c1"}),
            "GET",
            "/api/v1/chats/c1",
            chat(),
            json!({
                "id": "c1",
                "title": "Hello",
                "chat": {"messages": [{"role": "user", "content": "hi"}]},
                "archived": false,
                "pinned": false
            }),
        ),
        case(
            "delete_chat",
            json!({"chat_id": "c1"}),
            "DELETE",
            "/api/v1/chats/c1",
            json!(true),
            deleted("c1"),
        ),
        case(
            "delete_all_chats",
            json!({}),
            "DELETE",
            "/api/v1/chats/",
            json!(true),
            json!({"deleted": true}),
        ),
        same("list_tools", json!({}), "GET", "/api/v1/tools/", json!([tool()])),
        same(
            "get_tool",
            json!({"tool_id": "weather"}),
            "GET",
            "/api/v1/tools/id/weather",
            tool(),
        ),
        case(
            "list_functions",
            json!({}),
            "GET",
            "/api/v1/functions/",
            json!([function()]),
            json!([function_record()]),
        ),
        case(
            "get_function",
            json!({"function_id": "filter"}),
            "GET",
            "/api/v1/functions/id/filter",
            function(),
            function_record(),
        ),
        same(
            "get_system_config",
            json!({}),
            "GET",
            "/api/v1/configs/",
            json!({"ui": {"enable_signup": false}}),
        ),
    ]
}

/// `function()` as returned to the caller, with defaults filled in.
fn function_record() -> Value {
    json!({
        "id": "filter",
        "name": "Filter",
        "type": "filter",
        "is_active": true,
        "is_global": false,
        "meta": {}
    })
}

#[tokio::test]
async fn test_cases_cover_every_tool() {
    let mock = MockOpenWebUi::spawn().await;
    let registry = mock.registry();
    let mut names = registry.tool_names();
    names.sort();
    let mut covered: Vec<&str> = cases().iter().map(|c| c.name).collect();
    covered.sort();
    assert_eq!(names, covered);
}

#[tokio::test]
async fn test_every_tool_hits_its_endpoint_and_returns_the_record() {
    let mock = MockOpenWebUi::spawn().await;
    let registry = mock.registry();

    for case in cases() {
        mock.reply_json(200, case.reply);
        let envelope = call(&registry, case.name, case.args).await;
        assert!(envelope.success, "{} failed: {:?}", case.name, envelope.error);
        assert!(envelope.error.is_none());
        assert_eq!(envelope.data, Some(case.expected), "{}", case.name);

        let request = mock.last_request();
        assert_eq!(request.method, case.method, "{}", case.name);
        assert_eq!(request.path, case.path, "{}", case.name);
        assert_eq!(
            request.authorization.as_deref(),
            Some(format!("Bearer {}", DEFAULT_KEY).as_str())
        );
        if case.method == "POST" {
            assert!(request.body.is_some(), "{} sent no body", case.name);
        }
    }
    assert_eq!(mock.request_count(), cases().len());
}

#[tokio::test]
async fn test_forbidden_is_permission_denied_after_one_request() {
    for case in cases() {
        let mock = MockOpenWebUi::spawn().await;
        mock.reply_json(403, json!({"detail": "You do not have permission"}));
        let envelope = call(&mock.registry(), case.name, case.args).await;

        assert!(!envelope.success);
        let error = envelope.error.unwrap();
        assert_eq!(error.kind, ErrorKind::PermissionDenied, "{}", case.name);
        assert_eq!(error.status, Some(403));
        assert_eq!(mock.request_count(), 1, "{} retried", case.name);
    }
}

#[tokio::test]
async fn test_unauthorized_is_permission_denied() {
    let mock = MockOpenWebUi::spawn().await;
    mock.reply_json(401, json!({"detail": "Not authenticated"}));
    let envelope = call(&mock.registry(), "list_users", json!({})).await;
    let error = envelope.error.unwrap();
    assert_eq!(error.kind, ErrorKind::PermissionDenied);
    assert_eq!(error.status, Some(401));
}

#[tokio::test]
async fn test_get_and_delete_map_404_to_not_found() {
    let mock = MockOpenWebUi::spawn().await;
    mock.reply_json(404, json!({"detail": "Not found"}));
    let registry = mock.registry();

    let lookups = cases()
        .into_iter()
        .filter(|c| c.name.starts_with("get_") || c.name.starts_with("delete_"));
    for case in lookups {
        let envelope = call(&registry, case.name, case.args).await;
        assert_eq!(envelope.error.unwrap().kind, ErrorKind::NotFound, "{}", case.name);
    }
}

#[tokio::test]
async fn test_missing_required_arguments_never_reach_upstream() {
    let mock = MockOpenWebUi::spawn().await;
    let registry = mock.registry();

    let with_required = cases()
        .into_iter()
        .filter(|c| c.args.as_object().is_some_and(|a| !a.is_empty()));
    for case in with_required {
        let envelope = call(&registry, case.name, json!({})).await;
        assert_eq!(
            envelope.error.unwrap().kind,
            ErrorKind::InvalidArgument,
            "{}",
            case.name
        );
    }
    assert_eq!(mock.request_count(), 0);
}

#[tokio::test]
async fn test_missing_arguments_are_all_named() {
    let mock = MockOpenWebUi::spawn().await;
    let envelope = call(&mock.registry(), "create_model", json!({"name": "Helper"})).await;
    let message = envelope.error.unwrap().message;
    assert!(message.contains("id"));
    assert!(message.contains("base_model_id"));
    assert_eq!(mock.request_count(), 0);
}

#[tokio::test]
async fn test_list_users_is_repeatable() {
    let mock = MockOpenWebUi::spawn().await;
    mock.reply_json(200, json!([user()]));
    let registry = mock.registry();

    let first = call(&registry, "list_users", json!({})).await;
    let second = call(&registry, "list_users", json!({})).await;
    assert!(first.success);
    assert_eq!(first, second);
    assert_eq!(first.data.unwrap()["total"], 1);
}

#[tokio::test]
async fn test_credential_override_applies_to_one_call() {
    let mock = MockOpenWebUi::spawn().await;
    mock.reply_json(200, json!([]));
    let registry = mock.registry();

    call(&registry, "list_groups", json!({"api_key": "caller-key"})).await;
    call(&registry, "list_groups", json!({})).await;

    let requests = mock.requests();
    assert_eq!(requests[0].authorization.as_deref(), Some("Bearer caller-key"));
    assert_eq!(
        requests[1].authorization.as_deref(),
        Some(format!("Bearer {}", DEFAULT_KEY).as_str())
    );
}

#[tokio::test]
async fn test_create_group_returns_upstream_record() {
    let mock = MockOpenWebUi::spawn().await;
    mock.echo_with(json!({"id": "grp_123"}));

    let envelope = call(
        &mock.registry(),
        "create_group",
        json!({"name": "Engineering", "description": "Eng team"}),
    )
    .await;

    assert!(envelope.success);
    let data = envelope.data.unwrap();
    assert_eq!(data["id"], "grp_123");
    assert_eq!(data["name"], "Engineering");
    assert_eq!(data["description"], "Eng team");

    let request = mock.last_request();
    assert_eq!(request.method, "POST");
    assert_eq!(request.path, "/api/v1/groups/create");
}

#[tokio::test]
async fn test_delete_missing_chat_names_the_chat() {
    let mock = MockOpenWebUi::spawn().await;
    mock.reply_json(404, json!({"detail": "We could not find what you're looking for :/"}));

    let envelope = call(&mock.registry(), "delete_chat", json!({"chat_id": "c1"})).await;
    let error = envelope.error.unwrap();
    assert_eq!(error.kind, ErrorKind::NotFound);
    assert!(error.message.contains("c1"), "message: {}", error.message);

    let request = mock.last_request();
    assert_eq!(request.method, "DELETE");
    assert_eq!(request.path, "/api/v1/chats/c1");
}

#[tokio::test]
async fn test_server_error_is_upstream_failure() {
    let mock = MockOpenWebUi::spawn().await;
    mock.reply_json(500, json!({"detail": "database is locked"}));

    let envelope = call(&mock.registry(), "get_model", json!({"model_id": "helper"})).await;
    let error = envelope.error.unwrap();
    assert_eq!(error.kind, ErrorKind::UpstreamFailure);
    assert_eq!(error.status, Some(500));
    assert!(error.message.contains("database is locked"));
    assert_eq!(mock.request_count(), 1);
}

#[tokio::test]
async fn test_malformed_success_body_is_response_shape() {
    let mock = MockOpenWebUi::spawn().await;
    let registry = mock.registry();

    mock.reply_raw(200, "<html>not json</html>");
    let envelope = call(&registry, "get_user", json!({"user_id": "u1"})).await;
    assert_eq!(envelope.error.unwrap().kind, ErrorKind::ResponseShape);

    mock.reply_json(200, json!({"unexpected": true}));
    let envelope = call(&registry, "get_user", json!({"user_id": "u1"})).await;
    assert_eq!(envelope.error.unwrap().kind, ErrorKind::ResponseShape);
}

#[tokio::test]
async fn test_slow_upstream_times_out() {
    let mock = MockOpenWebUi::spawn().await;
    mock.delay(Duration::from_secs(2));
    let registry = ToolRegistry::new(mock.client(Duration::from_millis(200)));

    let envelope = call(&registry, "list_chats", json!({})).await;
    let error = envelope.error.unwrap();
    assert_eq!(error.kind, ErrorKind::Transport);
    assert!(error.timed_out);
}

#[tokio::test]
async fn test_unreachable_upstream_is_transport() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = openwebui_mcp_server::domains::openwebui::OpenWebUiClient::new(
        &format!("http://{}", addr),
        None,
        Duration::from_secs(2),
    )
    .unwrap();
    let registry = ToolRegistry::new(std::sync::Arc::new(client));

    let envelope = call(&registry, "list_models", json!({"api_key": "k"})).await;
    let error = envelope.error.unwrap();
    assert_eq!(error.kind, ErrorKind::Transport);
    assert!(!error.timed_out);
}

#[tokio::test]
async fn test_create_model_stores_system_prompt_in_meta() {
    let mock = MockOpenWebUi::spawn().await;
    mock.reply_json(200, model());

    let envelope = call(
        &mock.registry(),
        "create_model",
        json!({
            "id": "helper",
            "name": "Helper",
            "base_model_id": "llama3:8b",
            "system_prompt": "Be brief.",
            "temperature": 0.3
        }),
    )
    .await;
    assert!(envelope.success);

    let body = mock.last_request().body.unwrap();
    assert_eq!(body["id"], "helper");
    assert_eq!(body["base_model_id"], "llama3:8b");
    assert_eq!(body["meta"]["system"], "Be brief.");
    assert_eq!(body["params"]["temperature"], 0.3);
}

#[tokio::test]
async fn test_update_role_sends_role() {
    let mock = MockOpenWebUi::spawn().await;
    mock.reply_json(200, user());

    let envelope = call(
        &mock.registry(),
        "update_user_role",
        json!({"user_id": "u1", "role": "pending"}),
    )
    .await;
    assert!(envelope.success);

    let request = mock.last_request();
    assert_eq!(request.path, "/api/v1/users/u1/update/role");
    assert_eq!(request.body.unwrap()["role"], "pending");
}

#[tokio::test]
async fn test_invalid_role_is_rejected_locally() {
    let mock = MockOpenWebUi::spawn().await;
    let envelope = call(
        &mock.registry(),
        "update_user_role",
        json!({"user_id": "u1", "role": "superuser"}),
    )
    .await;
    let error = envelope.error.unwrap();
    assert_eq!(error.kind, ErrorKind::InvalidArgument);
    assert!(error.message.contains("role"));
    assert_eq!(mock.request_count(), 0);
}

#[tokio::test]
async fn test_out_of_range_max_tokens_is_named() {
    let mock = MockOpenWebUi::spawn().await;
    let registry = mock.registry();

    for max_tokens in [json!(-1), json!(5_000_000_000u64)] {
        let envelope = call(
            &registry,
            "update_model",
            json!({"model_id": "helper", "max_tokens": max_tokens}),
        )
        .await;
        let error = envelope.error.unwrap();
        assert_eq!(error.kind, ErrorKind::InvalidArgument);
        assert!(error.message.contains("max_tokens"), "message: {}", error.message);
    }
    assert_eq!(mock.request_count(), 0);
}

#[tokio::test]
async fn test_null_optional_fields_are_accepted() {
    let mock = MockOpenWebUi::spawn().await;
    mock.reply_json(
        200,
        json!([{"id": "k1", "name": "Docs", "description": "d", "files": null}]),
    );

    let envelope = call(&mock.registry(), "list_knowledge_bases", json!({})).await;
    assert!(envelope.success, "{:?}", envelope.error);
    assert_eq!(
        envelope.data.unwrap(),
        json!([{"id": "k1", "name": "Docs", "description": "d"}])
    );
}

#[tokio::test]
async fn test_malformed_list_item_is_response_shape() {
    let mock = MockOpenWebUi::spawn().await;
    mock.reply_json(200, json!([group(), {"id": "g2"}]));

    let envelope = call(&mock.registry(), "list_groups", json!({})).await;
    let error = envelope.error.unwrap();
    assert_eq!(error.kind, ErrorKind::ResponseShape);
    assert!(error.message.contains("/api/v1/groups/"), "message: {}", error.message);
}
