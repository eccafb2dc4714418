use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use migration::MigratorTrait;
use sea_orm::Database;
use serde_json::{Value, json};
use tower::ServiceExt;

use engine::Engine;
use server::{ServerState, TokenSigner, router};

async fn app() -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db).build().await.unwrap();

    router(ServerState {
        engine: Arc::new(engine),
        tokens: Arc::new(TokenSigner::new("integration-secret", 30)),
    })
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn register(app: &Router, name: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({
            "name": name,
            "email": format!("{name}@example.com"),
            "password": "password123",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["data"]["token"].as_str().unwrap().to_string()
}

async fn type_id(app: &Router, token: &str, name: &str) -> i64 {
    let (_, body) = send(app, Method::GET, "/api/types", Some(token), None).await;
    body["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|t| t["name"] == name)
        .and_then(|t| t["id"].as_i64())
        .unwrap()
}

async fn user_id(app: &Router, token: &str) -> String {
    let (_, body) = send(app, Method::GET, "/api/auth/me", Some(token), None).await;
    body["data"]["id"].as_str().unwrap().to_string()
}

async fn add(app: &Router, token: &str, type_name: &str, amount: f64, date: &str) -> Value {
    let type_id = type_id(app, token, type_name).await;
    let (status, body) = send(
        app,
        Method::POST,
        "/api/expenses",
        Some(token),
        Some(json!({ "type_id": type_id, "amount": amount, "date": date })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["data"].clone()
}

#[tokio::test]
async fn health_is_public() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "ok");
}

#[tokio::test]
async fn expense_routes_require_a_valid_token() {
    let app = app().await;

    let (status, body) = send(&app, Method::GET, "/api/expenses", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);

    let (status, _) = send(&app, Method::GET, "/api/expenses", Some("forged.token"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn register_login_and_me() {
    let app = app().await;
    register(&app, "alice").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "email": "ALICE@example.com", "password": "password123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["data"]["token"].as_str().unwrap().to_string();

    let (status, body) = send(&app, Method::GET, "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], "alice@example.com");

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "email": "alice@example.com", "password": "wrong-password" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn register_validates_input() {
    let app = app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({ "email": "bob@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["fields"], json!(["name", "password"]));

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({ "name": "Bob", "email": "bob@example.com", "password": "short" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["fields"], json!(["password"]));

    register(&app, "bob").await;
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({ "name": "Bob", "email": "bob@example.com", "password": "password123" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn expense_crud_is_scoped_to_the_caller() {
    let app = app().await;
    let alice = register(&app, "alice").await;
    let bob = register(&app, "bob").await;

    let expense = add(&app, &alice, "Food", 12.5, "2024-01-05").await;
    assert_eq!(expense["type"], "Food");
    let uri = format!("/api/expenses/{}", expense["id"].as_str().unwrap());

    let (status, body) = send(&app, Method::GET, &uri, Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["amount"], 12.5);

    for method in [Method::GET, Method::DELETE] {
        let (status, _) = send(&app, method, &uri, Some(&bob), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
    let food = type_id(&app, &bob, "Food").await;
    let (status, _) = send(
        &app,
        Method::PUT,
        &uri,
        Some(&bob),
        Some(json!({ "type_id": food, "amount": 1, "date": "2024-01-06" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, Method::GET, "/api/expenses", Some(&bob), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 0);

    let (status, body) = send(
        &app,
        Method::PUT,
        &uri,
        Some(&alice),
        Some(json!({ "type_id": food, "amount": "9.00", "description": "Dinner", "date": "2024-01-06" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["description"], "Dinner");

    let (status, body) = send(&app, Method::DELETE, &uri, Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["amount"], 9.0);

    let (status, _) = send(&app, Method::DELETE, &uri, Some(&alice), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_reports_missing_fields() {
    let app = app().await;
    let alice = register(&app, "alice").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/expenses",
        Some(&alice),
        Some(json!({ "description": "no amount" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["fields"], json!(["type_id", "amount", "date"]));

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/expenses",
        Some(&alice),
        Some(json!({ "type_id": "nope" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn body_cannot_choose_the_owner() {
    let app = app().await;
    let alice = register(&app, "alice").await;
    let bob = register(&app, "bob").await;
    let alice_id = user_id(&app, &alice).await;
    let bob_id = user_id(&app, &bob).await;
    let food = type_id(&app, &alice, "Food").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/expenses",
        Some(&alice),
        Some(json!({ "type_id": food, "amount": 4.2, "date": "2024-01-05", "user_id": bob_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["data"]["user_id"], alice_id.as_str());
    let uri = format!("/api/expenses/{}", body["data"]["id"].as_str().unwrap());

    let (status, body) = send(
        &app,
        Method::PUT,
        &uri,
        Some(&alice),
        Some(json!({ "type_id": food, "amount": 5, "date": "2024-01-06", "user_id": bob_id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["user_id"], alice_id.as_str());

    let (_, body) = send(&app, Method::GET, "/api/expenses", Some(&bob), None).await;
    assert_eq!(body["count"], 0);
    let (status, _) = send(&app, Method::GET, &uri, Some(&bob), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, body) = send(&app, Method::GET, "/api/expenses", Some(&alice), None).await;
    assert_eq!(body["count"], 1);
}

#[tokio::test]
async fn amount_must_fit_in_cents() {
    let app = app().await;
    let alice = register(&app, "alice").await;
    let food = type_id(&app, &alice, "Food").await;

    for amount in [json!(1.005), json!(0), json!(-3.5), json!(10_000_000_000.01_f64), json!("1e30")] {
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/expenses",
            Some(&alice),
            Some(json!({ "type_id": food, "amount": amount, "date": "2024-01-05" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{amount}: {body}");
    }

    let (_, body) = send(&app, Method::GET, "/api/expenses", Some(&alice), None).await;
    assert_eq!(body["count"], 0);
}

#[tokio::test]
async fn malformed_expense_id_is_not_found() {
    let app = app().await;
    let alice = register(&app, "alice").await;

    let (status, _) = send(&app, Method::GET, "/api/expenses/42", Some(&alice), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn filters_search_and_summaries() {
    let app = app().await;
    let alice = register(&app, "alice").await;
    add(&app, &alice, "Food", 10.0, "2024-01-05").await;
    add(&app, &alice, "Food", 20.0, "2024-02-01").await;
    add(&app, &alice, "Transport", 5.0, "2024-01-10").await;

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/expenses/filter/date?start_date=2024-01-01&end_date=2024-01-31",
        Some(&alice),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/expenses/filter/date?start_date=2024-01-01",
        Some(&alice),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["fields"], json!(["end_date"]));

    let food = type_id(&app, &alice, "Food").await;
    let (_, body) = send(
        &app,
        Method::GET,
        &format!("/api/expenses/filter/type/{food}"),
        Some(&alice),
        None,
    )
    .await;
    assert_eq!(body["count"], 2);

    let (status, body) = send(&app, Method::GET, "/api/expenses/search", Some(&alice), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["fields"], json!(["term"]));

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/expenses/search?term=foo",
        Some(&alice),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 0);

    let (_, body) = send(
        &app,
        Method::GET,
        "/api/expenses/summary/total",
        Some(&alice),
        None,
    )
    .await;
    assert_eq!(body["data"]["total"], 35.0);
    assert_eq!(body["data"]["count"], 3);

    let transport = type_id(&app, &alice, "Transport").await;
    let (_, body) = send(
        &app,
        Method::GET,
        "/api/expenses/summary/category",
        Some(&alice),
        None,
    )
    .await;
    assert_eq!(
        body["data"],
        json!([
            { "type_id": food, "category": "Food", "total": 30.0, "count": 2 },
            { "type_id": transport, "category": "Transport", "total": 5.0, "count": 1 },
        ])
    );
}

#[tokio::test]
async fn unknown_route_is_json_404() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/nope", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn spawned_server_answers_over_tcp() {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db).build().await.unwrap();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();

    let addr = server::spawn_with_listener(
        engine,
        TokenSigner::new("integration-secret", 30),
        listener,
    )
    .unwrap();

    let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
    stream
        .write_all(b"GET /health HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
        .await
        .unwrap();
    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();

    assert!(response.starts_with("HTTP/1.1 200"), "{response}");
    assert!(response.contains("\"status\":\"ok\""));
}
