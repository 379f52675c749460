use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use linkfolio::config::Config;
use serde_json::{Value, json};
use tower::ServiceExt;

async fn spawn_app() -> Router {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    config.auth.secret = "integration-test-secret".to_string();

    let state = linkfolio::api::create_app_state(config, None)
        .await
        .expect("Failed to create app state");
    linkfolio::api::router(state)
}

async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }

    let request = match body {
        Some(value) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body_json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, body_json)
}

async fn signup(app: &Router, username: &str, password: &str) -> String {
    let (status, body) = send_json(
        app,
        "POST",
        "/signup",
        None,
        Some(json!({"username": username, "password": password})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    body["data"]["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_signup_and_duplicate_username() {
    let app = spawn_app().await;

    let token = signup(&app, "john_doe", "$Abc123#").await;
    assert!(!token.is_empty());

    // Same username, different password: still a conflict
    let (status, body) = send_json(
        &app,
        "POST",
        "/signup",
        None,
        Some(json!({"username": "john_doe", "password": "different-pass"})),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn test_signup_validation() {
    let app = spawn_app().await;

    let (status, _) = send_json(
        &app,
        "POST",
        "/signup",
        None,
        Some(json!({"username": "john doe", "password": "$Abc123#"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send_json(
        &app,
        "POST",
        "/signup",
        None,
        Some(json!({"username": "john_doe", "password": "short"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Reserved route names cannot become public profiles
    let (status, _) = send_json(
        &app,
        "POST",
        "/signup",
        None,
        Some(json!({"username": "links", "password": "$Abc123#"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = spawn_app().await;
    signup(&app, "john_doe", "$Abc123#").await;

    let (wrong_pass_status, wrong_pass_body) = send_json(
        &app,
        "POST",
        "/login",
        None,
        Some(json!({"username": "john_doe", "password": "WrongPass1!"})),
    )
    .await;

    let (no_user_status, no_user_body) = send_json(
        &app,
        "POST",
        "/login",
        None,
        Some(json!({"username": "nobody_here", "password": "WrongPass1!"})),
    )
    .await;

    assert_eq!(wrong_pass_status, StatusCode::UNAUTHORIZED);
    assert_eq!(no_user_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_pass_body, no_user_body);
}

#[tokio::test]
async fn test_login_success() {
    let app = spawn_app().await;
    signup(&app, "john_doe", "$Abc123#").await;

    let (status, body) = send_json(
        &app,
        "POST",
        "/login",
        None,
        Some(json!({"username": "john_doe", "password": "$Abc123#"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let token = body["data"]["token"].as_str().unwrap();

    let (status, body) = send_json(&app, "GET", "/user/profile", Some(token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], json!("john_doe"));
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let app = spawn_app().await;

    let (status, _) = send_json(&app, "GET", "/links", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send_json(&app, "GET", "/links", Some("garbage-token"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send_json(&app, "GET", "/user/profile", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_link_crud_round_trip() {
    let app = spawn_app().await;
    let token = signup(&app, "john_doe", "$Abc123#").await;

    let (status, body) = send_json(
        &app,
        "POST",
        "/links",
        Some(&token),
        Some(json!({
            "url": "https://github.com/john",
            "platform": "GITHUB",
            "text": "my github"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let link = &body["data"]["link"];
    assert_eq!(link["url"], json!("https://github.com/john"));
    assert_eq!(link["platform"], json!("GITHUB"));
    assert_eq!(link["text"], json!("my github"));
    let link_id = link["id"].as_i64().unwrap();

    // Read back by id
    let (status, body) = send_json(
        &app,
        "GET",
        &format!("/links/{link_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["url"], json!("https://github.com/john"));
    assert_eq!(body["data"]["platform"], json!("GITHUB"));
    assert_eq!(body["data"]["text"], json!("my github"));

    // Full replacement update
    let (status, body) = send_json(
        &app,
        "PUT",
        &format!("/links/{link_id}"),
        Some(&token),
        Some(json!({
            "url": "https://twitter.com/john",
            "platform": "TWITTER",
            "text": "my twitter"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["link"]["platform"], json!("TWITTER"));

    // No stale fields survive the update
    let (status, body) = send_json(
        &app,
        "GET",
        &format!("/links/{link_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["url"], json!("https://twitter.com/john"));
    assert_eq!(body["data"]["platform"], json!("TWITTER"));
    assert_eq!(body["data"]["text"], json!("my twitter"));

    // Delete, then both read and re-delete report NotFound
    let (status, _) = send_json(
        &app,
        "DELETE",
        &format!("/links/{link_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send_json(
        &app,
        "GET",
        &format!("/links/{link_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send_json(
        &app,
        "DELETE",
        &format!("/links/{link_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_links_keep_insertion_order() {
    let app = spawn_app().await;
    let token = signup(&app, "john_doe", "$Abc123#").await;

    for n in 1..=3 {
        let (status, _) = send_json(
            &app,
            "POST",
            "/links",
            Some(&token),
            Some(json!({
                "url": format!("https://example.com/{n}"),
                "platform": "WEBSITE",
                "text": format!("site {n}")
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = send_json(&app, "GET", "/links", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let urls: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["url"].as_str().unwrap())
        .collect();
    assert_eq!(
        urls,
        vec![
            "https://example.com/1",
            "https://example.com/2",
            "https://example.com/3"
        ]
    );
}

#[tokio::test]
async fn test_links_are_scoped_to_their_owner() {
    let app = spawn_app().await;
    let token_a = signup(&app, "user_a", "$Abc123#a").await;
    let token_b = signup(&app, "user_b", "$Abc123#b").await;

    let (_, body) = send_json(
        &app,
        "POST",
        "/links",
        Some(&token_a),
        Some(json!({
            "url": "https://github.com/a",
            "platform": "GITHUB",
            "text": "a's github"
        })),
    )
    .await;
    let link_id = body["data"]["link"]["id"].as_i64().unwrap();

    // Another account cannot read, rewrite, or delete it
    let (status, _) = send_json(
        &app,
        "GET",
        &format!("/links/{link_id}"),
        Some(&token_b),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send_json(
        &app,
        "PUT",
        &format!("/links/{link_id}"),
        Some(&token_b),
        Some(json!({
            "url": "https://github.com/b",
            "platform": "GITHUB",
            "text": "stolen"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send_json(
        &app,
        "DELETE",
        &format!("/links/{link_id}"),
        Some(&token_b),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Untouched for the owner
    let (status, _) = send_json(
        &app,
        "GET",
        &format!("/links/{link_id}"),
        Some(&token_a),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_link_validation() {
    let app = spawn_app().await;
    let token = signup(&app, "john_doe", "$Abc123#").await;

    let (status, _) = send_json(
        &app,
        "POST",
        "/links",
        Some(&token),
        Some(json!({"url": "not a url", "platform": "GITHUB", "text": "x"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send_json(
        &app,
        "POST",
        "/links",
        Some(&token),
        Some(json!({"url": "https://example.com", "platform": "MYSPACE", "text": "x"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_profile_update_round_trip() {
    let app = spawn_app().await;
    let token = signup(&app, "john_doe", "$Abc123#").await;

    let (status, body) = send_json(
        &app,
        "PUT",
        "/user/profile",
        Some(&token),
        Some(json!({
            "username": "john_doe",
            "title": "Designer",
            "profile_picture": "https://example.com/john.png"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["profile"]["title"], json!("Designer"));

    let (status, body) = send_json(&app, "GET", "/user/profile", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], json!("Designer"));
    assert_eq!(
        body["data"]["profile_picture"],
        json!("https://example.com/john.png")
    );
}

#[tokio::test]
async fn test_profile_rename_conflicts() {
    let app = spawn_app().await;
    signup(&app, "jane_doe", "$Abc123#").await;
    let token = signup(&app, "john_doe", "$Abc123#").await;

    let (status, _) = send_json(
        &app,
        "PUT",
        "/user/profile",
        Some(&token),
        Some(json!({"username": "jane_doe", "title": null, "profile_picture": null})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_public_profile() {
    let app = spawn_app().await;
    let token = signup(&app, "john_doe", "$Abc123#").await;

    let (status, _) = send_json(
        &app,
        "POST",
        "/links",
        Some(&token),
        Some(json!({
            "url": "https://github.com/john",
            "platform": "GITHUB",
            "text": "my github"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // No auth needed for the public page
    let (status, body) = send_json(&app, "GET", "/john_doe", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], json!("john_doe"));
    assert_eq!(
        body["data"]["links"][0]["url"],
        json!("https://github.com/john")
    );

    // Credentials never leak into the public projection
    assert!(!body.to_string().contains("password"));

    let (status, _) = send_json(&app, "GET", "/nobody_here", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_healthz() {
    let app = spawn_app().await;

    let (status, body) = send_json(&app, "GET", "/healthz", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!("ok"));
}
