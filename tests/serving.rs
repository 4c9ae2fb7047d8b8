mod common;

use common::start_server;
use reqwest::{redirect::Policy, StatusCode};

const BEHAVIORS: &str = "\
[default]
status_code = 500
body = not found
header = X-Mock: fallback

[GET /users/1]
status_code = 200
body = {\"id\":1}
header = Content-Type: application/json
header = X-Powered-By: mock
cookie.name = session
cookie.value = abc123
cookie.same_site = lax
cookie.http_only = true
cookie.name = theme
cookie.value = dark

[POST /users]
status_code = 201

[GET /old]
status_code = 301
redirect = /new
body = ignored

[GET /events]
stream = true
body = first
body = second
";

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_matched_response() {
    let server = start_server(BEHAVIORS).await;
    let res = reqwest::get(server.url("/users/1")).await.unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["content-type"], "application/json");
    assert_eq!(res.headers()["x-powered-by"], "mock");
    assert!(res.headers().contains_key("x-request-id"));

    let cookies: Vec<_> = res
        .headers()
        .get_all("set-cookie")
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect();
    assert_eq!(cookies, vec!["session=abc123; HttpOnly; SameSite=Lax", "theme=dark"]);

    assert_eq!(res.text().await.unwrap(), "{\"id\":1}");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_default_fallback() {
    let server = start_server(BEHAVIORS).await;
    let client = reqwest::Client::new();

    for res in [
        client.get(server.url("/missing")).send().await.unwrap(),
        client.delete(server.url("/users/1")).send().await.unwrap(),
        client.get(server.url("/users/1/")).send().await.unwrap(),
    ] {
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(res.headers()["x-mock"], "fallback");
        assert_eq!(res.text().await.unwrap(), "not found");
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_status_only_behavior() {
    let server = start_server(BEHAVIORS).await;
    let res = reqwest::Client::new().post(server.url("/users")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    assert_eq!(res.text().await.unwrap(), "");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_redirect() {
    let server = start_server(BEHAVIORS).await;
    let client = reqwest::Client::builder().redirect(Policy::none()).build().unwrap();

    let res = client.get(server.url("/old")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(res.headers()["location"], "/new");
    assert_eq!(res.text().await.unwrap(), "");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_event_stream() {
    let server = start_server(BEHAVIORS).await;
    let res = reqwest::get(server.url("/events")).await.unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["content-type"], "text/event-stream");
    assert_eq!(res.headers()["cache-control"], "no-cache");
    assert_eq!(res.text().await.unwrap(), "data: second\n\n");
}
