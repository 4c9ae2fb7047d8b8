mod common;

use std::time::Duration;

use common::start_server;
use reqwest::StatusCode;

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_repeat_budget_under_concurrent_requests() {
    let server = start_server("[default]\nbody = gone\n\n[GET /limited]\nrepeat = 10\nbody = ok\n").await;
    let client = reqwest::Client::new();

    let mut tasks = Vec::new();
    for _ in 0..100 {
        let client = client.clone();
        let url = server.url("/limited");
        tasks.push(tokio::spawn(async move {
            let res = client.get(url).send().await.unwrap();
            (res.status(), res.text().await.unwrap())
        }));
    }

    let mut ok = 0;
    let mut not_found = 0;
    for task in tasks {
        match task.await.unwrap() {
            (StatusCode::OK, body) => {
                assert_eq!(body, "ok");
                ok += 1;
            }
            (StatusCode::NOT_FOUND, body) => {
                assert_eq!(body, "gone");
                not_found += 1;
            }
            (status, _) => panic!("unexpected status {status}"),
        }
    }

    assert_eq!(ok, 10);
    assert_eq!(not_found, 90);
    assert!(server.registry.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_delay_does_not_block_other_requests() {
    let server = start_server("[GET /slow]\ndelay = 2s\n\n[GET /fast]\nbody = quick\n").await;
    let client = reqwest::Client::new();

    let slow = tokio::spawn({
        let client = client.clone();
        let url = server.url("/slow");
        async move { client.get(url).send().await.unwrap().status() }
    });
    tokio::time::sleep(Duration::from_millis(50)).await;

    let started = std::time::Instant::now();
    let res = client.get(server.url("/fast")).send().await.unwrap();
    assert_eq!(res.text().await.unwrap(), "quick");
    assert!(started.elapsed() < Duration::from_secs(1));

    assert_eq!(slow.await.unwrap(), StatusCode::OK);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_shutdown_drains_in_flight_request() {
    let server = start_server("[GET /slow]\ndelay = 500ms\nbody = done\n").await;
    let client = reqwest::Client::new();

    let url = server.url("/slow");
    let in_flight = tokio::spawn(async move { client.get(url).send().await.unwrap().text().await.unwrap() });
    tokio::time::sleep(Duration::from_millis(100)).await;

    server.shutdown.trigger();
    assert_eq!(in_flight.await.unwrap(), "done");

    let result = tokio::time::timeout(Duration::from_secs(5), server.handle).await.unwrap();
    assert!(result.unwrap().is_ok());
}
