//! In-process tests for what ends up in flush files.

use axum::{
    body::Body,
    extract::connect_info::MockConnectInfo,
    http::{header::HOST, Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tower::ServiceExt;

use css_beacon::beacon::{FileFlushWriter, FlushError, FlushWriter, RequestBuffer, RequestRecord};
use css_beacon::http::{BeaconServer, BeaconState};
use css_beacon::security::Whitelist;

mod common;

fn app_for_peer(state: &BeaconState, peer: &str) -> Router {
    let peer: SocketAddr = peer.parse().unwrap();
    BeaconServer::build_router(state.clone()).layer(MockConnectInfo(peer))
}

fn beacon_request(host: &str, user_agent: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri("/pixel.css").header(HOST, host);
    if let Some(ua) = user_agent {
        builder = builder.header("User-Agent", ua);
    }
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_flush_file_matches_requests() {
    let dir = tempfile::tempdir().unwrap();
    let state = BeaconState::new(
        RequestBuffer::new(2, FileFlushWriter::new(dir.path())),
        Whitelist::new(["a.example"]),
    );

    let first = app_for_peer(&state, "10.0.0.1:50000")
        .oneshot(beacon_request("a.example", Some("curl/8")))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    assert!(common::flush_files(dir.path()).is_empty());

    let second = app_for_peer(&state, "10.0.0.2:50001")
        .oneshot(beacon_request("a.example", None))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::OK);

    let files = common::flush_files(dir.path());
    assert_eq!(files.len(), 1);
    let records = common::read_flush(&files[0]);
    assert_eq!(records.len(), 2);

    assert_eq!(records[0]["ip"], "10.0.0.1");
    assert_eq!(records[0]["user_agent"], "curl/8");
    assert_eq!(records[1]["ip"], "10.0.0.2");
    assert_eq!(records[1]["user_agent"], Value::Null);

    let t1 = records[0]["time"].as_f64().unwrap();
    let t2 = records[1]["time"].as_f64().unwrap();
    assert!(t1 <= t2);

    let mut keys: Vec<_> = records[0].as_object().unwrap().keys().cloned().collect();
    keys.sort();
    assert_eq!(keys, vec!["ip", "time", "user_agent"]);
}

#[tokio::test]
async fn test_rejected_requests_never_reach_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let state = BeaconState::new(
        RequestBuffer::new(2, FileFlushWriter::new(dir.path())),
        Whitelist::new(["a.example"]),
    );
    let app = app_for_peer(&state, "10.0.0.1:50000");

    app.clone()
        .oneshot(beacon_request("a.example", Some("first")))
        .await
        .unwrap();
    for host in ["b.example", "a.example.evil", ""] {
        let res = app
            .clone()
            .oneshot(beacon_request(host, Some("intruder")))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }
    assert_eq!(state.buffer.len(), 1);

    app.oneshot(beacon_request("A.EXAMPLE:8080", Some("second")))
        .await
        .unwrap();

    let files = common::flush_files(dir.path());
    assert_eq!(files.len(), 1);
    let agents: Vec<_> = common::read_flush(&files[0])
        .iter()
        .map(|r| r["user_agent"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(agents, vec!["first", "second"]);
}

#[tokio::test]
async fn test_head_response_has_no_body() {
    let dir = tempfile::tempdir().unwrap();
    let state = BeaconState::new(
        RequestBuffer::new(10, FileFlushWriter::new(dir.path())),
        Whitelist::new(["a.example"]),
    );

    let request = Request::builder()
        .method("HEAD")
        .uri("/x.css")
        .header(HOST, "a.example")
        .body(Body::empty())
        .unwrap();
    let res = app_for_peer(&state, "10.0.0.1:1").oneshot(request).await.unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["content-type"], "text/css");
    assert!(res.headers().contains_key("x-request-id"));
    let body = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    assert!(body.is_empty());
    assert_eq!(state.buffer.len(), 1);
}

/// Succeeds, but only after holding the buffer lock for a while.
struct SlowWriter(Duration);

impl FlushWriter for SlowWriter {
    fn write_batch(&self, _records: &[RequestRecord]) -> Result<PathBuf, FlushError> {
        std::thread::sleep(self.0);
        Ok(PathBuf::from("slow"))
    }
}

#[tokio::test]
async fn test_slow_flush_is_still_answered_with_stylesheet() {
    let state = BeaconState::new(
        RequestBuffer::new(1, SlowWriter(Duration::from_millis(1500))),
        Whitelist::new(["a.example"]),
    )
    .with_append_timeout(Duration::from_secs(1));

    let res = app_for_peer(&state, "10.0.0.1:1")
        .oneshot(beacon_request("a.example", Some("curl/8")))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["content-type"], "text/css");
    let body = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    assert!(body.is_empty());

    // The flush carries on after the response and still drains the buffer.
    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert!(state.buffer.is_empty());
}
