use std::net::SocketAddr;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};

use axum_keyrange::{AcceptSortKeys, KeyRange, NextRange};

const IDS: &[&str] = &["a1", "b2", "c3", "d4", "e5", "f6", "g7"];

async fn list_items(range: KeyRange) -> Response {
    let mut items: Vec<&str> = IDS
        .iter()
        .copied()
        .filter(|id| match (range.start.is_empty(), range.start_exclusive) {
            (true, _) => true,
            (false, true) => *id > range.start.as_str(),
            (false, false) => *id >= range.start.as_str(),
        })
        .filter(|id| range.end.is_empty() || *id <= range.end.as_str())
        .collect();
    if range.limit > 0 {
        items.truncate(range.limit as usize);
    }

    let accept = AcceptSortKeys::new(["id", "created_at"]);
    match items.last() {
        Some(last) if range.limit > 0 && items.len() as u64 == range.limit => {
            let next = NextRange(range.next(*last));
            (accept, next, Json(items)).into_response()
        }
        _ => (accept, Json(items)).into_response(),
    }
}

async fn serve() -> SocketAddr {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let app = Router::new().route("/items", get(list_items));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

#[tokio::test]
async fn test_paginate_with_next_range() {
    let addr = serve().await;
    let client = reqwest::Client::new();
    let url = format!("http://{}/items", addr);

    let mut range = "id ..; max=3;".to_string();
    let mut pages = Vec::new();
    loop {
        let response = client.get(&url).header("Range", &range).send().await.unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::OK);
        assert_eq!(response.headers().get("Accept-Ranges").unwrap(), "id, created_at");

        let next = response
            .headers()
            .get("Next-Range")
            .map(|v| v.to_str().unwrap().to_string());
        let page: Vec<String> = response.json().await.unwrap();
        pages.push(page);

        match next {
            Some(next) => range = next,
            None => break,
        }
    }

    assert_eq!(
        vec![vec!["a1", "b2", "c3"], vec!["d4", "e5", "f6"], vec!["g7"]],
        pages,
    );
}

#[tokio::test]
async fn test_next_range_header_format() {
    let addr = serve().await;
    let response = reqwest::Client::new()
        .get(format!("http://{}/items", addr))
        .header("X-Range", "id b2..e5; max=2;")
        .send()
        .await
        .unwrap();

    assert_eq!(response.headers().get("Next-Range").unwrap(), "id ~c3..e5; max=2;");
    let page: Vec<String> = response.json().await.unwrap();
    assert_eq!(vec!["b2", "c3"], page);
}

#[tokio::test]
async fn test_no_range_header() {
    let addr = serve().await;
    let response = reqwest::get(format!("http://{}/items", addr)).await.unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    assert!(response.headers().get("Next-Range").is_none());
    let page: Vec<String> = response.json().await.unwrap();
    assert_eq!(IDS.len(), page.len());
}

#[tokio::test]
async fn test_malformed_range_header() {
    let addr = serve().await;
    let client = reqwest::Client::new();

    for header in ["name a..b..c;", "id; max=abc;", "id; bogus=1;", "id"] {
        let response = client
            .get(format!("http://{}/items", addr))
            .header("Range", header)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST, "{header}");
        assert_eq!(response.text().await.unwrap(), "range header invalid format");
    }
}

#[tokio::test]
async fn test_invalid_escape_rejected() {
    let addr = serve().await;
    let response = reqwest::Client::new()
        .get(format!("http://{}/items", addr))
        .header("Range", "id %zz..;")
        .send()
        .await
        .unwrap();

    assert_eq!(StatusCode::BAD_REQUEST.as_u16(), response.status().as_u16());
}
