use axum::extract::Query;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use axum_keyrange::{AcceptSortKeys, KeyRange, NextRange};

const NAMES: &[&str] = &[
    "alex", "gary schwartz", "jack", "jordan", "kim", "meredith", "sam", "tal schwartz", "zoe",
];

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let router = Router::new()
        .route("/", get(|| async { "Hello, World!" }))
        .route("/users", get(list_users));

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
    tracing::info!("listening on {}", listener.local_addr().unwrap());
    axum::serve(listener, router).await.unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
struct ListRequest {
    prefix: Option<String>,
}

#[derive(Debug, Serialize)]
struct User {
    name: String,
}

async fn list_users(Query(q): Query<ListRequest>, range: KeyRange) -> Response {
    let range = if range.sort.is_empty() { KeyRange::new("name") } else { range };
    if range.sort != "name" {
        return (StatusCode::BAD_REQUEST, format!("cannot sort by {}", range.sort)).into_response();
    }

    let mut users: Vec<&str> = NAMES
        .iter()
        .copied()
        .filter(|n| q.prefix.as_deref().map_or(true, |p| n.starts_with(p)))
        .filter(|n| in_range(&range, n))
        .collect();
    if range.descending {
        users.reverse();
    }
    if range.limit > 0 {
        users.truncate(range.limit as usize);
    }

    let accept = AcceptSortKeys::new(["name"]);
    let users: Vec<User> = users.into_iter().map(|name| User { name: name.to_string() }).collect();
    match users.last() {
        Some(last) if range.limit > 0 && users.len() as u64 == range.limit => {
            let next = NextRange(range.next(last.name.clone()));
            (StatusCode::PARTIAL_CONTENT, accept, next, Json(users)).into_response()
        }
        _ => (StatusCode::OK, accept, Json(users)).into_response(),
    }
}

// lexical comparison is the application's choice for the `name` key
fn in_range(range: &KeyRange, name: &str) -> bool {
    let (low, high) = if range.descending { (&range.end, &range.start) } else { (&range.start, &range.end) };
    let after_start = match (range.start.is_empty(), range.descending, range.start_exclusive) {
        (true, _, _) => true,
        (false, false, true) => name > low.as_str(),
        (false, false, false) => name >= low.as_str(),
        (false, true, true) => name < high.as_str(),
        (false, true, false) => name <= high.as_str(),
    };
    let before_end = range.end.is_empty()
        || if range.descending { name >= low.as_str() } else { name <= high.as_str() };
    after_start && before_end
}
