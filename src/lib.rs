//! # axum-keyrange
//!
//! Pagination ranges over sortable keys for [`axum`][1].
//!
//! HTTP byte ranges select a slice of a file. This crate does the same for
//! a listing ordered by any field: a client asks for
//! `Range: name ~meredith..; max=10;` (ten items sorted by `name`, strictly
//! after `meredith`), and the server answers with a `Next-Range` header the
//! client can send back verbatim to fetch the following page.
//!
//! The codec itself is [`KeyRange`]: [`KeyRange::decode`] parses a header
//! value, [`KeyRange::encode`] (or [`Display`](std::fmt::Display)) writes the
//! canonical form, and [`KeyRange::next`] derives the continuation range from
//! the cursor of the last item returned. Start and end values are opaque
//! strings; they are never compared or interpreted.
//!
//! With the `axum` feature (on by default) [`KeyRange`] is also an extractor,
//! and [`NextRange`] / [`AcceptSortKeys`] are typed response headers.
//!
//! ```
//! use axum::Router;
//! use axum::routing::get;
//!
//! use axum_keyrange::{AcceptSortKeys, KeyRange, NextRange};
//!
//! async fn users(range: KeyRange) -> (AcceptSortKeys, NextRange, String) {
//!     let page = format!("sorted by {}", range.sort);
//!     let next = range.next("meredith");
//!     (AcceptSortKeys::new(["name", "created_at"]), NextRange(next), page)
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     // build our application with a single route
//!     let _app = Router::<()>::new().route("/users", get(users));
//!
//!     // run it with hyper on localhost:3000
//!     #[cfg(feature = "run_server_in_example")]
//!     {
//!         let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
//!         axum::serve(listener, _app).await.unwrap();
//!     }
//! }
//! ```
//!
//! [1]: https://docs.rs/axum

mod escape;
mod parse;
#[cfg(feature = "axum")]
mod headers;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::escape::escape;

#[cfg(feature = "axum")]
pub use headers::{AcceptSortKeys, InvalidRange, NextRange, NEXT_RANGE, RANGE, X_RANGE};

/// A range over a listing sorted by an arbitrary key.
///
/// All string fields hold plain, unescaped values. Escaping only happens
/// in [`KeyRange::encode`] and [`KeyRange::decode`].
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyRange {
    /// Name of the field the results are ordered by.
    pub sort: String,
    /// Lower bound cursor. Empty means unbounded below.
    pub start: String,
    /// Whether `start` itself is excluded from the results.
    pub start_exclusive: bool,
    /// Upper bound cursor. Empty means unbounded above.
    pub end: String,
    /// Maximum number of results. `0` leaves it up to the server.
    pub limit: u64,
    /// Descending order. Ascending is the default.
    pub descending: bool,
}

impl KeyRange {
    /// A full, ascending range over `sort` with no limit.
    pub fn new(sort: impl Into<String>) -> Self {
        KeyRange { sort: sort.into(), ..KeyRange::default() }
    }

    /// Parses a header value such as `name ~meredith..; max=10;`.
    ///
    /// Fails with [`RangeError::InvalidFormat`] on any grammar violation and
    /// with [`RangeError::Decode`] when a token has a malformed `%` escape.
    pub fn decode(s: &str) -> Result<Self, RangeError> {
        parse::parse_range(s)
    }

    /// Writes the canonical header value. Never fails.
    ///
    /// ```
    /// use axum_keyrange::KeyRange;
    ///
    /// let range = KeyRange { limit: 5, descending: true, ..KeyRange::new("name") };
    /// assert_eq!("name ..; max=5,order=desc;", range.encode());
    /// ```
    pub fn encode(&self) -> String {
        let mut out = escape(&self.sort);
        out.push(' ');
        if !self.start.is_empty() {
            if self.start_exclusive {
                out.push('~');
            }
            out.push_str(&escape(&self.start));
        }
        out.push_str("..");
        out.push_str(&escape(&self.end));
        out.push(';');

        let mut opts = Vec::with_capacity(2);
        if self.limit > 0 {
            opts.push(format!("max={}", self.limit));
        }
        if self.descending {
            opts.push("order=desc".to_string());
        }
        if !opts.is_empty() {
            out.push(' ');
            out.push_str(&opts.join(","));
            out.push(';');
        }
        out
    }

    /// The range of the page following the one that ended at `cursor`,
    /// the sort value of the last item returned.
    pub fn next(&self, cursor: impl Into<String>) -> Self {
        KeyRange {
            sort: self.sort.clone(),
            start: cursor.into(),
            start_exclusive: true,
            end: self.end.clone(),
            limit: self.limit,
            descending: self.descending,
        }
    }
}

impl fmt::Display for KeyRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for KeyRange {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KeyRange::decode(s)
    }
}

/// Error returned when a range header value can't be decoded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RangeError {
    /// The value does not follow the range grammar.
    #[error("range header invalid format")]
    InvalidFormat,

    /// A token contains a malformed percent escape.
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Error unescaping a percent-encoded token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// A `%` not followed by two hex digits.
    #[error("invalid URL escape {0:?}")]
    InvalidEscape(String),

    #[error("escaped token is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}
