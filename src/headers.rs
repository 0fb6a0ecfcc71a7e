use axum::extract::FromRequestParts;
use axum::http::header::{HeaderName, HeaderValue, ACCEPT_RANGES};
pub use axum::http::header::RANGE;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, IntoResponseParts, Response, ResponseParts};
use axum_extra::headers::{self, Header};
use axum_extra::TypedHeader;

use crate::{KeyRange, RangeError};

/// Fallback request header, read when [`RANGE`] is absent.
pub static X_RANGE: HeaderName = HeaderName::from_static("x-range");

/// Response header carrying the range of the following page.
pub static NEXT_RANGE: HeaderName = HeaderName::from_static("next-range");

impl<S: Send + Sync> FromRequestParts<S> for KeyRange {
    type Rejection = InvalidRange;

    /// Reads [`RANGE`], falling back to [`X_RANGE`]. A request carrying
    /// neither gets [`KeyRange::default`].
    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = [&RANGE, &X_RANGE]
            .into_iter()
            .filter_map(|name| parts.headers.get(name))
            .find(|value| !value.is_empty());

        let Some(value) = value else {
            tracing::trace!("no range header, using the full range");
            return Ok(KeyRange::default());
        };

        let s = value.to_str().map_err(|_| {
            tracing::debug!(?value, "range header is not visible ASCII");
            InvalidRange(RangeError::InvalidFormat)
        })?;
        let range = KeyRange::decode(s).map_err(|err| {
            tracing::debug!(header = s, %err, "rejecting range header");
            InvalidRange(err)
        })?;
        tracing::trace!(?range, "range requested");
        Ok(range)
    }
}

/// Rejection for a malformed range header. Responds with `400 Bad Request`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidRange(pub RangeError);

impl IntoResponse for InvalidRange {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, self.0.to_string()).into_response()
    }
}

/// The `Next-Range` response header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NextRange(pub KeyRange);

impl Header for NextRange {
    fn name() -> &'static HeaderName {
        &NEXT_RANGE
    }

    fn decode<'i, I>(values: &mut I) -> Result<Self, headers::Error>
    where
        I: Iterator<Item = &'i HeaderValue>,
    {
        values
            .next()
            .and_then(|value| value.to_str().ok())
            .and_then(|s| KeyRange::decode(s).ok())
            .map(NextRange)
            .ok_or_else(headers::Error::invalid)
    }

    fn encode<E: Extend<HeaderValue>>(&self, values: &mut E) {
        let value = HeaderValue::from_str(&self.0.encode())
            .expect("encoded ranges only contain visible ASCII and spaces");
        values.extend(std::iter::once(value));
    }
}

impl IntoResponseParts for NextRange {
    type Error = <TypedHeader<Self> as IntoResponseParts>::Error;

    fn into_response_parts(self, res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        TypedHeader(self).into_response_parts(res)
    }
}

/// The `Accept-Ranges` response header, listing the keys a listing can be
/// sorted by. The keys are passed through as they are.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AcceptSortKeys(pub Vec<String>);

impl AcceptSortKeys {
    pub fn new<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        AcceptSortKeys(keys.into_iter().map(Into::into).collect())
    }
}

impl Header for AcceptSortKeys {
    fn name() -> &'static HeaderName {
        &ACCEPT_RANGES
    }

    fn decode<'i, I>(values: &mut I) -> Result<Self, headers::Error>
    where
        I: Iterator<Item = &'i HeaderValue>,
    {
        let mut keys = Vec::new();
        for value in values {
            let s = value.to_str().map_err(|_| headers::Error::invalid())?;
            keys.extend(s.split(',').map(str::trim).filter(|k| !k.is_empty()).map(String::from));
        }
        Ok(AcceptSortKeys(keys))
    }

    fn encode<E: Extend<HeaderValue>>(&self, values: &mut E) {
        match HeaderValue::from_str(&self.0.join(", ")) {
            Ok(value) => values.extend(std::iter::once(value)),
            Err(_) => tracing::warn!(keys = ?self.0, "sort keys are not a valid header value, skipping Accept-Ranges"),
        }
    }
}

impl IntoResponseParts for AcceptSortKeys {
    type Error = <TypedHeader<Self> as IntoResponseParts>::Error;

    fn into_response_parts(self, res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        TypedHeader(self).into_response_parts(res)
    }
}
