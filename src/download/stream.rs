//! Building download responses from upstream bodies.

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use futures_util::TryStreamExt;

use crate::download::headers::{attachment, encoded_attachment, ImageKind};
use crate::observability::metrics;

fn insert(headers: &mut HeaderMap, name: header::HeaderName, value: &str) {
    match HeaderValue::from_str(value) {
        Ok(v) => {
            headers.insert(name, v);
        }
        Err(_) => tracing::warn!(header = %name, value, "Dropping invalid download header"),
    }
}

/// Upstream `Content-Type`, when it sent a readable one.
pub fn upstream_content_type(upstream: &reqwest::Response) -> Option<String> {
    upstream
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// A fully buffered image with no-cache download headers.
pub fn image_response(body: Bytes, kind: ImageKind, filename: &str) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(kind.mime));
    insert(&mut headers, header::CONTENT_DISPOSITION, &encoded_attachment(filename));
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(body.len()));
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("no-cache, no-store, must-revalidate"),
    );
    headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert(header::EXPIRES, HeaderValue::from_static("0"));
    headers.insert(header::X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));

    metrics::record_download_bytes("image", body.len() as u64);
    (StatusCode::OK, headers, body).into_response()
}

/// Stream an upstream media body to the client as an attachment.
///
/// Nothing is buffered; `Content-Length` is forwarded only when upstream
/// declared one.
pub fn media_response(
    upstream: reqwest::Response,
    content_type: &str,
    filename: &str,
    kind: &'static str,
) -> Response {
    let mut headers = HeaderMap::new();
    insert(&mut headers, header::CONTENT_TYPE, content_type);
    insert(&mut headers, header::CONTENT_DISPOSITION, &attachment(filename));
    if let Some(length) = upstream.content_length() {
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from(length));
    }

    let stream = upstream
        .bytes_stream()
        .inspect_ok(move |chunk| metrics::record_download_bytes(kind, chunk.len() as u64));

    (StatusCode::OK, headers, Body::from_stream(stream)).into_response()
}
