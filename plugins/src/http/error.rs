//! reqwest failures onto the closed [`ApiErrorKind`] classification.

use kanban_core::api::{ApiError, ApiErrorKind};

pub(crate) const BODY_PREVIEW_LIMIT: usize = 512;

pub(crate) fn from_reqwest(err: reqwest::Error, url: &str) -> ApiError {
    let kind = if err.is_timeout() {
        ApiErrorKind::Timeout
    } else if err.is_connect() {
        ApiErrorKind::Connect
    } else if err.is_request() {
        ApiErrorKind::Request
    } else if err.is_body() {
        ApiErrorKind::Body
    } else if err.is_decode() {
        ApiErrorKind::Decode
    } else {
        ApiErrorKind::Unknown
    };
    let mut out = ApiError::new(kind, err.to_string()).with_url(url);
    if let Some(status) = err.status() {
        out = out.with_status(status.as_u16());
    }
    out.with_source(err)
}

pub(crate) fn decode_error(status: u16, url: &str, err: serde_json::Error, preview: String) -> ApiError {
    let message = format!("failed to decode response body: {} | body={}", err, preview);
    ApiError::new(ApiErrorKind::Decode, message)
        .with_status(status)
        .with_url(url)
        .with_source(err)
}

pub(crate) fn preview_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "<empty body>".to_string();
    }

    let mut out = String::new();
    let mut truncated = false;
    for (idx, ch) in trimmed.chars().enumerate() {
        if idx >= BODY_PREVIEW_LIMIT {
            truncated = true;
            break;
        }
        out.push(ch);
    }

    if truncated {
        out.push_str("...");
    }

    out
}
