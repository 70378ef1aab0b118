//! Per-request tracing context.
//!
//! Every request carries an `x-request-id`, either the caller's or a fresh
//! uuid, and gets it echoed back. Route queries may also name the client
//! session they belong to through `x-session-id` or a `session_id` query
//! parameter. The session is recorded on the request span, so the log lines
//! of a superseded plan sit next to those of the plan that replaced it.

use axum::{
    extract::{Query, Request},
    http::{HeaderMap, HeaderName, HeaderValue, Uri},
    middleware::Next,
    response::Response,
};
use serde::Deserialize;
use tracing::Instrument;

pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");
pub const SESSION_ID_HEADER: HeaderName = HeaderName::from_static("x-session-id");

/// Identifiers attached to the request by [`attach_request_context`].
#[derive(Clone, Debug, Default)]
pub struct RequestContext {
    pub request_id: String,
    pub session_id: Option<String>,
}

impl RequestContext {
    /// Session named in the body wins over the one from headers or query.
    pub fn session_or(&self, explicit: Option<&str>) -> Option<String> {
        explicit
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .or_else(|| self.session_id.clone())
    }

    /// Record a session resolved after the middleware ran.
    pub fn record_session(session_id: &str) {
        tracing::Span::current().record("session_id", session_id);
    }
}

#[derive(Deserialize)]
struct SessionParam {
    session_id: Option<String>,
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn header(headers: &HeaderMap, name: &HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .and_then(non_empty)
}

/// Session id from `x-session-id`, falling back to `?session_id=`.
pub fn session_from(headers: &HeaderMap, uri: &Uri) -> Option<String> {
    header(headers, &SESSION_ID_HEADER).or_else(|| {
        Query::<SessionParam>::try_from_uri(uri)
            .ok()
            .and_then(|Query(param)| param.session_id)
            .as_deref()
            .and_then(non_empty)
    })
}

/// Attach a [`RequestContext`] and run the request inside its span.
pub async fn attach_request_context(mut request: Request, next: Next) -> Response {
    let request_id = header(request.headers(), &REQUEST_ID_HEADER)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let session_id = session_from(request.headers(), request.uri());

    let span = tracing::info_span!(
        "http",
        request_id = %request_id,
        session_id = tracing::field::Empty,
        method = %request.method(),
        path = %request.uri().path()
    );
    if let Some(session) = &session_id {
        span.record("session_id", session.as_str());
    }

    request.extensions_mut().insert(RequestContext {
        request_id: request_id.clone(),
        session_id,
    });

    let mut response = next.run(request).instrument(span).await;
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response
            .headers_mut()
            .insert(REQUEST_ID_HEADER.clone(), value);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(session: Option<&str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(session) = session {
            headers.insert(SESSION_ID_HEADER, HeaderValue::from_str(session).unwrap());
        }
        headers
    }

    #[test]
    fn header_session_wins_over_query() {
        let uri: Uri = "/v1/routes/latest?session_id=tab-q".parse().unwrap();
        assert_eq!(session_from(&headers(Some("tab-h")), &uri).as_deref(), Some("tab-h"));
        assert_eq!(session_from(&headers(None), &uri).as_deref(), Some("tab-q"));
    }

    #[test]
    fn blank_sessions_are_ignored() {
        let uri: Uri = "/v1/routes/latest?session_id=%20".parse().unwrap();
        assert_eq!(session_from(&headers(Some("  ")), &uri), None);
        let uri: Uri = "/v1/routes/latest".parse().unwrap();
        assert_eq!(session_from(&headers(None), &uri), None);
    }

    #[test]
    fn body_session_overrides_context() {
        let context = RequestContext {
            request_id: "req-1".to_string(),
            session_id: Some("tab-h".to_string()),
        };
        assert_eq!(context.session_or(Some(" tab-b ")).as_deref(), Some("tab-b"));
        assert_eq!(context.session_or(Some("")).as_deref(), Some("tab-h"));
        assert_eq!(context.session_or(None).as_deref(), Some("tab-h"));
    }
}
