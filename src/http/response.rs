//! Response realization.
//!
//! # Responsibilities
//! - Turn a [`Dispatch`] into an HTTP response
//! - Apply status, configured headers and `Set-Cookie` lines
//! - Pick the payload: redirect, event stream, or plain body
//!
//! # Design Decisions
//! - Delay is applied by the handler before rendering, not here
//! - Redirects carry the computed status and no body
//! - Event streams emit one `data:` frame per body line; hyper writes each
//!   frame as its own chunk

use std::convert::Infallible;

use axum::{
    body::Body,
    http::{
        header::{CACHE_CONTROL, CONTENT_TYPE, LOCATION, SET_COOKIE},
        HeaderName, HeaderValue,
    },
    response::Response,
};

use crate::behavior::ResponseBehavior;
use crate::routing::Dispatch;

pub const EVENT_STREAM: &str = "text/event-stream";

/// Build the response for a dispatch result.
pub fn render(dispatch: &Dispatch) -> Response {
    let behavior = dispatch.response.as_ref();

    let body = if behavior.redirect.is_some() {
        Body::empty()
    } else if behavior.stream {
        event_stream(behavior.body.as_deref())
    } else {
        behavior.body.clone().map(Body::from).unwrap_or_else(Body::empty)
    };

    let mut response = Response::new(body);
    *response.status_mut() = dispatch.status;
    apply_headers(&mut response, behavior);

    let headers = response.headers_mut();
    if let Some(target) = &behavior.redirect {
        match HeaderValue::from_str(target) {
            Ok(value) => {
                headers.insert(LOCATION, value);
            }
            Err(_) => tracing::warn!(target = %target, "Skipping unencodable redirect target"),
        }
    } else if behavior.stream {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(EVENT_STREAM));
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    }

    response
}

fn apply_headers(response: &mut Response, behavior: &ResponseBehavior) {
    let headers = response.headers_mut();

    for (name, value) in &behavior.headers {
        match (HeaderName::from_bytes(name.as_bytes()), HeaderValue::from_str(value)) {
            (Ok(name), Ok(value)) => {
                headers.insert(name, value);
            }
            _ => tracing::warn!(header = %name, "Skipping invalid header"),
        }
    }

    for cookie in &behavior.cookies {
        match HeaderValue::from_str(&cookie.to_string()) {
            Ok(value) => {
                headers.append(SET_COOKIE, value);
            }
            Err(_) => tracing::warn!(cookie = %cookie.name, "Skipping invalid cookie"),
        }
    }
}

/// Server-sent event frames, one per line of `body`.
fn event_stream(body: Option<&str>) -> Body {
    let frames: Vec<String> = body
        .map(|body| body.split('\n').map(|line| format!("data: {line}\n\n")).collect())
        .unwrap_or_default();

    Body::from_stream(futures_util::stream::iter(frames.into_iter().map(Ok::<_, Infallible>)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::Cookie;
    use axum::http::StatusCode;
    use std::sync::Arc;

    fn dispatch(response: ResponseBehavior, status: StatusCode) -> Dispatch {
        Dispatch {
            response: Arc::new(response),
            status,
            matched: true,
        }
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_plain_body_and_headers() {
        let mut behavior = ResponseBehavior {
            body: Some("{\"id\":1}".into()),
            ..Default::default()
        };
        behavior.headers.insert("x-powered-by".into(), "mock".into());

        let response = render(&dispatch(behavior, StatusCode::CREATED));
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers()["x-powered-by"], "mock");
        assert_eq!(body_text(response).await, "{\"id\":1}");
    }

    #[tokio::test]
    async fn test_no_body_is_empty() {
        let response = render(&dispatch(ResponseBehavior::default(), StatusCode::NOT_FOUND));
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_text(response).await, "");
    }

    #[tokio::test]
    async fn test_cookies_each_get_a_line() {
        let mut first = Cookie::new("session");
        first.value = "abc123".into();
        first.http_only = true;
        let mut second = Cookie::new("theme");
        second.value = "dark".into();

        let behavior = ResponseBehavior {
            cookies: vec![first, second],
            ..Default::default()
        };
        let response = render(&dispatch(behavior, StatusCode::OK));

        let lines: Vec<_> = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect();
        assert_eq!(lines, vec!["session=abc123; HttpOnly", "theme=dark"]);
    }

    #[tokio::test]
    async fn test_redirect_ignores_body() {
        let behavior = ResponseBehavior {
            redirect: Some("/new".into()),
            body: Some("ignored".into()),
            stream: true,
            ..Default::default()
        };
        let response = render(&dispatch(behavior, StatusCode::FOUND));

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[LOCATION], "/new");
        assert!(response.headers().get(CONTENT_TYPE).is_none());
        assert_eq!(body_text(response).await, "");
    }

    #[tokio::test]
    async fn test_redirect_keeps_computed_status() {
        let behavior = ResponseBehavior {
            redirect: Some("/new".into()),
            ..Default::default()
        };
        let response = render(&dispatch(behavior, StatusCode::OK));
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[LOCATION], "/new");
    }

    #[tokio::test]
    async fn test_event_stream_frames() {
        let mut behavior = ResponseBehavior {
            body: Some("chunk1\nchunk2".into()),
            stream: true,
            ..Default::default()
        };
        behavior.headers.insert("content-type".into(), "text/plain".into());

        let response = render(&dispatch(behavior, StatusCode::OK));
        assert_eq!(response.headers()[CONTENT_TYPE], EVENT_STREAM);
        assert_eq!(response.headers()[CACHE_CONTROL], "no-cache");
        assert_eq!(body_text(response).await, "data: chunk1\n\ndata: chunk2\n\n");
    }

    #[tokio::test]
    async fn test_event_stream_without_body() {
        let behavior = ResponseBehavior {
            stream: true,
            ..Default::default()
        };
        let response = render(&dispatch(behavior, StatusCode::OK));
        assert_eq!(response.headers()[CONTENT_TYPE], EVENT_STREAM);
        assert_eq!(body_text(response).await, "");
    }
}
