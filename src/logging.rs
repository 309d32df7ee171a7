//! Middleware for logging requests and responses.

use axum::{
    body::{Body, Bytes},
    extract::Request,
    http::{HeaderMap, StatusCode, header::CONTENT_TYPE},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Bodies longer than this many bytes are truncated in the `info` logs.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If a body is longer than [LOG_BODY_LENGTH_LIMIT] bytes, it is truncated
/// and the full body is logged at the `debug` level. Bodies that are not
/// text, such as PDF exports, are only logged by their size.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let body_bytes = match read_body(body).await {
        Ok(bytes) => bytes,
        Err(response) => return response,
    };

    tracing::info!(
        "Received request: {} {}\nbody: {}",
        parts.method,
        parts.uri,
        describe_body(&parts.headers, &body_bytes)
    );
    log_full_body("request", &parts.headers, &body_bytes);

    let request = Request::from_parts(parts, Body::from(body_bytes));
    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let body_bytes = match read_body(body).await {
        Ok(bytes) => bytes,
        Err(response) => return response,
    };

    tracing::info!(
        "Sending response: {}\nbody: {}",
        parts.status,
        describe_body(&parts.headers, &body_bytes)
    );
    log_full_body("response", &parts.headers, &body_bytes);

    Response::from_parts(parts, Body::from(body_bytes))
}

async fn read_body(body: Body) -> Result<Bytes, Response> {
    axum::body::to_bytes(body, usize::MAX).await.map_err(|error| {
        tracing::error!("could not read body for logging: {error}");
        StatusCode::INTERNAL_SERVER_ERROR.into_response()
    })
}

fn is_text(headers: &HeaderMap) -> bool {
    match headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
    {
        None => true,
        Some(content_type) => {
            content_type.starts_with("text/")
                || content_type.starts_with("application/json")
                || content_type.starts_with("application/x-www-form-urlencoded")
        }
    }
}

fn describe_body(headers: &HeaderMap, body: &[u8]) -> String {
    if !is_text(headers) {
        return format!("<{} bytes>", body.len());
    }

    let text = String::from_utf8_lossy(body);

    if body.len() > LOG_BODY_LENGTH_LIMIT {
        format!("{}...", truncate(&text, LOG_BODY_LENGTH_LIMIT))
    } else {
        format!("{text:?}")
    }
}

fn log_full_body(kind: &str, headers: &HeaderMap, body: &[u8]) {
    if body.len() > LOG_BODY_LENGTH_LIMIT && is_text(headers) {
        tracing::debug!("Full {kind} body: {:?}", String::from_utf8_lossy(body));
    }
}

/// Cut `text` to at most `limit` bytes without splitting a character.
fn truncate(text: &str, limit: usize) -> &str {
    if text.len() <= limit {
        return text;
    }

    let mut end = limit;
    while !text.is_char_boundary(end) {
        end -= 1;
    }

    &text[..end]
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderMap, HeaderValue, header::CONTENT_TYPE};

    use super::{LOG_BODY_LENGTH_LIMIT, describe_body, truncate};

    fn headers(content_type: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_str(content_type).unwrap());
        headers
    }

    #[test]
    fn truncates_on_character_boundary() {
        assert_eq!(truncate("₹₹", 4), "₹");
        assert_eq!(truncate("abc", 10), "abc");
    }

    #[test]
    fn long_json_bodies_are_truncated() {
        let body = "x".repeat(LOG_BODY_LENGTH_LIMIT * 2);

        let description = describe_body(&headers("application/json"), body.as_bytes());

        assert_eq!(description.len(), LOG_BODY_LENGTH_LIMIT + 3);
        assert!(description.ends_with("..."));
    }

    #[test]
    fn binary_bodies_are_summarized() {
        let description = describe_body(&headers("application/pdf"), b"%PDF-1.4");

        assert_eq!(description, "<8 bytes>");
    }
}
