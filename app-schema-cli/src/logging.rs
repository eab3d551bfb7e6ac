use axum::{
    body::{Body, Bytes},
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use chrono::Local;
use std::time::Instant;

// ANSI escape sequences, empty when stderr is not a terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Palette {
    reset: &'static str,
    dim: &'static str,
    ok: &'static str,
    redirect: &'static str,
    failure: &'static str,
    method: &'static str,
    path: &'static str,
    timing: &'static str,
    body: &'static str,
}

const COLORED: Palette = Palette {
    reset: "\x1b[0m",
    dim: "\x1b[2m",
    ok: "\x1b[92m",
    redirect: "\x1b[93m",
    failure: "\x1b[91m",
    method: "\x1b[96m",
    path: "\x1b[94m",
    timing: "\x1b[95m",
    body: "\x1b[90m",
};

const PLAIN: Palette = Palette {
    reset: "",
    dim: "",
    ok: "",
    redirect: "",
    failure: "",
    method: "",
    path: "",
    timing: "",
    body: "",
};

impl Palette {
    fn detect() -> Self {
        if atty::is(atty::Stream::Stderr) { COLORED } else { PLAIN }
    }

    fn for_status(&self, status: StatusCode) -> &'static str {
        if status.is_success() {
            self.ok
        } else if status.is_redirection() {
            self.redirect
        } else {
            self.failure
        }
    }
}

fn timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S,%3f").to_string()
}

/// Pretty-prints JSON bodies; anything else is printed as (lossy) text.
fn render_body(bytes: &[u8]) -> (bool, String) {
    match serde_json::from_slice::<serde_json::Value>(bytes) {
        Ok(json) => (true, serde_json::to_string_pretty(&json).unwrap_or_default()),
        Err(_) => (false, String::from_utf8_lossy(bytes).into_owned()),
    }
}

fn log_body(palette: &Palette, label: &str, bytes: &Bytes) {
    if bytes.is_empty() {
        return;
    }
    let (is_json, text) = render_body(bytes);
    let raw = if is_json { "" } else { " (raw)" };
    eprintln!(
        "{} - DEBUG - {}{label} body{raw}:{}\n{}{text}{}",
        timestamp(),
        palette.dim,
        palette.reset,
        palette.body,
        palette.reset
    );
}

/// Request logging for the validation service: one summary line per request
/// at `-v`, request and response bodies as well at `-vv`.
#[derive(Debug, Clone)]
pub struct LoggingMiddleware {
    pub verbose: u8,
}

impl LoggingMiddleware {
    #[must_use]
    pub fn new(verbose: u8) -> Self {
        Self { verbose }
    }

    fn logs_bodies(&self) -> bool {
        self.verbose >= 2
    }

    pub async fn handle(&self, request: Request, next: Next) -> Response {
        if self.verbose == 0 {
            return next.run(request).await;
        }

        let palette = Palette::detect();
        let method = request.method().clone();
        let path = request.uri().path().to_owned();
        let start = Instant::now();

        let request = if self.logs_bodies() {
            let (parts, body) = request.into_parts();
            let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap_or_default();
            log_body(&palette, "Request", &bytes);
            Request::from_parts(parts, Body::from(bytes))
        } else {
            request
        };

        let response = next.run(request).await;
        let status = response.status();
        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

        // eprintln! rather than tracing, which would escape the ANSI codes
        eprintln!(
            "{} - INFO - {}{method}{} {}{path}{} -> {}{}{} in {}{elapsed_ms:.1}ms{}",
            timestamp(),
            palette.method,
            palette.reset,
            palette.path,
            palette.reset,
            palette.for_status(status),
            status.as_u16(),
            palette.reset,
            palette.timing,
            palette.reset
        );

        if !self.logs_bodies() {
            return response;
        }

        let (parts, body) = response.into_parts();
        let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap_or_default();
        log_body(&palette, "Response", &bytes);
        Response::from_parts(parts, Body::from(bytes))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_status_colors() {
        assert_eq!(COLORED.for_status(StatusCode::OK), COLORED.ok);
        assert_eq!(COLORED.for_status(StatusCode::NO_CONTENT), COLORED.ok);
        assert_eq!(COLORED.for_status(StatusCode::FOUND), COLORED.redirect);
        assert_eq!(COLORED.for_status(StatusCode::NOT_FOUND), COLORED.failure);
        assert_eq!(COLORED.for_status(StatusCode::UNPROCESSABLE_ENTITY), COLORED.failure);
        assert_eq!(COLORED.for_status(StatusCode::INTERNAL_SERVER_ERROR), COLORED.failure);
    }

    #[test]
    fn test_status_color_boundaries() {
        let at = |code| COLORED.for_status(StatusCode::from_u16(code).unwrap());
        assert_eq!(at(200), COLORED.ok);
        assert_eq!(at(299), COLORED.ok);
        assert_eq!(at(300), COLORED.redirect);
        assert_eq!(at(399), COLORED.redirect);
        assert_eq!(at(400), COLORED.failure);
    }

    #[test]
    fn test_plain_palette_is_empty() {
        assert_eq!(PLAIN.for_status(StatusCode::OK), "");
        assert_eq!(PLAIN.for_status(StatusCode::NOT_FOUND), "");
        assert!(PLAIN.reset.is_empty());
    }

    #[test]
    fn test_render_body() {
        let (is_json, text) = render_body(br#"{"valid":true}"#);
        assert!(is_json);
        assert_eq!(text, "{\n  \"valid\": true\n}");

        let (is_json, text) = render_body(b"plain text");
        assert!(!is_json);
        assert_eq!(text, "plain text");
    }

    #[test]
    fn test_verbosity_levels() {
        assert!(!LoggingMiddleware::new(1).logs_bodies());
        assert!(LoggingMiddleware::new(2).logs_bodies());
        assert_eq!(LoggingMiddleware::new(0).verbose, 0);
    }
}
