//! Health and page handlers
//!
//! The viewer page and its script are embedded at compile time.

use axum::{
    http::{StatusCode, header},
    response::{Html, IntoResponse},
};

const INDEX_HTML: &str = include_str!("../../static/index.html");
const MAIN_JS: &str = include_str!("../../static/main.js");

/// GET /health
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// GET /
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// GET /static/main.js
pub async fn main_js() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript; charset=utf-8")],
        MAIN_JS,
    )
}
