use std::collections::HashMap;

use axum::{
    body::Bytes,
    extract::Path,
    http::{header, HeaderMap, StatusCode},
    routing::{get, post},
    Form, Json, Router,
};
use serde::Serialize;
use tokio::net::TcpListener;

/// Echo of a submitted form, as returned by `/form`.
#[derive(Clone, Debug, Serialize)]
pub struct FormEcho {
    pub content_type: Option<String>,
    pub fields: HashMap<String, String>,
}

pub fn app() -> Router {
    Router::new()
        .route("/ping", get(ping))
        .route("/echo", post(echo))
        .route("/form", post(form))
        .route("/submit", post(submit))
        .route("/empty", get(empty).post(empty))
        .route("/status/{code}", get(status).post(status))
        .route("/content-type", post(content_type))
        .route("/latin1", get(latin1))
        .route("/gbk", get(gbk))
        .route("/large", get(large))
}

/// Size of the `/large` body, just past ureq's default 10 MiB read limit.
pub const LARGE_BODY_LEN: usize = 11 * 1024 * 1024;

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn ping() -> &'static str {
    "pong"
}

async fn echo(body: Bytes) -> Bytes {
    body
}

async fn form(headers: HeaderMap, Form(fields): Form<HashMap<String, String>>) -> Json<FormEcho> {
    Json(FormEcho {
        content_type: header_text(&headers, header::CONTENT_TYPE),
        fields,
    })
}

async fn submit() -> (StatusCode, &'static str) {
    (StatusCode::INTERNAL_SERVER_ERROR, "submission rejected")
}

async fn empty() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn status(Path(code): Path<u16>) -> Result<(StatusCode, String), StatusCode> {
    let status = StatusCode::from_u16(code).map_err(|_| StatusCode::BAD_REQUEST)?;
    Ok((status, format!("status {code}")))
}

async fn content_type(headers: HeaderMap) -> String {
    header_text(&headers, header::CONTENT_TYPE).unwrap_or_default()
}

async fn latin1() -> ([(header::HeaderName, &'static str); 1], Vec<u8>) {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=ISO-8859-1")],
        vec![b'c', b'a', b'f', 0xE9],
    )
}

async fn gbk() -> ([(header::HeaderName, &'static str); 1], Vec<u8>) {
    // "中文"
    (
        [(header::CONTENT_TYPE, "text/plain; charset=GBK")],
        vec![0xD6, 0xD0, 0xCE, 0xC4],
    )
}

async fn large() -> String {
    "x".repeat(LARGE_BODY_LEN)
}

fn header_text(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}
