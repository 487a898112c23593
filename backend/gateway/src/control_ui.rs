//! Browser UI: a single static page driving the JSON API.

use axum::{response::Html, routing::get, Router};

use crate::server::GatewayState;

const INDEX_HTML: &str = include_str!("../assets/index.html");

pub fn ui_router() -> Router<GatewayState> {
    Router::new().route("/", get(|| async { Html(INDEX_HTML) }))
}
