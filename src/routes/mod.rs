// HTTP routes: HTML report front end

mod http;

use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::config::AppConfig;
use crate::session::Session;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) session: Arc<Session>,
    pub(crate) config: AppConfig,
}

pub fn app(session: Arc<Session>, config: AppConfig) -> Router {
    let state = AppState { session, config };
    Router::new()
        .route("/", get(http::index_handler)) // GET /
        .route("/report", get(http::report_handler)) // GET /report?vmname=..&vminterval=..
        .route("/version", get(http::version_handler)) // GET /version
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}
