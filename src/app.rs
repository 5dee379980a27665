use axum::Router;
use axum::extract::DefaultBodyLimit;
use crate::state::AppState;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

pub fn create_app(state: AppState) -> Router {
    let limit = state.config.max_upload_bytes;

    crate::routes::configure_routes()
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(limit))
        .with_state(state)
}
