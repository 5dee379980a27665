use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use crate::docs::ApiDoc;
use axum::Router;
use crate::state::AppState;

use tower_http::cors::{Any, CorsLayer};

pub fn configure_routes() -> Router<AppState> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api/v1", api_routes())
        .nest("/api/v1/languages", crate::modules::language::router())
        .nest("/api/v1/videos", crate::modules::video::router())
        .nest("/api/v1/jobs", crate::modules::dubbing::router())
        .layer(cors)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", axum::routing::get(|| async { "ok" }))
}
