use axum::Router;
use axum::routing::get;
use crate::state::AppState;

pub mod dto;
pub mod handler;
pub mod model;
pub mod repository;
pub mod service;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list_jobs).post(handler::create_job))
        .route("/{id}", get(handler::get_job))
        .route("/{id}/output", get(handler::download_output))
}
