use crate::domain::Bird;
use crate::transport::http::handlers::{birds, health};
use crate::transport::http::types::{
    AppState, BirdRequest, ErrorResponse, HealthResponse, ValidationErrorResponse,
};
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthcheck_handler,
        birds::index_handler,
        birds::create_handler,
        birds::show_handler,
        birds::update_handler,
        birds::destroy_handler
    ),
    components(schemas(
        Bird,
        BirdRequest,
        ErrorResponse,
        ValidationErrorResponse,
        HealthResponse
    ))
)]
pub struct ApiDoc;

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::healthcheck_handler))
        .route(
            "/birds",
            get(birds::index_handler).post(birds::create_handler),
        )
        .route(
            "/birds/:id",
            get(birds::show_handler)
                .patch(birds::update_handler)
                .put(birds::update_handler)
                .delete(birds::destroy_handler),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
