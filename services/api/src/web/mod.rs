pub mod books;
pub mod middleware;
pub mod rest;
pub mod state;
pub mod users;

use crate::web::{middleware::log_request, rest::ApiDoc, state::AppState};
use axum::{
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::{ServeDir, ServeFile},
};
use tracing::warn;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Builds the full application: the JSON API under `/api`, Swagger UI, and the
/// static frontend (with `index.html` for unknown paths) when one is configured.
pub fn build_router(state: Arc<AppState>) -> Router {
    let api_router = Router::new()
        .route("/", get(rest::api_info))
        .route("/books", get(books::list_books))
        .route("/books/genres", get(books::list_genres))
        .route("/books/search/{query}", get(books::search))
        .route("/books/{id}", get(books::get_book))
        .route("/books/{id}/content", get(books::get_book_content))
        .route("/books/{id}/units", get(books::list_units))
        .route("/users/register", post(users::register))
        .route("/users/login", post(users::login))
        .route("/users/progress", post(users::save_progress))
        .route("/users/{user_id}/progress", get(users::list_progress))
        .route("/users/{user_id}/books/{book_id}/resume", get(users::resume))
        .fallback(rest::api_not_found);

    let app = Router::new()
        .nest("/api", api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    let app = match &state.config.static_dir {
        Some(dir) => {
            let spa = ServeDir::new(dir).fallback(ServeFile::new(dir.join("index.html")));
            app.fallback_service(spa)
        }
        None => app.fallback(rest::api_not_found),
    };

    app.layer(axum_middleware::from_fn(log_request))
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}

/// An empty origin list mirrors whatever origin the request came from.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT]);

    if origins.is_empty() {
        return layer.allow_origin(AllowOrigin::mirror_request());
    }
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();
    layer.allow_origin(allowed)
}
