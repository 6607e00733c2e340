//! services/api/src/web/rest.rs
//!
//! Contains the service-level handlers (API info, unknown endpoints) and the
//! master definition for the OpenAPI specification.

use crate::web::{books, users};
use axum::{
    extract::OriginalUri,
    http::{Method, StatusCode},
    response::{IntoResponse, Json},
};
use serde::Serialize;
use std::collections::BTreeMap;
use utoipa::{OpenApi, ToSchema};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        api_info,
        books::list_books,
        books::list_genres,
        books::get_book,
        books::get_book_content,
        books::search,
        books::list_units,
        users::register,
        users::login,
        users::save_progress,
        users::list_progress,
        users::resume,
    ),
    components(
        schemas(
            ApiInfo,
            ErrorResponse,
            books::BookDto,
            books::BookListResponse,
            books::BookResponse,
            books::BookWithContent,
            books::BookContentResponse,
            books::GenresResponse,
            books::SearchResponse,
            books::UnitDto,
            books::UnitsResponse,
            users::RegisterRequest,
            users::LoginRequest,
            users::SaveProgressRequest,
            users::UserDto,
            users::UserResponse,
            users::ProgressDto,
            users::ProgressResponse,
            users::ProgressListResponse,
            users::ResumePosition,
            users::ResumeResponse,
        )
    ),
    tags(
        (name = "Book Reader API", description = "Library, book content, accounts and reading progress.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response Structs
//=========================================================================================

/// The body of every failed request.
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

#[derive(Serialize, ToSchema)]
pub struct ApiInfo {
    pub message: String,
    pub version: String,
    pub endpoints: BTreeMap<String, String>,
}

//=========================================================================================
// Service Handlers
//=========================================================================================

/// Describe the service and its endpoint groups.
#[utoipa::path(
    get,
    path = "/api",
    responses((status = 200, description = "Service information", body = ApiInfo))
)]
pub async fn api_info() -> Json<ApiInfo> {
    let endpoints = [("books", "/api/books"), ("users", "/api/users")]
        .into_iter()
        .map(|(name, path)| (name.to_string(), path.to_string()))
        .collect();
    Json(ApiInfo {
        message: "Welcome to the book reader API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        endpoints,
    })
}

/// Fallback for paths no route matched.
pub async fn api_not_found(OriginalUri(uri): OriginalUri, method: Method) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({
            "success": false,
            "error": "API endpoint not found",
            "path": uri.path(),
            "method": method.as_str(),
        })),
    )
}
