//! services/api/src/web/books.rs
//!
//! Handlers for the library: listing, lookup, search, raw content and
//! server-side segmentation into chapters or pages.

use crate::error::ApiError;
use crate::web::{rest::ErrorResponse, state::AppState};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use reader_core::catalog::{books_by_genre, genres, search_books};
use reader_core::domain::{Book, BookId, DisplayUnit};
use reader_core::ports::PortError;
use reader_core::segmenter::{render_html, SegmentMode, Segmenter};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

//=========================================================================================
// API Response and Query Structs
//=========================================================================================

/// A catalog entry as sent to clients.
#[derive(Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookDto {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub year: Option<i32>,
    pub description: Option<String>,
    /// `description` cut for library cards.
    pub short_description: Option<String>,
    pub file: String,
    pub chapters: Option<u32>,
}

impl From<&Book> for BookDto {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id,
            title: book.title.clone(),
            author: book.author.clone(),
            genre: book.genre.clone(),
            year: book.year,
            description: book.description.clone(),
            short_description: book.short_description(),
            file: book.file.clone(),
            chapters: book.chapters,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct BookListResponse {
    pub success: bool,
    pub count: usize,
    pub data: Vec<BookDto>,
}

#[derive(Serialize, ToSchema)]
pub struct BookResponse {
    pub success: bool,
    pub data: BookDto,
}

/// Book metadata with the full text attached.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookWithContent {
    #[serde(flatten)]
    pub book: BookDto,
    pub content: String,
    /// Length of `content` in characters.
    pub content_length: usize,
}

#[derive(Serialize, ToSchema)]
pub struct BookContentResponse {
    pub success: bool,
    pub data: BookWithContent,
}

#[derive(Serialize, ToSchema)]
pub struct GenresResponse {
    pub success: bool,
    pub count: usize,
    pub data: Vec<String>,
}

#[derive(Serialize, ToSchema)]
pub struct SearchResponse {
    pub success: bool,
    pub query: String,
    pub count: usize,
    pub data: Vec<BookDto>,
}

/// One chapter or page. `start`/`end` are byte offsets into the book text.
#[derive(Serialize, Deserialize, ToSchema)]
pub struct UnitDto {
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub content: String,
    pub html: String,
    pub start: usize,
    pub end: usize,
}

impl UnitDto {
    pub fn new(unit: &DisplayUnit, segmenter: &Segmenter) -> Self {
        Self {
            index: unit.index,
            title: unit.title.clone(),
            content: unit.content.clone(),
            html: render_html(&segmenter.format(unit)),
            start: unit.source.start,
            end: unit.source.end,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct UnitsResponse {
    pub success: bool,
    pub mode: String,
    pub count: usize,
    pub data: Vec<UnitDto>,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct GenreQuery {
    /// Only books of this genre, ignoring case.
    pub genre: Option<String>,
}

/// Query strings are taken as text and parsed by hand so that bad values get
/// the JSON error envelope instead of a plain-text rejection.
#[derive(Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct UnitsQuery {
    /// `chapters` (default) or `pages`.
    pub mode: Option<String>,
    /// Page budget in characters when `mode=pages`.
    pub chars_per_page: Option<String>,
}

impl UnitsQuery {
    pub fn segment_mode(&self, default_chars_per_page: usize) -> Result<SegmentMode, ApiError> {
        match self.mode.as_deref().map(str::trim) {
            None | Some("") | Some("chapters") => Ok(SegmentMode::Chapters),
            Some("pages") => {
                let chars_per_page = match self.chars_per_page.as_deref() {
                    None => default_chars_per_page,
                    Some(raw) => raw
                        .trim()
                        .parse::<usize>()
                        .ok()
                        .filter(|n| *n > 0)
                        .ok_or_else(|| {
                            ApiError::BadRequest(format!(
                                "charsPerPage must be a positive integer, got '{}'",
                                raw
                            ))
                        })?,
                };
                Ok(SegmentMode::Pages { chars_per_page })
            }
            Some(other) => Err(ApiError::BadRequest(format!(
                "Unknown mode '{}', expected 'chapters' or 'pages'",
                other
            ))),
        }
    }
}

pub fn mode_name(mode: SegmentMode) -> &'static str {
    match mode {
        SegmentMode::Chapters => "chapters",
        SegmentMode::Pages { .. } => "pages",
    }
}

/// Path ids that are not integers cannot name a book.
pub fn parse_id(raw: &str, what: &str) -> Result<i64, ApiError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| PortError::NotFound(format!("{} {} not found", what, raw)).into())
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// List every book in the catalog.
#[utoipa::path(
    get,
    path = "/api/books",
    params(GenreQuery),
    responses(
        (status = 200, description = "The catalog", body = BookListResponse),
        (status = 500, description = "The catalog could not be read", body = ErrorResponse)
    )
)]
pub async fn list_books(
    State(state): State<Arc<AppState>>,
    Query(query): Query<GenreQuery>,
) -> Result<Json<BookListResponse>, ApiError> {
    let books = state.catalog.list_books().await?;
    let data: Vec<BookDto> = match query.genre.as_deref().filter(|g| !g.trim().is_empty()) {
        Some(genre) => books_by_genre(&books, genre.trim())
            .into_iter()
            .map(BookDto::from)
            .collect(),
        None => books.iter().map(BookDto::from).collect(),
    };
    Ok(Json(BookListResponse {
        success: true,
        count: data.len(),
        data,
    }))
}

/// Distinct genres in catalog order.
#[utoipa::path(
    get,
    path = "/api/books/genres",
    responses(
        (status = 200, description = "Every genre in the catalog", body = GenresResponse),
        (status = 500, description = "The catalog could not be read", body = ErrorResponse)
    )
)]
pub async fn list_genres(
    State(state): State<Arc<AppState>>,
) -> Result<Json<GenresResponse>, ApiError> {
    let books = state.catalog.list_books().await?;
    let data: Vec<String> = genres(&books).into_iter().map(str::to_string).collect();
    Ok(Json(GenresResponse {
        success: true,
        count: data.len(),
        data,
    }))
}

/// Fetch a single book's metadata.
#[utoipa::path(
    get,
    path = "/api/books/{id}",
    params(("id" = i64, Path, description = "Book id")),
    responses(
        (status = 200, description = "The book", body = BookResponse),
        (status = 404, description = "No such book", body = ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<BookResponse>, ApiError> {
    let book = state.catalog.get_book(parse_id(&id, "Book")?).await?;
    Ok(Json(BookResponse {
        success: true,
        data: BookDto::from(&book),
    }))
}

/// Fetch a book's metadata together with its full text.
#[utoipa::path(
    get,
    path = "/api/books/{id}/content",
    params(("id" = i64, Path, description = "Book id")),
    responses(
        (status = 200, description = "The book and its text", body = BookContentResponse),
        (status = 404, description = "No such book, or its text file is missing", body = ErrorResponse)
    )
)]
pub async fn get_book_content(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<BookContentResponse>, ApiError> {
    let book = state.catalog.get_book(parse_id(&id, "Book")?).await?;
    let content = state.content.load_content(&book).await?;
    let content_length = content.char_len();
    Ok(Json(BookContentResponse {
        success: true,
        data: BookWithContent {
            book: BookDto::from(&book),
            content: content.text,
            content_length,
        },
    }))
}

/// Case-insensitive search over title, author and genre.
#[utoipa::path(
    get,
    path = "/api/books/search/{query}",
    params(("query" = String, Path, description = "Text to look for")),
    responses(
        (status = 200, description = "Matching books", body = SearchResponse)
    )
)]
pub async fn search(
    State(state): State<Arc<AppState>>,
    Path(query): Path<String>,
) -> Result<Json<SearchResponse>, ApiError> {
    let books = state.catalog.list_books().await?;
    let data: Vec<BookDto> = search_books(&books, &query)
        .into_iter()
        .map(BookDto::from)
        .collect();
    Ok(Json(SearchResponse {
        success: true,
        query,
        count: data.len(),
        data,
    }))
}

/// Split a book into chapters or fixed-size pages.
#[utoipa::path(
    get,
    path = "/api/books/{id}/units",
    params(("id" = i64, Path, description = "Book id"), UnitsQuery),
    responses(
        (status = 200, description = "The book's display units in order", body = UnitsResponse),
        (status = 400, description = "Unknown mode or bad page size", body = ErrorResponse),
        (status = 404, description = "No such book, or its text file is missing", body = ErrorResponse)
    )
)]
pub async fn list_units(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<UnitsQuery>,
) -> Result<Json<UnitsResponse>, ApiError> {
    let mode = query.segment_mode(state.config.chars_per_page)?;
    let book = state.catalog.get_book(parse_id(&id, "Book")?).await?;
    let content = state.content.load_content(&book).await?;

    let data: Vec<UnitDto> = state
        .segmenter
        .segment(&content.text, mode)
        .iter()
        .map(|unit| UnitDto::new(unit, &state.segmenter))
        .collect();
    Ok(Json(UnitsResponse {
        success: true,
        mode: mode_name(mode).to_string(),
        count: data.len(),
        data,
    }))
}
