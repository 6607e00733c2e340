//! services/api/src/web/users.rs
//!
//! Handlers for accounts and reading progress: registration, login, saving and
//! listing progress, and resuming a book where the reader stopped.

use crate::error::ApiError;
use crate::web::books::{parse_id, UnitDto, UnitsQuery};
use crate::web::{rest::ErrorResponse, state::AppState};
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use reader_core::domain::{BookId, ProgressRecord, User, UserId};
use reader_core::ports::PortError;
use reader_core::session::ReadingSession;
use reader_core::validation::{validate_login, validate_progress_fraction, validate_registration};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};
use utoipa::ToSchema;

//=========================================================================================
// API Payload Structs
//=========================================================================================

/// Every field is optional so a missing one produces the validation message
/// rather than a deserialization failure.
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub password_confirm: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    /// Email or username.
    pub login: Option<String>,
    pub password: Option<String>,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveProgressRequest {
    pub user_id: Option<UserId>,
    pub book_id: Option<BookId>,
    /// Fraction of the book read, between 0 and 1.
    pub progress: Option<f64>,
    /// 1-based unit index.
    pub current_page: Option<usize>,
    pub timestamp: Option<DateTime<Utc>>,
}

//=========================================================================================
// API Response Structs
//=========================================================================================

/// A user as sent to clients. The password never leaves the server.
#[derive(Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub join_date: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            join_date: user.join_date,
            last_login: user.last_login,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct UserResponse {
    pub success: bool,
    pub message: String,
    pub data: UserDto,
}

#[derive(Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProgressDto {
    pub user_id: UserId,
    pub book_id: BookId,
    pub progress: f64,
    pub current_page: usize,
    pub timestamp: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProgressRecord> for ProgressDto {
    fn from(record: ProgressRecord) -> Self {
        Self {
            user_id: record.user_id,
            book_id: record.book_id,
            progress: record.progress_fraction,
            current_page: record.unit_index,
            timestamp: record.timestamp,
            updated_at: record.updated_at,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct ProgressResponse {
    pub success: bool,
    pub message: String,
    pub data: ProgressDto,
}

#[derive(Serialize, ToSchema)]
pub struct ProgressListResponse {
    pub success: bool,
    pub count: usize,
    pub data: Vec<ProgressDto>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResumePosition {
    /// 1-based index of the unit to continue from.
    pub unit_index: usize,
    pub total_units: usize,
    pub progress: f64,
    pub unit: UnitDto,
}

#[derive(Serialize, ToSchema)]
pub struct ResumeResponse {
    pub success: bool,
    pub data: ResumePosition,
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Create an account.
#[utoipa::path(
    post,
    path = "/api/users/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Missing or invalid fields", body = ErrorResponse),
        (status = 409, description = "Email or username already taken", body = ErrorResponse)
    )
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let body = json_body(payload)?;
    let new_user = validate_registration(
        body.username.as_deref(),
        body.email.as_deref(),
        body.password.as_deref(),
        body.password_confirm.as_deref(),
    )?;

    let user = state.users.create_user(new_user).await?;
    Ok((
        StatusCode::CREATED,
        Json(UserResponse {
            success: true,
            message: "User registered successfully".to_string(),
            data: user.into(),
        }),
    ))
}

/// Log in with an email or username.
#[utoipa::path(
    post,
    path = "/api/users/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = UserResponse),
        (status = 400, description = "Missing fields", body = ErrorResponse),
        (status = 401, description = "Wrong login or password", body = ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<UserResponse>, ApiError> {
    let body = json_body(payload)?;
    let (login, password) = validate_login(body.login.as_deref(), body.password.as_deref())?;

    let credentials = match state.users.find_by_login(login).await {
        Ok(credentials) => credentials,
        Err(PortError::NotFound(_)) => return Err(PortError::Unauthorized.into()),
        Err(e) => return Err(e.into()),
    };
    if credentials.password != password {
        warn!("Failed login for user {}", credentials.user.id);
        return Err(PortError::Unauthorized.into());
    }

    let user = state.users.record_login(credentials.user.id).await?;
    info!("User {} logged in", user.id);
    Ok(Json(UserResponse {
        success: true,
        message: "Login successful".to_string(),
        data: user.into(),
    }))
}

/// Save where a user is in a book. One entry per user and book; the latest wins.
#[utoipa::path(
    post,
    path = "/api/users/progress",
    request_body = SaveProgressRequest,
    responses(
        (status = 200, description = "Progress stored", body = ProgressResponse),
        (status = 400, description = "Missing fields or progress out of range", body = ErrorResponse)
    )
)]
pub async fn save_progress(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SaveProgressRequest>, JsonRejection>,
) -> Result<Json<ProgressResponse>, ApiError> {
    let body = json_body(payload)?;
    let (Some(user_id), Some(book_id), Some(progress)) = (body.user_id, body.book_id, body.progress)
    else {
        return Err(PortError::Validation(
            "userId, bookId and progress are required".to_string(),
        )
        .into());
    };
    let progress_fraction = validate_progress_fraction(progress)?;

    let now = Utc::now();
    let record = ProgressRecord {
        user_id,
        book_id,
        unit_index: body.current_page.unwrap_or(0),
        progress_fraction,
        timestamp: body.timestamp.unwrap_or(now),
        updated_at: now,
    };
    let stored = state.progress.upsert_progress(record).await?;
    Ok(Json(ProgressResponse {
        success: true,
        message: "Progress saved".to_string(),
        data: stored.into(),
    }))
}

/// Every progress entry of one user.
#[utoipa::path(
    get,
    path = "/api/users/{userId}/progress",
    params(("userId" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "The user's progress entries", body = ProgressListResponse)
    )
)]
pub async fn list_progress(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<ProgressListResponse>, ApiError> {
    let user_id = parse_id(&user_id, "User")?;
    let data: Vec<ProgressDto> = state
        .progress
        .progress_for_user(user_id)
        .await?
        .into_iter()
        .map(ProgressDto::from)
        .collect();
    Ok(Json(ProgressListResponse {
        success: true,
        count: data.len(),
        data,
    }))
}

/// Rebuild a reading session from the saved progress and return the unit to
/// continue from. Without saved progress the first unit is returned.
#[utoipa::path(
    get,
    path = "/api/users/{userId}/books/{bookId}/resume",
    params(
        ("userId" = i64, Path, description = "User id"),
        ("bookId" = i64, Path, description = "Book id"),
        UnitsQuery
    ),
    responses(
        (status = 200, description = "Where to continue reading", body = ResumeResponse),
        (status = 400, description = "Unknown mode or bad page size", body = ErrorResponse),
        (status = 404, description = "No such book, or its text file is missing", body = ErrorResponse)
    )
)]
pub async fn resume(
    State(state): State<Arc<AppState>>,
    Path((user_id, book_id)): Path<(String, String)>,
    Query(query): Query<UnitsQuery>,
) -> Result<Json<ResumeResponse>, ApiError> {
    let user_id = parse_id(&user_id, "User")?;
    let book_id = parse_id(&book_id, "Book")?;
    let mode = query.segment_mode(state.config.chars_per_page)?;

    let book = state.catalog.get_book(book_id).await?;
    let content = state.content.load_content(&book).await?;
    let units = state.segmenter.segment(&content.text, mode);
    let mut session = ReadingSession::new(book.id, units)
        .ok_or_else(|| ApiError::Internal(format!("Book {} produced no units", book.id)))?;

    if let Some(record) = state.progress.progress_for_book(user_id, book.id).await? {
        session.restore(&record);
    }

    Ok(Json(ResumeResponse {
        success: true,
        data: ResumePosition {
            unit_index: session.current_unit_index(),
            total_units: session.total_units(),
            progress: session.progress_fraction(),
            unit: UnitDto::new(session.current_unit(), &state.segmenter),
        },
    }))
}
