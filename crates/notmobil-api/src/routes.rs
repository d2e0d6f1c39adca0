use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::ai;
use crate::auth::{extract_bearer_token, AuthenticatedUser, TokenIssuer, TokenKind};
use crate::config::AppConfig;
use crate::error::AppError;
use crate::notes::{Created, MemoryNoteStore, NoteInput, StoredNote};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    tokens: Arc<TokenIssuer>,
    notes: Arc<MemoryNoteStore>,
}

impl AppState {
    pub fn from_config(config: Arc<AppConfig>) -> Self {
        Self {
            tokens: Arc::new(TokenIssuer::from_config(&config)),
            notes: Arc::new(MemoryNoteStore::new()),
            config,
        }
    }
}

pub fn app_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/notes", get(list_notes).post(create_note))
        .route(
            "/notes/{id}",
            get(get_note).put(update_note).delete(delete_note),
        )
        .route("/ai/summarize", post(summarize))
        .route("/ai/generate-tags", post(generate_tags))
        .route("/ai/classify", post(classify))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    let api_routes = Router::new()
        .route("/health", get(health))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
        .merge(protected_routes);

    Router::new()
        .nest("/api", api_routes)
        .fallback(endpoint_not_found)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_headers(Any)
                .allow_methods(Any),
        )
        .with_state(state)
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    let Json(body) = payload?;
    Ok(body)
}

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    message: &'static str,
    timestamp: i64,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        message: "NotMobil API is running",
        timestamp: Utc::now().timestamp(),
    })
}

async fn endpoint_not_found() -> AppError {
    AppError::not_found("Endpoint not found")
}

async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_bearer_token(request.headers())?;
    let user = state.tokens.verify(token, TokenKind::Access)?;
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    password: Option<String>,
}

#[derive(Debug, Serialize)]
struct UserBody {
    id: String,
    email: String,
    name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginResponse {
    access_token: String,
    refresh_token: String,
    user: UserBody,
}

async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AppError> {
    let request = json_body(payload)?;
    let (Some(email), Some(password)) = (
        request.email.filter(|email| !email.trim().is_empty()),
        request.password.filter(|password| !password.is_empty()),
    ) else {
        return Err(AppError::bad_request("Email and password required"));
    };

    let user = state
        .config
        .find_user(email.trim(), &password)
        .ok_or_else(|| {
            tracing::info!(endpoint = "login", "Rejected credentials");
            AppError::unauthorized("Invalid credentials")
        })?;

    let access_token = state.tokens.issue(&user.id, TokenKind::Access)?;
    let refresh_token = state.tokens.issue(&user.id, TokenKind::Refresh)?;
    tracing::info!(endpoint = "login", user = %user.id, "Issued session tokens");

    Ok(Json(LoginResponse {
        access_token,
        refresh_token,
        user: UserBody {
            id: user.id.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
        },
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefreshRequest {
    #[serde(default)]
    refresh_token: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshResponse {
    access_token: String,
}

async fn refresh(
    State(state): State<AppState>,
    payload: Result<Json<RefreshRequest>, JsonRejection>,
) -> Result<Json<RefreshResponse>, AppError> {
    let request = json_body(payload)?;
    let refresh_token = request
        .refresh_token
        .filter(|token| !token.trim().is_empty())
        .ok_or_else(|| AppError::bad_request("Refresh token required"))?;

    let user = state
        .tokens
        .verify(refresh_token.trim(), TokenKind::Refresh)?;
    let access_token = state.tokens.issue(&user.user_id, TokenKind::Access)?;
    tracing::debug!(endpoint = "refresh", user = %user.user_id, "Refreshed access token");

    Ok(Json(RefreshResponse { access_token }))
}

async fn list_notes(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Json<Vec<StoredNote>> {
    Json(state.notes.list(&user.user_id).await)
}

async fn get_note(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<Json<StoredNote>, AppError> {
    state
        .notes
        .get(&user.user_id, &id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::not_found("Note not found"))
}

async fn create_note(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    payload: Result<Json<NoteInput>, JsonRejection>,
) -> Result<(StatusCode, Json<StoredNote>), AppError> {
    let input = json_body(payload)?;
    match state.notes.create(&user.user_id, input, now_millis()).await {
        Created::New(note) => {
            tracing::info!(endpoint = "create_note", user = %user.user_id, note = %note.id, "Created note");
            Ok((StatusCode::CREATED, Json(note)))
        }
        Created::Existing(note) => {
            tracing::debug!(endpoint = "create_note", user = %user.user_id, note = %note.id, "Repeated create applied to stored note");
            Ok((StatusCode::OK, Json(note)))
        }
    }
}

async fn update_note(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    payload: Result<Json<NoteInput>, JsonRejection>,
) -> Result<Json<StoredNote>, AppError> {
    let input = json_body(payload)?;
    let note = state
        .notes
        .update(&user.user_id, &id, input, now_millis())
        .await
        .ok_or_else(|| AppError::not_found("Note not found"))?;
    tracing::info!(endpoint = "update_note", user = %user.user_id, note = %note.id, "Updated note");
    Ok(Json(note))
}

async fn delete_note(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    if !state.notes.delete(&user.user_id, &id).await {
        return Err(AppError::not_found("Note not found"));
    }
    tracing::info!(endpoint = "delete_note", user = %user.user_id, note = %id, "Deleted note");
    Ok(Json(serde_json::json!({})))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TextRequest {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    gemini_api_key: Option<String>,
}

impl TextRequest {
    fn into_text(self) -> Result<String, AppError> {
        self.text
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| AppError::bad_request("Text required"))
    }
}

#[derive(Debug, Serialize)]
struct SummarizeResponse {
    summary: String,
}

#[derive(Debug, Serialize)]
struct GenerateTagsResponse {
    tags: Vec<String>,
}

#[derive(Debug, Serialize)]
struct ClassifyResponse {
    category: &'static str,
}

async fn summarize(
    Extension(user): Extension<AuthenticatedUser>,
    payload: Result<Json<TextRequest>, JsonRejection>,
) -> Result<Json<SummarizeResponse>, AppError> {
    let request = json_body(payload)?;
    let has_user_key = request
        .gemini_api_key
        .as_deref()
        .is_some_and(|key| !key.trim().is_empty());
    let text = request.into_text()?;
    tracing::debug!(
        endpoint = "summarize",
        user = %user.user_id,
        has_user_key,
        "Summarizing with the extractive fallback"
    );
    Ok(Json(SummarizeResponse {
        summary: ai::summarize(&text),
    }))
}

async fn generate_tags(
    payload: Result<Json<TextRequest>, JsonRejection>,
) -> Result<Json<GenerateTagsResponse>, AppError> {
    let text = json_body(payload)?.into_text()?;
    Ok(Json(GenerateTagsResponse {
        tags: ai::generate_tags(&text),
    }))
}

async fn classify(
    payload: Result<Json<TextRequest>, JsonRejection>,
) -> Result<Json<ClassifyResponse>, AppError> {
    let text = json_body(payload)?.into_text()?;
    Ok(Json(ClassifyResponse {
        category: ai::classify(&text),
    }))
}
