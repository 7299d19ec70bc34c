//! Authentication service routes

use axum::{
    Json, Router,
    extract::{FromRequest, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use common::error::DatabaseError;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};

use crate::{
    AppState,
    models::{AuthResponse, LoginRequest, NewUser, RegisterRequest, User},
    password::{hash_password, verify_password, verify_without_user},
    validation::{validate_name, validate_password, validate_username},
};

/// Create the router for the authentication service
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "auth-service"
    }))
}

/// User registration endpoint
pub async fn register(
    State(state): State<AppState>,
    AuthJson(payload): AuthJson<RegisterRequest>,
) -> Result<impl IntoResponse, AuthError> {
    validate_username(&payload.username).map_err(AuthError::BadRequest)?;
    validate_password(&payload.password).map_err(AuthError::BadRequest)?;
    let name = validate_name(payload.name.as_deref()).map_err(AuthError::BadRequest)?;

    if state
        .user_repository
        .find_by_username(&payload.username)
        .await?
        .is_some()
    {
        return Err(AuthError::Conflict);
    }

    let password_hash = hash_password(&payload.password).map_err(|e| {
        error!("Failed to hash password: {}", e);
        AuthError::InternalServerError
    })?;

    let new_user = NewUser {
        username: payload.username,
        password_hash,
        name,
    };

    // A concurrent registration can still win the race past the pre-check
    let user = match state.user_repository.create(&new_user).await {
        Ok(user) => user,
        Err(e) if e.is_unique_violation() => return Err(AuthError::Conflict),
        Err(e) => return Err(e.into()),
    };

    info!(user_id = %user.id, "User registered");
    let response = issue_token(&state, user)?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// User login endpoint
pub async fn login(
    State(state): State<AppState>,
    AuthJson(payload): AuthJson<LoginRequest>,
) -> Result<impl IntoResponse, AuthError> {
    info!("Login attempt for user: {}", payload.username);

    if !state.rate_limiter.check(&payload.username).await {
        return Err(AuthError::TooManyRequests);
    }

    let Some(user) = state
        .user_repository
        .find_by_username(&payload.username)
        .await?
    else {
        // Same hashing cost as a wrong password
        verify_without_user(&payload.password);
        return Err(AuthError::Unauthorized);
    };

    let valid = verify_password(&payload.password, &user.password_hash).map_err(|e| {
        error!("Failed to verify password: {}", e);
        AuthError::InternalServerError
    })?;

    if !valid {
        warn!(user_id = %user.id, "Invalid password");
        return Err(AuthError::Unauthorized);
    }

    state.rate_limiter.reset(&payload.username).await;
    let response = issue_token(&state, user)?;

    Ok((StatusCode::OK, Json(response)))
}

fn issue_token(state: &AppState, user: User) -> Result<AuthResponse, AuthError> {
    let access_token = state
        .jwt_service
        .generate_access_token(user.id, &user.username)
        .map_err(|e| {
            error!("Failed to generate access token: {}", e);
            AuthError::InternalServerError
        })?;

    Ok(AuthResponse {
        access_token,
        user: user.into(),
    })
}

/// JSON body whose rejection renders as [`AuthError`]
#[derive(FromRequest)]
#[from_request(via(Json), rejection(AuthError))]
pub struct AuthJson<T>(pub T);

/// Custom error type for authentication errors
#[derive(Debug)]
pub enum AuthError {
    Unauthorized,
    BadRequest(String),
    Conflict,
    TooManyRequests,
    InternalServerError,
}

impl From<DatabaseError> for AuthError {
    fn from(err: DatabaseError) -> Self {
        error!("Database error: {}", err);
        AuthError::InternalServerError
    }
}

impl From<JsonRejection> for AuthError {
    fn from(rejection: JsonRejection) -> Self {
        debug!("Rejected request body: {}", rejection.body_text());
        let message = match rejection {
            JsonRejection::JsonDataError(_) => "Request body has missing or invalid fields",
            JsonRejection::JsonSyntaxError(_) => "Request body is not valid JSON",
            JsonRejection::MissingJsonContentType(_) => "Expected a JSON request body",
            _ => "Invalid request body",
        };
        AuthError::BadRequest(message.to_string())
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, code, error_message) = match self {
            AuthError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Invalid username or password".to_string(),
            ),
            AuthError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message)
            }
            AuthError::Conflict => (
                StatusCode::CONFLICT,
                "CONFLICT",
                "Username already exists".to_string(),
            ),
            AuthError::TooManyRequests => (
                StatusCode::TOO_MANY_REQUESTS,
                "TOO_MANY_REQUESTS",
                "Too many login attempts, try again later".to_string(),
            ),
            AuthError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "COLLABORATOR_FAILURE",
                "Internal server error".to_string(),
            ),
        };

        let body = Json(serde_json::json!({
            "error": error_message,
            "code": code,
        }));

        (status, body).into_response()
    }
}
