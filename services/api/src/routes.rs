//! API service routes

use axum::{
    Extension, Json, Router,
    extract::State,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::get,
};
use common::ids::{FavouriteId, NoteId, UserId};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::{
    catalog::page_bounds,
    error::ApiError,
    extract::{ApiJson, ApiPath, ApiQuery},
    middleware::{Principal, auth_middleware},
    models::{CreateFavouriteRequest, NoteContentRequest, PokemonListQuery},
    state::AppState,
};

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/favourites", get(list_favourites).post(create_favourite))
        .route(
            "/favourites/:id",
            get(get_favourite).delete(remove_favourite),
        )
        // `:id` is the favourite for GET/POST and the note for PUT/DELETE
        .route(
            "/notes/:id",
            get(list_notes)
                .post(add_note)
                .put(update_note)
                .delete(remove_note),
        )
        .route("/notes/note/:id", get(get_note))
        .route("/users/profile", get(get_profile))
        .route("/users/:id", get(get_user))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/pokemon", get(list_pokemon))
        .route("/pokemon/:id", get(get_pokemon))
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let database = match &state.db_pool {
        Some(pool) => common::database::health_check(pool).await.unwrap_or(false),
        None => true,
    };

    let status = if database {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(json!({
            "status": if database { "ok" } else { "degraded" },
            "service": "api-service",
            "database": database,
        })),
    )
}

/// List the caller's favourites with their notes
pub async fn list_favourites(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<impl IntoResponse, ApiError> {
    let favourites = state.favourites.list_for_user(principal.user_id).await?;
    Ok(Json(favourites))
}

/// Add a favourite
pub async fn create_favourite(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ApiJson(payload): ApiJson<CreateFavouriteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let favourite = state
        .favourites
        .create(principal.user_id, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(favourite)))
}

/// Get one of the caller's favourites
pub async fn get_favourite(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ApiPath(id): ApiPath<FavouriteId>,
) -> Result<impl IntoResponse, ApiError> {
    let favourite = state.favourites.get_owned(&principal, id).await?;
    Ok(Json(favourite))
}

/// Remove one of the caller's favourites and its notes
pub async fn remove_favourite(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ApiPath(id): ApiPath<FavouriteId>,
) -> Result<impl IntoResponse, ApiError> {
    state.favourites.remove(&principal, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List the notes of a favourite
pub async fn list_notes(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ApiPath(favourite_id): ApiPath<FavouriteId>,
) -> Result<impl IntoResponse, ApiError> {
    let notes = state
        .notes
        .list_for_favourite(&principal, favourite_id)
        .await?;
    Ok(Json(notes))
}

/// Add a note to a favourite
pub async fn add_note(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ApiPath(favourite_id): ApiPath<FavouriteId>,
    ApiJson(payload): ApiJson<NoteContentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let note = state
        .notes
        .add_note(&principal, favourite_id, &payload.content)
        .await?;
    Ok((StatusCode::CREATED, Json(note)))
}

/// Read a single note
pub async fn get_note(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ApiPath(note_id): ApiPath<NoteId>,
) -> Result<impl IntoResponse, ApiError> {
    let note = state.notes.get_note(&principal, note_id).await?;
    Ok(Json(note))
}

/// Replace a note's content
pub async fn update_note(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ApiPath(note_id): ApiPath<NoteId>,
    ApiJson(payload): ApiJson<NoteContentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let note = state
        .notes
        .update_note(&principal, note_id, &payload.content)
        .await?;
    Ok(Json(note))
}

/// Delete a note
pub async fn remove_note(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ApiPath(note_id): ApiPath<NoteId>,
) -> Result<impl IntoResponse, ApiError> {
    state.notes.remove_note(&principal, note_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// The caller's profile
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<impl IntoResponse, ApiError> {
    let profile = state.users.profile(&principal).await?;
    Ok(Json(profile))
}

/// A profile by ID, only visible to its owner
pub async fn get_user(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ApiPath(id): ApiPath<UserId>,
) -> Result<impl IntoResponse, ApiError> {
    let profile = state.users.get(&principal, id).await?;
    Ok(Json(profile))
}

/// Catalog listing page
pub async fn list_pokemon(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<PokemonListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let (offset, limit) = page_bounds(query.offset, query.limit);
    let page = state.catalog.list_pokemon(offset, limit).await?;
    Ok(Json(page))
}

/// Single catalog entry
pub async fn get_pokemon(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let pokemon = state.catalog.get_pokemon(id).await?;
    Ok(Json(pokemon))
}
